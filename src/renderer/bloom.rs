use crate::renderer::HDR_FORMAT;

/// Post-process chain: brightness extract, separable Gaussian blur at half
/// resolution, additive composite onto the surface.
///
/// Only fragments brighter than the luminance threshold feed the blur, so
/// the emissive particles glow while the rings stay crisp.
pub struct BloomPass {
    extract_pipeline: wgpu::RenderPipeline,
    blur_h_pipeline: wgpu::RenderPipeline,
    blur_v_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    single_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    ping_view: wgpu::TextureView,
    pong_view: wgpu::TextureView,
    extract_bind: wgpu::BindGroup,
    blur_h_bind: wgpu::BindGroup,
    blur_v_bind: wgpu::BindGroup,
    composite_bind: wgpu::BindGroup,
}

impl BloomPass {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        scene_view: &wgpu::TextureView,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/bloom.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let single_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom_single_layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom_composite_layout"),
            entries: &[texture_entry(0), sampler_entry(1), texture_entry(2)],
        });

        let single_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bloom Pipeline Layout"),
                bind_group_layouts: &[&single_layout],
                push_constant_ranges: &[],
            });
        let composite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bloom Composite Pipeline Layout"),
                bind_group_layouts: &[&composite_layout],
                push_constant_ranges: &[],
            });

        let fullscreen_pipeline = |label: &str,
                                   layout: &wgpu::PipelineLayout,
                                   entry_point: &str,
                                   format: wgpu::TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_fullscreen",
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point,
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let extract_pipeline = fullscreen_pipeline(
            "Bloom Extract Pipeline",
            &single_pipeline_layout,
            "fs_extract",
            HDR_FORMAT,
        );
        let blur_h_pipeline = fullscreen_pipeline(
            "Bloom Blur H Pipeline",
            &single_pipeline_layout,
            "fs_blur_h",
            HDR_FORMAT,
        );
        let blur_v_pipeline = fullscreen_pipeline(
            "Bloom Blur V Pipeline",
            &single_pipeline_layout,
            "fs_blur_v",
            HDR_FORMAT,
        );
        let composite_pipeline = fullscreen_pipeline(
            "Bloom Composite Pipeline",
            &composite_pipeline_layout,
            "fs_composite",
            config.format,
        );

        let (ping_view, pong_view) = Self::create_blur_targets(device, config);
        let (extract_bind, blur_h_bind, blur_v_bind, composite_bind) = Self::create_bind_groups(
            device,
            &single_layout,
            &composite_layout,
            &sampler,
            scene_view,
            &ping_view,
            &pong_view,
        );

        Self {
            extract_pipeline,
            blur_h_pipeline,
            blur_v_pipeline,
            composite_pipeline,
            sampler,
            single_layout,
            composite_layout,
            ping_view,
            pong_view,
            extract_bind,
            blur_h_bind,
            blur_v_bind,
            composite_bind,
        }
    }

    /// Rebuilds the size-dependent targets after a resize or when the
    /// scene texture was recreated.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        scene_view: &wgpu::TextureView,
    ) {
        let (ping_view, pong_view) = Self::create_blur_targets(device, config);
        self.ping_view = ping_view;
        self.pong_view = pong_view;

        let (extract_bind, blur_h_bind, blur_v_bind, composite_bind) = Self::create_bind_groups(
            device,
            &self.single_layout,
            &self.composite_layout,
            &self.sampler,
            scene_view,
            &self.ping_view,
            &self.pong_view,
        );
        self.extract_bind = extract_bind;
        self.blur_h_bind = blur_h_bind;
        self.blur_v_bind = blur_v_bind;
        self.composite_bind = composite_bind;
    }

    fn create_blur_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> (wgpu::TextureView, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: (config.width / 2).max(1),
            height: (config.height / 2).max(1),
            depth_or_array_layers: 1,
        };
        let descriptor = wgpu::TextureDescriptor {
            label: Some("Bloom Blur Target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };
        let ping = device.create_texture(&descriptor);
        let pong = device.create_texture(&descriptor);
        (
            ping.create_view(&wgpu::TextureViewDescriptor::default()),
            pong.create_view(&wgpu::TextureViewDescriptor::default()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn create_bind_groups(
        device: &wgpu::Device,
        single_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        scene_view: &wgpu::TextureView,
        ping_view: &wgpu::TextureView,
        pong_view: &wgpu::TextureView,
    ) -> (
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
    ) {
        let single = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: single_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };

        let extract_bind = single("bloom_extract_bind", scene_view);
        let blur_h_bind = single("bloom_blur_h_bind", ping_view);
        let blur_v_bind = single("bloom_blur_v_bind", pong_view);

        let composite_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom_composite_bind"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(ping_view),
                },
            ],
        });

        (extract_bind, blur_h_bind, blur_v_bind, composite_bind)
    }

    /// Runs extract, the two blur passes, and the composite to `surface_view`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        self.fullscreen_pass(
            encoder,
            "bloom-extract",
            &self.extract_pipeline,
            &self.extract_bind,
            &self.ping_view,
        );
        self.fullscreen_pass(
            encoder,
            "bloom-blur-h",
            &self.blur_h_pipeline,
            &self.blur_h_bind,
            &self.pong_view,
        );
        self.fullscreen_pass(
            encoder,
            "bloom-blur-v",
            &self.blur_v_pipeline,
            &self.blur_v_bind,
            &self.ping_view,
        );
        self.fullscreen_pass(
            encoder,
            "bloom-composite",
            &self.composite_pipeline,
            &self.composite_bind,
            surface_view,
        );
    }

    fn fullscreen_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        target: &wgpu::TextureView,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}
