use crate::app::AppResult;
use crate::atom::model::AtomModel;
use crate::platform::SurfaceProvider;
use crate::renderer::bloom::BloomPass;
use crate::renderer::camera::{CameraUniform, OrbitCamera};
use crate::renderer::mesh::GroupMesh;
use crate::renderer::vertex::SceneVertex;
use crate::renderer::{DEPTH_FORMAT, HDR_FORMAT};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

pub struct Renderer {
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    scene_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    bloom: BloomPass,
    camera: OrbitCamera,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    group_meshes: Vec<GroupMesh>,
}

impl Renderer {
    pub async fn new<T: SurfaceProvider>(target: &T) -> AppResult<Self> {
        // WebGL 백엔드만 사용하여 호환성 문제 회피
        let instance = if cfg!(target_arch = "wasm32") {
            wgpu::Instance::new(wgpu::InstanceDescriptor {
                backends: wgpu::Backends::GL,
                flags: wgpu::InstanceFlags::default(),
                dx12_shader_compiler: wgpu::Dx12Compiler::default(),
                gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
            })
        } else {
            wgpu::Instance::default()
        };

        let (surface, size) = target.create_surface(&instance)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: surface.as_ref(),
                ..Default::default()
            })
            .await
            .ok_or("Failed to find an appropriate adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                },
                None,
            )
            .await?;

        let format = if let Some(surface) = &surface {
            surface.get_capabilities(&adapter).formats[0]
        } else {
            wgpu::TextureFormat::Bgra8UnormSrgb
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        if let Some(surface) = &surface {
            surface.configure(&device, &config);
        }

        let camera = OrbitCamera::new(config.width as f32 / config.height as f32);
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry],
            label: Some("camera_bind_group_layout"),
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry],
            label: Some("model_bind_group_layout"),
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let scene_pipeline = |label: &str, blend: wgpu::BlendState, depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[SceneVertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                // Rings are double-sided, so no face culling anywhere.
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let opaque_pipeline =
            scene_pipeline("Opaque Scene Pipeline", wgpu::BlendState::REPLACE, true);
        let translucent_pipeline = scene_pipeline(
            "Translucent Scene Pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        let (scene_view, depth_view) = Self::create_scene_targets(&device, &config);
        let bloom = BloomPass::new(&device, &config, &scene_view);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            opaque_pipeline,
            translucent_pipeline,
            scene_view,
            depth_view,
            bloom,
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            model_layout,
            group_meshes: Vec::new(),
        })
    }

    fn create_scene_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> (wgpu::TextureView, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let scene = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene HDR Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        (
            scene.create_view(&wgpu::TextureViewDescriptor::default()),
            depth.create_view(&wgpu::TextureViewDescriptor::default()),
        )
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            if let Some(surface) = &self.surface {
                surface.configure(&self.device, &self.config);
            }
            self.camera.aspect = self.config.width as f32 / self.config.height as f32;

            let (scene_view, depth_view) = Self::create_scene_targets(&self.device, &self.config);
            self.scene_view = scene_view;
            self.depth_view = depth_view;
            self.bloom.rebind(&self.device, &self.config, &self.scene_view);
        }
    }

    /// Replaces the GPU meshes after a selection change. The old buffers
    /// drop here; nothing from the previous element survives.
    pub fn upload_atom(&mut self, model: &AtomModel) {
        self.group_meshes = model
            .shells()
            .iter()
            .map(|group| GroupMesh::new(&self.device, &self.model_layout, group))
            .collect();
    }

    /// Pushes the per-frame rotation state into each group's model uniform.
    pub fn write_rotations(&self, model: &AtomModel) {
        for (mesh, group) in self.group_meshes.iter().zip(model.shells()) {
            mesh.write_rotation(&self.queue, group);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.render_with_ui(|_, _, _, _| {})
    }

    pub fn render_with_ui<F>(&mut self, ui_paint: F) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let Some(surface) = &self.surface else {
            return Ok(());
        };

        let output = surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.camera_uniform.update_view_proj(&self.camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.opaque_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for mesh in &self.group_meshes {
                if let Some(solid) = &mesh.solid {
                    render_pass.set_bind_group(1, &mesh.model_bind_group, &[]);
                    solid.draw(&mut render_pass);
                }
            }

            // Orbit rings last, without depth writes.
            render_pass.set_pipeline(&self.translucent_pipeline);
            for mesh in &self.group_meshes {
                if let Some(translucent) = &mesh.translucent {
                    render_pass.set_bind_group(1, &mesh.model_bind_group, &[]);
                    translucent.draw(&mut render_pass);
                }
            }
        }

        self.bloom.render(&mut encoder, &surface_view);
        ui_paint(&self.device, &self.queue, &mut encoder, &surface_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
