pub mod labels;

use crate::atom::catalog;

/// UI-side selection state; the app reconciles it against the atom model
/// between frames.
#[derive(Clone, Debug)]
pub struct UiState {
    pub selected_symbol: &'static str,
}

impl UiState {
    pub fn new(selected_symbol: &'static str) -> Self {
        Self { selected_symbol }
    }
}

/// Element picker: one fixed button per catalog entry, showing atomic
/// number, symbol, name, and atomic mass.
pub fn build_picker(ctx: &egui::Context, ui_state: &mut UiState) {
    egui::Window::new("Elements")
        .default_width(150.0)
        .resizable(false)
        .show(ctx, |ui| {
            for entry in catalog::all() {
                let selected = ui_state.selected_symbol == entry.symbol;
                let text = format!(
                    "{}\n{}\n{}\n{}",
                    entry.atomic_number, entry.symbol, entry.name, entry.atomic_mass
                );
                if ui.selectable_label(selected, text).clicked() {
                    ui_state.selected_symbol = entry.symbol;
                }
            }
        });
}

#[cfg(not(target_arch = "wasm32"))]
pub mod desktop {
    use crate::atom::catalog::ElementEntry;
    use crate::renderer::camera::OrbitCamera;
    use crate::ui::labels::element_labels;
    use egui::ClippedPrimitive;
    use egui_wgpu::{Renderer, ScreenDescriptor};
    use egui_winit::{State as EguiWinitState, pixels_per_point};
    use glam::Vec2;
    use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
    use winit::{event::WindowEvent, window::Window};

    pub struct UiLayer {
        ctx: egui::Context,
        state: EguiWinitState,
        renderer: Renderer,
        screen_desc: ScreenDescriptor,
    }

    pub struct UiFrame {
        pub shapes: Vec<ClippedPrimitive>,
        pub textures_delta: egui::TexturesDelta,
    }

    impl UiLayer {
        pub fn new(window: &Window, device: &Device, surface_format: TextureFormat) -> Self {
            let ctx = egui::Context::default();
            let state = EguiWinitState::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                window,
                Some(window.scale_factor() as f32),
                None,
            );

            let mut layer = Self {
                ctx,
                state,
                renderer: Renderer::new(device, surface_format, None, 1),
                screen_desc: ScreenDescriptor {
                    size_in_pixels: [1, 1],
                    pixels_per_point: 1.0,
                },
            };
            layer.update_screen_descriptor(window);
            layer
        }

        pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
            let response = self.state.on_window_event(window, event);
            if response.repaint {
                window.request_redraw();
            }
            response.consumed
        }

        pub fn prepare<F>(&mut self, window: &Window, mut build_ui: F) -> UiFrame
        where
            F: FnMut(&egui::Context),
        {
            self.update_screen_descriptor(window);
            let raw_input = self.state.take_egui_input(window);
            let full_output = self.ctx.run(raw_input, |ctx| build_ui(ctx));
            self.state
                .handle_platform_output(window, full_output.platform_output);

            self.screen_desc.pixels_per_point = full_output.pixels_per_point;

            let shapes = self
                .ctx
                .tessellate(full_output.shapes, self.screen_desc.pixels_per_point);

            UiFrame {
                shapes,
                textures_delta: full_output.textures_delta,
            }
        }

        pub fn paint(
            &mut self,
            device: &Device,
            queue: &Queue,
            encoder: &mut CommandEncoder,
            view: &TextureView,
            frame: UiFrame,
        ) {
            let UiFrame {
                shapes,
                mut textures_delta,
            } = frame;

            for (id, image_delta) in textures_delta.set.drain(..) {
                self.renderer
                    .update_texture(device, queue, id, &image_delta);
            }

            let callback_buffers =
                self.renderer
                    .update_buffers(device, queue, encoder, &shapes, &self.screen_desc);

            if !callback_buffers.is_empty() {
                queue.submit(callback_buffers);
            }

            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-ui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                self.renderer
                    .render(&mut render_pass, &shapes, &self.screen_desc);
            }

            for id in textures_delta.free.drain(..) {
                self.renderer.free_texture(&id);
            }
        }

        fn update_screen_descriptor(&mut self, window: &Window) {
            let size = window.inner_size();
            self.screen_desc.size_in_pixels = [size.width.max(1), size.height.max(1)];
            self.screen_desc.pixels_per_point = pixels_per_point(&self.ctx, window);
        }
    }

    /// Paints the symbol and atomic-number labels by projecting their
    /// world anchors through the orbit camera. Labels track the atom as
    /// the camera moves.
    pub fn paint_element_labels(
        ctx: &egui::Context,
        camera: &OrbitCamera,
        entry: &'static ElementEntry,
    ) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("element-labels"),
        ));
        let screen = ctx.screen_rect();
        let points_per_pixel = 1.0 / ctx.pixels_per_point();
        let viewport = Vec2::new(
            screen.width() / points_per_pixel,
            screen.height() / points_per_pixel,
        );

        for label in element_labels(entry) {
            let Some((pos, pixels_per_unit)) = camera.project_to_screen(label.anchor, viewport)
            else {
                continue;
            };

            let font_px = label.size * pixels_per_unit;
            if font_px < 1.0 {
                continue;
            }

            painter.text(
                egui::pos2(pos.x * points_per_pixel, pos.y * points_per_pixel),
                egui::Align2::LEFT_BOTTOM,
                label.text,
                egui::FontId::proportional(font_px * points_per_pixel),
                egui::Color32::WHITE,
            );
        }
    }
}
