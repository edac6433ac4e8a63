use crate::atom::model::AtomModel;
use crate::renderer::renderer::Renderer;
use crate::ui::UiState;
use winit::dpi::PhysicalSize;

pub type AppError = Box<dyn std::error::Error + Send + Sync>;
pub type AppResult<T> = Result<T, AppError>;

#[cfg(not(target_arch = "wasm32"))]
use crate::ui::desktop::{UiFrame, UiLayer, paint_element_labels};
#[cfg(not(target_arch = "wasm32"))]
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    window::Window,
};

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 0.1;

/// Mouse state for the orbit controls.
#[derive(Default)]
struct CameraInput {
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

pub struct App {
    renderer: Renderer,
    model: AtomModel,
    ui_state: UiState,
    input: CameraInput,
    #[cfg(not(target_arch = "wasm32"))]
    ui_layer: UiLayer,
}

impl App {
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn initialize(window: &Window) -> AppResult<Self> {
        let mut renderer = Renderer::new(window).await?;
        let model = AtomModel::new();
        renderer.upload_atom(&model);

        let ui_state = UiState::new(model.entry().symbol);
        let surface_format = renderer.surface_config().format;
        let ui_layer = UiLayer::new(window, renderer.device(), surface_format);

        Ok(Self {
            renderer,
            model,
            ui_state,
            input: CameraInput::default(),
            ui_layer,
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn initialize(canvas: &web_sys::HtmlCanvasElement) -> AppResult<Self> {
        let mut renderer = Renderer::new(canvas).await?;
        let model = AtomModel::new();
        renderer.upload_atom(&model);

        let ui_state = UiState::new(model.entry().symbol);

        Ok(Self {
            renderer,
            model,
            ui_state,
            input: CameraInput::default(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.renderer.size()
    }

    pub fn model(&self) -> &AtomModel {
        &self.model
    }

    /// Routes a window event to the UI layer first; events it does not
    /// consume feed the orbit controls.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        if self.ui_layer.handle_event(window, event) {
            self.input.dragging = false;
            return true;
        }
        self.handle_camera_event(event);
        false
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn handle_camera_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.input.dragging = *state == ElementState::Pressed;
                if !self.input.dragging {
                    self.input.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.input.dragging {
                    if let Some((last_x, last_y)) = self.input.last_cursor {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.renderer
                            .camera_mut()
                            .orbit(-dx * ORBIT_SENSITIVITY, -dy * ORBIT_SENSITIVITY);
                    }
                }
                self.input.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.renderer.camera_mut().zoom(1.0 - lines * ZOOM_STEP);
            }
            _ => {}
        }
    }

    /// Per-frame step: reconcile the picker selection, then advance every
    /// shell's rotation and push the new orientations to the GPU.
    pub fn update(&mut self) {
        self.apply_selection();
        self.model.advance();
        self.renderer.write_rotations(&self.model);
    }

    fn apply_selection(&mut self) {
        if self.ui_state.selected_symbol == self.model.entry().symbol {
            return;
        }
        if self.model.select(self.ui_state.selected_symbol) {
            self.renderer.upload_atom(&self.model);
        } else {
            self.ui_state.selected_symbol = self.model.entry().symbol;
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let ui_frame: UiFrame = {
            let (ui_layer, ui_state) = (&mut self.ui_layer, &mut self.ui_state);
            let (camera, entry) = (self.renderer.camera(), self.model.entry());
            ui_layer.prepare(window, |ctx| {
                crate::ui::build_picker(ctx, ui_state);
                paint_element_labels(ctx, camera, entry);
            })
        };

        let mut pending_frame = Some(ui_frame);
        let (renderer, ui_layer) = (&mut self.renderer, &mut self.ui_layer);
        renderer.render_with_ui(|device, queue, encoder, view| {
            if let Some(frame) = pending_frame.take() {
                ui_layer.paint(device, queue, encoder, view, frame);
            }
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.renderer.render()
    }
}
