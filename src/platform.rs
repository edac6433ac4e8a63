use crate::app::AppResult;
use wgpu::{Instance, Surface};
use winit::dpi::PhysicalSize;

/// 플랫폼별 Surface 생성을 추상화하는 트레이트
pub trait SurfaceProvider {
    fn create_surface(
        &self,
        instance: &Instance,
    ) -> AppResult<(Option<Surface<'static>>, PhysicalSize<u32>)>;
}

/// 네이티브 윈도우용 SurfaceProvider 구현
#[cfg(not(target_arch = "wasm32"))]
impl SurfaceProvider for winit::window::Window {
    fn create_surface(
        &self,
        instance: &Instance,
    ) -> AppResult<(Option<Surface<'static>>, PhysicalSize<u32>)> {
        let surface = instance.create_surface(self)?;
        let size = self.inner_size();
        // Surface를 'static으로 변환하기 위해 unsafe 사용
        let static_surface = unsafe { std::mem::transmute(surface) };
        Ok((Some(static_surface), size))
    }
}

/// 네이티브 플랫폼 시작 함수
#[cfg(not(target_arch = "wasm32"))]
pub fn start() {
    use crate::app::App;
    use pollster::block_on;
    use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    let window = WindowBuilder::new()
        .with_title("Bohr Model")
        .build(&event_loop)
        .unwrap();

    let mut app = block_on(App::initialize(&window)).unwrap();

    let _ = event_loop.run(move |event, target| match event {
        Event::WindowEvent { event, .. } => {
            app.handle_event(&window, &event);

            match event {
                WindowEvent::CloseRequested => {
                    target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    app.resize(new_size);
                }
                WindowEvent::RedrawRequested => {
                    app.update();
                    match app.render(&window) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => app.resize(app.size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => target.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            // 지속적인 렌더링을 위해 redraw 요청
            window.request_redraw();
        }
        _ => {}
    });
}

// wasm32 타겟에서 필요한 import들
#[cfg(target_arch = "wasm32")]
use {wasm_bindgen::JsCast, wasm_bindgen::prelude::*, wasm_bindgen_futures::spawn_local};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    use crate::app::App;

    console_log::init_with_level(log::Level::Debug).expect("Couldn't initialize logger");
    console_error_panic_hook::set_once();

    // DOM이 로드될 때까지 기다림
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let canvas = document.get_element_by_id("canvas").unwrap();
    let canvas: web_sys::HtmlCanvasElement = canvas.dyn_into().unwrap();

    // 캔버스 크기 설정 (HTML과 일치시킴)
    canvas.set_width(640);
    canvas.set_height(480);

    spawn_local(async move {
        match App::initialize(&canvas).await {
            Ok(mut app) => {
                log::info!("App initialized successfully!");
                app.update();
                match app.render() {
                    Ok(_) => log::info!("Atom rendered successfully!"),
                    Err(e) => log::error!("Render failed: {:?}", e),
                }
            }
            Err(e) => {
                log::error!("Failed to initialize app: {:?}", e);
            }
        }
    });
}

/// 웹 캔버스용 SurfaceProvider 구현
#[cfg(target_arch = "wasm32")]
impl SurfaceProvider for web_sys::HtmlCanvasElement {
    fn create_surface(
        &self,
        instance: &Instance,
    ) -> AppResult<(Option<Surface<'static>>, PhysicalSize<u32>)> {
        // wasm32에서는 캔버스를 직접 사용 (OffscreenCanvas 대신)
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(self.clone()))?;
        let static_surface = unsafe { std::mem::transmute(surface) };

        let size = PhysicalSize::new(self.width(), self.height());
        Ok((Some(static_surface), size))
    }
}

/// 헤드리스 모드용 (Surface 없이 실행)
pub struct HeadlessProvider {
    pub width: u32,
    pub height: u32,
}

impl SurfaceProvider for HeadlessProvider {
    fn create_surface(
        &self,
        _instance: &Instance,
    ) -> AppResult<(Option<Surface<'static>>, PhysicalSize<u32>)> {
        let size = PhysicalSize::new(self.width, self.height);
        Ok((None, size))
    }
}
