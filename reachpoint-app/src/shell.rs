//! Window, surface and input plumbing. The event loop is pumped on
//! demand from the session's poll calls rather than owning the
//! process, so the blocking trial flow stays in charge.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use pixels::wgpu::PresentMode;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use reachpoint_core::{Display, Event, Input, Key, ScreenGeometry};
use reachpoint_experiment::TaskConfig;
use reachpoint_render::Rasterizer;
use reachpoint_timing::{HighPrecisionTimer, Timer};

pub struct Shell {
    event_loop: EventLoop<()>,
    state: WindowState,
    poll_interval: Duration,
}

struct WindowState {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    raster: Option<Rasterizer>,
    geometry: ScreenGeometry,
    queue: Vec<Event>,
    cursor: (f32, f32),
    ctrl_held: bool,
    timer: HighPrecisionTimer,
    config: TaskConfig,
    present_mode: PresentMode,
    init_error: Option<anyhow::Error>,
}

impl Shell {
    /// Opens the window and surface and returns the two service
    /// handles the session drives them through. Pumps the event loop
    /// until the platform has delivered the window.
    pub fn create(
        config: &TaskConfig,
        timer: HighPrecisionTimer,
        present_mode: PresentMode,
    ) -> Result<(ShellDisplay, ShellInput)> {
        let event_loop = EventLoop::new()?;
        let state = WindowState {
            window: None,
            pixels: None,
            raster: None,
            geometry: ScreenGeometry::new(0, 0, config.screen_size_in),
            queue: Vec::new(),
            cursor: (0.0, 0.0),
            ctrl_held: false,
            timer,
            config: config.clone(),
            present_mode,
            init_error: None,
        };
        let mut shell = Shell {
            event_loop,
            state,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        };

        while shell.state.window.is_none() && shell.state.init_error.is_none() {
            shell.pump(Some(Duration::from_millis(10)));
        }
        if let Some(error) = shell.state.init_error.take() {
            return Err(error);
        }

        let shell = Rc::new(RefCell::new(shell));
        Ok((
            ShellDisplay {
                shell: Rc::clone(&shell),
            },
            ShellInput { shell },
        ))
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let status = self.event_loop.pump_app_events(timeout, &mut self.state);
        if let PumpStatus::Exit(_) = status {
            self.state.queue.push(Event::Quit);
        }
    }

    /// Copies the current canvas into the surface and presents it.
    fn present(&mut self) -> Result<()> {
        let state = &mut self.state;
        let (Some(pixels), Some(raster)) = (&mut state.pixels, &state.raster) else {
            return Ok(());
        };
        pixels.frame_mut().copy_from_slice(raster.data());
        pixels.render()?;
        Ok(())
    }
}

impl WindowState {
    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());

        let mut attributes = Window::default_attributes()
            .with_title("Circle")
            .with_resizable(false);
        if self.config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(primary_monitor)));
        } else {
            attributes = attributes.with_inner_size(PhysicalSize::new(960, 540));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        info!("window {}x{}", size.width, size.height);

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = PixelsBuilder::new(size.width, size.height, surface)
            .present_mode(self.present_mode)
            .build()?;

        let geometry = ScreenGeometry::new(size.width, size.height, self.config.screen_size_in);
        let raster = Rasterizer::new(
            size.width,
            size.height,
            &self.config.font_path,
            geometry.font_px(self.config.display_width_cm, self.config.viewing_distance_cm),
            geometry.stimulus_radius_px(self.config.stimulus_diameter_mm),
            self.config.text_wrap_px,
        )?;

        window.set_cursor_visible(false);
        self.geometry = geometry;
        self.pixels = Some(pixels);
        self.raster = Some(raster);
        self.window = Some(window);
        Ok(())
    }

    fn translate_key(&mut self, event: KeyEvent) {
        let at = self.timer.now();
        let key = match &event.logical_key {
            WinitKey::Named(NamedKey::Space) => Key::Space,
            WinitKey::Named(NamedKey::Enter) => Key::Return,
            WinitKey::Named(NamedKey::Backspace) => Key::Backspace,
            WinitKey::Named(NamedKey::Escape) => {
                if event.state.is_pressed() {
                    self.queue.push(Event::Quit);
                }
                return;
            }
            WinitKey::Character(ch) => {
                if self.ctrl_held && event.state.is_pressed() && ch.eq_ignore_ascii_case("q") {
                    self.queue.push(Event::Quit);
                    return;
                }
                Key::Other
            }
            _ => Key::Other,
        };

        if event.state.is_pressed() {
            self.queue.push(Event::KeyDown { key, at });
            if let Some(text) = &event.text {
                let printable: String = text.chars().filter(|c| !c.is_control()).collect();
                if !printable.is_empty() {
                    self.queue.push(Event::Text { text: printable });
                }
            }
        } else {
            self.queue.push(Event::KeyUp { key, at });
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        // the canvas keeps the size the session was calibrated for,
        // only the surface follows the window
        if let Some(pixels) = &mut self.pixels {
            if let Err(error) = pixels.resize_surface(size.width, size.height) {
                warn!("surface resize failed: {error}");
            }
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() && self.init_error.is_none() {
            if let Err(error) = self.create_window_and_surface(event_loop) {
                self.init_error = Some(error);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.queue.push(Event::Quit),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput { event, .. } => self.translate_key(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.queue.push(Event::Click {
                    x: self.cursor.0,
                    y: self.cursor.1,
                    at: self.timer.now(),
                });
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::RedrawRequested => {
                if let Some(pixels) = &self.pixels {
                    if let Err(error) = pixels.render() {
                        warn!("redraw failed: {error}");
                    }
                }
            }
            _ => {}
        }
    }
}

/// Presentation handle for the session.
pub struct ShellDisplay {
    shell: Rc<RefCell<Shell>>,
}

impl Display for ShellDisplay {
    fn clear(&mut self) -> Result<()> {
        let mut shell = self.shell.borrow_mut();
        if let Some(raster) = &mut shell.state.raster {
            raster.clear();
        }
        shell.present()
    }

    fn show_stimulus(&mut self, at: (f32, f32)) -> Result<()> {
        let mut shell = self.shell.borrow_mut();
        if let Some(raster) = &mut shell.state.raster {
            raster.clear();
            raster.draw_stimulus(at);
        }
        shell.present()
    }

    fn show_text(&mut self, text: &str) -> Result<()> {
        let mut shell = self.shell.borrow_mut();
        if let Some(raster) = &mut shell.state.raster {
            raster.clear();
            raster.draw_text_block(text);
        }
        shell.present()
    }

    fn geometry(&self) -> ScreenGeometry {
        self.shell.borrow().state.geometry
    }
}

/// Input handle for the session.
pub struct ShellInput {
    shell: Rc<RefCell<Shell>>,
}

impl Input for ShellInput {
    fn poll(&mut self) -> Vec<Event> {
        let mut shell = self.shell.borrow_mut();
        let timeout = shell.poll_interval;
        shell.pump(Some(timeout));
        std::mem::take(&mut shell.state.queue)
    }

    fn drain(&mut self) {
        let mut shell = self.shell.borrow_mut();
        shell.pump(Some(Duration::ZERO));
        shell.state.queue.clear();
    }
}
