//! The window side of the demo: creating the window and its context, and turning OS events into
//! the handful of things the frame loop cares about.

use glutin::dpi::{LogicalSize, PhysicalSize};
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};

use std::collections::HashMap;

use crate::config::Config;
use crate::error::Error;
use crate::gfx::GlApi;

/// Something that happened to the window since the last poll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The framebuffer now has this size in physical pixels.
    FramebufferResized { width: u32, height: u32 },
    /// The user or the OS asked for the window to close.
    CloseRequested,
}

/// The windowing operations the frame loop needs.
pub trait Surface {
    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    fn should_close(&self) -> bool;

    fn set_should_close(&mut self, value: bool);

    /// Whether `key` is held down as of the last poll.
    fn key_pressed(&self, key: VirtualKeyCode) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<(), Error>;

    /// Processes pending OS events without blocking and returns the ones the loop must react to.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
}

/// Keyboard state reconstructed from key events, so it can be polled like a key table.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct InputState {
    keys: HashMap<VirtualKeyCode, bool>,
}

impl InputState {
    pub fn record(&mut self, key: VirtualKeyCode, pressed: bool) {
        self.keys.insert(key, pressed);
    }

    /// If the key is currently down. Keys never seen count as up.
    pub fn key_down(&self, key: VirtualKeyCode) -> bool {
        *self.keys.get(&key).unwrap_or(&false)
    }
}

/// A glutin window with a current OpenGL context.
///
/// The context is current on the thread that called [`GlutinSurface::bootstrap`] and the type is
/// not `Send`, so the surface and the [`GlApi`] that comes with it stay on that thread.
pub struct GlutinSurface {
    event_loop: EventLoop<()>,
    context: WindowedContext<PossiblyCurrent>,
    input: InputState,
    should_close: bool,
}

impl GlutinSurface {
    /// Creates the window described by `config`, makes its context current and loads OpenGL.
    ///
    /// Must be called from the main thread; the platform event loop panics otherwise.
    pub fn bootstrap(config: &Config) -> Result<(GlutinSurface, GlApi), Error> {
        info!("init window");
        let (width, height) = config.window_size;
        let (major, minor) = config.gl_version;

        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(width as f64, height as f64))
            .with_resizable(config.resizable);

        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (major, minor)))
            .with_gl_profile(GlProfile::Core)
            .with_vsync(config.vsync)
            .build_windowed(window, &event_loop)?;

        let context = unsafe { context.make_current() }.map_err(|(_, e)| e)?;
        let gl = GlApi::load(&context)?;

        let surface = GlutinSurface {
            event_loop,
            context,
            input: InputState::default(),
            should_close: false,
        };
        let (fb_w, fb_h) = surface.framebuffer_size();
        info!(
            "created {}x{} window \"{}\" ({}x{} framebuffer, OpenGL {}.{} core)",
            width, height, config.window_title, fb_w, fb_h, major, minor
        );

        Ok((surface, gl))
    }
}

impl Surface for GlutinSurface {
    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.context.window().inner_size();
        (size.width, size.height)
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        self.input.key_down(key)
    }

    fn swap_buffers(&mut self) -> Result<(), Error> {
        self.context.swap_buffers()?;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        let GlutinSurface {
            event_loop,
            context,
            input,
            ..
        } = self;
        let mut events = Vec::new();

        let resized = |size: PhysicalSize<u32>, events: &mut Vec<SurfaceEvent>| {
            context.resize(size);
            events.push(SurfaceEvent::FramebufferResized {
                width: size.width,
                height: size.height,
            });
        };

        event_loop.run_return(|event, _, flow| {
            *flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => events.push(SurfaceEvent::CloseRequested),
                    WindowEvent::Resized(size) => resized(size, &mut events),
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        resized(*new_inner_size, &mut events)
                    }
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(key),
                                state,
                                ..
                            },
                        ..
                    } => {
                        trace!("key {:?} {:?}", key, state);
                        input.record(key, state == ElementState::Pressed);
                    }
                    _ => {}
                },
                // everything queued so far has been handled, hand control back to the frame loop
                Event::MainEventsCleared => *flow = ControlFlow::Exit,
                _ => {}
            }
        });

        events
    }
}
