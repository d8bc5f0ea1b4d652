use glutin::event::VirtualKeyCode;

use crate::config::Config;
use crate::error::Error;
use crate::gfx::GraphicsApi;
use crate::scene::Scene;
use crate::surface::{Surface, SurfaceEvent};

/// The rectangle of the framebuffer that is rendered to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// The viewport covering a whole framebuffer of the given size.
    pub fn for_framebuffer(width: u32, height: u32) -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

impl LoopState {
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }
}

/// What the loop did before it stopped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames drawn and presented.
    pub frames: u64,
}

/// Drives the per-frame sequence: input, clear, draw, present, events.
///
/// The loop only reads the scene; nothing created during setup is replaced while it runs.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    viewport: Viewport,
    clear_color: [f32; 4],
    frames: u64,
}

impl FrameLoop {
    /// Creates the loop and sets the initial viewport to the whole framebuffer.
    pub fn new<G: GraphicsApi>(gfx: &mut G, config: &Config, framebuffer_size: (u32, u32)) -> Self {
        let mut frame_loop = FrameLoop {
            state: LoopState::Running,
            viewport: Viewport::default(),
            clear_color: config.clear_color,
            frames: 0,
        };
        frame_loop.resize_viewport(gfx, framebuffer_size.0, framebuffer_size.1);
        frame_loop
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frames,
        }
    }

    /// Keeps the viewport equal to the framebuffer. Applying the same size twice is harmless.
    pub fn resize_viewport<G: GraphicsApi>(&mut self, gfx: &mut G, width: u32, height: u32) {
        let viewport = Viewport::for_framebuffer(width, height);
        debug!("viewport {}x{}", width, height);
        gfx.set_viewport(viewport);
        self.viewport = viewport;
    }

    /// Flags the surface for closing while escape is held.
    pub fn process_input<S: Surface>(&mut self, surface: &mut S) {
        if surface.key_pressed(VirtualKeyCode::Escape) {
            debug!("escape pressed, closing");
            surface.set_should_close(true);
        }
    }

    /// Reacts to the events of one poll.
    pub fn handle_events<S: Surface, G: GraphicsApi>(
        &mut self,
        surface: &mut S,
        gfx: &mut G,
        events: Vec<SurfaceEvent>,
    ) {
        for event in events {
            match event {
                SurfaceEvent::FramebufferResized { width, height } => {
                    self.resize_viewport(gfx, width, height)
                }
                SurfaceEvent::CloseRequested => {
                    debug!("close requested");
                    surface.set_should_close(true);
                }
            }
        }
    }

    /// `Running` becomes `Closing` once the surface should close. There is no way back.
    fn observe<S: Surface>(&mut self, surface: &S) -> LoopState {
        if self.state.is_running() && surface.should_close() {
            self.state = LoopState::Closing;
        }
        self.state
    }

    /// Runs one iteration. Nothing is drawn once the loop is closing, including in the iteration
    /// where escape was seen.
    pub fn step<S: Surface, G: GraphicsApi>(
        &mut self,
        surface: &mut S,
        gfx: &mut G,
        scene: &Scene,
    ) -> Result<LoopState, Error> {
        if !self.observe(surface).is_running() {
            return Ok(self.state);
        }

        self.process_input(surface);
        if !self.observe(surface).is_running() {
            return Ok(self.state);
        }

        gfx.clear_color(self.clear_color);
        gfx.clear_color_buffer();
        scene.draw(gfx);
        surface.swap_buffers()?;
        self.frames += 1;
        trace!("frame {}", self.frames);

        let events = surface.poll_events();
        self.handle_events(surface, gfx, events);
        Ok(self.observe(surface))
    }

    /// Steps until the surface should close.
    pub fn run<S: Surface, G: GraphicsApi>(
        mut self,
        surface: &mut S,
        gfx: &mut G,
        scene: &Scene,
    ) -> Result<FrameStats, Error> {
        while self.step(surface, gfx, scene)?.is_running() {}
        info!("window closed after {} frames", self.frames);
        Ok(self.stats())
    }
}
