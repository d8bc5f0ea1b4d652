//! Two triangles, one window, raw OpenGL.
//!
//! The classic "hello triangle" first steps: open an 800×600 window with an OpenGL 3.3 core
//! context, upload two triangles into static vertex buffers, compile a pass-through vertex shader
//! and a solid orange fragment shader, and draw until the window is closed or escape is pressed.
//!
//! The window comes from glutin and the drawing goes through the `gl` function pointers. Both are
//! hidden behind small traits ([`Surface`] and [`GraphicsApi`]) so the setup sequence and the frame
//! loop can be driven without a display.
//!
//! ```no_run
//! fn main() {
//!     if let Err(e) = hello_triangles::run(hello_triangles::Config::default()) {
//!         eprintln!("{}", e);
//!         std::process::exit(e.exit_code());
//!     }
//! }
//! ```

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;
extern crate gl;
extern crate rustic_gl;

pub extern crate glutin;

#[macro_use]
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod scene;
pub mod surface;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, InitError};
pub use frame::{FrameLoop, FrameStats, LoopState, Viewport};
pub use gfx::{GlApi, GraphicsApi};
pub use scene::Scene;
pub use surface::{GlutinSurface, Surface, SurfaceEvent};

/// Opens the window described by `config` and renders until it closes.
///
/// Everything happens on the calling thread, which must be the main thread.
pub fn run(config: Config) -> Result<FrameStats, Error> {
    let (mut surface, mut gl) = GlutinSurface::bootstrap(&config)?;
    run_on(&mut surface, &mut gl, &config)
}

/// Sets the viewport, creates the scene and runs the frame loop on an already bootstrapped
/// surface and graphics API.
pub fn run_on<S: Surface, G: GraphicsApi>(
    surface: &mut S,
    gfx: &mut G,
    config: &Config,
) -> Result<FrameStats, Error> {
    if !gfx.is_context_current() {
        return Err(Error::Precondition("rendering"));
    }
    let frame_loop = FrameLoop::new(gfx, config, surface.framebuffer_size());
    let scene = Scene::setup(gfx, config)?;
    frame_loop.run(surface, gfx, &scene)
}
