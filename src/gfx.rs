//! The graphics API seam.
//!
//! Everything the demo asks of the GPU goes through [`GraphicsApi`]. [`GlApi`] implements it with
//! raw OpenGL calls; the tests implement it with a recorder so the setup and the frame loop can be
//! checked without a display.

use glutin::{PossiblyCurrent, WindowedContext};

use gl::types::*;

use rustic_gl::error::GlError;

use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of_val;
use std::ptr::null;

use crate::error::{Error, InitError};
use crate::frame::Viewport;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub GLuint);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub GLuint);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub GLuint);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub GLuint);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// How one attribute slot reads `f32` components out of its buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttribLayout {
    pub components: u8,
    pub normalized: bool,
    /// Distance in bytes between two consecutive vertices.
    pub stride: u32,
    /// Byte offset of the first component.
    pub offset: usize,
}

impl AttribLayout {
    /// Tightly packed `vec3` positions.
    pub const VEC3: AttribLayout = AttribLayout {
        components: 3,
        normalized: false,
        stride: 3 * 4,
        offset: 0,
    };
}

/// The subset of a graphics API the demo needs.
///
/// Calls that the demo never checks (uploads, binds, draws) return nothing; calls that create
/// objects or can fail in a way the demo reports return a `Result`.
pub trait GraphicsApi {
    /// Whether the GL entry points are loaded. Staying on the context's thread is enforced by
    /// the implementors not being `Send`, not by this check.
    fn is_context_current(&self) -> bool;

    fn set_viewport(&mut self, viewport: Viewport);

    fn clear_color(&mut self, rgba: [f32; 4]);

    /// Clears the color buffer to the last color passed to [`clear_color`][Self::clear_color].
    fn clear_color_buffer(&mut self);

    fn create_buffer(&mut self) -> Result<BufferId, Error>;

    /// Binds `buffer` as the array buffer and uploads `data` once, for many draws.
    fn upload_static(&mut self, buffer: BufferId, data: &[f32]);

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, Error>;

    fn bind_vertex_array(&mut self, vao: VertexArrayId);

    /// Points attribute `slot` of the bound vertex array at `buffer`.
    fn vertex_attrib(&mut self, slot: u32, buffer: BufferId, layout: AttribLayout);

    fn enable_attrib(&mut self, slot: u32);

    /// Compiles one stage. With `checked` false the compile status is not inspected and a broken
    /// stage only surfaces later as a broken program.
    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
        checked: bool,
    ) -> Result<ShaderId, Error>;

    /// Attaches and links `shaders`. With `checked` false the link status is not inspected.
    fn link_program(&mut self, shaders: &[ShaderId], checked: bool) -> Result<ProgramId, Error>;

    fn delete_shader(&mut self, shader: ShaderId);

    fn use_program(&mut self, program: ProgramId);

    /// Draws `count` vertices starting at `first` as a triangle list.
    fn draw_triangles(&mut self, first: u32, count: u32);
}

/// [`GraphicsApi`] backed by the global `gl` function pointers.
///
/// The only way to get one is [`GlApi::load`], which needs a context that is already current.
/// It is neither `Send` nor `Sync`: OpenGL contexts are current per thread, so every call has to
/// stay on the thread that made the context current.
#[derive(Debug)]
pub struct GlApi {
    _not_send: PhantomData<*const ()>,
}

/// Entry points checked right after loading. If one of these is missing the context is unusable.
const REQUIRED_FUNCTIONS: &[(&str, fn() -> bool)] = &[
    ("glViewport", gl::Viewport::is_loaded),
    ("glGenBuffers", gl::GenBuffers::is_loaded),
    ("glGenVertexArrays", gl::GenVertexArrays::is_loaded),
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glDrawArrays", gl::DrawArrays::is_loaded),
];

impl GlApi {
    /// Loads the OpenGL function pointers from `context`.
    pub fn load(context: &WindowedContext<PossiblyCurrent>) -> Result<GlApi, InitError> {
        gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);

        for &(name, is_loaded) in REQUIRED_FUNCTIONS {
            if !is_loaded() {
                return Err(InitError::MissingFunction(name));
            }
        }
        debug!("loaded OpenGL function pointers");

        Ok(GlApi {
            _not_send: PhantomData,
        })
    }
}

impl GraphicsApi for GlApi {
    fn is_context_current(&self) -> bool {
        REQUIRED_FUNCTIONS.iter().all(|&(_, is_loaded)| is_loaded())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        unsafe {
            gl::Viewport(
                viewport.x,
                viewport.y,
                viewport.width as GLsizei,
                viewport.height as GLsizei,
            );
        }
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        unsafe {
            gl::ClearColor(rgba[0], rgba[1], rgba[2], rgba[3]);
        }
    }

    fn clear_color_buffer(&mut self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn create_buffer(&mut self) -> Result<BufferId, Error> {
        let b = rustic_gl::raw::create_buffer()
            .map_err(|_| InitError::Allocation("vertex buffer"))?;
        Ok(BufferId(b))
    }

    fn upload_static(&mut self, buffer: BufferId, data: &[f32]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                size_of_val(data) as GLsizeiptr,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
        }
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, Error> {
        let vao = rustic_gl::raw::create_vao()
            .map_err(|_| InitError::Allocation("vertex array"))?;
        Ok(VertexArrayId(vao))
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayId) {
        unsafe {
            gl::BindVertexArray(vao.0);
        }
    }

    fn vertex_attrib(&mut self, slot: u32, buffer: BufferId, layout: AttribLayout) {
        let normalized = if layout.normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0);
            gl::VertexAttribPointer(
                slot,
                layout.components as GLint,
                gl::FLOAT,
                normalized,
                layout.stride as GLsizei,
                layout.offset as *const GLvoid,
            );
        }
    }

    fn enable_attrib(&mut self, slot: u32) {
        unsafe {
            gl::EnableVertexAttribArray(slot);
        }
    }

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
        checked: bool,
    ) -> Result<ShaderId, Error> {
        if checked {
            return match rustic_gl::raw::create_shader(stage.gl_enum(), source) {
                Ok(id) => Ok(ShaderId(id)),
                Err(GlError::ShaderCompilation(log)) => Err(Error::ShaderCompile { stage, log }),
                Err(err) => Err(Error::ShaderCompile {
                    stage,
                    log: Some(err.to_string()),
                }),
            };
        }

        let source = CString::new(source).map_err(|_| Error::ShaderCompile {
            stage,
            log: Some("source contains a NUL byte".to_string()),
        })?;
        unsafe {
            let shader = gl::CreateShader(stage.gl_enum());
            if shader == 0 {
                return Err(InitError::Allocation("shader").into());
            }
            gl::ShaderSource(shader, 1, &source.as_ptr(), null());
            gl::CompileShader(shader);
            Ok(ShaderId(shader))
        }
    }

    fn link_program(&mut self, shaders: &[ShaderId], checked: bool) -> Result<ProgramId, Error> {
        let program = rustic_gl::raw::create_program()
            .map_err(|_| InitError::Allocation("shader program"))?;
        unsafe {
            for shader in shaders {
                gl::AttachShader(program, shader.0);
            }
            gl::LinkProgram(program);
        }

        match rustic_gl::raw::get_link_status(program) {
            Ok(_) => Ok(ProgramId(program)),
            Err(err) if checked => {
                unsafe {
                    gl::DeleteProgram(program);
                }
                Err(link_error(err))
            }
            Err(err) => {
                // a broken unchecked stage ends up here too
                warn!("unchecked program failed to link: {}", err);
                Ok(ProgramId(program))
            }
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe {
            gl::DeleteShader(shader.0);
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe {
            gl::UseProgram(program.0);
        }
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        unsafe {
            gl::DrawArrays(gl::TRIANGLES, first as GLint, count as GLsizei);
        }
    }
}

fn link_error(err: GlError) -> Error {
    Error::ProgramLink {
        log: Some(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_layout_is_tightly_packed() {
        assert_eq!(AttribLayout::VEC3.components, 3);
        assert_eq!(AttribLayout::VEC3.stride, 12);
        assert_eq!(AttribLayout::VEC3.offset, 0);
        assert!(!AttribLayout::VEC3.normalized);
    }

    #[test]
    fn stages_map_to_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn link_failures_carry_the_driver_message() {
        match link_error(GlError::ShaderCompilation(Some("bad".to_string()))) {
            Error::ProgramLink { log: Some(log) } => assert!(!log.is_empty()),
            other => panic!("expected a link error, got {:?}", other),
        }
    }
}
