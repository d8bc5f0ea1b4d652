//! The GPU resources the demo draws with, created once before the first frame.

use crate::config::Config;
use crate::error::Error;
use crate::gfx::{AttribLayout, BufferId, GraphicsApi, ProgramId, ShaderStage, VertexArrayId};

/// Three `(x, y, z)` vertices.
pub type Triangle = [f32; 9];

#[rustfmt::skip]
pub const LARGE_TRIANGLE: Triangle = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.0, 0.5, 0.0,
];

#[rustfmt::skip]
pub const SMALL_TRIANGLE: Triangle = [
    -0.3, -0.3, 0.0,
    0.3, -0.3, 0.0,
    0.0, 0.3, 0.0,
];

/// Passes the position read from attribute slot 1 through unchanged.
pub const VERTEX_SHADER_SOURCE: &str = include_str!("./triangle_vertex_shader.glsl");
/// Paints every fragment opaque orange.
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("./orange_fragment_shader.glsl");

/// Vertices per draw call.
pub const VERTEX_COUNT: u32 = 3;

/// A static buffer together with the data it was filled from.
///
/// There is no way to write to it after [`VertexBuffer::upload`].
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    id: BufferId,
    data: Triangle,
}

impl VertexBuffer {
    pub fn upload<G: GraphicsApi>(gfx: &mut G, data: Triangle) -> Result<VertexBuffer, Error> {
        let id = gfx.create_buffer()?;
        gfx.upload_static(id, &data);
        debug!("uploaded {} floats to buffer {}", data.len(), id.0);
        Ok(VertexBuffer { id, data })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn data(&self) -> &Triangle {
        &self.data
    }
}

/// Both triangle buffers, the vertex array describing them and the program drawing them.
///
/// Slot 0 is wired to the large triangle and slot 1 to the small one, but the vertex shader only
/// reads slot 1, so only the small triangle ends up on screen.
#[derive(Debug)]
pub struct Scene {
    buffers: [VertexBuffer; 2],
    vertex_array: VertexArrayId,
    program: ProgramId,
}

impl Scene {
    /// Creates every resource the frame loop uses. Requires a current context.
    pub fn setup<G: GraphicsApi>(gfx: &mut G, config: &Config) -> Result<Scene, Error> {
        if !gfx.is_context_current() {
            return Err(Error::Precondition("scene setup"));
        }

        let vertex_array = gfx.create_vertex_array()?;
        gfx.bind_vertex_array(vertex_array);

        let buffers = [
            VertexBuffer::upload(gfx, LARGE_TRIANGLE)?,
            VertexBuffer::upload(gfx, SMALL_TRIANGLE)?,
        ];

        let program = build_program(gfx, config.validate_all_stages)?;

        // recorded into the bound vertex array
        for (slot, buffer) in buffers.iter().enumerate() {
            gfx.vertex_attrib(slot as u32, buffer.id, AttribLayout::VEC3);
        }
        for slot in 0..buffers.len() as u32 {
            gfx.enable_attrib(slot);
        }

        info!(
            "scene ready: vertex array {}, program {}",
            vertex_array.0, program.0
        );
        Ok(Scene {
            buffers,
            vertex_array,
            program,
        })
    }

    /// Issues the draw call for one frame.
    pub fn draw<G: GraphicsApi>(&self, gfx: &mut G) {
        gfx.use_program(self.program);
        gfx.bind_vertex_array(self.vertex_array);
        gfx.draw_triangles(0, VERTEX_COUNT);
    }

    pub fn buffers(&self) -> &[VertexBuffer; 2] {
        &self.buffers
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }
}

/// Compiles and links the two stages, then deletes them.
///
/// The vertex stage is always checked. The fragment stage and the link are only checked when
/// `validate_all_stages` is set.
fn build_program<G: GraphicsApi>(
    gfx: &mut G,
    validate_all_stages: bool,
) -> Result<ProgramId, Error> {
    let vertex = gfx.compile_shader(ShaderStage::Vertex, VERTEX_SHADER_SOURCE, true)?;
    let fragment = match gfx.compile_shader(
        ShaderStage::Fragment,
        FRAGMENT_SHADER_SOURCE,
        validate_all_stages,
    ) {
        Ok(fragment) => fragment,
        Err(e) => {
            gfx.delete_shader(vertex);
            return Err(e);
        }
    };

    let program = gfx.link_program(&[vertex, fragment], validate_all_stages);
    gfx.delete_shader(vertex);
    gfx.delete_shader(fragment);
    program
}
