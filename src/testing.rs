//! Stand-ins for the GPU and the window, so setup and the frame loop run headless in tests.

use glutin::event::VirtualKeyCode;

use std::collections::{HashSet, VecDeque};

use crate::error::Error;
use crate::frame::Viewport;
use crate::gfx::{
    AttribLayout, BufferId, GraphicsApi, ProgramId, ShaderId, ShaderStage, VertexArrayId,
};
use crate::surface::{Surface, SurfaceEvent};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Viewport(Viewport),
    ClearColor([f32; 4]),
    Clear,
    CreateBuffer(BufferId),
    Upload(BufferId, Vec<f32>),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(VertexArrayId),
    VertexAttrib(u32, BufferId, AttribLayout),
    EnableAttrib(u32),
    CompileShader(ShaderStage, ShaderId, bool),
    LinkProgram(Vec<ShaderId>, ProgramId, bool),
    DeleteShader(ShaderId),
    UseProgram(ProgramId),
    Draw { first: u32, count: u32 },
}

/// Records every call instead of talking to a driver.
#[derive(Debug)]
pub struct RecordingGraphics {
    pub calls: Vec<Call>,
    /// This stage fails to compile.
    pub broken_stage: Option<ShaderStage>,
    /// Linking fails.
    pub broken_link: bool,
    current: bool,
    next_name: u32,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        RecordingGraphics {
            calls: Vec::new(),
            broken_stage: None,
            broken_link: false,
            current: true,
            next_name: 1,
        }
    }

    /// A device whose context was never made current.
    pub fn without_context() -> Self {
        RecordingGraphics {
            current: false,
            ..RecordingGraphics::new()
        }
    }

    fn name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn record(&mut self, call: Call) {
        assert!(self.current, "{:?} issued without a current context", call);
        self.calls.push(call);
    }

    fn require_context(&self, what: &'static str) -> Result<(), Error> {
        if self.current {
            Ok(())
        } else {
            Err(Error::Precondition(what))
        }
    }

    pub fn uploads(&self) -> Vec<(BufferId, Vec<f32>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Upload(id, data) => Some((*id, data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Draw { .. }))
            .count()
    }

    pub fn last_viewport(&self) -> Option<Viewport> {
        self.calls.iter().rev().find_map(|call| match *call {
            Call::Viewport(viewport) => Some(viewport),
            _ => None,
        })
    }

    /// Compiled shader stages that have not been deleted yet.
    pub fn live_shaders(&self) -> usize {
        let compiled: HashSet<_> = self
            .calls
            .iter()
            .filter_map(|call| match *call {
                Call::CompileShader(_, id, _) => Some(id),
                _ => None,
            })
            .collect();
        let deleted: HashSet<_> = self
            .calls
            .iter()
            .filter_map(|call| match *call {
                Call::DeleteShader(id) => Some(id),
                _ => None,
            })
            .collect();
        compiled.difference(&deleted).count()
    }
}

impl GraphicsApi for RecordingGraphics {
    fn is_context_current(&self) -> bool {
        self.current
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(Call::Viewport(viewport));
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear_color_buffer(&mut self) {
        self.record(Call::Clear);
    }

    fn create_buffer(&mut self) -> Result<BufferId, Error> {
        self.require_context("buffer creation")?;
        let id = BufferId(self.name());
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn upload_static(&mut self, buffer: BufferId, data: &[f32]) {
        self.record(Call::Upload(buffer, data.to_vec()));
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, Error> {
        self.require_context("vertex array creation")?;
        let id = VertexArrayId(self.name());
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayId) {
        self.record(Call::BindVertexArray(vao));
    }

    fn vertex_attrib(&mut self, slot: u32, buffer: BufferId, layout: AttribLayout) {
        self.record(Call::VertexAttrib(slot, buffer, layout));
    }

    fn enable_attrib(&mut self, slot: u32) {
        self.record(Call::EnableAttrib(slot));
    }

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        _source: &str,
        checked: bool,
    ) -> Result<ShaderId, Error> {
        self.require_context("shader compilation")?;
        if checked && self.broken_stage == Some(stage) {
            return Err(Error::ShaderCompile {
                stage,
                log: Some("0:1(1): error: syntax error".to_string()),
            });
        }
        let id = ShaderId(self.name());
        self.record(Call::CompileShader(stage, id, checked));
        Ok(id)
    }

    fn link_program(&mut self, shaders: &[ShaderId], checked: bool) -> Result<ProgramId, Error> {
        self.require_context("program linking")?;
        if checked && self.broken_link {
            return Err(Error::ProgramLink { log: None });
        }
        let id = ProgramId(self.name());
        self.record(Call::LinkProgram(shaders.to_vec(), id, checked));
        Ok(id)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.record(Call::DeleteShader(shader));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.record(Call::UseProgram(program));
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        self.record(Call::Draw { first, count });
    }
}

/// Something that happens to a [`ScriptedSurface`] during one poll.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scripted {
    Press(VirtualKeyCode),
    Release(VirtualKeyCode),
    Resize(u32, u32),
    Close,
}

/// A window that replays one batch of scripted input per poll.
#[derive(Debug)]
pub struct ScriptedSurface {
    pub swaps: usize,
    pub polls: usize,
    size: (u32, u32),
    should_close: bool,
    keys: HashSet<VirtualKeyCode>,
    script: VecDeque<Vec<Scripted>>,
}

impl ScriptedSurface {
    pub fn new(size: (u32, u32), script: Vec<Vec<Scripted>>) -> Self {
        ScriptedSurface {
            swaps: 0,
            polls: 0,
            size,
            should_close: false,
            keys: HashSet::new(),
            script: script.into(),
        }
    }
}

impl Surface for ScriptedSurface {
    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys.contains(&key)
    }

    fn swap_buffers(&mut self) -> Result<(), Error> {
        self.swaps += 1;
        assert!(self.swaps < 10_000, "frame loop never stopped");
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.polls += 1;
        let mut events = Vec::new();
        for input in self.script.pop_front().unwrap_or_default() {
            match input {
                Scripted::Press(key) => {
                    self.keys.insert(key);
                }
                Scripted::Release(key) => {
                    self.keys.remove(&key);
                }
                Scripted::Resize(width, height) => {
                    self.size = (width, height);
                    events.push(SurfaceEvent::FramebufferResized { width, height });
                }
                Scripted::Close => events.push(SurfaceEvent::CloseRequested),
            }
        }
        events
    }
}
