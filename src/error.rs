use std::{error, fmt};

use crate::gfx::ShaderStage;

/// Everything that can make the demo give up. None of these are recoverable: the binary reports
/// them and exits with [`Error::exit_code`].
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The window, the GL context or the GL function pointers could not be set up.
    Init(InitError),
    /// A checked shader stage failed to compile.
    ///
    /// `log` holds the driver's info log when it provided one.
    ShaderCompile {
        stage: ShaderStage,
        log: Option<String>,
    },
    /// The program failed to link. Only reported when link validation is enabled.
    ProgramLink { log: Option<String> },
    /// A graphics call was attempted before a context was made current.
    Precondition(&'static str),
}

impl Error {
    /// Process exit code for this failure. A clean shutdown exits with 0.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::Init(_) => 1,
            Error::ShaderCompile { .. } => 2,
            Error::ProgramLink { .. } => 3,
            Error::Precondition(_) => 4,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Init(ref e) => write!(f, "initialization error: {}", e),
            Error::ShaderCompile { stage, log: Some(ref log) } => {
                write!(f, "{} shader couldn't compile: {}", stage, log)
            }
            Error::ShaderCompile { stage, log: None } => {
                write!(f, "{} shader couldn't compile", stage)
            }
            Error::ProgramLink { log: Some(ref log) } => {
                write!(f, "shader program couldn't link: {}", log)
            }
            Error::ProgramLink { log: None } => write!(f, "shader program couldn't link"),
            Error::Precondition(what) => {
                write!(f, "{} requires a current OpenGL context", what)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Init(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Error::Init(e)
    }
}

impl From<glutin::CreationError> for Error {
    fn from(e: glutin::CreationError) -> Self {
        Error::Init(InitError::Creation(e))
    }
}

impl From<glutin::ContextError> for Error {
    fn from(e: glutin::ContextError) -> Self {
        Error::Init(InitError::Context(e))
    }
}

/// Failures while bringing up the window and its OpenGL context.
#[non_exhaustive]
#[derive(Debug)]
pub enum InitError {
    /// The window or its context could not be created.
    Creation(glutin::CreationError),
    /// The context could not be made current, or presenting to it failed.
    Context(glutin::ContextError),
    /// A GL entry point the demo needs was not found by the loader.
    MissingFunction(&'static str),
    /// The driver handed out the null name for a new object.
    Allocation(&'static str),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InitError::Creation(ref e) => write!(f, "cannot create window: {}", e),
            InitError::Context(ref e) => write!(f, "context error: {}", e),
            InitError::MissingFunction(name) => write!(f, "OpenGL function {} is not loaded", name),
            InitError::Allocation(what) => write!(f, "cannot allocate {}", what),
        }
    }
}

impl error::Error for InitError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            InitError::Creation(e) => Some(e),
            InitError::Context(e) => Some(e),
            _ => None,
        }
    }
}
