use std::ffi::{c_char, CString};
use std::fs;
use std::path::{Path, PathBuf};

use gl::types::GLuint;
use thiserror::Error;

use crate::read_info_log;

/// Programmable pipeline stage a shader unit is compiled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// A successfully compiled shader object for one pipeline stage.
pub struct ShaderUnit {
    id: GLuint,
    stage: ShaderStage,
}

impl ShaderUnit {
    /// Reads the whole source file and compiles it for the given stage.
    ///
    /// A read failure never reaches the driver. A rejected source returns
    /// the half-created handle inside the error so its diagnostic log can
    /// still be queried.
    pub fn compile(path: impl AsRef<Path>, stage: ShaderStage) -> Result<Self, CompileError> {
        let path = path.as_ref();

        let source =
            fs::read_to_string(path).map_err(|source| CompileError::SourceUnreadable {
                path: path.to_owned(),
                source,
            })?;

        Self::from_source(&source, stage).map_err(|shader| CompileError::CompilationFailed {
            path: path.to_owned(),
            shader,
        })
    }

    /// Compiles in-memory source text for the given stage.
    pub fn from_source(source: &str, stage: ShaderStage) -> Result<Self, OrphanShader> {
        let source = CString::new(source).unwrap();
        let mut success = 0;

        unsafe {
            let id = gl::CreateShader(stage.gl_kind());

            gl::ShaderSource(
                id,
                1,
                (&source.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );
            gl::CompileShader(id);

            gl::GetShaderiv(id, gl::COMPILE_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                return Err(OrphanShader { id });
            }

            Ok(Self { id, stage })
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub(crate) fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for ShaderUnit {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

/// Handle to a shader object the driver refused to compile.
///
/// Kept only so the diagnostic log stays retrievable; the GL object is
/// deleted on drop like any other unit.
#[derive(Debug)]
pub struct OrphanShader {
    id: GLuint,
}

impl OrphanShader {
    /// Driver diagnostic for the failed compile, truncated to
    /// [`INFO_LOG_CAP`](crate::INFO_LOG_CAP) bytes.
    pub fn info_log(&self) -> String {
        unsafe { read_info_log(self.id, gl::GetShaderInfoLog) }
    }
}

impl Drop for OrphanShader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    /// The source file could not be read; no GL object was created.
    #[error("cannot read shader source {path:?}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The driver rejected the source; `shader` still yields the log.
    #[error("shader {path:?} failed to compile")]
    CompilationFailed { path: PathBuf, shader: OrphanShader },
}
