use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CString;

use gl::types::GLuint;
use thiserror::Error;

use crate::read_info_log;
use crate::shader::ShaderUnit;

/// Assembles a vertex and fragment unit into one linked pipeline.
pub struct ProgramBuilder {
    vert: ShaderUnit,
    frag: ShaderUnit,
    frag_outputs: Vec<(String, u32)>,
}

impl ProgramBuilder {
    pub fn new(vert: ShaderUnit, frag: ShaderUnit) -> Self {
        Self {
            vert,
            frag,
            frag_outputs: Vec::new(),
        }
    }

    /// Binds a fragment shader output variable to a numbered color slot.
    ///
    /// The driver ignores bindings applied after linking, so these are
    /// collected here and applied inside [`build`](Self::build).
    pub fn with_frag_output(mut self, name: &str, slot: u32) -> Self {
        self.frag_outputs.push((name.to_owned(), slot));
        self
    }

    pub fn build(self) -> Result<Program, LinkError> {
        let mut success = 0;

        unsafe {
            let id = gl::CreateProgram();

            gl::AttachShader(id, self.vert.id());
            gl::AttachShader(id, self.frag.id());

            for (name, slot) in &self.frag_outputs {
                let name = CString::new(name.as_str()).unwrap();
                gl::BindFragDataLocation(id, *slot, name.as_ptr());
            }

            gl::LinkProgram(id);

            gl::GetProgramiv(id, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                let log = read_info_log(id, gl::GetProgramInfoLog);
                gl::DeleteProgram(id);
                return Err(LinkError::LinkFailed(log));
            }

            gl::DetachShader(id, self.vert.id());
            gl::DetachShader(id, self.frag.id());

            Ok(Program {
                id,
                attributes: RefCell::new(HashMap::new()),
                uniforms: RefCell::new(HashMap::new()),
            })
        }
        // the two units drop here, deleting the now detached shader objects
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("program link failed: {0}")]
    LinkFailed(String),
}

/// A linked shader program with a lazily populated name-to-slot registry.
pub struct Program {
    id: GLuint,
    attributes: RefCell<HashMap<String, i32>>,
    uniforms: RefCell<HashMap<String, i32>>,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// Slot of a named vertex attribute, `None` when the linked program has
    /// no such input. Repeated lookups return the cached slot.
    pub fn attribute_slot(&self, name: &str) -> Option<u32> {
        let slot = self.cached(&self.attributes, name, |id, name| unsafe {
            gl::GetAttribLocation(id, name.as_ptr())
        });

        (slot >= 0).then(|| slot as u32)
    }

    /// Slot of a named uniform, `None` when the linked program has no such
    /// uniform. Repeated lookups return the cached slot.
    pub fn uniform_slot(&self, name: &str) -> Option<i32> {
        let slot = self.cached(&self.uniforms, name, |id, name| unsafe {
            gl::GetUniformLocation(id, name.as_ptr())
        });

        (slot >= 0).then_some(slot)
    }

    fn cached(
        &self,
        registry: &RefCell<HashMap<String, i32>>,
        name: &str,
        resolve: fn(GLuint, &CString) -> i32,
    ) -> i32 {
        if let Some(slot) = registry.borrow().get(name) {
            return *slot;
        }

        let c_name = CString::new(name).unwrap();
        let slot = resolve(self.id, &c_name);

        registry.borrow_mut().insert(name.to_owned(), slot);

        slot
    }

    /// Uploads a 4x4 matrix in column-major order.
    ///
    /// The program must be current.
    pub fn set_mat4(&self, slot: i32, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(slot, 1, gl::FALSE, value.as_ptr()) }
    }

    /// The program must be current.
    pub fn set_f32(&self, slot: i32, value: f32) {
        unsafe { gl::Uniform1f(slot, value) }
    }

    /// The program must be current.
    pub fn set_i32(&self, slot: i32, value: i32) {
        unsafe { gl::Uniform1i(slot, value) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
