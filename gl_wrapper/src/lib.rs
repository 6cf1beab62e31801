use gl::types::{GLchar, GLsizei, GLuint};

pub mod geometry;
pub mod program;
pub mod renderer;
pub mod shader;
pub mod texture;

/// Upper bound on retrieved driver info logs, in bytes.
pub const INFO_LOG_CAP: usize = 512;

pub(crate) unsafe fn read_info_log(
    id: GLuint,
    getter: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut buf = [0_u8; INFO_LOG_CAP];
    let mut len: GLsizei = 0;

    getter(
        id,
        INFO_LOG_CAP as GLsizei,
        (&mut len) as *mut GLsizei,
        buf.as_mut_ptr() as *mut GLchar,
    );

    let len = (len.max(0) as usize).min(INFO_LOG_CAP);

    String::from_utf8_lossy(&buf[..len]).into_owned()
}
