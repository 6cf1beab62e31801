use crate::geometry::Geometry;
use crate::program::Program;

/// Issues draw calls, tracking the current program so repeated draws with
/// the same pipeline do not rebind it.
pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    /// Makes `program` current. Only one program is current at a time.
    pub fn use_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    /// One draw call; indexed when the geometry carries an index buffer,
    /// sequential otherwise.
    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        self.use_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());

            match geometry.index_count() {
                Some(count) => gl::DrawElements(
                    gl::TRIANGLES,
                    count as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                ),
                None => gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32),
            }
        }
    }
}
