use std::ffi::c_void;
use std::mem::size_of;

use log::{debug, warn};
use thiserror::Error;

use crate::program::Program;

/// One named attribute within an interleaved vertex buffer.
pub struct AttributeBinding {
    name: String,
    components: usize,
    offset: usize,
}

impl AttributeBinding {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Float components consumed per vertex.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Byte offset from the start of a vertex.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Describes how one interleaved float buffer maps onto named shader inputs.
///
/// Offsets accumulate in declaration order, so they are monotonic,
/// non-overlapping, and always within the computed stride.
pub struct VertexLayout {
    bindings: Vec<AttributeBinding>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn with(mut self, name: &str, components: usize) -> Self {
        let offset = self.stride_bytes();

        self.bindings.push(AttributeBinding {
            name: name.to_owned(),
            components,
            offset,
        });

        self
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.bindings.iter().map(|b| b.components).sum()
    }

    pub fn stride_bytes(&self) -> usize {
        self.floats_per_vertex() * size_of::<f32>()
    }

    pub fn bindings(&self) -> &[AttributeBinding] {
        &self.bindings
    }
}

/// Builds a vertex array from one interleaved buffer, an optional index
/// buffer, and a layout resolved by name against a linked program.
pub struct GeometryBuilder<'a> {
    data: &'a [f32],
    indices: Option<&'a [u32]>,
    layout: VertexLayout,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            indices: None,
            layout: VertexLayout::new(),
        }
    }

    pub fn layout(mut self, layout: VertexLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Uploads the buffers and wires every named attribute to its slot in
    /// `program`. Attributes absent from the linked program are skipped.
    ///
    /// Rebuilding with the same layout overwrites the identical vertex
    /// array state; nothing accumulates.
    pub fn build(self, program: &Program) -> Result<Geometry, GeometryError> {
        let per_vertex = self.layout.floats_per_vertex();

        if per_vertex == 0 || self.data.len() % per_vertex != 0 {
            return Err(GeometryError::InvalidDataLength);
        }

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.data.len() * size_of::<f32>()) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            if let Some(indices) = self.indices {
                gl::GenBuffers(1, (&mut ebo) as *mut u32);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);

                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    (indices.len() * size_of::<u32>()) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
            }

            let stride = self.layout.stride_bytes();

            for binding in self.layout.bindings() {
                let slot = match program.attribute_slot(binding.name()) {
                    Some(slot) => slot,
                    None => {
                        warn!(
                            "attribute {:?} not present in linked program, skipping",
                            binding.name()
                        );
                        continue;
                    }
                };

                gl::VertexAttribPointer(
                    slot,
                    binding.components() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    stride as i32,
                    binding.offset() as *const c_void,
                );
                gl::EnableVertexAttribArray(slot);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        let vertices = self.data.len() / per_vertex;

        debug!("uploaded vertex buffer {vbo} ({vertices} vertices)");

        Ok(Geometry {
            vao,
            vbo,
            ebo: (ebo != 0).then_some(ebo),
            vertices,
            index_count: self.indices.map(|i| i.len()),
        })
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid data length for given layout")]
    InvalidDataLength,
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    index_count: Option<usize>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// `Some` when the geometry draws through an index buffer.
    pub fn index_count(&self) -> Option<usize> {
        self.index_count
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, (&ebo) as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_accumulates_offsets() {
        let layout = VertexLayout::new()
            .with("position", 2)
            .with("color", 3)
            .with("texcoord", 2);

        assert_eq!(layout.floats_per_vertex(), 7);
        assert_eq!(layout.stride_bytes(), 28);

        let offsets: Vec<usize> = layout.bindings().iter().map(|b| b.offset()).collect();
        assert_eq!(offsets, vec![0, 8, 20]);
    }

    #[test]
    fn layout_bindings_stay_within_stride() {
        let layout = VertexLayout::new()
            .with("position", 2)
            .with("color", 3)
            .with("texcoord", 2);

        let stride = layout.stride_bytes();
        let mut previous_end = 0;

        for binding in layout.bindings() {
            assert!(binding.offset() >= previous_end);
            previous_end = binding.offset() + binding.components() * size_of::<f32>();
            assert!(previous_end <= stride);
        }
    }

    #[test]
    fn empty_layout_consumes_nothing() {
        let layout = VertexLayout::new();

        assert_eq!(layout.floats_per_vertex(), 0);
        assert_eq!(layout.stride_bytes(), 0);
    }
}
