//! Generated mesh container and parameter validation.

use crate::vertex::Vertex;

/// How the vertex sequence of a [`Mesh`] is assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Every three vertices form one triangle.
    Triangles,
    /// Consecutive vertices are joined by segments and the last joins the first.
    LineLoop,
}

/// An immutable vertex sequence produced by one of the generators.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    primitive: Primitive,
}

/// Rejected generator parameters.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    #[error("invalid {shape} parameter: {reason}")]
    InvalidParameter {
        shape: &'static str,
        reason: String,
    },
}

impl Mesh {
    pub(crate) fn new(vertices: Vec<Vertex>, primitive: Primitive) -> Self {
        Self {
            vertices,
            primitive,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Index list for uploading to a list topology.
    ///
    /// Triangles map to the identity sequence. A line loop becomes segment
    /// pairs `(0,1) (1,2) .. (n-1,0)` so it can be drawn as a line list.
    pub fn index_list(&self) -> Vec<u32> {
        let n = self.vertices.len() as u32;
        match self.primitive {
            Primitive::Triangles => (0..n).collect(),
            Primitive::LineLoop => (0..n).flat_map(|i| [i, (i + 1) % n]).collect(),
        }
    }
}

pub(crate) fn check_radius(shape: &'static str, name: &str, value: f32) -> Result<(), MeshError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MeshError::InvalidParameter {
            shape,
            reason: format!("{name} must be positive and finite, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_count(
    shape: &'static str,
    name: &str,
    value: u32,
    min: u32,
) -> Result<(), MeshError> {
    if value < min {
        return Err(MeshError::InvalidParameter {
            shape,
            reason: format!("{name} must be at least {min}, got {value}"),
        });
    }
    Ok(())
}
