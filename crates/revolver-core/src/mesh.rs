//! The output of every mesh builder in this crate, a quad surface mesh.

use crate::Vec3;

/// A quadrilateral face given as four indices into the vertex buffer.
///
/// Vertices are ordered so that consecutive indices share an edge.
pub type Face = [usize; 4];

/// A surface mesh made of quadrilaterals.
///
/// This is a plain pair of vertex and face buffers,
/// which is the shape external renderers and mesh file formats expect.
/// Vertices may contain NaN coordinates
/// if the mesh was revolved from a profile with gaps
/// (see [`GapPolicy`][crate::GapPolicy]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Faces indexing into `vertices`.
    pub faces: Vec<Face>,
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// The minimum corner of the box.
    pub min: Vec3,
    /// The maximum corner of the box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Size of the box along each axis.
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

impl QuadMesh {
    /// Construct a mesh from raw vertex and face buffers.
    ///
    /// # Panics
    ///
    /// If a face references a vertex that doesn't exist.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        if let Some(bad) = faces.iter().flatten().find(|&&i| i >= vertices.len()) {
            panic!(
                "face index {bad} out of bounds for {} vertices",
                vertices.len()
            );
        }
        Self { vertices, faces }
    }

    /// Get the number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over the corner positions of every face.
    pub fn face_vertices(&self) -> impl '_ + Iterator<Item = [Vec3; 4]> {
        self.faces
            .iter()
            .map(|face| face.map(|i| self.vertices[i]))
    }

    /// Number of vertices with at least one non-finite coordinate.
    pub fn non_finite_vertex_count(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| !v.iter().all(|c| c.is_finite()))
            .count()
    }

    /// Compute the bounding box of the finite vertices in the mesh.
    ///
    /// Returns `None` if there are no finite vertices.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut finite = self
            .vertices
            .iter()
            .filter(|v| v.iter().all(|c| c.is_finite()));
        let first = *finite.next()?;
        let (min, max) = finite.fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        });
        Some(BoundingBox { min, max })
    }
}
