//! # Triangulations
//!
//! The tableaux don't depend on a particular representation of a triangulation. They only need
//! the matching equations for a coordinate system, and for some of the constraints a few facts
//! about the skeleton. The `Triangulation` trait collects those queries.
use crate::data::encoding::LPSystem;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::error::LPError;

pub use self::perm::Perm4;

pub mod glued;
pub mod perm;

/// Position of an edge inside one of the tetrahedra that contain it.
///
/// The edge runs from vertex `vertices.apply(0)` to vertex `vertices.apply(1)` of tetrahedron
/// `tetrahedron`. Walking around the edge, the next tetrahedron is found through face
/// `vertices.apply(2)`, the previous one through face `vertices.apply(3)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EdgeEmbedding {
    /// Index of the tetrahedron.
    pub tetrahedron: usize,
    /// Maps the vertices of a reference edge onto the vertices of the tetrahedron.
    pub vertices: Perm4,
}

/// A 3-manifold triangulation, as far as linear programming over its normal surfaces and angle
/// structures is concerned.
///
/// Coordinates are always numbered per tetrahedron. In standard coordinates column `7t + v` is
/// the triangle about vertex `v` of tetrahedron `t` and column `7t + 4 + q` is its quad of type
/// `q`. In quad coordinates column `3t + q` is that same quad. In angle coordinates column
/// `3t + q` is the angle at the two opposite edges that quad `q` separates, and column `3n` is the
/// scaling coordinate.
///
/// A tableau may be read by search threads concurrently, so implementations must be `Sync`.
pub trait Triangulation: Sync {
    /// Number of tetrahedra.
    fn size(&self) -> usize;

    /// Matching equations of the given system, one equation per row, in the native column order.
    ///
    /// For the angle system, every row has a non zero coefficient in the scaling column.
    fn matching_equations(&self, system: LPSystem) -> Result<DenseMatrix, LPError>;

    /// Contribution of each standard coordinate to the Euler characteristic of a surface.
    ///
    /// # Return value
    ///
    /// A vector of length `7 * size()`.
    fn euler_coefficients(&self) -> Vec<i64>;

    /// Number of vertex classes.
    fn nr_vertices(&self) -> usize;

    /// Class of vertex `vertex` of tetrahedron `tetrahedron`.
    fn vertex_index(&self, tetrahedron: usize, vertex: usize) -> usize;

    /// Euler characteristic of the link of a vertex class.
    fn vertex_link_euler_char(&self, vertex: usize) -> i64;

    /// Whether a vertex class lies on the boundary of the triangulation.
    fn vertex_on_boundary(&self, vertex: usize) -> bool;

    /// Whether the link of a vertex class is a torus.
    fn vertex_link_is_torus(&self, vertex: usize) -> bool {
        !self.vertex_on_boundary(vertex) && self.vertex_link_euler_char(vertex) == 0 && self.is_orientable()
    }

    /// Whether the triangulation is orientable.
    fn is_orientable(&self) -> bool;

    /// Number of edge classes.
    fn nr_edges(&self) -> usize;

    /// All positions of an edge class inside the tetrahedra, in order around the edge.
    fn edge_embeddings(&self, edge: usize) -> Vec<EdgeEmbedding>;

    /// Whether face `face` of tetrahedron `tetrahedron` is not glued to any other face.
    fn face_is_boundary(&self, tetrahedron: usize, face: usize) -> bool;

    /// Whether face `face` of tetrahedron `tetrahedron` lies in a boundary component that is a
    /// torus.
    fn face_is_torus_boundary(&self, tetrahedron: usize, face: usize) -> bool;

    /// Whether a vertex class lies in a boundary component that is a torus.
    fn vertex_on_torus_boundary(&self, vertex: usize) -> bool;

    /// Slope equations of the single cusp.
    ///
    /// # Return value
    ///
    /// A matrix with two rows and `3 * size()` columns, expressing the meridian and the longitude
    /// of a spun normal surface as a linear function of its quad coordinates.
    fn slope_equations(&self) -> Result<DenseMatrix, LPError> {
        Err(LPError::invalid_argument("slope equations are not available for this triangulation"))
    }
}
