//! # Triangulations shared by the tests inside the crate.
//!
//! Convention for function names: the name of the manifold, or a description of the
//! triangulation if it has no common name.
use crate::data::triangulation::glued::GluedTriangulation;
use crate::data::triangulation::Perm4;

fn glue(size: usize, gluings: &[(usize, usize, usize, [usize; 4])]) -> GluedTriangulation {
    let mut tri = GluedTriangulation::new(size);
    for &(tetrahedron, face, other, images) in gluings {
        tri.join(tetrahedron, face, other, Perm4::new(images).unwrap()).unwrap();
    }
    tri
}

/// The two tetrahedron ideal triangulation of the figure eight knot complement.
///
/// One ideal vertex with a torus link, and two edges of degree six.
pub fn figure_eight() -> GluedTriangulation {
    glue(2, &[
        (0, 0, 1, [1, 3, 0, 2]),
        (0, 1, 1, [2, 0, 3, 1]),
        (0, 2, 1, [0, 3, 2, 1]),
        (0, 3, 1, [2, 1, 0, 3]),
    ])
}

/// A closed orientable one tetrahedron triangulation with a single vertex, whose link is a sphere.
pub fn one_vertex_sphere() -> GluedTriangulation {
    glue(1, &[
        (0, 0, 0, [1, 2, 3, 0]),
        (0, 2, 0, [1, 2, 3, 0]),
    ])
}

/// The one tetrahedron layered solid torus, with two boundary faces that form a torus.
pub fn layered_solid_torus() -> GluedTriangulation {
    glue(1, &[(0, 0, 0, [1, 2, 3, 0])])
}

/// A single tetrahedron without any gluings.
pub fn lone_tetrahedron() -> GluedTriangulation {
    GluedTriangulation::new(1)
}
