//! # Permutations of four elements
//!
//! Used to describe how the faces of tetrahedra are glued together, and how an edge sits inside
//! a tetrahedron.
use std::fmt::{Display, Formatter};
use std::fmt;
use std::ops::Mul;

use crate::error::LPError;

/// Vertex pairs of the six edges of a tetrahedron, in edge number order.
pub const EDGE_VERTICES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Number of the edge of a tetrahedron between two distinct vertices.
pub fn edge_number(a: usize, b: usize) -> usize {
    debug_assert!(a != b && a < 4 && b < 4);

    let (low, high) = if a < b { (a, b) } else { (b, a) };
    match (low, high) {
        (0, 1) => 0,
        (0, 2) => 1,
        (0, 3) => 2,
        (1, 2) => 3,
        (1, 3) => 4,
        _ => 5,
    }
}

/// Type of the quadrilateral that separates two distinct vertices of a tetrahedron from the other
/// two.
///
/// Quad 0 separates {0, 1} from {2, 3}, quad 1 separates {0, 2} from {1, 3} and quad 2
/// separates {0, 3} from {1, 2}.
pub fn quad_separating(a: usize, b: usize) -> usize {
    debug_assert!(a != b && a < 4 && b < 4);

    match edge_number(a, b) {
        0 | 5 => 0,
        1 | 4 => 1,
        _ => 2,
    }
}

/// The two quadrilateral types whose sum represents an octagon of type `octagon`.
pub fn octagon_quads(octagon: usize) -> [usize; 2] {
    debug_assert!(octagon < 3);

    [(octagon + 1) % 3, (octagon + 2) % 3]
}

/// A permutation of {0, 1, 2, 3}, stored by its images.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Perm4 {
    images: [u8; 4],
}

impl Perm4 {
    /// The identity permutation.
    pub const IDENTITY: Self = Perm4 { images: [0, 1, 2, 3] };

    /// Maps 0 and 1 to the end points of edge `edge`, and 2 and 3 to the remaining two vertices,
    /// each pair in increasing order.
    pub fn edge_ordering(edge: usize) -> Self {
        const ORDERINGS: [[u8; 4]; 6] = [
            [0, 1, 2, 3],
            [0, 2, 1, 3],
            [0, 3, 1, 2],
            [1, 2, 0, 3],
            [1, 3, 0, 2],
            [2, 3, 0, 1],
        ];
        debug_assert!(edge < 6);

        Perm4 { images: ORDERINGS[edge] }
    }

    /// Create a permutation from the images of 0, 1, 2 and 3.
    ///
    /// # Return value
    ///
    /// `InvalidArgument` if the images are not a permutation.
    pub fn new(images: [usize; 4]) -> Result<Self, LPError> {
        let mut seen = [false; 4];
        for &image in &images {
            if image >= 4 || seen[image] {
                return Err(LPError::invalid_argument(format!("{:?} is not a permutation of 0..4", images)));
            }
            seen[image] = true;
        }

        Ok(Perm4 { images: [images[0] as u8, images[1] as u8, images[2] as u8, images[3] as u8] })
    }

    /// Image of `i`.
    pub fn apply(&self, i: usize) -> usize {
        self.images[i] as usize
    }

    /// The inverse permutation.
    pub fn inverse(&self) -> Self {
        let mut images = [0; 4];
        for i in 0..4 {
            images[self.images[i] as usize] = i as u8;
        }
        Perm4 { images }
    }

    /// Sign of the permutation, `1` for even and `-1` for odd permutations.
    pub fn sign(&self) -> i32 {
        let mut sign = 1;
        for i in 0..4 {
            for j in (i + 1)..4 {
                if self.images[i] > self.images[j] {
                    sign = -sign;
                }
            }
        }
        sign
    }

    /// Permutation that swaps the images of `i` and `j`.
    pub fn swap_images(&self, i: usize, j: usize) -> Self {
        let mut images = self.images;
        images.swap(i, j);
        Perm4 { images }
    }
}

impl Mul for Perm4 {
    type Output = Perm4;

    /// Composition, `(self * rhs).apply(i) == self.apply(rhs.apply(i))`.
    fn mul(self, rhs: Perm4) -> Self::Output {
        let mut images = [0; 4];
        for i in 0..4 {
            images[i] = self.images[rhs.images[i] as usize];
        }
        Perm4 { images }
    }
}

impl Display for Perm4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.images[0], self.images[1], self.images[2], self.images[3])
    }
}

#[cfg(test)]
mod test {
    use crate::data::triangulation::perm::{edge_number, octagon_quads, Perm4, quad_separating};

    #[test]
    fn inverse_and_compose() {
        let p = Perm4::new([1, 3, 0, 2]).unwrap();
        assert_eq!(p * p.inverse(), Perm4::IDENTITY);
        assert_eq!(p.inverse() * p, Perm4::IDENTITY);
        assert_eq!((p * p).apply(0), 3);
        assert_eq!(p.to_string(), "1302");
    }

    #[test]
    fn edge_ordering() {
        for edge in 0..6 {
            let p = Perm4::edge_ordering(edge);
            assert_eq!(edge_number(p.apply(0), p.apply(1)), edge);
            assert!(p.apply(2) < p.apply(3));
        }
    }

    #[test]
    fn sign() {
        assert_eq!(Perm4::IDENTITY.sign(), 1);
        assert_eq!(Perm4::new([1, 0, 2, 3]).unwrap().sign(), -1);
        assert_eq!(Perm4::new([1, 2, 3, 0]).unwrap().sign(), -1);
        assert_eq!(Perm4::new([1, 0, 3, 2]).unwrap().sign(), 1);
    }

    #[test]
    fn not_a_permutation() {
        assert!(Perm4::new([0, 0, 1, 2]).is_err());
        assert!(Perm4::new([0, 1, 2, 4]).is_err());
    }

    #[test]
    fn disc_numbering() {
        assert_eq!(edge_number(3, 1), 4);
        assert_eq!(quad_separating(0, 1), 0);
        assert_eq!(quad_separating(2, 3), 0);
        assert_eq!(quad_separating(3, 1), 1);
        assert_eq!(quad_separating(0, 3), 2);
        assert_eq!(octagon_quads(0), [1, 2]);
        assert_eq!(octagon_quads(2), [0, 1]);
    }
}
