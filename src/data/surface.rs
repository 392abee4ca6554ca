//! # Solutions
//!
//! Normal surfaces and angle structures as read back from a tableau, with the few derived
//! quantities that the linear constraints verify.
use num_bigint::BigInt;
use num_traits::Zero;

use crate::data::encoding::NormalEncoding;
use crate::data::number_types::traits::IntType;
use crate::data::triangulation::perm::octagon_quads;
use crate::data::triangulation::Triangulation;
use crate::error::LPError;

/// The single octagonal disc type of an almost normal surface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Octagon {
    /// Tetrahedron that contains the octagons.
    pub tetrahedron: usize,
    /// Octagon type, which is the sum of the quads given by `octagon_quads(kind)`.
    pub kind: usize,
    /// Number of octagons.
    pub count: BigInt,
}

/// A normal or almost normal surface, by its disc counts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalSurface {
    encoding: NormalEncoding,
    /// Seven coordinates per tetrahedron if triangles are stored, three otherwise.
    coordinates: Vec<BigInt>,
    octagon: Option<Octagon>,
}

impl NormalSurface {
    /// Create a new surface.
    ///
    /// # Arguments
    ///
    /// * `encoding`: Normal or almost normal encoding.
    /// * `coordinates`: Triangle and quad counts in standard coordinate order, or only quad counts
    /// if the encoding doesn't store triangles.
    /// * `octagon`: Octagon type, only allowed if the encoding stores octagons.
    pub fn new(
        encoding: NormalEncoding,
        coordinates: Vec<BigInt>,
        octagon: Option<Octagon>,
    ) -> Result<Self, LPError> {
        if encoding.stores_angles() {
            return Err(LPError::invalid_argument("an angle structure encoding doesn't describe a surface"));
        }
        let per_tetrahedron = if encoding.stores_triangles() { 7 } else { 3 };
        if coordinates.len() % per_tetrahedron != 0 {
            return Err(LPError::invalid_argument(format!(
                "{} coordinates is not a multiple of {}", coordinates.len(), per_tetrahedron,
            )));
        }
        if let Some(octagon) = &octagon {
            if !encoding.stores_octagons() {
                return Err(LPError::invalid_argument("octagons are not stored in this encoding"));
            }
            if octagon.kind >= 3 || octagon.tetrahedron >= coordinates.len() / per_tetrahedron {
                return Err(LPError::invalid_argument(format!(
                    "no octagon of type {} in tetrahedron {}", octagon.kind, octagon.tetrahedron,
                )));
            }
        }

        Ok(NormalSurface { encoding, coordinates, octagon })
    }

    /// Create a surface from integer values of any type.
    pub fn from_values<I: IntType>(
        encoding: NormalEncoding,
        values: &[I],
        octagon: Option<Octagon>,
    ) -> Result<Self, LPError> {
        Self::new(encoding, values.iter().map(IntType::to_big_int).collect(), octagon)
    }

    /// Encoding of the coordinates.
    pub fn encoding(&self) -> NormalEncoding {
        self.encoding
    }

    /// Number of tetrahedra of the underlying triangulation.
    pub fn size(&self) -> usize {
        self.coordinates.len() / self.per_tetrahedron()
    }

    /// All coordinates in their native order.
    pub fn coordinates(&self) -> &[BigInt] {
        &self.coordinates
    }

    /// The octagon type, if there is one.
    pub fn octagon(&self) -> Option<&Octagon> {
        self.octagon.as_ref()
    }

    /// Number of triangles about vertex `vertex` of tetrahedron `tetrahedron`.
    ///
    /// # Return value
    ///
    /// `None` if triangles are not stored.
    pub fn triangles(&self, tetrahedron: usize, vertex: usize) -> Option<&BigInt> {
        if self.encoding.stores_triangles() {
            Some(&self.coordinates[7 * tetrahedron + vertex])
        } else {
            None
        }
    }

    /// Number of quads of type `quad` in tetrahedron `tetrahedron`.
    pub fn quads(&self, tetrahedron: usize, quad: usize) -> &BigInt {
        if self.encoding.stores_triangles() {
            &self.coordinates[7 * tetrahedron + 4 + quad]
        } else {
            &self.coordinates[3 * tetrahedron + quad]
        }
    }

    /// Whether all disc counts are zero.
    pub fn is_empty(&self) -> bool {
        self.coordinates.iter().all(Zero::is_zero)
            && self.octagon.as_ref().is_none_or(|octagon| octagon.count.is_zero())
    }

    /// Euler characteristic of the surface.
    ///
    /// # Return value
    ///
    /// `None` if triangles are not stored, such that the characteristic can't be computed.
    pub fn euler_char(&self, tri: &dyn Triangulation) -> Option<BigInt> {
        if !self.encoding.stores_triangles() {
            return None;
        }
        let coefficients = tri.euler_coefficients();
        debug_assert_eq!(coefficients.len(), self.coordinates.len());

        let mut euler_char = BigInt::zero();
        for (coefficient, value) in coefficients.iter().zip(&self.coordinates) {
            euler_char += value * *coefficient;
        }
        if let Some(Octagon { tetrahedron, kind, count }) = &self.octagon {
            let [first, second] = octagon_quads(*kind);
            let coefficient = coefficients[7 * tetrahedron + 4 + first]
                + coefficients[7 * tetrahedron + 4 + second]
                - 1;
            euler_char += count * coefficient;
        }

        Some(euler_char)
    }

    /// Evaluate a linear function of the quad coordinates.
    ///
    /// Octagons count towards both of the quads they are made of.
    ///
    /// # Arguments
    ///
    /// * `coefficients`: One coefficient per quad coordinate, `3 * size()` in total.
    pub fn evaluate_quads(&self, coefficients: &[i64]) -> BigInt {
        debug_assert_eq!(coefficients.len(), 3 * self.size());

        let mut total = BigInt::zero();
        for tetrahedron in 0..self.size() {
            for quad in 0..3 {
                total += self.quads(tetrahedron, quad) * coefficients[3 * tetrahedron + quad];
            }
        }
        if let Some(Octagon { tetrahedron, kind, count }) = &self.octagon {
            for quad in octagon_quads(*kind) {
                total += count * coefficients[3 * tetrahedron + quad];
            }
        }

        total
    }

    fn per_tetrahedron(&self) -> usize {
        if self.encoding.stores_triangles() { 7 } else { 3 }
    }
}

/// An angle structure, by the angles of each tetrahedron and a common scaling coordinate.
///
/// Angle `values[3t + q]` sits at the two edges of tetrahedron `t` that quad `q` separates. The
/// actual angle is `value / scaling * pi`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AngleStructure {
    values: Vec<BigInt>,
}

impl AngleStructure {
    /// Create a new angle structure.
    ///
    /// # Arguments
    ///
    /// * `values`: Three angles per tetrahedron, followed by the scaling coordinate.
    pub fn new(values: Vec<BigInt>) -> Result<Self, LPError> {
        if values.len() % 3 != 1 {
            return Err(LPError::invalid_argument(format!(
                "{} is not a valid number of angle structure coordinates", values.len(),
            )));
        }

        Ok(AngleStructure { values })
    }

    /// Create an angle structure from integer values of any type.
    pub fn from_values<I: IntType>(values: &[I]) -> Result<Self, LPError> {
        Self::new(values.iter().map(IntType::to_big_int).collect())
    }

    /// Number of tetrahedra of the underlying triangulation.
    pub fn size(&self) -> usize {
        self.values.len() / 3
    }

    /// The unscaled angle at the edges separated by quad `quad` in tetrahedron `tetrahedron`.
    pub fn angle(&self, tetrahedron: usize, quad: usize) -> &BigInt {
        &self.values[3 * tetrahedron + quad]
    }

    /// The scaling coordinate, which corresponds to an angle of pi.
    pub fn scaling(&self) -> &BigInt {
        &self.values[self.values.len() - 1]
    }

    /// Whether every angle is strictly between zero and pi.
    pub fn is_strict(&self) -> bool {
        let scaling = self.scaling();
        self.values[..self.values.len() - 1].iter()
            .all(|value| value.is_positive() && value < scaling)
    }

    /// Whether every angle is either zero or pi.
    pub fn is_taut(&self) -> bool {
        let scaling = self.scaling();
        self.values[..self.values.len() - 1].iter()
            .all(|value| value.is_zero() || value == scaling)
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use crate::data::encoding::NormalEncoding;
    use crate::data::surface::{AngleStructure, NormalSurface, Octagon};
    use crate::tests::one_vertex_sphere;

    #[test]
    fn euler_char() {
        let tri = one_vertex_sphere();
        let link = NormalSurface::from_values(NormalEncoding::STANDARD, &[1_i64, 1, 1, 1, 0, 0, 0], None).unwrap();
        assert_eq!(link.euler_char(&tri), Some(BigInt::from(2)));

        let quads = NormalSurface::from_values(NormalEncoding::QUAD, &[1_i64, 0, 0], None).unwrap();
        assert_eq!(quads.euler_char(&tri), None);
    }

    #[test]
    fn octagon_euler_char() {
        let tri = one_vertex_sphere();
        let octagon = Octagon { tetrahedron: 0, kind: 2, count: BigInt::from(1) };
        let surface = NormalSurface::from_values(
            NormalEncoding::AN_STANDARD,
            &[1_i64, 1, 1, 1, 0, 0, 1],
            Some(octagon),
        ).unwrap();
        // Triangles and quad sum to three, the octagon adds the quads it is made of minus one.
        assert_eq!(surface.euler_char(&tri), Some(BigInt::from(2)));
        assert_eq!(surface.evaluate_quads(&[1, 1, 1]), BigInt::from(3));
    }

    #[test]
    fn invalid_surfaces() {
        assert!(NormalSurface::from_values(NormalEncoding::STANDARD, &[0_i64; 6], None).is_err());
        assert!(NormalSurface::from_values(NormalEncoding::ANGLE, &[0_i64; 7], None).is_err());
        let octagon = Octagon { tetrahedron: 0, kind: 0, count: BigInt::from(1) };
        assert!(NormalSurface::from_values(NormalEncoding::QUAD, &[0_i64; 3], Some(octagon)).is_err());
    }

    #[test]
    fn angle_structures() {
        let strict = AngleStructure::from_values(&[1_i64, 1, 1, 1, 1, 1, 3]).unwrap();
        assert!(strict.is_strict());
        assert!(!strict.is_taut());

        let taut = AngleStructure::from_values(&[1_i64, 0, 0, 1, 0, 0, 1]).unwrap();
        assert!(taut.is_taut());
        assert!(!taut.is_strict());
        assert_eq!(taut.scaling(), &BigInt::from(1));

        assert!(AngleStructure::from_values(&[1_i64, 1, 1]).is_err());
    }
}
