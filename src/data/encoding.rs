//! # Coordinate encodings
//!
//! Which normal disc types (or angles) a vector of coordinates holds, and the class of linear
//! system that the tree traversal solves for each of them.

/// Describes what the coordinates of a surface or angle structure vector count.
///
/// Quadrilaterals are always stored. Triangles and octagons are optional, angle structures are
/// a separate kind of encoding altogether.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NormalEncoding {
    stores_triangles: bool,
    stores_octagons: bool,
    stores_angles: bool,
}

impl NormalEncoding {
    /// Standard normal coordinates: triangles and quadrilaterals.
    pub const STANDARD: Self = NormalEncoding::new(true, false, false);
    /// Quadrilateral coordinates.
    pub const QUAD: Self = NormalEncoding::new(false, false, false);
    /// Standard almost normal coordinates: triangles, quadrilaterals and octagons.
    pub const AN_STANDARD: Self = NormalEncoding::new(true, true, false);
    /// Quadrilateral-octagon coordinates.
    pub const QUAD_OCT: Self = NormalEncoding::new(false, true, false);
    /// Angle structure coordinates, with a final scaling coordinate.
    pub const ANGLE: Self = NormalEncoding::new(false, false, true);

    /// Create a new encoding.
    ///
    /// # Arguments
    ///
    /// * `stores_triangles`: Whether triangle coordinates are present.
    /// * `stores_octagons`: Whether octagon coordinates are present.
    /// * `stores_angles`: Whether this describes angle structures instead of surfaces. If so, the
    /// other two flags should be false.
    pub const fn new(stores_triangles: bool, stores_octagons: bool, stores_angles: bool) -> Self {
        NormalEncoding { stores_triangles, stores_octagons, stores_angles }
    }

    /// Whether triangle coordinates are present.
    pub fn stores_triangles(&self) -> bool {
        self.stores_triangles
    }

    /// Whether octagon coordinates are present.
    pub fn stores_octagons(&self) -> bool {
        self.stores_octagons
    }

    /// Whether this encoding describes angle structures.
    pub fn stores_angles(&self) -> bool {
        self.stores_angles
    }
}

/// The class of matching equations used by a tableau.
///
/// Octagons never get columns of their own: they are represented as the sum of two quadrilateral
/// columns. As such, almost normal encodings share the linear system of their normal
/// counterparts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LPSystem {
    /// Standard matching equations, seven coordinates per tetrahedron.
    Standard,
    /// Quadrilateral matching equations, three coordinates per tetrahedron.
    Quad,
    /// Angle equations, three coordinates per tetrahedron and one scaling coordinate.
    Angle,
}

impl LPSystem {
    /// Determine the system class for an encoding.
    pub fn new(encoding: NormalEncoding) -> Self {
        if encoding.stores_angles() {
            LPSystem::Angle
        } else if encoding.stores_triangles() {
            LPSystem::Standard
        } else {
            LPSystem::Quad
        }
    }

    /// Whether this system describes normal or almost normal surfaces.
    pub fn is_normal(self) -> bool {
        self != LPSystem::Angle
    }

    /// Whether this system describes angle structures.
    pub fn is_angle(self) -> bool {
        self == LPSystem::Angle
    }

    /// Whether this is the standard matching equation system.
    pub fn is_standard(self) -> bool {
        self == LPSystem::Standard
    }

    /// Whether this is the quadrilateral matching equation system.
    pub fn is_quad(self) -> bool {
        self == LPSystem::Quad
    }

    /// Number of coordinate columns for a triangulation of `size` tetrahedra.
    ///
    /// This excludes any columns added by linear constraints.
    pub fn coords(self, size: usize) -> usize {
        match self {
            LPSystem::Standard => 7 * size,
            LPSystem::Quad => 3 * size,
            LPSystem::Angle => 3 * size + 1,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::encoding::{LPSystem, NormalEncoding};

    #[test]
    fn system_from_encoding() {
        assert_eq!(LPSystem::new(NormalEncoding::STANDARD), LPSystem::Standard);
        assert_eq!(LPSystem::new(NormalEncoding::AN_STANDARD), LPSystem::Standard);
        assert_eq!(LPSystem::new(NormalEncoding::QUAD), LPSystem::Quad);
        assert_eq!(LPSystem::new(NormalEncoding::QUAD_OCT), LPSystem::Quad);
        assert_eq!(LPSystem::new(NormalEncoding::ANGLE), LPSystem::Angle);
    }

    #[test]
    fn coords() {
        assert_eq!(LPSystem::Standard.coords(2), 14);
        assert_eq!(LPSystem::Quad.coords(2), 6);
        assert_eq!(LPSystem::Angle.coords(2), 7);
        assert!(LPSystem::Quad.is_normal());
        assert!(!LPSystem::Angle.is_normal());
    }
}
