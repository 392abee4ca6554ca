//! # Linear constraints
//!
//! Extra linear rows that are added to the matching equations, such as a condition on the Euler
//! characteristic. Each row comes with a slack column: the row reads `sum(c_i * x_i) - s = 0`,
//! after which the slack `s` is either fixed to zero or required to be at least one.
//!
//! The constraint is chosen once per search and fixed at compile time, such that the pivoting
//! code is specialized for it.
use std::fmt::Debug;

use num_traits::{NumCast, PrimInt, Signed};

use crate::algorithm::tree_lp::column::LPCol;
use crate::data::encoding::{LPSystem, NormalEncoding};
use crate::data::surface::{AngleStructure, NormalSurface};
use crate::data::triangulation::Triangulation;
use crate::error::LPError;

pub mod ban;

/// What happens with the slack variable of an added row.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConstraintKind {
    /// The linear function equals zero.
    Zero,
    /// The linear function is at least one.
    Positive,
}

/// A set of linear rows added to the matching equations.
pub trait LinearConstraint: Copy + Clone + Debug + Default + Eq + Sized {
    /// One entry per added row.
    const CONSTRAINTS: &'static [ConstraintKind];

    /// Change in the coefficient of a constraint row when an octagon replaces the two quads that
    /// it is made of: the octagon's coefficient equals the sum of those of the quads plus this
    /// value.
    const OCT_ADJUSTMENT: i64;

    /// Type of the coefficients in the added rows.
    type Coefficient: PrimInt + Signed + Debug + Into<i64>;

    /// Storage for one coefficient per added row.
    type Coefficients: Copy + Default + Debug + Eq + AsRef<[Self::Coefficient]> + AsMut<[Self::Coefficient]>;

    /// Fill in the coefficients of the added rows for every coordinate column.
    ///
    /// The slack columns are not touched.
    ///
    /// # Arguments
    ///
    /// * `columns`: All columns of the tableau, the coordinate columns first.
    /// * `tri`: Triangulation that the tableau is built for.
    /// * `system`: Class of the matching equations.
    /// * `column_perm`: Original coordinate of each tableau column.
    ///
    /// # Return value
    ///
    /// `InvalidArgument` if the triangulation doesn't meet the requirements of the constraint.
    fn add_rows(
        columns: &mut [LPCol<Self>],
        tri: &dyn Triangulation,
        system: LPSystem,
        column_perm: &[usize],
    ) -> Result<(), LPError>;

    /// Whether a surface found under this constraint really satisfies it.
    fn verify_surface(tri: &dyn Triangulation, surface: &NormalSurface) -> bool;

    /// Whether an angle structure found under this constraint really satisfies it.
    fn verify_angles(structure: &AngleStructure) -> bool;

    /// Whether the constraint can be used with an encoding.
    fn supported(encoding: NormalEncoding) -> bool;

    /// Number of added rows.
    fn nr_constraints() -> usize {
        Self::CONSTRAINTS.len()
    }
}

/// Convert a coefficient to the coefficient type of a constraint.
fn coefficient<C: LinearConstraint>(value: i64) -> Result<C::Coefficient, LPError> {
    <C::Coefficient as NumCast>::from(value)
        .ok_or_else(|| LPError::overflow(format!("constraint coefficient {} is out of range", value)))
}

/// No additional rows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NoConstraint;

impl LinearConstraint for NoConstraint {
    const CONSTRAINTS: &'static [ConstraintKind] = &[];
    const OCT_ADJUSTMENT: i64 = 0;
    type Coefficient = i32;
    type Coefficients = [i32; 0];

    fn add_rows(
        _columns: &mut [LPCol<Self>],
        _tri: &dyn Triangulation,
        _system: LPSystem,
        _column_perm: &[usize],
    ) -> Result<(), LPError> {
        Ok(())
    }

    fn verify_surface(_tri: &dyn Triangulation, _surface: &NormalSurface) -> bool {
        true
    }

    fn verify_angles(_structure: &AngleStructure) -> bool {
        true
    }

    fn supported(_encoding: NormalEncoding) -> bool {
        true
    }
}

/// Write the Euler characteristic coefficients into the first added row.
fn add_euler_row<C: LinearConstraint>(
    columns: &mut [LPCol<C>],
    tri: &dyn Triangulation,
    system: LPSystem,
    column_perm: &[usize],
) -> Result<(), LPError> {
    if !system.is_standard() {
        return Err(LPError::invalid_argument("the Euler characteristic requires standard coordinates"));
    }
    let coefficients = tri.euler_coefficients();
    let nr_coordinates = system.coords(tri.size());
    debug_assert_eq!(coefficients.len(), nr_coordinates);

    for (column, &original) in columns.iter_mut().zip(column_perm).take(nr_coordinates) {
        column.extra.as_mut()[0] = coefficient::<C>(coefficients[original])?;
    }
    Ok(())
}

/// The surface has positive Euler characteristic.
///
/// An octagon has Euler characteristic one lower than the two quads it is made of together.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EulerPositive;

impl LinearConstraint for EulerPositive {
    const CONSTRAINTS: &'static [ConstraintKind] = &[ConstraintKind::Positive];
    const OCT_ADJUSTMENT: i64 = -1;
    type Coefficient = i32;
    type Coefficients = [i32; 1];

    fn add_rows(
        columns: &mut [LPCol<Self>],
        tri: &dyn Triangulation,
        system: LPSystem,
        column_perm: &[usize],
    ) -> Result<(), LPError> {
        add_euler_row(columns, tri, system, column_perm)
    }

    fn verify_surface(tri: &dyn Triangulation, surface: &NormalSurface) -> bool {
        surface.euler_char(tri).is_some_and(|euler_char| euler_char.sign() == num_bigint::Sign::Plus)
    }

    fn verify_angles(_structure: &AngleStructure) -> bool {
        false
    }

    fn supported(encoding: NormalEncoding) -> bool {
        encoding.stores_triangles()
    }
}

/// The surface has Euler characteristic zero.
///
/// Not available for almost normal surfaces.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EulerZero;

impl LinearConstraint for EulerZero {
    const CONSTRAINTS: &'static [ConstraintKind] = &[ConstraintKind::Zero];
    const OCT_ADJUSTMENT: i64 = 0;
    type Coefficient = i32;
    type Coefficients = [i32; 1];

    fn add_rows(
        columns: &mut [LPCol<Self>],
        tri: &dyn Triangulation,
        system: LPSystem,
        column_perm: &[usize],
    ) -> Result<(), LPError> {
        add_euler_row(columns, tri, system, column_perm)
    }

    fn verify_surface(tri: &dyn Triangulation, surface: &NormalSurface) -> bool {
        surface.euler_char(tri).is_some_and(|euler_char| euler_char.sign() == num_bigint::Sign::NoSign)
    }

    fn verify_angles(_structure: &AngleStructure) -> bool {
        false
    }

    fn supported(encoding: NormalEncoding) -> bool {
        encoding.stores_triangles() && !encoding.stores_octagons()
    }
}

/// The surface is not spun: both the meridian and the longitude slope at the cusp are zero.
///
/// Requires an oriented triangulation with precisely one vertex, whose link is a torus.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NonSpun;

impl LinearConstraint for NonSpun {
    const CONSTRAINTS: &'static [ConstraintKind] = &[ConstraintKind::Zero, ConstraintKind::Zero];
    const OCT_ADJUSTMENT: i64 = 0;
    type Coefficient = i64;
    type Coefficients = [i64; 2];

    fn add_rows(
        columns: &mut [LPCol<Self>],
        tri: &dyn Triangulation,
        system: LPSystem,
        column_perm: &[usize],
    ) -> Result<(), LPError> {
        if !system.is_quad() {
            return Err(LPError::invalid_argument("the slope equations require quad coordinates"));
        }
        if tri.nr_vertices() != 1 || !tri.vertex_link_is_torus(0) || !tri.is_orientable() {
            return Err(LPError::invalid_argument(
                "the slope constraint requires an oriented triangulation with one torus cusp",
            ));
        }
        let slopes = tri.slope_equations()?;
        let nr_coordinates = system.coords(tri.size());
        if slopes.nr_rows() != 2 || slopes.nr_columns() != nr_coordinates {
            return Err(LPError::invalid_argument("slope equations have the wrong dimensions"));
        }

        for (column, &original) in columns.iter_mut().zip(column_perm).take(nr_coordinates) {
            let extra = column.extra.as_mut();
            extra[0] = coefficient::<Self>(slopes.get_value(1, original))?;
            extra[1] = coefficient::<Self>(slopes.get_value(0, original))?;
        }
        Ok(())
    }

    fn verify_surface(tri: &dyn Triangulation, surface: &NormalSurface) -> bool {
        match tri.slope_equations() {
            Ok(slopes) if slopes.nr_columns() == 3 * surface.size() => (0..slopes.nr_rows())
                .all(|row| surface.evaluate_quads(slopes.row(row)).sign() == num_bigint::Sign::NoSign),
            _ => false,
        }
    }

    fn verify_angles(_structure: &AngleStructure) -> bool {
        false
    }

    fn supported(encoding: NormalEncoding) -> bool {
        !(encoding.stores_triangles() || encoding.stores_angles())
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::tree_lp::column::LPCol;
    use crate::algorithm::tree_lp::constraint::{EulerPositive, EulerZero, LinearConstraint, NonSpun, NoConstraint};
    use crate::data::encoding::{LPSystem, NormalEncoding};
    use crate::data::surface::{AngleStructure, NormalSurface};
    use crate::tests::{figure_eight, one_vertex_sphere};

    #[test]
    fn supported() {
        assert!(NoConstraint::supported(NormalEncoding::ANGLE));
        assert!(EulerPositive::supported(NormalEncoding::AN_STANDARD));
        assert!(!EulerPositive::supported(NormalEncoding::QUAD));
        assert!(EulerZero::supported(NormalEncoding::STANDARD));
        assert!(!EulerZero::supported(NormalEncoding::AN_STANDARD));
        assert!(NonSpun::supported(NormalEncoding::QUAD));
        assert!(NonSpun::supported(NormalEncoding::QUAD_OCT));
        assert!(!NonSpun::supported(NormalEncoding::STANDARD));
        assert!(!NonSpun::supported(NormalEncoding::ANGLE));
    }

    #[test]
    fn euler_rows() {
        let tri = one_vertex_sphere();
        let perm = (0..8).collect::<Vec<_>>();
        let mut columns = vec![LPCol::<EulerPositive>::new(); 8];
        EulerPositive::add_rows(&mut columns, &tri, LPSystem::Standard, &perm).unwrap();
        let row = columns.iter().map(|column| column.extra[0]).collect::<Vec<_>>();
        assert_eq!(row, vec![2, 0, 1, -1, 0, 0, 1, 0]);

        assert!(EulerPositive::add_rows(&mut columns, &tri, LPSystem::Quad, &perm).is_err());
    }

    #[test]
    fn non_spun_requires_a_cusp() {
        let tri = one_vertex_sphere();
        let perm = (0..5).collect::<Vec<_>>();
        let mut columns = vec![LPCol::<NonSpun>::new(); 5];
        assert!(NonSpun::add_rows(&mut columns, &tri, LPSystem::Quad, &perm).is_err());

        // The cusp is there, but the slopes are not known.
        let tri = figure_eight();
        let perm = (0..8).collect::<Vec<_>>();
        let mut columns = vec![LPCol::<NonSpun>::new(); 8];
        assert!(NonSpun::add_rows(&mut columns, &tri, LPSystem::Quad, &perm).is_err());
    }

    #[test]
    fn verify() {
        let tri = one_vertex_sphere();
        let link = NormalSurface::from_values(NormalEncoding::STANDARD, &[1_i64, 1, 1, 1, 0, 0, 0], None).unwrap();
        assert!(EulerPositive::verify_surface(&tri, &link));
        assert!(!EulerZero::verify_surface(&tri, &link));
        assert!(NoConstraint::verify_surface(&tri, &link));

        let angles = AngleStructure::from_values(&[1_i64, 1, 1, 3]).unwrap();
        assert!(NoConstraint::verify_angles(&angles));
        assert!(!EulerPositive::verify_angles(&angles));
        assert!(!NonSpun::verify_angles(&angles));
    }
}
