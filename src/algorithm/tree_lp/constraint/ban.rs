//! # Ban constraints
//!
//! Restrictions on which normal discs a surface may use. A banned column is forced to zero before
//! the search starts. A marked column isn't restricted at all, but the search may treat it
//! differently, for example by not branching on it first.
use crate::algorithm::tree_lp::constraint::LinearConstraint;
use crate::algorithm::tree_lp::data::LPData;
use crate::algorithm::tree_lp::initial_tableaux::LPInitialTableaux;
use crate::data::encoding::{LPSystem, NormalEncoding};
use crate::data::number_types::traits::IntType;
use crate::data::triangulation::perm::quad_separating;
use crate::error::LPError;

/// Banned and marked flags, per column of a tableau.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanSet {
    banned: Vec<bool>,
    marked: Vec<bool>,
}

impl BanSet {
    /// Nothing banned or marked, for all columns of a tableau.
    fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>) -> Self {
        BanSet {
            banned: vec![false; init.columns()],
            marked: vec![false; init.columns()],
        }
    }

    /// Ban the triangle about a vertex, if triangles are part of the tableau.
    fn ban_triangle<C: LinearConstraint>(&mut self, init: &LPInitialTableaux<C>, tetrahedron: usize, vertex: usize) {
        if let Some(column) = triangle_column(init, tetrahedron, vertex) {
            self.banned[column] = true;
        }
    }

    fn ban_quad<C: LinearConstraint>(&mut self, init: &LPInitialTableaux<C>, tetrahedron: usize, quad: usize) {
        self.banned[quad_column(init, tetrahedron, quad)] = true;
    }

    fn mark_triangle<C: LinearConstraint>(&mut self, init: &LPInitialTableaux<C>, tetrahedron: usize, vertex: usize) {
        if let Some(column) = triangle_column(init, tetrahedron, vertex) {
            self.marked[column] = true;
        }
    }

    /// Ban all discs that meet a boundary face.
    ///
    /// # Arguments
    ///
    /// * `on_boundary`: Whether face `face` of tetrahedron `tetrahedron` should be considered.
    fn ban_boundary_faces<C: LinearConstraint>(
        &mut self,
        init: &LPInitialTableaux<C>,
        on_boundary: impl Fn(usize, usize) -> bool,
    ) {
        for tetrahedron in 0..init.tri().size() {
            for face in (0..4).filter(|&face| on_boundary(tetrahedron, face)) {
                for vertex in (0..4).filter(|&vertex| vertex != face) {
                    self.ban_triangle(init, tetrahedron, vertex);
                }
                for quad in 0..3 {
                    self.ban_quad(init, tetrahedron, quad);
                }
            }
        }
    }
}

fn triangle_column<C: LinearConstraint>(
    init: &LPInitialTableaux<C>,
    tetrahedron: usize,
    vertex: usize,
) -> Option<usize> {
    match init.system() {
        LPSystem::Standard => Some(init.column_of_coordinate(7 * tetrahedron + vertex)),
        LPSystem::Quad | LPSystem::Angle => None,
    }
}

fn quad_column<C: LinearConstraint>(init: &LPInitialTableaux<C>, tetrahedron: usize, quad: usize) -> usize {
    match init.system() {
        LPSystem::Standard => init.column_of_coordinate(7 * tetrahedron + 4 + quad),
        LPSystem::Quad | LPSystem::Angle => init.column_of_coordinate(3 * tetrahedron + quad),
    }
}

fn require_normal<C: LinearConstraint>(init: &LPInitialTableaux<C>) -> Result<(), LPError> {
    if init.system().is_normal() {
        Ok(())
    } else {
        Err(LPError::invalid_argument("discs can only be banned from normal surface tableaux"))
    }
}

/// Columns that are excluded from, or specially treated by, a search.
///
/// All flags are in tableau column order.
pub trait BanConstraint {
    /// Flags of each column.
    fn ban_set(&self) -> &BanSet;

    /// Whether the ban can be used with an encoding.
    fn supported(encoding: NormalEncoding) -> bool;

    /// Force all banned columns to zero.
    ///
    /// Called once, right after `init_start`.
    fn enforce_bans<C: LinearConstraint, I: IntType>(&self, lp: &mut LPData<C, I>) {
        debug_assert_eq!(lp.columns(), self.ban_set().banned.len());

        let banned = &self.ban_set().banned;
        for column in (0..banned.len()).filter(|&column| banned[column]) {
            lp.constrain_zero(column);
        }
    }

    /// Whether a column is forced to zero.
    fn is_banned(&self, column: usize) -> bool {
        self.ban_set().banned[column]
    }

    /// Whether a column is marked.
    fn is_marked(&self, column: usize) -> bool {
        self.ban_set().marked[column]
    }
}

/// Doesn't ban or mark anything.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanNone {
    set: BanSet,
}

impl BanNone {
    /// Create a new instance for a tableau.
    pub fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>) -> Self {
        BanNone { set: BanSet::new(init) }
    }
}

impl BanConstraint for BanNone {
    fn ban_set(&self) -> &BanSet {
        &self.set
    }

    fn supported(_encoding: NormalEncoding) -> bool {
        true
    }
}

/// Bans all normal discs that touch the boundary of the triangulation.
///
/// For every boundary face, these are the triangles at its three vertices and all quads of its
/// tetrahedron.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanBoundary {
    set: BanSet,
}

impl BanBoundary {
    /// Create a new instance for a tableau of normal surfaces.
    pub fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>) -> Result<Self, LPError> {
        require_normal(init)?;

        let tri = init.tri();
        let mut set = BanSet::new(init);
        set.ban_boundary_faces(init, |tetrahedron, face| tri.face_is_boundary(tetrahedron, face));

        Ok(BanBoundary { set })
    }
}

impl BanConstraint for BanBoundary {
    fn ban_set(&self) -> &BanSet {
        &self.set
    }

    fn supported(encoding: NormalEncoding) -> bool {
        !encoding.stores_angles() && !encoding.stores_octagons()
    }
}

/// Bans the normal discs that touch a torus boundary component, and marks the triangles about
/// vertices that are either on a torus boundary component or have a torus link.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanTorusBoundary {
    set: BanSet,
}

impl BanTorusBoundary {
    /// Create a new instance for a tableau of normal surfaces.
    pub fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>) -> Result<Self, LPError> {
        require_normal(init)?;

        let tri = init.tri();
        let mut set = BanSet::new(init);
        set.ban_boundary_faces(init, |tetrahedron, face| tri.face_is_torus_boundary(tetrahedron, face));
        for tetrahedron in 0..tri.size() {
            for vertex in 0..4 {
                let index = tri.vertex_index(tetrahedron, vertex);
                if tri.vertex_on_torus_boundary(index) || tri.vertex_link_is_torus(index) {
                    set.mark_triangle(init, tetrahedron, vertex);
                }
            }
        }

        Ok(BanTorusBoundary { set })
    }
}

impl BanConstraint for BanTorusBoundary {
    fn ban_set(&self) -> &BanSet {
        &self.set
    }

    fn supported(encoding: NormalEncoding) -> bool {
        !encoding.stores_angles() && !encoding.stores_octagons()
    }
}

/// Bans all normal discs that meet a given edge.
///
/// In each tetrahedron that contains the edge, these are the triangles at its two end points and
/// the two quads that separate them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanEdge {
    set: BanSet,
}

impl BanEdge {
    /// Create a new instance for a tableau of normal surfaces.
    ///
    /// # Arguments
    ///
    /// * `edge`: Index of an edge class of the triangulation.
    pub fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>, edge: usize) -> Result<Self, LPError> {
        require_normal(init)?;
        let tri = init.tri();
        if edge >= tri.nr_edges() {
            return Err(LPError::invalid_argument(format!(
                "edge {} out of range, the triangulation has {} edges", edge, tri.nr_edges(),
            )));
        }

        let mut set = BanSet::new(init);
        for embedding in tri.edge_embeddings(edge) {
            let vertices = embedding.vertices;
            let (start, end) = (vertices.apply(0), vertices.apply(1));
            set.ban_triangle(init, embedding.tetrahedron, start);
            set.ban_triangle(init, embedding.tetrahedron, end);
            set.ban_quad(init, embedding.tetrahedron, quad_separating(start, vertices.apply(2)));
            set.ban_quad(init, embedding.tetrahedron, quad_separating(start, vertices.apply(3)));
        }

        Ok(BanEdge { set })
    }
}

impl BanConstraint for BanEdge {
    fn ban_set(&self) -> &BanSet {
        &self.set
    }

    fn supported(encoding: NormalEncoding) -> bool {
        !encoding.stores_angles()
    }
}

/// Bans an explicit list of coordinates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanList {
    set: BanSet,
}

impl BanList {
    /// Create a new instance for a tableau.
    ///
    /// # Arguments
    ///
    /// * `coordinates`: Indices in the original coordinate order of the triangulation.
    pub fn new<C: LinearConstraint>(init: &LPInitialTableaux<C>, coordinates: &[usize]) -> Result<Self, LPError> {
        let mut set = BanSet::new(init);
        for &coordinate in coordinates {
            if coordinate >= init.coordinate_columns() {
                return Err(LPError::invalid_argument(format!(
                    "coordinate {} out of range, there are {}", coordinate, init.coordinate_columns(),
                )));
            }
            set.banned[init.column_of_coordinate(coordinate)] = true;
        }

        Ok(BanList { set })
    }
}

impl BanConstraint for BanList {
    fn ban_set(&self) -> &BanSet {
        &self.set
    }

    fn supported(_encoding: NormalEncoding) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;
    use num_traits::Zero;

    use crate::algorithm::tree_lp::constraint::ban::{BanBoundary, BanConstraint, BanEdge, BanList, BanNone, BanTorusBoundary};
    use crate::algorithm::tree_lp::constraint::NoConstraint;
    use crate::algorithm::tree_lp::data::LPData;
    use crate::algorithm::tree_lp::initial_tableaux::LPInitialTableaux;
    use crate::data::encoding::{LPSystem, NormalEncoding};
    use crate::data::triangulation::Triangulation;
    use crate::tests::{figure_eight, layered_solid_torus, lone_tetrahedron};

    #[test]
    fn supported() {
        assert!(BanNone::supported(NormalEncoding::ANGLE));
        assert!(BanBoundary::supported(NormalEncoding::QUAD));
        assert!(!BanBoundary::supported(NormalEncoding::AN_STANDARD));
        assert!(!BanTorusBoundary::supported(NormalEncoding::ANGLE));
        assert!(BanEdge::supported(NormalEncoding::QUAD_OCT));
        assert!(!BanEdge::supported(NormalEncoding::ANGLE));
        assert!(BanList::supported(NormalEncoding::ANGLE));
    }

    #[test]
    fn solid_torus_boundary() {
        let tri = layered_solid_torus();
        let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::STANDARD, true).unwrap();

        let boundary = BanBoundary::new(&init).unwrap();
        let torus = BanTorusBoundary::new(&init).unwrap();
        for column in 0..7 {
            assert!(boundary.is_banned(column));
            assert!(torus.is_banned(column));
            assert!(!boundary.is_marked(column));
        }
        for column in 0..3 {
            assert!(!torus.is_marked(column));
        }
        for column in 3..7 {
            assert!(torus.is_marked(column));
        }

        let mut data = LPData::<_, BigInt>::reserve(&init);
        data.init_start().unwrap();
        torus.enforce_bans(&mut data);
        assert!(data.is_feasible());
        assert!((0..7).all(|column| !data.is_active(column)));
    }

    #[test]
    fn closed_has_no_boundary() {
        let tri = figure_eight();
        let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, true).unwrap();

        let boundary = BanBoundary::new(&init).unwrap();
        let none = BanNone::new(&init);
        for column in 0..6 {
            assert!(!boundary.is_banned(column));
            assert!(!none.is_banned(column));
            assert!(!none.is_marked(column));
        }

        let angles = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::ANGLE, true).unwrap();
        assert!(BanBoundary::new(&angles).is_err());
    }

    #[test]
    fn edge() {
        let tri = lone_tetrahedron();
        let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::STANDARD, true).unwrap();
        assert_eq!(init.system(), LPSystem::Standard);
        assert_eq!(tri.nr_edges(), 6);

        let ban = BanEdge::new(&init, tri.edge_index(0, 0)).unwrap();
        // Edge 01 meets the triangles about vertices 0 and 1, and quads 1 and 2.
        let expected = [(0, true), (1, true), (2, false), (3, false), (4, false), (5, true), (6, true)];
        for (coordinate, banned) in expected {
            assert_eq!(ban.is_banned(init.column_of_coordinate(coordinate)), banned);
        }

        assert!(BanEdge::new(&init, 6).is_err());
    }

    #[test]
    fn ban_list() {
        let tri = figure_eight();
        let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, true).unwrap();
        let ban = BanList::new(&init, &[3, 4]).unwrap();
        assert!(ban.is_banned(0));
        assert!(ban.is_banned(1));
        assert!(!ban.is_banned(2));
        assert!(BanList::new(&init, &[6]).is_err());

        let mut data = LPData::<_, BigInt>::reserve(&init);
        data.init_start().unwrap();
        ban.enforce_bans(&mut data);
        assert!(data.is_feasible());

        let positive = init.column_of_coordinate(5);
        data.constrain_positive(positive);
        assert!(data.is_feasible());
        let type_vector = (0..6).map(|column| column == positive).collect::<Vec<_>>();
        let solution = data.extract_solution(&type_vector).unwrap();
        assert!(solution[3].is_zero());
        assert!(solution[4].is_zero());
        assert!(solution[5] > BigInt::zero());

        let equations = tri.matching_equations(LPSystem::Quad).unwrap();
        for i in 0..equations.nr_rows() {
            let total = equations.row(i).iter().zip(&solution)
                .fold(BigInt::zero(), |total, (&coefficient, value)| total + value * coefficient);
            assert!(total.is_zero());
        }
    }
}
