//! The figure eight knot complement, traversed the way an enumeration search would.
use num_bigint::BigInt;
use num_traits::Zero;

use treelp::algorithm::tree_lp::constraint::ban::{BanConstraint, BanList};
use treelp::algorithm::tree_lp::constraint::NoConstraint;
use treelp::algorithm::tree_lp::data::LPData;
use treelp::algorithm::tree_lp::initial_tableaux::LPInitialTableaux;
use treelp::data::encoding::{LPSystem, NormalEncoding};
use treelp::data::triangulation::glued::GluedTriangulation;
use treelp::data::triangulation::{Perm4, Triangulation};

fn figure_eight() -> GluedTriangulation {
    let mut tri = GluedTriangulation::new(2);
    for (face, images) in [(0, [1, 3, 0, 2]), (1, [2, 0, 3, 1]), (2, [0, 3, 2, 1]), (3, [2, 1, 0, 3])] {
        tri.join(0, face, 1, Perm4::new(images).unwrap()).unwrap();
    }
    tri
}

fn satisfies(tri: &GluedTriangulation, system: LPSystem, solution: &[BigInt]) -> bool {
    let equations = tri.matching_equations(system).unwrap();
    (0..equations.nr_rows()).all(|i| {
        equations.row(i).iter().zip(solution)
            .fold(BigInt::zero(), |total, (&coefficient, value)| total + value * coefficient)
            .is_zero()
    })
}

/// Visit all leaves of the quad type tree, where each tetrahedron either has no quads or
/// quads of a single type.
#[test]
fn quad_type_tree() {
    let tri = figure_eight();
    let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, true).unwrap();
    let mut root = LPData::<_, BigInt>::reserve(&init);
    root.init_start().unwrap();
    assert!(root.is_feasible());

    let mut nr_solutions = 0;
    let mut node = LPData::reserve(&init);
    for types in 1..16 {
        let choice = [types % 4, types / 4];
        node.init_clone(&root);
        let mut type_vector = vec![false; init.coordinate_columns()];
        for (block, &chosen) in choice.iter().enumerate() {
            for quad in 0..3 {
                let column = 3 * block + quad;
                if chosen == quad + 1 {
                    node.constrain_positive(column);
                    type_vector[column] = true;
                } else {
                    node.constrain_zero(column);
                }
            }
        }
        if !node.is_feasible() {
            continue;
        }
        assert!(node.verify());

        let solution = node.extract_solution(&type_vector).unwrap();
        assert!(solution.iter().all(|value| *value >= BigInt::zero()));
        assert!(solution.iter().any(|value| !value.is_zero()));
        assert!(satisfies(&tri, LPSystem::Quad, &solution));
        for tetrahedron in 0..2 {
            let nr_quad_types = (0..3).filter(|q| !solution[3 * tetrahedron + q].is_zero()).count();
            assert!(nr_quad_types <= 1);
        }
        nr_solutions += 1;
    }
    assert_eq!(nr_solutions, 4);
}

#[test]
fn standard_with_bans() {
    let tri = figure_eight();
    let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::STANDARD, true).unwrap();
    let ban = BanList::new(&init, &[7, 8]).unwrap();

    let mut data = LPData::<_, i64>::reserve(&init);
    data.init_start().unwrap();
    ban.enforce_bans(&mut data);
    assert!(data.is_feasible());

    let positive = init.column_of_coordinate(1);
    data.constrain_positive(positive);
    assert!(data.is_feasible());
    let type_vector = (0..14).map(|column| column == positive).collect::<Vec<_>>();
    let solution = data.extract_solution(&type_vector).unwrap()
        .into_iter()
        .map(BigInt::from)
        .collect::<Vec<_>>();
    assert!(solution[7].is_zero());
    assert!(solution[8].is_zero());
    assert_eq!(solution[1], BigInt::from(1));
    assert!(satisfies(&tri, LPSystem::Standard, &solution));
}

#[test]
fn strict_angle_structure() {
    let tri = figure_eight();
    let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::ANGLE, true).unwrap();
    let mut data = LPData::<_, i128>::reserve(&init);
    data.init_start().unwrap();
    for column in 0..init.coordinate_columns() {
        data.constrain_positive(column);
    }
    assert!(data.is_feasible());

    let structure = data.extract_angle_structure(&[true; 7]).unwrap();
    assert!(structure.is_strict());
    let values = (0..2)
        .flat_map(|tetrahedron| (0..3).map(move |quad| (tetrahedron, quad)))
        .map(|(tetrahedron, quad)| structure.angle(tetrahedron, quad).clone())
        .chain([structure.scaling().clone()])
        .collect::<Vec<_>>();
    assert!(satisfies(&tri, LPSystem::Angle, &values));
}

/// One tableau, read by several searches at once.
#[test]
fn shared_between_threads() {
    let tri = figure_eight();
    let init = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, true).unwrap();
    let solve = |column: usize| {
        let mut data = LPData::<_, BigInt>::reserve(&init);
        data.init_start().unwrap();
        data.constrain_positive(column);
        if !data.is_feasible() {
            return None;
        }
        let type_vector = (0..6).map(|c| c == column).collect::<Vec<_>>();
        Some(data.extract_solution(&type_vector).unwrap())
    };

    let parallel = std::thread::scope(|scope| {
        let workers = (0..6)
            .map(|column| scope.spawn(move || solve(column)))
            .collect::<Vec<_>>();
        workers.into_iter().map(|worker| worker.join().unwrap()).collect::<Vec<_>>()
    });

    for (column, solution) in parallel.into_iter().enumerate() {
        assert_eq!(solution, solve(column));
        if let Some(solution) = solution {
            assert!(satisfies(&tri, LPSystem::Quad, &solution));
        }
    }
}
