//! # Triangulations from face gluings
//!
//! A triangulation described explicitly by which faces of which tetrahedra are glued together.
//! The skeleton (edges, vertices and boundary components) is derived from the gluings when it is
//! first needed.
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::data::encoding::LPSystem;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::triangulation::{EdgeEmbedding, Triangulation};
use crate::data::triangulation::perm::{edge_number, EDGE_VERTICES, Perm4, quad_separating};
use crate::error::LPError;

/// Tetrahedra with face gluings.
///
/// Face `f` of a tetrahedron is the face opposite vertex `f`. When face `f` of tetrahedron `t` is
/// glued to tetrahedron `t'` with gluing permutation `g`, vertex `v` of `t` is identified with
/// vertex `g.apply(v)` of `t'`, and face `f` of `t` with face `g.apply(f)` of `t'`.
///
/// Edges that are identified with themselves in reverse are not supported.
#[derive(Debug, Clone)]
pub struct GluedTriangulation {
    adjacency: Vec<[Option<(usize, Perm4)>; 4]>,
    slope_equations: Option<DenseMatrix>,
    skeleton: OnceLock<Skeleton>,
}

/// Everything that follows from the gluings.
#[derive(Debug, Clone)]
struct Skeleton {
    edges: Vec<Edge>,
    edge_index: Vec<[usize; 6]>,
    vertex_index: Vec<[usize; 4]>,
    nr_vertices: usize,
    link_euler_char: Vec<i64>,
    vertex_on_boundary: Vec<bool>,
    orientable: bool,
    /// Boundary component of each boundary face.
    face_component: HashMap<(usize, usize), usize>,
    torus_component: Vec<bool>,
    vertex_on_torus_boundary: Vec<bool>,
}

#[derive(Debug, Clone)]
struct Edge {
    embeddings: Vec<EdgeEmbedding>,
    boundary: bool,
}

impl GluedTriangulation {
    /// Create a triangulation of `size` tetrahedra without any gluings.
    pub fn new(size: usize) -> Self {
        GluedTriangulation {
            adjacency: vec![[None; 4]; size],
            slope_equations: None,
            skeleton: OnceLock::new(),
        }
    }

    /// Glue two faces together.
    ///
    /// # Arguments
    ///
    /// * `tetrahedron`: Tetrahedron of the first face.
    /// * `face`: Index of the first face.
    /// * `other`: Tetrahedron of the second face, possibly equal to `tetrahedron`.
    /// * `gluing`: Maps the vertices of `tetrahedron` onto those of `other`. Face `face` is glued
    /// to face `gluing.apply(face)` of `other`.
    ///
    /// # Return value
    ///
    /// `InvalidArgument` if an index is out of range or if either face is glued already.
    pub fn join(
        &mut self,
        tetrahedron: usize,
        face: usize,
        other: usize,
        gluing: Perm4,
    ) -> Result<(), LPError> {
        let size = self.adjacency.len();
        if tetrahedron >= size || other >= size || face >= 4 {
            return Err(LPError::invalid_argument(format!(
                "cannot glue face {} of tetrahedron {} to tetrahedron {} in a triangulation of size {}",
                face, tetrahedron, other, size,
            )));
        }
        let other_face = gluing.apply(face);
        if tetrahedron == other && face == other_face {
            return Err(LPError::invalid_argument("a face cannot be glued to itself"));
        }
        if self.adjacency[tetrahedron][face].is_some() || self.adjacency[other][other_face].is_some() {
            return Err(LPError::invalid_argument(format!(
                "face {} of tetrahedron {} or face {} of tetrahedron {} is glued already",
                face, tetrahedron, other_face, other,
            )));
        }

        self.adjacency[tetrahedron][face] = Some((other, gluing));
        self.adjacency[other][other_face] = Some((tetrahedron, gluing.inverse()));
        self.skeleton = OnceLock::new();

        Ok(())
    }

    /// Provide the slope equations of the cusp, which can't be derived from the gluings alone.
    ///
    /// # Arguments
    ///
    /// * `equations`: Two rows, meridian and longitude, with one column per quad coordinate.
    pub fn set_slope_equations(&mut self, equations: DenseMatrix) -> Result<(), LPError> {
        if equations.nr_rows() != 2 || equations.nr_columns() != 3 * self.size() {
            return Err(LPError::invalid_argument(format!(
                "slope equations should be of size 2 x {}, not {} x {}",
                3 * self.size(), equations.nr_rows(), equations.nr_columns(),
            )));
        }

        self.slope_equations = Some(equations);
        Ok(())
    }

    /// Tetrahedron and gluing across a face, if it is glued.
    pub fn adjacent(&self, tetrahedron: usize, face: usize) -> Option<(usize, Perm4)> {
        self.adjacency[tetrahedron][face]
    }

    /// Whether this side of a glued face pair is the one that represents the face class.
    fn represents_face(&self, tetrahedron: usize, face: usize) -> bool {
        match self.adjacency[tetrahedron][face] {
            None => true,
            Some((other, gluing)) => (other, gluing.apply(face)) >= (tetrahedron, face),
        }
    }

    fn skeleton(&self) -> &Skeleton {
        self.skeleton.get_or_init(|| self.compute_skeleton())
    }

    fn compute_skeleton(&self) -> Skeleton {
        let size = self.size();

        let (edges, edge_index) = self.compute_edges();
        let (vertex_index, nr_vertices) = self.compute_vertices();
        let orientable = self.compute_orientability();

        // Euler characteristic of the vertex links: a link has one triangle per corner of a
        // tetrahedron, one edge per corner of a face and one vertex per end of an edge.
        let mut link_euler_char = vec![0; nr_vertices];
        let mut vertex_on_boundary = vec![false; nr_vertices];
        for t in 0..size {
            for v in 0..4 {
                link_euler_char[vertex_index[t][v]] += 1;
            }
            for f in 0..4 {
                if !self.represents_face(t, f) {
                    continue;
                }
                for v in (0..4).filter(|&v| v != f) {
                    link_euler_char[vertex_index[t][v]] -= 1;
                    if self.face_is_boundary(t, f) {
                        vertex_on_boundary[vertex_index[t][v]] = true;
                    }
                }
            }
        }
        for edge in &edges {
            let first = edge.embeddings[0];
            link_euler_char[vertex_index[first.tetrahedron][first.vertices.apply(0)]] += 1;
            link_euler_char[vertex_index[first.tetrahedron][first.vertices.apply(1)]] += 1;
        }

        // Boundary components, as classes of boundary faces that share an edge.
        let boundary_faces = (0..size)
            .flat_map(|t| (0..4).map(move |f| (t, f)))
            .filter(|&(t, f)| self.face_is_boundary(t, f))
            .collect::<Vec<_>>();
        let mut parent = (0..boundary_faces.len()).collect::<Vec<_>>();
        let mut face_of_edge = HashMap::new();
        for (i, &(t, f)) in boundary_faces.iter().enumerate() {
            for [a, b] in EDGE_VERTICES.iter().copied().filter(|&[a, b]| a != f && b != f) {
                let edge = edge_index[t][edge_number(a, b)];
                match face_of_edge.get(&edge).copied() {
                    None => { face_of_edge.insert(edge, i); },
                    Some(j) => {
                        let (root_i, root_j) = (find(&mut parent, i), find(&mut parent, j));
                        parent[root_i] = root_j;
                    },
                }
            }
        }
        let mut component_of_root = HashMap::new();
        let mut face_component = HashMap::new();
        for (i, &face) in boundary_faces.iter().enumerate() {
            let root = find(&mut parent, i);
            let next = component_of_root.len();
            let component = *component_of_root.entry(root).or_insert(next);
            face_component.insert(face, component);
        }
        let nr_components = component_of_root.len();
        let mut component_edges = vec![Vec::new(); nr_components];
        let mut component_vertices = vec![Vec::new(); nr_components];
        let mut component_faces = vec![0_i64; nr_components];
        for (&(t, f), &component) in &face_component {
            component_faces[component] += 1;
            for v in (0..4).filter(|&v| v != f) {
                component_vertices[component].push(vertex_index[t][v]);
            }
            for [a, b] in EDGE_VERTICES.iter().copied().filter(|&[a, b]| a != f && b != f) {
                component_edges[component].push(edge_index[t][edge_number(a, b)]);
            }
        }
        let torus_component = (0..nr_components)
            .map(|component| {
                component_vertices[component].sort_unstable();
                component_vertices[component].dedup();
                component_edges[component].sort_unstable();
                component_edges[component].dedup();
                let euler_char = component_vertices[component].len() as i64
                    - component_edges[component].len() as i64
                    + component_faces[component];
                euler_char == 0 && orientable
            })
            .collect::<Vec<_>>();
        let mut vertex_on_torus_boundary = vec![false; nr_vertices];
        for component in (0..nr_components).filter(|&component| torus_component[component]) {
            for &vertex in &component_vertices[component] {
                vertex_on_torus_boundary[vertex] = true;
            }
        }

        Skeleton {
            edges,
            edge_index,
            vertex_index,
            nr_vertices,
            link_euler_char,
            vertex_on_boundary,
            orientable,
            face_component,
            torus_component,
            vertex_on_torus_boundary,
        }
    }

    /// Walk around every edge to collect its embeddings.
    fn compute_edges(&self) -> (Vec<Edge>, Vec<[usize; 6]>) {
        let size = self.size();
        let mut edge_index = vec![[usize::MAX; 6]; size];
        let mut edges = Vec::new();

        for t in 0..size {
            for e in 0..6 {
                if edge_index[t][e] != usize::MAX {
                    continue;
                }
                let index = edges.len();
                let start = Perm4::edge_ordering(e);

                let mut embeddings = Vec::new();
                let mut boundary = false;
                let mut current = EdgeEmbedding { tetrahedron: t, vertices: start };
                loop {
                    embeddings.push(current);
                    edge_index[current.tetrahedron][Self::edge_of(&current)] = index;
                    match self.adjacency[current.tetrahedron][current.vertices.apply(2)] {
                        None => {
                            boundary = true;
                            break;
                        },
                        Some((other, gluing)) => {
                            let next = EdgeEmbedding {
                                tetrahedron: other,
                                vertices: (gluing * current.vertices).swap_images(2, 3),
                            };
                            if next.tetrahedron == t && Self::edge_of(&next) == e {
                                break;
                            }
                            current = next;
                        },
                    }
                }

                if boundary {
                    // Walk in the other direction as well, until the other boundary face.
                    let mut before = Vec::new();
                    let mut current = EdgeEmbedding { tetrahedron: t, vertices: start.swap_images(2, 3) };
                    while let Some((other, gluing)) = self.adjacency[current.tetrahedron][current.vertices.apply(2)] {
                        current = EdgeEmbedding {
                            tetrahedron: other,
                            vertices: (gluing * current.vertices).swap_images(2, 3),
                        };
                        edge_index[current.tetrahedron][Self::edge_of(&current)] = index;
                        before.push(EdgeEmbedding {
                            tetrahedron: current.tetrahedron,
                            vertices: current.vertices.swap_images(2, 3),
                        });
                    }
                    before.reverse();
                    before.extend(embeddings);
                    embeddings = before;
                }

                edges.push(Edge { embeddings, boundary });
            }
        }

        (edges, edge_index)
    }

    fn edge_of(embedding: &EdgeEmbedding) -> usize {
        edge_number(embedding.vertices.apply(0), embedding.vertices.apply(1))
    }

    /// Vertex classes, as the classes of tetrahedron corners identified through the face gluings.
    fn compute_vertices(&self) -> (Vec<[usize; 4]>, usize) {
        let size = self.size();
        let mut parent = (0..4 * size).collect::<Vec<_>>();
        for t in 0..size {
            for f in 0..4 {
                if let Some((other, gluing)) = self.adjacency[t][f] {
                    for v in (0..4).filter(|&v| v != f) {
                        let root = find(&mut parent, 4 * t + v);
                        let other_root = find(&mut parent, 4 * other + gluing.apply(v));
                        parent[root] = other_root;
                    }
                }
            }
        }

        let mut class_of_root = HashMap::new();
        let mut vertex_index = vec![[0; 4]; size];
        for t in 0..size {
            for v in 0..4 {
                let root = find(&mut parent, 4 * t + v);
                let next = class_of_root.len();
                vertex_index[t][v] = *class_of_root.entry(root).or_insert(next);
            }
        }

        (vertex_index, class_of_root.len())
    }

    /// Try to orient all tetrahedra consistently.
    fn compute_orientability(&self) -> bool {
        let size = self.size();
        let mut orientation = vec![0; size];
        for start in 0..size {
            if orientation[start] != 0 {
                continue;
            }
            orientation[start] = 1;
            let mut stack = vec![start];
            while let Some(t) = stack.pop() {
                for (other, gluing) in self.adjacency[t].iter().flatten() {
                    let required = -gluing.sign() * orientation[t];
                    if orientation[*other] == 0 {
                        orientation[*other] = required;
                        stack.push(*other);
                    } else if orientation[*other] != required {
                        return false;
                    }
                }
            }
        }

        true
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

impl Triangulation for GluedTriangulation {
    fn size(&self) -> usize {
        self.adjacency.len()
    }

    fn matching_equations(&self, system: LPSystem) -> Result<DenseMatrix, LPError> {
        let size = self.size();
        let nr_columns = system.coords(size);
        let mut rows = Vec::new();

        match system {
            LPSystem::Standard => {
                for t in 0..size {
                    for f in 0..4 {
                        let (other, gluing) = match self.adjacency[t][f] {
                            Some(adjacent) if self.represents_face(t, f) => adjacent,
                            _ => continue,
                        };
                        for v in (0..4).filter(|&v| v != f) {
                            let mut row = vec![0; nr_columns];
                            row[7 * t + v] += 1;
                            row[7 * t + 4 + quad_separating(v, f)] += 1;
                            let (image, image_face) = (gluing.apply(v), gluing.apply(f));
                            row[7 * other + image] -= 1;
                            row[7 * other + 4 + quad_separating(image, image_face)] -= 1;
                            rows.push(row);
                        }
                    }
                }
            },
            LPSystem::Quad => {
                for edge in self.skeleton().edges.iter().filter(|edge| !edge.boundary) {
                    let mut row = vec![0; nr_columns];
                    for embedding in &edge.embeddings {
                        let p = embedding.vertices;
                        row[3 * embedding.tetrahedron + quad_separating(p.apply(0), p.apply(2))] += 1;
                        row[3 * embedding.tetrahedron + quad_separating(p.apply(0), p.apply(3))] -= 1;
                    }
                    rows.push(row);
                }
            },
            LPSystem::Angle => {
                let scaling = nr_columns - 1;
                for t in 0..size {
                    let mut row = vec![0; nr_columns];
                    row[3 * t..3 * t + 3].fill(1);
                    row[scaling] = -1;
                    rows.push(row);
                }
                for edge in self.skeleton().edges.iter().filter(|edge| !edge.boundary) {
                    let mut row = vec![0; nr_columns];
                    for embedding in &edge.embeddings {
                        let p = embedding.vertices;
                        row[3 * embedding.tetrahedron + quad_separating(p.apply(0), p.apply(1))] += 1;
                    }
                    row[scaling] = -2;
                    rows.push(row);
                }
            },
        }

        Ok(DenseMatrix::from_data(rows, nr_columns))
    }

    fn euler_coefficients(&self) -> Vec<i64> {
        let size = self.size();
        let mut coefficients = vec![1; 7 * size];
        for t in 0..size {
            for f in (0..4).filter(|&f| self.represents_face(t, f)) {
                for v in (0..4).filter(|&v| v != f) {
                    coefficients[7 * t + v] -= 1;
                    coefficients[7 * t + 4 + quad_separating(v, f)] -= 1;
                }
            }
        }
        for edge in &self.skeleton().edges {
            let EdgeEmbedding { tetrahedron: t, vertices: p } = edge.embeddings[0];
            coefficients[7 * t + p.apply(0)] += 1;
            coefficients[7 * t + p.apply(1)] += 1;
            coefficients[7 * t + 4 + quad_separating(p.apply(0), p.apply(2))] += 1;
            coefficients[7 * t + 4 + quad_separating(p.apply(0), p.apply(3))] += 1;
        }

        coefficients
    }

    fn nr_vertices(&self) -> usize {
        self.skeleton().nr_vertices
    }

    fn vertex_index(&self, tetrahedron: usize, vertex: usize) -> usize {
        self.skeleton().vertex_index[tetrahedron][vertex]
    }

    fn vertex_link_euler_char(&self, vertex: usize) -> i64 {
        self.skeleton().link_euler_char[vertex]
    }

    fn vertex_on_boundary(&self, vertex: usize) -> bool {
        self.skeleton().vertex_on_boundary[vertex]
    }

    fn is_orientable(&self) -> bool {
        self.skeleton().orientable
    }

    fn nr_edges(&self) -> usize {
        self.skeleton().edges.len()
    }

    fn edge_embeddings(&self, edge: usize) -> Vec<EdgeEmbedding> {
        self.skeleton().edges[edge].embeddings.clone()
    }

    fn face_is_boundary(&self, tetrahedron: usize, face: usize) -> bool {
        self.adjacency[tetrahedron][face].is_none()
    }

    fn face_is_torus_boundary(&self, tetrahedron: usize, face: usize) -> bool {
        let skeleton = self.skeleton();
        skeleton.face_component.get(&(tetrahedron, face))
            .is_some_and(|&component| skeleton.torus_component[component])
    }

    fn vertex_on_torus_boundary(&self, vertex: usize) -> bool {
        self.skeleton().vertex_on_torus_boundary[vertex]
    }

    fn slope_equations(&self) -> Result<DenseMatrix, LPError> {
        self.slope_equations.clone()
            .ok_or_else(|| LPError::invalid_argument("no slope equations were provided for the cusp"))
    }
}

impl GluedTriangulation {
    /// Edge class of edge `edge` of tetrahedron `tetrahedron`.
    pub fn edge_index(&self, tetrahedron: usize, edge: usize) -> usize {
        self.skeleton().edge_index[tetrahedron][edge]
    }
}

#[cfg(test)]
mod test {
    use crate::data::encoding::LPSystem;
    use crate::data::triangulation::Triangulation;
    use crate::tests::{figure_eight, layered_solid_torus, one_vertex_sphere};

    #[test]
    fn figure_eight_skeleton() {
        let tri = figure_eight();
        assert_eq!(tri.nr_edges(), 2);
        assert_eq!(tri.edge_embeddings(0).len(), 6);
        assert_eq!(tri.edge_embeddings(1).len(), 6);
        assert_eq!(tri.nr_vertices(), 1);
        assert!(tri.is_orientable());
        assert_eq!(tri.vertex_link_euler_char(0), 0);
        assert!(tri.vertex_link_is_torus(0));
        assert!(!tri.vertex_on_boundary(0));
    }

    #[test]
    fn figure_eight_equations() {
        let tri = figure_eight();

        let quad = tri.matching_equations(LPSystem::Quad).unwrap();
        assert_eq!(quad.nr_rows(), 2);
        assert_eq!(quad.row(0), &[2, -1, -1, 2, -1, -1]);
        assert_eq!(quad.rank(), 1);

        let angle = tri.matching_equations(LPSystem::Angle).unwrap();
        assert_eq!(angle.nr_rows(), 4);
        assert_eq!(angle.nr_columns(), 7);
        assert_eq!(angle.rank(), 3);

        let standard = tri.matching_equations(LPSystem::Standard).unwrap();
        assert_eq!(standard.nr_rows(), 12);
        assert_eq!(standard.rank(), 10);

        assert_eq!(tri.euler_coefficients(), vec![0, -1, -1, -2, -2, -2, -1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn one_vertex_sphere_link() {
        let tri = one_vertex_sphere();
        assert_eq!(tri.nr_vertices(), 1);
        assert_eq!(tri.vertex_link_euler_char(0), 2);
        assert!(!tri.vertex_link_is_torus(0));
        assert_eq!(tri.matching_equations(LPSystem::Standard).unwrap().rank(), 4);
        assert_eq!(tri.matching_equations(LPSystem::Quad).unwrap().rank(), 1);
    }

    #[test]
    fn solid_torus_boundary() {
        let tri = layered_solid_torus();
        assert_eq!(tri.nr_edges(), 3);
        assert_eq!(tri.nr_vertices(), 1);
        assert!(tri.vertex_on_boundary(0));
        assert_eq!(tri.vertex_link_euler_char(0), 1);
        assert!(tri.face_is_boundary(0, 2));
        assert!(tri.face_is_torus_boundary(0, 2));
        assert!(tri.face_is_torus_boundary(0, 3));
        assert!(!tri.face_is_torus_boundary(0, 0));
        assert!(tri.vertex_on_torus_boundary(0));
        assert!(tri.matching_equations(LPSystem::Quad).unwrap().nr_rows() == 0);
        assert_eq!(tri.euler_coefficients(), vec![2, -1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn join_errors() {
        let mut tri = one_vertex_sphere();
        let gluing = crate::data::triangulation::Perm4::new([1, 2, 3, 0]).unwrap();
        assert!(tri.join(0, 0, 0, gluing).is_err());
        assert!(tri.join(2, 0, 0, gluing).is_err());
        assert!(tri.slope_equations().is_err());
    }
}
