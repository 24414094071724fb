//! Triangle mesh model.
//!
//! Loads STL files, cuts them with horizontal planes for the slicer and
//! applies the small repairs and placement fixes done before slicing:
//! - [`load_stl`] - ASCII and binary STL loading
//! - [`TriangleMesh`] - Indexed triangle mesh, a [`GeometrySource`]
//! - [`MeshRepair`] - Watertightness check, repair and transforms
//! - [`prepare_model`] - Repair, snap to Z=0 and scale up tiny models

mod section;
mod stl;

pub use stl::{load_stl, parse_stl};

use crate::geometry::Point3F;
use crate::slice::{CrossSection, GeometrySource, ModelExtent};
use crate::{CoordF, Error, Result};
use log::{info, warn};
use std::collections::{HashMap, HashSet};

/// Vertices closer than this are treated as one when welding.
const VERTEX_WELD_EPSILON: CoordF = 1e-6;

/// Models shorter than this (mm) are scaled up before slicing.
pub const MIN_MODEL_HEIGHT: CoordF = 1.0;

/// Scale factor applied to models shorter than [`MIN_MODEL_HEIGHT`].
pub const SMALL_MODEL_SCALE: CoordF = 10.0;

/// Mesh operations applied before slicing.
pub trait MeshRepair {
    /// True when every edge is shared by exactly two faces.
    fn is_watertight(&self) -> bool;

    /// Weld coincident vertices and drop degenerate or duplicate faces.
    fn repair(&mut self);

    /// Move every vertex by `offset`.
    fn translate(&mut self, offset: Point3F);

    /// Scale every vertex about the origin.
    fn scale(&mut self, factor: CoordF);
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Point3F>,
    faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from vertices and faces.
    ///
    /// Fails if a face references a missing vertex.
    pub fn new(vertices: Vec<Point3F>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(face) = faces.iter().find(|f| f.iter().any(|&i| i >= vertices.len())) {
            return Err(Error::Mesh(format!(
                "face {:?} references a vertex out of range ({} vertices)",
                face,
                vertices.len()
            )));
        }
        Ok(Self { vertices, faces })
    }

    /// Create an unwelded mesh, three vertices per triangle.
    pub fn from_triangles(triangles: &[[Point3F; 3]]) -> Self {
        let vertices = triangles.iter().flatten().copied().collect();
        let faces = (0..triangles.len())
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        Self { vertices, faces }
    }

    /// Closed axis-aligned box with outward-facing triangles.
    pub fn cuboid(min: Point3F, max: Point3F) -> Self {
        let vertices = vec![
            Point3F::new(min.x, min.y, min.z),
            Point3F::new(max.x, min.y, min.z),
            Point3F::new(max.x, max.y, min.z),
            Point3F::new(min.x, max.y, min.z),
            Point3F::new(min.x, min.y, max.z),
            Point3F::new(max.x, min.y, max.z),
            Point3F::new(max.x, max.y, max.z),
            Point3F::new(min.x, max.y, max.z),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self { vertices, faces }
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Point3F] {
        &self.vertices
    }

    /// Faces as vertex index triples.
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Component-wise minimum and maximum over the vertices.
    pub fn bounds(&self) -> Option<(Point3F, Point3F)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3F::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3F::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Merge vertices closer than the weld tolerance, remapping faces.
    fn weld_vertices(&mut self) -> usize {
        let mut lookup: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut welded = Vec::with_capacity(self.vertices.len());
        let remap: Vec<usize> = self
            .vertices
            .iter()
            .map(|&v| {
                *lookup.entry(vertex_key(v)).or_insert_with(|| {
                    welded.push(v);
                    welded.len() - 1
                })
            })
            .collect();

        for face in &mut self.faces {
            for i in face.iter_mut() {
                *i = remap[*i];
            }
        }

        let merged = self.vertices.len() - welded.len();
        self.vertices = welded;
        merged
    }

    /// Drop vertices no face points at, remapping faces.
    fn remove_unreferenced_vertices(&mut self) -> usize {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for face in &mut self.faces {
            for i in face.iter_mut() {
                if remap[*i] == usize::MAX {
                    remap[*i] = kept.len();
                    kept.push(self.vertices[*i]);
                }
                *i = remap[*i];
            }
        }

        let dropped = self.vertices.len() - kept.len();
        self.vertices = kept;
        dropped
    }

    fn is_degenerate(&self, face: &[usize; 3]) -> bool {
        let [a, b, c] = *face;
        if a == b || b == c || a == c {
            return true;
        }
        let (p, q, r) = (self.vertices[a], self.vertices[b], self.vertices[c]);
        let (u, v) = (q - p, r - p);
        let cross = Point3F::new(
            u.y * v.z - u.z * v.y,
            u.z * v.x - u.x * v.z,
            u.x * v.y - u.y * v.x,
        );
        cross.distance_squared(&Point3F::default()) < VERTEX_WELD_EPSILON * VERTEX_WELD_EPSILON
    }
}

fn vertex_key(p: Point3F) -> (i64, i64, i64) {
    (
        (p.x / VERTEX_WELD_EPSILON).round() as i64,
        (p.y / VERTEX_WELD_EPSILON).round() as i64,
        (p.z / VERTEX_WELD_EPSILON).round() as i64,
    )
}

fn sorted(face: [usize; 3]) -> [usize; 3] {
    let mut f = face;
    f.sort_unstable();
    f
}

impl MeshRepair for TriangleMesh {
    fn is_watertight(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let canonical: Vec<(i64, i64, i64)> = self.vertices.iter().map(|&v| vertex_key(v)).collect();
        let mut edges: HashMap<((i64, i64, i64), (i64, i64, i64)), u32> = HashMap::new();
        for face in &self.faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                let (ka, kb) = (canonical[a], canonical[b]);
                if ka == kb {
                    continue;
                }
                let key = if ka < kb { (ka, kb) } else { (kb, ka) };
                *edges.entry(key).or_insert(0) += 1;
            }
        }

        !edges.is_empty() && edges.values().all(|&n| n == 2)
    }

    fn repair(&mut self) {
        let merged = self.weld_vertices();

        let before = self.faces.len();
        let mut seen = HashSet::new();
        let faces = std::mem::take(&mut self.faces);
        self.faces = faces
            .into_iter()
            .filter(|f| !self.is_degenerate(f) && seen.insert(sorted(*f)))
            .collect();
        let removed = before - self.faces.len();
        let merged = merged + self.remove_unreferenced_vertices();

        info!(
            "Mesh repair: removed {} vertices and {} faces",
            merged, removed
        );
    }

    fn translate(&mut self, offset: Point3F) {
        for v in &mut self.vertices {
            v.x += offset.x;
            v.y += offset.y;
            v.z += offset.z;
        }
    }

    fn scale(&mut self, factor: CoordF) {
        for v in &mut self.vertices {
            v.x *= factor;
            v.y *= factor;
            v.z *= factor;
        }
    }
}

impl GeometrySource for TriangleMesh {
    fn extent(&self) -> Option<ModelExtent> {
        if self.is_empty() {
            return None;
        }
        self.bounds().map(|(lo, hi)| ModelExtent::new(lo.z, hi.z))
    }

    fn cross_section(&self, z: CoordF) -> Option<CrossSection> {
        section::section(self, z)
    }
}

/// Get a loaded model ready for slicing.
///
/// Repairs a non-watertight mesh, moves the model so it rests on Z=0 and
/// scales models shorter than [`MIN_MODEL_HEIGHT`] by [`SMALL_MODEL_SCALE`].
pub fn prepare_model<M: MeshRepair + GeometrySource>(mesh: &mut M) -> Result<()> {
    if !mesh.is_watertight() {
        warn!("Model is not watertight, attempting repair");
        mesh.repair();
        if !mesh.is_watertight() {
            warn!("Model is still not watertight after repair");
        }
    }

    let extent = mesh
        .extent()
        .ok_or_else(|| Error::Mesh("model has no geometry".into()))?;

    if extent.min_z != 0.0 {
        mesh.translate(Point3F::new(0.0, 0.0, -extent.min_z));
        info!("Model snapped to Z=0 (moved by {:.3})", -extent.min_z);
    }

    if extent.height() < MIN_MODEL_HEIGHT {
        mesh.scale(SMALL_MODEL_SCALE);
        info!("Model scaled up by {}x", SMALL_MODEL_SCALE);
    }

    Ok(())
}
