//! Mesh/plane intersection.
//!
//! Each triangle straddling the plane contributes one segment. Segments are
//! welded on their endpoints and chained into paths. Closed loops repeat
//! their first index at the end.

use super::TriangleMesh;
use crate::geometry::{Point3F, PointF};
use crate::slice::CrossSection;
use crate::CoordF;
use std::collections::HashMap;

/// Endpoints closer than this are merged.
const WELD_EPSILON: CoordF = 1e-6;

/// Cut `mesh` with the horizontal plane at `z`.
pub(super) fn section(mesh: &TriangleMesh, z: CoordF) -> Option<CrossSection> {
    let vertices = mesh.vertices();
    let segments: Vec<(PointF, PointF)> = mesh
        .faces()
        .iter()
        .filter_map(|f| triangle_segment([vertices[f[0]], vertices[f[1]], vertices[f[2]]], z))
        .collect();

    if segments.is_empty() {
        return None;
    }

    let (points, entities) = chain_segments(&segments);
    let points = points.into_iter().map(|p| p.with_z(z)).collect();
    Some(CrossSection::new(z, points, entities))
}

/// Segment where a triangle crosses the plane.
///
/// A vertex counts as above the plane only when strictly above it, so a
/// face lying in the plane contributes nothing and an edge on the plane is
/// reported once by the face rising from it.
fn triangle_segment(tri: [Point3F; 3], z: CoordF) -> Option<(PointF, PointF)> {
    let mut hits = [PointF::default(); 2];
    let mut count = 0;
    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        if let Some(p) = plane_edge_intersection(tri[a], tri[b], z) {
            if count < 2 {
                hits[count] = p;
            }
            count += 1;
        }
    }

    if count == 2 && weld_key(hits[0]) != weld_key(hits[1]) {
        Some((hits[0], hits[1]))
    } else {
        None
    }
}

fn plane_edge_intersection(a: Point3F, b: Point3F, z: CoordF) -> Option<PointF> {
    let (d_a, d_b) = (a.z - z, b.z - z);
    if (d_a > 0.0) == (d_b > 0.0) {
        return None;
    }
    let t = d_a / (d_a - d_b);
    Some(PointF::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t))
}

fn weld_key(p: PointF) -> (i64, i64) {
    (
        (p.x / WELD_EPSILON).round() as i64,
        (p.y / WELD_EPSILON).round() as i64,
    )
}

/// Chain segments into index paths over a shared vertex list.
fn chain_segments(segments: &[(PointF, PointF)]) -> (Vec<PointF>, Vec<Vec<usize>>) {
    let mut vertices = Vec::new();
    let mut lookup: HashMap<(i64, i64), usize> = HashMap::new();
    let mut weld = |p: PointF| -> usize {
        *lookup.entry(weld_key(p)).or_insert_with(|| {
            vertices.push(p);
            vertices.len() - 1
        })
    };

    let mut edges = Vec::with_capacity(segments.len());
    for &(p, q) in segments {
        let (a, b) = (weld(p), weld(q));
        if a != b {
            edges.push((a, b));
        }
    }

    let mut incident = vec![Vec::new(); vertices.len()];
    for (i, &(a, b)) in edges.iter().enumerate() {
        incident[a].push(i);
        incident[b].push(i);
    }

    let mut used = vec![false; edges.len()];
    let walk = |from: usize, until: usize, used: &mut [bool]| -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = from;
        loop {
            let Some(e) = incident[current].iter().copied().find(|&e| !used[e]) else {
                break;
            };
            used[e] = true;
            let (a, b) = edges[e];
            current = if a == current { b } else { a };
            path.push(current);
            if current == until {
                break;
            }
        }
        path
    };

    let mut entities = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let (start, next) = edges[first];

        let mut path = vec![start, next];
        path.extend(walk(next, start, &mut used[..]));

        if path.last() != Some(&start) {
            // Open chain: extend backwards from the start as well
            let mut back = walk(start, usize::MAX, &mut used[..]);
            back.reverse();
            back.extend(path);
            path = back;
        }
        entities.push(path);
    }

    (vertices, entities)
}
