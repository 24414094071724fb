//! End-to-end tests: geometry source → layers → G-code → reconstructed toolpath.

use std::fs;
use toolpath::{
    extract_contours, load_stl, prepare_model, reconstruct, reconstruct_file, slice_heights,
    CrossSection, Error, GeometrySource, ModelExtent, PlanarSection, Point3F, PointF,
    PrintConfig, PrintPipeline, Slicer, TriangleMesh,
};

/// Square column of side `size`, answering every plane inside its extent.
struct Column {
    extent: ModelExtent,
    size: f64,
}

impl Column {
    fn new(height: f64, size: f64) -> Self {
        Self {
            extent: ModelExtent::new(0.0, height),
            size,
        }
    }
}

impl GeometrySource for Column {
    fn extent(&self) -> Option<ModelExtent> {
        Some(self.extent)
    }

    fn cross_section(&self, z: f64) -> Option<CrossSection> {
        if z < self.extent.min_z || z >= self.extent.max_z {
            return None;
        }
        let s = self.size;
        let vertices = vec![
            Point3F::new(0.0, 0.0, z),
            Point3F::new(s, 0.0, z),
            Point3F::new(s, s, z),
            Point3F::new(0.0, s, z),
        ];
        Some(CrossSection::new(z, vertices, vec![vec![0, 1, 2, 3, 0]]))
    }
}

fn config() -> PrintConfig {
    PrintConfig::new()
        .layer_height(0.5)
        .feed_rate(1200.0)
        .extrusion_width(0.4)
        .infill_spacing(5.0)
}

/// Split a stream into per-layer blocks, keyed by the "; Layer i" comment.
fn layer_blocks(lines: &[String]) -> Vec<Vec<String>> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    for line in lines {
        if line.starts_with("; Layer ") {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line.clone());
        }
    }
    blocks
}

#[test]
fn test_infill_only_on_interior_layers() {
    let pipeline = PrintPipeline::new(config());
    let gcode = pipeline.process(&Column::new(2.5, 10.0)).unwrap();
    assert_eq!(gcode.stats().layer_count, 5);

    let blocks = layer_blocks(gcode.lines());
    assert_eq!(blocks.len(), 5);

    let with_infill: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.iter().any(|l| l == "; Grid infill pattern"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(with_infill, vec![1, 2, 3]);

    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block[0], format!("; Layer {}", i));
        assert!(block[1].starts_with("G1 Z"));
        assert!(block[1].ends_with("F500"));
        assert!(block.iter().any(|l| l == "; Perimeter walls"));
    }
}

#[test]
fn test_emission_is_idempotent() {
    let pipeline = PrintPipeline::new(config());
    let column = Column::new(2.0, 8.0);

    let first = pipeline.process(&column).unwrap();
    let second = pipeline.process(&column).unwrap();
    assert_eq!(first.content(), second.content());
}

#[test]
fn test_reconstruction_follows_every_planar_move() {
    let pipeline = PrintPipeline::new(config());
    let gcode = pipeline.process(&Column::new(1.5, 10.0)).unwrap();

    let planar_moves = gcode
        .lines()
        .iter()
        .filter(|l| l.starts_with("G1 X"))
        .count();
    let reconstruction = reconstruct(gcode.lines());

    assert_eq!(reconstruction.len(), planar_moves);
    assert_eq!(reconstruction.len(), gcode.stats().motion_count - 3);
    assert_eq!(reconstruction.distinct_z_levels(), vec![0.0, 0.5, 1.0]);

    let (lo, hi) = reconstruction.bounds().unwrap();
    assert_eq!((lo.x, lo.y), (0.0, 0.0));
    assert_eq!((hi.x, hi.y), (10.0, 10.0));
}

/// Square frustum shrinking by 0.75 mm per side for every mm of height.
struct Frustum {
    extent: ModelExtent,
}

impl GeometrySource for Frustum {
    fn extent(&self) -> Option<ModelExtent> {
        Some(self.extent)
    }

    fn cross_section(&self, z: f64) -> Option<CrossSection> {
        if z < self.extent.min_z || z >= self.extent.max_z {
            return None;
        }
        let (lo, hi) = (0.123 + 0.75 * z, 10.456 - 0.75 * z);
        let vertices = vec![
            Point3F::new(lo, lo, z),
            Point3F::new(hi, lo, z),
            Point3F::new(hi, hi, z),
            Point3F::new(lo, hi, z),
        ];
        Some(CrossSection::new(z, vertices, vec![vec![0, 1, 2, 3, 0]]))
    }
}

/// Replay `G1` lines with sticky axes, one point per line carrying X or Y.
fn track_planar_moves(lines: &[String]) -> Vec<Point3F> {
    let (mut x, mut y, mut z) = (None, None, 0.0);
    let mut points = Vec::new();
    for line in lines {
        let mut words = line.split_whitespace();
        if words.next() != Some("G1") {
            continue;
        }
        let mut planar = false;
        for word in words {
            if let Some(v) = word.strip_prefix('X') {
                x = Some(v.parse::<f64>().unwrap());
                planar = true;
            } else if let Some(v) = word.strip_prefix('Y') {
                y = Some(v.parse::<f64>().unwrap());
                planar = true;
            } else if let Some(v) = word.strip_prefix('Z') {
                z = v.parse::<f64>().unwrap();
            }
        }
        if let (true, Some(x), Some(y)) = (planar, x, y) {
            points.push(Point3F::new(x, y, z));
        }
    }
    points
}

#[test]
fn test_reconstructed_points_match_emitted_moves() {
    let source = Frustum {
        extent: ModelExtent::new(0.0, 5.0),
    };
    let config = config().feed_rate(1500.5).infill_spacing(1.5);
    let gcode = PrintPipeline::new(config).process(&source).unwrap();
    assert_eq!(gcode.stats().layer_count, 10);
    assert!(gcode.lines().iter().any(|l| l.contains(" F1500.5")));

    let expected = track_planar_moves(gcode.lines());
    let reconstruction = reconstruct(gcode.lines());

    assert!(!expected.is_empty());
    assert_eq!(reconstruction.points, expected);

    let last = *expected.last().unwrap();
    assert_eq!(reconstruction.cursor.x, Some(last.x));
    assert_eq!(reconstruction.cursor.y, Some(last.y));
    assert!((reconstruction.cursor.z - 4.5).abs() < 1e-9);

    // Every layer's first perimeter point sits at that layer's emitted Z
    let layer_starts: Vec<f64> = gcode
        .lines()
        .iter()
        .filter_map(|l| l.strip_prefix("G1 Z"))
        .map(|rest| rest.split_whitespace().next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(reconstruction.distinct_z_levels(), layer_starts);
}

#[test]
fn test_flat_model_has_no_slices() {
    struct Flat;
    impl GeometrySource for Flat {
        fn extent(&self) -> Option<ModelExtent> {
            Some(ModelExtent::new(3.0, 3.0))
        }
        fn cross_section(&self, _z: f64) -> Option<CrossSection> {
            None
        }
    }

    assert!(matches!(
        Slicer::new(0.5).slice(&Flat),
        Err(Error::NoValidSlices)
    ));
    assert!(matches!(
        PrintPipeline::new(config()).process(&Flat),
        Err(Error::NoValidSlices)
    ));
}

#[test]
fn test_candidate_count_rounds_up() {
    let heights = slice_heights(0.0, 2.1, 0.5).unwrap();
    assert_eq!(heights.len(), 5);
    assert!(heights.iter().all(|&z| z < 2.1));

    let layers = Slicer::new(0.5).slice(&Column::new(2.1, 4.0)).unwrap();
    assert_eq!(layers.len(), 5);
    assert_eq!(
        layers.iter().map(|l| l.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
}

#[test]
fn test_short_entities_are_dropped() {
    let section = PlanarSection::new(
        vec![
            PointF::new(0.0, 0.0),
            PointF::new(4.0, 0.0),
            PointF::new(0.0, 4.0),
        ],
        vec![vec![0, 1, 2], vec![0, 1, 2, 0]],
    );
    let contours = extract_contours(&section, 0);
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].len(), 4);
}

#[test]
fn test_stl_to_toolpath_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let stl = dir.path().join("block.stl");
    let out = dir.path().join("block.gcode");

    let block = TriangleMesh::cuboid(Point3F::new(5.0, 5.0, 2.0), Point3F::new(15.0, 15.0, 4.0));
    let mut text = String::from("solid block\n");
    for face in block.faces() {
        text.push_str("facet normal 0 0 0\nouter loop\n");
        for &i in face {
            let v = block.vertices()[i];
            text.push_str(&format!("vertex {} {} {}\n", v.x, v.y, v.z));
        }
        text.push_str("endloop\nendfacet\n");
    }
    text.push_str("endsolid block\n");
    fs::write(&stl, text).unwrap();

    let mut mesh = load_stl(&stl).unwrap();
    prepare_model(&mut mesh).unwrap();
    let extent = mesh.extent().unwrap();
    assert_eq!(extent.min_z, 0.0);
    assert_eq!(extent.max_z, 2.0);

    let gcode = PrintPipeline::new(config()).process(&mesh).unwrap();
    assert_eq!(gcode.stats().layer_count, 4);
    gcode.write_to_file(&out).unwrap();

    let reconstruction = reconstruct_file(&out).unwrap();
    let (lo, hi) = reconstruction.bounds().unwrap();
    assert!((lo.x - 5.0).abs() < 1e-6 && (lo.y - 5.0).abs() < 1e-6);
    assert!((hi.x - 15.0).abs() < 1e-6 && (hi.y - 15.0).abs() < 1e-6);
    assert_eq!(reconstruction.distinct_z_levels(), vec![0.0, 0.5, 1.0, 1.5]);
}
