//! STL loading (ASCII and binary).

use super::TriangleMesh;
use crate::geometry::Point3F;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

/// Load an STL file, detecting ASCII or binary content.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let mesh = parse_stl(&bytes)?;
    if mesh.is_empty() {
        return Err(Error::Mesh(format!("{} contains no triangles", path.display())));
    }
    Ok(mesh)
}

/// Parse STL content from memory.
pub fn parse_stl(bytes: &[u8]) -> Result<TriangleMesh> {
    if bytes.len() < 6 {
        return Err(Error::Mesh("file too small to be valid STL".into()));
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)]);
    if head.trim_start().starts_with("solid") && !is_binary(bytes) {
        parse_ascii(bytes)
    } else {
        parse_binary(bytes)
    }
}

/// Binary files may also start with "solid"; a NUL in the header or a size
/// matching the face count marks them as binary.
fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE + 4 {
        return false;
    }
    if bytes[..HEADER_SIZE].contains(&0) {
        return true;
    }
    let count = face_count(bytes) as usize;
    bytes.len() == HEADER_SIZE + 4 + count * TRIANGLE_SIZE
}

fn face_count(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ])
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(Error::Mesh("binary STL header is truncated".into()));
    }

    let count = face_count(bytes) as usize;
    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * TRIANGLE_SIZE {
        return Err(Error::Mesh(format!(
            "binary STL declares {} faces but holds {}",
            count,
            body.len() / TRIANGLE_SIZE
        )));
    }

    let mut triangles = Vec::with_capacity(count);
    for chunk in body.chunks_exact(TRIANGLE_SIZE).take(count) {
        // Normal (12 bytes) is recomputed when needed
        triangles.push([
            read_vertex(&chunk[12..24]),
            read_vertex(&chunk[24..36]),
            read_vertex(&chunk[36..48]),
        ]);
    }
    Ok(TriangleMesh::from_triangles(&triangles))
}

fn read_vertex(buf: &[u8]) -> Point3F {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3F::new(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(bytes: &[u8]) -> Result<TriangleMesh> {
    let mut triangles = Vec::new();
    let mut facet: Vec<Point3F> = Vec::with_capacity(3);

    for (number, line) in BufReader::new(bytes).lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("outer") => facet.clear(),
            Some("vertex") => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| Error::Mesh(format!("line {}: {}", number + 1, e)))?;
                if coords.len() != 3 {
                    return Err(Error::Mesh(format!(
                        "line {}: vertex needs three coordinates",
                        number + 1
                    )));
                }
                facet.push(Point3F::new(coords[0], coords[1], coords[2]));
            }
            Some("endfacet") => {
                if let [a, b, c] = facet.as_slice() {
                    triangles.push([*a, *b, *c]);
                }
                facet.clear();
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(TriangleMesh::from_triangles(&triangles))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TRIANGLE: &str = "solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test
";

    fn binary_triangle() -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 12]);
        for v in [[0.0f32, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 1.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]);
        bytes
    }

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertices()[1], Point3F::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_binary() {
        let mesh = parse_stl(&binary_triangle()).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertices()[2], Point3F::new(0.0, 2.0, 1.0));
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut bytes = binary_triangle();
        bytes[..5].copy_from_slice(b"solid");
        for b in bytes[5..HEADER_SIZE].iter_mut() {
            *b = b' ';
        }
        let mesh = parse_stl(&bytes).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_truncated_binary() {
        let bytes = binary_triangle();
        assert!(parse_stl(&bytes[..bytes.len() - 10]).is_err());
    }

    #[test]
    fn test_bad_vertex() {
        let text = ASCII_TRIANGLE.replace("vertex 1 0 0", "vertex 1 zero 0");
        assert!(matches!(parse_stl(text.as_bytes()), Err(Error::Mesh(_))));
    }

    #[test]
    fn test_load_stl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        std::fs::write(&path, ASCII_TRIANGLE).unwrap();
        assert_eq!(load_stl(&path).unwrap().face_count(), 1);

        let empty = dir.path().join("empty.stl");
        std::fs::write(&empty, "solid empty\nendsolid empty\n").unwrap();
        assert!(matches!(load_stl(&empty), Err(Error::Mesh(_))));

        assert!(matches!(
            load_stl(dir.path().join("missing.stl")),
            Err(Error::Io(_))
        ));
    }
}
