//! STL file loading and saving

use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use super::Mesh;
use super::normals::calculate_face_normals;
use crate::constants::STL_VERTEX_PRECISION;

/// Load an STL file (binary or ASCII) into a welded mesh
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, StlError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| StlError::Io(e.to_string()))?;
    read_stl(&mut BufReader::new(file))
}

/// Load an STL mesh from bytes
pub fn load_stl_from_bytes(data: &[u8]) -> Result<Mesh, StlError> {
    read_stl(&mut Cursor::new(data))
}

fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh, StlError> {
    let mesh = stl_io::read_stl(reader).map_err(|e| StlError::Parse(e.to_string()))?;
    let (vertices, indices) = index_mesh(&mesh);
    tracing::debug!(
        "Read STL with {} vertices and {} triangles",
        vertices.len(),
        indices.len() / 3
    );
    Ok(Mesh::new(vertices, Vec::new(), indices))
}

/// Convert triangle soup to an indexed mesh, welding coincident vertices
fn index_mesh(mesh: &stl_io::IndexedMesh) -> (Vec<[f32; 3]>, Vec<u32>) {
    let mut unique_vertices: Vec<[f32; 3]> = Vec::new();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        for &vertex_idx in &face.vertices {
            let vertex = mesh.vertices[vertex_idx];
            let v = [vertex[0], vertex[1], vertex[2]];

            let key = [
                (v[0] * STL_VERTEX_PRECISION).round() as i32,
                (v[1] * STL_VERTEX_PRECISION).round() as i32,
                (v[2] * STL_VERTEX_PRECISION).round() as i32,
            ];

            let index = *vertex_map.entry(key).or_insert_with(|| {
                unique_vertices.push(v);
                (unique_vertices.len() - 1) as u32
            });
            indices.push(index);
        }
    }

    (unique_vertices, indices)
}

/// Save meshes (already in world space) as one binary STL file
pub fn save_stl<'a>(
    meshes: impl IntoIterator<Item = &'a Mesh>,
    path: impl AsRef<Path>,
) -> Result<usize, StlError> {
    let mut file = std::fs::File::create(path.as_ref()).map_err(|e| StlError::Io(e.to_string()))?;
    write_stl(meshes, &mut file)
}

/// Write meshes as binary STL, returning the number of triangles written
pub fn write_stl<'a, W: Write>(
    meshes: impl IntoIterator<Item = &'a Mesh>,
    writer: &mut W,
) -> Result<usize, StlError> {
    let mut triangles = Vec::new();
    for mesh in meshes {
        let normals = calculate_face_normals(&mesh.vertices, &mesh.indices);
        for (chunk, normal) in mesh.indices.chunks_exact(3).zip(normals) {
            triangles.push(stl_io::Triangle {
                normal: stl_io::Normal::new(normal),
                vertices: [
                    stl_io::Vertex::new(mesh.vertices[chunk[0] as usize]),
                    stl_io::Vertex::new(mesh.vertices[chunk[1] as usize]),
                    stl_io::Vertex::new(mesh.vertices[chunk[2] as usize]),
                ],
            });
        }
    }

    stl_io::write_stl(writer, triangles.iter()).map_err(|e| StlError::Write(e.to_string()))?;
    Ok(triangles.len())
}

/// STL-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StlError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Write error: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::generate_box_mesh;

    #[test]
    fn test_write_then_read_welds_box() {
        let cube = Mesh::from(generate_box_mesh([1.0, 1.0, 1.0]));
        let mut bytes = Vec::new();
        let written = write_stl([&cube], &mut bytes).unwrap();
        assert_eq!(written, 12);

        let loaded = load_stl_from_bytes(&bytes).unwrap();
        // 24 face vertices collapse to the 8 corners
        assert_eq!(loaded.vertices.len(), 8);
        assert_eq!(loaded.triangle_count(), 12);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        let cube = Mesh::from(generate_box_mesh([2.0, 2.0, 2.0]));
        save_stl([&cube], &path).unwrap();

        let loaded = load_stl(&path).unwrap();
        let size = loaded.bounds().unwrap().size();
        assert!((size.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = load_stl_from_bytes(b"definitely not an stl");
        assert!(result.is_err());
    }
}
