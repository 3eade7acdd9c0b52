//! Serialization of solids to binary glTF (GLB) and STL.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::kernel::{Solid, TriangleMesh};

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
const GLB_VERSION: u32 = 2;
/// JSON chunk type
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
/// BIN chunk type
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

const STL_HEADER_LEN: usize = 80;

/// glTF component types
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// glTF buffer view targets
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("solid '{0}' has no geometry to export")]
    EmptySolid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build a GLB file with one node per mesh.
///
/// Meshes without triangles are skipped; if nothing remains the result is
/// empty.
pub fn build_glb(meshes: &[TriangleMesh]) -> Vec<u8> {
    let mut bin_data: Vec<u8> = Vec::new();

    struct MeshMeta<'a> {
        name: &'a str,
        vertex_count: usize,
        index_count: usize,
        pos_offset: usize,
        pos_length: usize,
        idx_offset: usize,
        idx_length: usize,
        pos_min: [f32; 3],
        pos_max: [f32; 3],
    }

    let mut metas: Vec<MeshMeta> = Vec::new();

    for mesh in meshes {
        if mesh.positions.is_empty() || mesh.is_empty() {
            continue;
        }

        let mut pos_min = [f32::MAX; 3];
        let mut pos_max = [f32::MIN; 3];
        for p in &mesh.positions {
            for axis in 0..3 {
                pos_min[axis] = pos_min[axis].min(p[axis]);
                pos_max[axis] = pos_max[axis].max(p[axis]);
            }
        }

        let pos_offset = bin_data.len();
        for p in &mesh.positions {
            for v in p {
                bin_data.extend_from_slice(&v.to_le_bytes());
            }
        }
        let pos_length = bin_data.len() - pos_offset;

        let idx_offset = bin_data.len();
        for i in &mesh.indices {
            bin_data.extend_from_slice(&i.to_le_bytes());
        }
        let idx_length = bin_data.len() - idx_offset;

        metas.push(MeshMeta {
            name: &mesh.name,
            vertex_count: mesh.positions.len(),
            index_count: mesh.indices.len(),
            pos_offset,
            pos_length,
            idx_offset,
            idx_length,
            pos_min,
            pos_max,
        });
    }

    if metas.is_empty() {
        return Vec::new();
    }

    // Two buffer views and accessors per mesh: positions, indices
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut gltf_meshes = Vec::new();
    let mut nodes = Vec::new();

    for (i, meta) in metas.iter().enumerate() {
        let base = i * 2;

        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": meta.pos_offset,
            "byteLength": meta.pos_length,
            "target": ARRAY_BUFFER
        }));
        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": meta.idx_offset,
            "byteLength": meta.idx_length,
            "target": ELEMENT_ARRAY_BUFFER
        }));

        accessors.push(serde_json::json!({
            "bufferView": base,
            "componentType": FLOAT,
            "count": meta.vertex_count,
            "type": "VEC3",
            "min": meta.pos_min,
            "max": meta.pos_max
        }));
        accessors.push(serde_json::json!({
            "bufferView": base + 1,
            "componentType": UNSIGNED_INT,
            "count": meta.index_count,
            "type": "SCALAR"
        }));

        gltf_meshes.push(serde_json::json!({
            "name": meta.name,
            "primitives": [{
                "attributes": { "POSITION": base },
                "indices": base + 1,
                "material": 0
            }]
        }));
        nodes.push(serde_json::json!({
            "name": meta.name,
            "mesh": i
        }));
    }

    let gltf_json = serde_json::json!({
        "asset": {
            "version": "2.0",
            "generator": concat!("cf-fan ", env!("CARGO_PKG_VERSION"))
        },
        "scene": 0,
        "scenes": [{
            "name": "Scene",
            "nodes": (0..metas.len()).collect::<Vec<_>>()
        }],
        "nodes": nodes,
        "meshes": gltf_meshes,
        "accessors": accessors,
        "bufferViews": buffer_views,
        "buffers": [{
            "byteLength": bin_data.len()
        }],
        "materials": [{
            "name": "Default",
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.7, 0.7, 0.72, 1.0],
                "metallicFactor": 0.1,
                "roughnessFactor": 0.6
            },
            "doubleSided": true
        }]
    });

    let mut json_bytes = serde_json::to_vec(&gltf_json).unwrap_or_default();

    // JSON pads with spaces, BIN with zeros
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    while bin_data.len() % 4 != 0 {
        bin_data.push(0);
    }

    let json_chunk_length = json_bytes.len() as u32;
    let bin_chunk_length = bin_data.len() as u32;
    let total_length: u32 = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length as usize);

    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());

    glb.extend_from_slice(&json_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&bin_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_data);

    glb
}

/// GLB of a solid, one node per body.
pub fn solid_to_glb(solid: &Solid) -> Result<Vec<u8>, ExportError> {
    let glb = build_glb(&solid.tessellate());
    if glb.is_empty() {
        return Err(ExportError::EmptySolid(solid.name().to_string()));
    }
    Ok(glb)
}

pub fn write_glb(solid: &Solid, path: &Path) -> Result<(), ExportError> {
    fs::write(path, solid_to_glb(solid)?)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Binary STL of every body of a solid.
pub fn to_stl(solid: &Solid) -> Result<Vec<u8>, ExportError> {
    let meshes = solid.tessellate();
    let triangle_count: usize = meshes.iter().map(TriangleMesh::triangle_count).sum();
    if triangle_count == 0 {
        return Err(ExportError::EmptySolid(solid.name().to_string()));
    }

    let mut stl = Vec::with_capacity(STL_HEADER_LEN + 4 + triangle_count * 50);

    let mut header = [0u8; STL_HEADER_LEN];
    let label = format!("cf-fan {}", solid.name());
    let n = label.len().min(STL_HEADER_LEN);
    header[..n].copy_from_slice(&label.as_bytes()[..n]);
    stl.extend_from_slice(&header);
    stl.extend_from_slice(&(triangle_count as u32).to_le_bytes());

    for mesh in &meshes {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.positions[tri[k] as usize]));
            let normal = (b - a).cross(c - a).normalize_or_zero();
            for v in [normal, a, b, c] {
                for component in v.to_array() {
                    stl.extend_from_slice(&component.to_le_bytes());
                }
            }
            // attribute byte count
            stl.extend_from_slice(&0u16.to_le_bytes());
        }
    }

    Ok(stl)
}

pub fn write_stl(solid: &Solid, path: &Path) -> Result<(), ExportError> {
    fs::write(path, to_stl(solid)?)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Write the print layout as GLB and every print part as STL into `dir`.
///
/// Returns the written paths, layout first.
pub fn write_print_files(
    layout: &Solid,
    parts: &[Solid],
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(parts.len() + 1);

    let layout_path = dir.join(format!("{}.glb", layout.name()));
    write_glb(layout, &layout_path)?;
    written.push(layout_path);

    for (i, part) in parts.iter().enumerate() {
        let path = dir.join(format!("{:02}_{}.stl", i, part.name()));
        write_stl(part, &path)?;
        written.push(path);
    }

    Ok(written)
}
