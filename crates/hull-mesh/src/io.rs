//! Mesh and point cloud export for OBJ, STL and PLY.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use tracing::info;

use crate::Mesh;
use crate::error::{MeshError, MeshResult};

/// Supported mesh output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
    Ply,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(MeshFormat::Obj),
                "stl" => Some(MeshFormat::Stl),
                "ply" => Some(MeshFormat::Ply),
                _ => None,
            })
    }
}

/// Save mesh to file, choosing the format from the extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let format = MeshFormat::from_path(path).ok_or_else(|| {
        MeshError::unsupported_format(path.extension().and_then(|e| e.to_str()).map(String::from))
    })?;

    match format {
        MeshFormat::Obj => save_obj(mesh, path),
        MeshFormat::Stl => save_stl(mesh, path),
        MeshFormat::Ply => save_ply_ascii(mesh, path),
    }
}

fn create_writer(path: &Path) -> MeshResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| MeshError::io_write(path, e))?;
    Ok(BufWriter::new(file))
}

/// Save mesh to OBJ file (ASCII format).
///
/// Writes positions (`v`), normals (`vn`) when every vertex carries one,
/// and 1-based faces. With normals, faces use the `f v//n` form so that
/// each vertex points at its own normal.
pub fn save_obj(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let write_err = |e: std::io::Error| MeshError::io_write(path, e);
    let mut writer = create_writer(path)?;

    writeln!(writer, "# Vertices: {}", mesh.vertices.len()).map_err(write_err)?;
    writeln!(writer, "# Faces: {}", mesh.faces.len()).map_err(write_err)?;

    for v in &mesh.vertices {
        writeln!(
            writer,
            "v {:.6} {:.6} {:.6}",
            v.position.x, v.position.y, v.position.z
        )
        .map_err(write_err)?;
    }

    let has_normals = mesh.has_normals();
    if has_normals {
        for n in mesh.vertices.iter().filter_map(|v| v.normal.as_ref()) {
            writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z).map_err(write_err)?;
        }
    }

    for face in &mesh.faces {
        let [i0, i1, i2] = face.map(|i| i + 1);
        if has_normals {
            writeln!(writer, "f {i0}//{i0} {i1}//{i1} {i2}//{i2}").map_err(write_err)?;
        } else {
            writeln!(writer, "f {i0} {i1} {i2}").map_err(write_err)?;
        }
    }

    writer.flush().map_err(write_err)?;

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Saved OBJ"
    );

    Ok(())
}

/// Save mesh to binary STL file.
///
/// Face normals are written from the triangle geometry.
pub fn save_stl(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let mut writer = create_writer(path)?;

    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|tri| {
            let n = tri.normal().unwrap_or_else(Vector3::zeros);
            let vertex = |p: Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(tri.v0), vertex(tri.v1), vertex(tri.v2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::io_write(path, e))?;
    writer.flush().map_err(|e| MeshError::io_write(path, e))?;

    info!(path = %path.display(), triangles = triangles.len(), "Saved STL");

    Ok(())
}

fn float_property(name: &str) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(ScalarType::Float))
}

fn vertex_element(position: &Point3<f64>, normal: Option<&Vector3<f64>>) -> DefaultElement {
    let mut element = DefaultElement::new();
    element.insert("x".to_string(), Property::Float(position.x as f32));
    element.insert("y".to_string(), Property::Float(position.y as f32));
    element.insert("z".to_string(), Property::Float(position.z as f32));
    if let Some(n) = normal {
        element.insert("nx".to_string(), Property::Float(n.x as f32));
        element.insert("ny".to_string(), Property::Float(n.y as f32));
        element.insert("nz".to_string(), Property::Float(n.z as f32));
    }
    element
}

fn write_ply(mut ply: Ply<DefaultElement>, path: &Path) -> MeshResult<()> {
    ply.make_consistent().map_err(|e| {
        MeshError::io_write(
            path,
            std::io::Error::other(format!("PLY consistency error: {:?}", e)),
        )
    })?;

    let mut writer = create_writer(path)?;
    Writer::new()
        .write_ply(&mut writer, &mut ply)
        .map_err(|e| MeshError::io_write(path, e))?;
    writer.flush().map_err(|e| MeshError::io_write(path, e))?;
    Ok(())
}

/// Save mesh to ASCII PLY file, with normals when every vertex has one.
pub fn save_ply_ascii(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;

    let has_normals = mesh.has_normals();

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for name in ["x", "y", "z"] {
        vertex_def.properties.add(float_property(name));
    }
    if has_normals {
        for name in ["nx", "ny", "nz"] {
            vertex_def.properties.add(float_property(name));
        }
    }
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    ply.header.elements.add(face_def);

    let vertices = mesh
        .vertices
        .iter()
        .map(|v| vertex_element(&v.position, v.normal.as_ref().filter(|_| has_normals)))
        .collect();
    ply.payload.insert("vertex".to_string(), vertices);

    let faces = mesh
        .faces
        .iter()
        .map(|face| {
            let mut element = DefaultElement::new();
            element.insert(
                "vertex_indices".to_string(),
                Property::ListInt(face.iter().map(|&i| i as i32).collect()),
            );
            element
        })
        .collect();
    ply.payload.insert("face".to_string(), faces);

    write_ply(ply, path)?;

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Saved PLY"
    );

    Ok(())
}

/// Save a point cloud as an ASCII PLY file with a single vertex element.
pub fn save_point_cloud_ply(points: &[Point3<f64>], path: &Path) -> MeshResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for name in ["x", "y", "z"] {
        vertex_def.properties.add(float_property(name));
    }
    ply.header.elements.add(vertex_def);

    let vertices = points.iter().map(|p| vertex_element(p, None)).collect();
    ply.payload.insert("vertex".to_string(), vertices);

    write_ply(ply, path)?;

    info!(path = %path.display(), points = points.len(), "Saved point cloud");

    Ok(())
}
