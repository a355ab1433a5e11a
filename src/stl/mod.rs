//! STL geometry source.
//!
//! Reads the triangle+normal records the pipeline consumes. The pipeline
//! itself never touches the file format; it only sees [`SurfaceModel`].

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use crate::pipeline::PipelineError;

/// One raw triangle as reported by the source: three vertices plus the face
/// normal as supplied (not guaranteed normalized).
#[derive(Debug, Clone)]
pub struct Facet {
    pub vertices: [[f64; 3]; 3],
    pub normal: [f64; 3],
}

/// The surface groups read from a model file.
///
/// Only the first group is rasterized, but "no groups at all" and "an empty
/// first group" stay distinguishable for error reporting.
#[derive(Debug, Clone, Default)]
pub struct SurfaceModel {
    pub groups: Vec<Vec<Facet>>,
}

impl SurfaceModel {
    /// Wrap a single group of facets.
    pub fn from_facets(facets: Vec<Facet>) -> Self {
        Self {
            groups: vec![facets],
        }
    }

    /// Facet count of the first group.
    pub fn facet_count(&self) -> usize {
        self.groups.first().map_or(0, Vec::len)
    }
}

/// Read an STL file (binary or ASCII) into a surface model.
///
/// `stl_io` folds the whole file into a single mesh, so a parseable file
/// always yields exactly one surface group. Malformed STL data maps to
/// [`PipelineError::InvalidFormat`]; everything else stays an I/O failure.
pub fn read_stl(path: &Path) -> Result<SurfaceModel, PipelineError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mesh = stl_io::read_stl(&mut reader).map_err(map_read_error)?;

    let mut facets = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        let mut vertices = [[0.0f64; 3]; 3];
        for (slot, &index) in vertices.iter_mut().zip(face.vertices.iter()) {
            let vertex = mesh.vertices[index];
            *slot = [
                f64::from(vertex[0]),
                f64::from(vertex[1]),
                f64::from(vertex[2]),
            ];
        }
        facets.push(Facet {
            vertices,
            normal: [
                f64::from(face.normal[0]),
                f64::from(face.normal[1]),
                f64::from(face.normal[2]),
            ],
        });
    }

    Ok(SurfaceModel::from_facets(facets))
}

fn map_read_error(error: std::io::Error) -> PipelineError {
    if error.kind() == ErrorKind::InvalidData {
        PipelineError::InvalidFormat(error.to_string())
    } else {
        PipelineError::Io(error)
    }
}
