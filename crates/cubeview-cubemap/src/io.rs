//! Reading face sets named `<prefix>_<SUFFIX>.<ext>`.

use std::path::{Path, PathBuf};

use crate::{CubeFace, CubeMapError, CubeMapSet};

/// Path of one face image: `dir/<prefix>_<SUFFIX>.<extension>`.
pub fn face_path(dir: &Path, prefix: &str, extension: &str, face: CubeFace) -> PathBuf {
    dir.join(format!("{prefix}_{}.{extension}", face.suffix()))
}

/// Outcome of loading one face set.
///
/// Loading never fails as a whole. Faces that could not be read, decoded,
/// or validated are listed in `failures` and left missing in `set`.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub set: CubeMapSet,
    pub failures: Vec<CubeMapError>,
}

/// Load the six faces `<prefix>_PX` .. `<prefix>_NZ` from `dir`.
///
/// Each failure is logged at `warn` and recorded; the first successfully
/// loaded face fixes the size the others must match.
pub fn load_cube_map(dir: &Path, prefix: &str, extension: &str) -> LoadReport {
    let mut report = LoadReport::default();
    for face in CubeFace::ALL {
        let path = face_path(dir, prefix, extension, face);
        let result = image::open(&path)
            .map_err(|source| CubeMapError::Image {
                face,
                path: path.clone(),
                source,
            })
            .and_then(|img| report.set.set_face(face, img.to_rgba8()));
        if let Err(err) = result {
            tracing::warn!("Cube map face skipped: {err}");
            report.failures.push(err);
        }
    }
    tracing::debug!(
        "Loaded cube map '{prefix}' from {}: {} of 6 faces, size {:?}",
        dir.display(),
        6 - report.set.missing_faces().len(),
        report.set.face_size(),
    );
    report
}
