use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("Failed to read segment directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Newest segment file in `dir` with the given extension, or `None` when
/// there is nothing to classify yet.
///
/// Files are ordered by creation time (modification time where the
/// filesystem does not record one); equal times fall back to the greater
/// file name so the choice is stable for a given directory snapshot.
pub fn latest_segment(dir: &Path, extension: &str) -> Result<Option<PathBuf>, SegmentError> {
    let read_dir_error = |source| SegmentError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }

        // Segments rotate underneath us; a file can vanish between listing and stat.
        let created = match entry.metadata() {
            Ok(meta) if meta.is_file() => meta.created().or_else(|_| meta.modified()),
            Ok(_) => continue,
            Err(e) => Err(e),
        };
        match created {
            Ok(created) => candidates.push((created, entry.file_name().to_string_lossy().into_owned())),
            Err(e) => log::debug!("Skipping segment {}: {}", path.display(), e),
        }
    }

    let Some(name) = pick_latest(candidates) else {
        return Ok(None);
    };
    let path = std::path::absolute(dir.join(name)).map_err(read_dir_error)?;
    Ok(Some(path))
}

fn pick_latest(candidates: Vec<(SystemTime, String)>) -> Option<String> {
    candidates.into_iter().max().map(|(_, name)| name)
}
