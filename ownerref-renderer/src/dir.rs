//! [`RenderedDir`] — a [`RenderEngine`] over a directory of already-rendered
//! files, such as the output of `helm template --output-dir`.

use std::path::{Path, PathBuf};

use crate::engine::{RenderEngine, RenderedFiles};
use crate::error::DirError;

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DirError {
    DirError::Io { path: path.into(), source }
}

/// File names are relative to the directory root and always use `/`.
fn normalize_file_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), DirError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Reads every regular file under the chart directory. Values are ignored;
/// the files are returned exactly as they are on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderedDir;

impl RenderEngine for RenderedDir {
    type Chart = Path;
    type Values = ();
    type Error = DirError;

    fn render(&self, dir: &Path, _values: &()) -> Result<RenderedFiles, DirError> {
        if !dir.is_dir() {
            return Err(DirError::NotADirectory { path: dir.to_path_buf() });
        }
        let mut paths = Vec::new();
        collect_files(dir, &mut paths)?;

        let mut files = RenderedFiles::new();
        for path in paths {
            let bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
            let text = String::from_utf8(bytes).map_err(|_| DirError::NotUtf8 { path: path.clone() })?;
            let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
            files.insert(normalize_file_name(rel), text);
        }
        Ok(files)
    }
}
