//! Error types for ownerref-renderer.

use std::path::PathBuf;

use thiserror::Error;
use yaml_rust2::scanner::ScanError;

/// Failure while adding owner references to one rendered file.
///
/// `document` is the zero-based index of the document within the file,
/// counting empty documents.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The document is not valid YAML (or JSON).
    #[error("error parsing rendered template to add ownerrefs (document {document}): {source}")]
    Parse {
        document: usize,
        #[source]
        source: YamlError,
    },

    /// The document parsed but is not an object with a mapping `metadata`.
    #[error("error converting rendered document {document} to an object: {reason}")]
    Convert { document: usize, reason: String },

    /// The annotated document could not be encoded back to YAML.
    #[error("error serializing rendered template with ownerrefs: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Why a single document could not be loaded.
#[derive(Debug, Error)]
pub enum YamlError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("alias refers to an unknown anchor")]
    UnknownAnchor,

    #[error("found {0} documents where one was expected")]
    MultipleDocuments(usize),
}

/// Errors returned by [`OwnerRefEngine`](crate::OwnerRefEngine).
#[derive(Debug, Error)]
pub enum RenderError<E> {
    /// The wrapped engine failed; its error is passed through untouched.
    #[error(transparent)]
    Engine(E),

    /// Owner-reference injection failed for `file`.
    #[error("failed to add ownerrefs to {file}: {source}")]
    Inject {
        file: String,
        #[source]
        source: InjectError,
    },
}

impl<E> RenderError<E> {
    /// The wrapped engine's error, if that is where the failure came from.
    pub fn engine_error(&self) -> Option<&E> {
        match self {
            RenderError::Engine(e) => Some(e),
            RenderError::Inject { .. } => None,
        }
    }
}

/// Errors from reading a directory of pre-rendered files.
#[derive(Debug, Error)]
pub enum DirError {
    /// The chart path is missing or not a directory.
    #[error("rendered output directory not found at {path}")]
    NotADirectory { path: PathBuf },

    /// Filesystem error while walking or reading.
    #[error("rendered output io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// A rendered file is not valid UTF-8.
    #[error("rendered file at {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}
