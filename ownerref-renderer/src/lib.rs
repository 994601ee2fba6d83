//! # ownerref-renderer
//!
//! Decorates a chart rendering engine so that every manifest it produces is
//! owned by a fixed set of Kubernetes owner references.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use ownerref_core::types::controller_reference;
//! use ownerref_renderer::{new_owner_ref_engine, RenderEngine, RenderedDir};
//!
//! fn annotate(dir: &Path) {
//!     let owner = controller_reference("app/v1", "MyApp", "instance1", "abc-123");
//!     let engine = new_owner_ref_engine(RenderedDir, vec![owner]);
//!     if let Ok(files) = engine.render(dir, &()) {
//!         for (name, text) in files {
//!             println!("{name}: {} bytes", text.len());
//!         }
//!     }
//! }
//! ```

pub mod decorator;
pub mod dir;
pub mod document;
pub mod engine;
pub mod error;
pub mod yaml;

pub use decorator::{new_owner_ref_engine, OwnerRefEngine};
pub use dir::RenderedDir;
pub use document::{inject_owner_refs, split_documents, ManifestObject};
pub use engine::{RenderEngine, RenderedFiles};
pub use error::{DirError, InjectError, RenderError, YamlError};
pub use yaml::load_document;
