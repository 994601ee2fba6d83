//! [`OwnerRefEngine`] — wraps any [`RenderEngine`] and adds owner references
//! to every manifest it renders.

use ownerref_core::{InjectConfig, LogLevel, OwnerReference, DEFAULT_MANIFEST_SUFFIX};

use crate::document::inject_owner_refs;
use crate::engine::{RenderEngine, RenderedFiles};
use crate::error::RenderError;

/// Decorator that post-processes the wrapped engine's output.
///
/// Only files ending in the manifest suffix (`.yaml` by default) are kept.
/// Files whose documents are all empty are dropped. Any failure aborts the
/// whole render; no partial output is returned.
#[derive(Debug, Clone)]
pub struct OwnerRefEngine<E> {
    engine: E,
    refs: Vec<OwnerReference>,
    manifest_suffix: String,
    log_level: LogLevel,
}

/// Wrap `base` so that every rendered manifest is owned by `refs`.
pub fn new_owner_ref_engine<E: RenderEngine>(base: E, refs: Vec<OwnerReference>) -> OwnerRefEngine<E> {
    OwnerRefEngine::new(base, refs)
}

impl<E: RenderEngine> OwnerRefEngine<E> {
    pub fn new(engine: E, refs: Vec<OwnerReference>) -> Self {
        OwnerRefEngine {
            engine,
            refs,
            manifest_suffix: DEFAULT_MANIFEST_SUFFIX.to_string(),
            log_level: LogLevel::default(),
        }
    }

    /// Take references, suffix and log level from a loaded [`InjectConfig`].
    pub fn from_config(engine: E, config: InjectConfig) -> Self {
        OwnerRefEngine {
            engine,
            refs: config.owner_references,
            manifest_suffix: config.manifest_suffix,
            log_level: config.log_level,
        }
    }

    pub fn with_manifest_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.manifest_suffix = suffix.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn owner_references(&self) -> &[OwnerReference] {
        &self.refs
    }

    pub fn inner(&self) -> &E {
        &self.engine
    }

    pub fn into_inner(self) -> E {
        self.engine
    }

    fn diagnostic(&self, file: &str, message: &str) {
        match self.log_level {
            LogLevel::Info => tracing::info!(file, "{message}"),
            LogLevel::Debug => tracing::debug!(file, "{message}"),
        }
    }
}

impl<E: RenderEngine> RenderEngine for OwnerRefEngine<E> {
    type Chart = E::Chart;
    type Values = E::Values;
    type Error = RenderError<E::Error>;

    fn render(&self, chart: &Self::Chart, values: &Self::Values) -> Result<RenderedFiles, Self::Error> {
        let rendered = self.engine.render(chart, values).map_err(RenderError::Engine)?;

        let mut owned = RenderedFiles::new();
        for (file, text) in rendered {
            if !file.ends_with(&self.manifest_suffix) {
                continue;
            }
            self.diagnostic(&file, "adding ownerrefs to rendered file");
            let with_owner = inject_owner_refs(&text, &self.refs).map_err(|source| {
                RenderError::Inject { file: file.clone(), source }
            })?;
            if with_owner.is_empty() {
                self.diagnostic(&file, "skipping empty template");
                continue;
            }
            owned.insert(file, with_owner);
        }
        Ok(owned)
    }
}
