//! The rendering-engine capability and its blanket implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Output of one render call: file name → rendered text.
pub type RenderedFiles = BTreeMap<String, String>;

/// Anything that can expand a chart with values into named rendered files.
///
/// `Chart` and `Values` are opaque to callers that only decorate the output;
/// they are forwarded unchanged. Implemented for `&E`, `Arc<E>` and `Box<E>`
/// so an existing engine can be wrapped without giving up ownership.
pub trait RenderEngine {
    type Chart: ?Sized;
    type Values: ?Sized;
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&self, chart: &Self::Chart, values: &Self::Values)
        -> Result<RenderedFiles, Self::Error>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for &E {
    type Chart = E::Chart;
    type Values = E::Values;
    type Error = E::Error;

    fn render(&self, chart: &Self::Chart, values: &Self::Values) -> Result<RenderedFiles, Self::Error> {
        (**self).render(chart, values)
    }
}

impl<E: RenderEngine + ?Sized> RenderEngine for Arc<E> {
    type Chart = E::Chart;
    type Values = E::Values;
    type Error = E::Error;

    fn render(&self, chart: &Self::Chart, values: &Self::Values) -> Result<RenderedFiles, Self::Error> {
        (**self).render(chart, values)
    }
}

impl<E: RenderEngine + ?Sized> RenderEngine for Box<E> {
    type Chart = E::Chart;
    type Values = E::Values;
    type Error = E::Error;

    fn render(&self, chart: &Self::Chart, values: &Self::Values) -> Result<RenderedFiles, Self::Error> {
        (**self).render(chart, values)
    }
}
