//! Bundler hook facade over a [`BuildSession`].
//!
//! Mirrors the plugin contract of the host: `transform` is called once per
//! module while compiling, `generate_bundle` once with every emitted asset.

use crate::html::{BundleRewrite, rewrite_bundle_html};
use dimstamp_core::{BuildSession, FsProbe, ImageProbe, PluginConfig};
use serde::Serialize;

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "vite-plugin-image-dimensions";
/// Only active for production builds.
pub const PLUGIN_APPLY: &str = "build";
/// Must run before the template compiler sees the source.
pub const PLUGIN_ENFORCE: &str = "pre";

/// Replacement module text returned from `transform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    /// Rewritten source.
    pub code: String,
    /// Source map; always `None` since edits only append attributes.
    pub map: Option<String>,
}

/// One emitted file handed to `generate_bundle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputAsset {
    /// Output file name relative to the output directory.
    pub file_name: String,
    /// Serialized file contents.
    pub source: String,
}

impl OutputAsset {
    /// Creates an asset.
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

/// Totals for one `generate_bundle` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BundleSummary {
    /// Markup pages visited.
    pub pages: usize,
    /// Pages whose text changed.
    pub rewritten_pages: usize,
    /// `<img>` elements sized across all pages.
    pub sized: usize,
}

impl BundleSummary {
    /// Folds one page result into the totals.
    pub fn record(&mut self, page: &BundleRewrite) {
        self.pages += 1;
        if page.is_changed() {
            self.rewritten_pages += 1;
        }
        self.sized += page.sized;
    }
}

/// Image dimension plugin: one instance per build.
pub struct ImageDimensionsPlugin<P: ImageProbe = FsProbe> {
    session: BuildSession<P>,
}

impl ImageDimensionsPlugin<FsProbe> {
    /// Creates a plugin reading images from disk.
    pub fn new(config: PluginConfig) -> Self {
        Self::with_session(BuildSession::new(config))
    }
}

impl<P: ImageProbe> ImageDimensionsPlugin<P> {
    /// Wraps an existing session.
    pub fn with_session(session: BuildSession<P>) -> Self {
        Self { session }
    }

    /// The shared build state.
    pub fn session(&self) -> &BuildSession<P> {
        &self.session
    }

    /// `transform` hook: returns replacement code, or `None` to leave the module as is.
    pub fn transform(&self, code: &str, id: &str) -> Option<TransformResult> {
        let rewrite = self.session.transform(id, code)?;
        rewrite.code.map(|code| TransformResult { code, map: None })
    }

    /// Rewrites one emitted file if it is a markup page.
    pub fn rewrite_page(&self, file_name: &str, source: &str) -> Option<BundleRewrite> {
        if !self.session.config().is_markup_asset(file_name) {
            return None;
        }
        let page = rewrite_bundle_html(&self.session, source);
        if page.is_changed() {
            log::info!("{}: sized {} image(s)", file_name, page.sized);
        }
        Some(page)
    }

    /// `generateBundle` hook: rewrites every markup asset in place.
    pub fn generate_bundle(&self, assets: &mut [OutputAsset]) -> BundleSummary {
        let mut summary = BundleSummary::default();
        for asset in assets.iter_mut() {
            if let Some(page) = self.rewrite_page(&asset.file_name, &asset.source) {
                summary.record(&page);
                asset.source = page.html;
            }
        }
        summary
    }
}
