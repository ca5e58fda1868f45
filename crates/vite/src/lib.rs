#![deny(missing_docs)]
//! dimstamp bundler layer: build hooks and post-bundle HTML rewriting.

/// Post-bundle `<img>` sizing over emitted HTML pages.
pub mod html;
/// Host hook facade (`transform` / `generateBundle`).
pub mod plugin;

pub use dimstamp_core::{BuildSession, Dimensions, PluginConfig};
pub use html::{BundleRewrite, rewrite_bundle_html};
pub use plugin::{
    BundleSummary, ImageDimensionsPlugin, OutputAsset, PLUGIN_APPLY, PLUGIN_ENFORCE, PLUGIN_NAME,
    TransformResult,
};
