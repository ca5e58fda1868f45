#![deny(missing_docs)]
//! dimstamp core: image metadata lookup, fallback dimensions, and template tag rewriting.

/// Build configuration (asset roots and recognised file extensions).
pub mod config;
/// Memoized image metadata lookups.
pub mod cache;
/// Pixel geometry value type.
pub mod dimensions;
/// Core error types.
pub mod error;
/// Process-wide representative dimensions.
pub mod fallback;
/// Asset path resolution helpers.
pub mod paths;
/// Image header probing.
pub mod probe;
/// Per-tag rewrite outcomes.
pub mod report;
/// Build session tying cache, fallback and config together.
pub mod session;
/// Text-level `<img>` rewriting for template sources.
pub mod template;

pub use cache::DimensionCache;
pub use config::PluginConfig;
pub use dimensions::Dimensions;
pub use error::{ConfigError, ProbeError};
pub use fallback::FallbackDimensions;
pub use paths::{is_external_source, resolve_asset_path};
pub use probe::{FsProbe, ImageProbe};
pub use report::{RewriteReport, TagOutcome};
pub use session::BuildSession;
pub use template::{
    ImageTag, TagSource, TemplateRewrite, representative_source, rewrite_template,
    scan_image_tags,
};
