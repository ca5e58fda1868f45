//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Options passed to the plugin constructor.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    /// Project root; relative directories resolve against it. Defaults to `.`.
    pub root: Option<String>,
    /// Directory literal template `src` paths resolve against. Defaults to `public`.
    pub public_dir: Option<String>,
    /// Build output directory for bundled pages. Defaults to `dist`.
    pub out_dir: Option<String>,
    /// Module id suffixes treated as templates. Defaults to `[".svelte"]`.
    pub template_extensions: Option<Vec<String>>,
    /// Emitted file suffixes treated as HTML pages. Defaults to `[".html"]`.
    pub markup_extensions: Option<Vec<String>>,
}

/// Static plugin descriptor fields for the host.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct PluginMeta {
    /// Plugin name.
    pub name: String,
    /// Build phase the plugin applies to.
    pub apply: String,
    /// Ordering relative to other plugins.
    pub enforce: String,
}

/// Pixel size of an image.
#[napi(object)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionsEntry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Replacement module returned from the transform hook.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Rewritten source.
    pub code: String,
    /// Source map (always null; edits only append attributes).
    pub map: Option<String>,
}

/// Per-unit rewrite summary.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformReport {
    /// `<img>` tags found.
    pub found: u32,
    /// Tags that received dimensions.
    pub rewritten: u32,
    /// Tags left as authored.
    pub skipped: u32,
    /// Representative dimensions declared by this unit, if resolvable.
    pub representative: Option<DimensionsEntry>,
    /// Whether this unit set the build-wide fallback.
    pub promoted_fallback: bool,
    /// Per-tag outcomes as JSON objects (`{ kind, dimensions? }`).
    pub outcomes: JsonValue,
}

/// Transform result plus its diagnostics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformDetails {
    /// Rewritten source, or null when nothing changed.
    pub code: Option<String>,
    /// Source map (always null).
    pub map: Option<String>,
    /// What happened to each tag.
    pub report: TransformReport,
}
