//! The stateful plugin and its configuration.

use crate::batch::{BundleAsset, BundleOptions, BundleProcessingResult, process_bundle};
use crate::convert_error;
use crate::types::*;
use dimstamp_core::{Dimensions, PluginConfig, TemplateRewrite};
use napi_derive::napi;
use std::path::PathBuf;

/// Resolves JS options onto a validated [`PluginConfig`], keeping defaults for unset fields.
pub(crate) fn config_from_options(options: Option<PluginOptions>) -> napi::Result<PluginConfig> {
    let opts = options.unwrap_or_default();
    let mut config = PluginConfig::default();
    if let Some(root) = opts.root {
        config.root = PathBuf::from(root);
    }
    if let Some(public_dir) = opts.public_dir {
        config.public_dir = PathBuf::from(public_dir);
    }
    if let Some(out_dir) = opts.out_dir {
        config.out_dir = PathBuf::from(out_dir);
    }
    if let Some(extensions) = opts.template_extensions {
        config.template_extensions = extensions;
    }
    if let Some(extensions) = opts.markup_extensions {
        config.markup_extensions = extensions;
    }
    config.validate().map_err(convert_error)?;
    Ok(config)
}

pub(crate) fn to_entry(dims: Dimensions) -> DimensionsEntry {
    DimensionsEntry {
        width: dims.width,
        height: dims.height,
    }
}

fn to_details(rewrite: TemplateRewrite) -> TransformDetails {
    let report = &rewrite.report;
    let outcomes = serde_json::to_value(&report.outcomes)
        .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));
    TransformDetails {
        report: TransformReport {
            found: report.found() as u32,
            rewritten: report.rewritten() as u32,
            skipped: report.skipped() as u32,
            representative: report.representative.map(to_entry),
            promoted_fallback: report.promoted_fallback,
            outcomes,
        },
        code: rewrite.code,
        map: None,
    }
}

/// Stateful plugin exposed to Node callers; one instance spans a whole build.
#[napi(js_name = "ImageDimensionsPlugin")]
pub struct NodeImageDimensionsPlugin {
    pub(crate) inner: dimstamp_vite::ImageDimensionsPlugin,
}

#[napi]
impl NodeImageDimensionsPlugin {
    #[napi(constructor)]
    /// Creates a plugin whose cache and fallback persist across hook calls.
    pub fn new(options: Option<PluginOptions>) -> napi::Result<Self> {
        let config = config_from_options(options)?;
        Ok(Self {
            inner: dimstamp_vite::ImageDimensionsPlugin::new(config),
        })
    }

    /// Creates a plugin from a JSON config document.
    #[napi(factory, js_name = "fromJson")]
    pub fn from_json(json: String) -> napi::Result<Self> {
        let config = PluginConfig::from_json(&json).map_err(convert_error)?;
        Ok(Self {
            inner: dimstamp_vite::ImageDimensionsPlugin::new(config),
        })
    }

    /// `transform` hook: returns `{ code, map: null }`, or null when the module is unchanged.
    #[napi]
    pub fn transform(&self, code: String, id: String) -> Option<TransformResult> {
        self.inner
            .transform(&code, &id)
            .map(|result| TransformResult {
                code: result.code,
                map: result.map,
            })
    }

    /// Like `transform`, but also returns per-tag diagnostics.
    ///
    /// Returns null for ids that are not template units or sources without `<img`.
    #[napi(js_name = "transformWithReport")]
    pub fn transform_with_report(&self, code: String, id: String) -> Option<TransformDetails> {
        self.inner.session().transform(&id, &code).map(to_details)
    }

    /// Rewrites one HTML page against the output directory.
    #[napi(js_name = "rewriteHtml")]
    pub fn rewrite_html(&self, html: String) -> String {
        dimstamp_vite::rewrite_bundle_html(self.inner.session(), &html).html
    }

    /// `generateBundle` hook body: rewrites every markup asset, in parallel.
    #[napi(js_name = "generateBundle")]
    pub fn generate_bundle(
        &self,
        assets: Vec<BundleAsset>,
        options: Option<BundleOptions>,
    ) -> BundleProcessingResult {
        process_bundle(&self.inner, assets, options.unwrap_or_default())
    }

    /// Number of images with cached dimensions.
    #[napi(js_name = "cacheSize")]
    pub fn cache_size(&self) -> u32 {
        self.inner.session().resolver().len() as u32
    }

    /// Build-wide representative dimensions, once a template unit has set them.
    #[napi(js_name = "fallbackDimensions")]
    pub fn fallback_dimensions(&self) -> Option<DimensionsEntry> {
        self.inner.session().fallback().get().map(to_entry)
    }
}
