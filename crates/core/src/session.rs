//! The state shared by every hook invocation of one build.

use crate::template::{TemplateRewrite, rewrite_template};
use crate::{
    DimensionCache, Dimensions, FallbackDimensions, FsProbe, ImageProbe, PluginConfig,
    resolve_asset_path,
};
use std::path::{Path, PathBuf};

/// One build: configuration, the metadata cache, and the fallback cell.
///
/// Both rewrite phases borrow the same session, so a path probed while
/// transforming templates is served from cache when bundled pages are rewritten.
pub struct BuildSession<P: ImageProbe = FsProbe> {
    config: PluginConfig,
    public_root: PathBuf,
    dist_root: PathBuf,
    cache: DimensionCache<P>,
    fallback: FallbackDimensions,
}

impl BuildSession<FsProbe> {
    /// Creates a session that reads image headers from disk.
    pub fn new(config: PluginConfig) -> Self {
        Self::with_probe(config, FsProbe)
    }
}

impl Default for BuildSession<FsProbe> {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}

impl<P: ImageProbe> BuildSession<P> {
    /// Creates a session over a custom probe.
    pub fn with_probe(config: PluginConfig, probe: P) -> Self {
        Self {
            public_root: config.public_root(),
            dist_root: config.dist_root(),
            config,
            cache: DimensionCache::with_probe(probe),
            fallback: FallbackDimensions::new(),
        }
    }

    /// Build configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Shared metadata cache.
    pub fn resolver(&self) -> &DimensionCache<P> {
        &self.cache
    }

    /// Build-wide representative dimensions.
    pub fn fallback(&self) -> &FallbackDimensions {
        &self.fallback
    }

    /// Root for template `src` paths.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Root for bundled HTML `src` paths.
    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    /// Resolves a template `src` under the public root.
    pub fn resolve_public(&self, src: &str) -> Option<Dimensions> {
        resolve_asset_path(&self.public_root, src).and_then(|path| self.cache.resolve(&path))
    }

    /// Resolves a bundled page `src` under the output root.
    pub fn resolve_dist(&self, src: &str) -> Option<Dimensions> {
        resolve_asset_path(&self.dist_root, src).and_then(|path| self.cache.resolve(&path))
    }

    /// Transform hook body for one module.
    ///
    /// Returns `None` when the id is not a template unit or the source has no
    /// `<img` at all; otherwise the rewrite (whose `code` is `None` if nothing changed).
    pub fn transform(&self, id: &str, code: &str) -> Option<TemplateRewrite> {
        if !self.config.is_template_unit(id) || !code.contains("<img") {
            return None;
        }

        log::debug!("processing {}", display_name(id));
        let rewrite = rewrite_template(self, code);
        if rewrite.report.found() > 0 {
            log::debug!("{}: {}", display_name(id), rewrite.report.summary());
        }
        Some(rewrite)
    }
}

fn display_name(id: &str) -> &str {
    Path::new(id)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(id)
}
