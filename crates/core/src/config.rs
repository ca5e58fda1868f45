//! Build configuration supplied by the host.

use crate::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_OUT_DIR: &str = "dist";
const DEFAULT_TEMPLATE_EXTENSIONS: &[&str] = &[".svelte"];
const DEFAULT_MARKUP_EXTENSIONS: &[&str] = &[".html"];

/// Asset roots and file filters for one build.
///
/// `public_dir` and `out_dir` are joined onto `root` unless they are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Project root that relative directories are resolved against.
    pub root: PathBuf,
    /// Directory literal template `src` paths are resolved against.
    #[serde(alias = "publicDir")]
    pub public_dir: PathBuf,
    /// Build output directory that bundled HTML `src` paths are resolved against.
    #[serde(alias = "outDir")]
    pub out_dir: PathBuf,
    /// Module id suffixes treated as template units.
    #[serde(alias = "templateExtensions")]
    pub template_extensions: Vec<String>,
    /// Emitted file name suffixes treated as markup pages.
    #[serde(alias = "markupExtensions")]
    pub markup_extensions: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            template_extensions: to_owned_list(DEFAULT_TEMPLATE_EXTENSIONS),
            markup_extensions: to_owned_list(DEFAULT_MARKUP_EXTENSIONS),
        }
    }
}

impl PluginConfig {
    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty extension filters, which would match every id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_extensions.iter().any(|ext| ext.is_empty()) {
            return Err(ConfigError::EmptyExtension {
                field: "template_extensions",
            });
        }
        if self.markup_extensions.iter().any(|ext| ext.is_empty()) {
            return Err(ConfigError::EmptyExtension {
                field: "markup_extensions",
            });
        }
        Ok(())
    }

    /// Root for literal `src` paths found in template sources.
    pub fn public_root(&self) -> PathBuf {
        self.root.join(&self.public_dir)
    }

    /// Root for `src` paths found in bundled HTML pages.
    pub fn dist_root(&self) -> PathBuf {
        self.root.join(&self.out_dir)
    }

    /// Whether the module id names a template unit.
    pub fn is_template_unit(&self, id: &str) -> bool {
        has_suffix(id, &self.template_extensions)
    }

    /// Whether the emitted asset is a markup page.
    pub fn is_markup_asset(&self, file_name: &str) -> bool {
        has_suffix(file_name, &self.markup_extensions)
    }

    /// Sets the project root (builder style).
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }
}

fn has_suffix(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
