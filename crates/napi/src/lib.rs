#![deny(missing_docs)]
//! Node.js bindings that surface dimstamp's image dimension plugin.

use dimstamp_core::{ConfigError, FsProbe, ImageProbe};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use std::path::Path;

/// Parallel bundle processing types and functions.
pub mod batch;
/// The stateful plugin and its configuration.
pub mod plugin;
/// NAPI-exposed data structures.
pub mod types;

pub use batch::*;
pub use plugin::NodeImageDimensionsPlugin;
pub use types::*;

/// Name, `apply` and `enforce` values for the host plugin object.
#[napi(js_name = "pluginMeta")]
pub fn plugin_meta() -> PluginMeta {
    PluginMeta {
        name: dimstamp_vite::PLUGIN_NAME.to_string(),
        apply: dimstamp_vite::PLUGIN_APPLY.to_string(),
        enforce: dimstamp_vite::PLUGIN_ENFORCE.to_string(),
    }
}

/// Reads the pixel size of one image file, or null if it cannot be read.
///
/// Uncached; plugin instances keep their own cache.
#[napi(js_name = "imageDimensions")]
pub fn image_dimensions(path: String) -> Option<DimensionsEntry> {
    FsProbe
        .probe(Path::new(&path))
        .ok()
        .map(plugin::to_entry)
}

fn convert_error(err: ConfigError) -> Error {
    Error::new(Status::InvalidArg, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, w, h) in [
            ("public/hero.png", 1200, 400),
            ("dist/a.png", 10, 20),
            ("dist/b.png", 30, 40),
        ] {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            image::RgbImage::new(w, h).save(&path).unwrap();
        }
        dir
    }

    fn plugin_for(dir: &TempDir) -> NodeImageDimensionsPlugin {
        NodeImageDimensionsPlugin::new(Some(PluginOptions {
            root: Some(dir.path().to_string_lossy().to_string()),
            ..PluginOptions::default()
        }))
        .unwrap()
    }

    #[test]
    fn options_fill_defaults() {
        let config = plugin::config_from_options(Some(PluginOptions {
            root: Some("/site".to_string()),
            out_dir: Some("build".to_string()),
            ..PluginOptions::default()
        }))
        .unwrap();
        assert_eq!(config.public_root(), Path::new("/site/public"));
        assert_eq!(config.dist_root(), Path::new("/site/build"));
        assert_eq!(config.template_extensions, vec![".svelte".to_string()]);
    }

    #[test]
    fn rejects_empty_extensions() {
        let err = plugin::config_from_options(Some(PluginOptions {
            template_extensions: Some(vec![String::new()]),
            ..PluginOptions::default()
        }))
        .unwrap_err();
        assert_eq!(err.status, Status::InvalidArg);
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(NodeImageDimensionsPlugin::from_json("{".to_string()).is_err());
        assert!(NodeImageDimensionsPlugin::from_json(r#"{"outDir": "out"}"#.to_string()).is_ok());
    }

    #[test]
    fn transform_returns_null_map() {
        let dir = project();
        let plugin = plugin_for(&dir);
        let result = plugin
            .transform(
                r#"images={[{ pc: '/hero.png' }]}<img src="{img.pc}">"#.to_string(),
                "/src/App.svelte".to_string(),
            )
            .unwrap();
        assert_eq!(
            result.code,
            r#"images={[{ pc: '/hero.png' }]}<img src="{img.pc}" width="1200" height="400">"#
        );
        assert!(result.map.is_none());
        assert_eq!(
            plugin.fallback_dimensions(),
            Some(DimensionsEntry {
                width: 1200,
                height: 400
            })
        );
    }

    #[test]
    fn transform_with_report_describes_tags() {
        let dir = project();
        let plugin = plugin_for(&dir);
        let details = plugin
            .transform_with_report(
                r#"<img src="https://x/y.png"><img src="{a}">"#.to_string(),
                "/src/App.svelte".to_string(),
            )
            .unwrap();
        assert!(details.code.is_none());
        assert_eq!(details.report.found, 2);
        assert_eq!(details.report.skipped, 2);
        assert_eq!(
            details.report.outcomes,
            serde_json::json!([{ "kind": "external" }, { "kind": "no_fallback" }])
        );
    }

    #[test]
    fn generate_bundle_rewrites_pages_in_order() {
        let dir = project();
        let plugin = plugin_for(&dir);
        let assets = vec![
            BundleAsset {
                file_name: "index.html".to_string(),
                source: r#"<img src="a.png">"#.to_string(),
            },
            BundleAsset {
                file_name: "assets/app.js".to_string(),
                source: "void 0".to_string(),
            },
            BundleAsset {
                file_name: "about/index.html".to_string(),
                source: r#"<img src="/b.png"><img src="/a.png">"#.to_string(),
            },
        ];
        let result = plugin.generate_bundle(assets, Some(BundleOptions { max_threads: Some(2) }));

        assert_eq!(result.assets[0].source, r#"<img src="a.png" width="10" height="20">"#);
        assert_eq!(result.assets[1].source, "void 0");
        assert_eq!(
            result.assets[2].source,
            r#"<img src="/b.png" width="30" height="40"><img src="/a.png" width="10" height="20">"#
        );
        assert_eq!(result.stats.total, 3);
        assert_eq!(result.stats.pages, 2);
        assert_eq!(result.stats.rewritten_pages, 2);
        assert_eq!(result.stats.sized, 3);
        assert_eq!(plugin.cache_size(), 2);
    }

    #[test]
    fn parallel_stats_match_sequential_summary() {
        let dir = project();
        let pages = [
            ("index.html", r#"<img src="a.png"><img src="missing.png">"#),
            ("404.html", r#"<img src="missing.png">"#),
            ("about.html", "<p>text</p>"),
            ("assets/app.css", "img{}"),
        ];
        let assets = pages
            .iter()
            .map(|(file_name, source)| BundleAsset {
                file_name: file_name.to_string(),
                source: source.to_string(),
            })
            .collect();
        let stats = plugin_for(&dir).generate_bundle(assets, None).stats;

        let mut outputs: Vec<_> = pages
            .iter()
            .map(|(file_name, source)| dimstamp_vite::OutputAsset::new(*file_name, *source))
            .collect();
        let summary = plugin_for(&dir).inner.generate_bundle(&mut outputs);

        assert_eq!(stats.pages as usize, summary.pages);
        assert_eq!(stats.rewritten_pages as usize, summary.rewritten_pages);
        assert_eq!(stats.sized as usize, summary.sized);
        assert_eq!((stats.pages, stats.rewritten_pages, stats.sized), (3, 1, 1));
    }

    #[test]
    fn image_dimensions_reads_headers() {
        let dir = project();
        let path = dir.path().join("dist/b.png").to_string_lossy().to_string();
        assert_eq!(
            image_dimensions(path),
            Some(DimensionsEntry {
                width: 30,
                height: 40
            })
        );
        assert_eq!(image_dimensions("/definitely/missing.png".to_string()), None);
    }

    #[test]
    fn meta_matches_host_contract() {
        let meta = plugin_meta();
        assert_eq!(meta.name, "vite-plugin-image-dimensions");
        assert_eq!(meta.apply, "build");
        assert_eq!(meta.enforce, "pre");
    }
}
