//! Parallel rewriting of emitted bundle assets.

use dimstamp_vite::{BundleRewrite, BundleSummary, ImageDimensionsPlugin};
use napi_derive::napi;
use rayon::prelude::*;
use std::time::Instant;

/// One emitted file.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BundleAsset {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Serialized contents.
    pub source: String,
}

/// Options for bundle processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
}

/// Statistics for bundle processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BundleStats {
    /// Total number of assets received.
    pub total: u32,
    /// Number of markup pages visited.
    pub pages: u32,
    /// Number of pages whose text changed.
    pub rewritten_pages: u32,
    /// Number of `<img>` elements sized.
    pub sized: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Rewritten assets (in input order) and statistics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BundleProcessingResult {
    /// Every input asset; markup pages carry rewritten sources.
    pub assets: Vec<BundleAsset>,
    /// Processing statistics.
    pub stats: BundleStats,
}

/// Rewrites markup assets concurrently; the shared cache keeps each image to one read.
pub(crate) fn process_bundle(
    plugin: &ImageDimensionsPlugin,
    assets: Vec<BundleAsset>,
    options: BundleOptions,
) -> BundleProcessingResult {
    let start = Instant::now();
    let total = assets.len() as u32;

    // Configure thread pool if max_threads is specified
    let pool = options.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .ok()
    });

    let process_asset = |asset: BundleAsset| -> (BundleAsset, Option<BundleRewrite>) {
        let page = plugin.rewrite_page(&asset.file_name, &asset.source);
        (asset, page)
    };

    let processed: Vec<(BundleAsset, Option<BundleRewrite>)> = if let Some(pool) = pool {
        pool.install(|| assets.into_par_iter().map(process_asset).collect())
    } else {
        assets.into_par_iter().map(process_asset).collect()
    };

    let mut summary = BundleSummary::default();
    let mut out = Vec::with_capacity(processed.len());
    for (mut asset, page) in processed {
        if let Some(page) = page {
            summary.record(&page);
            asset.source = page.html;
        }
        out.push(asset);
    }

    BundleProcessingResult {
        assets: out,
        stats: BundleStats {
            total,
            pages: summary.pages as u32,
            rewritten_pages: summary.rewritten_pages as u32,
            sized: summary.sized as u32,
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
    }
}
