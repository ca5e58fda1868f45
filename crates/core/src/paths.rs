//! Mapping `src` attribute values onto files under an asset root.

use std::path::{Component, Path, PathBuf};

const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "//"];

/// Whether a `src` value points at a remote resource.
pub fn is_external_source(src: &str) -> bool {
    EXTERNAL_PREFIXES.iter().any(|prefix| src.starts_with(prefix))
}

/// Resolves a `src` value against `root`.
///
/// A leading `/` is root-relative, not filesystem-absolute. Query strings and
/// fragments are dropped, and `..` never climbs above `root`. Inline `data:`
/// URIs have no file behind them.
pub fn resolve_asset_path(root: &Path, src: &str) -> Option<PathBuf> {
    let src = src.trim();
    if src.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:")) {
        return None;
    }
    let path = strip_suffixes(src).trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                resolved.pop();
                depth -= 1;
            }
            _ => {}
        }
    }

    (depth > 0).then_some(resolved)
}

fn strip_suffixes(src: &str) -> &str {
    match src.find(['?', '#']) {
        Some(index) => &src[..index],
        None => src,
    }
}
