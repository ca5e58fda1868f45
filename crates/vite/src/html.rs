//! Sizes `<img>` elements in finished HTML pages.
//!
//! Runs after templates are compiled, so it sees tags the template pass could
//! not: ones produced by compiled output or resolved late. The page goes through
//! lol_html, which keeps comments and untouched markup byte-for-byte and
//! handles attribute quoting itself.

use dimstamp_core::{BuildSession, ImageProbe, is_external_source};
use lol_html::{RewriteStrSettings, element, rewrite_str};

/// A rewritten page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRewrite {
    /// Page markup after rewriting (the input when nothing changed).
    pub html: String,
    /// Number of `<img>` elements that received dimensions.
    pub sized: usize,
}

impl BundleRewrite {
    /// Whether any element was changed.
    pub fn is_changed(&self) -> bool {
        self.sized > 0
    }
}

/// Adds `width`/`height` to `<img>` elements whose `src` resolves under the
/// session's output root.
///
/// Elements without a `src`, with both sizes already set, or pointing at a
/// remote URL are left alone. Nothing here is fatal: a page lol_html refuses to
/// rewrite is returned unchanged.
pub fn rewrite_bundle_html<P: ImageProbe>(session: &BuildSession<P>, html: &str) -> BundleRewrite {
    if !mentions_img(html) {
        return BundleRewrite {
            html: html.to_string(),
            sized: 0,
        };
    }

    let mut sized = 0usize;
    let has_value = |value: Option<String>| value.is_some_and(|v| !v.is_empty());

    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("img[src]", |el| {
                let Some(src) = el.get_attribute("src").filter(|src| !src.is_empty()) else {
                    return Ok(());
                };
                // lol_html hands back the attribute as written, entities included.
                let src = html_escape::decode_html_entities(&src);
                if has_value(el.get_attribute("width")) && has_value(el.get_attribute("height")) {
                    return Ok(());
                }
                if is_external_source(&src) {
                    log::debug!("skip (external): {}", src);
                    return Ok(());
                }

                match session.resolve_dist(&src) {
                    Some(dims) => {
                        el.set_attribute("width", &dims.width.to_string())?;
                        el.set_attribute("height", &dims.height.to_string())?;
                        log::debug!("sized {} ({})", src, dims);
                        sized += 1;
                    }
                    None => log::debug!("unresolvable: {}", src),
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match result {
        Ok(rewritten) => BundleRewrite {
            html: rewritten,
            sized,
        },
        Err(err) => {
            log::warn!("failed to rewrite bundled HTML, leaving it as emitted: {}", err);
            BundleRewrite {
                html: html.to_string(),
                sized: 0,
            }
        }
    }
}

fn mentions_img(html: &str) -> bool {
    html.as_bytes()
        .windows(4)
        .any(|window| window.eq_ignore_ascii_case(b"<img"))
}
