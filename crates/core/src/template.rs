//! Text-level `<img>` rewriting for template sources, before they are compiled.
//!
//! There is no tag tree at this stage, so tags are found with tolerant patterns
//! and patched by exact-text replacement. A tag is only ever extended with a
//! trailing `width`/`height` pair; everything the author wrote stays verbatim.

use crate::{
    BuildSession, Dimensions, ImageProbe, RewriteReport, TagOutcome, is_external_source,
};
use regex::Regex;
use std::sync::LazyLock;

static IMAGES_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"images=\{?\[([^\]]+)\]\}?").expect("valid images= pattern"));
static DESKTOP_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"pc:\s*['"]([^'"]+)['"]"#).expect("valid pc: pattern"));
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\s+([^>]*?)\s*/?>").expect("valid <img> pattern"));
static LITERAL_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=["']([^"'{}]+)["']"#).expect("valid literal src pattern"));
static DYNAMIC_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=["']\{([^}]+)\}["']"#).expect("valid dynamic src pattern"));

/// How a tag's `src` attribute is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource<'a> {
    /// A quoted path with no expression braces.
    Literal(&'a str),
    /// A quoted remote URL (`http://`, `https://`, `//`).
    External(&'a str),
    /// A quoted single `{expr}` placeholder; holds the expression text.
    Dynamic(&'a str),
    /// No `src`, or one this rewriter does not understand.
    Missing,
}

/// One `<img>` occurrence in template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag<'a> {
    /// Byte offset of `<img` in the scanned text.
    pub start: usize,
    /// The full matched tag text.
    pub text: &'a str,
    /// Attribute text between `<img` and the closing `>`/`/>`, trimmed.
    pub attributes: &'a str,
    /// Whether the tag ends in `/>`.
    pub self_closing: bool,
    /// Whether `width=` and `height=` both appear in the attribute text.
    pub has_size: bool,
    /// Classified `src` value.
    pub source: TagSource<'a>,
}

impl ImageTag<'_> {
    /// Rebuilds the tag with `dims` appended after the original attributes.
    pub fn with_dimensions(&self, dims: Dimensions) -> String {
        let close = if self.self_closing { " />" } else { ">" };
        format!("<img {}{}{}", self.attributes, dims.to_attributes(), close)
    }
}

/// Result of rewriting one template unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRewrite {
    /// Rewritten source, or `None` when no tag changed.
    pub code: Option<String>,
    /// Per-tag outcomes.
    pub report: RewriteReport,
}

impl TemplateRewrite {
    /// Whether at least one tag was rewritten.
    pub fn is_changed(&self) -> bool {
        self.code.is_some()
    }
}

/// Returns the first desktop (`pc:`) path of an `images=[...]` declaration.
pub fn representative_source(code: &str) -> Option<&str> {
    let list = IMAGES_ARRAY.captures(code)?.get(1)?;
    let path = DESKTOP_PATH.captures(list.as_str())?.get(1)?;
    Some(path.as_str())
}

/// Finds every `<img>` occurrence in scan order.
pub fn scan_image_tags(code: &str) -> Vec<ImageTag<'_>> {
    IMG_TAG
        .captures_iter(code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attributes = caps.get(1).map_or("", |m| m.as_str()).trim();
            Some(ImageTag {
                start: whole.start(),
                text: whole.as_str(),
                attributes,
                self_closing: whole.as_str().ends_with("/>"),
                has_size: attributes.contains("width=") && attributes.contains("height="),
                source: classify_source(attributes),
            })
        })
        .collect()
}

fn classify_source(attributes: &str) -> TagSource<'_> {
    if let Some(src) = LITERAL_SRC.captures(attributes).and_then(|c| c.get(1)) {
        let src = src.as_str();
        return if is_external_source(src) {
            TagSource::External(src)
        } else {
            TagSource::Literal(src)
        };
    }
    match DYNAMIC_SRC.captures(attributes).and_then(|c| c.get(1)) {
        Some(expr) => TagSource::Dynamic(expr.as_str()),
        None => TagSource::Missing,
    }
}

/// Where a unit's default dimensions for dynamic sources came from.
#[derive(Clone, Copy)]
enum UnitDefault {
    Local(Dimensions),
    Global(Dimensions),
}

/// Adds `width`/`height` to every `<img>` in `code` that can be sized.
///
/// Literal paths resolve under the session's public root. Dynamic `{expr}`
/// sources take this unit's representative image, or the build-wide fallback.
/// A literal path that fails to resolve is left alone and never falls back.
pub fn rewrite_template<P: ImageProbe>(session: &BuildSession<P>, code: &str) -> TemplateRewrite {
    let mut report = RewriteReport::default();

    let local = representative_dimensions(session, code);
    if let Some(dims) = local {
        report.representative = Some(dims);
        if session.fallback().set_if_unset(dims) {
            report.promoted_fallback = true;
            log::info!("global representative size set to {}", dims);
        }
    }
    let unit_default = match local {
        Some(dims) => Some(UnitDefault::Local(dims)),
        None => session.fallback().get().map(UnitDefault::Global),
    };

    let tags = scan_image_tags(code);
    log::debug!("found {} <img> tag(s)", tags.len());

    let mut modified = code.to_string();
    for tag in &tags {
        let outcome = tag_outcome(session, tag, unit_default);
        if let Some(dims) = outcome.dimensions() {
            modified = modified.replacen(tag.text, &tag.with_dimensions(dims), 1);
        }
        report.push(outcome);
    }

    if report.rewritten() > 0 {
        log::info!("added width/height to {} image(s)", report.rewritten());
    }

    TemplateRewrite {
        code: (modified != code).then_some(modified),
        report,
    }
}

fn representative_dimensions<P: ImageProbe>(
    session: &BuildSession<P>,
    code: &str,
) -> Option<Dimensions> {
    let src = representative_source(code)?;
    if is_external_source(src) {
        log::debug!("representative image is remote, ignoring: {}", src);
        return None;
    }
    let dims = session.resolve_public(src);
    match dims {
        Some(dims) => log::debug!("representative image {} ({})", src, dims),
        None => log::warn!("representative image could not be read: {}", src),
    }
    dims
}

fn tag_outcome<P: ImageProbe>(
    session: &BuildSession<P>,
    tag: &ImageTag<'_>,
    unit_default: Option<UnitDefault>,
) -> TagOutcome {
    if tag.has_size {
        log::debug!("skip (already sized): {}", excerpt(tag.text));
        return TagOutcome::AlreadySized;
    }

    match tag.source {
        TagSource::External(src) => {
            log::debug!("skip (external): {}", src);
            TagOutcome::External
        }
        TagSource::Literal(src) => match session.resolve_public(src) {
            Some(dimensions) => {
                log::debug!("sized {} ({})", src, dimensions);
                TagOutcome::Sized { dimensions }
            }
            None => {
                log::debug!("unresolvable: {}", src);
                TagOutcome::Unresolvable
            }
        },
        TagSource::Dynamic(expr) => match unit_default {
            Some(UnitDefault::Local(dimensions)) => {
                log::debug!("{{{}}} -> representative size {}", expr, dimensions);
                TagOutcome::Representative { dimensions }
            }
            Some(UnitDefault::Global(dimensions)) => {
                log::debug!("{{{}}} -> global representative size {}", expr, dimensions);
                TagOutcome::GlobalFallback { dimensions }
            }
            None => {
                log::debug!("{{{}}} -> no representative image", expr);
                TagOutcome::NoFallback
            }
        },
        TagSource::Missing => TagOutcome::UnsupportedSource,
    }
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(50) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PluginConfig;
    use crate::cache::tests::MapProbe;

    fn session(probe: MapProbe) -> BuildSession<MapProbe> {
        BuildSession::with_probe(PluginConfig::default().with_root("/site"), probe)
    }

    fn fixtures() -> MapProbe {
        MapProbe::default()
            .with("/site/public/a.png", 800, 600)
            .with("/site/public/hero.png", 1200, 400)
            .with("/site/public/other.png", 640, 480)
    }

    fn rewritten(session: &BuildSession<MapProbe>, code: &str) -> String {
        rewrite_template(session, code)
            .code
            .unwrap_or_else(|| code.to_string())
    }

    #[test]
    fn sizes_literal_source() {
        let s = session(fixtures());
        let out = rewrite_template(&s, r#"<img src="/a.png">"#);
        assert_eq!(
            out.code.as_deref(),
            Some(r#"<img src="/a.png" width="800" height="600">"#)
        );
        assert_eq!(out.report.rewritten(), 1);
    }

    #[test]
    fn dynamic_source_without_any_representative_is_unchanged() {
        let s = session(fixtures());
        let out = rewrite_template(&s, r#"<img src="{image.pc}" />"#);
        assert_eq!(out.code, None);
        assert_eq!(out.report.outcomes, vec![TagOutcome::NoFallback]);
    }

    #[test]
    fn dynamic_source_uses_local_representative() {
        let s = session(fixtures());
        let code = r#"<Slider images={[{ pc: '/hero.png', sp: '/hero-sp.png' }]} />
{#each images as image}<img src="{image.pc}">{/each}"#;
        let out = rewrite_template(&s, code);
        let code = out.code.unwrap();
        assert!(code.contains(r#"<img src="{image.pc}" width="1200" height="400">"#));
        assert_eq!(out.report.representative, Dimensions::new(1200, 400));
        assert!(out.report.promoted_fallback);
    }

    #[test]
    fn other_units_fall_back_to_first_representative() {
        let s = session(fixtures());
        rewrite_template(&s, r#"images={[{ pc: "/hero.png" }]} <img src="/a.png">"#);
        rewrite_template(&s, r#"images=[{ pc: '/other.png' }] <img src="/a.png">"#);
        assert_eq!(s.fallback().get(), Dimensions::new(1200, 400));

        let out = rewrite_template(&s, r#"<img alt="" src='{item.src}'/>"#);
        assert_eq!(
            out.code.as_deref(),
            Some(r#"<img alt="" src='{item.src}' width="1200" height="400" />"#)
        );
        assert!(matches!(
            out.report.outcomes[0],
            TagOutcome::GlobalFallback { .. }
        ));
    }

    #[test]
    fn local_representative_beats_global() {
        let s = session(fixtures());
        rewrite_template(&s, r#"images={[{ pc: '/hero.png' }]}"#);
        let out = rewrite_template(&s, r#"images={[{ pc: '/other.png' }]} <img src="{x}">"#);
        assert_eq!(
            out.code.as_deref(),
            Some(r#"images={[{ pc: '/other.png' }]} <img src="{x}" width="640" height="480">"#)
        );
        assert!(!out.report.promoted_fallback);
    }

    #[test]
    fn broken_literal_path_does_not_use_fallback() {
        let s = session(fixtures());
        let code = r#"images={[{ pc: '/hero.png' }]} <img src="/missing.png">"#;
        let out = rewrite_template(&s, code);
        assert_eq!(out.code, None);
        assert_eq!(out.report.outcomes, vec![TagOutcome::Unresolvable]);
    }

    #[test]
    fn external_and_sized_tags_are_untouched() {
        let s = session(fixtures().with("/site/public/cdn.example.com/a.png", 5, 5));
        let code = r#"<img src="https://cdn.example.com/a.png"><img src="//cdn.example.com/a.png"><img src="http://x/a.png"><img width="1" height="2" src="/a.png">"#;
        let out = rewrite_template(&s, code);
        assert_eq!(out.code, None);
        assert_eq!(out.report.count(&TagOutcome::External), 3);
        assert_eq!(out.report.count(&TagOutcome::AlreadySized), 1);
        assert_eq!(s.resolver().len(), 0);
    }

    #[test]
    fn rewriting_is_idempotent() {
        let s = session(fixtures());
        let code = r#"images={[{ pc: '/hero.png' }]}
<img src="/a.png"><img src="{image.pc}" alt="x" /><IMG SRC="/a.png">"#;
        let once = rewritten(&s, code);
        let twice = rewrite_template(&s, &once);
        assert_eq!(twice.code, None);
        assert_eq!(twice.report.rewritten(), 0);
    }

    #[test]
    fn identical_tags_receive_identical_sizes() {
        let s = session(fixtures());
        let out = rewritten(&s, r#"<p><img src="/a.png"></p><p><img src="/a.png"></p>"#);
        insta::assert_snapshot!(out, @r#"<p><img src="/a.png" width="800" height="600"></p><p><img src="/a.png" width="800" height="600"></p>"#);
        assert_eq!(s.resolver().len(), 1);
    }

    #[test]
    fn partial_size_is_completed() {
        let s = session(fixtures());
        let out = rewritten(&s, r#"<img width="400" src="/a.png">"#);
        assert_eq!(
            out,
            r#"<img width="400" src="/a.png" width="800" height="600">"#
        );
    }

    #[test]
    fn unsupported_sources_are_skipped() {
        let s = session(fixtures());
        let out = rewrite_template(&s, r#"<img src={image.pc}><img alt="no src"><img src="/img/{name}.png">"#);
        assert_eq!(out.code, None);
        assert_eq!(out.report.count(&TagOutcome::UnsupportedSource), 3);
    }

    #[test]
    fn scan_classifies_sources() {
        let tags = scan_image_tags(
            r#"<img src="a.png"> <img
  class="hero"
  src='{img.pc}'
/> <img src="https://x/y.png">"#,
        );
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].source, TagSource::Literal("a.png"));
        assert!(!tags[0].self_closing);
        assert_eq!(tags[1].source, TagSource::Dynamic("img.pc"));
        assert!(tags[1].self_closing);
        assert_eq!(tags[1].attributes, "class=\"hero\"\n  src='{img.pc}'");
        assert_eq!(tags[2].source, TagSource::External("https://x/y.png"));
    }

    #[test]
    fn extracts_first_desktop_path() {
        assert_eq!(
            representative_source(r#"images={[ { sp: 'a-sp.webp', pc: 'a.webp' }, { pc: 'b.webp' } ]}"#),
            Some("a.webp")
        );
        assert_eq!(representative_source(r#"images={[ { sp: 'a.webp' } ]}"#), None);
        assert_eq!(representative_source("no images here"), None);
    }
}
