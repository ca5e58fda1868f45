//! Per-tag outcomes collected while rewriting, for host-side diagnostics.

use crate::Dimensions;
use serde::Serialize;

/// What happened to one `<img>` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagOutcome {
    /// A literal path resolved and the tag was sized from it.
    Sized {
        /// Dimensions written to the tag.
        dimensions: Dimensions,
    },
    /// A dynamic source was sized from this unit's representative image.
    Representative {
        /// Dimensions written to the tag.
        dimensions: Dimensions,
    },
    /// A dynamic source was sized from the build-wide fallback.
    GlobalFallback {
        /// Dimensions written to the tag.
        dimensions: Dimensions,
    },
    /// The tag already had both `width` and `height`.
    AlreadySized,
    /// The source is a remote URL.
    External,
    /// The literal path could not be read or decoded.
    Unresolvable,
    /// The `src` was missing or not a recognised form.
    UnsupportedSource,
    /// A dynamic source was found but no representative dimensions exist yet.
    NoFallback,
}

impl TagOutcome {
    /// Dimensions applied to the tag, if it was rewritten.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            TagOutcome::Sized { dimensions }
            | TagOutcome::Representative { dimensions }
            | TagOutcome::GlobalFallback { dimensions } => Some(*dimensions),
            _ => None,
        }
    }

    /// Whether the tag was rewritten.
    pub fn is_rewrite(&self) -> bool {
        self.dimensions().is_some()
    }

    fn label(&self) -> &'static str {
        match self {
            TagOutcome::Sized { .. } => "sized",
            TagOutcome::Representative { .. } => "representative",
            TagOutcome::GlobalFallback { .. } => "global_fallback",
            TagOutcome::AlreadySized => "already_sized",
            TagOutcome::External => "external",
            TagOutcome::Unresolvable => "unresolvable",
            TagOutcome::UnsupportedSource => "unsupported_source",
            TagOutcome::NoFallback => "no_fallback",
        }
    }
}

/// Outcomes for every tag of one template unit, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// One entry per `<img>` occurrence.
    pub outcomes: Vec<TagOutcome>,
    /// Representative dimensions resolved from this unit's own image list.
    pub representative: Option<Dimensions>,
    /// Whether this unit set the build-wide fallback.
    pub promoted_fallback: bool,
}

impl RewriteReport {
    /// Records the outcome of the next tag.
    pub fn push(&mut self, outcome: TagOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of tags found.
    pub fn found(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of tags that received dimensions.
    pub fn rewritten(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rewrite()).count()
    }

    /// Number of tags left as authored.
    pub fn skipped(&self) -> usize {
        self.found() - self.rewritten()
    }

    /// Number of outcomes with the same variant as `kind` (payload ignored).
    pub fn count(&self, kind: &TagOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.label() == kind.label())
            .count()
    }

    /// Compact `label=count` summary for logs, in first-seen order.
    pub fn summary(&self) -> String {
        let mut seen: Vec<(&'static str, usize)> = Vec::new();
        for outcome in &self.outcomes {
            match seen.iter_mut().find(|(label, _)| *label == outcome.label()) {
                Some((_, n)) => *n += 1,
                None => seen.push((outcome.label(), 1)),
            }
        }
        seen.iter()
            .map(|(label, n)| format!("{}={}", label, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
