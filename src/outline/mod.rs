//! Heading outline derived from markdown steps.
//!
//! Markdown steps whose content starts with `<h1>..</h1>` through
//! `<h4>..</h4>` markup contribute entries to a navigable outline. Headings
//! mark section starts; the "current" section is the most recent section
//! start at or before the selection cursor. Navigation itself (scrolling,
//! selection changes) is delegated to the rendering collaborator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Step, StepId, StepType};

/// Leading heading markup at the very start of a markdown step's content
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<h([1-4])>([^<]*)</h[1-4]>").expect("valid heading pattern"));

/// Headings deeper than this many tiers below the shallowest collapse to
/// the last tier
const MAX_TIER: u8 = 4;

/// One outline entry: the leading heading of a markdown step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level 1-4 as written in the markup
    pub level: u8,
    /// Heading text up to the first `<`
    pub label: String,
    /// Step the heading belongs to
    pub step_id: StepId,
    /// Index of that step within the full step sequence, markdown or not
    pub position: usize,
}

/// Scan markdown steps in document order for leading headings.
/// Steps without a leading heading contribute nothing.
pub fn extract_headings(steps: &[Step]) -> Vec<Heading> {
    steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.step_type == StepType::Markdown)
        .filter_map(|(position, step)| {
            let caps = HEADING_RE.captures(&step.content)?;
            // The pattern only matches digits 1-4
            let level = caps[1].parse().ok()?;
            Some(Heading {
                level,
                label: caps[2].to_string(),
                step_id: step.id,
                position,
            })
        })
        .collect()
}

/// Display indent tier per heading: its level minus the shallowest level in
/// the outline, clamped to `0..=4`.
pub fn display_tiers(headings: &[Heading]) -> Vec<u8> {
    let min_level = headings.iter().map(|h| h.level).min().unwrap_or(1);
    headings
        .iter()
        .map(|h| (h.level - min_level).min(MAX_TIER))
        .collect()
}

/// The heading whose section contains the selection: the last heading at or
/// before `selected_position`. `None` when nothing is selected or no heading
/// starts at or before the selection.
pub fn current_heading(
    headings: &[Heading],
    selected_position: Option<usize>,
) -> Option<&Heading> {
    let selected = selected_position?;
    headings.iter().rev().find(|h| h.position <= selected)
}
