//! Turns the result slot into something displayable.

use crate::controller::ResultSlot;

/// Verdicts containing this marker are shown as an alert.
pub const AI_GENERATED_MARKER: &str = "AI-generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Content judged machine-generated.
    Alert,
    Success,
}

impl Category {
    pub fn for_verdict(verdict: &str) -> Self {
        if verdict.contains(AI_GENERATED_MARKER) {
            Category::Alert
        } else {
            Category::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub verdict: String,
    pub category: Category,
    /// Confidence as a percentage, rounded to two decimals.
    pub percent: f64,
    pub stale: bool,
}

impl ResultView {
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.percent)
    }

    /// Percent as a gauge ratio in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Build the view for the current slot, if there is anything to show.
pub fn present(slot: &ResultSlot) -> Option<ResultView> {
    let result = slot.result()?;
    if result.verdict.is_empty() {
        return None;
    }
    Some(ResultView {
        verdict: result.verdict.clone(),
        category: Category::for_verdict(&result.verdict),
        percent: round2(result.confidence * 100.0),
        stale: slot.is_stale(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
