//! Tally/resolver: answer events in, one `CategoryResult` per category out.
//!
//! Pure function of the answer list. Categories are resolved independently —
//! no cross-category coupling. All fractional quantities are fixed-point
//! millionths (`1_000_000 = 1.0`) in `i64`; no floats anywhere, so identical
//! answer lists produce bit-identical results on every platform.
//!
//! Empty input is not an error: a category with no contributing events
//! resolves to a neutral 0.5/0.5 split with a `Low` band.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer_event::{AnswerEvent, Category, MoveType, QuizPhase, Side};

const MILLION: i64 = 1_000_000;

/// Margin at or above which an inferred lean is considered high-confidence.
const HIGH_BAND_MARGIN_MILLIONTHS: i64 = 300_000;
/// Margin at or above which an inferred lean is considered medium-confidence.
const MEDIUM_BAND_MARGIN_MILLIONTHS: i64 = 120_000;

// ---------------------------------------------------------------------------
// ConfidenceBand
// ---------------------------------------------------------------------------

/// Confidence attached to a category verdict.
///
/// `User` is not part of the inferred ladder: it marks an explicit-phase
/// directional tap agreeing with the winning side, and outranks every
/// inferred band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
    User,
}

impl ConfidenceBand {
    /// Whether this band grants the seed vote-weight bonus.
    pub fn strengthens_vote(self) -> bool {
        matches!(self, Self::High | Self::User)
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::User => "user",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Result records
// ---------------------------------------------------------------------------

/// Per-side probability split in millionths. The two sides always sum to
/// exactly `1_000_000`; the right side absorbs the rounding remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideProbability {
    pub left_millionths: i64,
    pub right_millionths: i64,
}

impl SideProbability {
    pub const NEUTRAL: SideProbability = SideProbability {
        left_millionths: MILLION / 2,
        right_millionths: MILLION / 2,
    };

    pub fn for_side(&self, side: Side) -> i64 {
        match side {
            Side::Left => self.left_millionths,
            Side::Right => self.right_millionths,
        }
    }

    /// Absolute gap between the two sides, in millionths.
    pub fn margin_millionths(&self) -> i64 {
        (self.left_millionths - self.right_millionths).abs()
    }
}

/// Share of each move type among a category's contributing events, in
/// millionths. Sums to exactly `1_000_000` when any events exist; all zero
/// otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTypeShare {
    pub act_millionths: i64,
    pub scan_millionths: i64,
    pub reset_millionths: i64,
}

/// Resolved verdict for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub winning_side: Side,
    pub probability_per_side: SideProbability,
    pub share_per_move_type: MoveTypeShare,
    /// Winning-side probability shrunk by evidence volume: thin evidence
    /// scores lower than the raw split suggests.
    pub likelihood_score_millionths: i64,
    /// Mean signed detail over contributing events, normalized to
    /// millionths of full scale (+1.0 = every tap a maximal right lean).
    pub average_detail_nudge_millionths: i64,
    pub confidence_band: ConfidenceBand,
    pub contributing_events: u32,
}

impl CategoryResult {
    /// Face name of the winning side.
    pub fn winning_face(&self) -> &'static str {
        self.category.face_for(self.winning_side)
    }

    /// Face name of the losing side.
    pub fn runner_up_face(&self) -> &'static str {
        self.category.face_for(self.winning_side.opposite())
    }

    /// Winning-side probability in millionths.
    pub fn winning_probability_millionths(&self) -> i64 {
        self.probability_per_side.for_side(self.winning_side)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve every category from the full answer history.
///
/// Results come back in `Category::ALL` order, one per category, and are
/// recomputed from scratch on every call — nothing is cached or mutated.
pub fn resolve_all_categories(answers: &[AnswerEvent]) -> Vec<CategoryResult> {
    Category::ALL
        .iter()
        .map(|category| resolve_category(*category, answers))
        .collect()
}

/// Resolve a single category.
pub fn resolve_category(category: Category, answers: &[AnswerEvent]) -> CategoryResult {
    let contributing: Vec<&AnswerEvent> =
        answers.iter().filter(|a| a.category == category).collect();

    let mut left_weight: i64 = 0;
    let mut right_weight: i64 = 0;
    let mut directional_events: i64 = 0;
    for answer in &contributing {
        let weight = answer.directional_weight();
        if weight == 0 {
            continue;
        }
        directional_events += 1;
        match answer.detail.side() {
            Some(Side::Left) => left_weight += weight,
            Some(Side::Right) => right_weight += weight,
            None => {}
        }
    }

    let total_weight = left_weight + right_weight;
    let probability_per_side = if total_weight == 0 {
        SideProbability::NEUTRAL
    } else {
        let left_millionths = left_weight * MILLION / total_weight;
        SideProbability {
            left_millionths,
            right_millionths: MILLION - left_millionths,
        }
    };

    let winning_side = if left_weight > right_weight {
        Side::Left
    } else if right_weight > left_weight {
        Side::Right
    } else {
        category.tie_default_side()
    };

    let confidence_band = band_for(
        winning_side,
        &probability_per_side,
        total_weight,
        &contributing,
    );

    let winner_probability = probability_per_side.for_side(winning_side);
    let likelihood_score_millionths =
        winner_probability * directional_events / (directional_events + 1);

    CategoryResult {
        category,
        winning_side,
        probability_per_side,
        share_per_move_type: move_type_share(&contributing),
        likelihood_score_millionths,
        average_detail_nudge_millionths: average_detail_nudge(&contributing),
        confidence_band,
        contributing_events: contributing.len() as u32,
    }
}

/// Band ladder: no evidence → Low; an explicit directional tap agreeing
/// with the winner → User; otherwise margin thresholds.
fn band_for(
    winning_side: Side,
    probability: &SideProbability,
    total_weight: i64,
    contributing: &[&AnswerEvent],
) -> ConfidenceBand {
    if total_weight == 0 {
        return ConfidenceBand::Low;
    }

    let explicit_agreement = contributing.iter().any(|answer| {
        answer.phase == QuizPhase::Explicit
            && answer.directional_weight() > 0
            && answer.detail.side() == Some(winning_side)
    });
    if explicit_agreement {
        return ConfidenceBand::User;
    }

    let margin = probability.margin_millionths();
    if margin >= HIGH_BAND_MARGIN_MILLIONTHS {
        ConfidenceBand::High
    } else if margin >= MEDIUM_BAND_MARGIN_MILLIONTHS {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

fn move_type_share(contributing: &[&AnswerEvent]) -> MoveTypeShare {
    let total = contributing.len() as i64;
    if total == 0 {
        return MoveTypeShare::default();
    }
    let count_of = |move_type: MoveType| -> i64 {
        contributing.iter().filter(|a| a.move_type == move_type).count() as i64
    };
    let act_millionths = count_of(MoveType::Act) * MILLION / total;
    let scan_millionths = count_of(MoveType::Scan) * MILLION / total;
    MoveTypeShare {
        act_millionths,
        scan_millionths,
        // Reset absorbs the rounding remainder so the shares sum exactly.
        reset_millionths: MILLION - act_millionths - scan_millionths,
    }
}

fn average_detail_nudge(contributing: &[&AnswerEvent]) -> i64 {
    let total = contributing.len() as i64;
    if total == 0 {
        return 0;
    }
    let sum: i64 = contributing
        .iter()
        .map(|a| i64::from(a.detail.value()))
        .sum();
    sum * MILLION / (3 * total)
}
