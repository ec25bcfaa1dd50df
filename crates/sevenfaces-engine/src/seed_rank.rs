//! Seed builder: category verdicts in, ranked tournament seeds out.
//!
//! One primary seed per category plus a single wildcard — the strongest
//! runner-up across all categories — ranked by a comparator that is a strict
//! total order: vote weight, win probability, margin, then the tie-break
//! hash and the name/category pair. Two distinct seeds can never compare
//! equal, so ranking is fully reproducible.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::answer_event::{AnswerEvent, Category, Side};
use crate::category_resolver::CategoryResult;
use crate::tie_break::TieBreakHash;

/// Win probability at or above which a seed earns the probability bonus.
const VOTE_BONUS_PROBABILITY_MILLIONTHS: i64 = 600_000;

const VOTE_WEIGHT_MIN: u8 = 1;
const VOTE_WEIGHT_MAX: u8 = 3;

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// A ranked candidate face entering the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub face: String,
    pub category: Category,
    /// 1..=3: base 1, +1 for win probability >= 0.6, +1 for a High/User
    /// band (primaries only).
    pub vote_weight: u8,
    pub win_probability_millionths: i64,
    pub margin_millionths: i64,
    pub tie_break_hash: TieBreakHash,
    /// 1 = strongest. 0 marks a synthetic seed that never entered ranking.
    pub rank: u32,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the ranked seed list: every category's winning face plus one
/// wildcard runner-up, ranks assigned 1..N strongest-first.
pub fn build_ranked_seeds(results: &[CategoryResult], answers: &[AnswerEvent]) -> Vec<Seed> {
    let mut seeds: Vec<Seed> = results
        .iter()
        .map(|result| primary_seed(result, answers))
        .collect();
    if let Some(wildcard) = strongest_runner_up(results, answers) {
        seeds.push(wildcard);
    }
    seeds.sort_by(canonical_cmp);
    for (index, seed) in seeds.iter_mut().enumerate() {
        seed.rank = (index + 1) as u32;
    }
    seeds
}

/// Machine-picked secondary: the strongest runner-up, looked up in the
/// ranked list so it carries its tournament rank. Falls back to a synthetic
/// `rank = 0` seed when the runner-up was not ranked (it always is when
/// `ranked` came from [`build_ranked_seeds`] on the same inputs).
pub fn compute_secondary(
    results: &[CategoryResult],
    answers: &[AnswerEvent],
    ranked: &[Seed],
) -> Option<Seed> {
    let runner_up = strongest_runner_up(results, answers)?;
    let matching = ranked
        .iter()
        .find(|seed| seed.face == runner_up.face && seed.category == runner_up.category);
    Some(matching.cloned().unwrap_or(runner_up))
}

fn primary_seed(result: &CategoryResult, answers: &[AnswerEvent]) -> Seed {
    let face = result.winning_face();
    let win_probability = result.winning_probability_millionths();
    let mut vote_weight = VOTE_WEIGHT_MIN;
    if win_probability >= VOTE_BONUS_PROBABILITY_MILLIONTHS {
        vote_weight += 1;
    }
    if result.confidence_band.strengthens_vote() {
        vote_weight += 1;
    }
    Seed {
        face: face.to_string(),
        category: result.category,
        vote_weight: vote_weight.min(VOTE_WEIGHT_MAX),
        win_probability_millionths: win_probability,
        margin_millionths: result.probability_per_side.margin_millionths(),
        tie_break_hash: TieBreakHash::for_face(answers, face),
        rank: 0,
    }
}

/// Seed for the losing side of a category. The band bonus never applies
/// here: the band measures confidence in the side that won.
fn runner_up_seed(result: &CategoryResult, answers: &[AnswerEvent]) -> Seed {
    let side: Side = result.winning_side.opposite();
    let face = result.category.face_for(side);
    let win_probability = result.probability_per_side.for_side(side);
    let mut vote_weight = VOTE_WEIGHT_MIN;
    if win_probability >= VOTE_BONUS_PROBABILITY_MILLIONTHS {
        vote_weight += 1;
    }
    Seed {
        face: face.to_string(),
        category: result.category,
        vote_weight: vote_weight.min(VOTE_WEIGHT_MAX),
        win_probability_millionths: win_probability,
        margin_millionths: result.probability_per_side.margin_millionths(),
        tie_break_hash: TieBreakHash::for_face(answers, face),
        rank: 0,
    }
}

fn strongest_runner_up(results: &[CategoryResult], answers: &[AnswerEvent]) -> Option<Seed> {
    results
        .iter()
        .map(|result| runner_up_seed(result, answers))
        .min_by(|a, b| canonical_cmp(a, b))
}

// ---------------------------------------------------------------------------
// Canonical ordering
// ---------------------------------------------------------------------------

/// Strongest-first total order over seeds.
///
/// Descending vote weight, win probability, margin; then ascending
/// tie-break hash, face name, category name. The trailing keys guarantee
/// the chain never reports two distinct face+category pairs equal.
pub fn canonical_cmp(a: &Seed, b: &Seed) -> Ordering {
    b.vote_weight
        .cmp(&a.vote_weight)
        .then_with(|| b.win_probability_millionths.cmp(&a.win_probability_millionths))
        .then_with(|| b.margin_millionths.cmp(&a.margin_millionths))
        .then_with(|| a.tie_break_hash.cmp(&b.tie_break_hash))
        .then_with(|| a.face.cmp(&b.face))
        .then_with(|| a.category.name().cmp(b.category.name()))
}
