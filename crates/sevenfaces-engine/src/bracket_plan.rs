//! Bracket builder: ranked seeds in, a fixed single-elimination layout out.
//!
//! Size is chosen by simple thresholding (8, else 4, else 2) and seeds
//! beyond the chosen size are dropped — there is no bye mechanism. Pairing
//! tables are consts keyed by size and are never shuffled; the layout is a
//! pure function of rank positions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seed_rank::{canonical_cmp, Seed};

/// Opening pairings by rank position, 0-indexed. Rank 1 plays the weakest
/// participant, ranks 4/5 meet immediately.
pub const PAIRING_EIGHT: [(usize, usize); 4] = [(0, 7), (3, 4), (1, 6), (2, 5)];
pub const PAIRING_FOUR: [(usize, usize); 2] = [(0, 3), (1, 2)];
pub const PAIRING_TWO: [(usize, usize); 1] = [(0, 1)];

// ---------------------------------------------------------------------------
// BracketSize
// ---------------------------------------------------------------------------

/// Supported bracket topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSize {
    Two,
    Four,
    Eight,
}

impl BracketSize {
    /// Size chosen for a seed count; `None` below the two-seed minimum.
    pub fn for_seed_count(count: usize) -> Option<Self> {
        match count {
            0 | 1 => None,
            2 | 3 => Some(Self::Two),
            4..=7 => Some(Self::Four),
            _ => Some(Self::Eight),
        }
    }

    pub fn participant_count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Opening pairing table for this size.
    pub fn pairing(self) -> &'static [(usize, usize)] {
        match self {
            Self::Two => &PAIRING_TWO,
            Self::Four => &PAIRING_FOUR,
            Self::Eight => &PAIRING_EIGHT,
        }
    }

    /// Number of duels from first pair to champion.
    pub fn total_matches(self) -> usize {
        self.participant_count() - 1
    }
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

/// Fewer than two seeds cannot form a bracket; callers short-circuit this
/// case to a solo result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bracket needs at least 2 seeds, got {got}")]
pub struct NotEnoughSeeds {
    pub got: usize,
}

/// An immutable tournament layout: the chosen size and the participants in
/// rank order. Pairing comes from the size's fixed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub size: BracketSize,
    pub participants: Vec<Seed>,
}

impl Bracket {
    pub fn pairing(&self) -> &'static [(usize, usize)] {
        self.size.pairing()
    }

    /// Opening-round pairs as owned seed pairs, in table order.
    pub fn opening_pairs(&self) -> Vec<(Seed, Seed)> {
        self.pairing()
            .iter()
            .map(|&(a, b)| (self.participants[a].clone(), self.participants[b].clone()))
            .collect()
    }
}

/// Lay out a bracket from ranked seeds: strongest `size` seeds participate,
/// the rest are dropped.
pub fn build_bracket(seeds: &[Seed]) -> Result<Bracket, NotEnoughSeeds> {
    let size = BracketSize::for_seed_count(seeds.len()).ok_or(NotEnoughSeeds { got: seeds.len() })?;
    let mut ordered: Vec<Seed> = seeds.to_vec();
    ordered.sort_by(canonical_cmp);
    ordered.truncate(size.participant_count());
    Ok(Bracket {
        size,
        participants: ordered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_event::Category;
    use crate::tie_break::TieBreakHash;

    fn seed(face: &str, rank: u32) -> Seed {
        Seed {
            face: face.to_string(),
            category: Category::Control,
            vote_weight: 1,
            // Strictly decreasing probability keeps the canonical order
            // aligned with the given rank.
            win_probability_millionths: 1_000_000 - i64::from(rank) * 10_000,
            margin_millionths: 0,
            tie_break_hash: TieBreakHash(rank),
            rank,
        }
    }

    fn seeds(count: usize) -> Vec<Seed> {
        (1..=count as u32)
            .map(|rank| seed(&format!("Face{rank}"), rank))
            .collect()
    }

    // -- Sizing --

    #[test]
    fn size_thresholds_match_seed_counts() {
        assert_eq!(BracketSize::for_seed_count(0), None);
        assert_eq!(BracketSize::for_seed_count(1), None);
        assert_eq!(BracketSize::for_seed_count(2), Some(BracketSize::Two));
        assert_eq!(BracketSize::for_seed_count(3), Some(BracketSize::Two));
        assert_eq!(BracketSize::for_seed_count(4), Some(BracketSize::Four));
        assert_eq!(BracketSize::for_seed_count(7), Some(BracketSize::Four));
        assert_eq!(BracketSize::for_seed_count(8), Some(BracketSize::Eight));
        assert_eq!(BracketSize::for_seed_count(10), Some(BracketSize::Eight));
    }

    #[test]
    fn undersized_input_is_a_structured_error() {
        assert_eq!(build_bracket(&[]), Err(NotEnoughSeeds { got: 0 }));
        assert_eq!(build_bracket(&seeds(1)), Err(NotEnoughSeeds { got: 1 }));
    }

    #[test]
    fn extra_seeds_are_dropped_strongest_kept() {
        let bracket = build_bracket(&seeds(3)).expect("bracket");
        assert_eq!(bracket.size, BracketSize::Two);
        let faces: Vec<&str> = bracket.participants.iter().map(|s| s.face.as_str()).collect();
        assert_eq!(faces, vec!["Face1", "Face2"]);

        let bracket = build_bracket(&seeds(10)).expect("bracket");
        assert_eq!(bracket.size, BracketSize::Eight);
        assert_eq!(bracket.participants.len(), 8);
    }

    // -- Pairing --

    #[test]
    fn top_eight_pairing_is_fixed() {
        assert_eq!(BracketSize::Eight.pairing(), &[(0, 7), (3, 4), (1, 6), (2, 5)]);
        assert_eq!(BracketSize::Four.pairing(), &[(0, 3), (1, 2)]);
        assert_eq!(BracketSize::Two.pairing(), &[(0, 1)]);
    }

    #[test]
    fn opening_pairs_follow_the_table_regardless_of_content() {
        let bracket = build_bracket(&seeds(8)).expect("bracket");
        let pairs = bracket.opening_pairs();
        let names: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(a, b)| (a.face, b.face))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Face1".to_string(), "Face8".to_string()),
                ("Face4".to_string(), "Face5".to_string()),
                ("Face2".to_string(), "Face7".to_string()),
                ("Face3".to_string(), "Face6".to_string()),
            ]
        );
    }

    #[test]
    fn build_bracket_does_not_mutate_its_input() {
        let input = seeds(10);
        let before = input.clone();
        let _ = build_bracket(&input).expect("bracket");
        assert_eq!(input, before);
    }

    #[test]
    fn total_matches_per_size() {
        assert_eq!(BracketSize::Eight.total_matches(), 7);
        assert_eq!(BracketSize::Four.total_matches(), 3);
        assert_eq!(BracketSize::Two.total_matches(), 1);
    }

    #[test]
    fn bracket_serialization_round_trip() {
        let bracket = build_bracket(&seeds(4)).expect("bracket");
        let json = serde_json::to_string(&bracket).expect("serialize");
        let restored: Bracket = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(bracket, restored);
    }
}
