//! Duel state machine: advances a bracket round by round from user picks to
//! a single champion.
//!
//! Transitions are pure — `advance` borrows the current state and returns a
//! brand-new one, so a rejected pick can never corrupt what the caller
//! holds. The match log is append-only and every transition writes exactly
//! one record.
//!
//! Degenerate seed counts (0 or 1) never enter the machine: `open`
//! short-circuits them straight to `Complete` with an empty log.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bracket_plan::{build_bracket, Bracket, BracketSize};
use crate::seed_rank::Seed;

// ---------------------------------------------------------------------------
// Stages and labels
// ---------------------------------------------------------------------------

/// Round the tournament is currently in.
///
/// A top-8 bracket opens at `Quarterfinal`; a top-4 bracket opens directly
/// at `Semifinal` (its first round carries semifinal labels); a top-2
/// bracket is a single `Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelStage {
    Quarterfinal,
    Semifinal,
    Final,
}

impl DuelStage {
    /// Next round. `Final` is terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Quarterfinal => Some(Self::Semifinal),
            Self::Semifinal => Some(Self::Final),
            Self::Final => None,
        }
    }

    /// Opening stage for a bracket size.
    pub fn opening_for(size: BracketSize) -> Self {
        match size {
            BracketSize::Eight => Self::Quarterfinal,
            BracketSize::Four => Self::Semifinal,
            BracketSize::Two => Self::Final,
        }
    }
}

impl fmt::Display for DuelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Quarterfinal => "quarterfinal",
            Self::Semifinal => "semifinal",
            Self::Final => "final",
        };
        f.write_str(s)
    }
}

fn round_label(stage: DuelStage, match_index: usize) -> String {
    match stage {
        DuelStage::Final => "final".to_string(),
        other => format!("{}-{}", other, match_index + 1),
    }
}

// ---------------------------------------------------------------------------
// Match records
// ---------------------------------------------------------------------------

/// Name and rank of one duel side, as shown in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelParticipant {
    pub face: String,
    pub rank: u32,
}

impl From<&Seed> for DuelParticipant {
    fn from(seed: &Seed) -> Self {
        Self {
            face: seed.face.clone(),
            rank: seed.rank,
        }
    }
}

/// One completed duel. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round_label: String,
    pub left: DuelParticipant,
    pub right: DuelParticipant,
    pub chosen: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller-contract violations on `advance`. The state the caller holds is
/// untouched in every error case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error("pick '{pick}' is not in the current pair ({left} vs {right})")]
    NotInCurrentPair {
        pick: String,
        left: String,
        right: String,
    },
    #[error("tournament is already complete")]
    TournamentComplete,
}

// ---------------------------------------------------------------------------
// TournamentState
// ---------------------------------------------------------------------------

/// Tournament progress as a tagged union. States are never revisited; the
/// only way forward is `advance`, and the only terminal shape is `Complete`
/// with exactly one champion (or none, for an empty session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TournamentState {
    InProgress {
        bracket: Bracket,
        stage: DuelStage,
        /// Remaining pairs of the current round, in fixed order.
        pairs: Vec<(Seed, Seed)>,
        /// Index of the pair awaiting a pick.
        next_pair: usize,
        /// Winners accumulated in the current round.
        winners: Vec<Seed>,
        match_log: Vec<MatchRecord>,
        /// Machine-picked secondary, fixed at open time.
        secondary: Option<Seed>,
    },
    Complete {
        final_winner: Option<Seed>,
        secondary_face: Option<Seed>,
        is_pure_match: bool,
        match_log: Vec<MatchRecord>,
    },
}

impl TournamentState {
    /// Enter the tournament phase. Fewer than two seeds short-circuits to a
    /// solo `Complete` with no duels; otherwise the opening round is dealt
    /// from the bracket's fixed pairing table.
    pub fn open(seeds: &[Seed], secondary: Option<Seed>) -> Self {
        match build_bracket(seeds) {
            Ok(bracket) => {
                let stage = DuelStage::opening_for(bracket.size);
                let pairs = bracket.opening_pairs();
                Self::InProgress {
                    bracket,
                    stage,
                    pairs,
                    next_pair: 0,
                    winners: Vec::new(),
                    match_log: Vec::new(),
                    secondary,
                }
            }
            Err(_) => {
                let final_winner = seeds.first().cloned();
                let is_pure_match = pure_match(final_winner.as_ref(), secondary.as_ref());
                Self::Complete {
                    final_winner,
                    secondary_face: secondary,
                    is_pure_match,
                    match_log: Vec::new(),
                }
            }
        }
    }

    /// Consume one user pick for the current pair and return the advanced
    /// state. Rejects picks naming neither participant.
    pub fn advance(&self, pick: &str) -> Result<Self, DuelError> {
        let Self::InProgress {
            bracket,
            stage,
            pairs,
            next_pair,
            winners,
            match_log,
            secondary,
        } = self
        else {
            return Err(DuelError::TournamentComplete);
        };

        let Some((left, right)) = pairs.get(*next_pair) else {
            return Err(DuelError::TournamentComplete);
        };
        let chosen = if pick == left.face {
            left.clone()
        } else if pick == right.face {
            right.clone()
        } else {
            return Err(DuelError::NotInCurrentPair {
                pick: pick.to_string(),
                left: left.face.clone(),
                right: right.face.clone(),
            });
        };

        let mut log = match_log.clone();
        log.push(MatchRecord {
            round_label: round_label(*stage, *next_pair),
            left: DuelParticipant::from(left),
            right: DuelParticipant::from(right),
            chosen: chosen.face.clone(),
        });

        let mut round_winners = winners.clone();
        round_winners.push(chosen);

        // More pairs left in this round.
        if next_pair + 1 < pairs.len() {
            return Ok(Self::InProgress {
                bracket: bracket.clone(),
                stage: *stage,
                pairs: pairs.clone(),
                next_pair: next_pair + 1,
                winners: round_winners,
                match_log: log,
                secondary: secondary.clone(),
            });
        }

        // Round finished with a single winner: champion found.
        if round_winners.len() == 1 {
            let final_winner = round_winners.into_iter().next();
            let is_pure_match = pure_match(final_winner.as_ref(), secondary.as_ref());
            return Ok(Self::Complete {
                final_winner,
                secondary_face: secondary.clone(),
                is_pure_match,
                match_log: log,
            });
        }

        // Deal the next round: winners meet in accumulation order. A round
        // that ends with multiple winners always has a next stage.
        let next_stage = stage.next().unwrap_or(DuelStage::Final);
        let next_pairs: Vec<(Seed, Seed)> = round_winners
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        Ok(Self::InProgress {
            bracket: bracket.clone(),
            stage: next_stage,
            pairs: next_pairs,
            next_pair: 0,
            winners: Vec::new(),
            match_log: log,
            secondary: secondary.clone(),
        })
    }

    /// The pair awaiting a pick, if any.
    pub fn current_pair(&self) -> Option<(&Seed, &Seed)> {
        match self {
            Self::InProgress {
                pairs, next_pair, ..
            } => pairs.get(*next_pair).map(|(a, b)| (a, b)),
            Self::Complete { .. } => None,
        }
    }

    pub fn stage(&self) -> Option<DuelStage> {
        match self {
            Self::InProgress { stage, .. } => Some(*stage),
            Self::Complete { .. } => None,
        }
    }

    pub fn match_log(&self) -> &[MatchRecord] {
        match self {
            Self::InProgress { match_log, .. } => match_log,
            Self::Complete { match_log, .. } => match_log,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    pub fn final_winner(&self) -> Option<&Seed> {
        match self {
            Self::Complete { final_winner, .. } => final_winner.as_ref(),
            Self::InProgress { .. } => None,
        }
    }

    pub fn secondary_face(&self) -> Option<&Seed> {
        match self {
            Self::Complete { secondary_face, .. } => secondary_face.as_ref(),
            Self::InProgress { secondary, .. } => secondary.as_ref(),
        }
    }

    /// Whether the machine secondary equals the champion. `false` until
    /// complete.
    pub fn is_pure_match(&self) -> bool {
        matches!(
            self,
            Self::Complete {
                is_pure_match: true,
                ..
            }
        )
    }
}

fn pure_match(winner: Option<&Seed>, secondary: Option<&Seed>) -> bool {
    match (winner, secondary) {
        (Some(w), Some(s)) => w.face == s.face,
        _ => false,
    }
}
