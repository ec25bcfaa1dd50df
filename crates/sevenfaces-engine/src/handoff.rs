//! Durable handoff payload for the results surface.
//!
//! Plain serializable record — primitives, arrays, and named-field structs
//! only — so any presentation layer can persist or transport it as JSON.
//! Carries a SHA-256 `payload_id` over the canonical answer encoding plus
//! the champion name for stable referencing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::answer_event::AnswerEvent;
use crate::duel_engine::{MatchRecord, TournamentState};
use crate::seed_rank::Seed;
use crate::tie_break::canonical_answer_string;

pub const HANDOFF_SCHEMA_VERSION: &str = "sevenfaces.handoff.v1";

/// Separator between the answer encoding and the champion name inside the
/// fingerprint preimage.
const PAYLOAD_ID_SEPARATOR: &str = "@@";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HandoffError {
    /// The tournament has not produced a champion yet.
    #[error("tournament is not complete")]
    TournamentNotComplete,
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// HandoffPayload
// ---------------------------------------------------------------------------

/// Everything the result page needs, in one flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffPayload {
    pub schema_version: String,
    /// SHA-256 hex over the canonical answers + champion name.
    pub payload_id: String,
    pub answers: Vec<AnswerEvent>,
    pub final_winner: Option<Seed>,
    pub secondary_face: Option<Seed>,
    pub is_pure_match: bool,
    pub match_log: Vec<MatchRecord>,
}

impl HandoffPayload {
    /// Fold a completed tournament and its answer history into the payload.
    pub fn from_state(
        state: &TournamentState,
        answers: &[AnswerEvent],
    ) -> Result<Self, HandoffError> {
        let TournamentState::Complete {
            final_winner,
            secondary_face,
            is_pure_match,
            match_log,
        } = state
        else {
            return Err(HandoffError::TournamentNotComplete);
        };

        Ok(Self {
            schema_version: HANDOFF_SCHEMA_VERSION.to_string(),
            payload_id: payload_id(answers, final_winner.as_ref().map(|s| s.face.as_str())),
            answers: answers.to_vec(),
            final_winner: final_winner.clone(),
            secondary_face: secondary_face.clone(),
            is_pure_match: *is_pure_match,
            match_log: match_log.clone(),
        })
    }

    pub fn to_json(&self) -> Result<String, HandoffError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, HandoffError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Content fingerprint of a completed session: canonical answers, a
/// separator, and the champion name (`-` for a winnerless session).
pub fn payload_id(answers: &[AnswerEvent], winner: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_answer_string(answers).as_bytes());
    hasher.update(PAYLOAD_ID_SEPARATOR.as_bytes());
    hasher.update(winner.unwrap_or("-").as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_event::{Category, DetailCode, MoveType, QuizPhase};
    use crate::duel_engine::TournamentState;
    use crate::tie_break::TieBreakHash;

    fn tap(category: Category, detail: i8, tick: u64) -> AnswerEvent {
        AnswerEvent {
            phase: QuizPhase::Lean,
            category,
            move_type: MoveType::Act,
            detail: DetailCode::new(detail).expect("valid detail"),
            timestamp_tick: tick,
        }
    }

    fn seed(face: &str, rank: u32) -> Seed {
        Seed {
            face: face.to_string(),
            category: Category::Control,
            vote_weight: 1,
            win_probability_millionths: 500_000,
            margin_millionths: 0,
            tie_break_hash: TieBreakHash(rank),
            rank,
        }
    }

    fn completed_state() -> TournamentState {
        let seeds = vec![seed("Director", 1), seed("Navigator", 2)];
        TournamentState::open(&seeds, Some(seed("Navigator", 2)))
            .advance("Director")
            .expect("valid pick")
    }

    // -- Construction --

    #[test]
    fn in_progress_state_cannot_be_folded() {
        let seeds = vec![seed("Director", 1), seed("Navigator", 2)];
        let state = TournamentState::open(&seeds, None);
        assert!(matches!(
            HandoffPayload::from_state(&state, &[]),
            Err(HandoffError::TournamentNotComplete)
        ));
    }

    #[test]
    fn payload_carries_winner_secondary_and_log() {
        let answers = vec![tap(Category::Control, -1, 0)];
        let payload = HandoffPayload::from_state(&completed_state(), &answers).expect("payload");
        assert_eq!(payload.schema_version, HANDOFF_SCHEMA_VERSION);
        assert_eq!(payload.final_winner.as_ref().expect("winner").face, "Director");
        assert_eq!(
            payload.secondary_face.as_ref().expect("secondary").face,
            "Navigator"
        );
        assert!(!payload.is_pure_match);
        assert_eq!(payload.match_log.len(), 1);
        assert_eq!(payload.answers, answers);
    }

    // -- Fingerprint --

    #[test]
    fn payload_id_is_deterministic_and_winner_sensitive() {
        let answers = vec![tap(Category::Pace, 2, 0)];
        assert_eq!(
            payload_id(&answers, Some("Sprinter")),
            payload_id(&answers, Some("Sprinter"))
        );
        assert_ne!(
            payload_id(&answers, Some("Sprinter")),
            payload_id(&answers, Some("Strider"))
        );
        assert_ne!(payload_id(&answers, Some("Sprinter")), payload_id(&[], Some("Sprinter")));
    }

    #[test]
    fn payload_id_ignores_timestamps() {
        let a = vec![tap(Category::Pace, 2, 1)];
        let b = vec![tap(Category::Pace, 2, 999_999)];
        assert_eq!(payload_id(&a, None), payload_id(&b, None));
    }

    #[test]
    fn payload_id_is_sixty_four_hex_chars() {
        let id = payload_id(&[], None);
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    // -- Round trip --

    #[test]
    fn json_round_trip_preserves_the_result() {
        let answers = vec![tap(Category::Control, -1, 0), tap(Category::Truth, 3, 1)];
        let payload = HandoffPayload::from_state(&completed_state(), &answers).expect("payload");
        let json = payload.to_json().expect("to_json");
        let restored = HandoffPayload::from_json(&json).expect("from_json");
        assert_eq!(restored, payload);
        assert_eq!(
            restored.final_winner.expect("winner").face,
            "Director"
        );
        assert_eq!(restored.match_log.len(), payload.match_log.len());
    }
}
