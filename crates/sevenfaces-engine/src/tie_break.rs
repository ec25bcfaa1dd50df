//! Deterministic tie-break hash for seed ranking.
//!
//! 32-bit FNV-1a over the canonical answer string: every answer's
//! `{category-code}:{move_type}:{detail}` fragment in original answer order,
//! joined by `|`, with `@` and the face name appended. Plain byte loop with
//! wrapping arithmetic — no locale, float, or platform dependence, so the
//! same session hashes identically everywhere.
//!
//! Golden vectors at the bottom pin the exact outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer_event::AnswerEvent;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Delimiter between answer fragments in the canonical string.
const FRAGMENT_DELIMITER: char = '|';
/// Separator between the fragment stream and the appended face name.
const FACE_SEPARATOR: char = '@';

// ---------------------------------------------------------------------------
// TieBreakHash
// ---------------------------------------------------------------------------

/// 32-bit tie-break hash of (answer history, face name).
///
/// The seed comparator sorts on this after all natural scores, which makes
/// the seed ordering a strict total order: two distinct faces can never
/// carry the same canonical string, so ties cannot survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TieBreakHash(pub u32);

impl TieBreakHash {
    /// Hash the canonical answer string for `face`.
    pub fn for_face(answers: &[AnswerEvent], face: &str) -> Self {
        let canonical = canonical_answer_string(answers);
        let mut keyed = String::with_capacity(canonical.len() + 1 + face.len());
        keyed.push_str(&canonical);
        keyed.push(FACE_SEPARATOR);
        keyed.push_str(face);
        Self(fnv1a32(keyed.as_bytes()))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TieBreakHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tiebreak:{:08x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Canonical string
// ---------------------------------------------------------------------------

/// Canonical, timestamp-free encoding of an answer history.
///
/// Order-preserving: the same taps in a different order produce a different
/// string, and therefore different tie-break hashes.
pub fn canonical_answer_string(answers: &[AnswerEvent]) -> String {
    let mut out = String::new();
    for (index, answer) in answers.iter().enumerate() {
        if index > 0 {
            out.push(FRAGMENT_DELIMITER);
        }
        out.push_str(&answer.canonical_fragment());
    }
    out
}

/// 32-bit FNV-1a.
fn fnv1a32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in data {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_event::{AnswerEvent, Category, DetailCode, MoveType, QuizPhase};

    fn tap(
        phase: QuizPhase,
        category: Category,
        move_type: MoveType,
        detail: i8,
        tick: u64,
    ) -> AnswerEvent {
        AnswerEvent {
            phase,
            category,
            move_type,
            detail: DetailCode::new(detail).expect("valid detail"),
            timestamp_tick: tick,
        }
    }

    fn sample_answers() -> Vec<AnswerEvent> {
        vec![
            tap(QuizPhase::Lean, Category::Control, MoveType::Act, -2, 10),
            tap(QuizPhase::Explicit, Category::Pace, MoveType::Scan, 3, 20),
        ]
    }

    // -- Canonical string --

    #[test]
    fn canonical_string_of_empty_history_is_empty() {
        assert_eq!(canonical_answer_string(&[]), "");
    }

    #[test]
    fn canonical_string_joins_fragments_in_answer_order() {
        assert_eq!(canonical_answer_string(&sample_answers()), "c:act:-2|p:scan:3");
    }

    #[test]
    fn canonical_string_is_timestamp_free() {
        let mut shifted = sample_answers();
        for answer in &mut shifted {
            answer.timestamp_tick += 1_000_000;
        }
        assert_eq!(
            canonical_answer_string(&sample_answers()),
            canonical_answer_string(&shifted)
        );
    }

    #[test]
    fn canonical_string_is_order_sensitive() {
        let mut reversed = sample_answers();
        reversed.reverse();
        assert_ne!(
            canonical_answer_string(&sample_answers()),
            canonical_answer_string(&reversed)
        );
    }

    // -- Golden vectors --

    #[test]
    fn golden_vector_fnv_offset_basis() {
        assert_eq!(fnv1a32(b""), 0x811c_9dc5);
    }

    #[test]
    fn golden_vector_project_name() {
        assert_eq!(fnv1a32(b"sevenfaces"), 0xbf21_4d7c);
    }

    #[test]
    fn golden_vector_empty_history() {
        let hash = TieBreakHash::for_face(&[], "Anchor");
        assert_eq!(hash.as_u32(), 0x7843_dae6);
    }

    #[test]
    fn golden_vector_sample_history() {
        let answers = sample_answers();
        assert_eq!(
            TieBreakHash::for_face(&answers, "Director").as_u32(),
            0x42f1_7e25
        );
        assert_eq!(
            TieBreakHash::for_face(&answers, "Navigator").as_u32(),
            0x8e01_6c92
        );
    }

    // -- Distinctness --

    #[test]
    fn all_fourteen_faces_hash_distinctly_for_one_history() {
        let answers = vec![tap(QuizPhase::Lean, Category::Control, MoveType::Act, -1, 0)];
        let mut seen = std::collections::BTreeSet::new();
        for category in Category::ALL {
            let (left, right) = category.faces();
            seen.insert(TieBreakHash::for_face(&answers, left).as_u32());
            seen.insert(TieBreakHash::for_face(&answers, right).as_u32());
        }
        assert_eq!(seen.len(), 14);
    }

    #[test]
    fn hash_is_deterministic_across_calls() {
        let answers = sample_answers();
        let first = TieBreakHash::for_face(&answers, "Guardian");
        let second = TieBreakHash::for_face(&answers, "Guardian");
        assert_eq!(first, second);
    }

    #[test]
    fn display_renders_fixed_width_hex() {
        let hash = TieBreakHash(0x1a2b);
        assert_eq!(hash.to_string(), "tiebreak:00001a2b");
    }

    #[test]
    fn tie_break_hash_serialization_round_trip() {
        let hash = TieBreakHash::for_face(&sample_answers(), "Candor");
        let json = serde_json::to_string(&hash).expect("serialize");
        let restored: TieBreakHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(hash, restored);
    }
}
