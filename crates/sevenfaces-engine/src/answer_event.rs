//! Closed answer vocabulary: categories, faces, move types, phases, and the
//! immutable answer event.
//!
//! Every type here is a closed set — the resolver, seed builder, and duel
//! engine all pattern-match exhaustively over these enums, so adding a
//! category or move type is a compile-visible change.
//!
//! `timestamp_tick` is a logical tick and is informational only: nothing
//! downstream may read it when scoring, ordering, or hashing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which of a category's two paired faces an event or result points at.
///
/// `Left` is always the category's first-listed face and doubles as the
/// fixed default on exact probability ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Category — the seven fixed decision domains
// ---------------------------------------------------------------------------

/// One of the seven fixed decision domains the quiz measures.
///
/// Each category permanently pairs exactly two faces; the pairing is part of
/// the domain vocabulary and never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Control,
    Pace,
    Boundary,
    Truth,
    Recognition,
    Bonding,
    Stress,
}

impl Category {
    /// All categories in canonical resolution order.
    pub const ALL: [Category; 7] = [
        Category::Control,
        Category::Pace,
        Category::Boundary,
        Category::Truth,
        Category::Recognition,
        Category::Bonding,
        Category::Stress,
    ];

    /// The category's two faces as `(left, right)`.
    pub fn faces(self) -> (&'static str, &'static str) {
        match self {
            Self::Control => ("Director", "Navigator"),
            Self::Pace => ("Sprinter", "Strider"),
            Self::Boundary => ("Guardian", "Bridger"),
            Self::Truth => ("Candor", "Diplomat"),
            Self::Recognition => ("Spotlight", "Backstage"),
            Self::Bonding => ("Anchor", "Voyager"),
            Self::Stress => ("Surger", "Steadier"),
        }
    }

    /// Face name for a side of this category.
    pub fn face_for(self, side: Side) -> &'static str {
        let (left, right) = self.faces();
        match side {
            Side::Left => left,
            Side::Right => right,
        }
    }

    /// Fixed side that wins an exact probability tie in this category.
    ///
    /// Always the first-listed face. Documented here so the rule is
    /// auditable in one place; applied identically on every run.
    pub fn tie_default_side(self) -> Side {
        Side::Left
    }

    /// Which side of this category a face name belongs to, if either.
    pub fn side_of(self, face: &str) -> Option<Side> {
        let (left, right) = self.faces();
        if face == left {
            Some(Side::Left)
        } else if face == right {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Lowercase category name, used in canonical encodings and labels.
    pub fn name(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Pace => "pace",
            Self::Boundary => "boundary",
            Self::Truth => "truth",
            Self::Recognition => "recognition",
            Self::Bonding => "bonding",
            Self::Stress => "stress",
        }
    }

    /// Single-character code used in the canonical hash fragment.
    ///
    /// Boundary and Bonding share `b`; the fragment stream is identical for
    /// every seed of a session, so distinctness comes from the appended face
    /// name, not from this code.
    pub fn short_code(self) -> char {
        match self {
            Self::Control => 'c',
            Self::Pace => 'p',
            Self::Boundary => 'b',
            Self::Truth => 't',
            Self::Recognition => 'r',
            Self::Bonding => 'b',
            Self::Stress => 's',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// MoveType — response style
// ---------------------------------------------------------------------------

/// Three-way response style attached to every answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Decisive move toward an option.
    Act,
    /// Exploratory move; weaker directional signal.
    Scan,
    /// Backing out / neutral; carries no directional signal.
    Reset,
}

impl MoveType {
    pub const ALL: [MoveType; 3] = [MoveType::Act, MoveType::Scan, MoveType::Reset];

    /// Directional multiplier applied to an event's side weight.
    pub fn directional_factor(self) -> i64 {
        match self {
            Self::Act => 2,
            Self::Scan => 1,
            Self::Reset => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Act => "act",
            Self::Scan => "scan",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// QuizPhase
// ---------------------------------------------------------------------------

/// Where in the quiz an answer was captured.
///
/// Early taps are soft leans; later taps are explicit choices and weigh
/// three times as much in the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    Lean,
    Explicit,
}

impl QuizPhase {
    /// Tally weight of an event captured in this phase.
    pub fn signal_weight(self) -> i64 {
        match self {
            Self::Lean => 1,
            Self::Explicit => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lean => "lean",
            Self::Explicit => "explicit",
        }
    }
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// DetailCode — validated fine-grained choice code
// ---------------------------------------------------------------------------

/// Range of a valid detail code.
pub const DETAIL_CODE_MIN: i8 = -3;
pub const DETAIL_CODE_MAX: i8 = 3;

/// Detail code outside `[-3, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("detail code {value} outside [-3, 3]")]
pub struct DetailCodeOutOfRange {
    pub value: i8,
}

/// Fine-grained choice code in `[-3, 3]`.
///
/// Sign picks the side (negative = left, positive = right, zero =
/// undirected); magnitude is the strength of the lean.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i8", into = "i8")]
pub struct DetailCode(i8);

impl DetailCode {
    pub fn new(value: i8) -> Result<Self, DetailCodeOutOfRange> {
        if (DETAIL_CODE_MIN..=DETAIL_CODE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DetailCodeOutOfRange { value })
        }
    }

    /// Build a code from an arbitrary value, clamping into range.
    pub fn clamped(value: i8) -> Self {
        Self(value.clamp(DETAIL_CODE_MIN, DETAIL_CODE_MAX))
    }

    pub fn value(self) -> i8 {
        self.0
    }

    /// Side this code points at; `None` for zero.
    pub fn side(self) -> Option<Side> {
        match self.0 {
            v if v < 0 => Some(Side::Left),
            v if v > 0 => Some(Side::Right),
            _ => None,
        }
    }

    /// Lean strength 0..=3.
    pub fn strength(self) -> i64 {
        i64::from(self.0.unsigned_abs())
    }
}

impl TryFrom<i8> for DetailCode {
    type Error = DetailCodeOutOfRange;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DetailCode> for i8 {
    fn from(code: DetailCode) -> i8 {
        code.0
    }
}

impl fmt::Display for DetailCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AnswerEvent
// ---------------------------------------------------------------------------

/// One captured answer tap. Immutable once created; the session holds these
/// in original answer order, and that order is load-bearing for both the
/// tie-break hash and phase weighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub phase: QuizPhase,
    pub category: Category,
    pub move_type: MoveType,
    pub detail: DetailCode,
    /// Logical capture tick. Informational only — never read by scoring,
    /// ordering, or hashing.
    pub timestamp_tick: u64,
}

impl AnswerEvent {
    /// Canonical fragment `{category-code}:{move_type}:{detail}` consumed by
    /// the tie-break hash. Timestamp-free on purpose.
    pub fn canonical_fragment(&self) -> String {
        format!(
            "{}:{}:{}",
            self.category.short_code(),
            self.move_type,
            self.detail
        )
    }

    /// Directional tally weight of this event: phase weight times move-type
    /// factor times detail strength. Zero for undirected events.
    pub fn directional_weight(&self) -> i64 {
        self.phase.signal_weight() * self.move_type.directional_factor() * self.detail.strength()
    }
}
