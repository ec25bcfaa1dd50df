#![forbid(unsafe_code)]

//! Deterministic personality-quiz scoring and tournament-resolution engine.
//!
//! A session is an ordered list of answer events. The resolver tallies them
//! into per-category verdicts, the seed builder ranks candidate faces with
//! a hash-backed total order, the bracket builder lays out a fixed
//! single-elimination topology, and the duel engine advances user picks to
//! one champion plus a machine-picked secondary.
//!
//! Everything is pure and synchronous: same answers and same picks always
//! reproduce bit-identical results. Fractions are fixed-point millionths;
//! there are no floats, no clocks, and no randomness anywhere in scoring.

pub mod answer_event;
pub mod bracket_plan;
pub mod category_resolver;
pub mod duel_engine;
pub mod handoff;
pub mod pipeline;
pub mod seed_rank;
pub mod tie_break;

pub use answer_event::{AnswerEvent, Category, DetailCode, MoveType, QuizPhase, Side};
pub use bracket_plan::{build_bracket, Bracket, BracketSize, NotEnoughSeeds};
pub use category_resolver::{resolve_all_categories, CategoryResult, ConfidenceBand};
pub use duel_engine::{DuelError, DuelStage, MatchRecord, TournamentState};
pub use handoff::{HandoffError, HandoffPayload, HANDOFF_SCHEMA_VERSION};
pub use pipeline::{finish_session, start_session, SessionSetup};
pub use seed_rank::{build_ranked_seeds, compute_secondary, Seed};
pub use tie_break::TieBreakHash;
