//! Session pipeline: resolve, seed, and open the tournament in one pure
//! call, with structured event records for observability.
//!
//! The events travel in the return value rather than through a global
//! logger; consumers decide what to do with them.

use serde::{Deserialize, Serialize};

use crate::answer_event::AnswerEvent;
use crate::category_resolver::{resolve_all_categories, CategoryResult};
use crate::duel_engine::TournamentState;
use crate::handoff::{HandoffError, HandoffPayload};
use crate::seed_rank::{build_ranked_seeds, compute_secondary, Seed};

pub const PIPELINE_COMPONENT: &str = "pipeline";

/// One structured observability record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub component: String,
    pub event: String,
    pub outcome: String,
}

impl PipelineEvent {
    fn new(event: &str, outcome: String) -> Self {
        Self {
            component: PIPELINE_COMPONENT.to_string(),
            event: event.to_string(),
            outcome,
        }
    }
}

/// Everything produced on entry to the tournament phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSetup {
    pub category_results: Vec<CategoryResult>,
    pub seeds: Vec<Seed>,
    pub secondary: Option<Seed>,
    pub state: TournamentState,
    pub events: Vec<PipelineEvent>,
}

/// Run the full front half of the pipeline: resolver, seed builder,
/// secondary, tournament open.
pub fn start_session(answers: &[AnswerEvent]) -> SessionSetup {
    let category_results = resolve_all_categories(answers);
    let seeds = build_ranked_seeds(&category_results, answers);
    let secondary = compute_secondary(&category_results, answers, &seeds);
    let state = TournamentState::open(&seeds, secondary.clone());

    let events = vec![
        PipelineEvent::new("resolve", format!("{} categories", category_results.len())),
        PipelineEvent::new("seed", format!("{} seeds", seeds.len())),
        PipelineEvent::new(
            "open",
            if state.is_complete() {
                "solo".to_string()
            } else {
                "in_progress".to_string()
            },
        ),
    ];

    SessionSetup {
        category_results,
        seeds,
        secondary,
        state,
        events,
    }
}

/// Fold a finished tournament into the durable handoff payload.
pub fn finish_session(
    state: &TournamentState,
    answers: &[AnswerEvent],
) -> Result<HandoffPayload, HandoffError> {
    HandoffPayload::from_state(state, answers)
}
