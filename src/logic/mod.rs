//! Tournament engine logic: partitioning, seeding, scheduling, standings,
//! results and the knockout bracket.

mod knockout;
mod partition;
mod results;
mod scheduling;
mod seeding;
mod standings;

pub use knockout::{bracket_view, discard_knockout_bracket, generate_knockout_bracket, BracketView};
pub use partition::{partition, GroupSizingPlan};
pub use results::{cancel_match, record_match_result, schedule_match, start_match};
pub use scheduling::{discard_group_stage, generate_group_stage_matches, round_robin_pairs};
pub use seeding::{generate_groups, seed};
pub use standings::{compute_standings, group_standings, rank_group, record_tie_draw};
