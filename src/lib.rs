//! Beach tennis tournament web app: library with models and the bracket /
//! standings engine.

pub mod logic;
pub mod models;

pub use logic::{
    bracket_view, cancel_match, compute_standings, discard_group_stage, discard_knockout_bracket,
    generate_group_stage_matches, generate_groups, generate_knockout_bracket, group_standings,
    partition, rank_group, record_match_result, record_tie_draw, round_robin_pairs,
    schedule_match, seed, start_match, BracketView, GroupSizingPlan,
};
pub use models::{
    Group, GroupId, GroupSlot, GroupStanding, Match, MatchId, MatchStatus, RecordedScore, Round,
    ScoringConfig, Side, Slot, Team, TeamId, Tournament, TournamentError, TournamentId,
    TournamentState, MAX_TEAMS, MIN_TEAMS,
};
