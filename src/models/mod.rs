//! Data structures for the tournament engine: teams, groups, matches, tournament state.

mod group;
mod matches;
mod team;
mod tournament;

pub use group::{Group, GroupId, GroupSlot, GroupStanding};
pub use matches::{Match, MatchId, MatchStatus, RecordedScore, Round, Side, Slot};
pub use team::{Team, TeamId};
pub use tournament::{
    ScoringConfig, Tournament, TournamentError, TournamentId, TournamentState, MAX_TEAMS,
    MIN_TEAMS,
};
