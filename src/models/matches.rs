//! Match, bracket slot, round and score data structures.

use crate::models::group::GroupId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of a match (team1 or team2).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    GroupStage,
    Quarterfinal,
    Semifinal,
    Final,
}

/// Match lifecycle state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A team slot in a match: resolved, or pending an upstream knockout winner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Team(TeamId),
    WinnerOf(MatchId),
}

impl Slot {
    pub fn team_id(&self) -> Option<TeamId> {
        match *self {
            Slot::Team(id) => Some(id),
            Slot::WinnerOf(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Team(_))
    }
}

/// A recorded result: a played game score, or a walkover ("WO") win for one
/// side with no games counted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordedScore {
    Games { team1: u32, team2: u32 },
    Walkover(Side),
}

impl RecordedScore {
    /// Which side this score declares as winner. `None` for a tied game score
    /// (not a valid result in a set-based sport; callers reject it).
    pub fn winning_side(&self) -> Option<Side> {
        match *self {
            RecordedScore::Games { team1, team2 } => {
                if team1 > team2 {
                    Some(Side::Team1)
                } else if team2 > team1 {
                    Some(Side::Team2)
                } else {
                    None
                }
            }
            RecordedScore::Walkover(side) => Some(side),
        }
    }
}

/// A single match: group stage or knockout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// None for knockout matches.
    pub group_id: Option<GroupId>,
    pub round: Round,
    /// Tournament-wide ordinal, assigned in generation order.
    pub match_number: u32,
    pub team1: Slot,
    pub team2: Slot,
    /// None until a result is recorded.
    pub score: Option<RecordedScore>,
    pub winner_id: Option<TeamId>,
    pub status: MatchStatus,
    /// Where this match's winner advances to (knockout only): the downstream
    /// match and the slot side to fill. Lets a corrected result re-propagate.
    pub winner_to: Option<(MatchId, Side)>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub court: Option<String>,
}

impl Match {
    pub fn new(
        group_id: Option<GroupId>,
        round: Round,
        match_number: u32,
        team1: Slot,
        team2: Slot,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            round,
            match_number,
            team1,
            team2,
            score: None,
            winner_id: None,
            status: MatchStatus::Scheduled,
            winner_to: None,
            scheduled_time: None,
            court: None,
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    /// Both team slots carry concrete teams.
    pub fn is_resolved(&self) -> bool {
        self.team1.is_resolved() && self.team2.is_resolved()
    }

    /// True if the given team occupies one of the match's resolved slots.
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1.team_id() == Some(team_id) || self.team2.team_id() == Some(team_id)
    }
}
