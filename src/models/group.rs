//! Group and GroupStanding data structures for the group stage.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A team's place inside a group, with the snake-draft round it was drawn in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupSlot {
    pub team_id: TeamId,
    /// Draft round the team was assigned in (1 = top seeds).
    pub seed_position: u32,
}

/// A group in the group stage: `Group A`, `Group B`, ...
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// 1-based position in the group list; also drives the letter in `name`.
    pub display_order: u32,
    pub members: Vec<GroupSlot>,
}

impl Group {
    /// Create the `display_order`-th group ("Group A" for 1, and so on).
    /// Group counts never exceed 26; `MAX_TEAMS` keeps the draw within the
    /// single-letter names.
    pub fn new(display_order: u32) -> Self {
        debug_assert!((1..=26).contains(&display_order));
        let letter = (b'A' + (display_order - 1) as u8) as char;
        Self {
            id: Uuid::new_v4(),
            name: format!("Group {letter}"),
            display_order,
            members: Vec::new(),
        }
    }

    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.members.iter().map(|m| m.team_id)
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.members.iter().any(|m| m.team_id == team_id)
    }
}

/// Per-team aggregate over a group's completed matches.
///
/// Always derived from match state, never stored: rebuilding from scratch on
/// every read keeps corrections to already-completed matches consistent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStanding {
    pub team_id: TeamId,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
}

impl GroupStanding {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            ..Default::default()
        }
    }

    /// Game difference ("SG" on the standings table): games won minus lost.
    pub fn game_difference(&self) -> i64 {
        self.games_won as i64 - self.games_lost as i64
    }
}
