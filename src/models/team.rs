//! Team data structure (a beach tennis doubles pair).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in groups, matches and lookups).
pub type TeamId = Uuid;

/// A registered doubles team.
///
/// `ranking_points` drives seeding only; it never changes while a tournament
/// is running.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub player1: String,
    pub player2: String,
    pub ranking_points: u32,
}

impl Team {
    /// Create a new team with a fresh id.
    pub fn new(
        name: impl Into<String>,
        player1: impl Into<String>,
        player2: impl Into<String>,
        ranking_points: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            player1: player1.into(),
            player2: player2.into(),
            ranking_points,
        }
    }
}
