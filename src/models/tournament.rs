//! Tournament aggregate, state machine and error type.

use crate::models::group::{Group, GroupId};
use crate::models::matches::{Match, MatchId, Round};
use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Minimum number of teams for a tournament (below this there is no draw).
pub const MIN_TEAMS: usize = 3;

/// Maximum number of teams for a tournament. 104 is the largest count whose
/// draw still fits the single-letter group names `Group A` through `Group Z`.
pub const MAX_TEAMS: usize = 104;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Team count outside the range the draw supports.
    InvalidTeamCount {
        count: usize,
        min: usize,
        max: usize,
    },
    /// Groups / matches / bracket already generated for this tournament.
    AlreadyGenerated,
    /// A knockout match's team slots are not resolved yet (upstream round
    /// incomplete).
    UnresolvedDependency,
    /// Standings cannot be ordered automatically; a manual draw is required.
    TiedPositionRequiresDraw {
        group_id: GroupId,
        team_ids: Vec<TeamId>,
    },
    /// A recorded game score does not determine a winner (e.g. 6-6).
    InvalidScore,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    TeamNotFound(TeamId),
    GroupNotFound(GroupId),
    MatchNotFound(MatchId),
    /// A tie draw must list exactly the tied teams, each once.
    InvalidDrawOrder,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidTeamCount { count, min, max } => {
                write!(f, "Team count {} is outside the supported range of {} to {}", count, min, max)
            }
            TournamentError::AlreadyGenerated => write!(f, "Already generated for this tournament"),
            TournamentError::UnresolvedDependency => {
                write!(f, "Previous round is not completed yet")
            }
            TournamentError::TiedPositionRequiresDraw { team_ids, .. } => {
                write!(f, "{} teams remain tied; a manual draw is required", team_ids.len())
            }
            TournamentError::InvalidScore => write!(f, "Score does not determine a winner"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::DuplicateTeamName => {
                write!(f, "A team with this name already exists")
            }
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::GroupNotFound(_) => write!(f, "Group not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidDrawOrder => {
                write!(f, "Draw order must cover exactly the tied teams")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Registering teams; no draw yet.
    #[default]
    Registration,
    /// Groups drawn; group-stage matches not generated yet.
    GroupsDrawn,
    /// Group-stage matches exist; results being recorded.
    GroupStage,
    /// Knockout bracket exists; results being recorded.
    KnockoutStage,
    /// Final completed; champion decided. Terminal.
    Completed,
}

/// Points awarded per group-stage result. Kept explicit so the league can
/// change its table without touching the standings code.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub points_per_win: u32,
    pub points_per_loss: u32,
    /// Points for the losing side of a walkover.
    pub points_per_walkover_loss: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_win: 2,
            points_per_loss: 1,
            points_per_walkover_loss: 0,
        }
    }
}

/// Full tournament state: teams, groups, matches, draws and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    pub scoring: ScoringConfig,
    /// Confirmed teams (registration snapshot once groups are drawn).
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    /// All matches, group stage and knockout, in match_number order.
    pub matches: Vec<Match>,
    /// Manual draw outcomes for ties standings cannot break (per group, the
    /// tied teams in drawn order).
    pub tie_draws: HashMap<GroupId, Vec<TeamId>>,
    pub champion: Option<TeamId>,
    pub state: TournamentState,
    /// Next tournament-wide match number to hand out.
    pub next_match_number: u32,
}

impl Tournament {
    /// Create a new tournament in Registration state with no teams.
    pub fn new(title: impl Into<String>, scoring: ScoringConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            scoring,
            teams: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
            tie_draws: HashMap::new(),
            champion: None,
            state: TournamentState::Registration,
            next_match_number: 1,
        }
    }

    /// Register a team (Registration only). Names must be unique (case-insensitive).
    pub fn register_team(
        &mut self,
        name: impl Into<String>,
        player1: impl Into<String>,
        player2: impl Into<String>,
        ranking_points: u32,
    ) -> Result<TeamId, TournamentError> {
        if self.state != TournamentState::Registration {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::InvalidState);
        }
        let is_duplicate = self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = Team::new(name_trimmed, player1, player2, ranking_points);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Register a batch of teams, all or nothing: every row must validate
    /// (including duplicates within the batch) or the roster is left
    /// untouched. Backs the bulk CSV import.
    pub fn register_teams<'a, I>(&mut self, rows: I) -> Result<Vec<TeamId>, TournamentError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str, u32)>,
    {
        let mut staged = self.clone();
        let mut ids = Vec::new();
        for (name, player1, player2, ranking_points) in rows {
            ids.push(staged.register_team(name, player1, player2, ranking_points)?);
        }
        *self = staged;
        Ok(ids)
    }

    /// Remove a team by id (Registration only).
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Registration {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        Ok(())
    }

    pub fn team(&self, team_id: TeamId) -> Result<&Team, TournamentError> {
        self.teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))
    }

    pub fn group(&self, group_id: GroupId) -> Result<&Group, TournamentError> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or(TournamentError::GroupNotFound(group_id))
    }

    pub fn match_by_id(&self, match_id: MatchId) -> Result<&Match, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))
    }

    pub fn match_by_id_mut(&mut self, match_id: MatchId) -> Result<&mut Match, TournamentError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))
    }

    /// Group-stage matches belonging to the given group.
    pub fn group_matches(&self, group_id: GroupId) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(move |m| m.group_id == Some(group_id))
    }

    /// Knockout matches (no owning group), in match_number order.
    pub fn knockout_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(|m| m.round != Round::GroupStage)
    }

    /// Hand out the next tournament-wide match number.
    pub fn take_match_number(&mut self) -> u32 {
        let n = self.next_match_number;
        self.next_match_number += 1;
        n
    }
}
