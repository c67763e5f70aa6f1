//! Standings: pure aggregation over completed matches and the ranking
//! tie-break cascade from the league rulebook.
//!
//! Standings are never stored; every read rebuilds them from match state, so
//! a corrected score can never leave stale aggregates behind.

use crate::models::{
    Group, GroupId, GroupStanding, Match, MatchStatus, RecordedScore, ScoringConfig, Side, TeamId,
    Tournament, TournamentError,
};
use std::cmp::Reverse;

/// Aggregate a group's completed matches into one standing row per team.
///
/// Scheduled, in-progress and cancelled matches contribute nothing. A
/// walkover counts as a win/loss at the configured point values with no games
/// on either side. Rows come back in group member order (pre-ranking).
pub fn compute_standings(
    group: &Group,
    completed: &[&Match],
    scoring: ScoringConfig,
) -> Vec<GroupStanding> {
    let mut table: Vec<GroupStanding> = group.team_ids().map(GroupStanding::new).collect();

    for m in completed {
        let (Some(team1), Some(team2), Some(score)) =
            (m.team1.team_id(), m.team2.team_id(), m.score)
        else {
            continue;
        };
        let Some(winning_side) = score.winning_side() else {
            continue;
        };

        for (side, team_id) in [(Side::Team1, team1), (Side::Team2, team2)] {
            let Some(row) = table.iter_mut().find(|s| s.team_id == team_id) else {
                continue;
            };
            row.matches_played += 1;
            let won = side == winning_side;
            if won {
                row.matches_won += 1;
                row.points += scoring.points_per_win;
            } else {
                row.matches_lost += 1;
                row.points += match score {
                    RecordedScore::Walkover(_) => scoring.points_per_walkover_loss,
                    RecordedScore::Games { .. } => scoring.points_per_loss,
                };
            }
            if let RecordedScore::Games { team1: g1, team2: g2 } = score {
                let (own, other) = match side {
                    Side::Team1 => (g1, g2),
                    Side::Team2 => (g2, g1),
                };
                row.games_won += own;
                row.games_lost += other;
            }
        }
    }

    table
}

/// Standings for one of the tournament's groups, unranked.
pub fn group_standings(
    tournament: &Tournament,
    group_id: GroupId,
) -> Result<Vec<GroupStanding>, TournamentError> {
    let group = tournament.group(group_id)?;
    let completed = completed_matches(tournament, group_id);
    Ok(compute_standings(group, &completed, tournament.scoring))
}

/// Rank a group by the rulebook cascade, each level only breaking ties the
/// previous one left:
///
/// 1. more points;
/// 2. exactly two tied: their head-to-head result (fall through if unplayed);
/// 3. three or more tied, or no head-to-head: more wins, then better game
///    difference;
/// 4. still tied: a recorded manual draw, or `TiedPositionRequiresDraw`.
pub fn rank_group(
    tournament: &Tournament,
    group_id: GroupId,
) -> Result<Vec<GroupStanding>, TournamentError> {
    let mut table = group_standings(tournament, group_id)?;
    let completed = completed_matches(tournament, group_id);
    let draw = tournament.tie_draws.get(&group_id).map(Vec::as_slice);

    table.sort_by_key(|s| Reverse(s.points));

    let mut ranked = Vec::with_capacity(table.len());
    for cluster in split_runs(table, |s| s.points) {
        ranked.extend(break_points_tie(group_id, cluster, &completed, draw)?);
    }
    Ok(ranked)
}

/// Record the outcome of a manual draw for a tie the cascade cannot break.
/// `order` lists the tied teams best-first and must cover exactly the teams
/// the ranking currently reports as tied, each once. Refused
/// (`InvalidDrawOrder`) when the standings need no draw.
pub fn record_tie_draw(
    tournament: &mut Tournament,
    group_id: GroupId,
    order: Vec<TeamId>,
) -> Result<(), TournamentError> {
    let tied = match rank_group(tournament, group_id) {
        Err(TournamentError::TiedPositionRequiresDraw { team_ids, .. }) => team_ids,
        Err(e) => return Err(e),
        Ok(_) => return Err(TournamentError::InvalidDrawOrder),
    };
    if order.len() != tied.len() {
        return Err(TournamentError::InvalidDrawOrder);
    }
    for (i, team_id) in order.iter().enumerate() {
        if !tied.contains(team_id) || order[..i].contains(team_id) {
            return Err(TournamentError::InvalidDrawOrder);
        }
    }
    // Merge rather than replace, so draws for earlier ties in the same group
    // (or re-draws after a correction) stay recorded.
    let entry = tournament.tie_draws.entry(group_id).or_default();
    entry.retain(|id| !order.contains(id));
    entry.extend(order);
    Ok(())
}

fn completed_matches(tournament: &Tournament, group_id: GroupId) -> Vec<&Match> {
    tournament
        .group_matches(group_id)
        .filter(|m| m.status == MatchStatus::Completed)
        .collect()
}

/// The winner of the (single) completed match between the two teams, if any.
fn head_to_head(completed: &[&Match], a: TeamId, b: TeamId) -> Option<TeamId> {
    completed
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
        .and_then(|m| m.winner_id)
}

/// Resolve one cluster of teams tied on points.
fn break_points_tie(
    group_id: GroupId,
    cluster: Vec<GroupStanding>,
    completed: &[&Match],
    draw: Option<&[TeamId]>,
) -> Result<Vec<GroupStanding>, TournamentError> {
    if cluster.len() == 1 {
        return Ok(cluster);
    }

    if cluster.len() == 2 {
        if let Some(winner) = head_to_head(completed, cluster[0].team_id, cluster[1].team_id) {
            let mut pair = cluster;
            if pair[1].team_id == winner {
                pair.swap(0, 1);
            }
            return Ok(pair);
        }
        // head-to-head unplayed: fall through to the numeric criteria
    }

    break_numeric_tie(group_id, cluster, draw)
}

/// Wins, then game difference, then the recorded draw.
fn break_numeric_tie(
    group_id: GroupId,
    mut cluster: Vec<GroupStanding>,
    draw: Option<&[TeamId]>,
) -> Result<Vec<GroupStanding>, TournamentError> {
    cluster.sort_by_key(|s| (Reverse(s.matches_won), Reverse(s.game_difference())));

    let mut resolved = Vec::with_capacity(cluster.len());
    for run in split_runs(cluster, |s| (s.matches_won, s.game_difference())) {
        if run.len() == 1 {
            resolved.extend(run);
            continue;
        }
        let mut run = run;
        match draw {
            Some(order) if run.iter().all(|s| order.contains(&s.team_id)) => {
                run.sort_by_key(|s| {
                    order
                        .iter()
                        .position(|id| *id == s.team_id)
                        .unwrap_or(usize::MAX)
                });
                resolved.extend(run);
            }
            _ => {
                return Err(TournamentError::TiedPositionRequiresDraw {
                    group_id,
                    team_ids: run.iter().map(|s| s.team_id).collect(),
                })
            }
        }
    }
    Ok(resolved)
}

/// Split an already-sorted list into maximal runs of equal key.
fn split_runs<K: PartialEq>(
    items: Vec<GroupStanding>,
    key: impl Fn(&GroupStanding) -> K,
) -> Vec<Vec<GroupStanding>> {
    let mut runs: Vec<Vec<GroupStanding>> = Vec::new();
    for item in items {
        match runs.last_mut() {
            Some(run) if key(&run[0]) == key(&item) => run.push(item),
            _ => runs.push(vec![item]),
        }
    }
    runs
}
