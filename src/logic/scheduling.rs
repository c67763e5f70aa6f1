//! Round-robin schedule generation for the group stage.

use crate::models::{
    Match, MatchStatus, Round, Slot, Tournament, TournamentError, TournamentState,
};

/// Every unordered pair {i, j} with i < j over `n` indices, exactly once.
/// A group of size n yields n * (n - 1) / 2 pairs.
pub fn round_robin_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Generate group-stage matches for every group, in group order, with
/// sequential tournament-wide match numbers.
///
/// One-shot after the draw; re-running is `AlreadyGenerated`. Regeneration
/// must go through `discard_group_stage` first.
pub fn generate_group_stage_matches(tournament: &mut Tournament) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::GroupsDrawn => {}
        TournamentState::GroupStage => return Err(TournamentError::AlreadyGenerated),
        _ => return Err(TournamentError::InvalidState),
    }

    // Copy out the pairings first so match-number assignment can borrow
    // the tournament mutably.
    let pairings: Vec<_> = tournament
        .groups
        .iter()
        .flat_map(|g| {
            let ids: Vec<_> = g.team_ids().collect();
            round_robin_pairs(ids.len())
                .into_iter()
                .map(|(i, j)| (g.id, ids[i], ids[j]))
                .collect::<Vec<_>>()
        })
        .collect();

    for (group_id, team1, team2) in pairings {
        let number = tournament.take_match_number();
        tournament.matches.push(Match::new(
            Some(group_id),
            Round::GroupStage,
            number,
            Slot::Team(team1),
            Slot::Team(team2),
        ));
    }
    tournament.state = TournamentState::GroupStage;
    Ok(())
}

/// Discard the draw and all group-stage matches, returning to Registration.
///
/// This is the explicit regeneration path; it refuses to run once any result
/// has been recorded.
pub fn discard_group_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::GroupsDrawn | TournamentState::GroupStage => {}
        _ => return Err(TournamentError::InvalidState),
    }
    if tournament
        .matches
        .iter()
        .any(|m| m.status != MatchStatus::Scheduled)
    {
        return Err(TournamentError::InvalidState);
    }

    tournament.groups.clear();
    tournament.matches.clear();
    tournament.tie_draws.clear();
    tournament.next_match_number = 1;
    tournament.state = TournamentState::Registration;
    Ok(())
}
