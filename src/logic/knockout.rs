//! Knockout stage: qualifier ordering, seeded bracket construction and the
//! display projection.

use crate::logic::standings::rank_group;
use crate::models::{
    GroupId, Match, MatchStatus, Round, Side, Slot, Team, TeamId, Tournament, TournamentError,
    TournamentState,
};
use serde::Serialize;

/// The knockout structure the UI renders: quarterfinals, semifinals, the
/// final and (once decided) the champion.
#[derive(Clone, Debug, Serialize)]
pub struct BracketView {
    pub quarterfinals: Vec<Match>,
    pub semifinals: Vec<Match>,
    pub final_match: Match,
    pub champion: Option<Team>,
}

/// Build the knockout bracket from the finalized group standings.
///
/// Requires every group match to be completed (or cancelled) and every group
/// to be rankable; an unbreakable tie surfaces as `TiedPositionRequiresDraw`
/// so the organizer can hold the draw first. One-shot: re-running while a
/// bracket exists is `AlreadyGenerated`; regeneration goes through
/// `discard_knockout_bracket`.
///
/// Qualifiers are ordered group winners first (in group order), then
/// runners-up, then thirds, and so on. The bracket takes the top 8 of them
/// when there are at least 8 (quarterfinals), otherwise the top 4
/// (semifinals only), otherwise 2 (a straight final). Pairing follows the
/// standard seeded layout (1v8, 4v5, 3v6, 2v7), which keeps teams from the
/// same group on opposite sides of each early-round pairing given the
/// cross-group qualifier order.
pub fn generate_knockout_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::GroupStage => {}
        TournamentState::KnockoutStage | TournamentState::Completed => {
            return Err(TournamentError::AlreadyGenerated)
        }
        _ => return Err(TournamentError::InvalidState),
    }
    let unfinished = tournament.matches.iter().any(|m| {
        m.round == Round::GroupStage
            && matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress)
    });
    if unfinished {
        return Err(TournamentError::InvalidState);
    }

    let group_ids: Vec<GroupId> = tournament.groups.iter().map(|g| g.id).collect();
    let mut ranked = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        ranked.push(rank_group(tournament, group_id)?);
    }

    // Winners of every group first, then runners-up, then thirds...
    let positions = ranked.iter().map(Vec::len).max().unwrap_or(0);
    let mut qualifiers: Vec<TeamId> = Vec::new();
    for pos in 0..positions {
        for group in &ranked {
            if let Some(standing) = group.get(pos) {
                qualifiers.push(standing.team_id);
            }
        }
    }

    let entrants = if qualifiers.len() >= 8 {
        8
    } else if qualifiers.len() >= 4 {
        4
    } else {
        2
    };
    let seeds = &qualifiers[..entrants];

    let mut quarterfinals = Vec::new();
    let mut semifinals = Vec::new();

    if entrants == 8 {
        for (a, b) in [(0, 7), (3, 4), (2, 5), (1, 6)] {
            let number = tournament.take_match_number();
            quarterfinals.push(Match::new(
                None,
                Round::Quarterfinal,
                number,
                Slot::Team(seeds[a]),
                Slot::Team(seeds[b]),
            ));
        }
        for pair in quarterfinals.chunks(2) {
            let number = tournament.take_match_number();
            semifinals.push(Match::new(
                None,
                Round::Semifinal,
                number,
                Slot::WinnerOf(pair[0].id),
                Slot::WinnerOf(pair[1].id),
            ));
        }
        for (i, qf) in quarterfinals.iter_mut().enumerate() {
            let side = if i % 2 == 0 { Side::Team1 } else { Side::Team2 };
            qf.winner_to = Some((semifinals[i / 2].id, side));
        }
    } else if entrants == 4 {
        for (a, b) in [(0, 3), (1, 2)] {
            let number = tournament.take_match_number();
            semifinals.push(Match::new(
                None,
                Round::Semifinal,
                number,
                Slot::Team(seeds[a]),
                Slot::Team(seeds[b]),
            ));
        }
    }

    let number = tournament.take_match_number();
    let final_match = if entrants == 2 {
        Match::new(
            None,
            Round::Final,
            number,
            Slot::Team(seeds[0]),
            Slot::Team(seeds[1]),
        )
    } else {
        Match::new(
            None,
            Round::Final,
            number,
            Slot::WinnerOf(semifinals[0].id),
            Slot::WinnerOf(semifinals[1].id),
        )
    };
    for (i, sf) in semifinals.iter_mut().enumerate() {
        let side = if i == 0 { Side::Team1 } else { Side::Team2 };
        sf.winner_to = Some((final_match.id, side));
    }

    tournament.matches.extend(quarterfinals);
    tournament.matches.extend(semifinals);
    tournament.matches.push(final_match);
    tournament.state = TournamentState::KnockoutStage;
    Ok(())
}

/// Throw away the knockout matches (results included) and return to the
/// group stage. Brackets are regenerated whole, never patched piecemeal.
pub fn discard_knockout_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::KnockoutStage {
        return Err(TournamentError::InvalidState);
    }
    tournament.matches.retain(|m| m.round == Round::GroupStage);
    tournament.next_match_number = tournament
        .matches
        .iter()
        .map(|m| m.match_number)
        .max()
        .map_or(1, |n| n + 1);
    tournament.champion = None;
    tournament.state = TournamentState::GroupStage;
    Ok(())
}

/// Project the knockout matches into the display structure.
pub fn bracket_view(tournament: &Tournament) -> Result<BracketView, TournamentError> {
    let final_match = tournament
        .knockout_matches()
        .find(|m| m.round == Round::Final)
        .cloned()
        .ok_or(TournamentError::InvalidState)?;
    let champion = match tournament.champion {
        Some(id) => Some(tournament.team(id)?.clone()),
        None => None,
    };
    Ok(BracketView {
        quarterfinals: tournament
            .knockout_matches()
            .filter(|m| m.round == Round::Quarterfinal)
            .cloned()
            .collect(),
        semifinals: tournament
            .knockout_matches()
            .filter(|m| m.round == Round::Semifinal)
            .cloned()
            .collect(),
        final_match,
        champion,
    })
}
