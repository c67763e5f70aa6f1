//! Result recording: score validation, match status transitions and knockout
//! winner propagation.

use crate::models::{
    MatchId, MatchStatus, RecordedScore, Round, Side, Slot, Tournament, TournamentError,
    TournamentState,
};
use chrono::{DateTime, Utc};

/// Record (or correct) a match result.
///
/// Group-stage results can be re-recorded freely while the group stage is
/// open; standings are derived, so they reconcile on the next read. A
/// knockout result can be corrected only while the downstream match is still
/// untouched, and the corrected winner is re-propagated. Completing the final
/// crowns the champion and closes the tournament for good.
pub fn record_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: RecordedScore,
) -> Result<(), TournamentError> {
    let winning_side = score.winning_side().ok_or(TournamentError::InvalidScore)?;

    let m = tournament.match_by_id(match_id)?;
    if m.status == MatchStatus::Cancelled {
        return Err(TournamentError::InvalidState);
    }
    match m.round {
        Round::GroupStage => {
            if tournament.state != TournamentState::GroupStage {
                return Err(TournamentError::InvalidState);
            }
        }
        _ => {
            if tournament.state != TournamentState::KnockoutStage {
                return Err(TournamentError::InvalidState);
            }
            if !m.is_resolved() {
                return Err(TournamentError::UnresolvedDependency);
            }
            // Corrections only while the next round hasn't been touched.
            if m.status == MatchStatus::Completed {
                if let Some((down_id, _)) = m.winner_to {
                    let down = tournament.match_by_id(down_id)?;
                    if down.score.is_some() || down.status != MatchStatus::Scheduled {
                        return Err(TournamentError::InvalidState);
                    }
                }
            }
        }
    }

    let winner = match winning_side {
        Side::Team1 => m.team1.team_id(),
        Side::Team2 => m.team2.team_id(),
    }
    .ok_or(TournamentError::UnresolvedDependency)?;
    let round = m.round;
    let winner_to = m.winner_to;

    let m = tournament.match_by_id_mut(match_id)?;
    m.score = Some(score);
    m.winner_id = Some(winner);
    m.status = MatchStatus::Completed;

    if let Some((down_id, side)) = winner_to {
        let down = tournament.match_by_id_mut(down_id)?;
        match side {
            Side::Team1 => down.team1 = Slot::Team(winner),
            Side::Team2 => down.team2 = Slot::Team(winner),
        }
    }

    if round == Round::Final {
        tournament.champion = Some(winner);
        tournament.state = TournamentState::Completed;
    }
    Ok(())
}

/// Mark a scheduled match as being played.
pub fn start_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let m = tournament.match_by_id(match_id)?;
    let expected = match m.round {
        Round::GroupStage => TournamentState::GroupStage,
        _ => TournamentState::KnockoutStage,
    };
    if tournament.state != expected || m.status != MatchStatus::Scheduled {
        return Err(TournamentError::InvalidState);
    }
    if !m.is_resolved() {
        return Err(TournamentError::UnresolvedDependency);
    }
    tournament.match_by_id_mut(match_id)?.status = MatchStatus::InProgress;
    Ok(())
}

/// Cancel a group-stage match. Cancelled matches never enter the standings.
/// Knockout matches cannot be cancelled; a no-show there is a walkover result.
pub fn cancel_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let m = tournament.match_by_id(match_id)?;
    if m.round != Round::GroupStage
        || !matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress)
    {
        return Err(TournamentError::InvalidState);
    }
    tournament.match_by_id_mut(match_id)?.status = MatchStatus::Cancelled;
    Ok(())
}

/// Attach court / time metadata to a not-yet-finished match.
pub fn schedule_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    scheduled_time: Option<DateTime<Utc>>,
    court: Option<String>,
) -> Result<(), TournamentError> {
    let m = tournament.match_by_id_mut(match_id)?;
    if !matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress) {
        return Err(TournamentError::InvalidState);
    }
    m.scheduled_time = scheduled_time;
    m.court = court;
    Ok(())
}
