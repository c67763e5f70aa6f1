//! Integration tests for standings: aggregation and the tie-break cascade.

use beach_tennis_web::{
    cancel_match, generate_group_stage_matches, generate_groups, group_standings, rank_group,
    record_match_result, record_tie_draw, RecordedScore, ScoringConfig, Side, TeamId, Tournament,
    TournamentError,
};

/// Tournament with `n` teams in a single group (n must be 3-5), groups and
/// matches generated. Returns the team ids in registration order.
fn single_group_tournament(n: usize) -> (Tournament, Vec<TeamId>) {
    let mut t = Tournament::new("Open", ScoringConfig::default());
    let ids: Vec<TeamId> = (0..n)
        .map(|i| {
            t.register_team(
                format!("Team {i}"),
                format!("Player {i}a"),
                format!("Player {i}b"),
                ((n - i) * 100) as u32,
            )
            .unwrap()
        })
        .collect();
    generate_groups(&mut t).unwrap();
    generate_group_stage_matches(&mut t).unwrap();
    (t, ids)
}

/// Record a game score with `a` winning `games_a`-`games_b` against `b`.
fn record_games(t: &mut Tournament, a: TeamId, b: TeamId, games_a: u32, games_b: u32) {
    let m = t
        .matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
        .expect("pair scheduled");
    let id = m.id;
    let score = if m.team1.team_id() == Some(a) {
        RecordedScore::Games { team1: games_a, team2: games_b }
    } else {
        RecordedScore::Games { team1: games_b, team2: games_a }
    };
    record_match_result(t, id, score).unwrap();
}

/// Record a walkover win for `a` against `b`.
fn record_walkover(t: &mut Tournament, a: TeamId, b: TeamId) {
    let m = t
        .matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
        .expect("pair scheduled");
    let id = m.id;
    let side = if m.team1.team_id() == Some(a) {
        Side::Team1
    } else {
        Side::Team2
    };
    record_match_result(t, id, RecordedScore::Walkover(side)).unwrap();
}

fn row(standings: &[beach_tennis_web::GroupStanding], team: TeamId) -> beach_tennis_web::GroupStanding {
    *standings.iter().find(|s| s.team_id == team).unwrap()
}

#[test]
fn only_completed_matches_enter_the_aggregates() {
    let (mut t, ids) = single_group_tournament(4);
    let group_id = t.groups[0].id;
    record_games(&mut t, ids[0], ids[1], 6, 3);

    let standings = group_standings(&t, group_id).unwrap();
    let winner = row(&standings, ids[0]);
    assert_eq!(winner.matches_played, 1);
    assert_eq!(winner.matches_won, 1);
    assert_eq!(winner.games_won, 6);
    assert_eq!(winner.games_lost, 3);
    assert_eq!(winner.points, 2);

    let loser = row(&standings, ids[1]);
    assert_eq!((loser.matches_played, loser.matches_lost), (1, 1));
    assert_eq!(loser.points, 1);

    // The other two teams haven't played; scheduled matches contribute nothing.
    assert_eq!(row(&standings, ids[2]).matches_played, 0);
    assert_eq!(row(&standings, ids[3]).matches_played, 0);
}

#[test]
fn walkover_is_a_win_with_no_games() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    record_walkover(&mut t, ids[0], ids[1]);

    let standings = group_standings(&t, group_id).unwrap();
    let winner = row(&standings, ids[0]);
    assert_eq!((winner.matches_won, winner.games_won, winner.games_lost), (1, 0, 0));
    assert_eq!(winner.points, 2);
    // Walkover loss carries the configured (zero) points, unlike a played loss.
    assert_eq!(row(&standings, ids[1]).points, 0);
}

#[test]
fn recompute_is_idempotent() {
    let (mut t, ids) = single_group_tournament(4);
    let group_id = t.groups[0].id;
    record_games(&mut t, ids[0], ids[1], 6, 3);
    record_games(&mut t, ids[2], ids[3], 7, 6);

    let first = group_standings(&t, group_id).unwrap();
    let second = group_standings(&t, group_id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn corrections_rebuild_the_aggregates() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    record_games(&mut t, ids[0], ids[1], 6, 3);
    // Score was entered backwards; re-record the corrected result.
    record_games(&mut t, ids[1], ids[0], 6, 3);

    let standings = group_standings(&t, group_id).unwrap();
    assert_eq!(row(&standings, ids[0]).matches_played, 1);
    assert_eq!(row(&standings, ids[0]).matches_won, 0);
    assert_eq!(row(&standings, ids[1]).matches_won, 1);
}

#[test]
fn cancelled_matches_never_enter_the_standings() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    let id = t
        .matches
        .iter()
        .find(|m| m.involves(ids[0]) && m.involves(ids[1]))
        .unwrap()
        .id;
    cancel_match(&mut t, id).unwrap();

    let standings = group_standings(&t, group_id).unwrap();
    assert!(standings.iter().all(|s| s.matches_played == 0));
    // A cancelled match cannot take a result afterwards.
    assert_eq!(
        record_match_result(&mut t, id, RecordedScore::Games { team1: 6, team2: 0 }),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn head_to_head_breaks_a_two_way_tie() {
    let (mut t, ids) = single_group_tournament(4);
    let group_id = t.groups[0].id;
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    // a and b finish on 2 wins, c and d on 1; a beat b, c beat d.
    record_games(&mut t, a, b, 6, 4);
    record_games(&mut t, a, c, 6, 2);
    record_games(&mut t, d, a, 6, 4);
    record_games(&mut t, b, c, 6, 1);
    record_games(&mut t, b, d, 6, 2);
    record_games(&mut t, c, d, 6, 3);

    let order: Vec<TeamId> = rank_group(&t, group_id)
        .unwrap()
        .iter()
        .map(|s| s.team_id)
        .collect();
    assert_eq!(order, vec![a, b, c, d]);
}

#[test]
fn three_way_tie_uses_wins_then_game_difference() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    // A cycle: every team on 1 win and 3 points, so head-to-head cannot
    // apply; game difference decides (a +4, c 0, b -4).
    record_games(&mut t, a, b, 6, 0);
    record_games(&mut t, b, c, 6, 4);
    record_games(&mut t, c, a, 6, 4);

    let order: Vec<TeamId> = rank_group(&t, group_id)
        .unwrap()
        .iter()
        .map(|s| s.team_id)
        .collect();
    assert_eq!(order, vec![a, c, b]);
}

#[test]
fn unbreakable_tie_requires_a_draw() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    // A perfectly symmetric cycle: equal points, wins and game difference.
    record_games(&mut t, a, b, 6, 4);
    record_games(&mut t, b, c, 6, 4);
    record_games(&mut t, c, a, 6, 4);

    match rank_group(&t, group_id) {
        Err(TournamentError::TiedPositionRequiresDraw {
            group_id: g,
            team_ids,
        }) => {
            assert_eq!(g, group_id);
            assert_eq!(team_ids.len(), 3);
        }
        other => panic!("expected tie error, got {other:?}"),
    }

    // The recorded draw outcome resolves the order.
    record_tie_draw(&mut t, group_id, vec![b, c, a]).unwrap();
    let order: Vec<TeamId> = rank_group(&t, group_id)
        .unwrap()
        .iter()
        .map(|s| s.team_id)
        .collect();
    assert_eq!(order, vec![b, c, a]);
}

#[test]
fn tie_draw_must_cover_the_tied_teams_exactly() {
    let (mut t, ids) = single_group_tournament(3);
    let group_id = t.groups[0].id;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    record_games(&mut t, a, b, 6, 4);
    record_games(&mut t, b, c, 6, 4);
    record_games(&mut t, c, a, 6, 4);

    // All three are tied; anything but that exact set (once each) is refused.
    let outsider = TeamId::new_v4();
    let bad_orders = [
        vec![a, b],
        vec![a, b, outsider],
        vec![a, a, b],
        vec![a, b, c, outsider],
    ];
    for bad in bad_orders {
        assert_eq!(
            record_tie_draw(&mut t, group_id, bad),
            Err(TournamentError::InvalidDrawOrder)
        );
    }
    record_tie_draw(&mut t, group_id, vec![c, a, b]).unwrap();

    // Once the ranking resolves there is nothing left to draw for.
    assert_eq!(
        record_tie_draw(&mut t, group_id, vec![c, a, b]),
        Err(TournamentError::InvalidDrawOrder)
    );
}
