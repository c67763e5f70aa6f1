//! Full-tournament scenario: 8 teams from registration to champion, with
//! hand-computed standings along the way.

use beach_tennis_web::{
    bracket_view, generate_group_stage_matches, generate_groups, generate_knockout_bracket,
    rank_group, record_match_result, RecordedScore, Round, Side, TeamId, Tournament,
    TournamentState,
};

fn record_games(t: &mut Tournament, a: TeamId, b: TeamId, games_a: u32, games_b: u32) {
    let m = t
        .matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b) && m.score.is_none())
        .expect("pair scheduled");
    let id = m.id;
    let score = if m.team1.team_id() == Some(a) {
        RecordedScore::Games { team1: games_a, team2: games_b }
    } else {
        RecordedScore::Games { team1: games_b, team2: games_a }
    };
    record_match_result(t, id, score).unwrap();
}

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

#[test]
fn eight_teams_from_registration_to_champion() {
    let mut t = Tournament::new("Summer Open", Default::default());
    let ids: Vec<TeamId> = (0..8)
        .map(|i| {
            t.register_team(
                format!("Team {i}"),
                format!("Player {i}a"),
                format!("Player {i}b"),
                ((8 - i) * 100) as u32,
            )
            .unwrap()
        })
        .collect();

    // Two groups of 4; the snake draft puts the top two seeds apart.
    generate_groups(&mut t).unwrap();
    assert_eq!(t.groups.len(), 2);
    assert!(t.groups.iter().all(|g| g.members.len() == 4));
    let group_a = t.groups[0].id;
    let group_b = t.groups[1].id;
    assert!(t.groups[0].contains(ids[0]));
    assert!(t.groups[1].contains(ids[1]));

    // 6 matches per group, 12 in total.
    generate_group_stage_matches(&mut t).unwrap();
    assert_eq!(t.matches.len(), 12);
    assert_eq!(t.group_matches(group_a).count(), 6);
    assert_eq!(t.group_matches(group_b).count(), 6);

    // Group A (teams 0, 3, 4, 7): team 7 upsets team 0, two head-to-head
    // ties to break.
    record_games(&mut t, ids[0], ids[3], 6, 2);
    record_games(&mut t, ids[0], ids[4], 6, 1);
    record_games(&mut t, ids[7], ids[0], 6, 4);
    record_games(&mut t, ids[3], ids[4], 6, 3);
    record_games(&mut t, ids[3], ids[7], 6, 0);
    record_games(&mut t, ids[4], ids[7], 7, 6);

    // Group B (teams 1, 2, 5, 6): clean sweep for team 1, one walkover.
    record_games(&mut t, ids[1], ids[2], 6, 3);
    record_games(&mut t, ids[1], ids[5], 6, 2);
    record_walkover(&mut t, ids[1], ids[6]);
    record_games(&mut t, ids[2], ids[5], 6, 4);
    record_games(&mut t, ids[2], ids[6], 6, 1);
    record_games(&mut t, ids[5], ids[6], 6, 3);

    // Hand-computed ranking. Group A: teams 0 and 3 tie on 5 points, the
    // head-to-head puts team 0 first; teams 4 and 7 tie on 4, head-to-head
    // puts team 4 third.
    let ranked_a = rank_group(&t, group_a).unwrap();
    let order_a: Vec<TeamId> = ranked_a.iter().map(|s| s.team_id).collect();
    assert_eq!(order_a, vec![ids[0], ids[3], ids[4], ids[7]]);
    assert_eq!(ranked_a[0].matches_played, 3);
    assert_eq!(ranked_a[0].matches_won, 2);
    assert_eq!(ranked_a[0].games_won, 16);
    assert_eq!(ranked_a[0].games_lost, 9);
    assert_eq!(ranked_a[0].points, 5);

    let ranked_b = rank_group(&t, group_b).unwrap();
    let order_b: Vec<TeamId> = ranked_b.iter().map(|s| s.team_id).collect();
    assert_eq!(order_b, vec![ids[1], ids[2], ids[5], ids[6]]);
    // The walkover win carries no games; the walkover loss carries no points.
    assert_eq!(ranked_b[0].points, 6);
    assert_eq!(ranked_b[0].games_won, 12);
    assert_eq!(ranked_b[3].points, 2);

    // Knockout: four cross-group quarterfinals seeded from the standings.
    generate_knockout_bracket(&mut t).unwrap();
    let qfs: Vec<_> = t
        .matches
        .iter()
        .filter(|m| m.round == Round::Quarterfinal)
        .map(|m| (m.id, m.team1.team_id().unwrap(), m.team2.team_id().unwrap()))
        .collect();
    assert_eq!(qfs.len(), 4);
    // Seed order: A1 B1 A2 B2 A3 B3 A4 B4 -> 1v8, 4v5, 3v6, 2v7.
    assert_eq!((qfs[0].1, qfs[0].2), (ids[0], ids[6]));
    assert_eq!((qfs[1].1, qfs[1].2), (ids[2], ids[4]));
    assert_eq!((qfs[2].1, qfs[2].2), (ids[3], ids[5]));
    assert_eq!((qfs[3].1, qfs[3].2), (ids[1], ids[7]));

    // Play out the bracket.
    record_games(&mut t, ids[0], ids[6], 6, 2);
    record_games(&mut t, ids[2], ids[4], 6, 3);
    record_games(&mut t, ids[3], ids[5], 7, 6);
    record_games(&mut t, ids[1], ids[7], 6, 0);

    record_games(&mut t, ids[0], ids[2], 6, 4); // semifinal 1
    record_games(&mut t, ids[1], ids[3], 6, 2); // semifinal 2

    record_games(&mut t, ids[0], ids[1], 7, 6); // final

    assert_eq!(t.champion, Some(ids[0]));
    assert_eq!(t.state, TournamentState::Completed);

    let view = bracket_view(&t).unwrap();
    assert_eq!(view.quarterfinals.len(), 4);
    assert_eq!(view.semifinals.len(), 2);
    assert_eq!(view.final_match.winner_id, Some(ids[0]));
    assert_eq!(view.champion.map(|team| team.id), Some(ids[0]));
}
