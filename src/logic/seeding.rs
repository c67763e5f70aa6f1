//! Seeding: ranking sort and snake-draft distribution into groups.

use crate::logic::partition::{partition, GroupSizingPlan};
use crate::models::{Group, GroupSlot, Team, Tournament, TournamentError, TournamentState};

/// Distribute `teams` across groups per `plan` with a snake (boustrophedon)
/// draft, so summed ranking points stay balanced across groups.
///
/// Teams are sorted descending by ranking points; equal rankings keep their
/// input order (the deterministic seeding tie-break, unrelated to standings
/// tie-breaks). Even draft rounds walk the groups forward, odd rounds walk
/// them backward; groups already at their target size are skipped, which is
/// how smaller groups stop filling in later rounds. `seed_position` records
/// the draft round (1-indexed) for knockout seeding.
pub fn seed(teams: &[Team], plan: &GroupSizingPlan) -> Vec<Group> {
    let mut order: Vec<usize> = (0..teams.len()).collect();
    // sort_by_key is stable, so equal rankings keep registration order
    order.sort_by_key(|&i| std::cmp::Reverse(teams[i].ranking_points));

    let mut groups: Vec<Group> = (1..=plan.group_count())
        .map(|i| Group::new(i as u32))
        .collect();

    let mut next = order.into_iter();
    let mut round: u32 = 0;
    'draft: loop {
        let forward = round % 2 == 0;
        let indices: Vec<usize> = if forward {
            (0..groups.len()).collect()
        } else {
            (0..groups.len()).rev().collect()
        };
        let mut assigned_any = false;
        for gi in indices {
            if groups[gi].members.len() >= plan.sizes[gi] {
                continue;
            }
            let Some(ti) = next.next() else { break 'draft };
            groups[gi].members.push(GroupSlot {
                team_id: teams[ti].id,
                seed_position: round + 1,
            });
            assigned_any = true;
        }
        if !assigned_any {
            break;
        }
        round += 1;
    }

    groups
}

/// Generate the tournament's groups from the confirmed team list.
///
/// One-shot: re-running after the draw is an error (`AlreadyGenerated`);
/// regeneration goes through `discard_group_stage` first.
pub fn generate_groups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::Registration => {}
        TournamentState::GroupsDrawn | TournamentState::GroupStage => {
            return Err(TournamentError::AlreadyGenerated)
        }
        _ => return Err(TournamentError::InvalidState),
    }

    let plan = partition(tournament.teams.len())?;
    tournament.groups = seed(&tournament.teams, &plan);
    tournament.state = TournamentState::GroupsDrawn;
    Ok(())
}
