//! Group sizing: how many groups of which size for a given team count.

use crate::models::{TournamentError, MAX_TEAMS, MIN_TEAMS};

/// Ordered list of group sizes (ascending, the way the rulebook lists them).
/// Sizes always sum to the team count the plan was built for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupSizingPlan {
    pub sizes: Vec<usize>,
}

impl GroupSizingPlan {
    pub fn group_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn team_count(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// Decide the group configuration for `team_count` teams.
///
/// 3 to 12 teams follow the league rulebook table literally (3-5 teams play a
/// single round robin). Above 12 the table is extended in the same spirit:
/// groups of 4 wherever possible, converting one 4 into 3s until the
/// remainder divides evenly, which caps the groups of 3 at three and keeps
/// the size spread at one. Counts outside `MIN_TEAMS..=MAX_TEAMS` are
/// rejected; the upper bound keeps the group letters within A to Z.
pub fn partition(team_count: usize) -> Result<GroupSizingPlan, TournamentError> {
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&team_count) {
        return Err(TournamentError::InvalidTeamCount {
            count: team_count,
            min: MIN_TEAMS,
            max: MAX_TEAMS,
        });
    }

    let sizes = match team_count {
        3..=5 => vec![team_count],
        6 => vec![3, 3],
        7 => vec![3, 4],
        8 => vec![4, 4],
        9 => vec![3, 3, 3],
        10 => vec![3, 3, 4],
        11 => vec![3, 4, 4],
        12 => vec![3, 3, 3, 3],
        n => {
            // Smallest number of 3-groups that leaves a multiple of 4.
            let threes = match n % 4 {
                0 => 0,
                1 => 3,
                2 => 2,
                _ => 1,
            };
            let fours = (n - 3 * threes) / 4;
            let mut sizes = vec![3; threes];
            sizes.extend(std::iter::repeat(4).take(fours));
            sizes
        }
    };

    debug_assert_eq!(sizes.iter().sum::<usize>(), team_count);
    Ok(GroupSizingPlan { sizes })
}
