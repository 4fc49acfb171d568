//! Team-formation services.
//!
//! `suggest_teams` runs the stages in their fixed order: availability filter,
//! group partition, preference linking, group rules, preference clustering,
//! and finally the unassigned remainder. Each stage receives the `Assignment`
//! built so far and hands back an extended one, so the stages can be run and
//! tested one at a time.

pub mod assembler;
pub mod availability;
pub mod clusters;
pub mod partition;
pub mod preferences;
pub mod reasons;

use crate::domain::model::{Golfer, SuggestionRun, TeamKind, TeamMember, TeamSuggestion};
use std::collections::HashSet;

pub use assembler::{fill_search, FillContext};
pub use availability::{available_golfers, Roster};
pub use partition::Partition;
pub use preferences::PreferenceGraph;

pub const TEAM_SIZE: usize = 4;

/// Teams placed so far in one run and the ids they hold.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    teams: Vec<TeamSuggestion>,
    assigned: HashSet<String>,
}

impl Assignment {
    pub fn is_assigned(&self, id: &str) -> bool {
        self.assigned.contains(id)
    }

    pub fn assigned(&self) -> &HashSet<String> {
        &self.assigned
    }

    pub fn teams(&self) -> &[TeamSuggestion] {
        &self.teams
    }

    /// Records a team. Callers only pass golfers that are not yet assigned.
    pub fn place(&mut self, kind: TeamKind, members: Vec<TeamMember>) {
        debug_assert!((2..=TEAM_SIZE).contains(&members.len()));
        debug_assert!(members.iter().all(|m| !self.assigned.contains(&m.golfer.id)));

        self.assigned
            .extend(members.iter().map(|m| m.golfer.id.clone()));
        self.teams.push(TeamSuggestion {
            name: format!("Team {}", self.teams.len() + 1),
            kind,
            members,
        });
    }

    /// Closes the run: every roster golfer not on a team is unassigned.
    pub fn finish(self, roster: &Roster) -> SuggestionRun {
        let unassigned = roster
            .golfers()
            .iter()
            .filter(|g| !self.assigned.contains(&g.id))
            .cloned()
            .collect();

        SuggestionRun {
            suggested_teams: self.teams,
            unassigned,
        }
    }
}

/// Suggests teams for every golfer not in `already_assigned`.
///
/// Deterministic for a given input order. Never fails: unmatched preferences,
/// missing handicaps and an exhausted pool only make teams smaller or leave
/// golfers unassigned.
pub fn suggest_teams(golfers: &[Golfer], already_assigned: &HashSet<String>) -> SuggestionRun {
    let roster = Roster::new(golfers, already_assigned);
    if roster.is_empty() {
        return SuggestionRun::default();
    }

    let partition = Partition::new(roster.golfers());
    let graph = PreferenceGraph::build(roster.golfers());
    let ctx = FillContext::new(&roster, &graph, &partition);

    let acc = assembler::assemble(&ctx, Assignment::default());
    tracing::debug!("Group rules placed {} teams", acc.teams().len());

    // 分組剩下的人不進入偏好分群
    let pool: Vec<&Golfer> = partition
        .ungrouped
        .iter()
        .copied()
        .filter(|g| !acc.is_assigned(&g.id))
        .collect();

    let acc = clusters::build_clusters(pool, &graph, acc);
    let run = acc.finish(&roster);

    tracing::debug!(
        "Suggested {} teams for {} golfers, {} unassigned",
        run.suggested_teams.len(),
        roster.len(),
        run.unassigned.len()
    );

    run
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_run() {
        let run = suggest_teams(&[], &HashSet::new());
        assert!(run.suggested_teams.is_empty());
        assert!(run.unassigned.is_empty());
    }

    #[test]
    fn test_everyone_already_assigned() {
        let golfers = vec![Golfer::new("1", "A", "B")];
        let assigned: HashSet<String> = ["1".to_string()].into_iter().collect();
        assert_eq!(suggest_teams(&golfers, &assigned), SuggestionRun::default());
    }

    #[test]
    fn test_team_names_follow_emission_order() {
        let golfers: Vec<Golfer> = (0..8)
            .map(|i| Golfer::new(i.to_string(), "G", format!("L{}", i)))
            .collect();
        let run = suggest_teams(&golfers, &HashSet::new());
        let names: Vec<&str> = run.suggested_teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Team 1", "Team 2"]);
    }

    #[test]
    fn test_groups_are_placed_before_clusters() {
        let mut golfers: Vec<Golfer> = (0..4)
            .map(|i| Golfer::new(format!("u{}", i), "U", format!("Free{}", i)))
            .collect();
        golfers.extend((0..4).map(|i| Golfer::new(format!("g{}", i), "G", format!("Group{}", i)).with_group("g")));

        let run = suggest_teams(&golfers, &HashSet::new());
        assert_eq!(run.suggested_teams[0].kind, TeamKind::RegisteredGroup);
        assert_eq!(run.suggested_teams[1].kind, TeamKind::Fallback);
        assert!(run.unassigned.is_empty());
    }
}
