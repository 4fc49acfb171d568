//! Team assembly for registration groups.
//!
//! Rules run in a fixed priority order, each one seeing only golfers that no
//! earlier rule placed:
//!
//! 1. groups of exactly four become teams;
//! 2. larger groups are cut into runs of four, the short tail is left over;
//! 3. groups of three get a fourth from fill-search when one exists;
//! 4. pairs are merged with the pair they share the most preference edges
//!    with, and a pair left without a partner is padded by fill-search.

use crate::domain::model::{Golfer, TeamKind, TeamMember};
use crate::domain::services::availability::Roster;
use crate::domain::services::partition::{Partition, RegistrationGroup};
use crate::domain::services::preferences::PreferenceGraph;
use crate::domain::services::reasons;
use crate::domain::services::{Assignment, TEAM_SIZE};
use std::collections::HashSet;

/// Read-only view of the run that fill-search draws companions from.
pub struct FillContext<'a> {
    pub roster: &'a Roster,
    pub graph: &'a PreferenceGraph,
    pub partition: &'a Partition<'a>,
    grouped: HashSet<&'a str>,
}

impl<'a> FillContext<'a> {
    pub fn new(roster: &'a Roster, graph: &'a PreferenceGraph, partition: &'a Partition<'a>) -> Self {
        Self {
            roster,
            graph,
            partition,
            grouped: partition.grouped_ids(),
        }
    }
}

/// A companion found by fill-search and the reason it was picked, if any.
#[derive(Debug, Clone)]
pub struct Fill<'a> {
    pub golfer: &'a Golfer,
    pub reason: Option<String>,
}

impl Fill<'_> {
    fn into_member(self) -> TeamMember {
        TeamMember {
            golfer: self.golfer.clone(),
            reasons: self.reason.into_iter().collect(),
        }
    }
}

/// Finds one companion for `reference`.
///
/// Looks, in order, for someone a reference member named, then for someone
/// who named a reference member, then for the first free ungrouped golfer.
/// Golfers registered with any group are never used as fillers. The first
/// hit wins at every step.
pub fn fill_search<'a>(
    ctx: &FillContext<'a>,
    reference: &[&'a Golfer],
    assigned: &HashSet<String>,
    picked: &[&str],
) -> Option<Fill<'a>> {
    let eligible = |id: &str| {
        ctx.roster.contains(id)
            && !assigned.contains(id)
            && !picked.contains(&id)
            && !ctx.grouped.contains(id)
            && !reference.iter().any(|r| r.id == id)
    };

    for referrer in reference {
        for id in ctx.graph.preferred(&referrer.id) {
            if !eligible(id) {
                continue;
            }
            if let Some(golfer) = ctx.roster.get(id) {
                return Some(Fill {
                    golfer,
                    reason: Some(reasons::preferred_by(referrer)),
                });
            }
        }
    }

    for candidate in ctx.roster.golfers() {
        if !eligible(&candidate.id) {
            continue;
        }
        if let Some(referee) = reference
            .iter()
            .find(|r| ctx.graph.prefers(&candidate.id, &r.id))
        {
            return Some(Fill {
                golfer: candidate,
                reason: Some(reasons::prefers(referee)),
            });
        }
    }

    ctx.partition
        .ungrouped
        .iter()
        .find(|g| eligible(&g.id))
        .map(|&golfer| Fill {
            golfer,
            reason: None,
        })
}

fn open_members<'a>(group: &RegistrationGroup<'a>, acc: &Assignment) -> Vec<&'a Golfer> {
    group
        .members
        .iter()
        .copied()
        .filter(|g| !acc.is_assigned(&g.id))
        .collect()
}

/// Groups whose registered size satisfies `matches`, as their still-open members.
/// The size is the registered one, so the tail of a split group never
/// qualifies as a trio or a pair.
fn groups_of_size<'a, 'p>(
    partition: &'p Partition<'a>,
    acc: &Assignment,
    matches: impl Fn(usize) -> bool,
) -> Vec<Vec<&'a Golfer>> {
    partition
        .groups
        .iter()
        .filter(|group| matches(group.members.len()))
        .map(|group| open_members(group, acc))
        .filter(|members| !members.is_empty())
        .collect()
}

/// Runs the four group rules in order. Every trio and pair is placed, so no
/// group member is left for the cluster builder.
pub fn assemble(ctx: &FillContext<'_>, acc: Assignment) -> Assignment {
    let acc = place_full_groups(ctx, acc);
    let acc = split_large_groups(ctx, acc);
    let acc = complete_trios(ctx, acc);
    merge_pairs(ctx, acc)
}

/// Rule 1.
pub fn place_full_groups(ctx: &FillContext<'_>, mut acc: Assignment) -> Assignment {
    for members in groups_of_size(ctx.partition, &acc, |n| n == TEAM_SIZE) {
        acc.place(TeamKind::RegisteredGroup, reasons::registered_together(&members));
    }
    acc
}

/// Rule 2. The tail run of fewer than four is not a team.
pub fn split_large_groups(ctx: &FillContext<'_>, mut acc: Assignment) -> Assignment {
    for members in groups_of_size(ctx.partition, &acc, |n| n > TEAM_SIZE) {
        for run in members.chunks(TEAM_SIZE) {
            if run.len() == TEAM_SIZE {
                acc.place(TeamKind::SplitGroup, reasons::registered_together(run));
            } else {
                tracing::debug!(
                    "{} golfers left over after splitting a group of {}",
                    run.len(),
                    members.len()
                );
            }
        }
    }
    acc
}

/// Rule 3. A trio with no companion available is still a team of three.
pub fn complete_trios(ctx: &FillContext<'_>, mut acc: Assignment) -> Assignment {
    for members in groups_of_size(ctx.partition, &acc, |n| n == 3) {
        let fill = fill_search(ctx, &members, acc.assigned(), &[]);
        let mut team = reasons::registered_together(&members);

        match fill {
            Some(fill) => {
                tracing::debug!("Trio completed with {}", fill.golfer.id);
                team.push(fill.into_member());
            }
            None => tracing::debug!("No fourth golfer available for trio"),
        }

        acc.place(TeamKind::Trio, team);
    }
    acc
}

/// Rule 4.
pub fn merge_pairs(ctx: &FillContext<'_>, mut acc: Assignment) -> Assignment {
    let pairs = groups_of_size(ctx.partition, &acc, |n| n == 2);
    let mut merged = vec![false; pairs.len()];

    for i in 0..pairs.len() {
        if merged[i] {
            continue;
        }

        // 分數相同時保留較早的配對
        let mut best: Option<(usize, usize)> = None;
        for j in (i + 1)..pairs.len() {
            if merged[j] {
                continue;
            }
            let score = ctx.graph.score_between(&pairs[i], &pairs[j]);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((j, score));
            }
        }

        merged[i] = true;

        match best {
            Some((j, score)) => {
                merged[j] = true;
                tracing::debug!("Merging pairs {} and {} (score {})", i, j, score);

                let both: Vec<&Golfer> = pairs[i].iter().chain(pairs[j].iter()).copied().collect();
                let mut team = reasons::registered_together(&both);
                reasons::annotate_preferences(&mut team, ctx.graph);
                acc.place(TeamKind::MergedPairs, team);
            }
            None => {
                let mut team = reasons::registered_together(&pairs[i]);
                let mut picked: Vec<&str> = Vec::new();

                for _ in 0..(TEAM_SIZE - 2) {
                    match fill_search(ctx, &pairs[i], acc.assigned(), &picked) {
                        Some(fill) => {
                            let golfer = fill.golfer;
                            picked.push(golfer.id.as_str());
                            team.push(fill.into_member());
                        }
                        None => break,
                    }
                }

                tracing::debug!("Pair padded to {} members", team.len());
                acc.place(TeamKind::Pair, team);
            }
        }
    }

    acc
}
