//! Preference clustering for golfers with no registration group.
//!
//! Greedy by design: pick the best-connected seed, grow it one best neighbour at
//! a time, top it up in list order. Nothing is ever revisited. Pools smaller
//! than a full team are left alone, even when the golfers in them named each
//! other.

use crate::domain::model::{Golfer, TeamKind, TeamMember};
use crate::domain::services::preferences::PreferenceGraph;
use crate::domain::services::reasons;
use crate::domain::services::{Assignment, TEAM_SIZE};

/// Index of the pool member with the most edges to the rest of the pool.
fn pick_seed(pool: &[&Golfer], graph: &PreferenceGraph) -> usize {
    let mut best = (0, 0);
    for (idx, golfer) in pool.iter().enumerate() {
        let score: usize = pool
            .iter()
            .filter(|other| other.id != golfer.id)
            .map(|other| graph.mutual_score(&golfer.id, &other.id))
            .sum();
        if score > best.1 {
            best = (idx, score);
        }
    }
    best.0
}

/// Best next member for `cluster`, or `None` when nobody has an edge to it.
fn best_neighbour(pool: &[&Golfer], cluster: &[usize], graph: &PreferenceGraph) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, candidate) in pool.iter().enumerate() {
        if cluster.contains(&idx) {
            continue;
        }
        let score: usize = cluster
            .iter()
            .map(|&member| graph.mutual_score(&candidate.id, &pool[member].id))
            .sum();
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.filter(|&(_, score)| score > 0).map(|(idx, _)| idx)
}

/// Forms teams of four out of `pool` until fewer than four golfers remain.
pub fn build_clusters(pool: Vec<&Golfer>, graph: &PreferenceGraph, mut acc: Assignment) -> Assignment {
    let mut pool = pool;

    while pool.len() >= TEAM_SIZE {
        let mut cluster = vec![pick_seed(&pool, graph)];

        while cluster.len() < TEAM_SIZE {
            match best_neighbour(&pool, &cluster, graph) {
                Some(idx) => cluster.push(idx),
                None => break,
            }
        }

        let (kind, members) = if cluster.len() >= 2 {
            for idx in 0..pool.len() {
                if cluster.len() == TEAM_SIZE {
                    break;
                }
                if !cluster.contains(&idx) {
                    cluster.push(idx);
                }
            }

            let mut members: Vec<TeamMember> = cluster
                .iter()
                .map(|&idx| TeamMember::new(pool[idx].clone()))
                .collect();
            reasons::annotate_preferences(&mut members, graph);
            (TeamKind::PreferenceCluster, members)
        } else {
            let members = pool
                .iter()
                .take(TEAM_SIZE)
                .map(|&golfer| TeamMember::new(golfer.clone()))
                .collect();
            (TeamKind::Fallback, members)
        };

        tracing::debug!("Formed {:?} team from pool of {}", kind, pool.len());
        acc.place(kind, members);
        pool.retain(|golfer| !acc.is_assigned(&golfer.id));
    }

    if !pool.is_empty() {
        tracing::debug!("{} golfers left in pool, too few for a team", pool.len());
    }

    acc
}
