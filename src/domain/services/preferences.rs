//! Preference linking.
//!
//! Turns the free-text "preferred teammates" field into directed edges between
//! golfer ids. Matching is a fixed list of name heuristics: the first candidate
//! (in roster order) that satisfies any of them wins the token, and tokens that
//! match nobody are dropped.

use crate::domain::model::Golfer;
use std::collections::HashMap;

/// Which heuristic accepted a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Token is a substring of the full name.
    FullNameContainsToken,
    /// Token contains the last name.
    TokenContainsLastName,
    /// Token contains the first name.
    TokenContainsFirstName,
    /// First name starts with the token.
    FirstNamePrefix,
    /// Last name starts with the token.
    LastNamePrefix,
}

/// Splits preference text on commas into trimmed, lowercased, non-empty tokens.
pub fn preference_tokens(text: &str) -> Vec<String> {
    text.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tests a lowercased token against one candidate.
pub fn match_rule(token: &str, candidate: &Golfer) -> Option<MatchRule> {
    let first = candidate.first_name.trim().to_lowercase();
    let last = candidate.last_name.trim().to_lowercase();
    let full = candidate.display_name().to_lowercase();

    if !full.is_empty() && full.contains(token) {
        Some(MatchRule::FullNameContainsToken)
    } else if !last.is_empty() && token.contains(&last) {
        Some(MatchRule::TokenContainsLastName)
    } else if !first.is_empty() && token.contains(&first) {
        Some(MatchRule::TokenContainsFirstName)
    } else if !first.is_empty() && first.starts_with(token) {
        Some(MatchRule::FirstNamePrefix)
    } else if !last.is_empty() && last.starts_with(token) {
        Some(MatchRule::LastNamePrefix)
    } else {
        None
    }
}

/// Directed "A named B" edges. Not symmetric.
#[derive(Debug, Clone, Default)]
pub struct PreferenceGraph {
    edges: HashMap<String, Vec<String>>,
}

impl PreferenceGraph {
    pub fn build(golfers: &[Golfer]) -> Self {
        let mut graph = Self::default();

        for golfer in golfers {
            let Some(text) = golfer.preference_text() else {
                continue;
            };

            for token in preference_tokens(text) {
                let matched = golfers
                    .iter()
                    .filter(|candidate| candidate.id != golfer.id)
                    .find_map(|candidate| match_rule(&token, candidate).map(|rule| (candidate, rule)));

                match matched {
                    Some((candidate, rule)) => {
                        tracing::debug!(
                            "Preference '{}' of {} matched {} ({:?})",
                            token,
                            golfer.id,
                            candidate.id,
                            rule
                        );
                        graph.add_edge(&golfer.id, &candidate.id);
                    }
                    None => {
                        tracing::debug!("Preference '{}' of {} matched nobody", token, golfer.id);
                    }
                }
            }
        }

        graph
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let targets = self.edges.entry(from.to_string()).or_default();
        if !targets.iter().any(|t| t == to) {
            targets.push(to.to_string());
        }
    }

    /// Ids `id` named, in the order the names were matched.
    pub fn preferred(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn prefers(&self, from: &str, to: &str) -> bool {
        self.preferred(from).iter().any(|t| t == to)
    }

    /// Edges between two golfers, counting each direction.
    pub fn mutual_score(&self, a: &str, b: &str) -> usize {
        usize::from(self.prefers(a, b)) + usize::from(self.prefers(b, a))
    }

    /// Edges between two sets of golfers, counting each direction.
    pub fn score_between(&self, left: &[&Golfer], right: &[&Golfer]) -> usize {
        left.iter()
            .flat_map(|a| right.iter().map(move |b| (a, b)))
            .map(|(a, b)| self.mutual_score(&a.id, &b.id))
            .sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_trimmed_and_lowercased() {
        assert_eq!(
            preference_tokens(" Alex Smith , ,JONES,"),
            vec!["alex smith".to_string(), "jones".to_string()]
        );
        assert!(preference_tokens("  ").is_empty());
    }

    #[test]
    fn test_match_rules() {
        let golfer = Golfer::new("1", "Alexander", "Smith");
        assert_eq!(
            match_rule("alexander smith", &golfer),
            Some(MatchRule::FullNameContainsToken)
        );
        assert_eq!(
            match_rule("mr smith jr", &golfer),
            Some(MatchRule::TokenContainsLastName)
        );
        assert_eq!(
            match_rule("alexander s.", &golfer),
            Some(MatchRule::TokenContainsFirstName)
        );
        assert_eq!(match_rule("bob", &golfer), None);
    }

    #[test]
    fn test_prefix_rules_survive_when_name_part_is_blank() {
        let no_last = Golfer::new("1", "Alexander", "");
        assert_eq!(match_rule("alex", &no_last), Some(MatchRule::FullNameContainsToken));
        let nameless = Golfer::new("2", "", "");
        assert_eq!(match_rule("alex", &nameless), None);
    }

    #[test]
    fn test_first_candidate_wins_and_self_is_skipped() {
        let golfers = vec![
            Golfer::new("1", "Sam", "Jones").with_preferences("sam"),
            Golfer::new("2", "Sam", "Brown"),
            Golfer::new("3", "Sam", "White"),
        ];
        let graph = PreferenceGraph::build(&golfers);
        assert_eq!(graph.preferred("1"), &["2".to_string()]);
        assert!(graph.preferred("2").is_empty());
    }

    #[test]
    fn test_graph_is_directed() {
        let golfers = vec![
            Golfer::new("1", "Ann", "Lee").with_preferences("Bob Ray, nobody here"),
            Golfer::new("2", "Bob", "Ray"),
        ];
        let graph = PreferenceGraph::build(&golfers);
        assert!(graph.prefers("1", "2"));
        assert!(!graph.prefers("2", "1"));
        assert_eq!(graph.mutual_score("1", "2"), 1);
        assert_eq!(graph.mutual_score("2", "1"), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_repeated_names_produce_one_edge() {
        let golfers = vec![
            Golfer::new("1", "Ann", "Lee").with_preferences("Ray, Bob Ray, bob"),
            Golfer::new("2", "Bob", "Ray"),
        ];
        let graph = PreferenceGraph::build(&golfers);
        assert_eq!(graph.preferred("1").len(), 1);
    }

    #[test]
    fn test_score_between_sets() {
        let a = Golfer::new("a", "A", "A");
        let b = Golfer::new("b", "B", "B");
        let c = Golfer::new("c", "C", "C");
        let d = Golfer::new("d", "D", "D");
        let mut graph = PreferenceGraph::default();
        graph.add_edge("a", "c");
        graph.add_edge("d", "a");
        graph.add_edge("b", "d");
        graph.add_edge("a", "b");
        assert_eq!(graph.score_between(&[&a, &b], &[&c, &d]), 3);
    }
}
