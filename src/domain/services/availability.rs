use crate::domain::model::Golfer;
use std::collections::{HashMap, HashSet};

/// Golfers not yet on a persisted team, in input order.
///
/// A repeated id keeps only its first occurrence so that every available
/// golfer can end up in exactly one place.
pub fn available_golfers(golfers: &[Golfer], already_assigned: &HashSet<String>) -> Vec<Golfer> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut available = Vec::with_capacity(golfers.len());

    for golfer in golfers {
        if already_assigned.contains(&golfer.id) {
            continue;
        }
        if !seen.insert(golfer.id.as_str()) {
            tracing::warn!("Duplicate golfer id {} ignored", golfer.id);
            continue;
        }
        available.push(golfer.clone());
    }

    available
}

/// The available golfers of one run with an id lookup.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    golfers: Vec<Golfer>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(golfers: &[Golfer], already_assigned: &HashSet<String>) -> Self {
        let golfers = available_golfers(golfers, already_assigned);
        let index = golfers
            .iter()
            .enumerate()
            .map(|(pos, g)| (g.id.clone(), pos))
            .collect();
        Self { golfers, index }
    }

    pub fn golfers(&self) -> &[Golfer] {
        &self.golfers
    }

    pub fn get(&self, id: &str) -> Option<&Golfer> {
        self.index.get(id).map(|&pos| &self.golfers[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> HashSet<String> {
        self.index.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.golfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.golfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golfers() -> Vec<Golfer> {
        vec![
            Golfer::new("1", "Ann", "Lee"),
            Golfer::new("2", "Bob", "Ray"),
            Golfer::new("3", "Cat", "Fox"),
        ]
    }

    #[test]
    fn test_filters_assigned_and_keeps_order() {
        let assigned: HashSet<String> = ["2".to_string()].into_iter().collect();
        let available = available_golfers(&golfers(), &assigned);
        let ids: Vec<&str> = available.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut input = golfers();
        input.push(Golfer::new("1", "Ann", "Duplicate"));
        let roster = Roster::new(&input, &HashSet::new());
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get("1").unwrap().last_name, "Lee");
    }

    #[test]
    fn test_empty_input() {
        let roster = Roster::new(&[], &HashSet::new());
        assert!(roster.is_empty());
        assert!(roster.get("1").is_none());
    }
}
