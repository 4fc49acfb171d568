use crate::domain::model::Golfer;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct RegistrationGroup<'a> {
    pub id: String,
    pub members: Vec<&'a Golfer>,
}

/// Available golfers bucketed by registration group.
///
/// Groups keep first-seen order and members keep input order; fill-search and
/// pair merging break ties on that order.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub groups: Vec<RegistrationGroup<'a>>,
    pub ungrouped: Vec<&'a Golfer>,
}

impl<'a> Partition<'a> {
    pub fn new(golfers: &'a [Golfer]) -> Self {
        let mut groups: Vec<RegistrationGroup<'a>> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut ungrouped = Vec::new();

        for golfer in golfers {
            match golfer.group_id() {
                Some(group_id) => match positions.get(group_id) {
                    Some(&pos) => groups[pos].members.push(golfer),
                    None => {
                        positions.insert(group_id, groups.len());
                        groups.push(RegistrationGroup {
                            id: group_id.to_string(),
                            members: vec![golfer],
                        });
                    }
                },
                None => ungrouped.push(golfer),
            }
        }

        tracing::debug!(
            "Partitioned {} golfers into {} registration groups and {} ungrouped",
            golfers.len(),
            groups.len(),
            ungrouped.len()
        );

        Self { groups, ungrouped }
    }

    /// Ids of every golfer that registered with a group.
    pub fn grouped_ids(&self) -> HashSet<&'a str> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.id.as_str()))
            .collect()
    }

    /// Group sizes in group order, used for dry-run summaries.
    pub fn group_sizes(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| (g.id.clone(), g.members.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_preserve_insertion_order() {
        let golfers = vec![
            Golfer::new("1", "A", "A").with_group("g2"),
            Golfer::new("2", "B", "B"),
            Golfer::new("3", "C", "C").with_group("g1"),
            Golfer::new("4", "D", "D").with_group("g2"),
            Golfer::new("5", "E", "E").with_group(" "),
        ];
        let partition = Partition::new(&golfers);

        assert_eq!(partition.groups.len(), 2);
        assert_eq!(partition.groups[0].id, "g2");
        let g2: Vec<&str> = partition.groups[0].members.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(g2, vec!["1", "4"]);
        assert_eq!(partition.groups[1].id, "g1");

        let ungrouped: Vec<&str> = partition.ungrouped.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ungrouped, vec!["2", "5"]);
    }

    #[test]
    fn test_grouped_ids() {
        let golfers = vec![
            Golfer::new("1", "A", "A").with_group("g1"),
            Golfer::new("2", "B", "B"),
        ];
        let partition = Partition::new(&golfers);
        let grouped = partition.grouped_ids();
        assert!(grouped.contains("1"));
        assert!(!grouped.contains("2"));
        assert_eq!(partition.group_sizes(), vec![("g1".to_string(), 1)]);
    }
}
