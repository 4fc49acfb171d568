use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// A tournament registrant as supplied by the registrant source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Golfer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_handicap",
        skip_serializing_if = "Option::is_none"
    )]
    pub handicap: Option<f64>,
    #[serde(
        default,
        alias = "preferred_teammates",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_teammates: Option<String>,
    #[serde(
        default,
        alias = "registration_group_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_group_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Number(f64),
    Text(String),
}

// Registrant stores hand out numeric ids as often as string ones.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Integer(n) => n.to_string(),
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s.trim().to_string(),
    })
}

// 空字串或無法解析的差點視為沒有差點
fn deserialize_handicap<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Integer(n)) => Some(n as f64),
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl Golfer {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            handicap: None,
            preferred_teammates: None,
            registration_group_id: None,
        }
    }

    pub fn with_handicap(mut self, handicap: f64) -> Self {
        self.handicap = Some(handicap);
        self
    }

    pub fn with_preferences(mut self, text: impl Into<String>) -> Self {
        self.preferred_teammates = Some(text.into());
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.registration_group_id = Some(group_id.into());
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Group id, with blank values treated as no group.
    pub fn group_id(&self) -> Option<&str> {
        self.registration_group_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Preference text, with blank values treated as no preference.
    pub fn preference_text(&self) -> Option<&str> {
        self.preferred_teammates
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Which rule produced a suggested team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamKind {
    RegisteredGroup,
    SplitGroup,
    Trio,
    MergedPairs,
    Pair,
    PreferenceCluster,
    Fallback,
}

impl TeamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamKind::RegisteredGroup => "registered_group",
            TeamKind::SplitGroup => "split_group",
            TeamKind::Trio => "trio",
            TeamKind::MergedPairs => "merged_pairs",
            TeamKind::Pair => "pair",
            TeamKind::PreferenceCluster => "preference_cluster",
            TeamKind::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub golfer: Golfer,
    pub reasons: Vec<String>,
}

impl TeamMember {
    pub fn new(golfer: Golfer) -> Self {
        Self {
            golfer,
            reasons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSuggestion {
    pub name: String,
    pub kind: TeamKind,
    pub members: Vec<TeamMember>,
}

impl TeamSuggestion {
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.golfer.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of the known handicaps, `None` when nobody on the team has one.
    pub fn combined_handicap(&self) -> Option<f64> {
        self.members
            .iter()
            .filter_map(|m| m.golfer.handicap)
            .fold(None, |acc, h| Some(acc.unwrap_or(0.0) + h))
    }
}

/// Output of one suggestion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRun {
    pub suggested_teams: Vec<TeamSuggestion>,
    pub unassigned: Vec<Golfer>,
}

impl SuggestionRun {
    pub fn assigned_count(&self) -> usize {
        self.suggested_teams.iter().map(TeamSuggestion::len).sum()
    }

    /// Checks the invariants any run (generated or edited by a caller) must keep:
    /// team sizes stay within 2..=4, no golfer appears twice, and teams plus
    /// unassigned cover `available_ids` exactly.
    pub fn check_contract(&self, available_ids: &HashSet<String>) -> crate::Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();

        for team in &self.suggested_teams {
            if !(2..=4).contains(&team.len()) {
                return Err(crate::TeamError::ContractViolation {
                    message: format!("{} has {} members", team.name, team.len()),
                });
            }
            for id in team.member_ids() {
                if !seen.insert(id) {
                    return Err(crate::TeamError::ContractViolation {
                        message: format!("golfer {} appears more than once", id),
                    });
                }
            }
        }

        for golfer in &self.unassigned {
            if !seen.insert(golfer.id.as_str()) {
                return Err(crate::TeamError::ContractViolation {
                    message: format!("golfer {} is both on a team and unassigned", golfer.id),
                });
            }
        }

        if let Some(extra) = seen.iter().find(|id| !available_ids.contains(**id)) {
            return Err(crate::TeamError::ContractViolation {
                message: format!("golfer {} was not available for this run", extra),
            });
        }

        if let Some(missing) = available_ids.iter().find(|id| !seen.contains(id.as_str())) {
            return Err(crate::TeamError::ContractViolation {
                message: format!("golfer {} is missing from the run", missing),
            });
        }

        Ok(())
    }
}

/// Everything the transform step needs: the registrants and who is already on a team.
#[derive(Debug, Clone, Default)]
pub struct RegistrantBatch {
    pub golfers: Vec<Golfer>,
    pub already_assigned: HashSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> TeamMember {
        TeamMember::new(Golfer::new(id, "First", id))
    }

    #[test]
    fn test_display_name_trims_missing_parts() {
        assert_eq!(Golfer::new("1", "Alex", "Smith").display_name(), "Alex Smith");
        assert_eq!(Golfer::new("2", "", "Smith").display_name(), "Smith");
        assert_eq!(Golfer::new("3", " Alex ", "").display_name(), "Alex");
    }

    #[test]
    fn test_blank_fields_are_no_signal() {
        let golfer = Golfer::new("1", "A", "B").with_group("  ").with_preferences("");
        assert_eq!(golfer.group_id(), None);
        assert_eq!(golfer.preference_text(), None);
    }

    #[test]
    fn test_deserialize_camel_and_snake_case() {
        let camel: Golfer = serde_json::from_str(
            r#"{"id":"1","firstName":"Alex","lastName":"Smith","registrationGroupId":"g1"}"#,
        )
        .unwrap();
        let snake: Golfer = serde_json::from_str(
            r#"{"id":"1","first_name":"Alex","last_name":"Smith","registration_group_id":"g1"}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.group_id(), Some("g1"));
    }

    #[test]
    fn test_deserialize_loose_id_and_handicap() {
        let golfers: Vec<Golfer> = serde_json::from_str(
            r#"[
                {"id": 7, "firstName": "A", "lastName": "B", "handicap": "12.4"},
                {"id": "8", "firstName": "C", "lastName": "D", "handicap": ""},
                {"id": "9", "firstName": "E", "lastName": "F", "handicap": null},
                {"id": "10", "firstName": "G", "lastName": "H", "handicap": 3}
            ]"#,
        )
        .unwrap();
        assert_eq!(golfers[0].id, "7");
        assert_eq!(golfers[0].handicap, Some(12.4));
        assert_eq!(golfers[1].handicap, None);
        assert_eq!(golfers[2].handicap, None);
        assert_eq!(golfers[3].handicap, Some(3.0));
    }

    #[test]
    fn test_combined_handicap() {
        let mut team = TeamSuggestion {
            name: "Team 1".to_string(),
            kind: TeamKind::Fallback,
            members: vec![member("a"), member("b")],
        };
        assert_eq!(team.combined_handicap(), None);

        team.members[0].golfer.handicap = Some(10.5);
        team.members[1].golfer.handicap = Some(4.0);
        assert_eq!(team.combined_handicap(), Some(14.5));
    }

    #[test]
    fn test_check_contract_detects_duplicates_and_sizes() {
        let available: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let ok = SuggestionRun {
            suggested_teams: vec![TeamSuggestion {
                name: "Team 1".to_string(),
                kind: TeamKind::Pair,
                members: vec![member("a"), member("b")],
            }],
            unassigned: vec![Golfer::new("c", "C", "C")],
        };
        assert!(ok.check_contract(&available).is_ok());

        let mut duplicated = ok.clone();
        duplicated.unassigned.push(Golfer::new("a", "A", "A"));
        assert!(duplicated.check_contract(&available).is_err());

        let mut single = ok.clone();
        single.suggested_teams[0].members.pop();
        assert!(single.check_contract(&available).is_err());

        let mut missing = ok;
        missing.unassigned.clear();
        assert!(missing.check_contract(&available).is_err());
    }
}
