use crate::domain::model::{Golfer, TeamMember};
use crate::domain::services::preferences::PreferenceGraph;

pub const REGISTERED_TOGETHER: &str = "Registered together";

/// Reason for a golfer someone on the team named.
pub fn preferred_by(referrer: &Golfer) -> String {
    format!("Preferred by {}", referrer.display_name())
}

/// Reason for a golfer who named someone on the team.
pub fn prefers(referee: &Golfer) -> String {
    format!("Prefers {}", referee.display_name())
}

pub fn add_reason(member: &mut TeamMember, reason: String) {
    if !member.reasons.contains(&reason) {
        member.reasons.push(reason);
    }
}

pub fn registered_together(golfers: &[&Golfer]) -> Vec<TeamMember> {
    golfers
        .iter()
        .map(|&golfer| TeamMember {
            golfer: golfer.clone(),
            reasons: vec![REGISTERED_TOGETHER.to_string()],
        })
        .collect()
}

/// Adds "Preferred by X" to every member named by another member of the same team.
pub fn annotate_preferences(members: &mut [TeamMember], graph: &PreferenceGraph) {
    let found: Vec<(usize, String)> = members
        .iter()
        .enumerate()
        .flat_map(|(pos, member)| {
            members
                .iter()
                .filter(move |referrer| graph.prefers(&referrer.golfer.id, &member.golfer.id))
                .map(move |referrer| (pos, preferred_by(&referrer.golfer)))
        })
        .collect();

    for (pos, reason) in found {
        add_reason(&mut members[pos], reason);
    }
}
