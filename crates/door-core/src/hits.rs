use crate::types::Domain;
use serde::{Deserialize, Serialize};

/// One of the four micro-actions generated when a warstack completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub fact: String,
    pub obstacle: String,
    pub strike: String,
    pub responsibility: String,
}

// Static per-domain template table: 4 domains x 4 hits, (fact, obstacle, strike).
const BODY: [(&str, &str, &str); 4] = [
    (
        "Establish daily fitness routine",
        "Time constraints",
        "Block 30min morning slot",
    ),
    (
        "Optimize nutrition plan",
        "Food prep time",
        "Meal prep on Sunday",
    ),
    (
        "Track health metrics",
        "Forgetting to measure",
        "Set reminders",
    ),
    (
        "Build sustainable habits",
        "Motivation dips",
        "Accountability partner",
    ),
];

const BEING: [(&str, &str, &str); 4] = [
    (
        "Daily meditation practice",
        "Busy schedule",
        "5-min minimum commitment",
    ),
    (
        "Weekly reflection sessions",
        "Resistance to introspection",
        "Structured prompts",
    ),
    (
        "Spiritual growth activity",
        "Lack of direction",
        "Find mentor/guide",
    ),
    (
        "Consistent journaling",
        "Nothing to write",
        "Daily gratitude focus",
    ),
];

const BALANCE: [(&str, &str, &str); 4] = [
    (
        "Quality time with partner",
        "Work distractions",
        "Phone-free evenings",
    ),
    (
        "Family activity planning",
        "Scheduling conflicts",
        "Monthly family calendar",
    ),
    (
        "Friend connection maintenance",
        "Distance",
        "Weekly check-ins",
    ),
    (
        "Social boundary setting",
        "People pleasing",
        "Practice saying no",
    ),
];

const BUSINESS: [(&str, &str, &str); 4] = [
    (
        "Revenue milestone progress",
        "Market uncertainty",
        "Diversify income streams",
    ),
    (
        "Skill development completion",
        "Learning overwhelm",
        "Focus on one skill",
    ),
    (
        "Network expansion",
        "Introversion",
        "Attend one event weekly",
    ),
    (
        "System optimization",
        "Analysis paralysis",
        "Implement incrementally",
    ),
];

/// Generate the four hits for a domain from the static template table.
/// Ids are `hit-1` .. `hit-4`; responsibility is always "Self".
pub fn generate(domain: Domain) -> Vec<Hit> {
    let table = match domain {
        Domain::Body => &BODY,
        Domain::Being => &BEING,
        Domain::Balance => &BALANCE,
        Domain::Business => &BUSINESS,
    };
    table
        .iter()
        .enumerate()
        .map(|(idx, (fact, obstacle, strike))| Hit {
            id: format!("hit-{}", idx + 1),
            fact: fact.to_string(),
            obstacle: obstacle.to_string(),
            strike: strike.to_string(),
            responsibility: "Self".to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_yields_four_hits() {
        for &domain in Domain::all() {
            let hits = generate(domain);
            assert_eq!(hits.len(), 4, "{domain}");
            for (i, hit) in hits.iter().enumerate() {
                assert_eq!(hit.id, format!("hit-{}", i + 1));
                assert_eq!(hit.responsibility, "Self");
                assert!(!hit.fact.is_empty());
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(Domain::Body), generate(Domain::Body));
        assert_eq!(generate(Domain::Business)[0].fact, "Revenue milestone progress");
    }
}
