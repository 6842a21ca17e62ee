use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// The four life domains a door can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Body,
    Being,
    Balance,
    Business,
}

impl Domain {
    pub fn all() -> &'static [Domain] {
        &[
            Domain::Body,
            Domain::Being,
            Domain::Balance,
            Domain::Business,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Body => "Body",
            Domain::Being => "Being",
            Domain::Balance => "Balance",
            Domain::Business => "Business",
        }
    }

    /// Lowercased form used for external task tags.
    pub fn tag(self) -> &'static str {
        match self {
            Domain::Body => "body",
            Domain::Being => "being",
            Domain::Balance => "balance",
            Domain::Business => "business",
        }
    }

    /// Normalize free text into a canonical domain.
    ///
    /// Substring match, case-insensitive; anything unrecognized (including
    /// empty input) falls back to Business.
    pub fn normalize(value: &str) -> Domain {
        let raw = value.to_lowercase();
        if raw.contains("body") {
            Domain::Body
        } else if raw.contains("being") {
            Domain::Being
        } else if raw.contains("balance") {
            Domain::Balance
        } else {
            Domain::Business
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WarstackStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WarstackStatus {
    #[default]
    Draft,
    Complete,
}

impl WarstackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WarstackStatus::Draft => "draft",
            WarstackStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for WarstackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepKey — the fixed 10-step warstack questionnaire order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Domain,
    DominoDoor,
    Trigger,
    Narrative,
    Validation,
    Impact,
    Consequences,
    Insights,
    Lessons,
    Hits,
}

impl StepKey {
    pub fn all() -> &'static [StepKey] {
        &[
            StepKey::Domain,
            StepKey::DominoDoor,
            StepKey::Trigger,
            StepKey::Narrative,
            StepKey::Validation,
            StepKey::Impact,
            StepKey::Consequences,
            StepKey::Insights,
            StepKey::Lessons,
            StepKey::Hits,
        ]
    }

    pub fn first() -> StepKey {
        StepKey::Domain
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<StepKey> {
        let all = StepKey::all();
        all.get(self.index() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKey::Domain => "domain",
            StepKey::DominoDoor => "domino_door",
            StepKey::Trigger => "trigger",
            StepKey::Narrative => "narrative",
            StepKey::Validation => "validation",
            StepKey::Impact => "impact",
            StepKey::Consequences => "consequences",
            StepKey::Insights => "insights",
            StepKey::Lessons => "lessons",
            StepKey::Hits => "hits",
        }
    }

    /// The question shown to the user when this step is reached.
    pub fn prompt(self) -> &'static str {
        match self {
            StepKey::Domain => {
                "Step 1/10: Domain\nWhich domain does this door belong to?\nBody / Being / Balance / Business."
            }
            StepKey::DominoDoor => {
                "Step 2/10: Domino Door\nWhich single door sets everything else in motion? (concrete and measurable)"
            }
            StepKey::Trigger => "Step 3/10: Trigger\nWhich event or person set this off?",
            StepKey::Narrative => {
                "Step 4/10: Narrative\nWhat story are you telling yourself about this door right now?"
            }
            StepKey::Validation => "Step 5/10: Validation\nWhy must this door be opened right now?",
            StepKey::Impact => "Step 6/10: Impact\nWhat changes once the door is open?",
            StepKey::Consequences => "Step 7/10: Consequences\nWhat happens if you leave it shut?",
            StepKey::Insights => "Step 8/10: Insights\nWhat new realizations do you have?",
            StepKey::Lessons => {
                "Step 9/10: Lessons Learned\nWhat is the most important lesson you take with you?"
            }
            StepKey::Hits => {
                "Step 10/10: Hits\nAny constraints for the four hits? (or reply: generate)"
            }
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepKey {
    type Err = crate::error::DoorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(StepKey::Domain),
            "domino_door" => Ok(StepKey::DominoDoor),
            "trigger" => Ok(StepKey::Trigger),
            "narrative" => Ok(StepKey::Narrative),
            "validation" => Ok(StepKey::Validation),
            "impact" => Ok(StepKey::Impact),
            "consequences" => Ok(StepKey::Consequences),
            "insights" => Ok(StepKey::Insights),
            "lessons" => Ok(StepKey::Lessons),
            "hits" => Ok(StepKey::Hits),
            _ => Err(crate::error::DoorError::InvalidStep(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
