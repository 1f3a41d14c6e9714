use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub set_id: i64,
    pub description: String,
    pub notes: String,
    /// Languages this challenge may be attempted in. Empty means any.
    pub language_constraints: Vec<String>,
    pub date_started: Option<NaiveDate>,
    pub date_finished: Option<NaiveDate>,
    pub language_used: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Unstarted,
    Active,
    Finished,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unstarted" => Some(Self::Unstarted),
            "active" => Some(Self::Active),
            "finished" => Some(Self::Finished),
            _ => None,
        }
    }
}

impl Challenge {
    pub fn status(&self) -> ChallengeStatus {
        if self.date_finished.is_some() {
            ChallengeStatus::Finished
        } else if self.date_started.is_some() {
            ChallengeStatus::Active
        } else {
            ChallengeStatus::Unstarted
        }
    }

    pub fn is_started(&self) -> bool {
        self.date_started.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.date_finished.is_some()
    }

    pub fn is_constrained(&self) -> bool {
        !self.language_constraints.is_empty()
    }

    /// Whether `language` satisfies this challenge's constraint list.
    pub fn allows_language(&self, language: &str) -> bool {
        !self.is_constrained() || self.language_constraints.iter().any(|l| l == language)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChallengeInput {
    pub set_id: i64,
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub language_constraints: Vec<String>,
}
