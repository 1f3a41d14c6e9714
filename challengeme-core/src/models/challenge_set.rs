use serde::{Deserialize, Serialize};

/// Name of the synthetic set that holds challenges the user added by hand.
pub const SELF_ADDED_SET: &str = "Self-added challenges";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSet {
    pub id: i64,
    pub name: String,
}

impl ChallengeSet {
    pub fn is_self_added(&self) -> bool {
        self.name == SELF_ADDED_SET
    }
}

/// A bundled seed document.
///
/// Either `challenges` lists the entries explicitly, or `num_challenges`
/// asks for that many placeholder challenges named `"<name> challenge <i>"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFile {
    pub name: String,
    #[serde(default)]
    pub challenges: Vec<SeedChallenge>,
    #[serde(rename = "num-challenges", default)]
    pub num_challenges: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedChallenge {
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "languageConstraints", default)]
    pub language_constraints: Vec<String>,
}

impl SeedFile {
    /// The challenge entries this document expands to.
    pub fn entries(&self) -> Vec<SeedChallenge> {
        if !self.challenges.is_empty() {
            return self.challenges.clone();
        }

        (0..self.num_challenges.unwrap_or(0))
            .map(|i| SeedChallenge {
                description: format!("{} challenge {}", self.name, i),
                notes: String::new(),
                language_constraints: Vec::new(),
            })
            .collect()
    }
}
