//! Random selection of an unstarted challenge and a language to do it in.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::NoEligibleChallenge;
use crate::models::{Challenge, Language};

/// Picks a random unstarted challenge and a random language it allows.
///
/// Challenges whose constraints exclude every tracked language are dropped
/// from the candidate pool and another challenge is drawn, so the search
/// always ends after at most one draw per unstarted challenge.
pub fn pick_challenge<'a, R>(
    challenges: &'a [Challenge],
    languages: &'a [Language],
    rng: &mut R,
) -> Result<(&'a Challenge, &'a Language), NoEligibleChallenge>
where
    R: Rng + ?Sized,
{
    let mut candidates: Vec<&Challenge> = challenges.iter().filter(|c| !c.is_started()).collect();
    if candidates.is_empty() {
        return Err(NoEligibleChallenge::NoUnstartedChallenges);
    }
    if languages.is_empty() {
        return Err(NoEligibleChallenge::NoLanguages);
    }

    while !candidates.is_empty() {
        let challenge = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        let eligible: Vec<&Language> = languages
            .iter()
            .filter(|l| challenge.allows_language(&l.name))
            .collect();

        if let Some(language) = eligible.choose(rng) {
            return Ok((challenge, *language));
        }
        tracing::debug!(
            id = challenge.id,
            "No tracked language satisfies {:?}; drawing another challenge",
            challenge.language_constraints
        );
    }

    Err(NoEligibleChallenge::AllConstrained)
}

/// [`pick_challenge`] with the thread-local RNG.
pub fn pick_random_challenge<'a>(
    challenges: &'a [Challenge],
    languages: &'a [Language],
) -> Result<(&'a Challenge, &'a Language), NoEligibleChallenge> {
    pick_challenge(challenges, languages, &mut rand::thread_rng())
}
