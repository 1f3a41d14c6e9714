//! Subcommand handlers. Each one reads from and writes to a [`Console`] and
//! leaves committing to the caller.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Context;
use challengeme_core::models::{Challenge, CreateChallengeInput, SELF_ADDED_SET};
use challengeme_core::{selector, Database, NoEligibleChallenge, StoreError};
use rand::Rng;

use crate::cli::Commands;
use crate::console::Console;

pub fn execute<R, W, G>(
    command: &Commands,
    db: &Database,
    console: &mut Console<R, W>,
    rng: &mut G,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    match command {
        Commands::GetLanguages => get_languages(db, console),
        Commands::AddLanguage { language } => add_language(db, console, language),
        Commands::GetChallenges => get_challenges(db, console),
        Commands::AddChallenge => add_challenge(db, console),
        Commands::DeleteChallenge => delete_challenge(db, console),
        Commands::PickChallenge => pick_challenge(db, console, rng),
        Commands::ActiveChallenges => active_challenges(db, console),
        Commands::CompletedChallenges => completed_challenges(db, console),
        Commands::SetFinished => set_finished(db, console),
    }
}

fn format_date<D: Display>(date: Option<D>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn format_constraints(challenge: &Challenge) -> String {
    if challenge.is_constrained() {
        challenge.language_constraints.join(", ")
    } else {
        "none".into()
    }
}

fn active(db: &Database) -> Result<Vec<Challenge>, StoreError> {
    Ok(db
        .list_challenges()?
        .into_iter()
        .filter(|c| c.is_started() && !c.is_finished())
        .collect())
}

fn print_numbered<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    challenges: &[Challenge],
) -> std::io::Result<()> {
    for (i, challenge) in challenges.iter().enumerate() {
        console.say(format!("[{}] {}", i, challenge.description))?;
    }
    Ok(())
}

fn get_languages<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let languages = db.list_languages()?;
    if languages.is_empty() {
        console.say("No languages have been added yet.")?;
        return Ok(());
    }

    console.say("The saved programming languages are:")?;
    for language in languages {
        console.say(format!("  {}", language.name))?;
    }
    Ok(())
}

fn add_language<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
    language: &str,
) -> anyhow::Result<()> {
    console.say(format!("Adding language {} to the database.", language))?;
    match db.add_language(language) {
        Ok(_) => {}
        Err(StoreError::AlreadyExists { .. }) => {
            console.say(format!("Error: {} is already in the database.", language))?
        }
        Err(e @ StoreError::InvalidInput { .. }) => console.say(format!("Error: {}", e))?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn get_challenges<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let challenges = db.list_challenges()?;

    console.say(format!("There are a total of {} challenges:", challenges.len()))?;
    for challenge in &challenges {
        console.say("")?;
        console.say(format!("Challenge: {}", challenge.description))?;
        console.say(format!("Notes: {}", challenge.notes))?;
        console.say(format!(
            "Language constraints: {}",
            format_constraints(challenge)
        ))?;
    }
    Ok(())
}

fn add_challenge<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let set_id = db
        .get_challenge_set_id(SELF_ADDED_SET)?
        .with_context(|| format!("The challenge set {:?} is missing", SELF_ADDED_SET))?;

    console.say("Enter the challenge info:")?;

    let description = loop {
        match console.ask("Description: ")? {
            Some(answer) if !answer.trim().is_empty() => break answer,
            Some(_) => continue,
            None => return Ok(()),
        }
    };
    let notes = console.ask("Notes: ")?.unwrap_or_default();
    let constraints = console
        .ask("Language constraints (space-separated): ")?
        .unwrap_or_default();

    let input = CreateChallengeInput {
        set_id,
        description,
        notes,
        language_constraints: constraints.split_whitespace().map(String::from).collect(),
    };

    match db.add_challenge(input) {
        Ok(_) => console.say("Challenge added.")?,
        Err(StoreError::AlreadyExists { .. }) => {
            console.say("A challenge with this description has already been added.")?
        }
        Err(e @ StoreError::InvalidInput { .. }) => console.say(format!("Error: {}", e))?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn delete_challenge<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let set_id = db.get_challenge_set_id(SELF_ADDED_SET)?;
    let challenges: Vec<_> = db
        .list_challenges()?
        .into_iter()
        .filter(|c| Some(c.set_id) == set_id)
        .collect();

    if challenges.is_empty() {
        console.say("You have no self-made challenges, exiting...")?;
        return Ok(());
    }

    print_numbered(console, &challenges)?;
    let Some(index) = console.pick_index(
        "Enter the number of the challenge to delete, or q to quit: ",
        challenges.len(),
    )?
    else {
        return Ok(());
    };

    if console.confirm(&format!("Delete challenge {}? [y/n] ", index))? {
        db.delete_challenge(challenges[index].id)?;
        console.say("Challenge deleted.")?;
    }
    Ok(())
}

fn pick_challenge<R, W, G>(
    db: &Database,
    console: &mut Console<R, W>,
    rng: &mut G,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let challenges = db.list_challenges()?;
    let languages = db.list_languages()?;

    let (challenge, language) = match selector::pick_challenge(&challenges, &languages, rng) {
        Ok(pick) => pick,
        Err(NoEligibleChallenge::NoLanguages) => {
            console.say("You have not added any languages!")?;
            console.say("challengeme add-language <language>")?;
            return Ok(());
        }
        Err(NoEligibleChallenge::NoUnstartedChallenges) => {
            console.say("There are no unstarted challenges left.")?;
            return Ok(());
        }
        Err(NoEligibleChallenge::AllConstrained) => {
            console.say(
                "All unstarted challenges are restricted to languages you have not added.",
            )?;
            return Ok(());
        }
    };

    console.say("Your task is:")?;
    console.say(&challenge.description)?;
    if !challenge.notes.is_empty() {
        console.say(format!("({})", challenge.notes))?;
    }
    console.say(format!("Language: {}", language.name))?;

    if console.confirm("Do you choose to accept it? [y/n] ")? {
        db.accept_challenge(challenge.id, &language.name)?;
        console.say("Challenge accepted.")?;
    }
    Ok(())
}

fn active_challenges<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let challenges = active(db)?;
    if challenges.is_empty() {
        console.say("You have no active challenges.")?;
        return Ok(());
    }

    console.say("Here are your actively running challenges:")?;
    for challenge in challenges {
        console.say(format!(
            "[{}] {}",
            challenge.language_used.as_deref().unwrap_or("-"),
            challenge.description
        ))?;
        console.say(format!("\tStarted: {}", format_date(challenge.date_started)))?;
    }
    Ok(())
}

fn completed_challenges<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let challenges: Vec<_> = db
        .list_challenges()?
        .into_iter()
        .filter(Challenge::is_finished)
        .collect();
    if challenges.is_empty() {
        console.say("You have not completed any challenges yet.")?;
        return Ok(());
    }

    console.say("Here are your completed challenges:")?;
    for challenge in challenges {
        console.say(format!(
            "[{}] {}",
            challenge.language_used.as_deref().unwrap_or("-"),
            challenge.description
        ))?;
        console.say(format!("\tStarted: {}", format_date(challenge.date_started)))?;
        console.say(format!("\tFinished: {}", format_date(challenge.date_finished)))?;
    }
    Ok(())
}

fn set_finished<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let challenges = active(db)?;
    if challenges.is_empty() {
        console.say("You have no active challenges, exiting...")?;
        return Ok(());
    }

    print_numbered(console, &challenges)?;
    let Some(index) = console.pick_index(
        "Enter the number of the challenge to finish, or q to quit: ",
        challenges.len(),
    )?
    else {
        return Ok(());
    };

    if console.confirm(&format!("Finish challenge {}? [y/n] ", index))? {
        db.finish_challenge(challenges[index].id)?;
        console.say("Challenge marked as finished.")?;
    }
    Ok(())
}
