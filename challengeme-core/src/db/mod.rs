//! SQLite-backed challenge store.
//!
//! A [`Database`] owns one connection for the whole run. Opening it starts an
//! exclusive transaction that is only committed by [`Database::close`];
//! dropping the store without closing it rolls every mutation back.

pub mod schema;
mod seed;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::error::{EntityKind, StoreError};
use crate::models::{Challenge, ChallengeSet, CreateChallengeInput, Language};

pub use seed::SeedReport;

const DATE_FORMAT: &str = "%Y-%m-%d";
const CONSTRAINT_SEPARATOR: &str = ",";

const CHALLENGE_COLUMNS: &str = "id, set_id, description, notes, language_constraints, \
                                 date_started, date_finished, language_used";

pub struct Database {
    conn: Connection,
    path: PathBuf,
    seeded: Option<SeedReport>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

/// A store needs a fresh schema when the file is absent or empty.
fn needs_initialization(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.len() == 0,
        Err(_) => true,
    }
}

fn is_lock_error(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

fn parse_date(idx: usize, value: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()
}

fn split_constraints(value: Option<String>) -> Vec<String> {
    match value {
        Some(s) if !s.is_empty() => s.split(CONSTRAINT_SEPARATOR).map(String::from).collect(),
        _ => Vec::new(),
    }
}

/// Trims, validates and deduplicates constraint names, keeping first-seen order.
fn normalize_constraints(constraints: Vec<String>) -> Result<Vec<String>, StoreError> {
    let mut normalized: Vec<String> = Vec::with_capacity(constraints.len());
    for raw in constraints {
        let name = validate_language_name(&raw, "language constraint")?;
        if !normalized.iter().any(|existing| existing == name) {
            normalized.push(name.to_string());
        }
    }
    Ok(normalized)
}

fn validate_language_name<'a>(name: &'a str, field: &'static str) -> Result<&'a str, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput {
            field,
            reason: "must not be empty".into(),
        });
    }
    if name.contains(CONSTRAINT_SEPARATOR) {
        return Err(StoreError::InvalidInput {
            field,
            reason: format!("{:?} must not contain {:?}", name, CONSTRAINT_SEPARATOR),
        });
    }
    Ok(name)
}

/// Maps a UNIQUE violation raised by SQLite to [`StoreError::AlreadyExists`].
fn map_insert_error(err: rusqlite::Error, kind: EntityKind, name: &str) -> StoreError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        StoreError::AlreadyExists {
            kind,
            name: name.to_string(),
        }
    } else {
        StoreError::Sqlite(err)
    }
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

impl Database {
    /// Opens the store at `path`, creating and seeding it from `seed_dir` if
    /// the file is absent or empty.
    ///
    /// An existing store must have exactly the expected tables and columns,
    /// otherwise [`StoreError::CorruptDatabase`] is returned and the file is
    /// left untouched.
    pub fn open_at(seed_dir: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let fresh = needs_initialization(&path);

        let conn = Connection::open(&path).map_err(|source| {
            if !fresh && source.sqlite_error_code() == Some(ErrorCode::NotADatabase) {
                StoreError::CorruptDatabase { path: path.clone() }
            } else {
                StoreError::Storage {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        if !fresh {
            match schema::matches_expected(&conn) {
                Ok(true) => {}
                Ok(false) => return Err(StoreError::CorruptDatabase { path }),
                Err(source) if is_lock_error(&source) => {
                    return Err(StoreError::Storage { path, source })
                }
                Err(e) => {
                    tracing::debug!("Schema check on {} failed: {}", path.display(), e);
                    return Err(StoreError::CorruptDatabase { path });
                }
            }
        }

        if let Err(source) = conn.execute_batch("BEGIN EXCLUSIVE;") {
            return Err(StoreError::Storage { path, source });
        }

        let mut db = Self {
            conn,
            path,
            seeded: None,
        };

        if fresh {
            tracing::info!("Creating challenge store at {}", db.path.display());
            db.conn.execute_batch(schema::SCHEMA)?;
            db.seeded = Some(db.seed_defaults(seed_dir.as_ref())?);
        }

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What was seeded, if this open created the store.
    pub fn seed_report(&self) -> Option<SeedReport> {
        self.seeded
    }

    /// Commits everything done since open and releases the connection.
    pub fn close(self) -> Result<(), StoreError> {
        let Self { conn, path, .. } = self;
        conn.execute_batch("COMMIT;")?;
        conn.close().map_err(|(_, e)| e)?;
        tracing::debug!("Closed challenge store at {}", path.display());
        Ok(())
    }

    /// Runs `f` against the underlying connection, inside the open transaction.
    pub fn with_connection<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        Ok(f(&self.conn)?)
    }

    // Languages

    pub fn get_language_id(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM languages WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn list_languages(&self) -> Result<Vec<Language>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM languages ORDER BY id")?;
        let languages = stmt
            .query_map([], |row| {
                Ok(Language {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(languages)
    }

    pub fn add_language(&self, name: &str) -> Result<i64, StoreError> {
        let name = validate_language_name(name, "language name")?;
        if self.get_language_id(name)?.is_some() {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Language,
                name: name.to_string(),
            });
        }

        self.conn
            .execute("INSERT INTO languages (name) VALUES (?1)", params![name])
            .map_err(|e| map_insert_error(e, EntityKind::Language, name))?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "Added language {}", name);
        Ok(id)
    }

    // Challenge sets

    pub fn get_challenge_set_id(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM challenge_sets WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn list_challenge_sets(&self) -> Result<Vec<ChallengeSet>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM challenge_sets ORDER BY id")?;
        let sets = stmt
            .query_map([], |row| {
                Ok(ChallengeSet {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sets)
    }

    /// Sets are only created while the store is being initialized.
    fn add_challenge_set(&self, name: &str) -> Result<i64, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput {
                field: "challenge set name",
                reason: "must not be empty".into(),
            });
        }
        if self.get_challenge_set_id(name)?.is_some() {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::ChallengeSet,
                name: name.to_string(),
            });
        }

        self.conn
            .execute(
                "INSERT INTO challenge_sets (name) VALUES (?1)",
                params![name],
            )
            .map_err(|e| map_insert_error(e, EntityKind::ChallengeSet, name))?;
        Ok(self.conn.last_insert_rowid())
    }

    // Challenges

    fn row_to_challenge(row: &Row<'_>) -> rusqlite::Result<Challenge> {
        Ok(Challenge {
            id: row.get(0)?,
            set_id: row.get(1)?,
            description: row.get(2)?,
            notes: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            language_constraints: split_constraints(row.get(4)?),
            date_started: parse_date(5, row.get(5)?)?,
            date_finished: parse_date(6, row.get(6)?)?,
            language_used: row.get(7)?,
        })
    }

    pub fn get_challenge_id(&self, description: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM challenges WHERE description = ?1",
                params![description],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn get_challenge(&self, id: i64) -> Result<Option<Challenge>, StoreError> {
        let challenge = self
            .conn
            .query_row(
                &format!("SELECT {} FROM challenges WHERE id = ?1", CHALLENGE_COLUMNS),
                params![id],
                Self::row_to_challenge,
            )
            .optional()?;
        Ok(challenge)
    }

    /// All challenges in insertion order.
    pub fn list_challenges(&self) -> Result<Vec<Challenge>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM challenges ORDER BY id",
            CHALLENGE_COLUMNS
        ))?;
        let challenges = stmt
            .query_map([], Self::row_to_challenge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(challenges)
    }

    pub fn add_challenge(&self, input: CreateChallengeInput) -> Result<i64, StoreError> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(StoreError::InvalidInput {
                field: "challenge description",
                reason: "must not be empty".into(),
            });
        }
        let constraints = normalize_constraints(input.language_constraints)?;

        let set_exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM challenge_sets WHERE id = ?1)",
            params![input.set_id],
            |row| row.get(0),
        )?;
        if !set_exists {
            return Err(StoreError::UnknownChallengeSet(input.set_id));
        }

        if self.get_challenge_id(description)?.is_some() {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Challenge,
                name: description.to_string(),
            });
        }

        self.conn
            .execute(
                "INSERT INTO challenges (set_id, description, notes, language_constraints)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    input.set_id,
                    description,
                    input.notes,
                    constraints.join(CONSTRAINT_SEPARATOR),
                ],
            )
            .map_err(|e| map_insert_error(e, EntityKind::Challenge, description))?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, set_id = input.set_id, "Added challenge {:?}", description);
        Ok(id)
    }

    /// Removes the challenge. Returns `false` if no such challenge existed.
    pub fn delete_challenge(&self, id: i64) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM challenges WHERE id = ?1", params![id])?;
        tracing::debug!(id, removed, "Deleted challenge");
        Ok(removed > 0)
    }

    /// Marks the challenge as started today in `language`.
    ///
    /// The language is not checked against the challenge's constraints; the
    /// selector is expected to have done that.
    pub fn accept_challenge(&self, id: i64, language: &str) -> Result<(), StoreError> {
        let challenge = self.get_challenge(id)?.ok_or(StoreError::NotFound(id))?;
        if challenge.is_started() {
            return Err(StoreError::InvalidState {
                id,
                state: "started",
            });
        }

        self.conn.execute(
            "UPDATE challenges SET date_started = ?1, language_used = ?2 WHERE id = ?3",
            params![today(), language, id],
        )?;
        tracing::debug!(id, "Accepted challenge in {}", language);
        Ok(())
    }

    /// Marks the challenge as finished today.
    ///
    /// A challenge that was never accepted can still be finished; it then has
    /// a finish date but no start date or language.
    pub fn finish_challenge(&self, id: i64) -> Result<(), StoreError> {
        let challenge = self.get_challenge(id)?.ok_or(StoreError::NotFound(id))?;
        if challenge.is_finished() {
            return Err(StoreError::InvalidState {
                id,
                state: "finished",
            });
        }
        if !challenge.is_started() {
            tracing::debug!(id, "Finishing a challenge that was never started");
        }

        self.conn.execute(
            "UPDATE challenges SET date_finished = ?1 WHERE id = ?2",
            params![today(), id],
        )?;
        tracing::debug!(id, "Finished challenge");
        Ok(())
    }
}
