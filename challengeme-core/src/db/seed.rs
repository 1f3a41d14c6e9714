//! Loading the bundled seed packs into a freshly created store.

use std::fs;
use std::path::{Path, PathBuf};

use super::Database;
use crate::error::StoreError;
use crate::models::{CreateChallengeInput, SeedFile, SELF_ADDED_SET};

/// Counts of what a seeding pass inserted and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sets: usize,
    pub challenges: usize,
    pub skipped: usize,
}

/// `*.json` files directly inside `dir`, sorted by file name.
fn seed_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn read_seed_file(path: &Path) -> Result<SeedFile, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Per-entry failures that only skip the entry rather than abort the pass.
fn is_skippable(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::AlreadyExists { .. } | StoreError::InvalidInput { .. }
    )
}

impl Database {
    /// Creates the self-added set, then one set per seed file in `seed_dir`
    /// with its challenges.
    pub(crate) fn seed_defaults(&self, seed_dir: &Path) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();

        self.add_challenge_set(SELF_ADDED_SET)?;
        report.sets += 1;

        let paths = match seed_paths(seed_dir) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(
                    "Seed directory {} is not readable ({}); starting with no bundled challenges",
                    seed_dir.display(),
                    e
                );
                return Ok(report);
            }
        };

        for path in paths {
            let seed = match read_seed_file(&path) {
                Ok(seed) => seed,
                Err(e) => {
                    tracing::warn!("Skipping seed file {}: {}", path.display(), e);
                    report.skipped += 1;
                    continue;
                }
            };

            let set_id = match self.add_challenge_set(&seed.name) {
                Ok(id) => id,
                Err(e) if is_skippable(&e) => {
                    tracing::warn!(
                        "Duplicate challenge set in {}; it will not be added to the database: {}",
                        path.display(),
                        e
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.sets += 1;

            for entry in seed.entries() {
                let description = entry.description.clone();
                let input = CreateChallengeInput {
                    set_id,
                    description: entry.description,
                    notes: entry.notes,
                    language_constraints: entry.language_constraints,
                };

                match self.add_challenge(input) {
                    Ok(_) => report.challenges += 1,
                    Err(e) if is_skippable(&e) => {
                        tracing::warn!(
                            "Skipping challenge {:?} from {}: {}",
                            description,
                            path.display(),
                            e
                        );
                        report.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(
            sets = report.sets,
            challenges = report.challenges,
            skipped = report.skipped,
            "Seeded challenge store from {}",
            seed_dir.display()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn only_json_files_are_picked_up_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let names: Vec<_> = seed_paths(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(seed_paths(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"name\": ").unwrap();
        assert!(read_seed_file(&path).is_err());
    }
}
