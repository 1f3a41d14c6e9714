use speculate2::speculate;

speculate! {
    use challengeme_core::db::schema;
    use challengeme_core::models::{CreateChallengeInput, SELF_ADDED_SET};
    use challengeme_core::{Database, EntityKind, StoreError};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const PACK_A: &str = r#"{"name":"Pack A","challenges":[{"description":"Reverse a string","notes":"","languageConstraints":["python","go"]}]}"#;

    fn seed_dir(root: &TempDir, files: &[(&str, &str)]) -> PathBuf {
        let dir = root.path().join("defaults");
        fs::create_dir_all(&dir).expect("Failed to create seed dir");
        for (name, contents) in files {
            fs::write(dir.join(name), contents).expect("Failed to write seed file");
        }
        dir
    }

    fn db_path(root: &TempDir) -> PathBuf {
        root.path().join("challenges.db")
    }

    fn open(seeds: &Path, path: &Path) -> Database {
        Database::open_at(seeds, path).expect("Failed to open database")
    }

    fn self_added_input(db: &Database, description: &str) -> CreateChallengeInput {
        CreateChallengeInput {
            set_id: db.get_challenge_set_id(SELF_ADDED_SET).unwrap().unwrap(),
            description: description.to_string(),
            notes: "some notes".to_string(),
            language_constraints: vec![],
        }
    }

    describe "opening a new store" {
        it "creates the three tables with their exact columns" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            assert!(!path.exists());

            let db = open(&seed_dir(&root, &[]), &path);
            let tables = db.with_connection(schema::table_names).unwrap();
            assert_eq!(tables, vec!["challenge_sets", "challenges", "languages"]);

            let challenge_columns = db
                .with_connection(|conn| schema::column_names(conn, "challenges"))
                .unwrap();
            assert_eq!(
                challenge_columns,
                vec![
                    "id",
                    "set_id",
                    "description",
                    "notes",
                    "language_constraints",
                    "date_started",
                    "date_finished",
                    "language_used",
                ]
            );
            for table in ["challenge_sets", "languages"] {
                let columns = db
                    .with_connection(|conn| schema::column_names(conn, table))
                    .unwrap();
                assert_eq!(columns, vec!["id", "name"]);
            }
            db.close().unwrap();

            assert!(fs::metadata(&path).unwrap().len() > 0);
        }

        it "creates the self-added set first" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[("a.json", PACK_A)]), &db_path(&root));

            let sets = db.list_challenge_sets().unwrap();
            assert_eq!(sets[0].name, SELF_ADDED_SET);
            assert!(sets[0].is_self_added());
            assert_eq!(sets[1].name, "Pack A");
        }

        it "treats an empty file as a new store" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            fs::write(&path, b"").unwrap();

            let db = open(&seed_dir(&root, &[]), &path);
            assert!(db.seed_report().is_some());
            assert!(db.get_challenge_set_id(SELF_ADDED_SET).unwrap().is_some());
            db.close().unwrap();
        }

        it "survives a missing seed directory" {
            let root = TempDir::new().unwrap();
            let db = open(&root.path().join("nowhere"), &db_path(&root));

            assert_eq!(db.list_challenge_sets().unwrap().len(), 1);
            assert!(db.list_challenges().unwrap().is_empty());
        }

        it "does not reseed an existing store" {
            let root = TempDir::new().unwrap();
            let seeds = seed_dir(&root, &[("a.json", PACK_A)]);
            let path = db_path(&root);

            open(&seeds, &path).close().unwrap();
            let db = open(&seeds, &path);

            assert!(db.seed_report().is_none());
            assert_eq!(db.list_challenges().unwrap().len(), 1);
            assert_eq!(db.list_challenge_sets().unwrap().len(), 2);
        }
    }

    describe "seeding" {
        it "loads a pack with its language constraints" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[("pack-a.json", PACK_A)]), &db_path(&root));

            let challenges = db.list_challenges().unwrap();
            assert_eq!(challenges.len(), 1);
            assert_eq!(challenges[0].description, "Reverse a string");
            assert_eq!(challenges[0].language_constraints, vec!["python", "go"]);
            assert_eq!(
                Some(challenges[0].set_id),
                db.get_challenge_set_id("Pack A").unwrap()
            );

            let unstarted: Vec<_> = challenges.iter().filter(|c| !c.is_started()).collect();
            assert_eq!(unstarted.len(), 1);
            assert_eq!(unstarted[0].description, "Reverse a string");
        }

        it "synthesizes placeholder challenges from a count" {
            let root = TempDir::new().unwrap();
            let db = open(
                &seed_dir(&root, &[("euler.json", r#"{"name":"Euler","num-challenges":3}"#)]),
                &db_path(&root),
            );

            let descriptions: Vec<_> = db
                .list_challenges()
                .unwrap()
                .into_iter()
                .map(|c| c.description)
                .collect();
            assert_eq!(
                descriptions,
                vec!["Euler challenge 0", "Euler challenge 1", "Euler challenge 2"]
            );
        }

        it "skips duplicate descriptions and keeps the rest" {
            let root = TempDir::new().unwrap();
            let pack_b = r#"{"name":"Pack B","challenges":[
                {"description":"Reverse a string","notes":"again"},
                {"description":"Write a linked list","notes":""}
            ]}"#;
            let db = open(
                &seed_dir(&root, &[("a.json", PACK_A), ("b.json", pack_b)]),
                &db_path(&root),
            );

            let challenges = db.list_challenges().unwrap();
            assert_eq!(challenges.len(), 2);
            assert_eq!(challenges[0].notes, "");
            assert_eq!(challenges[1].description, "Write a linked list");

            let report = db.seed_report().unwrap();
            assert_eq!(report.challenges, 2);
            assert_eq!(report.skipped, 1);
        }

        it "skips a file whose set name is already taken" {
            let root = TempDir::new().unwrap();
            let clash = r#"{"name":"Pack A","challenges":[{"description":"Other","notes":""}]}"#;
            let extra = r#"{"name":"Pack C","challenges":[{"description":"Tic tac toe","notes":""}]}"#;
            let db = open(
                &seed_dir(&root, &[("a.json", PACK_A), ("b.json", clash), ("c.json", extra)]),
                &db_path(&root),
            );

            let names: Vec<_> = db
                .list_challenge_sets()
                .unwrap()
                .into_iter()
                .map(|s| s.name)
                .collect();
            assert_eq!(names, vec![SELF_ADDED_SET, "Pack A", "Pack C"]);
            assert!(db.get_challenge_id("Other").unwrap().is_none());
            assert!(db.get_challenge_id("Tic tac toe").unwrap().is_some());
        }

        it "skips malformed files" {
            let root = TempDir::new().unwrap();
            let db = open(
                &seed_dir(&root, &[("a.json", PACK_A), ("broken.json", "{ not json")]),
                &db_path(&root),
            );

            assert_eq!(db.list_challenge_sets().unwrap().len(), 2);
            assert_eq!(db.seed_report().unwrap().skipped, 1);
        }
    }

    describe "opening an existing store" {
        it "rejects garbage bytes" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            fs::write(&path, b"\x42\x11\x95\x23\xff\x08\xdd").unwrap();

            let result = Database::open_at(seed_dir(&root, &[]), &path);
            assert!(matches!(result, Err(StoreError::CorruptDatabase { .. })));
        }

        it "recovers once a corrupt file is truncated" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            fs::write(&path, b"\x42\x11\x95\x23\xff\x08\xdd").unwrap();
            assert!(Database::open_at(seed_dir(&root, &[]), &path).is_err());

            fs::write(&path, b"").unwrap();
            let db = open(&seed_dir(&root, &[]), &path);
            db.close().unwrap();
        }

        it "rejects a database with a different schema" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            {
                let conn = rusqlite::Connection::open(&path).unwrap();
                conn.execute_batch(
                    "CREATE TABLE challenge_sets (id INTEGER PRIMARY KEY, name TEXT);
                     CREATE TABLE languages (id INTEGER PRIMARY KEY, name TEXT);",
                )
                .unwrap();
            }

            let result = Database::open_at(seed_dir(&root, &[]), &path);
            assert!(matches!(result, Err(StoreError::CorruptDatabase { .. })));

            // The file must not have been repaired.
            let conn = rusqlite::Connection::open(&path).unwrap();
            assert_eq!(
                schema::table_names(&conn).unwrap(),
                vec!["challenge_sets", "languages"]
            );
        }

        it "rejects a table with renamed columns" {
            let root = TempDir::new().unwrap();
            let path = db_path(&root);
            {
                let conn = rusqlite::Connection::open(&path).unwrap();
                conn.execute_batch(
                    "CREATE TABLE challenge_sets (id INTEGER PRIMARY KEY, name TEXT);
                     CREATE TABLE languages (id INTEGER PRIMARY KEY, label TEXT);
                     CREATE TABLE challenges (id INTEGER PRIMARY KEY, set_id INTEGER,
                         description TEXT, notes TEXT, language_constraints TEXT,
                         date_started TEXT, date_finished TEXT, language_used TEXT);",
                )
                .unwrap();
            }

            let result = Database::open_at(seed_dir(&root, &[]), &path);
            assert!(matches!(result, Err(StoreError::CorruptDatabase { .. })));
        }

        it "reports an unopenable path as a storage error" {
            let root = TempDir::new().unwrap();
            let result = Database::open_at(seed_dir(&root, &[]), root.path());
            match result {
                Err(err) => assert!(err.is_fatal()),
                Ok(_) => panic!("opening a directory as a store should fail"),
            }
        }
    }

    describe "languages" {
        it "rejects a duplicate name and keeps one row" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));

            let id = db.add_language("rust").unwrap();
            assert_eq!(db.get_language_id("rust").unwrap(), Some(id));

            let err = db.add_language("rust").unwrap_err();
            assert!(matches!(
                err,
                StoreError::AlreadyExists { kind: EntityKind::Language, .. }
            ));

            let languages = db.list_languages().unwrap();
            assert_eq!(languages.len(), 1);
            assert_eq!(languages[0].name, "rust");
        }

        it "lists languages in insertion order" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));

            for name in ["zig", "ada", "python"] {
                db.add_language(name).unwrap();
            }

            let names: Vec<_> = db
                .list_languages()
                .unwrap()
                .into_iter()
                .map(|l| l.name)
                .collect();
            assert_eq!(names, vec!["zig", "ada", "python"]);
        }

        it "rejects blank names" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));

            assert!(matches!(
                db.add_language("   "),
                Err(StoreError::InvalidInput { .. })
            ));
            assert!(db.list_languages().unwrap().is_empty());
        }

        it "persists across close and reopen" {
            let root = TempDir::new().unwrap();
            let seeds = seed_dir(&root, &[]);
            let path = db_path(&root);

            let db = open(&seeds, &path);
            db.add_language("go").unwrap();
            db.close().unwrap();

            let db = open(&seeds, &path);
            assert!(db.get_language_id("go").unwrap().is_some());
        }
    }

    describe "challenges" {
        it "rejects a duplicate description without adding a row" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));

            let id = db.add_challenge(self_added_input(&db, "Write a Lisp")).unwrap();
            assert_eq!(db.get_challenge_id("Write a Lisp").unwrap(), Some(id));

            let err = db.add_challenge(self_added_input(&db, "Write a Lisp")).unwrap_err();
            assert!(matches!(
                err,
                StoreError::AlreadyExists { kind: EntityKind::Challenge, .. }
            ));
            assert_eq!(db.list_challenges().unwrap().len(), 1);
        }

        it "deletes a challenge and ignores unknown ids" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));
            let id = db.add_challenge(self_added_input(&db, "Sudoku solver")).unwrap();

            assert!(db.delete_challenge(id).unwrap());
            assert!(!db.delete_challenge(id).unwrap());
            assert!(db.get_challenge(id).unwrap().is_none());
        }

        it "keeps accept values when finishing" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));
            let id = db.add_challenge(self_added_input(&db, "Chess engine")).unwrap();

            db.accept_challenge(id, "rust").unwrap();
            let accepted = db.get_challenge(id).unwrap().unwrap();
            assert!(accepted.date_started.is_some());
            assert!(accepted.date_finished.is_none());

            db.finish_challenge(id).unwrap();
            let finished = db.get_challenge(id).unwrap().unwrap();
            assert_eq!(finished.date_started, accepted.date_started);
            assert_eq!(finished.language_used.as_deref(), Some("rust"));
            assert!(finished.date_finished.is_some());
        }

        it "finishes a challenge that was never accepted" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));
            let id = db.add_challenge(self_added_input(&db, "Text adventure")).unwrap();

            db.finish_challenge(id).unwrap();
            let challenge = db.get_challenge(id).unwrap().unwrap();
            assert!(challenge.date_started.is_none());
            assert!(challenge.date_finished.is_some());
        }

        it "refuses to finish twice" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));
            let id = db.add_challenge(self_added_input(&db, "Snake")).unwrap();

            db.finish_challenge(id).unwrap();
            assert!(matches!(
                db.finish_challenge(id),
                Err(StoreError::InvalidState { state: "finished", .. })
            ));
        }

        it "reports unknown ids on accept and finish" {
            let root = TempDir::new().unwrap();
            let db = open(&seed_dir(&root, &[]), &db_path(&root));

            assert!(matches!(
                db.accept_challenge(42, "rust"),
                Err(StoreError::NotFound(42))
            ));
            assert!(matches!(db.finish_challenge(42), Err(StoreError::NotFound(42))));
        }
    }
}
