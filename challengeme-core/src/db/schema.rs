use rusqlite::Connection;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS challenge_sets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS languages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS challenges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    set_id INTEGER NOT NULL REFERENCES challenge_sets(id),
    description TEXT NOT NULL UNIQUE,
    notes TEXT,
    language_constraints TEXT,
    date_started TEXT,
    date_finished TEXT,
    language_used TEXT
);

CREATE INDEX IF NOT EXISTS idx_challenges_set ON challenges(set_id);
"#;

/// Every table the store owns, with its columns in declaration order.
pub const EXPECTED_TABLES: &[(&str, &[&str])] = &[
    ("challenge_sets", &["id", "name"]),
    (
        "challenges",
        &[
            "id",
            "set_id",
            "description",
            "notes",
            "language_constraints",
            "date_started",
            "date_finished",
            "language_used",
        ],
    ),
    ("languages", &["id", "name"]),
];

/// User tables in the database, sorted by name. SQLite bookkeeping tables
/// such as `sqlite_sequence` are excluded.
pub fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

/// Column names of `table` in declaration order.
///
/// `table` is interpolated into the statement, so only pass names taken from
/// [`table_names`] or [`EXPECTED_TABLES`].
pub fn column_names(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let stmt = conn.prepare(&format!("SELECT * FROM \"{}\" LIMIT 0", table))?;
    Ok(stmt.column_names().into_iter().map(String::from).collect())
}

/// Checks that the database holds exactly the expected tables and columns.
pub fn matches_expected(conn: &Connection) -> rusqlite::Result<bool> {
    let tables = table_names(conn)?;
    let expected: Vec<&str> = EXPECTED_TABLES.iter().map(|(name, _)| *name).collect();
    if tables != expected {
        return Ok(false);
    }

    for (table, columns) in EXPECTED_TABLES {
        if column_names(conn, table)? != *columns {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_schema_matches_expected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(matches_expected(&conn).unwrap());
    }

    #[test]
    fn empty_database_does_not_match() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!matches_expected(&conn).unwrap());
    }

    #[test]
    fn extra_table_does_not_match() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch("CREATE TABLE extras (id INTEGER PRIMARY KEY);").unwrap();
        assert!(!matches_expected(&conn).unwrap());
    }

    #[test]
    fn reordered_columns_do_not_match() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE challenge_sets (name TEXT, id INTEGER PRIMARY KEY);
             CREATE TABLE languages (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE challenges (id INTEGER PRIMARY KEY, set_id INTEGER,
                 description TEXT, notes TEXT, language_constraints TEXT,
                 date_started TEXT, date_finished TEXT, language_used TEXT);",
        )
        .unwrap();
        assert!(!matches_expected(&conn).unwrap());
    }

    #[test]
    fn autoincrement_bookkeeping_is_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute("INSERT INTO languages (name) VALUES ('rust')", [])
            .unwrap();

        let tables = table_names(&conn).unwrap();
        assert_eq!(tables, vec!["challenge_sets", "challenges", "languages"]);
    }
}
