use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (guests, documents)");
        conn.execute_batch(
            "
            CREATE TABLE guests (
                id                      TEXT PRIMARY KEY,
                email                   TEXT NOT NULL,
                full_name               TEXT NOT NULL,
                guest_type              TEXT NOT NULL DEFAULT 'PRIMARY',
                attendance_status       TEXT NOT NULL DEFAULT 'PENDING',
                food_choice             TEXT,
                dietary_restrictions    TEXT,
                song_requests           TEXT,
                is_bridal_party         INTEGER NOT NULL DEFAULT 0,
                is_of_drinking_age      INTEGER NOT NULL DEFAULT 0,
                is_admin                INTEGER NOT NULL DEFAULT 0,
                bridal_party_role       TEXT,
                image                   TEXT,
                description             TEXT,
                address                 TEXT,
                created_at              TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at              TEXT
            );

            CREATE INDEX idx_guests_email ON guests(email);
            CREATE INDEX idx_guests_full_name ON guests(full_name);

            CREATE TABLE documents (
                id          TEXT PRIMARY KEY,
                collection  TEXT NOT NULL,
                index_key   TEXT NOT NULL,
                body        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT
            );

            CREATE INDEX idx_documents_collection ON documents(collection, index_key);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
