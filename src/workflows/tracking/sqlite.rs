use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::domain::{AppliedJob, JobId};
use super::repository::{JobRepository, RepositoryError};

const CREATE_JOBS_TABLE: &str = "CREATE TABLE IF NOT EXISTS Jobs (Title text, Job_id text, DateAdded text)";
/// Textual form older databases carry (`2024-03-01 17:02:11.482913+00:00`).
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// SQLite-backed record of applied jobs.
///
/// The `Jobs` table is created on first open; an existing file is used as-is.
pub struct SqliteJobStore {
    conn: Connection,
}

impl SqliteJobStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.bootstrap()?;
        info!(path = %path.display(), "opened job store");
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.bootstrap()?;
        Ok(store)
    }

    /// Deletes any existing database at `path` and opens an empty one in its place.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed previous job store"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        Self::open(path)
    }

    pub fn close(self) -> Result<(), RepositoryError> {
        self.conn.close().map_err(|(_, err)| err.into())
    }

    fn bootstrap(&self) -> Result<(), RepositoryError> {
        self.conn.execute(CREATE_JOBS_TABLE, [])?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }
}

/// Opens the store at `path`, hands it to `work`, and closes it afterwards whether or not
/// `work` succeeded. An error from `work` takes precedence over an error from closing.
pub fn with_store<T, E, F>(path: impl AsRef<Path>, work: F) -> Result<T, E>
where
    F: FnOnce(&SqliteJobStore) -> Result<T, E>,
    E: From<RepositoryError>,
{
    scoped(SqliteJobStore::open(path)?, work)
}

/// Like [`with_store`], but starts from an empty database (see [`SqliteJobStore::reset`]).
pub fn with_fresh_store<T, E, F>(path: impl AsRef<Path>, work: F) -> Result<T, E>
where
    F: FnOnce(&SqliteJobStore) -> Result<T, E>,
    E: From<RepositoryError>,
{
    scoped(SqliteJobStore::reset(path)?, work)
}

fn scoped<T, E, F>(store: SqliteJobStore, work: F) -> Result<T, E>
where
    F: FnOnce(&SqliteJobStore) -> Result<T, E>,
    E: From<RepositoryError>,
{
    let result = work(&store);
    let closed = store.close();
    let value = result?;
    closed?;
    Ok(value)
}

impl JobRepository for SqliteJobStore {
    fn exists(&self, id: &JobId) -> Result<bool, RepositoryError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM Jobs WHERE Job_id = ?1 LIMIT 1",
                params![id.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&self, title: &str, id: &JobId) -> Result<AppliedJob, RepositoryError> {
        if self.exists(id)? {
            return Err(RepositoryError::Conflict(id.clone()));
        }

        let applied_at = Utc::now();
        self.conn.execute(
            "INSERT INTO Jobs (Title, Job_id, DateAdded) VALUES (?1, ?2, ?3)",
            params![
                title,
                id.as_str(),
                applied_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ],
        )?;
        debug!(rowid = self.conn.last_insert_rowid(), job_id = %id, "recorded application");

        Ok(AppliedJob {
            title: title.to_string(),
            id: id.clone(),
            applied_at,
        })
    }

    fn find(&self, id: &JobId) -> Result<Option<AppliedJob>, RepositoryError> {
        let row = self
            .conn
            .query_row(
                "SELECT Title, Job_id, DateAdded FROM Jobs WHERE Job_id = ?1 ORDER BY rowid LIMIT 1",
                params![id.as_str()],
                Self::map_row,
            )
            .optional()?;

        row.map(|(title, id, added)| applied_job(title, id, &added))
            .transpose()
    }

    fn list(&self) -> Result<Vec<AppliedJob>, RepositoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT Title, Job_id, DateAdded FROM Jobs ORDER BY rowid")?;
        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(title, id, added)| applied_job(title, id, &added))
            .collect()
    }
}

fn applied_job(title: String, id: String, added: &str) -> Result<AppliedJob, RepositoryError> {
    let applied_at = parse_timestamp(added).ok_or_else(|| RepositoryError::CorruptRecord {
        id: id.clone(),
        detail: format!("unreadable DateAdded '{added}'"),
    })?;

    Ok(AppliedJob {
        title,
        id: JobId(id),
        applied_at,
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    DateTime::parse_from_str(trimmed, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn insert_then_find_round_trips() {
        let store = SqliteJobStore::in_memory().expect("in-memory store opens");
        let before = Utc::now();

        let inserted = store
            .insert("Frontend Engineer", &JobId::from("102"))
            .expect("insert succeeds");
        let found = store
            .find(&JobId::from("102"))
            .expect("lookup succeeds")
            .expect("record present");

        assert_eq!(found, inserted);
        assert_eq!(found.title, "Frontend Engineer");
        assert!(found.applied_at >= before);
        assert!(store.exists(&JobId::from("102")).expect("exists query"));
        assert!(!store.exists(&JobId::from("999")).expect("exists query"));
    }

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let store = SqliteJobStore::in_memory().expect("in-memory store opens");
        store
            .insert("Backend Developer", &JobId::from("abc"))
            .expect("first insert succeeds");

        match store.insert("Backend Developer", &JobId::from("abc")) {
            Err(RepositoryError::Conflict(id)) => assert_eq!(id.as_str(), "abc"),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(store.list().expect("list succeeds").len(), 1);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = SqliteJobStore::in_memory().expect("in-memory store opens");
        for id in ["c", "a", "b"] {
            store
                .insert(&format!("Job {id}"), &JobId::from(id))
                .expect("insert succeeds");
        }

        let ids: Vec<String> = store
            .list()
            .expect("list succeeds")
            .into_iter()
            .map(|job| job.id.0)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn reads_rows_written_in_legacy_format() {
        let store = SqliteJobStore::in_memory().expect("in-memory store opens");
        store
            .conn
            .execute(
                "INSERT INTO Jobs VALUES (?1, ?2, ?3)",
                params!["Full Stack Engineer", "legacy-1", "2023-02-14 09:30:05.250000+00:00"],
            )
            .expect("raw insert");

        let job = store
            .find(&JobId::from("legacy-1"))
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(job.applied_at.year(), 2023);
        assert_eq!(job.applied_at.hour(), 9);
        assert_eq!(job.applied_at.nanosecond(), 250_000_000);
    }

    #[test]
    fn unreadable_timestamp_is_reported_as_corrupt() {
        let store = SqliteJobStore::in_memory().expect("in-memory store opens");
        store
            .conn
            .execute(
                "INSERT INTO Jobs VALUES ('Frontend', 'bad-1', 'yesterday')",
                [],
            )
            .expect("raw insert");

        match store.list() {
            Err(RepositoryError::CorruptRecord { id, .. }) => assert_eq!(id, "bad-1"),
            other => panic!("expected corrupt record, got {other:?}"),
        }
    }

    #[test]
    fn parse_timestamp_accepts_offsets_without_fraction() {
        let parsed = parse_timestamp("2024-06-01 23:15:00+02:00").expect("legacy form parses");
        assert_eq!(parsed.hour(), 21);
        assert!(parse_timestamp("   ").is_none());
    }
}
