//! Durable backend: one SQLite database file per workspace.
//!
//! Writes go through a single connection behind a mutex, so each workspace
//! has one writer at a time. Reads borrow a read-only connection from a small
//! pool; with the WAL journal they neither wait on each other nor on the
//! writer, and always see every committed edge.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, ToSql};
use tracing::{debug, trace};

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_util::errors::{GraphError, GraphResult};

use crate::store::{validate_workspace_key, GraphDriver, RelationshipGraphStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS relationships (
    declaring TEXT NOT NULL,
    rel_type  TEXT NOT NULL,
    idx       INTEGER NOT NULL,
    target    TEXT NOT NULL,
    payload   TEXT NOT NULL,
    PRIMARY KEY (declaring, rel_type, idx, target)
);
CREATE INDEX IF NOT EXISTS relationships_by_target ON relationships (target);
";

const INSERT_SQL: &str = "INSERT OR IGNORE INTO relationships \
     (declaring, rel_type, idx, target, payload) VALUES (?1, ?2, ?3, ?4, ?5)";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle read connections kept per workspace.
const MAX_IDLE_READERS: usize = 4;

/// A workspace persisted in a SQLite file.
pub struct SqliteStore {
    path: PathBuf,
    writer: Mutex<Connection>,
    readers: Mutex<Vec<Connection>>,
}

impl SqliteStore {
    /// Open or create the workspace database at `path`.
    pub fn open(path: &Path) -> GraphResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(sql_error)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(sql_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(sql_error)?;
        conn.execute_batch(SCHEMA).map_err(sql_error)?;
        debug!("opened workspace database {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(conn),
            readers: Mutex::new(Vec::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self) -> GraphResult<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| GraphError::connection("workspace writer lock poisoned"))
    }

    fn open_reader(&self) -> GraphResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(sql_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(sql_error)?;
        Ok(conn)
    }

    /// Run `f` on a pooled read-only connection.
    fn with_reader<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> GraphResult<T> {
        let pooled = self
            .readers
            .lock()
            .map_err(|_| GraphError::connection("workspace reader pool poisoned"))?
            .pop();
        let conn = match pooled {
            Some(conn) => conn,
            None => self.open_reader()?,
        };

        let result = f(&conn).map_err(sql_error);

        if let Ok(mut pool) = self.readers.lock() {
            if pool.len() < MAX_IDLE_READERS {
                pool.push(conn);
            }
        }
        result
    }

    fn query_payloads(
        &self,
        sql: &str,
        args: &[&dyn ToSql],
    ) -> GraphResult<BTreeSet<Relationship>> {
        let payloads = self.with_reader(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<Vec<String>>>()
        })?;
        trace!("{} rows for `{sql}`", payloads.len());
        payloads.iter().map(|p| decode(p)).collect()
    }

    fn exists(&self, sql: &str, args: &[&dyn ToSql]) -> GraphResult<bool> {
        self.with_reader(|conn| conn.query_row(sql, args, |row| row.get::<_, bool>(0)))
    }
}

fn insert(conn: &Connection, rel: &Relationship) -> GraphResult<bool> {
    let payload = serde_json::to_string(rel).map_err(|e| {
        GraphError::connection(format!("failed to encode relationship {rel}: {e}"))
    })?;
    let changed = conn
        .prepare_cached(INSERT_SQL)
        .and_then(|mut stmt| {
            stmt.execute(params![
                rel.declaring().key(),
                rel.rel_type().name(),
                rel.index(),
                rel.target().key(),
                payload,
            ])
        })
        .map_err(sql_error)?;
    Ok(changed == 1)
}

fn decode(payload: &str) -> GraphResult<Relationship> {
    serde_json::from_str(payload)
        .map_err(|e| GraphError::connection(format!("corrupted relationship row: {e}")))
}

fn sql_error(e: rusqlite::Error) -> GraphError {
    GraphError::connection(format!("SQLite: {e}"))
}

impl RelationshipGraphStore for SqliteStore {
    fn add_relationship(&self, rel: Relationship) -> GraphResult<bool> {
        rel.validate()?;
        let conn = self.writer()?;
        let added = insert(&conn, &rel)?;
        if added {
            debug!("storing {rel}");
        }
        Ok(added)
    }

    fn add_relationships(&self, rels: Vec<Relationship>) -> GraphResult<usize> {
        for rel in &rels {
            rel.validate()?;
        }
        let mut conn = self.writer()?;
        let tx = conn.transaction().map_err(sql_error)?;
        let mut added = 0;
        for rel in &rels {
            if insert(&tx, rel)? {
                added += 1;
            }
        }
        tx.commit().map_err(sql_error)?;
        debug!("stored {added} of {} relationships", rels.len());
        Ok(added)
    }

    fn relationships_declared_by(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>> {
        self.query_payloads(
            "SELECT payload FROM relationships WHERE declaring = ?1",
            &[&project.key()],
        )
    }

    fn relationships_targeting(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>> {
        self.query_payloads(
            "SELECT payload FROM relationships WHERE target = ?1",
            &[&project.key()],
        )
    }

    fn all_relationships(&self) -> GraphResult<BTreeSet<Relationship>> {
        self.query_payloads("SELECT payload FROM relationships", &[])
    }

    fn contains_project(&self, project: &ProjectVersionRef) -> GraphResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM relationships WHERE declaring = ?1 OR target = ?1)",
            &[&project.key()],
        )
    }

    fn contains_relationship(&self, rel: &Relationship) -> GraphResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM relationships \
             WHERE declaring = ?1 AND rel_type = ?2 AND idx = ?3 AND target = ?4)",
            &[
                &rel.declaring().key(),
                &rel.rel_type().name(),
                &rel.index(),
                &rel.target().key(),
            ],
        )
    }

    fn all_project_versions(&self) -> GraphResult<BTreeSet<ProjectVersionRef>> {
        let mut projects = BTreeSet::new();
        for rel in self.all_relationships()? {
            projects.insert(rel.target().clone());
            projects.insert(rel.declaring().clone());
        }
        Ok(projects)
    }
}

/// Stores each workspace as `<dir>/<key>.db`.
pub struct SqliteDriver {
    dir: PathBuf,
    open: Mutex<HashMap<String, Arc<SqliteStore>>>,
}

impl SqliteDriver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn workspace_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.db"))
    }

    fn open_handles(&self) -> GraphResult<MutexGuard<'_, HashMap<String, Arc<SqliteStore>>>> {
        self.open
            .lock()
            .map_err(|_| GraphError::connection("workspace registry lock poisoned"))
    }
}

impl GraphDriver for SqliteDriver {
    fn open_workspace(&self, key: &str) -> GraphResult<Arc<dyn RelationshipGraphStore>> {
        validate_workspace_key(key)?;
        let mut open = self.open_handles()?;
        if let Some(store) = open.get(key) {
            return Ok(store.clone());
        }
        let store = Arc::new(SqliteStore::open(&self.workspace_path(key))?);
        open.insert(key.to_string(), store.clone());
        Ok(store)
    }

    fn workspace_keys(&self) -> GraphResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "db") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete_workspace(&self, key: &str) -> GraphResult<bool> {
        validate_workspace_key(key)?;
        self.open_handles()?.remove(key);
        let db = self.workspace_path(key);
        if !db.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&db)?;
        for suffix in ["-wal", "-shm"] {
            let side = self.dir.join(format!("{key}.db{suffix}"));
            if side.is_file() {
                std::fs::remove_file(side)?;
            }
        }
        debug!("deleted workspace '{key}'");
        Ok(true)
    }
}
