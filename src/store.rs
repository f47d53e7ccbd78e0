use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex as StdMutex,
};

use anyhow::Context;
use axum::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One JSON array file per table; each file owns exactly one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Alerts,
    Hotspots,
    Profiles,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Users, Table::Alerts, Table::Hotspots, Table::Profiles];

    pub fn file_name(self) -> &'static str {
        match self {
            Table::Users => "users.json",
            Table::Alerts => "alerts.json",
            Table::Hotspots => "hotspots.json",
            Table::Profiles => "profiles.json",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Edits a loaded table in place. Returning `false` discards the edit.
pub type Mutation<'a> = Box<dyn FnOnce(&mut Vec<Value>) -> bool + Send + 'a>;

/// Storage port for the flat-list tables.
///
/// `load` never fails: a missing or corrupt table reads as empty.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn load(&self, table: Table) -> Vec<Value>;

    async fn save(&self, table: Table, items: Vec<Value>) -> anyhow::Result<()>;

    /// Load, mutate and write back as one step with respect to other writers
    /// of the same table. Returns whether the mutation was committed.
    async fn update<'a>(&'a self, table: Table, mutate: Mutation<'a>) -> anyhow::Result<bool>;

    async fn append(&self, table: Table, item: Value) -> anyhow::Result<()> {
        self.update(
            table,
            Box::new(move |items: &mut Vec<Value>| {
                items.push(item);
                true
            }),
        )
        .await
        .map(|_| ())
    }
}

/// Tables stored as pretty-printed JSON arrays under a data directory.
pub struct JsonFileStore {
    dir: PathBuf,
    writers: [Mutex<()>; 4],
}

impl JsonFileStore {
    /// Opens `dir`, creating it and seeding every missing table file with `[]`.
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create data dir {}", dir.display()))?;

        for table in Table::ALL {
            let path = dir.join(table.file_name());
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tokio::fs::write(&path, b"[]")
                    .await
                    .with_context(|| format!("seed {}", path.display()))?;
                debug!(path = %path.display(), "created empty table");
            }
        }

        Ok(Self {
            dir,
            writers: Default::default(),
        })
    }

    fn path(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }
}

async fn read_table(path: &Path) -> Vec<Value> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "table unreadable, treating as empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(path = %path.display(), "table is not a JSON array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "table is corrupt, treating as empty");
            Vec::new()
        }
    }
}

async fn write_table(path: &Path, items: &[Value]) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(items).context("encode table")?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &body)
        .await
        .with_context(|| format!("write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), rows = items.len(), "table written");
    Ok(())
}

#[async_trait]
impl ListStore for JsonFileStore {
    async fn load(&self, table: Table) -> Vec<Value> {
        read_table(&self.path(table)).await
    }

    async fn save(&self, table: Table, items: Vec<Value>) -> anyhow::Result<()> {
        let _guard = self.writers[table.slot()].lock().await;
        write_table(&self.path(table), &items).await
    }

    async fn update<'a>(&'a self, table: Table, mutate: Mutation<'a>) -> anyhow::Result<bool> {
        let _guard = self.writers[table.slot()].lock().await;
        let path = self.path(table);
        let mut items = read_table(&path).await;
        if !mutate(&mut items) {
            return Ok(false);
        }
        write_table(&path, &items).await?;
        Ok(true)
    }
}

/// In-memory tables for tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: StdMutex<HashMap<Table, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<R>(&self, f: impl FnOnce(&mut HashMap<Table, Vec<Value>>) -> R) -> R {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut tables)
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn load(&self, table: Table) -> Vec<Value> {
        self.with_tables(|t| t.get(&table).cloned().unwrap_or_default())
    }

    async fn save(&self, table: Table, items: Vec<Value>) -> anyhow::Result<()> {
        self.with_tables(|t| {
            t.insert(table, items);
        });
        Ok(())
    }

    async fn update<'a>(&'a self, table: Table, mutate: Mutation<'a>) -> anyhow::Result<bool> {
        Ok(self.with_tables(|t| {
            let mut items = t.get(&table).cloned().unwrap_or_default();
            let committed = mutate(&mut items);
            if committed {
                t.insert(table, items);
            }
            committed
        }))
    }
}
