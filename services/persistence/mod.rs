/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor persistence using redb (storage) + rkyv (node serialization).
//!
//! One table, two keys:
//! - `nodes`: rkyv-encoded `EditorSnapshot`
//! - `view`: JSON-encoded `ViewTransform`
//!
//! Last writer wins. Restored nodes go through `NodeStore::sanitized`.

pub mod types;

use log::{info, warn};
use redb::ReadableDatabase;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use types::{EditorSnapshot, PersistedNode};

use crate::model::graph::NodeStore;
use crate::model::view::ViewTransform;

const EDITOR_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("bookmark_graph");
const NODES_KEY: &str = "nodes";
const VIEW_KEY: &str = "view";
const DATABASE_FILE: &str = "editor.redb";

/// Persistent editor store backed by a single redb database.
pub struct EditorStore {
    db: redb::Database,
    path: PathBuf,
}

impl EditorStore {
    /// Open or create an editor store in the given directory.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, EditorStoreError> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)
            .map_err(|e| EditorStoreError::Io(format!("Failed to create dir: {e}")))?;
        let path = base_dir.join(DATABASE_FILE);
        let db = redb::Database::create(&path).map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the persisted node list.
    pub fn save_nodes(&mut self, store: &NodeStore) -> Result<(), EditorStoreError> {
        let snapshot = EditorSnapshot {
            nodes: store.iter().map(PersistedNode::from_node).collect(),
            timestamp_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&snapshot)
            .map_err(|e| EditorStoreError::Encode(format!("{e}")))?;
        self.put(NODES_KEY, bytes.as_ref())?;
        info!("Saved {} nodes to {}", snapshot.nodes.len(), self.path.display());
        Ok(())
    }

    /// Read the persisted node list. `Ok(None)` when nothing was saved yet.
    pub fn load_nodes(&self) -> Result<Option<NodeStore>, EditorStoreError> {
        let Some(bytes) = self.get(NODES_KEY)? else {
            return Ok(None);
        };

        // Copy to aligned buffer: redb bytes may not satisfy rkyv alignment.
        let mut aligned = rkyv::util::AlignedVec::<16>::new();
        aligned.extend_from_slice(&bytes);
        let snapshot = rkyv::from_bytes::<EditorSnapshot, rkyv::rancor::Error>(&aligned)
            .map_err(|e| EditorStoreError::Decode(format!("{e}")))?;

        let total = snapshot.nodes.len();
        let nodes: Vec<_> = snapshot.nodes.iter().filter_map(PersistedNode::to_node).collect();
        if nodes.len() != total {
            warn!("Skipped {} persisted nodes with unreadable ids", total - nodes.len());
        }
        Ok(Some(NodeStore::sanitized(nodes)))
    }

    pub fn save_view(&mut self, transform: &ViewTransform) -> Result<(), EditorStoreError> {
        let json = serde_json::to_vec(transform).map_err(|e| EditorStoreError::Encode(format!("{e}")))?;
        self.put(VIEW_KEY, &json)
    }

    pub fn load_view(&self) -> Result<Option<ViewTransform>, EditorStoreError> {
        let Some(bytes) = self.get(VIEW_KEY)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| EditorStoreError::Decode(format!("{e}")))
    }

    /// Delete both persisted keys.
    pub fn clear_all(&mut self) -> Result<(), EditorStoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(EDITOR_TABLE)
                .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
            table
                .remove(NODES_KEY)
                .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
            table
                .remove(VIEW_KEY)
                .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        info!("Cleared persisted editor state at {}", self.path.display());
        Ok(())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), EditorStoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(EDITOR_TABLE)
                .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
            table
                .insert(key, bytes)
                .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EditorStoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        let table = match read_txn.open_table(EDITOR_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(EditorStoreError::Redb(format!("{e}"))),
        };
        let entry = table
            .get(key)
            .map_err(|e| EditorStoreError::Redb(format!("{e}")))?;
        Ok(entry.map(|guard| guard.value().to_vec()))
    }

    /// Per-user data directory; `None` on platforms without a config dir.
    pub fn default_data_dir() -> Option<PathBuf> {
        let mut dir = dirs::config_dir()?;
        dir.push("bookmark-graph");
        dir.push("store");
        Some(dir)
    }
}

/// Errors from the editor store
#[derive(Debug)]
pub enum EditorStoreError {
    Io(String),
    Redb(String),
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for EditorStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorStoreError::Io(e) => write!(f, "IO error: {e}"),
            EditorStoreError::Redb(e) => write!(f, "Redb error: {e}"),
            EditorStoreError::Encode(e) => write!(f, "Encode error: {e}"),
            EditorStoreError::Decode(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for EditorStoreError {}
