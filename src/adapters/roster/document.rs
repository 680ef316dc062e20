//! Roster document model
//!
//! ```toml
//! [[students]]
//! key = "1RV23CS001"
//! group = "10A"
//! embeddings = [[0.12, ...], ...]
//!
//! [[classrooms]]
//! room = "R1"
//! address = "192.168.1.10"
//!
//! [[schedules]]
//! group = "10A"
//! subject = "Math"
//! start = "08:00"
//! end = "08:50"
//! room = "R1"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::error::StoreError;
use crate::core::models::{ClassroomBinding, Identity, LedgerEntry, SessionSchedule};

/// A whole roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterDocument {
    /// Registered students
    #[serde(default)]
    pub students: Vec<StudentRecord>,
    /// Room to router address bindings
    #[serde(default)]
    pub classrooms: Vec<ClassroomBinding>,
    /// Weekly class slots
    #[serde(default)]
    pub schedules: Vec<SessionSchedule>,
    /// Attendance counters
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
}

/// A student together with their reference embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student key
    pub key: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Class/section label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// When the embeddings were last registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<NaiveDateTime>,
    /// Averaged fallback reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_embedding: Option<Vec<f32>>,
    /// Reference embeddings in capture order
    #[serde(default)]
    pub embeddings: Vec<Vec<f32>>,
}

impl StudentRecord {
    /// A student with a group and no embeddings
    #[must_use]
    pub fn new(key: impl Into<String>, group: Option<&str>) -> Self {
        Self {
            key: key.into(),
            name: None,
            group: group.map(String::from),
            registered_at: None,
            fallback_embedding: None,
            embeddings: Vec::new(),
        }
    }

    /// The identity view of this record
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            key: self.key.clone(),
            name: self.name.clone(),
            group: self.group.clone(),
            fallback_embedding: self.fallback_embedding.clone(),
            registered_at: self.registered_at,
        }
    }
}

impl RosterDocument {
    /// Parse a roster from TOML text
    ///
    /// Student keys and classroom rooms must be unique.
    pub fn parse(content: &str) -> Result<Self, StoreError> {
        let doc: Self = toml::from_str(content).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        if let Some(key) = first_duplicate(doc.students.iter().map(|s| s.key.as_str())) {
            return Err(StoreError::Corrupt(format!("duplicate student key {key}")));
        }
        if let Some(room) = first_duplicate(doc.classrooms.iter().map(|c| c.room.as_str())) {
            return Err(StoreError::Corrupt(format!("duplicate classroom {room}")));
        }
        Ok(doc)
    }

    /// Render the roster as TOML text
    pub fn to_toml(&self) -> Result<String, StoreError> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    /// Load a roster file; a missing file is an empty roster
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Write the roster atomically (temp file, then rename)
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = self.to_toml()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Student record by key
    #[must_use]
    pub fn student(&self, key: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.key == key)
    }

    /// Classroom binding by room label
    #[must_use]
    pub fn binding(&self, room: &str) -> Option<&ClassroomBinding> {
        self.classrooms.iter().find(|c| c.room == room)
    }

    /// Ledger entry by (student, subject)
    #[must_use]
    pub fn entry(&self, identity: &str, subject: &str) -> Option<&LedgerEntry> {
        self.ledger.iter().find(|e| e.identity == identity && e.subject == subject)
    }

    /// Insert or overwrite a ledger entry
    pub fn put_entry(&mut self, entry: LedgerEntry) {
        match self
            .ledger
            .iter_mut()
            .find(|e| e.identity == entry.identity && e.subject == entry.subject)
        {
            Some(existing) => *existing = entry,
            None => self.ledger.push(entry),
        }
    }
}

fn first_duplicate<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    values.find(|value| !seen.insert(*value))
}
