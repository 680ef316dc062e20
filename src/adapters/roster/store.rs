//! Roster store implementing the store ports
//!
//! An in-memory store keeps the document behind a `Mutex`. A file-backed
//! store keeps nothing between calls: reads load the file, and every
//! mutation takes an exclusive lock on a sidecar `<roster>.lock` file,
//! re-reads the document, applies the change and persists it (temp file,
//! then rename) before the lock is released. Separate processes sharing one
//! roster therefore see each other's writes, and
//! [`LedgerStore::update_entry`] is atomic across all of them.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use log::{debug, warn};

use super::document::{RosterDocument, StudentRecord};
use crate::core::error::StoreError;
use crate::core::models::{
    ClassroomBinding, Identity, LedgerEntry, RegistrationKind, SessionSchedule,
};
use crate::core::ports::{
    ClassroomStore, IdentityStore, LedgerStore, LedgerUpdate, ScheduleStore,
};

/// How long a writer waits for the roster lock before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Roster-backed store for identities, schedules, classrooms and the ledger
#[derive(Debug)]
pub struct RosterStore {
    doc: Mutex<RosterDocument>,
    path: Option<PathBuf>,
    lock_timeout: Duration,
}

/// Exclusive hold on a roster's lock file, released on drop
#[derive(Debug)]
struct RosterLock {
    file: File,
}

impl RosterLock {
    fn acquire(path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        let start = Instant::now();
        let mut delay = Duration::from_millis(5);
        loop {
            match file.try_lock() {
                Ok(()) => return Ok(Self { file }),
                Err(TryLockError::WouldBlock) => {
                    if start.elapsed() >= timeout {
                        warn!("gave up on roster lock {} after {:?}", path.display(), start.elapsed());
                        return Err(StoreError::Conflict(format!(
                            "roster lock {} held by another writer",
                            path.display()
                        )));
                    }
                    thread::sleep(delay);
                    delay = (delay * 2).min(MAX_RETRY_DELAY);
                },
                Err(TryLockError::Error(e)) => return Err(e.into()),
            }
        }
    }
}

impl Drop for RosterLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Sidecar lock file for a roster path
#[must_use]
pub fn lock_path(roster: &Path) -> PathBuf {
    let mut name = roster.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

impl RosterStore {
    /// A store that never touches disk
    #[must_use]
    pub const fn in_memory(doc: RosterDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
            path: None,
            lock_timeout: LOCK_TIMEOUT,
        }
    }

    /// Open a file-backed store; a missing file starts an empty roster
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = RosterDocument::load(&path)?;
        debug!(
            "opened roster {} ({} students, {} schedules)",
            path.display(),
            doc.students.len(),
            doc.schedules.len()
        );
        Ok(Self {
            doc: Mutex::new(RosterDocument::default()),
            path: Some(path),
            lock_timeout: LOCK_TIMEOUT,
        })
    }

    /// Override how long writers wait for the file lock
    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A copy of the current document
    pub fn snapshot(&self) -> Result<RosterDocument, StoreError> {
        self.read(RosterDocument::clone)
    }

    /// Delete a student and every ledger entry that refers to them
    ///
    /// Returns `false` when the key was not present.
    pub fn remove_identity(&self, key: &str) -> Result<bool, StoreError> {
        self.mutate(|doc| {
            let before = doc.students.len();
            doc.students.retain(|s| s.key != key);
            if doc.students.len() == before {
                return None;
            }
            doc.ledger.retain(|e| e.identity != key);
            Some(true)
        })
        .map(|removed| removed.unwrap_or(false))
    }

    fn lock(&self) -> Result<MutexGuard<'_, RosterDocument>, StoreError> {
        self.doc
            .lock()
            .map_err(|_| StoreError::Unavailable("roster lock poisoned".to_string()))
    }

    /// Run `view` against the current document (the file, when file-backed)
    fn read<T>(&self, view: impl FnOnce(&RosterDocument) -> T) -> Result<T, StoreError> {
        match &self.path {
            Some(path) => Ok(view(&RosterDocument::load(path)?)),
            None => Ok(view(&*self.lock()?)),
        }
    }

    /// Apply `change` to a fresh copy of the document and commit it when it
    /// returns `Some`
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut RosterDocument) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let Some(path) = &self.path else {
            let mut guard = self.lock()?;
            let mut next = guard.clone();
            let result = change(&mut next);
            if result.is_some() {
                *guard = next;
            }
            return Ok(result);
        };

        // Threads of this process queue on the mutex; other processes on the file lock.
        let _in_process = self.lock()?;
        let _file_lock = RosterLock::acquire(&lock_path(path), self.lock_timeout)?;
        let mut next = RosterDocument::load(path)?;
        let Some(result) = change(&mut next) else {
            return Ok(None);
        };
        next.save(path)?;
        Ok(Some(result))
    }
}

impl IdentityStore for RosterStore {
    fn get_by_key(&self, key: &str) -> Result<Option<Identity>, StoreError> {
        self.read(|doc| doc.student(key).map(StudentRecord::identity))
    }

    fn get_reference_embeddings(&self, key: &str) -> Result<Vec<Vec<f32>>, StoreError> {
        self.read(|doc| doc.student(key).map(|s| s.embeddings.clone()).unwrap_or_default())
    }

    fn replace_embeddings(
        &self,
        key: &str,
        embeddings: &[Vec<f32>],
        fallback: &[f32],
        at: NaiveDateTime,
    ) -> Result<RegistrationKind, StoreError> {
        let kind = self.mutate(|doc| {
            let (kind, index) = match doc.students.iter().position(|s| s.key == key) {
                Some(index) => (RegistrationKind::Updated, index),
                None => {
                    doc.students.push(StudentRecord::new(key, None));
                    (RegistrationKind::Registered, doc.students.len() - 1)
                },
            };
            let student = &mut doc.students[index];
            student.embeddings = embeddings.to_vec();
            student.fallback_embedding = Some(fallback.to_vec());
            student.registered_at = Some(at);
            Some(kind)
        })?;
        kind.ok_or_else(|| StoreError::Unavailable(format!("registration of {key} did not run")))
    }
}

impl ScheduleStore for RosterStore {
    fn list_sessions_for_group(&self, group: &str) -> Result<Vec<SessionSchedule>, StoreError> {
        self.read(|doc| {
            doc.schedules
                .iter()
                .filter(|s| s.group == group)
                .cloned()
                .collect()
        })
    }
}

impl ClassroomStore for RosterStore {
    fn get_binding(&self, room: &str) -> Result<Option<ClassroomBinding>, StoreError> {
        self.read(|doc| doc.binding(room).cloned())
    }
}

impl LedgerStore for RosterStore {
    fn get_entry(&self, identity: &str, subject: &str) -> Result<Option<LedgerEntry>, StoreError> {
        self.read(|doc| doc.entry(identity, subject).cloned())
    }

    fn upsert_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.mutate(|doc| {
            doc.put_entry(entry.clone());
            Some(())
        })?;
        Ok(())
    }

    fn update_entry(
        &self,
        identity: &str,
        subject: &str,
        update: &mut LedgerUpdate<'_>,
    ) -> Result<(), StoreError> {
        self.mutate(|doc| {
            let next = update(doc.entry(identity, subject))?;
            doc.put_entry(next);
            Some(())
        })?;
        Ok(())
    }
}
