//! The two storage strategies behind the repository.
//!
//! A backend is chosen once per operation. It performs the I/O of that
//! operation and tells the repository how to reconcile the mirror; the
//! repository itself never branches on the mode.

use super::remote::{DeleteTarget, ShiftService};
use crate::db::kv::{KeyValueStore, LEGACY_SHIFTS_KEY, SHIFTS_KEY, read_json};
use crate::errors::{AppError, AppResult};
use crate::models::raw_shift::record_id;
use crate::models::shift::Shift;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Offline,
    Online,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Offline => write!(f, "offline"),
            SyncMode::Online => write!(f, "online"),
        }
    }
}

/// Records read by `load`, still unvalidated.
pub struct Loaded {
    pub records: Vec<Value>,
    /// Legacy cache key consumed by this load; it is removed once the mirror
    /// has been persisted.
    pub legacy_key: Option<&'static str>,
    /// Problems found while reading that did not stop the load.
    pub failures: Vec<String>,
}

/// How an updated shift goes back into the mirror.
pub enum Placement {
    /// Replace the record with this id; it must exist.
    Replace { id: String, shift: Shift },
    /// Replace the record carrying the shift's own id, or append it.
    Upsert(Shift),
}

pub trait SyncBackend {
    fn mode(&self) -> SyncMode;

    fn load(&mut self) -> AppResult<Loaded>;

    /// Returns the records to append to the mirror.
    fn create(&mut self, shifts: Vec<Shift>) -> AppResult<Vec<Shift>>;

    fn update(&mut self, id: &str, shift: Shift) -> AppResult<Placement>;

    fn delete(&mut self, target: &DeleteTarget) -> AppResult<()>;
}

// ---------------------------
// Offline: the cache is the source of truth
// ---------------------------

pub struct OfflineBackend<'a, S: KeyValueStore> {
    cache: &'a S,
}

impl<'a, S: KeyValueStore> OfflineBackend<'a, S> {
    pub fn new(cache: &'a S) -> Self {
        Self { cache }
    }
}

impl<S: KeyValueStore> SyncBackend for OfflineBackend<'_, S> {
    fn mode(&self) -> SyncMode {
        SyncMode::Offline
    }

    fn load(&mut self) -> AppResult<Loaded> {
        let mut records = list_under(self.cache, SHIFTS_KEY)?;
        let mut legacy_key = None;

        let mut failures = Vec::new();

        if self.cache.get(LEGACY_SHIFTS_KEY)?.is_some() {
            match list_under(self.cache, LEGACY_SHIFTS_KEY) {
                Ok(legacy) => {
                    let known: HashSet<String> = records.iter().filter_map(record_id).collect();
                    let before = records.len();

                    records.extend(
                        legacy
                            .into_iter()
                            .filter(|r| record_id(r).is_none_or(|id| !known.contains(&id))),
                    );

                    tracing::info!(
                        merged = records.len() - before,
                        "migrating legacy '{}' cache key",
                        LEGACY_SHIFTS_KEY
                    );
                }
                // unreadable legacy data is dropped, not fatal
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable legacy '{}' cache key", LEGACY_SHIFTS_KEY);
                    failures.push(format!("legacy '{}' data: {}", LEGACY_SHIFTS_KEY, e.detail()));
                }
            }
            legacy_key = Some(LEGACY_SHIFTS_KEY);
        }

        Ok(Loaded {
            records,
            legacy_key,
            failures,
        })
    }

    fn create(&mut self, shifts: Vec<Shift>) -> AppResult<Vec<Shift>> {
        Ok(shifts)
    }

    fn update(&mut self, id: &str, shift: Shift) -> AppResult<Placement> {
        Ok(Placement::Replace {
            id: id.to_string(),
            shift,
        })
    }

    fn delete(&mut self, _target: &DeleteTarget) -> AppResult<()> {
        Ok(())
    }
}

fn list_under<S: KeyValueStore>(cache: &S, key: &str) -> AppResult<Vec<Value>> {
    match read_json(cache, key)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(AppError::Storage(format!("key '{key}' does not hold a list"))),
    }
}

// ---------------------------
// Online: the remote service is the source of truth
// ---------------------------

pub struct OnlineBackend<'a> {
    service: &'a mut dyn ShiftService,
}

impl<'a> OnlineBackend<'a> {
    pub fn new(service: &'a mut dyn ShiftService) -> Self {
        Self { service }
    }
}

impl SyncBackend for OnlineBackend<'_> {
    fn mode(&self) -> SyncMode {
        SyncMode::Online
    }

    fn load(&mut self) -> AppResult<Loaded> {
        let records = self
            .service
            .fetch_shifts()
            .map_err(|e| AppError::Sync(format!("Failed to fetch shifts: {e}")))?;
        Ok(Loaded {
            records,
            legacy_key: None,
            failures: Vec::new(),
        })
    }

    fn create(&mut self, shifts: Vec<Shift>) -> AppResult<Vec<Shift>> {
        let fail = |msg: String| AppError::Sync(format!("Failed to create shifts: {msg}"));

        let responses = match shifts.as_slice() {
            [] => return Ok(Vec::new()),
            [single] => vec![self.service.create_shift(single).map_err(|e| fail(e.message))?],
            many => self
                .service
                .create_shift_batch(many)
                .map_err(|e| fail(e.message))?,
        };

        responses
            .iter()
            .map(|r| {
                Shift::parse(r).map_err(|e| fail(format!("server returned an invalid shift: {}", e.detail())))
            })
            .collect()
    }

    fn update(&mut self, id: &str, shift: Shift) -> AppResult<Placement> {
        let fail = |msg: String| AppError::Sync(format!("Failed to update shift: {msg}"));

        let response = self
            .service
            .update_shift(id, &shift)
            .map_err(|e| fail(e.message))?;
        let canonical = Shift::parse(&response)
            .map_err(|e| fail(format!("server returned an invalid shift: {}", e.detail())))?;

        Ok(Placement::Upsert(canonical))
    }

    fn delete(&mut self, target: &DeleteTarget) -> AppResult<()> {
        self.service
            .delete_shift(target)
            .map_err(|e| AppError::Sync(format!("Failed to delete shifts: {e}")))
    }
}
