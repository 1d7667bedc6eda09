//! The shift repository: owns the in-memory mirror and keeps it in step with
//! whichever store is active, the local cache or the remote service.
//!
//! Every operation picks its backend once, from the identity signal at call
//! time. Write paths validate the whole input before touching anything and
//! fail rather than lose data; the read path (`fetch`) drops unparseable
//! records and reports them instead of failing. After every successful
//! mutation the full mirror is written to the cache, in both modes, so the
//! cache is always a usable offline fallback.

use super::backend::{OfflineBackend, OnlineBackend, Placement, SyncBackend, SyncMode};
use super::remote::{Anonymous, DeleteTarget, Identity, ShiftService};
use super::summary::{PeriodSummary, summarize};
use crate::db::kv::{KeyValueStore, SHIFTS_KEY, write_json};
use crate::errors::{AppError, AppResult};
use crate::models::raw_shift::RawShift;
use crate::models::shift::Shift;
use crate::utils::date::{local_day_bounds, parse_day};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashSet;

/// What a `fetch` found.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub mode: SyncMode,
    /// Records now in the mirror.
    pub loaded: usize,
    /// One message per record that was dropped.
    pub failures: Vec<String>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ShiftRepository<S: KeyValueStore> {
    cache: S,
    identity: Box<dyn Identity>,
    remote: Option<Box<dyn ShiftService>>,
    shifts: Vec<Shift>,
}

impl<S: KeyValueStore> ShiftRepository<S> {
    /// A repository that only ever uses the local cache.
    pub fn new(cache: S) -> Self {
        Self {
            cache,
            identity: Box::new(Anonymous),
            remote: None,
            shifts: Vec::new(),
        }
    }

    /// A repository that switches to `service` while `identity` reports an
    /// authenticated user.
    pub fn with_remote(
        cache: S,
        identity: impl Identity + 'static,
        service: impl ShiftService + 'static,
    ) -> Self {
        Self {
            cache,
            identity: Box::new(identity),
            remote: Some(Box::new(service)),
            shifts: Vec::new(),
        }
    }

    fn backend(&mut self) -> Box<dyn SyncBackend + '_> {
        match self.remote.as_deref_mut() {
            Some(service) if self.identity.is_authenticated() => {
                Box::new(OnlineBackend::new(service))
            }
            _ => Box::new(OfflineBackend::new(&self.cache)),
        }
    }

    /// Mode the next operation would run in.
    pub fn mode(&self) -> SyncMode {
        if self.remote.is_some() && self.identity.is_authenticated() {
            SyncMode::Online
        } else {
            SyncMode::Offline
        }
    }

    // ---------------------------
    // Operations
    // ---------------------------

    /// Replace the mirror with the active store's contents.
    pub fn fetch(&mut self) -> AppResult<FetchReport> {
        let (mode, loaded) = {
            let mut backend = self.backend();
            (backend.mode(), backend.load())
        };
        let loaded = loaded.map_err(|e| match e {
            AppError::Sync(_) => e,
            other => AppError::Storage(format!("Failed to fetch shifts: {}", other.detail())),
        })?;

        let outcome = Shift::parse_all(&loaded.records);
        let mut failures = loaded.failures;
        failures.extend(outcome.failures);
        let mut seen = HashSet::new();
        let mut shifts = Vec::with_capacity(outcome.shifts.len());

        for shift in outcome.shifts {
            if seen.insert(shift.id().to_string()) {
                shifts.push(shift);
            } else {
                tracing::warn!(id = shift.id(), "dropping duplicate shift record");
                failures.push(format!("duplicate shift id '{}'", shift.id()));
            }
        }

        self.shifts = shifts;
        self.persist()?;

        if let Some(key) = loaded.legacy_key {
            self.cache.remove(key)?;
        }

        if !failures.is_empty() {
            tracing::warn!(
                dropped = failures.len(),
                "some shifts could not be loaded"
            );
        }

        Ok(FetchReport {
            mode,
            loaded: self.shifts.len(),
            failures,
        })
    }

    /// Validate and store one or many shifts. Nothing changes unless every
    /// candidate is valid. Returns the records as stored (online: with the
    /// server's canonical fields).
    pub fn add<I, T>(&mut self, input: I) -> AppResult<Vec<Shift>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawShift>,
    {
        let candidates = input.into_iter().map(|item| Ok(item.into())).collect();
        self.add_candidates(candidates)
    }

    pub fn add_one(&mut self, input: impl Into<RawShift>) -> AppResult<Shift> {
        let mut added = self.add([input])?;
        added
            .pop()
            .ok_or_else(|| AppError::Other("no shift was added".into()))
    }

    /// Like [`add`](Self::add), for loosely shaped JSON records.
    pub fn add_values(&mut self, values: &[Value]) -> AppResult<Vec<Shift>> {
        let candidates = values.iter().map(RawShift::from_value).collect();
        self.add_candidates(candidates)
    }

    fn add_candidates(&mut self, candidates: Vec<AppResult<RawShift>>) -> AppResult<Vec<Shift>> {
        let validated = self.validate_batch(candidates)?;
        if validated.is_empty() {
            return Ok(Vec::new());
        }

        let created = self.backend().create(validated)?;

        for shift in &created {
            self.upsert(shift.clone());
        }
        self.persist()?;

        tracing::debug!(count = created.len(), "shifts added");
        Ok(created)
    }

    /// Every candidate is checked; all rejections are reported together.
    fn validate_batch(&self, candidates: Vec<AppResult<RawShift>>) -> AppResult<Vec<Shift>> {
        let mut validated: Vec<Shift> = Vec::with_capacity(candidates.len());
        let mut errors = Vec::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let checked = candidate.and_then(Shift::from_raw).and_then(|shift| {
                let taken = self.get(shift.id()).is_some()
                    || validated.iter().any(|v| v.id() == shift.id());
                if taken {
                    Err(AppError::validation(format!(
                        "a shift with id '{}' already exists",
                        shift.id()
                    )))
                } else {
                    Ok(shift)
                }
            });

            match checked {
                Ok(shift) => validated.push(shift),
                Err(e) => errors.push(format!("item #{index} is invalid: {}", e.detail())),
            }
        }

        if !errors.is_empty() {
            return Err(AppError::PartialFailure(format!(
                "Invalid shift input: {}",
                errors.join(" | ")
            )));
        }

        Ok(validated)
    }

    /// Replace the shift stored under `id`.
    ///
    /// Offline the record must exist. Online the server's response decides
    /// which record is replaced, and an unknown one is inserted.
    pub fn update(&mut self, id: &str, input: impl Into<RawShift>) -> AppResult<Shift> {
        let mut raw = input.into();
        if raw.id.is_none() {
            raw.id = Some(id.to_string());
        }

        let shift = Shift::from_raw(raw)
            .map_err(|e| AppError::validation(format!("Invalid shift input: {}", e.detail())))?;

        let placement = self.backend().update(id, shift)?;

        let stored = match placement {
            Placement::Replace { id, shift } => {
                let index = self
                    .shifts
                    .iter()
                    .position(|s| s.id() == id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Cannot update shift: ID '{id}' not found"))
                    })?;

                if shift.id() != id && self.get(shift.id()).is_some() {
                    return Err(AppError::validation(format!(
                        "Invalid shift input: a shift with id '{}' already exists",
                        shift.id()
                    )));
                }

                self.shifts[index] = shift.clone();
                shift
            }
            Placement::Upsert(shift) => {
                self.upsert(shift.clone());
                shift
            }
        };

        self.persist()?;
        Ok(stored)
    }

    /// Remove the targeted shifts. Online, the remote delete runs first and
    /// a failure leaves the mirror untouched. Returns how many records left
    /// the mirror.
    pub fn delete(&mut self, target: DeleteTarget) -> AppResult<usize> {
        self.backend().delete(&target)?;

        let before = self.shifts.len();
        self.shifts.retain(|s| !target.matches(s.id()));
        let removed = before - self.shifts.len();

        self.persist()?;

        tracing::debug!(removed, "shifts deleted");
        Ok(removed)
    }

    /// Like [`delete`](Self::delete), for loosely shaped input. The input
    /// shape is checked before any store is contacted.
    pub fn delete_value(&mut self, input: Option<&Value>) -> AppResult<usize> {
        let target = DeleteTarget::from_value(input)?;
        self.delete(target)
    }

    /// Write the full mirror to the cache.
    pub fn persist(&mut self) -> AppResult<()> {
        write_json(&mut self.cache, SHIFTS_KEY, &self.shifts)?;
        tracing::debug!(count = self.shifts.len(), "shift cache persisted");
        Ok(())
    }

    fn upsert(&mut self, shift: Shift) {
        match self.shifts.iter_mut().find(|s| s.id() == shift.id()) {
            Some(existing) => *existing = shift,
            None => self.shifts.push(shift),
        }
    }

    // ---------------------------
    // Queries
    // ---------------------------

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn get(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Shifts overlapping the half-open interval `[start, end)`.
    pub fn range(
        &self,
        start: impl Into<DateTime<Utc>>,
        end: impl Into<DateTime<Utc>>,
    ) -> Vec<&Shift> {
        let (start, end) = (start.into(), end.into());
        self.shifts.iter().filter(|s| s.overlaps(start, end)).collect()
    }

    /// Shifts overlapping the local calendar day containing `at`.
    pub fn day<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Vec<&Shift> {
        let date = at.with_timezone(&Local).date_naive();
        match local_day_bounds(date) {
            Some((start, end)) => self.range(start, end),
            None => Vec::new(),
        }
    }

    /// Text variant of [`day`](Self::day); unparseable input yields no shifts.
    pub fn day_str(&self, text: &str) -> Vec<&Shift> {
        match parse_day(text).and_then(local_day_bounds) {
            Some((start, end)) => self.range(start, end),
            None => Vec::new(),
        }
    }

    /// Totals over `[from, to)`, with partially covered shifts clamped.
    pub fn summary(
        &self,
        from: impl Into<DateTime<Utc>>,
        to: impl Into<DateTime<Utc>>,
    ) -> PeriodSummary {
        summarize(&self.shifts, from.into(), to.into())
    }
}
