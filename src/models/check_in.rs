use crate::db::kv::{CHECK_IN_KEY, KeyValueStore};
use crate::errors::AppResult;
use chrono::{DateTime, SecondsFormat, Utc};

/// The instant the user clocked in for a shift still in progress.
pub struct CheckIn<S: KeyValueStore> {
    store: S,
    time: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore> CheckIn<S> {
    pub fn new(store: S) -> Self {
        Self { store, time: None }
    }

    /// Reload from the cache; an absent or unreadable value means "not checked in".
    pub fn fetch(&mut self) -> AppResult<()> {
        // older releases stored the instant JSON-encoded, i.e. quoted
        self.time = self
            .store
            .get(CHECK_IN_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim().trim_matches('"')).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Ok(())
    }

    /// Check in at `at`, or now.
    pub fn set(&mut self, at: Option<DateTime<Utc>>) -> AppResult<DateTime<Utc>> {
        let at = at.unwrap_or_else(Utc::now);
        self.time = Some(at);
        self.store
            .set(CHECK_IN_KEY, &at.to_rfc3339_opts(SecondsFormat::Millis, true))?;
        Ok(at)
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.time = None;
        self.store.remove(CHECK_IN_KEY)
    }

    pub fn is_checked_in(&self) -> bool {
        self.time.is_some()
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }
}
