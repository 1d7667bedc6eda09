//! Named, reusable shift blueprints.

use super::shift::Shift;
use crate::db::kv::{KeyValueStore, TEMPLATES_KEY, read_json, write_json};
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub struct ShiftTemplates<S: KeyValueStore> {
    store: S,
    templates: BTreeMap<String, Shift>,
}

impl<S: KeyValueStore> ShiftTemplates<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            templates: BTreeMap::new(),
        }
    }

    /// Reload from the cache. Entries that fail to parse are dropped and
    /// reported back; the rest are kept.
    pub fn fetch(&mut self) -> AppResult<Vec<String>> {
        let raw = read_json(&self.store, TEMPLATES_KEY).map_err(|e| {
            AppError::Storage(format!("Failed to fetch shift templates: {}", e.detail()))
        })?;

        let mut templates = BTreeMap::new();
        let mut failures = Vec::new();

        if let Some(Value::Object(map)) = raw {
            for (name, value) in map {
                // older releases wrapped the blueprint as {"shift": {...}}
                let body = match value.get("shift") {
                    Some(inner @ Value::Object(_)) => inner,
                    _ => &value,
                };
                match Shift::parse(body) {
                    Ok(shift) => {
                        templates.insert(name, shift);
                    }
                    Err(e) => {
                        tracing::warn!(template = %name, error = %e, "dropping unparseable template");
                        failures.push(format!("template '{name}': {}", e.detail()));
                    }
                }
            }
        }

        self.templates = templates;
        Ok(failures)
    }

    /// Insert or replace a template.
    pub fn add(&mut self, name: &str, template: Shift) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Template name cannot be empty"));
        }
        self.templates.insert(name.to_string(), template);
        self.persist()
    }

    /// Returns whether a template was removed.
    pub fn delete(&mut self, name: &str) -> AppResult<bool> {
        let removed = self.templates.remove(name.trim()).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Shift> {
        self.templates.get(name.trim())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Shift)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn persist(&mut self) -> AppResult<()> {
        write_json(&mut self.store, TEMPLATES_KEY, &self.templates)
    }
}
