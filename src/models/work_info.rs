//! Pay rates previously used at each workplace, offered back as suggestions.

use crate::db::kv::{KeyValueStore, WORK_INFOS_KEY, read_json, write_json};
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub struct WorkInfos<S: KeyValueStore> {
    store: S,
    entries: BTreeMap<String, Vec<f64>>,
}

impl<S: KeyValueStore> WorkInfos<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: BTreeMap::new(),
        }
    }

    /// Reload from the cache. Accepts `{workplace: [rates]}` as well as the
    /// older `{workplace: {payRates: [rates]}}` layout.
    pub fn fetch(&mut self) -> AppResult<()> {
        let raw = read_json(&self.store, WORK_INFOS_KEY)
            .map_err(|e| AppError::Storage(format!("Failed to fetch previous work info: {}", e.detail())))?;

        let mut entries = BTreeMap::new();
        if let Some(Value::Object(map)) = raw {
            for (workplace, value) in map {
                let rates = match &value {
                    Value::Array(items) => items.as_slice(),
                    Value::Object(obj) => match obj.get("payRates").or_else(|| obj.get("payRate")) {
                        Some(Value::Array(items)) => items.as_slice(),
                        _ => &[],
                    },
                    _ => &[],
                };

                let mut set: Vec<f64> = Vec::new();
                for rate in rates.iter().filter_map(rate_from_value) {
                    if !set.contains(&rate) {
                        set.push(rate);
                    }
                }
                if !set.is_empty() {
                    entries.insert(workplace, set);
                }
            }
        }

        self.entries = entries;
        Ok(())
    }

    pub fn add(&mut self, workplace: &str, pay_rate: f64) -> AppResult<()> {
        let workplace = workplace.trim();
        if workplace.is_empty() {
            return Err(AppError::validation("Workplace cannot be empty"));
        }
        if !pay_rate.is_finite() {
            return Err(AppError::validation("Invalid pay rate"));
        }

        let rates = self.entries.entry(workplace.to_string()).or_default();
        if !rates.contains(&pay_rate) {
            rates.push(pay_rate);
        }

        self.persist()
    }

    /// Remove one rate, or the whole workplace when `pay_rate` is `None`.
    /// A workplace whose last rate is removed disappears.
    pub fn delete(&mut self, workplace: &str, pay_rate: Option<f64>) -> AppResult<()> {
        let workplace = workplace.trim();

        let changed = match pay_rate {
            None => self.entries.remove(workplace).is_some(),
            Some(rate) => match self.entries.get_mut(workplace) {
                None => false,
                Some(rates) => {
                    let before = rates.len();
                    rates.retain(|r| *r != rate);
                    let removed = rates.len() != before;
                    if rates.is_empty() {
                        self.entries.remove(workplace);
                    }
                    removed
                }
            },
        };

        if changed {
            self.persist()?;
        }
        Ok(())
    }

    pub fn contains(&self, workplace: &str) -> bool {
        self.entries.contains_key(workplace)
    }

    pub fn workplaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Known rates for a workplace, ascending.
    pub fn rates(&self, workplace: &str) -> Vec<f64> {
        let mut rates = self.entries.get(workplace).cloned().unwrap_or_default();
        rates.sort_by(f64::total_cmp);
        rates
    }

    fn persist(&mut self) -> AppResult<()> {
        write_json(&mut self.store, WORK_INFOS_KEY, &self.entries)
    }
}

fn rate_from_value(value: &Value) -> Option<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rate.filter(|r| r.is_finite())
}
