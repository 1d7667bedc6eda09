#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use shiftpay::core::{DeleteTarget, RemoteError, RemoteResult, ShiftService};
use shiftpay::models::Shift;
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub fn spay() -> Command {
    cargo_bin_cmd!("shiftpay")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shiftpay.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a fresh cache through the CLI
pub fn init_db(db_path: &str) {
    spay()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid rfc3339")
        .with_timezone(&Utc)
}

/// A well-formed shift record in the canonical wire shape.
pub fn shift_json(id: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "workplace": "Cafe",
        "payRate": 20,
        "startTime": start,
        "endTime": end,
        "unpaidBreaks": ["0:30"]
    })
}

// ---------------------------
// Scripted remote service
// ---------------------------

#[derive(Debug, Default)]
pub struct RemoteState {
    pub records: Vec<Value>,
    pub calls: Vec<String>,
    pub fail_with: Option<String>,
    /// Replaces every create/update response when set.
    pub bad_response: Option<Value>,
    pub next_id: u32,
}

/// Clones share state, so a test can keep one handle and hand another to the
/// repository.
#[derive(Debug, Clone, Default)]
pub struct MockRemote(pub Rc<RefCell<RemoteState>>);

impl MockRemote {
    pub fn with_records(records: Vec<Value>) -> Self {
        let remote = MockRemote::default();
        remote.0.borrow_mut().records = records;
        remote
    }

    pub fn fail_with(&self, message: &str) {
        self.0.borrow_mut().fail_with = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn record_ids(&self) -> Vec<String> {
        self.0
            .borrow()
            .records
            .iter()
            .filter_map(|r| r["id"].as_str().map(str::to_string))
            .collect()
    }

    fn enter(&self, call: String) -> RemoteResult<()> {
        let mut state = self.0.borrow_mut();
        state.calls.push(call);
        match &state.fail_with {
            Some(msg) => Err(RemoteError::new(msg.clone())),
            None => Ok(()),
        }
    }

    fn store_created(&self, shift: &Shift) -> Value {
        let mut state = self.0.borrow_mut();
        if let Some(bad) = &state.bad_response {
            return bad.clone();
        }
        state.next_id += 1;
        let mut record = serde_json::to_value(shift.to_dto()).expect("dto");
        record["id"] = json!(format!("srv-{}", state.next_id));
        state.records.push(record.clone());
        record
    }
}

impl ShiftService for MockRemote {
    fn fetch_shifts(&mut self) -> RemoteResult<Vec<Value>> {
        self.enter("fetch".into())?;
        Ok(self.0.borrow().records.clone())
    }

    fn create_shift(&mut self, shift: &Shift) -> RemoteResult<Value> {
        self.enter("create".into())?;
        Ok(self.store_created(shift))
    }

    fn create_shift_batch(&mut self, shifts: &[Shift]) -> RemoteResult<Vec<Value>> {
        self.enter(format!("create_batch:{}", shifts.len()))?;
        Ok(shifts.iter().map(|s| self.store_created(s)).collect())
    }

    fn update_shift(&mut self, id: &str, shift: &Shift) -> RemoteResult<Value> {
        self.enter(format!("update:{}", id))?;
        let mut state = self.0.borrow_mut();
        if let Some(bad) = &state.bad_response {
            return Ok(bad.clone());
        }
        let mut record = serde_json::to_value(shift.to_dto()).expect("dto");
        record["id"] = json!(id);
        match state.records.iter_mut().find(|r| r["id"] == json!(id)) {
            Some(existing) => *existing = record.clone(),
            None => state.records.push(record.clone()),
        }
        Ok(record)
    }

    fn delete_shift(&mut self, target: &DeleteTarget) -> RemoteResult<()> {
        self.enter("delete".into())?;
        self.0
            .borrow_mut()
            .records
            .retain(|r| !target.matches(r["id"].as_str().unwrap_or_default()));
        Ok(())
    }
}
