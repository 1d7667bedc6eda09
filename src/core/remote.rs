//! Collaborators the repository talks to but does not own: the remote shift
//! service and the identity signal that decides whether it is used.

use crate::errors::{AppError, AppResult};
use crate::models::shift::Shift;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by the remote service. Carries a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Logical contract of the remote shift service. Responses are returned as
/// loose JSON records; the repository re-validates them before use.
pub trait ShiftService {
    fn fetch_shifts(&mut self) -> RemoteResult<Vec<Value>>;
    fn create_shift(&mut self, shift: &Shift) -> RemoteResult<Value>;
    fn create_shift_batch(&mut self, shifts: &[Shift]) -> RemoteResult<Vec<Value>>;
    fn update_shift(&mut self, id: &str, shift: &Shift) -> RemoteResult<Value>;
    fn delete_shift(&mut self, target: &DeleteTarget) -> RemoteResult<()>;
}

/// Source of the "is authenticated" signal.
pub trait Identity {
    fn is_authenticated(&self) -> bool;
}

/// Nobody signed in: the repository always works against the cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn is_authenticated(&self) -> bool {
        false
    }
}

/// Shared sign-in flag. The login flow keeps one clone and flips it, the
/// repository reads another.
#[derive(Debug, Clone, Default)]
pub struct SessionFlag(Rc<Cell<bool>>);

impl SessionFlag {
    pub fn new(signed_in: bool) -> Self {
        Self(Rc::new(Cell::new(signed_in)))
    }

    pub fn sign_in(&self) {
        self.0.set(true);
    }

    pub fn sign_out(&self) {
        self.0.set(false);
    }
}

impl Identity for SessionFlag {
    fn is_authenticated(&self) -> bool {
        self.0.get()
    }
}

/// Which records a delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    One(String),
    Many(Vec<String>),
    /// Absent input: every record.
    All,
}

impl DeleteTarget {
    /// Interpret loosely shaped input: absent/null, an id, or a list of ids.
    /// Anything else is rejected.
    pub fn from_value(input: Option<&Value>) -> AppResult<Self> {
        match input {
            None | Some(Value::Null) => Ok(DeleteTarget::All),
            Some(Value::String(id)) => Ok(DeleteTarget::One(id.clone())),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(id) => Ok(id.clone()),
                    other => Err(AppError::validation(format!(
                        "Invalid shift id in delete request: {other}"
                    ))),
                })
                .collect::<AppResult<Vec<_>>>()
                .map(DeleteTarget::Many),
            Some(other) => Err(AppError::validation(format!(
                "Invalid delete request: expected an id, a list of ids or nothing, got {other}"
            ))),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        match self {
            DeleteTarget::One(target) => target == id,
            DeleteTarget::Many(targets) => targets.iter().any(|t| t == id),
            DeleteTarget::All => true,
        }
    }
}
