//! Extras attached to banking and account messages

use serde::{Deserialize, Serialize};

/// Closed set of extra kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Email,
    Phone,
    Comment,
}

/// Free-form annotation on a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub kind: ExtraKind,
    pub data: String,
}

impl Extra {
    pub fn new(kind: ExtraKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }
}
