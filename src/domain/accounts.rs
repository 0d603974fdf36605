//! Account messages

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAccountMigrate {
    pub creator: String,
    pub address: String,
    pub hash: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSetExtra {
    pub creator: String,
    pub hash: String,
    #[serde(default)]
    pub extras: Vec<Extra>,
}
