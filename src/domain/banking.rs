//! Banking messages

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgIssue {
    pub creator: String,
    pub wallet: String,
    pub asset: String,
    pub amount: String,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSystemTransfer {
    pub creator: String,
    pub wallet_from: String,
    pub wallet_to: String,
    pub asset: String,
    pub amount: String,
    #[serde(default)]
    pub extras: Vec<Extra>,
}
