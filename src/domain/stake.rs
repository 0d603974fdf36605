//! Stake messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Coin;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBuyRequest {
    pub creator: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSellRequest {
    pub creator: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCancelSell {
    pub creator: String,
    pub amount: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimReward {
    pub creator: String,
    pub amount: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDistributeRewards {
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferFromUser {
    pub creator: String,
    pub amount: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferToUser {
    pub creator: String,
    pub amount: String,
    pub address: String,
}

/// Direction of a system stake adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeKind {
    Buy,
    Sell,
}

impl fmt::Display for StakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeKind::Buy => write!(f, "buy"),
            StakeKind::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for StakeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(StakeKind::Buy),
            "sell" => Ok(StakeKind::Sell),
            other => Err(format!("unknown stake kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgManageSystemStake {
    pub creator: String,
    pub amount: String,
    pub kind: StakeKind,
}
