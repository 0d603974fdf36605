//! Fee excluder messages and state

use serde::{Deserialize, Serialize};

use super::Coin;

/// One fee tier of a tariff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fees {
    pub id: u64,
    pub creator: String,
    pub amount_from: String,
    pub fee: String,
    pub ref_reward: String,
    pub stake_reward: String,
    pub min_amount: u64,
    pub no_ref_reward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: u64,
    pub amount: String,
    pub denom: String,
    pub min_ref_balance: String,
    #[serde(default)]
    pub fees: Vec<Fees>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateTariffs {
    pub creator: String,
    pub denom: String,
    pub tariff: Tariff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteTariffs {
    pub creator: String,
    pub denom: String,
    pub tariff_id: String,
    pub fees_id: String,
}

/// Aggregated fee counters for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(default)]
    pub amount_with_fee: Vec<Coin>,
    #[serde(default)]
    pub amount_no_fee: Vec<Coin>,
    #[serde(default)]
    pub fee: Vec<Coin>,
    pub count_with_fee: i32,
    pub count_no_fee: i32,
}

/// Stats snapshot; owns exactly one `DailyStats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub index: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub stats: DailyStats,
}

/// Fee excluder section of the genesis document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeExcluderGenesis {
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
    #[serde(default)]
    pub stats: Vec<Stats>,
}
