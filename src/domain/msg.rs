//! Decoded chain input
//!
//! What the block decoder hands to the indexer: typed messages grouped by
//! transaction and block, plus the genesis document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    MsgAccountMigrate, MsgBuyRequest, MsgCancelSell, MsgClaimReward, MsgCreateTariffs,
    MsgDeleteTariffs, MsgDistributeRewards, MsgIssue, MsgManageSystemStake, MsgSellRequest,
    MsgSetExtra, MsgSystemTransfer, MsgTransferFromUser, MsgTransferToUser,
};

/// A decoded message, tagged by its type URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Msg {
    #[serde(rename = "/overgold.stake.MsgBuyRequest")]
    StakeBuy(MsgBuyRequest),
    #[serde(rename = "/overgold.stake.MsgSellRequest")]
    StakeSell(MsgSellRequest),
    #[serde(rename = "/overgold.stake.MsgMsgCancelSell")]
    StakeSellCancel(MsgCancelSell),
    #[serde(rename = "/overgold.stake.MsgClaimReward")]
    StakeClaimReward(MsgClaimReward),
    #[serde(rename = "/overgold.stake.MsgDistributeRewards")]
    StakeDistributeRewards(MsgDistributeRewards),
    #[serde(rename = "/overgold.stake.MsgTransferFromUser")]
    StakeTransferFromUser(MsgTransferFromUser),
    #[serde(rename = "/overgold.stake.MsgTransferToUser")]
    StakeTransferToUser(MsgTransferToUser),
    #[serde(rename = "/overgold.stake.MsgManageSystemStake")]
    StakeManageSystemStake(MsgManageSystemStake),
    #[serde(rename = "/vipcoin.chain.banking.MsgIssue")]
    BankingIssue(MsgIssue),
    #[serde(rename = "/vipcoin.chain.banking.MsgSystemTransfer")]
    BankingSystemTransfer(MsgSystemTransfer),
    #[serde(rename = "/vipcoin.chain.accounts.MsgAccountMigrate")]
    AccountMigrate(MsgAccountMigrate),
    #[serde(rename = "/vipcoin.chain.accounts.MsgSetExtra")]
    AccountSetExtra(MsgSetExtra),
    #[serde(rename = "/overgold.feeexcluder.MsgCreateTariffs")]
    FeeExcluderCreateTariffs(MsgCreateTariffs),
    #[serde(rename = "/overgold.feeexcluder.MsgDeleteTariffs")]
    FeeExcluderDeleteTariffs(MsgDeleteTariffs),
}

impl Msg {
    /// Type URL, as stored alongside indexed messages
    pub fn type_url(&self) -> &'static str {
        match self {
            Msg::StakeBuy(_) => "/overgold.stake.MsgBuyRequest",
            Msg::StakeSell(_) => "/overgold.stake.MsgSellRequest",
            Msg::StakeSellCancel(_) => "/overgold.stake.MsgMsgCancelSell",
            Msg::StakeClaimReward(_) => "/overgold.stake.MsgClaimReward",
            Msg::StakeDistributeRewards(_) => "/overgold.stake.MsgDistributeRewards",
            Msg::StakeTransferFromUser(_) => "/overgold.stake.MsgTransferFromUser",
            Msg::StakeTransferToUser(_) => "/overgold.stake.MsgTransferToUser",
            Msg::StakeManageSystemStake(_) => "/overgold.stake.MsgManageSystemStake",
            Msg::BankingIssue(_) => "/vipcoin.chain.banking.MsgIssue",
            Msg::BankingSystemTransfer(_) => "/vipcoin.chain.banking.MsgSystemTransfer",
            Msg::AccountMigrate(_) => "/vipcoin.chain.accounts.MsgAccountMigrate",
            Msg::AccountSetExtra(_) => "/vipcoin.chain.accounts.MsgSetExtra",
            Msg::FeeExcluderCreateTariffs(_) => "/overgold.feeexcluder.MsgCreateTariffs",
            Msg::FeeExcluderDeleteTariffs(_) => "/overgold.feeexcluder.MsgDeleteTariffs",
        }
    }

    /// Every address-like value the message references, in field order.
    /// May contain duplicates.
    pub fn referenced_values(&self) -> Vec<String> {
        match self {
            Msg::StakeBuy(m) => vec![m.creator.clone()],
            Msg::StakeSell(m) => vec![m.creator.clone()],
            Msg::StakeSellCancel(m) => vec![m.creator.clone()],
            Msg::StakeClaimReward(m) => vec![m.creator.clone()],
            Msg::StakeDistributeRewards(m) => vec![m.creator.clone()],
            Msg::StakeTransferFromUser(m) => vec![m.creator.clone(), m.address.clone()],
            Msg::StakeTransferToUser(m) => vec![m.creator.clone(), m.address.clone()],
            Msg::StakeManageSystemStake(m) => vec![m.creator.clone()],
            Msg::BankingIssue(m) => vec![m.creator.clone(), m.wallet.clone()],
            Msg::BankingSystemTransfer(m) => vec![
                m.creator.clone(),
                m.wallet_from.clone(),
                m.wallet_to.clone(),
            ],
            Msg::AccountMigrate(m) => vec![m.creator.clone(), m.address.clone()],
            Msg::AccountSetExtra(m) => vec![m.creator.clone()],
            Msg::FeeExcluderCreateTariffs(m) => std::iter::once(m.creator.clone())
                .chain(m.tariff.fees.iter().map(|f| f.creator.clone()))
                .collect(),
            Msg::FeeExcluderDeleteTariffs(m) => vec![m.creator.clone()],
        }
    }
}

/// A decoded transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub hash: String,
    pub height: i64,
    #[serde(default = "default_success")]
    pub success: bool,
    pub messages: Vec<Msg>,
}

fn default_success() -> bool {
    true
}

/// A decoded block: the unit of work handed to the dispatch layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: i64,
    #[serde(default)]
    pub txs: Vec<Tx>,
}

/// Genesis document; each module reads its own `app_state` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenesisDoc {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub app_state: serde_json::Map<String, serde_json::Value>,
}

impl GenesisDoc {
    /// Decode the `app_state` section for `module`, if present
    pub fn module_state<T: DeserializeOwned>(
        &self,
        module: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.app_state
            .get(module)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeeExcluderGenesis;

    #[test]
    fn test_msg_is_tagged_by_type_url() {
        let json = r#"{"@type":"/overgold.stake.MsgBuyRequest","creator":"ovg1a","amount":"10"}"#;
        let msg: Msg = serde_json::from_str(json).unwrap();

        assert_eq!(
            msg,
            Msg::StakeBuy(MsgBuyRequest {
                creator: "ovg1a".to_string(),
                amount: "10".to_string(),
            })
        );
        assert_eq!(msg.type_url(), "/overgold.stake.MsgBuyRequest");
    }

    #[test]
    fn test_type_url_matches_serde_tag() {
        let msg = Msg::StakeTransferToUser(MsgTransferToUser {
            creator: "ovg1a".to_string(),
            amount: "1".to_string(),
            address: "ovg1b".to_string(),
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["@type"], msg.type_url());
    }

    #[test]
    fn test_referenced_values_keep_duplicates() {
        let msg = Msg::StakeTransferFromUser(MsgTransferFromUser {
            creator: "ovg1a".to_string(),
            amount: "1".to_string(),
            address: "ovg1a".to_string(),
        });
        assert_eq!(msg.referenced_values(), vec!["ovg1a", "ovg1a"]);
    }

    #[test]
    fn test_tx_success_defaults_to_true() {
        let tx: Tx = serde_json::from_str(r#"{"hash":"AB","height":3,"messages":[]}"#).unwrap();
        assert!(tx.success);
    }

    #[test]
    fn test_genesis_module_state() {
        let doc: GenesisDoc = serde_json::from_str(
            r#"{"chain_id":"ovg","app_state":{"feeexcluder":{"tariffs":[],"stats":[]}}}"#,
        )
        .unwrap();

        let state: Option<FeeExcluderGenesis> = doc.module_state("feeexcluder").unwrap();
        assert_eq!(state, Some(FeeExcluderGenesis::default()));

        let missing: Option<FeeExcluderGenesis> = doc.module_state("stake").unwrap();
        assert!(missing.is_none());
    }
}
