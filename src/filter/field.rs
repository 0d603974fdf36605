//! Field and table symbols
//!
//! The only place where symbolic identifiers are turned into SQL names.
//! Nothing caller-supplied ever reaches a query as text.

/// Symbolic field identifier a caller may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    TxHash,
    Creator,
    Amount,
    Denom,
    Address,
    Kind,
    Wallet,
    WalletFrom,
    WalletTo,
    Asset,
    Hash,
    PublicKey,
    TariffId,
    FeesId,
    MsgId,
    AmountFrom,
    Date,
    DailyStatsId,
    MsgIndex,
    MsgType,
    Height,
}

impl Field {
    /// Column backing this field
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::TxHash => "tx_hash",
            Field::Creator => "creator",
            Field::Amount => "amount",
            Field::Denom => "denom",
            Field::Address => "address",
            Field::Kind => "kind",
            Field::Wallet => "wallet",
            Field::WalletFrom => "wallet_from",
            Field::WalletTo => "wallet_to",
            Field::Asset => "asset",
            Field::Hash => "hash",
            Field::PublicKey => "public_key",
            Field::TariffId => "tariff_id",
            Field::FeesId => "fees_id",
            Field::MsgId => "msg_id",
            Field::AmountFrom => "amount_from",
            Field::Date => "date",
            Field::DailyStatsId => "daily_stats_id",
            Field::MsgIndex => "msg_index",
            Field::MsgType => "msg_type",
            Field::Height => "height",
        }
    }

    /// SQL type a bound value is cast to before it is compared with the
    /// column. Text columns, and `id` whose type differs per table, need none.
    pub fn cast(self) -> Option<&'static str> {
        match self {
            Field::Amount | Field::AmountFrom | Field::MsgId => Some("numeric"),
            Field::Date => Some("date"),
            Field::Height | Field::TariffId | Field::DailyStatsId => Some("bigint"),
            Field::MsgIndex => Some("integer"),
            _ => None,
        }
    }

    /// Placeholder `$n` for this field, with its cast
    pub(crate) fn placeholder(self, n: usize) -> String {
        match self.cast() {
            Some(ty) => format!("${}::{}", n, ty),
            None => format!("${}", n),
        }
    }

    /// Whether bounded comparisons are allowed on this field
    pub fn is_range_capable(self) -> bool {
        matches!(
            self,
            Field::Id
                | Field::Amount
                | Field::AmountFrom
                | Field::Date
                | Field::Height
                | Field::MsgIndex
        )
    }
}

/// Every table the indexer reads from or writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    StakeBuy,
    StakeSell,
    StakeSellCancel,
    StakeClaimReward,
    StakeDistributeRewards,
    StakeTransferFromUser,
    StakeTransferToUser,
    StakeManageSystemStake,
    BankingIssue,
    BankingSystemTransfer,
    AccountsAccountMigrate,
    AccountsSetExtra,
    FeeExcluderCreateTariffs,
    FeeExcluderDeleteTariffs,
    FeeExcluderTariff,
    FeeExcluderFees,
    FeeExcluderStats,
    FeeExcluderDailyStats,
    Message,
}

impl Table {
    pub const ALL: [Table; 19] = [
        Table::StakeBuy,
        Table::StakeSell,
        Table::StakeSellCancel,
        Table::StakeClaimReward,
        Table::StakeDistributeRewards,
        Table::StakeTransferFromUser,
        Table::StakeTransferToUser,
        Table::StakeManageSystemStake,
        Table::BankingIssue,
        Table::BankingSystemTransfer,
        Table::AccountsAccountMigrate,
        Table::AccountsSetExtra,
        Table::FeeExcluderCreateTariffs,
        Table::FeeExcluderDeleteTariffs,
        Table::FeeExcluderTariff,
        Table::FeeExcluderFees,
        Table::FeeExcluderStats,
        Table::FeeExcluderDailyStats,
        Table::Message,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::StakeBuy => "overgold_stake_buy",
            Table::StakeSell => "overgold_stake_sell",
            Table::StakeSellCancel => "overgold_stake_sell_cancel",
            Table::StakeClaimReward => "overgold_stake_claim_reward",
            Table::StakeDistributeRewards => "overgold_stake_distribute_rewards",
            Table::StakeTransferFromUser => "overgold_stake_transfer_from_user",
            Table::StakeTransferToUser => "overgold_stake_transfer_to_user",
            Table::StakeManageSystemStake => "overgold_stake_manage_system_stake",
            Table::BankingIssue => "vipcoin_chain_banking_issue",
            Table::BankingSystemTransfer => "vipcoin_chain_banking_system_transfer",
            Table::AccountsAccountMigrate => "vipcoin_chain_accounts_account_migrate",
            Table::AccountsSetExtra => "vipcoin_chain_accounts_set_extra",
            Table::FeeExcluderCreateTariffs => "overgold_feeexcluder_create_tariffs",
            Table::FeeExcluderDeleteTariffs => "overgold_feeexcluder_delete_tariffs",
            Table::FeeExcluderTariff => "overgold_feeexcluder_tariff",
            Table::FeeExcluderFees => "overgold_feeexcluder_fees",
            Table::FeeExcluderStats => "overgold_feeexcluder_stats",
            Table::FeeExcluderDailyStats => "overgold_feeexcluder_daily_stats",
            Table::Message => "message",
        }
    }

    /// Fields callers may filter this table on
    pub fn fields(self) -> &'static [Field] {
        use Field::*;

        match self {
            Table::StakeBuy | Table::StakeSell => &[Id, TxHash, Creator, Amount],
            Table::StakeSellCancel | Table::StakeClaimReward => {
                &[Id, TxHash, Creator, Amount, Denom]
            }
            Table::StakeDistributeRewards => &[Id, TxHash, Creator],
            Table::StakeTransferFromUser | Table::StakeTransferToUser => {
                &[Id, TxHash, Creator, Amount, Address]
            }
            Table::StakeManageSystemStake => &[Id, TxHash, Creator, Amount, Kind],
            Table::BankingIssue => &[Id, TxHash, Creator, Wallet, Asset, Amount],
            Table::BankingSystemTransfer => {
                &[Id, TxHash, Creator, WalletFrom, WalletTo, Asset, Amount]
            }
            Table::AccountsAccountMigrate => &[Id, TxHash, Creator, Address, Hash, PublicKey],
            Table::AccountsSetExtra => &[Id, TxHash, Creator, Hash],
            Table::FeeExcluderCreateTariffs => &[Id, TxHash, Creator, Denom, TariffId],
            Table::FeeExcluderDeleteTariffs => &[Id, TxHash, Creator, Denom, TariffId, FeesId],
            Table::FeeExcluderTariff => &[Id, MsgId, Denom, Amount],
            Table::FeeExcluderFees => &[Id, MsgId, Creator, AmountFrom],
            Table::FeeExcluderStats => &[Id, Date, DailyStatsId],
            Table::FeeExcluderDailyStats => &[Id],
            Table::Message => &[Id, TxHash, MsgIndex, MsgType, Height],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
