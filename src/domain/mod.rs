//! Domain module
//!
//! Caller-facing message and state types.

pub mod accounts;
pub mod amount;
pub mod banking;
pub mod extra;
pub mod feeexcluder;
pub mod msg;
pub mod stake;

pub use accounts::{MsgAccountMigrate, MsgSetExtra};
pub use amount::{AmountError, Coin};
pub use banking::{MsgIssue, MsgSystemTransfer};
pub use extra::{Extra, ExtraKind};
pub use feeexcluder::{
    DailyStats, FeeExcluderGenesis, Fees, MsgCreateTariffs, MsgDeleteTariffs, Stats, Tariff,
};
pub use msg::{Block, GenesisDoc, Msg, Tx};
pub use stake::{
    MsgBuyRequest, MsgCancelSell, MsgClaimReward, MsgDistributeRewards, MsgManageSystemStake,
    MsgSellRequest, MsgTransferFromUser, MsgTransferToUser, StakeKind,
};
