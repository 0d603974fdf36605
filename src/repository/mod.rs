//! Repository module
//!
//! One repository per entity family. Reads go through the filter engine,
//! writes through a unit of work, and every failure is reported as a
//! `StoreError`.

mod accounts;
mod banking;
mod feeexcluder;
mod messages;
mod record;
mod stake;

pub use accounts::{AccountMigrateRepository, SetExtraRepository};
pub use banking::{IssueRepository, SystemTransferRepository};
pub use feeexcluder::{
    CreateTariffsRepository, DeleteTariffsRepository, StatsRepository, TariffRepository,
};
pub use messages::{MessageRepository, StoredMessage};
pub use record::{Record, RecordRepository};
pub use stake::{
    StakeBuyRepository, StakeClaimRewardRepository, StakeDistributeRewardsRepository,
    StakeManageSystemStakeRepository, StakeSellCancelRepository, StakeSellRepository,
    StakeTransferFromUserRepository, StakeTransferToUserRepository,
};

use async_trait::async_trait;

use crate::filter::Filter;
use crate::store::StoreResult;

/// Read/write contract shared by entity families
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send + Sync;
    type Id: Send + Sync;

    /// Every entity matching `filter`. Zero matches is `NotFound`.
    async fn get_all(&self, filter: &Filter) -> StoreResult<Vec<Self::Entity>>;

    /// Insert all entities atomically. An empty batch, or an empty `hash`, is
    /// a no-op.
    async fn insert(&self, hash: &str, entities: &[Self::Entity]) -> StoreResult<()>;

    /// Overwrite the stored entity `id`. An empty batch is a no-op.
    async fn update(&self, hash: &str, id: Self::Id, entities: &[Self::Entity]) -> StoreResult<()>;

    async fn delete(&self, id: Self::Id) -> StoreResult<()>;
}
