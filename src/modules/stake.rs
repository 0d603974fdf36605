use async_trait::async_trait;
use sqlx::PgPool;
use std::slice;

use crate::domain::{Msg, Tx};
use crate::repository::{
    Repository, StakeBuyRepository, StakeClaimRewardRepository, StakeDistributeRewardsRepository,
    StakeManageSystemStakeRepository, StakeSellCancelRepository, StakeSellRepository,
    StakeTransferFromUserRepository, StakeTransferToUserRepository,
};

use super::{Capabilities, Capability, Module, ModuleError};

/// Persists `overgold.stake` messages
pub struct StakeModule {
    buy: StakeBuyRepository,
    sell: StakeSellRepository,
    sell_cancel: StakeSellCancelRepository,
    claim_reward: StakeClaimRewardRepository,
    distribute_rewards: StakeDistributeRewardsRepository,
    transfer_from_user: StakeTransferFromUserRepository,
    transfer_to_user: StakeTransferToUserRepository,
    manage_system_stake: StakeManageSystemStakeRepository,
}

impl StakeModule {
    pub fn new(pool: PgPool) -> Self {
        Self {
            buy: StakeBuyRepository::new(pool.clone()),
            sell: StakeSellRepository::new(pool.clone()),
            sell_cancel: StakeSellCancelRepository::new(pool.clone()),
            claim_reward: StakeClaimRewardRepository::new(pool.clone()),
            distribute_rewards: StakeDistributeRewardsRepository::new(pool.clone()),
            transfer_from_user: StakeTransferFromUserRepository::new(pool.clone()),
            transfer_to_user: StakeTransferToUserRepository::new(pool.clone()),
            manage_system_stake: StakeManageSystemStakeRepository::new(pool),
        }
    }
}

#[async_trait]
impl Module for StakeModule {
    fn name(&self) -> &'static str {
        "stake"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Messages.into()
    }

    async fn handle_msg(&self, _index: usize, msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
        let hash = tx.hash.as_str();

        match msg {
            Msg::StakeBuy(m) => self.buy.insert(hash, slice::from_ref(m)).await?,
            Msg::StakeSell(m) => self.sell.insert(hash, slice::from_ref(m)).await?,
            Msg::StakeSellCancel(m) => self.sell_cancel.insert(hash, slice::from_ref(m)).await?,
            Msg::StakeClaimReward(m) => self.claim_reward.insert(hash, slice::from_ref(m)).await?,
            Msg::StakeDistributeRewards(m) => {
                self.distribute_rewards
                    .insert(hash, slice::from_ref(m))
                    .await?
            }
            Msg::StakeTransferFromUser(m) => {
                self.transfer_from_user
                    .insert(hash, slice::from_ref(m))
                    .await?
            }
            Msg::StakeTransferToUser(m) => {
                self.transfer_to_user
                    .insert(hash, slice::from_ref(m))
                    .await?
            }
            Msg::StakeManageSystemStake(m) => {
                self.manage_system_stake
                    .insert(hash, slice::from_ref(m))
                    .await?
            }
            _ => {}
        }

        Ok(())
    }
}
