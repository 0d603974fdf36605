use async_trait::async_trait;
use sqlx::PgPool;
use std::slice;

use crate::domain::{Msg, Tx};
use crate::repository::{IssueRepository, Repository, SystemTransferRepository};

use super::{Capabilities, Capability, Module, ModuleError};

/// Persists `vipcoin.chain.banking` messages
pub struct BankingModule {
    issue: IssueRepository,
    system_transfer: SystemTransferRepository,
}

impl BankingModule {
    pub fn new(pool: PgPool) -> Self {
        Self {
            issue: IssueRepository::new(pool.clone()),
            system_transfer: SystemTransferRepository::new(pool),
        }
    }
}

#[async_trait]
impl Module for BankingModule {
    fn name(&self) -> &'static str {
        "banking"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Messages.into()
    }

    async fn handle_msg(&self, _index: usize, msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
        match msg {
            Msg::BankingIssue(m) => self.issue.insert(&tx.hash, slice::from_ref(m)).await?,
            Msg::BankingSystemTransfer(m) => {
                self.system_transfer
                    .insert(&tx.hash, slice::from_ref(m))
                    .await?
            }
            _ => {}
        }

        Ok(())
    }
}
