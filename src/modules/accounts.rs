use async_trait::async_trait;
use sqlx::PgPool;
use std::slice;

use crate::domain::{Msg, Tx};
use crate::repository::{AccountMigrateRepository, Repository, SetExtraRepository};

use super::{Capabilities, Capability, Module, ModuleError};

/// Persists `vipcoin.chain.accounts` messages
pub struct AccountsModule {
    account_migrate: AccountMigrateRepository,
    set_extra: SetExtraRepository,
}

impl AccountsModule {
    pub fn new(pool: PgPool) -> Self {
        Self {
            account_migrate: AccountMigrateRepository::new(pool.clone()),
            set_extra: SetExtraRepository::new(pool),
        }
    }
}

#[async_trait]
impl Module for AccountsModule {
    fn name(&self) -> &'static str {
        "accounts"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Messages.into()
    }

    async fn handle_msg(&self, _index: usize, msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
        match msg {
            Msg::AccountMigrate(m) => {
                self.account_migrate
                    .insert(&tx.hash, slice::from_ref(m))
                    .await?
            }
            Msg::AccountSetExtra(m) => self.set_extra.insert(&tx.hash, slice::from_ref(m)).await?,
            _ => {}
        }

        Ok(())
    }
}
