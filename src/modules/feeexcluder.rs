//! Fee excluder module
//!
//! Persists tariff messages and imports the genesis tariffs and stats.

use async_trait::async_trait;
use sqlx::PgPool;
use std::slice;

use crate::domain::{FeeExcluderGenesis, GenesisDoc, Msg, Tx};
use crate::repository::{
    CreateTariffsRepository, DeleteTariffsRepository, Repository, StatsRepository,
    TariffRepository,
};
use crate::store::UnitOfWork;

use super::{Capabilities, Capability, Module, ModuleError};

/// `app_state` key of the module's genesis section
const GENESIS_KEY: &str = "feeexcluder";

pub struct FeeExcluderModule {
    pool: PgPool,
    create_tariffs: CreateTariffsRepository,
    delete_tariffs: DeleteTariffsRepository,
    tariffs: TariffRepository,
    stats: StatsRepository,
}

impl FeeExcluderModule {
    pub fn new(pool: PgPool) -> Self {
        Self {
            create_tariffs: CreateTariffsRepository::new(pool.clone()),
            delete_tariffs: DeleteTariffsRepository::new(pool.clone()),
            tariffs: TariffRepository::new(pool.clone()),
            stats: StatsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Module for FeeExcluderModule {
    fn name(&self) -> &'static str {
        "feeexcluder"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Messages | Capability::Genesis
    }

    async fn handle_msg(&self, _index: usize, msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
        match msg {
            Msg::FeeExcluderCreateTariffs(m) => {
                self.create_tariffs
                    .insert(&tx.hash, slice::from_ref(m))
                    .await?
            }
            Msg::FeeExcluderDeleteTariffs(m) => {
                self.delete_tariffs
                    .insert(&tx.hash, slice::from_ref(m))
                    .await?
            }
            _ => {}
        }

        Ok(())
    }

    /// Tariffs and stats are imported in one transaction
    async fn handle_genesis(&self, doc: &GenesisDoc) -> Result<(), ModuleError> {
        let state: FeeExcluderGenesis = match doc.module_state(GENESIS_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => return Ok(()),
            Err(e) => return Err(ModuleError::Genesis(e.to_string())),
        };

        let mut uow = UnitOfWork::begin(&self.pool, None).await?;

        for tariff in &state.tariffs {
            self.tariffs.insert_tariff(Some(uow.tx()), tariff).await?;
        }
        for stats in &state.stats {
            self.stats.insert_stats(Some(uow.tx()), stats).await?;
        }

        uow.commit().await?;

        tracing::info!(
            tariffs = state.tariffs.len(),
            stats = state.stats.len(),
            "Imported fee excluder genesis"
        );
        Ok(())
    }
}
