//! Pruning module
//!
//! Periodically drops stored messages that fall outside the retention window.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::repository::MessageRepository;

use super::{Capabilities, Capability, Module, ModuleError};

pub struct PruningModule {
    messages: MessageRepository,
    keep_recent: i64,
}

impl PruningModule {
    pub fn new(pool: PgPool, keep_recent: i64) -> Self {
        Self {
            messages: MessageRepository::new(pool),
            keep_recent,
        }
    }
}

/// Lowest height to keep, if anything below it can go
fn prune_height(latest: i64, keep_recent: i64) -> Option<i64> {
    let cutoff = latest - keep_recent + 1;
    (cutoff > 0).then_some(cutoff)
}

#[async_trait]
impl Module for PruningModule {
    fn name(&self) -> &'static str {
        "pruning"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Periodic.into()
    }

    async fn run_periodic(&self) -> Result<(), ModuleError> {
        let Some(latest) = self.messages.latest_height().await? else {
            return Ok(());
        };

        let Some(cutoff) = prune_height(latest, self.keep_recent) else {
            return Ok(());
        };

        let removed = self.messages.prune_below(cutoff).await?;
        if removed > 0 {
            tracing::info!(
                rows_deleted = removed,
                below_height = cutoff,
                "Pruned old messages"
            );
        }

        Ok(())
    }
}
