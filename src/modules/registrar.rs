//! Module registration and dispatch

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Block, GenesisDoc};

use super::{
    unique_addresses_parser, AccountsModule, AddressParser, BankingModule, Capability,
    DispatchError, FeeExcluderModule, MessagesModule, Module, ModuleError, PruningModule,
    StakeModule,
};

/// Shared resources handed to every module at construction
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a Config,
    pub pool: &'a PgPool,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, pool: &'a PgPool) -> Self {
        Self { config, pool }
    }
}

/// Builds the module pipeline
pub struct Registrar {
    parser: AddressParser,
}

impl Registrar {
    /// `parser` is wrapped so that every consumer sees de-duplicated addresses
    pub fn new(parser: AddressParser) -> Self {
        Self {
            parser: unique_addresses_parser(parser),
        }
    }

    pub fn build_modules(&self, ctx: &Context<'_>) -> Modules {
        let pool = ctx.pool.clone();

        let mut modules: Vec<Arc<dyn Module>> = vec![Arc::new(MessagesModule::new(
            self.parser.clone(),
            pool.clone(),
        ))];

        if let Some(keep_recent) = ctx.config.pruning_keep_recent {
            modules.push(Arc::new(PruningModule::new(pool.clone(), keep_recent)));
        }

        modules.push(Arc::new(StakeModule::new(pool.clone())));
        modules.push(Arc::new(BankingModule::new(pool.clone())));
        modules.push(Arc::new(AccountsModule::new(pool.clone())));
        modules.push(Arc::new(FeeExcluderModule::new(pool)));

        Modules::new(modules)
    }
}

/// Ordered module pipeline.
///
/// Every call walks the modules in registration order and skips those that
/// do not declare the matching capability. A failing module is logged and
/// collected; the remaining modules still run.
#[derive(Clone)]
pub struct Modules {
    modules: Arc<[Arc<dyn Module>]>,
}

impl Modules {
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self {
            modules: modules.into(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn with(&self, capability: Capability) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.modules
            .iter()
            .filter(move |m| m.capabilities().contains(capability))
    }

    /// Number of modules declaring `capability`
    pub fn count(&self, capability: Capability) -> usize {
        self.with(capability).count()
    }

    /// Dispatch every message of every successful transaction in `block`
    pub async fn handle_block(&self, block: &Block) -> Result<(), DispatchError> {
        let mut failures: Vec<(&'static str, ModuleError)> = Vec::new();

        for tx in &block.txs {
            if !tx.success {
                tracing::debug!(height = block.height, tx_hash = %tx.hash, "Skipping failed transaction");
                continue;
            }

            for (index, msg) in tx.messages.iter().enumerate() {
                for module in self.with(Capability::Messages) {
                    if let Err(e) = module.handle_msg(index, msg, tx).await {
                        tracing::error!(
                            module = module.name(),
                            height = block.height,
                            tx_hash = %tx.hash,
                            msg_index = index,
                            msg_type = msg.type_url(),
                            error = %e,
                            "Failed to handle message"
                        );
                        failures.push((module.name(), e));
                    }
                }
            }
        }

        DispatchError::check(failures)
    }

    pub async fn run_periodic(&self) -> Result<(), DispatchError> {
        let mut failures = Vec::new();

        for module in self.with(Capability::Periodic) {
            if let Err(e) = module.run_periodic().await {
                tracing::error!(module = module.name(), error = %e, "Periodic operation failed");
                failures.push((module.name(), e));
            }
        }

        DispatchError::check(failures)
    }

    pub async fn handle_genesis(&self, doc: &GenesisDoc) -> Result<(), DispatchError> {
        let mut failures = Vec::new();

        for module in self.with(Capability::Genesis) {
            if let Err(e) = module.handle_genesis(doc).await {
                tracing::error!(module = module.name(), error = %e, "Failed to import genesis");
                failures.push((module.name(), e));
            }
        }

        DispatchError::check(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Msg, MsgBuyRequest, Tx};
    use crate::modules::Capabilities;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        caps: Capabilities,
        fail: bool,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, caps: Capabilities, log: &Log) -> Arc<dyn Module> {
            Arc::new(Self {
                name,
                caps,
                fail: false,
                log: log.clone(),
            })
        }

        fn failing(name: &'static str, caps: Capabilities, log: &Log) -> Arc<dyn Module> {
            Arc::new(Self {
                name,
                caps,
                fail: true,
                log: log.clone(),
            })
        }

        fn record(&self, event: String) -> Result<(), ModuleError> {
            self.log.lock().unwrap().push(event);
            if self.fail {
                return Err(ModuleError::Store(StoreError::internal("forced")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Module for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        async fn handle_msg(&self, index: usize, _msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
            self.record(format!("{}:msg:{}:{}", self.name, tx.hash, index))
        }

        async fn run_periodic(&self) -> Result<(), ModuleError> {
            self.record(format!("{}:periodic", self.name))
        }

        async fn handle_genesis(&self, _doc: &GenesisDoc) -> Result<(), ModuleError> {
            self.record(format!("{}:genesis", self.name))
        }
    }

    fn buy() -> Msg {
        Msg::StakeBuy(MsgBuyRequest {
            creator: "ovg1a".to_string(),
            amount: "1".to_string(),
        })
    }

    fn block() -> Block {
        Block {
            height: 10,
            txs: vec![
                Tx {
                    hash: "A".to_string(),
                    height: 10,
                    success: true,
                    messages: vec![buy(), buy()],
                },
                Tx {
                    hash: "B".to_string(),
                    height: 10,
                    success: false,
                    messages: vec![buy()],
                },
            ],
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_messages_in_registration_order() {
        let log = Log::default();
        let modules = Modules::new(vec![
            Recorder::new("first", Capability::Messages.into(), &log),
            Recorder::new("periodic_only", Capability::Periodic.into(), &log),
            Recorder::new("second", Capability::Messages | Capability::Genesis, &log),
        ]);

        modules.handle_block(&block()).await.unwrap();

        assert_eq!(
            entries(&log),
            vec![
                "first:msg:A:0",
                "second:msg:A:0",
                "first:msg:A:1",
                "second:msg:A:1",
            ]
        );
    }

    #[tokio::test]
    async fn test_only_declared_capabilities_are_called() {
        let log = Log::default();
        let modules = Modules::new(vec![
            Recorder::new("messages", Capability::Messages.into(), &log),
            Recorder::new("pruning", Capability::Periodic.into(), &log),
            Recorder::new("genesis", Capability::Genesis.into(), &log),
        ]);

        modules.run_periodic().await.unwrap();
        modules.handle_genesis(&GenesisDoc::default()).await.unwrap();

        assert_eq!(entries(&log), vec!["pruning:periodic", "genesis:genesis"]);
        assert_eq!(modules.count(Capability::Messages), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_modules() {
        let log = Log::default();
        let modules = Modules::new(vec![
            Recorder::failing("broken", Capability::Periodic.into(), &log),
            Recorder::new("healthy", Capability::Periodic.into(), &log),
        ]);

        let err = modules.run_periodic().await.unwrap_err();

        assert_eq!(entries(&log), vec!["broken:periodic", "healthy:periodic"]);
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].0, "broken");
    }

    #[tokio::test]
    async fn test_build_modules() {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/indexer".to_string()),
            "PRUNING_KEEP_RECENT" => Some("50".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();

        let registrar = Registrar::new(crate::modules::default_address_parser("ovg"));
        let modules = registrar.build_modules(&Context::new(&config, &pool));

        assert_eq!(
            modules.names(),
            vec!["messages", "pruning", "stake", "banking", "accounts", "feeexcluder"]
        );
        assert_eq!(modules.count(Capability::Periodic), 1);
        assert_eq!(modules.count(Capability::Genesis), 1);
    }
}
