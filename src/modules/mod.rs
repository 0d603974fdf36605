//! Module dispatch layer
//!
//! Independently written domain modules are composed into one ordered
//! pipeline. Each module declares the capabilities it implements and the
//! dispatcher only calls those.

mod accounts;
mod banking;
mod feeexcluder;
mod messages;
mod parser;
mod pruning;
mod registrar;
mod stake;

pub use accounts::AccountsModule;
pub use banking::BankingModule;
pub use feeexcluder::FeeExcluderModule;
pub use messages::MessagesModule;
pub use parser::{default_address_parser, remove_duplicates, unique_addresses_parser, AddressParser};
pub use pruning::PruningModule;
pub use registrar::{Context, Modules, Registrar};
pub use stake::StakeModule;

use async_trait::async_trait;
use std::fmt;
use std::ops::BitOr;

use crate::domain::{GenesisDoc, Msg, Tx};
use crate::store::StoreError;

// =========================================================================
// Capabilities
// =========================================================================

/// Role a module can fulfil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Handles every message of every successful transaction
    Messages,
    /// Runs on the periodic scheduler
    Periodic,
    /// Imports its section of the genesis document
    Genesis,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Messages,
        Capability::Periodic,
        Capability::Genesis,
    ];

    fn bit(self) -> u8 {
        match self {
            Capability::Messages => 1,
            Capability::Periodic => 1 << 1,
            Capability::Genesis => 1 << 2,
        }
    }
}

/// Set of capabilities declared by a module
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Capability> for Capabilities {
    fn from(capability: Capability) -> Self {
        Capabilities(capability.bit())
    }
}

impl BitOr for Capability {
    type Output = Capabilities;

    fn bitor(self, rhs: Capability) -> Capabilities {
        Capabilities(self.bit() | rhs.bit())
    }
}

impl BitOr<Capability> for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capability) -> Capabilities {
        Capabilities(self.0 | rhs.bit())
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Capability::ALL.iter().filter(|c| self.contains(**c)))
            .finish()
    }
}

// =========================================================================
// Errors
// =========================================================================

/// Failure of a single module handler
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Address parsing failed: {0}")]
    Parse(String),

    #[error("Invalid genesis state: {0}")]
    Genesis(String),
}

/// Failures collected while dispatching one batch
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{} handler(s) failed: {}", .0.len(), describe(.0))]
    Handlers(Vec<(&'static str, ModuleError)>),
}

fn describe(failures: &[(&'static str, ModuleError)]) -> String {
    failures
        .iter()
        .map(|(module, err)| format!("{module}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DispatchError {
    /// `Ok` when nothing failed
    pub fn check(failures: Vec<(&'static str, ModuleError)>) -> Result<(), DispatchError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Handlers(failures))
        }
    }

    pub fn failures(&self) -> &[(&'static str, ModuleError)] {
        match self {
            DispatchError::Handlers(failures) => failures,
        }
    }
}

// =========================================================================
// Module
// =========================================================================

/// A domain handler plugged into the dispatcher.
///
/// Only the handlers matching `capabilities()` are ever called; the others
/// keep their no-op defaults.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Handle message `index` of the successful transaction `tx`
    async fn handle_msg(&self, _index: usize, _msg: &Msg, _tx: &Tx) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn run_periodic(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn handle_genesis(&self, _doc: &GenesisDoc) -> Result<(), ModuleError> {
        Ok(())
    }
}
