//! Messages module
//!
//! Stores every handled message with the addresses it involves.

use async_trait::async_trait;
use sqlx::PgPool;
use std::slice;

use crate::domain::{Msg, Tx};
use crate::repository::{MessageRepository, Repository, StoredMessage};

use super::{AddressParser, Capabilities, Capability, Module, ModuleError};

pub struct MessagesModule {
    parser: AddressParser,
    repository: MessageRepository,
}

impl MessagesModule {
    pub fn new(parser: AddressParser, pool: PgPool) -> Self {
        Self {
            parser,
            repository: MessageRepository::new(pool),
        }
    }

    fn to_stored(&self, index: usize, msg: &Msg, tx: &Tx) -> Result<StoredMessage, ModuleError> {
        let index = i32::try_from(index)
            .map_err(|_| ModuleError::Parse(format!("message index {index} out of range")))?;

        Ok(StoredMessage {
            tx_hash: tx.hash.clone(),
            index,
            msg_type: msg.type_url().to_string(),
            involved_addresses: (self.parser)(msg)?,
            height: tx.height,
        })
    }
}

#[async_trait]
impl Module for MessagesModule {
    fn name(&self) -> &'static str {
        "messages"
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Messages.into()
    }

    async fn handle_msg(&self, index: usize, msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
        let stored = self.to_stored(index, msg, tx)?;
        self.repository
            .insert(&tx.hash, slice::from_ref(&stored))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MsgTransferFromUser;
    use crate::modules::{default_address_parser, unique_addresses_parser};

    #[tokio::test]
    async fn test_stored_message_has_unique_addresses() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/indexer")
            .unwrap();
        let module = MessagesModule::new(
            unique_addresses_parser(default_address_parser("ovg")),
            pool,
        );

        let msg = Msg::StakeTransferFromUser(MsgTransferFromUser {
            creator: "ovg1same".to_string(),
            amount: "5".to_string(),
            address: "ovg1same".to_string(),
        });
        let tx = Tx {
            hash: "HASH".to_string(),
            height: 42,
            success: true,
            messages: vec![msg.clone()],
        };

        let stored = module.to_stored(0, &msg, &tx).unwrap();

        assert_eq!(stored.involved_addresses, vec!["ovg1same"]);
        assert_eq!(stored.msg_type, "/overgold.stake.MsgTransferFromUser");
        assert_eq!(stored.height, 42);
    }
}
