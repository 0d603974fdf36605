//! Address extraction

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::Msg;

use super::ModuleError;

/// Extracts the addresses a message involves
pub type AddressParser = Arc<dyn Fn(&Msg) -> Result<Vec<String>, ModuleError> + Send + Sync>;

/// Parser returning every referenced value carrying the account `prefix`
pub fn default_address_parser(prefix: impl Into<String>) -> AddressParser {
    let prefix = prefix.into();

    Arc::new(move |msg: &Msg| {
        Ok(msg
            .referenced_values()
            .into_iter()
            .filter(|value| !value.is_empty() && value.starts_with(&prefix))
            .collect())
    })
}

/// Wrap `parser` so that each address is returned once, at its first
/// occurrence
pub fn unique_addresses_parser(parser: AddressParser) -> AddressParser {
    Arc::new(move |msg: &Msg| parser(msg).map(remove_duplicates))
}

pub fn remove_duplicates(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
