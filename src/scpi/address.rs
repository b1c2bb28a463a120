//! Instrument addressing.
//!
//! An instrument is reached either by an explicit address string (USBTMC
//! resource or `IP:`-form host) or by a small-integer selector resolved
//! through a table. Resolution happens exactly once, when the client is
//! built, so a handle never changes address over its lifetime.

use std::collections::HashMap;

use crate::error::ScpiError;

/// Mapping of small-integer selectors to address strings.
pub type SelectorTable = HashMap<u32, String>;

/// Either a raw address string or a selector key into a [`SelectorTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentAddress {
    Direct(String),
    Selector(u32),
}

impl InstrumentAddress {
    /// Resolve to an address string. Fails with
    /// [`ScpiError::AddressResolution`] if the selector is absent from the
    /// table.
    pub fn resolve(&self, table: &SelectorTable) -> Result<String, ScpiError> {
        match self {
            InstrumentAddress::Direct(addr) => Ok(addr.clone()),
            InstrumentAddress::Selector(key) => table
                .get(key)
                .cloned()
                .ok_or(ScpiError::AddressResolution(*key)),
        }
    }
}

impl From<&str> for InstrumentAddress {
    fn from(value: &str) -> Self {
        InstrumentAddress::Direct(value.to_string())
    }
}

impl From<String> for InstrumentAddress {
    fn from(value: String) -> Self {
        InstrumentAddress::Direct(value)
    }
}

impl From<u32> for InstrumentAddress {
    fn from(value: u32) -> Self {
        InstrumentAddress::Selector(value)
    }
}

/// Default selector table for the bench function generators.
pub fn fgen_selectors() -> SelectorTable {
    [(1, "USB0::2391::8967::INSTR".to_string())].into()
}

/// Default selector table for the bench oscilloscopes.
pub fn oscilloscope_selectors() -> SelectorTable {
    [(1, "IP:192.168.3.220".to_string())].into()
}
