use ethers_core::types::{Address, Bytes, U256};

/// A fully encoded call, ready to broadcast. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPayload {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl CallPayload {
    pub fn new(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }
}
