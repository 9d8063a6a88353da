use std::collections::HashMap;

use crate::types::u256;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Addresses widen to words by zero-padding on the left.
impl From<Address> for u256 {
    fn from(address: Address) -> Self {
        let mut bytes = u256::ZERO;
        bytes[32 - 20..].copy_from_slice(&address.0);
        bytes
    }
}

/// Words narrow to addresses by keeping the low 20 bytes.
impl From<u256> for Address {
    fn from(word: u256) -> Self {
        let mut address = Address::default();
        address.0.copy_from_slice(&word[32 - 20..]);
        address
    }
}

/// The read-only snapshot a host hands to `evaluate`.
///
/// Borrowed by every invocation; op handlers never mutate it. Balances of
/// addresses absent from the map are zero.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub origin: Address,
    pub caller: Address,
    pub address: Address,
    pub coinbase: Address,
    pub call_value: u256,
    pub timestamp: u256,
    pub number: u256,
    pub gas_limit: u256,
    pub difficulty: u256,
    pub chain_id: u256,
    pub base_fee: u256,
    pub balances: HashMap<Address, u256>,
    pub call_data: Vec<u8>,
}

impl ExecutionContext {
    pub fn balance(&self, address: &Address) -> u256 {
        self.balances.get(address).copied().unwrap_or(u256::ZERO)
    }

    /// Balance of the executing account itself.
    pub fn self_balance(&self) -> u256 {
        self.balance(&self.address)
    }
}
