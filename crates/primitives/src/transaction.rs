use crate::gas::transition_gas_cost;
use alloy_primitives::{keccak256, Bytes, B256};

/// A transaction carried by an execution layer block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Transaction {
    /// The transaction hash.
    pub hash: B256,
    /// The transaction input payload.
    pub input: Bytes,
}

impl Transaction {
    /// Returns a new [`Transaction`] whose hash is the keccak256 hash of the input.
    pub fn new(input: Bytes) -> Self {
        Self { hash: keccak256(&input), input }
    }

    /// Returns the estimated gas cost of including the transaction in a batch.
    pub fn gas_cost(&self) -> u64 {
        transition_gas_cost(&self.input)
    }
}

/// A state transition record: a single transaction together with the block that executed it.
///
/// Transitions are appended to a batch in block order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Transition {
    /// The number of the block that executed the transaction.
    pub block_number: u64,
    /// The hash of the block that executed the transaction.
    pub block_hash: B256,
    /// The hash of the transaction.
    pub tx_hash: B256,
    /// The transaction input.
    pub input: Bytes,
}

impl Transition {
    /// Returns a new [`Transition`] for the transaction executed in the provided block.
    pub fn new(block_number: u64, block_hash: B256, tx: &Transaction) -> Self {
        Self { block_number, block_hash, tx_hash: tx.hash, input: tx.input.clone() }
    }

    /// Returns the estimated gas cost of including the transition in a batch.
    pub fn gas_cost(&self) -> u64 {
        transition_gas_cost(&self.input)
    }

    /// Returns the commitment to the transition:
    /// `keccak256(block_number_be || block_hash || tx_hash || keccak256(input))`.
    pub fn commitment(&self) -> B256 {
        let mut preimage = Vec::with_capacity(8 + 32 * 3);
        preimage.extend_from_slice(&self.block_number.to_be_bytes());
        preimage.extend_from_slice(self.block_hash.as_slice());
        preimage.extend_from_slice(self.tx_hash.as_slice());
        preimage.extend_from_slice(keccak256(&self.input).as_slice());
        keccak256(preimage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_binds_block_number() {
        let tx = Transaction::new(Bytes::from_static(b"transfer"));
        let a = Transition::new(1, B256::ZERO, &tx);
        let b = Transition::new(2, B256::ZERO, &tx);
        assert_ne!(a.commitment(), b.commitment());
        assert_eq!(a.commitment(), a.clone().commitment());
    }

    #[test]
    fn test_transition_gas_matches_transaction() {
        let tx = Transaction::new(Bytes::from(vec![1u8; 100]));
        let transition = Transition::new(5, B256::ZERO, &tx);
        assert_eq!(transition.gas_cost(), tx.gas_cost());
    }
}
