use crate::Transition;
use alloy_primitives::{keccak256, B256};

/// A transition batch is the unit of submission to L1.
///
/// A batch covers the inclusive block range `[first_block_number, last_block_number]` and holds
/// one [`Transition`] per non-empty block of that range, in block order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionBatch {
    /// The number of the first block folded into the batch.
    pub first_block_number: u64,
    /// The number of the last block folded into the batch.
    pub last_block_number: u64,
    /// The estimated L1 submission gas of the batch, including the fixed overhead buffer.
    pub gas_used: u64,
    /// The transitions of the batch.
    pub transitions: Vec<Transition>,
}

impl TransitionBatch {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the hash of the batch, computed as the keccak256 hash of the concatenated
    /// transition commitments.
    pub fn hash(&self) -> B256 {
        let preimage: Vec<u8> = self
            .transitions
            .iter()
            .flat_map(|transition| transition.commitment().0)
            .collect();
        keccak256(preimage)
    }

    /// Returns the block numbers of the transitions in the batch.
    pub fn block_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.transitions.iter().map(|transition| transition.block_number)
    }

    /// Returns the [`BatchInfo`] summary of the batch.
    pub fn info(&self) -> BatchInfo {
        BatchInfo {
            first_block_number: self.first_block_number,
            last_block_number: self.last_block_number,
            transitions: self.len(),
            gas_used: self.gas_used,
            hash: self.hash(),
        }
    }
}

/// A compact summary of a [`TransitionBatch`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    /// The number of the first block folded into the batch.
    pub first_block_number: u64,
    /// The number of the last block folded into the batch.
    pub last_block_number: u64,
    /// The number of transitions in the batch.
    pub transitions: usize,
    /// The estimated L1 submission gas of the batch.
    pub gas_used: u64,
    /// The hash of the batch.
    pub hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;
    use alloy_primitives::Bytes;

    fn batch(numbers: &[u64]) -> TransitionBatch {
        let transitions: Vec<_> = numbers
            .iter()
            .map(|n| {
                Transition::new(*n, B256::with_last_byte(*n as u8), &Transaction::new(Bytes::new()))
            })
            .collect();
        TransitionBatch {
            first_block_number: numbers[0],
            last_block_number: numbers[numbers.len() - 1],
            gas_used: transitions.iter().map(Transition::gas_cost).sum(),
            transitions,
        }
    }

    #[test]
    fn test_batch_hash_depends_on_order() {
        let a = batch(&[1, 2]);
        let mut b = a.clone();
        b.transitions.reverse();
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_batch_info() {
        let batch = batch(&[4, 5, 6]);
        let info = batch.info();
        assert_eq!(info.first_block_number, 4);
        assert_eq!(info.last_block_number, 6);
        assert_eq!(info.transitions, 3);
        assert_eq!(info.hash, batch.hash());
        assert_eq!(batch.block_numbers().collect::<Vec<_>>(), vec![4, 5, 6]);
    }
}
