use crate::{transaction::Transaction, Transition};
use alloy_primitives::B256;

/// An execution layer block as consumed by the batch builder.
///
/// The builder only inspects the block number, the block hash and the ordered list of
/// transactions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
    /// The transactions included in the block, in execution order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Returns a new instance of [`Block`].
    pub const fn new(number: u64, hash: B256, transactions: Vec<Transaction>) -> Self {
        Self { number, hash, transactions }
    }

    /// Returns the number of transactions in the block.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Returns true if the block carries no transaction.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Returns the [`Transition`] records of the block, one per transaction.
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.transactions.iter().map(|tx| Transition::new(self.number, self.hash, tx))
    }

    /// Returns the estimated rollup gas cost of including every transaction of the block.
    pub fn rollup_gas_cost(&self) -> u64 {
        self.transactions.iter().map(Transaction::gas_cost).fold(0u64, u64::saturating_add)
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for Block {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let number = u.int_in_range(1..=u32::MAX)? as u64;
        let hash: B256 = u.arbitrary()?;
        let count = u.int_in_range(0..=1)?;
        let transactions =
            (0..count).map(|_| u.arbitrary::<Transaction>()).collect::<arbitrary::Result<_>>()?;
        Ok(Self { number, hash, transactions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, Bytes};

    #[test]
    fn test_block_gas_cost_sums_transactions() {
        let block = Block::new(
            7,
            b256!("0x0000000000000000000000000000000000000000000000000000000000000007"),
            vec![
                Transaction::new(Bytes::from_static(&[1, 2, 3])),
                Transaction::new(Bytes::from_static(&[0])),
            ],
        );

        let expected: u64 = block.transactions.iter().map(Transaction::gas_cost).sum();
        assert_eq!(block.rollup_gas_cost(), expected);
        assert_eq!(block.transaction_count(), 2);
        assert_eq!(block.transitions().count(), 2);
        assert!(block.transitions().all(|t| t.block_number == 7 && t.block_hash == block.hash));
    }

    #[test]
    fn test_empty_block() {
        let block = Block::new(1, B256::ZERO, vec![]);
        assert!(block.is_empty());
        assert_eq!(block.rollup_gas_cost(), 0);
    }
}
