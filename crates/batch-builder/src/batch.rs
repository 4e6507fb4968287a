use rollup_batch_primitives::{Block, Transition, TransitionBatch, MIN_TRANSITION_GAS};

/// The reason a block was not added to the [`ActiveBatch`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddTransitionError {
    /// The batch already holds the maximum number of transitions.
    #[error("transaction limit reached")]
    TransactionLimitReached,
    /// Adding the block would push the batch above the gas limit.
    #[error("gas limit reached")]
    GasLimitReached,
}

/// The batch currently being accumulated by the builder.
///
/// The batch covers the inclusive block range `[first_block_number, last_block_number]`. Empty
/// blocks extend the range without adding a transition, so a batch with a non-empty range can
/// still be empty.
#[derive(Debug, Clone)]
pub struct ActiveBatch {
    /// The number of the first block folded into the batch.
    first_block_number: Option<u64>,
    /// The number of the last block folded into the batch.
    last_block_number: Option<u64>,
    /// The estimated gas used by the batch, seeded with the fixed overhead buffer.
    gas_used: u64,
    /// The transitions of the batch, in block order.
    transitions: Vec<Transition>,
}

impl ActiveBatch {
    /// Returns a new empty [`ActiveBatch`] whose gas usage is seeded with `gas_buffer`.
    pub const fn new(gas_buffer: u64) -> Self {
        Self {
            first_block_number: None,
            last_block_number: None,
            gas_used: gas_buffer,
            transitions: Vec::new(),
        }
    }

    /// Returns true if the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns the estimated gas used by the batch.
    pub const fn gas_used(&self) -> u64 {
        self.gas_used
    }

    /// Returns the number of the first block folded into the batch.
    pub const fn first_block_number(&self) -> Option<u64> {
        self.first_block_number
    }

    /// Returns the number of the last block folded into the batch.
    pub const fn last_block_number(&self) -> Option<u64> {
        self.last_block_number
    }

    /// Returns the transitions of the batch.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Attempts to add the transitions of the block to the batch.
    ///
    /// The limits are checked before the batch is modified, a rejected block leaves the batch
    /// untouched. The caller is responsible for feeding blocks in order.
    pub fn try_add(
        &mut self,
        block: &Block,
        max_gas: u64,
        max_transactions: usize,
    ) -> Result<(), AddTransitionError> {
        if self.transitions.len() + block.transaction_count() > max_transactions {
            return Err(AddTransitionError::TransactionLimitReached)
        }

        let block_gas = block.rollup_gas_cost();
        if self.gas_used.saturating_add(block_gas) > max_gas {
            return Err(AddTransitionError::GasLimitReached)
        }

        self.transitions.extend(block.transitions());
        self.gas_used += block_gas;
        self.extend_range(block.number);

        Ok(())
    }

    /// Extends the block range of the batch with an empty block.
    pub fn add_empty_block(&mut self, block_number: u64) {
        self.extend_range(block_number);
    }

    /// Returns true if the batch cannot take another transition of minimal size without
    /// exceeding one of the limits.
    pub fn is_full(&self, max_gas: u64, max_transactions: usize) -> bool {
        self.transitions.len() >= max_transactions ||
            self.gas_used.saturating_add(MIN_TRANSITION_GAS) > max_gas
    }

    /// Seals the batch into a [`TransitionBatch`]. Returns `None` if the batch is empty.
    pub fn seal(self) -> Option<TransitionBatch> {
        if self.is_empty() {
            return None
        }

        Some(TransitionBatch {
            first_block_number: self.first_block_number?,
            last_block_number: self.last_block_number?,
            gas_used: self.gas_used,
            transitions: self.transitions,
        })
    }

    /// Returns an [`ActiveBatchInfo`] snapshot of the batch.
    pub fn info(&self) -> ActiveBatchInfo {
        ActiveBatchInfo {
            first_block_number: self.first_block_number,
            last_block_number: self.last_block_number,
            transitions: self.transitions.len(),
            gas_used: self.gas_used,
        }
    }

    fn extend_range(&mut self, block_number: u64) {
        self.first_block_number.get_or_insert(block_number);
        self.last_block_number = Some(block_number);
    }
}

/// A snapshot of the [`ActiveBatch`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ActiveBatchInfo {
    /// The number of the first block folded into the batch.
    pub first_block_number: Option<u64>,
    /// The number of the last block folded into the batch.
    pub last_block_number: Option<u64>,
    /// The number of transitions in the batch.
    pub transitions: usize,
    /// The estimated gas used by the batch.
    pub gas_used: u64,
}
