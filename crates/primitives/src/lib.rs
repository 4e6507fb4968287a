//! Primitive types for the rollup transition batch builder.

pub use block::Block;
mod block;

pub use batch::{BatchInfo, TransitionBatch};
mod batch;

pub use gas::{
    calldata_gas, transition_gas_cost, CALLDATA_NON_ZERO_BYTE_GAS, CALLDATA_ZERO_BYTE_GAS,
    MIN_TRANSITION_GAS, TRANSITION_SLOT_GAS,
};
mod gas;

pub use transaction::{Transaction, Transition};
mod transaction;
