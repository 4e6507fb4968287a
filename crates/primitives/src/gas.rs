//! The cost model used to estimate the L1 submission gas of a transition.
//!
//! Every transition record occupies one storage slot in the batch commitment and carries its
//! transaction input as calldata. The estimate therefore mirrors L1 calldata pricing: a fixed
//! per-slot write cost plus a per-byte cost that is higher for non-zero bytes. The estimate is
//! deterministic and monotonic in the payload size.

/// The gas charged for writing one transition record.
pub const TRANSITION_SLOT_GAS: u64 = 20_000;

/// The gas charged for every non-zero byte of transition input.
pub const CALLDATA_NON_ZERO_BYTE_GAS: u64 = 16;

/// The gas charged for every zero byte of transition input.
pub const CALLDATA_ZERO_BYTE_GAS: u64 = 4;

/// The gas cost of the smallest possible transition, i.e. one with an empty input.
pub const MIN_TRANSITION_GAS: u64 = TRANSITION_SLOT_GAS;

/// Returns the calldata gas for the provided bytes.
pub fn calldata_gas(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, byte| {
        let cost = if *byte == 0 { CALLDATA_ZERO_BYTE_GAS } else { CALLDATA_NON_ZERO_BYTE_GAS };
        acc.saturating_add(cost)
    })
}

/// Returns the estimated gas cost of including a transition with the provided input in a batch.
pub fn transition_gas_cost(input: &[u8]) -> u64 {
    TRANSITION_SLOT_GAS.saturating_add(calldata_gas(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_costs_one_slot() {
        assert_eq!(transition_gas_cost(&[]), MIN_TRANSITION_GAS);
    }

    #[test]
    fn test_zero_and_non_zero_bytes_are_priced_differently() {
        let input = [0u8, 1, 0, 255];
        assert_eq!(calldata_gas(&input), 2 * CALLDATA_ZERO_BYTE_GAS + 2 * CALLDATA_NON_ZERO_BYTE_GAS);
        assert_eq!(transition_gas_cost(&input), TRANSITION_SLOT_GAS + 40);
    }

    #[test]
    fn test_cost_is_monotonic_in_payload_size() {
        let mut previous = transition_gas_cost(&[]);
        for len in 1..64 {
            let cost = transition_gas_cost(&vec![0u8; len]);
            assert!(cost > previous);
            previous = cost;
        }
    }
}
