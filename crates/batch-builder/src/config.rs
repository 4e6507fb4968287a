use crate::BatchBuilderError;
use rollup_batch_primitives::MIN_TRANSITION_GAS;
use std::time::Duration;

/// The gas reserved in every batch for the fixed overhead of a submission.
pub const TRANSITION_BATCH_GAS_BUFFER: u64 = 25_000;

/// The default capacity of the block intake queue.
pub const DEFAULT_INTAKE_CAPACITY: usize = 10_000;

/// The default maximum time in milliseconds a batch stays open.
pub const DEFAULT_MAX_BATCH_TIME_MS: u64 = 60_000;

/// The default maximum estimated gas of a batch.
pub const DEFAULT_MAX_BATCH_GAS: u64 = 9_000_000;

/// The default maximum number of transitions in a batch.
pub const DEFAULT_MAX_BATCH_TRANSACTIONS: usize = 100;

/// Configuration for the batch builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchBuilderConfig {
    /// The period of the timer that forces the submission of a non-empty batch.
    max_batch_time: Duration,
    /// The maximum estimated gas of a batch.
    max_batch_gas: u64,
    /// The maximum number of transitions in a batch.
    max_batch_transactions: usize,
    /// The gas every batch reserves for the fixed submission overhead.
    gas_buffer: u64,
    /// The capacity of the block intake queue.
    intake_capacity: usize,
}

impl BatchBuilderConfig {
    /// Creates a new configuration with the provided limits and the default gas buffer and intake
    /// capacity.
    pub const fn new(
        max_batch_time: Duration,
        max_batch_gas: u64,
        max_batch_transactions: usize,
    ) -> Self {
        Self {
            max_batch_time,
            max_batch_gas,
            max_batch_transactions,
            gas_buffer: TRANSITION_BATCH_GAS_BUFFER,
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
        }
    }

    /// Sets the gas buffer.
    pub const fn with_gas_buffer(mut self, gas_buffer: u64) -> Self {
        self.gas_buffer = gas_buffer;
        self
    }

    /// Sets the capacity of the intake queue.
    pub const fn with_intake_capacity(mut self, intake_capacity: usize) -> Self {
        self.intake_capacity = intake_capacity;
        self
    }

    /// Returns the period of the batch timer.
    pub const fn max_batch_time(&self) -> Duration {
        self.max_batch_time
    }

    /// Returns the maximum estimated gas of a batch.
    pub const fn max_batch_gas(&self) -> u64 {
        self.max_batch_gas
    }

    /// Returns the maximum number of transitions in a batch.
    pub const fn max_batch_transactions(&self) -> usize {
        self.max_batch_transactions
    }

    /// Returns the gas buffer.
    pub const fn gas_buffer(&self) -> u64 {
        self.gas_buffer
    }

    /// Returns the capacity of the intake queue.
    pub const fn intake_capacity(&self) -> usize {
        self.intake_capacity
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), BatchBuilderError> {
        if self.max_batch_time.is_zero() {
            return Err(BatchBuilderError::InvalidConfig("max batch time must be non-zero".into()))
        }
        if self.max_batch_transactions == 0 {
            return Err(BatchBuilderError::InvalidConfig(
                "max batch transactions must be non-zero".into(),
            ))
        }
        if self.intake_capacity == 0 {
            return Err(BatchBuilderError::InvalidConfig("intake capacity must be non-zero".into()))
        }
        if self.gas_buffer.saturating_add(MIN_TRANSITION_GAS) > self.max_batch_gas {
            return Err(BatchBuilderError::InvalidConfig(format!(
                "max batch gas {} cannot fit a single transition on top of the gas buffer {}",
                self.max_batch_gas, self.gas_buffer
            )))
        }
        Ok(())
    }
}

impl Default for BatchBuilderConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MAX_BATCH_TIME_MS),
            DEFAULT_MAX_BATCH_GAS,
            DEFAULT_MAX_BATCH_TRANSACTIONS,
        )
    }
}

/// The command line arguments of the batch builder.
#[derive(Debug, Clone, clap::Args)]
pub struct BatchBuilderArgs {
    /// The maximum time in milliseconds a non-empty batch stays open before it is submitted.
    #[arg(
        long = "batch.max-time-ms",
        id = "batch_max_time_ms",
        env = "BATCH_MAX_TIME_MS",
        default_value_t = DEFAULT_MAX_BATCH_TIME_MS
    )]
    pub max_time_ms: u64,
    /// The maximum estimated L1 gas of a batch.
    #[arg(
        long = "batch.max-gas",
        id = "batch_max_gas",
        env = "BATCH_MAX_GAS",
        default_value_t = DEFAULT_MAX_BATCH_GAS
    )]
    pub max_gas: u64,
    /// The maximum number of transitions in a batch.
    #[arg(
        long = "batch.max-transactions",
        id = "batch_max_transactions",
        env = "BATCH_MAX_TRANSACTIONS",
        default_value_t = DEFAULT_MAX_BATCH_TRANSACTIONS
    )]
    pub max_transactions: usize,
    /// The gas reserved in every batch for the fixed submission overhead.
    #[arg(
        long = "batch.gas-buffer",
        id = "batch_gas_buffer",
        env = "BATCH_GAS_BUFFER",
        default_value_t = TRANSITION_BATCH_GAS_BUFFER
    )]
    pub gas_buffer: u64,
    /// The capacity of the block intake queue.
    #[arg(
        long = "batch.intake-capacity",
        id = "batch_intake_capacity",
        env = "BATCH_INTAKE_CAPACITY",
        default_value_t = DEFAULT_INTAKE_CAPACITY
    )]
    pub intake_capacity: usize,
}

impl TryFrom<BatchBuilderArgs> for BatchBuilderConfig {
    type Error = BatchBuilderError;

    fn try_from(args: BatchBuilderArgs) -> Result<Self, Self::Error> {
        let config =
            Self::new(Duration::from_millis(args.max_time_ms), args.max_gas, args.max_transactions)
                .with_gas_buffer(args.gas_buffer)
                .with_intake_capacity(args.intake_capacity);
        config.validate()?;
        Ok(config)
    }
}
