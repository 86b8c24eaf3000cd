use std::env;

/// Which direction a `RelayerInstance` drives messages. Two symmetric
/// instances exist per spec.md §2; they differ only in store, destination
/// contract, and gas-limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    L1ToL2,
    L2ToL1,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::L1ToL2 => "l1_to_l2",
            Direction::L2ToL1 => "l2_to_l1",
        }
    }
}

/// Configuration for one directional relayer instance. Loaded from the
/// environment in the teacher's `Config::from_env` idiom
/// (`std::env::var` + `unwrap_or_else` defaults), field-for-field against
/// spec.md §6.
#[derive(Debug, Clone)]
pub struct Config {
    pub direction: Direction,
    pub database_url: String,
    pub scan_batch: usize,
    pub min_gas_limit: u64,
    pub min_base_fee: u64,
    pub base_fee_diff_ppm: u64,
    pub messenger_contract: [u8; 20],
    pub gas_oracle_contract: [u8; 20],
    pub scan_interval_ms: u64,
    pub oracle_interval_ms: u64,
}

fn parse_address(env_var: &str, default: &str) -> [u8; 20] {
    let value = env::var(env_var).unwrap_or_else(|_| default.into());
    let hex_str = value.trim_start_matches("0x");
    let mut out = [0u8; 20];
    if let Ok(bytes) = hex::decode(hex_str) {
        let len = bytes.len().min(20);
        out[..len].copy_from_slice(&bytes[..len]);
    }
    out
}

impl Config {
    /// Field defaults match spec.md §6 exactly:
    /// `scan_batch` 100, `min_gas_limit_l1_to_l2` 130_000,
    /// `min_gas_limit_l2_to_l1` 200_000, `min_base_fee` 0,
    /// `base_fee_diff_ppm` 50_000 (5%).
    pub fn from_env(direction: Direction) -> Self {
        let prefix = match direction {
            Direction::L1ToL2 => "L1_TO_L2",
            Direction::L2ToL1 => "L2_TO_L1",
        };
        let default_min_gas_limit = match direction {
            Direction::L1ToL2 => 130_000,
            Direction::L2ToL1 => 200_000,
        };

        Self {
            direction,
            database_url: env::var(format!("{prefix}_DATABASE_URL"))
                .unwrap_or_else(|_| "sqlite::memory:".into()),
            scan_batch: env::var(format!("{prefix}_SCAN_BATCH"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            min_gas_limit: env::var(format!("{prefix}_MIN_GAS_LIMIT"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_min_gas_limit),
            min_base_fee: env::var(format!("{prefix}_MIN_BASE_FEE"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            base_fee_diff_ppm: env::var(format!("{prefix}_BASE_FEE_DIFF_PPM"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50_000),
            messenger_contract: parse_address(
                &format!("{prefix}_MESSENGER_CONTRACT"),
                "0x0000000000000000000000000000000000000000",
            ),
            gas_oracle_contract: parse_address(
                &format!("{prefix}_GAS_ORACLE_CONTRACT"),
                "0x0000000000000000000000000000000000000000",
            ),
            scan_interval_ms: env::var(format!("{prefix}_SCAN_INTERVAL_MS"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
            oracle_interval_ms: env::var(format!("{prefix}_ORACLE_INTERVAL_MS"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }
}
