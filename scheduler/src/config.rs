use chrono::NaiveDate;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::calendar::Group;

/// The five soft-penalty weights of spec §4.4, tunable without touching the
/// builder itself. Defaults match the spec's own weight table.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PenaltyWeights {
    #[serde(default = "PenaltyWeights::default_leader_day_consecutive")]
    pub leader_day_consecutive: u32,
    #[serde(default = "PenaltyWeights::default_late_gap_violation")]
    pub late_gap_violation: u32,
    #[serde(default = "PenaltyWeights::default_day_gap_violation")]
    pub day_gap_violation: u32,
    #[serde(default = "PenaltyWeights::default_two_month_spread")]
    pub two_month_spread: u32,
    #[serde(default = "PenaltyWeights::default_random_tiebreak")]
    pub random_tiebreak: u32,
}

impl PenaltyWeights {
    fn default_leader_day_consecutive() -> u32 {
        1000
    }
    fn default_late_gap_violation() -> u32 {
        500
    }
    fn default_day_gap_violation() -> u32 {
        500
    }
    fn default_two_month_spread() -> u32 {
        200
    }
    fn default_random_tiebreak() -> u32 {
        1
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            leader_day_consecutive: Self::default_leader_day_consecutive(),
            late_gap_violation: Self::default_late_gap_violation(),
            day_gap_violation: Self::default_day_gap_violation(),
            two_month_spread: Self::default_two_month_spread(),
            random_tiebreak: Self::default_random_tiebreak(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    #[serde(default = "SolverSettings::default_max_time")]
    pub max_time_in_seconds: u64,
    #[serde(default)]
    pub penalty_weights: PenaltyWeights,
    #[serde(default)]
    pub default_seed: Option<u64>,
}

impl SolverSettings {
    fn default_max_time() -> u64 {
        45
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_time_in_seconds: Self::default_max_time(),
            penalty_weights: PenaltyWeights::default(),
            default_seed: None,
        }
    }
}

/// The anchor date/group pair is, per the glossary, "a fixed operator-chosen
/// constant" rather than a per-request field — it lives here alongside the
/// solver tuning knobs instead of in `SolveRequest`.
#[derive(Debug, Deserialize, Clone)]
pub struct AnchorSettings {
    pub anchor_date: NaiveDate,
    pub anchor_group: Group,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub anchor: AnchorSettings,
    #[serde(default)]
    pub solver: SolverSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn max_time_in_seconds(&self) -> u64 {
        self.solver.max_time_in_seconds
    }

    pub fn penalty_weights(&self) -> PenaltyWeights {
        self.solver.penalty_weights
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.solver.default_seed
    }
}
