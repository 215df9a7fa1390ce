use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_CURRENT_AGE: u32 = 35;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 140_000.0;
pub const DEFAULT_MONTHLY_INFLATION_PERCENT: f64 = 0.3;
pub const DEFAULT_MONTHLY_YIELD_PERCENT: f64 = 0.6;
pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 1_000.0;
pub const DEFAULT_DESIRED_INCOME: f64 = 1_000.0;
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 87;

/// Oldest accepted life expectancy; bounds the payout horizon of every step.
pub const MAX_LIFE_EXPECTANCY: u32 = 150;

/// Upper bound on simulated months before a projection is declared divergent.
pub const DEFAULT_MAX_MONTHS: u32 = 1_200;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryGranularity {
    #[default]
    Yearly,
    Monthly,
}

impl HistoryGranularity {
    /// Whether a non-final month is kept in the history.
    pub fn records(self, month: u32) -> bool {
        match self {
            HistoryGranularity::Yearly => month % 12 == 0,
            HistoryGranularity::Monthly => true,
        }
    }

    pub fn period(self, month: u32) -> u32 {
        match self {
            HistoryGranularity::Yearly => month / 12,
            HistoryGranularity::Monthly => month,
        }
    }
}

/// Inputs of one projection. Rates are monthly decimal fractions (0.003 = 0.3%).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    pub current_age: u32,
    pub initial_capital: f64,
    pub monthly_inflation: f64,
    pub monthly_yield: f64,
    pub monthly_contribution: f64,
    pub desired_income: f64,
    pub life_expectancy: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            monthly_inflation: DEFAULT_MONTHLY_INFLATION_PERCENT / 100.0,
            monthly_yield: DEFAULT_MONTHLY_YIELD_PERCENT / 100.0,
            monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
            desired_income: DEFAULT_DESIRED_INCOME,
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
        }
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        non_negative_amount("initial-capital", self.initial_capital)?;
        non_negative_amount("monthly-contribution", self.monthly_contribution)?;
        non_negative_amount("desired-income", self.desired_income)?;
        rate_above_total_loss("monthly-inflation", self.monthly_inflation)?;
        rate_above_total_loss("monthly-yield", self.monthly_yield)?;

        if self.life_expectancy < self.current_age {
            return Err(ParameterError::new(
                "life-expectancy",
                "must be >= current-age",
            ));
        }
        if self.life_expectancy > MAX_LIFE_EXPECTANCY {
            return Err(ParameterError::new(
                "life-expectancy",
                format!("must be <= {MAX_LIFE_EXPECTANCY}"),
            ));
        }
        Ok(())
    }
}

fn non_negative_amount(field: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ParameterError::new(field, "must be a finite amount >= 0"));
    }
    Ok(())
}

fn rate_above_total_loss(field: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() || value <= -1.0 {
        return Err(ParameterError::new(field, "must be a finite rate above -100%"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    pub granularity: HistoryGranularity,
    pub max_months: u32,
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_months == 0 {
            return Err(ParameterError::new("max-months", "must be > 0"));
        }
        Ok(())
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            granularity: HistoryGranularity::Yearly,
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub month: u32,
    pub period: u32,
    pub capital: f64,
    pub required_capital: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectionResult {
    pub months_worked: u32,
    pub granularity: HistoryGranularity,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid --{field}: {reason}")]
pub struct ParameterError {
    pub field: &'static str,
    pub reason: String,
}

impl ParameterError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
    #[error("projection did not converge within {max_months} months")]
    DidNotConverge { max_months: u32 },
}
