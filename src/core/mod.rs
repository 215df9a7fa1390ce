mod engine;
mod types;

pub use engine::{
    MonthSnapshot, ProjectionState, Step, age_after, inflation_adjusted_income, required_capital,
    retirement_months_remaining, run_projection, step,
};
pub use types::{
    DEFAULT_CURRENT_AGE, DEFAULT_DESIRED_INCOME, DEFAULT_INITIAL_CAPITAL, DEFAULT_LIFE_EXPECTANCY,
    DEFAULT_MAX_MONTHS, DEFAULT_MONTHLY_CONTRIBUTION, DEFAULT_MONTHLY_INFLATION_PERCENT,
    DEFAULT_MONTHLY_YIELD_PERCENT, HistoryGranularity, HistoryPoint, MAX_LIFE_EXPECTANCY,
    ParameterError, ProjectionConfig, ProjectionError, ProjectionResult, SimulationParameters,
};
