use super::types::{
    HistoryPoint, ProjectionConfig, ProjectionError, ProjectionResult, SimulationParameters,
};

/// Balances carried from one simulated month to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    pub months_worked: u32,
    pub capital: f64,
    pub contribution: f64,
}

impl ProjectionState {
    pub fn initial(params: &SimulationParameters) -> Self {
        Self {
            months_worked: 0,
            capital: params.initial_capital,
            contribution: params.monthly_contribution,
        }
    }
}

/// Capital on hand versus capital needed, evaluated at one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSnapshot {
    pub month: u32,
    pub capital: f64,
    pub required_capital: f64,
}

impl MonthSnapshot {
    pub fn is_sufficient(&self) -> bool {
        self.capital >= self.required_capital
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Continue {
        snapshot: MonthSnapshot,
        next: ProjectionState,
    },
    Done {
        snapshot: MonthSnapshot,
    },
}

/// Present value of `months_remaining` withdrawals discounted at `yield_rate`,
/// each one `inflation_rate` larger than the last.
pub fn required_capital(
    initial_withdrawal: f64,
    months_remaining: i64,
    yield_rate: f64,
    inflation_rate: f64,
) -> f64 {
    let mut total = 0.0;
    let mut withdrawal = initial_withdrawal;
    for m in 0..months_remaining.max(0) {
        total += withdrawal / (1.0 + yield_rate).powf((m + 1) as f64);
        withdrawal *= 1.0 + inflation_rate;
    }
    total
}

pub fn age_after(params: &SimulationParameters, months: u32) -> u32 {
    params.current_age + months / 12
}

/// Desired income in nominal terms of the month `months` from now.
pub fn inflation_adjusted_income(params: &SimulationParameters, months: u32) -> f64 {
    params.desired_income * (1.0 + params.monthly_inflation).powf(months as f64)
}

/// Payout months left if retirement started `months` from now. Negative once
/// the simulated age passes life expectancy.
pub fn retirement_months_remaining(params: &SimulationParameters, months: u32) -> i64 {
    (i64::from(params.life_expectancy) - i64::from(age_after(params, months))) * 12
}

pub fn step(params: &SimulationParameters, state: &ProjectionState) -> Step {
    let month = state.months_worked;
    let required = required_capital(
        inflation_adjusted_income(params, month),
        retirement_months_remaining(params, month),
        params.monthly_yield,
        params.monthly_inflation,
    );
    let snapshot = MonthSnapshot {
        month,
        capital: state.capital,
        required_capital: required,
    };

    if snapshot.is_sufficient() {
        return Step::Done { snapshot };
    }

    Step::Continue {
        snapshot,
        next: ProjectionState {
            months_worked: month + 1,
            capital: state.capital * (1.0 + params.monthly_yield) + state.contribution,
            contribution: state.contribution * (1.0 + params.monthly_inflation),
        },
    }
}

pub fn run_projection(
    params: &SimulationParameters,
    config: ProjectionConfig,
) -> Result<ProjectionResult, ProjectionError> {
    params.validate()?;
    config.validate()?;

    let granularity = config.granularity;
    let record = |snapshot: MonthSnapshot| HistoryPoint {
        month: snapshot.month,
        period: granularity.period(snapshot.month),
        capital: snapshot.capital,
        required_capital: snapshot.required_capital,
    };

    let mut history = Vec::new();
    let mut state = ProjectionState::initial(params);
    loop {
        match step(params, &state) {
            Step::Done { snapshot } => {
                history.push(record(snapshot));
                log::info!(
                    "capital {:.2} covers requirement {:.2} after {} months",
                    snapshot.capital,
                    snapshot.required_capital,
                    snapshot.month
                );
                return Ok(ProjectionResult {
                    months_worked: snapshot.month,
                    granularity,
                    history,
                });
            }
            Step::Continue { snapshot, next } => {
                if granularity.records(snapshot.month) {
                    log::debug!(
                        "month {}: capital {:.2}, required {:.2}",
                        snapshot.month,
                        snapshot.capital,
                        snapshot.required_capital
                    );
                    history.push(record(snapshot));
                }
                if next.months_worked > config.max_months {
                    return Err(ProjectionError::DidNotConverge {
                        max_months: config.max_months,
                    });
                }
                state = next;
            }
        }
    }
}
