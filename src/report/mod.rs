//! Text summary and bar chart for a finished projection.

use std::io::{self, Write};

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::core::{
    HistoryGranularity, HistoryPoint, ProjectionResult, SimulationParameters, age_after,
    inflation_adjusted_income,
};

pub const DEFAULT_BAR_WIDTH: usize = 40;

const BAR_CHAR: char = '█';
const SEPARATOR: &str = "==============================";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementSummary {
    pub months_worked: u32,
    pub years_worked: f64,
    pub retirement_date: NaiveDate,
    pub retirement_age: u32,
    /// Income at retirement in that month's currency.
    pub nominal_income: f64,
    /// Income at retirement in today's currency.
    pub desired_income: f64,
}

impl RetirementSummary {
    pub fn new(params: &SimulationParameters, result: &ProjectionResult, today: NaiveDate) -> Self {
        let months = result.months_worked;
        Self {
            months_worked: months,
            years_worked: f64::from(months) / 12.0,
            retirement_date: add_months(today, months),
            retirement_age: age_after(params, months),
            nominal_income: inflation_adjusted_income(params, months),
            desired_income: params.desired_income,
        }
    }
}

/// Whole calendar months after `date`; day-of-month clamps to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    #[serde(flatten)]
    pub summary: RetirementSummary,
    pub granularity: HistoryGranularity,
    pub history: Vec<HistoryPoint>,
}

impl ProjectionReport {
    pub fn new(params: &SimulationParameters, result: ProjectionResult, today: NaiveDate) -> Self {
        Self {
            summary: RetirementSummary::new(params, &result, today),
            granularity: result.granularity,
            history: result.history,
        }
    }
}

/// Length of a bar for `value` on a scale where `max` fills `width` cells.
pub fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if max == 0.0 {
        return 0;
    }
    // NaN (e.g. infinite requirement on an infinite scale) casts to 0.
    ((value / max) * width as f64).floor().clamp(0.0, width as f64) as usize
}

pub fn draw_bar(value: f64, max: f64, width: usize) -> String {
    std::iter::repeat_n(BAR_CHAR, bar_length(value, max, width)).collect()
}

pub fn write_summary<W: Write>(out: &mut W, summary: &RetirementSummary) -> io::Result<()> {
    writeln!(out, "\n=========== RESULT ===========")?;
    writeln!(out, "Months until retirement: {}", summary.months_worked)?;
    writeln!(out, "Years until retirement: {:.1}", summary.years_worked)?;
    writeln!(
        out,
        "Estimated retirement date: {}",
        summary.retirement_date.format("%d/%m/%Y")
    )?;
    writeln!(out, "Age at retirement: {}", summary.retirement_age)?;
    writeln!(
        out,
        "Initial retirement income (inflation-adjusted): {:.2}",
        summary.nominal_income
    )?;
    writeln!(out, "{SEPARATOR}")
}

fn history_max(history: &[HistoryPoint]) -> f64 {
    history
        .iter()
        .flat_map(|p| [p.capital, p.required_capital])
        .fold(0.0, f64::max)
}

fn row_label(point: &HistoryPoint, granularity: HistoryGranularity) -> String {
    match granularity {
        HistoryGranularity::Yearly if point.month % 12 == 0 => format!("Year  {:>3}", point.period),
        _ => format!("Month {:>3}", point.month),
    }
}

pub fn write_chart<W: Write>(
    out: &mut W,
    result: &ProjectionResult,
    width: usize,
) -> io::Result<()> {
    let max = history_max(&result.history);
    writeln!(
        out,
        "\nCapital vs required capital (each bar proportional to value):"
    )?;
    for point in &result.history {
        writeln!(
            out,
            "{}: Capital {:<width$}  Required {:<width$}",
            row_label(point, result.granularity),
            draw_bar(point.capital, max, width),
            draw_bar(point.required_capital, max, width),
        )?;
        if result.granularity == HistoryGranularity::Monthly
            && point.month % 12 == 0
            && point.month != 0
        {
            writeln!(out)?;
        }
    }
    Ok(())
}
