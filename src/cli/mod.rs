mod params;
mod prompt;

pub use params::{Field, FieldWarning, ParsedParameters, RawParameters, parse_parameters};
pub use prompt::Prompter;

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::core::{
    DEFAULT_MAX_MONTHS, HistoryGranularity, ProjectionConfig, ProjectionError, run_projection,
};
use crate::report::{
    DEFAULT_BAR_WIDTH, ProjectionReport, RetirementSummary, write_chart, write_summary,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGranularity {
    Yearly,
    Monthly,
}

impl From<CliGranularity> for HistoryGranularity {
    fn from(value: CliGranularity) -> Self {
        match value {
            CliGranularity::Yearly => HistoryGranularity::Yearly,
            CliGranularity::Monthly => HistoryGranularity::Monthly,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "retire",
    about = "Estimates the months until savings can fund a desired retirement income",
    after_help = "Run `retire serve [port]` to expose the projection over HTTP."
)]
pub struct Cli {
    #[arg(long, help = "Current age in years")]
    pub current_age: Option<u32>,
    #[arg(long, help = "Capital available today")]
    pub initial_capital: Option<f64>,
    #[arg(long, help = "Monthly inflation in percent, e.g. 0.3")]
    pub monthly_inflation: Option<f64>,
    #[arg(long, help = "Monthly investment yield in percent, e.g. 0.6")]
    pub monthly_yield: Option<f64>,
    #[arg(long, help = "Amount invested each month, grown with inflation")]
    pub monthly_contribution: Option<f64>,
    #[arg(long, help = "Desired monthly retirement income in today's money")]
    pub desired_income: Option<f64>,
    #[arg(long, help = "Life expectancy in years")]
    pub life_expectancy: Option<u32>,
    #[arg(long, value_enum, default_value_t = CliGranularity::Yearly)]
    pub granularity: CliGranularity,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_MONTHS,
        help = "Give up when no month up to this one is sufficient"
    )]
    pub max_months: u32,
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    pub bar_width: usize,
    #[arg(long, help = "Use defaults instead of prompting for missing values")]
    pub no_prompt: bool,
    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,
}

impl Cli {
    /// Parameters supplied as flags, as raw text; absent flags stay empty.
    pub fn raw_parameters(&self) -> RawParameters {
        fn text<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        RawParameters {
            current_age: text(self.current_age),
            initial_capital: text(self.initial_capital),
            monthly_inflation: text(self.monthly_inflation),
            monthly_yield: text(self.monthly_yield),
            monthly_contribution: text(self.monthly_contribution),
            desired_income: text(self.desired_income),
            life_expectancy: text(self.life_expectancy),
        }
    }

    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            granularity: self.granularity.into(),
            max_months: self.max_months,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn run(cli: &Cli) -> Result<(), RunError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(cli, stdin.lock(), stdout.lock(), Local::now().date_naive())
}

pub fn run_with_io<R: BufRead, W: Write>(
    cli: &Cli,
    input: R,
    output: W,
    today: NaiveDate,
) -> Result<(), RunError> {
    let mut prompter = Prompter::new(input, output);
    let raw = if cli.no_prompt {
        cli.raw_parameters()
    } else {
        prompter.collect(cli.raw_parameters())?
    };
    let mut out = prompter.into_output();

    let parsed = parse_parameters(&raw).map_err(ProjectionError::from)?;
    for warning in &parsed.warnings {
        writeln!(out, "Warning: {warning}")?;
    }

    let params = parsed.params;
    let result = run_projection(&params, cli.projection_config())?;

    if cli.json {
        let report = ProjectionReport::new(&params, result, today);
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    let summary = RetirementSummary::new(&params, &result, today);
    write_summary(&mut out, &summary)?;
    write_chart(&mut out, &result, cli.bar_width)?;
    Ok(())
}
