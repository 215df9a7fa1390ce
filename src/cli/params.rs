use std::fmt;
use std::str::FromStr;

use crate::core::{
    DEFAULT_CURRENT_AGE, DEFAULT_DESIRED_INCOME, DEFAULT_INITIAL_CAPITAL, DEFAULT_LIFE_EXPECTANCY,
    DEFAULT_MONTHLY_CONTRIBUTION, DEFAULT_MONTHLY_INFLATION_PERCENT, DEFAULT_MONTHLY_YIELD_PERCENT,
    ParameterError, SimulationParameters,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Field {
    CurrentAge,
    InitialCapital,
    MonthlyInflation,
    MonthlyYield,
    MonthlyContribution,
    DesiredIncome,
    LifeExpectancy,
}

impl Field {
    /// Prompt order.
    pub const ALL: [Field; 7] = [
        Field::CurrentAge,
        Field::InitialCapital,
        Field::MonthlyInflation,
        Field::MonthlyYield,
        Field::MonthlyContribution,
        Field::DesiredIncome,
        Field::LifeExpectancy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::CurrentAge => "current-age",
            Field::InitialCapital => "initial-capital",
            Field::MonthlyInflation => "monthly-inflation",
            Field::MonthlyYield => "monthly-yield",
            Field::MonthlyContribution => "monthly-contribution",
            Field::DesiredIncome => "desired-income",
            Field::LifeExpectancy => "life-expectancy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::CurrentAge => "Current age (years)",
            Field::InitialCapital => "Capital available today",
            Field::MonthlyInflation => "Monthly inflation in % (how much prices rise per month)",
            Field::MonthlyYield => "Monthly yield in % (how much capital grows per month)",
            Field::MonthlyContribution => "Monthly contribution (how much you can invest per month)",
            Field::DesiredIncome => "Desired monthly retirement income (in today's money)",
            Field::LifeExpectancy => "Life expectancy (years)",
        }
    }

    pub fn default_text(self) -> String {
        match self {
            Field::CurrentAge => DEFAULT_CURRENT_AGE.to_string(),
            Field::InitialCapital => format!("{DEFAULT_INITIAL_CAPITAL:.2}"),
            Field::MonthlyInflation => format!("{DEFAULT_MONTHLY_INFLATION_PERCENT:.2}"),
            Field::MonthlyYield => format!("{DEFAULT_MONTHLY_YIELD_PERCENT:.2}"),
            Field::MonthlyContribution => format!("{DEFAULT_MONTHLY_CONTRIBUTION:.2}"),
            Field::DesiredIncome => format!("{DEFAULT_DESIRED_INCOME:.2}"),
            Field::LifeExpectancy => DEFAULT_LIFE_EXPECTANCY.to_string(),
        }
    }

    pub fn prompt(self) -> String {
        format!("{} [default: {}]: ", self.description(), self.default_text())
    }
}

/// Unparsed text for each field; empty text selects the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    pub current_age: String,
    pub initial_capital: String,
    pub monthly_inflation: String,
    pub monthly_yield: String,
    pub monthly_contribution: String,
    pub desired_income: String,
    pub life_expectancy: String,
}

impl RawParameters {
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::CurrentAge => &mut self.current_age,
            Field::InitialCapital => &mut self.initial_capital,
            Field::MonthlyInflation => &mut self.monthly_inflation,
            Field::MonthlyYield => &mut self.monthly_yield,
            Field::MonthlyContribution => &mut self.monthly_contribution,
            Field::DesiredIncome => &mut self.desired_income,
            Field::LifeExpectancy => &mut self.life_expectancy,
        }
    }
}

/// A field whose text did not parse and was replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWarning {
    pub field: Field,
    pub input: String,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value {:?} for {}; using default {}",
            self.input,
            self.field.name(),
            self.field.default_text()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedParameters {
    pub params: SimulationParameters,
    pub warnings: Vec<FieldWarning>,
}

pub fn parse_parameters(raw: &RawParameters) -> Result<ParsedParameters, ParameterError> {
    let mut warnings = Vec::new();
    let current_age = parse_field(
        Field::CurrentAge,
        &raw.current_age,
        DEFAULT_CURRENT_AGE,
        &mut warnings,
    );
    let initial_capital = parse_field(
        Field::InitialCapital,
        &raw.initial_capital,
        DEFAULT_INITIAL_CAPITAL,
        &mut warnings,
    );
    let monthly_inflation = parse_field(
        Field::MonthlyInflation,
        &raw.monthly_inflation,
        DEFAULT_MONTHLY_INFLATION_PERCENT,
        &mut warnings,
    );
    let monthly_yield = parse_field(
        Field::MonthlyYield,
        &raw.monthly_yield,
        DEFAULT_MONTHLY_YIELD_PERCENT,
        &mut warnings,
    );
    let monthly_contribution = parse_field(
        Field::MonthlyContribution,
        &raw.monthly_contribution,
        DEFAULT_MONTHLY_CONTRIBUTION,
        &mut warnings,
    );
    let desired_income = parse_field(
        Field::DesiredIncome,
        &raw.desired_income,
        DEFAULT_DESIRED_INCOME,
        &mut warnings,
    );
    let life_expectancy = parse_field(
        Field::LifeExpectancy,
        &raw.life_expectancy,
        DEFAULT_LIFE_EXPECTANCY,
        &mut warnings,
    );

    let params = SimulationParameters {
        current_age,
        initial_capital,
        monthly_inflation: monthly_inflation / 100.0,
        monthly_yield: monthly_yield / 100.0,
        monthly_contribution,
        desired_income,
        life_expectancy,
    };
    params.validate()?;

    Ok(ParsedParameters { params, warnings })
}

fn parse_field<T: FromStr>(
    field: Field,
    text: &str,
    default: T,
    warnings: &mut Vec<FieldWarning>,
) -> T {
    let text = text.trim();
    if text.is_empty() {
        return default;
    }
    match text.parse() {
        Ok(value) => value,
        Err(_) => {
            let warning = FieldWarning {
                field,
                input: text.to_string(),
            };
            log::info!("{warning}");
            warnings.push(warning);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(field: Field, text: &str) -> RawParameters {
        let mut raw = RawParameters::default();
        *raw.get_mut(field) = text.to_string();
        raw
    }

    #[test]
    fn empty_text_selects_defaults() {
        let parsed = parse_parameters(&RawParameters::default()).expect("defaults are valid");
        assert_eq!(parsed.params, SimulationParameters::default());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn default_text_parses_back_to_defaults() {
        let mut raw = RawParameters::default();
        for field in Field::ALL {
            *raw.get_mut(field) = field.default_text();
        }
        let parsed = parse_parameters(&raw).expect("valid");
        assert_eq!(parsed.params, SimulationParameters::default());
    }

    #[test]
    fn percent_fields_become_fractions() {
        let mut raw = raw_with(Field::MonthlyInflation, "0.5");
        raw.monthly_yield = " 1 ".to_string();

        let parsed = parse_parameters(&raw).expect("valid");
        assert_eq!(parsed.params.monthly_inflation, 0.005);
        assert_eq!(parsed.params.monthly_yield, 0.01);
    }

    #[test]
    fn malformed_text_falls_back_to_default_with_warning() {
        let mut raw = raw_with(Field::LifeExpectancy, "ninety");
        raw.initial_capital = "12k".to_string();

        let parsed = parse_parameters(&raw).expect("defaults are valid");
        assert_eq!(parsed.params.life_expectancy, DEFAULT_LIFE_EXPECTANCY);
        assert_eq!(parsed.params.initial_capital, DEFAULT_INITIAL_CAPITAL);
        assert_eq!(
            parsed.warnings,
            vec![
                FieldWarning {
                    field: Field::InitialCapital,
                    input: "12k".to_string(),
                },
                FieldWarning {
                    field: Field::LifeExpectancy,
                    input: "ninety".to_string(),
                },
            ]
        );
        assert_eq!(
            parsed.warnings[1].to_string(),
            "invalid value \"ninety\" for life-expectancy; using default 87"
        );
    }

    #[test]
    fn fractional_age_is_malformed() {
        let parsed = parse_parameters(&raw_with(Field::CurrentAge, "35.5")).expect("valid");
        assert_eq!(parsed.params.current_age, DEFAULT_CURRENT_AGE);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse_parameters(&raw_with(Field::CurrentAge, "90")).expect_err("age > life");
        assert_eq!(err.field, "life-expectancy");

        let err = parse_parameters(&raw_with(Field::MonthlyContribution, "-1")).expect_err("negative");
        assert_eq!(err.field, "monthly-contribution");

        let err = parse_parameters(&raw_with(Field::MonthlyYield, "-100")).expect_err("total loss");
        assert_eq!(err.field, "monthly-yield");
    }

    #[test]
    fn prompts_show_defaults() {
        assert_eq!(
            Field::MonthlyInflation.prompt(),
            "Monthly inflation in % (how much prices rise per month) [default: 0.30]: "
        );
        assert_eq!(Field::CurrentAge.prompt(), "Current age (years) [default: 35]: ");
    }
}
