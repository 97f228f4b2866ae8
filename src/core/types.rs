use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ProjectionError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Inputs for one projection run. Rates are decimal fractions (7% = 0.07).
///
/// `employer_match_rate` and `employer_match_cap` are conventionally in
/// `[0, 1]`; the engine does not enforce that range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_investment: f64,
    pub annual_interest_rate: f64,
    pub annual_fee_rate: f64,
    pub years: u32,
    pub monthly_contribution: f64,
    pub yearly_salary: f64,
    /// Fraction of salary the employer contributes at most per year.
    pub employer_match_rate: f64,
    /// Employer dollars matched per employee dollar contributed.
    pub employer_match_cap: f64,
    pub annual_lump_sum: f64,
}

impl SimulationParameters {
    pub fn max_employer_annual_match(&self) -> f64 {
        self.employer_match_rate * self.yearly_salary
    }

    /// Same parameters with the fee rate forced to zero.
    pub fn without_fees(&self) -> Self {
        Self {
            annual_fee_rate: 0.0,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRates {
    pub monthly_interest_rate: f64,
    pub monthly_fee_rate: f64,
    pub net_monthly_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_employee_contributions: f64,
    pub total_employer_contributions: f64,
    pub total_interest_earned: f64,
    pub total_fees_paid: f64,
    pub final_balance: f64,
    pub final_balance_without_fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// End-of-year balances on the with-fee track; index 0 is year 1.
    pub yearly_balances: Vec<f64>,
    pub summary: SimulationSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub balance_with_fees: f64,
    pub balance_without_fees: f64,
    pub fees_to_date: f64,
    pub employee_contributions: f64,
    pub employer_contributions: f64,
    pub total_contributions: f64,
}
