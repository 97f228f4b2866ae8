use super::types::{
    MonthlyRates, ProjectionError, ProjectionYear, SimulationParameters, SimulationResult,
    SimulationSummary,
};

const MONTHS_PER_YEAR: u32 = 12;

/// One balance compounding at a fixed monthly growth factor.
#[derive(Debug, Clone, Copy)]
struct Track {
    balance: f64,
    growth_factor: f64,
}

impl Track {
    fn new(initial: f64, monthly_rate: f64) -> Self {
        Self {
            balance: initial,
            growth_factor: 1.0 + monthly_rate,
        }
    }

    fn deposit(&mut self, amount: f64) {
        self.balance += amount;
    }

    fn grow(&mut self) {
        self.balance *= self.growth_factor;
    }
}

/// Employer contributions within the current year, bounded by the annual ceiling.
#[derive(Debug)]
struct EmployerMatch {
    annual_ceiling: f64,
    cap_per_dollar: f64,
    accumulated: f64,
}

impl EmployerMatch {
    fn new(params: &SimulationParameters) -> Self {
        Self {
            annual_ceiling: params.max_employer_annual_match(),
            cap_per_dollar: params.employer_match_cap,
            accumulated: 0.0,
        }
    }

    fn start_year(&mut self) {
        self.accumulated = 0.0;
    }

    fn match_contribution(&mut self, employee_contribution: f64) -> f64 {
        let potential = employee_contribution * self.cap_per_dollar;
        let remaining = (self.annual_ceiling - self.accumulated).max(0.0);
        let matched = potential.min(remaining);
        self.accumulated += matched;
        matched
    }
}

#[derive(Debug)]
struct Projection {
    with_fees: Track,
    without_fees: Track,
    total_employee: f64,
    total_employer: f64,
    years: Vec<ProjectionYear>,
}

pub fn monthly_rates(params: &SimulationParameters) -> Result<MonthlyRates, ProjectionError> {
    let monthly_interest_rate =
        monthly_equivalent("annual_interest_rate", params.annual_interest_rate)?;
    let monthly_fee_rate = monthly_equivalent("annual_fee_rate", params.annual_fee_rate)?;
    let net_monthly_rate = (1.0 + monthly_interest_rate) * (1.0 - monthly_fee_rate) - 1.0;
    Ok(MonthlyRates {
        monthly_interest_rate,
        monthly_fee_rate,
        net_monthly_rate,
    })
}

/// Projects the account with fee drag and, in lockstep, without it.
pub fn simulate(params: &SimulationParameters) -> Result<SimulationResult, ProjectionError> {
    simulate_with_trace(params).map(|(result, _)| result)
}

/// Year-by-year rows for both tracks, as plotted by the comparison chart.
pub fn run_yearly_trace(
    params: &SimulationParameters,
) -> Result<Vec<ProjectionYear>, ProjectionError> {
    Ok(project(params)?.years)
}

/// `simulate` and `run_yearly_trace` from a single pass over the months.
pub fn simulate_with_trace(
    params: &SimulationParameters,
) -> Result<(SimulationResult, Vec<ProjectionYear>), ProjectionError> {
    let projection = project(params)?;

    let final_balance = projection.with_fees.balance;
    let final_balance_without_fees = projection.without_fees.balance;
    let summary = SimulationSummary {
        total_employee_contributions: projection.total_employee,
        total_employer_contributions: projection.total_employer,
        total_interest_earned: final_balance
            - projection.total_employee
            - projection.total_employer,
        total_fees_paid: final_balance_without_fees - final_balance,
        final_balance,
        final_balance_without_fees,
    };

    let result = SimulationResult {
        yearly_balances: projection
            .years
            .iter()
            .map(|year| year.balance_with_fees)
            .collect(),
        summary,
    };
    Ok((result, projection.years))
}

fn project(params: &SimulationParameters) -> Result<Projection, ProjectionError> {
    validate(params)?;
    let rates = monthly_rates(params)?;

    let mut projection = Projection {
        with_fees: Track::new(params.initial_investment, rates.net_monthly_rate),
        without_fees: Track::new(params.initial_investment, rates.monthly_interest_rate),
        total_employee: 0.0,
        total_employer: 0.0,
        years: Vec::with_capacity(params.years as usize),
    };
    let mut employer = EmployerMatch::new(params);

    for year in 1..=params.years {
        employer.start_year();
        let mut year_employee = 0.0;
        let mut year_employer = 0.0;

        for _ in 0..MONTHS_PER_YEAR {
            let employer_match = employer.match_contribution(params.monthly_contribution);
            let total_contribution = params.monthly_contribution + employer_match;

            for track in [&mut projection.with_fees, &mut projection.without_fees] {
                track.deposit(total_contribution);
                track.grow();
            }

            projection.total_employee += params.monthly_contribution;
            projection.total_employer += employer_match;
            year_employee += params.monthly_contribution;
            year_employer += employer_match;
        }

        projection.with_fees.deposit(params.annual_lump_sum);
        projection.without_fees.deposit(params.annual_lump_sum);
        projection.total_employee += params.annual_lump_sum;
        year_employee += params.annual_lump_sum;

        projection.years.push(ProjectionYear {
            year,
            balance_with_fees: projection.with_fees.balance,
            balance_without_fees: projection.without_fees.balance,
            fees_to_date: projection.without_fees.balance - projection.with_fees.balance,
            employee_contributions: year_employee,
            employer_contributions: year_employer,
            total_contributions: projection.total_employee + projection.total_employer,
        });
    }

    Ok(projection)
}

fn monthly_equivalent(name: &'static str, annual_rate: f64) -> Result<f64, ProjectionError> {
    if !annual_rate.is_finite() {
        return Err(ProjectionError::invalid(
            name,
            format!("{annual_rate} is not finite"),
        ));
    }
    let base = 1.0 + annual_rate;
    if base < 0.0 {
        return Err(ProjectionError::invalid(
            name,
            format!("{annual_rate} is below -1, monthly rate is undefined"),
        ));
    }
    Ok(base.powf(1.0 / 12.0) - 1.0)
}

fn validate(params: &SimulationParameters) -> Result<(), ProjectionError> {
    if params.years == 0 {
        return Err(ProjectionError::invalid("years", "must be at least 1"));
    }

    for (name, value) in [
        ("initial_investment", params.initial_investment),
        ("annual_interest_rate", params.annual_interest_rate),
        ("annual_fee_rate", params.annual_fee_rate),
        ("monthly_contribution", params.monthly_contribution),
        ("yearly_salary", params.yearly_salary),
        ("employer_match_rate", params.employer_match_rate),
        ("employer_match_cap", params.employer_match_cap),
        ("annual_lump_sum", params.annual_lump_sum),
    ] {
        if !value.is_finite() {
            return Err(ProjectionError::invalid(name, format!("{value} is not finite")));
        }
    }

    Ok(())
}
