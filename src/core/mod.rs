mod engine;
mod types;

pub use engine::{monthly_rates, run_yearly_trace, simulate, simulate_with_trace};
pub use types::{
    MonthlyRates, ProjectionError, ProjectionYear, SimulationParameters, SimulationResult,
    SimulationSummary,
};
