use crate::core::{ProjectionYear, SimulationSummary};

/// Compact axis/annotation label: `$1.2M`, `$25K`, `$950`. Negative values
/// never reach the K/M units and render as `$-2400`.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}

/// Full amount with thousands separators and cents: `$1,234,567.89`.
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn text_summary(summary: &SimulationSummary) -> String {
    [
        "Investment Summary".to_string(),
        String::new(),
        format!("- Final Balance: {}", format_money(summary.final_balance)),
        format!(
            "- Total Employee Contributions: {}",
            format_money(summary.total_employee_contributions)
        ),
        format!(
            "- Total Employer Contributions: {}",
            format_money(summary.total_employer_contributions)
        ),
        format!(
            "- Total Interest Earned: {}",
            format_money(summary.total_interest_earned)
        ),
        format!("- Total Fees Paid: {}", format_money(summary.total_fees_paid)),
    ]
    .join("\n")
}

pub fn year_table(years: &[ProjectionYear]) -> String {
    let mut out = format!(
        "{:>4} {:>16} {:>16} {:>14} {:>12} {:>12}\n",
        "Year", "With fees", "Without fees", "Fee gap", "Employee", "Employer"
    );
    for row in years {
        out.push_str(&format!(
            "{:>4} {:>16} {:>16} {:>14} {:>12} {:>12}\n",
            row.year,
            format_money(row.balance_with_fees),
            format_money(row.balance_without_fees),
            format_money(row.fees_to_date),
            format_money(row.employee_contributions),
            format_money(row.employer_contributions),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_currency_picks_unit_by_magnitude() {
        assert_eq!(format_currency(1_174_055.25), "$1.2M");
        assert_eq!(format_currency(256_419.88), "$256K");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-2_400.0), "$-2400");
        assert_eq!(format_currency(-1_500_000.0), "$-1500000");
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(1_174_055.2461), "$1,174,055.25");
        assert_eq!(format_money(330_000.0), "$330,000.00");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(12.5), "$12.50");
        assert_eq!(format_money(-1_234.5), "-$1,234.50");
        assert_eq!(format_money(-0.001), "$0.00");
    }

    #[test]
    fn text_summary_lists_every_total() {
        let summary = SimulationSummary {
            total_employee_contributions: 330_000.0,
            total_employer_contributions: 90_000.0,
            total_interest_earned: 754_055.25,
            total_fees_paid: 256_419.88,
            final_balance: 1_174_055.25,
            final_balance_without_fees: 1_430_475.13,
        };
        let text = text_summary(&summary);
        assert!(text.starts_with("Investment Summary"));
        assert!(text.contains("- Final Balance: $1,174,055.25"));
        assert!(text.contains("- Total Employee Contributions: $330,000.00"));
        assert!(text.contains("- Total Employer Contributions: $90,000.00"));
        assert!(text.contains("- Total Interest Earned: $754,055.25"));
        assert!(text.contains("- Total Fees Paid: $256,419.88"));
    }

    #[test]
    fn year_table_has_header_and_one_line_per_year() {
        let rows = [ProjectionYear {
            year: 1,
            balance_with_fees: 2_850.0,
            balance_without_fees: 2_850.0,
            fees_to_date: 0.0,
            employee_contributions: 1_250.0,
            employer_contributions: 600.0,
            total_contributions: 1_850.0,
        }];
        let table = year_table(&rows);
        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().nth(1).is_some_and(|line| line.contains("$2,850.00")));
    }
}
