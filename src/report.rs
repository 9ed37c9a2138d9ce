//! CSV rendering of projection series

use std::io::Write;

use crate::projection::{ProjectionResult, ProjectionSeries};

/// Divisor for reporting balances in millions
pub const MILLIONS: f64 = 1_000_000.0;

/// Presentation toggles for series output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Emit the balance that ignores withdrawals
    pub include_no_withdrawal: bool,
    /// Every money column is divided by this (1.0 for raw units)
    pub unit: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_no_withdrawal: true,
            unit: 1.0,
        }
    }
}

/// Write one row per month with a header line
pub fn write_series_csv<W: Write>(
    writer: W,
    series: &ProjectionSeries,
    options: &ReportOptions,
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["month", "date", "withdrawal"];
    if options.include_no_withdrawal {
        header.push("balance_no_withdrawal");
    }
    header.extend(["balance_with_withdrawal", "band_upper", "band_lower"]);
    out.write_record(&header)?;

    let scale = |v: f64| format!("{:.6}", v / options.unit);
    for row in series {
        let mut record = vec![
            row.month_index.to_string(),
            row.date.to_string(),
            scale(row.withdrawal),
        ];
        if options.include_no_withdrawal {
            record.push(scale(row.balance_no_withdrawal));
        }
        record.push(scale(row.balance_with_withdrawal));
        record.push(scale(row.band_upper));
        record.push(scale(row.band_lower));
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

/// Write one summary line per named result
pub fn write_summary_csv<'a, W, I>(writer: W, results: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a ProjectionResult)>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "scenario",
        "months",
        "final_balance",
        "total_withdrawn",
        "monthly_net_rate_pct",
        "depletion_month",
    ])?;

    for (name, result) in results {
        let summary = &result.summary;
        out.write_record([
            name.to_string(),
            result.total_months.to_string(),
            format!("{:.2}", summary.final_balance),
            format!("{:.2}", summary.total_withdrawn),
            format!("{:.4}", summary.effective_monthly_net_rate),
            summary.depletion_month.map(|m| m.to_string()).unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}
