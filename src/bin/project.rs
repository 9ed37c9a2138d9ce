//! Project wealth for one scenario or a CSV batch of scenarios
//!
//! Writes month-by-month series as CSV and prints the summary figures.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use wealth_projection::{
    report::{write_series_csv, write_summary_csv, ReportOptions, MILLIONS},
    scenario::{
        load_scenarios, DEFAULT_ANNUAL_INFLATION, DEFAULT_ANNUAL_RETURN, DEFAULT_ANNUAL_TAX,
        DEFAULT_ANNUAL_VOLATILITY, DEFAULT_HORIZON_YEARS, DEFAULT_INITIAL_WEALTH,
        DEFAULT_MONTHLY_WITHDRAWAL,
    },
    ProjectionConfig, ProjectionEngine, ProjectionResult, Scenario, ScenarioParams,
    ScenarioRunner, VolatilityScaling,
};

#[derive(Parser, Debug)]
#[command(name = "project", version, about = "Deterministic wealth projection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a single scenario given on the command line
    Single(SingleArgs),
    /// Project every scenario in a CSV file
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct SingleArgs {
    /// Starting balance
    #[arg(long, default_value_t = DEFAULT_INITIAL_WEALTH, allow_negative_numbers = true)]
    initial_wealth: f64,

    /// First month (YYYY-MM-DD); defaults to today
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last month (YYYY-MM-DD); defaults to start + --years
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Horizon in years when --end is omitted
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    years: u32,

    /// Expected annual return as a fraction (0.12 = 12%)
    #[arg(long, default_value_t = DEFAULT_ANNUAL_RETURN, allow_negative_numbers = true)]
    annual_return: f64,

    /// Annual inflation as a fraction
    #[arg(long, default_value_t = DEFAULT_ANNUAL_INFLATION, allow_negative_numbers = true)]
    inflation: f64,

    /// Tax on returns as a fraction
    #[arg(long, default_value_t = DEFAULT_ANNUAL_TAX, allow_negative_numbers = true)]
    tax: f64,

    /// Annual volatility as a fraction
    #[arg(long, default_value_t = DEFAULT_ANNUAL_VOLATILITY, allow_negative_numbers = true)]
    volatility: f64,

    /// Monthly withdrawal; negative for contributions
    #[arg(long, default_value_t = DEFAULT_MONTHLY_WITHDRAWAL, allow_negative_numbers = true)]
    withdrawal: f64,

    /// Keep the withdrawal at its nominal amount instead of indexing to inflation
    #[arg(long)]
    no_index: bool,

    /// Write the series here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit the full result as JSON instead of CSV
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// CSV file with one scenario per row
    #[arg(long)]
    scenarios: PathBuf,

    /// Directory for per-scenario series and summary.csv
    #[arg(long, default_value = "projections")]
    output_dir: PathBuf,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// Band formula
    #[arg(long, value_enum, default_value_t = Scaling::SqrtTime)]
    scaling: Scaling,

    /// Leave the no-withdrawal balance out of series output
    #[arg(long)]
    hide_no_withdrawal: bool,

    /// Report money columns in millions
    #[arg(long)]
    millions: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Scaling {
    /// vol * sqrt(months / 12)
    SqrtTime,
    /// vol / sqrt(12), constant over time
    Flat,
}

impl From<Scaling> for VolatilityScaling {
    fn from(s: Scaling) -> Self {
        match s {
            Scaling::SqrtTime => VolatilityScaling::SquareRootOfTime,
            Scaling::Flat => VolatilityScaling::Flat,
        }
    }
}

impl DisplayArgs {
    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            volatility_scaling: self.scaling.into(),
        }
    }

    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            include_no_withdrawal: !self.hide_no_withdrawal,
            unit: if self.millions { MILLIONS } else { 1.0 },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let today = Local::now().date_naive();

    match cli.command {
        Command::Single(args) => run_single(args, today),
        Command::Batch(args) => run_batch(args, today),
    }
}

fn run_single(args: SingleArgs, today: NaiveDate) -> Result<()> {
    let params = ScenarioParams {
        name: None,
        initial_wealth: args.initial_wealth,
        start_date: args.start,
        end_date: args.end,
        horizon_years: args.years,
        annual_return: args.annual_return,
        annual_inflation: args.inflation,
        annual_tax: args.tax,
        annual_volatility: args.volatility,
        monthly_withdrawal: args.withdrawal,
        index_withdrawal_to_inflation: !args.no_index,
    };
    let input = params.to_input(today);

    let engine = ProjectionEngine::new(args.display.config());
    let result = engine.project(&input).context("projection rejected")?;

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut sink, &result).context("writing JSON")?;
        sink.flush().context("writing JSON")?;
        return Ok(());
    }

    write_series_csv(sink, &result.series, &args.display.report_options())
        .context("writing series")?;
    print_summary(&result, input.index_withdrawal_to_inflation);
    Ok(())
}

fn run_batch(args: BatchArgs, today: NaiveDate) -> Result<()> {
    let start = Instant::now();
    let params = load_scenarios(&args.scenarios)
        .with_context(|| format!("loading {}", args.scenarios.display()))?;
    let scenarios: Vec<Scenario> = params
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.into_scenario(i, today))
        .collect();
    eprintln!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new(args.display.config());
    let proj_start = Instant::now();
    let outcomes = runner.run(&scenarios);
    eprintln!("Projections complete in {:?}", proj_start.elapsed());

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let options = args.display.report_options();
    let mut succeeded: Vec<(&str, &ProjectionResult)> = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                let path = args.output_dir.join(format!("{}.csv", file_stem(&outcome.name)));
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_series_csv(BufWriter::new(file), &result.series, &options)
                    .with_context(|| format!("writing {}", path.display()))?;
                succeeded.push((outcome.name.as_str(), result));
            }
            Err(e) => eprintln!("  {}: {}", outcome.name, e),
        }
    }

    let summary_path = args.output_dir.join("summary.csv");
    let file = File::create(&summary_path)
        .with_context(|| format!("creating {}", summary_path.display()))?;
    write_summary_csv(BufWriter::new(file), succeeded.iter().copied())
        .with_context(|| format!("writing {}", summary_path.display()))?;

    eprintln!(
        "{} of {} scenarios written to {}",
        succeeded.len(),
        outcomes.len(),
        args.output_dir.display()
    );
    eprintln!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn print_summary(result: &ProjectionResult, indexed: bool) {
    let summary = &result.summary;
    eprintln!("\nSummary ({} months):", result.total_months);
    eprintln!("  Final balance:      {:.2}", summary.final_balance);
    eprintln!(
        "  Total withdrawn:    {:.2}{}",
        summary.total_withdrawn,
        if indexed { " (inflation indexed)" } else { "" }
    );
    eprintln!("  Net monthly rate:   {:.2}%", summary.effective_monthly_net_rate);
    if let Some(month) = summary.depletion_month {
        eprintln!("  Depleted in month:  {}", month);
    }
}

/// Scenario name reduced to a safe file name
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
