use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use court_tally::render::{render_png, render_table, summary_lines};
use court_tally::session::DATE_FORMAT;
use court_tally::{open_source, template, write_csv, LedgerConfig, PricingOverrides, Session, Table};
use std::fs::File;
use std::io::Write;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "court-tally")]
#[command(about = "Badminton court usage tally and fee calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute token counts, prices and session totals for an attendance sheet
    Calc(CalcArgs),

    /// Write an empty attendance sheet with sample players as CSV
    Template {
        /// Destination file (stdout when omitted)
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(clap::Args)]
struct CalcArgs {
    /// Attendance sheet (.csv or .xlsx)
    input: String,

    /// YAML config with pricing and tally rules
    #[arg(long)]
    config: Option<String>,

    /// Worksheet name pattern for workbooks (first sheet when omitted)
    #[arg(long)]
    sheet: Option<String>,

    /// Session date, DD/MM/YYYY (today when omitted)
    #[arg(long)]
    date: Option<String>,

    /// Price per usage token
    #[arg(long)]
    unit_shuttle_cost: Option<f64>,

    /// Flat fee per player
    #[arg(long)]
    walk_in_fee: Option<f64>,

    /// Court rental for the legacy total
    #[arg(long)]
    court_fee: Option<f64>,

    /// Real shuttle price for the legacy total
    #[arg(long)]
    actual_unit_shuttle_cost: Option<f64>,

    /// Character counted as one usage token
    #[arg(long)]
    token: Option<char>,

    /// Write the computed table as CSV
    #[arg(long)]
    output: Option<String>,

    /// Write the rendered table as text ("-" for stdout)
    #[arg(long)]
    render: Option<String>,

    /// Write the rendered table as a PNG picture
    #[arg(long)]
    png: Option<String>,

    /// Print the results summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Calc(args) => calc(args),
        Commands::Template { output } => {
            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("failed to create {path}"))?;
                    write_csv(&template(), file)?;
                    info!(path = %path, "template written");
                }
                None => write_csv(&template(), std::io::stdout().lock())?,
            }
            Ok(())
        }
    }
}

fn calc(args: CalcArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => LedgerConfig::load(path).with_context(|| format!("failed to load config: {path}"))?,
        None => LedgerConfig::default(),
    };
    let overrides = PricingOverrides {
        unit_shuttle_cost: args.unit_shuttle_cost,
        walk_in_fee: args.walk_in_fee,
        court_fee: args.court_fee,
        actual_unit_shuttle_cost: args.actual_unit_shuttle_cost,
    };
    config.apply_overrides(overrides, args.token);
    config.validate().context("invalid parameters")?;

    let date = match &args.date {
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .with_context(|| format!("invalid date '{text}', expected DD/MM/YYYY"))?,
        None => Local::now().date_naive(),
    };

    let mut source = open_source(&args.input, args.sheet.as_deref())
        .with_context(|| format!("failed to open {}", args.input))?;
    let table = source.load().with_context(|| format!("failed to read {}", source.name()))?;
    info!(file = %source.name(), rows = table.rows.len(), columns = table.width(), "sheet loaded");

    let mut session = Session::new(config, date, Table::default());
    let results = session.calculate(table);
    for warning in &session.warnings {
        warn!("{warning}");
        eprintln!("warning: {warning}");
    }
    let Some(results) = results else {
        bail!("no data to calculate in {}", args.input);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for line in summary_lines(&results) {
            println!("{line}");
        }
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
        write_csv(&session.table, file)?;
        info!(path = %path, "computed table written");
    }

    if let Some(path) = &args.render {
        let text = render_table(&session.table, &session.config.title, &session.date_text());
        if path == "-" {
            print!("{text}");
        } else {
            File::create(path)
                .and_then(|mut file| file.write_all(text.as_bytes()))
                .with_context(|| format!("failed to write {path}"))?;
            info!(path = %path, "rendered table written");
        }
    }

    if let Some(path) = &args.png {
        let bytes = render_png(&session.table, &session.config.title, &session.date_text())?;
        std::fs::write(path, bytes).with_context(|| format!("failed to write {path}"))?;
        info!(path = %path, "table picture written");
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
