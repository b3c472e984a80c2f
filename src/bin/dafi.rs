//! dafi: compile filter criteria from the command line
//!
//! # Usage
//!
//! ```bash
//! # Filters, one per argument
//! dafi '@age > [30] AND' '@name CONTAINS [%john%]'
//!
//! # With sorting and pagination
//! dafi '@id IN [1, 2, 3]' --sort 'name+:created_at-' --limit 10 --page 2
//!
//! # From a JSON criteria document
//! dafi --criteria criteria.json --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dafi::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dafi")]
#[command(version)]
#[command(about = "Compile filter criteria into parameterized PostgreSQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    dafi '@email = [a@b.com]'
    dafi '( @email = [a] OR' '@nickname = [b] )' --sort 'name-' --limit 20
    dafi --criteria criteria.json --format json")]
struct Cli {
    /// Filter lines, one expression each
    lines: Vec<String>,

    /// Sort expression: field+ / field- separated by ':'
    #[arg(short, long, default_value = "")]
    sort: String,

    /// Page number (1-based)
    #[arg(short, long)]
    page: Option<u64>,

    /// Page size
    #[arg(short, long)]
    limit: Option<u64>,

    /// Default page size when --limit is absent
    #[arg(long, env = "DAFI_MAX_PAGE_SIZE")]
    max_page_size: Option<u64>,

    /// Read criteria from a JSON file instead of filter lines
    #[arg(short, long)]
    criteria: Option<PathBuf>,

    /// Config file (defaults to ./dafi.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse filter lines and show the model next to the SQL
    Explain {
        /// Filter lines
        lines: Vec<String>,
    },
    /// Show the operator reference
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain { lines }) => explain(lines, &cli),
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => compile(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dafi=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn converter(cli: &Cli) -> Result<PsqlConverter> {
    let config = DafiConfig::load(cli.config.as_deref()).context("loading config")?;
    let mut converter = PsqlConverter::from_config(&config.converter);
    if let Some(n) = cli.max_page_size {
        converter.max_page_size = n;
    }
    Ok(converter)
}

fn criteria(cli: &Cli, lines: &[String]) -> Result<Criteria> {
    let mut criteria = match &cli.criteria {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => Criteria::new().filters(parse_filters(lines)?),
    };

    criteria.sorts.extend(parse_sorts(&cli.sort)?);
    if let Some(n) = cli.limit {
        criteria.pagination.page_size = n;
    }
    if let Some(n) = cli.page {
        criteria.pagination.page_number = n;
    }

    Ok(criteria)
}

fn compile(cli: &Cli) -> Result<()> {
    if cli.lines.is_empty() && cli.criteria.is_none() && cli.sort.is_empty() {
        println!("{}", "dafi: filter criteria to parameterized SQL".cyan().bold());
        println!();
        println!("Usage: dafi <LINES>... [OPTIONS]");
        println!();
        println!("Try: dafi --help");
        return Ok(());
    }

    let criteria = criteria(cli, &cli.lines)?;
    let out = converter(cli)?.to_sql(&criteria)?;
    print_query(&out, &cli.format)
}

fn print_query(out: &SqlQuery, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(out)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            if out.sql.is_empty() {
                println!("  {}", "(empty)".dimmed());
            } else {
                println!("  {}", out.sql.white());
            }

            if !out.args.is_empty() {
                println!();
                println!("{}", "Arguments:".cyan());
                for (i, arg) in out.args.iter().enumerate() {
                    println!("  ${} = {}", i + 1, arg.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn explain(lines: &[String], cli: &Cli) -> Result<()> {
    println!("{}", "dafi Filter Explanation".cyan().bold());
    println!();

    let criteria = criteria(cli, lines)?;

    if !criteria.filters.is_empty() {
        println!("{}", "Filters:".green().bold());
        for (i, filter) in criteria.filters.iter().enumerate() {
            println!(
                "  {} {} {} {}",
                format!("{:>2}.", i + 1).dimmed(),
                filter.field.white(),
                filter.operator.to_string().cyan(),
                filter.value.to_string().yellow()
            );
            if filter.is_group_open() || filter.is_group_close() {
                println!(
                    "      {} open={} close={}",
                    "groups".dimmed(),
                    filter.group_open,
                    filter.group_close
                );
            }
            if let Some(key) = filter.chaining_key {
                println!("      {} {}", "then".dimmed(), key.to_string().magenta());
            }
        }
        println!();
    }

    if !criteria.sorts.is_empty() {
        println!("{}", "Sorts:".green().bold());
        for sort in &criteria.sorts {
            println!("  {} {}", sort.field.white(), sort.direction_or_default());
        }
        println!();
    }

    let out = converter(cli)?.to_sql(&criteria)?;
    print_query(&out, &OutputFormat::Text)
}

fn show_operators() {
    println!("{}", "dafi Operator Reference".cyan().bold());
    println!();

    println!(
        "{:14} {:10} {}",
        "Token".white().bold(),
        "Code".white().bold(),
        "SQL".white().bold()
    );
    println!("{}", "─".repeat(40).dimmed());

    for op in FilterOperator::ALL {
        let sql = dafi::transpiler::pg_operator(op).unwrap_or("?");
        println!(
            "{:14} {:10} {}",
            op.dsl_token().cyan().bold(),
            op.short_code().yellow(),
            sql.dimmed()
        );
    }
}
