//! Newsnet CLI: summaries, daily series and sharing networks from the terminal
//!
//! Loads a dataset preset (or an explicit edgelist/sources pair), applies
//! include/exclude filters, and prints the requested view.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use newsnet::dataset::read_headers;
use newsnet::summary::{daily_series, RankedTable};
use newsnet::{
    detect_role, DashboardConfig, DashboardError, DatasetHandle, Dimension, FilterSelection,
    Grouping, NetworkNode, NetworkView, Session,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsnet", version, about = "News-sharing network dashboard")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset preset from the configuration
    #[arg(long, default_value = "sep", global = true)]
    dataset: String,

    /// Edge-event table, overriding the preset
    #[arg(long, global = true, requires = "sources")]
    edgelist: Option<PathBuf>,

    /// Source-metadata table, overriding the preset
    #[arg(long, global = true, requires = "edgelist")]
    sources: Option<PathBuf>,

    /// Keep events matching `dimension=value1,value2` (repeatable)
    #[arg(long, global = true)]
    include: Vec<String>,

    /// Drop events matching `dimension=value1,value2` (repeatable)
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// JSON filter selection file
    #[arg(long, global = true)]
    filters: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable values per dimension
    Options,
    /// Ranked attribute and source tables
    Summary,
    /// Daily event counts per category value
    Series {
        /// region, language, country, category or topics
        #[arg(default_value = "region")]
        dimension: Dimension,
    },
    /// Weighted sharing network
    Network {
        /// source, region, country or language
        #[arg(default_value = "region")]
        grouping: Grouping,

        /// Nodes listed per top-in/top-out table
        #[arg(long)]
        top: Option<usize>,
    },
    /// Report which table a delimited file looks like
    Detect {
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        match e.downcast_ref::<DashboardError>() {
            Some(err) if err.is_sentinel() => {
                eprintln!("{}", err.user_message());
                std::process::exit(2);
            }
            Some(err) => {
                eprintln!("Error: {}", err);
                eprintln!("{}", err.user_message());
            }
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Detect { file } = &cli.command {
        return run_detect(file);
    }

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_yaml_file(path)?,
        None => DashboardConfig::default(),
    };
    let session = match (&cli.edgelist, &cli.sources) {
        (Some(edgelist), Some(sources)) => {
            Session::open(&DatasetHandle::new(edgelist, sources), config)?
        }
        _ => Session::open_preset(&cli.dataset, config)?,
    };
    let selection = build_selection(cli)?;
    debug!("Filter selection: {:?}", selection);

    match &cli.command {
        Commands::Options => run_options(&session, &cli.format),
        Commands::Summary => run_summary(&session, &selection, &cli.format),
        Commands::Series { dimension } => run_series(&session, &selection, *dimension, &cli.format),
        Commands::Network { grouping, top } => {
            let k = top.unwrap_or(session.config().top_links);
            run_network(&session, &selection, *grouping, k, &cli.format)
        }
        Commands::Detect { .. } => Ok(()),
    }
}

fn build_selection(cli: &Cli) -> anyhow::Result<FilterSelection> {
    let mut selection = match &cli.filters {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading filters from {}", path.display()))?;
            FilterSelection::from_json_str(&json)?
        }
        None => FilterSelection::new(),
    };
    for arg in &cli.include {
        let (dimension, values) = parse_filter_arg(arg)?;
        selection = selection.include(dimension, values);
    }
    for arg in &cli.exclude {
        let (dimension, values) = parse_filter_arg(arg)?;
        selection = selection.exclude(dimension, values);
    }
    Ok(selection)
}

/// Parse `dimension=value1,value2`
fn parse_filter_arg(arg: &str) -> anyhow::Result<(Dimension, Vec<String>)> {
    let Some((dimension, values)) = arg.split_once('=') else {
        bail!("filter '{}' must look like dimension=value1,value2", arg);
    };
    let dimension: Dimension = dimension.parse().map_err(anyhow::Error::msg)?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((dimension, values))
}

fn run_detect(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let columns = read_headers(&text)?;

    match detect_role(&columns) {
        Some(role) => println!("{}: {}", file.display(), role),
        None => println!("{}: unrecognised table", file.display()),
    }
    Ok(())
}

fn run_options(session: &Session, format: &OutputFormat) -> anyhow::Result<()> {
    let options = session.filter_options();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        _ => {
            let rows = options
                .values
                .iter()
                .map(|(dimension, values)| {
                    vec![
                        dimension.to_string(),
                        values.len().to_string(),
                        values.join(", "),
                    ]
                })
                .collect();
            print_rows(&["dimension", "count", "values"], rows, format);
        }
    }
    Ok(())
}

fn run_summary(
    session: &Session,
    selection: &FilterSelection,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let report = session.summary(selection)?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_ranked("Top attribute combinations", &report.ranked, format);
    print_ranked("Top sending sources", &report.from_sources, format);
    print_ranked("Top receiving sources", &report.to_sources, format);
    println!(
        "{} sources involved; source network {}",
        report.endpoint_count,
        if report.source_network_allowed {
            "available"
        } else {
            "disabled"
        }
    );
    Ok(())
}

fn run_series(
    session: &Session,
    selection: &FilterSelection,
    dimension: Dimension,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let filtered = session.filtered(selection, false);
    if filtered.is_empty() {
        return Err(DashboardError::EmptyResult.into());
    }
    let set = daily_series(&filtered, dimension, session.config().window_days);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set)?),
        OutputFormat::Csv => {
            println!("{},date,count", dimension);
            for series in &set.series {
                let category = series.category.as_deref().unwrap_or_default();
                for point in &series.points {
                    println!("{},{},{}", format_csv_value(category), point.date, point.value);
                }
            }
        }
        OutputFormat::Table => {
            let rows = set
                .series
                .iter()
                .map(|s| {
                    let first = s.points.first().map(|p| p.date.to_string());
                    let last = s.points.last().map(|p| p.date.to_string());
                    vec![
                        s.label.trim_end().to_string(),
                        s.total.to_string(),
                        first.unwrap_or_default(),
                        last.unwrap_or_default(),
                    ]
                })
                .collect();
            print_rows(&[dimension.as_str(), "total", "first day", "last day"], rows, format);
            if let Some(window) = set.window {
                println!(
                    "Central date {} (window {} to {})",
                    window.central, window.start, window.end
                );
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct NetworkOutput<'a> {
    #[serde(flatten)]
    network: &'a NetworkView,
    top_out: Vec<&'a NetworkNode>,
    top_in: Vec<&'a NetworkNode>,
}

fn run_network(
    session: &Session,
    selection: &FilterSelection,
    grouping: Grouping,
    k: usize,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let network = session.network(selection, grouping)?;
    let output = NetworkOutput {
        network: &network,
        top_out: network.top_by_out(k),
        top_in: network.top_by_in(k),
    };

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let rows = network
        .edges
        .iter()
        .map(|e| vec![label_of(&network, &e.source), label_of(&network, &e.target), e.weight.to_string()])
        .collect();
    print_rows(&["source", "target", "weight"], rows, format);

    println!("\nTop {} by outgoing events", k);
    print_rows(&["id", "label", "out"], node_rows(&output.top_out, |n| n.out_weight), format);
    println!("\nTop {} by incoming events", k);
    print_rows(&["id", "label", "in"], node_rows(&output.top_in, |n| n.in_weight), format);
    Ok(())
}

fn label_of(network: &NetworkView, id: &str) -> String {
    network
        .node(id)
        .map(|n| n.label.clone())
        .unwrap_or_else(|| id.to_string())
}

fn node_rows(nodes: &[&NetworkNode], weight: impl Fn(&NetworkNode) -> f64) -> Vec<Vec<String>> {
    nodes
        .iter()
        .map(|n| vec![n.id.clone(), n.label.clone(), weight(n).to_string()])
        .collect()
}

fn print_ranked(title: &str, ranked: &RankedTable, format: &OutputFormat) {
    println!("\n{}", title);
    let header: Vec<&str> = ranked.columns.iter().map(String::as_str).collect();
    let rows = ranked
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row
                .keys
                .iter()
                .map(|k| k.clone().unwrap_or_default())
                .collect();
            cells.push(row.count.to_string());
            cells
        })
        .collect();
    print_rows(&header, rows, format);
}

fn print_rows(header: &[&str], rows: Vec<Vec<String>>, format: &OutputFormat) {
    match format {
        OutputFormat::Csv => {
            println!("{}", header.join(","));
            for row in &rows {
                let cells: Vec<String> = row.iter().map(|c| format_csv_value(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        _ => {
            if rows.is_empty() {
                println!("(no results)");
                return;
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header.to_vec());
            let count = rows.len();
            for row in rows {
                table.add_row(row);
            }
            println!("{}", table);
            println!("{} row(s)", count);
        }
    }
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_arg() {
        let (dimension, values) = parse_filter_arg("lang=fr, en").unwrap();
        assert_eq!(dimension, Dimension::Language);
        assert_eq!(values, vec!["fr", "en"]);

        assert!(parse_filter_arg("region").is_err());
        assert!(parse_filter_arg("planet=mars").is_err());
    }

    #[test]
    fn test_format_csv_value() {
        assert_eq!(format_csv_value("EU"), "EU");
        assert_eq!(format_csv_value("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "newsnet",
            "--include",
            "region=EU",
            "network",
            "country",
            "--top",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Network {
                grouping: Grouping::Country,
                top: Some(3)
            }
        ));
        let selection = build_selection(&cli).unwrap();
        assert!(!selection.is_unrestricted());
    }
}
