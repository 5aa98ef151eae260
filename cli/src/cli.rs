use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Windows used when `--window` is not given: 15 min, 1 h and 4 h of minute bars.
pub const DEFAULT_WINDOWS: [(&str, usize); 3] = [("short", 15), ("medium", 60), ("long", 240)];

pub const DEFAULT_RADIUS: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "windowscan", version, about = "Moving averages and local extrema over minute bars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Dataset CSV path (overrides DATASET_PATH)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the sliding-window and extrema analysis over the dataset
    Analyze(AnalyzeArgs),

    /// Create the dataset from the last two days of minute bars
    Bootstrap(SyncArgs),

    /// Merge the latest minute bars into the dataset
    Update(SyncArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Analyze(_) => "analyze",
            Command::Bootstrap(_) => "bootstrap",
            Command::Update(_) => "update",
        }
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Sliding window as NAME=CAPACITY (repeatable, order is kept)
    #[arg(long = "window", value_name = "NAME=CAPACITY", value_parser = parse_window)]
    pub windows: Vec<WindowArg>,

    /// Neighbourhood radius of the extrema scan
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    pub radius: usize,

    /// Only process the first N bars
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the full outcome (report, histories, extrema events) as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    /// Requested windows, or the defaults when none were given.
    pub fn window_config(&self) -> Vec<(String, usize)> {
        if self.windows.is_empty() {
            DEFAULT_WINDOWS
                .iter()
                .map(|(n, c)| (n.to_string(), *c))
                .collect()
        } else {
            self.windows
                .iter()
                .map(|w| (w.name.clone(), w.capacity))
                .collect()
        }
    }
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Ticker to fetch (overrides SYMBOL)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Rows to keep after the write
    #[arg(long)]
    pub keep: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowArg {
    pub name: String,
    pub capacity: usize,
}

/// Parses `NAME=CAPACITY`; a bare number is its own name.
///
/// Capacity 0 is accepted here and rejected by the engine.
pub(crate) fn parse_window(raw: &str) -> Result<WindowArg, String> {
    let (name, cap) = match raw.split_once('=') {
        Some((n, c)) => (n.trim(), c.trim()),
        None => (raw.trim(), raw.trim()),
    };

    if name.is_empty() {
        return Err(format!("window '{raw}' has an empty name"));
    }

    let capacity = cap
        .parse::<usize>()
        .map_err(|e| format!("window '{raw}': invalid capacity: {e}"))?;

    Ok(WindowArg {
        name: name.to_string(),
        capacity,
    })
}
