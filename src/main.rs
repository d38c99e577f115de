use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use mixopt::loader::{InputPaths, load_inputs};
use mixopt::search::{SearchStatistics, total_search_space};
use mixopt::{
    Algorithm, ConsoleReporter, NullReporter, ParallelConfig, Reporter, SearchConfig, SearchResult,
    run_with_config,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "mixopt")]
#[command(about = "mixopt - Mix Profit Optimizer")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI algorithm selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliAlgorithm {
    /// Depth-first backtracking (low memory)
    Dfs,
    /// Breadth-first frontier expansion
    Bfs,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(cli: CliAlgorithm) -> Self {
        match cli {
            CliAlgorithm::Dfs => Algorithm::DepthFirst,
            CliAlgorithm::Bfs => Algorithm::BreadthFirst,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the most profitable mix
    Search {
        /// Product JSON: {"name", "initialEffect"}
        #[arg(long)]
        product: PathBuf,
        /// Substances JSON: [{"name", "cost", "defaultEffect"}]
        #[arg(long)]
        substances: PathBuf,
        /// Effect multipliers JSON: [{"name", "multiplier"}]
        #[arg(long)]
        effects: PathBuf,
        /// Substance rules JSON: [{"substanceName", "rules"}]
        #[arg(long)]
        rules: PathBuf,
        /// Longest mix to consider
        #[arg(long)]
        max_depth: usize,

        // --- Search options ---
        /// Traversal strategy
        #[arg(long, value_enum, default_value = "dfs")]
        algorithm: CliAlgorithm,
        /// Number of worker threads (capped at 16)
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Disable effect memoization
        #[arg(long)]
        no_memo: bool,
        /// Maximum memoized entries per worker
        #[arg(long)]
        memo_capacity: Option<usize>,
        /// Timeout in seconds for the search
        #[arg(long)]
        timeout: Option<u64>,

        // --- Output options ---
        /// Show progress on stderr
        #[arg(long, short = 'p')]
        progress: bool,
        /// Write the result JSON here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Enable verbose output
        #[arg(long, short)]
        verbose: bool,
    },
}

struct SearchOptions {
    config: SearchConfig,
    parallel: ParallelConfig,
    progress: bool,
    output: Option<PathBuf>,
    verbose: bool,
}

/// Result document written by `search`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultDocument<'a> {
    mix_array: &'a [String],
    profit: f64,
    sell_price: f64,
    cost: f64,
    profit_cents: i64,
    sell_price_cents: i64,
    cost_cents: i64,
    cancelled: bool,
}

impl<'a> ResultDocument<'a> {
    fn new(result: &'a SearchResult, cancelled: bool) -> Self {
        Self {
            mix_array: &result.mix_path,
            profit: result.profit(),
            sell_price: result.sell_price(),
            cost: result.cost(),
            profit_cents: result.profit_cents,
            sell_price_cents: result.sell_price_cents,
            cost_cents: result.cost_cents,
            cancelled,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn print_search_statistics(stats: &SearchStatistics) {
    eprintln!("\nSearch Statistics:");
    for line in stats.format_summary().lines() {
        eprintln!("  {}", line);
    }
}

// --- Search ---

fn run_search(paths: &InputPaths, options: &SearchOptions) -> Result<()> {
    let inputs = load_inputs(paths).context("loading inputs")?;

    let total = total_search_space(inputs.substances.len(), options.config.max_depth);
    if options.verbose {
        eprintln!(
            "Searching {} substances up to depth {}",
            inputs.substances.len(),
            options.config.max_depth
        );
        eprintln!("  Algorithm: {}", options.config.algorithm);
        eprintln!("  Workers: {}", options.parallel.workers_for(inputs.substances.len()));
        eprintln!("  Memoization: {}", options.config.memoize);
        eprintln!("  Total mixes: {}", total);
    }

    let mut console = ConsoleReporter::new(options.progress);
    let mut quiet = NullReporter;
    let reporter: &mut dyn Reporter = if options.progress || options.verbose {
        &mut console
    } else {
        &mut quiet
    };

    let result = run_with_config(
        &inputs.product,
        &inputs.substances,
        &inputs.multipliers,
        &options.config,
        &options.parallel,
        reporter,
    )
    .context("search failed")?;

    if options.verbose {
        print_search_statistics(&result.total_statistics);
    }

    let Some(best) = result.best_result.as_ref() else {
        bail!("search was cancelled before any mix was evaluated");
    };
    if result.cancelled {
        eprintln!("Warning: search timed out; result is the best found so far");
    }

    let json = serde_json::to_string_pretty(&ResultDocument::new(best, result.cancelled))?;
    match &options.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    match args.command {
        Commands::Search {
            product,
            substances,
            effects,
            rules,
            max_depth,
            algorithm,
            workers,
            no_memo,
            memo_capacity,
            timeout,
            progress,
            output,
            verbose,
        } => {
            init_tracing(verbose);

            let paths = InputPaths {
                product,
                substances,
                effects,
                rules,
            };

            let mut parallel =
                ParallelConfig::default().with_timeout_option(timeout.map(Duration::from_secs));
            if let Some(workers) = workers {
                parallel = parallel.with_workers(workers);
            }

            let options = SearchOptions {
                config: SearchConfig::default()
                    .with_algorithm(algorithm.into())
                    .with_max_depth(max_depth)
                    .with_memoize(!no_memo)
                    .with_memo_capacity_option(memo_capacity),
                parallel,
                progress,
                output,
                verbose,
            };

            if let Err(e) = run_search(&paths, &options) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
