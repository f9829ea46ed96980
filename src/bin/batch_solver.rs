use clap::{Parser, ValueEnum};
use slice_sort::heuristics::ScanDirection;
use slice_sort::solver::{run_batch, BatchConfig, SolverConfig};
use slice_sort::MAX_SLICES;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scan {
    Forward,
    Backward,
}

impl From<Scan> for ScanDirection {
    fn from(scan: Scan) -> Self {
        match scan {
            Scan::Forward => ScanDirection::Forward,
            Scan::Backward => ScanDirection::Backward,
        }
    }
}

/// Solves a batch of random stacks and reports move statistics
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of random stacks to generate
    #[clap(short = 'n', long, default_value_t = 1024 * 1024)]
    stacks: usize,

    /// Slices per stack
    #[clap(short, long, default_value_t = MAX_SLICES)]
    slices: usize,

    /// Colors per stack
    #[clap(short, long, default_value_t = 8)]
    colors: usize,

    /// Seed for the stack generator
    #[clap(long, default_value_t = 34)]
    seed: u32,

    /// Scan order for double moves
    #[clap(long, value_enum, default_value = "forward")]
    scan: Scan,

    /// Reverse the double-move scan order after every double move
    #[clap(long)]
    alternate_scan: bool,

    /// Give up on a stack after this many flips
    #[clap(long, default_value_t = 4 * MAX_SLICES as u32)]
    max_moves: u32,

    /// Log each solve at debug level (RUST_LOG overrides)
    #[clap(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = BatchConfig {
        stacks: args.stacks,
        slices: args.slices,
        colors: args.colors,
        seed: args.seed,
        solver: SolverConfig {
            scan_direction: args.scan.into(),
            alternate_scan: args.alternate_scan,
            max_moves: args.max_moves,
        },
    };

    println!(
        "Solving {} stacks ({} slices, {} colors, seed {})...",
        config.stacks, config.slices, config.colors, config.seed
    );

    let report = match run_batch(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for stack in &report.over_budget {
        println!(
            "stack {}: initial fragmentation {} moves {}",
            stack.index, stack.initial_fragmentation, stack.moves
        );
    }

    println!("\n--- Batch Complete ---");
    println!("Stacks:                 {}", report.stacks);
    println!("Completed:              {}", report.completed);
    println!("Stuck:                  {}", report.stuck);
    println!("Move limit reached:     {}", report.move_limited);
    println!("Total moves:            {}", report.total_moves);
    println!("Average moves:          {:.2}", report.average_moves());
    println!(
        "Average fragmentation:  {:.2}",
        report.average_initial_fragmentation()
    );
    println!("Over 2x fragmentation:  {}", report.over_budget.len());
    println!("Elapsed:                {:.3?}", report.elapsed);

    if !report.all_completed() {
        std::process::exit(2);
    }
}
