use clap::Parser;
use slice_sort::engine::Puzzle;
use slice_sort::heuristics::ScanDirection;
use slice_sort::solver::{next_move, MoveKind};
use slice_sort::utils::stack_from_str;
use slice_sort::MAX_SLICES;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Solves one stack, printing every flip
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Colors front first, e.g. "0 1 0 2 1"
    stack: String,

    /// Number of colors the stack is declared with (defaults to the largest color + 1)
    #[clap(short, long)]
    colors: Option<usize>,

    /// Scan the pile backward when looking for double moves
    #[clap(long)]
    backward: bool,

    /// Give up after this many flips
    #[clap(long, default_value_t = 4 * MAX_SLICES as u32)]
    max_moves: u32,
}

fn infer_color_count(text: &str) -> usize {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|token| token.parse::<usize>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let color_count = args.colors.unwrap_or_else(|| infer_color_count(&args.stack));

    let stack = match stack_from_str(&args.stack, color_count) {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let scan = if args.backward {
        ScanDirection::Backward
    } else {
        ScanDirection::Forward
    };

    let mut puzzle = Puzzle::new(stack);
    println!(
        "Initial stack: {}  (fragmentation {})\n",
        puzzle.stack(),
        puzzle.stack().fragmentation()
    );

    while !puzzle.is_complete() {
        if puzzle.moves() >= args.max_moves {
            println!("Gave up after {} moves.", puzzle.moves());
            std::process::exit(2);
        }
        let Some((kind, proposal)) = next_move(puzzle.stack(), scan) else {
            warn!(stack = %puzzle.stack(), "no move found for an incomplete stack");
            println!("No move found.");
            std::process::exit(2);
        };
        let flip = proposal.to_flip();
        let before = puzzle.stack().to_string_with_marker(Some(flip.index));
        if let Err(e) = puzzle.apply_flip(flip.index, flip.direction) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        let label = match kind {
            MoveKind::Join => "join",
            MoveKind::Double => "double",
        };
        println!(
            "Move {:<2} {:<6} flip {:>2} {:<11} {}  ->  {}",
            puzzle.moves(),
            label,
            flip.index,
            format!("{:?}", flip.direction),
            before,
            puzzle.stack()
        );
    }

    println!(
        "\nSolved in {} moves (initial fragmentation {}, final {}).",
        puzzle.moves(),
        puzzle.initial_fragmentation(),
        puzzle.stack().fragmentation()
    );
}
