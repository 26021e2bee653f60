use clap::Parser;

use qubo_tt::eval::Summary;
use qubo_tt::search::{Escalation, Parameters};
use qubo_tt::truth_table::TruthTable;
use qubo_tt::types::{CoeffBounds, Completion};
use qubo_tt::utils::to_bits;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Validity bit of every truth-table row, first row first (e.g. `0001` for AND).
    #[arg(value_name = "BITS")]
    table: String,

    /// Minimum quadratic coefficient.
    #[arg(long, value_name = "FLOAT", default_value = "-1.0", allow_hyphen_values = true)]
    qmin: f64,

    /// Maximum quadratic coefficient.
    #[arg(long, value_name = "FLOAT", default_value = "1.0", allow_hyphen_values = true)]
    qmax: f64,

    /// Minimum linear coefficient.
    #[arg(long, value_name = "FLOAT", default_value = "-1.0", allow_hyphen_values = true)]
    lmin: f64,

    /// Maximum linear coefficient.
    #[arg(long, value_name = "FLOAT", default_value = "1.0", allow_hyphen_values = true)]
    lmax: f64,

    /// Generations per genetic-algorithm run.
    #[arg(long, value_name = "INT", default_value = "1000")]
    generations: usize,

    /// Give up on an ancilla count after this many generations without improvement.
    #[arg(long, value_name = "INT")]
    stall: Option<usize>,

    /// Most ancillary variables to try before giving up.
    #[arg(long, value_name = "INT")]
    max_ancillae: Option<usize>,

    /// Individuals per generation.
    #[arg(long, value_name = "INT", default_value = "100")]
    population: usize,

    /// Random seed.
    #[arg(long, value_name = "INT", default_value = "0")]
    seed: u64,

    /// Require every ancillary completion of a valid row to beat all invalid rows.
    #[arg(long)]
    all_completions: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();

    let valid = args
        .table
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(color_eyre::eyre::eyre!("unexpected character {:?} in truth table", c)),
        })
        .collect::<color_eyre::Result<Vec<bool>>>()?;
    let table = TruthTable::new(valid)?;
    let bounds = CoeffBounds::new(args.lmin, args.lmax, args.qmin, args.qmax)?;

    let mut params = Parameters::new(bounds, table)?;
    params.ga.max_generations = args.generations;
    params.ga.stall_generations = args.stall;
    params.ga.population_size = args.population;
    params.ga.seed = args.seed;
    if let Some(max_ancillae) = args.max_ancillae {
        params.max_ancillae = max_ancillae;
    }
    if args.all_completions {
        params.completion = Completion::Maximum;
    }

    let time_total = std::time::Instant::now();
    let report = Escalation::new(params.clone())?.run()?;
    let summary = Summary::new(&report, &params)?;

    println!("Total number of generations = {}", summary.generations);
    println!("Final badness = {}", summary.badness);
    println!("Final coefficients = {:?}", summary.coeffs);
    println!("Rescaled coefficients = {:?}", summary.rescaled.coeffs());
    println!("Final valid/invalid gap = {}", summary.gap);
    println!("Ancillary variables = {}", summary.n_anc);
    println!("Matrix form = {}", summary.matrix);

    println!("Complete evaluation:");
    let digits = (summary.rows.len() + 1).to_string().len();
    for row in &summary.rows {
        println!(
            "    {} {}  {:18.15}  {:>digits$} {}",
            to_bits(row.row, params.num_cols()),
            if row.valid { '*' } else { ' ' },
            row.energy,
            row.rank,
            if row.misranked { 'X' } else { ' ' },
            digits = digits,
        );
    }

    println!("Total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
