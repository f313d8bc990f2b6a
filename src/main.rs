mod combine;
mod inventory;
mod manifest;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use combine::{RunMode, ALL_MODE_FEASIBLE_LIMIT};
use inventory::Inventory;
use manifest::ScriptEmitter;

fn parse_run_mode(s: &str) -> Result<RunMode, String> {
    match s {
        "all" => Ok(RunMode::All),
        "fix" => Ok(RunMode::Fixed),
        _ => Err(format!("invalid run mode '{}': use 'all' or 'fix'", s)),
    }
}

#[derive(Parser)]
#[command(name = "combigen")]
#[command(version)]
#[command(about = "Genome combination enumeration across source directories")]
#[command(long_about = r#"
combigen - cross-directory genome combination enumeration

Enumerates combinations of genome annotation files, one subdirectory per
genome source, and keeps only combinations that mix genomes from distinct
sources (never two candidates from the same source, never a single genome).
Each accepted combination gets a sequential ID and is written to a manifest
alongside the shell scripts that drive the downstream tools.

WORKFLOW:
  Scan genome_dir → enumerate combinations → provenance filter
  → manifest rows + merge commands → merge.sh / run_smetana.sh

OUTPUT FILES:
  combition_results.txt  Tab-separated manifest, one row per combination
                         member: combination_<ID>\t<genome>
  merge.sh               One merge_community invocation per accepted
                         combination, producing combination_<ID>.xml
  run_smetana.sh         Single smetana invocation over all merged models

NOTE:
  'all' mode walks the power set of the genome list and is impractical
  beyond a few dozen genomes.

EXAMPLES:
  # All pairwise combinations
  combigen -g ./test_genome -o ./test -m fix -n 2

  # Every combination size
  combigen -g ./test_genome -o ./test -m all
"#)]
struct Args {
    #[arg(short = 'g', long = "genome-dir", value_name = "DIR", help_heading = "Input")]
    genome_dir: PathBuf,

    #[arg(short = 'o', long = "out-dir", value_name = "DIR", help_heading = "Output")]
    out_dir: PathBuf,

    #[arg(short = 'm', long = "run-mode", value_name = "MODE",
          value_parser = parse_run_mode, help_heading = "Enumeration")]
    run_mode: RunMode,

    #[arg(short = 'n', long, value_name = "SIZE", default_value = "3", help_heading = "Enumeration")]
    n: usize,

    #[arg(short = 'v', long, help_heading = "Output")]
    verbose: bool,
}

fn run(args: &Args) -> Result<usize> {
    let inventory = Inventory::scan(&args.genome_dir)?;
    let index = inventory.dir_index();

    if args.verbose {
        eprintln!(
            "Scanned {} source directories, {} genomes",
            inventory.dir_genomes.len(),
            inventory.genome_count()
        );
    }

    if args.run_mode == RunMode::All && inventory.genome_count() > ALL_MODE_FEASIBLE_LIMIT {
        log::warn!(
            "'all' mode over {} genomes enumerates 2^{} - 1 combinations and is unlikely to finish",
            inventory.genome_count(),
            inventory.genome_count()
        );
    }

    let mut emitter = ScriptEmitter::create(&args.out_dir)?;

    let stream: Box<dyn Iterator<Item = Vec<&str>> + '_> = match args.run_mode {
        RunMode::All => Box::new(combine::generate_all(&inventory.all_genomes)),
        RunMode::Fixed => Box::new(combine::generate_fixed(&inventory.all_genomes, args.n)),
    };

    for comb in stream {
        if combine::accepts(&comb, &index)? {
            emitter.record(&comb)?;
        }
    }

    let out_dir = emitter.out_dir().to_path_buf();
    let accepted = emitter.finish()?;

    if args.verbose {
        eprintln!("Accepted {} combination(s)", accepted);
        eprintln!("Results written to: {}", out_dir.display());
    }

    Ok(accepted)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)?;

    Ok(())
}
