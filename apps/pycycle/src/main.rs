use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use pycycle_import_cycles::{Config, OutputFormat};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pycycle", version)]
#[command(about = "Tools for untangling import cycles in Python packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect import cycles in a Python package and rate their severity
    ImportCycles(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::ImportCycles(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Running import cycle check on {} (using {} threads)",
                cfg.root.display(),
                num_threads
            );
            debug!("Severities: {:?}, format: {:?}", cfg.severity_map(), cfg.format);

            let result = pycycle_import_cycles::run_import_cycle_check(cfg.clone())?;
            debug!("Found {} cycles", result.cycles.len());

            let elapsed_ms = start.elapsed().as_millis();

            match cfg.format {
                OutputFormat::Json => {
                    pycycle_import_cycles::print_graph_json(
                        &mut stdout,
                        &result.graph,
                        cfg.compact,
                    )?;
                }
                OutputFormat::Tree => {
                    if result.cycles.is_empty() {
                        info!("No cycles detected");
                        pycycle_import_cycles::print_no_cycles_message(&mut stdout, &result)?;
                    } else {
                        pycycle_import_cycles::print_cycles_tree(&mut stdout, &result)?;
                    }
                    writeln!(
                        stdout,
                        "\n{} Finished in {}ms on {} modules (using {} threads).",
                        "●".bright_blue(),
                        elapsed_ms.to_string().cyan(),
                        result.modules_analyzed.to_string().cyan(),
                        num_threads.to_string().cyan()
                    )?;
                }
            }
            stdout.flush()?;

            if let Some(threshold) = cfg.fail_on
                && result.has_cycles_at_least(threshold)
            {
                info!("Found cycles at least as severe as '{}'", threshold);
                // Non-zero exit to fail CI
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
