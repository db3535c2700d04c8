//! ldpolicy CLI - transform and check JSON-LD policy documents

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use ldpolicy::cli::{self, CliError, Outcome};

#[derive(Parser)]
#[command(name = "ldpolicy")]
#[command(version, about = "Transform JSON-LD policy documents into the policy model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reject documents nested deeper than this
    #[arg(long, global = true, default_value_t = 64)]
    max_depth: usize,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the domain policy as JSON, problems on stderr
    Transform {
        /// Policy document, or `-` for stdin
        file: PathBuf,
    },

    /// Print the document re-emitted through the domain model
    Normalize {
        /// Policy document, or `-` for stdin
        file: PathBuf,
    },

    /// Only list problems
    Check {
        /// Policy document, or `-` for stdin
        file: PathBuf,
    },

    /// List registered transformers
    Transformers,
}

fn main() {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Transform { file } => run(&file, args.max_depth, cli::transform_document),
        Commands::Normalize { file } => {
            run(&file, args.max_depth, |registry, input| Ok(cli::normalize_document(registry, input)))
        }
        Commands::Check { file } => {
            run(&file, args.max_depth, |registry, input| Ok(cli::check_document(registry, input))).map(
                |outcome| {
                    if outcome.is_clean() {
                        println!("✓ {} is a valid policy", file.display());
                    } else if !outcome.complete {
                        eprintln!("✗ {} is not a policy object", file.display());
                    }
                    outcome
                },
            )
        }
        Commands::Transformers => list_transformers(),
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if let Some(output) = &outcome.output {
        let printed = if args.pretty {
            serde_json::to_string_pretty(output)
        } else {
            serde_json::to_string(output)
        };
        match printed {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize output: {}", e);
                process::exit(cli::EXIT_FAILURE);
            }
        }
    }

    for problem in &outcome.problems {
        eprintln!("warning: {}", problem);
    }

    let code = outcome.exit_code();
    if code != 0 {
        process::exit(code);
    }
}

fn run(
    file: &std::path::Path,
    max_depth: usize,
    command: impl FnOnce(&ldpolicy::TransformerRegistry, &serde_json::Value) -> Result<Outcome, CliError>,
) -> Result<Outcome, CliError> {
    let registry = cli::registry()?;
    let input = cli::read_document(file, max_depth)?;
    command(&registry, &input)
}

fn list_transformers() -> Result<Outcome, CliError> {
    let registry = cli::registry()?;

    for info in registry.list_transformers() {
        println!("{}", info);
    }

    Ok(Outcome {
        output: None,
        problems: Vec::new(),
        complete: true,
    })
}
