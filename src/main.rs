use clap::{Parser as ClapParser, Subcommand};
use jsonformula::cli::{self, CliError, EvalOptions, EvalOutcome, MapOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jsonformula")]
#[command(about = "jsonformula - compute values from JSON documents with spreadsheet-style formulas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a JSON document
    Eval {
        /// The formula to evaluate, e.g. "SUM(lines.amount)"
        formula: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Build an object from a JSON mapping of field names to formulas
    Map {
        /// Mapping, e.g. '{"total": "SUM(lines.amount)"}'
        mapping: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Store null for fields whose formula fails instead of aborting
        #[arg(long)]
        lenient: bool,
    },

    /// List the available functions
    Functions,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            formula,
            input,
            pretty,
            syntax_only,
        } => run_eval(formula, input, pretty, syntax_only),
        Commands::Map {
            mapping,
            input,
            pretty,
            lenient,
        } => run_map(mapping, input, pretty, lenient),
        Commands::Functions => {
            print!("{}", cli::functions_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_eval(
    formula: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = if syntax_only { None } else { read_input(input)? };

    let options = EvalOptions {
        formula,
        input,
        syntax_only,
    };

    match cli::execute_eval(&options)? {
        EvalOutcome::SyntaxValid => println!("Syntax is valid"),
        EvalOutcome::Success(output) => print_json(&output, pretty)?,
    }
    Ok(())
}

fn run_map(
    mapping: String,
    input: Option<String>,
    pretty: bool,
    lenient: bool,
) -> Result<(), CliError> {
    let options = MapOptions {
        mapping,
        input: read_input(input)?,
        lenient,
    };

    let output = cli::execute_map(&options)?;
    print_json(&output, pretty)
}
