use clap::{Parser as ClapParser, Subcommand};
use mql::cli::{self, CliError, RunOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "mql")]
#[command(about = "MQL - a query engine for filtering, projecting, and sampling JSON event streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the syntax of an MQL query
    Check {
        /// The MQL query to compile
        query: String,

        /// Print the compiled query structure
        #[arg(long)]
        dump: bool,
    },

    /// Run NDJSON documents through a query (filter, sample, project)
    Run {
        /// The MQL query to execute
        query: String,

        /// NDJSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the projected documents
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { query, dump } => run_check(query, dump),
        Commands::Run {
            query,
            input,
            pretty,
        } => run_stream(query, input, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(query: String, dump: bool) -> Result<(), CliError> {
    let compiled = cli::execute_check(&query)?;
    if dump {
        println!("{:#?}", compiled);
    } else {
        println!("Syntax is valid");
    }
    Ok(())
}

fn run_stream(query: String, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let input = match input {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let options = RunOptions {
        query,
        input,
        pretty,
    };

    let mut stdout = io::stdout();
    cli::execute_run(&options, &mut stdout)
}
