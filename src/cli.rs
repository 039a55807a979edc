//! The enumgram command-line interface.
//!
//! Loads a grammar file, compiles the requested start production, and
//! streams the enumerated statements to stdout. Errors are rendered through
//! miette with full diagnostics on stderr.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::generator::statements;
use crate::grammar::GrammarStore;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "enumgram",
    version,
    about = "Exhaustively enumerate the statements derivable from a Yacc-like grammar."
)]
pub struct EnumgramArgs {
    /// The grammar file to enumerate from.
    #[arg(required = true)]
    pub grammar: PathBuf,

    /// Name of the start production.
    #[arg(short, long)]
    pub start: String,

    /// Stop after this many statements.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print only the number of derivable statements.
    #[arg(long, conflicts_with = "json")]
    pub count: bool,

    /// Emit each statement as a JSON string, one per line.
    #[arg(long)]
    pub json: bool,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = EnumgramArgs::parse();
    if let Err(report) = execute(&args) {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

fn execute(args: &EnumgramArgs) -> miette::Result<()> {
    let file_name = args.grammar.display().to_string();
    let source = fs::read_to_string(&args.grammar)
        .map_err(|e| miette::miette!("cannot read grammar file '{}': {}", file_name, e))?;

    let store = GrammarStore::from_source(&file_name, &source)?;
    let sequence = statements(&store, &args.start)?;
    let limit = args.limit.unwrap_or(usize::MAX);

    if args.count {
        println!("{}", sequence.take(limit).count());
        return Ok(());
    }

    for statement in sequence.take(limit) {
        if args.json {
            let line = serde_json::to_string(&statement)
                .map_err(|e| miette::miette!("cannot encode statement as JSON: {}", e))?;
            println!("{line}");
        } else {
            println!("{statement}");
        }
    }
    Ok(())
}
