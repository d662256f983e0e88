//! # CLI Entry Point
//!
//! ```bash
//! db ./mydata.db
//! ```
//!
//! Opens (or creates) the database file and runs the REPL until `.exit` or
//! end of input. Launching without a filename, or against a corrupt file,
//! fails before the first prompt with a non-zero exit status.

use std::env;
use std::process;

use eyre::Result;

use leafdb::cli::Repl;
use leafdb::Table;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Must supply a database filename.");
        process::exit(1);
    }

    if let Err(err) = run(&args[1]) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(filename: &str) -> Result<()> {
    let table = Table::open(filename)?;
    Repl::new(table).run()
}
