//! Command-line interface (CLI) for tdop-calc
//!
//! Evaluates calculator expressions with the exact [`ARITHMETIC`] grammar,
//! prints the tagged serialization of values, samples functions of `x` the
//! way a plotting front end would, and runs a line-oriented REPL.
//!
//! Set `RUST_LOG=info` to see parser statistics, `RUST_LOG=trace` to see
//! every recognized token and dispatched nud/led.

use anyhow::{Result, anyhow};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, BufRead, Write};
use tdop::{ParseError, ParserStats};
use tdop_calc::{ALGEBRA, ARITHMETIC, Function, Value};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates an expression
    Eval {
        /// Expression
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Prints the serialized form of an expression
    Json {
        /// Expression
        #[arg(allow_hyphen_values = true)]
        expr: String,
        /// Keep the expression symbolic instead of evaluating it
        #[arg(short, long)]
        symbolic: bool,
    },
    /// Samples a function of x
    Sample {
        /// Function body
        #[arg(allow_hyphen_values = true)]
        expr: String,
        /// First x
        #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
        from: f64,
        /// Last x
        #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
        to: f64,
        /// Distance between samples
        #[arg(long, default_value_t = 1.0)]
        step: f64,
        /// Value of the time parameter t
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        time: f64,
    },
    /// Reads expressions from standard input, one per line
    Repl {
        /// Keep expressions symbolic instead of evaluating them
        #[arg(short, long)]
        symbolic: bool,
    },
}

fn parse(input: &str, symbolic: bool) -> Result<(Value, ParserStats), ParseError> {
    if symbolic {
        ALGEBRA.parse_with_stats(input)
    } else {
        ARITHMETIC.parse_with_stats(input)
    }
}

fn parse_reported(input: &str, symbolic: bool) -> Result<Value> {
    let (value, stats) = parse(input, symbolic).map_err(|e| anyhow!("{}", e.report()))?;
    log::info!("Stats: {:?}", stats);
    Ok(value)
}

fn repl(symbolic: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_reported(&line, symbolic) {
            Ok(value) => writeln!(stdout, "{}", value)?,
            Err(e) => eprintln!("{}", e),
        }
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval { expr } => {
            println!("{}", parse_reported(&expr, false)?);
        }
        Commands::Json { expr, symbolic } => {
            let value = parse_reported(&expr, symbolic)?;
            println!("{}", serde_json::to_string(&value)?);
        }
        Commands::Sample {
            expr,
            from,
            to,
            step,
            time,
        } => {
            let function = Function::new(parse_reported(&expr, true)?);
            for (x, y) in function.sample_at(from, to, step, time)? {
                println!("{} {}", x, y);
            }
        }
        Commands::Repl { symbolic } => repl(symbolic)?,
    }

    Ok(())
}
