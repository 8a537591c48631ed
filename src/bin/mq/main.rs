//! # mq
//!
//! The command-line wrapper around the MistQL interpreter: reads JSON from a
//! file or stdin, evaluates the query, and prints the result as indented
//! JSON.

mod cli;

use std::io::Read;
use std::process::ExitCode;
use std::{fs, io};

use cli::Cli;

fn main() -> ExitCode {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let input = match read_input(&args) {
        Ok(input) => input,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let data: serde_json::Value = match serde_json::from_str(&input) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("input is not valid JSON: {error}");
            return ExitCode::FAILURE;
        }
    };

    let result = match mistql::query(&args.query, &data) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    match result.to_json().map(|json| serde_json::to_string_pretty(&json)) {
        Ok(Ok(rendered)) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Ok(Err(error)) => {
            eprintln!("failed to render result: {error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(args: &Cli) -> Result<String, io::Error> {
    match &args.file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
