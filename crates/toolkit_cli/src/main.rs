//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `toolkit_core` linkage with deterministic output.
//! - Normalize a date, time or email given on the command line.
//!
//! Usage: `toolkit_cli [date|time|email <value>]`

use std::process::ExitCode;
use toolkit_core::{DateOnly, Field, TimeOnly, Validation};

fn main() -> ExitCode {
    println!("toolkit_core ping={}", toolkit_core::ping());
    println!("toolkit_core version={}", toolkit_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => ExitCode::SUCCESS,
        [kind, value] => match run(kind, value) {
            Ok(output) => {
                println!("{output}");
                ExitCode::SUCCESS
            }
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: toolkit_cli [date|time|email <value>]");
            ExitCode::from(2)
        }
    }
}

fn run(kind: &str, value: &str) -> Result<String, String> {
    match kind {
        "date" => {
            let date = DateOnly::parse_text(value).map_err(|err| err.to_string())?;
            Ok(format!(
                "date={date} start={} end={}",
                date.start_of_day().to_rfc3339(),
                date.end_of_day().to_rfc3339()
            ))
        }
        "time" => {
            let time = TimeOnly::parse_text(value).map_err(|err| err.to_string())?;
            Ok(format!("time={time}"))
        }
        "email" => {
            let mut validation = Validation::new(None);
            validation.email(&[Field::new("email", "Email", value)]);
            match validation.error("email") {
                None => Ok(format!("email={value} valid=true")),
                Some(message) => Err(message.to_string()),
            }
        }
        other => Err(format!("unknown kind `{other}`; expected date|time|email")),
    }
}
