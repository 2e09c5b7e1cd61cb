//! Print the effective checker config (file + env overrides) as JSON.
//!
//! Without a path, prints the default validation section with env overrides.

use fieldcheck_config::{CheckerEnv, ValidationConfig, load_checker_config_std_env, to_pretty_json};
use std::io;
use std::io::Write;
use std::path::PathBuf;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::ExitCode::from(1)
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let output = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let settings = load_checker_config_std_env(&path)?;
            to_pretty_json(&settings.to_config())?
        },
        None => {
            let env = CheckerEnv::from_std_env()?;
            let mut validation = ValidationConfig::default();
            env.apply_to(&mut validation);
            let mut output = serde_json::to_string_pretty(&validation)?;
            output.push('\n');
            output
        },
    };

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
