//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use fieldcheck_config::config_crate_version;
use fieldcheck_domain::domain_crate_version;
use fieldcheck_shared::shared_crate_version;

const NAME: &str = "fieldcheck";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_ndjson() {
        format_info_ndjson()?
    } else if mode.is_json() {
        format_info_json()?
    } else {
        format_info_text()
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn build_payload() -> serde_json::Value {
    serde_json::json!({
        "name": NAME,
        "version": VERSION,
        "domainVersion": domain_crate_version(),
        "configVersion": config_crate_version(),
        "sharedVersion": shared_crate_version(),
    })
}

fn format_info_text() -> String {
    format!(
        "status: ok\nname: {NAME}\nversion: {VERSION}\ndomain: {}\nconfig: {}\nshared: {}\n",
        domain_crate_version(),
        config_crate_version(),
        shared_crate_version(),
    )
}

fn format_info_json() -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "build": build_payload(),
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}

fn format_info_ndjson() -> Result<String, CliError> {
    let payload = serde_json::json!({
        "type": "summary",
        "status": "ok",
        "kind": "info",
        "build": build_payload(),
    });
    let mut output = serde_json::to_string(&payload)?;
    output.push('\n');
    Ok(output)
}
