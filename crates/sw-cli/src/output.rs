//! Status line output

use std::process::ExitCode;

use sw_core::Verdict;

/// Print the verdict as the only stdout line and map it to the exit code
pub fn report(verdict: &Verdict) -> ExitCode {
    println!("{}", status_line(verdict));
    ExitCode::from(verdict.exit_code())
}

/// `<STATUS>: <message>`, kept on a single line
pub fn status_line(verdict: &Verdict) -> String {
    let message = verdict.message.lines().next().unwrap_or_default();
    format!("{}: {}", verdict.status, message)
}

/// One-line summary of a clap parse error
pub fn clap_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
