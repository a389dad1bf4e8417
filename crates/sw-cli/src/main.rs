//! snapwatch
//!
//! Monitoring plugin that reports how old the newest snapshot of a restic
//! repository on an SFTP host is. Prints one `<STATUS>: <message>` line and
//! exits with 0 (OK), 1 (WARNING), 2 (CRITICAL) or 3 (UNKNOWN).

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use snapwatch::args::Cli;
use snapwatch::logging::init_logging;
use snapwatch::output::{clap_error_message, report};
use sw_core::{Probe, Verdict};
use sw_transport::SftpTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => return report(&Verdict::unknown(clap_error_message(&e))),
        },
    };

    init_logging(cli.quiet, cli.verbose);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => return report(&Verdict::unknown(e.to_string())),
    };

    let verdict = Probe::new(SftpTransport::new(), config).run().await;
    tracing::info!("{}", verdict);
    report(&verdict)
}
