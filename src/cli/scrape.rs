//! `scrape` command.

use crate::client::AvailabilityService;
use crate::config::StudySphereConfig;
use crate::controller::SearchController;
use crate::models::TimeWindow;
use crate::{Error, Result};
use std::io::Write;

/// Runs `scrape` against the configured room service, writing to stdout.
///
/// # Errors
///
/// Returns an error for an invalid window or a failed request.
pub fn cmd_scrape(window: TimeWindow, config: &StudySphereConfig) -> Result<()> {
    let service = super::build_client(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_scrape(window, &service, &mut out)
}

/// Triggers collection for `window` and prints the service's message.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an invalid window (nothing is sent), the
/// service error if the request fails, or an error if output cannot be written.
pub fn run_scrape<S, W>(window: TimeWindow, service: &S, out: &mut W) -> Result<()>
where
    S: AvailabilityService + ?Sized,
    W: Write,
{
    let mut controller = SearchController::new(window);
    let ack = controller.collect(service)?;

    writeln!(out, "{}", ack.message).map_err(|e| Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    })
}
