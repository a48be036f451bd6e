//! `search` command.

use crate::client::AvailabilityService;
use crate::config::StudySphereConfig;
use crate::controller::{SearchController, SearchPhase};
use crate::models::TimeWindow;
use crate::rendering::{BuildingImageIndex, OutputFormat, RoomDisplayMapper, render};
use crate::{Error, Result};
use std::io::Write;
use std::sync::Arc;

/// Arguments for the `search` command.
#[derive(Debug, Clone)]
pub struct SearchArgs {
    /// Building filter; empty for all.
    pub building: String,
    /// Window to search.
    pub window: TimeWindow,
    /// Output format.
    pub format: OutputFormat,
}

/// Loading notice written while the request is in flight.
pub const LOADING_MESSAGE: &str = "Loading rooms...";

/// Runs `search` against the configured room service.
///
/// Results go to stdout and the loading notice to stderr, so JSON output
/// stays parseable.
///
/// # Errors
///
/// Returns an error for an invalid window or when output cannot be written.
/// A failed request is not an error here; it is reported and reflected in the
/// returned phase.
pub fn cmd_search(args: &SearchArgs, config: &StudySphereConfig) -> Result<SearchPhase> {
    let service = Arc::new(super::build_client(config));
    let mapper = RoomDisplayMapper::new(BuildingImageIndex::from_config(&config.images));
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    run_search(args, service, &mapper, &mut stdout.lock(), &mut stderr.lock())
}

/// Runs a search through a [`SearchController`] and renders the outcome.
///
/// The request runs on a background thread while the controller reports
/// `Loading`; [`LOADING_MESSAGE`] is written to `progress` meanwhile.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an invalid window (nothing is sent), or
/// an error if output cannot be written.
pub fn run_search<S, W, P>(
    args: &SearchArgs,
    service: Arc<S>,
    mapper: &RoomDisplayMapper,
    out: &mut W,
    progress: &mut P,
) -> Result<SearchPhase>
where
    S: AvailabilityService + ?Sized + 'static,
    W: Write,
    P: Write,
{
    let mut controller = SearchController::new(args.window);
    controller.set_building(args.building.clone());

    let pending = controller.spawn_search(service)?;
    tracing::info!(generation = pending.ticket().generation(), "Loading rooms");
    write_line(progress, LOADING_MESSAGE)?;
    controller.finish(pending);

    let state = controller.state();
    match state.phase {
        SearchPhase::Success => {
            let records = controller.display_records(mapper);
            let rendered = render(&records, args.format)?;
            if args.format == OutputFormat::Text {
                if let Some(message) = &state.message {
                    write_line(out, message)?;
                }
            }
            write_line(out, &rendered)?;
        },
        _ => {
            let error = state.error.as_deref().unwrap_or("search did not complete");
            write_line(out, &format!("Error: {error}"))?;
        },
    }

    Ok(state.phase)
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{}", line.trim_end()).map_err(|e| Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    })
}
