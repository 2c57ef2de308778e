//! Run — wire transport, renderer and stop signal around one session.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CaptureResult;
use crate::ingest::{IngestionLoop, Session, SessionSummary};
use crate::render::{canvas_size, NullSurface, PlotSurface, PngSurface, Renderer};
use crate::runtime::stop::cancel_on_signal;
use crate::transport::SerialTransport;

/// Capture one session over the serial port until the sentinel or a stop signal.
pub async fn run(session: Session) -> CaptureResult<SessionSummary> {
    let renderer = Renderer::new(session.panels.clone(), live_surface(&session));

    let stop = CancellationToken::new();
    tokio::spawn(cancel_on_signal(stop.clone()));

    let mut ingest = IngestionLoop::new(session, renderer);
    ingest.connect(SerialTransport::open).await?;
    let result = ingest.run(&stop).await;
    stop.cancel();

    let summary = result?;
    print_summary(&summary);
    Ok(summary)
}

fn live_surface(session: &Session) -> Box<dyn PlotSurface> {
    match &session.live_view_path {
        Some(path) => {
            info!("Live view: {}", path.display());
            Box::new(PngSurface::new(path.clone(), canvas_size(session.panels.len())))
        }
        None => Box::new(NullSurface),
    }
}

fn print_summary(summary: &SessionSummary) {
    if summary.completed {
        println!("Session finished.");
    } else {
        println!("Stopped by user.");
    }
    println!("Rows recorded: {}", summary.rows);
    println!("Data saved to {}", summary.csv_path.display());
    if let Some(path) = &summary.image_path {
        println!("Graph saved to {}", path.display());
    }
    if let Some(peak) = summary.peak {
        println!("Max lux achieved: {:.2}", peak);
    }
}
