use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{CaptureError, CaptureResult};
use crate::ingest::lines::LineSplitter;
use crate::ingest::progress::{progress_line, Progress};
use crate::ingest::session::{IngestMode, Session};
use crate::ingest::stats::{SessionStats, SessionSummary};
use crate::logger::LineLogger;
use crate::parser::{Record, RecordParser};
use crate::render::Renderer;
use crate::series::SeriesBuffer;
use crate::transport::{Transport, TransportError, TransportSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Listening,
    Processing,
    Finished,
    Failed,
}

/// Outcome of one Listening/Processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing was buffered
    Idle,
    Processed { accepted: usize },
    /// Sentinel seen; the session is over
    Finished,
}

/// Drives one session: transport bytes in, CSV rows and plots out.
///
/// Single owner of the transport, the series buffer and the log. Every
/// append and every redraw happens on the caller's task, so nothing here
/// needs locking.
pub struct IngestionLoop<T: Transport> {
    parser: RecordParser,
    series: SeriesBuffer,
    logger: Option<LineLogger>,
    renderer: Renderer,
    transport: Option<T>,
    splitter: LineSplitter,
    state: LoopState,
    stats: SessionStats,
    progress: Progress,
    completed: bool,
    session: Session,
}

impl<T: Transport> IngestionLoop<T> {
    pub fn new(session: Session, renderer: Renderer) -> Self {
        Self {
            parser: RecordParser::new(session.schema.clone()),
            series: SeriesBuffer::new(&session.schema),
            logger: None,
            renderer,
            transport: None,
            splitter: LineSplitter::new(),
            state: LoopState::Connecting,
            stats: SessionStats::default(),
            progress: Progress::new(session.progress),
            completed: false,
            session,
        }
    }

    /// Open the transport, let it settle, drop stale input and create the log.
    ///
    /// Nothing is written to disk unless the transport opened.
    pub async fn connect<F>(&mut self, open: F) -> CaptureResult<()>
    where
        F: FnOnce(&TransportSettings) -> Result<T, TransportError>,
    {
        self.set_state(LoopState::Connecting);
        info!(
            "Connecting to {} at {} baud",
            self.session.transport.port, self.session.transport.baud
        );

        let mut transport = match open(&self.session.transport) {
            Ok(transport) => transport,
            Err(source) => return Err(self.acquisition_failed(source)),
        };

        tokio::time::sleep(self.session.settle).await;
        if let Err(source) = transport.clear_input() {
            transport.close();
            return Err(self.acquisition_failed(source));
        }

        if let Some(target) = self.session.target {
            let command = format!("T{}", target);
            match transport.write_line(&command) {
                Ok(()) => info!("Sent setpoint {}", command),
                Err(e) => warn!("Failed to send setpoint {}: {}", command, e),
            }
        }

        match LineLogger::create(&self.session.csv_path, &self.session.schema.header()) {
            Ok(logger) => self.logger = Some(logger),
            Err(e) => {
                transport.close();
                self.set_state(LoopState::Failed);
                return Err(e);
            }
        }

        self.transport = Some(transport);
        self.set_state(LoopState::Listening);
        info!(
            "Connected to {} ({} session). Waiting for data...",
            self.session.transport.port, self.session.kind
        );
        Ok(())
    }

    /// One pass: drain whatever is buffered and process it.
    pub fn poll_once(&mut self) -> CaptureResult<Tick> {
        match self.state {
            LoopState::Listening => {}
            LoopState::Finished => return Ok(Tick::Finished),
            other => return Err(CaptureError::InvalidState(other)),
        }

        let chunk = match self.drain() {
            Ok(chunk) => chunk,
            Err(e) => return Err(self.fail(e.into())),
        };
        if chunk.is_empty() {
            return Ok(Tick::Idle);
        }

        self.set_state(LoopState::Processing);
        self.stats.chunks += 1;
        let lines = self.splitter.push(&chunk);

        match self.process_lines(lines) {
            Ok(tick) => {
                if tick != Tick::Finished {
                    self.set_state(LoopState::Listening);
                }
                Ok(tick)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Tight polling loop for sessions where no line may be skipped.
    pub async fn run_polling(&mut self, stop: &CancellationToken) -> CaptureResult<SessionSummary> {
        loop {
            if stop.is_cancelled() {
                info!("Stop requested, ending session");
                break;
            }
            match self.poll_once()? {
                Tick::Idle => tokio::time::sleep(self.session.poll_interval).await,
                Tick::Processed { .. } => tokio::task::yield_now().await,
                Tick::Finished => break,
            }
        }
        self.finish()
    }

    /// Timer-driven loop: one pass per tick.
    pub async fn run_ticked(&mut self, stop: &CancellationToken) -> CaptureResult<SessionSummary> {
        let mut ticker = tokio::time::interval(self.session.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.poll_once()? == Tick::Finished {
                        break;
                    }
                }
                _ = stop.cancelled() => {
                    info!("Stop requested, ending session");
                    break;
                }
            }
        }
        self.finish()
    }

    /// Run with the driver that suits the session's ingest mode.
    pub async fn run(&mut self, stop: &CancellationToken) -> CaptureResult<SessionSummary> {
        match self.session.mode {
            IngestMode::Exhaustive => self.run_polling(stop).await,
            IngestMode::LatestOnly => self.run_ticked(stop).await,
        }
    }

    /// Export the final plot, release the transport and summarise.
    pub fn finish(&mut self) -> CaptureResult<SessionSummary> {
        match self.state {
            LoopState::Listening | LoopState::Processing | LoopState::Finished => {}
            other => return Err(CaptureError::InvalidState(other)),
        }
        self.progress.finish();
        self.set_state(LoopState::Finished);

        if let Some(path) = &self.session.image_path {
            match self.renderer.export(&self.series, path) {
                Ok(()) => info!("Saved plot to {}", path.display()),
                Err(e) => warn!("Failed to export plot to {}: {}", path.display(), e),
            }
        }
        self.release();

        let measured = self.session.kind.measured_column();
        let summary = SessionSummary {
            rows: self.series.len(),
            csv_path: self.session.csv_path.clone(),
            image_path: self.session.image_path.clone(),
            peak: (!self.series.is_empty()).then(|| self.series.max_or(measured, 0.0)),
            completed: self.completed,
            stats: self.stats.clone(),
        };

        info!(
            rows = summary.rows,
            rejected = summary.stats.rejected(),
            skipped = summary.stats.skipped_stale,
            "Session finished, data saved to {}",
            summary.csv_path.display()
        );
        Ok(summary)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn series(&self) -> &SeriesBuffer {
        &self.series
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    fn drain(&mut self) -> Result<Vec<u8>, TransportError> {
        let transport = self.transport.as_mut().ok_or(TransportError::Closed)?;

        let available = transport.bytes_available()?;
        if available == 0 {
            return Ok(Vec::new());
        }

        // Take the whole backlog so the newest sample is never delayed
        let mut chunk = vec![0u8; available];
        let mut filled = 0;
        while filled < available {
            let n = transport.read_available(&mut chunk[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        chunk.truncate(filled);
        Ok(chunk)
    }

    fn process_lines(&mut self, lines: Vec<String>) -> CaptureResult<Tick> {
        let mut lines: Vec<String> = lines.into_iter().filter(|l| !l.trim().is_empty()).collect();

        if self.session.mode == IngestMode::LatestOnly && lines.len() > 1 {
            // The sentinel still ends the session when it is not the newest line
            let keep = lines
                .iter()
                .position(|l| self.is_sentinel(l))
                .unwrap_or(lines.len() - 1);
            self.stats.skipped_stale += keep as u64;
            lines = lines.split_off(keep);
            lines.truncate(1);
        }

        let mut accepted = 0;
        for line in lines {
            self.stats.lines_seen += 1;

            if self.is_sentinel(&line) {
                info!("End of session signalled: {:?}", line.trim());
                self.splitter.clear();
                self.completed = true;
                self.set_state(LoopState::Finished);
                if accepted > 0 {
                    self.renderer.redraw(&self.series);
                }
                return Ok(Tick::Finished);
            }

            match self.parser.parse(&line) {
                Ok(record) => {
                    self.accept(&record)?;
                    accepted += 1;
                }
                Err(rejection) => {
                    debug!("Discarding line {:?}: {}", line, rejection);
                    self.stats.record_rejection(&rejection);
                }
            }
        }

        if accepted > 0 {
            self.renderer.redraw(&self.series);
        }
        Ok(Tick::Processed { accepted })
    }

    fn accept(&mut self, record: &Record) -> CaptureResult<()> {
        // Durable first: the buffer only ever holds rows that made it to disk
        if let Some(logger) = self.logger.as_mut() {
            logger.append(record)?;
        }
        self.series.append(record)?;
        self.stats.accepted += 1;
        self.progress.show(&progress_line(self.session.kind, record));
        Ok(())
    }

    fn is_sentinel(&self, line: &str) -> bool {
        line.contains(self.session.sentinel.as_str())
    }

    fn acquisition_failed(&mut self, source: TransportError) -> CaptureError {
        self.set_state(LoopState::Failed);
        error!("Failed to open {}: {}", self.session.transport.port, source);
        CaptureError::TransportAcquisition {
            port: self.session.transport.port.clone(),
            source,
        }
    }

    fn fail(&mut self, err: CaptureError) -> CaptureError {
        self.progress.finish();
        error!("Session failed: {}", err);
        self.set_state(LoopState::Failed);
        self.release();
        err
    }

    fn release(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            debug!("Transport released");
        }
    }

    fn set_state(&mut self, next: LoopState) {
        if self.state != next {
            debug!("Ingestion loop: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
