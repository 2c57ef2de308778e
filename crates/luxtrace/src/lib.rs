// Serial telemetry capture: parse, log, plot.

// Core infrastructure
pub mod error;
pub mod parser;
pub mod transport;

// Session data
pub mod logger;
pub mod render;
pub mod series;

// Session lifecycle
pub mod conf;
pub mod ingest;
pub mod runtime;
