//! Persistence of the normalized product table.
//!
//! Three sinks receive the same table: a CSV file, a Postgres table and a
//! Google Sheets range. They run one after another and fail independently;
//! a failing sink is logged and reported, never propagated.

pub mod csv_sink;
pub mod error;
pub mod postgres;
pub mod sheets;

use std::fmt;

use reqwest::Client;

use fstudio_core::{AppConfig, NormalizedProductRecord};

pub use csv_sink::write_csv;
pub use error::LoadError;
pub use postgres::load_postgres;
pub use sheets::{ServiceAccountKey, SheetsSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Csv,
    Postgres,
    Sheets,
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Csv => write!(f, "csv"),
            Sink::Postgres => write!(f, "postgres"),
            Sink::Sheets => write!(f, "sheets"),
        }
    }
}

/// Result of one sink: rows written, or why it failed.
#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: Sink,
    pub result: Result<u64, LoadError>,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub outcomes: Vec<SinkOutcome>,
}

impl LoadReport {
    #[must_use]
    pub fn outcome(&self, sink: Sink) -> Option<&SinkOutcome> {
        self.outcomes.iter().find(|o| o.sink == sink)
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Writes `rows` to every sink in turn: CSV, then Postgres, then Sheets.
///
/// Each sink's failure is logged and recorded in the report; later sinks
/// still run.
pub async fn load_all(
    config: &AppConfig,
    http: &Client,
    rows: &[NormalizedProductRecord],
) -> LoadReport {
    let mut report = LoadReport::default();

    let csv = write_csv(&config.csv_path, rows).map(|n| n as u64);
    report.outcomes.push(record(Sink::Csv, csv));

    let postgres = load_postgres(config, rows).await;
    report.outcomes.push(record(Sink::Postgres, postgres));

    let sheets = SheetsSink::new(http, &config.sheets)
        .write(rows)
        .await
        .map(|n| n as u64);
    report.outcomes.push(record(Sink::Sheets, sheets));

    report
}

fn record(sink: Sink, result: Result<u64, LoadError>) -> SinkOutcome {
    match &result {
        Ok(rows) => tracing::info!(sink = %sink, rows, "sink loaded"),
        Err(e) => tracing::error!(sink = %sink, error = %e, "sink failed"),
    }
    SinkOutcome { sink, result }
}
