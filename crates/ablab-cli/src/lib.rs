//! Pipeline orchestration for the `ablab` binary
//!
//! Validate config, generate the full in-memory row set, aggregate,
//! then write all three tables through the injected `TableSink`. The
//! sink is the only effectful collaborator, so tests drive the whole
//! pipeline against `MemorySink`.

use ablab_sim::{summarize, SimError, SimulationConfig, Simulator};
use ablab_sink::{
    session_row, summary_row, variant_row, SinkError, TableSink, SESSIONS_TABLE, SUMMARY_TABLE,
    VARIANTS_TABLE,
};
use tracing::info;

/// Pipeline failure: either the simulation or the sink.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<ablab_sim::ConfigError> for PipelineError {
    fn from(err: ablab_sim::ConfigError) -> Self {
        Self::Sim(SimError::Config(err))
    }
}

/// Row counts and headline statistics from a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub sessions_written: u64,
    pub variants_written: u64,
    pub summary_rows_written: u64,
    pub conversions: u64,
    pub overall_conversion_rate: f64,
    pub avg_time_spent_seconds: f64,
}

/// Run the full simulation and write every table through `sink`.
///
/// All generation happens before the first write; a sink failure leaves
/// whatever the store itself committed, never a silently partial
/// success reported as complete.
pub async fn run_with_sink<S: TableSink>(
    config: SimulationConfig,
    sink: &S,
) -> Result<RunReport, PipelineError> {
    let mut simulator = Simulator::new(config)?;
    let run = simulator.generate()?;
    let summary = summarize(&run.sessions);

    let conversions = run.sessions.iter().filter(|s| s.converted).count() as u64;
    let total = run.sessions.len() as u64;
    let avg_time: f64 = run
        .sessions
        .iter()
        .map(|s| f64::from(s.time_spent_seconds))
        .sum::<f64>()
        / total as f64;

    sink.create_or_replace(&SESSIONS_TABLE).await?;
    sink.create_or_replace(&VARIANTS_TABLE).await?;
    sink.create_or_replace(&SUMMARY_TABLE).await?;

    let session_rows: Vec<_> = run.sessions.iter().map(session_row).collect();
    let sessions_written = sink
        .bulk_insert(SESSIONS_TABLE.name, &session_rows)
        .await?;
    info!(rows = sessions_written, table = SESSIONS_TABLE.name, "written");

    let variant_rows: Vec<_> = run.variants.iter().map(variant_row).collect();
    let variants_written = sink
        .bulk_insert(VARIANTS_TABLE.name, &variant_rows)
        .await?;
    info!(rows = variants_written, table = VARIANTS_TABLE.name, "written");

    let summary_rows: Vec<_> = summary.iter().map(summary_row).collect();
    let summary_rows_written = sink.bulk_insert(SUMMARY_TABLE.name, &summary_rows).await?;
    info!(rows = summary_rows_written, table = SUMMARY_TABLE.name, "written");

    Ok(RunReport {
        sessions_written,
        variants_written,
        summary_rows_written,
        conversions,
        overall_conversion_rate: conversions as f64 / total as f64,
        avg_time_spent_seconds: avg_time,
    })
}

impl RunReport {
    /// Human-readable completion report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("A/B Testing Simulation Complete\n");
        out.push_str(&format!("  Sessions written: {}\n", self.sessions_written));
        out.push_str(&format!("  Variants written: {}\n", self.variants_written));
        out.push_str(&format!(
            "  Summary rows written: {}\n",
            self.summary_rows_written
        ));
        out.push_str(&format!("  Conversions: {}\n", self.conversions));
        out.push_str(&format!(
            "  Overall conversion rate: {:.2}%\n",
            self.overall_conversion_rate * 100.0
        ));
        out.push_str(&format!(
            "  Average time spent: {:.1}s\n",
            self.avg_time_spent_seconds
        ));
        out
    }
}
