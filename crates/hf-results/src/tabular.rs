//! Tabular `.cvpr` text writer.
//!
//! Column-oriented plain text, one row per persisted snapshot: time, step
//! and cycle counters, the applied inlet value, recovered pressures, outlet
//! flow, then one area column per inlet node.

use crate::ResultsResult;
use hf_sim::{ResultSink, SimError, SimResult, Snapshot};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct TabularSink {
    writer: BufWriter<File>,
    rows: usize,
}

impl TabularSink {
    pub fn create(path: &Path) -> ResultsResult<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "# time_s step cycle inlet_value inlet_pressure_pa outlet_pressure_pa \
             outlet_flow_m3_s inlet_area_m2..."
        )?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and close; call after the run completes.
    pub fn finish(mut self) -> ResultsResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl ResultSink for TabularSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> SimResult<()> {
        let mut row = format!(
            "{:.6e} {} {} {:.6e} {:.6e} {:.6e} {:.6e}",
            snapshot.time_s,
            snapshot.step,
            snapshot.cycle,
            snapshot.inlet_value,
            snapshot.inlet_pressure_pa,
            snapshot.outlet_pressure_pa,
            snapshot.outlet_flow_m3_s,
        );
        for sample in &snapshot.inlet_nodes {
            row.push_str(&format!(" {:.6e}", sample.area_m2));
        }
        writeln!(self.writer, "{row}").map_err(|e| SimError::Sink {
            message: e.to_string(),
        })?;
        self.rows += 1;
        Ok(())
    }
}
