//! Plain-text run summary log.
//!
//! Human-readable report written alongside the tabular output: a startup
//! banner, one line per cardiac cycle, and a closing footer (or the failure
//! that ended the run). Pressures are reported in mmHg, the clinical unit.

use crate::ResultsResult;
use crate::types::CycleRecord;
use hf_core::units::pa_to_mmhg;
use hf_sim::RunSummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct SummaryLog {
    writer: BufWriter<File>,
}

impl SummaryLog {
    pub fn create(path: &Path) -> ResultsResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn header(
        &mut self,
        config_name: &str,
        run_id: &str,
        cycles: u32,
        coupled: bool,
    ) -> ResultsResult<()> {
        writeln!(self.writer, "hemoflow run summary")?;
        writeln!(self.writer, "config:  {config_name}")?;
        writeln!(self.writer, "run id:  {run_id}")?;
        writeln!(self.writer, "cycles:  {cycles}")?;
        writeln!(
            self.writer,
            "mode:    {}",
            if coupled { "1D-3D coupled" } else { "1D only" }
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn cycle(&mut self, record: &CycleRecord) -> ResultsResult<()> {
        match &record.ffr {
            Some(ffr) => writeln!(
                self.writer,
                "cycle {:>3}  length {:.4} s  mean flow {:.3e} m3/s  \
                 Pa {:.1} mmHg  Pd {:.1} mmHg  FFR {:.3}",
                record.cycle,
                record.cycle_length_s,
                ffr.mean_flow_m3_s,
                pa_to_mmhg(ffr.mean_proximal_pressure_pa),
                pa_to_mmhg(ffr.mean_distal_pressure_pa),
                ffr.ffr,
            )?,
            None => writeln!(
                self.writer,
                "cycle {:>3}  length {:.4} s  (not actively coupled)",
                record.cycle, record.cycle_length_s,
            )?,
        }
        Ok(())
    }

    pub fn failure(&mut self, message: &str) -> ResultsResult<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "run failed: {message}")?;
        Ok(())
    }

    pub fn footer(&mut self, summary: &RunSummary) -> ResultsResult<()> {
        writeln!(self.writer)?;
        if summary.aborted {
            writeln!(self.writer, "run aborted by user")?;
        }
        writeln!(
            self.writer,
            "completed {} cycles in {} steps",
            summary.cycles_completed, summary.steps
        )?;
        if let Some(ffr) = &summary.last_ffr {
            writeln!(self.writer, "final FFR: {:.3}", ffr.ffr)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> ResultsResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FfrRecord;

    #[test]
    fn report_contains_cycle_and_footer_lines() {
        let path = std::env::temp_dir().join("hf_results_summary_smoke.txt");
        let mut log = SummaryLog::create(&path).unwrap();
        log.header("coronary-demo", "abc123", 3, true).unwrap();
        log.cycle(&CycleRecord {
            cycle: 1,
            cycle_length_s: 0.8,
            ffr: Some(FfrRecord {
                mean_flow_m3_s: 2.4e-5,
                mean_proximal_pressure_pa: 10_800.0,
                mean_distal_pressure_pa: 5_900.0,
                ffr: 0.546,
            }),
        })
        .unwrap();
        log.footer(&RunSummary {
            steps: 60,
            cycles_completed: 3,
            final_cycle_length_s: 0.8,
            last_ffr: None,
            aborted: false,
        })
        .unwrap();
        log.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("coronary-demo"));
        assert!(content.contains("FFR 0.546"));
        assert!(content.contains("completed 3 cycles in 60 steps"));
    }
}
