//! Adapter seam for external mesh-format writers.
//!
//! When tabular output is disabled the snapshots go to whatever mesh
//! post-processing writer the embedding application provides. The step loop
//! only ever sees the `ResultSink` trait.

use crate::ResultsResult;
use hf_sim::{ResultSink, SimError, SimResult, Snapshot};

/// Implemented by external mesh-output backends.
pub trait MeshWriter {
    fn write_step(&mut self, snapshot: &Snapshot) -> ResultsResult<()>;
}

pub struct MeshSinkAdapter {
    writer: Box<dyn MeshWriter>,
}

impl MeshSinkAdapter {
    pub fn new(writer: Box<dyn MeshWriter>) -> Self {
        Self { writer }
    }
}

impl ResultSink for MeshSinkAdapter {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> SimResult<()> {
        self.writer
            .write_step(snapshot)
            .map_err(|e| SimError::Sink {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWriter {
        count: Arc<AtomicUsize>,
    }

    impl MeshWriter for CountingWriter {
        fn write_step(&mut self, _snapshot: &Snapshot) -> ResultsResult<()> {
            self.count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn adapter_delegates_to_the_writer() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut sink = MeshSinkAdapter::new(Box::new(CountingWriter {
            count: Arc::clone(&count),
        }));
        let snapshot = Snapshot {
            time_s: 0.0,
            step: 1,
            cycle: 1,
            inlet_value: 0.0,
            inlet_pressure_pa: 0.0,
            outlet_pressure_pa: 0.0,
            outlet_flow_m3_s: 0.0,
            inlet_nodes: vec![],
        };
        sink.write_snapshot(&snapshot).unwrap();
        sink.write_snapshot(&snapshot).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }
}
