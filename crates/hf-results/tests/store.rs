use hf_results::{CycleRecord, FfrRecord, ResultsError, RunManifest, RunStore};

fn manifest(run_id: &str, config_name: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        config_name: config_name.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: "surrogate-0.1".to_string(),
        coupled: true,
        cycles: 3,
        steps: 60,
        aborted: false,
    }
}

fn cycles() -> Vec<CycleRecord> {
    vec![
        CycleRecord {
            cycle: 1,
            cycle_length_s: 0.8,
            ffr: None,
        },
        CycleRecord {
            cycle: 2,
            cycle_length_s: 0.8,
            ffr: Some(FfrRecord {
                mean_flow_m3_s: 2.4e-5,
                mean_proximal_pressure_pa: 10_800.0,
                mean_distal_pressure_pa: 5_900.0,
                ffr: 0.546,
            }),
        },
    ]
}

fn store(tag: &str) -> RunStore {
    let dir = std::env::temp_dir().join(format!("hf_results_store_{tag}"));
    let _ = std::fs::remove_dir_all(&dir);
    RunStore::new(dir).unwrap()
}

#[test]
fn save_and_reload_round_trips() {
    let store = store("roundtrip");
    store.save_run(&manifest("run1", "demo"), &cycles()).unwrap();

    assert!(store.has_run("run1"));
    let loaded = store.load_manifest("run1").unwrap();
    assert_eq!(loaded.config_name, "demo");
    assert_eq!(loaded.cycles, 3);

    let records = store.load_cycles("run1").unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].ffr.is_none());
    let ffr = records[1].ffr.as_ref().unwrap();
    assert!((ffr.ffr - 0.546).abs() < 1e-12);
}

#[test]
fn missing_run_reports_not_found() {
    let store = store("missing");
    let err = store.load_manifest("nope").unwrap_err();
    assert!(matches!(err, ResultsError::RunNotFound { .. }));
}

#[test]
fn list_runs_filters_by_config_name() {
    let store = store("list");
    store.save_run(&manifest("a", "demo"), &cycles()).unwrap();
    store.save_run(&manifest("b", "demo"), &cycles()).unwrap();
    store.save_run(&manifest("c", "other"), &cycles()).unwrap();

    let runs = store.list_runs("demo").unwrap();
    assert_eq!(runs.len(), 2);
    assert!(store.list_runs("other").unwrap().len() == 1);
}

#[test]
fn delete_run_removes_the_directory() {
    let store = store("delete");
    store.save_run(&manifest("gone", "demo"), &cycles()).unwrap();
    assert!(store.has_run("gone"));
    store.delete_run("gone").unwrap();
    assert!(!store.has_run("gone"));
    // Deleting again is a no-op.
    store.delete_run("gone").unwrap();
}
