//! The susceptibility cache: one record per beta, kept across runs.

use complexity_core::{
    config::ExperimentSpec,
    engine::SimEngine,
    ising::IsingParams,
    report::ExperimentReport,
    store::SimStore,
};

fn ising(beta: f64) -> ExperimentSpec {
    ExperimentSpec::Ising2d(IsingParams { size: 8, nsteps: 400, beta, nsnapshots: 4 })
}

fn cache_of(report: &ExperimentReport) -> Vec<(f64, f64)> {
    match report {
        ExperimentReport::Ising2d { susceptibility, .. } => {
            susceptibility.iter().map(|r| (r.beta, r.susceptibility)).collect()
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn each_ising_run_updates_the_cache() {
    let engine = SimEngine::build_test("cache-test".into(), 3).unwrap();

    let first = engine.run(&ising(1.0)).unwrap();
    assert_eq!(cache_of(&first).len(), 1);

    let second = engine.run(&ising(0.25)).unwrap();
    let betas: Vec<f64> = cache_of(&second).iter().map(|(b, _)| *b).collect();
    assert_eq!(betas, vec![0.25, 1.0]);
}

#[test]
fn rerun_at_same_beta_replaces_record() {
    let engine = SimEngine::build_test("cache-replace".into(), 4).unwrap();
    engine.run(&ising(0.5)).unwrap();
    let rerun = engine
        .run_all(&[ising(0.9), ising(0.5)])
        .unwrap()
        .pop()
        .unwrap();

    let chi = match &rerun {
        ExperimentReport::Ising2d { run, .. } => run.susceptibility,
        other => panic!("unexpected report {other:?}"),
    };
    let cache = cache_of(&rerun);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache[0], (0.5, chi));
}

#[test]
fn cache_survives_reopening_the_database() {
    let path = std::env::temp_dir().join(format!("complexity-cache-{}.db", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let _ = std::fs::remove_file(&path);

    {
        let store = SimStore::open(&path_str).unwrap();
        store.migrate().unwrap();
        store.insert_run("first", 1, "test").unwrap();
        let engine = SimEngine::new("first".into(), 1, store);
        engine.run(&ising(0.7)).unwrap();
    }

    let store = SimStore::open(&path_str).unwrap();
    store.migrate().unwrap();
    let records = store.all_susceptibilities().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].beta, 0.7);
    assert_eq!(records[0].run_id, "first");
    assert_eq!(records[0].size, 8);
    assert_eq!(records[0].nsteps, 400);
    drop(store);

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
    }
}
