//! Same seed, same experiment list: identical reports.
//! Any divergence means something bypassed the RngBank.

use complexity_core::{
    config::{ExperimentSpec, RunnerConfig},
    engine::SimEngine,
    report::ExperimentReport,
};

fn run_demo(seed: u64) -> Vec<ExperimentReport> {
    let engine = SimEngine::build_test(format!("det-test-{seed}"), seed).expect("engine");
    engine
        .run_all(&RunnerConfig::default_demo().experiments)
        .expect("demo run")
}

/// Serialize a report, leaving out the cache rows (they carry wall-clock timestamps).
fn fingerprint(report: &ExperimentReport) -> String {
    match report {
        ExperimentReport::Ising2d { run, .. } => serde_json::to_string(run).expect("serialize"),
        other => serde_json::to_string(other).expect("serialize"),
    }
}

#[test]
fn same_seed_produces_identical_reports() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let a = run_demo(SEED);
    let b = run_demo(SEED);
    assert_eq!(a.len(), b.len());
    for (i, (ra, rb)) in a.iter().zip(&b).enumerate() {
        assert_eq!(fingerprint(ra), fingerprint(rb), "Report {i} diverged");
    }
}

#[test]
fn different_seeds_produce_different_reports() {
    let a = run_demo(42);
    let b = run_demo(99);
    let any_different = a.iter().zip(&b).any(|(ra, rb)| fingerprint(ra) != fingerprint(rb));
    assert!(any_different, "Different seeds produced identical reports; seed is not being used");
}

#[test]
fn repeated_experiment_in_a_batch_gets_its_own_stream() {
    let engine = SimEngine::build_test("repeat-test".into(), 5).unwrap();
    let spec = ExperimentSpec::BakSneppen(Default::default());
    let reports = engine.run_all(&[spec.clone(), spec]).unwrap();
    let finals: Vec<Vec<f64>> = reports
        .iter()
        .map(|r| match r {
            ExperimentReport::BakSneppen { run } => run.final_fitness.clone(),
            other => panic!("unexpected report {other:?}"),
        })
        .collect();
    assert_ne!(finals[0], finals[1]);
}

fn bak_sneppen_final(reports: &[ExperimentReport]) -> Vec<f64> {
    reports
        .iter()
        .find_map(|r| match r {
            ExperimentReport::BakSneppen { run } => Some(run.final_fitness.clone()),
            _ => None,
        })
        .expect("bak_sneppen report")
}

#[test]
fn an_experiment_does_not_depend_on_other_kinds_in_the_batch() {
    const SEED: u64 = 42;
    let spec = ExperimentSpec::BakSneppen(Default::default());

    let alone = SimEngine::build_test("alone".into(), SEED)
        .unwrap()
        .run_all(std::slice::from_ref(&spec))
        .unwrap();

    let mut filtered = RunnerConfig::default_demo();
    filtered.retain_named(&["bak_sneppen".to_string()]).unwrap();
    let filtered = SimEngine::build_test("filtered".into(), SEED)
        .unwrap()
        .run_all(&filtered.experiments)
        .unwrap();

    let full = run_demo(SEED);

    let after_other = SimEngine::build_test("after-other".into(), SEED)
        .unwrap()
        .run_all(&[ExperimentSpec::Sandpile(Default::default()), spec.clone()])
        .unwrap();

    let expected = bak_sneppen_final(&alone);
    assert_eq!(bak_sneppen_final(&filtered), expected);
    assert_eq!(bak_sneppen_final(&full), expected);
    assert_eq!(bak_sneppen_final(&after_other), expected);

    let single = SimEngine::build_test("single".into(), SEED).unwrap().run(&spec).unwrap();
    assert_eq!(bak_sneppen_final(&[single]), expected);
}

#[test]
fn report_tags_match_experiment_names() {
    let specs = RunnerConfig::default_demo().experiments;
    let reports = run_demo(11);
    for (spec, report) in specs.iter().zip(&reports) {
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["experiment"], spec.name());
    }
}
