//! End-to-end pipeline tests driving a full run against a scripted fake
//! simulator: staging, serialization, invocation, and harvesting.

use std::fs;
use std::path::Path;

use glmkit::io::sandbox::{PLAYERS_DIR, SANDBOX_DIR};
use glmkit::test_support::{StubCodec, props, write_fake_simulator};
use glmkit::{Error, ModelDocument, ModelRegistry, PipelineConfig, RunOptions, run};

fn config_with_simulator(script: &Path) -> PipelineConfig {
    PipelineConfig {
        simulator: vec![script.to_string_lossy().into_owned()],
        run_timeout_secs: 30,
        ..PipelineConfig::default()
    }
}

/// Full run: one player driving a load, one recorder writing results.
///
/// Verifies the whole sandbox protocol: `gld_tmp` is created under the base
/// directory, the player file is copied into `players/` and the object
/// rewritten to the staged copy, sink outputs point into `output/`, the
/// serialized model lands at `system.glm`, and the recorder's table is
/// harvested by file name.
#[test]
fn full_run_stages_players_and_harvests_results() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    fs::write(base.join("load.player"), "2000-01-01 00:00:00,1.0\n").expect("player file");

    let mut doc = ModelDocument::default();
    doc.require_module("powerflow", props(&[]));
    doc.add_object("player", "house_load", props(&[("file", "load.player")]));
    doc.add_object(
        "recorder",
        "voltage_rec",
        props(&[("file", "old/dir/results.csv")]),
    );
    let mut registry = ModelRegistry::new(doc).with_base_dir(base);

    let script = write_fake_simulator(
        base,
        "printf '# banner\\ntimestamp,value\\n2000-01-01 00:00:00,1.0\\n' > output/results.csv",
    );
    let outcome = run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &RunOptions::default(),
    )
    .expect("run");

    let sandbox = base.join(SANDBOX_DIR);
    assert!(sandbox.join(PLAYERS_DIR).join("load.player").exists());
    assert!(sandbox.join("system.glm").exists());
    assert_eq!(
        registry
            .doc
            .model
            .object("player", "house_load")
            .unwrap()
            .get("file")
            .unwrap(),
        "players/load.player"
    );
    assert_eq!(
        registry
            .doc
            .model
            .object("recorder", "voltage_rec")
            .unwrap()
            .get("file")
            .unwrap(),
        "output/results.csv"
    );

    assert!(outcome.simulator.status.success());
    let table = outcome.results.get("results.csv").expect("harvested table");
    assert_eq!(table.columns, vec!["value"]);
    assert_eq!(table.index, vec!["2000-01-01 00:00:00"]);
}

/// The serialized model handed to the simulator reflects the staged state,
/// not the pre-run property values.
#[test]
fn serialized_model_contains_staged_paths() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    fs::write(base.join("gen.player"), "0,0\n").expect("player file");

    let mut doc = ModelDocument::default();
    doc.add_object("player", "gen", props(&[("file", "gen.player")]));
    let mut registry = ModelRegistry::new(doc).with_base_dir(base);

    let script = write_fake_simulator(base, "exit 0");
    run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &RunOptions::default(),
    )
    .expect("run");

    let serialized =
        fs::read_to_string(base.join(SANDBOX_DIR).join("system.glm")).expect("read model");
    assert!(serialized.contains("object player gen file=players/gen.player"));
}

/// A non-zero simulator exit is a typed failure carrying stderr, not a
/// silently ignored status.
#[test]
fn nonzero_exit_surfaces_simulation_failed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    let mut registry = ModelRegistry::new(ModelDocument::default()).with_base_dir(base);

    let script = write_fake_simulator(base, "echo 'solver diverged' >&2\nexit 3");
    let err = run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &RunOptions::default(),
    )
    .unwrap_err();

    match err {
        Error::SimulationFailed {
            status,
            timed_out,
            stderr_excerpt,
        } => {
            assert_eq!(status.and_then(|s| s.code()), Some(3));
            assert!(!timed_out);
            assert!(stderr_excerpt.contains("solver diverged"));
        }
        other => panic!("expected SimulationFailed, got {other:?}"),
    }
}

/// A player whose source file is missing aborts staging with `FileNotFound`,
/// leaving the partially built sandbox in place (no rollback).
#[test]
fn missing_player_source_aborts_staging() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();

    let mut doc = ModelDocument::default();
    doc.add_object("player", "ghost", props(&[("file", "absent.player")]));
    let mut registry = ModelRegistry::new(doc).with_base_dir(base);

    let script = write_fake_simulator(base, "exit 0");
    let err = run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &RunOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(base.join(SANDBOX_DIR).exists());
}

/// Explicit output names harvest only the named files, in the given order.
#[test]
fn explicit_output_files_limit_harvest() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    let mut registry = ModelRegistry::new(ModelDocument::default()).with_base_dir(base);

    let script = write_fake_simulator(
        base,
        "printf '# b\\nt,x\\n1,2\\n' > output/wanted.csv\n\
         printf '# b\\nt,x\\n1,2\\n' > output/ignored.csv",
    );
    let options = RunOptions {
        output_files: Some(vec!["wanted.csv".to_string()]),
        ..RunOptions::default()
    };
    let outcome = run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &options,
    )
    .expect("run");

    assert_eq!(outcome.results.len(), 1);
    assert!(outcome.results.contains_key("wanted.csv"));
}

/// Discovery harvest picks up every table file in the output directory,
/// sorted by name, and skips files with other extensions.
#[test]
fn discovery_harvest_is_sorted_and_filtered() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    let mut registry = ModelRegistry::new(ModelDocument::default()).with_base_dir(base);

    let script = write_fake_simulator(
        base,
        "printf '# b\\nt,x\\n1,2\\n' > output/zeta.csv\n\
         printf '# b\\nt,x\\n1,2\\n' > output/alpha.csv\n\
         echo log > output/run.log",
    );
    let outcome = run(
        &mut registry,
        &StubCodec,
        &config_with_simulator(&script),
        &RunOptions::default(),
    )
    .expect("run");

    let keys: Vec<&String> = outcome.results.keys().collect();
    assert_eq!(keys, vec!["alpha.csv", "zeta.csv"]);
}

/// A rerun replaces the previous sandbox wholesale.
#[test]
fn rerun_replaces_stale_sandbox() {
    let temp = tempfile::tempdir().expect("tempdir");
    let base = temp.path();
    let mut registry = ModelRegistry::new(ModelDocument::default()).with_base_dir(base);

    let script = write_fake_simulator(base, "exit 0");
    let config = config_with_simulator(&script);
    run(&mut registry, &StubCodec, &config, &RunOptions::default()).expect("first run");

    let marker = base.join(SANDBOX_DIR).join("stale-marker");
    fs::write(&marker, "x").expect("marker");
    run(&mut registry, &StubCodec, &config, &RunOptions::default()).expect("second run");
    assert!(!marker.exists());
}

/// Loading a model file replaces all registry state; a missing path is a
/// typed `FileNotFound`; the base directory defaults to the file's parent.
#[test]
fn load_from_replaces_state_wholesale() {
    let temp = tempfile::tempdir().expect("tempdir");
    let model_path = temp.path().join("system.glm");
    fs::write(
        &model_path,
        "directive #set profiler=0\n\
         clock starttime=2000-01-01T00:00:00\n\
         module powerflow solver_method=NR\n\
         schedule weekday 0-5\n\
         object node bus_1 phases=ABCN\n",
    )
    .expect("write model");

    let registry = ModelRegistry::load_from(&StubCodec, &model_path, None).expect("load");
    assert_eq!(registry.base_dir.as_deref(), Some(temp.path()));
    assert_eq!(registry.doc.directives, vec!["#set profiler=0"]);
    assert!(registry.doc.modules.contains_key("powerflow"));
    assert!(registry.doc.schedules.contains_key("weekday"));
    assert!(registry.doc.model.object("node", "bus_1").is_some());

    let err = ModelRegistry::load_from(&StubCodec, temp.path().join("nope.glm"), None).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}
