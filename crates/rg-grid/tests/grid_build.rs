mod common;

use common::{RUN_A, RUN_B, RUN_MS, Track, write_run};
use rg_core::{CoreError, parse_artifact_name};
use rg_grid::{
    GridConfig, GridError, GridStage, RgbGrid, RunOutcome, RunPlan, SCHEMA, header_line, plan_run,
};
use std::path::Path;

struct Scratch {
    _root: tempfile::TempDir,
    grid: std::path::PathBuf,
    config: GridConfig,
}

fn scratch() -> Scratch {
    let root = tempfile::tempdir().unwrap();
    let grid = root.path().join("grid");
    std::fs::create_dir_all(&grid).unwrap();
    let config = GridConfig::new(
        &grid,
        root.path().join("rgb_grid.txt"),
        root.path().join("rgb_models"),
    );
    Scratch {
        _root: root,
        grid,
        config,
    }
}

fn table_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn accepted_runs_fill_table_and_archive() {
    let s = scratch();
    write_run(&s.grid, RUN_B, Track::giant());
    write_run(&s.grid, RUN_A, Track::giant());
    let rejected = write_run(&s.grid, RUN_MS, Track::main_sequence());

    let grid = RgbGrid::new(s.config.clone()).unwrap();
    assert_eq!(grid.runs().len(), 3);
    let build = grid.build().unwrap();

    // 9 rows per accepted run, none for the rejected one
    assert_eq!(build.rows.len(), 18);
    let levels: Vec<i32> = build.rows.iter().map(|r| r.level).collect();
    let window: Vec<i32> = (-5..=3).collect();
    assert_eq!(&levels[..9], &window[..]);
    assert_eq!(&levels[9..], &window[..]);

    // sorted run order: m1.0 before m1.5
    assert_eq!(build.rows[0].initial.m, 1.0);
    assert_eq!(build.rows[9].initial.m, 1.5);

    // tip at model 72 -> anchor 80 -> models 30..=110
    let models: Vec<f64> = build.rows[..9].iter().map(|r| r.model_number).collect();
    assert_eq!(
        models,
        vec![30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0]
    );

    assert!(!rejected.exists());

    let lines = table_lines(&s.config.output_file);
    assert_eq!(lines.len(), 1 + 18);
    assert_eq!(lines[0], header_line(&SCHEMA));
    assert_eq!(lines[1].split('\t').count(), 19);

    let archived: Vec<String> = std::fs::read_dir(&s.config.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(archived.len(), 18);
    let lvl_minus_2 = format!("rgb_{}_lvl-2_60.mod", &RUN_A[5..]);
    assert!(archived.contains(&lvl_minus_2));
    let copied = std::fs::read_to_string(s.config.output_dir.join(&lvl_minus_2)).unwrap();
    assert_eq!(copied, "checkpoint 60\n");
    for name in &archived {
        let decoded = parse_artifact_name(name).unwrap();
        assert_eq!(decoded.model_number as i32, 80 + 10 * decoded.level);
    }

    let report = &build.report;
    assert_eq!(report.row_count, 18);
    assert_eq!(report.count(&RunOutcome::Extracted), 2);
    assert_eq!(report.count(&RunOutcome::Deleted), 1);
    // m0.8 sorts first
    assert_eq!(report.runs[0].run_name, RUN_MS);
    assert_eq!(report.runs[0].outcome, RunOutcome::Deleted);
    assert_eq!(report.runs[1].run_name, RUN_A);
    assert_eq!(report.runs[1].initial.m, 1.0);
    assert_eq!(report.runs[1].tip_model, Some(72));
    assert_eq!(report.runs[1].anchor, Some(80));
    assert_eq!(report.runs[1].artifacts.len(), 9);
}

#[test]
fn grid_without_exhausted_runs_has_header_only() {
    let s = scratch();
    write_run(&s.grid, RUN_MS, Track::main_sequence());

    let build = RgbGrid::new(s.config.clone()).unwrap().build().unwrap();
    assert!(build.rows.is_empty());
    assert_eq!(
        table_lines(&s.config.output_file),
        vec![header_line(&SCHEMA)]
    );
    assert!(s.config.output_dir.is_dir());
    assert!(!s.grid.join(RUN_MS).exists());
}

#[test]
fn rejected_runs_can_be_kept() {
    let mut s = scratch();
    s.config.delete_rejected = false;
    let rejected = write_run(&s.grid, RUN_MS, Track::main_sequence());

    let build = RgbGrid::new(s.config.clone()).unwrap().build().unwrap();
    assert!(rejected.join("history.data").exists());
    assert_eq!(build.report.runs[0].outcome, RunOutcome::Kept);
}

#[test]
fn missing_checkpoint_aborts_build() {
    let s = scratch();
    let run = write_run(&s.grid, RUN_A, Track::giant());
    std::fs::remove_file(run.join("model_00100.mod")).unwrap();

    let err = RgbGrid::new(s.config.clone()).unwrap().build().unwrap_err();
    match err {
        GridError::CheckpointCopy { from, .. } => assert!(from.ends_with("model_00100.mod")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!s.config.output_file.exists());
}

#[test]
fn window_past_track_end_fails_before_copying() {
    let s = scratch();
    // tip at model 72 -> window reaches model 110, track ends at 75
    write_run(
        &s.grid,
        RUN_A,
        Track {
            models: 75,
            ..Track::giant()
        },
    );

    let err = RgbGrid::new(s.config.clone()).unwrap().build().unwrap_err();
    assert!(matches!(
        err,
        GridError::Core(CoreError::SampleOutOfRange { len: 75, .. })
    ));
    assert_eq!(std::fs::read_dir(&s.config.output_dir).unwrap().count(), 0);
}

#[test]
fn malformed_run_name_is_fatal() {
    let s = scratch();
    write_run(&s.grid, "logs_m1.0_rot0.0", Track::giant());

    let err = RgbGrid::new(s.config.clone()).unwrap().build().unwrap_err();
    assert!(matches!(err, GridError::Core(CoreError::Format { .. })));
}

#[test]
fn only_prefixed_directories_are_runs() {
    let s = scratch();
    write_run(&s.grid, RUN_A, Track::giant());
    std::fs::create_dir_all(s.grid.join("notes")).unwrap();
    std::fs::write(s.grid.join("logs_readme.txt"), "not a run").unwrap();

    let grid = RgbGrid::new(s.config.clone()).unwrap();
    assert_eq!(grid.runs(), &[s.grid.join(RUN_A)]);
}

#[test]
fn progress_reports_every_run() {
    let s = scratch();
    write_run(&s.grid, RUN_A, Track::giant());
    write_run(&s.grid, RUN_MS, Track::main_sequence());

    let mut events = Vec::new();
    RgbGrid::new(s.config.clone())
        .unwrap()
        .build_with_progress(Some(&mut |e| events.push(e)))
        .unwrap();

    let started: Vec<usize> = events
        .iter()
        .filter(|e| e.stage == GridStage::RunStarted)
        .map(|e| e.position)
        .collect();
    assert_eq!(started, vec![1, 2]);
    assert_eq!(events.first().unwrap().stage, GridStage::PreparingOutput);
    assert_eq!(events.last().unwrap().stage, GridStage::Completed);
    let deleted = events
        .iter()
        .filter(|e| e.stage == GridStage::RunFinished)
        .filter_map(|e| e.message.as_deref())
        .any(|m| m.starts_with("Deleted: "));
    assert!(deleted);
}

#[test]
fn rebuild_into_existing_output_is_idempotent() {
    let s = scratch();
    write_run(&s.grid, RUN_A, Track::giant());

    RgbGrid::new(s.config.clone()).unwrap().build().unwrap();
    let first = std::fs::read_to_string(&s.config.output_file).unwrap();
    RgbGrid::new(s.config.clone()).unwrap().build().unwrap();
    let second = std::fs::read_to_string(&s.config.output_file).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(&s.config.output_dir).unwrap().count(), 9);
}

#[test]
fn planning_has_no_side_effects() {
    let s = scratch();
    let run = write_run(&s.grid, RUN_MS, Track::main_sequence());

    match plan_run(&s.config, &run).unwrap() {
        RunPlan::Reject {
            run_name,
            initial,
            samples,
            last_center_h1,
        } => {
            assert_eq!(run_name, RUN_MS);
            assert_eq!(samples, 60);
            assert_eq!(initial.m, 0.8);
            assert!(last_center_h1.unwrap() > 1e-4);
        }
        other => panic!("unexpected plan: {other:?}"),
    }
    assert!(run.exists());
    assert!(!s.config.output_dir.exists());
}

#[test]
fn restarted_history_is_cleaned_when_requested() {
    let mut s = scratch();
    s.config.remove_backups = true;
    let run = write_run(&s.grid, RUN_A, Track::giant());

    // models 101..=105 were computed twice: the run restarted from model 100
    let history = run.join("history.data");
    let text = std::fs::read_to_string(&history).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let (head, data) = lines.split_at(6);
    let mut restarted: Vec<&str> = head.to_vec();
    restarted.extend(&data[..105]);
    restarted.extend(&data[100..]);
    std::fs::write(&history, format!("{}\n", restarted.join("\n"))).unwrap();

    let sampled = |config: &GridConfig| match plan_run(config, &run).unwrap() {
        RunPlan::Extract(plan) => (plan.samples, plan.rows.last().unwrap().model_number),
        other => panic!("unexpected plan: {other:?}"),
    };

    // without cleaning, position 109 holds the second copy of model 105
    let plain = GridConfig {
        remove_backups: false,
        ..s.config.clone()
    };
    assert_eq!(sampled(&plain), (125, 105.0));
    assert_eq!(sampled(&s.config), (120, 110.0));
}
