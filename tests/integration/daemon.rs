use std::fs;
use std::thread;
use std::time::Duration;

use treemirror::SyncDaemon;

use crate::integration::support::Fixture;

#[test]
fn stops_after_max_passes() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");

    let summary = SyncDaemon::new(fx.engine()).with_max_passes(3).run();

    assert_eq!(summary.passes, 3);
    assert_eq!(summary.failed_passes, 0);
    assert_eq!(summary.skipped_passes, 2);
    fx.assert_mirrored();
}

#[test]
fn picks_up_changes_between_passes() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");
    let daemon = SyncDaemon::new(fx.engine());
    let handle = daemon.stop_handle();

    let summary = thread::scope(|scope| {
        let running = scope.spawn(|| daemon.run());
        wait_for(|| fx.replica.join("a.txt").exists());
        fx.write_source("b.txt", "B");
        wait_for(|| fx.replica.join("b.txt").exists());
        handle.stop();
        running.join().unwrap()
    });

    assert!(summary.passes >= 2);
    assert_eq!(summary.failed_passes, 0);
    fx.assert_mirrored();
}

#[test]
fn stop_handle_interrupts_a_long_interval() {
    let fx = Fixture::new();
    let mut config = fx.config();
    config.interval = Duration::from_secs(3600);
    let engine = treemirror::SyncEngine::new(config, fx.log.clone());
    let daemon = SyncDaemon::new(engine);
    let handle = daemon.stop_handle();

    let summary = thread::scope(|scope| {
        let running = scope.spawn(|| daemon.run());
        thread::sleep(Duration::from_millis(50));
        handle.stop();
        running.join().unwrap()
    });

    assert_eq!(summary.passes, 1);
}

#[test]
fn failed_passes_are_journaled_and_retried() {
    let fx = Fixture::new();
    fs::remove_dir_all(&fx.source).unwrap();

    let summary = SyncDaemon::new(fx.engine()).with_max_passes(2).run();

    assert_eq!(summary.passes, 2);
    assert_eq!(summary.failed_passes, 2);
    assert_eq!(fx.log.count("failed"), 2);
}

#[test]
fn recovers_once_the_failure_clears() {
    let fx = Fixture::new();
    fs::remove_dir_all(&fx.source).unwrap();
    let daemon = SyncDaemon::new(fx.engine());
    let handle = daemon.stop_handle();

    let summary = thread::scope(|scope| {
        let running = scope.spawn(|| daemon.run());
        wait_for(|| fx.log.count("failed") > 0);
        fx.write_source("late.txt", "L");
        wait_for(|| fx.replica.join("late.txt").exists());
        handle.stop();
        running.join().unwrap()
    });

    assert!(summary.failed_passes >= 1);
    assert!(summary.passes > summary.failed_passes);
    fx.assert_mirrored();
}

fn wait_for(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not met within 5s");
}
