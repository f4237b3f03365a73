//! Integration tests for the ProcessSupervisor lifecycle against the mock
//! process table, without a coordinator in front of it.

use std::time::Duration;

use panelvisor::app::events::AppEvent;
use panelvisor::config::SupervisorConfig;
use panelvisor::drivers::status_indicator::IndicatorStatus;
use panelvisor::supervisor::{AppState, LaunchCommand, ProcessSupervisor};

use crate::mock_ports::{
    Action, MockClock, MockPanel, MockProcesses, RecordingSink, Trace, APP, SIGNATURE,
};

struct Bench {
    sup: ProcessSupervisor,
    panel: MockPanel,
    procs: MockProcesses,
    clock: MockClock,
    sink: RecordingSink,
    trace: Trace,
}

fn bench(flag: Option<&str>, config: &SupervisorConfig) -> Bench {
    let trace = Trace::default();
    let command = LaunchCommand::new(APP, config.interpreter.as_deref());
    Bench {
        sup: ProcessSupervisor::new(command, flag.map(Into::into), config),
        panel: MockPanel::new(trace.clone()),
        procs: MockProcesses::new(trace.clone()),
        clock: MockClock::new(trace.clone()),
        sink: RecordingSink::default(),
        trace,
    }
}

impl Bench {
    fn toggle(&mut self) {
        self.sup
            .toggle(&mut self.panel, &mut self.procs, &mut self.clock, &mut self.sink);
    }
}

#[test]
fn signature_matches_launch_command() {
    let b = bench(None, &SupervisorConfig::default());
    assert_eq!(b.sup.signature(), SIGNATURE);

    let direct = SupervisorConfig {
        interpreter: None,
        ..SupervisorConfig::default()
    };
    let b = bench(None, &direct);
    assert_eq!(b.sup.signature(), APP);
}

#[test]
fn refresh_adopts_externally_started_app() {
    let mut b = bench(None, &SupervisorConfig::default());
    b.procs.running = Some(777);
    assert_eq!(b.sup.refresh(&mut b.procs, &mut b.sink), AppState::Running);
    assert_eq!(b.sup.pid(), Some(777));

    // Not started by us: its exit is neither reported nor flashed.
    b.procs.crash();
    assert_eq!(b.sup.refresh(&mut b.procs, &mut b.sink), AppState::Stopped);
    assert!(b.sink.events.is_empty());
    assert_eq!(b.sup.indicator_status(), IndicatorStatus::default());
}

#[test]
fn probe_updates_pid_but_not_state() {
    let mut b = bench(None, &SupervisorConfig::default());
    b.procs.running = Some(55);
    assert_eq!(b.sup.probe(&mut b.procs), Some(55));
    assert_eq!(b.sup.pid(), Some(55));
    assert_eq!(b.sup.state(), AppState::Stopped);
}

#[test]
fn toggle_launches_then_stops() {
    let mut b = bench(None, &SupervisorConfig::immediate());
    b.toggle();
    assert_eq!(b.sup.state(), AppState::Running);
    assert_eq!(
        b.sup.indicator_status(),
        IndicatorStatus {
            app_running: true,
            app_stopped_since_started: false,
        }
    );

    b.toggle();
    assert_eq!(b.sup.state(), AppState::Stopped);
    assert_eq!(b.sup.pid(), None);
    assert_eq!(
        b.trace.lifecycle(),
        vec![Action::Spawn(SIGNATURE.to_owned()), Action::Kill(4101)]
    );
    assert_eq!(b.sup.indicator_status(), IndicatorStatus::default());
}

#[test]
fn stopped_since_started_after_crash() {
    let mut b = bench(None, &SupervisorConfig::immediate());
    b.toggle();
    b.procs.crash();
    b.sup.refresh(&mut b.procs, &mut b.sink);
    assert_eq!(
        b.sup.indicator_status(),
        IndicatorStatus {
            app_running: false,
            app_stopped_since_started: true,
        }
    );
    assert_eq!(b.sink.events.last(), Some(&AppEvent::ExitedUnexpectedly));
}

#[test]
fn exit_poll_budget_follows_config() {
    let config = SupervisorConfig {
        exit_poll_count: 4,
        exit_poll_interval_ms: 50,
        ..SupervisorConfig::default()
    };
    let mut b = bench(Some("/tmp/flag"), &config);
    b.toggle();
    b.toggle();
    assert_eq!(b.clock.elapsed, Duration::from_millis(200));
    assert!(b.sink.contains(&AppEvent::GracefulStopTimedOut { pid: 4101 }));
    assert_eq!(b.sup.state(), AppState::Stopped);
}

#[test]
fn force_stop_skips_exit_flag() {
    let mut b = bench(Some("/tmp/flag"), &SupervisorConfig::default());
    b.toggle();
    b.sup.force_stop(&mut b.procs, &mut b.sink);
    assert_eq!(
        b.trace.lifecycle(),
        vec![Action::Spawn(SIGNATURE.to_owned()), Action::Kill(4101)]
    );
    assert_eq!(b.clock.elapsed, Duration::ZERO);
}
