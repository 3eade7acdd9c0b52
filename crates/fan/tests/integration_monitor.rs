//! Integration tests for the monitor fallback chain and the viewer client.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use cf_fan_lib::config::{MonitorConfig, ViewerConfig};
use cf_fan_lib::fixtures::*;
use cf_fan_lib::monitor::{
    BackendKind, ConsoleMonitor, FallbackMonitor, Monitor, MonitorError, NoOpMonitor,
    ShowOptions, ShowOutcome, ViewerMonitor,
};
use cf_fan_lib::use_case;

#[test]
fn test_fallback_selects_noop() {
    let first = ScriptedMonitor::unavailable("viewer");
    let second = ScriptedMonitor::unavailable("notebook");
    let first_calls = first.calls();
    let mut chain = FallbackMonitor::new(vec![
        first.boxed(),
        second.boxed(),
        Box::new(NoOpMonitor),
    ]);

    let outcome = chain
        .show_object(&block("a", 1.0, 1.0, 1.0), &ShowOptions::default())
        .unwrap();
    assert_eq!(outcome, ShowOutcome::Shown);
    assert_eq!(chain.last_shown(), Some("noop"));
    assert_eq!(*first_calls.borrow(), vec!["a".to_string()]);
}

#[test]
fn test_fallback_reports_every_cause() {
    let mut chain = FallbackMonitor::new(vec![
        ScriptedMonitor::unavailable("viewer").boxed(),
        ScriptedMonitor::unavailable("notebook").boxed(),
    ]);

    let err = chain
        .show_object(&block("a", 1.0, 1.0, 1.0), &ShowOptions::default())
        .unwrap_err();
    match &err {
        MonitorError::AllUnavailable(causes) => {
            assert_eq!(causes.len(), 2);
            assert_eq!(causes[0].backend, "viewer");
            assert_eq!(causes[1].backend, "notebook");
        }
        other => panic!("unexpected error {other}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("All monitors failed to show object:\n\tviewer: "));
    assert!(message.contains("\n\tnotebook: notebook is not installed"));
}

#[test]
fn test_fallback_stops_at_first_shown() {
    let shown = ScriptedMonitor::showing("first");
    let skipped = ScriptedMonitor::showing("second");
    let skipped_calls = skipped.calls();
    let mut chain = FallbackMonitor::new(vec![shown.boxed(), skipped.boxed()]);

    chain
        .show_object(&block("a", 1.0, 1.0, 1.0), &ShowOptions::default())
        .unwrap();
    assert_eq!(chain.last_shown(), Some("first"));
    assert!(skipped_calls.borrow().is_empty());
}

#[test]
fn test_fallback_propagates_errors() {
    let after = ScriptedMonitor::showing("after");
    let after_calls = after.calls();
    let mut chain = FallbackMonitor::new(vec![
        ScriptedMonitor::failing("broken").boxed(),
        after.boxed(),
    ]);

    let result = chain.show_object(&block("a", 1.0, 1.0, 1.0), &ShowOptions::default());
    assert!(matches!(result, Err(MonitorError::Transport(_))));
    assert!(after_calls.borrow().is_empty());
}

#[test]
fn test_chain_from_config() {
    let config = MonitorConfig {
        backends: vec![BackendKind::Console, BackendKind::NoOp],
        ..MonitorConfig::default()
    };
    let chain = FallbackMonitor::from_config(&config);
    assert_eq!(chain.backend_names(), vec!["console", "noop"]);

    let default_chain = FallbackMonitor::from_config(&MonitorConfig::default());
    assert_eq!(default_chain.backend_names(), vec!["viewer", "notebook", "noop"]);
}

#[test]
fn test_use_case_shows_five_parts() {
    let recorder = ScriptedMonitor::showing("recorder");
    let calls = recorder.calls();
    let mut monitor = recorder;

    use_case::show_parts(&default_fan_builder(), &mut monitor).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec!["pen_holder", "connector", "compartment", "centrifuge", "motor_holder"]
    );
}

#[test]
fn test_console_report_of_fan_part() {
    let fan = default_fan_builder();
    let mut console = ConsoleMonitor::with_writer(Vec::new());
    use_case::show_selection(&fan, &[cf_fan_lib::build::PartKind::PenHolder], &mut console)
        .unwrap();
    let text = String::from_utf8(console.into_inner()).unwrap();
    assert!(text.contains("fan_selection"));
    assert!(text.contains("bodies:    1"));
}

// ── Viewer against a local HTTP stub ────────────────────────────

/// Read one HTTP request and return its request line.
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while data.len() < end + 4 + content_length {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);
        }
        return head.lines().next().unwrap_or_default().to_string();
    }
    String::new()
}

/// Accept `count` connections, answer 200 to each, return the request lines.
fn spawn_viewer(count: usize) -> (u16, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let mut lines = Vec::new();
        for _ in 0..count {
            let (mut stream, _) = listener.accept().unwrap();
            lines.push(read_request(&mut stream));
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .unwrap();
        }
        lines
    });
    (port, handle)
}

#[test]
fn test_viewer_checks_status_once_then_posts() {
    let (port, server) = spawn_viewer(3);
    let mut viewer = ViewerMonitor::new(ViewerConfig {
        port,
        ..ViewerConfig::default()
    });

    let solid = block("block", 2.0, 2.0, 2.0);
    let first = viewer.show_object(&solid, &ShowOptions::cleared()).unwrap();
    assert_eq!(first, ShowOutcome::Shown);
    assert!(viewer.is_initialized());

    let second = viewer
        .show_object(&solid, &ShowOptions::default().named("again"))
        .unwrap();
    assert_eq!(second, ShowOutcome::Shown);

    let lines = server.join().unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("GET /status "));
    assert!(lines[1].starts_with("POST /show?"));
    assert!(lines[1].contains("name=block"));
    assert!(lines[1].contains("clear=true"));
    assert!(lines[1].contains("reset_camera=center"));
    assert!(lines[2].contains("name=again"));
    assert!(lines[2].contains("clear=false"));
}
