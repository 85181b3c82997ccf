//! Demonstration of the input-trace capture pipeline.
//!
//! A replay thread stands in for a platform input hook and pushes a short
//! burst of synthetic activity through a source handle while the main
//! thread drains the capture session. The session is then finished,
//! exported, and run through the labeling stage.
//!
//! Run with: cargo run --example capture_demo

use std::thread;
use std::time::Duration;

use input_trace::{
    core::{CaptureSession, LabelThresholds},
    export::{label_file, write_capture_log},
    source::{ChannelSource, MouseButton, RawKey, SourceOptions},
};

fn main() {
    println!("Input Trace - Capture Demo");
    println!("==========================");
    println!();

    let window = Duration::from_secs(3);
    let mut source = ChannelSource::new(SourceOptions::default());
    if let Err(e) = source.start() {
        eprintln!("Error starting event source: {e}");
        return;
    }

    let session = CaptureSession::new(window);
    println!("Session ID: {}", session.session_id());
    println!("Replaying synthetic activity for {}s...", window.as_secs());
    println!();

    // Stand-in for a platform hook: type "hi there", wiggle the pointer,
    // click twice.
    let handle = source.handle();
    let replay = thread::spawn(move || {
        for c in "hi there".chars() {
            let key = if c == ' ' {
                RawKey::from_text("space")
            } else {
                RawKey::Char(c)
            };
            handle.key_press(key);
            thread::sleep(Duration::from_millis(60));
        }
        for i in 0..10 {
            handle.mouse_move(200 + i * 12, 300 + i * 5);
            thread::sleep(Duration::from_millis(30));
        }
        handle.mouse_click(320, 350, MouseButton::Left, true);
        handle.mouse_click(320, 350, MouseButton::Left, false);
        thread::sleep(Duration::from_millis(250));
        handle.mouse_click(330, 360, MouseButton::Right, true);
    });

    let receiver = source.receiver().clone();
    let deadline = std::time::Instant::now() + window;
    while std::time::Instant::now() < deadline {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => session.handle(&event),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }
    let _ = replay.join();
    source.stop();
    while let Some(event) = source.try_recv() {
        session.handle(&event);
    }

    let report = match session.finish() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error finishing session: {e}");
            return;
        }
    };

    println!("=== Session Complete ===");
    println!("  Events logged: {}", report.events.len());
    println!("  Total keystrokes: {}", report.metrics.total_keystrokes);
    println!(
        "  Typing speed: {:.1} KPM ({:.1} WPM)",
        report.metrics.typing_speed_kpm, report.metrics.typing_speed_wpm
    );
    println!(
        "  Avg. keypress interval: {:.3}s",
        report.metrics.avg_keypress_interval
    );
    println!(
        "  Avg. click interval: {:.3}s",
        report.metrics.avg_click_interval
    );
    println!("  Key counts: {:?}", report.metrics.key_counts);
    println!();

    let log_path = std::env::temp_dir().join("input_trace_demo_log.csv");
    let labeled_path = std::env::temp_dir().join("input_trace_demo_labeled.csv");

    if let Err(e) = write_capture_log(&log_path, &report.metrics, &report.events) {
        eprintln!("Error writing capture log: {e}");
        return;
    }
    println!("Capture log: {log_path:?}");

    if let Err(e) = label_file(&log_path, &labeled_path, &LabelThresholds::default()) {
        eprintln!("Error labeling capture log: {e}");
        return;
    }
    println!("Labeled log: {labeled_path:?}");
    println!();
    println!("Demo complete!");
}
