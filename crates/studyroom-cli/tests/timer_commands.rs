//! Timer and statistics E2E tests.

mod common;

use common::{parse_json_stream, Sandbox};

fn last_snapshot(sandbox: &Sandbox, args: &[&str]) -> serde_json::Value {
    let docs = parse_json_stream(&sandbox.run_success(args));
    docs.last().cloned().expect("snapshot")
}

#[test]
fn test_timer_status_idle() {
    let sandbox = Sandbox::new();
    let snap = last_snapshot(&sandbox, &["timer", "status"]);
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["timer_type"], "focus");
    assert_eq!(snap["display"], "25:00");
}

#[test]
fn test_timer_start_pause_reset() {
    let sandbox = Sandbox::new();

    let docs = parse_json_stream(&sandbox.run_success(&["timer", "start"]));
    assert_eq!(docs[0]["type"], "timer_started");
    assert_eq!(docs.last().unwrap()["state"], "running");

    // Starting twice is a no-op.
    let snap = last_snapshot(&sandbox, &["timer", "start"]);
    assert_eq!(snap["state"], "running");

    let docs = parse_json_stream(&sandbox.run_success(&["timer", "pause"]));
    assert_eq!(docs[0]["type"], "timer_paused");
    assert_eq!(docs.last().unwrap()["state"], "paused");

    let snap = last_snapshot(&sandbox, &["timer", "reset"]);
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["remaining_secs"], 1500);
}

#[test]
fn test_timer_type_uses_config() {
    let sandbox = Sandbox::new();
    sandbox.run_success(&["config", "set", "timer.short_break", "3"]);
    let snap = last_snapshot(&sandbox, &["timer", "type", "short-break"]);
    assert_eq!(snap["timer_type"], "shortBreak");
    assert_eq!(snap["display"], "03:00");
}

#[test]
fn test_stats_pomodoro_empty() {
    let sandbox = Sandbox::signed_in();
    let stats = sandbox.run_json(&["stats", "pomodoro"]);
    assert_eq!(stats["total"]["totalFocusSessions"], 0);
    assert!(stats["todaySessions"].as_array().unwrap().is_empty());
}

#[test]
fn test_stats_score_and_dashboard() {
    let sandbox = Sandbox::signed_in();
    let id = sandbox.create_task(&["Lab report", "--priority", "high"]);
    sandbox.run_success(&["task", "toggle", &id]);

    let score = sandbox.run_json(&["stats", "score"]);
    let value = score["score"].as_u64().unwrap();
    // completion 100 * 0.6 + important 100 * 0.25 + one or two active days
    assert!((87..=89).contains(&value), "score {value}");
    assert_eq!(score["level"], "excellent");
    assert_eq!(score["trend"], "rising");

    let dash = sandbox.run_json(&["stats", "dashboard"]);
    assert_eq!(dash["userName"], "Nguyen Van An");
    assert_eq!(dash["productivityScore"].as_u64(), Some(value));
    assert_eq!(dash["completedLastWeek"], 1);
}

#[test]
fn test_stats_analytics_report() {
    let sandbox = Sandbox::signed_in();
    sandbox.create_task(&["Family dinner", "--category", "family"]);

    let report = sandbox.run_json(&["stats", "analytics"]);
    assert_eq!(report["totalTasks"], 1);
    assert_eq!(report["weekly"].as_array().unwrap().len(), 7);
    assert_eq!(report["categories"][0]["category"], "family");
    assert_eq!(report["priorities"][1]["count"], 1);
    assert!(!report["quote"].as_str().unwrap().is_empty());
}

#[test]
fn test_calendar_week_view() {
    let sandbox = Sandbox::signed_in();
    sandbox.create_task(&[
        "Lecture", "--deadline", "2026-10-13", "--start", "09:00", "--end", "11:00",
    ]);

    let week = sandbox.run_json(&["calendar", "week", "--date", "2026-10-13"]);
    assert_eq!(week["start"], "2026-10-12");
    assert_eq!(week["range"], "12/10 - 18/10/2026");
    let tuesday = &week["days"][1];
    assert_eq!(tuesday["weekday"], "Tuesday");
    assert_eq!(tuesday["slots"][0]["time"], "09:00");
    assert_eq!(tuesday["slots"][1]["time"], "10:00");

    let previous = sandbox.run_json(&["calendar", "week", "--date", "2026-10-13", "--offset", "-1"]);
    assert_eq!(previous["start"], "2026-10-05");
}
