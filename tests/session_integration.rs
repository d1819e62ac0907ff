//! Integration tests for the `tre` session binary.
//!
//! Each test spawns `tre`, feeds it a script of session commands on stdin,
//! and verifies stdout and/or stderr. State is per-process, so every test
//! starts from the seeded defaults (two lists, zero tasks).

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Get the path to the built `tre` binary.
fn tre_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tre");
    path
}

/// Run `tre` with the given launch args, feeding `script` on stdin.
/// Returns (stdout, stderr).
fn run_session(args: &[&str], script: &str) -> (String, String) {
    let mut child = Command::new(tre_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tre");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    let output = child.wait_with_output().expect("tre did not exit");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr)
}

fn run_script(script: &str) -> (String, String) {
    run_session(&[], script)
}

// ---------------------------------------------------------------------------
// Task CRUD and views
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list_sorted_by_priority() {
    let (stdout, _) = run_script(
        "\
add Do laundry pri:low date:2026-08-07
add Pay rent pri:high list:Work #bills date:2026-08-07
scope all
quit
",
    );
    assert!(stdout.contains("added task 1"));
    assert!(stdout.contains("added task 2"));
    assert!(stdout.contains("scope: All Tasks"));

    // High priority sorts ahead of low in the listing
    let rent = stdout.find("Pay rent [high]").expect("rent listed");
    let laundry = stdout.find("Do laundry [low]").expect("laundry listed");
    assert!(rent < laundry);
}

#[test]
fn test_blank_task_rejected() {
    let (stdout, stderr) = run_script(
        "\
add \"   \"
scope all
quit
",
    );
    assert!(stderr.contains("task text cannot be empty"));
    assert!(!stdout.contains("added task"));
    assert!(stdout.contains("no tasks"));
}

#[test]
fn test_kanban_board_and_moves() {
    let (stdout, _) = run_script(
        "\
add Write draft
add Review notes
move 2 inprogress
done 1
board
quit
",
    );
    assert!(stdout.contains("moved task 2 to In Progress"));
    assert!(stdout.contains("completed task 1"));
    assert!(stdout.contains("To Do (0)"));
    assert!(stdout.contains("In Progress (1)"));
    assert!(stdout.contains("Done (1)"));
    assert!(stdout.contains("[>] 2 Review notes"));
    assert!(stdout.contains("[x] 1 Write draft"));
}

#[test]
fn test_subtask_lifecycle() {
    let (stdout, _) = run_script(
        "\
add Plan trip
sub add 1 book flights
sub add 1 reserve hotel
sub done 1 1
show 1
sub rm 1 2
show 1
quit
",
    );
    assert!(stdout.contains("added subtask 1 to task 1"));
    assert!(stdout.contains("added subtask 2 to task 1"));
    assert!(stdout.contains("completed subtask 1"));
    assert!(stdout.contains("[1/2]")); // first show: one of two done
    assert!(stdout.contains("deleted subtask 2"));
    assert!(stdout.contains("[1/1]")); // second show: one subtask left
    assert!(stdout.contains("[x]   1 book flights"));
}

#[test]
fn test_search_and_structured_filters() {
    let (stdout, _) = run_script(
        "\
add Pay rent pri:high #bills
add Pay back Sam pri:low
add Do laundry
search pay
filter pri high
search
quit
",
    );
    // Plain search matches both "Pay" tasks but not laundry
    let after_search = &stdout[stdout.find("Pay back Sam").expect("search hit")..];
    assert!(!after_search.contains("Do laundry"));

    // Priority filter narrows to the high one
    let narrowed = &stdout[stdout.rfind("Pay rent").expect("filtered hit")..];
    assert!(!narrowed.contains("Pay back Sam"));

    assert!(stdout.contains("search cleared"));
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

#[test]
fn test_dependency_blocks_completion_until_met() {
    let (stdout, _) = run_script(
        "\
add Draft design
add Implement dep:1
done 2
done 1
done 2
quit
",
    );
    assert!(stdout.contains("[!] You need to complete the dependency task first!"));
    assert!(stdout.contains("completed task 1"));
    assert!(stdout.contains("completed task 2"));
    // The blocked attempt produced no completion message for task 2 before
    // task 1 was done
    let blocked = stdout.find("[!]").unwrap();
    let completed_two = stdout.find("completed task 2").unwrap();
    assert!(blocked < completed_two);
}

#[test]
fn test_delete_with_dependents_confirmed_clears_dependency() {
    let (stdout, _) = run_script(
        "\
add Foundation
add Walls dep:1
rm 1
y
show 2
quit
",
    );
    assert!(stdout.contains("Continue? [y/N]"));
    assert!(stdout.contains("deleted task 1"));
    // The dependent survives, with its dependency cleared
    assert!(stdout.contains("Walls"));
    assert!(!stdout.contains("dep:1"));
}

#[test]
fn test_delete_with_dependents_declined_keeps_everything() {
    let (stdout, _) = run_script(
        "\
add Foundation
add Walls dep:1
rm 1
n
show 2
quit
",
    );
    assert!(stdout.contains("kept task 1"));
    assert!(stdout.contains("dep:1"));
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[test]
fn test_deleting_list_moves_tasks_to_default() {
    let (stdout, _) = run_script(
        "\
add Pay rent list:Work date:2026-08-07
scope list Work
rmlist Work
scope list Work
scope list default
quit
",
    );
    assert!(stdout.contains("deleted list Work (its tasks moved to default)"));

    // After deletion the Work scope is empty but the task still exists in
    // the default list
    let after_delete = &stdout[stdout.find("deleted list Work").unwrap()..];
    assert!(after_delete.contains("no tasks"));
    assert!(after_delete.contains("Pay rent"));
}

#[test]
fn test_default_list_is_protected() {
    let (_, stderr) = run_script(
        "\
rmlist default
quit
",
    );
    assert!(stderr.contains("the default list cannot be deleted"));
}

#[test]
fn test_duplicate_list_rejected() {
    let (stdout, stderr) = run_script(
        "\
newlist Errands
newlist Errands
lists
quit
",
    );
    assert!(stdout.contains("added list Errands"));
    assert!(stderr.contains("a list named 'Errands' already exists"));
    // Seeded lists plus the one new list
    assert!(stdout.contains("Work"));
    assert!(stdout.contains("Personal"));
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[test]
fn test_recurrence_tick_spawns_one_instance() {
    let (stdout, _) = run_script(
        "\
add standup every:daily date:2026-08-06
tick --now 2026-08-07T09:00
show 2
tick --now 2026-08-07T10:00
quit
",
    );
    assert!(stdout.contains("tick: spawned 1, reminded 0"));
    assert!(stdout.contains("spawned from: 1"));
    assert!(stdout.contains("(2026-08-07)"));
    // Same-day second tick has nothing further to do
    assert!(stdout.contains("tick: nothing due"));
}

#[test]
fn test_missed_recurrences_collapse_to_latest() {
    let (stdout, _) = run_script(
        "\
add standup every:daily date:2026-08-01
tick --now 2026-08-07T09:00
scope all
quit
",
    );
    // One spawn, dated at the most recent due occurrence
    assert!(stdout.contains("tick: spawned 1, reminded 0"));
    assert_eq!(stdout.matches("standup").count(), 2); // parent + one child
}

#[test]
fn test_reminder_fires_exactly_once() {
    let (stdout, _) = run_script(
        "\
add Call the bank remind:2026-08-07T09:00
tick --now 2026-08-07T08:00
tick --now 2026-08-07T09:30
tick --now 2026-08-07T10:00
quit
",
    );
    assert_eq!(
        stdout
            .matches("[!] Reminder: Call the bank is due soon!")
            .count(),
        1
    );
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn test_add_json() {
    let (stdout, _) = run_session(
        &["--json"],
        "\
add Pay rent pri:high list:Work #bills date:2026-08-07
quit
",
    );
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["text"], "Pay rent");
    assert_eq!(parsed["priority"], "high");
    assert_eq!(parsed["list"], "Work");
    assert_eq!(parsed["tags"][0], "bills");
    assert_eq!(parsed["date"], "2026-08-07");
    assert_eq!(parsed["completed"], false);
}

#[test]
fn test_board_json() {
    let (stdout, _) = run_session(
        &["--json"],
        "\
board
quit
",
    );
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let columns = parsed.as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["id"], "todo");
    assert_eq!(columns[1]["id"], "inprogress");
    assert_eq!(columns[2]["id"], "done");
}

// ---------------------------------------------------------------------------
// Session behavior
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_command_does_not_end_session() {
    let (stdout, stderr) = run_script(
        "\
frobnicate
add Still here
quit
",
    );
    assert!(!stderr.is_empty());
    assert!(stdout.contains("added task 1"));
}

#[test]
fn test_config_seeds_custom_lists() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config_path = tmp.path().join("trellis.toml");
    std::fs::write(
        &config_path,
        r#"
[lists]
seed = ["Garden", "Reading"]
"#,
    )
    .unwrap();

    let (stdout, _) = run_session(
        &["--config", config_path.to_str().unwrap()],
        "\
lists
quit
",
    );
    assert!(stdout.contains("Garden"));
    assert!(stdout.contains("Reading"));
    assert!(!stdout.contains("Work"));
}

#[test]
fn test_state_resets_between_sessions() {
    let (stdout, _) = run_script("add Ephemeral\nquit\n");
    assert!(stdout.contains("added task 1"));

    let (stdout, _) = run_script("scope all\nquit\n");
    assert!(stdout.contains("no tasks"));
}
