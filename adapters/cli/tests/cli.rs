use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

/// (0,0) to (0,1) with the direct step walled off.
const DETOUR_MAZE: &str = "maze:v1:8x8:eyJzdGFydCI6eyJyb3ciOjAsImNvbCI6MH0sImVuZCI6eyJyb3ciOjAsImNvbCI6MX0sIndhbGxzIjpbeyJwb3NpdGlvbiI6eyJyb3ciOjAsImNvbCI6MH0sImRpcmVjdGlvbiI6InJpZ2h0In1dfQ";
/// Same endpoints with the start cell sealed in.
const SEALED_MAZE: &str = "maze:v1:8x8:eyJzdGFydCI6eyJyb3ciOjAsImNvbCI6MH0sImVuZCI6eyJyb3ciOjAsImNvbCI6MX0sIndhbGxzIjpbeyJwb3NpdGlvbiI6eyJyb3ciOjAsImNvbCI6MH0sImRpcmVjdGlvbiI6InJpZ2h0In0seyJwb3NpdGlvbiI6eyJyb3ciOjAsImNvbCI6MH0sImRpcmVjdGlvbiI6ImRvd24ifV19";
/// (0,0) to (0,1) without walls.
const OPEN_MAZE: &str = "maze:v1:8x8:eyJzdGFydCI6eyJyb3ciOjAsImNvbCI6MH0sImVuZCI6eyJyb3ciOjAsImNvbCI6MX0sIndhbGxzIjpbXX0";

fn maze_duel(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_maze-duel"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch maze-duel");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write script");

    child.wait_with_output().expect("maze-duel did not finish")
}

#[test]
fn validate_reports_the_shortest_route() {
    let output = maze_duel(&["validate", DETOUR_MAZE], "");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "validate should accept the maze");
    assert!(
        stdout.contains("1 walls, shortest route 3 moves"),
        "unexpected output: {stdout}"
    );
}

#[test]
fn validate_rejects_disconnected_mazes() {
    let output = maze_duel(&["validate", SEALED_MAZE], "");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("no path exists"),
        "unexpected error: {stderr}"
    );
}

#[test]
fn validate_rejects_other_board_sizes() {
    let resized = OPEN_MAZE.replacen(":8x8:", ":9x9:", 1);
    let output = maze_duel(&["validate", &resized], "");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("9x9"));
}

#[test]
fn practice_run_finishes_from_a_script() {
    let output = maze_duel(&["practice", DETOUR_MAZE], "d\ns\nd\nw\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("bump!"), "unexpected output: {stdout}");
    assert!(stdout.contains("Finished in 4 moves"), "unexpected output: {stdout}");
}

#[test]
fn hot_seat_duel_plays_one_round() {
    let build = "start 0 0\nend 0 1\ndone\n";
    let script = format!("{build}{build}d\nn\n");
    let output = maze_duel(&["duel", "--seed", "3"], &script);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "duel failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("moves first."), "unexpected output: {stdout}");
    assert!(
        stdout.contains("reached the goal in 1 moves!"),
        "unexpected output: {stdout}"
    );
}

#[test]
fn build_prints_a_reusable_maze_string() {
    let output = maze_duel(&["build"], "start 0 0\nend 0 1\ndone\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains(OPEN_MAZE), "unexpected output: {stdout}");
}
