use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const QUAD: &str = r#"# two triangles
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
f 1 2 3
f 1 3 4
"#;

fn asset_root() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir_all(dir.path().join("3D")).expect("3D dir");
    fs::write(dir.path().join("3D/bunny.obj"), QUAD).expect("write obj");
    dir
}

#[test]
fn pentagon_summary_needs_no_assets() {
    let mut cmd = Command::cargo_bin("render-labs").expect("binary exists");
    cmd.arg("pentagon").arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Exercise: pentagon"))
        .stdout(contains("Window: \"Pentagon\" 640x640"))
        .stdout(contains("Mesh: 5 vertices, 3 triangles, 3 floats per vertex"));
}

#[test]
fn scene_overrides_apply_to_the_bunny() {
    let root = asset_root();
    let scene = root.path().join("bunny.xml");
    fs::write(
        &scene,
        "<scene><title>Quad</title><position>1 2 -8</position></scene>",
    )
    .expect("write scene");

    let mut cmd = Command::cargo_bin("render-labs").expect("binary exists");
    cmd.arg("bunny")
        .arg("--scene")
        .arg(&scene)
        .arg("--assets")
        .arg(root.path())
        .arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Exercise: bunny"))
        .stdout(contains("Window: \"Quad\" 600x600"))
        .stdout(contains("Mesh: 4 vertices, 2 triangles, 3 floats per vertex"))
        .stdout(contains("Model position: (1.00, 2.00, -8.00)"));
}

#[test]
fn missing_model_fails_with_its_path() {
    let root = TempDir::new().expect("temp dir");
    let mut cmd = Command::cargo_bin("render-labs").expect("binary exists");
    cmd.arg("bunny")
        .arg("--assets")
        .arg(root.path())
        .arg("--summary-only");
    cmd.assert().failure().stderr(contains("bunny.obj"));
}

#[test]
fn unknown_exercise_is_rejected() {
    let mut cmd = Command::cargo_bin("render-labs").expect("binary exists");
    cmd.arg("teapot").arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("unknown exercise \"teapot\""));
}
