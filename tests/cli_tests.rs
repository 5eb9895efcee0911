use std::io::Write;
use std::process::{Command, Stdio};

const HDFS_FORMAT: &str = "<Date> <Time> <Pid> <Level> <Component>: <Content>";

fn ulp() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ulp"))
}

fn fixture() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/hdfs_sample.log").to_string()
}

#[test]
fn writes_templates_by_count_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("templates.txt");
    let status = ulp()
        .args(["--header-format", HDFS_FORMAT, "--templates-only", "--format", "text", "-o"])
        .arg(&out)
        .arg(fixture())
        .status()
        .unwrap();
    assert!(status.success());

    let written = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        [
            "(6 events) PacketResponder <*> for block <*> terminating",
            "(3 events) Received block <*> of size <*> from <*>",
            "(3 events) BLOCK* NameSystem.addStoredBlock: blockMap updated: <*>:50010 is added to <*> size 67108864",
        ]
    );
}

#[test]
fn reads_stdin_and_prints_events_csv() {
    let mut child = ulp()
        .args(["--workers", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"msg A 1\nmsg B 2\nmsg A 3\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "LineID,EventID,TemplateID,Content\n1,msgA3,1,msg A 1\n2,msgB3,2,msg B 2\n3,msgA3,1,msg A 3\n"
    );
}

#[test]
fn flags_override_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ulp.json");
    std::fs::write(&config, r#"{"wildcard": "{var}", "replace_numbers": false}"#).unwrap();

    let mut child = ulp()
        .arg("--config")
        .arg(&config)
        .args(["--replace-numbers", "--templates-only", "--format", "text"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"listening on port 8080\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "(1 events) listening on port {var}\n"
    );
}

#[test]
fn rejects_unknown_format() {
    let output = ulp().args(["--format", "xml"]).arg(fixture()).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown format"));
}

#[test]
fn rejects_negative_sample_size() {
    let output = ulp().args(["--sample-size", "-3"]).arg(fixture()).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("sample size cannot be negative"));
}
