use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliTestEnv {
    temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_payload(&self, name: &str, text: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, text).expect("failed to write payload");
        path
    }

    fn write_config(&self, text: &str) {
        let dir = self.xdg_config.join("pydebug");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), text).expect("failed to write config");
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../pydebug-core/tests/fixtures/pydevd")
        .join(name)
}

fn command(env: &CliTestEnv, args: &[&str]) -> Command {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("pydebug-decode"));
    let mut command = Command::new(bin_path);
    command
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG");
    command
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    command(env, args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute pydebug-decode: {e}"))
}

fn run_with_stdin(env: &CliTestEnv, args: &[&str], stdin: &str) -> Output {
    let mut child = command(env, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn pydebug-decode");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait")
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "pydebug-decode {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn decodes_thread_fixture() {
    let env = CliTestEnv::new();
    let file = path_arg(&fixture("thread_suspended.xml"));
    let args = ["--kind", "thread", file.as_str()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json = stdout_json(&output);
    assert_eq!(json["decoded"]["id"], "pid_4182_id_140035");
    assert_eq!(json["decoded"]["frames"][2]["name"], "<module>");
    assert!(json["decoded"]["message"].is_null());
}

#[test]
fn applies_configured_path_mappings() {
    let env = CliTestEnv::new();
    env.write_config("[[path_mappings]]\nremote = \"/srv/app\"\nlocal = \"/work/app\"\n");
    let file = path_arg(&fixture("threading_lock.xml"));
    let args = ["--kind", "threading-event", "--compact", file.as_str()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json = stdout_json(&output);
    assert_eq!(json["decoded"]["event"], "ACQUIRE_END");
    assert_eq!(json["decoded"]["line"], 20);
    assert_eq!(
        json["decoded"]["frames"][0]["position"]["file"],
        "/work/app/worker.py"
    );
}

#[test]
fn decodes_several_files_as_array() {
    let env = CliTestEnv::new();
    let first = env.write_payload("a.xml", r#"<xml><io s="out" ctx="1"/></xml>"#);
    let second = env.write_payload("b.xml", r#"<xml><io s="err%21" ctx="2"/></xml>"#);
    let (first, second) = (path_arg(&first), path_arg(&second));
    let args = ["--kind", "io", first.as_str(), second.as_str()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json = stdout_json(&output);
    let items = json.as_array().expect("one entry per file");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["decoded"]["text"], "err!");
    assert_eq!(items[1]["decoded"]["context"], 2);
}

#[test]
fn reads_stdin_with_thread_id_prefix() {
    let env = CliTestEnv::new();
    let args = ["--kind", "values", "--thread-id"];
    let payload = "pid_1_id_9\t<xml><var name=\"x\" type=\"int\" value=\"int: 5\" isContainer=\"\" isErrorOnEval=\"\"/></xml>";

    let output = run_with_stdin(&env, &args, payload);
    assert_success(&args, &output);

    let json = stdout_json(&output);
    assert_eq!(json["file"], "-");
    assert_eq!(json["thread_id"], "pid_1_id_9");
    assert_eq!(json["decoded"][0]["value"], "5");
    assert_eq!(json["decoded"][0]["is_container"], false);
}

#[test]
fn malformed_payload_fails_with_decoder_message() {
    let env = CliTestEnv::new();
    let file = env.write_payload(
        "bad.xml",
        r#"<xml><threading_event time="1" type="queue" event="start" line="1"/></xml>"#,
    );
    let file = path_arg(&file);
    let args = ["--kind", "threading-event", file.as_str()];

    let output = run_bin(&env, &args);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to decode"), "stderr:\n{stderr}");
    assert!(stderr.contains("unknown type \"queue\""), "stderr:\n{stderr}");
}

#[test]
fn reports_logging_failure_and_still_decodes() {
    let env = CliTestEnv::new();
    // a regular file where the state directory should be
    fs::remove_dir_all(&env.xdg_state).expect("failed to remove XDG_STATE_HOME");
    fs::write(&env.xdg_state, "not a directory").expect("failed to write state file");
    let file = env.write_payload("io.xml", r#"<xml><io s="hi" ctx="1"/></xml>"#);
    let file = path_arg(&file);
    let args = ["--kind", "io", file.as_str()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("logging disabled"), "stderr:\n{stderr}");
    assert_eq!(stdout_json(&output)["decoded"]["text"], "hi");
}

#[test]
fn verbose_echoes_decoder_traces_on_stderr() {
    let env = CliTestEnv::new();
    let file = path_arg(&fixture("thread_suspended.xml"));
    let args = ["--kind", "thread", "--verbose", file.as_str()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Decoded payload"), "stderr:\n{stderr}");
    assert!(env.xdg_state.join("pydebug").is_dir());
}
