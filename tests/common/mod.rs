//! Shared helpers for the `tsw` binary integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, SystemTime};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_tsw") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "tsw.exe" } else { "tsw" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve tsw binary path for integration test"),
    }
}

/// Run `tsw` with `args`, using `cwd` as the working directory so relative
/// defaults resolve inside the test sandbox.
pub fn run_tsw(args: &[&str], cwd: &Path) -> CmdResult {
    let output = Command::new(resolve_bin_path())
        .args(args)
        .current_dir(cwd)
        .env_remove("TEMPSWEEPER_SETTINGS")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute tsw command");

    CmdResult {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Create a file and push its mtime `days` into the past.
pub fn stale_file(dir: &Path, name: &str, days: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "stale contents").expect("write fixture file");
    let mtime = filetime::FileTime::from_system_time(
        SystemTime::now() - Duration::from_secs(days * 86_400),
    );
    filetime::set_file_mtime(&path, mtime).expect("set fixture mtime");
    path
}
