use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub fn slow_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("slow"));
    cmd.stdin(Stdio::null());
    cmd
}

pub fn pid_of(child: &Child) -> Pid {
    Pid::from_raw(child.id() as i32)
}

/// Spawn a long-living process not owned by slow.
pub fn spawn_sleeper() -> Child {
    Command::new("sleep")
        .arg("30")
        .stdin(Stdio::null())
        .spawn()
        .unwrap()
}

/// Wait for a child exit, kill it when timeout expires.
pub fn wait_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(20));
    }
    _ = child.kill();
    _ = child.wait();
    None
}

/// Return a one letter process state from `/proc/<pid>/stat`.
pub fn proc_state(pid: Pid) -> Option<char> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    // the command name may contain spaces, state follows the closing paren
    let (_, rest) = stat.rsplit_once(')')?;
    rest.trim_start().chars().next()
}

pub fn is_alive(pid: Pid) -> bool {
    !matches!(proc_state(pid), None | Some('Z') | Some('X'))
}

pub fn terminate(child: &mut Child) {
    _ = kill(pid_of(child), Signal::SIGCONT);
    _ = child.kill();
    _ = child.wait();
}

/// Find a direct child of a process by scanning `/proc`.
pub fn child_of(parent: Pid) -> Option<Pid> {
    for entry in std::fs::read_dir("/proc").ok()?.flatten() {
        let Ok(raw) = entry.file_name().to_string_lossy().parse::<i32>() else {
            continue;
        };
        let Ok(stat) = std::fs::read_to_string(entry.path().join("stat")) else {
            continue;
        };
        let Some((_, rest)) = stat.rsplit_once(')') else {
            continue;
        };
        // fields after the command name: state, ppid, ...
        let ppid = rest.split_whitespace().nth(1).and_then(|p| p.parse::<i32>().ok());
        if ppid == Some(parent.as_raw()) {
            return Some(Pid::from_raw(raw));
        }
    }
    None
}

/// Poll until `cond` holds or timeout expires.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}
