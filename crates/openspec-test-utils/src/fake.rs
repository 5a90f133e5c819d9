//! A scriptable fake `openspec` executable.
//!
//! The fake is a POSIX shell script written into a temporary directory. Every
//! invocation appends its arguments and working directory to log files, so
//! tests can assert which commands were (or were not) spawned, and where.
//!
//! Behaviour is keyed on argument tokens:
//!
//! | Token | Effect |
//! |-------|--------|
//! | `--version` (first) | prints [`FAKE_VERSION`], exits 0 (or 127 when not installed) |
//! | `pwd` (first) | prints the working directory |
//! | `fail` | prints `error: <args>` to stderr, exits 1 |
//! | `slow` | sleeps for 30 seconds |
//! | `background` | prints `partial`, exits 0, leaves a sleeper holding stdout open |
//! | `verbatim` | prints [`VERBATIM_OUTPUT`] |
//! | anything else | prints `openspec <args>` |

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Version reported by the fake's `--version`
pub const FAKE_VERSION: &str = "0.9.1";

/// Output printed for the `verbatim` token; whitespace and markup are deliberate
pub const VERBATIM_OUTPUT: &str = "  <spec id=\"a&b\">\n\t* keep   spacing *\n\n";

const SCRIPT: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> '@LOG@'
pwd >> '@CWD_LOG@'
case "$1" in
  --version) @VERSION@ ;;
  pwd) pwd; exit 0 ;;
esac
for arg in "$@"; do
  case "$arg" in
    fail) echo "error: $*" >&2; exit 1 ;;
    slow) exec sleep 30 ;;
    background) sleep 30 & echo partial; exit 0 ;;
    verbatim) printf '  <spec id="a&b">\n\t* keep   spacing *\n\n'; exit 0 ;;
  esac
done
echo "openspec $*"
"#;

const INSTALLED: &str = "echo '@FAKE_VERSION@'; exit 0";
const REMOVED_AFTER_PROBE: &str = "echo '@FAKE_VERSION@'; rm -f \"$0\"; exit 0";
const NOT_INSTALLED: &str = "echo 'openspec: command not found' >&2; exit 127";

/// A fake `openspec` executable living in its own temporary directory.
///
/// # Example
///
/// ```rust,no_run
/// use openspec_test_utils::FakeOpenSpec;
///
/// let fake = FakeOpenSpec::new();
/// // configure the server with `fake.path()` as its program
/// assert!(fake.commands().is_empty());
/// ```
pub struct FakeOpenSpec {
    temp_dir: TempDir,
}

impl Default for FakeOpenSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOpenSpec {
    /// A fake whose `--version` probe succeeds.
    pub fn new() -> Self {
        Self::with_version_branch(&INSTALLED.replace("@FAKE_VERSION@", FAKE_VERSION))
    }

    /// A fake whose `--version` probe fails, as if OpenSpec were missing.
    pub fn not_installed() -> Self {
        Self::with_version_branch(NOT_INSTALLED)
    }

    /// A fake whose `--version` probe succeeds and then deletes the
    /// executable, so the command that follows cannot be started.
    pub fn removed_after_probe() -> Self {
        Self::with_version_branch(&REMOVED_AFTER_PROBE.replace("@FAKE_VERSION@", FAKE_VERSION))
    }

    fn with_version_branch(branch: &str) -> Self {
        let temp_dir = TempDir::new().expect("FakeOpenSpec: failed to create temp dir");
        let log = temp_dir.path().join("invocations.log");
        let cwd_log = temp_dir.path().join("cwd.log");
        fs::write(&log, "").expect("FakeOpenSpec: failed to create log");
        fs::write(&cwd_log, "").expect("FakeOpenSpec: failed to create cwd log");

        let script = SCRIPT
            .replace("@LOG@", &log.display().to_string())
            .replace("@CWD_LOG@", &cwd_log.display().to_string())
            .replace("@VERSION@", branch);
        let path = temp_dir.path().join("openspec");
        fs::write(&path, script).expect("FakeOpenSpec: failed to write script");
        make_executable(&path);

        Self { temp_dir }
    }

    /// Path to the fake executable.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("openspec")
    }

    /// Argument strings of every invocation, probes included.
    pub fn invocations(&self) -> Vec<String> {
        self.read_log("invocations.log")
    }

    /// Working directory of every invocation, in the same order as
    /// [`invocations`](Self::invocations).
    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.read_log("cwd.log")
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }

    /// Invocations other than the `--version` probe.
    pub fn commands(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter(|line| line != "--version")
            .collect()
    }

    fn read_log(&self, name: &str) -> Vec<String> {
        let log = self.temp_dir.path().join(name);
        fs::read_to_string(&log)
            .unwrap_or_else(|e| panic!("FakeOpenSpec: failed to read {}: {e}", log.display()))
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .expect("FakeOpenSpec: failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("FakeOpenSpec: failed to chmod script");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
