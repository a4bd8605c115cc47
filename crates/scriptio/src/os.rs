//! Operating system services: process execution, temporary names, the
//! environment, and wall-clock dates.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use scriptio_core::process::ExecStatus;
use scriptio_core::time::{self, CivilTime};

use crate::error::Result;
use crate::handle::shell_command;

/// Run `cmd` through the platform shell and wait for it.
pub(crate) fn execute(cmd: &str) -> Result<ExecStatus> {
    let status = shell_command(cmd).status()?;
    Ok(exec_status(status))
}

#[cfg(unix)]
fn exec_status(status: std::process::ExitStatus) -> ExecStatus {
    use std::os::unix::process::ExitStatusExt;

    ExecStatus::from_wait_status(status.into_raw())
}

#[cfg(not(unix))]
fn exec_status(status: std::process::ExitStatus) -> ExecStatus {
    ExecStatus::Exited(status.code().unwrap_or(-1))
}

static TMP_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A fresh path in the system temporary directory.
///
/// The name is unique within this process; nothing is created on disk, so
/// the usual time-of-check caveat applies to callers that open it later.
pub(crate) fn tmp_name() -> io::Result<PathBuf> {
    let dir = std::env::temp_dir();
    let pid = std::process::id();
    for _ in 0..100 {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let candidate = dir.join(format!("scr_{pid:x}_{n:x}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(io::Error::other("unable to generate a unique temporary name"))
}

/// The value of environment variable `name`, if set and valid UTF-8.
pub(crate) fn getenv(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// The current UTC time rendered through `spec`.
pub(crate) fn date(spec: &str) -> Result<String> {
    let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
    };
    let civil = CivilTime::from_unix(secs);
    Ok(time::format(&civil, spec)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_names_are_distinct() {
        let a = tmp_name().unwrap();
        let b = tmp_name().unwrap();
        assert_ne!(a, b);
        assert!(!a.exists());
    }

    #[test]
    fn getenv_reads_the_environment() {
        // PATH is set in any environment these tests run in.
        assert!(getenv("PATH").is_some());
        assert!(getenv("SCRIPTIO_UNSET_VARIABLE_XYZZY").is_none());
    }

    #[test]
    fn date_renders_four_digit_year() {
        let year = date("%Y").unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
    }

    #[cfg(unix)]
    #[test]
    fn execute_reports_exit_codes() {
        assert_eq!(execute("exit 0").unwrap(), ExecStatus::Exited(0));
        assert_eq!(execute("exit 7").unwrap(), ExecStatus::Exited(7));
    }
}
