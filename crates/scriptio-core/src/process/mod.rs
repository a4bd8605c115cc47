//! Shell execution status decoding.
//!
//! `execute` surfaces the wait status of the spawned shell; these helpers
//! decode it the way the platform C library lays out the bits (exit code in
//! bits 8..16, terminating signal in the low 7).

/// Result of running a shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// The shell exited normally with this code.
    Exited(i32),
    /// The shell was killed by this signal.
    Signaled(i32),
}

impl ExecStatus {
    /// Decode a raw wait status.
    #[must_use]
    pub const fn from_wait_status(status: i32) -> ExecStatus {
        if status & 0x7f == 0 {
            ExecStatus::Exited((status >> 8) & 0xff)
        } else {
            ExecStatus::Signaled(status & 0x7f)
        }
    }

    /// The `$?`-style code: the exit code, or 128 plus the signal number.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            ExecStatus::Exited(code) => code,
            ExecStatus::Signaled(sig) => 128 + sig,
        }
    }

    /// True for a clean zero exit.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self, ExecStatus::Exited(0))
    }
}

/// Clamp an exit status to the 0..=255 range the OS reports.
#[must_use]
pub const fn clamp_exit_status(status: i32) -> i32 {
    status & 0xff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_exit_42() {
        let st = ExecStatus::from_wait_status(42 << 8);
        assert_eq!(st, ExecStatus::Exited(42));
        assert_eq!(st.code(), 42);
        assert!(!st.success());
    }

    #[test]
    fn clean_exit_is_success() {
        let st = ExecStatus::from_wait_status(0);
        assert_eq!(st, ExecStatus::Exited(0));
        assert!(st.success());
    }

    #[test]
    fn killed_by_sigkill() {
        let st = ExecStatus::from_wait_status(9);
        assert_eq!(st, ExecStatus::Signaled(9));
        assert_eq!(st.code(), 137);
    }

    #[test]
    fn clamp_wraps_like_the_os() {
        assert_eq!(clamp_exit_status(0), 0);
        assert_eq!(clamp_exit_status(255), 255);
        assert_eq!(clamp_exit_status(256), 0);
        assert_eq!(clamp_exit_status(-1), 255);
    }
}
