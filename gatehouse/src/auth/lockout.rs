//! Failed-login lockout policy.
//!
//! A two-state machine over the per-account failure counter: an account is
//! `Active` below the threshold and `Blocked` at or above it. The counter
//! itself lives in the account store; wrong passwords increment it atomically
//! and a successful login resets it to zero, so the only transitions are
//! Active(n) -> Active(n+1) -> Blocked and Active(n) -> Active(0).

/// Default number of failed logins before an account is blocked.
pub const DEFAULT_MAX_FAILED_LOGINS: i32 = 5;

/// Lockout verdict for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// Below the threshold; login attempts are processed normally.
    Active,
    /// At or above the threshold; login attempts are rejected outright.
    Blocked,
}

/// Threshold-keyed lockout policy.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    threshold: i32,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MAX_FAILED_LOGINS,
        }
    }
}

impl LockoutPolicy {
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    /// State of an account with the given failure count.
    pub fn state(&self, failed_logins: i32) -> LockoutState {
        if failed_logins >= self.threshold {
            LockoutState::Blocked
        } else {
            LockoutState::Active
        }
    }

    pub fn is_blocked(&self, failed_logins: i32) -> bool {
        self.state(failed_logins) == LockoutState::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_below_threshold() {
        let policy = LockoutPolicy::default();

        for failed_logins in 0..DEFAULT_MAX_FAILED_LOGINS {
            assert_eq!(policy.state(failed_logins), LockoutState::Active);
        }
    }

    #[test]
    fn blocked_at_and_above_threshold() {
        let policy = LockoutPolicy::default();

        assert_eq!(
            policy.state(DEFAULT_MAX_FAILED_LOGINS),
            LockoutState::Blocked
        );
        assert_eq!(
            policy.state(DEFAULT_MAX_FAILED_LOGINS + 10),
            LockoutState::Blocked
        );
    }

    #[test]
    fn custom_threshold() {
        let policy = LockoutPolicy::new(3);

        assert!(!policy.is_blocked(2));
        assert!(policy.is_blocked(3));
    }

    #[test]
    fn reset_transition_unblocks_only_below_threshold() {
        // A reset models the counter returning to zero; any non-zero count
        // below the threshold is still Active.
        let policy = LockoutPolicy::default();

        assert_eq!(policy.state(0), LockoutState::Active);
        assert_eq!(policy.state(DEFAULT_MAX_FAILED_LOGINS - 1), LockoutState::Active);
    }
}
