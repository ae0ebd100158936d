//! Retry policy and per-call retry state.

use std::time::Duration;

/// Maximum number of attempts per dispatch call.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt.
pub const INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Bounds for one dispatch call's retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    /// Factor applied to the delay after each failed attempt.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: INITIAL_DELAY,
            multiplier: 2,
        }
    }
}

/// Where one call is in its retry sequence.
///
/// A plain value: the loop replaces it with [`RetryState::next`] rather than
/// mutating shared counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 0-based attempt index.
    pub attempt: u32,
    /// Delay to wait if this attempt fails and another follows.
    pub delay: Duration,
}

impl RetryState {
    pub fn start(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            delay: policy.initial_delay,
        }
    }

    /// Whether this is the last attempt the policy allows.
    pub fn is_final(&self, policy: &RetryPolicy) -> bool {
        self.attempt + 1 >= policy.max_attempts.max(1)
    }

    /// State for the following attempt.
    pub fn next(self, policy: &RetryPolicy) -> Self {
        Self {
            attempt: self.attempt + 1,
            delay: self.delay.saturating_mul(policy.multiplier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_delays_double() {
        let policy = RetryPolicy::default();
        let first = RetryState::start(&policy);
        let second = first.next(&policy);
        let third = second.next(&policy);

        assert_eq!(first.delay, Duration::from_millis(1000));
        assert_eq!(second.delay, Duration::from_millis(2000));
        assert_eq!(third.delay, Duration::from_millis(4000));
        assert_eq!(third.attempt, 2);
    }

    #[test]
    fn test_final_attempt_is_third() {
        let policy = RetryPolicy::default();
        let mut state = RetryState::start(&policy);
        assert!(!state.is_final(&policy));
        state = state.next(&policy);
        assert!(!state.is_final(&policy));
        state = state.next(&policy);
        assert!(state.is_final(&policy));
    }

    #[test]
    fn test_zero_attempts_still_allows_one() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert!(RetryState::start(&policy).is_final(&policy));
    }
}
