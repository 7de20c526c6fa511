//! Throttle window bookkeeping

/// Last-accepted timestamp, owned by the event gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleState {
    last_accepted_at_ms: u64,
}

impl ThrottleState {
    /// Start the clock at `now_ms` (process start)
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_accepted_at_ms: now_ms,
        }
    }

    pub fn last_accepted_at_ms(&self) -> u64 {
        self.last_accepted_at_ms
    }

    /// True when `now_ms` is still inside the window opened by the last accepted event
    pub fn is_throttled(&self, now_ms: u64, throttle_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_accepted_at_ms) < window_ms(throttle_ms)
    }

    /// Record an event that cleared the window
    pub fn accept(&mut self, now_ms: u64) {
        self.last_accepted_at_ms = now_ms;
    }
}

/// Nominal delay plus a 10% margin for multi-file bursts from one change
pub fn window_ms(throttle_ms: u64) -> u64 {
    throttle_ms.saturating_add(throttle_ms / 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_adds_ten_percent() {
        assert_eq!(window_ms(200), 220);
        assert_eq!(window_ms(100), 110);
        assert_eq!(window_ms(15), 16);
        assert_eq!(window_ms(0), 0);
    }

    #[test]
    fn test_window_boundary() {
        let state = ThrottleState::new(1_000);
        assert!(state.is_throttled(1_000, 100));
        assert!(state.is_throttled(1_109, 100));
        assert!(!state.is_throttled(1_110, 100));
    }

    #[test]
    fn test_clock_going_backwards_stays_throttled() {
        let state = ThrottleState::new(1_000);
        assert!(state.is_throttled(900, 100));
    }

    #[test]
    fn test_accept_moves_window() {
        let mut state = ThrottleState::new(0);
        state.accept(500);
        assert_eq!(state.last_accepted_at_ms(), 500);
        assert!(state.is_throttled(550, 100));
        assert!(!state.is_throttled(610, 100));
    }
}
