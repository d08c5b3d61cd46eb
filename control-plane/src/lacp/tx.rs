//! LACP Transmit machine (§4.9, 802.1AX §6.4.15): rate-limited LACPDU
//! emission gated by `ntt`. Not table-driven like the other machines — it's
//! a counter plus a gate, matching the standard's own description of it.

pub const MAX_LACPDUS_PER_WINDOW: u32 = 3;
pub const WINDOW_SECS: u32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct TxLimiter {
    sent_this_window: u32,
}

pub enum TxDecision {
    Send,
    Defer,
}

impl TxLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when `ntt` is set and the machine wants to transmit. Returns
    /// whether to actually send now or defer to the next window.
    pub fn try_transmit(&mut self) -> TxDecision {
        if self.sent_this_window >= MAX_LACPDUS_PER_WINDOW {
            TxDecision::Defer
        } else {
            self.sent_this_window += 1;
            TxDecision::Send
        }
    }

    /// Called by the 1-second tick; resets the window's budget.
    pub fn roll_window(&mut self) {
        self.sent_this_window = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_honored_within_one_window() {
        let mut limiter = TxLimiter::new();
        for _ in 0..MAX_LACPDUS_PER_WINDOW {
            assert!(matches!(limiter.try_transmit(), TxDecision::Send));
        }
        assert!(matches!(limiter.try_transmit(), TxDecision::Defer));
        limiter.roll_window();
        assert!(matches!(limiter.try_transmit(), TxDecision::Send));
    }
}
