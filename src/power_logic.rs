/// Decide whether the display should stay lit given the screen-saver policy.
///
/// A timeout of 0 disables the screen saver. Input seen in the current
/// poll always keeps the screen on, even if the idle time already crossed
/// the threshold.
pub fn screen_should_be_on(saver_timeout_ms: u32, idle_ms: u32, input_this_poll: bool) -> bool {
    if saver_timeout_ms == 0 || input_this_poll {
        return true;
    }

    idle_ms < saver_timeout_ms
}

/// Decide whether the menu should fall back to the status screen.
///
/// A timeout of 0 disables the fallback.
pub fn menu_timed_out(menu_timeout_ms: u32, idle_ms: u32) -> bool {
    menu_timeout_ms != 0 && idle_ms >= menu_timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_saver_never_blanks() {
        assert!(screen_should_be_on(0, u32::MAX, false));
    }

    #[test]
    fn saver_engages_at_threshold() {
        assert!(screen_should_be_on(30_000, 29_999, false));
        assert!(!screen_should_be_on(30_000, 30_000, false));
    }

    #[test]
    fn input_keeps_screen_on() {
        assert!(screen_should_be_on(30_000, 60_000, true));
    }

    #[test]
    fn menu_timeout_threshold_and_disable() {
        assert!(!menu_timed_out(10_000, 9_999));
        assert!(menu_timed_out(10_000, 10_000));
        assert!(!menu_timed_out(0, u32::MAX));
    }
}
