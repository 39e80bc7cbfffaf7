//! Time source for copyright year checks.
//!
//! The current year is read once per run and handed to every component as a
//! plain value, so checks and rewrites stay deterministic under test.

use chrono::{Datelike, Local};

/// Returns the calendar year of the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_year_is_plausible() {
        let year = current_year();
        assert!((2000..3000).contains(&year));
    }
}
