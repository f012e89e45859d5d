//! Conversions shared by the insert modules.

use std::time::Duration;

/// SQLite stores integers as `i64`; counts beyond that saturate.
pub(crate) fn usize_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn duration_to_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

pub(crate) fn bool_to_i64(value: bool) -> i64 {
    i64::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(usize_to_i64(42), 42);
        assert_eq!(duration_to_millis(Duration::from_secs(2)), 2000);
        assert_eq!(duration_to_millis(Duration::from_micros(999)), 0);
        assert_eq!(bool_to_i64(true), 1);
        assert_eq!(bool_to_i64(false), 0);
    }
}
