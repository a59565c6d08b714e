//! Freshness-window cache for expensive readings (network probes)

use std::time::{Duration, Instant};

/// Last computed value of a sensor plus the time it was computed.
///
/// The value is reused until the freshness window has elapsed, so a short
/// refresh interval does not hammer external services.
#[derive(Debug, Clone)]
pub struct FreshValue {
    value: String,
    fetched_at: Option<Instant>,
    window: Duration,
}

impl FreshValue {
    pub fn new(window: Duration) -> Self {
        Self {
            value: String::new(),
            fetched_at: None,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a new value must be computed at `now`
    pub fn is_stale(&self, now: Instant) -> bool {
        match self.fetched_at {
            None => true,
            Some(_) if self.value.is_empty() => true,
            Some(at) => now.saturating_duration_since(at) > self.window,
        }
    }

    /// Return the cached value, refreshing it first if it is stale
    pub fn get_or_refresh<F>(&mut self, refresh: F) -> &str
    where
        F: FnOnce() -> String,
    {
        self.get_or_refresh_at(Instant::now(), refresh)
    }

    pub fn get_or_refresh_at<F>(&mut self, now: Instant, refresh: F) -> &str
    where
        F: FnOnce() -> String,
    {
        if self.is_stale(now) {
            self.value = refresh();
            self.fetched_at = Some(now);
        }
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_read_refreshes() {
        let mut cache = FreshValue::new(Duration::from_secs(10));
        assert_eq!(cache.get_or_refresh(|| "up".to_string()), "up");
    }

    #[test]
    fn test_value_reused_inside_window() {
        let start = Instant::now();
        let mut cache = FreshValue::new(Duration::from_secs(10));
        cache.get_or_refresh_at(start, || "first".to_string());

        let later = start + Duration::from_secs(5);
        assert_eq!(cache.get_or_refresh_at(later, || "second".to_string()), "first");
    }

    #[test]
    fn test_value_refreshed_after_window() {
        let start = Instant::now();
        let mut cache = FreshValue::new(Duration::from_secs(10));
        cache.get_or_refresh_at(start, || "first".to_string());

        let later = start + Duration::from_secs(11);
        assert_eq!(cache.get_or_refresh_at(later, || "second".to_string()), "second");
    }

    #[test]
    fn test_empty_value_is_retried() {
        let start = Instant::now();
        let mut cache = FreshValue::new(Duration::from_secs(600));
        cache.get_or_refresh_at(start, String::new);
        assert!(cache.is_stale(start + Duration::from_secs(1)));
    }
}
