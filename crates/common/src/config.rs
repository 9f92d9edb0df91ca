use chrono::NaiveTime;

use crate::Thresholds;

/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram credentials
    pub telegram_token: String,
    pub telegram_chat_id: i64,

    // Signal parameters
    pub thresholds: Thresholds,
    /// Calendar days of daily candles requested per ticker.
    pub lookback_days: i64,

    // Schedule (local wall-clock times)
    pub check_times: Vec<NaiveTime>,
    pub digest_time: NaiveTime,

    // Watchlist config file path
    pub watchlist_path: String,
}

impl Config {
    pub const DEFAULT_LOOKBACK_DAYS: i64 = 5;

    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing or malformed
    /// required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram_chat_id = required_env("TELEGRAM_CHAT_ID")
            .trim()
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("TELEGRAM_CHAT_ID must be a numeric chat identifier"));

        let base_pct = parsed_env("THRESHOLD_PERCENT").unwrap_or(Thresholds::DEFAULT_PERCENT);
        let thresholds = Thresholds {
            buy_pct: parsed_env("BUY_THRESHOLD_PERCENT").unwrap_or(base_pct),
            sell_pct: parsed_env("SELL_THRESHOLD_PERCENT").unwrap_or(base_pct),
        };

        let check_times = parse_times(
            &optional_env("CHECK_TIMES").unwrap_or_else(|| "10:00,19:00".to_string()),
            "CHECK_TIMES",
        );
        let digest_time = parse_time(
            &optional_env("DIGEST_TIME").unwrap_or_else(|| "21:00".to_string()),
            "DIGEST_TIME",
        );

        Config {
            telegram_token: required_env("TELEGRAM_TOKEN"),
            telegram_chat_id,
            thresholds,
            lookback_days: parsed_env("LOOKBACK_DAYS").unwrap_or(Self::DEFAULT_LOOKBACK_DAYS),
            check_times,
            digest_time,
            watchlist_path: optional_env("WATCHLIST_PATH")
                .unwrap_or_else(|| "config/watchlist.toml".to_string()),
        }
    }
}

fn parse_times(value: &str, key: &str) -> Vec<NaiveTime> {
    value.split(',').map(|s| parse_time(s, key)).collect()
}

fn parse_time(value: &str, key: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .unwrap_or_else(|_| panic!("{key} contains invalid time '{}', expected HH:MM", value.trim()))
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Optional variable with a typed value: absent means "use the default",
/// but a present value that fails to parse is a configuration error and
/// panics rather than silently falling back.
fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    optional_env(key).map(|v| {
        v.trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} has invalid value '{}'", v.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_time() {
        let t = parse_time("19:00", "TEST");
        assert_eq!(t, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[test]
    fn parses_time_list_with_spaces() {
        let times = parse_times("10:00, 19:00", "TEST");
        assert_eq!(times.len(), 2);
        assert_eq!(times[1], NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[test]
    #[should_panic(expected = "invalid time")]
    fn rejects_malformed_time() {
        parse_time("25:99", "TEST");
    }

    #[test]
    fn parsed_env_reads_present_value() {
        std::env::set_var("TEST_PARSED_ENV_OK", " 2.5 ");
        assert_eq!(parsed_env::<f64>("TEST_PARSED_ENV_OK"), Some(2.5));
    }

    #[test]
    fn parsed_env_absent_means_default() {
        assert_eq!(parsed_env::<i64>("TEST_PARSED_ENV_UNSET"), None);
    }

    #[test]
    #[should_panic(expected = "TEST_PARSED_ENV_BAD has invalid value '1%'")]
    fn parsed_env_rejects_malformed_value() {
        std::env::set_var("TEST_PARSED_ENV_BAD", "1%");
        let _ = parsed_env::<f64>("TEST_PARSED_ENV_BAD");
    }
}
