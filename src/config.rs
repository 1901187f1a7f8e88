use std::{env, fmt::Display, str::FromStr};

use tracing::warn;

/// Server and database settings, read from the environment with
/// lab-friendly defaults so the service runs out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_port: u16,
    pub db_name: String,
    /// Upper bound on concurrent database connections. Requests past the
    /// bound queue inside the pool.
    pub db_pool_size: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: parsed("PORT", 5000),
            db_host: text("DB_HOST", "localhost"),
            db_user: text("DB_USER", "root"),
            db_password: text("DB_PASSWORD", "labpass"),
            db_port: parsed("DB_PORT", 3307),
            db_name: text("DB_NAME", "labdb"),
            db_pool_size: parsed("DB_POOL_SIZE", 10),
        }
    }
}

fn text(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T>(key: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("invalid {key} value {raw:?}, using {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_falls_back_on_garbage() {
        env::set_var("BOOKSTORE_TEST_PORT", "not-a-number");
        let value: u16 = parsed("BOOKSTORE_TEST_PORT", 5000);
        assert_eq!(value, 5000);
        env::remove_var("BOOKSTORE_TEST_PORT");
    }

    #[test]
    fn parsed_reads_the_variable() {
        env::set_var("BOOKSTORE_TEST_POOL", "4");
        let value: usize = parsed("BOOKSTORE_TEST_POOL", 10);
        assert_eq!(value, 4);
        env::remove_var("BOOKSTORE_TEST_POOL");
    }

    #[test]
    fn text_defaults_when_unset() {
        assert_eq!(text("BOOKSTORE_TEST_MISSING", "labdb"), "labdb");
    }
}
