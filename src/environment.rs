//! # Environment
//!
//! Read-only snapshot of the process environment used to fill the reserved log fields

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Lambda runtime variable naming the destination log group
pub const LOG_GROUP_NAME_VAR: &str = "AWS_LAMBDA_LOG_GROUP_NAME";

/// Lambda runtime variable naming the destination log stream
pub const LOG_STREAM_NAME_VAR: &str = "AWS_LAMBDA_LOG_STREAM_NAME";

/// Immutable name to value mapping of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// An environment with no variables set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    /// * Variables whose name or value isn't valid UTF-8 are skipped
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Process wide snapshot, captured once on first use
    pub fn global() -> Arc<Environment> {
        static GLOBAL: OnceLock<Arc<Environment>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Environment::capture())).clone()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Value for the `log_group_name` field, empty when unset
    pub fn log_group_name(&self) -> &str {
        self.get(LOG_GROUP_NAME_VAR).unwrap_or_default()
    }

    /// Value for the `log_steam_name` field, empty when unset
    pub fn log_stream_name(&self) -> &str {
        self.get(LOG_STREAM_NAME_VAR).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_fork::rusty_fork_test;

    #[test]
    fn reserved_names_default_to_empty() {
        let env = Environment::empty();
        assert_eq!(env.log_group_name(), "");
        assert_eq!(env.log_stream_name(), "");
    }

    #[test]
    fn reserved_names_from_vars() {
        let env: Environment = [
            (LOG_GROUP_NAME_VAR, "/aws/lambda/orders"),
            (LOG_STREAM_NAME_VAR, "2024/01/01/[$LATEST]abc"),
            ("UNRELATED", "x=y"),
        ]
        .into_iter()
        .collect();

        assert_eq!(env.log_group_name(), "/aws/lambda/orders");
        assert_eq!(env.log_stream_name(), "2024/01/01/[$LATEST]abc");
        assert_eq!(env.get("UNRELATED"), Some("x=y"));
    }

    // Each test runs in its own process so the real environment can be changed safely
    rusty_fork_test! {
        #[test]
        fn capture_process_environment() {
            std::env::set_var(LOG_GROUP_NAME_VAR, "group");
            std::env::set_var(LOG_STREAM_NAME_VAR, "stream");
            std::env::set_var("EMF_TEST_PAIR", "key=value");

            let env = Environment::capture();
            assert_eq!(env.log_group_name(), "group");
            assert_eq!(env.log_stream_name(), "stream");
            assert_eq!(env.get("EMF_TEST_PAIR"), Some("key=value"));
        }

        #[test]
        fn global_is_captured_once() {
            std::env::set_var(LOG_GROUP_NAME_VAR, "before");
            let first = Environment::global();
            std::env::set_var(LOG_GROUP_NAME_VAR, "after");
            let second = Environment::global();

            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(second.log_group_name(), "before");
        }
    }
}
