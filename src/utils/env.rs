const ENV_PREFIX: &str = "NOWPAYMENTS_";

/// Read `NOWPAYMENTS_{key}`, or the bare `{key}` when the prefixed one is unset.
///
/// Empty values count as unset.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}"))
        .or_else(|_| std::env::var(key))
        .ok()
        .filter(|value| !value.is_empty())
}

/// Boolean switch; only `true` and `1` (any case) turn it on.
pub fn env_flag(key: &str) -> Option<bool> {
    env_var(key).map(|value| {
        let value = value.trim();
        value.eq_ignore_ascii_case("true") || value == "1"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_variable_wins() {
        unsafe {
            std::env::set_var("NOWPAYMENTS_ENV_TEST_SHADOWED", "prefixed");
            std::env::set_var("ENV_TEST_SHADOWED", "bare");
        }
        assert_eq!(env_var("ENV_TEST_SHADOWED").as_deref(), Some("prefixed"));
        unsafe {
            std::env::remove_var("NOWPAYMENTS_ENV_TEST_SHADOWED");
        }
        assert_eq!(env_var("ENV_TEST_SHADOWED").as_deref(), Some("bare"));
        unsafe {
            std::env::remove_var("ENV_TEST_SHADOWED");
        }
        assert_eq!(env_var("ENV_TEST_SHADOWED"), None);
    }

    #[test]
    fn test_empty_value_is_unset() {
        unsafe {
            std::env::set_var("NOWPAYMENTS_ENV_TEST_EMPTY", "");
        }
        assert_eq!(env_var("ENV_TEST_EMPTY"), None);
        unsafe {
            std::env::remove_var("NOWPAYMENTS_ENV_TEST_EMPTY");
        }
    }

    #[test]
    fn test_env_flag() {
        for (raw, expected) in [("true", true), ("TRUE", true), ("1", true), ("no", false)] {
            unsafe {
                std::env::set_var("NOWPAYMENTS_ENV_TEST_FLAG", raw);
            }
            assert_eq!(env_flag("ENV_TEST_FLAG"), Some(expected), "{raw}");
        }
        unsafe {
            std::env::remove_var("NOWPAYMENTS_ENV_TEST_FLAG");
        }
        assert_eq!(env_flag("ENV_TEST_FLAG"), None);
    }
}
