//! Shared helper functions for PostgreSQL query building and row conversion.

use agora_core::error::{StorageError, StorageResult};

/// Escape `LIKE` wildcards so user input matches literally.
///
/// Backslash is PostgreSQL's default `LIKE` escape character.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build a case-insensitive substring pattern for `ILIKE`.
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

/// Reject negative counters, which indicate data corruption.
pub fn non_negative(value: i64, field_name: &str) -> StorageResult<i64> {
    if value < 0 {
        return Err(StorageError::SerializationError(format!(
            "{} is negative ({}), which indicates data corruption",
            field_name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test critique: les jokers LIKE saisis par l'utilisateur sont échappés
    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(contains_pattern("rust"), "%rust%");
    }

    #[test]
    fn test_negative_counter_includes_field_name() {
        let err = non_negative(-1, "thread.view_count").unwrap_err().to_string();
        assert!(err.contains("thread.view_count"));
        assert!(err.contains("corruption"));
        assert_eq!(non_negative(0, "x").unwrap(), 0);
    }
}
