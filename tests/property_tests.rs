//! Property-based tests for logfmt_logger using proptest

use logfmt_logger::core::escape::{escape, needs_quoting};
use logfmt_logger::prelude::*;
use logfmt_logger::{level_name, should_log, INVALID_LEVEL_NAME};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let upper: LogLevel = level.as_str().to_uppercase().parse().unwrap();
        prop_assert_eq!(level, upper);
    }

    /// Test that LogLevel ordering is consistent with the numeric values
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 < level2, (level1 as u8) < (level2 as u8));
        prop_assert_eq!(level1 >= level2, should_log(level1, level2));
    }

    /// Out-of-range numeric levels always render the sentinel
    #[test]
    fn test_level_name_out_of_range(raw in prop_oneof![i64::MIN..0i64, 5i64..i64::MAX]) {
        prop_assert_eq!(level_name(raw), INVALID_LEVEL_NAME);
    }
}

// ============================================================================
// Escaping Tests
// ============================================================================

proptest! {
    /// Escaped output never contains a raw line break
    #[test]
    fn test_escape_never_breaks_lines(raw in proptest::collection::vec(any::<u8>(), 0..64)) {
        let escaped = escape(&raw);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
    }

    /// Values that need no quoting are written unchanged
    #[test]
    fn test_plain_values_are_verbatim(raw in "[a-zA-Z0-9_./:-]{0,32}") {
        prop_assert!(!needs_quoting(raw.as_bytes()) || raw == "null");
        if raw != "null" {
            prop_assert_eq!(escape(raw.as_bytes()), raw);
        }
    }

    /// Quoted values start and end with a double quote
    #[test]
    fn test_quoted_values_are_wrapped(raw in ".*[ =\"].*") {
        let escaped = escape(raw.as_bytes());
        prop_assert!(escaped.starts_with('"'));
        prop_assert!(escaped.ends_with('"'));
        prop_assert!(escaped.len() >= 2);
    }
}

// ============================================================================
// Field Tests
// ============================================================================

proptest! {
    /// A flat list keeps floor(n / 2) pairs and drops a trailing key
    #[test]
    fn test_from_flat_pairs(items in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
        let values: Vec<FieldValue> = items.iter().map(|s| FieldValue::from(s.as_str())).collect();
        let fields = Fields::from_flat(values);
        prop_assert_eq!(fields.len(), items.len() / 2);

        for (i, field) in fields.iter().enumerate() {
            prop_assert_eq!(&field.key, &items[2 * i]);
        }
    }

    /// Every emitted record is exactly one line
    #[test]
    fn test_record_is_single_line(message in ".*", value in ".*") {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder().writer(buffer.clone()).build();
        logger.info_with(&message, &Fields::new().with_field("k", value.as_str()));

        let contents = buffer.contents();
        prop_assert!(contents.ends_with('\n'));
        prop_assert_eq!(contents.matches('\n').count(), 1);
    }
}
