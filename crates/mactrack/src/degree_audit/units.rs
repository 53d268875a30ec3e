//! Unit inference from course numbers and course-key normalization.
//!
//! McMaster encodes a course's unit value in the last two characters of its
//! number: "1P13" is worth 13 units, "2C03" is worth 3.

use regex::Regex;
use std::sync::LazyLock;

/// Units assumed for a course when its number carries no usable suffix.
///
/// Also used as the per-course weight when a group only states how many
/// courses it requires. This is a provisional approximation; GPA weighting
/// depends on the same value, so change it in this one place only.
pub const DEFAULT_UNITS_PER_COURSE: u32 = 3;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes a course code to "SUBJECT NUMBER" (trimmed, single spaces).
pub fn normalize_code(code: &str) -> String {
    WHITESPACE.replace_all(code.trim(), " ").into_owned()
}

/// Builds the lookup key for a subject and course number.
pub fn course_key(subject: &str, course_number: &str) -> String {
    normalize_code(&format!("{subject} {course_number}"))
}

/// Returns the course-number part of a code ("COMPSCI 2C03" -> "2C03").
///
/// A code with no subject prefix is treated as a bare course number.
pub fn course_number_of(code: &str) -> &str {
    let code = code.trim();
    match code.split_once(char::is_whitespace) {
        Some((_, number)) => number.trim(),
        None => code,
    }
}

/// Infers units from the last two characters of a course number.
///
/// Falls back to `default_units` when the number is too short, the suffix
/// isn't two digits, or the suffix is zero. Signed suffixes such as "+1"
/// count as non-digits and also fall back.
pub fn units_from_course_number(course_number: &str, default_units: u32) -> u32 {
    let chars: Vec<char> = course_number.trim().chars().collect();
    if chars.len() < 2 {
        return default_units;
    }

    let suffix = &chars[chars.len() - 2..];
    if !suffix.iter().all(char::is_ascii_digit) {
        return default_units;
    }

    let units = suffix
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + d);

    if units == 0 {
        default_units
    } else {
        units
    }
}

/// Infers units for a full course code using the shared default.
pub fn units_for_code(code: &str) -> u32 {
    units_from_course_number(course_number_of(code), DEFAULT_UNITS_PER_COURSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_from_suffix() {
        assert_eq!(units_from_course_number("2C03", 3), 3);
        assert_eq!(units_from_course_number("1P13", 3), 13);
        assert_eq!(units_from_course_number("4Z13", 3), 13);
        assert_eq!(units_from_course_number("1ZA3", 3), 3);
    }

    #[test]
    fn test_units_fallbacks() {
        assert_eq!(units_from_course_number("4ZZ", 3), 3);
        assert_eq!(units_from_course_number("1A00", 3), 3);
        assert_eq!(units_from_course_number("7", 3), 3);
        assert_eq!(units_from_course_number("", 3), 3);
        assert_eq!(units_from_course_number("1A+1", 3), 3);
    }

    #[test]
    fn test_units_for_code_uses_number_part() {
        assert_eq!(units_for_code("ENGINEER 1P13"), 13);
        assert_eq!(units_for_code("COMPSCI   2C03"), 3);
        assert_eq!(units_for_code("1A06"), 6);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_code("  COMPSCI \t 2C03 "), "COMPSCI 2C03");
        assert_eq!(course_key("COMPSCI ", " 2C03"), "COMPSCI 2C03");
        assert_eq!(course_key("", "2C03"), "2C03");
        assert_eq!(course_number_of("MATH 1ZA3"), "1ZA3");
    }
}
