//! Parameterized tests using test-case
//!
//! These tests use test-case to run the same test logic with different inputs.

use chrono::NaiveTime;
use rollcall::core::error::InvalidEmbedding;
use rollcall::core::models::{KeyFormat, SessionWindow};
use rollcall::core::services::subnet::is_loopback;
use rollcall::core::services::{SubnetPolicy, same_subnet, validate, validate_batch, verify};
use test_case::test_case;

// =============================================================================
// Subnet Tests
// =============================================================================

#[test_case("192.168.1.42", "192.168.1.10", 24, true ; "same slash 24")]
#[test_case("192.168.2.42", "192.168.1.10", 24, false ; "different third octet")]
#[test_case("192.168.2.42", "192.168.1.10", 16, true ; "same slash 16")]
#[test_case("192.168.1.42", "192.168.1.42", 32, true ; "identical host slash 32")]
#[test_case("192.168.1.43", "192.168.1.42", 32, false ; "neighbour host slash 32")]
#[test_case("10.0.0.5", "192.168.1.10", 0, true ; "slash 0 matches all v4")]
#[test_case("10.0.0.5", "10.0.0.5", 33, false ; "oversized mask")]
#[test_case("garbage", "192.168.1.10", 24, false ; "malformed requester")]
#[test_case("192.168.1.42", "", 24, false ; "empty classroom")]
#[test_case(" 192.168.1.42 ", "192.168.1.10", 24, true ; "surrounding whitespace")]
#[test_case("::ffff:192.168.1.42", "192.168.1.10", 24, true ; "ipv4 mapped ipv6")]
#[test_case("fe80::1", "192.168.1.10", 24, false ; "mixed families")]
fn test_same_subnet(a: &str, b: &str, mask: u8, expected: bool) {
    assert_eq!(same_subnet(a, b, mask), expected, "{a} vs {b} /{mask}");
}

#[test_case("127.0.0.1", true ; "ipv4 loopback")]
#[test_case("127.8.8.8", true ; "ipv4 loopback block")]
#[test_case("::1", true ; "ipv6 loopback")]
#[test_case("LOCALHOST", true ; "localhost name")]
#[test_case("192.168.1.42", false ; "private address")]
fn test_is_loopback(addr: &str, expected: bool) {
    assert_eq!(is_loopback(addr), expected);
}

#[test_case(false, false ; "strict policy rejects loopback")]
#[test_case(true, true ; "dev policy accepts loopback")]
fn test_loopback_policy(allow_loopback: bool, expected: bool) {
    let policy = SubnetPolicy {
        allow_loopback,
        ..SubnetPolicy::default()
    };
    assert_eq!(policy.co_located("127.0.0.1", "192.168.1.10"), expected);
}

// =============================================================================
// Embedding Validation Tests
// =============================================================================

#[test_case(vec![0.1, 0.2, 0.3, 0.4], Ok(()) ; "valid")]
#[test_case(vec![0.0; 4], Ok(()) ; "zero vector is structurally valid")]
#[test_case(vec![0.1, 0.2, 0.3], Err(InvalidEmbedding::WrongDimension { expected: 4, actual: 3 }) ; "too short")]
#[test_case(vec![], Err(InvalidEmbedding::WrongDimension { expected: 4, actual: 0 }) ; "empty")]
#[test_case(vec![0.1, f32::NAN, 0.3, 0.4], Err(InvalidEmbedding::NonFinite { index: 1 }) ; "nan")]
#[test_case(vec![0.1, 0.2, 0.3, f32::NEG_INFINITY], Err(InvalidEmbedding::NonFinite { index: 3 }) ; "infinite")]
fn test_validate(vector: Vec<f32>, expected: Result<(), InvalidEmbedding>) {
    assert_eq!(validate(&vector, 4), expected);
}

#[test_case(2, Ok(()) ; "exact count")]
#[test_case(1, Err(InvalidEmbedding::WrongCount { expected: 2, actual: 1 }) ; "too few")]
#[test_case(3, Err(InvalidEmbedding::WrongCount { expected: 2, actual: 3 }) ; "too many")]
fn test_validate_batch_count(count: usize, expected: Result<(), InvalidEmbedding>) {
    let batch = vec![vec![1.0, 0.0]; count];
    assert_eq!(validate_batch(&batch, 2, 2), expected);
}

// =============================================================================
// Key Format Tests
// =============================================================================

#[test_case("1RV23CS001", true ; "first key")]
#[test_case("1RV23CS420", true ; "last key")]
#[test_case("1RV23CS199", true ; "middle key")]
#[test_case("1RV23CS421", false ; "past range")]
#[test_case("1RV23CS01", false ; "too short")]
#[test_case("1RV23CS0010", false ; "too long")]
#[test_case("", false ; "empty")]
fn test_default_key_format(key: &str, expected: bool) {
    assert_eq!(KeyFormat::default().check(key).is_ok(), expected);
}

// =============================================================================
// Session Window Tests
// =============================================================================

#[test_case(8, 0, true ; "start is inclusive")]
#[test_case(8, 50, true ; "end is inclusive")]
#[test_case(7, 59, false ; "before start")]
#[test_case(8, 51, false ; "after end")]
fn test_window_contains(h: u32, m: u32, expected: bool) {
    let window = SessionWindow {
        start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        end: NaiveTime::from_hms_opt(8, 50, 0).unwrap(),
    };
    assert_eq!(window.contains(NaiveTime::from_hms_opt(h, m, 0).unwrap()), expected);
}

// =============================================================================
// Match Vote Tests
// =============================================================================

/// Five references against `[1, 0, 0, 0]`: two at or above 0.8, three below
fn five_references() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.9, 0.1, 0.0, 0.0],
        vec![0.5, 0.5, 0.0, 0.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ]
}

#[test_case(0.8, 2, true, 2 ; "two of five meet min matches")]
#[test_case(0.8, 3, false, 2 ; "two of five short of three")]
#[test_case(0.8, 1, true, 2 ; "one required")]
#[test_case(0.7, 3, true, 3 ; "lower threshold admits third")]
#[test_case(1.0, 2, false, 1 ; "exact threshold counts only identical")]
fn test_vote_over_five_references(threshold: f64, min_matches: usize, verified: bool, matches: usize) {
    let report = verify(&[1.0, 0.0, 0.0, 0.0], &five_references(), threshold, min_matches);
    assert_eq!(report.scores.len(), 5);
    assert_eq!(report.match_count, matches);
    assert_eq!(report.verified, verified);
}
