use super::*;

#[test]
fn first_delay_is_min_backoff() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.next_delay(0), policy.min_backoff);
}

#[test]
fn delay_doubles_then_clamps_at_max_backoff() {
    let policy = RetryPolicy {
        min_backoff: Duration::from_millis(250),
        max_backoff: Duration::from_secs(1),
        multiplier: 2,
        max_attempts: 4,
    };

    assert_eq!(policy.next_delay(1), Duration::from_millis(500));
    assert_eq!(policy.next_delay(2), Duration::from_secs(1));
    assert_eq!(policy.next_delay(6), Duration::from_secs(1));
}

#[test]
fn huge_attempt_counts_do_not_overflow() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.next_delay(u32::MAX), policy.max_backoff);
}
