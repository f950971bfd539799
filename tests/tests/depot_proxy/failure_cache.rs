use chrono::{Duration, Utc};
use depot_proxy::{FailureCache, UpdatePolicy};
use rstest::*;

const PATH: &str = "com/x/lib/1.0-SNAPSHOT/maven-metadata.xml";

#[rstest]
#[case(UpdatePolicy::Never, &[Duration::zero(), Duration::days(30)], &[true, true])]
#[case(UpdatePolicy::Always, &[Duration::zero()], &[false])]
#[case(UpdatePolicy::hourly(), &[Duration::minutes(59), Duration::minutes(61)], &[true, false])]
fn cached_failures_expire_with_their_policy(
    #[case] policy: UpdatePolicy,
    #[case] checks: &[Duration],
    #[case] expected: &[bool],
) {
    let cache = FailureCache::new();
    let t0 = Utc::now();
    cache.record_failure_at(PATH, policy, t0);

    let observed: Vec<bool> = checks
        .iter()
        .map(|elapsed| cache.is_cached_failure_at(PATH, t0 + *elapsed))
        .collect();
    assert_eq!(observed, expected);
}

#[rstest]
#[timeout(std::time::Duration::from_secs(5))]
fn concurrent_recording_keeps_one_entry() {
    let cache = FailureCache::new();
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| cache.record_failure(PATH, UpdatePolicy::daily()));
        }
    });
    assert_eq!(cache.len(), 1);
    assert!(cache.is_cached_failure(PATH));
}
