/*!
 * Elapsed Time Property Tests
 */

use nix::sys::time::TimeSpec;
use proptest::prelude::*;
use signal_broadcast::bench::Elapsed;

const NANOS: i64 = 1_000_000_000;

proptest! {
    #[test]
    fn prop_parts_are_normalized(secs in -1_000i64..1_000, nanos in -5 * NANOS..5 * NANOS) {
        let elapsed = Elapsed::from_parts(secs, nanos);
        prop_assert!(elapsed.secs() >= 0);
        prop_assert!((0..NANOS).contains(&elapsed.subsec_nanos()));
    }

    #[test]
    fn prop_total_is_preserved(secs in 0i64..1_000, nanos in 0..5 * NANOS) {
        let elapsed = Elapsed::from_parts(secs, nanos);
        prop_assert_eq!(elapsed.as_nanos(), secs as i128 * NANOS as i128 + nanos as i128);
    }

    #[test]
    fn prop_between_matches_nanosecond_difference(
        start_secs in 0i64..100_000,
        start_nanos in 0..NANOS,
        delta in 0i64..50 * NANOS,
    ) {
        let start_total = start_secs as i128 * NANOS as i128 + start_nanos as i128;
        let end_total = start_total + delta as i128;
        let start = TimeSpec::new(start_secs, start_nanos);
        let end = TimeSpec::new(
            (end_total / NANOS as i128) as i64,
            (end_total % NANOS as i128) as i64,
        );

        let elapsed = Elapsed::between(start, end);
        prop_assert_eq!(elapsed.as_nanos(), delta as i128);
        prop_assert!((0..NANOS).contains(&elapsed.subsec_nanos()));
    }

    #[test]
    fn prop_end_before_start_clamps(start_secs in 1i64..1_000, back in 1i64..NANOS) {
        let start = TimeSpec::new(start_secs, 0);
        let end_total = start_secs * NANOS - back;
        let end = TimeSpec::new(end_total / NANOS, end_total % NANOS);
        prop_assert_eq!(Elapsed::between(start, end), Elapsed::ZERO);
    }
}
