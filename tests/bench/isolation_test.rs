/*!
 * Process Isolation Tests
 * Shared result region across fork and child exit status handling
 */

use signal_broadcast::bench::{fork_run, reap, Elapsed, Forked, ResultRegion};
use signal_broadcast::BenchError;

#[test]
fn test_child_write_visible_to_parent() {
    let region = ResultRegion::new(1).unwrap();
    let elapsed = Elapsed::from_parts(3, 141_592_653);

    match fork_run().unwrap() {
        Forked::Child => {
            region.record(0, elapsed);
            std::process::exit(0);
        }
        Forked::Parent(child) => reap(child, 1).unwrap(),
    }

    assert_eq!(region.read(0), Some(elapsed));
}

#[test]
fn test_failed_child_is_reported() {
    let region = ResultRegion::new(1).unwrap();

    match fork_run().unwrap() {
        Forked::Child => std::process::exit(3),
        Forked::Parent(child) => match reap(child, 7) {
            Err(BenchError::ChildFailed { iteration, status }) => {
                assert_eq!(iteration, 7);
                assert_eq!(status, "exit code 3");
            }
            other => panic!("unexpected result: {other:?}"),
        },
    }

    assert_eq!(region.read(0), None);
}

#[test]
fn test_aborted_child_is_reported() {
    match fork_run().unwrap() {
        Forked::Child => std::process::abort(),
        Forked::Parent(child) => {
            let result = reap(child, 1);
            assert!(
                matches!(&result, Err(BenchError::ChildFailed { status, .. }) if status.contains("SIGABRT")),
                "{result:?}"
            );
        }
    }
}
