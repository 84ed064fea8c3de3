/*!
 * Scheduler Tests
 * Dispatch order and rotation across the scheduling policies
 */

use os_sim_kernel::{CycleOutcome, EventKind, Pid, Policy, SimKernel};
use pretty_assertions::assert_eq;

fn kernel(policy: Policy) -> SimKernel {
    SimKernel::builder()
        .with_cpu_units(16)
        .with_memory_units(1000)
        .with_policy(policy)
        .build()
        .unwrap()
}

fn dispatch_order(kernel: &SimKernel) -> Vec<Pid> {
    kernel
        .events()
        .iter()
        .filter(|r| r.kind == EventKind::Dispatched)
        .filter_map(|r| r.pid)
        .collect()
}

#[test]
fn test_fcfs_completes_in_creation_order() {
    let kernel = kernel(Policy::Fcfs);
    let p1 = kernel.create_process(3, 10, 3).unwrap();
    let p2 = kernel.create_process(1, 10, 2).unwrap();
    let p3 = kernel.create_process(2, 10, 1).unwrap();

    let completions: Vec<Pid> = kernel
        .run(6)
        .into_iter()
        .filter_map(|o| match o {
            CycleOutcome::Completed { pid } => Some(pid),
            _ => None,
        })
        .collect();

    assert_eq!(completions, vec![p1, p2, p3]);
}

#[test]
fn test_fcfs_never_preempts() {
    let kernel = kernel(Policy::Fcfs);
    kernel.create_process(1, 10, 10).unwrap();
    kernel.create_process(1, 10, 1).unwrap();

    for outcome in kernel.run(9) {
        assert!(!matches!(outcome, CycleOutcome::Preempted { .. }));
    }
}

#[test]
fn test_round_robin_rotation() {
    // quantum=2, three processes with burst=5: each process consumes two
    // cycles per turn except its final one-cycle turn
    let kernel = kernel(Policy::RoundRobin { quantum: 2 });
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();
    let p3 = kernel.create_process(1, 10, 5).unwrap();

    let outcomes = kernel.run(15);

    assert_eq!(
        dispatch_order(&kernel),
        vec![p1, p2, p3, p1, p2, p3, p1, p2, p3]
    );

    // Six full two-cycle turns, then three one-cycle completions
    let preemptions: Vec<Pid> = outcomes
        .iter()
        .filter_map(|o| match o {
            CycleOutcome::Preempted { pid } => Some(*pid),
            _ => None,
        })
        .collect();
    assert_eq!(preemptions, vec![p1, p2, p3, p1, p2, p3]);

    let completions: Vec<Pid> = outcomes
        .iter()
        .filter_map(|o| match o {
            CycleOutcome::Completed { pid } => Some(*pid),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec![p1, p2, p3]);
}

#[test]
fn test_burst_exhaustion_beats_quantum_expiry() {
    // Burst 2 with quantum 2: the last burst cycle coincides with quantum
    // expiry and must terminate, not preempt
    let kernel = kernel(Policy::RoundRobin { quantum: 2 });
    let p1 = kernel.create_process(1, 10, 2).unwrap();

    let outcomes = kernel.run(2);
    assert_eq!(outcomes[1], CycleOutcome::Completed { pid: p1 });
}

#[test]
fn test_preempted_process_goes_behind_waiting_one() {
    let kernel = kernel(Policy::RoundRobin { quantum: 1 });
    let p1 = kernel.create_process(1, 10, 3).unwrap();
    let p2 = kernel.create_process(1, 10, 3).unwrap();

    // p1 is dispatched and preempted in the first cycle; p2 was already
    // waiting, so p1 rotates in behind it
    kernel.advance_cycle();
    assert_eq!(kernel.snapshot().ready_queue, vec![p2, p1]);

    kernel.advance_cycle();
    assert_eq!(kernel.snapshot().ready_queue, vec![p1, p2]);
}

#[test]
fn test_sjf_picks_shortest_job() {
    let kernel = kernel(Policy::Sjf);
    let _p1 = kernel.create_process(1, 10, 9).unwrap();
    let p2 = kernel.create_process(1, 10, 1).unwrap();
    let _p3 = kernel.create_process(1, 10, 4).unwrap();

    kernel.advance_cycle();
    assert_eq!(dispatch_order(&kernel), vec![p2]);
}

#[test]
fn test_priority_policy_picks_smallest_value() {
    let kernel = kernel(Policy::Priority);
    let _p1 = kernel.create_process(4, 10, 3).unwrap();
    let p2 = kernel.create_process(1, 10, 3).unwrap();

    kernel.advance_cycle();
    assert_eq!(dispatch_order(&kernel), vec![p2]);
}

#[test]
fn test_priority_is_informational_under_fcfs() {
    let kernel = kernel(Policy::Fcfs);
    let p1 = kernel.create_process(9, 10, 1).unwrap();
    let _p2 = kernel.create_process(1, 10, 1).unwrap();

    kernel.advance_cycle();
    assert_eq!(dispatch_order(&kernel), vec![p1]);
}

#[test]
fn test_policy_switch_between_cycles() {
    let kernel = kernel(Policy::Fcfs);
    let _p1 = kernel.create_process(1, 10, 2).unwrap();
    let p2 = kernel.create_process(1, 10, 2).unwrap();

    // p1 running: switch refused
    kernel.advance_cycle();
    assert!(kernel.set_policy(Policy::RoundRobin { quantum: 2 }).is_err());

    // p1 completes, CPU free: switch allowed, FIFO order preserved
    kernel.advance_cycle();
    kernel.set_policy(Policy::RoundRobin { quantum: 2 }).unwrap();
    kernel.advance_cycle();

    let snapshot = kernel.snapshot();
    assert_eq!(snapshot.running, Some(p2));
    assert_eq!(snapshot.ready_queue, Vec::<Pid>::new());
}
