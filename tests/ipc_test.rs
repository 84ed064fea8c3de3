/*!
 * IPC Tests
 * Messaging, semaphore fairness, and the producer/consumer convention
 */

use os_sim_kernel::{
    AcquireOutcome, IpcError, Policy, ProcessState, ReleaseOutcome, SimError, SimKernel,
};
use pretty_assertions::assert_eq;

fn kernel() -> SimKernel {
    SimKernel::builder()
        .with_cpu_units(16)
        .with_memory_units(1000)
        .with_policy(Policy::Fcfs)
        .build()
        .unwrap()
}

fn state_of(kernel: &SimKernel, pid: u32) -> ProcessState {
    kernel
        .snapshot()
        .processes
        .iter()
        .find(|p| p.pid == pid)
        .unwrap()
        .state
}

#[test]
fn test_messages_arrive_in_send_order() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.send_message(p1, p2, "m1").unwrap();
    kernel.send_message(p1, p2, "m2").unwrap();

    assert_eq!(kernel.receive_message(p2).unwrap().payload, "m1");
    assert_eq!(kernel.receive_message(p2).unwrap().payload, "m2");
}

#[test]
fn test_empty_mailbox_is_reported() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();

    assert_eq!(
        kernel.receive_message(p1).unwrap_err(),
        SimError::Ipc(IpcError::MailboxEmpty(p1))
    );
}

#[test]
fn test_send_to_terminated_recipient_fails() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.send_message(p1, p2, "pending").unwrap();
    kernel.terminate(p2).unwrap();

    // Already-enqueued messages are dropped with the mailbox
    assert_eq!(
        kernel.send_message(p1, p2, "late").unwrap_err(),
        SimError::Ipc(IpcError::RecipientGone(p2))
    );
    assert!(kernel.peek_messages(p2).is_empty());
}

#[test]
fn test_send_to_unknown_pid_fails() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();

    assert_eq!(
        kernel.send_message(p1, 99, "nobody").unwrap_err(),
        SimError::Ipc(IpcError::ProcessNotFound(99))
    );
}

#[test]
fn test_peek_does_not_consume() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.send_message(p1, p2, "m1").unwrap();
    assert_eq!(kernel.peek_messages(p2).len(), 1);
    assert_eq!(kernel.peek_messages(p2).len(), 1);
    assert_eq!(kernel.receive_message(p2).unwrap().payload, "m1");
}

#[test]
fn test_semaphore_fifo_fairness() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 0).unwrap();
    assert_eq!(
        kernel.semaphore_acquire("s", p1).unwrap(),
        AcquireOutcome::Blocked
    );
    assert_eq!(
        kernel.semaphore_acquire("s", p2).unwrap(),
        AcquireOutcome::Blocked
    );
    assert_eq!(state_of(&kernel, p1), ProcessState::Waiting);
    assert_eq!(state_of(&kernel, p2), ProcessState::Waiting);

    // First release wakes p1, not p2
    assert_eq!(
        kernel.semaphore_release("s").unwrap(),
        ReleaseOutcome::Woke(p1)
    );
    assert_eq!(state_of(&kernel, p1), ProcessState::Ready);
    assert_eq!(state_of(&kernel, p2), ProcessState::Waiting);

    assert_eq!(
        kernel.semaphore_release("s").unwrap(),
        ReleaseOutcome::Woke(p2)
    );
    assert_eq!(state_of(&kernel, p2), ProcessState::Ready);
}

#[test]
fn test_no_lost_wakeup() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 0).unwrap();
    assert_eq!(
        kernel.semaphore_release("s").unwrap(),
        ReleaseOutcome::Incremented(1)
    );
    // The increment is observed: value goes 0 -> 1 -> 0 without blocking
    assert_eq!(
        kernel.semaphore_acquire("s", p1).unwrap(),
        AcquireOutcome::Acquired
    );
    assert_eq!(kernel.snapshot().semaphores[0].value, 0);
}

#[test]
fn test_blocked_acquire_frees_the_cpu() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 0).unwrap();
    kernel.advance_cycle();
    assert_eq!(kernel.snapshot().running, Some(p1));

    kernel.semaphore_acquire("s", p1).unwrap();
    assert_eq!(kernel.snapshot().running, None);

    kernel.advance_cycle();
    assert_eq!(kernel.snapshot().running, Some(p2));
}

#[test]
fn test_woken_process_joins_the_back_of_the_queue() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 0).unwrap();
    kernel.semaphore_acquire("s", p1).unwrap();
    kernel.semaphore_release("s").unwrap();

    assert_eq!(kernel.snapshot().ready_queue, vec![p2, p1]);
}

#[test]
fn test_duplicate_semaphore_name() {
    let kernel = kernel();
    kernel.semaphore_create("s", 1).unwrap();
    assert_eq!(
        kernel.semaphore_create("s", 1).unwrap_err(),
        SimError::Ipc(IpcError::DuplicateName("s".to_string()))
    );
}

#[test]
fn test_acquire_from_waiting_process_is_rejected() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 1).unwrap();
    kernel.suspend(p1).unwrap();

    assert!(matches!(
        kernel.semaphore_acquire("s", p1).unwrap_err(),
        SimError::Process(_)
    ));
    // Counter untouched by the rejected acquire
    assert_eq!(kernel.snapshot().semaphores[0].value, 1);
}

#[test]
fn test_terminated_waiter_never_wakes() {
    let kernel = kernel();
    let p1 = kernel.create_process(1, 10, 5).unwrap();
    let p2 = kernel.create_process(1, 10, 5).unwrap();

    kernel.semaphore_create("s", 0).unwrap();
    kernel.semaphore_acquire("s", p1).unwrap();
    kernel.semaphore_acquire("s", p2).unwrap();

    kernel.terminate(p1).unwrap();
    assert_eq!(
        kernel.semaphore_release("s").unwrap(),
        ReleaseOutcome::Woke(p2)
    );
}

#[test]
fn test_producer_consumer_convention() {
    // Bounded buffer of capacity 2 modeled as empty_slots/filled_slots/mutex
    let kernel = kernel();
    let producer = kernel.create_process(1, 10, 20).unwrap();
    let consumer = kernel.create_process(1, 10, 20).unwrap();

    kernel.semaphore_create("empty_slots", 2).unwrap();
    kernel.semaphore_create("filled_slots", 0).unwrap();
    kernel.semaphore_create("mutex", 1).unwrap();

    let produce = |kernel: &SimKernel| -> AcquireOutcome {
        let outcome = kernel.semaphore_acquire("empty_slots", producer).unwrap();
        if outcome == AcquireOutcome::Acquired {
            assert_eq!(
                kernel.semaphore_acquire("mutex", producer).unwrap(),
                AcquireOutcome::Acquired
            );
            kernel.semaphore_release("mutex").unwrap();
            kernel.semaphore_release("filled_slots").unwrap();
        }
        outcome
    };

    // Fill the buffer
    assert_eq!(produce(&kernel), AcquireOutcome::Acquired);
    assert_eq!(produce(&kernel), AcquireOutcome::Acquired);
    // Third produce blocks on empty_slots
    assert_eq!(produce(&kernel), AcquireOutcome::Blocked);
    assert_eq!(state_of(&kernel, producer), ProcessState::Waiting);

    // Consumer drains one item and wakes the producer
    assert_eq!(
        kernel.semaphore_acquire("filled_slots", consumer).unwrap(),
        AcquireOutcome::Acquired
    );
    assert_eq!(
        kernel.semaphore_acquire("mutex", consumer).unwrap(),
        AcquireOutcome::Acquired
    );
    kernel.semaphore_release("mutex").unwrap();
    assert_eq!(
        kernel.semaphore_release("empty_slots").unwrap(),
        ReleaseOutcome::Woke(producer)
    );
    assert_eq!(state_of(&kernel, producer), ProcessState::Ready);
}
