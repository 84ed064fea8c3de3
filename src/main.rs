/*!
 * OS Simulator - Console Front-End
 *
 * Line-oriented console over the simulation kernel:
 * - Process creation and lifecycle control
 * - Scheduling policy selection and cycle stepping
 * - Messaging and semaphore operations
 * - Producer/consumer demo over three semaphores
 */

use std::io::{self, BufRead, Write};

use os_sim_kernel::{CycleOutcome, Policy, SimKernel};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    info!("OS simulator starting");

    let kernel = SimKernel::with_defaults();
    let stdin = io::stdin();

    println!("OS simulator. Type 'help' for commands.");
    loop {
        print!("sim> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("read error: {}", e);
                break;
            }
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = args.first() else {
            continue;
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => {
                if let Err(e) = dispatch(&kernel, command, &args[1..]) {
                    println!("error: {}", e);
                }
            }
        }
    }
}

fn dispatch(kernel: &SimKernel, command: &str, args: &[&str]) -> Result<(), String> {
    match command {
        "create" => {
            let (priority, memory, burst) = (parse(args, 0)?, parse(args, 1)?, parse(args, 2)?);
            let pid = kernel
                .create_process(priority as u8, memory, burst)
                .map_err(|e| e.to_string())?;
            println!("created process {}", pid);
        }
        "ps" => print_processes(kernel),
        "resources" => {
            let r = kernel.snapshot().resources;
            println!(
                "cpu {}/{}  memory {}/{}",
                r.cpu_allocated, r.cpu_total, r.memory_allocated, r.memory_total
            );
        }
        "policy" => {
            let policy = match args.first().copied() {
                Some("fcfs") => Policy::Fcfs,
                Some("rr") => Policy::RoundRobin {
                    quantum: parse(args, 1)?,
                },
                Some("sjf") => Policy::Sjf,
                Some("priority") => Policy::Priority,
                _ => return Err("usage: policy fcfs|rr <quantum>|sjf|priority".into()),
            };
            kernel.set_policy(policy).map_err(|e| e.to_string())?;
            println!("policy set to {:?}", policy);
        }
        "step" => {
            let cycles = if args.is_empty() { 1 } else { parse(args, 0)? as u64 };
            for outcome in kernel.run(cycles) {
                print_outcome(outcome);
            }
        }
        "suspend" => {
            kernel.suspend(parse(args, 0)?).map_err(|e| e.to_string())?;
            println!("suspended");
        }
        "resume" => {
            kernel.resume(parse(args, 0)?).map_err(|e| e.to_string())?;
            println!("resumed");
        }
        "kill" => {
            kernel.terminate(parse(args, 0)?).map_err(|e| e.to_string())?;
            println!("terminated");
        }
        "send" => {
            let (from, to) = (parse(args, 0)?, parse(args, 1)?);
            let payload = args.get(2..).unwrap_or_default().join(" ");
            kernel
                .send_message(from, to, &payload)
                .map_err(|e| e.to_string())?;
            println!("sent");
        }
        "recv" => {
            let message = kernel
                .receive_message(parse(args, 0)?)
                .map_err(|e| e.to_string())?;
            println!(
                "[cycle {}] from {}: {}",
                message.sent_at, message.from, message.payload
            );
        }
        "mail" => {
            let pid = parse(args, 0)?;
            let pending = kernel.peek_messages(pid);
            if pending.is_empty() {
                println!("mailbox of {} is empty", pid);
            }
            for message in pending {
                println!(
                    "[cycle {}] from {}: {}",
                    message.sent_at, message.from, message.payload
                );
            }
        }
        "sem-create" => {
            let name = args.first().ok_or("usage: sem-create <name> <initial>")?;
            kernel
                .semaphore_create(name, parse(args, 1)?)
                .map_err(|e| e.to_string())?;
            println!("semaphore '{}' created", name);
        }
        "sem-acquire" => {
            let name = args.first().ok_or("usage: sem-acquire <name> <pid>")?;
            let outcome = kernel
                .semaphore_acquire(name, parse(args, 1)?)
                .map_err(|e| e.to_string())?;
            println!("{:?}", outcome);
        }
        "sem-release" => {
            let name = args.first().ok_or("usage: sem-release <name>")?;
            let outcome = kernel
                .semaphore_release(name)
                .map_err(|e| e.to_string())?;
            println!("{:?}", outcome);
        }
        "sems" => {
            for sem in kernel.snapshot().semaphores {
                println!(
                    "{:<16} value={:<4} waiters={:?}",
                    sem.name, sem.value, sem.waiters
                );
            }
        }
        "demo-pc" => {
            // Bounded buffer as three semaphores: empty_slots, filled_slots,
            // mutex. Producers acquire empty_slots then mutex; consumers
            // mirror with filled_slots.
            let capacity = if args.is_empty() { 5 } else { parse(args, 0)? };
            kernel
                .semaphore_create("empty_slots", capacity)
                .and_then(|_| kernel.semaphore_create("filled_slots", 0))
                .and_then(|_| kernel.semaphore_create("mutex", 1))
                .map_err(|e| e.to_string())?;
            println!(
                "producer/consumer semaphores ready (buffer capacity {})",
                capacity
            );
        }
        "log" => {
            for record in kernel.events() {
                match record.pid {
                    Some(pid) => println!(
                        "[cycle {}] {:?} pid={} {}",
                        record.cycle, record.kind, pid, record.detail
                    ),
                    None => println!("[cycle {}] {:?} {}", record.cycle, record.kind, record.detail),
                }
            }
        }
        "snapshot" => {
            let json = serde_json::to_string_pretty(&kernel.snapshot())
                .map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        _ => return Err(format!("unknown command '{}'; try 'help'", command)),
    }
    Ok(())
}

fn parse(args: &[&str], index: usize) -> Result<u32, String> {
    args.get(index)
        .ok_or_else(|| "missing argument".to_string())?
        .parse()
        .map_err(|e| format!("invalid number: {}", e))
}

fn print_outcome(outcome: CycleOutcome) {
    match outcome {
        CycleOutcome::Idle => println!("idle"),
        CycleOutcome::Ran {
            pid,
            burst_remaining,
        } => println!("process {} ran ({} burst cycles left)", pid, burst_remaining),
        CycleOutcome::Completed { pid } => println!("process {} completed", pid),
        CycleOutcome::Preempted { pid } => println!("process {} preempted", pid),
    }
}

fn print_processes(kernel: &SimKernel) {
    let snapshot = kernel.snapshot();
    println!(
        "cycle {}  policy {:?}  running {:?}  ready {:?}",
        snapshot.cycle, snapshot.policy, snapshot.running, snapshot.ready_queue
    );
    println!(
        "{:<6} {:<12} {:<9} {:<8} {:<7}",
        "PID", "STATE", "PRIORITY", "MEMORY", "BURST"
    );
    for p in snapshot.processes {
        println!(
            "{:<6} {:<12} {:<9} {:<8} {:<7}",
            p.pid,
            format!("{:?}", p.state),
            p.priority,
            p.memory_held,
            p.cpu_burst_remaining
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  create <priority> <memory> <burst>   create a process");
    println!("  ps                                   process table");
    println!("  resources                            pool counters");
    println!("  policy fcfs|rr <q>|sjf|priority      set scheduling policy");
    println!("  step [n]                             advance n cycles (default 1)");
    println!("  suspend|resume|kill <pid>            lifecycle control");
    println!("  send <from> <to> <text>              send a message");
    println!("  recv <pid>                           receive oldest message");
    println!("  mail <pid>                           peek pending messages");
    println!("  sem-create <name> <initial>          create a semaphore");
    println!("  sem-acquire <name> <pid>             P operation");
    println!("  sem-release <name>                   V operation");
    println!("  sems                                 list semaphores");
    println!("  demo-pc [capacity]                   producer/consumer semaphores");
    println!("  log                                  event log");
    println!("  snapshot                             full state as JSON");
    println!("  quit");
}
