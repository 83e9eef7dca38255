use std::{
    collections::HashMap,
    error::Error,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crate::{ClipError, Kboard, SyncSolution, RING_BUFFER_INIT_VALUE};

const ENQUEUERS: u64 = 4;
const DEQUEUERS: usize = 3;
const READERS: usize = 3;
const CLIPS_PER_ENQUEUER: i32 = 500;

// Keeps reader-preference writers from starving for the length of the run.
const READER_PAUSE: Duration = Duration::from_micros(50);

// Clip values carry their producer: producer * ID_STRIDE + sequence.
const ID_STRIDE: i32 = 1_000_000;

struct DequeuerResult {
    pasted: Vec<i32>,
    attempts: u64,
}

fn run_mixed_load(solution: SyncSolution) -> Result<(), Box<dyn Error>> {
    let board = Kboard::with_solution(solution);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let writer_attempts = Arc::new(AtomicU64::new(0));
    let bad_peeks = Arc::new(AtomicU64::new(0));

    let enqueuers: Vec<_> = (0..ENQUEUERS)
        .map(|producer| {
            let writer = board.writer();
            let writer_attempts = Arc::clone(&writer_attempts);
            thread::spawn(move || {
                let mut copied = Vec::with_capacity(CLIPS_PER_ENQUEUER as usize);
                let mut seq = 0;
                while seq < CLIPS_PER_ENQUEUER {
                    let item = producer as i32 * ID_STRIDE + seq;
                    writer_attempts.fetch_add(1, Ordering::Relaxed);
                    match writer.enqueue(item) {
                        Ok(()) => {
                            copied.push(item);
                            seq += 1;
                        }
                        Err(ClipError::Full) => thread::yield_now(),
                        Err(e) => panic!("unexpected enqueue error: {:?}", e),
                    }
                }
                copied
            })
        })
        .collect();

    let dequeuers: Vec<_> = (0..DEQUEUERS)
        .map(|_| {
            let writer = board.writer();
            let stop_flag = Arc::clone(&stop_flag);
            thread::spawn(move || {
                let mut result = DequeuerResult { pasted: Vec::new(), attempts: 0 };
                while !stop_flag.load(Ordering::Relaxed) {
                    result.attempts += 1;
                    match writer.dequeue() {
                        Ok(item) => result.pasted.push(item),
                        Err(ClipError::Empty) => thread::yield_now(),
                        Err(e) => panic!("unexpected dequeue error: {:?}", e),
                    }
                }
                result
            })
        })
        .collect();

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let reader = board.reader();
            let stop_flag = Arc::clone(&stop_flag);
            let bad_peeks = Arc::clone(&bad_peeks);
            thread::spawn(move || {
                let mut peeks = 0_u64;
                while !stop_flag.load(Ordering::Relaxed) {
                    let peek = reader.peek_random();
                    let sequence_ok = peek.value % ID_STRIDE < CLIPS_PER_ENQUEUER
                        && (peek.value / ID_STRIDE) < ENQUEUERS as i32;
                    if peek.value != RING_BUFFER_INIT_VALUE && (peek.value < 0 || !sequence_ok) {
                        bad_peeks.fetch_add(1, Ordering::Relaxed);
                    }
                    peeks += 1;
                    thread::sleep(READER_PAUSE);
                }
                peeks
            })
        })
        .collect();

    let mut copied = Vec::new();
    for handle in enqueuers {
        copied.extend(handle.join().expect("enqueuer panicked"));
    }
    stop_flag.store(true, Ordering::Relaxed);

    let mut pasted = Vec::new();
    let mut dequeue_attempts = 0;
    for handle in dequeuers {
        let result = handle.join().expect("dequeuer panicked");
        // Each producer's clips must come out in the order they went in.
        let mut last_seen: HashMap<i32, i32> = HashMap::new();
        for item in &result.pasted {
            let producer = item / ID_STRIDE;
            if let Some(prev) = last_seen.insert(producer, *item) {
                assert!(prev < *item, "{:?}: {} pasted after {}", solution, item, prev);
            }
        }
        dequeue_attempts += result.attempts;
        pasted.extend(result.pasted);
    }
    let mut peeks = 0;
    for handle in readers {
        peeks += handle.join().expect("reader panicked");
    }

    let leftover = board.dump();
    assert!(leftover.ring.is_consistent(), "{:?}: corrupted ring {:?}", solution, leftover.ring);
    while let Ok(item) = board.dequeue() {
        pasted.push(item);
    }
    let drained = board.dump().writer_ops - leftover.writer_ops;

    copied.sort_unstable();
    pasted.sort_unstable();
    assert_eq!(copied.len(), (ENQUEUERS as i32 * CLIPS_PER_ENQUEUER) as usize);
    assert_eq!(pasted, copied, "{:?}: clips lost or duplicated", solution);

    assert_eq!(
        leftover.writer_ops,
        writer_attempts.load(Ordering::Relaxed) + dequeue_attempts,
        "{:?}: writer op count",
        solution
    );
    assert_eq!(drained, leftover.ring.count as u64 + 1);
    assert_eq!(leftover.reader_ops, peeks);
    assert_eq!(bad_peeks.load(Ordering::Relaxed), 0);
    Ok(())
}

#[test]
fn reader_preference_survives_mixed_load() -> Result<(), Box<dyn Error>> {
    run_mixed_load(SyncSolution::ReaderPreference)
}

#[test]
fn writer_preference_survives_mixed_load() -> Result<(), Box<dyn Error>> {
    run_mixed_load(SyncSolution::WriterPreference)
}

#[test]
fn ticket_survives_mixed_load() -> Result<(), Box<dyn Error>> {
    run_mixed_load(SyncSolution::Ticket)
}

// One copier counting up, one paster checking it gets every number in order.
fn run_sequence_validation(solution: SyncSolution) {
    const CLIPS: i32 = 2_000;

    let board = Kboard::with_solution(solution);
    let stop_flag = Arc::new(AtomicBool::new(false));

    let copier = thread::spawn({
        let writer = board.writer();
        move || {
            let mut value = 0;
            while value < CLIPS {
                if writer.enqueue(value).is_ok() {
                    value += 1;
                }
            }
        }
    });
    let paster = thread::spawn({
        let writer = board.writer();
        move || -> Result<(), String> {
            let mut expect_value = 0;
            while expect_value < CLIPS {
                match writer.dequeue() {
                    Ok(value) if value == expect_value => expect_value += 1,
                    Ok(value) => {
                        return Err(format!(
                            "Validation fault, clipBoard: '{}', expect: '{}'",
                            value, expect_value
                        ))
                    }
                    Err(_) => continue,
                }
            }
            Ok(())
        }
    });
    let readers: Vec<_> = (0..2)
        .map(|_| {
            let reader = board.reader();
            let stop_flag = Arc::clone(&stop_flag);
            thread::spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    reader.peek_random();
                    thread::sleep(READER_PAUSE);
                }
            })
        })
        .collect();

    copier.join().expect("copier panicked");
    let validation = paster.join().expect("paster panicked");
    stop_flag.store(true, Ordering::Relaxed);
    for handle in readers {
        handle.join().expect("reader panicked");
    }

    assert_eq!(validation, Ok(()), "{:?}", solution);
    assert_eq!(board.count(), 0);
}

#[test]
fn sequence_validation_all_solutions() {
    for solution in SyncSolution::ALL.iter() {
        run_sequence_validation(*solution);
    }
}
