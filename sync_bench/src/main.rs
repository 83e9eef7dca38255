use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, warn};
use serde_derive::{Deserialize, Serialize};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

use kboard::{ClipError, Kboard, KboardConfig, SyncSolution};

#[derive(clap::Parser)]
#[clap(about = "Drives concurrent copy/paste/peek traffic against one kboard")]
struct Opts {
    #[clap(short = 'c', long = "config", default_value = "kboard-bench.toml")]
    config: String,
    /// Writer threads; half copy, the rest paste.
    #[clap(short = 'w', long = "writers", default_value = "2")]
    writers: usize,
    #[clap(short = 'r', long = "readers", default_value = "2")]
    readers: usize,
    /// Seconds to run.
    #[clap(short = 'd', long = "duration", default_value = "5")]
    duration: u64,
    /// Overrides the config: 1/reader-preference, 2/writer-preference, 3/ticket.
    #[clap(short = 's', long = "solution")]
    solution: Option<SyncSolution>,
    /// One copier counting up, one paster checking the sequence.
    #[clap(long)]
    validate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct BenchConfig {
    kboard: KboardConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            kboard: KboardConfig::builder().perform_delay_ms(3).build(),
        }
    }
}

#[derive(Default)]
struct Tally {
    copied: AtomicU64,
    full: AtomicU64,
    pasted: AtomicU64,
    empty: AtomicU64,
    peeked: AtomicU64,
    faults: AtomicU64,
}

fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let opts: Opts = Opts::parse();
    let mut cfg: BenchConfig = confy::load_path(&opts.config)?;
    if let Some(solution) = opts.solution {
        cfg.kboard.sync_solution = solution;
    }
    info!("{:?}", &cfg.kboard);

    let board = Kboard::new(&cfg.kboard);
    let stop_flag = Arc::new(AtomicBool::new(false));
    watch_signals(Arc::clone(&stop_flag))?;

    let tally = Arc::new(Tally::default());
    let start = Instant::now();
    let handles = if opts.validate {
        spawn_validation(&board, &opts, &stop_flag, &tally)
    } else {
        spawn_load(&board, &opts, &stop_flag, &tally)
    };

    let deadline = Duration::from_secs(opts.duration);
    while !stop_flag.load(Ordering::Relaxed) && start.elapsed() < deadline {
        thread::sleep(Duration::from_millis(100));
    }
    stop_flag.store(true, Ordering::SeqCst);
    for handle in handles {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }

    report(&board, &tally, start.elapsed());

    let faults = tally.faults.load(Ordering::Relaxed);
    if faults > 0 {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::Other,
            format!("{} validation fault(s)", faults),
        )));
    }
    Ok(())
}

fn watch_signals(stop_flag: Arc<AtomicBool>) -> Result<(), Box<dyn Error>> {
    let mut signals = Signals::new(&[SIGHUP, SIGINT, SIGQUIT, SIGTERM])?;
    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            warn!("Received signal {}, stopping.", signal);
            stop_flag.store(true, Ordering::SeqCst);
        }
    });
    Ok(())
}

fn spawn_readers(
    board: &Kboard,
    readers: usize,
    stop_flag: &Arc<AtomicBool>,
    tally: &Arc<Tally>,
) -> Vec<thread::JoinHandle<()>> {
    (0..readers)
        .map(|_| {
            let reader = board.reader();
            let stop_flag = Arc::clone(stop_flag);
            let tally = Arc::clone(tally);
            thread::spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    reader.peek_random();
                    tally.peeked.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect()
}

fn spawn_load(
    board: &Kboard,
    opts: &Opts,
    stop_flag: &Arc<AtomicBool>,
    tally: &Arc<Tally>,
) -> Vec<thread::JoinHandle<()>> {
    let copiers = opts.writers / 2;
    let pasters = opts.writers - copiers;
    info!(
        "copiers: {}, pasters: {}, readers: {}, duration: {}s",
        copiers, pasters, opts.readers, opts.duration
    );

    let mut handles = Vec::with_capacity(opts.writers + opts.readers);
    for _ in 0..copiers {
        let writer = board.writer();
        let stop_flag = Arc::clone(stop_flag);
        let tally = Arc::clone(tally);
        handles.push(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match writer.enqueue(777) {
                    Ok(()) => tally.copied.fetch_add(1, Ordering::Relaxed),
                    Err(_) => tally.full.fetch_add(1, Ordering::Relaxed),
                };
            }
        }));
    }
    for _ in 0..pasters {
        let writer = board.writer();
        let stop_flag = Arc::clone(stop_flag);
        let tally = Arc::clone(tally);
        handles.push(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match writer.dequeue() {
                    Ok(_) => tally.pasted.fetch_add(1, Ordering::Relaxed),
                    Err(_) => tally.empty.fetch_add(1, Ordering::Relaxed),
                };
            }
        }));
    }
    handles.extend(spawn_readers(board, opts.readers, stop_flag, tally));
    handles
}

fn spawn_validation(
    board: &Kboard,
    opts: &Opts,
    stop_flag: &Arc<AtomicBool>,
    tally: &Arc<Tally>,
) -> Vec<thread::JoinHandle<()>> {
    if opts.writers != 2 {
        warn!("--validate always runs one copier and one paster, ignoring --writers {}", opts.writers);
    }
    info!("validation run, readers: {}, duration: {}s", opts.readers, opts.duration);

    let mut handles = Vec::with_capacity(2 + opts.readers);
    handles.push(thread::spawn({
        let writer = board.writer();
        let stop_flag = Arc::clone(stop_flag);
        let tally = Arc::clone(tally);
        move || {
            let mut value: i32 = 0;
            while !stop_flag.load(Ordering::Relaxed) {
                match writer.enqueue(value) {
                    Ok(()) => {
                        tally.copied.fetch_add(1, Ordering::Relaxed);
                        value = value.checked_add(1).unwrap_or(0);
                    }
                    Err(_) => {
                        tally.full.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    }));
    handles.push(thread::spawn({
        let writer = board.writer();
        let stop_flag = Arc::clone(stop_flag);
        let tally = Arc::clone(tally);
        move || {
            let mut expect_value: i32 = 0;
            while !stop_flag.load(Ordering::Relaxed) {
                match writer.dequeue() {
                    Ok(value) if value == expect_value => {
                        tally.pasted.fetch_add(1, Ordering::Relaxed);
                        expect_value = expect_value.checked_add(1).unwrap_or(0);
                    }
                    Ok(value) => {
                        error!("Validation fault, clipBoard: '{}', expect: '{}'", value, expect_value);
                        tally.faults.fetch_add(1, Ordering::Relaxed);
                        stop_flag.store(true, Ordering::SeqCst);
                    }
                    Err(ClipError::Empty) => {
                        tally.empty.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => error!("unexpected paste error: {}", e),
                }
            }
        }
    }));
    handles.extend(spawn_readers(board, opts.readers, stop_flag, tally));
    handles
}

fn report(board: &Kboard, tally: &Tally, elapsed: Duration) {
    let copied = tally.copied.load(Ordering::Relaxed);
    let full = tally.full.load(Ordering::Relaxed);
    let pasted = tally.pasted.load(Ordering::Relaxed);
    let empty = tally.empty.load(Ordering::Relaxed);
    let peeked = tally.peeked.load(Ordering::Relaxed);
    let total = copied + full + pasted + empty + peeked;
    let ops = (total as f64) / elapsed.as_secs_f64().max(f64::EPSILON);

    println!(
        "copy: {} ok / {} full, paste: {} ok / {} empty, peek: {}",
        copied, full, pasted, empty, peeked
    );
    println!("{:#?} ops/s. Total time: {:#?}", ops as u64, elapsed);
    print!("{}", board.dump());
}
