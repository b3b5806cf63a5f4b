use std::env;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use log::{Level, Log, Metadata, Record};
use sha256_lab::{find, hash, hash_hex, Error, SearchOutcome};

/// Built-in FIPS 180-4 / NIST CAVP vectors run by the `tests` command.
static TEST_VECTORS: [(&str, &str); 4] = [
    (
        "",
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    ),
    (
        "abc",
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    ),
    (
        "abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq",
        "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
    ),
    (
        "abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu",
        "cf5b16a778af8380036ce59e7b0492370b249b11e8f07a51afac45037afee9d1",
    ),
];

const DEFAULT_FIND_MAX_LEN: usize = 4;

/// Writes log records to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    let level = env::var("SHA256_LOG")
        .ok()
        .and_then(|v| v.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

fn default_find_max_len() -> usize {
    env::var("SHA256_FIND_MAX_LEN")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_FIND_MAX_LEN)
}

fn print_help() {
    println!();
    println!("hash [message]            : SHA-256 of the given message string");
    println!("hashx [hex]               : SHA-256 of the bytes spelled by the given hex");
    println!("find [digest] [max_len] [secs] : brute-force a printable preimage, bounded by length and time");
    println!("tests                     : run the built-in test vectors");
    println!("exit                      : exit the shell");
    println!();
}

fn print_elapsed(started: Instant) {
    println!("--- {:.6} seconds ---", started.elapsed().as_secs_f64());
}

fn run_tests() {
    let mut passed = 0;
    for (message, expected) in TEST_VECTORS.iter() {
        let actual = hash(*message);
        if actual == *expected {
            passed += 1;
        } else {
            println!("FAIL {message:?}: expected {expected}, got {actual}");
        }
    }
    println!("{passed}/{} test vectors passed", TEST_VECTORS.len());
}

/// Splits `find` arguments into target digest, maximum length and optional deadline.
fn parse_find_args(args: &str) -> sha256_lab::Result<(&str, usize, Option<Duration>)> {
    let mut parts = args.split_whitespace();
    let target = parts.next().unwrap_or_default();
    let max_length = match parts.next() {
        Some(v) => v
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("max_len {v:?}: {e}")))?,
        None => default_find_max_len(),
    };
    let deadline = match parts.next() {
        Some(v) => Some(Duration::from_secs(
            v.parse()
                .map_err(|e| Error::InvalidConfig(format!("secs {v:?}: {e}")))?,
        )),
        None => None,
    };
    if let Some(extra) = parts.next() {
        return Err(Error::InvalidConfig(format!("unexpected argument {extra:?}")));
    }
    Ok((target, max_length, deadline))
}

fn run_find(args: &str) -> sha256_lab::Result<()> {
    let (target, max_length, deadline) = parse_find_args(args)?;

    let started = Instant::now();
    match find(target, max_length, deadline)? {
        SearchOutcome::Found(message) => println!("\nOriginal input message : {message:?}\n"),
        SearchOutcome::NotFound => {
            println!("\nNo preimage of up to {max_length} characters\n")
        }
        SearchOutcome::DeadlineExceeded { resume_at } => println!(
            "\nDeadline exceeded, resume at length {} index {}\n",
            resume_at.length, resume_at.index
        ),
        SearchOutcome::Cancelled { resume_at } => println!(
            "\nCancelled, resume at length {} index {}\n",
            resume_at.length, resume_at.index
        ),
    }
    print_elapsed(started);
    Ok(())
}

/// Runs one command line; returns `false` when the shell should exit.
fn dispatch(line: &str) -> sha256_lab::Result<bool> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" => print_help(),
        "exit" | "quit" => return Ok(false),
        "tests" => {
            let started = Instant::now();
            run_tests();
            print_elapsed(started);
        }
        "hash" => {
            let started = Instant::now();
            println!("\nHash : {}\n", hash(rest));
            print_elapsed(started);
        }
        "hashx" => {
            let started = Instant::now();
            println!("\nHash : {}\n", hash_hex(rest)?);
            print_elapsed(started);
        }
        "find" => run_find(rest)?,
        other => println!("Unknown command {other:?} (type \"help\" for commands)"),
    }
    Ok(true)
}

fn main() -> io::Result<()> {
    init_logging();

    println!("SHA-256 Hash Computation Shell (Type \"help\" for commands)\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">>> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match dispatch(line.trim_end_matches(['\r', '\n'])) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error : {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_parse_find_args() {
        let args = format!("{ABC} 3 10");
        let (target, max_length, deadline) = parse_find_args(&args).unwrap();
        assert_eq!(target, ABC);
        assert_eq!(max_length, 3);
        assert_eq!(deadline, Some(Duration::from_secs(10)));

        let (_, _, deadline) = parse_find_args(&format!("{ABC} 2")).unwrap();
        assert_eq!(deadline, None);
    }

    #[test]
    fn test_parse_find_args_rejects_malformed_numbers() {
        assert!(matches!(
            parse_find_args(&format!("{ABC} 3x")),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_find_args(&format!("{ABC} 3 soon")),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_find_args(&format!("{ABC} 3 10 extra")),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_logger_follows_max_level() {
        log::set_max_level(log::LevelFilter::Info);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(LOGGER.enabled(&info));
        assert!(!LOGGER.enabled(&debug));
    }

    #[test]
    fn test_test_vectors_pass() {
        for (message, expected) in TEST_VECTORS.iter() {
            assert_eq!(hash(*message), *expected);
        }
    }
}
