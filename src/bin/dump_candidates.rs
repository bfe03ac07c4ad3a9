//! Build a candidate pool from an extracted capture folder and write it as JSON.
//!
//! The folder holds one `NN_c.txt` (raw request) and `NN_s.txt` (raw response)
//! per session, as in the `raw/` directory of a capture archive.
//!
//! Usage: `dump_candidates <raw_dir> [-o out.json] [--longest]`
//!
//! Without `-o` the pool is printed to stdout. `RUST_LOG` controls logging
//! (default `info`), which goes to stderr.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use menu_label::{Options, PoolBuilder, Session};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    input_dir: PathBuf,
    output: Option<PathBuf>,
    longest: bool,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut input_dir = None;
    let mut output = None;
    let mut longest = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--out" => {
                let path = args.next().ok_or("missing value for -o")?;
                output = Some(PathBuf::from(path));
            }
            "--longest" => longest = true,
            _ if input_dir.is_none() => input_dir = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let input_dir = input_dir.ok_or("usage: dump_candidates <raw_dir> [-o out.json] [--longest]")?;
    Ok(Args {
        input_dir,
        output,
        longest,
    })
}

/// Session number of a `NN_s.txt` file name.
fn session_number(file_name: &str) -> Option<u64> {
    file_name.strip_suffix("_s.txt")?.parse().ok()
}

/// `(request, response)` file pairs in numeric session order. Responses
/// without a request file are skipped.
fn session_files(dir: &Path) -> io::Result<Vec<(PathBuf, PathBuf)>> {
    let mut numbered = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(number) = session_number(name) else {
            continue;
        };
        let prefix = name.trim_end_matches("_s.txt");
        let request_path = dir.join(format!("{prefix}_c.txt"));
        if !request_path.is_file() {
            warn!(response = %path.display(), "no matching request file");
            continue;
        }
        numbered.push((number, request_path, path));
    }
    numbered.sort_by_key(|(number, _, _)| *number);
    Ok(numbered.into_iter().map(|(_, request, response)| (request, response)).collect())
}

/// Read one session, or `None` (with a warning) when a file is unreadable.
fn read_session(request: &Path, response: &Path) -> Option<Session> {
    match (fs::read(request), fs::read(response)) {
        (Ok(request), Ok(response)) => Some(Session::new(request, response)),
        (Err(err), _) | (_, Err(err)) => {
            warn!(response = %response.display(), error = %err, "unreadable session");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()?;

    let args = parse_args()?;
    if !args.input_dir.is_dir() {
        return Err(format!("Input dir does not exist: {}", args.input_dir.display()).into());
    }

    let files = session_files(&args.input_dir)?;
    info!(sessions = files.len(), dir = %args.input_dir.display(), "found capture");

    let options = Options::default();
    let mut progress = |done: usize, total: usize| info!("processed {done}/{total}");
    let sessions = files
        .iter()
        .filter_map(|(request, response)| read_session(request, response));
    let (mut pool, report) = PoolBuilder::new(&options)
        .with_total(files.len())
        .build(sessions, Some(&mut progress));
    if args.longest {
        pool = pool.prefer_longest_labels();
    }

    info!(
        indexed = report.indexed(),
        skipped = report.skipped(),
        failed = report.failed(),
        candidates = pool.len(),
        "done"
    );

    let json = pool.to_json()?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("Wrote: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
