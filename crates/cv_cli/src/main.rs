//! cv — offline CLI wiring: typed error mapping, stable exit codes, and the
//! three subcommands (report / seed / clear). All I/O lives here; the engine
//! crates stay pure.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// A seed/clear run that completed with `success = false`.
    pub const REFUSED: i32 = 1;
    /// Params/snapshot shape or domain failures.
    pub const VALIDATION: i32 = 2;
    /// Filesystem / path errors.
    pub const IO: i32 = 4;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde::Serialize;

use args::{Args, Command};
use cv_core::entities::Snapshot;
use cv_core::variables::Params;
use cv_pipeline::{assemble, DashboardMetrics};
use cv_store::memory::InMemoryStore;
use cv_store::seed::{clear, seed_all};
use cv_store::snapshot::{load_snapshot, save_snapshot};
use cv_store::StoreError;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Refused(String),
}

impl From<StoreError> for MainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Path(m) => MainError::Io(m),
            StoreError::Json { pointer, msg } => MainError::Validation(format!("{pointer}: {msg}")),
            StoreError::Batch(m) | StoreError::Invalid(m) => MainError::Validation(m),
        }
    }
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Refused(_) => exitcodes::REFUSED,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            match &e {
                MainError::Validation(m) => eprintln!("cv: validation error: {m}"),
                MainError::Io(m) => eprintln!("cv: io error: {m}"),
                MainError::Refused(m) => eprintln!("cv: {m}"),
            }
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn run(args: &Args) -> Result<(), MainError> {
    match &args.command {
        Command::Report { snapshot, params, as_of, top, pretty } => {
            run_report(snapshot, params.as_deref(), *as_of, *top, *pretty)
        }
        Command::Seed { snapshot, params } => run_seed(snapshot, params.as_deref()),
        Command::Clear { snapshot, params } => run_clear(snapshot, params.as_deref()),
    }
}

// ---------- Report ----------

/// JSON envelope printed by `report`: the input digest is echoed so two
/// operators can confirm they are looking at the same snapshot.
#[derive(Debug, Serialize)]
struct ReportDoc {
    snapshot_sha256: String,
    as_of: u64,
    metrics: DashboardMetrics,
}

fn run_report(
    snapshot: &Path,
    params: Option<&Path>,
    as_of: Option<u64>,
    top: usize,
    pretty: bool,
) -> Result<(), MainError> {
    let (snap, digest) = load_snapshot(snapshot)?;
    let p = load_params(params)?;
    let as_of = match as_of {
        Some(t) => t,
        None => wall_clock_epoch()?,
    };

    let metrics = assemble(&snap, &p, as_of, top);
    let doc = ReportDoc { snapshot_sha256: digest, as_of, metrics };
    let out = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    }
    .map_err(|e| MainError::Validation(format!("render: {e}")))?;
    println!("{out}");
    Ok(())
}

// ---------- Seed / Clear ----------

fn run_seed(snapshot: &Path, params: Option<&Path>) -> Result<(), MainError> {
    let p = load_params(params)?;
    let snap = if snapshot.exists() {
        load_snapshot(snapshot)?.0
    } else {
        Snapshot::default()
    };
    let mut store = InMemoryStore::from_snapshot(snap);

    let outcome = seed_all(&mut store, &p, wall_clock_epoch()?);
    if !outcome.success {
        return Err(MainError::Refused(outcome.message));
    }
    save_snapshot(snapshot, &store.snapshot())?;
    println!("{}", outcome.message);
    Ok(())
}

fn run_clear(snapshot: &Path, params: Option<&Path>) -> Result<(), MainError> {
    let p = load_params(params)?;
    let (snap, _) = load_snapshot(snapshot)?;
    let mut store = InMemoryStore::from_snapshot(snap);

    let outcome = clear(&mut store, &p);
    if !outcome.success {
        return Err(MainError::Refused(outcome.message));
    }
    save_snapshot(snapshot, &store.snapshot())?;
    println!("{}", outcome.message);
    Ok(())
}

// ---------- Shared helpers ----------

fn load_params(path: Option<&Path>) -> Result<Params, MainError> {
    let p: Params = match path {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|e| MainError::Io(format!("{}: {e}", path.display())))?;
            serde_json::from_slice(&bytes)
                .map_err(|e| MainError::Validation(format!("params: {e}")))?
        }
        None => Params::default(),
    };
    p.validate_domains()
        .map_err(|e| MainError::Validation(format!("params: {e}")))?;
    Ok(p)
}

fn wall_clock_epoch() -> Result<u64, MainError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| MainError::Io(format!("system clock: {e}")))
}
