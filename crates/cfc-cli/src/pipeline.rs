//! End-to-end scan pipeline: discover, parse in parallel, write outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use cfc_engine::FileRecord;
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::Cli;
use crate::discover;
use crate::progress::Progress;

/// One value in the `fc.json` map.
#[derive(Debug, Serialize)]
struct FcEntry {
    fc: Vec<String>,
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let target_dir = cli
        .dir
        .canonicalize()
        .with_context(|| format!("dir not found: {}", cli.dir.display()))?;
    if !target_dir.is_dir() {
        bail!("not a directory: {}", target_dir.display());
    }
    let workers = resolve_workers(cli.workers);

    let files = discover::find_c_files(&target_dir);
    let total_files = files.len();

    if !cli.quiet {
        println!("Scan dir: {}", target_dir.display());
        println!("Workers: {workers}");
        println!("Found {total_files} .c files");
        println!("Output fc.json: {}", cli.output_fc.display());
        println!("Output null_fc.json: {}", cli.output_null_fc.display());
    }

    if total_files == 0 {
        write_outputs(&cli.output_fc, &cli.output_null_fc, &[])?;
        if !cli.quiet {
            println!("No .c files found, outputs created.");
        }
        return Ok(());
    }

    let started = Instant::now();
    let progress = Progress::bar(
        total_files as u64,
        "parsing",
        !cli.no_progress && !cli.quiet,
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to build worker pool")?;
    let records: Vec<FileRecord> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let record = cfc_engine::parse_file(path);
                progress.inc(1);
                record
            })
            .collect()
    });
    progress.finish_ok("done");

    let total_functions: usize = records.iter().map(|r| r.functions.len()).sum();
    let null_count = records.iter().filter(|r| r.is_null()).count();
    let error_count = records.iter().filter(|r| r.error.is_some()).count();

    write_outputs(&cli.output_fc, &cli.output_null_fc, &records)?;

    if !cli.quiet {
        println!("Done.");
        println!("Elapsed: {:.2}s", started.elapsed().as_secs_f64());
        println!("Total files: {total_files}");
        println!("Total functions: {total_functions}");
        println!("Files with no functions: {null_count}");
    }
    if error_count > 0 {
        eprintln!("Parser errors: {error_count}");
    }

    Ok(())
}

/// Worker count: the flag wins, then the `CFC_WORKERS` environment
/// variable, then CPU count minus one. Never less than one.
fn resolve_workers(flag: Option<usize>) -> usize {
    resolve_workers_from(flag, std::env::var("CFC_WORKERS").ok())
}

fn resolve_workers_from(flag: Option<usize>, env: Option<String>) -> usize {
    flag.or_else(|| env.as_deref().and_then(|v| v.parse::<usize>().ok()))
        .unwrap_or_else(default_workers)
        .max(1)
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get().saturating_sub(1).max(1))
}

/// Write both output documents: the path-sorted `{path: {"fc": [...]}}`
/// map, and the sorted array of paths whose list is empty.
fn write_outputs(
    output_fc: &Path,
    output_null_fc: &Path,
    records: &[FileRecord],
) -> anyhow::Result<()> {
    let mut by_path: BTreeMap<String, FcEntry> = BTreeMap::new();
    let mut null_paths: Vec<&str> = Vec::new();
    for record in records {
        if record.is_null() {
            null_paths.push(&record.path);
        }
        by_path.insert(
            record.path.clone(),
            FcEntry {
                fc: record.functions.clone(),
            },
        );
    }
    null_paths.sort_unstable();

    write_json(output_fc, &by_path)?;
    write_json(output_null_fc, &null_paths)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(value).context("cannot serialize output")?;
    fs::write(path, body).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
