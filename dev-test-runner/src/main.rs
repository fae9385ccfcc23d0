//! Golden-fixture runner: every `fixtures/<name>.input.swift` must rewrite to
//! `fixtures/<name>.expected.swift`, and rewriting that must change nothing.
//!
//! `cargo run -p dev-test-runner [-- --bless]` (bless overwrites expectations).
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use enum_props::driver::process_source;
use enum_props::rewrite::RewriteOptions;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Outcome {
    fixture: String,
    matches_expected: bool,
    idempotent: bool,
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("fixtures")
}

fn run_fixture(input_path: &Path, bless: bool) -> Result<Outcome> {
    let stem = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".input.swift"))
        .context("fixture name must end in .input.swift")?
        .to_string();
    let expected_path = input_path.with_file_name(format!("{stem}.expected.swift"));
    let options = RewriteOptions::default();

    let input = std::fs::read_to_string(input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;
    let first = process_source(&input, &options)
        .with_context(|| format!("parsing {}", input_path.display()))?;
    if bless {
        std::fs::write(&expected_path, &first.output)?;
    }
    let expected = std::fs::read_to_string(&expected_path)
        .with_context(|| format!("reading {}", expected_path.display()))?;
    let second = process_source(&first.output, &options)?;

    Ok(Outcome {
        fixture: stem,
        matches_expected: first.output == expected,
        idempotent: !second.changed() && second.output == first.output,
    })
}

fn main() -> Result<()> {
    let bless = std::env::args().any(|a| a == "--bless");
    let pattern = fixtures_dir().join("*.input.swift");
    let mut outcomes = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        outcomes.push(run_fixture(&entry?, bless)?);
    }

    for o in &outcomes {
        let ok = o.matches_expected && o.idempotent;
        let mark = if ok { "✅".normal() } else { "❌".red() };
        eprintln!("{mark} {}", o.fixture);
    }
    println!("{}", serde_json::to_string_pretty(&outcomes)?);

    let failed = outcomes.iter().filter(|o| !(o.matches_expected && o.idempotent)).count();
    if failed > 0 {
        bail!("{failed} fixture(s) failed");
    }
    Ok(())
}
