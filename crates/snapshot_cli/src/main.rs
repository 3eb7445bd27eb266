mod logging;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::engine_info;
use snapshot_core::RuleSet;
use snapshot_engine::{filter_content, FilterRegistry};

use crate::logging::LogDestination;

/// Extracts the comparable text of a saved snapshot using a JSON declaration.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Declaration with `fetch`, `select` and optional `remove`/`filter` keys.
    #[arg(short, long)]
    declaration: PathBuf,

    /// Snapshot markup; read from stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Overrides the declaration's `fetch` location used to resolve links.
    #[arg(short, long)]
    location: Option<String>,

    /// Writes the result to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logs every pipeline stage.
    #[arg(short, long)]
    verbose: bool,

    /// Also writes the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let destination = match &args.log_file {
        Some(path) => LogDestination::TerminalAndFile(path),
        None => LogDestination::Terminal,
    };
    logging::initialize(destination, args.verbose);

    let declaration = fs::read_to_string(&args.declaration)
        .with_context(|| format!("reading declaration {:?}", args.declaration))?;
    let mut rules = RuleSet::from_json(&declaration)
        .with_context(|| format!("parsing declaration {:?}", args.declaration))?;
    if let Some(location) = args.location {
        rules.location = location;
    }

    let markup = match &args.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading snapshot {path:?}"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading snapshot from stdin")?;
            buffer
        }
    };

    // Service filters are code, so a standalone run has none to offer.
    let registry = FilterRegistry::new();
    let text = filter_content(&markup, &rules, &registry)
        .with_context(|| format!("filtering snapshot of {}", rules.location))?;
    engine_info!("extracted {} bytes for {}", text.len(), rules.location);

    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("writing output {path:?}"))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn declaration_is_required_and_input_defaults_to_stdin() {
        assert!(Args::try_parse_from(["snapshot-filter"]).is_err());

        let args = Args::try_parse_from(["snapshot-filter", "-d", "terms.json", "-v"]).unwrap();
        assert_eq!(args.declaration.to_str(), Some("terms.json"));
        assert!(args.input.is_none());
        assert!(args.verbose);
    }
}
