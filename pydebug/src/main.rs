//! pydebug-decode - pydevd message debugging tool
//!
//! Decodes captured pydevd payloads and outputs the decoded entities as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pydebug_core::decode::{
    parse_array_chunk, parse_array_header, parse_call_signature, parse_io, parse_referrers,
    parse_thread, parse_threading_event, parse_value, parse_values, thread_id_of,
};
use pydebug_core::{AccessorLink, Config, PositionConverter};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pydebug-decode")]
#[command(about = "Decode pydevd wire messages and output them as JSON")]
#[command(version)]
struct Args {
    /// Message kind the payloads contain
    #[arg(short, long, value_enum)]
    kind: Kind,

    /// Payload file(s) to decode; `-` or nothing reads stdin
    files: Vec<PathBuf>,

    /// Payloads start with a tab-separated thread id
    #[arg(long)]
    thread_id: bool,

    /// Config file (default: ~/.config/pydebug/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compact JSON output (default: pretty)
    #[arg(long)]
    compact: bool,

    /// Verbose output (echo decoder traces on stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    CallSignature,
    ThreadingEvent,
    Thread,
    Value,
    Values,
    Referrers,
    Array,
    ArrayHeader,
    Io,
}

/// Output structure for one decoded payload
#[derive(Serialize)]
struct DebugOutput {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_id: Option<String>,
    decoded: serde_json::Value,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    // decoding still works without a log file
    let _log_guard = match pydebug_core::logging::init(&config.logging, args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let converter = config.position_converter();
    let accessor = AccessorLink::detached();

    let mut outputs = Vec::new();
    for (file, text) in read_inputs(&args.files)? {
        let (thread_id, payload) = if args.thread_id {
            let id = thread_id_of(&text);
            let rest = text.get(id.len() + 1..).unwrap_or_default();
            (Some(id.to_string()), rest)
        } else {
            (None, text.as_str())
        };

        let decoded = decode(args.kind, payload.trim(), &converter, &accessor)
            .with_context(|| format!("failed to decode {} as {:?}", file, args.kind))?;

        tracing::info!(file = %file, kind = ?args.kind, "Decoded payload");

        outputs.push(DebugOutput {
            file,
            thread_id,
            decoded,
        });
    }

    let json = match (outputs.len(), args.compact) {
        (1, true) => serde_json::to_string(&outputs[0])?,
        (1, false) => serde_json::to_string_pretty(&outputs[0])?,
        (_, true) => serde_json::to_string(&outputs)?,
        (_, false) => serde_json::to_string_pretty(&outputs)?,
    };
    println!("{}", json);

    Ok(())
}

/// Read every input, labelled by file name (`-` for stdin).
fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() {
        return Ok(vec![("-".to_string(), read_stdin()?)]);
    }

    files
        .iter()
        .map(|path| -> Result<(String, String)> {
            let label = path.display().to_string();
            let text = if label == "-" {
                read_stdin()?
            } else {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", label))?
            };
            Ok((label, text))
        })
        .collect()
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(text)
}

fn decode(
    kind: Kind,
    payload: &str,
    converter: &dyn PositionConverter,
    accessor: &AccessorLink,
) -> Result<serde_json::Value> {
    let value = match kind {
        Kind::CallSignature => serde_json::to_value(parse_call_signature(payload)?)?,
        Kind::ThreadingEvent => serde_json::to_value(parse_threading_event(payload, converter)?)?,
        Kind::Thread => serde_json::to_value(parse_thread(payload, converter)?)?,
        Kind::Value => serde_json::to_value(parse_value(payload, accessor)?)?,
        Kind::Values => serde_json::to_value(parse_values(payload, accessor)?)?,
        Kind::Referrers => serde_json::to_value(parse_referrers(payload, accessor)?)?,
        Kind::Array => serde_json::to_value(parse_array_chunk(payload, accessor)?)?,
        Kind::ArrayHeader => serde_json::to_value(parse_array_header(payload, accessor)?)?,
        Kind::Io => serde_json::to_value(parse_io(payload)?)?,
    };
    Ok(value)
}
