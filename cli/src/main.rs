use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use region_json::num::format_number;
use region_json::{ArenaOptions, Document, Node, ParseOptions, Value, Whitespace};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "REGION_JSON_LOG";

#[derive(Parser, Debug)]
#[command(name = "region-json", version, about = "Parse JSON into a region-backed tree")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Indentation size for pretty output; 0 prints compact JSON.
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Print the root container's elements on one line, comma separated.
    #[arg(long)]
    flat: bool,

    /// Show bytes consumed and arena usage after the output.
    #[arg(long)]
    stats: bool,

    /// Treat tab, newline and carriage return as whitespace too.
    #[arg(long = "json-whitespace")]
    json_whitespace: bool,

    /// Reject anything but whitespace after the root value.
    #[arg(long = "strict-eof")]
    strict_eof: bool,

    /// Bytes of address space to reserve for the arena.
    #[arg(long, value_name = "bytes")]
    reserve: Option<usize>,

    /// Commit granularity in bytes (a multiple of 4096).
    #[arg(long, value_name = "bytes")]
    commit: Option<usize>,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

// Installed only when a filter is requested, so normal runs stay quiet.
fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let input = read_input(args.input.as_deref())?;
    let options = parse_options(&args);

    let doc = region_json::parse_with_options(&input, &options)?;
    tracing::debug!(consumed = doc.consumed(), "parsed input");

    with_output_writer(args.output.as_deref(), |writer| {
        if args.flat {
            write_flat(writer, doc.root())?;
        } else {
            write_json(writer, doc.root(), args.indent)?;
        }
        if args.stats {
            write_stats(writer, &doc)?;
        }
        Ok(())
    })
}

fn parse_options(args: &Args) -> ParseOptions {
    let mut arena = ArenaOptions::default();
    if let Some(reserve) = args.reserve {
        arena = arena.with_reserve_size(reserve);
    }
    if let Some(commit) = args.commit {
        arena = arena.with_commit_size(commit);
    }
    let whitespace = if args.json_whitespace {
        Whitespace::Json
    } else {
        Whitespace::SpaceOnly
    };
    ParseOptions::new()
        .with_whitespace(whitespace)
        .with_require_eof(args.strict_eof)
        .with_arena(arena)
}

fn read_input(input: Option<&str>) -> Result<Vec<u8>, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read(path)?),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json(writer: &mut dyn Write, root: Node<'_>, indent: usize) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(&mut *writer, &root)?;
    } else {
        let indent_bytes = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        root.serialize(&mut serializer)?;
    }
    writeln!(writer)?;
    Ok(())
}

// Scalars print as-is; nested containers are summarised by type and size.
fn write_flat(writer: &mut dyn Write, root: Node<'_>) -> Result<(), Box<dyn Error>> {
    if root.is_object() {
        for (key, value) in root.entries() {
            write!(writer, "{}: {}, ", flat_scalar(key), flat_scalar(value))?;
        }
    } else if root.is_array() {
        for element in root.iter() {
            write!(writer, "{}, ", flat_scalar(element))?;
        }
    } else {
        write!(writer, "{}", flat_scalar(root))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn flat_scalar(node: Node<'_>) -> String {
    match node.value() {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(_) => {
            let bytes = node.as_bytes().unwrap_or_default();
            String::from_utf8_lossy(bytes).into_owned()
        }
        Value::Array(_) | Value::Object(_) => format!("<{} of {}>", node.type_name(), node.len()),
    }
}

fn write_stats(writer: &mut dyn Write, doc: &Document) -> Result<(), Box<dyn Error>> {
    let arena = doc.arena();
    writeln!(writer)?;
    writeln!(writer, "consumed: {} bytes", doc.consumed())?;
    writeln!(writer, "arena offset: {} bytes", arena.offset())?;
    writeln!(
        writer,
        "arena committed: {} of {} bytes ({} commits)",
        arena.committed_size(),
        arena.reserved_size(),
        arena.commit_count()
    )?;
    writeln!(writer, "arena blocks: {}", arena.block_count())?;
    Ok(())
}
