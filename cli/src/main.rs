use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report, Result};
use serde_json::json;
use spyglass::{AccessKeyError, Value, decode_access_key, encode_access_key, get_inspector};
use std::io::BufRead;
use std::io::BufReader;
use thiserror::Error;

mod literal;


/// Spyglass - preview values the way a variable explorer shows them
#[derive(Parser, Debug)]
#[command(name = "spyglass")]
#[command(about = "Preview, encode and decode values given as JSON literals", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Nesting level to render previews at (0 = top level)
    #[arg(long, default_value_t = 0, global = true)]
    level: usize,

    /// Print previews as JSON objects, one per line
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the preview, type, kind and size of a value
    Preview {
        /// JSON literal (if not provided, reads one per line from stdin)
        input: Option<String>,
    },
    /// Print the access key of a value
    Encode {
        /// JSON literal (if not provided, reads one per line from stdin)
        input: Option<String>,
    },
    /// Decode an access key and preview the value it names
    Decode {
        /// Access key (if not provided, reads one per line from stdin)
        input: Option<String>,
    },
}

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("invalid JSON literal")]
    #[diagnostic(code(spyglass::cli::literal), help("values are given as JSON, e.g. [1, \"a\", null]"))]
    Literal(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    AccessKey(#[from] AccessKeyError),
}

fn preview(value: &Value, level: usize, as_json: bool) {
    let inspector = get_inspector(value);
    let display = inspector.get_display_value(level);
    if as_json {
        let report = json!({
            "display": display.text,
            "truncated": display.truncated,
            "type": inspector.get_display_type(),
            "kind": inspector.get_kind().as_str(),
            "size": inspector.get_size(),
            "mutable": inspector.is_mutable(),
            "has_children": inspector.has_children(),
        });
        println!("{report}");
    } else {
        println!("{}", display.text);
        println!(
            "  type: {}  kind: {}  size: {}{}",
            inspector.get_display_type(),
            inspector.get_kind(),
            inspector.get_size(),
            if display.truncated { "  (truncated)" } else { "" }
        );
    }
}

fn run(command: &Command, input: &str, args: &Args) -> Result<(), CliError> {
    match command {
        Command::Preview { .. } => {
            let value = literal::parse_literal(input)?;
            preview(&value, args.level, args.json);
        }
        Command::Encode { .. } => {
            let value = literal::parse_literal(input)?;
            println!("{}", encode_access_key(&value)?);
        }
        Command::Decode { .. } => {
            let value = decode_access_key(input)?;
            preview(&value, args.level, args.json);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (Command::Preview { input } | Command::Encode { input } | Command::Decode { input }) =
        &args.command;

    // Check if we have a direct argument
    if let Some(input) = input {
        run(&args.command, input, &args)?;
        return Ok(());
    }

    if atty::is(atty::Stream::Stdin) {
        eprintln!("Reading one input per line (Ctrl+D to finish)");
    }

    // Pipe/stdin mode: report failures per line and keep going
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading line from stdin: {}", e);
                return Ok(());
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        if let Err(err) = run(&args.command, &line, &args) {
            tracing::debug!(input = %line, "input rejected");
            eprintln!("{:?}", Report::new(err));
        }
    }

    Ok(())
}
