use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser as ClapParser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reqparse::{
    InputMode, ParseReport, ParserConfig, format_debug, format_http, format_json,
    parse_input_with_config,
};

/// reqparse CLI: turn pasted HTTP request text or a cURL command into a
/// normalized request.
///
/// Reads the input from a file, --raw string, or stdin and prints it in the
/// chosen format. Escape sequences (\r, \n, \t, \\) in the --raw value are
/// interpreted so a whole request fits in one shell argument.
#[derive(ClapParser)]
#[command(name = "reqparse-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file holding request text or a cURL command.
    /// Reads from stdin when neither FILE nor --raw is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Input given inline (escape sequences \r \n \t \\ are expanded).
    #[arg(long)]
    raw: Option<String>,

    /// How to interpret the input.
    #[arg(short, long, default_value = "auto", value_enum)]
    mode: Mode,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// List query and form fields decoded (debug format only).
    #[arg(long)]
    decode_body: bool,

    /// Maximum accepted input size in bytes.
    #[arg(long, default_value = "10485760")]
    max_input: usize,

    /// Do not add a Content-Type guessed from a cURL body.
    #[arg(long)]
    no_infer_content_type: bool,

    /// Keep GET for cURL commands that send a body without -X.
    #[arg(long)]
    no_promote_post: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Detect from the input
    Auto,
    /// Raw HTTP request text
    Http,
    /// cURL command line
    Curl,
}

impl From<Mode> for InputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => InputMode::Auto,
            Mode::Http => InputMode::Http,
            Mode::Curl => InputMode::Curl,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON report with success and error fields
    Json,
    /// Human-readable debug output
    Debug,
    /// Normalized raw HTTP request text
    Http,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.file.is_none() && cli.raw.is_none() && std::io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let input = match read_input(&cli) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    if input.trim().is_empty() {
        eprintln!("Error: empty input");
        process::exit(1);
    }

    let config = ParserConfig {
        max_input_len: cli.max_input,
        infer_content_type: !cli.no_infer_content_type,
        promote_body_to_post: !cli.no_promote_post,
    };
    let mode = InputMode::from(cli.mode).resolve(&input);
    debug!(?mode, bytes = input.len(), "parsing input");

    let result = parse_input_with_config(&input, mode, config);

    let output = match (cli.format, result) {
        (OutputFormat::Json, result) => {
            let report = ParseReport::from(result);
            let failed = !report.success;
            let json = format_json(&report, cli.pretty);
            if failed {
                println!("{json}");
                process::exit(2);
            }
            json + "\n"
        }
        (_, Err(e)) => {
            eprintln!("Parse error: {e}");
            process::exit(2);
        }
        (OutputFormat::Debug, Ok(request)) => format_debug(&request, cli.decode_body),
        (OutputFormat::Http, Ok(request)) => format_http(&request),
    };

    print!("{output}");
}

/// Read the input from --raw, a file, or stdin.
fn read_input(cli: &Cli) -> Result<String, std::io::Error> {
    if let Some(raw) = &cli.raw {
        return Ok(unescape(raw));
    }
    match &cli.file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Expand C-style escape sequences (`\r`, `\n`, `\t`, `\\`) in a string.
///
/// Any other `\X` sequence is kept as-is (both the backslash and `X`), so
/// shell escapes inside a cURL command survive.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
