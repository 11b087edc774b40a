use std::io::{self, Read};
use std::path::PathBuf;

use argbind::{
    BindingDocument, DynamicTarget, LinePrompt, ParameterKind, ParameterSummary, RawArguments,
    TokenizeMode, describe, split_line,
};
use argbind_core::{Separator, Value};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSeparator {
    Space,
    Equals,
    Colon,
}

impl From<CliSeparator> for Separator {
    fn from(sep: CliSeparator) -> Self {
        match sep {
            CliSeparator::Space => Self::Space,
            CliSeparator::Equals => Self::Equals,
            CliSeparator::Colon => Self::Colon,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argbind")]
#[command(about = "Tokenize, classify and bind command-line arguments against schema documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a command line into tokens.
    Tokenize(TokenizeArgs),
    /// Show how arguments classify against a schema document.
    Classify(BindArgs),
    /// Bind arguments against a schema document and print the values.
    Bind(BindArgs),
    /// List the parameters a schema document declares.
    Describe(DescribeArgs),
    /// Read command lines from stdin and bind each one.
    Shell(ShellArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Line to split (read from stdin when omitted).
    line: Option<String>,
    /// Tokenizer rules.
    #[arg(long, value_enum, default_value = "quoted")]
    mode: TokenizeMode,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct DocumentArgs {
    /// Binding document (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
    /// Comma-separated separators overriding the document's (e.g. space,equals).
    #[arg(long, value_enum, value_delimiter = ',')]
    separators: Option<Vec<CliSeparator>>,
}

#[derive(Debug, Args)]
struct BindArgs {
    #[command(flatten)]
    document: DocumentArgs,
    /// Tokenize this line instead of taking the arguments after `--`.
    #[arg(long, conflicts_with = "args")]
    line: Option<String>,
    /// Tokenizer for --line (defaults to the document's setting).
    #[arg(long, value_enum)]
    mode: Option<TokenizeMode>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to bind.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    #[command(flatten)]
    document: DocumentArgs,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ShellArgs {
    #[command(flatten)]
    document: DocumentArgs,
    /// Prompt written before each line.
    #[arg(long, default_value = "argbind>")]
    prompt: String,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("ARGBIND_LOG").unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Classify(args) => run_classify(args),
        Command::Bind(args) => run_bind(args),
        Command::Describe(args) => run_describe(args),
        Command::Shell(args) => run_shell(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let line = match args.line {
        Some(line) => line,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let tokens = split_line(&line, args.mode);
    let raw = render(&tokens, args.format, || tokens.join("\n"))?;
    println!("{raw}");
    Ok(())
}

fn run_classify(args: BindArgs) -> Result<(), String> {
    let (document, parser) = load_document(&args.document)?;
    let tokens = bind_tokens(&args, &parser);
    let raw = parser.classify(&document.schema, &tokens);

    let out = render(&raw, args.format, || classification_text(&raw))?;
    println!("{out}");
    Ok(())
}

fn run_bind(args: BindArgs) -> Result<(), String> {
    let (document, parser) = load_document(&args.document)?;
    let tokens = bind_tokens(&args, &parser);
    let bound = parser
        .parse_dynamic_with(&document.schema, &document.defaults(), &tokens)
        .map_err(|err| err.to_string())?;

    let out = render(&bound, args.format, || {
        let mut lines = Vec::new();
        binding_text(&bound, "", &mut lines);
        lines.join("\n")
    })?;
    println!("{out}");
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let (document, _) = load_document(&args.document)?;
    let summaries = describe(&document.schema, &document.defaults());

    let out = render(&summaries, args.format, || summary_table(&summaries))?;
    println!("{out}");
    Ok(())
}

fn run_shell(args: ShellArgs) -> Result<(), String> {
    let (document, parser) = load_document(&args.document)?;
    let defaults = document.defaults();
    let mode = parser.config().tokenize_mode;

    let stdin = io::stdin();
    let mut prompt = LinePrompt::new(stdin.lock(), io::stdout()).with_prompt(&args.prompt);
    loop {
        let Some(tokens) = prompt.read_tokens(mode).map_err(|err| err.to_string())? else {
            break;
        };
        match tokens.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some(_) => {}
        }

        match parser.parse_dynamic_with(&document.schema, &defaults, &tokens) {
            Ok(bound) => {
                let json = serde_json::to_string(&bound)
                    .map_err(|err| format!("Failed to serialize binding: {err}"))?;
                prompt.write_line(&json).map_err(|err| err.to_string())?;
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }

    debug!(lines = prompt.history().len(), "Shell input finished");
    Ok(())
}

fn load_document(args: &DocumentArgs) -> Result<(BindingDocument, argbind::Parser), String> {
    let document = BindingDocument::load(&args.schema)
        .map_err(|err| format!("Failed to load '{}': {err}", args.schema.display()))?;

    let mut parser = document.parser();
    if let Some(separators) = &args.separators {
        parser = parser.with_separators(separators.iter().map(|s| Separator::from(*s)).collect());
    }
    Ok((document, parser))
}

fn bind_tokens(args: &BindArgs, parser: &argbind::Parser) -> Vec<String> {
    match &args.line {
        Some(line) => split_line(line, args.mode.unwrap_or(parser.config().tokenize_mode)),
        None => args.args.clone(),
    }
}

fn render<T: Serialize>(
    value: &T,
    format: CliOutputFormat,
    text: impl FnOnce() -> String,
) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize JSON: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map(|raw| raw.trim_end().to_string())
            .map_err(|err| format!("Failed to serialize YAML: {err}")),
        CliOutputFormat::Text => Ok(text()),
    }
}

fn classification_text(raw: &RawArguments) -> String {
    let mut lines = Vec::new();
    for (key, value) in &raw.pairs {
        lines.push(format!("pair {key}={value}"));
    }
    for flag in &raw.flags {
        lines.push(format!("flag {flag}"));
    }
    for positional in &raw.positionals {
        lines.push(format!("positional {positional}"));
    }
    if let Some(command) = &raw.command {
        lines.push(format!("command {} at {}", command.name, command.index));
    }
    lines.join("\n")
}

fn binding_text(bound: &DynamicTarget, prefix: &str, lines: &mut Vec<String>) {
    for (field, value) in &bound.values {
        lines.push(format!("{prefix}{field} = {}", value_text(value)));
    }
    if let Some(command) = &bound.command {
        lines.push(format!("{prefix}command = {}", command.alias));
        match &command.bound {
            Some(nested) => binding_text(nested, &format!("{prefix}{}.", command.field), lines),
            None => lines.push(format!("{prefix}{}.args = {}", command.field, command.args.join(" "))),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(value_text).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

fn kind_label(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::Option => "option",
        ParameterKind::Flag => "flag",
        ParameterKind::Positional => "positional",
        ParameterKind::PositionalList => "list",
        ParameterKind::Command => "command",
    }
}

fn summary_table(summaries: &[ParameterSummary]) -> String {
    let rows: Vec<[String; 5]> = summaries
        .iter()
        .map(|s| {
            [
                kind_label(s.kind).to_string(),
                s.names.join(", "),
                s.value_type.clone().unwrap_or_default(),
                if s.required {
                    "required".to_string()
                } else {
                    s.default
                        .as_ref()
                        .map(|d| format!("default {d}"))
                        .unwrap_or_default()
                },
                s.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (cell, width) in row.iter().zip(widths.iter()) {
                line.push_str(&format!("{cell:<width$}  "));
            }
            line.push_str(&row[4]);
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
