mod test_runner;

use std::io::Read;
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blockview::page::{DEFAULT_CATEGORY_PROPERTY, PageSummary};
use renderer::{MalformedPolicy, RenderError, RenderOptions};

const SUBCOMMANDS: &[&str] = &["render", "test", "help"];

#[derive(Parser)]
#[command(name = "blockview", version, about = "Render page block lists as plain text")]
struct Cli {
    /// Disable colored diagnostics and log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a block list JSON document
    Render(RenderArgs),

    /// Run .test.blocks fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Block list JSON file (`-` reads stdin)
    file: String,

    /// Fail on the first block with missing text instead of rendering a placeholder
    #[arg(long)]
    strict: bool,

    /// Print a `Block Type:` line before each block
    #[arg(long)]
    annotate: bool,

    /// Page object JSON whose metadata is printed before the blocks
    #[arg(long)]
    page: Option<String>,

    /// Multi-select property read as the page's categories
    #[arg(long, default_value = DEFAULT_CATEGORY_PROPERTY)]
    category_property: String,

    /// Parse only, don't render (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump parsed blocks
    #[arg(long)]
    ast: bool,

    /// List the position and kind of every block
    #[arg(long)]
    list_kinds: bool,

    /// Suppress rendered output (just check for errors)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.blocks file or directory containing them
    path: String,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `blockview page.json` is shorthand for `blockview render page.json`.
    let mut args: Vec<String> = std::env::args().collect();
    let first_pos = args
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, a)| !a.starts_with('-') || a.as_str() == "-")
        .map(|(pos, a)| (pos, a.clone()));
    if let Some((pos, first)) = first_pos {
        if !SUBCOMMANDS.contains(&first.as_str()) {
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    init_tracing(cli.no_color);

    match cli.command {
        Command::Render(render_args) => do_render(render_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_tracing(no_color: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .init();
}

fn read_source(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(file)
    }
}

fn do_render(args: RenderArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let name = if args.file == "-" {
        "<stdin>".to_string()
    } else {
        args.file.clone()
    };
    let mut files = SimpleFiles::new();
    let file_id = files.add(name, source.clone());

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    let parser = blockview::parser::Parser::new(source, file_id);
    let list = match parser.parse() {
        Ok(list) => list,
        Err(errors) => {
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    };

    if args.check {
        eprintln!("ok: {} block(s) parsed from {}", list.blocks.len(), args.file);
        return;
    }

    if args.ast {
        println!("{:#?}", list);
        return;
    }

    if args.list_kinds {
        for (position, block) in list.blocks.iter().enumerate() {
            println!("{:>4}  {}", position, block.kind());
        }
        return;
    }

    if let Some(page_path) = &args.page {
        let summary = match std::fs::read_to_string(page_path)
            .map_err(|e| e.to_string())
            .and_then(|s| {
                PageSummary::parse(&s, &args.category_property).map_err(|e| e.to_string())
            }) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("error: cannot load page '{}': {}", page_path, e);
                process::exit(1);
            }
        };
        if !args.quiet {
            for line in renderer::render_page_summary(&summary) {
                println!("{}", line);
            }
            println!();
        }
    }

    let options = RenderOptions {
        policy: if args.strict {
            MalformedPolicy::Abort
        } else {
            MalformedPolicy::Placeholder
        },
        annotate_kinds: args.annotate,
    };

    match renderer::render_with(&list.blocks, &options) {
        Ok(rendering) => {
            if !args.quiet {
                print!("{}", rendering);
            }
            for warning in &rendering.warnings {
                emit_render_error(&writer, &config, &files, file_id, warning, Severity::Warning);
            }
        }
        Err(error) => {
            emit_render_error(&writer, &config, &files, file_id, &error, Severity::Error);
            process::exit(1);
        }
    }
}

fn emit_render_error(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    file_id: usize,
    error: &RenderError,
    severity: Severity,
) {
    if let Some(span) = error.span() {
        let diagnostic = Diagnostic::new(severity)
            .with_message(error.to_string())
            .with_labels(vec![
                Label::primary(file_id, span.clone())
                    .with_message(format!("`{}` block", error.kind())),
            ])
            .with_notes(vec![
                "text-bearing blocks other than paragraphs need at least one rich-text span"
                    .to_string(),
            ]);
        let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
    } else {
        let prefix = if severity == Severity::Warning {
            "warning"
        } else {
            "render error"
        };
        eprintln!("{}: {}", prefix, error);
    }
}
