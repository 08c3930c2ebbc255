// Command-line front end for simple-md.
//
// Drives the same pipeline the editor uses, headlessly:
//  simple-md render <file> [-o out.html]          - full preview document
//  simple-md export <file> --to md|html|pdf -o out
//  simple-md normalize <file>                     - MDX rewritten as Markdown
//  simple-md highlight <file>                     - line:start:len:rule per span
//  simple-md preview <file> [--watch]             - open in the browser, re-render on change

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, SystemTime};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use simple_md::app::domain::AppSettings;
use simple_md::app::infrastructure::clock::SystemClock;
use simple_md::app::infrastructure::dialogs::{LogNotifier, Notifier};
use simple_md::app::infrastructure::error::Result;
use simple_md::app::infrastructure::logging::init_logging;
use simple_md::app::infrastructure::preview_surface::FilePreviewSurface;
use simple_md::app::services::assembler::ShellOptions;
use simple_md::app::services::export::{ExportFormat, export};
use simple_md::app::services::file_io::{open_document, write_atomic};
use simple_md::app::services::highlight::highlight_text;
use simple_md::app::services::mdx;
use simple_md::app::services::pipeline::render_document;
use simple_md::app::EditorSession;

const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "simple-md", version, about = "Markdown/MDX preview, highlighting and export")]
struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a file into a complete preview HTML document
    Render {
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Export a file as Markdown, an HTML fragment or PDF
    Export {
        file: PathBuf,
        #[arg(long, value_enum)]
        to: ExportTarget,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Print the MDX-normalized Markdown
    Normalize { file: PathBuf },
    /// Print highlight spans as line:start:len:rule
    Highlight { file: PathBuf },
    /// Show the preview in the system browser
    Preview {
        file: PathBuf,
        /// Keep running and re-render when the file changes
        #[arg(long)]
        watch: bool,
        /// Write the preview file without launching a browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportTarget {
    Md,
    Html,
    Pdf,
}

impl From<ExportTarget> for ExportFormat {
    fn from(target: ExportTarget) -> Self {
        match target {
            ExportTarget::Md => ExportFormat::Markdown,
            ExportTarget::Html => ExportFormat::Html,
            ExportTarget::Pdf => ExportFormat::Pdf,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.config.as_deref() {
        Some(path) => AppSettings::load_or_default(path),
        None => AppSettings::load(),
    };

    match run(cli.command, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("simple-md: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: AppSettings) -> Result<()> {
    match command {
        Command::Render { file, output } => {
            let doc = open_document(&file)?;
            let options = ShellOptions::from_settings(&settings);
            let rendered = render_document(doc.text(), file.to_str(), &options);
            match output {
                Some(out) => write_atomic(&out, rendered.html.as_bytes()),
                None => print_stdout(&rendered.html),
            }
        }
        Command::Export { file, to, output } => {
            let doc = open_document(&file)?;
            export(to.into(), doc.text(), file.to_str(), &output)
        }
        Command::Normalize { file } => {
            let doc = open_document(&file)?;
            let normalized = mdx::normalize(doc.text(), file.to_str());
            debug!(was_mdx = normalized.was_mdx, "normalized");
            print_stdout(&normalized.text)
        }
        Command::Highlight { file } => {
            let doc = open_document(&file)?;
            let mut out = String::new();
            for (line, span) in highlight_text(doc.text()) {
                out.push_str(&format!("{}:{}:{}:{}\n", line + 1, span.start, span.len, span.rule.name()));
            }
            print_stdout(&out)
        }
        Command::Preview { file, watch, no_open } => preview(&file, watch, !no_open, settings),
    }
}

fn preview(file: &Path, watch: bool, open_browser: bool, settings: AppSettings) -> Result<()> {
    let doc = open_document(file)?;
    let surface = FilePreviewSurface::new(open_browser)?;
    let preview_path = surface.path().to_path_buf();
    let mut session = EditorSession::new(doc, surface, SystemClock, settings);
    session.render_now()?;
    println!("{}", preview_path.display());

    if !watch {
        return Ok(());
    }

    info!(file = %file.display(), "watching for changes");
    let mut notifier = LogNotifier;
    let mut last_modified = modified_time(file);
    loop {
        thread::sleep(WATCH_POLL_INTERVAL);

        let modified = modified_time(file);
        if modified != last_modified {
            last_modified = modified;
            match fs::read_to_string(file) {
                Ok(content) if content != session.document().text() => session.replace_text(&content),
                Ok(_) => {}
                Err(e) => notifier.error(&format!("Failed to read {}: {e}", file.display())),
            }
        }

        if let Err(e) = session.tick() {
            notifier.error(&e.to_string());
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') && !text.is_empty() {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
