use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codeprompt_editor::{MemoryBuffer, Position, Selection};
use codeprompt_flows::{CommandId, CommandSurface, Config};
use codeprompt_invoke::{CommandInvoker, Invoke};
use dry_run::DryRunInvoker;
use flags::{parse_line_range, parse_position, parse_selection, AcceptFlag, ContextFlag};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use terminal::TerminalHost;

mod dry_run;
mod flags;
mod terminal;

#[derive(Parser)]
#[command(name = "codeprompt")]
#[command(about = "Send code from a file to an AI coding assistant and apply the answer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/codeprompt/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the assistant command line instead of running it
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about a selection, function, file or line range
    Ask(AskArgs),

    /// Explain the selection
    Explain(BufferArgs),

    /// Explain the function under the cursor
    #[command(name = "explain-function")]
    ExplainFunction(BufferArgs),

    /// Generate a function from a description and insert it
    Generate(GenerateArgs),

    /// Generate tests for the selection or the function under the cursor
    Tests(TestsArgs),

    /// Run a command by name (ClaudeAsk) or keychord (<leader>ca)
    Run(RunArgs),

    /// List commands and their keychords
    Commands,
}

#[derive(Args)]
struct BufferArgs {
    /// File to work on; created on save when missing
    #[arg(long)]
    file: PathBuf,

    /// Cursor position, LINE[:COL] (1-based)
    #[arg(long, value_parser = parse_position)]
    cursor: Option<Position>,

    /// Selection, START[:COL]-END[:COL]; whole lines without columns
    #[arg(long, value_parser = parse_selection)]
    selection: Option<Selection>,

    /// Filetype label (default: from the file extension)
    #[arg(long)]
    filetype: Option<String>,
}

#[derive(Args)]
struct AskArgs {
    #[command(flatten)]
    buffer: BufferArgs,

    /// What to send (asked interactively when absent)
    #[arg(long, value_enum)]
    context: Option<ContextFlag>,

    /// Lines for `--context range`, START-END
    #[arg(long, value_parser = parse_line_range, required_if_eq("context", "range"))]
    lines: Option<(String, String)>,

    /// The question; needs --context
    #[arg(long, short = 'm', requires = "context")]
    question: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    buffer: BufferArgs,

    /// What the function should do
    #[arg(long, short)]
    description: Option<String>,

    /// Answer the preview without asking
    #[arg(long, value_enum)]
    accept: Option<AcceptFlag>,
}

#[derive(Args)]
struct TestsArgs {
    #[command(flatten)]
    buffer: BufferArgs,

    /// Answer the preview without asking
    #[arg(long, value_enum)]
    accept: Option<AcceptFlag>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    buffer: BufferArgs,

    /// Command name or keychord
    name: String,
}

impl BufferArgs {
    fn open(&self) -> Result<TerminalHost> {
        let mut buffer = if self.file.exists() {
            MemoryBuffer::open(&self.file)
                .with_context(|| format!("Failed to read {}", self.file.display()))?
        } else {
            log::debug!("{} does not exist yet", self.file.display());
            MemoryBuffer::from_text("").with_path(&self.file)
        };

        if let Some(filetype) = &self.filetype {
            buffer.set_filetype(Some(filetype.clone()));
        }
        if let Some(cursor) = self.cursor {
            buffer
                .set_cursor(cursor)
                .with_context(|| format!("Invalid --cursor for {}", self.file.display()))?;
        }
        buffer.set_selection(self.selection);
        Ok(TerminalHost::new(buffer))
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref())?;
    let invoker: Box<dyn Invoke> = if cli.dry_run {
        Box::new(DryRunInvoker::new(config.invoker_config()))
    } else {
        Box::new(CommandInvoker::new(config.invoker_config()))
    };
    let surface = CommandSurface::new(&config, invoker.as_ref());

    match cli.command {
        Commands::Commands => {
            print_commands(&surface);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ask(args) => {
            let mut host = args.buffer.open()?;
            if let Some(context) = args.context {
                host.preset_choice(context.choice());
            }
            if let Some((start, end)) = args.lines {
                host.preset_input(start);
                host.preset_input(end);
            }
            if let Some(question) = args.question {
                host.preset_input(question);
            }
            run_flow(&surface, host, |s, h| s.run(h, CommandId::Ask))
        }
        Commands::Explain(args) => {
            let host = args.open()?;
            run_flow(&surface, host, |s, h| s.run(h, CommandId::Explain))
        }
        Commands::ExplainFunction(args) => {
            let host = args.open()?;
            run_flow(&surface, host, |s, h| s.run(h, CommandId::ExplainFunction))
        }
        Commands::Generate(args) => {
            let mut host = args.buffer.open()?;
            if let Some(description) = args.description {
                host.preset_input(description);
            }
            if let Some(accept) = args.accept {
                host.preset_key(accept.key());
            }
            run_flow(&surface, host, |s, h| s.run(h, CommandId::Generate))
        }
        Commands::Tests(args) => {
            let mut host = args.buffer.open()?;
            if let Some(accept) = args.accept {
                host.preset_key(accept.key());
            }
            run_flow(&surface, host, |s, h| s.run(h, CommandId::Tests))
        }
        Commands::Run(args) => {
            let host = args.buffer.open()?;
            run_flow(&surface, host, |s, h| s.dispatch(h, &args.name))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        },
    }
    .with_env();
    config
        .validate()
        .context("Configuration rejected after environment overrides")?;
    Ok(config)
}

/// Run one flow, flush deferred work and save the file if it changed
fn run_flow(
    surface: &CommandSurface<'_>,
    mut host: TerminalHost,
    flow: impl FnOnce(&CommandSurface<'_>, &mut TerminalHost) -> bool,
) -> Result<ExitCode> {
    let ok = flow(surface, &mut host);
    let mut buffer = host.finish();

    if buffer.is_modified() {
        buffer.save().context("Failed to save buffer")?;
        if let Some(path) = buffer.path() {
            log::info!("saved {}", path.display());
        }
    }

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_commands(surface: &CommandSurface<'_>) {
    for binding in surface.bindings() {
        println!(
            "{:<24} {:<12} {}",
            binding.id.name(),
            binding.chord,
            binding.id.description()
        );
    }
}
