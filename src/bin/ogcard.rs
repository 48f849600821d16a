use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ogcard", version)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a card and write it as PNG, JPEG or WebP (chosen by the output extension).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Body text of the card.
    #[arg(long)]
    text: String,

    /// Output path; the extension must be png, jpg or webp.
    #[arg(long)]
    out: PathBuf,

    /// JSON config; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background image, overriding the config's `background_path`.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Print which font the text layer resolves to.
    #[arg(long)]
    dump_font: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ogcard::CardConfig::from_json_file(path)?,
        None => ogcard::CardConfig::default(),
    };

    if args.dump_font {
        dump_font_diagnostics(&config);
    }

    if ogcard::ExportFormat::from_path(&args.out).is_none() {
        anyhow::bail!(
            "unsupported output extension '{}' (expected png, jpg or webp)",
            args.out.display()
        );
    }

    let mut compositor = ogcard::Compositor::new(&config);
    compositor.make(&args.text, args.background.as_deref())?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let card = compositor.finish()?;
    if !card.save(&args.out)? {
        anyhow::bail!("nothing written to '{}'", args.out.display());
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn dump_font_diagnostics(config: &ogcard::CardConfig) {
    let source = ogcard::resolve_font_source(config.text_font_path.as_deref());
    eprintln!("text font diagnostics:");
    eprintln!("  source: {source:?}");
    match ogcard::load_font(&source) {
        Some(font) => {
            eprintln!("  bytes:  {}", font.data.len());
            eprintln!("  index:  {}", font.index);
        }
        None => eprintln!("  no usable font; the text layer will be skipped"),
    }
}
