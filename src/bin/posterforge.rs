use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use posterforge::mask::FocusParams;
use posterforge::{
    Adjustments, Compositor, FontClass, FontLibrary, HistoryCache, JsonHistoryStore, RenderOptions,
};

#[derive(Parser, Debug)]
#[command(name = "posterforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster PNG from a source image and an adjustments JSON.
    Compose(ComposeArgs),
    /// List the built-in artistic transformation styles.
    Styles,
    /// List the entries of a history store file.
    History(HistoryArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Source image (PNG, JPEG, or WebP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Adjustments JSON. Omit for a neutral pass-through render.
    #[arg(long)]
    adjust: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Bind a font class to a font file, e.g. `--font kai=/path/to/kai.ttf`.
    /// May be repeated. Classes: sans, serif, kai, cursive.
    #[arg(long = "font")]
    fonts: Vec<String>,

    /// Fully sharp radius of the depth-of-field focus, as a fraction of the
    /// canvas width.
    #[arg(long, default_value_t = 0.2)]
    focus_inner: f32,

    /// Radius where the sharp layer fades out entirely, as a fraction of the
    /// canvas width.
    #[arg(long, default_value_t = 0.7)]
    focus_outer: f32,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    /// History store JSON file.
    #[arg(long)]
    store: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Styles => cmd_styles(),
        Command::History(args) => cmd_history(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let image = fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let adjustments = match &args.adjust {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read adjustments '{}'", path.display()))?;
            let adj: Adjustments =
                serde_json::from_str(&json).with_context(|| "parse adjustments JSON")?;
            adj.validate()?;
            adj
        }
        None => Adjustments::default(),
    };

    let mut fonts = FontLibrary::from_system();
    for binding in &args.fonts {
        let (class, path) = parse_font_binding(binding)?;
        fonts.load_override(class, &path)?;
    }

    let focus = FocusParams {
        inner_frac: args.focus_inner,
        outer_frac: args.focus_outer,
    };
    focus.validate()?;
    let compositor = Compositor::with_options(&fonts, RenderOptions { focus });
    let png = compositor.render(&image, &adjustments)?;
    fs::write(&args.out, png)
        .with_context(|| format!("write output '{}'", args.out.display()))?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn parse_font_binding(binding: &str) -> anyhow::Result<(FontClass, PathBuf)> {
    let (name, path) = binding
        .split_once('=')
        .with_context(|| format!("font binding '{binding}' must be CLASS=PATH"))?;
    let class = match name {
        "sans" => FontClass::Sans,
        "serif" => FontClass::Serif,
        "kai" => FontClass::Kai,
        "cursive" => FontClass::Cursive,
        other => anyhow::bail!("unknown font class '{other}'"),
    };
    Ok((class, PathBuf::from(path)))
}

fn cmd_styles() -> anyhow::Result<()> {
    for style in posterforge::STYLE_CATALOG {
        println!("{:?}", style.id);
        println!("  {} {}", style.icon, style.label);
        println!("  {}", style.description);
    }
    Ok(())
}

fn cmd_history(args: HistoryArgs) -> anyhow::Result<()> {
    let cache = HistoryCache::load(JsonHistoryStore::new(&args.store));
    if cache.items().is_empty() {
        println!("history is empty");
        return Ok(());
    }
    for item in cache.items() {
        println!(
            "{}  {:?}  {} bytes  created {} ms",
            item.id,
            item.style,
            item.png.len(),
            item.created_ms
        );
    }
    Ok(())
}
