use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use cardwright::{Compositor, FrameSelector, SymbolResolver, TypeSetter};

#[derive(Parser, Debug)]
#[command(name = "cardwright", version)]
struct Cli {
    /// Card JSON produced by the text-generation service.
    #[arg(long)]
    card: PathBuf,

    /// Pre-fetched art image (any format `image` decodes). Optional: without
    /// it the frame's art window stays as painted.
    #[arg(long)]
    art: Option<PathBuf>,

    /// Directory of frame backgrounds (`<color>.png`, `creature/<color>.png`).
    #[arg(long)]
    frames: PathBuf,

    /// Directory of symbol SVG sources (`g.svg`, `t.svg`, `2.svg`, ...).
    #[arg(long)]
    symbols: PathBuf,

    /// Font file used for all card text.
    #[arg(long)]
    font: PathBuf,

    /// Existing output directory the finished PNG is written into.
    #[arg(long = "out-dir")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.card)
        .with_context(|| format!("read card json '{}'", cli.card.display()))?;
    let spec = cardwright::CardSpec::from_json(&json)?;

    let art = match &cli.art {
        Some(path) => Some(
            image::open(path)
                .with_context(|| format!("decode art image '{}'", path.display()))?
                .to_rgba8(),
        ),
        None => None,
    };

    let frames = FrameSelector::new(&cli.frames);
    let symbols = SymbolResolver::new(&cli.symbols);
    let mut text = TypeSetter::from_font_file(&cli.font)?;

    let mut compositor = Compositor::new(&frames, &symbols, &mut text);
    let canvas = compositor.render(&spec, art.as_ref())?;

    let out_path = cli.out_dir.join(cardwright::compose::output_file_name(&spec)?);
    canvas.write_png(&out_path)?;
    println!("card saved as {}", out_path.display());
    Ok(())
}
