use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "covergen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a cover and export it at half resolution as `<title>.png`.
    Render(RenderArgs),
    /// List the families of a font catalog.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Settings JSON (camelCase fields, all optional).
    #[arg(long)]
    settings: PathBuf,

    /// Background image (PNG, JPEG, ...).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Font catalog JSON (`{ "items": [...] }`).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Offline font mirror: `<Family_Name>-<weight>.css` stylesheets plus font files.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Directory the exported PNG is written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Also write the full-resolution frame to this PNG path.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Print the face used for the title (family, weight, SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font catalog JSON (`{ "items": [...] }`).
    #[arg(long)]
    catalog: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = covergen::Settings::from_path(&args.settings)?;
    let catalog = match &args.catalog {
        Some(path) => covergen::FontCatalog::from_path(path)?,
        None => covergen::FontCatalog::default(),
    };
    let source: Box<dyn covergen::FontSource> = match &args.fonts_dir {
        Some(dir) => Box::new(covergen::DirFontSource::new(dir)),
        None => Box::new(covergen::NoFontSource),
    };
    let fonts = covergen::FontState::new(catalog, covergen::FontRegistry::new(), source);
    let size = covergen::FrameSize::new(args.width, args.height)?;

    let mut session = covergen::Session::with_settings(size, fonts, settings.clone())?;
    match &args.image {
        Some(path) => {
            session.upload_image(covergen::load_image(path)?)?;
            // Uploading resets the zoom; restore the requested one.
            session.update(|s| s.image_scale = settings.image_scale)?;
        }
        None => session.render()?,
    }

    if args.dump_fonts {
        dump_font_diagnostics(&session);
    }

    if let Some(preview) = &args.preview {
        let full = session.frame().to_rgba_image()?;
        covergen::write_png(&full, preview)
            .with_context(|| format!("write preview '{}'", preview.display()))?;
        eprintln!("wrote {}", preview.display());
    }

    let out = session.export(&args.out_dir)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let catalog = covergen::FontCatalog::from_path(&args.catalog)?;
    for entry in catalog.entries() {
        let bold = if catalog.capability(&entry.family).supports_bold() {
            "bold"
        } else {
            "-"
        };
        println!("{}\t{bold}", entry.label());
    }
    Ok(())
}

fn dump_font_diagnostics(session: &covergen::Session) {
    eprintln!("text font diagnostics:");
    eprintln!("  request: {}", covergen::font_shorthand(session.settings()));
    match session.last_face() {
        Some(face) => {
            eprintln!("  family:  {}", face.family);
            eprintln!("  weight:  {}", face.weight);
            eprintln!("  origin:  {:?}", face.origin);
            eprintln!("  sha256:  {}", sha256_hex(&face.bytes));
        }
        None => eprintln!("  no face resolved, title not drawn"),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
