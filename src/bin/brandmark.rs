//! Command-line front end for the logo compositor and template editor.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use brandmark_renderer::branding::BrandingResponse;
use brandmark_renderer::raster::svg_options;
use brandmark_renderer::session::{BrandingSession, JsonFileStore};
use brandmark_renderer::state::{CanvasBackground, FontFamily, TextAlign};
use brandmark_renderer::template::{
    COLOR_PRESETS, CategoryFilter, TemplateEditor, filter_templates, popular_templates,
};
use brandmark_renderer::{
    CompositorConfig, ExportFormat, LoadOutcome, LogoCompositor, SizePreset,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Composite a logo bitmap and export it as PNG or JPG
    Compose(ComposeArgs),
    /// List catalog templates
    Templates(TemplatesArgs),
    /// Rewrite a catalog template with a caption and colors
    Customize(CustomizeArgs),
    /// Store a backend response as the latest branding and export it
    Identity(IdentityArgs),
}

#[derive(Debug, Args)]
struct ComposeArgs {
    /// Logo bitmap to composite
    #[arg(short, long, value_name = "FILE")]
    logo: PathBuf,

    /// Company name used for the caption and file name
    #[arg(short, long, default_value = "")]
    name: String,

    /// Comma-separated palette; the first two colors seed the editor
    #[arg(long, value_delimiter = ',')]
    palette: Vec<String>,

    /// Logo size, percent
    #[arg(long)]
    size: Option<u32>,

    /// Rotation, degrees clockwise
    #[arg(long)]
    rotation: Option<u32>,

    /// Logo opacity, percent
    #[arg(long)]
    opacity: Option<u32>,

    /// Caption text (defaults to the company name)
    #[arg(long)]
    text: Option<String>,

    /// Hide the caption
    #[arg(long)]
    no_text: bool,

    #[arg(long)]
    font_size: Option<u32>,

    /// Font family display name, e.g. "Times New Roman"
    #[arg(long)]
    font: Option<String>,

    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    #[arg(long)]
    text_color: Option<String>,

    /// "transparent" or a hex color
    #[arg(long)]
    background: Option<String>,

    /// Draw the alignment grid
    #[arg(long)]
    grid: bool,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Resample to a fixed output size
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Compositor config JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

#[derive(Debug, Args)]
struct TemplatesArgs {
    /// "all" or a category id
    #[arg(short, long, default_value = "all")]
    category: String,

    /// Case-insensitive name or tag search
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only popular templates
    #[arg(long)]
    popular: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CustomizeArgs {
    /// Template id
    id: String,

    /// Caption text
    #[arg(short, long)]
    text: Option<String>,

    /// Tagline text
    #[arg(long)]
    subtext: Option<String>,

    /// Replacement colors in anchor order
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Named color preset, e.g. "Purple Pink"
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    text_size: Option<u32>,

    #[arg(long)]
    subtext_size: Option<u32>,

    /// Also rasterize a PNG preview at this size
    #[arg(long, value_name = "PX")]
    preview: Option<u32>,

    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

#[derive(Debug, Args)]
struct IdentityArgs {
    /// Backend response body (either shape)
    #[arg(short, long, value_name = "FILE")]
    response: PathBuf,

    /// Directory holding latest_branding.json
    #[arg(long, default_value = ".")]
    store: PathBuf,

    /// Write <brand>-identity.json here
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpg => ExportFormat::Jpg,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Favicon,
    Social,
    Print,
    Hd,
}

impl From<PresetArg> for SizePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Favicon => SizePreset::Favicon,
            PresetArg::Social => SizePreset::Social,
            PresetArg::Print => SizePreset::Print,
            PresetArg::Hd => SizePreset::Hd,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for TextAlign {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => TextAlign::Left,
            AlignArg::Center => TextAlign::Center,
            AlignArg::Right => TextAlign::Right,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compose(args) => compose(args),
        Command::Templates(args) => templates(args),
        Command::Customize(args) => customize(args),
        Command::Identity(args) => identity(args),
    }
}

fn compose(args: ComposeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CompositorConfig::from_json(&json)?
        }
        None => CompositorConfig::default(),
    };

    let mut editor = LogoCompositor::for_brand(&args.name, &args.palette, config);
    let outcome = editor
        .load_path(&args.logo)
        .with_context(|| format!("failed to load logo {}", args.logo.display()))?;
    if outcome != LoadOutcome::Installed {
        bail!("logo {} was not installed", args.logo.display());
    }

    let font = match &args.font {
        Some(name) => {
            Some(FontFamily::from_name(name).ok_or_else(|| anyhow!("unknown font {name:?}"))?)
        }
        None => None,
    };
    let background = match args.background {
        Some(value) => Some(CanvasBackground::try_from(value).map_err(|e| anyhow!(e))?),
        None => None,
    };

    editor.update(|state| {
        if let Some(size) = args.size {
            state.set_logo_size(size);
        }
        if let Some(degrees) = args.rotation {
            state.set_rotation(degrees);
        }
        if let Some(opacity) = args.opacity {
            state.set_opacity(opacity);
        }
        if let Some(px) = args.font_size {
            state.set_font_size(px);
        }
        if let Some(text) = args.text {
            state.text = text;
        }
        if let Some(color) = &args.text_color {
            state.set_text_color(color);
        }
        if let Some(font) = font {
            state.font_family = font;
        }
        if let Some(align) = args.align {
            state.text_align = align.into();
        }
        if let Some(background) = background {
            state.canvas_background = background;
        }
        state.show_text = !args.no_text;
        state.show_grid = args.grid;
    });

    let format = ExportFormat::from(args.format);
    let file = match args.preset {
        Some(preset) => editor.export_sized(format, preset.into())?,
        None => editor.export(format)?,
    }
    .context("compositor has no rendered surface")?;

    fs::create_dir_all(&args.out)?;
    let path = file.write_to_dir(&args.out)?;
    println!("{}", path.display());
    Ok(())
}

fn templates(args: TemplatesArgs) -> Result<()> {
    let category = CategoryFilter::parse(&args.category)
        .ok_or_else(|| anyhow!("unknown category {:?}", args.category))?;
    let mut found = filter_templates(category, &args.search);
    if args.popular {
        let popular = popular_templates();
        found.retain(|t| popular.iter().any(|p| p.id == t.id));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    info!(category = category.display_name(), count = found.len(), "templates");
    for template in found {
        let star = if template.is_popular { "*" } else { " " };
        println!(
            "{star} {:<20} {:<14} {:<12} {}",
            template.id,
            template.category.id(),
            template.style,
            template.tags.join(", ")
        );
    }
    Ok(())
}

fn customize(args: CustomizeArgs) -> Result<()> {
    let mut editor =
        TemplateEditor::open(&args.id).ok_or_else(|| anyhow!("unknown template {:?}", args.id))?;

    if let Some(name) = &args.preset {
        let preset = COLOR_PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("unknown color preset {name:?}"))?;
        editor.apply_preset(preset);
    }
    for (index, color) in args.colors.iter().enumerate() {
        if !editor.set_color(index, color) {
            bail!("color {color:?} is not a valid hex color for slot {index}");
        }
    }
    if let Some(text) = args.text {
        editor.set_custom_text(text);
    }
    if let Some(text) = args.subtext {
        editor.set_custom_subtext(text);
    }
    if let Some(px) = args.text_size {
        editor.set_text_size(px);
    }
    if let Some(px) = args.subtext_size {
        editor.set_subtext_size(px);
    }

    fs::create_dir_all(&args.out)?;
    let svg = editor.export_svg();
    println!("{}", svg.write_to_dir(&args.out)?.display());

    if let Some(size) = args.preview {
        let image = editor
            .render_preview(size, &svg_options(true))
            .context("template preview could not be rendered")?;
        let stem = svg.file_name.trim_end_matches(".svg");
        let path = args.out.join(format!("{stem}-preview.png"));
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", path.display());
    }
    Ok(())
}

fn identity(args: IdentityArgs) -> Result<()> {
    let body = fs::read_to_string(&args.response)
        .with_context(|| format!("failed to read {}", args.response.display()))?;
    let response = BrandingResponse::from_backend_json(&body).context("unrecognized response")?;

    let store = JsonFileStore::in_dir(&args.store);
    let session = BrandingSession::start(store, response)?;
    println!("{}", session.store().path().display());

    let theme = session.theme();
    info!(
        company = session.company_name(),
        primary = %theme.primary,
        secondary = %theme.secondary,
        colors = session.palette_colors().len(),
        "branding stored"
    );

    if let Some(dir) = &args.export {
        fs::create_dir_all(dir)?;
        let path = session.export_json()?.write_to_dir(dir)?;
        println!("{}", path.display());
    }
    Ok(())
}
