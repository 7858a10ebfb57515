use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "placard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a spec to a PNG at native resolution.
    Render(RenderArgs),
    /// Print the resolved spec, derived labels and export name.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input spec JSON. Omitted fields take their defaults; without --in the
    /// built-in default spec renders.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output PNG path. Defaults to image_{width}_{height}.png.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Font file to register (repeatable). Required whenever the spec draws
    /// text (overlay or dimension label).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Also write a preview PNG scaled to fit this edge length.
    #[arg(long)]
    preview_max: Option<u32>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input spec JSON; without it the default spec is probed.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn read_spec_json(path: Option<&Path>) -> anyhow::Result<placard::RenderSpec> {
    let Some(path) = path else {
        return Ok(placard::RenderSpec::default());
    };
    let f = File::open(path).with_context(|| format!("open spec '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: placard::RenderSpec =
        serde_json::from_reader(r).with_context(|| "parse spec JSON")?;
    Ok(spec)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = read_spec_json(args.in_path.as_deref())?;
    spec.validate()?;

    let mut surface = placard::PixmapSurface::new();
    for font_path in &args.fonts {
        let bytes = std::fs::read(font_path)
            .with_context(|| format!("read font '{}'", font_path.display()))?;
        let family = surface
            .register_font(bytes)
            .with_context(|| format!("register font '{}'", font_path.display()))?;
        eprintln!("registered font family '{family}'");
    }

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(placard::export::file_name(spec.width, spec.height)));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    if let Some(max_edge) = args.preview_max {
        let scale = placard::preview_scale(spec.width, spec.height, f64::from(max_edge));
        placard::render(&spec, &mut surface, scale)?;
        let frame = surface.to_frame()?;
        let preview_path = preview_path_for(&out);
        image::save_buffer_with_format(
            &preview_path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", preview_path.display()))?;
        eprintln!("wrote {}", preview_path.display());
    }

    placard::export::write_png(&spec, &mut surface, &out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn preview_path_for(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    out.with_file_name(format!("{stem}_preview.png"))
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let spec = read_spec_json(args.in_path.as_deref())?;
    spec.validate()?;

    println!("dimensions:   {} × {}", spec.width, spec.height);
    println!("aspect ratio: {}", spec.aspect_ratio_label());
    println!("style:        {}", spec.style.name());
    println!("text anchor:  {}", spec.text_position.name());
    println!(
        "overlay:      {}",
        if spec.overlay_text.trim().is_empty() {
            "(none)"
        } else {
            spec.overlay_text.trim()
        }
    );
    println!(
        "export file:  {}",
        placard::export::file_name(spec.width, spec.height)
    );
    Ok(())
}
