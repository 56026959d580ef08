use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use common::LogOptions;

use asterism::canvas::load_base_image;
use asterism::prelude::*;

/// Draws constellation figures, catalog labels and a coordinate grid over a
/// plate-solved sky image.
#[derive(Debug, Parser)]
#[command(name = "asterism", version)]
struct Cli {
    /// World coordinate solution (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    wcs: PathBuf,

    /// Write the annotated image here.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print one line per labelled object to stdout.
    #[arg(short, long)]
    list: bool,

    /// Image to draw on; its size sets the canvas size.
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["width", "height"])]
    input: Option<PathBuf>,

    /// Output width in pixels when no input image is given.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Output pixels per WCS pixel.
    #[arg(short, long)]
    scale: Option<f64>,

    /// Annotation settings (YAML or JSON); flags below override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    constellations: bool,

    /// Label named bright stars.
    #[arg(long)]
    bright: bool,

    /// Keep only the N brightest stars.
    #[arg(long, value_name = "N")]
    bright_limit: Option<usize>,

    /// Only stars with a proper name.
    #[arg(long)]
    common_only: bool,

    #[arg(long)]
    ngc: bool,

    #[arg(long)]
    only_messier: bool,

    #[arg(long)]
    hd: bool,

    /// RA/Dec grid spacing in arcminutes.
    #[arg(long, value_name = "ARCMIN")]
    grid: Option<f64>,

    /// Catalog file (YAML or JSON); may be repeated.
    #[arg(long = "catalog", value_name = "FILE")]
    catalogs: Vec<PathBuf>,

    /// Stick figures in `# name` / `name ra dec name ra dec` format.
    #[arg(long, value_name = "FILE")]
    custom_lines: Option<PathBuf>,

    /// Ephemeris objects, one `name ra dec` per line.
    #[arg(long, value_name = "FILE")]
    ephemeris: Option<PathBuf>,

    /// Custom objects, one `name ra dec` per line.
    #[arg(long, value_name = "FILE")]
    custom_objects: Option<PathBuf>,

    /// Write binary PPM instead of PNG.
    #[arg(long)]
    ppm: bool,

    /// Print the annotation report as JSON to stderr.
    #[arg(long)]
    json: bool,

    /// Horizontal label alignment: L, C or R.
    #[arg(long)]
    halign: Option<HAlign>,

    /// Vertical label alignment: T, C or B.
    #[arg(long)]
    valign: Option<VAlign>,

    /// Circle labelled stars and objects.
    #[arg(long)]
    markers: bool,

    /// Also log to a daily file in this directory.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn has_user_sources(&self) -> bool {
        self.custom_lines.is_some() || self.ephemeris.is_some() || self.custom_objects.is_some()
    }

    fn annotate_config(&self) -> Result<AnnotateConfig> {
        let mut config = match &self.config {
            Some(path) => AnnotateConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnnotateConfig::default(),
        };

        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(halign) = self.halign {
            config.halign = halign;
        }
        if let Some(valign) = self.valign {
            config.valign = valign;
        }
        if self.grid.is_some() {
            config.grid.spacing_arcmin = self.grid;
        }
        if let Some(limit) = self.bright_limit {
            config.bright_stars.limit = limit;
        }
        config.constellations.enabled |= self.constellations;
        config.bright_stars.enabled |= self.bright;
        config.bright_stars.common_only |= self.common_only;
        config.ngc.enabled |= self.ngc;
        config.ngc.only_messier |= self.only_messier;
        config.hd.enabled |= self.hd;
        config.json |= self.json;
        config.draw_markers |= self.markers;

        config.validate().context("Invalid annotation settings")?;
        Ok(config)
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn usage_error(kind: ErrorKind, message: &str) -> ! {
    Cli::command().error(kind, message).exit()
}

fn load_catalogs(paths: &[PathBuf]) -> Catalog {
    let mut catalog = Catalog::default();
    for path in paths {
        match Catalog::load(path) {
            Ok(loaded) => catalog.merge(loaded),
            Err(err) => tracing::warn!(path = %path.display(), %err, "Skipping catalog"),
        }
    }
    catalog
}

/// Canvas size in output pixels: the input image's, the explicit size, or
/// the solution's image size times `scale`.
fn canvas_size(
    cli: &Cli,
    wcs: &Wcs,
    base: Option<&image::RgbaImage>,
    scale: f64,
) -> Result<(usize, usize)> {
    if let Some(image) = base {
        return Ok((image.width() as usize, image.height() as usize));
    }
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        return Ok((width as usize, height as usize));
    }
    let [width, height] = wcs
        .image_size
        .context("No image size: pass --input, --width/--height, or set image_size in the WCS")?;
    Ok((
        (width as f64 * scale).round() as usize,
        (height as f64 * scale).round() as usize,
    ))
}

fn write_output(path: &Path, image: &image::RgbaImage, ppm: bool) -> Result<()> {
    let written = if ppm {
        PpmSink::new(path).write_image(image)
    } else {
        PngSink::new(path).write_image(image)
    };
    written.with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::setup_logging(&LogOptions {
        base_level: cli.log_level().to_string(),
        log_dir: cli.log_dir.clone(),
    });

    let config = cli.annotate_config()?;
    if !config.any_catalog_overlay() && !cli.has_user_sources() {
        usage_error(ErrorKind::MissingRequiredArgument, "No overlay selected");
    }
    if cli.output.is_none() && !cli.list {
        usage_error(
            ErrorKind::MissingRequiredArgument,
            "Nothing to produce: pass --output and/or --list",
        );
    }

    let wcs: Wcs = common::load_file(&cli.wcs)
        .with_context(|| format!("Failed to load WCS {}", cli.wcs.display()))?;
    let base = cli
        .input
        .as_deref()
        .map(load_base_image)
        .transpose()
        .context("Failed to load input image")?;
    let (width, height) = canvas_size(&cli, &wcs, base.as_ref(), config.scale)?;
    let catalog = load_catalogs(&cli.catalogs);

    let mut canvas = LayeredCanvas::new(width, height, config.scale)?;
    let mut text = CosmicTextRenderer::new();
    let output = {
        let mut annotator = Annotator::new(&config, &wcs, &mut canvas, &mut text);
        annotator.draw_catalog_overlays(&catalog);
        if let Some(path) = &cli.custom_lines {
            annotator.draw_custom_figures(path);
        }
        if let Some(path) = &cli.ephemeris {
            annotator.draw_user_point_file(path, UserPointKind::Ephemeris);
        }
        if let Some(path) = &cli.custom_objects {
            annotator.draw_user_point_file(path, UserPointKind::Custom);
        }
        annotator.finish()
    };
    tracing::info!(
        labelled = output.list.len(),
        segments = output.figures.segments_drawn,
        suppressed = output.figures.segments_suppressed,
        "Annotation pass done"
    );

    if cli.list {
        for line in &output.list {
            println!("{line}");
        }
    }
    if config.json {
        eprintln!("{}", output.report().to_json()?);
    }
    if let Some(path) = &cli.output {
        let image = canvas.flatten(base.as_ref())?;
        write_output(path, &image, cli.ppm)?;
        tracing::info!(path = %path.display(), width, height, "Wrote annotated image");
    }

    Ok(())
}
