//! dieline CLI - compile annotated packaging designs
//!
//! Reads design documents (a raster size plus typed strokes), classifies raw
//! detected paths, validates and snaps creases, and writes the compiled
//! panel/hinge model as JSON or an SVG preview.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use dieline_compiler::{
    classify, classify_with_raster, compile, is_curved, model_to_svg, promote_to_curve,
    snap_crease, strokes_to_svg, validate_creases, CompileSettings, DetectedPath,
};
use dieline_ir::{Annotations, Design, RasterSize, StrokeKind, StrokeRecord, StrokeSet};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "dieline")]
#[command(about = "Compile annotated packaging dielines into panel/hinge models", long_about = None)]
struct Cli {
    /// Config file (default: ./dieline.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a design into a panel/hinge model
    Compile {
        /// Input design JSON
        input: PathBuf,
        /// Output model JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write an SVG preview of the model
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Type raw detected paths and write a design
    Classify {
        /// JSON array of paths (`{"points": [...], "closed": false}`)
        input: PathBuf,
        /// Raster image to sample stroke colors from
        #[arg(long)]
        image: Option<PathBuf>,
        /// Raster width when no image is given
        #[arg(long, required_unless_present = "image")]
        width: Option<u32>,
        /// Raster height when no image is given
        #[arg(long, required_unless_present = "image")]
        height: Option<u32>,
        /// Output design JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that every crease ends on a cut line
    Validate {
        /// Input design JSON
        input: PathBuf,
    },
    /// Snap crease endpoints onto nearby cut lines
    Snap {
        /// Input design JSON
        input: PathBuf,
        /// Output design JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace a stroke's points with a fitted curve
    Curve {
        /// Input design JSON
        input: PathBuf,
        /// Id of the stroke to promote
        #[arg(short, long)]
        stroke: String,
        /// Output design JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render an SVG preview of a design's strokes
    Svg {
        /// Input design JSON
        input: PathBuf,
        /// Output SVG (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Display information about a design
    Info {
        /// Input design JSON
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::resolve(cli.config.as_deref())?;
    let settings = &config.compile;

    match cli.command {
        Commands::Compile { input, output, svg } => {
            compile_design(&input, output.as_deref(), svg.as_deref(), settings)?;
        }
        Commands::Classify {
            input,
            image,
            width,
            height,
            output,
        } => {
            classify_paths(&input, image.as_deref(), width, height, output.as_deref(), settings)?;
        }
        Commands::Validate { input } => {
            validate_design(&input, settings)?;
        }
        Commands::Snap { input, output } => {
            snap_design(&input, output.as_deref(), settings)?;
        }
        Commands::Curve {
            input,
            stroke,
            output,
        } => {
            curve_stroke(&input, &stroke, output.as_deref(), settings)?;
        }
        Commands::Svg { input, output } => {
            let (design, strokes) = load_design(&input)?;
            write_output(output.as_deref(), &strokes_to_svg(&strokes, design.raster))?;
        }
        Commands::Info { input } => {
            show_info(&input, settings)?;
        }
    }

    Ok(())
}

fn load_design(path: &Path) -> Result<(Design, StrokeSet)> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let design =
        Design::from_json(&json).with_context(|| format!("parsing design {}", path.display()))?;
    let strokes = design.annotations.to_stroke_set()?;
    Ok((design, strokes))
}

fn save_design(output: Option<&Path>, mut design: Design, strokes: &StrokeSet) -> Result<()> {
    design.annotations = Annotations::from_stroke_set(strokes);
    write_output(output, &design.to_json()?)
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn compile_design(
    input: &Path,
    output: Option<&Path>,
    svg: Option<&Path>,
    settings: &CompileSettings,
) -> Result<()> {
    let (design, strokes) = load_design(input)?;
    let result = compile(&strokes, design.raster, settings)?;

    for w in &result.warnings {
        eprintln!("warning: {w}");
    }
    for m in &result.validation.messages {
        eprintln!("invalid: {m}");
    }
    eprintln!(
        "Compiled {} panel(s), {} hinge(s), {} emboss region(s)",
        result.model.panels.len(),
        result.model.hinges.len(),
        result.model.emboss_regions.len()
    );

    if let Some(path) = svg {
        fs::write(path, model_to_svg(&result.model, design.raster))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    write_output(output, &result.model.to_json()?)
}

fn classify_paths(
    input: &Path,
    image: Option<&Path>,
    width: Option<u32>,
    height: Option<u32>,
    output: Option<&Path>,
    settings: &CompileSettings,
) -> Result<()> {
    let json = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let records: Vec<StrokeRecord> =
        serde_json::from_str(&json).with_context(|| format!("parsing paths {}", input.display()))?;
    let paths = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Ok(DetectedPath {
                id: r.id.clone(),
                points: r.points(&format!("path_{i}"))?,
                closed: r.closed,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (classification, raster) = match image {
        Some(path) => {
            let img = image::open(path)
                .with_context(|| format!("opening image {}", path.display()))?
                .to_rgba8();
            let raster = RasterSize::new(img.width(), img.height());
            (classify_with_raster(&paths, &img, &settings.classifier), raster)
        }
        None => {
            let raster = RasterSize::new(width.unwrap_or_default(), height.unwrap_or_default());
            (classify(&paths, &settings.classifier), raster)
        }
    };
    if raster.is_empty() {
        anyhow::bail!("raster size {}x{} is empty", raster.width, raster.height);
    }

    eprintln!(
        "Classified {} path(s): {} by color, {} by angle, {} curved",
        paths.len(),
        classification.by_color,
        classification.by_angle,
        classification.curved
    );
    save_design(output, Design::new(raster), &classification.strokes)
}

fn validate_design(input: &Path, settings: &CompileSettings) -> Result<()> {
    let (_, strokes) = load_design(input)?;
    let report = validate_creases(
        strokes.of_kind(StrokeKind::Crease),
        strokes.of_kind(StrokeKind::Cut),
        settings.crease_tolerance,
    );

    println!(
        "Creases: {} total, {} valid, {} invalid",
        report.total, report.valid, report.invalid
    );
    for m in &report.messages {
        println!("  {m}");
    }
    if !report.all_valid() {
        anyhow::bail!("{} crease(s) failed validation", report.invalid);
    }
    Ok(())
}

fn snap_design(input: &Path, output: Option<&Path>, settings: &CompileSettings) -> Result<()> {
    let (design, mut strokes) = load_design(input)?;
    let snapped: Vec<_> = strokes
        .of_kind(StrokeKind::Crease)
        .iter()
        .map(|c| snap_crease(c, strokes.of_kind(StrokeKind::Cut), settings.crease_tolerance))
        .collect();

    let mut moved = 0;
    for stroke in snapped {
        if strokes.find(&stroke.id) != Some(&stroke) {
            moved += 1;
        }
        strokes.replace(stroke);
    }
    eprintln!("Snapped {moved} crease(s)");
    save_design(output, design, &strokes)
}

fn curve_stroke(
    input: &Path,
    id: &str,
    output: Option<&Path>,
    settings: &CompileSettings,
) -> Result<()> {
    let (design, mut strokes) = load_design(input)?;
    let stroke = strokes
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("no stroke with id {id}"))?;
    let curved = promote_to_curve(stroke, settings.curve_segments_per_span)
        .with_context(|| format!("fitting a curve through {id}"))?;
    eprintln!(
        "Promoted {id}: {} -> {} point(s)",
        stroke.points.len(),
        curved.points.len()
    );
    strokes.replace(curved);
    save_design(output, design, &strokes)
}

fn show_info(input: &Path, settings: &CompileSettings) -> Result<()> {
    let (design, strokes) = load_design(input)?;

    println!("dieline design: {}", input.display());
    println!("  Version: {}", design.version);
    println!("  Raster: {}x{}", design.raster.width, design.raster.height);
    for kind in StrokeKind::ALL {
        let group = strokes.of_kind(kind);
        let curved = group.iter().filter(|s| is_curved(&s.points)).count();
        println!("  {kind}: {} stroke(s), {curved} curved", group.len());
    }

    match compile(&strokes, design.raster, settings) {
        Ok(result) => {
            println!("\nCompiled model:");
            println!("  Panels: {}", result.model.panels.len());
            println!("  Hinges: {}", result.model.hinges.len());
            for hinge in &result.model.hinges {
                let sides: Vec<String> = [&hinge.panel_a, &hinge.panel_b]
                    .into_iter()
                    .flatten()
                    .filter_map(|id| result.model.panel(id))
                    .map(|p| format!("{} ({:.0}x{:.0})", p.id, p.bounds.width(), p.bounds.height()))
                    .collect();
                println!("    {}: {}", hinge.id, sides.join(" <-> "));
            }
            println!(
                "  Valid creases: {}/{}",
                result.validation.valid, result.validation.total
            );
            println!("  Warnings: {}", result.warnings.len());
        }
        Err(e) => {
            println!("\nFailed to compile: {}", e);
        }
    }

    Ok(())
}
