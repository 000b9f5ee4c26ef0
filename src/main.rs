use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use inkstroke::kurbo::Point;
use inkstroke::{
    parse_samples, svg, ClassifierConfig, ShapeClassifier, StrokeConfig, StrokeController,
};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Clone, Copy, ValueEnum)]
enum Tool {
    /// Speed-driven width, round caps
    Pen,
    /// Chisel nib at 45°, flat caps
    Marker,
}

#[derive(Parser)]
#[command(name = "inkstroke", about = "Pointer samples to variable-width ink outlines")]
struct Cli {
    /// Sample file: one `x y t` per line (seconds), `#` starts a comment
    #[arg(short, long)]
    input: PathBuf,

    /// Output SVG path
    #[arg(short, long)]
    output: PathBuf,

    /// Drawing tool preset
    #[arg(long, value_enum, default_value = "pen")]
    tool: Tool,

    /// Nominal stroke width (preset default if omitted)
    #[arg(short = 'w', long)]
    width: Option<f64>,

    /// Content zoom factor (screen pixels per content unit)
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Input smoothing multiplier (0 = raw input)
    #[arg(long, default_value = "1.0")]
    smoothing: f64,

    /// Trailing taper length in points (0 = off)
    #[arg(long)]
    taper: Option<usize>,

    /// Recognize the stroke as a shape and draw the suggestion on top
    #[arg(long)]
    classify: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SubscriberBuilder::default().with_target(false).init();
    let cli = Cli::parse();

    let mut config = match cli.tool {
        Tool::Pen => StrokeConfig::pen(),
        Tool::Marker => StrokeConfig::marker(),
    };
    if let Some(width) = cli.width {
        config = config.with_base_width(width);
    }
    if let Some(taper) = cli.taper {
        config.taper_length = taper;
    }
    config.smoothing_multiplier = cli.smoothing;
    config = config.with_content_scale(cli.scale);
    config.validate()?;

    eprintln!();
    eprintln!("  inkstroke \u{00b7} {}", cli.input.display());
    eprintln!();

    let t_start = Instant::now();
    let samples = parse_samples(&std::fs::read_to_string(&cli.input)?)?;
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err("no samples in input".into());
    };
    let duration = last.time - first.time;
    eprintln!("  Load        {} samples over {:.2}s", samples.len(), duration);

    // Replay the recording as pointer events.
    let mut controller = StrokeController::new(config, ClassifierConfig::default());
    controller.pointer_down(first.pos, first.time, cli.scale);
    let mut frozen = 0;
    for sample in samples.get(1..samples.len() - 1).unwrap_or_default() {
        if let Some(frame) = controller.pointer_move(sample.pos, sample.time, cli.scale) {
            frozen += frame.frozen.len();
        }
    }
    let stroke = controller
        .pointer_up(last.pos, last.time, cli.scale)
        .ok_or("stroke was not in progress")?;
    let vertices: usize = stroke.polygons.iter().map(|p| p.len()).sum();
    eprintln!(
        "  Stroke      {} polygons ({} frozen while drawing) \u{00b7} {} vertices",
        stroke.polygons.len(),
        frozen,
        vertices,
    );

    let shape = if cli.classify {
        let classifier = ShapeClassifier::new(ClassifierConfig::default());
        let points: Vec<Point> = stroke.samples.iter().map(|s| s.pos).collect();
        let shape = classifier.classify(&points);
        match &shape {
            Some(shape) => eprintln!("  Shape       {}", shape.name()),
            None => eprintln!("  Shape       none"),
        }
        shape
    } else {
        None
    };

    std::fs::write(&cli.output, svg::to_document(&stroke.polygons, shape.as_ref()))?;

    eprintln!();
    eprintln!(
        "  \u{2713} {}  ({}ms)",
        cli.output.display(),
        t_start.elapsed().as_millis()
    );
    Ok(())
}
