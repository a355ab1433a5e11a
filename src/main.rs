use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod geometry;
mod pipeline;
mod raster;
mod stl;
mod style;

use config::FileConfig;
use pipeline::{NoProgress, PROGRESS_COUNT, ProgressSink, RunOutput};
use style::Style;

/// Generate normal map images from STL files
///
/// Examples:
///   # Convert model.stl to model.png on the default 512x512 canvas
///   stl2normalmap model.stl
///
///   # Pick the output path, size and style
///   stl2normalmap model.stl -o normal.png -W 1024 -H 1024 --style war-thunder
///
///   # Use a config file
///   stl2normalmap --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "stl2normalmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input STL file path (optional if set in the config file)
    input: Option<PathBuf>,

    /// Path to config file (optional, auto-searches stl2normalmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG file path (defaults to the input path with a .png extension)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Intended output width in pixels; may shrink to preserve aspect ratio
    #[arg(short = 'W', long, default_value = "512", value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Intended output height in pixels; may shrink to preserve aspect ratio
    #[arg(short = 'H', long, default_value = "512", value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Normal-to-color style
    #[arg(long, value_enum, default_value = "standard")]
    style: Style,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable the progress bars
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };

    let input = args
        .input
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.input.clone()));
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()));
    let width = if args.width != 512 {
        args.width
    } else {
        file_config.as_ref().map(|c| c.width).unwrap_or(512)
    };
    let height = if args.height != 512 {
        args.height
    } else {
        file_config.as_ref().map(|c| c.height).unwrap_or(512)
    };
    let style = if args.style != Style::Standard {
        args.style
    } else {
        file_config
            .as_ref()
            .map(|c| c.style)
            .unwrap_or(Style::Standard)
    };
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);

    let Some(input) = input else {
        bail!("Must provide an input STL file (argument or config file)");
    };

    let output_path = force_png_extension(output.unwrap_or_else(|| input.with_extension("png")));

    println!("stl2normalmap - STL Normal Map Generator");
    println!("========================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Output: {}", output_path.display());
        println!("  Requested size: {}x{}", width, height);
        println!("  Style: {:?}", style);
        println!();
    }

    let spinner = create_spinner("Reading STL file...");
    let start = Instant::now();
    let model = stl::read_stl(&input)?;
    spinner.finish_with_message(format!(
        "Read {} facets [{:.1}s]",
        model.facet_count(),
        start.elapsed().as_secs_f32()
    ));

    let start = Instant::now();
    let out = if args.quiet {
        pipeline::run(&model, width, height, style, &NoProgress)?
    } else {
        let bars = PhaseBars::new();
        let result = pipeline::run(&model, width, height, style, &bars);
        bars.finish();
        result?
    };
    println!(
        "Rasterized {}x{} image [{:.1}s]",
        out.plan.width,
        out.plan.height,
        start.elapsed().as_secs_f32()
    );

    if verbose {
        print_run_details(&out);
    }

    let spinner = create_spinner("Writing PNG file...");
    let start = Instant::now();
    raster::write_png(&output_path, &out.image)?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        output_path.display(),
        start.elapsed().as_secs_f32()
    ));

    if out.counts.any() {
        println!();
        println!(
            "Warning: {} invalid polygon(s) ignored, {} upright polygon(s) ignored.",
            out.counts.invalid, out.counts.upright
        );
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());

    Ok(())
}

fn print_run_details(out: &RunOutput) {
    println!("  STL minimum X: {}", out.bounds.min_x);
    println!("  STL minimum Y: {}", out.bounds.min_y);
    println!("  STL maximum X: {}", out.bounds.max_x);
    println!("  STL maximum Y: {}", out.bounds.max_y);
    println!("  Scale: {}", out.plan.scale);
    println!();
}

/// Append `.png` when the output path carries any other (or no) extension.
fn force_png_extension(path: PathBuf) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => path,
        _ => {
            let mut raw = path.into_os_string();
            raw.push(".png");
            PathBuf::from(raw)
        }
    }
}

/// The four pipeline phase gauges rendered as indicatif bars.
struct PhaseBars {
    bars: [ProgressBar; PROGRESS_COUNT],
    _multi: MultiProgress,
}

impl PhaseBars {
    fn new() -> Self {
        let multi = MultiProgress::new();
        let labels = ["validate", "transform", "clear", "rasterize"];
        let bars = labels.map(|label| {
            let bar = multi.add(ProgressBar::new(1));
            bar.set_style(
                ProgressStyle::with_template("{msg:>10} [{bar:40.green}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("=> "),
            );
            bar.set_message(label);
            bar
        });
        Self {
            bars,
            _multi: multi,
        }
    }

    fn finish(&self) {
        for bar in &self.bars {
            bar.finish();
        }
    }
}

impl ProgressSink for PhaseBars {
    fn set_maximum(&self, index: usize, maximum: u64) {
        if let Some(bar) = self.bars.get(index) {
            bar.set_length(maximum);
        }
    }

    fn set_value(&self, index: usize, value: u64) {
        if let Some(bar) = self.bars.get(index) {
            bar.set_position(value);
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_png_extension() {
        assert_eq!(
            force_png_extension(PathBuf::from("out.png")),
            PathBuf::from("out.png")
        );
        assert_eq!(
            force_png_extension(PathBuf::from("out.PNG")),
            PathBuf::from("out.PNG")
        );
        assert_eq!(
            force_png_extension(PathBuf::from("out")),
            PathBuf::from("out.png")
        );
        assert_eq!(
            force_png_extension(PathBuf::from("out.tga")),
            PathBuf::from("out.tga.png")
        );
    }
}
