use hough_detector::{Detector, DetectorParams, Point, RunStats, Segment, State};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "hough_demo".to_string());
    let config = parse_args(&program)?;

    let img = image::open(&config.input_path)
        .map_err(|e| format!("Failed to open {}: {e}", config.input_path.display()))?
        .to_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut params = DetectorParams::default();
    if let Some(value) = config.channel_width {
        params.channel_width = value;
    }
    if let Some(value) = config.max_gap {
        params.max_gap = value;
    }
    if let Some(value) = config.min_length {
        params.min_length = value;
    }
    params.seed = config.seed;

    let mut state = State::new(height, width, params.seed.unwrap_or_else(rand::random));
    let mut set_pixels = 0usize;
    for (x, y, pixel) in img.enumerate_pixels() {
        // Dark pixels count as ink.
        if pixel.0[0] < config.ink_threshold {
            state.mark_pending(Point::new(i64::from(x), i64::from(y)));
            set_pixels += 1;
        }
    }

    let detector = Detector::new(params);
    let detection = detector
        .find_segments_with_report(&mut state)
        .map_err(|e| format!("Detection failed: {e}"))?;

    let report = Report {
        width,
        height,
        set_pixels,
        latency_ms: detection.latency_ms,
        stats: detection.stats,
        segments: detection.segments,
    };

    if config.format.includes_text() {
        print_text_summary(&report);
    }

    if config.format.includes_json() {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        if let Some(path) = config.json_out {
            fs::write(&path, json)
                .map_err(|e| format!("Failed to write JSON report to {}: {e}", path.display()))?;
            println!("JSON report written to {}", path.display());
        } else {
            println!("{json}");
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Report {
    width: usize,
    height: usize,
    set_pixels: usize,
    latency_ms: f64,
    stats: RunStats,
    segments: Vec<Segment>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Both,
}

impl OutputFormat {
    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "both" => Ok(Self::Both),
            other => Err(format!("Unknown format '{other}'. Use text|json|both.")),
        }
    }

    fn includes_text(&self) -> bool {
        matches!(self, Self::Text | Self::Both)
    }

    fn includes_json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

struct CliConfig {
    input_path: PathBuf,
    format: OutputFormat,
    json_out: Option<PathBuf>,
    ink_threshold: u8,
    channel_width: Option<u32>,
    max_gap: Option<u32>,
    min_length: Option<u32>,
    seed: Option<u64>,
}

fn parse_args(program: &str) -> Result<CliConfig, String> {
    let mut args = env::args().skip(1);
    let mut input_path: Option<PathBuf> = None;
    let mut format = OutputFormat::Text;
    let mut json_out: Option<PathBuf> = None;
    let mut ink_threshold = 128u8;
    let mut channel_width: Option<u32> = None;
    let mut max_gap: Option<u32> = None;
    let mut min_length: Option<u32> = None;
    let mut seed: Option<u64> = None;

    fn parse_value<T: std::str::FromStr>(
        args: &mut impl Iterator<Item = String>,
        flag: &str,
        program: &str,
    ) -> Result<T, String> {
        let value = args
            .next()
            .ok_or_else(|| format!("{flag} expects a value\n{}", usage(program)))?;
        value
            .parse()
            .map_err(|_| format!("Invalid value '{value}' for {flag}"))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            "--format" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--format expects a value\n{}", usage(program)))?;
                format = OutputFormat::from_str(&value)?;
            }
            "--json-out" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--json-out expects a path\n{}", usage(program)))?;
                json_out = Some(PathBuf::from(value));
            }
            "--ink-threshold" => ink_threshold = parse_value(&mut args, &arg, program)?,
            "--channel-width" => channel_width = Some(parse_value(&mut args, &arg, program)?),
            "--max-gap" => max_gap = Some(parse_value(&mut args, &arg, program)?),
            "--min-length" => min_length = Some(parse_value(&mut args, &arg, program)?),
            "--seed" => seed = Some(parse_value(&mut args, &arg, program)?),
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'\n{}", usage(program)));
            }
            _ => {
                if input_path.is_some() {
                    return Err(format!(
                        "Unexpected positional argument '{arg}'\n{}",
                        usage(program)
                    ));
                }
                input_path = Some(PathBuf::from(arg));
            }
        }
    }

    let input_path = input_path.ok_or_else(|| usage(program))?;
    Ok(CliConfig {
        input_path,
        format,
        json_out,
        ink_threshold,
        channel_width,
        max_gap,
        min_length,
        seed,
    })
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <image.png> [--format text|json|both] [--json-out report.json]\n\
         \x20        [--ink-threshold n] [--channel-width n] [--max-gap n] [--min-length n] [--seed n]\n\
         \n\
         Detects line segments in an image and reports their endpoints.\n\
         Pixels darker than the ink threshold count as set.\n\
         Examples:\n\
         \x20 {program} drawing.png --format both --json-out drawing_report.json\n\
         \x20 {program} scan.png --min-length 25 --seed 7\n"
    )
}

fn print_text_summary(report: &Report) {
    println!("Detection summary");
    println!("  image: {}x{}", report.width, report.height);
    println!("  set pixels: {}", report.set_pixels);
    println!("  latency_ms: {:.3}", report.latency_ms);
    println!(
        "  scans: {} triggered, {} accepted, {} discarded",
        report.stats.scans_triggered, report.stats.scans_accepted, report.stats.scans_discarded
    );
    println!(
        "  segments: {} ({} before fusion)",
        report.segments.len(),
        report.stats.raw_segments
    );
    for segment in &report.segments {
        println!("    {segment}");
    }
}
