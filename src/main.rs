#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use binary_time::constants::{canvas, refresh};
use binary_time::render::{Rect, render, render_text};
use binary_time::store::resolve_store_dir;
use binary_time::{
    ClockReading, DisplaySize, FileBackend, MarkerShape, RepresentationMode, RgbaColor,
    StyleEditor, StyleStore, accessibility_label,
};

#[derive(Debug, Parser)]
#[command(name = "binary-time", version, about = "Binary clock matrices and per-size widget styles")]
struct Cli {
    /// Directory holding the per-size style records
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the binary matrices and spoken label for one instant
    Now {
        #[command(flatten)]
        clock: ClockArgs,
        /// Include the day/month matrix
        #[arg(long)]
        date: bool,
        /// Emit JSON instead of a text preview
        #[arg(long)]
        json: bool,
    },
    /// Print the drawing primitives for one instant as JSON
    Render {
        #[arg(long, default_value = "small")]
        size: DisplaySize,
        #[arg(long, default_value_t = canvas::DEFAULT_WIDTH)]
        width: f64,
        #[arg(long, default_value_t = canvas::DEFAULT_HEIGHT)]
        height: f64,
        /// Draw the day/month matrix instead of the time
        #[arg(long)]
        date: bool,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Re-print the preview on a fixed interval
    Watch {
        #[arg(long, default_value = "small")]
        size: DisplaySize,
        #[arg(long, default_value_t = refresh::PREVIEW_INTERVAL_SECS)]
        interval_secs: u64,
        #[arg(long)]
        date: bool,
        #[arg(long, value_parser = parse_offset)]
        offset: Option<FixedOffset>,
    },
    /// Inspect or edit the saved style for a display size
    #[command(subcommand)]
    Style(StyleCommand),
}

#[derive(Debug, Args)]
struct ClockArgs {
    /// RFC 3339 instant (defaults to now)
    #[arg(long)]
    at: Option<DateTime<FixedOffset>>,
    /// UTC offset such as +02:00 (defaults to the local zone)
    #[arg(long, value_parser = parse_offset)]
    offset: Option<FixedOffset>,
}

impl ClockArgs {
    fn reading(&self) -> ClockReading {
        let instant = self.at.map(|t| t.with_timezone(&Utc)).unwrap_or_else(Utc::now);
        read_clock(&instant, self.offset)
    }
}

#[derive(Debug, Subcommand)]
enum StyleCommand {
    /// Print the resolved style as JSON
    Show {
        #[arg(long)]
        size: DisplaySize,
    },
    /// Remove the saved style so defaults apply again
    Reset {
        #[arg(long)]
        size: DisplaySize,
    },
    /// Change individual fields and save
    Set(SetArgs),
}

#[derive(Debug, Args)]
struct SetArgs {
    #[arg(long)]
    size: DisplaySize,
    #[arg(long)]
    representation: Option<RepresentationMode>,
    #[arg(long)]
    marker_shape: Option<MarkerShape>,
    /// Background as #RRGGBB or #RRGGBBAA
    #[arg(long, value_parser = parse_color)]
    background: Option<RgbaColor>,
    /// Line color as INDEX=HEX (index 0-3), repeatable
    #[arg(long = "line-color", value_parser = parse_indexed_color)]
    line_colors: Vec<(usize, RgbaColor)>,
    #[arg(long)]
    line_width: Option<f64>,
    #[arg(long)]
    marker_size: Option<f64>,
    #[arg(long)]
    amplitude: Option<f64>,
    #[arg(long)]
    spacing: Option<f64>,
    #[arg(long)]
    padding: Option<f64>,
    #[arg(long)]
    horizontal_padding: Option<f64>,
    #[arg(long)]
    bar_max: Option<f64>,
    #[arg(long)]
    bar_min: Option<f64>,
    #[arg(long)]
    bar_radius: Option<f64>,
    #[arg(long)]
    bar_spacing: Option<f64>,
}

fn read_clock(instant: &DateTime<Utc>, offset: Option<FixedOffset>) -> ClockReading {
    match offset {
        Some(zone) => ClockReading::at(instant, &zone),
        None => ClockReading::at(instant, &Local),
    }
}

fn parse_offset(s: &str) -> Result<FixedOffset, String> {
    let s = s.trim();
    let s = if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        "+00:00"
    } else {
        s
    };
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(format!("offset '{s}' must start with + or -")),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("offset '{s}' must look like +HH:MM"));
    }
    let hours: i32 = digits[..2].parse().map_err(|e| format!("{e}"))?;
    let minutes: i32 = digits[2..].parse().map_err(|e| format!("{e}"))?;
    if minutes >= 60 {
        return Err(format!("offset '{s}' has invalid minutes"));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset '{s}' is out of range"))
}

fn parse_color(s: &str) -> Result<RgbaColor, String> {
    RgbaColor::parse_hex(s).ok_or_else(|| format!("'{s}' is not a #RRGGBB or #RRGGBBAA color"))
}

fn parse_indexed_color(s: &str) -> Result<(usize, RgbaColor), String> {
    let (index, hex) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' must look like INDEX=HEX"))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("'{index}' is not a line index"))?;
    if index > 3 {
        return Err(format!("line index {index} must be between 0 and 3"));
    }
    Ok((index, parse_color(hex)?))
}

fn print_preview(reading: &ClockReading, with_date: bool) {
    let time = reading.time_matrix();
    let date = with_date.then(|| reading.date_matrix());
    println!("{}", render_text(&time));
    if let Some(date) = &date {
        println!();
        println!("{}", render_text(date));
    }
    println!("{}", accessibility_label(&time, date.as_ref()));
}

fn apply_set_args(args: &SetArgs, store: &StyleStore<FileBackend>) -> Result<()> {
    let mut editor = StyleEditor::open(store, args.size);
    let changed = editor.update(|style| {
        if let Some(mode) = args.representation {
            style.set_representation(mode);
        }
        if let Some(shape) = args.marker_shape {
            style.marker_shape = shape;
        }
        if let Some(color) = args.background {
            style.background_color = color;
        }
        for (index, color) in &args.line_colors {
            style.line_colors[*index] = *color;
        }
        let fields = [
            (args.line_width, &mut style.line_width),
            (args.marker_size, &mut style.marker_size),
            (args.amplitude, &mut style.line_amplitude_percent),
            (args.spacing, &mut style.vertical_spacing),
            (args.padding, &mut style.widget_padding),
            (args.horizontal_padding, &mut style.horizontal_padding_percent),
        ];
        for (value, field) in fields {
            if let Some(v) = value {
                *field = v;
            }
        }

        let bar_edits = [args.bar_max, args.bar_min, args.bar_radius, args.bar_spacing];
        if bar_edits.iter().any(Option::is_some) {
            let mut bar = style.resolved_bar_style();
            if let Some(v) = args.bar_max {
                bar.bar_max_height_percent = v;
            }
            if let Some(v) = args.bar_min {
                bar.bar_min_height_percent = v;
            }
            if let Some(v) = args.bar_radius {
                bar.bar_corner_radius = v;
            }
            if let Some(v) = args.bar_spacing {
                bar.bar_spacing = v;
            }
            style.bar = Some(bar);
        }

        let corrected = style.validate_and_clamp();
        if !corrected.is_empty() {
            warn!(fields = ?corrected, "Some values were out of range and have been adjusted");
        }
    });

    if changed {
        info!(size = %args.size, "Style updated");
    } else {
        info!(size = %args.size, "Style unchanged");
    }
    let json = serde_json::to_string_pretty(editor.style()).context("Failed to serialize style")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let cli = Cli::parse();
    let store_dir = resolve_store_dir(cli.store_dir.clone());
    debug!(path = %store_dir.display(), "Using style store");
    let store = StyleStore::new(FileBackend::new(store_dir));

    match cli.command {
        Command::Now { clock, date, json } => {
            let reading = clock.reading();
            if json {
                let time = reading.time_matrix();
                let date_matrix = date.then(|| reading.date_matrix());
                let out = serde_json::json!({
                    "reading": reading,
                    "time": time,
                    "date": date_matrix,
                    "label": accessibility_label(&time, date_matrix.as_ref()),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_preview(&reading, date);
            }
        }
        Command::Render { size, width, height, date, clock } => {
            if !(width > 0.0 && height > 0.0) {
                bail!("canvas must have a positive width and height (got {width}x{height})");
            }
            let reading = clock.reading();
            let matrix = if date { reading.date_matrix() } else { reading.time_matrix() };
            let style = store.load(size);
            let primitives = render(&matrix, &style, Rect::new(0.0, 0.0, width, height));
            println!(
                "{}",
                serde_json::to_string_pretty(&primitives).context("Failed to serialize primitives")?
            );
        }
        Command::Watch { size, interval_secs, date, offset } => {
            if interval_secs == 0 {
                bail!("--interval-secs must be at least 1");
            }
            info!(size = %size, interval_secs, "Watching clock (Ctrl+C to stop)");
            loop {
                // Reload every tick so edits from another process show up
                let style = store.load(size);
                let reading = read_clock(&Utc::now(), offset);
                debug!(representation = %style.representation, "Tick");
                print_preview(&reading, date);
                println!();
                std::thread::sleep(Duration::from_secs(interval_secs));
            }
        }
        Command::Style(StyleCommand::Show { size }) => {
            let style = store.load(size);
            println!("{}", serde_json::to_string_pretty(&style).context("Failed to serialize style")?);
        }
        Command::Style(StyleCommand::Reset { size }) => {
            let mut editor = StyleEditor::open(&store, size);
            if !editor.reset() {
                let path = store.backend().record_path(&size.style_key());
                bail!("failed to remove {}", path.display());
            }
            println!("Reset style for {size}");
        }
        Command::Style(StyleCommand::Set(args)) => apply_set_args(&args, &store)?,
    }

    Ok(())
}
