mod clock;
mod colors;
mod config;
mod help;
mod settings;
mod terminal;

use clap::Parser;
use config::{AlphaFalloff, ClockConfig, Mode};
use settings::Settings;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fractal-clock")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Fractal clock: the hands of a clock chained and repeated into a spirograph", long_about = None)]
struct Cli {
    /// Settings file (default: ~/.config/fractal-clock/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pattern mode: normal, star, nebula, blackhole
    #[arg(short, long)]
    mode: Option<String>,

    /// Hand length at the reference canvas width
    #[arg(short = 'l', long)]
    length: Option<f64>,

    /// Stroke width of the main hands
    #[arg(short = 'w', long)]
    width: Option<f64>,

    /// Number of rotated copies of the hand set
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    repetitions: Option<i64>,

    /// Chained polylines per repetition
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    connections: Option<i64>,

    /// Rotation rate of the pattern relative to the minute hand
    #[arg(short, long, allow_negative_numbers = true)]
    speed: Option<f64>,

    /// Fixed extra rotation of the whole pattern (radians)
    #[arg(long, allow_negative_numbers = true)]
    phase: Option<f64>,

    /// Milliseconds added to the wall clock
    #[arg(long, allow_negative_numbers = true)]
    time_shift: Option<i64>,

    /// Base hue (0-255)
    #[arg(long)]
    hue: Option<u8>,

    /// Saturation (0-255)
    #[arg(long)]
    saturation: Option<u8>,

    /// Brightness (0-255)
    #[arg(long)]
    lightness: Option<u8>,

    /// Alpha of the main level (0-255)
    #[arg(long)]
    alpha: Option<u8>,

    /// Fill alpha relative to stroke alpha (0-255)
    #[arg(long)]
    fill: Option<u8>,

    /// Hue travel across repetitions
    #[arg(long, allow_negative_numbers = true)]
    shift_repetitions: Option<f64>,

    /// Hue travel across connections
    #[arg(long, allow_negative_numbers = true)]
    shift_connections: Option<f64>,

    /// Horizontal origin (0-1)
    #[arg(long)]
    origin_left: Option<f64>,

    /// Vertical origin (0-1)
    #[arg(long)]
    origin_top: Option<f64>,

    /// Alpha progression: accumulate or decay
    #[arg(long)]
    falloff: Option<String>,

    /// Show a 12-hour time readout
    #[arg(short = 't', long)]
    show_time: bool,

    /// Draw the frame inputs as text
    #[arg(short, long)]
    debug: bool,

    /// Print a single frame to stdout (no interactive display)
    #[arg(short, long)]
    print: bool,

    /// Columns for print mode
    #[arg(long, default_value = "80")]
    cols: u16,

    /// Rows for print mode
    #[arg(long, default_value = "24")]
    rows: u16,

    /// Print mode without ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer the command line over the settings file
    fn apply(&self, config: &mut ClockConfig) {
        if let Some(mode) = &self.mode {
            config.mode = Mode::parse(mode);
        }
        if let Some(falloff) = &self.falloff {
            config.alpha_falloff = AlphaFalloff::parse(falloff);
        }
        if let Some(v) = self.length { config.hand_length = v; }
        if let Some(v) = self.width { config.hand_width = v; }
        if let Some(v) = self.repetitions { config.repetitions = v; }
        if let Some(v) = self.connections { config.connections = v; }
        if let Some(v) = self.speed { config.speed = v; }
        if let Some(v) = self.phase { config.phase = v; }
        if let Some(v) = self.time_shift { config.time_shift = v; }
        if let Some(v) = self.hue { config.color.hue = v; }
        if let Some(v) = self.saturation { config.color.saturation = v; }
        if let Some(v) = self.lightness { config.color.lightness = v; }
        if let Some(v) = self.alpha { config.color.alpha = v; }
        if let Some(v) = self.fill { config.color.fill = v; }
        if let Some(v) = self.shift_repetitions { config.color.shift.repetitions = v; }
        if let Some(v) = self.shift_connections { config.color.shift.connections = v; }
        if let Some(v) = self.origin_left { config.origin.left = v; }
        if let Some(v) = self.origin_top { config.origin.top = v; }
        config.show_time |= self.show_time;
        config.debug |= self.debug;
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = Settings::load(cli.config.as_deref()).clock;
    cli.apply(&mut config);

    if cli.print {
        let frame = clock::print_frame(config, cli.cols, cli.rows, clock::now_millis(), !cli.no_color);
        let mut out = io::stdout().lock();
        out.write_all(frame.as_bytes())?;
        return out.flush();
    }

    clock::run(config)
}
