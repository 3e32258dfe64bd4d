//! Fractal clock: frame driver and per-frame pipeline
//!
//! Each tick samples the wall clock, maps it to hand angles, builds the hand
//! set and renders the fractal onto a braille canvas. Config edits from the
//! keyboard or mouse land between ticks, never inside one.

pub mod cache;
pub mod canvas;
pub mod controls;
pub mod fractal;
pub mod surface;
pub mod time;

use crate::colors::{Hsba, COLOR_MAX};
use crate::config::ClockConfig;
use crate::help::render_help_overlay;
use crate::terminal::{Input, Terminal};
use cache::CacheWatcher;
use canvas::{BrailleCanvas, DOTS_X, DOTS_Y};
use controls::Action;
use fractal::FrameContext;
use std::io;
use std::time::Instant;
use surface::Surface;
use time::TimeSample;

pub const FRAME_RATE: f32 = 30.0;

const READOUT_COLOR: Hsba = Hsba { h: 0.0, s: 0.0, b: 255.0, a: 200.0 };

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The clock's state that lives across frames
pub struct Clock {
    config: ClockConfig,
    watcher: CacheWatcher,
    canvas: BrailleCanvas,
}

impl Clock {
    /// Setup: size the canvas and pick the colour space
    pub fn new(config: ClockConfig, cols: u16, rows: u16) -> Self {
        let mut canvas = BrailleCanvas::for_cells(cols, rows);
        canvas.set_color_space(COLOR_MAX);
        Self {
            config,
            watcher: CacheWatcher::new(),
            canvas,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClockConfig {
        &mut self.config
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("Canvas resized to {}x{} cells", cols, rows);
        self.canvas.set_size(cols as u32 * DOTS_X, rows as u32 * DOTS_Y);
    }

    /// Draw one frame for the given wall clock time
    pub fn draw(&mut self, now: i64) {
        let config = self.config.sanitized();
        let (width, height) = self.canvas.size();
        let cache = self.watcher.refresh(&config, (width, height));
        let sample = TimeSample::at(now, config.timezone_offset, config.time_shift);
        let (w, h) = (width as f64, height as f64);
        let ctx = FrameContext::new(&config, &cache, &sample, (w, h));

        let polylines = fractal::render(&ctx);

        self.canvas.clear_background();
        fractal::paint(&mut self.canvas, &polylines, cache.scale);

        self.canvas.reset_transform();
        self.canvas.translate(w * 0.5, h * 0.5);

        if config.show_time {
            if let Some(readout) = sample.readout() {
                self.canvas.set_fill_color(READOUT_COLOR);
                self.canvas.draw_text(&readout, -0.45 * w, -0.45 * h);
            }
        }

        if config.debug {
            // Text takes the colour of the last, topmost polyline
            if let Some(last) = polylines.last() {
                self.canvas.set_fill_color(Hsba { a: COLOR_MAX, ..last.stroke });
            }
            self.canvas.draw_text(&fractal::debug_dump(&ctx), -0.4 * w, -0.4 * h);
        }
    }

    pub fn present(&self, term: &mut Terminal) {
        self.canvas.present(term);
    }
}

/// Render a single frame of `cols` x `rows` cells, with or without ANSI colours
pub fn print_frame(config: ClockConfig, cols: u16, rows: u16, now: i64, color: bool) -> String {
    let mut term = Terminal::offscreen(cols, rows);
    let mut clock = Clock::new(config, cols, rows);
    clock.draw(now);
    clock.present(&mut term);
    if color {
        term.to_ansi()
    } else {
        term.to_plain()
    }
}

/// Run the clock until the user quits
pub fn run(config: ClockConfig) -> io::Result<()> {
    let mut term = Terminal::new()?;
    term.clear_screen()?;

    let (mut cols, mut rows) = term.size();
    let mut clock = Clock::new(config, cols, rows);
    let mut paused = false;
    let mut show_help = false;
    let frame_time = 1.0 / FRAME_RATE;

    loop {
        let frame_start = Instant::now();

        let mut resized = None;
        while let Some(input) = term.check_input()? {
            match input {
                Input::Key(code) => match controls::handle_key(clock.config_mut(), code) {
                    Action::Quit => return Ok(()),
                    Action::TogglePause => paused = !paused,
                    Action::ToggleHelp => show_help = !show_help,
                    Action::None => {}
                },
                Input::Click(col, row) => {
                    controls::handle_click(clock.config_mut(), col, row, cols, rows);
                }
                Input::Resize(w, h) => resized = Some((w, h)),
            }
        }

        // Not every terminal reports resizes, so fall back to asking
        let (new_cols, new_rows) = resized
            .or_else(|| crossterm::terminal::size().ok())
            .unwrap_or((cols, rows));
        if new_cols != cols || new_rows != rows {
            cols = new_cols;
            rows = new_rows;
            term.resize(cols, rows);
            term.clear_screen()?;
            clock.resize(cols, rows);
        }

        if cols == 0 || rows == 0 {
            term.sleep(0.1);
            continue;
        }

        if !paused {
            clock.draw(now_millis());
        }

        term.clear();
        clock.present(&mut term);
        if show_help {
            let config = clock.config();
            let help = format!(
                "{}\n─────────────────────────\nmode {}  falloff {:?}\nrepetitions {}  connections {}",
                controls::HELP_TEXT, config.mode, config.alpha_falloff, config.repetitions, config.connections
            );
            render_help_overlay(&mut term, &help);
        }
        term.present()?;

        let elapsed = frame_start.elapsed().as_secs_f32();
        if elapsed < frame_time {
            term.sleep(frame_time - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    fn config() -> ClockConfig {
        ClockConfig {
            timezone_offset: 0,
            hand_length: 300.0,
            repetitions: 10,
            connections: 3,
            ..ClockConfig::default()
        }
    }

    #[test]
    fn frame_draws_braille() {
        let text = print_frame(config(), 60, 20, 1_000_000, false);
        assert_eq!(text.lines().count(), 20);
        assert!(text.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
    }

    #[test]
    fn same_time_same_frame() {
        for mode in Mode::ALL {
            let config = ClockConfig { mode, ..config() };
            assert_eq!(
                print_frame(config.clone(), 40, 12, 7_777_777, true),
                print_frame(config, 40, 12, 7_777_777, true)
            );
        }
    }

    #[test]
    fn readout_is_drawn_when_enabled() {
        let config = ClockConfig { show_time: true, ..config() };
        // 10:20:30
        let now = (10 * 3600 + 20 * 60 + 30) * 1000;
        assert!(print_frame(config, 60, 20, now, false).contains("10:20.30"));
    }

    #[test]
    fn debug_dump_is_drawn_when_enabled() {
        let config = ClockConfig { debug: true, ..config() };
        assert!(print_frame(config, 120, 60, 0, false).contains("\"calcs\""));
    }

    #[test]
    fn degenerate_config_still_draws() {
        let config = ClockConfig {
            repetitions: 0,
            connections: -2,
            speed: f64::NAN,
            ..config()
        };
        let text = print_frame(config, 30, 10, 123_456, false);
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn huge_hands_still_draw() {
        let long = ClockConfig { hand_length: 1e10, repetitions: 2, connections: 1, ..config() };
        assert_eq!(print_frame(long, 40, 12, 1_000_000, false).lines().count(), 12);

        let wide = ClockConfig { hand_width: 1e6, ..config() };
        assert_eq!(print_frame(wide, 40, 12, 1_000_000, false).lines().count(), 12);

        let both = ClockConfig { hand_length: 2e5, hand_width: 1e6, ..config() };
        assert_eq!(print_frame(both, 80, 24, 1_000_000, false).lines().count(), 24);
    }

    #[test]
    fn cache_survives_frames_until_resize() {
        let mut clock = Clock::new(config(), 30, 10);
        clock.draw(0);
        clock.draw(1_000);
        assert_eq!(clock.watcher.recomputes(), 1);
        clock.resize(40, 10);
        clock.draw(2_000);
        assert_eq!(clock.watcher.recomputes(), 2);
        clock.config_mut().hand_length = 10.0;
        clock.draw(3_000);
        assert_eq!(clock.watcher.recomputes(), 3);
        assert_eq!(clock.config().hand_length, 10.0);
    }
}
