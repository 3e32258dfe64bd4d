//! The fractal pattern: repeated, rotated, chained copies of the hand set
//!
//! Each repetition level rotates the frame by one step and draws `connections`
//! polylines. A polyline starts at the running point and chains the hour,
//! minute and second hands through the mode's combinator, so every hand's end
//! becomes the next hand's start. Levels are emitted outermost first.

use super::cache::DerivedCache;
use super::surface::{Surface, Transform};
use super::time::{TimeSample, Vec2};
use crate::colors::{cycle, step_down, Hsba, COLOR_MAX};
use crate::config::{AlphaFalloff, ClockConfig, Mode, MAX_CONNECTIONS, MAX_REPETITIONS};
use serde::Serialize;
use std::f64::consts::PI;

/// Main hand level is drawn slightly thicker
const MAIN_LEVEL_WIDTH: f64 = 1.25;
const NEBULA_SPREAD: f64 = 1.5;

/// Loop position handed to a combinator
#[derive(Clone, Copy, Debug)]
pub struct Step {
    /// Hand index: 0 second, 1 minute, 2 hour
    pub i: usize,
    pub r: i64,
    pub c: i64,
    pub repetitions: i64,
    pub connections: i64,
}

/// Derives the next chained point from the running point and a hand vector
pub type Combinator = fn(start: Vec2, hand: Vec2, step: &Step) -> Vec2;

fn chain_normal(start: Vec2, hand: Vec2, _: &Step) -> Vec2 {
    Vec2::new(hand.x + start.x, hand.y + start.y)
}

fn chain_star(start: Vec2, hand: Vec2, step: &Step) -> Vec2 {
    if step.i % 2 == 0 {
        Vec2::new(hand.x + start.x, hand.y + start.y)
    } else {
        Vec2::new(hand.x - start.x, hand.y - start.y)
    }
}

fn chain_nebula(start: Vec2, hand: Vec2, step: &Step) -> Vec2 {
    Vec2::new(
        (hand.x - start.x) * NEBULA_SPREAD * step.c as f64 / step.connections as f64,
        (hand.y + start.y) * NEBULA_SPREAD * step.r as f64 / step.repetitions as f64,
    )
}

fn chain_blackhole(start: Vec2, hand: Vec2, _: &Step) -> Vec2 {
    Vec2::new(hand.x + start.x, hand.y - start.y)
}

impl Mode {
    pub fn combinator(self) -> Combinator {
        match self {
            Mode::Normal => chain_normal,
            Mode::Star => chain_star,
            Mode::Nebula => chain_nebula,
            Mode::Blackhole => chain_blackhole,
        }
    }
}

/// One stroked and filled shape of the pattern
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// Vertices in the level's local frame
    pub points: Vec<Vec2>,
    /// Level frame to canvas
    pub transform: Transform,
    pub stroke: Hsba,
    pub fill: Hsba,
    pub width: f64,
}

impl Polyline {
    pub fn canvas_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(|p| self.transform.apply(*p))
    }
}

/// Everything one frame is computed from
pub struct FrameContext<'a> {
    pub config: &'a ClockConfig,
    pub cache: &'a DerivedCache,
    pub sample: &'a TimeSample,
    pub lines: [Vec2; 3],
    /// Canvas size in surface units
    pub canvas: (f64, f64),
}

impl<'a> FrameContext<'a> {
    pub fn new(
        config: &'a ClockConfig,
        cache: &'a DerivedCache,
        sample: &'a TimeSample,
        canvas: (f64, f64),
    ) -> Self {
        Self {
            config,
            cache,
            sample,
            lines: sample.hands(cache.scaled_length),
            canvas,
        }
    }
}

/// Build the whole pattern for a frame, in drawing order
pub fn render(ctx: &FrameContext) -> Vec<Polyline> {
    let config = ctx.config;
    let cache = ctx.cache;
    let repetitions = config.repetitions.clamp(1, MAX_REPETITIONS);
    let connections = config.connections.clamp(1, MAX_CONNECTIONS);
    let color = config.color;
    let (saturation, lightness) = (color.saturation as f64, color.lightness as f64);
    let combine = config.mode.combinator();

    let rotation_step = -ctx.sample.m * config.speed + PI;

    // Levels run from the last index down, so start a full turn-set back and
    // give one step back per level.
    let mut transform = Transform::IDENTITY
        .translate(ctx.canvas.0 * config.origin.left, ctx.canvas.1 * config.origin.top)
        .rotate(-(repetitions as f64) * rotation_step + config.phase);

    let mut hue_start = cache.hue_start;
    let mut level_alpha = 0.0;
    let mut polylines = Vec::with_capacity((repetitions * connections) as usize);

    for r in (0..repetitions).rev() {
        transform = transform.rotate(rotation_step);
        let mut start = Vec2::ZERO;

        level_alpha += cache.alpha_step;
        let alpha_step_b = level_alpha / connections as f64;
        let mut alpha = level_alpha;

        hue_start = cycle(hue_start, cache.hue_shift, COLOR_MAX);
        let mut hue = hue_start;

        let mut width = config.hand_width * (repetitions - r) as f64 / repetitions as f64;
        if r == 0 {
            width *= MAIN_LEVEL_WIDTH;
        }

        for c in (0..connections).rev() {
            hue = cycle(hue, cache.hue_shift_b, COLOR_MAX);
            if config.alpha_falloff == AlphaFalloff::Decay {
                alpha = step_down(alpha, alpha_step_b);
            }
            let fill = alpha * color.fill as f64 / COLOR_MAX;

            let mut points = Vec::with_capacity(ctx.lines.len() + 1);
            points.push(start);
            for i in (0..ctx.lines.len()).rev() {
                let step = Step { i, r, c, repetitions, connections };
                let end = combine(start, ctx.lines[i], &step);
                points.push(end);
                start = end;
            }

            polylines.push(Polyline {
                points,
                transform,
                stroke: Hsba::new(hue, saturation, lightness, alpha),
                fill: Hsba::new(hue, saturation, lightness, fill),
                width,
            });
        }
    }

    polylines
}

/// Hand the pattern to a surface; strokes are scaled by `width_scale`
pub fn paint<S: Surface>(surface: &mut S, polylines: &[Polyline], width_scale: f64) {
    surface.reset_transform();
    for polyline in polylines {
        surface.set_stroke_width(polyline.width * width_scale);
        surface.set_stroke_color(polyline.stroke);
        surface.set_fill_color(polyline.fill);
        surface.begin_polyline();
        for p in polyline.canvas_points() {
            surface.vertex(p.x, p.y);
        }
        surface.end_polyline();
    }
}

#[derive(Serialize)]
struct Angles {
    s: f64,
    m: f64,
    h: f64,
}

#[derive(Serialize)]
struct DebugDump<'a> {
    lines: &'a [Vec2; 3],
    angles: Angles,
    calcs: &'a DerivedCache,
    config: &'a ClockConfig,
}

/// Human-readable dump of the frame inputs
pub fn debug_dump(ctx: &FrameContext) -> String {
    let dump = DebugDump {
        lines: &ctx.lines,
        angles: Angles { s: ctx.sample.s, m: ctx.sample.m, h: ctx.sample.h },
        calcs: ctx.cache,
        config: ctx.config,
    };
    serde_json::to_string_pretty(&dump).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(repetitions: i64, connections: i64, mode: Mode) -> ClockConfig {
        ClockConfig {
            repetitions,
            connections,
            mode,
            timezone_offset: 0,
            ..ClockConfig::default()
        }
    }

    fn frame(config: &ClockConfig, now: i64) -> Vec<Polyline> {
        let config = config.sanitized();
        let cache = DerivedCache::compute(&config, 898.0);
        let sample = TimeSample::at(now, config.timezone_offset, config.time_shift);
        let ctx = FrameContext::new(&config, &cache, &sample, (898.0, 506.0));
        render(&ctx)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn emits_repetitions_times_connections_polylines() {
        let polylines = frame(&config(7, 3, Mode::Normal), 1_234_567);
        assert_eq!(polylines.len(), 21);
        assert!(polylines.iter().all(|p| p.points.len() == 4));
    }

    #[test]
    fn every_level_starts_at_its_local_origin() {
        let connections = 5;
        let polylines = frame(&config(6, connections, Mode::Normal), 987_654);
        for (idx, pair) in polylines.windows(2).enumerate() {
            let next = &pair[1];
            if (idx + 1) % connections as usize == 0 {
                assert_eq!(next.points[0], Vec2::ZERO);
            } else {
                // Connections within a level continue from the previous end
                assert_eq!(next.points[0], *pair[0].points.last().unwrap());
            }
        }
        assert_eq!(polylines[0].points[0], Vec2::ZERO);
    }

    #[test]
    fn normal_mode_chains_hour_minute_second() {
        let config = config(1, 1, Mode::Normal).sanitized();
        let cache = DerivedCache::compute(&config, 898.0);
        let sample = TimeSample::at(4_321_000, 0, 0);
        let ctx = FrameContext::new(&config, &cache, &sample, (898.0, 506.0));
        let polylines = render(&ctx);
        let [s, m, h] = ctx.lines;
        let points = &polylines[0].points;
        assert!(close(points[1], h));
        assert!(close(points[2], Vec2::new(h.x + m.x, h.y + m.y)));
        assert!(close(points[3], Vec2::new(h.x + m.x + s.x, h.y + m.y + s.y)));
    }

    #[test]
    fn star_combinator_flips_odd_hands() {
        let start = Vec2::new(3.0, -2.0);
        let hand = Vec2::new(10.0, 20.0);
        let step = |i| Step { i, r: 0, c: 0, repetitions: 1, connections: 1 };
        let combine = Mode::Star.combinator();

        assert_eq!(combine(start, hand, &step(0)), Vec2::new(13.0, 18.0));
        assert_eq!(combine(start, hand, &step(2)), Vec2::new(13.0, 18.0));
        assert_eq!(combine(start, hand, &step(1)), Vec2::new(7.0, 22.0));
    }

    #[test]
    fn nebula_and_blackhole_combinators() {
        let start = Vec2::new(3.0, -2.0);
        let hand = Vec2::new(10.0, 20.0);
        let step = Step { i: 1, r: 2, c: 1, repetitions: 4, connections: 3 };

        let nebula = Mode::Nebula.combinator()(start, hand, &step);
        assert!(close(nebula, Vec2::new(7.0 * 1.5 / 3.0, 18.0 * 1.5 * 2.0 / 4.0)));

        let blackhole = Mode::Blackhole.combinator()(start, hand, &step);
        assert_eq!(blackhole, Vec2::new(13.0, 22.0));
    }

    #[test]
    fn rendering_is_repeatable() {
        for mode in Mode::ALL {
            let config = config(9, 4, mode);
            assert_eq!(frame(&config, 55_555_555), frame(&config, 55_555_555));
        }
    }

    #[test]
    fn oversized_counts_are_capped_in_render() {
        // Unsanitized on purpose: render must bound the counts itself
        let config = config(i64::MAX, i64::MAX, Mode::Normal);
        let cache = DerivedCache::compute(&config, 898.0);
        let sample = TimeSample::at(0, 0, 0);
        let ctx = FrameContext::new(&config, &cache, &sample, (898.0, 506.0));
        let polylines = render(&ctx);
        assert_eq!(polylines.len(), (MAX_REPETITIONS * MAX_CONNECTIONS) as usize);
    }

    #[test]
    fn degenerate_counts_render_one_polyline() {
        for (r, c) in [(0, 0), (0, 3), (-4, 0)] {
            let polylines = frame(&config(r, c, Mode::Nebula), 100);
            let expected = (r.max(1) * c.max(1)) as usize;
            assert_eq!(polylines.len(), expected);
            for p in &polylines {
                for v in p.canvas_points() {
                    assert!(v.x.is_finite() && v.y.is_finite());
                }
            }
        }
    }

    #[test]
    fn unsanitized_zero_counts_do_not_divide_by_zero() {
        let config = config(0, 0, Mode::Nebula);
        let cache = DerivedCache::compute(&config.sanitized(), 898.0);
        let sample = TimeSample::at(0, 0, 0);
        let ctx = FrameContext::new(&config, &cache, &sample, (898.0, 506.0));
        let polylines = render(&ctx);
        assert_eq!(polylines.len(), 1);
        assert!(polylines[0].points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn accumulated_alpha_rises_towards_the_main_level() {
        let polylines = frame(&config(4, 2, Mode::Normal), 0);
        let alphas: Vec<f64> = polylines.iter().map(|p| p.stroke.a).collect();
        assert_eq!(alphas, vec![55.0, 55.0, 110.0, 110.0, 165.0, 165.0, 220.0, 220.0]);
        assert!((polylines[7].fill.a - 220.0 * 127.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn decaying_alpha_fades_out_each_level() {
        let mut config = config(2, 4, Mode::Normal);
        config.alpha_falloff = AlphaFalloff::Decay;
        let polylines = frame(&config, 0);
        let alphas: Vec<f64> = polylines.iter().map(|p| p.stroke.a).collect();
        assert_eq!(alphas, vec![82.5, 55.0, 27.5, 0.0, 165.0, 110.0, 55.0, 0.0]);
    }

    #[test]
    fn widths_grow_and_main_level_is_emphasised() {
        let polylines = frame(&config(4, 1, Mode::Normal), 0);
        let widths: Vec<f64> = polylines.iter().map(|p| p.width).collect();
        assert_eq!(widths, vec![0.625, 1.25, 1.875, 2.5 * 1.25]);
    }

    #[test]
    fn hues_step_per_level_and_connection() {
        let mut config = config(2, 2, Mode::Normal);
        config.color.hue = 100;
        config.color.shift.repetitions = 20.0;
        config.color.shift.connections = 10.0;
        let polylines = frame(&config, 0);
        let hues: Vec<f64> = polylines.iter().map(|p| p.stroke.h).collect();
        // hue_start 120 -> 110 -> 100; connections step -5 from there
        assert_eq!(hues, vec![105.0, 100.0, 95.0, 90.0]);
    }

    #[test]
    fn pattern_is_centred_on_the_origin() {
        let mut config = config(3, 2, Mode::Normal);
        config.origin.left = 0.25;
        config.origin.top = 0.75;
        let polylines = frame(&config, 42_000);
        let first = polylines[0].canvas_points().next().unwrap();
        assert!(close(first, Vec2::new(898.0 * 0.25, 506.0 * 0.75)));
    }

    #[test]
    fn debug_dump_names_every_section() {
        let config = config(2, 2, Mode::Star).sanitized();
        let cache = DerivedCache::compute(&config, 898.0);
        let sample = TimeSample::at(0, 0, 0);
        let ctx = FrameContext::new(&config, &cache, &sample, (898.0, 506.0));
        let dump = debug_dump(&ctx);
        for key in ["\"lines\"", "\"angles\"", "\"calcs\"", "\"config\"", "\"star\""] {
            assert!(dump.contains(key), "missing {} in {}", key, dump);
        }
    }
}
