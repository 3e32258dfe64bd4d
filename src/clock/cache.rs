use crate::config::ClockConfig;
use serde::Serialize;

/// Values derived from the config and canvas size, reused across frames
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DerivedCache {
    pub hue_start: f64,
    /// Hue step per repetition
    pub hue_shift: f64,
    /// Hue step per connection
    pub hue_shift_b: f64,
    pub alpha_step: f64,
    pub scaled_length: f64,
    /// Canvas width over reference width, also applied to stroke widths
    pub scale: f64,
}

impl DerivedCache {
    /// Expects a sanitized config
    pub fn compute(config: &ClockConfig, canvas_width: f64) -> Self {
        let repetitions = config.repetitions as f64;
        let connections = config.connections as f64;
        let shift = config.color.shift;
        let scale = canvas_width / config.reference_size.width;

        Self {
            // One repetition step is taken before the first level is drawn
            hue_start: config.color.hue as f64 + shift.repetitions,
            hue_shift: -shift.repetitions / repetitions,
            hue_shift_b: -shift.connections / connections,
            alpha_step: config.color.alpha as f64 / repetitions,
            scaled_length: config.hand_length * scale,
            scale,
        }
    }
}

/// Recomputes the cache only when the config or canvas size differs from the last call
#[derive(Default)]
pub struct CacheWatcher {
    seen: Option<(ClockConfig, (u32, u32))>,
    cache: Option<DerivedCache>,
    recomputes: u64,
}

impl CacheWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, config: &ClockConfig, canvas: (u32, u32)) -> DerivedCache {
        if let (Some((seen_config, seen_canvas)), Some(cache)) = (&self.seen, self.cache) {
            if seen_config == config && *seen_canvas == canvas {
                return cache;
            }
        }

        let cache = DerivedCache::compute(config, canvas.0 as f64);
        log::debug!("Derived cache recomputed for {}x{}: {:?}", canvas.0, canvas.1, cache);
        self.seen = Some((config.clone(), canvas));
        self.cache = Some(cache);
        self.recomputes += 1;
        cache
    }

    /// Number of times the cache has been rebuilt
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClockConfig {
        ClockConfig { timezone_offset: 0, ..ClockConfig::default() }
    }

    #[test]
    fn compute_matches_defaults() {
        let cache = DerivedCache::compute(&config(), 898.0);
        assert_eq!(cache.hue_start, 250.0);
        assert_eq!(cache.hue_shift, -2.5);
        assert_eq!(cache.hue_shift_b, -12.5);
        assert_eq!(cache.alpha_step, 5.5);
        assert_eq!(cache.scaled_length, 80.0);
        assert_eq!(cache.scale, 1.0);
    }

    #[test]
    fn scaled_length_tracks_canvas_width() {
        let cache = DerivedCache::compute(&config(), 449.0);
        assert_eq!(cache.scaled_length, 40.0);
    }

    #[test]
    fn watcher_reuses_until_change() {
        let mut watcher = CacheWatcher::new();
        let mut config = config();

        let first = watcher.refresh(&config, (160, 96));
        let again = watcher.refresh(&config, (160, 96));
        assert_eq!(first, again);
        assert_eq!(watcher.recomputes(), 1);

        config.color.alpha = 100;
        let changed = watcher.refresh(&config, (160, 96));
        assert_eq!(watcher.recomputes(), 2);
        assert_ne!(changed.alpha_step, first.alpha_step);

        watcher.refresh(&config, (200, 96));
        assert_eq!(watcher.recomputes(), 3);
        watcher.refresh(&config, (200, 96));
        assert_eq!(watcher.recomputes(), 3);
    }
}
