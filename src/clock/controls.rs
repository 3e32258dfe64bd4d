//! Keyboard and mouse handling between frames

use crate::config::{ClockConfig, MAX_CONNECTIONS, MAX_REPETITIONS};
use crossterm::event::KeyCode;

const LENGTH_STEP: f64 = 5.0;
const SPEED_STEP: f64 = 0.1;
const ORIGIN_STEP: f64 = 0.02;

pub const HELP_TEXT: &str = "\
FRACTAL CLOCK
─────────────────────────
m        Cycle mode
f        Alpha falloff
t        Show time
d        Debug dump
+/-      Hand length
[/]      Repetitions
{/}      Connections
</>      Speed
Arrows   Move origin
c        Recentre
Click    Set origin
─────────────────────────
Space    Pause
?        Close help
q/Esc    Quit";

/// What the frame driver should do after an input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    TogglePause,
    ToggleHelp,
}

/// Apply a key to the config. Config edits take effect on the next frame.
pub fn handle_key(config: &mut ClockConfig, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char(' ') => return Action::TogglePause,
        KeyCode::Char('?') => return Action::ToggleHelp,
        KeyCode::Char('m') | KeyCode::Char('M') => config.mode = config.mode.next(),
        KeyCode::Char('f') | KeyCode::Char('F') => config.alpha_falloff = config.alpha_falloff.toggled(),
        KeyCode::Char('t') | KeyCode::Char('T') => config.show_time = !config.show_time,
        KeyCode::Char('d') | KeyCode::Char('D') => config.debug = !config.debug,
        KeyCode::Char('+') | KeyCode::Char('=') => config.hand_length += LENGTH_STEP,
        KeyCode::Char('-') | KeyCode::Char('_') => {
            config.hand_length = (config.hand_length - LENGTH_STEP).max(LENGTH_STEP);
        }
        KeyCode::Char(']') => config.repetitions = (config.repetitions + 1).min(MAX_REPETITIONS),
        KeyCode::Char('[') => config.repetitions = (config.repetitions - 1).max(1),
        KeyCode::Char('}') => config.connections = (config.connections + 1).min(MAX_CONNECTIONS),
        KeyCode::Char('{') => config.connections = (config.connections - 1).max(1),
        KeyCode::Char('>') | KeyCode::Char('.') => config.speed += SPEED_STEP,
        KeyCode::Char('<') | KeyCode::Char(',') => config.speed -= SPEED_STEP,
        KeyCode::Left => config.origin.left = (config.origin.left - ORIGIN_STEP).max(0.0),
        KeyCode::Right => config.origin.left = (config.origin.left + ORIGIN_STEP).min(1.0),
        KeyCode::Up => config.origin.top = (config.origin.top - ORIGIN_STEP).max(0.0),
        KeyCode::Down => config.origin.top = (config.origin.top + ORIGIN_STEP).min(1.0),
        KeyCode::Char('c') | KeyCode::Char('C') => {
            config.origin.left = 0.5;
            config.origin.top = 0.5;
        }
        _ => {}
    }
    Action::None
}

/// Move the pattern origin to the centre of the clicked cell
pub fn handle_click(config: &mut ClockConfig, col: u16, row: u16, cols: u16, rows: u16) {
    if cols == 0 || rows == 0 {
        return;
    }
    config.origin.left = ((col as f64 + 0.5) / cols as f64).clamp(0.0, 1.0);
    config.origin.top = ((row as f64 + 0.5) / rows as f64).clamp(0.0, 1.0);
}
