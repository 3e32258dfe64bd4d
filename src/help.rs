use crate::terminal::Terminal;
use crossterm::style::Color;

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }
    let (width, height) = term.size();

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2;

    let left = (width as usize).saturating_sub(box_width) as i32 / 2;
    let top = (height as usize).saturating_sub(box_height) as i32 / 2;
    let right = left + box_width as i32 - 1;
    let bottom = top + box_height as i32 - 1;

    let border = Some(Color::White);
    let text = Some(Color::Grey);

    let rule = "─".repeat(box_width - 2);
    term.set(left, top, '┌', border);
    term.set_str(left + 1, top, &rule, border);
    term.set(right, top, '┐', border);

    for (i, line) in lines.iter().enumerate() {
        let y = top + 1 + i as i32;
        let padding = max_width.saturating_sub(line.chars().count());
        term.set(left, y, '│', border);
        term.set_str(left + 1, y, &format!(" {}{} ", line, " ".repeat(padding)), text);
        term.set(right, y, '│', border);
    }

    term.set(left, bottom, '└', border);
    term.set_str(left + 1, bottom, &rule, border);
    term.set(right, bottom, '┘', border);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_centered() {
        let mut term = Terminal::offscreen(20, 5);
        render_help_overlay(&mut term, "abc");
        // Box is 7x3, centred at column 6, row 1
        assert_eq!(term.get(6, 1).map(|c| c.ch), Some('┌'));
        assert_eq!(term.get(12, 3).map(|c| c.ch), Some('┘'));
        assert_eq!(term.get(8, 2).map(|c| c.ch), Some('a'));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::offscreen(10, 3);
        render_help_overlay(&mut term, "");
        assert_eq!(term.to_ansi(), "          \n          \n          \n");
    }
}
