//! Terminal rendering. Everything here builds strings so it can be checked without a terminal.

pub mod dashboard;
pub mod heatmap;

use ansi_term::Colour;

const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Horizontal bar of `width` cells filled proportionally to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max <= 0. {
        0
    } else {
        ((value / max).clamp(0., 1.) * width as f64).round() as usize
    };

    let mut result = String::with_capacity(width * 3);
    result.extend(std::iter::repeat(BAR_FULL).take(filled));
    result.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    result
}

pub fn heading(text: &str) -> String {
    Colour::Cyan.bold().paint(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::bar;

    #[test]
    fn test_bar() {
        assert_eq!(bar(5., 10., 4), "██░░");
        assert_eq!(bar(10., 10., 3), "███");
        assert_eq!(bar(1., 0., 2), "░░");
        assert_eq!(bar(20., 10., 2), "██");
    }
}
