//! Building blocks for the terminal reports
//!
//! Bars, rules and clipped cells used by the budget, pattern and anomaly
//! views. Widths are in terminal cells, not bytes.

const FILLED: char = '█';
const OVERSPENT: char = '▓';
const EMPTY: char = '░';

/// Bar showing how much of a budget has been used
///
/// Up to 100% the bar fills proportionally. Past it the bar is full and the
/// share beyond the limit is drawn with a darker block, so an overspent
/// category stands out even when every column is full.
pub fn usage_bar(percentage: f64, width: usize) -> String {
    if !percentage.is_finite() || percentage <= 0.0 {
        return EMPTY.to_string().repeat(width);
    }

    if percentage <= 100.0 {
        return scaled_bar(percentage, 100.0, width);
    }

    let over = ((percentage - 100.0) / percentage * width as f64).round() as usize;
    let over = over.clamp(1, width);
    let mut bar = FILLED.to_string().repeat(width - over);
    bar.extend(std::iter::repeat(OVERSPENT).take(over));
    bar
}

/// Bar of `value` relative to the largest value in the same chart
pub fn scaled_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut bar = FILLED.to_string().repeat(filled);
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// A share of total spend, one decimal place
pub fn format_share(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Horizontal rule under a table header
pub fn rule(width: usize) -> String {
    "─".repeat(width)
}

/// Clip free text to `max` characters, marking the cut with `…`
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut clipped: String = text.chars().take(max - 1).collect();
    clipped.push('…');
    clipped
}
