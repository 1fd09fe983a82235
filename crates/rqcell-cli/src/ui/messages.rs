use owo_colors::{AnsiColors, OwoColorize};

use super::colors_enabled;

fn mark(symbol: &str, color: AnsiColors) -> String {
    if colors_enabled() {
        symbol.color(color).bold().to_string()
    } else {
        symbol.to_string()
    }
}

fn tint(message: &str, color: AnsiColors) -> String {
    if colors_enabled() {
        message.color(color).to_string()
    } else {
        message.to_string()
    }
}

pub fn success(message: &str) {
    eprintln!("{} {}", mark("✓", AnsiColors::Green), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", mark("ℹ", AnsiColors::Blue), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", mark("⚠", AnsiColors::Yellow), tint(message, AnsiColors::Yellow));
}

pub fn error(message: &str) {
    eprintln!("{} {}", mark("✗", AnsiColors::Red), tint(message, AnsiColors::Red));
}

/// Format the `scanned / rewritten / failed` line of a transform run
pub fn summary(scanned: usize, rewritten: usize, failed: usize) -> String {
    let failed = if failed > 0 && colors_enabled() {
        failed.red().bold().to_string()
    } else {
        failed.to_string()
    };
    format!("{scanned} scanned, {rewritten} rewritten, {failed} failed")
}
