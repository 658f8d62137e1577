//! ANSI color helper utilities for terminal output.

use crate::models::alert::AlertColor;

pub const RESET: &str = "\x1b[0m";

pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";

/// Terminal color standing in for the alert's display color.
pub fn for_alert(color: AlertColor) -> &'static str {
    match color {
        AlertColor::LightGreen => GREEN,
        AlertColor::Yellow => YELLOW,
    }
}

/// `text` wrapped in the alert color.
pub fn paint_alert(color: AlertColor, text: &str) -> String {
    format!("{}{}{}", for_alert(color), text, RESET)
}
