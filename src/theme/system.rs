//! OS / terminal dark-mode signal.
//!
//! Checked in order:
//! 1. `CHATBOX_APPEARANCE` env var ("dark" | "light")
//! 2. Desktop setting (`defaults` on macOS, `gsettings` elsewhere)
//! 3. `COLORFGBG` env var (format: "fg;bg", bg <= 6 = dark)
//! 4. `TERM_BACKGROUND` env var ("dark" | "light")
//!
//! `None` means no signal at all, which callers treat as light.

use std::env;
use std::process::Command;

pub fn detect_dark() -> Option<bool> {
    if let Ok(val) = env::var("CHATBOX_APPEARANCE") {
        if let Some(dark) = parse_appearance(&val) {
            return Some(dark);
        }
    }

    if let Some(dark) = desktop_dark() {
        return Some(dark);
    }

    if let Ok(val) = env::var("COLORFGBG") {
        if let Some(dark) = parse_colorfgbg(&val) {
            return Some(dark);
        }
    }

    env::var("TERM_BACKGROUND")
        .ok()
        .and_then(|v| parse_appearance(&v))
}

fn parse_appearance(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

/// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); 0-6 are dark backgrounds.
pub fn parse_colorfgbg(val: &str) -> Option<bool> {
    val.split(';')
        .last()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6)
}

/// Output of `gsettings get org.gnome.desktop.interface color-scheme`.
pub fn parse_gsettings(output: &str) -> Option<bool> {
    match output.trim().trim_matches('\'') {
        "prefer-dark" => Some(true),
        "prefer-light" | "default" => Some(false),
        _ => None,
    }
}

#[cfg(target_os = "macos")]
fn desktop_dark() -> Option<bool> {
    // The key is absent in light mode, so a failed read means light.
    let out = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    Some(out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "Dark")
}

#[cfg(not(target_os = "macos"))]
fn desktop_dark() -> Option<bool> {
    let out = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    parse_gsettings(&String::from_utf8_lossy(&out.stdout))
}
