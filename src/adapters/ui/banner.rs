//! Gradient ASCII banner (RESUME) with the app tagline.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Blue (#60a5fa).
const BLUE: (u8, u8, u8) = (0x60, 0xa5, 0xfa);
/// Purple (#c084fc).
const PURPLE: (u8, u8, u8) = (0xc0, 0x84, 0xfc);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Figlet art for the title, or the plain title if the built-in font is unavailable.
fn title_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("RESUME").map(|figure| figure.to_string()))
        .unwrap_or_else(|| "AI RESUME ANALYZER".to_string())
}

/// Prints the welcome banner: the title with a blue-to-purple gradient, then the
/// tagline and version.
pub fn print_welcome() {
    let mut out = stdout();
    let art = title_art();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(BLUE, PURPLE, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Grey));
    let _ = out.execute(Print("AI Resume Analyzer · Smart ATS evaluation powered by AI\r\n"));
    let _ = out.execute(Print(format!("v{}\r\n\r\n", env!("CARGO_PKG_VERSION"))));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(BLUE, PURPLE, 0.0), BLUE);
        assert_eq!(lerp_rgb(BLUE, PURPLE, 1.0), PURPLE);
    }

    #[test]
    fn test_title_art_not_empty() {
        assert!(!title_art().trim().is_empty());
    }
}
