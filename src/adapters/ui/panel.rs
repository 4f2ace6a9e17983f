//! Feedback panel: a titled, order-preserving list of findings.

use crossterm::style::{Color, Stylize};

/// Shown instead of a list when a category has no findings.
pub const EMPTY_PANEL_MESSAGE: &str = "No major issues detected.";

const BULLET: char = '•';
const TITLE_RGB: (u8, u8, u8) = (0x93, 0xc5, 0xfd);
const BULLET_RGB: (u8, u8, u8) = (0x60, 0xa5, 0xfa);

/// One feedback category. Items are shown exactly as given: no dedup, sort or truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackPanel {
    title: String,
    items: Vec<String>,
}

impl FeedbackPanel {
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain-text lines: the title, then the placeholder or one bullet per item.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.items.len() + 1);
        lines.push(self.title.clone());
        if self.items.is_empty() {
            lines.push(EMPTY_PANEL_MESSAGE.to_string());
        } else {
            lines.extend(self.items.iter().map(|item| format!("{} {}", BULLET, item)));
        }
        lines
    }

    /// Styled lines for the terminal.
    pub fn render(&self) -> Vec<String> {
        let rgb = |(r, g, b): (u8, u8, u8)| Color::Rgb { r, g, b };
        let mut out = Vec::with_capacity(self.items.len() + 1);
        out.push(self.title.as_str().with(rgb(TITLE_RGB)).bold().to_string());
        if self.items.is_empty() {
            out.push(format!("  {}", EMPTY_PANEL_MESSAGE.dark_grey().italic()));
        } else {
            for item in &self.items {
                out.push(format!("  {} {}", BULLET.with(rgb(BULLET_RGB)), item));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_panel_shows_placeholder() {
        let panel = FeedbackPanel::new("Weaknesses", vec![]);
        let lines = panel.lines();
        assert_eq!(lines, vec!["Weaknesses", EMPTY_PANEL_MESSAGE]);
        assert_eq!(lines.iter().filter(|l| l.starts_with(BULLET)).count(), 0);
    }

    #[test]
    fn test_items_keep_order() {
        let panel = FeedbackPanel::new("Strengths", vec!["A".into(), "B".into()]);
        assert_eq!(panel.lines(), vec!["Strengths", "• A", "• B"]);
    }

    #[test]
    fn test_duplicates_kept() {
        let panel = FeedbackPanel::new("Missing Skills", vec!["Go".into(), "Go".into()]);
        assert_eq!(panel.lines().len(), 3);
        assert_eq!(panel.render().len(), 3);
    }
}
