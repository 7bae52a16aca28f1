//! Terminal output utilities

use console::{style, StyledObject};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

/// The fixed set of message kinds shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Success,
    Info,
    Warning,
    Error,
    Question,
}

impl MessageStyle {
    /// Symbol printed in front of the message
    pub fn symbol(self) -> &'static str {
        match self {
            MessageStyle::Success => "✓",
            MessageStyle::Info => "ℹ",
            MessageStyle::Warning => "⚠",
            MessageStyle::Error => "✗",
            MessageStyle::Question => "?",
        }
    }

    fn styled_symbol(self) -> StyledObject<&'static str> {
        let symbol = style(self.symbol()).bold();
        match self {
            MessageStyle::Success => symbol.green(),
            MessageStyle::Info => symbol.blue(),
            MessageStyle::Warning => symbol.yellow(),
            MessageStyle::Error => symbol.red(),
            MessageStyle::Question => symbol.magenta(),
        }
    }

    /// Warnings and errors go to stderr
    pub fn is_diagnostic(self) -> bool {
        matches!(self, MessageStyle::Warning | MessageStyle::Error)
    }

    /// Render `msg` with this style's symbol
    pub fn format(self, msg: &str) -> String {
        format!("{} {}", self.styled_symbol(), msg)
    }
}

/// Print a message in the given style
pub fn message(kind: MessageStyle, msg: &str) {
    if kind.is_diagnostic() {
        eprintln!("{}", kind.format(msg));
    } else {
        println!("{}", kind.format(msg));
    }
}

/// Print a success message
pub fn success(msg: &str) {
    message(MessageStyle::Success, msg);
}

/// Print an error message
pub fn error(msg: &str) {
    message(MessageStyle::Error, msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    message(MessageStyle::Warning, msg);
}

/// Print an info message
pub fn info(msg: &str) {
    message(MessageStyle::Info, msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Ask a yes/no question; anything but an explicit yes is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(MessageStyle::Question.format(prompt))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Create a progress bar
pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(msg.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MessageStyle; 5] = [
        MessageStyle::Success,
        MessageStyle::Info,
        MessageStyle::Warning,
        MessageStyle::Error,
        MessageStyle::Question,
    ];

    #[test]
    fn test_symbols_are_distinct() {
        let mut symbols: Vec<&str> = ALL.iter().map(|s| s.symbol()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), ALL.len());
    }

    #[test]
    fn test_only_warnings_and_errors_are_diagnostic() {
        let diagnostic: Vec<MessageStyle> =
            ALL.iter().copied().filter(|s| s.is_diagnostic()).collect();
        assert_eq!(diagnostic, vec![MessageStyle::Warning, MessageStyle::Error]);
    }

    #[test]
    fn test_format_keeps_message() {
        console::set_colors_enabled(false);
        assert_eq!(MessageStyle::Success.format("saved"), "✓ saved");
        assert_eq!(MessageStyle::Question.format("Continue?"), "? Continue?");
    }
}
