//! Display backends.

mod cli;

pub use cli::{CliRenderer, SYMBOLS, draw, status_line, symbol};

/// Available display backends, selected by the `display` configuration variable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum DisplayKind {
    /// Terminal board drawn with ratatui.
    #[default]
    Cli,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!("cli".parse::<DisplayKind>().unwrap(), DisplayKind::Cli);
        assert_eq!(DisplayKind::Cli.to_string(), "cli");
        assert!("gtk".parse::<DisplayKind>().is_err());
    }
}
