//! Per-parser settings that are passed explicitly into tokenizing,
//! matching and help rendering.

/// Default width, in columns, used when laying out help text.
pub const DEFAULT_CONSOLE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accept `/` as an alternative option prefix (`/f`, `/out:file`).
    pub slash_prefix: bool,
    /// Width of the console that help text is wrapped to.
    pub console_width: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            slash_prefix: false,
            console_width: DEFAULT_CONSOLE_WIDTH,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slash_prefix(mut self, enabled: bool) -> Self {
        self.slash_prefix = enabled;
        self
    }

    pub fn with_console_width(mut self, width: usize) -> Self {
        self.console_width = width;
        self
    }

    /// Whether `c` starts an option token.
    pub fn is_opt_prefix(&self, c: char) -> bool {
        c == '-' || (self.slash_prefix && c == '/')
    }

    /// Rewrite a leading `/` to `-` so both spellings compare equal.
    pub(crate) fn normalise_opt<'s>(&self, name: &'s str) -> std::borrow::Cow<'s, str> {
        match name.strip_prefix('/') {
            Some(rest) if self.slash_prefix => std::borrow::Cow::Owned(format!("-{rest}")),
            _ => std::borrow::Cow::Borrowed(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_is_only_a_prefix_when_enabled() {
        let plain = ParserConfig::default();
        assert!(plain.is_opt_prefix('-'));
        assert!(!plain.is_opt_prefix('/'));
        assert_eq!(plain.normalise_opt("/f"), "/f");

        let slashed = plain.with_slash_prefix(true);
        assert!(slashed.is_opt_prefix('/'));
        assert_eq!(slashed.normalise_opt("/f"), "-f");
        assert_eq!(slashed.normalise_opt("--flag"), "--flag");
    }
}
