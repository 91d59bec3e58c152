use crate::constants::{DEFAULT_COMMIT_SIZE, DEFAULT_RESERVE_SIZE, MAX_DEPTH};

/// Which bytes count as insignificant whitespace between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitespace {
    /// Only ASCII space. Tabs and line breaks are rejected as unexpected bytes.
    #[default]
    SpaceOnly,
    /// Space, tab, line feed and carriage return.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaOptions {
    pub reserve_size: usize,
    pub commit_size: usize,
}

impl ArenaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserve_size(mut self, reserve_size: usize) -> Self {
        self.reserve_size = reserve_size;
        self
    }

    pub fn with_commit_size(mut self, commit_size: usize) -> Self {
        self.commit_size = commit_size;
        self
    }
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            reserve_size: DEFAULT_RESERVE_SIZE,
            commit_size: DEFAULT_COMMIT_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub whitespace: Whitespace,
    pub allow_plus_sign: bool,
    pub max_depth: usize,
    pub require_eof: bool,
    pub arena: ArenaOptions,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_whitespace(mut self, whitespace: Whitespace) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn with_plus_sign(mut self, allow_plus_sign: bool) -> Self {
        self.allow_plus_sign = allow_plus_sign;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_require_eof(mut self, require_eof: bool) -> Self {
        self.require_eof = require_eof;
        self
    }

    pub fn with_arena(mut self, arena: ArenaOptions) -> Self {
        self.arena = arena;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            whitespace: Whitespace::default(),
            allow_plus_sign: true,
            max_depth: MAX_DEPTH,
            require_eof: false,
            arena: ArenaOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_parse_options_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.whitespace, Whitespace::SpaceOnly);
        assert!(options.allow_plus_sign);
        assert_eq!(options.max_depth, MAX_DEPTH);
        assert!(!options.require_eof);
        assert_eq!(options.arena, ArenaOptions::default());
    }

    #[rstest::rstest]
    fn test_parse_options_builders() {
        let arena = ArenaOptions::new()
            .with_reserve_size(1 << 20)
            .with_commit_size(1 << 12);
        let options = ParseOptions::new()
            .with_whitespace(Whitespace::Json)
            .with_plus_sign(false)
            .with_max_depth(8)
            .with_require_eof(true)
            .with_arena(arena);

        assert_eq!(options.whitespace, Whitespace::Json);
        assert!(!options.allow_plus_sign);
        assert_eq!(options.max_depth, 8);
        assert!(options.require_eof);
        assert_eq!(options.arena.reserve_size, 1 << 20);
        assert_eq!(options.arena.commit_size, 1 << 12);
    }
}
