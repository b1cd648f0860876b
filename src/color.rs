use crate::error::ConfigError;

/// The fixed 16-color terminal palette used by color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    LightBlack,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    LightWhite,
}

impl Color {
    /// All colors in vocabulary order. Numeric tokens 1-16 index into this.
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::LightBlack,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::LightWhite,
    ];

    /// Canonical lower-case name, used in JSON files and fuzzy matching.
    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::LightBlack => "lightblack",
            Color::LightRed => "lightred",
            Color::LightGreen => "lightgreen",
            Color::LightYellow => "lightyellow",
            Color::LightBlue => "lightblue",
            Color::LightMagenta => "lightmagenta",
            Color::LightCyan => "lightcyan",
            Color::LightWhite => "lightwhite",
        }
    }

    /// ANSI escape to set this color as foreground.
    pub fn fg_code(&self) -> &'static str {
        match self {
            Color::Black => "\x1b[30m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
            Color::LightBlack => "\x1b[90m",
            Color::LightRed => "\x1b[91m",
            Color::LightGreen => "\x1b[92m",
            Color::LightYellow => "\x1b[93m",
            Color::LightBlue => "\x1b[94m",
            Color::LightMagenta => "\x1b[95m",
            Color::LightCyan => "\x1b[96m",
            Color::LightWhite => "\x1b[97m",
        }
    }

    /// ANSI escape to set this color as background.
    pub fn bg_code(&self) -> &'static str {
        match self {
            Color::Black => "\x1b[40m",
            Color::Red => "\x1b[41m",
            Color::Green => "\x1b[42m",
            Color::Yellow => "\x1b[43m",
            Color::Blue => "\x1b[44m",
            Color::Magenta => "\x1b[45m",
            Color::Cyan => "\x1b[46m",
            Color::White => "\x1b[47m",
            Color::LightBlack => "\x1b[100m",
            Color::LightRed => "\x1b[101m",
            Color::LightGreen => "\x1b[102m",
            Color::LightYellow => "\x1b[103m",
            Color::LightBlue => "\x1b[104m",
            Color::LightMagenta => "\x1b[105m",
            Color::LightCyan => "\x1b[106m",
            Color::LightWhite => "\x1b[107m",
        }
    }
}

/// Text styles. Normal emits no code at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Normal,
    Bright,
    Dim,
}

impl Style {
    /// All styles in vocabulary order. Numeric tokens 1-3 index into this.
    pub const ALL: [Style; 3] = [Style::Normal, Style::Bright, Style::Dim];

    pub fn name(&self) -> &'static str {
        match self {
            Style::Normal => "normal",
            Style::Bright => "bright",
            Style::Dim => "dim",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Style::Normal => "",
            Style::Bright => "\x1b[1m",
            Style::Dim => "\x1b[2m",
        }
    }
}

pub const RESET: &str = "\x1b[0m";

/// True when `needle` is a subsequence of `haystack` (all chars appear in
/// order, not necessarily adjacent).
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|n| chars.any(|h| h == n))
}

/// Resolve a user-typed token against a fixed vocabulary of canonical names.
///
/// Matching is deterministic:
/// 1. a purely numeric token selects positionally (1-based) from the vocabulary
/// 2. case-insensitive exact match wins outright
/// 3. otherwise prefix matches are collected; if there are none, subsequence
///    matches are collected instead
/// 4. the candidate with the shortest canonical name wins, ties broken by
///    lexical order
///
/// Empty tokens and tokens with no candidates fail.
fn resolve_token(token: &str, names: &[&'static str]) -> Result<usize, ConfigError> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return Err(ConfigError::UnknownColor(token));
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        let idx: usize = token
            .parse()
            .map_err(|_| ConfigError::UnknownColor(token.clone()))?;
        if idx >= 1 && idx <= names.len() {
            return Ok(idx - 1);
        }
        return Err(ConfigError::UnknownColor(token));
    }

    if let Some(idx) = names.iter().position(|n| *n == token) {
        return Ok(idx);
    }

    let mut candidates: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| n.starts_with(&token))
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        candidates = names
            .iter()
            .enumerate()
            .filter(|(_, n)| is_subsequence(&token, n))
            .map(|(i, _)| i)
            .collect();
    }

    candidates
        .into_iter()
        .min_by_key(|&i| (names[i].len(), names[i]))
        .ok_or(ConfigError::UnknownColor(token))
}

/// Fuzzy-resolve a color token ("lred", "blu", "3", ...).
pub fn resolve_color(token: &str) -> Result<Color, ConfigError> {
    let names: Vec<&'static str> = Color::ALL.iter().map(|c| c.name()).collect();
    resolve_token(token, &names).map(|i| Color::ALL[i])
}

/// Fuzzy-resolve a style token ("bright", "di", "2", ...).
pub fn resolve_style(token: &str) -> Result<Style, ConfigError> {
    let names: Vec<&'static str> = Style::ALL.iter().map(|s| s.name()).collect();
    resolve_token(token, &names).map(|i| Style::ALL[i])
}

/// Look up a color by its canonical name (case-insensitive, no fuzzing).
/// Used when loading JSON configs, where only exact names are accepted.
pub fn color_by_name(name: &str) -> Option<Color> {
    let lower = name.to_lowercase();
    Color::ALL.iter().copied().find(|c| c.name() == lower)
}

/// Look up a style by its canonical name (case-insensitive, no fuzzing).
pub fn style_by_name(name: &str) -> Option<Style> {
    let lower = name.to_lowercase();
    Style::ALL.iter().copied().find(|s| s.name() == lower)
}
