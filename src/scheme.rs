use crate::color::{color_by_name, resolve_color, resolve_style, style_by_name, Color, Style, RESET};
use crate::error::ConfigError;
use crate::level::LogLevel;
use crate::record::Field;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Level-independent structural elements that carry their own colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialField {
    Default,
    Bracket,
    Timestamp,
    Process,
    Thread,
    Operator,
}

impl SpecialField {
    pub const ALL: [SpecialField; 6] = [
        SpecialField::Default,
        SpecialField::Bracket,
        SpecialField::Timestamp,
        SpecialField::Process,
        SpecialField::Thread,
        SpecialField::Operator,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpecialField::Default => "default",
            SpecialField::Bracket => "bracket",
            SpecialField::Timestamp => "timestamp",
            SpecialField::Process => "process",
            SpecialField::Thread => "thread",
            SpecialField::Operator => "operator",
        }
    }
}

/// What a color entry applies to: a log level or a special field.
///
/// This is the single dispatch point for "get color by level, field, or raw
/// string key" lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Level(LogLevel),
    Special(SpecialField),
}

impl Subject {
    /// All 26 subjects in display order: 20 levels, then 6 specials.
    pub fn all() -> impl Iterator<Item = Subject> {
        LogLevel::ALL
            .iter()
            .map(|l| Subject::Level(*l))
            .chain(SpecialField::ALL.iter().map(|s| Subject::Special(*s)))
    }

    /// Canonical key used in JSON files.
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Level(level) => level.name(),
            Subject::Special(special) => special.name(),
        }
    }

    /// Resolve a raw string key to a subject, case-insensitively.
    pub fn parse(key: &str) -> Result<Subject, ConfigError> {
        let lower = key.to_lowercase();
        if let Some(level) = LogLevel::parse(&lower) {
            return Ok(Subject::Level(level));
        }
        SpecialField::ALL
            .iter()
            .copied()
            .find(|s| s.name() == lower)
            .map(Subject::Special)
            .ok_or_else(|| ConfigError::UnknownSubject(key.to_string()))
    }
}

impl From<LogLevel> for Subject {
    fn from(level: LogLevel) -> Self {
        Subject::Level(level)
    }
}

impl From<SpecialField> for Subject {
    fn from(special: SpecialField) -> Self {
        Subject::Special(special)
    }
}

/// Normal or highlight variant of a subject's colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Normal,
    Highlight,
}

/// One resolved color assignment: optional foreground, optional background,
/// and a style. `None` means "no color" (terminal default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorEntry {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub style: Style,
}

impl ColorEntry {
    pub fn new(foreground: Option<Color>, background: Option<Color>, style: Style) -> Self {
        Self {
            foreground,
            background,
            style,
        }
    }

    pub fn fg(color: Color) -> Self {
        Self::new(Some(color), None, Style::Normal)
    }

    pub fn fg_styled(color: Color, style: Style) -> Self {
        Self::new(Some(color), None, style)
    }

    /// True when this entry emits no ANSI codes at all.
    pub fn is_inert(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.style == Style::Normal
    }

    /// Concatenated ANSI escape prefix (style, then fg, then bg).
    pub fn ansi_prefix(&self) -> String {
        let mut prefix = String::new();
        prefix.push_str(self.style.code());
        if let Some(fg) = self.foreground {
            prefix.push_str(fg.fg_code());
        }
        if let Some(bg) = self.background {
            prefix.push_str(bg.bg_code());
        }
        prefix
    }

    /// Wrap `text` in this entry's codes plus a trailing reset. Inert entries
    /// return the text untouched, which is what makes the PLAIN preset plain.
    pub fn paint(&self, text: &str) -> String {
        if self.is_inert() {
            return text.to_string();
        }
        format!("{}{}{}", self.ansi_prefix(), text, RESET)
    }

    fn to_json(self) -> Value {
        json!({
            "foreground": self.foreground.map(|c| c.name()).unwrap_or(""),
            "background": self.background.map(|c| c.name()).unwrap_or(""),
            "style": self.style.name(),
        })
    }

    fn from_json(value: &Value, base: ColorEntry) -> Result<ColorEntry, ConfigError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ConfigError::InvalidConfig("color entry must be an object".into()))?;
        let mut entry = base;
        for (key, val) in obj {
            let text = val.as_str().ok_or_else(|| {
                ConfigError::InvalidConfig(format!("'{}' must be a string", key))
            })?;
            match key.as_str() {
                "foreground" => {
                    entry.foreground = parse_color_name(text)?;
                }
                "background" => {
                    entry.background = parse_color_name(text)?;
                }
                "style" => {
                    entry.style = if text.is_empty() {
                        Style::Normal
                    } else {
                        style_by_name(text).ok_or_else(|| {
                            ConfigError::InvalidConfig(format!("unknown style '{}'", text))
                        })?
                    };
                }
                other => {
                    return Err(ConfigError::InvalidConfig(format!(
                        "unknown color entry key '{}'",
                        other
                    )));
                }
            }
        }
        Ok(entry)
    }
}

/// Empty string means "no color"; anything else must be a canonical name.
fn parse_color_name(text: &str) -> Result<Option<Color>, ConfigError> {
    if text.is_empty() {
        return Ok(None);
    }
    color_by_name(text)
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidConfig(format!("unknown color '{}'", text)))
}

/// Normal and highlight entries for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubjectColors {
    pub normal: ColorEntry,
    pub highlight: ColorEntry,
}

impl SubjectColors {
    fn uniform(entry: ColorEntry) -> Self {
        Self {
            normal: entry,
            highlight: entry,
        }
    }

    /// Highlight as inverse video: the normal foreground becomes the
    /// background behind black text.
    fn with_inverse_highlight(normal: ColorEntry) -> Self {
        let highlight = match normal.foreground {
            Some(fg) => ColorEntry::new(Some(Color::Black), Some(fg), normal.style),
            None => normal,
        };
        Self { normal, highlight }
    }
}

/// Built-in scheme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Full 16-color palette
    Color,
    /// Black/white/gray foregrounds with style differentiation
    Bw,
    /// No ANSI codes at all, for non-terminal output
    Plain,
}

/// Mapping from subject (level or special field) to normal/highlight color
/// entries, plus the field order for human-readable output.
///
/// Invariant: every subject has both variants populated; constructors fill
/// all 26 subjects and JSON loading only overlays on top of a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    entries: IndexMap<Subject, SubjectColors>,
    pub field_order: Vec<Field>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::from_preset(Preset::Color)
    }
}

impl ColorScheme {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Color => Self::color(),
            Preset::Bw => Self::bw(),
            Preset::Plain => Self::plain(),
        }
    }

    /// Full-color preset.
    pub fn color() -> Self {
        let mut entries = IndexMap::new();
        for subject in Subject::all() {
            let normal = match subject {
                Subject::Level(level) => match level {
                    LogLevel::NotSet => ColorEntry::fg_styled(Color::LightBlack, Style::Dim),
                    LogLevel::Debug => ColorEntry::fg(Color::Cyan),
                    LogLevel::Info => ColorEntry::fg(Color::Green),
                    LogLevel::Warning => ColorEntry::fg(Color::Yellow),
                    LogLevel::Error => ColorEntry::fg(Color::Red),
                    LogLevel::Fatal => ColorEntry::fg_styled(Color::LightRed, Style::Bright),
                    LogLevel::Critical => {
                        ColorEntry::new(Some(Color::LightWhite), Some(Color::Red), Style::Bright)
                    }
                    LogLevel::Command => ColorEntry::fg(Color::LightBlue),
                    LogLevel::CommandOutput => ColorEntry::fg(Color::LightWhite),
                    LogLevel::CommandStderr => ColorEntry::fg(Color::LightYellow),
                    LogLevel::Custom0 => ColorEntry::fg(Color::Magenta),
                    LogLevel::Custom1 => ColorEntry::fg(Color::LightMagenta),
                    LogLevel::Custom2 => ColorEntry::fg(Color::LightCyan),
                    LogLevel::Custom3 => ColorEntry::fg(Color::LightGreen),
                    LogLevel::Custom4 => ColorEntry::fg(Color::Blue),
                    LogLevel::Custom5 => ColorEntry::fg(Color::LightYellow),
                    LogLevel::Custom6 => ColorEntry::fg(Color::White),
                    LogLevel::Custom7 => ColorEntry::fg(Color::LightBlue),
                    LogLevel::Custom8 => ColorEntry::fg(Color::Green),
                    LogLevel::Custom9 => ColorEntry::fg(Color::Red),
                },
                Subject::Special(special) => match special {
                    SpecialField::Default => ColorEntry::fg(Color::LightWhite),
                    SpecialField::Bracket => ColorEntry::fg(Color::LightBlack),
                    SpecialField::Timestamp => ColorEntry::fg(Color::Cyan),
                    SpecialField::Process => ColorEntry::fg(Color::LightBlue),
                    SpecialField::Thread => ColorEntry::fg(Color::LightBlue),
                    SpecialField::Operator => ColorEntry::fg(Color::Yellow),
                },
            };
            entries.insert(subject, SubjectColors::with_inverse_highlight(normal));
        }
        Self {
            entries,
            field_order: Field::default_order(),
        }
    }

    /// Monochrome preset: black/white/gray foregrounds, style-differentiated,
    /// no backgrounds.
    pub fn bw() -> Self {
        let mut entries = IndexMap::new();
        for subject in Subject::all() {
            let normal = match subject {
                Subject::Level(level) => match level {
                    LogLevel::NotSet | LogLevel::Debug => {
                        ColorEntry::fg_styled(Color::LightBlack, Style::Dim)
                    }
                    LogLevel::Info => ColorEntry::fg(Color::White),
                    LogLevel::Warning => ColorEntry::fg_styled(Color::White, Style::Bright),
                    LogLevel::Error | LogLevel::Fatal | LogLevel::Critical => {
                        ColorEntry::fg_styled(Color::LightWhite, Style::Bright)
                    }
                    LogLevel::Command => ColorEntry::fg_styled(Color::White, Style::Bright),
                    LogLevel::CommandOutput | LogLevel::CommandStderr => {
                        ColorEntry::fg(Color::White)
                    }
                    _ => ColorEntry::fg(Color::White),
                },
                Subject::Special(special) => match special {
                    SpecialField::Default => ColorEntry::fg(Color::White),
                    SpecialField::Bracket => ColorEntry::fg_styled(Color::LightBlack, Style::Dim),
                    SpecialField::Timestamp => ColorEntry::fg_styled(Color::White, Style::Dim),
                    SpecialField::Process | SpecialField::Thread => {
                        ColorEntry::fg_styled(Color::White, Style::Dim)
                    }
                    SpecialField::Operator => ColorEntry::fg_styled(Color::White, Style::Bright),
                },
            };
            let highlight = ColorEntry::fg_styled(
                normal.foreground.unwrap_or(Color::White),
                Style::Bright,
            );
            entries.insert(subject, SubjectColors { normal, highlight });
        }
        Self {
            entries,
            field_order: Field::default_order(),
        }
    }

    /// Inert preset: colors and styles emit nothing.
    pub fn plain() -> Self {
        let mut entries = IndexMap::new();
        for subject in Subject::all() {
            entries.insert(subject, SubjectColors::uniform(ColorEntry::default()));
        }
        Self {
            entries,
            field_order: Field::default_order(),
        }
    }

    /// Resolved entry for a subject. `inverse` selects the highlight variant;
    /// `style` overrides the stored style without mutating the scheme.
    pub fn get(&self, subject: impl Into<Subject>, inverse: bool, style: Option<Style>) -> ColorEntry {
        let subject = subject.into();
        let colors = self
            .entries
            .get(&subject)
            .or_else(|| self.entries.get(&Subject::Special(SpecialField::Default)))
            .copied()
            .unwrap_or_default();
        let mut entry = if inverse { colors.highlight } else { colors.normal };
        if let Some(style) = style {
            entry.style = style;
        }
        entry
    }

    /// Like [`get`](Self::get) but addressed by a raw string key. Fails with
    /// `UnknownSubject` when the key resolves to no level or special field.
    pub fn get_by_key(
        &self,
        key: &str,
        inverse: bool,
        style: Option<Style>,
    ) -> Result<ColorEntry, ConfigError> {
        Ok(self.get(Subject::parse(key)?, inverse, style))
    }

    /// Partial update of one variant of one subject.
    ///
    /// `None` keeps the current value (the configurator's `_`); `Some("")`
    /// clears a color to "no color"; any other token goes through fuzzy
    /// color/style resolution.
    pub fn set_colors(
        &mut self,
        subject: impl Into<Subject>,
        variant: Variant,
        foreground: Option<&str>,
        background: Option<&str>,
        style: Option<&str>,
    ) -> Result<(), ConfigError> {
        let subject = subject.into();
        let mut entry = match variant {
            Variant::Normal => self.get(subject, false, None),
            Variant::Highlight => self.get(subject, true, None),
        };

        if let Some(token) = foreground {
            entry.foreground = if token.is_empty() {
                None
            } else {
                Some(resolve_color(token)?)
            };
        }
        if let Some(token) = background {
            entry.background = if token.is_empty() {
                None
            } else {
                Some(resolve_color(token)?)
            };
        }
        if let Some(token) = style {
            entry.style = if token.is_empty() {
                Style::Normal
            } else {
                resolve_style(token)?
            };
        }

        let colors = self.entries.entry(subject).or_default();
        match variant {
            Variant::Normal => colors.normal = entry,
            Variant::Highlight => colors.highlight = entry,
        }
        Ok(())
    }

    /// Serialize the full subject mapping plus field order.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for (subject, colors) in &self.entries {
            let mut obj = Map::new();
            obj.insert("normal".into(), colors.normal.to_json());
            obj.insert("highlight".into(), colors.highlight.to_json());
            root.insert(subject.name().to_string(), Value::Object(obj));
        }
        root.insert(
            "fields".into(),
            Value::Array(
                self.field_order
                    .iter()
                    .map(|f| Value::String(f.name().to_string()))
                    .collect(),
            ),
        );
        Value::Object(root)
    }

    pub fn save_to_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load a scheme from a JSON file, overlaying it on the COLOR preset.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_file_with_base(path, Preset::Color)
    }

    /// Load a scheme from a JSON file, overlaying it on the given preset.
    /// Subjects the file omits keep the preset's values; unknown subject keys
    /// are rejected.
    pub fn from_json_file_with_base(
        path: impl AsRef<Path>,
        base: Preset,
    ) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut scheme = Self::from_preset(base);
        scheme.overlay_json(&serde_json::from_str(&text)?)?;
        Ok(scheme)
    }

    fn overlay_json(&mut self, value: &Value) -> Result<(), ConfigError> {
        let root = value
            .as_object()
            .ok_or_else(|| ConfigError::InvalidConfig("scheme config must be an object".into()))?;
        for (key, val) in root {
            if key == "fields" {
                self.field_order = parse_field_order(val)?;
                continue;
            }
            let subject = Subject::parse(key)
                .map_err(|_| ConfigError::InvalidConfig(format!("unknown subject '{}'", key)))?;
            let obj = val.as_object().ok_or_else(|| {
                ConfigError::InvalidConfig(format!("subject '{}' must be an object", key))
            })?;
            let mut colors = self.get_pair(subject);
            for (variant_key, entry_val) in obj {
                match variant_key.as_str() {
                    "normal" => colors.normal = ColorEntry::from_json(entry_val, colors.normal)?,
                    "highlight" => {
                        colors.highlight = ColorEntry::from_json(entry_val, colors.highlight)?
                    }
                    other => {
                        return Err(ConfigError::InvalidConfig(format!(
                            "unknown variant '{}' for subject '{}'",
                            other, key
                        )));
                    }
                }
            }
            self.entries.insert(subject, colors);
        }
        Ok(())
    }

    fn get_pair(&self, subject: Subject) -> SubjectColors {
        self.entries.get(&subject).copied().unwrap_or_default()
    }
}

fn parse_field_order(value: &Value) -> Result<Vec<Field>, ConfigError> {
    let items = value
        .as_array()
        .ok_or_else(|| ConfigError::InvalidConfig("'fields' must be an array".into()))?;
    let mut order = Vec::with_capacity(items.len());
    for item in items {
        let name = item
            .as_str()
            .ok_or_else(|| ConfigError::InvalidConfig("'fields' entries must be strings".into()))?;
        let field = Field::parse(name)
            .ok_or_else(|| ConfigError::InvalidConfig(format!("unknown field '{}'", name)))?;
        order.push(field);
    }
    Ok(order)
}
