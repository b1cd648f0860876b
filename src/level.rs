use crate::error::ConfigError;
use indexmap::IndexMap;
use std::path::Path;

/// Log levels. The set is closed: ten custom slots exist for callers that
/// need domain-specific levels, relabelled at runtime via [`LevelLabels`].
///
/// Rank table (threshold filtering compares ranks, inclusive):
///
/// | level                              | rank |
/// |------------------------------------|------|
/// | NotSet                             | 0    |
/// | Debug                              | 10   |
/// | Info                               | 20   |
/// | Command                            | 21   |
/// | CommandOutput                      | 22   |
/// | CommandStderr                      | 23   |
/// | Custom0..Custom9                   | 25   |
/// | Warning                            | 30   |
/// | Error                              | 40   |
/// | Fatal                              | 50   |
/// | Critical                           | 60   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LogLevel {
    #[default]
    NotSet,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Critical,
    Command,
    CommandOutput,
    CommandStderr,
    Custom0,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Custom6,
    Custom7,
    Custom8,
    Custom9,
}

impl LogLevel {
    /// All levels in display order (the order the configurator lists them).
    pub const ALL: [LogLevel; 20] = [
        LogLevel::NotSet,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Critical,
        LogLevel::Command,
        LogLevel::CommandOutput,
        LogLevel::CommandStderr,
        LogLevel::Custom0,
        LogLevel::Custom1,
        LogLevel::Custom2,
        LogLevel::Custom3,
        LogLevel::Custom4,
        LogLevel::Custom5,
        LogLevel::Custom6,
        LogLevel::Custom7,
        LogLevel::Custom8,
        LogLevel::Custom9,
    ];

    /// Numeric severity rank used by channel thresholds.
    pub fn rank(&self) -> u8 {
        match self {
            LogLevel::NotSet => 0,
            LogLevel::Debug => 10,
            LogLevel::Info => 20,
            LogLevel::Command => 21,
            LogLevel::CommandOutput => 22,
            LogLevel::CommandStderr => 23,
            LogLevel::Custom0
            | LogLevel::Custom1
            | LogLevel::Custom2
            | LogLevel::Custom3
            | LogLevel::Custom4
            | LogLevel::Custom5
            | LogLevel::Custom6
            | LogLevel::Custom7
            | LogLevel::Custom8
            | LogLevel::Custom9 => 25,
            LogLevel::Warning => 30,
            LogLevel::Error => 40,
            LogLevel::Fatal => 50,
            LogLevel::Critical => 60,
        }
    }

    /// Canonical lower-case name, used as JSON key and default label.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::NotSet => "notset",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Critical => "critical",
            LogLevel::Command => "command",
            LogLevel::CommandOutput => "command_output",
            LogLevel::CommandStderr => "command_stderr",
            LogLevel::Custom0 => "custom0",
            LogLevel::Custom1 => "custom1",
            LogLevel::Custom2 => "custom2",
            LogLevel::Custom3 => "custom3",
            LogLevel::Custom4 => "custom4",
            LogLevel::Custom5 => "custom5",
            LogLevel::Custom6 => "custom6",
            LogLevel::Custom7 => "custom7",
            LogLevel::Custom8 => "custom8",
            LogLevel::Custom9 => "custom9",
        }
    }

    /// Parse a canonical level name, case-insensitively.
    pub fn parse(name: &str) -> Option<LogLevel> {
        let lower = name.to_lowercase();
        LogLevel::ALL.iter().copied().find(|l| l.name() == lower)
    }

    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            LogLevel::Custom0
                | LogLevel::Custom1
                | LogLevel::Custom2
                | LogLevel::Custom3
                | LogLevel::Custom4
                | LogLevel::Custom5
                | LogLevel::Custom6
                | LogLevel::Custom7
                | LogLevel::Custom8
                | LogLevel::Custom9
        )
    }

    pub fn is_command(&self) -> bool {
        matches!(
            self,
            LogLevel::Command | LogLevel::CommandOutput | LogLevel::CommandStderr
        )
    }
}

/// Built-in label sets for the standard levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSet {
    En,
    De,
}

impl LabelSet {
    fn entries(&self) -> &'static [(LogLevel, &'static str)] {
        match self {
            LabelSet::En => &[
                (LogLevel::NotSet, "notset"),
                (LogLevel::Debug, "debug"),
                (LogLevel::Info, "info"),
                (LogLevel::Warning, "warning"),
                (LogLevel::Error, "error"),
                (LogLevel::Fatal, "fatal"),
                (LogLevel::Critical, "critical"),
                (LogLevel::Command, "command"),
                (LogLevel::CommandOutput, "stdout"),
                (LogLevel::CommandStderr, "stderr"),
            ],
            LabelSet::De => &[
                (LogLevel::NotSet, "nicht gesetzt"),
                (LogLevel::Debug, "fehlersuche"),
                (LogLevel::Info, "info"),
                (LogLevel::Warning, "warnung"),
                (LogLevel::Error, "fehler"),
                (LogLevel::Fatal, "fatal"),
                (LogLevel::Critical, "kritisch"),
                (LogLevel::Command, "befehl"),
                (LogLevel::CommandOutput, "ausgabe"),
                (LogLevel::CommandStderr, "fehlerausgabe"),
            ],
        }
    }
}

/// Mutable display labels for log levels.
///
/// Labels never affect ranks; unlabelled levels fall back to their canonical
/// name. An explicitly constructed registry (rather than process globals) so
/// independent loggers can carry different label sets.
#[derive(Debug, Clone, Default)]
pub struct LevelLabels {
    overrides: IndexMap<LogLevel, String>,
}

impl LevelLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated from a built-in label set.
    pub fn from_set(set: LabelSet) -> Self {
        let mut labels = Self::new();
        labels.load_set(set);
        labels
    }

    /// Display label for a level: the override if set, otherwise the
    /// canonical name.
    pub fn label(&self, level: LogLevel) -> &str {
        self.overrides
            .get(&level)
            .map(|s| s.as_str())
            .unwrap_or(level.name())
    }

    /// Override the display label for one level.
    pub fn set(&mut self, level: LogLevel, label: impl Into<String>) {
        self.overrides.insert(level, label.into());
    }

    /// Drop all overrides, reverting every level to its canonical name.
    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    /// Replace labels from a built-in set. Levels the set does not mention
    /// keep their current labels.
    pub fn load_set(&mut self, set: LabelSet) {
        for (level, label) in set.entries() {
            self.overrides.insert(*level, (*label).to_string());
        }
    }

    /// Load labels from a JSON file mapping level names to label strings.
    ///
    /// Unknown keys are ignored (forward-compatible loading); levels the file
    /// does not mention keep their current labels.
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let data: IndexMap<String, String> = serde_json::from_str(&text)?;
        for (name, label) in data {
            if let Some(level) = LogLevel::parse(&name) {
                self.overrides.insert(level, label);
            }
        }
        Ok(())
    }

    /// Save current overrides as a flat name-to-label JSON mapping.
    pub fn save_to_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let mut data = IndexMap::new();
        for (level, label) in &self.overrides {
            data.insert(level.name().to_string(), label.clone());
        }
        let text = serde_json::to_string_pretty(&data)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rank_ordering() {
        assert!(LogLevel::Debug.rank() < LogLevel::Info.rank());
        assert!(LogLevel::Info.rank() < LogLevel::Warning.rank());
        assert!(LogLevel::Warning.rank() < LogLevel::Error.rank());
        assert!(LogLevel::Error.rank() < LogLevel::Fatal.rank());
        assert!(LogLevel::Fatal.rank() < LogLevel::Critical.rank());
        // commands and customs sit between info and warning
        assert!(LogLevel::Command.rank() > LogLevel::Info.rank());
        assert!(LogLevel::Custom3.rank() > LogLevel::Info.rank());
        assert!(LogLevel::Custom3.rank() < LogLevel::Warning.rank());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("COMMAND_OUTPUT"), Some(LogLevel::CommandOutput));
        assert_eq!(LogLevel::parse("custom7"), Some(LogLevel::Custom7));
        assert_eq!(LogLevel::parse("nope"), None);
    }

    #[test]
    fn test_label_override_and_fallback() {
        let mut labels = LevelLabels::new();
        assert_eq!(labels.label(LogLevel::Warning), "warning");

        labels.set(LogLevel::Warning, "WARN!");
        assert_eq!(labels.label(LogLevel::Warning), "WARN!");
        // rank unaffected by the label
        assert_eq!(LogLevel::Warning.rank(), 30);

        labels.clear();
        assert_eq!(labels.label(LogLevel::Warning), "warning");
    }

    #[test]
    fn test_german_label_set() {
        let labels = LevelLabels::from_set(LabelSet::De);
        assert_eq!(labels.label(LogLevel::Warning), "warnung");
        assert_eq!(labels.label(LogLevel::Error), "fehler");
        // customs are not part of the built-in sets
        assert_eq!(labels.label(LogLevel::Custom0), "custom0");
    }

    #[test]
    fn test_json_load_ignores_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"custom0": "audit", "no_such_level": "x", "warning": "WRN"}}"#
        )
        .unwrap();

        let mut labels = LevelLabels::new();
        labels.set(LogLevel::Custom1, "kept");
        labels.load_from_json(file.path()).unwrap();

        assert_eq!(labels.label(LogLevel::Custom0), "audit");
        assert_eq!(labels.label(LogLevel::Warning), "WRN");
        // unmentioned levels keep their prior labels
        assert_eq!(labels.label(LogLevel::Custom1), "kept");
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");

        let mut labels = LevelLabels::new();
        labels.set(LogLevel::Custom0, "audit");
        labels.set(LogLevel::Custom1, "billing");
        labels.save_to_json(&path).unwrap();

        let mut reloaded = LevelLabels::new();
        reloaded.load_from_json(&path).unwrap();
        assert_eq!(reloaded.label(LogLevel::Custom0), "audit");
        assert_eq!(reloaded.label(LogLevel::Custom1), "billing");
    }
}
