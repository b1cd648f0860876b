use crate::error::LogError;
use crate::level::{LevelLabels, LogLevel};
use crate::record::{Field, LogRecord};
use crate::scheme::{ColorScheme, SpecialField, Subject};
use serde_json::{Map, Value};

/// Output encodings for rendered log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    #[value(name = "human", help = "Colored human-readable text")]
    HumanReadable,
    #[value(name = "json-pretty", help = "Indented JSON, one record per block")]
    JsonPretty,
    #[value(name = "jsonl", help = "Compact JSON, one record per line")]
    JsonLines,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "human_readable" | "human-readable" => Ok(OutputFormat::HumanReadable),
            "json-pretty" | "json_pretty" => Ok(OutputFormat::JsonPretty),
            "jsonl" | "json-lines" | "json_lines" => Ok(OutputFormat::JsonLines),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Renders one record against a color scheme, a label registry and an output
/// format. Borrows its configuration; construct per render site.
pub struct Formatter<'a> {
    scheme: &'a ColorScheme,
    labels: &'a LevelLabels,
    format: OutputFormat,
}

impl<'a> Formatter<'a> {
    pub fn new(scheme: &'a ColorScheme, labels: &'a LevelLabels, format: OutputFormat) -> Self {
        Self {
            scheme,
            labels,
            format,
        }
    }

    pub fn render(&self, record: &LogRecord) -> Result<String, LogError> {
        match self.format {
            OutputFormat::HumanReadable => self.render_human(record),
            OutputFormat::JsonPretty => {
                let data = self.build_json(record);
                serde_json::to_string_pretty(&Value::Object(data))
                    .map_err(|e| LogError::Format(e.to_string()))
            }
            OutputFormat::JsonLines => {
                let data = self.build_json(record);
                serde_json::to_string(&Value::Object(data))
                    .map_err(|e| LogError::Format(e.to_string()))
            }
        }
    }

    /// Display label for the record's level, uppercased for warning and
    /// above so problems stand out in human-readable output.
    fn level_text(&self, level: LogLevel) -> String {
        let label = self.labels.label(level);
        if level.rank() >= LogLevel::Warning.rank() {
            label.to_uppercase()
        } else {
            label.to_string()
        }
    }

    fn bracketed(&self, inner: String) -> String {
        let bracket = self.scheme.get(SpecialField::Bracket, false, None);
        format!("{}{}{}", bracket.paint("["), inner, bracket.paint("]"))
    }

    fn render_human(&self, record: &LogRecord) -> Result<String, LogError> {
        if record.level.is_command() {
            return Ok(self.render_command(record));
        }

        let mut parts = Vec::with_capacity(self.scheme.field_order.len());
        for field in &self.scheme.field_order {
            let part = match field {
                Field::Timestamp => {
                    let entry = self.scheme.get(SpecialField::Timestamp, false, None);
                    self.bracketed(entry.paint(&record.timestamp_text()))
                }
                Field::Pid => {
                    let entry = self.scheme.get(SpecialField::Process, false, None);
                    self.bracketed(entry.paint(&format!("pid:{}", record.pid)))
                }
                Field::Tid => {
                    let entry = self.scheme.get(SpecialField::Thread, false, None);
                    self.bracketed(entry.paint(&format!("tid:{}", record.tid)))
                }
                Field::Level => {
                    let entry = self.scheme.get(Subject::Level(record.level), false, None);
                    self.bracketed(entry.paint(&self.level_text(record.level)))
                }
                Field::Message => {
                    let entry = self.scheme.get(SpecialField::Default, false, None);
                    entry.paint(&record.message())
                }
            };
            parts.push(part);
        }
        Ok(parts.join(" "))
    }

    /// Command levels render as shell-transcript lines rather than bracketed
    /// field rows.
    fn render_command(&self, record: &LogRecord) -> String {
        let message_entry = self.scheme.get(SpecialField::Default, false, None);
        let operator = self.scheme.get(SpecialField::Operator, false, None);

        match record.level {
            LogLevel::Command => {
                let level_entry = self.scheme.get(Subject::Level(record.level), false, None);
                let comment = operator.paint(&format!(
                    " ## command executed at {}",
                    record.timestamp_text()
                ));
                format!("{}{}", level_entry.paint(&record.message()), comment)
            }
            _ => {
                let stream = if record.level == LogLevel::CommandStderr {
                    "stderr"
                } else {
                    "stdout"
                };
                let highlight = self.scheme.get(Subject::Level(record.level), true, None);
                format!(
                    "{}{}{}: {}",
                    operator.paint("("),
                    highlight.paint(stream),
                    operator.paint(")"),
                    message_entry.paint(&record.message())
                )
            }
        }
    }

    /// Structured form shared by both JSON formats. Colors never appear here.
    ///
    /// Argument merging: a sole positional mapping is merged into the record
    /// top-level (no message key); otherwise the first positional is the
    /// message and extras get synthesized `message0`, `message1`, ... keys.
    /// Keyword arguments land under their own names, overriding earlier
    /// entries on collision.
    fn build_json(&self, record: &LogRecord) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            "timestamp".into(),
            Value::String(record.timestamp_text()),
        );
        data.insert(
            "level".into(),
            Value::String(self.labels.label(record.level).to_string()),
        );
        data.insert("pid".into(), record.pid.into());
        data.insert("tid".into(), record.tid.into());

        match record.args.as_slice() {
            [Value::Object(map)] => {
                for (key, value) in map {
                    data.insert(key.clone(), value.clone());
                }
            }
            [first, rest @ ..] => {
                data.insert("message".into(), first.clone());
                for (i, value) in rest.iter().enumerate() {
                    data.insert(format!("message{}", i), value.clone());
                }
            }
            [] => {}
        }

        for (key, value) in &record.kwargs {
            data.insert(key.clone(), value.clone());
        }

        match record.level {
            LogLevel::Command => {
                data.insert("type".into(), "command".into());
            }
            LogLevel::CommandOutput => {
                data.insert("type".into(), "stdout".into());
            }
            LogLevel::CommandStderr => {
                data.insert("type".into(), "stderr".into());
            }
            _ => {}
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogArgs;
    use serde_json::json;

    fn plain_formatter<'a>(
        scheme: &'a ColorScheme,
        labels: &'a LevelLabels,
        format: OutputFormat,
    ) -> Formatter<'a> {
        Formatter::new(scheme, labels, format)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::HumanReadable);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLines);
        assert_eq!("json_pretty".parse::<OutputFormat>().unwrap(), OutputFormat::JsonPretty);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_human_plain_layout() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);

        let record = LogRecord::new(LogLevel::Info, "hello world".into());
        let line = formatter.render(&record).unwrap();

        assert!(line.contains(&format!("[pid:{}]", record.pid)));
        assert!(line.contains(&format!("[tid:{}]", record.tid)));
        assert!(line.contains("[info]"));
        assert!(line.ends_with("hello world"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_human_uppercases_severe_levels() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);

        let record = LogRecord::new(LogLevel::Error, "boom".into());
        assert!(formatter.render(&record).unwrap().contains("[ERROR]"));

        let record = LogRecord::new(LogLevel::Debug, "fine".into());
        assert!(formatter.render(&record).unwrap().contains("[debug]"));
    }

    #[test]
    fn test_human_colored_output_has_ansi() {
        let scheme = ColorScheme::color();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);

        let record = LogRecord::new(LogLevel::Warning, "careful".into());
        let line = formatter.render(&record).unwrap();
        assert!(line.contains("\x1b[33m")); // warning yellow
        assert!(line.contains("\x1b[0m"));
    }

    #[test]
    fn test_human_respects_field_order() {
        let mut scheme = ColorScheme::plain();
        scheme.field_order = vec![Field::Level, Field::Message];
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);

        let record = LogRecord::new(LogLevel::Info, "short".into());
        assert_eq!(formatter.render(&record).unwrap(), "[info] short");
    }

    #[test]
    fn test_command_rendering() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);

        let record = LogRecord::new(LogLevel::Command, "ls -l".into());
        let line = formatter.render(&record).unwrap();
        assert!(line.starts_with("ls -l"));
        assert!(line.contains("## command executed at"));

        let record = LogRecord::new(LogLevel::CommandStderr, "oops".into());
        assert_eq!(formatter.render(&record).unwrap(), "(stderr): oops");
    }

    #[test]
    fn test_json_lines_basic() {
        let scheme = ColorScheme::color(); // colors must not leak into JSON
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);

        let record = LogRecord::new(
            LogLevel::Info,
            LogArgs::from("Operation").field("completed", true),
        );
        let line = formatter.render(&record).unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\x1b'));

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["message"], json!("Operation"));
        assert_eq!(parsed["completed"], json!(true));
        assert_eq!(parsed["level"], json!("info"));
        assert_eq!(parsed["pid"], json!(record.pid));
    }

    #[test]
    fn test_json_sole_mapping_merges_top_level() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);

        let record = LogRecord::new(LogLevel::Custom0, json!({"user_id": 123}).into());
        let parsed: Value = serde_json::from_str(&formatter.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["user_id"], json!(123));
        assert!(parsed.get("message").is_none());
    }

    #[test]
    fn test_json_extra_positionals_get_synthesized_keys() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);

        let record = LogRecord::new(
            LogLevel::Info,
            LogArgs::new().arg("first").arg("second").arg(json!(3)),
        );
        let parsed: Value = serde_json::from_str(&formatter.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["message"], json!("first"));
        assert_eq!(parsed["message0"], json!("second"));
        assert_eq!(parsed["message1"], json!(3));
    }

    #[test]
    fn test_json_kwargs_override_on_collision() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);

        let record = LogRecord::new(
            LogLevel::Info,
            LogArgs::from("text").field("message", "overridden"),
        );
        let parsed: Value = serde_json::from_str(&formatter.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["message"], json!("overridden"));
    }

    #[test]
    fn test_json_pretty_is_indented() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonPretty);

        let record = LogRecord::new(LogLevel::Info, "x".into());
        let text = formatter.render(&record).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("  \"level\""));
    }

    #[test]
    fn test_json_command_type_field() {
        let scheme = ColorScheme::plain();
        let labels = LevelLabels::new();
        let formatter = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);

        let record = LogRecord::new(LogLevel::CommandOutput, "out".into());
        let parsed: Value = serde_json::from_str(&formatter.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["type"], json!("stdout"));
    }

    #[test]
    fn test_label_override_shows_in_both_formats() {
        let scheme = ColorScheme::plain();
        let mut labels = LevelLabels::new();
        labels.set(LogLevel::Warning, "warnung");
        let record = LogRecord::new(LogLevel::Warning, "achtung".into());

        let human = plain_formatter(&scheme, &labels, OutputFormat::HumanReadable);
        let line = human.render(&record).unwrap();
        assert!(line.contains("[WARNUNG]"));
        assert!(!line.contains("WARNING"));

        let jsonl = plain_formatter(&scheme, &labels, OutputFormat::JsonLines);
        let parsed: Value = serde_json::from_str(&jsonl.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["level"], json!("warnung"));
    }
}
