use crate::level::LogLevel;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde_json::Value;

/// Record fields that can appear in human-readable output, in config order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Timestamp,
    Pid,
    Tid,
    Level,
    Message,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Pid => "pid",
            Field::Tid => "tid",
            Field::Level => "level",
            Field::Message => "message",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        match name.to_lowercase().as_str() {
            "timestamp" => Some(Field::Timestamp),
            "pid" => Some(Field::Pid),
            "tid" => Some(Field::Tid),
            "level" => Some(Field::Level),
            "message" => Some(Field::Message),
            _ => None,
        }
    }

    pub fn default_order() -> Vec<Field> {
        vec![
            Field::Timestamp,
            Field::Pid,
            Field::Tid,
            Field::Level,
            Field::Message,
        ]
    }
}

/// Positional and keyword arguments for one log call.
///
/// The builder stands in for `*args, **kwargs`: positional values carry the
/// message (and any extras), keyword values become named JSON fields.
#[derive(Debug, Clone, Default)]
pub struct LogArgs {
    pub args: Vec<Value>,
    pub kwargs: IndexMap<String, Value>,
}

impl LogArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append a keyword argument. Later values override earlier ones with
    /// the same key at render time.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for LogArgs {
    fn from(message: &str) -> Self {
        LogArgs::new().arg(message)
    }
}

impl From<String> for LogArgs {
    fn from(message: String) -> Self {
        LogArgs::new().arg(message)
    }
}

impl From<Value> for LogArgs {
    fn from(value: Value) -> Self {
        LogArgs::new().arg(value)
    }
}

/// One log event, built per call and discarded after formatting.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub pid: u32,
    pub tid: u64,
    pub args: Vec<Value>,
    pub kwargs: IndexMap<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, args: LogArgs) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            pid: std::process::id(),
            tid: current_thread_id(),
            args: args.args,
            kwargs: args.kwargs,
        }
    }

    /// Primary message text: the string forms of all positional arguments
    /// joined by spaces. Empty when there are none.
    pub fn message(&self) -> String {
        self.args
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Timestamp rendered the way every output format shows it.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// String form of a JSON value for message text: strings unquoted, the rest
/// compact JSON. Serialization failures degrade to the Debug form so a bad
/// argument never drops the record.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}

/// Numeric id for the current thread, parsed out of the runtime's opaque
/// ThreadId representation ("ThreadId(3)").
fn current_thread_id() -> u64 {
    let repr = format!("{:?}", std::thread::current().id());
    repr.chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
