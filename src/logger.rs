use crate::channel::{LogChannel, RenderContext};
use crate::error::{ConfigError, LogError};
use crate::format::OutputFormat;
use crate::level::{LabelSet, LevelLabels, LogLevel};
use crate::record::{LogArgs, LogRecord};
use crate::scheme::ColorScheme;

/// Addresses a registered channel by id, explicit selector name, or channel
/// kind ("console", "file").
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    Id(usize),
    Name(&'a str),
}

impl From<usize> for Selector<'_> {
    fn from(id: usize) -> Self {
        Selector::Id(id)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(name: &'a str) -> Self {
        Selector::Name(name)
    }
}

struct ChannelEntry {
    id: usize,
    selector: Option<String>,
    channel: Box<dyn LogChannel>,
}

impl ChannelEntry {
    fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Id(id) => self.id == id,
            Selector::Name(name) => {
                let lower = name.to_lowercase();
                self.selector.as_deref() == Some(name) || self.channel.kind() == lower
            }
        }
    }
}

/// Facade aggregating log channels. Each log call is dispatched to every
/// registered channel; channels filter by their own threshold and render
/// with their own scheme/format overrides (the logger's globals otherwise).
///
/// No internal locking: callers sharing a logger across threads must
/// synchronize externally.
pub struct FlashLogger {
    channels: Vec<ChannelEntry>,
    next_id: usize,
    labels: LevelLabels,
    scheme: ColorScheme,
    format: OutputFormat,
    dropped: u64,
}

impl Default for FlashLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashLogger {
    /// Logger with no channels. Logging into it is a no-op until channels
    /// are added.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            next_id: 0,
            labels: LevelLabels::new(),
            scheme: ColorScheme::default(),
            format: OutputFormat::default(),
            dropped: 0,
        }
    }

    /// Register a channel, optionally under a selector name. Returns the
    /// channel id. Duplicate selector names are rejected; duplicate channel
    /// instances cannot occur since the logger takes ownership.
    pub fn add_channel(
        &mut self,
        channel: impl LogChannel + 'static,
        selector: Option<&str>,
    ) -> Result<usize, ConfigError> {
        if let Some(name) = selector {
            if self.channels.iter().any(|e| e.selector.as_deref() == Some(name)) {
                return Err(ConfigError::InvalidConfig(format!(
                    "channel selector '{}' already registered",
                    name
                )));
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.channels.push(ChannelEntry {
            id,
            selector: selector.map(str::to_string),
            channel: Box::new(channel),
        });
        Ok(id)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn get_channel<'a>(
        &self,
        selector: impl Into<Selector<'a>>,
    ) -> Result<&dyn LogChannel, LogError> {
        let selector = selector.into();
        self.channels
            .iter()
            .find(|e| e.matches(selector))
            .map(|e| e.channel.as_ref())
            .ok_or_else(|| LogError::ChannelNotFound(selector_text(selector)))
    }

    pub fn get_channel_mut<'a>(
        &mut self,
        selector: impl Into<Selector<'a>>,
    ) -> Result<&mut (dyn LogChannel + 'static), LogError> {
        let selector = selector.into();
        self.channels
            .iter_mut()
            .find(|e| e.matches(selector))
            .map(|e| e.channel.as_mut())
            .ok_or_else(|| LogError::ChannelNotFound(selector_text(selector)))
    }

    pub fn remove_channel<'a>(
        &mut self,
        selector: impl Into<Selector<'a>>,
    ) -> Result<Box<dyn LogChannel>, LogError> {
        let selector = selector.into();
        let idx = self
            .channels
            .iter()
            .position(|e| e.matches(selector))
            .ok_or_else(|| LogError::ChannelNotFound(selector_text(selector)))?;
        Ok(self.channels.remove(idx).channel)
    }

    pub fn labels(&self) -> &LevelLabels {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut LevelLabels {
        &mut self.labels
    }

    pub fn set_labels(&mut self, labels: LevelLabels) {
        self.labels = labels;
    }

    /// Replace labels from a built-in set (EN/DE).
    pub fn load_labels(&mut self, set: LabelSet) {
        self.labels.load_set(set);
    }

    /// Global output format, used by channels without a format override.
    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Global color scheme, used by channels without a scheme override.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    /// Records that failed delivery to at least one channel.
    pub fn dropped_records(&self) -> u64 {
        self.dropped
    }

    /// Dispatch one record to every channel. Channel failures are counted
    /// and reported on stderr; they never propagate to the caller, so one
    /// broken sink cannot suppress delivery to the others.
    pub fn log(&mut self, level: LogLevel, args: impl Into<LogArgs>) {
        let record = LogRecord::new(level, args.into());
        let ctx = RenderContext {
            labels: &self.labels,
            scheme: &self.scheme,
            format: self.format,
        };
        for entry in &mut self.channels {
            if let Err(err) = entry.channel.do_log(&record, &ctx) {
                self.dropped += 1;
                eprintln!(
                    "flashlog: error logging to {} channel: {}",
                    entry.channel.kind(),
                    err
                );
            }
        }
    }

    pub fn log_notset(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::NotSet, args);
    }

    pub fn log_debug(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Debug, args);
    }

    pub fn log_info(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Info, args);
    }

    pub fn log_warning(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Warning, args);
    }

    pub fn log_error(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Error, args);
    }

    pub fn log_fatal(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Fatal, args);
    }

    pub fn log_critical(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Critical, args);
    }

    pub fn log_command(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Command, args);
    }

    pub fn log_command_output(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::CommandOutput, args);
    }

    pub fn log_command_stderr(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::CommandStderr, args);
    }

    pub fn log_custom0(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom0, args);
    }

    pub fn log_custom1(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom1, args);
    }

    pub fn log_custom2(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom2, args);
    }

    pub fn log_custom3(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom3, args);
    }

    pub fn log_custom4(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom4, args);
    }

    pub fn log_custom5(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom5, args);
    }

    pub fn log_custom6(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom6, args);
    }

    pub fn log_custom7(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom7, args);
    }

    pub fn log_custom8(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom8, args);
    }

    pub fn log_custom9(&mut self, args: impl Into<LogArgs>) {
        self.log(LogLevel::Custom9, args);
    }

    /// Banner-style info line.
    pub fn log_header(&mut self, header: &str) {
        self.log_info(format!("# {} #", header));
    }

    /// Progress line at the given verbosity, with an optional parenthesized
    /// comment appended.
    pub fn log_progress_output(
        &mut self,
        message: &str,
        verbosity: LogLevel,
        extra_comment: Option<&str>,
    ) {
        let message = match extra_comment {
            Some(comment) => format!("{} ({})", message, comment),
            None => message.to_string(),
        };
        self.log(verbosity, message);
    }
}

fn selector_text(selector: Selector<'_>) -> String {
    match selector {
        Selector::Id(id) => id.to_string(),
        Selector::Name(name) => name.to_string(),
    }
}
