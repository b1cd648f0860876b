use crate::error::LogError;
use crate::format::{Formatter, OutputFormat};
use crate::level::{LevelLabels, LogLevel};
use crate::record::LogRecord;
use crate::scheme::{ColorScheme, Preset};
use is_terminal::IsTerminal;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Which levels a channel accepts.
///
/// `Threshold` compares ranks (inclusive); the list modes name exact levels,
/// so `Include` can pass INFO and ERROR while still blocking WARNING, which
/// no threshold can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelFilter {
    Threshold(LogLevel),
    Include(Vec<LogLevel>),
    Exclude(Vec<LogLevel>),
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::Threshold(LogLevel::NotSet)
    }
}

impl LevelFilter {
    pub fn allows(&self, level: LogLevel) -> bool {
        match self {
            LevelFilter::Threshold(min) => level.rank() >= min.rank(),
            LevelFilter::Include(levels) => levels.contains(&level),
            LevelFilter::Exclude(levels) => !levels.contains(&level),
        }
    }
}

/// Per-channel settings. `scheme` and `output_format` are overrides: `None`
/// inherits the logger's global setting at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    pub filter: LevelFilter,
    pub scheme: Option<ColorScheme>,
    pub output_format: Option<OutputFormat>,
}

/// Logger-global settings a channel falls back to when it carries no
/// override of its own.
pub struct RenderContext<'a> {
    pub labels: &'a LevelLabels,
    pub scheme: &'a ColorScheme,
    pub format: OutputFormat,
}

/// An independently configured log sink with its own threshold, scheme and
/// format. Implementations only provide the sink write; filtering and
/// formatting are shared.
pub trait LogChannel {
    /// Short type name used by selector lookups ("console", "file").
    fn kind(&self) -> &'static str;

    fn config(&self) -> &ChannelConfig;
    fn config_mut(&mut self) -> &mut ChannelConfig;

    /// Write one already-formatted line to the sink.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Level check against the channel's filter. The default threshold
    /// filter is inclusive: a record passes when its rank is at least the
    /// channel minimum.
    fn is_loggable(&self, level: LogLevel) -> bool {
        self.config().filter.allows(level)
    }

    /// Filter, format and write one record. Records below the threshold are
    /// dropped before any formatting work happens.
    fn do_log(&mut self, record: &LogRecord, ctx: &RenderContext<'_>) -> Result<(), LogError> {
        if !self.is_loggable(record.level) {
            return Ok(());
        }
        let line = {
            let cfg = self.config();
            let scheme = cfg.scheme.as_ref().unwrap_or(ctx.scheme);
            let format = cfg.output_format.unwrap_or(ctx.format);
            Formatter::new(scheme, ctx.labels, format).render(record)?
        };
        self.write_line(&line)?;
        Ok(())
    }

    /// Shorthand for a threshold filter at the given level.
    fn set_min_level(&mut self, level: LogLevel) {
        self.config_mut().filter = LevelFilter::Threshold(level);
    }

    fn set_level_filter(&mut self, filter: LevelFilter) {
        self.config_mut().filter = filter;
    }

    /// Per-channel scheme override; takes precedence over the logger global.
    fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.config_mut().scheme = Some(scheme);
    }

    /// Per-channel format override; takes precedence over the logger global.
    fn set_output_format(&mut self, format: OutputFormat) {
        self.config_mut().output_format = Some(format);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

/// Channel writing to stdout or stderr. When the target is not a terminal
/// the channel pins itself to the PLAIN scheme so pipes never see ANSI.
pub struct ConsoleChannel {
    target: ConsoleTarget,
    config: ChannelConfig,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self::with_target(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::with_target(ConsoleTarget::Stderr)
    }

    pub fn with_target(target: ConsoleTarget) -> Self {
        let is_tty = match target {
            ConsoleTarget::Stdout => io::stdout().is_terminal(),
            ConsoleTarget::Stderr => io::stderr().is_terminal(),
        };
        let mut config = ChannelConfig::default();
        if !is_tty {
            config.scheme = Some(ColorScheme::plain());
        }
        Self { target, config }
    }

    pub fn with_preset(preset: Preset) -> Self {
        let mut channel = Self::new();
        channel.config.scheme = Some(ColorScheme::from_preset(preset));
        channel
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.config.filter = LevelFilter::Threshold(level);
        self
    }

    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.config.filter = filter;
        self
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LogChannel for ConsoleChannel {
    fn kind(&self) -> &'static str {
        "console"
    }

    fn config(&self) -> &ChannelConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChannelConfig {
        &mut self.config
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
            ConsoleTarget::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{}", line)?;
                err.flush()
            }
        }
    }
}

/// Channel appending to a log file. Parent directories are created on open;
/// every write is flushed before returning so ordering matches call order.
/// Defaults to the PLAIN scheme since files are not terminals.
pub struct FileChannel {
    path: PathBuf,
    file: File,
    config: ChannelConfig,
}

impl FileChannel {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file,
            config: ChannelConfig {
                scheme: Some(ColorScheme::plain()),
                ..ChannelConfig::default()
            },
        })
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.config.filter = LevelFilter::Threshold(level);
        self
    }

    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogChannel for FileChannel {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn config(&self) -> &ChannelConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChannelConfig {
        &mut self.config
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{}", line)?;
        self.file.flush()
    }
}
