// src/lib.rs
pub mod channel;
pub mod color;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod scheme;

pub use error::{ConfigError, LogError};

pub use channel::{
    ConsoleChannel, ConsoleTarget, FileChannel, LevelFilter, LogChannel, RenderContext,
};
pub use color::{resolve_color, resolve_style, Color, Style};
pub use format::{Formatter, OutputFormat};
pub use level::{LabelSet, LevelLabels, LogLevel};
pub use logger::{FlashLogger, Selector};
pub use record::{Field, LogArgs, LogRecord};
pub use scheme::{ColorEntry, ColorScheme, Preset, SpecialField, Subject, Variant};
