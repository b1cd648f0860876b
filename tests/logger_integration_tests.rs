use flashlog::channel::{ChannelConfig, FileChannel, LevelFilter, LogChannel, RenderContext};
use flashlog::format::OutputFormat;
use flashlog::level::{LabelSet, LogLevel};
use flashlog::logger::FlashLogger;
use flashlog::record::{LogArgs, LogRecord};
use flashlog::scheme::ColorScheme;
use serde_json::json;
use std::io;

fn file_logger(
    dir: &tempfile::TempDir,
    name: &str,
    min_level: LogLevel,
) -> (FlashLogger, std::path::PathBuf) {
    let path = dir.path().join(name);
    let mut logger = FlashLogger::new();
    logger
        .add_channel(
            FileChannel::new(&path).unwrap().with_min_level(min_level),
            None,
        )
        .unwrap();
    (logger, path)
}

#[test]
fn warning_reaches_lenient_channel_only() {
    let dir = tempfile::tempdir().unwrap();
    let info_path = dir.path().join("info.log");
    let error_path = dir.path().join("error.log");

    let mut logger = FlashLogger::new();
    logger
        .add_channel(
            FileChannel::new(&info_path)
                .unwrap()
                .with_min_level(LogLevel::Info),
            Some("lenient"),
        )
        .unwrap();
    logger
        .add_channel(
            FileChannel::new(&error_path)
                .unwrap()
                .with_min_level(LogLevel::Error),
            Some("strict"),
        )
        .unwrap();

    logger.log_warning("disk almost full");

    let info_content = std::fs::read_to_string(&info_path).unwrap();
    let error_content = std::fs::read_to_string(&error_path).unwrap();
    assert!(info_content.contains("disk almost full"));
    assert!(error_content.is_empty());
}

#[test]
fn debug_and_info_dropped_below_warning_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let (mut logger, path) = file_logger(&dir, "app.log", LogLevel::Warning);

    logger.log_debug("d");
    logger.log_info("i");
    logger.log_custom5("c");
    logger.log_warning("w");
    logger.log_error("e");
    logger.log_fatal("f");
    logger.log_critical("c!");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains("[WARNING]"));
    assert!(content.contains("[ERROR]"));
    assert!(content.contains("[FATAL]"));
    assert!(content.contains("[CRITICAL]"));
}

#[test]
fn include_filter_delivers_only_listed_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("picky.log");

    let mut logger = FlashLogger::new();
    logger
        .add_channel(
            FileChannel::new(&path)
                .unwrap()
                .with_filter(LevelFilter::Include(vec![LogLevel::Info, LogLevel::Error])),
            Some("picky"),
        )
        .unwrap();

    logger.log_debug("d");
    logger.log_info("kept info");
    logger.log_warning("w");
    logger.log_error("kept error");
    logger.log_critical("c");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("kept info"));
    assert!(content.contains("kept error"));
}

#[test]
fn exclude_filter_drops_only_listed_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiet.log");

    let mut logger = FlashLogger::new();
    logger
        .add_channel(FileChannel::new(&path).unwrap(), Some("quiet"))
        .unwrap();
    logger
        .get_channel_mut("quiet")
        .unwrap()
        .set_level_filter(LevelFilter::Exclude(vec![LogLevel::Debug, LogLevel::Info]));

    logger.log_debug("d");
    logger.log_info("i");
    logger.log_warning("kept warning");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("kept warning"));
}

#[test]
fn german_labels_show_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let (mut logger, path) = file_logger(&dir, "de.log", LogLevel::NotSet);

    logger.load_labels(LabelSet::De);
    logger.log_warning("Achtung bitte");

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("WARNUNG"));
    assert!(!content.contains("WARNING"));
}

#[test]
fn json_lines_argument_merging_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (mut logger, path) = file_logger(&dir, "out.jsonl", LogLevel::NotSet);
    logger.set_output_format(OutputFormat::JsonLines);

    logger.log_custom0(json!({"user_id": 123}));
    logger.log_info(LogArgs::from("Operation").field("completed", true));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["user_id"], json!(123));
    assert!(first.get("message").is_none());

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["message"], json!("Operation"));
    assert_eq!(second["completed"], json!(true));
}

#[test]
fn global_format_applies_where_channel_has_no_override() {
    let dir = tempfile::tempdir().unwrap();
    let human_path = dir.path().join("human.log");
    let json_path = dir.path().join("records.jsonl");

    let mut logger = FlashLogger::new();
    logger
        .add_channel(FileChannel::new(&human_path).unwrap(), Some("human"))
        .unwrap();
    let mut json_channel = FileChannel::new(&json_path).unwrap();
    json_channel.set_output_format(OutputFormat::JsonLines);
    logger.add_channel(json_channel, Some("json")).unwrap();

    // global stays human-readable; only the second channel overrides
    logger.log_error("mixed delivery");

    let human = std::fs::read_to_string(&human_path).unwrap();
    assert!(human.contains("[ERROR]"));
    assert!(serde_json::from_str::<serde_json::Value>(human.trim()).is_err());

    let json_content = std::fs::read_to_string(&json_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(json_content.trim()).unwrap();
    assert_eq!(parsed["message"], json!("mixed delivery"));
}

/// Channel whose sink always fails, for error-isolation tests.
struct BrokenChannel {
    config: ChannelConfig,
}

impl BrokenChannel {
    fn new() -> Self {
        Self {
            config: ChannelConfig::default(),
        }
    }
}

impl LogChannel for BrokenChannel {
    fn kind(&self) -> &'static str {
        "broken"
    }

    fn config(&self) -> &ChannelConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChannelConfig {
        &mut self.config
    }

    fn write_line(&mut self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

#[test]
fn channel_failure_does_not_block_other_channels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survivor.log");

    let mut logger = FlashLogger::new();
    logger.add_channel(BrokenChannel::new(), Some("bad")).unwrap();
    logger
        .add_channel(FileChannel::new(&path).unwrap(), Some("good"))
        .unwrap();

    logger.log_error("still delivered");
    logger.log_error("and again");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("still delivered"));
    assert_eq!(logger.dropped_records(), 2);
}

#[test]
fn broken_channel_below_threshold_is_not_an_error() {
    let mut logger = FlashLogger::new();
    let mut broken = BrokenChannel::new();
    broken.set_min_level(LogLevel::Error);
    logger.add_channel(broken, None).unwrap();

    // filtered out before the sink is touched
    logger.log_info("never written");
    assert_eq!(logger.dropped_records(), 0);
}

#[test]
fn per_channel_scheme_override_via_selector() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colored.log");

    let mut logger = FlashLogger::new();
    logger
        .add_channel(FileChannel::new(&path).unwrap(), Some("colored"))
        .unwrap();

    // file channels default to plain; force colors through the selector
    logger
        .get_channel_mut("colored")
        .unwrap()
        .set_color_scheme(ColorScheme::color());
    logger.log_error("now with ansi");

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains('\x1b'));
}

#[test]
fn standalone_channel_do_log_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("direct.log");
    let mut channel = FileChannel::new(&path).unwrap();

    let labels = flashlog::level::LevelLabels::new();
    let scheme = ColorScheme::plain();
    let ctx = RenderContext {
        labels: &labels,
        scheme: &scheme,
        format: OutputFormat::HumanReadable,
    };
    let record = LogRecord::new(LogLevel::Command, LogArgs::from("make test"));
    channel.do_log(&record, &ctx).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("make test"));
    assert!(content.contains("## command executed at"));
}
