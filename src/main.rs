use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use flashlog::channel::{ConsoleChannel, LogChannel};
use flashlog::format::OutputFormat;
use flashlog::level::{LabelSet, LevelLabels, LogLevel};
use flashlog::logger::FlashLogger;
use flashlog::scheme::{ColorScheme, Preset, SpecialField, Subject, Variant};

#[derive(Parser)]
#[command(name = "flashlog-config")]
#[command(about = "Interactive color and label configurator for flashlog")]
#[command(version)]
struct Args {
    /// JSON file for colors (loaded if present; target for 's')
    color_file: Option<PathBuf>,

    /// JSON file for labels (loaded if present; target for 's')
    label_file: Option<PathBuf>,

    /// Print sample output for every level and exit
    #[arg(long)]
    demo: bool,

    /// Base color scheme preset; a color file overlays on top of it
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Output format for --demo
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut configurator = Configurator::new(args.color_file, args.label_file, args.preset)?;

    if args.demo {
        configurator.demo(args.format.unwrap_or_default());
        return Ok(());
    }

    configurator.main_loop()
}

struct Configurator {
    scheme: ColorScheme,
    labels: LevelLabels,
    color_file: PathBuf,
    label_file: PathBuf,
}

impl Configurator {
    fn new(
        color_file: Option<PathBuf>,
        label_file: Option<PathBuf>,
        preset: Option<Preset>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let color_file = color_file.unwrap_or_else(|| PathBuf::from("custom_colors.json"));
        let label_file = label_file.unwrap_or_else(|| PathBuf::from("custom_labels.json"));

        let base = preset.unwrap_or(Preset::Color);
        let scheme = if color_file.exists() {
            println!("Loading colors from: {}", color_file.display());
            ColorScheme::from_json_file_with_base(&color_file, base)?
        } else {
            ColorScheme::from_preset(base)
        };

        let mut labels = LevelLabels::new();
        if label_file.exists() {
            println!("Loading labels from: {}", label_file.display());
            labels.load_from_json(&label_file)?;
        }

        Ok(Self {
            scheme,
            labels,
            color_file,
            label_file,
        })
    }

    fn main_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        let item_count = LogLevel::ALL.len() + SpecialField::ALL.len();

        loop {
            self.display_items();
            println!("Commands: q=quit, s=save, l=load custom, load colors COLOR|BW|PLAIN,");
            println!(
                "  or load labels EN|DE, or item number [1-{}] to edit",
                item_count
            );
            println!("Edit format for levels: <label> <fg> <bg> <style> <hfg> <hbg> <hstyle>");
            println!("Edit format for specials: <fg> <bg> <style> <hfg> <hbg> <hstyle>");
            println!("Use '_' to keep current values");
            print!("\nCommand: ");
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            match parts[0].to_lowercase().as_str() {
                "q" => {
                    println!("Goodbye!");
                    break;
                }
                "s" => self.save(),
                "l" => self.load_custom(),
                "load" => self.load_builtin(&parts[1..]),
                cmd if cmd.chars().all(|c| c.is_ascii_digit()) => {
                    // overlong digit strings overflow the parse; treat them
                    // like any other out-of-range item
                    match cmd.parse::<usize>() {
                        Ok(item) if (1..=item_count).contains(&item) => {
                            self.edit_item(item, &parts[1..], &mut lines)?;
                        }
                        _ => println!("Invalid item number."),
                    }
                }
                _ => println!("Invalid command."),
            }
        }
        Ok(())
    }

    fn display_items(&self) {
        println!("\nAvailable levels:");
        for (i, level) in LogLevel::ALL.iter().enumerate() {
            let label = self.labels.label(*level);
            let normal = self.scheme.get(*level, false, None);
            let highlight = self.scheme.get(*level, true, None);
            println!(
                "{:2}. {} {}",
                i + 1,
                normal.paint(label),
                highlight.paint(label)
            );
        }

        println!("\nSpecial elements:");
        for (i, special) in SpecialField::ALL.iter().enumerate() {
            let normal = self.scheme.get(*special, false, None);
            let highlight = self.scheme.get(*special, true, None);
            println!(
                "{:2}. {} {}",
                LogLevel::ALL.len() + i + 1,
                normal.paint(special.name()),
                highlight.paint(special.name())
            );
        }
    }

    fn save(&self) {
        match self.scheme.save_to_json(&self.color_file) {
            Ok(()) => println!("Colors saved to: {}", self.color_file.display()),
            Err(e) => println!("Error saving colors: {}", e),
        }
        match self.labels.save_to_json(&self.label_file) {
            Ok(()) => println!("Labels saved to: {}", self.label_file.display()),
            Err(e) => println!("Error saving labels: {}", e),
        }
    }

    fn load_custom(&mut self) {
        if self.color_file.exists() {
            match ColorScheme::from_json_file(&self.color_file) {
                Ok(scheme) => {
                    self.scheme = scheme;
                    println!("Colors loaded from: {}", self.color_file.display());
                }
                Err(e) => println!("Error loading colors: {}", e),
            }
        } else {
            println!("Colors file not found: {}", self.color_file.display());
        }

        if self.label_file.exists() {
            match self.labels.load_from_json(&self.label_file) {
                Ok(()) => println!("Labels loaded from: {}", self.label_file.display()),
                Err(e) => println!("Error loading labels: {}", e),
            }
        } else {
            println!("Labels file not found: {}", self.label_file.display());
        }
    }

    fn load_builtin(&mut self, parts: &[&str]) {
        if parts.len() < 2 {
            println!("Usage: load colors COLOR|BW|PLAIN or load labels EN|DE");
            return;
        }
        let what = parts[0].to_lowercase();
        let which = parts[1].to_uppercase();
        match what.as_str() {
            "colors" => {
                let preset = match which.as_str() {
                    "COLOR" => Preset::Color,
                    "BW" => Preset::Bw,
                    "PLAIN" => Preset::Plain,
                    _ => {
                        println!("Invalid color scheme: COLOR, BW, PLAIN");
                        return;
                    }
                };
                self.scheme = ColorScheme::from_preset(preset);
                println!("Loaded color scheme: {}", which);
            }
            "labels" => {
                let set = match which.as_str() {
                    "EN" => LabelSet::En,
                    "DE" => LabelSet::De,
                    _ => {
                        println!("Invalid label scheme: EN, DE");
                        return;
                    }
                };
                self.labels.load_set(set);
                println!("Loaded label scheme: {}", which);
            }
            _ => println!("Usage: load colors COLOR|BW|PLAIN or load labels EN|DE"),
        }
    }

    fn edit_item(
        &mut self,
        item: usize,
        values: &[&str],
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let level_count = LogLevel::ALL.len();
        let is_level = item <= level_count;
        let expected = if is_level { 7 } else { 6 };

        // Prompt for values when the command line gave none
        let prompted;
        let values: Vec<&str> = if values.is_empty() {
            if is_level {
                print!("Enter: <label> <fg> <bg> <style> <hfg> <hbg> <hstyle> (use '_' to keep):\n  ");
            } else {
                print!("Enter: <fg> <bg> <style> <hfg> <hbg> <hstyle> (use '_' to keep):\n  ");
            }
            io::stdout().flush()?;
            prompted = match lines.next() {
                Some(line) => line?,
                None => return Ok(()),
            };
            prompted.split_whitespace().collect()
        } else {
            values.to_vec()
        };

        // Pad with '_' (keep) or truncate to the expected count
        let mut values: Vec<&str> = values;
        values.resize(expected, "_");

        if is_level {
            self.edit_level(LogLevel::ALL[item - 1], &values);
        } else {
            self.edit_special(SpecialField::ALL[item - level_count - 1], &values);
        }
        Ok(())
    }

    fn edit_level(&mut self, level: LogLevel, values: &[&str]) {
        let label = values[0];
        if label != "_" {
            if level.is_custom() {
                self.labels.set(level, label);
            } else {
                println!("Cannot change label for standard level {}", level.name());
            }
        }
        self.apply_colors(Subject::Level(level), &values[1..]);
    }

    fn edit_special(&mut self, special: SpecialField, values: &[&str]) {
        self.apply_colors(Subject::Special(special), values);
    }

    /// Apply six positional color tokens (fg bg style hfg hbg hstyle),
    /// where '_' keeps the current value.
    fn apply_colors(&mut self, subject: Subject, tokens: &[&str]) {
        fn keep<'a>(t: &&'a str) -> Option<&'a str> {
            if *t == "_" {
                None
            } else {
                Some(*t)
            }
        }
        let result = self
            .scheme
            .set_colors(
                subject,
                Variant::Normal,
                tokens.first().and_then(keep),
                tokens.get(1).and_then(keep),
                tokens.get(2).and_then(keep),
            )
            .and_then(|()| {
                self.scheme.set_colors(
                    subject,
                    Variant::Highlight,
                    tokens.get(3).and_then(keep),
                    tokens.get(4).and_then(keep),
                    tokens.get(5).and_then(keep),
                )
            });
        match result {
            Ok(()) => println!("Configuration updated"),
            Err(e) => println!("Error: {}", e),
        }
    }

    /// Log a sample line at every level through a real console channel.
    fn demo(&self, format: OutputFormat) {
        let mut logger = FlashLogger::new();
        logger.set_labels(self.labels.clone());
        let mut console = ConsoleChannel::new();
        console.set_color_scheme(self.scheme.clone());
        console.set_output_format(format);
        if logger.add_channel(console, Some("demo")).is_err() {
            return;
        }

        for level in LogLevel::ALL {
            logger.log(level, format!("Sample {} message", self.labels.label(level)));
        }
    }
}
