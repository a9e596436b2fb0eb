//! Configuration for the rastercodec application.
//!
//! Handles parsing command-line arguments and filling in defaults. Commands
//! that need an image but are given none fall back to a generated sample,
//! reproducible with `--seed`.

use std::path::PathBuf;

use log::LevelFilter;

/// What the run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print header fields of an image
    Info,
    /// Compress then decompress an image and report metrics
    Roundtrip,
    /// Hide `--secret` in `--cover`
    Hide,
    /// Recover a hidden image
    Extract,
    /// Write a generated sample image
    Sample,
}

impl Command {
    fn parse(name: &str) -> Result<Self, String> {
        match name {
            "info" => Ok(Command::Info),
            "roundtrip" => Ok(Command::Roundtrip),
            "hide" => Ok(Command::Hide),
            "extract" => Ok(Command::Extract),
            "sample" => Ok(Command::Sample),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input image (None = generate sample where allowed)
    pub input_file: Option<PathBuf>,

    /// Cover image for `hide`
    pub cover_file: Option<PathBuf>,

    /// Secret image for `hide`
    pub secret_file: Option<PathBuf>,

    /// Directory outputs are written under
    pub output_dir: PathBuf,

    // === Sample generation ===
    pub width: i32,
    pub height: i32,
    pub seed: u64,

    // === Behavior ===
    /// Use the length/CRC framed container in `roundtrip`
    pub framed: bool,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,

    pub log_level: LevelFilter,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// If no seed is given, a time-based seed is used and printed with the
    /// configuration so the run can be repeated.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut command: Option<Command> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut cover_file: Option<PathBuf> = None;
        let mut secret_file: Option<PathBuf> = None;
        let mut output_dir: Option<PathBuf> = None;
        let mut width: Option<i32> = None;
        let mut height: Option<i32> = None;
        let mut seed: Option<u64> = None;
        let mut framed = false;
        let mut print_config = false;
        let mut print_metrics = true;
        let mut log_level = LevelFilter::Info;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => input_file = Some(PathBuf::from(value(args, &mut i, "a path")?)),
                "--cover" => cover_file = Some(PathBuf::from(value(args, &mut i, "a path")?)),
                "--secret" => secret_file = Some(PathBuf::from(value(args, &mut i, "a path")?)),
                "--out" => {
                    output_dir = Some(PathBuf::from(value(args, &mut i, "a directory")?));
                }
                "--width" => {
                    let raw = value(args, &mut i, "a number")?;
                    width = Some(raw.parse().map_err(|_| "invalid width")?);
                }
                "--height" => {
                    let raw = value(args, &mut i, "a number")?;
                    height = Some(raw.parse().map_err(|_| "invalid height")?);
                }
                "--seed" => {
                    let raw = value(args, &mut i, "a number")?;
                    seed = Some(raw.parse().map_err(|_| "invalid seed")?);
                }
                "--framed" => framed = true,
                "--print-config" => print_config = true,
                "--no-metrics" => print_metrics = false,
                "--verbose" | "-v" => log_level = LevelFilter::Debug,
                "--quiet" | "-q" => log_level = LevelFilter::Warn,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("unknown argument: {arg}"));
                }
                arg => {
                    if command.is_some() {
                        return Err(format!("unexpected argument: {arg}"));
                    }
                    command = Some(Command::parse(arg)?);
                }
            }
            i += 1;
        }

        let command = command.ok_or("missing command (try --help)")?;

        let width = width.unwrap_or(256);
        let height = height.unwrap_or(256);
        if width <= 0 || height <= 0 {
            return Err(format!("dimensions must be positive, got {width}x{height}"));
        }

        match command {
            Command::Info | Command::Extract if input_file.is_none() => {
                return Err("--in is required for this command".to_string());
            }
            Command::Hide if cover_file.is_none() || secret_file.is_none() => {
                return Err("hide requires --cover and --secret".to_string());
            }
            _ => {}
        }

        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            command,
            input_file,
            cover_file,
            secret_file,
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from("./output")),
            width,
            height,
            seed,
            framed,
            print_config,
            print_metrics,
            log_level,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or("(none)".to_string(), |p| p.display().to_string())
        };

        println!("=== Configuration ===");
        println!("Command:    {:?}", self.command);
        println!("Input:      {}", show(&self.input_file));
        println!("Cover:      {}", show(&self.cover_file));
        println!("Secret:     {}", show(&self.secret_file));
        println!("Output dir: {}", self.output_dir.display());
        println!();
        println!("=== Sample ===");
        println!("Size: {}x{}", self.width, self.height);
        println!("Seed: {}", self.seed);
        println!();
        println!("Framed: {}", self.framed);
        println!("Log level: {}", self.log_level);
        println!();
    }
}

/// Advance to and return the value following the flag at `args[*i]`.
fn value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn print_help() {
    println!("rastercodec: 24-bit bitmap Huffman coding and steganography");
    println!();
    println!("USAGE:");
    println!("    rastercodec <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    info        Print header fields (requires --in)");
    println!("    roundtrip   Compress and decompress an image, report metrics");
    println!("    hide        Hide --secret inside --cover");
    println!("    extract     Recover a hidden image (requires --in)");
    println!("    sample      Write a generated sample image");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>         Input image (roundtrip default: generated sample)");
    println!("    --cover <PATH>      Cover image for hide");
    println!("    --secret <PATH>     Image to hide");
    println!("    --out <DIR>         Output directory (default: ./output)");
    println!();
    println!("    --width <N>         Sample width (default: 256)");
    println!("    --height <N>        Sample height (default: 256)");
    println!("    --seed <N>          Sample seed (default: time-based)");
    println!();
    println!("    --framed            Store length and CRC with the compressed buffer");
    println!("    --print-config      Print resolved configuration");
    println!("    --no-metrics        Don't print metrics summary");
    println!("    --verbose, -v       Debug logging");
    println!("    --quiet, -q         Warnings only");
    println!("    --help, -h          Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    rastercodec roundtrip --seed 42");
    println!("    rastercodec roundtrip --in photo.bmp --framed");
    println!("    rastercodec hide --cover photo.bmp --secret logo.bmp");
    println!("    rastercodec extract --in output/steganography/code/photo_hidden_logo.bmp");
    println!();
}
