//! gflux - Command-line interface for Gesture Flux
//!
//! Commands:
//! - transform: Classify a recorded frame stream (batch mode)
//! - run: Classify frames streamed on stdin (streaming mode)
//! - validate: Validate frame input against the detector contract
//! - doctor: Diagnose configuration and environment
//! - gestures: Print how to perform each gesture
//! - config: Print the default configuration
//! - synth: Emit synthetic frames for a gesture

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use gesture_flux::encoder::DecisionRecord;
use gesture_flux::frames::{self, FrameEvent};
use gesture_flux::synthetic::HandPose;
use gesture_flux::{GestureConfig, GestureEngine, GestureKind, FLUX_VERSION, PRODUCER_NAME};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Upper bound for `synth --interval-ms`: one hour between frames
const MAX_INTERVAL_MS: i64 = 3_600_000;

/// gflux - Hand-landmark gesture classification engine
#[derive(Parser)]
#[command(name = "gflux")]
#[command(author = "Synheart AI Inc")]
#[command(version = FLUX_VERSION)]
#[command(about = "Turn hand-landmark frames into cursor actions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a recorded frame stream (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Configuration file (JSON, partial overrides allowed)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Load cooldown state from file
        #[arg(long)]
        load_state: Option<PathBuf>,

        /// Save cooldown state to file after processing
        #[arg(long)]
        save_state: Option<PathBuf>,
    },

    /// Classify frames streamed on stdin (streaming mode)
    Run {
        /// Configuration file (JSON, partial overrides allowed)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Load cooldown state from file
        #[arg(long)]
        load_state: Option<PathBuf>,

        /// Save cooldown state to file on exit
        #[arg(long)]
        save_state: Option<PathBuf>,

        /// Only emit records for frames with a recognized gesture
        #[arg(long)]
        gestures_only: bool,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Validate frame input against the detector contract
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print how to perform each gesture
    Gestures,

    /// Print the default configuration as JSON
    Config,

    /// Emit synthetic NDJSON frames for a gesture
    Synth {
        /// Gesture to pose (none, move, left_click, right_click, double_click, screenshot)
        gesture: String,

        /// Number of frames
        #[arg(long, default_value = "30")]
        frames: u32,

        /// Milliseconds between frames (0 to 3600000)
        #[arg(
            long,
            default_value = "100",
            value_parser = clap::value_parser!(i64).range(0..=MAX_INTERVAL_MS)
        )]
        interval_ms: i64,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one decision per line)
    Ndjson,
    /// JSON array of decisions
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GFLUX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), GfluxCliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            config,
            load_state,
            save_state,
        } => cmd_transform(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
            load_state.as_deref(),
            save_state.as_deref(),
        ),

        Commands::Run {
            config,
            load_state,
            save_state,
            gestures_only,
            flush,
        } => cmd_run(
            config.as_deref(),
            load_state.as_deref(),
            save_state.as_deref(),
            gestures_only,
            flush,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),

        Commands::Gestures => cmd_gestures(),

        Commands::Config => {
            println!("{}", GestureConfig::default().to_json()?);
            Ok(())
        }

        Commands::Synth {
            gesture,
            frames,
            interval_ms,
        } => cmd_synth(&gesture, frames, interval_ms),
    }
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    load_state: Option<&Path>,
    save_state: Option<&Path>,
) -> Result<(), GfluxCliError> {
    let input_data = read_input(input)?;

    let events = match input_format {
        InputFormat::Ndjson => frames::parse_ndjson(&input_data)?,
        InputFormat::Json => frames::parse_array(&input_data)?,
    };

    if events.is_empty() {
        return Err(GfluxCliError::NoFrames);
    }

    let mut engine = build_engine(config, load_state)?;

    let records: Vec<DecisionRecord> = events
        .iter()
        .map(|event| {
            if let Err(e) = event.validate() {
                warn!(timestamp = %event.timestamp, error = %e, "frame violates detector contract");
            }
            engine.process_event_to_record(event)
        })
        .collect();

    if let Some(state_path) = save_state {
        fs::write(state_path, engine.save_state()?)?;
    }

    let output_data = format_output(&records, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(
    config: Option<&Path>,
    load_state: Option<&Path>,
    save_state: Option<&Path>,
    gestures_only: bool,
    flush: bool,
) -> Result<(), GfluxCliError> {
    let mut engine = build_engine(config, load_state)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let event: FrameEvent = serde_json::from_str(trimmed)
            .map_err(|e| GfluxCliError::ParseError(format!("Failed to parse frame: {}", e)))?;

        if let Err(e) = event.validate() {
            warn!(timestamp = %event.timestamp, error = %e, "frame violates detector contract");
        }

        let record = engine.process_event_to_record(&event);
        if gestures_only && record.gesture == GestureKind::None {
            continue;
        }

        writeln!(stdout, "{}", serde_json::to_string(&record)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;

    if let Some(state_path) = save_state {
        fs::write(state_path, engine.save_state()?)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), GfluxCliError> {
    let input_data = read_input(input)?;

    let events = match input_format {
        InputFormat::Ndjson => frames::parse_ndjson(&input_data)?,
        InputFormat::Json => frames::parse_array(&input_data)?,
    };

    let results = frames::validate_events(&events);
    let no_hand = events
        .iter()
        .filter(|e| e.landmarks.as_ref().map_or(true, |p| p.is_empty()))
        .count();

    let report = ValidationReport {
        total_frames: events.len(),
        valid_frames: events.len() - results.len(),
        invalid_frames: results.len(),
        no_hand_frames: no_hand,
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                timestamp: r.timestamp.to_rfc3339(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total frames:   {}", report.total_frames);
        println!("Valid frames:   {}", report.valid_frames);
        println!("Invalid frames: {}", report.invalid_frames);
        println!("No-hand frames: {}", report.no_hand_frames);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Frame {} ({}): {}",
                    err.index, err.timestamp, err.error
                );
            }
        }
    }

    if report.invalid_frames > 0 {
        Err(GfluxCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), GfluxCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("gesture-flux version {}", FLUX_VERSION),
    });

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            }
        } else {
            match fs::read_to_string(config_path) {
                Ok(content) => match GestureConfig::from_json(&content) {
                    Ok(cfg) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Config valid (cooldowns: double click {}s, screenshot {}s)",
                            cfg.cooldowns.double_click_secs, cfg.cooldowns.screenshot_secs
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid config: {}", e),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FLUX_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("gflux Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(GfluxCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_gestures() -> Result<(), GfluxCliError> {
    println!("Gestures:");
    for kind in GestureKind::ALL.iter().filter(|k| **k != GestureKind::None) {
        let gate = if kind.is_cooldown_gated() {
            " (cooldown)"
        } else {
            ""
        };
        println!("- {}{}: {}", kind.title(), gate, kind.description());
    }
    Ok(())
}

fn cmd_synth(gesture: &str, count: u32, interval_ms: i64) -> Result<(), GfluxCliError> {
    let kind = GestureKind::from_name(gesture)
        .ok_or_else(|| GfluxCliError::UnknownGesture(gesture.to_string()))?;

    let frame = HandPose::for_gesture(kind).frame();
    let start = Utc::now();
    let mut stdout = io::stdout();

    for i in 0..count {
        let timestamp = synth_timestamp(start, interval_ms, i)?;
        let event = FrameEvent::new(timestamp, &frame);
        writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
    }
    stdout.flush()?;

    Ok(())
}

// Helper functions

/// Timestamp of the `index`th synthetic frame; never runs backwards
fn synth_timestamp(
    start: DateTime<Utc>,
    interval_ms: i64,
    index: u32,
) -> Result<DateTime<Utc>, GfluxCliError> {
    if !(0..=MAX_INTERVAL_MS).contains(&interval_ms) {
        return Err(GfluxCliError::InvalidInterval(interval_ms));
    }
    interval_ms
        .checked_mul(i64::from(index))
        .and_then(|ms| start.checked_add_signed(Duration::milliseconds(ms)))
        .ok_or(GfluxCliError::InvalidInterval(interval_ms))
}

fn read_input(input: &Path) -> Result<String, GfluxCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn build_engine(
    config: Option<&Path>,
    load_state: Option<&Path>,
) -> Result<GestureEngine, GfluxCliError> {
    let config = match config {
        Some(path) => GestureConfig::from_json(&fs::read_to_string(path)?)?,
        None => GestureConfig::default(),
    };
    let mut engine = GestureEngine::new(config)?;

    if let Some(state_path) = load_state {
        engine.load_state(&fs::read_to_string(state_path)?)?;
    }

    Ok(engine)
}

fn format_output(
    records: &[DecisionRecord],
    format: &OutputFormat,
) -> Result<String, GfluxCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

// Error types

#[derive(Debug)]
enum GfluxCliError {
    Io(io::Error),
    Engine(gesture_flux::GestureError),
    Json(serde_json::Error),
    NoFrames,
    UnknownGesture(String),
    InvalidInterval(i64),
    ValidationFailed(usize),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for GfluxCliError {
    fn from(e: io::Error) -> Self {
        GfluxCliError::Io(e)
    }
}

impl From<gesture_flux::GestureError> for GfluxCliError {
    fn from(e: gesture_flux::GestureError) -> Self {
        GfluxCliError::Engine(e)
    }
}

impl From<serde_json::Error> for GfluxCliError {
    fn from(e: serde_json::Error) -> Self {
        GfluxCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<GfluxCliError> for CliError {
    fn from(e: GfluxCliError) -> Self {
        match e {
            GfluxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            GfluxCliError::Engine(gesture_flux::GestureError::Config(e)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'gflux config' to see valid defaults".to_string()),
            },
            GfluxCliError::Engine(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input frames carry a timestamp and landmarks".to_string()),
            },
            GfluxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            GfluxCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No frames found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            GfluxCliError::UnknownGesture(name) => CliError {
                code: "UNKNOWN_GESTURE".to_string(),
                message: format!("Unknown gesture: {}", name),
                hint: Some(
                    "Use one of: none, move, left_click, right_click, double_click, screenshot"
                        .to_string(),
                ),
            },
            GfluxCliError::InvalidInterval(ms) => CliError {
                code: "INVALID_INTERVAL".to_string(),
                message: format!("Frame interval out of range: {} ms", ms),
                hint: Some(format!("Use an interval between 0 and {} ms", MAX_INTERVAL_MS)),
            },
            GfluxCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} frames failed validation", count),
                hint: Some("Check the detector output for short or out-of-range frames".to_string()),
            },
            GfluxCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            GfluxCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_frames: usize,
    valid_frames: usize,
    invalid_frames: usize,
    no_hand_frames: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    timestamp: String,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
