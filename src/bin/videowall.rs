use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use videowall::{
    Compositor, FfmpegLogLevel, KioskConfig, OperationType, ProgressCallback, ProgressInfo,
    RandomFrameProvider,
};

const CLI_AFTER_HELP: &str = "Examples:\n  videowall compose input_videos\n  videowall compose input_videos --video --clip-seconds 4 --progress\n  videowall kiosk --player \"mpv --fs\"\n  videowall config > kiosk.json\n  videowall completions zsh > _videowall";

#[derive(Debug, Parser)]
#[command(
    name = "videowall",
    version,
    about = "Build a captioned video grid and run it as a selection kiosk",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while compositing.
    #[arg(long, global = true)]
    progress: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, verbose, debug).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON configuration file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Composite the videos in a directory into the grid artifact.
    #[command(
        about = "Build the grid image or grid video",
        after_help = "The configured artifact is rewritten on every run; an existing --output file needs --overwrite.\n\nExamples:\n  videowall compose input_videos\n  videowall compose clips --columns 4 --rows 3 --output wall.png --seed 7"
    )]
    Compose(ComposeArgs),

    /// Show the grid full-screen and play selected videos.
    #[command(
        about = "Run the selection kiosk",
        after_help = "Keys: arrows move, Enter/Space play, q/Esc quit. Click a cell to play it."
    )]
    Kiosk(KioskArgs),

    /// Print the effective configuration as JSON.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Args, Clone, Default)]
struct ComposeArgs {
    /// Directory of source videos.
    directory: PathBuf,
    /// Artifact path (default: the configured artifact; `.mp4` with --video).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Write a grid video of short clips instead of a still image.
    #[arg(long)]
    video: bool,
    /// Clip length per cell for --video, in seconds.
    #[arg(long)]
    clip_seconds: Option<f64>,
    /// Frame rate for --video.
    #[arg(long)]
    fps: Option<u32>,
    /// Seed for the representative-frame choice.
    #[arg(long)]
    seed: Option<u64>,
    /// Do not draw titles under the thumbnails.
    #[arg(long)]
    no_titles: bool,
    /// Allow replacing an existing file given with --output.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Debug, Args, Clone, Default)]
struct KioskArgs {
    /// Directory of source videos (must match the one composited).
    #[arg(long)]
    videos: Option<PathBuf>,
    /// Grid artifact to display.
    #[arg(long)]
    artifact: Option<PathBuf>,
    /// Player command line; the video path is appended.
    #[arg(long)]
    player: Option<String>,
    /// Disable the power-off hot-zone.
    #[arg(long)]
    no_power_zone: bool,
}

fn load_config(path: Option<&Path>) -> Result<KioskConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(KioskConfig::load(path)?),
        None => Ok(KioskConfig::default()),
    }
}

/// Apply `compose` flags on top of the configuration and return the output path.
fn apply_compose_args(config: &mut KioskConfig, args: &ComposeArgs) -> PathBuf {
    let layout = &mut config.layout;
    layout.columns = args.columns.unwrap_or(layout.columns);
    layout.rows = args.rows.unwrap_or(layout.rows);
    layout.canvas_width = args.width.unwrap_or(layout.canvas_width);
    layout.canvas_height = args.height.unwrap_or(layout.canvas_height);

    let compositor = &mut config.compositor;
    if let Some(seed) = args.seed {
        compositor.seed = Some(seed);
    }
    if args.no_titles {
        compositor.draw_titles = false;
    }
    let clip_seconds = args.clip_seconds.unwrap_or(compositor.clip_seconds);
    let fps = args.fps.unwrap_or(compositor.fps);
    config.compositor = config.compositor.clone().with_clip(clip_seconds, fps);

    match &args.output {
        Some(output) => output.clone(),
        None if args.video => config.artifact_path.with_extension("mp4"),
        None => config.artifact_path.clone(),
    }
}

/// The kiosk's own artifact is always replaced; an explicit `--output`
/// that already exists needs `--overwrite`.
fn ensure_writable_path(
    path: &Path,
    explicit: bool,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if !explicit {
            log::info!("Replacing {}", path.display());
        } else if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(global.verbose);
    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level
            .parse()
            .map_err(|_| format!("unsupported --log-level: {level}"))?;
        videowall::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        let message = match (&info.item, info.operation) {
            (Some(item), _) => item.clone(),
            (None, OperationType::GridVideo) => "frames".to_string(),
            (None, _) => String::new(),
        };
        self.bar.set_message(message);
        self.bar.set_position(info.current);
        if info.total.is_some_and(|total| info.current >= total) {
            self.bar.finish_with_message("done");
        }
    }
}

fn compose(
    global: &GlobalOptions,
    args: &ComposeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(global.config.as_deref())?;
    let output = apply_compose_args(&mut config, args);
    ensure_writable_path(&output, args.output.is_some(), args.overwrite)?;

    let entries = videowall::scan_directory(&args.directory)?;
    if entries.is_empty() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("no videos found in {}", args.directory.display()).yellow()
        );
    }

    let mut options = config.compositor.clone();
    if global.progress {
        options = options.with_progress(Arc::new(TerminalProgress::new()?));
    }
    let seed = options.seed;
    let mut compositor = Compositor::new(config.layout, options)?;

    if args.video {
        let frames = compositor.compose_video(&entries, &output)?;
        println!(
            "{} {}",
            "success:".green().bold(),
            format!("Wrote {frames}-frame grid video to {}", output.display()).green()
        );
    } else {
        let mut provider = RandomFrameProvider::new(seed);
        compositor.compose(&entries, &mut provider, &output)?;
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Wrote grid of {} video(s) to {}",
                entries.len().min(config.layout.capacity()),
                output.display()
            )
            .green()
        );
    }
    Ok(())
}

#[cfg(feature = "display")]
fn kiosk(global: &GlobalOptions, args: &KioskArgs) -> Result<(), Box<dyn std::error::Error>> {
    use videowall::{Controller, ExitReason, ExternalPlayer, GridArtifact, SdlSurface, SystemPower};

    let config = load_config(global.config.as_deref())?;
    let video_directory = args.videos.as_ref().unwrap_or(&config.video_directory);
    let artifact_path = args.artifact.as_ref().unwrap_or(&config.artifact_path);

    let artifact = GridArtifact::open(artifact_path)?;
    let entries = videowall::scan_directory_or_empty(video_directory)?;
    let player = match &args.player {
        Some(command_line) => ExternalPlayer::from_command_line(command_line)
            .ok_or("--player must name a program")?,
        None => ExternalPlayer::default(),
    };
    let mut options = config.controller.clone();
    if args.no_power_zone {
        options = options.with_power_zone(None);
    }

    let surface = SdlSurface::open("videowall", artifact.dimensions())?;
    let mut controller = Controller::new(
        config.layout,
        entries,
        artifact,
        options,
        surface,
        player,
        SystemPower::default(),
    )?;

    match controller.run()? {
        ExitReason::Quit => println!("{} kiosk closed", "success:".green().bold()),
        ExitReason::Shutdown => println!("{} power-off issued", "success:".green().bold()),
    }
    Ok(())
}

#[cfg(not(feature = "display"))]
fn kiosk(_global: &GlobalOptions, _args: &KioskArgs) -> Result<(), Box<dyn std::error::Error>> {
    Err("the kiosk requires building with the `display` feature".into())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match &cli.command {
        Commands::Compose(args) => compose(&cli.global, args)?,
        Commands::Kiosk(args) => kiosk(&cli.global, args)?,
        Commands::Config => {
            let config = load_config(cli.global.config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "videowall", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compose_flags_override_config() {
        let cli = Cli::parse_from([
            "videowall",
            "compose",
            "clips",
            "--columns",
            "4",
            "--rows",
            "3",
            "--no-titles",
            "--seed",
            "9",
        ]);
        let Commands::Compose(args) = cli.command else {
            panic!("expected compose");
        };
        let mut config = KioskConfig::default();
        let output = apply_compose_args(&mut config, &args);
        assert_eq!(args.directory, PathBuf::from("clips"));
        assert_eq!((config.layout.columns, config.layout.rows), (4, 3));
        assert_eq!(config.layout.canvas_width, 1920);
        assert!(!config.compositor.draw_titles);
        assert_eq!(config.compositor.seed, Some(9));
        assert_eq!(output, PathBuf::from("output/display_frame.jpg"));
    }

    #[test]
    fn video_output_defaults_to_mp4() {
        let args = ComposeArgs {
            directory: PathBuf::from("clips"),
            video: true,
            clip_seconds: Some(2.0),
            fps: Some(25),
            ..ComposeArgs::default()
        };
        let mut config = KioskConfig::default();
        let output = apply_compose_args(&mut config, &args);
        assert_eq!(output, PathBuf::from("output/display_frame.mp4"));
        assert_eq!(config.compositor.clip_frame_count(), 50);
    }

    #[test]
    fn default_artifact_is_replaced_but_explicit_output_is_guarded() {
        let directory = tempfile::tempdir().unwrap();
        let existing = directory.path().join("display_frame.jpg");
        std::fs::write(&existing, b"old grid").unwrap();

        assert!(ensure_writable_path(&existing, false, false).is_ok());
        assert!(ensure_writable_path(&existing, true, false).is_err());
        assert!(ensure_writable_path(&existing, true, true).is_ok());
        assert!(ensure_writable_path(&directory.path().join("new.jpg"), true, false).is_ok());
    }

    #[test]
    fn kiosk_takes_no_positional_arguments() {
        assert!(Cli::try_parse_from(["videowall", "kiosk", "extra"]).is_err());
        let cli = Cli::try_parse_from(["videowall", "kiosk", "--no-power-zone", "--verbose"])
            .expect("kiosk flags parse");
        assert!(cli.global.verbose);
        assert!(matches!(cli.command, Commands::Kiosk(KioskArgs { no_power_zone: true, .. })));
    }
}
