use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use skinamp::{Face, FaceConfig, SkinBundle};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skinamp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a skin into a PNG.
    Render(RenderArgs),
    /// Play a track, printing the clock on every tick (requires the `audio` feature).
    Play(PlayArgs),
    /// Print the length of an audio file in seconds.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct SkinArgs {
    /// Skin archive (`.wsz` / `.zip`) or an unpacked skin directory.
    #[arg(long)]
    skin: PathBuf,

    /// Sprite declaration list.
    #[arg(long, default_value = "sprites.json")]
    sprites: PathBuf,

    /// Face layout JSON; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    skin: SkinArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Title text to show instead of the default prompt.
    #[arg(long)]
    title: Option<String>,

    /// Elapsed seconds shown on the clock.
    #[arg(long)]
    elapsed: Option<u64>,

    /// Track length used to place the seek bar.
    #[arg(long, default_value_t = 0)]
    total: u64,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    skin: SkinArgs,

    /// Audio file to play.
    #[arg(long)]
    track: PathBuf,

    /// Write the face to this PNG once playback ends.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Audio file to inspect.
    track: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_bundle(path: &Path) -> anyhow::Result<SkinBundle> {
    let bundle = if path.is_dir() {
        SkinBundle::from_dir(path)?
    } else {
        SkinBundle::from_zip_path(path)?
    };
    Ok(bundle)
}

fn load_face(args: &SkinArgs) -> anyhow::Result<Face> {
    let config = match &args.config {
        Some(path) => FaceConfig::from_path(path)?,
        None => FaceConfig::default(),
    };
    let bundle = open_bundle(&args.skin)?;
    let sprites = std::fs::read(&args.sprites)
        .with_context(|| format!("read sprite list '{}'", args.sprites.display()))?;
    Ok(Face::load(bundle, &sprites, config)?)
}

fn write_png(face: &mut Face, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    face.background_mut()
        .snapshot()
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    tracing::info!(skin = %args.skin.skin.display(), "rendering face");
    let mut face = load_face(&args.skin)?;
    if let Some(title) = &args.title {
        face.set_title(&title.to_uppercase());
    }
    if let Some(elapsed) = args.elapsed {
        face.show_time(elapsed, args.total)?;
    }
    write_png(&mut face, &args.out)
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let length = skinamp::probe_duration(&args.track)?;
    println!("{}", length.as_secs());
    Ok(())
}

/// Nothing in a CLI session resumes a pause, so only a playing track keeps it alive.
#[cfg(any(feature = "audio", test))]
fn session_running(state: skinamp::PlaybackState) -> bool {
    state == skinamp::PlaybackState::Playing
}

#[cfg(not(feature = "audio"))]
fn cmd_play(_args: PlayArgs) -> anyhow::Result<()> {
    anyhow::bail!("skinamp was built without audio output; rebuild with `--features audio`")
}

#[cfg(feature = "audio")]
fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    use std::{sync::Arc, time::Duration};

    use parking_lot::Mutex;
    use skinamp::{AudioDevice, PlaybackState, Player, SystemClock};

    let device = AudioDevice::open_default()?;
    let face = load_face(&args.skin)?;
    let interval = face.config().tick_interval();
    let shared = Arc::new(Mutex::new(face));

    let player = Player::new(Box::new(device.backend()), Arc::new(SystemClock), interval);
    let track = args.track.clone();
    shared.lock().bind_player(player.clone(), move || Some(track.clone()));
    player.load_file(&args.track)?;
    if let Some(name) = args.track.file_name() {
        shared.lock().set_title(&name.to_string_lossy().to_uppercase());
    }

    let mut update = Face::tick_handler(Arc::clone(&shared), || {});
    let ticker = player.spawn_ticker(Box::new(move |elapsed, total| {
        update(elapsed, total)?;
        eprintln!("{:02}:{:02} / {:02}:{:02}", elapsed / 60, elapsed % 60, total / 60, total % 60);
        Ok(())
    }))?;

    player.play()?;
    tracing::info!(track = %args.track.display(), total = player.total_secs(), "playing");
    while session_running(player.state()) {
        std::thread::sleep(Duration::from_millis(200));
    }
    if player.state() == PlaybackState::Paused {
        tracing::warn!(
            elapsed = player.elapsed_secs(),
            "playback paused after a failed tick; ending session"
        );
    }
    ticker.shutdown();
    player.stop()?;

    if let Some(out) = &args.snapshot {
        write_png(&mut shared.lock(), out)?;
    }
    drop(device);
    Ok(())
}
