#![deny(unsafe_code)]
//! CLI binary for folio scenes.
//!
//! Subcommands:
//! - `render <scene>`: run a scene N ticks, write PNG
//! - `frame <scene>`: run a scene N ticks, print the last frame's draw calls
//! - `list`: print available scenes

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use folio_core::{Animation, Animator, RecordingSurface, SceneSeed};
use folio_scenes::{PixelSurface, SceneKind, FRAME_MS};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "folio", about = "Render folio background scenes offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Scene name (e.g. "constellation").
    #[arg(required_unless_present = "seed_file")]
    scene: Option<String>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: usize,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 300)]
    ticks: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Scene parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read scene, size, seed and params from a JSON seed file instead.
    #[arg(long)]
    seed_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scene and write a PNG snapshot of the final frame.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Run a scene and print the last frame's draw commands as JSON.
    Frame {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// List available scenes.
    List,
}

impl SceneArgs {
    /// Resolves the arguments to a seed. A seed file with zero ticks takes
    /// `--ticks`.
    fn to_seed(&self) -> Result<SceneSeed, CliError> {
        if let Some(path) = &self.seed_file {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            let mut seed: SceneSeed = serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid seed file: {e}")))?;
            if seed.ticks == 0 {
                seed.ticks = self.ticks;
            }
            debug!(path = %path.display(), scene = %seed.scene, "loaded seed file");
            return Ok(seed);
        }

        let scene = self
            .scene
            .as_deref()
            .ok_or_else(|| CliError::Input("a scene name or --seed-file is required".into()))?;
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        Ok(SceneSeed::new(scene, self.width, self.height, self.seed)
            .with_params(params)
            .with_ticks(self.ticks))
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = SceneKind::list_scenes();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in scenes {
                    let scene = SceneKind::from_name(name, 1, 1, 0, &serde_json::json!({}))?;
                    schemas.insert(name.to_string(), scene.param_schema());
                }
                let info = serde_json::json!({ "scenes": scenes, "params": schemas });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
            }
        }
        Command::Render { scene, output } => {
            let seed = scene.to_seed()?;
            let kind = SceneKind::from_seed(&seed)?;
            info!(scene = %seed.scene, ticks = seed.ticks, "rendering");

            let surface = PixelSurface::from_extent(kind.extent());
            let surface = folio_scenes::play(kind, surface, seed.ticks)
                .stop()
                .ok_or_else(|| CliError::Io("surface was released before the snapshot".into()))?;
            folio_scenes::snapshot::write_png(&surface, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "scene": seed.scene,
                    "width": seed.width,
                    "height": seed.height,
                    "ticks": seed.ticks,
                    "seed": seed.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} ticks, seed {}) -> {}",
                    seed.scene,
                    seed.width,
                    seed.height,
                    seed.ticks,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Frame { scene } => {
            let seed = scene.to_seed()?;
            let kind = SceneKind::from_seed(&seed)?;
            let extent = kind.extent();
            let ticks = seed.ticks.max(1);

            let mut animator = Animator::start(kind, Some(RecordingSurface::new(extent)));
            for tick in 0..ticks {
                if let Some(surface) = animator.surface_mut() {
                    surface.clear();
                }
                animator.frame(tick as f64 * FRAME_MS);
            }
            let commands = animator
                .stop()
                .map(|mut s| s.take_commands())
                .unwrap_or_default();

            if cli.json {
                let info = serde_json::json!({
                    "scene": seed.scene,
                    "width": seed.width,
                    "height": seed.height,
                    "ticks": ticks,
                    "seed": seed.seed,
                    "commands": commands,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&commands)?);
            }
        }
    }

    Ok(())
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
