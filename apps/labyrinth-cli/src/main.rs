use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use labyrinth_input::{Action, Key, KeyboardState};
use labyrinth_kernel::{FrameClock, GameConfig, Session, SessionPhase, WorldEvent};
use labyrinth_render::{AsciiRenderer, CameraView, MiniMap, Renderer};
use labyrinth_tools::{Autopilot, WorldInspector};
use tracing_subscriber::EnvFilter;

/// Frame length for headless runs.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "labyrinth-cli", about = "Maze generation and first-person motion, headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; missing sections use defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a maze and print it
    Generate {
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        /// RNG seed for a reproducible maze
        #[arg(short, long)]
        seed: Option<u64>,
        /// Emit JSON instead of ASCII
        #[arg(long)]
        json: bool,
        /// Also print the solution length
        #[arg(long)]
        solve: bool,
    },
    /// Let the autopilot play one level through the regular motion pipeline
    Simulate {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Square maze size
        #[arg(long)]
        size: Option<usize>,
        /// Give up after this many frames
        #[arg(long, default_value = "1000000")]
        max_frames: usize,
        /// Print the minimap when done
        #[arg(long)]
        map: bool,
        /// Pace frames by the wall clock instead of simulated time
        #[arg(long)]
        realtime: bool,
    },
    /// Replay a key script such as "w*40 a*10 space w*20 q"
    ///
    /// Each token presses a key, holds it for the given number of frames
    /// (default 1) and releases it.
    Play {
        script: String,
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(long)]
        size: Option<usize>,
        /// Pace frames by the wall clock instead of simulated time
        #[arg(long)]
        realtime: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("labyrinth-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("maze: {}", labyrinth_maze::crate_info());
            println!("render: {}", labyrinth_render::crate_info());
            println!("tools: {}", labyrinth_tools::crate_info());
            println!("input: {}", labyrinth_input::crate_info());
        }
        Commands::Generate {
            width,
            height,
            seed,
            json,
            solve,
        } => {
            let width = width.unwrap_or(config.maze.width);
            let height = height.unwrap_or(config.maze.height);
            let grid = match seed.or(config.maze.seed) {
                Some(seed) => labyrinth_maze::generate_seeded(width, height, seed)?,
                None => labyrinth_maze::generate(width, height)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print!("{grid}");
            }
            if solve {
                match grid.solve(grid.start(), grid.target()) {
                    Some(path) => println!("Solution: {} cells", path.len()),
                    None => println!("Solution: none"),
                }
            }
        }
        Commands::Simulate {
            seed,
            size,
            max_frames,
            map,
            realtime,
        } => {
            apply_overrides(&mut config, seed, size);
            let mut pacer = Pacer::new(config.session.max_frame_ms, realtime);
            let mut session = Session::new(config)?;
            let mut pilot = Autopilot::new();
            let mut minimap = MiniMap::new();
            minimap.set_visible(map);

            let mut frames = 0;
            while session.phase() != SessionPhase::Won && frames < max_frames {
                let intent = pilot.intent(session.world());
                for event in session.frame(pacer.next_frame(), &intent) {
                    report(&event);
                    minimap.apply(&event);
                }
                frames += 1;
            }

            println!("Frames: {frames}");
            println!("{}", WorldInspector::summary(session.world()));
            print!("{}", minimap.render_text());
            if session.phase() != SessionPhase::Won {
                bail!("autopilot did not reach the target within {max_frames} frames");
            }
        }
        Commands::Play {
            script,
            seed,
            size,
            realtime,
        } => {
            apply_overrides(&mut config, seed, size);
            let steps = parse_script(&script)?;
            let mut pacer = Pacer::new(config.session.max_frame_ms, realtime);
            let mut session = Session::new(config)?;
            let mut keyboard = KeyboardState::default();
            let mut minimap = MiniMap::new();

            for event in session.world_mut().drain_events() {
                minimap.apply(&event);
            }
            // Scripts start once the countdown is over.
            while let SessionPhase::Countdown { .. } = session.phase() {
                session.frame(pacer.next_frame(), &keyboard.intent());
            }

            for (key, frames) in steps {
                keyboard.key_down(key, false);
                for _ in 0..frames {
                    for event in session.frame(pacer.next_frame(), &keyboard.intent()) {
                        report(&event);
                        minimap.apply(&event);
                    }
                }
                match keyboard.key_up(key) {
                    Some(Action::ToggleMiniMap) => minimap.toggle(),
                    Some(Action::NewGame) => {
                        if session.new_game()?.is_some() {
                            // Time spent on the win screen is not played.
                            pacer.restart();
                            for event in session.world_mut().drain_events() {
                                report(&event);
                                minimap.apply(&event);
                            }
                        }
                    }
                    None => {}
                }
            }

            let world = session.world();
            let view = CameraView::from_player(world.player());
            print!("{}", AsciiRenderer::new().render(world, &view));
            println!("{}", WorldInspector::summary(world));
            print!("{}", minimap.render_text());
        }
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}

/// Host frame source: timestamps go through a `FrameClock`, taken from the
/// wall clock or advanced by `FRAME` per frame.
struct Pacer {
    clock: FrameClock,
    now: Instant,
    realtime: bool,
}

impl Pacer {
    fn new(max_frame_ms: f32, realtime: bool) -> Self {
        let now = Instant::now();
        let mut clock = FrameClock::new(max_frame_ms);
        clock.frame(now);
        Self {
            clock,
            now,
            realtime,
        }
    }

    /// Elapsed milliseconds for the next frame.
    fn next_frame(&mut self) -> f32 {
        if self.realtime {
            std::thread::sleep(FRAME);
            self.now = Instant::now();
        } else {
            self.now += FRAME;
        }
        self.clock.frame(self.now)
    }

    fn restart(&mut self) {
        self.clock.restart();
    }
}

fn apply_overrides(config: &mut GameConfig, seed: u64, size: Option<usize>) {
    config.maze.seed = Some(seed);
    if let Some(size) = size {
        config.maze.width = size;
        config.maze.height = size;
    }
}

fn report(event: &WorldEvent) {
    match event {
        WorldEvent::LevelChanged { id, grid } => {
            println!("Level {id}: {}x{}, target {}", grid.width(), grid.height(), grid.target());
        }
        WorldEvent::PlayerMoved(cell) => tracing::debug!(%cell, "moved"),
        WorldEvent::PlayerWon { id } => println!("Level {id} won"),
    }
}

/// Parse `key[*frames]` tokens separated by whitespace.
fn parse_script(script: &str) -> anyhow::Result<Vec<(Key, usize)>> {
    script
        .split_whitespace()
        .map(|token| -> anyhow::Result<(Key, usize)> {
            let (name, frames) = match token.split_once('*') {
                Some((name, count)) => (
                    name,
                    count
                        .parse::<usize>()
                        .with_context(|| format!("bad frame count in {token:?}"))?,
                ),
                None => (token, 1),
            };
            Ok((name.parse::<Key>()?, frames))
        })
        .collect()
}
