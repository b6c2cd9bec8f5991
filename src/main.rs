use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{event, terminal};
use splashcube::config::{PickTrigger, SceneConfig, TriggerMode};
use splashcube::menu::NavMenu;
use splashcube::picking::{FaceLinks, Navigation, PointerHandler};
use splashcube::scene::Scene;
use splashcube::scheduler::{wall_clock_ms, FrameScheduler};
use splashcube::state::ViewState;
use splashcube::terminal::{Presenter, TerminalGuard};
use splashcube::texture::{load_face_materials, load_water_normals};
use splashcube::widget::{Control, SceneWidget};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(version, about = "A bobbing textured cube above animated water, in your terminal")]
struct Args {
    /// RON file overriding scene settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Number of ambient particles
    #[arg(long)]
    particles: Option<usize>,

    /// Directory with face and water textures
    #[arg(long)]
    assets: Option<String>,

    /// Seed for particle and splash randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Splash trigger behaviour near the bottom of the bob
    #[arg(long, value_enum)]
    splash_trigger: Option<TriggerMode>,

    /// Pointer notification that picks cube faces
    #[arg(long, value_enum)]
    pick_on: Option<PickTrigger>,

    /// Start with the debug overlay shown
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Applies command line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut SceneConfig) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(count) = self.particles {
            config.particles.count = count;
        }
        if let Some(assets) = &self.assets {
            config.assets = assets.clone();
        }
        if let Some(trigger) = self.splash_trigger {
            config.splash.trigger = trigger;
        }
        if let Some(pick_on) = self.pick_on {
            config.pick_on = pick_on;
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Initial viewport size in cells
fn viewport_size() -> io::Result<(u16, u16)> {
    match termsize::get() {
        Some(size) if size.cols > 0 && size.rows > 0 => Ok((size.cols, size.rows)),
        _ => terminal::size(),
    }
}

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = SceneConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    // Assets are loaded before the alternate screen so warnings stay readable.
    let assets = Path::new(&config.assets);
    let materials = load_face_materials(assets, &config.cube.faces);
    let water_normals = load_water_normals(assets, &config.water.normals);

    let seed = args.seed.unwrap_or_else(rand::random);
    let (cols, rows) = viewport_size().context("failed to read terminal size")?;
    let aspect = cols as f32 / (rows as f32 * 2.0).max(1.0);
    let mut scene = Scene::new(&config, materials, water_normals, aspect, seed);

    let res = {
        let mut guard =
            TerminalGuard::enter(io::stdout()).context("failed to set up terminal")?;
        run(guard.out(), &config, &mut scene, args.debug, (cols, rows))
    };

    if let Some(navigation) = res? {
        println!("{}", navigation.location);
    }
    Ok(())
}

/// Host loop: polls input, runs frames, presents. Returns the navigation
/// that ended the scene, if any.
fn run<W: Write>(
    out: &mut W,
    config: &SceneConfig,
    scene: &mut Scene,
    debug: bool,
    (cols, rows): (u16, u16),
) -> Result<Option<Navigation>> {
    let pointer = PointerHandler::new(
        config.pick_on,
        FaceLinks::new(&config.navigation),
        (0.0, 0.0),
    );
    let mut widget = SceneWidget::new(pointer, (config.cell_size[0], config.cell_size[1]));
    let mut menu = NavMenu::new(&config.menu);
    let mut state = ViewState::new(debug);
    let mut presenter = Presenter::new(cols as usize, rows as usize);
    let mut scheduler = FrameScheduler::new(config.fps);

    widget.resize(cols, rows, scene, &mut menu);
    presenter.clear_all(out)?;

    loop {
        // Wait for input until the next frame is due
        let timeout = scheduler.time_until_next(Instant::now());
        if event::poll(timeout.max(Duration::from_millis(1)))? {
            // Drain everything queued
            loop {
                let event = event::read()?;
                match widget.event(&event, scene, &mut state, &mut menu) {
                    Control::Continue => {}
                    Control::Quit => return Ok(None),
                    Control::Navigate(navigation) => return Ok(Some(navigation)),
                }
                if let event::Event::Resize(cols, rows) = event {
                    presenter.resize(cols as usize, rows as usize);
                }
                if !event::poll(Duration::from_millis(0))? {
                    break;
                }
            }
        }

        if !scheduler.is_due(Instant::now()) {
            continue;
        }

        let fps = scheduler.fps;
        let cells = scheduler.frame(scene, wall_clock_ms(), state.paused, |scene, _| {
            widget.paint(scene, &state, &menu, fps)
        });
        presenter.draw(out, &cells)?;
    }
}
