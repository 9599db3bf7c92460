use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use saver_config::{load_config, prompt_entity_count, Config, ShapeKind};
use saver_core::{Bounds, ParallelStepper, Scene, SequentialStepper, Shape, Stepper};
use saver_display::{CtrlcInput, InputSource, Never, NullRenderer, StdioReporter};
use saver_harness::{run_session, Benchmark, FramePacer};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bounded-viewport screensaver simulation with a sequential-vs-parallel benchmark", long_about = None)]
struct Args {
    /// Number of entities to simulate (1-100)
    entities: Option<usize>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker thread count for the parallel stepper
    #[arg(short, long)]
    workers: Option<usize>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Stop each phase after this many frames instead of waiting for Ctrl+C
    #[arg(long)]
    frames: Option<u64>,

    /// Seed for entity spawning (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Prompt for the entity count on standard input
    #[arg(short, long)]
    interactive: bool,

    #[arg(short, long, value_enum, default_value_t = Mode::Bench)]
    mode: Mode,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Run the simulation on the calling thread only
    Sequential,
    /// Run the simulation with the parallel stepper
    Parallel,
    /// Time a sequential phase, then a parallel phase, and report speedup
    Bench,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn build_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    // CLI flags override file values; the prompt overrides both.
    if let Some(n) = args.entities {
        config.entities = n;
    }
    if args.interactive {
        let stdin = io::stdin();
        let stdout = io::stdout();
        config.entities = prompt_entity_count(&mut stdin.lock(), &mut stdout.lock())?;
    }
    if let Some(w) = args.workers {
        config.workers = w;
    }
    if let Some(f) = args.fps {
        config.framerate = f;
    }
    if let Some(s) = args.seed {
        config.seed = Some(s);
    }

    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = build_config(&args)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "{} entities, {} workers, {} FPS target, seed {seed}",
        config.entities,
        config.workers,
        config.framerate
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let bounds = Bounds {
        width: config.world.width,
        height: config.world.height,
    };
    let shape = match config.shape {
        ShapeKind::Circle => Shape::Circle,
        ShapeKind::Square => Shape::Square,
    };
    let mut scene = Scene::populate(config.entities, bounds, config.speed_limit, shape, &mut rng);

    let mut renderer = NullRenderer::default();
    let mut report = StdioReporter::new();
    let mut pacer = FramePacer::new(config.framerate);

    // With a frame cap the phases end on their own; otherwise Ctrl+C ends
    // the current phase. The handler installs once and clones share it.
    let ctrlc = match args.frames {
        Some(_) => None,
        None => Some(CtrlcInput::install()?),
    };
    let input_for_phase = |ctrlc: &Option<CtrlcInput>| -> Box<dyn InputSource> {
        match ctrlc {
            Some(source) => Box::new(source.clone()),
            None => Box::new(Never),
        }
    };

    match args.mode {
        Mode::Sequential => {
            announce_phase("sequential", args.frames);
            let mut input = input_for_phase(&ctrlc);
            run_session(
                &mut scene,
                &SequentialStepper,
                &mut renderer,
                input.as_mut(),
                &mut pacer,
                &mut report,
                args.frames,
            )?;
        }
        Mode::Parallel => {
            let stepper = ParallelStepper::new(config.workers)?;
            announce_phase(stepper.label(), args.frames);
            let mut input = input_for_phase(&ctrlc);
            run_session(
                &mut scene,
                &stepper,
                &mut renderer,
                input.as_mut(),
                &mut pacer,
                &mut report,
                args.frames,
            )?;
        }
        Mode::Bench => {
            let sequential = SequentialStepper;
            let parallel = ParallelStepper::new(config.workers)?;
            let mut bench = Benchmark::new(config.workers);

            announce_phase("sequential", args.frames);
            let mut input = input_for_phase(&ctrlc);
            bench.run_sequential(
                &mut scene,
                &sequential,
                &mut renderer,
                input.as_mut(),
                &mut pacer,
                &mut report,
                args.frames,
            )?;

            announce_phase("parallel", args.frames);
            let mut input = input_for_phase(&ctrlc);
            bench.run_parallel(
                &mut scene,
                &parallel,
                &mut renderer,
                input.as_mut(),
                &mut pacer,
                &mut report,
                args.frames,
            )?;

            bench.finish(&mut report)?;
        }
    }

    Ok(())
}

fn announce_phase(label: &str, frames: Option<u64>) {
    match frames {
        Some(n) => println!("Running {label} phase for {n} frames..."),
        None => println!("Running {label} phase; press Ctrl+C to end it..."),
    }
}
