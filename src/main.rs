//! Picbreed CLI - Breed pattern network images from the terminal.
//!
//! The current generation is written to a PNG frame after every command.
//! Animated populations advance one frame per command and restart at frame 0
//! after every evolve.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use picbreed::{
    compute::ColourGrid,
    compute::evolution::{BreedRng, Population, PopulationError},
    display::{FrameClock, Mosaic, Selection, save_frame},
    schema::{BreederConfig, DisplayConfig},
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> [frame.png]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Breed pattern network images interactively.");
    eprintln!();
    eprintln!("Commands (one per line on stdin):");
    eprintln!("  <index>...    Toggle selection of grid cells");
    eprintln!("  click <x> <y> Toggle the cell under a window pixel");
    eprintln!("  next / empty  Evolve from the current selection");
    eprintln!("  tick          Advance an animated population by one frame");
    eprintln!("  q / quit      Exit");
}

fn print_example_config() {
    let config = BreederConfig {
        random_seed: Some(5645),
        ..Default::default()
    };
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}

enum Command {
    Toggle(Vec<usize>),
    Click(usize, usize),
    Tick,
    Next,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    match words.next() {
        None | Some("next") => Ok(Command::Next),
        Some("q") | Some("quit") => Ok(Command::Quit),
        Some("tick") => Ok(Command::Tick),
        Some("click") => {
            let coords: Vec<usize> = words
                .map(|w| w.parse().map_err(|_| format!("invalid coordinate '{}'", w)))
                .collect::<Result<Vec<usize>, String>>()?;
            match coords[..] {
                [x, y] => Ok(Command::Click(x, y)),
                _ => Err("click takes exactly two coordinates".to_string()),
            }
        }
        Some(first) => std::iter::once(first)
            .chain(words)
            .map(|w| w.parse().map_err(|_| format!("unknown command '{}'", w)))
            .collect::<Result<Vec<usize>, String>>()
            .map(Command::Toggle),
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let frame_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("picbreed.png"));

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: BreederConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let mut rng = match config.random_seed {
        Some(seed) => BreedRng::new(seed),
        None => BreedRng::random(),
    };

    let grid_size = config.population.grid_size;
    let display = config.display.clone();

    let mut population = Population::new(config.population).unwrap_or_else(|e| {
        eprintln!("Invalid population config: {}", e);
        std::process::exit(1);
    });
    let mosaic = Mosaic::new(display, grid_size).unwrap_or_else(|e| {
        eprintln!("Invalid display config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = population.initialize(&mut rng) {
        eprintln!("Error initializing population: {}", e);
        std::process::exit(1);
    }

    println!("Picbreed");
    println!("========");
    println!("Grid: {}x{} ({} networks)", grid_size, grid_size, population.size());
    println!(
        "Layers: {:?}",
        population.config().network.layer_widths()
    );
    println!("Frame: {}", frame_path.display());
    println!();

    let mut selection = Selection::new();
    let canvas = mosaic.config().clone();
    let animated = population.config().network.is_animated();
    let mut clock = FrameClock::new(canvas.canvas_width);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let frame = render(&population, &canvas, animated.then(|| clock.time()))
            .map_err(|e| e.to_string())
            .and_then(|canvases| {
                mosaic
                    .compose(&canvases, &selection)
                    .map_err(|e| e.to_string())
            });

        match frame {
            Ok(frame) => {
                if let Err(e) = save_frame(&frame, &frame_path) {
                    eprintln!("Error writing frame: {}", e);
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error rendering frame: {}", e);
                std::process::exit(1);
            }
        }

        if animated {
            println!(
                "Generation {} | frame {}/{} | selected {:?}",
                population.generation(),
                clock.time(),
                clock.period(),
                selection.indices()
            );
        } else {
            println!(
                "Generation {} | selected {:?}",
                population.generation(),
                selection.indices()
            );
        }

        let Some(Ok(line)) = lines.next() else {
            break;
        };

        clock.tick();
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Tick) => {}
            Ok(Command::Next) => {
                let selected = selection.take();
                if let Err(e) = population.evolve(&selected, &mut rng) {
                    eprintln!("Error: {}", e);
                }
                clock.reset();
            }
            Ok(Command::Click(x, y)) => match mosaic.cell_at(x, y) {
                Some(index) => {
                    selection.toggle(index);
                }
                None => eprintln!("({}, {}) is outside the grid", x, y),
            },
            Ok(Command::Toggle(indices)) => {
                for index in indices {
                    if index < population.size() {
                        selection.toggle(index);
                    } else {
                        eprintln!("Cell {} is outside the grid", index);
                    }
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Canvases for the current frame; `frame` is set for animated populations.
fn render(
    population: &Population,
    canvas: &DisplayConfig,
    frame: Option<usize>,
) -> Result<Vec<ColourGrid>, PopulationError> {
    match frame {
        Some(t) => population.render_at(canvas.canvas_height, canvas.canvas_width, t),
        None => population.render(canvas.canvas_height, canvas.canvas_width),
    }
}
