use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::Event;
use tracing::Level;

use site_wm::actions::Action;
use site_wm::backend::MemoryStore;
use site_wm::config::DesktopConfig;
use site_wm::desktop::Desktop;
use site_wm::drivers::OutputDriver;
use site_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use site_wm::event_loop::{ControlFlow, EventLoop};
use site_wm::keybindings::KeyBindings;
use site_wm::tracing_sub;
use site_wm::window::OpenRequest;

#[derive(Parser, Debug)]
#[command(
    name = "site-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse a content site as a desktop of floating windows"
)]
struct Cli {
    /// Append log output to this file. Logging is discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    /// Frame interval used for transitions and redraws.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 33)]
    tick_ms: u64,

    /// Use the pixel-sized defaults instead of the cell-sized preset.
    #[arg(long = "pixel-units")]
    pixel_units: bool,
}

impl Cli {
    fn config(&self) -> DesktopConfig {
        if self.pixel_units {
            DesktopConfig::default()
        } else {
            DesktopConfig::terminal()
        }
    }
}

fn main() -> io::Result<()> {
    let args = Cli::parse();
    if !(1..=1000).contains(&args.tick_ms) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "tick-ms must be between 1 and 1000",
        ));
    }
    let config = args.config();
    config
        .validate()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    tracing_sub::init(args.log_file.as_deref(), args.log_level)?;
    tracing::info!(pixel_units = args.pixel_units, tick_ms = args.tick_ms, "starting");

    let mut desktop = Desktop::new(config, Box::new(MemoryStore::seeded()));
    desktop.open(OpenRequest::new("posts", "/posts").title("Posts"));
    let bindings = KeyBindings::defaults();

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut event_loop = EventLoop::new(
        ConsoleInputDriver::new(),
        Duration::from_millis(args.tick_ms),
    );
    let result = run(&mut event_loop, &mut output, &mut desktop, &bindings);
    output.exit()?;
    tracing::info!("exiting");
    result
}

fn run(
    event_loop: &mut EventLoop<ConsoleInputDriver>,
    output: &mut ConsoleOutputDriver,
    desktop: &mut Desktop,
    bindings: &KeyBindings,
) -> io::Result<()> {
    let mut dirty = true;
    event_loop.run(|_driver, event| {
        match event {
            None => {
                dirty |= desktop.tick();
                if dirty {
                    output.draw(|mut frame| desktop.render(&mut frame))?;
                    dirty = false;
                }
            }
            Some(Event::Key(key)) => {
                if let Some(action) = bindings.action_for_key(&key) {
                    if action == Action::Quit {
                        return Ok(ControlFlow::Quit);
                    }
                    desktop.handle_action(action);
                    dirty = true;
                }
            }
            Some(Event::Resize(_, _)) => dirty = true,
            Some(event) => {
                dirty |= desktop.handle_event(&event, Instant::now());
            }
        }
        Ok(ControlFlow::Continue)
    })
}
