//! Retro Arcade entry point
//!
//! On the web the page mounts games through `WebArcade`. Natively this is a
//! headless runner: it plays a game for a number of ticks with scripted key
//! presses and prints the final frame as text.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;

    use retro_arcade::platform::parse_script;
    use retro_arcade::renderer::TextSurface;
    use retro_arcade::sim::{InputEvent, Key};
    use retro_arcade::{GameKind, Result, Runner, Settings, host::LogHost};

    #[derive(Parser)]
    #[command(name = "retro-arcade")]
    #[command(about = "Run an arcade game headless and print the last frame")]
    pub struct Args {
        /// Game id (chompy, block-stack, wormy, ...)
        #[arg(long, default_value = "wormy")]
        game: String,

        /// Ticks to run after the start press
        #[arg(long, default_value_t = 100)]
        ticks: u64,

        /// RNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Key presses as `Key@tick`, comma separated (e.g. "ArrowUp@10,Space@40")
        #[arg(long, default_value = "")]
        keys: String,

        /// Print the frame every N ticks as well as at the end
        #[arg(long)]
        every: Option<u64>,
    }

    pub fn run(args: Args) -> Result<()> {
        let kind: GameKind = args.game.parse()?;
        let config = kind.config();
        let script = parse_script(&args.keys)?;
        let settings = Settings::load();

        let mut runner = Runner::new(kind, &settings, args.seed, LogHost)?;
        let mut surface = TextSurface::new(80, 40);
        runner.handle_event(InputEvent::KeyDown(Key::Space));

        let mut script = script.into_iter().peekable();
        for tick in 0..args.ticks {
            // Each scripted key is held for exactly one tick
            let mut held = Vec::new();
            while let Some(press) = script.next_if(|k| k.tick <= tick) {
                runner.handle_event(InputEvent::KeyDown(press.key));
                held.push(press.key);
            }
            runner.step();
            for key in held {
                runner.handle_event(InputEvent::KeyUp(key));
            }
            if args.every.is_some_and(|n| n > 0 && tick % n == 0) {
                runner.render(&mut surface)?;
                println!("-- tick {tick} --\n{surface}");
            }
        }

        runner.render(&mut surface)?;
        println!("{} after {} ticks ({:?})", config.title, runner.ticks(), runner.phase());
        println!("{surface}");
        let session = runner.session();
        println!("score {}  lives {}  level {}", session.score(), session.lives(), session.level());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    if let Err(e) = headless::run(args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page drives the games through the library's `WebArcade` export
}
