use clap::Parser;
use goal_wheel::config;
use goal_wheel::gui::app::AppModel;
use goal_wheel::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "goal-wheel", version, about, long_about = None)]
struct Cli {
    /// Config file to load and watch (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.init_config {
        let path = config::write_default_config(&config_path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let wheel = config::load_or_default(&config_path).build_wheel()?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    // gtk must not see our own flags
    let app = RelmApp::new("org.goalwheel.GoalWheel").with_args(Vec::new());

    app.run::<AppModel>((wheel, config_path, rx));
    Ok(())
}
