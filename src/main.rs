mod app;
mod cli;

use log::error;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use structopt::StructOpt;
use structopt_flags::LogLevel;

use app::App;
use cli::Opt;

fn main() {
    let opt: Opt = Opt::from_args();

    if let Some(shell) = opt.completions {
        Opt::clap().gen_completions_to("chaser-tilemap", shell, &mut std::io::stdout());
        return;
    }

    if let Err(e) = TermLogger::init(
        opt.verbose.get_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let config = opt.to_app_config();

    if let Err(e) = App::new(config).run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
