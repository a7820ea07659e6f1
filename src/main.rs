use std::process;

use clap::Parser;
use ferris_usage::args::Args;
use ferris_usage::config::Config;

fn main() {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    // bind arguments to a Config struct
    let config = Config::build(&args).unwrap_or_else(|err| {
        eprintln!("Could not parse arguments: {err}");
        process::exit(1);
    });

    if let Err(e) = ferris_usage::run(config) {
        eprintln!("Fatal Error: {e}");
        process::exit(1);
    }
}
