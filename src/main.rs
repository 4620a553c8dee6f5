use colored::Colorize;
use ipfilter::cli::Cli;
use ipfilter::config::log_config_path;
use ipfilter::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::from_args();

    let log_config = log_config_path(cli.log_config.clone());
    if let Err(e) = logging::init(cli.log_level(), log_config.as_deref()) {
        eprintln!("{}: {e}", "ipfilter".red());
        return ExitCode::FAILURE;
    }
    log::info!("#Start main()");

    match ipfilter::run(&cli) {
        Ok(stats) => {
            if cli.stats {
                match serde_json::to_string(&stats) {
                    Ok(json) => eprintln!("{json}"),
                    Err(e) => log::warn!("Error serializing run summary: {e}"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", "ipfilter".red());
            ExitCode::FAILURE
        }
    }
}
