use std::io;
use std::process::ExitCode;

use clap::Parser;

use study_centre::{
    app_state::AppState,
    cli::{Cli, Command},
    config::Config,
    errors::AppResult,
    handlers,
};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{} ({})", err, err.error_code());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env();
    log::debug!("Loaded configuration: {:?}", config);
    let state = AppState::new(config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::List(cmd) => handlers::list_banks(&state, &cmd, &mut out),
        Command::Check(cmd) => handlers::check(&state, &cmd, &mut input, &mut out),
        Command::Quiz(cmd) => handlers::quiz(&state, &cmd, &mut input, &mut out).map(|_| ()),
        Command::Exam(cmd) => handlers::exam(&state, &cmd, &mut input, &mut out).map(|_| ()),
        Command::Review(cmd) => handlers::review(&state, &cmd, &mut out).map(|_| ()),
        Command::Schema => handlers::schema(&mut out),
    }
}
