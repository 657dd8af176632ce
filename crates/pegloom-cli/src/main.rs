mod cli;
mod commands;

use cli::{CheckParams, CompileParams, build_cli, log_filter};

fn main() {
    let matches = build_cli().get_matches();

    let filter = log_filter(matches.get_count("verbose"));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match matches.subcommand() {
        Some(("compile", m)) => {
            let params = CompileParams::from_matches(m);
            commands::compile::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
