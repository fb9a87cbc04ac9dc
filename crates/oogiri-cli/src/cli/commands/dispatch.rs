use super::super::args::*;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Init(args) => super::init::run(&cli.config, args),
        Command::Generate(args) => super::generate::run(&cli.config, args).await,
        Command::Evaluate(args) => super::evaluate::run(&cli.config, args).await,
        Command::Exemplars(args) => super::exemplars::run(&cli.config, args),
        Command::Themes => {
            let cfg = super::load_config(&cli.config)?;
            for theme in &cfg.themes {
                println!("{}", theme);
            }
            Ok(EXIT_SUCCESS)
        }
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}
