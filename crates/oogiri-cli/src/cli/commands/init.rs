use crate::cli::args::InitArgs;
use crate::exit_codes::EXIT_SUCCESS;
use std::path::Path;

pub fn run(config_path: &Path, args: InitArgs) -> anyhow::Result<i32> {
    if config_path.exists() && !args.force {
        println!("Skipped {} (exists)", config_path.display());
        return Ok(EXIT_SUCCESS);
    }

    oogiri_core::config::write_sample_config(config_path)?;
    println!("Created {}", config_path.display());
    println!("Set GEMINI_API_KEY and NEWS_API_KEY, then run: oogiri generate --theme 政治");
    Ok(EXIT_SUCCESS)
}
