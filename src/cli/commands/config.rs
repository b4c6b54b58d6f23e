use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;

/// Inspect the configuration file.
pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config, path } = cmd {
        if *path {
            println!("{}", Config::config_file().display());
            return Ok(());
        }

        if *print_config {
            let file = Config::config_file();
            if file.exists() {
                let content = fs::read_to_string(&file)?;
                print!("{}", content);
            } else {
                let yaml = serde_yaml::to_string(&Config::default())
                    .map_err(|e| AppError::Config(e.to_string()))?;
                println!("# no config file yet; defaults:");
                print!("{}", yaml);
            }
        }
    }
    Ok(())
}
