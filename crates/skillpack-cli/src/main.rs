mod args;
mod config;
mod service;

use anyhow::Result;
use args::{Cli, Commands, ConfigAction};
use clap::Parser;
use config::Config;
use service::SkillService;
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    skillpack_logging::init_logging(level)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let (path, created) = Config::init_global()?;
                if created {
                    writeln!(out, "Created default config: {}", path.display())?;
                } else {
                    writeln!(out, "Config already exists: {}", path.display())?;
                }
            }
            ConfigAction::Show => {
                write!(out, "{}", toml::to_string_pretty(&config)?)?;
            }
        },
        Commands::Check { dir } => service::check(&dir, &mut out)?,
        Commands::Skill(command) => {
            let service = SkillService::from_config(&config, &cli.skills_dirs)?;
            service.run(command, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
