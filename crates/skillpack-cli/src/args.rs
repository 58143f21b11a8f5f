//! CLI argument definitions using clap
//!
//! - skillpack list                      # Available skills
//! - skillpack show <skill> [--json]     # Manifest fields
//! - skillpack refs <skill>              # Reference index
//! - skillpack read <skill> <reference>  # Full reference text
//! - skillpack check <dir>               # Validate a skill directory

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skillpack")]
#[command(about = "Browse skill manifests and their reference documents")]
#[command(version)]
pub struct Cli {
    /// Additional skills directory to scan (repeatable)
    #[arg(long = "skills-dir", value_name = "DIR", global = true)]
    pub skills_dirs: Vec<PathBuf>,

    /// Path to a configuration file layered over the defaults
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Skill(SkillCommand),

    /// Validate a skill directory
    Check {
        /// Directory containing SKILL.md
        dir: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands answered from the discovered skills
#[derive(Subcommand, Debug)]
pub enum SkillCommand {
    /// List available skills
    List,

    /// Show a skill's manifest
    Show {
        /// Skill name
        skill: String,

        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a skill's references in declared order
    Refs {
        /// Skill name
        skill: String,
    },

    /// Print a reference document verbatim
    Read {
        /// Skill name
        skill: String,

        /// Reference identifier
        reference: String,
    },

    /// Print the agent-facing context for a skill
    Context {
        /// Skill name
        skill: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default config to ~/.skillpack/skillpack.toml
    Init,
    /// Print the effective configuration
    Show,
}
