use std::path::PathBuf;

use clap::Subcommand;
use slotwise_core::SchedulingPreferences;

use super::Context;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show the preferences in effect
    Show,
    /// Print the preferences file path
    Path,
    /// Write a default preferences file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate a preferences file
    Validate {
        /// File to check (default: the preferences file in effect)
        file: Option<PathBuf>,
    },
}

pub fn run(ctx: &Context, action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PrefsAction::Show => {
            let prefs = ctx.load_prefs()?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            } else {
                print!("{}", prefs.to_toml_string()?);
            }
        }
        PrefsAction::Path => {
            println!("{}", ctx.prefs_file()?.display());
        }
        PrefsAction::Init { force } => {
            let path = ctx.prefs_file()?;
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
            SchedulingPreferences::default().save_to(&path)?;
            println!("wrote {}", path.display());
        }
        PrefsAction::Validate { file } => {
            let path = match file {
                Some(path) => path,
                None => ctx.prefs_file()?,
            };
            SchedulingPreferences::load_from(&path)?;
            println!("{}: ok", path.display());
        }
    }
    Ok(())
}
