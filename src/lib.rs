mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod pages;
pub mod registry;
mod state;
mod tui;

pub use registry::{
    FieldHandle, FieldRegistry, HandleRef, RegistrationCallback, RegistryError, SubmissionPayload,
};

use clap::Parser;
use color_eyre::Result;

use crate::app::App;
use crate::cli::Cli;

#[tokio::main]
pub async fn run() -> Result<()> {
    crate::errors::init()?;
    crate::config::ensure_data_and_config_dirs_exist()?;
    crate::logging::init()?;

    let args = Cli::parse();
    let mut app = App::new(args.tick_rate, args.frame_rate)?;
    app.run().await?;
    Ok(())
}
