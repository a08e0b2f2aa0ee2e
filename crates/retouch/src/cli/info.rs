//! The `retouch info` command: print image information as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use retouch_core::{io, Config, Editor};

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Image file to inspect
    #[arg(required = true)]
    pub input: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the info command.
pub fn execute(args: InfoArgs, config: &Config) -> anyhow::Result<()> {
    let buffer = io::load_from_path(&args.input, &config.limits)?;

    let mut editor = Editor::new(config);
    editor.load(buffer, Some(&args.input))?;
    let info = editor.info().context("no image loaded")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&info)?
    } else {
        serde_json::to_string(&info)?
    };
    println!("{json}");
    Ok(())
}
