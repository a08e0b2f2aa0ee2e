//! The `retouch edit` command: load, apply, navigate, save.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use retouch_core::{io, ApplyOutcome, Config, Editor};

use super::spec;

/// Arguments for the `edit` command.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Image file to edit
    #[arg(required = true)]
    pub input: PathBuf,

    /// Operation to apply as family:kind[,key=value...], e.g.
    /// "blur:gaussian,sigma=2.0" (repeatable, applied in order)
    #[arg(short = 'p', long = "op")]
    pub ops: Vec<String>,

    /// Output file (defaults to the input name with an "_edited" suffix)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Undo this many steps before saving
    #[arg(long, default_value = "0")]
    pub undo: usize,

    /// Redo this many steps before saving
    #[arg(long, default_value = "0")]
    pub redo: usize,

    /// Override the configured undo history bound
    #[arg(long)]
    pub max_history: Option<usize>,
}

/// Execute the edit command.
pub fn execute(args: EditArgs, config: &Config) -> anyhow::Result<()> {
    let buffer = io::load_from_path(&args.input, &config.limits)?;

    let limit = args.max_history.unwrap_or(config.history.max_entries);
    let mut editor = Editor::with_history_limit(limit);
    editor.load(buffer, Some(&args.input))?;

    for raw in &args.ops {
        let (op, op_config) = spec::parse_op(raw)?;
        let outcome = editor
            .apply(&op, &op_config)
            .with_context(|| format!("while applying '{raw}'"))?;
        match outcome {
            ApplyOutcome::Applied => tracing::info!("{}: applied", op.name()),
            ApplyOutcome::Unchanged => tracing::info!("{}: no change", op.name()),
        }
    }

    for _ in 0..args.undo {
        if !editor.undo() {
            tracing::warn!("nothing left to undo");
            break;
        }
    }
    for _ in 0..args.redo {
        if !editor.redo() {
            tracing::warn!("nothing left to redo");
            break;
        }
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input));
    let result = editor
        .current()
        .context("editor lost its image; nothing to save")?;
    io::save_to_path(&result, &output)?;

    let info = editor.info().context("no image info available")?;
    tracing::info!(
        "Saved {}x{} image to {} (undo available: {})",
        info.width,
        info.height,
        output.display(),
        info.can_undo
    );
    println!("{}", output.display());
    Ok(())
}

/// `photo.jpg` -> `photo_edited.jpg`, keeping the directory and extension.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}_edited.{}", stem, ext.to_string_lossy()),
        None => format!("{stem}_edited.png"),
    };
    input.with_file_name(name)
}
