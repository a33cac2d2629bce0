//! Compiler options from a `--config` file and command line flags.

use anyhow::{Context, Result};
use std::path::Path;

use tsguard_compiler::CompilerOptions;

use crate::args::DocumentArgs;

pub fn load_config(path: &Path) -> Result<CompilerOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Options from the config file (if any), with set flags taking precedence.
pub fn resolve_options(args: &DocumentArgs) -> Result<CompilerOptions> {
    let mut options = match &args.config {
        Some(path) => load_config(path)?,
        None => CompilerOptions::default(),
    };
    apply_flags(&mut options, args);
    Ok(options)
}

fn apply_flags(options: &mut CompilerOptions, args: &DocumentArgs) {
    if args.disallow_superfluous_properties {
        options.disallow_superfluous_properties = true;
    }
    if args.ignore_classes {
        options.ignore_classes = true;
    }
    if args.ignore_methods {
        options.ignore_methods = true;
    }
    if args.short_circuit {
        options.short_circuit = true;
    }
    if let Some(behavior) = args.function_behavior {
        options.function_behavior = behavior.into();
    }
}
