use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tsguard_compiler::FunctionBehavior;

/// CLI arguments for the tsguard binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsguard",
    version,
    about = "Compile TypeScript types into runtime validators"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON value against a type.
    Check(CheckArgs),
    /// Print the validator for one or more types as a JavaScript module.
    Emit(EmitArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Root type: a declaration name or a JSON type expression.
    #[arg(short = 'r', long)]
    pub root: String,

    /// JSON file holding the value to check. Reads stdin when omitted or `-`.
    #[arg(short = 'v', long)]
    pub value: Option<PathBuf>,

    /// Print the failure report as JSON instead of a message.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Root types to export. Repeat for several.
    #[arg(short = 'r', long = "root", required = true)]
    pub roots: Vec<String>,

    /// Write the module here instead of stdout.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
}

/// The type document and the compiler options applied to it.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Path to the JSON type document.
    #[arg(short = 't', long = "types")]
    pub types: PathBuf,

    /// JSON file with compiler options (camelCase keys). Flags override it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // ==================== Compiler Options ====================
    /// Reject object keys the type does not declare.
    #[arg(
        long = "disallowSuperfluousProperties",
        alias = "disallow-superfluous-properties",
        alias = "exact"
    )]
    pub disallow_superfluous_properties: bool,

    /// Accept any value where a class type is expected.
    #[arg(long = "ignoreClasses", alias = "ignore-classes")]
    pub ignore_classes: bool,

    /// Skip method-typed properties.
    #[arg(long = "ignoreMethods", alias = "ignore-methods")]
    pub ignore_methods: bool,

    /// How function types are compiled.
    #[arg(long = "functionBehavior", alias = "function-behavior", value_enum)]
    pub function_behavior: Option<FunctionBehaviorArg>,

    /// Compile every type to a validator that accepts anything.
    #[arg(long = "shortCircuit", alias = "short-circuit")]
    pub short_circuit: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FunctionBehaviorArg {
    Error,
    Ignore,
    Basic,
}

impl From<FunctionBehaviorArg> for FunctionBehavior {
    fn from(arg: FunctionBehaviorArg) -> Self {
        match arg {
            FunctionBehaviorArg::Error => FunctionBehavior::Error,
            FunctionBehaviorArg::Ignore => FunctionBehavior::Ignore,
            FunctionBehaviorArg::Basic => FunctionBehavior::Basic,
        }
    }
}
