//! Command execution: load the document, resolve roots, compile, then check
//! or emit.

use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use tsguard_compiler::{Compiler, CompilerOptions, ErrorReport, JsEmitter, Value, compile};
use tsguard_types::{LoadedDocument, TypeDocument, TypeExpr, TypeGraph, TypeId};

use crate::args::{CheckArgs, CliArgs, Command, DocumentArgs, EmitArgs};
use crate::config::resolve_options;

/// A loaded type document ready to compile against.
pub struct Session {
    pub graph: TypeGraph,
    pub loaded: LoadedDocument,
    pub options: CompilerOptions,
}

impl Session {
    pub fn load(args: &DocumentArgs) -> Result<Self> {
        let options = resolve_options(args)?;
        let text = std::fs::read_to_string(&args.types)
            .with_context(|| format!("failed to read type document {}", args.types.display()))?;
        Self::from_source(&text, options)
            .with_context(|| format!("failed to load type document {}", args.types.display()))
    }

    pub fn from_source(text: &str, options: CompilerOptions) -> Result<Self> {
        let document = TypeDocument::from_json(text)?;
        let mut graph = TypeGraph::new();
        let loaded = document.load(&mut graph)?;
        debug!(declarations = loaded.declarations.len(), "loaded type document");
        Ok(Self {
            graph,
            loaded,
            options,
        })
    }

    /// A root is a declaration name (`User`), a primitive name (`string`) or a
    /// JSON type expression (`{"array": {"ref": {"name": "User"}}}`).
    pub fn resolve_root(&mut self, root: &str) -> Result<TypeId> {
        let trimmed = root.trim();
        if let Some(def) = self.loaded.def(trimmed) {
            return Ok(self.graph.reference(def, Vec::new()));
        }
        let expr: TypeExpr = if trimmed.starts_with(['{', '"']) {
            serde_json::from_str(trimmed)
                .with_context(|| format!("invalid root type expression {trimmed}"))?
        } else {
            serde_json::from_value(serde_json::Value::String(trimmed.to_string()))
                .map_err(|_| anyhow!("unknown root type '{trimmed}'"))?
        };
        Ok(TypeDocument::lower_expr(&mut self.graph, &expr)?)
    }
}

/// Result of `tsguard check`.
#[derive(Debug)]
pub enum CheckOutcome {
    Valid,
    Invalid(ErrorReport),
}

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let mut session = Session::load(&args.document)?;
    let root = session.resolve_root(&args.root)?;
    let value = read_value(args.value.as_deref())?;
    check_value(&session, root, &value)
}

pub fn check_value(session: &Session, root: TypeId, value: &Value) -> Result<CheckOutcome> {
    let validator = compile(&session.graph, root, &session.options)
        .context("failed to compile root type")?;
    info!(validators = validator.program().len(), root = validator.root_name(), "compiled");
    Ok(match validator.validate(value) {
        Ok(()) => CheckOutcome::Valid,
        Err(report) => CheckOutcome::Invalid(report),
    })
}

pub fn run_emit(args: &EmitArgs) -> Result<String> {
    let mut session = Session::load(&args.document)?;
    let mut roots = Vec::with_capacity(args.roots.len());
    for root in &args.roots {
        roots.push(session.resolve_root(root)?);
    }
    emit_module(&session, &roots)
}

/// Compile every root into one program and render it.
pub fn emit_module(session: &Session, roots: &[TypeId]) -> Result<String> {
    let mut compiler = Compiler::new(&session.graph, session.options.clone());
    let mut ids = Vec::with_capacity(roots.len());
    for &root in roots {
        let id = compiler
            .compile_root(root)
            .context("failed to compile root type")?;
        // The same root twice would export one name twice.
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    let program = compiler.finish();
    info!(validators = program.len(), roots = ids.len(), "emitting module");
    Ok(JsEmitter::new(&program).emit_module(&ids))
}

fn read_value(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read value {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read value from stdin")?;
            text
        }
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).context("value is not valid JSON")?;
    Ok(Value::from(json))
}

/// Run a parsed command line. Returns whether the checked value conformed;
/// `emit` always returns `true`.
pub fn run(args: &CliArgs) -> Result<bool> {
    match &args.command {
        Command::Check(check) => match run_check(check)? {
            CheckOutcome::Valid => {
                println!("ok");
                Ok(true)
            }
            CheckOutcome::Invalid(report) => {
                if check.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{report}");
                }
                Ok(false)
            }
        },
        Command::Emit(emit) => {
            let module = run_emit(emit)?;
            match &emit.out {
                Some(out) => std::fs::write(out, module)
                    .with_context(|| format!("failed to write {}", out.display()))?,
                None => print!("{module}"),
            }
            Ok(true)
        }
    }
}

