//! The compiler entry point.

use tracing::{debug, warn};

use tsguard_types::{TypeGraph, TypeId};

use crate::combinators::accept;
use crate::context::{Checkpoint, Mode, VisitorContext};
use crate::error::{CompileError, Result};
use crate::options::CompilerOptions;
use crate::program::{Check, Program, ValidatorId};

/// Compiles root types into one shared [`Program`].
///
/// Validators are shared across roots: compiling `A` and then `{ a: A }`
/// reuses `A`'s validator. A root that fails to compile leaves the program
/// exactly as it was before the call.
pub struct Compiler<'g> {
    cx: VisitorContext<'g>,
    short_circuit: Option<ValidatorId>,
}

impl<'g> Compiler<'g> {
    pub fn new(graph: &'g TypeGraph, options: CompilerOptions) -> Self {
        Self {
            cx: VisitorContext::new(graph, options),
            short_circuit: None,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.cx.options
    }

    /// Compile `root` in type-check mode and return its validator.
    pub fn compile_root(&mut self, root: TypeId) -> Result<ValidatorId> {
        if self.cx.options.short_circuit {
            let cx = &mut self.cx;
            let id = *self
                .short_circuit
                .get_or_insert_with(|| cx.stub("short_circuit", accept()));
            debug!(root = %self.cx.format(root), "short circuit");
            return Ok(id);
        }

        debug!(root = %self.cx.format(root), "compiling root");
        let checkpoint = self.cx.checkpoint();
        let result = self
            .cx
            .compile(root, Mode::TypeCheck)
            .and_then(|id| self.check_unguarded_recursion(checkpoint).map(|()| id));

        match result {
            Ok(id) => {
                debug!(
                    validator = self.cx.name_of(id),
                    total = self.cx.validator_count(),
                    "compiled root"
                );
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "root compile failed");
                self.cx.rollback(checkpoint);
                Err(err)
            }
        }
    }

    pub fn finish(self) -> Program {
        self.cx.into_program()
    }

    /// Reject validators that call themselves without first descending into
    /// a property, element or index. Such a type (`type A = A | string`)
    /// would recurse forever on any value it does not accept.
    fn check_unguarded_recursion(&self, since: Checkpoint) -> Result<()> {
        let first = since.slots();
        let count = self.cx.validator_count();
        // 0 = unvisited, 1 = on stack, 2 = done
        let mut state = vec![0u8; count - first];

        for start in first..count {
            if state[start - first] != 0 {
                continue;
            }
            let mut stack: Vec<(usize, Vec<ValidatorId>)> =
                vec![(start, self.direct_calls(ValidatorId(start as u32)))];
            state[start - first] = 1;

            while let Some((node, pending)) = stack.last_mut() {
                let Some(next) = pending.pop() else {
                    state[*node - first] = 2;
                    stack.pop();
                    continue;
                };
                let next = next.0 as usize;
                if next < first {
                    continue;
                }
                match state[next - first] {
                    0 => {
                        state[next - first] = 1;
                        let calls = self.direct_calls(ValidatorId(next as u32));
                        stack.push((next, calls));
                    }
                    1 => {
                        return Err(CompileError::CircularType {
                            type_name: self.cx.name_of(ValidatorId(next as u32)).to_string(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Calls made on the same value, before any structural descent.
    fn direct_calls(&self, id: ValidatorId) -> Vec<ValidatorId> {
        fn walk(check: &Check, out: &mut Vec<ValidatorId>) {
            match check {
                Check::Call(id) => out.push(*id),
                Check::Conjunction(checks) | Check::Disjunction(checks) => {
                    for check in checks {
                        walk(check, out);
                    }
                }
                _ => {}
            }
        }
        let mut out = Vec::new();
        if let Some(body) = self.cx.body_of(id) {
            walk(body, &mut out);
        }
        out
    }
}

#[cfg(test)]
#[path = "../tests/compiler_tests.rs"]
mod tests;
