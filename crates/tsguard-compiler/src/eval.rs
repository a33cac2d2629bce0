//! Interpreter for validator programs.

use tsguard_types::utils::is_numeric_literal_name;

use crate::program::{Check, ObjectCheck, Program, TupleCheck, ValidatorId};
use crate::reason::{ErrorReport, PathStack, Reason};
use crate::value::Value;

type Outcome = Result<(), ErrorReport>;

/// One top-level validation call.
pub(crate) struct Evaluation<'p> {
    program: &'p Program,
    path: PathStack,
}

impl<'p> Evaluation<'p> {
    pub(crate) fn new(program: &'p Program) -> Self {
        Self {
            program,
            path: PathStack::new(),
        }
    }

    pub(crate) fn run_root(mut self, root: ValidatorId, value: &Value) -> Outcome {
        self.call(root, value)
    }

    fn call(&mut self, id: ValidatorId, value: &Value) -> Outcome {
        let program = self.program;
        self.run(&program.function(id).body, value)
    }

    fn fail(&self, reason: Reason) -> Outcome {
        Err(self.path.report(reason))
    }

    fn run(&mut self, check: &Check, value: &Value) -> Outcome {
        match check {
            Check::Accept => Ok(()),
            Check::Reject(reason) => self.fail(reason.clone()),
            Check::Call(id) => self.call(*id, value),
            Check::Assert(assertion, reason) => {
                if assertion.holds(value) {
                    Ok(())
                } else {
                    self.fail(reason.clone())
                }
            }
            Check::Conjunction(checks) => {
                for check in checks {
                    self.run(check, value)?;
                }
                Ok(())
            }
            Check::Disjunction(checks) => {
                for check in checks {
                    if self.run(check, value).is_ok() {
                        return Ok(());
                    }
                }
                self.fail(Reason::Union)
            }
            Check::Object(object) => self.run_object(object, value),
            Check::Array(element) => {
                let Some(items) = value.as_array() else {
                    return self.fail(Reason::Array);
                };
                for (i, item) in items.iter().enumerate() {
                    self.path.push_index(i);
                    let outcome = self.run(element, item);
                    self.path.pop();
                    outcome?;
                }
                Ok(())
            }
            Check::Tuple(tuple) => self.run_tuple(tuple, value),
            Check::Template(pattern) => match value.as_str() {
                Some(text) if pattern.matches(text) => Ok(()),
                _ => self.fail(Reason::TemplateLiteral {
                    pattern: pattern.display.clone(),
                }),
            },
            Check::Superfluous(allowed) => {
                let Some(fields) = value.object_fields() else {
                    return Ok(());
                };
                for key in fields.keys() {
                    if allowed.binary_search(key).is_err() {
                        return self.fail(Reason::SuperfluousProperty {
                            property: key.clone(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    fn run_object(&mut self, object: &ObjectCheck, value: &Value) -> Outcome {
        let Some(fields) = value.object_fields() else {
            return self.fail(Reason::Object);
        };

        for property in &object.properties {
            match fields.get(&property.name) {
                None | Some(Value::Undefined) if property.optional => continue,
                None => {
                    return self.fail(Reason::MissingProperty {
                        property: property.name.clone(),
                    });
                }
                Some(field) => self.run_keyed(&property.check, &property.name, field)?,
            }
        }

        if let Some(check) = &object.string_index {
            for (key, field) in fields {
                self.run_keyed(check, key, field)?;
            }
        }
        if let Some(check) = &object.number_index {
            for (key, field) in fields.iter().filter(|(k, _)| is_numeric_literal_name(k)) {
                self.run_keyed(check, key, field)?;
            }
        }
        Ok(())
    }

    fn run_keyed(&mut self, check: &Check, key: &str, value: &Value) -> Outcome {
        self.path.push_key(key);
        let outcome = self.run(check, value);
        self.path.pop();
        outcome
    }

    fn run_tuple(&mut self, tuple: &TupleCheck, value: &Value) -> Outcome {
        let Some(items) = value.as_array() else {
            return self.fail(Reason::Array);
        };
        if items.len() < tuple.min_length || items.len() > tuple.max_length() {
            return self.fail(Reason::Tuple {
                min_length: tuple.min_length,
                max_length: tuple.max_length(),
            });
        }
        for (i, (element, item)) in tuple.elements.iter().zip(items).enumerate() {
            if element.optional && item.is_undefined() {
                continue;
            }
            self.path.push_index(i);
            let outcome = self.run(&element.check, item);
            self.path.pop();
            outcome?;
        }
        Ok(())
    }
}
