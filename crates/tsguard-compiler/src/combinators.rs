//! Smart constructors for validator bodies.
//!
//! These keep bodies small without changing their meaning: nested
//! conjunctions and disjunctions are flattened and trivially decided ones
//! collapse. Every builder produces bodies through these functions.

use tsguard_types::LiteralValue;

use crate::program::{Assertion, Check, ValidatorId};
use crate::reason::Reason;

pub fn accept() -> Check {
    Check::Accept
}

pub fn reject(reason: Reason) -> Check {
    Check::Reject(reason)
}

pub fn call(id: ValidatorId) -> Check {
    Check::Call(id)
}

pub fn assert(assertion: Assertion, reason: Reason) -> Check {
    Check::Assert(assertion, reason)
}

pub fn literal(value: LiteralValue) -> Check {
    let reason = match &value {
        LiteralValue::Boolean(value) => Reason::BooleanLiteral { value: *value },
        LiteralValue::Number(value) => Reason::NumberLiteral { value: value.0 },
        LiteralValue::String(value) => Reason::StringLiteral {
            value: value.clone(),
        },
    };
    Check::Assert(Assertion::Literal(value), reason)
}

/// All of `checks`. Empty is `Accept`; a `Reject` member decides the result
/// once earlier members pass, so nothing after it is kept.
pub fn conjunction(checks: impl IntoIterator<Item = Check>) -> Check {
    let mut flat: Vec<Check> = Vec::new();
    for check in checks {
        match check {
            Check::Accept => {}
            Check::Conjunction(inner) => flat.extend(inner),
            Check::Reject(reason) => {
                flat.push(Check::Reject(reason));
                break;
            }
            other => flat.push(other),
        }
    }
    match flat.len() {
        0 => Check::Accept,
        1 => flat.pop().unwrap_or(Check::Accept),
        _ => Check::Conjunction(flat),
    }
}

/// Any of `checks`. Empty is `Reject(Never)`; an `Accept` member makes the
/// whole disjunction `Accept`.
///
/// A single member is kept wrapped: a failing alternative must still report
/// the union at the union's own path.
pub fn disjunction(checks: impl IntoIterator<Item = Check>) -> Check {
    let mut flat: Vec<Check> = Vec::new();
    for check in checks {
        match check {
            Check::Accept => return Check::Accept,
            Check::Disjunction(inner) => flat.extend(inner),
            Check::Reject(_) => {}
            other => flat.push(other),
        }
    }
    if flat.is_empty() {
        Check::Reject(Reason::Never)
    } else {
        Check::Disjunction(flat)
    }
}
