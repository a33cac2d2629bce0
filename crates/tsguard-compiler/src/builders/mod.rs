//! Structural validator builders, one module per type category family.
//!
//! Each module adds methods to `VisitorContext`; dispatch calls them.

mod array;
mod object;
mod template;
mod union;

pub(crate) use object::Members;
