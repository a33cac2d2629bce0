//! Arrays and tuples.

use tsguard_types::{TupleListId, TypeId, tuple_min_length};

use crate::combinators::call;
use crate::context::{Mode, VisitorContext};
use crate::error::Result;
use crate::program::{Check, TupleCheck, TupleElementCheck};

impl<'g> VisitorContext<'g> {
    pub(crate) fn build_array(&mut self, element: TypeId) -> Result<Check> {
        let element = self.compile(element, Mode::TypeCheck)?;
        Ok(Check::Array(Box::new(call(element))))
    }

    /// Length must lie between the position of the first optional element and
    /// the element count; each present element is checked positionally.
    pub(crate) fn build_tuple(&mut self, list: TupleListId) -> Result<Check> {
        let elements = self.graph.tuple_list(list).to_vec();
        let min_length = tuple_min_length(&elements);
        let mut checks = Vec::with_capacity(elements.len());
        for element in elements {
            let id = self.compile(element.type_id, Mode::TypeCheck)?;
            checks.push(TupleElementCheck {
                check: call(id),
                optional: element.optional,
            });
        }
        Ok(Check::Tuple(TupleCheck {
            min_length,
            elements: checks,
        }))
    }
}
