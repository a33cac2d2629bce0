//! Unions and intersections.

use tsguard_types::{TypeId, TypeListId};

use crate::combinators::{call, conjunction, disjunction};
use crate::context::{Mode, VisitorContext};
use crate::error::Result;
use crate::program::Check;
use crate::set_algebra::LiteralSet;

impl<'g> VisitorContext<'g> {
    /// Any member may match. Members inherit `open`: a union inside an
    /// intersection leaves superfluous keys to the intersection.
    pub(crate) fn build_union(&mut self, list: TypeListId, open: bool) -> Result<Check> {
        let members: Vec<TypeId> = self.graph.type_list(list).to_vec();
        let mut checks = Vec::with_capacity(members.len());
        for member in members {
            checks.push(call(self.compile_with(member, Mode::TypeCheck, open)?));
        }
        Ok(disjunction(checks))
    }

    /// Every member must match. In exact mode the members are compiled open and
    /// one superfluous-key check covers the keys declared by any member.
    pub(crate) fn build_intersection(&mut self, list: TypeListId, open: bool) -> Result<Check> {
        let members: Vec<TypeId> = self.graph.type_list(list).to_vec();
        let exact = self.options.disallow_superfluous_properties && !open;
        let member_open = exact || open;

        let mut checks = Vec::with_capacity(members.len() + 1);
        for &member in &members {
            checks.push(call(self.compile_with(member, Mode::TypeCheck, member_open)?));
        }

        if exact {
            let mut declared = LiteralSet::Never;
            for &member in &members {
                declared = declared.union(self.declared_names(member)?);
            }
            if let LiteralSet::Concrete(names) = declared {
                checks.push(Check::Superfluous(names.into_iter().collect()));
            }
        }
        Ok(conjunction(checks))
    }
}
