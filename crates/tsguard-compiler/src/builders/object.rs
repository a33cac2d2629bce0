//! Object shapes, interfaces and inherited members.

use rustc_hash::FxHashSet;

use tsguard_types::{DefId, DefKind, ObjectShape, ObjectShapeId, PropertyInfo, TypeData, TypeId};

use crate::combinators::{call, conjunction};
use crate::context::{Mode, VisitorContext};
use crate::error::Result;
use crate::program::{Check, ObjectCheck, PropertyCheck};

/// The members an object-like type declares, own members first.
#[derive(Clone, Debug, Default)]
pub(crate) struct Members {
    pub(crate) properties: Vec<PropertyInfo>,
    pub(crate) string_index: Option<TypeId>,
    pub(crate) number_index: Option<TypeId>,
}

impl Members {
    pub(crate) fn from_shape(shape: &ObjectShape) -> Self {
        Self {
            properties: shape.properties.clone(),
            string_index: shape.string_index,
            number_index: shape.number_index,
        }
    }

    pub(crate) fn has_index_signature(&self) -> bool {
        self.string_index.is_some() || self.number_index.is_some()
    }

    pub(crate) fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Add `base`'s members that this set does not already declare.
    fn inherit(&mut self, base: Members) {
        for property in base.properties {
            if self.property(&property.name).is_none() {
                self.properties.push(property);
            }
        }
        self.string_index = self.string_index.or(base.string_index);
        self.number_index = self.number_index.or(base.number_index);
    }
}

impl<'g> VisitorContext<'g> {
    pub(crate) fn build_object_shape(&mut self, shape: ObjectShapeId, open: bool) -> Result<Check> {
        let members = self
            .graph
            .object_shape(shape)
            .map(Members::from_shape)
            .unwrap_or_default();
        self.build_members(&members, open)
    }

    /// Own members of an interface or class merged with everything it
    /// inherits. A derived declaration's member overrides the base's.
    pub(crate) fn members_of_declaration(&mut self, def: DefId) -> Result<Members> {
        let mut visited = FxHashSet::default();
        self.collect_members(def, &mut visited)
    }

    fn collect_members(&mut self, def: DefId, visited: &mut FxHashSet<DefId>) -> Result<Members> {
        if !visited.insert(def) {
            return Ok(Members::default());
        }
        let info = self.definition(def)?;
        let mut members = match info.body {
            Some(body) => self.members_of_type(body, visited)?,
            None => Members::default(),
        };
        for &base in &info.heritage {
            let inherited = self.members_of_type(base, visited)?;
            members.inherit(inherited);
        }
        Ok(members)
    }

    /// Members of a heritage target or declaration body: an object shape, a
    /// reference to an object-like declaration, or an intersection of those.
    fn members_of_type(
        &mut self,
        type_id: TypeId,
        visited: &mut FxHashSet<DefId>,
    ) -> Result<Members> {
        match self.lookup(type_id)? {
            TypeData::Object(shape) => Ok(self
                .graph
                .object_shape(shape)
                .map(Members::from_shape)
                .unwrap_or_default()),
            TypeData::Reference(app) => {
                let info = self.definition(app.def)?;
                match info.kind {
                    DefKind::Interface | DefKind::Class => self.collect_members(app.def, visited),
                    DefKind::TypeAlias => match info.body {
                        Some(body) if visited.insert(app.def) => {
                            self.members_of_type(body, visited)
                        }
                        _ => Ok(Members::default()),
                    },
                }
            }
            TypeData::Intersection(list) => {
                let mut members = Members::default();
                for member in self.graph.type_list(list).to_vec() {
                    let inherited = self.members_of_type(member, visited)?;
                    members.inherit(inherited);
                }
                Ok(members)
            }
            _ => Err(self.unsupported(type_id, "not an object type, cannot be extended")),
        }
    }

    pub(crate) fn build_members(&mut self, members: &Members, open: bool) -> Result<Check> {
        let mut properties = Vec::with_capacity(members.properties.len());
        for property in &members.properties {
            let check = if property.is_method {
                match self.method_check(property)? {
                    Some(check) => check,
                    None => continue,
                }
            } else {
                call(self.compile(property.type_id, Mode::TypeCheck)?)
            };
            properties.push(PropertyCheck {
                name: property.name.clone(),
                optional: property.optional,
                check,
            });
        }

        let string_index = match members.string_index {
            Some(index) => Some(Box::new(call(self.compile(index, Mode::TypeCheck)?))),
            None => None,
        };
        let number_index = match members.number_index {
            Some(index) => Some(Box::new(call(self.compile(index, Mode::TypeCheck)?))),
            None => None,
        };

        let object = Check::Object(ObjectCheck {
            properties,
            string_index,
            number_index,
        });

        if self.options.disallow_superfluous_properties && !open && !members.has_index_signature()
        {
            let mut allowed: Vec<String> = members.names().map(str::to_string).collect();
            allowed.sort();
            allowed.dedup();
            return Ok(conjunction([object, Check::Superfluous(allowed)]));
        }
        Ok(object)
    }

    fn method_check(&self, property: &PropertyInfo) -> Result<Option<Check>> {
        if self.options.ignore_methods {
            return Ok(None);
        }
        self.function_check(format!("method '{}'", property.name))
    }
}
