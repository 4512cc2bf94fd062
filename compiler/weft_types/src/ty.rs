//! Type descriptors.

use std::fmt;

use crate::{MismatchContext, TypeError};

/// Primitive type kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Prim {
    Bool,
    Str,
    Int,
    Float,
}

impl Prim {
    /// Surface-syntax name of this primitive.
    pub fn name(self) -> &'static str {
        match self {
            Prim::Bool => "bool",
            Prim::Str => "str",
            Prim::Int => "int",
            Prim::Float => "float",
        }
    }
}

/// A type descriptor.
///
/// Struct and function shapes are only built through [`Type::structure`] and
/// [`Type::func`], which reject duplicate names. Their name sets never change
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Type {
    Prim(Prim),
    Struct(Fields),
    Func(Signature),
    /// Nothing is known about this type yet.
    Unresolved,
}

impl Type {
    pub const BOOL: Type = Type::Prim(Prim::Bool);
    pub const STR: Type = Type::Prim(Prim::Str);
    pub const INT: Type = Type::Prim(Prim::Int);
    pub const FLOAT: Type = Type::Prim(Prim::Float);

    /// Build a struct type from ordered `(name, type)` pairs.
    pub fn structure<I, S>(fields: I) -> Result<Type, TypeError>
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Fields::new(fields).map(Type::Struct)
    }

    /// Build a function type from ordered `(arg name, type)` pairs and a return type.
    pub fn func<I, S>(args: I, ret: Type) -> Result<Type, TypeError>
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        let args = Fields::new(args)?;
        Ok(Type::Func(Signature {
            args,
            ret: Box::new(ret),
        }))
    }

    /// Whether anything is known about this type at the top level.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Type::Unresolved)
    }

    /// Number of `Unresolved` positions at any depth.
    pub fn holes(&self) -> usize {
        match self {
            Type::Unresolved => 1,
            Type::Prim(_) => 0,
            Type::Struct(fields) => fields.iter().map(|(_, ty)| ty.holes()).sum(),
            Type::Func(sig) => {
                sig.args.iter().map(|(_, ty)| ty.holes()).sum::<usize>() + sig.ret.holes()
            }
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Type::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    #[inline]
    pub fn as_func(&self) -> Option<&Signature> {
        match self {
            Type::Func(sig) => Some(sig),
            _ => None,
        }
    }

    /// Short kind name, used in diagnostics that only care about the kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Prim(prim) => prim.name(),
            Type::Struct(_) => "struct",
            Type::Func(_) => "func",
            Type::Unresolved => "unresolved",
        }
    }

    /// Structural comparison.
    ///
    /// Succeeds iff both types are recursively identical. `Unresolved` on
    /// either side, at any depth, matches anything. Struct fields are matched
    /// by name; function arguments by position.
    pub fn compare(&self, other: &Type) -> Result<(), TypeError> {
        match (self, other) {
            (Type::Unresolved, _) | (_, Type::Unresolved) => Ok(()),
            (Type::Prim(a), Type::Prim(b)) if a == b => Ok(()),
            (Type::Struct(ours), Type::Struct(theirs)) => {
                for (name, _) in theirs.iter() {
                    if !ours.contains(name) {
                        return Err(TypeError::mismatch(
                            self,
                            other,
                            MismatchContext::Field(name.to_owned()),
                        ));
                    }
                }
                for (name, ty) in ours.iter() {
                    let Some(their_ty) = theirs.get(name) else {
                        return Err(TypeError::mismatch(
                            self,
                            other,
                            MismatchContext::Field(name.to_owned()),
                        ));
                    };
                    ty.compare(their_ty)
                        .map_err(|err| within(err, MismatchContext::Field(name.to_owned())))?;
                }
                Ok(())
            }
            (Type::Func(ours), Type::Func(theirs)) => {
                if ours.arity() != theirs.arity() {
                    return Err(TypeError::mismatch(self, other, MismatchContext::TopLevel));
                }
                let pairs = ours.args.iter().zip(theirs.args.iter());
                for (index, ((_, a), (_, b))) in pairs.enumerate() {
                    a.compare(b)
                        .map_err(|err| within(err, MismatchContext::Arg(index)))?;
                }
                ours.ret
                    .compare(&theirs.ret)
                    .map_err(|err| within(err, MismatchContext::Return))
            }
            _ => Err(TypeError::mismatch(self, other, MismatchContext::TopLevel)),
        }
    }
}

/// Attach `context` to a mismatch that has no more specific location yet.
fn within(err: TypeError, context: MismatchContext) -> TypeError {
    match err {
        TypeError::Mismatch {
            expected,
            found,
            context: MismatchContext::TopLevel,
        } => TypeError::Mismatch {
            expected,
            found,
            context,
        },
        other => other,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Prim(prim) => f.write_str(prim.name()),
            Type::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name} {ty}")?;
                }
                f.write_str("}")
            }
            Type::Func(sig) => {
                f.write_str("func(")?;
                for (i, (name, ty)) in sig.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} {ty}")?;
                }
                write!(f, ") {}", sig.ret)
            }
            Type::Unresolved => f.write_str("?"),
        }
    }
}

/// Ordered, name-unique `(name, type)` list for struct fields and function args.
///
/// Order is kept stable for iteration and display but is not part of
/// equality for structs.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fields {
    entries: Vec<(String, Type)>,
}

impl Fields {
    /// Collect fields, rejecting duplicate names.
    pub fn new<I, S>(entries: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        let mut out: Vec<(String, Type)> = Vec::new();
        for (name, ty) in entries {
            let name = name.into();
            if out.iter().any(|(existing, _)| *existing == name) {
                return Err(TypeError::DuplicateName { name });
            }
            out.push((name, ty));
        }
        Ok(Fields { entries: out })
    }

    /// Wrap entries whose names are already known to be unique.
    pub(crate) fn from_unique(entries: Vec<(String, Type)>) -> Self {
        Fields { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a member type by name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The entry at `index` in declaration order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Type)> {
        self.entries
            .get(index)
            .map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> + '_ {
        self.entries.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, ty)| other.get(name).is_some_and(|theirs| theirs == ty))
    }
}

impl Eq for Fields {}

/// Ordered argument list plus return type of a function type.
///
/// Equality is positional on argument types; argument names are labels only.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Signature {
    args: Fields,
    ret: Box<Type>,
}

impl Signature {
    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn args(&self) -> &Fields {
        &self.args
    }

    /// The argument at `index` as `(name, type)`.
    pub fn arg(&self, index: usize) -> Option<(&str, &Type)> {
        self.args.get_index(index)
    }

    #[inline]
    pub fn ret(&self) -> &Type {
        &self.ret
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.arity() == other.arity()
            && self
                .args
                .iter()
                .zip(other.args.iter())
                .all(|((_, a), (_, b))| a == b)
            && self.ret == other.ret
    }
}

impl Eq for Signature {}
