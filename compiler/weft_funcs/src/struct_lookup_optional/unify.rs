//! Typing rules.
//!
//! The function expression is tied to four fresh unknowns, one per argument
//! plus the return. A generator then waits for the solver to record the call,
//! and from then on re-derives the links between the call's arguments and
//! those unknowns, adding what it can learn about the container and return
//! types. The member type only flows into the return type when the selector
//! is a known literal naming a member that exists.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use weft_types::{Type, Value};
use weft_unify::{find_call_args, Expr, GenerateResult, Invariant, Learned, Solution, UnifyError};

use super::{ARGS, ARG_FIELD, ARG_OPTIONAL, ARG_STRUCT};

/// Internal unknowns for one call site.
#[derive(Clone, Debug)]
struct Slots {
    container: Expr,
    field: Expr,
    fallback: Expr,
    out: Expr,
    /// Unknowns for the unselected struct members, created once per name so
    /// every round derives the same facts.
    members: Arc<Mutex<FxHashMap<String, Expr>>>,
}

impl Slots {
    fn fresh() -> Self {
        Slots {
            container: Expr::placeholder(),
            field: Expr::placeholder(),
            fallback: Expr::placeholder(),
            out: Expr::placeholder(),
            members: Arc::default(),
        }
    }

    /// The unknown standing for struct member `name`.
    fn member(&self, name: &str) -> Expr {
        self.members
            .lock()
            .entry(name.to_owned())
            .or_insert_with(Expr::placeholder)
            .clone()
    }
}

/// Where a learned container type came from, and what its member teaches.
struct ContainerSource {
    container: &'static str,
    member: &'static str,
}

const DECLARED_CONTAINER: ContainerSource = ContainerSource {
    container: "declared struct arg type",
    member: "declared struct member type",
};

const SOLVED_CONTAINER: ContainerSource = ContainerSource {
    container: "solved struct arg type",
    member: "solved struct member type",
};

#[tracing::instrument(level = "debug", skip_all, fields(site = %site))]
pub(super) fn invariants(site: &Expr) -> Result<Vec<Invariant>, UnifyError> {
    let slots = Slots::fresh();
    let signature = Invariant::wrap_func(
        site.clone(),
        [
            (ARG_STRUCT, slots.container.clone()),
            (ARG_FIELD, slots.field.clone()),
            (ARG_OPTIONAL, slots.fallback.clone()),
        ],
        slots.out.clone(),
    )?;

    let generator = {
        let site = site.clone();
        let slots = slots.clone();
        Invariant::generator(site.clone(), move |invariants, solution| {
            generate(&site, &slots, invariants, solution)
        })
    };

    Ok(vec![
        Invariant::equals(slots.field.clone(), Type::STR),
        // holds whether or not the member exists
        Invariant::equality(slots.fallback.clone(), slots.out.clone()),
        signature,
        generator,
    ])
}

/// One generator round for the call site `site`.
fn generate(site: &Expr, slots: &Slots, invariants: &[Invariant], solution: &Solution) -> GenerateResult {
    let Some(call) = find_call_args(invariants, site) else {
        return Err(UnifyError::NoProgress);
    };
    let [container, field, fallback] = call.args() else {
        return Err(UnifyError::ArityMismatch {
            expected: ARGS.len(),
            found: call.args().len(),
        });
    };
    let ret = call.call();

    let mut derived = vec![
        Invariant::equality(ret.clone(), slots.out.clone()),
        Invariant::equality(container.clone(), slots.container.clone()),
        Invariant::equality(field.clone(), slots.field.clone()),
        Invariant::equality(fallback.clone(), slots.fallback.clone()),
        Invariant::equals(field.clone(), Type::STR),
    ];

    let selector = selector(field, solution)?;

    let mut container_ty = Learned::new();
    let mut out_ty = Learned::new();
    if let Some(ty) = container.ty() {
        learn_container(&ty, &DECLARED_CONTAINER, selector, &mut container_ty, &mut out_ty)?;
    }
    if let Some(ty) = solution.get(container) {
        learn_container(ty, &SOLVED_CONTAINER, selector, &mut container_ty, &mut out_ty)?;
    }
    if let Some(ty) = fallback.ty() {
        out_ty.learn(&ty, "declared optional arg type")?;
    }
    if let Some(ty) = solution.get(fallback) {
        out_ty.learn(ty, "solved optional arg type")?;
    }
    if let Some(ty) = ret.ty() {
        out_ty.learn(&ty, "declared return type")?;
    }
    if let Some(ty) = solution.get(ret) {
        out_ty.learn(ty, "solved return type")?;
    }

    if let Some(ty) = container_ty.get() {
        derived.push(Invariant::equals(slots.container.clone(), ty.clone()));
        if let (Some(name), Some(fields)) = (selector, ty.as_struct()) {
            if fields.contains(name) {
                // only the selected member is tied to the return type
                let members = fields.names().map(|member| {
                    let expr = if member == name {
                        slots.out.clone()
                    } else {
                        slots.member(member)
                    };
                    (member.to_owned(), expr)
                });
                derived.push(Invariant::wrap_struct(slots.container.clone(), members)?);
            }
        }
    }

    if let Some(ty) = out_ty.get() {
        derived.push(Invariant::equals(slots.fallback.clone(), ty.clone()));
        derived.push(Invariant::equals(slots.out.clone(), ty.clone()));
    }

    derived.push(Invariant::wrap_call(ret.clone(), site.clone()));
    tracing::trace!(count = derived.len(), "derived invariants");
    Ok(derived)
}

/// The selector, if it is a known, non-empty literal.
///
/// A resolved non-`str` type on the field argument is an error.
fn selector<'a>(field: &'a Expr, solution: &Solution) -> Result<Option<&'a str>, UnifyError> {
    let declared = field.ty();
    for ty in declared.iter().chain(solution.get(field)) {
        if ty.is_resolved() && *ty != Type::STR {
            return Err(UnifyError::UnexpectedKind {
                position: ARG_FIELD,
                expected: "str",
                found: ty.clone(),
            });
        }
    }
    Ok(field
        .value()
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty()))
}

/// Learn the container type and, when the selected member exists, its type
/// as the return type.
fn learn_container(
    ty: &Type,
    source: &ContainerSource,
    selector: Option<&str>,
    container: &mut Learned,
    out: &mut Learned,
) -> Result<(), UnifyError> {
    if !ty.is_resolved() {
        return Ok(());
    }
    let Some(fields) = ty.as_struct() else {
        return Err(UnifyError::UnexpectedKind {
            position: ARG_STRUCT,
            expected: "struct",
            found: ty.clone(),
        });
    };
    match selector.map(|name| (name, fields.get(name))) {
        Some((_, Some(member))) => {
            out.learn(member, source.member)?;
        }
        Some((name, None)) => {
            tracing::debug!(field = name, struct_ty = %ty, "member missing, result follows the optional arg");
        }
        None => {}
    }
    container.learn(ty, source.container)?;
    Ok(())
}
