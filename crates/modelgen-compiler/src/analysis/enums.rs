//! Enum inlining.

use crate::ir::DeclarationSet;
use super::ModuleContext;

/// Captures the enum called `name` into the module being generated.
///
/// Returns whether `name` is an enum of the source set. Capturing an enum the
/// module already holds leaves it unchanged.
pub fn capture_enum(name: &str, set: &DeclarationSet, ctx: &mut ModuleContext) -> bool {
    let Some(decl) = set.enums.get(name) else {
        return false;
    };
    ctx.enums
        .entry(decl.name.clone())
        .or_insert_with(|| decl.clone());
    true
}
