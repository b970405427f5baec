//! Barrel (`index.ts`) generation.

use crate::config::CompilerConfig;

/// Re-exports every generated module, in the order given.
///
/// The base file is not part of the barrel.
pub fn generate_barrel(module_ids: &[String], config: &CompilerConfig) -> String {
    let mut output = String::new();

    for module_id in module_ids {
        output.push_str(&format!(
            "export * from '{}';\n",
            config.module_import(module_id)
        ));
    }

    output
}
