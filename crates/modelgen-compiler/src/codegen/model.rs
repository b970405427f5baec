//! Model module and base file generation.

use crate::analysis::{
    BaseModel, ClassifiedProperty, ImportSource, ModelModule, BASE_MODEL_NAME, BASE_MODULE_ID,
};
use crate::config::CompilerConfig;
use crate::ir::{EnumIR, EnumValue};
use super::ts_types::{model_type, quote};

/// Generates the text of one model module.
///
/// Layout: the base import, one import per other module referenced, the
/// entity interfaces in declaration order, then the inlined enums by name.
pub fn generate_module(module: &ModelModule, config: &CompilerConfig) -> String {
    let mut output = format!(
        "import {{ {} }} from '{}';\n",
        BASE_MODEL_NAME,
        config.module_import(BASE_MODULE_ID)
    );

    for import in &module.imports {
        match &import.source {
            ImportSource::Module(source) if *source != module.module_id => {
                output.push_str(&format!(
                    "import {{ {} }} from '{}';\n",
                    import.name,
                    config.module_import(source)
                ));
            }
            ImportSource::Module(_) | ImportSource::Unresolved => {}
        }
    }

    for entity in &module.entities {
        output.push('\n');
        output.push_str(&format!(
            "export interface {} extends {} {{\n",
            entity.model_name(),
            BASE_MODEL_NAME
        ));
        for property in &entity.properties {
            output.push_str(&format_property(property));
        }
        output.push_str("}\n");
    }

    for decl in module.enums.values() {
        output.push('\n');
        output.push_str(&generate_enum(decl));
    }

    output
}

/// Generates the base file holding `BaseModel`.
pub fn generate_base(base: &BaseModel) -> String {
    let mut output = format!("export interface {} {{\n", BASE_MODEL_NAME);
    for property in &base.properties {
        output.push_str(&format_property(property));
    }
    output.push_str("}\n");
    output
}

fn format_property(property: &ClassifiedProperty) -> String {
    let optional_marker = if property.optional { "?" } else { "" };
    format!(
        "  {}{}: {};\n",
        property.name,
        optional_marker,
        model_type(&property.typ)
    )
}

fn generate_enum(decl: &EnumIR) -> String {
    let mut output = format!("export enum {} {{\n", decl.name);
    for member in &decl.members {
        match &member.value {
            Some(EnumValue::Number(n)) => output.push_str(&format!("  {} = {},\n", member.name, n)),
            Some(EnumValue::Text(s)) => output.push_str(&format!("  {} = {},\n", member.name, quote(s))),
            Some(EnumValue::Expression(e)) => output.push_str(&format!("  {} = {},\n", member.name, e)),
            None => output.push_str(&format!("  {},\n", member.name)),
        }
    }
    output.push_str("}\n");
    output
}
