//! Debug script to see what the parser produces.
//!
//! Usage: `debug_parse [file.ts]`. Without an argument a built-in sample is parsed.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use modelgen_compiler::frontend::typescript::ast::Statement;
use modelgen_compiler::frontend::typescript::parser::TypeScriptParser;

const SAMPLE: &str = r#"
export enum Status { Active = 'active', Inactive = 'inactive' }

@Entity()
export class User extends BaseEntity {
  @Column()
  name: string;

  @OneToMany(() => Post, (post) => post.author)
  posts: Post[];

  fullName: string;

  @AfterLoad()
  compute() {
    this.fullName = this.name;
  }
}
"#;

fn main() -> miette::Result<()> {
    let (path, source) = match std::env::args().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let source = std::fs::read_to_string(&path).into_diagnostic()?;
            (path, source)
        }
        None => (PathBuf::from("sample.entity.ts"), SAMPLE.to_string()),
    };

    let mut parser = TypeScriptParser::new()?;
    let parsed = parser.parse(&source, &path)?;

    println!("Parsed file: {:?} (syntax errors: {})", parsed.path, parsed.has_errors);

    println!("\nClasses:");
    for class in &parsed.classes {
        let decorators: Vec<_> = class.decorators.iter().map(|d| d.name.as_str()).collect();
        println!(
            "  {} (exported: {}, abstract: {}) @[{}]",
            class.name,
            class.exported,
            class.is_abstract,
            decorators.join(", ")
        );
        for property in &class.properties {
            let decorators: Vec<_> = property.decorators.iter().map(|d| d.name.as_str()).collect();
            println!(
                "    {}{}: {} @[{}]{}",
                property.name,
                if property.optional { "?" } else { "" },
                property.type_text.as_deref().unwrap_or("<none>"),
                decorators.join(", "),
                if property.is_static { " (static)" } else { "" }
            );
            for decorator in &property.decorators {
                if !decorator.arguments.is_empty() {
                    println!("      {} args: {:?}", decorator.name, decorator.arguments);
                }
            }
        }
        for method in &class.methods {
            let decorators: Vec<_> = method.decorators.iter().map(|d| d.name.as_str()).collect();
            println!("    {}() @[{}]", method.name, decorators.join(", "));
            for statement in &method.body {
                if let Statement::Assignment { target, .. } = statement {
                    println!("      assigns {:?}", target);
                }
            }
        }
    }

    println!("\nEnums:");
    for decl in &parsed.enums {
        println!("  {} (exported: {})", decl.name, decl.exported);
        for member in &decl.members {
            println!("    {} = {:?}", member.name, member.initializer);
        }
    }

    Ok(())
}
