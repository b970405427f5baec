//! TypeScript code generation from projected models.
//!
//! Produces, for one run:
//! - one model module per source file that declares entities
//! - the base file holding `BaseModel` (when a base declaration exists)
//! - the barrel `index.ts` re-exporting every model module
//!
//! Generation is pure text assembly. Writing is left to the caller.

mod barrel;
mod model;
pub mod ts_types;

use crate::analysis::ProjectedModels;
use crate::config::CompilerConfig;

pub use crate::analysis::BASE_MODULE_ID;

/// File name of the barrel.
pub const BARREL_FILE: &str = "index.ts";

/// Generated TypeScript code.
pub struct GeneratedCode {
    /// Map of filename to content.
    pub files: Vec<(String, String)>,
}

/// Generates every output file for the projected models.
pub fn generate(projected: &ProjectedModels, config: &CompilerConfig) -> GeneratedCode {
    let mut files = Vec::new();

    if let Some(base) = &projected.base {
        files.push((config.module_file(BASE_MODULE_ID), model::generate_base(base)));
    }

    for module in &projected.modules {
        files.push((
            config.module_file(&module.module_id),
            model::generate_module(module, config),
        ));
    }

    files.push((
        BARREL_FILE.to_string(),
        barrel::generate_barrel(&projected.barrel_modules, config),
    ));

    GeneratedCode { files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::project;
    use crate::frontend::typescript::{parser::TypeScriptParser, to_ir::to_ir};
    use std::path::{Path, PathBuf};

    /// Runs parse, projection and generation over in-memory sources.
    fn generate_from(sources: &[(&str, &str)]) -> GeneratedCode {
        let mut parser = TypeScriptParser::new().expect("parser");
        let parsed: Vec<_> = sources
            .iter()
            .map(|(path, source)| parser.parse(source, Path::new(path)).expect("parse"))
            .collect();
        let set = to_ir(&parsed, PathBuf::from("src"));
        let config = CompilerConfig::default();
        generate(&project(&set, &config), &config)
    }

    fn file<'a>(code: &'a GeneratedCode, name: &str) -> &'a str {
        code.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
            .unwrap_or_else(|| panic!("missing generated file {}", name))
    }

    const USER: &str = r#"
import { Entity, Column, OneToMany } from 'typeorm';
import { BaseEntity } from './base.entity';
import { Post } from './post.entity';

@Entity()
export class User extends BaseEntity {
  @Column()
  name: string;

  @OneToMany(() => Post, (post) => post.author)
  posts: Post[];
}
"#;

    const POST: &str = r#"
import { Entity, Column, ManyToOne } from 'typeorm';
import { BaseEntity } from './base.entity';
import { User } from './user.entity';

@Entity()
export class Post extends BaseEntity {
  @Column()
  title: string;

  @ManyToOne(() => User, (user) => user.posts)
  author: User;
}
"#;

    const BASE: &str = r#"
import { PrimaryGeneratedColumn, CreateDateColumn } from 'typeorm';

export abstract class BaseEntity {
  @PrimaryGeneratedColumn()
  id: number;

  @CreateDateColumn()
  createdAt: Date;
}
"#;

    #[test]
    fn test_user_post_scenario() {
        let code = generate_from(&[
            ("src/base.entity.ts", BASE),
            ("src/post.entity.ts", POST),
            ("src/user.entity.ts", USER),
        ]);

        assert_eq!(
            file(&code, "user.model.ts"),
            "import { BaseModel } from './base.model';\n\
             import { PostModel } from './post.model';\n\
             \n\
             export interface UserModel extends BaseModel {\n  name: string;\n  posts: PostModel[];\n}\n"
        );
        assert_eq!(
            file(&code, "post.model.ts"),
            "import { BaseModel } from './base.model';\n\
             import { UserModel } from './user.model';\n\
             \n\
             export interface PostModel extends BaseModel {\n  title: string;\n  author: UserModel;\n}\n"
        );
        assert_eq!(
            file(&code, "base.model.ts"),
            "export interface BaseModel {\n  id: number;\n  createdAt: Date;\n}\n"
        );
        assert_eq!(
            file(&code, "index.ts"),
            "export * from './post.model';\nexport * from './user.model';\n"
        );
    }

    #[test]
    fn test_enum_scenario() {
        let user = r#"
import { Entity, Column } from 'typeorm';

export enum Status {
  Active = 'active',
  Inactive = 'inactive',
}

@Entity()
export class User {
  @Column({ type: 'enum', enum: Status })
  status: Status;

  @Column({ type: 'enum', enum: Status })
  previousStatus: Status;
}
"#;
        let code = generate_from(&[("src/user.entity.ts", user)]);
        let output = file(&code, "user.model.ts");

        assert!(output.contains("  status: Status;\n"));
        assert!(output.contains("export enum Status {\n  Active = 'active',\n  Inactive = 'inactive',\n}\n"));
        assert_eq!(output.matches("export enum Status").count(), 1);
        assert!(!output.contains("import { Status }"));
    }

    #[test]
    fn test_enum_string_values_keep_their_literal_value() {
        let user = r#"
export enum Msg {
  Quote = 'it\'s',
  Say = "a \"b\"",
  Path = "C:\\tmp",
}

@Entity()
export class User {
  @Column()
  msg: Msg;
}
"#;
        let code = generate_from(&[("src/user.entity.ts", user)]);
        let output = file(&code, "user.model.ts");

        assert!(output.contains("  Quote = 'it\\'s',\n"));
        assert!(output.contains("  Say = 'a \"b\"',\n"));
        assert!(output.contains("  Path = 'C:\\\\tmp',\n"));
    }

    #[test]
    fn test_enum_from_other_file_is_inlined() {
        let enums = "export enum Role { Admin, Member }\n";
        let user = r#"
@Entity()
export class User {
  @Column()
  role: Role;
}
"#;
        let code = generate_from(&[("src/enums.ts", enums), ("src/user.entity.ts", user)]);
        let output = file(&code, "user.model.ts");

        assert!(output.contains("export enum Role {\n  Admin = 0,\n  Member = 1,\n}\n"));
        assert!(code.files.iter().all(|(name, _)| name != "enums.model.ts"));
    }

    #[test]
    fn test_self_relation_has_no_import() {
        let category = r#"
@Entity()
export class Category {
  @ManyToOne(() => Category, (c) => c.children)
  parent: Category;

  @OneToMany(() => Category, (c) => c.parent)
  children: Category[];
}
"#;
        let code = generate_from(&[("src/category.entity.ts", category)]);
        let output = file(&code, "category.model.ts");

        assert_eq!(output.matches("import").count(), 1);
        assert!(output.contains("  parent: CategoryModel;\n"));
        assert!(output.contains("  children: CategoryModel[];\n"));
    }

    #[test]
    fn test_hook_assigned_property_emitted_once() {
        let user = r#"
@Entity()
export class User {
  @Column()
  first: string;

  fullName: string;

  @AfterLoad()
  computeOnLoad() {
    this.fullName = this.first;
  }

  @BeforeInsert()
  @BeforeUpdate()
  computeOnSave() {
    this.fullName = this.first;
  }
}
"#;
        let code = generate_from(&[("src/user.entity.ts", user)]);
        let output = file(&code, "user.model.ts");

        assert_eq!(output.matches("fullName").count(), 1);
        assert!(output.contains("  fullName: string;\n"));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let sources = [
            ("src/base.entity.ts", BASE),
            ("src/post.entity.ts", POST),
            ("src/user.entity.ts", USER),
        ];
        let first = generate_from(&sources);
        let second = generate_from(&sources);
        assert_eq!(first.files, second.files);
    }

    #[test]
    fn test_no_entities_gives_empty_barrel() {
        let code = generate_from(&[("src/util.ts", "export const x = 1;\n")]);
        assert_eq!(code.files.len(), 1);
        assert_eq!(file(&code, "index.ts"), "");
    }
}
