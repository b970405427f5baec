//! Decoration vocabulary.
//!
//! Decorator names are mapped once, at IR construction, onto a closed set of
//! capability tags. Everything downstream matches on these tags instead of
//! comparing decorator strings.

/// A decoration attached to a class, property or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Marks a class as a persisted entity (`@Entity`, `@ViewEntity`, `@ChildEntity`).
    Entity,
    /// A persisted (or computed) column.
    Column(ColumnKind),
    /// An association to another entity.
    Relation {
        kind: RelationKind,
        /// Target entity name from the first decorator argument, if extractable.
        target: Option<String>,
    },
    /// `@JoinColumn` / `@JoinTable`: relation-adjacent, no own type contribution.
    JoinMetadata,
    /// A lifecycle hook on a method.
    Lifecycle(HookKind),
    /// Anything outside the vocabulary.
    Other(String),
}

/// Column decorator flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Plain,
    Primary,
    PrimaryGenerated,
    CreateDate,
    UpdateDate,
    DeleteDate,
    Version,
    /// `@VirtualColumn`: computed by a query, keeps its declared type verbatim.
    Virtual,
    /// Any other decorator whose name ends in `Column`.
    Custom,
}

/// Relation decorator flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToOne,
    ManyToOne,
    OneToMany,
    ManyToMany,
}

/// How many targets a relation property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// Entity lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    AfterLoad,
    BeforeInsert,
    AfterInsert,
    BeforeUpdate,
    AfterUpdate,
    BeforeRemove,
    AfterRemove,
    BeforeSoftRemove,
    AfterSoftRemove,
    BeforeRecover,
    AfterRecover,
}

impl Decoration {
    /// Maps a decorator name and its relation target (if any) to a tag.
    pub fn from_decorator(name: &str, target: Option<String>) -> Self {
        if let Some(kind) = RelationKind::from_name(name) {
            return Decoration::Relation { kind, target };
        }
        if let Some(hook) = HookKind::from_name(name) {
            return Decoration::Lifecycle(hook);
        }

        match name {
            "Entity" | "ViewEntity" | "ChildEntity" => Decoration::Entity,
            "JoinColumn" | "JoinTable" => Decoration::JoinMetadata,
            "Column" => Decoration::Column(ColumnKind::Plain),
            "PrimaryColumn" => Decoration::Column(ColumnKind::Primary),
            "PrimaryGeneratedColumn" => Decoration::Column(ColumnKind::PrimaryGenerated),
            "CreateDateColumn" => Decoration::Column(ColumnKind::CreateDate),
            "UpdateDateColumn" => Decoration::Column(ColumnKind::UpdateDate),
            "DeleteDateColumn" => Decoration::Column(ColumnKind::DeleteDate),
            "VersionColumn" => Decoration::Column(ColumnKind::Version),
            "VirtualColumn" => Decoration::Column(ColumnKind::Virtual),
            other if other.ends_with("Column") => Decoration::Column(ColumnKind::Custom),
            other => Decoration::Other(other.to_string()),
        }
    }
}

impl RelationKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "OneToOne" => Some(RelationKind::OneToOne),
            "ManyToOne" => Some(RelationKind::ManyToOne),
            "OneToMany" => Some(RelationKind::OneToMany),
            "ManyToMany" => Some(RelationKind::ManyToMany),
            _ => None,
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            RelationKind::OneToOne | RelationKind::ManyToOne => Cardinality::ToOne,
            RelationKind::OneToMany | RelationKind::ManyToMany => Cardinality::ToMany,
        }
    }
}

impl HookKind {
    fn from_name(name: &str) -> Option<Self> {
        let hook = match name {
            "AfterLoad" => HookKind::AfterLoad,
            "BeforeInsert" => HookKind::BeforeInsert,
            "AfterInsert" => HookKind::AfterInsert,
            "BeforeUpdate" => HookKind::BeforeUpdate,
            "AfterUpdate" => HookKind::AfterUpdate,
            "BeforeRemove" => HookKind::BeforeRemove,
            "AfterRemove" => HookKind::AfterRemove,
            "BeforeSoftRemove" => HookKind::BeforeSoftRemove,
            "AfterSoftRemove" => HookKind::AfterSoftRemove,
            "BeforeRecover" => HookKind::BeforeRecover,
            "AfterRecover" => HookKind::AfterRecover,
            _ => return None,
        };
        Some(hook)
    }
}
