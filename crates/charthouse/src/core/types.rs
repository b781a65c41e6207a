//! Core type definitions for class-diagram generation
//!
//! This module contains the fundamental types used throughout Charthouse:
//! type references, declared-type expressions, relationship kinds, and the
//! usage observations that feed the relationship classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reference to a named type, with structured generic arguments.
///
/// Two references are equal when their identifier and full argument list
/// are equal. Generic arguments are real references, never raw bracket
/// text, so nested generics compare and render reliably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a reference to a non-generic type
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            generic_arguments: Vec::new(),
        }
    }

    /// Create a reference to a generic type with the given arguments
    pub fn generic(identifier: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            identifier: identifier.into(),
            generic_arguments: arguments,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// The last segment of a dotted identifier (`System.Text.Encoding` → `Encoding`)
    pub fn simple_name(&self) -> &str {
        self.identifier
            .rsplit('.')
            .next()
            .unwrap_or(&self.identifier)
    }

    /// The bracketed argument list as text (`"<LineItem>"`), or `""` for
    /// non-generic references. Used for root/leaf labels on edges.
    pub fn argument_text(&self) -> String {
        if self.generic_arguments.is_empty() {
            return String::new();
        }
        let args = self
            .generic_arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("<{}>", args)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.identifier, self.argument_text())
    }
}

/// A declared-type expression as it appears on a member.
///
/// Produced by [`crate::core::typetext::parse_type_text`]; text that does
/// not parse never becomes a `TypeExpr` and therefore never reaches the
/// classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A (possibly generic) named type: `Customer`, `List<LineItem>`
    Named(TypeRef),
    /// An array of the inner expression: `LineItem[]`
    Array(Box<TypeExpr>),
    /// A nullable wrapper around the inner expression: `Customer?`
    Nullable(Box<TypeExpr>),
}

impl TypeExpr {
    /// Strip nullable wrappers, leaving arrays and named types intact
    pub fn strip_nullable(&self) -> &TypeExpr {
        match self {
            TypeExpr::Nullable(inner) => inner.strip_nullable(),
            other => other,
        }
    }

    /// The named reference if this expression is a plain named type
    pub fn as_named(&self) -> Option<&TypeRef> {
        match self {
            TypeExpr::Named(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeExpr::Array(_))
    }

    /// The named root of the expression, regardless of array/nullable
    /// wrapping (`LineItem[]` → `LineItem`)
    pub fn named_root(&self) -> &TypeRef {
        match self {
            TypeExpr::Named(r) => r,
            TypeExpr::Array(inner) | TypeExpr::Nullable(inner) => inner.named_root(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(r) => write!(f, "{}", r),
            TypeExpr::Array(inner) => write!(f, "{}[]", inner),
            TypeExpr::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

/// How many instances of the referenced type the member holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplicity {
    #[default]
    Single,
    Many,
}

/// Where a parameter binding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySource {
    Constructor,
    Method,
}

/// A parameter binding attached to a usage observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterBinding {
    pub source: DependencySource,
    /// The parameter declares a default value
    pub has_default: bool,
}

/// Relationship kinds between two types
///
/// Each kind is bound to a PlantUML arrow symbol; precedence between
/// symbols is configuration data (see
/// [`crate::core::config::PrecedenceTable`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Inheritance, // <|--
    Realization, // <|..
    Composition, // *--
    Aggregation, // o--
    Nesting,     // +--
    Association, // -->
    Dependency {
        source: DependencySource,
        /// The parameter carries a default value
        optional: bool,
    },
}

impl RelationshipKind {
    /// The rendering symbol bound to this kind
    pub fn symbol(&self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "<|--",
            RelationshipKind::Realization => "<|..",
            RelationshipKind::Composition => "*--",
            RelationshipKind::Aggregation => "o--",
            RelationshipKind::Nesting => "+--",
            RelationshipKind::Association => "-->",
            RelationshipKind::Dependency {
                source: DependencySource::Constructor,
                optional: false,
            } => ".[#green,thickness=3].>",
            RelationshipKind::Dependency {
                source: DependencySource::Constructor,
                optional: true,
            } => ".[#green].>",
            RelationshipKind::Dependency {
                source: DependencySource::Method,
                optional: false,
            } => ".[#blue,thickness=3].>",
            RelationshipKind::Dependency {
                source: DependencySource::Method,
                optional: true,
            } => ".[#blue].>",
        }
    }
}

/// An attribute-driven association override
///
/// When present on a member (or configured for a referenced type), the
/// override replaces the entire heuristic decision table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssociationOverride {
    /// Arrow symbol; `--` when unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Replacement leaf identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root_label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub leaf_label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub center_label: String,
}

impl AssociationOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn with_leaf_label(mut self, label: impl Into<String>) -> Self {
        self.leaf_label = label.into();
        self
    }

    pub fn with_center_label(mut self, label: impl Into<String>) -> Self {
        self.center_label = label.into();
        self
    }

    /// The symbol to render, falling back to the plain link
    pub fn symbol_or_default(&self) -> &str {
        self.symbol.as_deref().unwrap_or("--")
    }
}

/// One raw observation of "member X of type T references type U"
///
/// Observations are produced by the member scan and consumed immediately
/// by the relationship classifier; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageObservation {
    pub owner: TypeRef,
    pub member_name: String,
    pub referenced: TypeExpr,
    pub multiplicity: Multiplicity,
    /// The declaration carries an inline initializer
    pub initialized_inline: bool,
    /// Present when the observation comes from a method or constructor
    /// parameter rather than a stored member
    pub binding: Option<ParameterBinding>,
    pub attribute_override: Option<AssociationOverride>,
}

impl UsageObservation {
    pub fn is_parameter_binding(&self) -> bool {
        self.binding.is_some()
    }
}

/// The deduplication identity of a relationship
///
/// The center label is deliberately excluded: two candidates that differ
/// only there collide and are resolved by symbol precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    pub root: TypeRef,
    pub leaf: TypeRef,
    pub root_label: String,
    pub leaf_label: String,
}

/// A classified, renderable relationship edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub root: TypeRef,
    pub leaf: TypeRef,
    pub symbol: String,
    pub root_label: String,
    pub leaf_label: String,
    pub center_label: String,
}

impl Relationship {
    /// Create an edge of the given kind between two types
    pub fn new(root: TypeRef, leaf: TypeRef, kind: RelationshipKind) -> Self {
        Self::with_symbol(root, leaf, kind.symbol())
    }

    /// Create an edge with an explicit symbol (attribute overrides)
    pub fn with_symbol(root: TypeRef, leaf: TypeRef, symbol: impl Into<String>) -> Self {
        Self {
            root,
            leaf,
            symbol: symbol.into(),
            root_label: String::new(),
            leaf_label: String::new(),
            center_label: String::new(),
        }
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn with_leaf_label(mut self, label: impl Into<String>) -> Self {
        self.leaf_label = label.into();
        self
    }

    pub fn with_center_label(mut self, label: impl Into<String>) -> Self {
        self.center_label = label.into();
        self
    }

    pub fn key(&self) -> RelationshipKey {
        RelationshipKey {
            root: self.root.clone(),
            leaf: self.leaf.clone(),
            root_label: self.root_label.clone(),
            leaf_label: self.leaf_label.clone(),
        }
    }
}

impl fmt::Display for Relationship {
    /// `<root>[ "<rootLabel>"] <symbol>[ "<leafLabel>"] <leaf>[ : "<centerLabel>"]`,
    /// omitting every quoted segment whose label is empty
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.identifier)?;
        if !self.root_label.is_empty() {
            write!(f, " \"{}\"", self.root_label)?;
        }
        write!(f, " {}", self.symbol)?;
        if !self.leaf_label.is_empty() {
            write!(f, " \"{}\"", self.leaf_label)?;
        }
        write!(f, " {}", self.leaf.identifier)?;
        if !self.center_label.is_empty() {
            write!(f, " : \"{}\"", self.center_label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        assert_eq!(TypeRef::new("Customer").to_string(), "Customer");
        let list = TypeRef::generic("List", vec![TypeRef::new("LineItem")]);
        assert_eq!(list.to_string(), "List<LineItem>");
        assert_eq!(list.argument_text(), "<LineItem>");
    }

    #[test]
    fn test_type_ref_nested_argument_text() {
        let nested = TypeRef::generic(
            "Dictionary",
            vec![
                TypeRef::new("String"),
                TypeRef::generic("List", vec![TypeRef::new("Order")]),
            ],
        );
        assert_eq!(nested.argument_text(), "<String, List<Order>>");
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(
            TypeRef::new("System.Text.Encoding").simple_name(),
            "Encoding"
        );
        assert_eq!(TypeRef::new("Encoding").simple_name(), "Encoding");
    }

    #[test]
    fn test_strip_nullable() {
        let expr = TypeExpr::Nullable(Box::new(TypeExpr::Named(TypeRef::new("Customer"))));
        assert_eq!(
            expr.strip_nullable(),
            &TypeExpr::Named(TypeRef::new("Customer"))
        );
    }

    #[test]
    fn test_named_root_through_array() {
        let expr = TypeExpr::Array(Box::new(TypeExpr::Named(TypeRef::new("LineItem"))));
        assert_eq!(expr.named_root(), &TypeRef::new("LineItem"));
    }

    #[test]
    fn test_type_expr_display_round_trip() {
        let expr = TypeExpr::Nullable(Box::new(TypeExpr::Array(Box::new(TypeExpr::Named(
            TypeRef::generic("List", vec![TypeRef::new("Order")]),
        )))));
        assert_eq!(expr.to_string(), "List<Order>[]?");
    }

    #[test]
    fn test_relationship_line_without_labels() {
        let rel = Relationship::new(
            TypeRef::new("Entity"),
            TypeRef::new("Order"),
            RelationshipKind::Inheritance,
        );
        assert_eq!(rel.to_string(), "Entity <|-- Order");
    }

    #[test]
    fn test_relationship_line_with_all_labels() {
        let rel = Relationship::new(
            TypeRef::new("Order"),
            TypeRef::new("LineItem"),
            RelationshipKind::Aggregation,
        )
        .with_root_label("1")
        .with_leaf_label("*")
        .with_center_label("lines");
        assert_eq!(rel.to_string(), "Order \"1\" o-- \"*\" LineItem : \"lines\"");
    }

    #[test]
    fn test_dependency_symbols() {
        let ctor = RelationshipKind::Dependency {
            source: DependencySource::Constructor,
            optional: false,
        };
        let method = RelationshipKind::Dependency {
            source: DependencySource::Method,
            optional: true,
        };
        assert_eq!(ctor.symbol(), ".[#green,thickness=3].>");
        assert_eq!(method.symbol(), ".[#blue].>");
    }

    #[test]
    fn test_key_excludes_center_label() {
        let a = Relationship::new(
            TypeRef::new("Order"),
            TypeRef::new("Customer"),
            RelationshipKind::Aggregation,
        )
        .with_center_label("primary");
        let b = Relationship::new(
            TypeRef::new("Order"),
            TypeRef::new("Customer"),
            RelationshipKind::Aggregation,
        )
        .with_center_label("secondary");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_override_symbol_default() {
        assert_eq!(AssociationOverride::new().symbol_or_default(), "--");
        assert_eq!(
            AssociationOverride::new()
                .with_symbol("o--")
                .symbol_or_default(),
            "o--"
        );
    }
}
