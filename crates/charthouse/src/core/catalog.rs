//! The Type Catalog seam
//!
//! The catalog supplies the structural facts the generator consumes: type
//! declarations, ordered member lists, base/interface references, and the
//! constructor-initialization predicate. A language front-end implements
//! [`TypeCatalog`]; the serde-backed [`InMemoryCatalog`] ships with the
//! crate for tests and for the CLI's JSON input.

use serde::{Deserialize, Serialize};

use super::error::GeneratorError;
use super::types::AssociationOverride;

/// Member accessibility, with its PlantUML marker
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Public, // +
    Protected,         // #
    Internal,          // ~
    ProtectedInternal, // #
    PrivateProtected,  // -
    Private,           // -
}

impl Accessibility {
    pub fn marker(self) -> char {
        match self {
            Accessibility::Public => '+',
            Accessibility::Protected | Accessibility::ProtectedInternal => '#',
            Accessibility::Internal => '~',
            Accessibility::Private | Accessibility::PrivateProtected => '-',
        }
    }

    /// The source-level keyword, used in accessor markers
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::Private => "private",
        }
    }
}

/// The declared kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
    Struct,
    Record,
    RecordStruct,
    Enum,
}

impl TypeKind {
    /// The declaration keyword in diagram text
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class | TypeKind::Record => "class",
            TypeKind::AbstractClass => "abstract class",
            TypeKind::Interface => "interface",
            TypeKind::Struct | TypeKind::RecordStruct => "struct",
            TypeKind::Enum => "enum",
        }
    }

    /// Extra stereotype rendered after the name, if any
    pub fn annotation(self) -> Option<&'static str> {
        match self {
            TypeKind::Record | TypeKind::RecordStruct => Some("<<record>>"),
            _ => None,
        }
    }
}

/// The kind of a member declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Constructor,
    Event,
    EnumConstant,
}

/// A property accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

impl AccessorKind {
    pub fn keyword(self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Init => "init",
        }
    }
}

/// One accessor on a property, with an optional narrowed accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
}

impl AccessorDecl {
    pub fn get() -> Self {
        Self {
            kind: AccessorKind::Get,
            accessibility: None,
        }
    }

    pub fn set() -> Self {
        Self {
            kind: AccessorKind::Set,
            accessibility: None,
        }
    }

    pub fn init() -> Self {
        Self {
            kind: AccessorKind::Init,
            accessibility: None,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }
}

/// A parameter on a method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    /// Raw declared-type text, e.g. `List<LineItem>`
    pub declared_type: String,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_override: Option<AssociationOverride>,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            has_default: false,
            association_override: None,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_override(mut self, override_: AssociationOverride) -> Self {
        self.association_override = Some(override_);
        self
    }
}

/// One member of a type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDecl {
    pub kind: MemberKind,
    pub name: String,
    /// Raw declared-type text; empty for constructors
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub declared_type: String,
    /// Member modifiers such as `static` or `abstract`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDecl>,
    /// Property accessors; an empty list renders the get-only marker
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<AccessorDecl>,
    #[serde(default)]
    pub has_initializer: bool,
    #[serde(default)]
    pub initializer_is_literal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal_text: Option<String>,
    /// Constant value of an enum member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_value: Option<String>,
    /// Explicit ignore marker; the member is skipped entirely
    #[serde(default)]
    pub ignored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_override: Option<AssociationOverride>,
}

impl MemberDecl {
    fn new(kind: MemberKind, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            declared_type: declared_type.into(),
            modifiers: Vec::new(),
            accessibility: Accessibility::Public,
            parameters: Vec::new(),
            accessors: Vec::new(),
            has_initializer: false,
            initializer_is_literal: false,
            literal_text: None,
            constant_value: None,
            ignored: false,
            association_override: None,
        }
    }

    pub fn field(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Field, name, declared_type)
    }

    /// A property with conventional get/set accessors
    pub fn property(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let mut member = Self::new(MemberKind::Property, name, declared_type);
        member.accessors = vec![AccessorDecl::get(), AccessorDecl::set()];
        member
    }

    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Method, name, return_type)
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Constructor, name, "")
    }

    pub fn event(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Event, name, declared_type)
    }

    pub fn enum_constant(name: impl Into<String>) -> Self {
        Self::new(MemberKind::EnumConstant, name, "")
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_accessors(mut self, accessors: Vec<AccessorDecl>) -> Self {
        self.accessors = accessors;
        self
    }

    /// Mark the member as having an inline initializer (non-literal)
    pub fn with_initializer(mut self) -> Self {
        self.has_initializer = true;
        self
    }

    /// Mark the member as initialized with a literal, captured for rendering
    pub fn with_literal_initializer(mut self, literal: impl Into<String>) -> Self {
        self.has_initializer = true;
        self.initializer_is_literal = true;
        self.literal_text = Some(literal.into());
        self
    }

    pub fn with_constant_value(mut self, value: impl Into<String>) -> Self {
        self.constant_value = Some(value.into());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn with_override(mut self, override_: AssociationOverride) -> Self {
        self.association_override = Some(override_);
        self
    }
}

/// One type declaration in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub identifier: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<String>,
    /// Type modifiers such as `sealed` or `static`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    /// Raw declared base-type text, if an explicit base is declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// Raw declared interface texts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDecl>,
    /// Identifiers of types declared lexically inside this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<String>,
    /// Members assigned a fresh object inside a constructor body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructor_initialized: Vec<String>,
}

impl TypeDecl {
    pub fn new(identifier: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            generic_parameters: Vec::new(),
            modifiers: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
            constructor_initialized: Vec::new(),
        }
    }

    pub fn class(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::Class)
    }

    pub fn abstract_class(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::AbstractClass)
    }

    pub fn interface(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::Interface)
    }

    pub fn record(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::Record)
    }

    pub fn structure(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::Struct)
    }

    pub fn enumeration(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TypeKind::Enum)
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_generic_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.generic_parameters.push(parameter.into());
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn with_nested(mut self, identifier: impl Into<String>) -> Self {
        self.nested.push(identifier.into());
        self
    }

    /// Record that a constructor body assigns a fresh object to `member`
    pub fn with_constructor_initialized(mut self, member: impl Into<String>) -> Self {
        self.constructor_initialized.push(member.into());
        self
    }
}

/// The external seam the generator consumes.
///
/// Implementations must be read-only and side-effect-free; the generator
/// may query them from multiple Build calls running on different threads.
pub trait TypeCatalog: Sync {
    /// Look up a type declaration by identifier
    fn type_decl(&self, identifier: &str) -> Option<&TypeDecl>;

    /// All declared type identifiers, in declaration order
    fn type_identifiers(&self) -> Vec<&str>;

    /// Whether an identifier resolves to a declaration in this catalog
    fn is_in_scope(&self, identifier: &str) -> bool {
        self.type_decl(identifier).is_some()
    }

    /// Whether a constructor body of `identifier` assigns a fresh object to
    /// the named member
    fn constructor_initializes(&self, identifier: &str, member_name: &str) -> bool {
        self.type_decl(identifier)
            .map(|t| t.constructor_initialized.iter().any(|m| m == member_name))
            .unwrap_or(false)
    }

    /// Ordered members of a type; empty for unknown identifiers
    fn list_members(&self, identifier: &str) -> &[MemberDecl] {
        self.type_decl(identifier)
            .map(|t| t.members.as_slice())
            .unwrap_or(&[])
    }

    /// The declared base type of a type, if any
    fn base_type(&self, identifier: &str) -> Option<&str> {
        self.type_decl(identifier).and_then(|t| t.base_type.as_deref())
    }

    /// The declared interfaces of a type
    fn interfaces(&self, identifier: &str) -> &[String] {
        self.type_decl(identifier)
            .map(|t| t.interfaces.as_slice())
            .unwrap_or(&[])
    }
}

/// A complete catalog held in memory, loadable from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    types: Vec<TypeDecl>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, decl: TypeDecl) {
        self.types.push(decl);
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.add_type(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a catalog from its JSON form, rejecting duplicate identifiers
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| GeneratorError::catalog_error(e.to_string()))?;
        let mut seen = std::collections::HashSet::new();
        for decl in &catalog.types {
            if !seen.insert(decl.identifier.as_str()) {
                return Err(GeneratorError::catalog_error(format!(
                    "duplicate type declaration: {}",
                    decl.identifier
                )));
            }
        }
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, GeneratorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GeneratorError::catalog_error(e.to_string()))
    }
}

impl TypeCatalog for InMemoryCatalog {
    fn type_decl(&self, identifier: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.identifier == identifier)
    }

    fn type_identifiers(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.identifier.as_str()).collect()
    }
}
