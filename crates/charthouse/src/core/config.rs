//! Generator configuration
//!
//! All knobs that influence classification and rendering live here as
//! immutable startup data: the named toggles, the primitive/collection/noise
//! type enumerations, the symbol precedence table, literal escape rules, and
//! the member visibility filter. Projects extend the lists instead of
//! touching classification logic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::catalog::Accessibility;
use super::types::AssociationOverride;

/// Symbol precedence, strongest first.
///
/// When two relationship candidates collide on the same identity key, the
/// one whose symbol ranks earlier in this table wins. Symbols not listed
/// (custom override arrows) rank after every listed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceTable {
    order: Vec<String>,
}

impl PrecedenceTable {
    pub fn new(order: Vec<String>) -> Self {
        Self { order }
    }

    /// The rank of a symbol; lower is stronger. Unknown symbols rank last.
    pub fn rank(&self, symbol: &str) -> usize {
        self.order
            .iter()
            .position(|s| s == symbol)
            .unwrap_or(self.order.len())
    }

    pub fn symbols(&self) -> &[String] {
        &self.order
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self::new(
            [
                "<|--",
                "<|..",
                "*--",
                "o--",
                "+--",
                "-->",
                "--",
                "..>",
                ".[#green,thickness=3].>",
                ".[#blue,thickness=3].>",
                ".[#green].>",
                ".[#blue].>",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }
}

/// Which member accessibilities are rendered and scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFilter {
    allowed: BTreeSet<Accessibility>,
}

impl VisibilityFilter {
    /// Allow every accessibility
    pub fn all() -> Self {
        Self {
            allowed: [
                Accessibility::Public,
                Accessibility::Protected,
                Accessibility::Internal,
                Accessibility::ProtectedInternal,
                Accessibility::PrivateProtected,
                Accessibility::Private,
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Allow only public members
    pub fn public_only() -> Self {
        Self::new([Accessibility::Public])
    }

    pub fn new(allowed: impl IntoIterator<Item = Accessibility>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, accessibility: Accessibility) -> bool {
        self.allowed.contains(&accessibility)
    }
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration for the diagram generator
///
/// Every option is independently toggleable; `Default` matches the
/// conventional behavior (property associations on, collection unwrapping
/// on, method parameter associations off).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Emit dependency edges for ordinary method parameters
    pub show_method_parameter_associations: bool,
    /// Emit composition/aggregation edges for non-collection fields and
    /// properties (when off, members still render but produce no edges)
    pub create_association_for_non_collection_properties: bool,
    /// Unwrap known collection containers to their element type; when off,
    /// the container itself becomes a node and is queued for separate
    /// rendering
    pub remove_system_collections_associations: bool,
    /// Drop inheritance/realization edges whose base identifier appears in
    /// the framework-noise or collection lists
    pub exclude_framework_base_types: bool,
    /// Per-referenced-type association overrides, applied when no explicit
    /// member-level override is present
    pub association_overrides: BTreeMap<String, AssociationOverride>,
    /// Which member accessibilities are scanned and rendered
    pub member_visibility_filter: VisibilityFilter,
    /// Raw token → escaped token, applied to literal initializer text
    pub literal_escape_rules: Vec<(String, String)>,
    /// Primitive/base type names (first letter capitalized); references to
    /// these never produce edges
    pub base_types: BTreeSet<String>,
    /// Known generic collection containers
    pub collection_types: BTreeSet<String>,
    /// Framework noise types; parameters of these types never produce
    /// dependency edges
    pub ignored_types: BTreeSet<String>,
    /// Symbol precedence used for store conflict resolution
    pub precedence: PrecedenceTable,
    /// Indentation for member lines inside a type block
    pub indent: String,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method_parameter_associations(mut self, on: bool) -> Self {
        self.show_method_parameter_associations = on;
        self
    }

    pub fn with_property_associations(mut self, on: bool) -> Self {
        self.create_association_for_non_collection_properties = on;
        self
    }

    pub fn with_collection_unwrapping(mut self, on: bool) -> Self {
        self.remove_system_collections_associations = on;
        self
    }

    pub fn with_framework_base_exclusion(mut self, on: bool) -> Self {
        self.exclude_framework_base_types = on;
        self
    }

    pub fn with_visibility_filter(mut self, filter: VisibilityFilter) -> Self {
        self.member_visibility_filter = filter;
        self
    }

    pub fn with_override(
        mut self,
        type_identifier: impl Into<String>,
        override_: AssociationOverride,
    ) -> Self {
        self.association_overrides
            .insert(type_identifier.into(), override_);
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Whether a simple type name is a primitive/base type.
    ///
    /// Matching capitalizes the first letter and strips a trailing `?`, so
    /// `string`, `String` and `string?` all hit the `String` entry.
    pub fn is_base_type(&self, simple_name: &str) -> bool {
        self.base_types
            .contains(&normalize_base_type_name(simple_name))
    }

    /// Whether a simple type name is a known collection container
    pub fn is_collection_type(&self, simple_name: &str) -> bool {
        self.collection_types.contains(simple_name)
    }

    /// Whether a simple type name is on the framework-noise ignore list
    pub fn is_ignored_type(&self, simple_name: &str) -> bool {
        self.ignored_types.contains(simple_name)
    }

    /// The configured override for a referenced type, if any
    pub fn override_for(&self, type_identifier: &str) -> Option<&AssociationOverride> {
        self.association_overrides.get(type_identifier)
    }

    /// Apply the literal escape rules to initializer text
    pub fn escape_literal(&self, raw: &str) -> String {
        self.literal_escape_rules
            .iter()
            .fold(raw.to_string(), |text, (from, to)| text.replace(from, to))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            show_method_parameter_associations: false,
            create_association_for_non_collection_properties: true,
            remove_system_collections_associations: true,
            exclude_framework_base_types: false,
            association_overrides: BTreeMap::new(),
            member_visibility_filter: VisibilityFilter::all(),
            literal_escape_rules: default_literal_escape_rules(),
            base_types: default_base_types(),
            collection_types: default_collection_types(),
            ignored_types: default_ignored_types(),
            precedence: PrecedenceTable::default(),
            indent: "    ".to_string(),
        }
    }
}

/// Capitalize the first letter and strip a trailing `?`
fn normalize_base_type_name(name: &str) -> String {
    let name = name.strip_suffix('?').unwrap_or(name);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn default_literal_escape_rules() -> Vec<(String, String)> {
    vec![
        ("\"".to_string(), "&quot;".to_string()),
        ("\r".to_string(), String::new()),
        ("\n".to_string(), "\\n".to_string()),
    ]
}

fn default_base_types() -> BTreeSet<String> {
    [
        "Bool", "Boolean", "Byte", "Char", "Decimal", "Double", "Dynamic", "Float", "Int",
        "Long", "Nint", "Nuint", "Object", "Sbyte", "Short", "Single", "String", "Uint",
        "Ulong", "Ushort", "Var", "Void",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_collection_types() -> BTreeSet<String> {
    [
        "ArrayList",
        "BitArray",
        "CaseInsensitiveComparer",
        "CollectionBase",
        "Comparer",
        "Dictionary",
        "DictionaryBase",
        "DictionaryEntry",
        "Func",
        "HashSet",
        "Hashtable",
        "ICollection",
        "IComparer",
        "IDictionary",
        "IDictionaryEnumerator",
        "IEnumerable",
        "IEnumerator",
        "IEqualityComparer",
        "IImmutableSet",
        "IList",
        "ILogger",
        "IOptions",
        "IReadOnlyCollection",
        "IReadOnlyDictionary",
        "IReadOnlyList",
        "ISet",
        "IStructuralComparable",
        "IStructuralEquatable",
        "Lazy",
        "List",
        "Logger",
        "Queue",
        "ReadOnlyCollectionBase",
        "SortedList",
        "Stack",
        "StructuralComparisons",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_ignored_types() -> BTreeSet<String> {
    [
        "Action",
        "Controller",
        "Encoding",
        "Exception",
        "HttpClient",
        "IAsyncDisposable",
        "IDisposable",
        "Regex",
        "XmlSchemaSet",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
