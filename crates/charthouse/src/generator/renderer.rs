//! Diagram text rendering
//!
//! Assembles one type's block: start marker, include directives, the type
//! declaration with its indented member lines, the resolved relationship
//! lines, and the end marker. Rendering is a pure function of its inputs;
//! identical state yields byte-identical text.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::core::{GeneratorConfig, TypeDecl, TypeRef};

use super::store::RelationshipStore;

/// Renders a type's diagram block
pub struct DiagramRenderer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> DiagramRenderer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Render the full block for one type
    pub fn render(
        &self,
        decl: &TypeDecl,
        declarations: &[String],
        store: &RelationshipStore,
        includes: &BTreeSet<String>,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@startuml {}", decl.identifier);

        for include in includes {
            if include != &decl.identifier {
                let _ = writeln!(out, "!include {}.puml", include);
            }
        }

        let _ = writeln!(out, "{} {{", self.header(decl));
        for line in declarations {
            let _ = writeln!(out, "{}{}", self.config.indent, line);
        }
        let _ = writeln!(out, "}}");

        for relationship in store.iter_sorted() {
            let _ = writeln!(out, "{}", relationship);
        }

        out.push_str("@enduml");
        out
    }

    /// A stub block for a container kept as its own node
    pub fn render_container(&self, container: &TypeRef) -> String {
        format!(
            "@startuml {}\nclass {} {{\n}}\n@enduml",
            container.identifier, container
        )
    }

    /// `{keyword} {Name}{<T, U>}[ <<record>>][ <<sealed>>...]`
    fn header(&self, decl: &TypeDecl) -> String {
        let mut header = format!("{} {}", decl.kind.keyword(), decl.identifier);
        if !decl.generic_parameters.is_empty() {
            let _ = write!(header, "<{}>", decl.generic_parameters.join(", "));
        }
        if let Some(annotation) = decl.kind.annotation() {
            let _ = write!(header, " {}", annotation);
        }
        for modifier in &decl.modifiers {
            let _ = write!(header, " <<{}>>", modifier);
        }
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Relationship, RelationshipKind, TypeKind};

    fn render(
        decl: &TypeDecl,
        declarations: &[String],
        store: &RelationshipStore,
        includes: &BTreeSet<String>,
    ) -> String {
        let config = GeneratorConfig::default();
        DiagramRenderer::new(&config).render(decl, declarations, store, includes)
    }

    #[test]
    fn test_minimal_block() {
        let decl = TypeDecl::class("Order");
        let text = render(&decl, &[], &RelationshipStore::new(), &BTreeSet::new());
        assert_eq!(text, "@startuml Order\nclass Order {\n}\n@enduml");
    }

    #[test]
    fn test_block_with_members_includes_and_edges() {
        let decl = TypeDecl::class("Order");
        let mut store = RelationshipStore::new();
        store.add(Relationship::new(
            TypeRef::new("Entity"),
            TypeRef::new("Order"),
            RelationshipKind::Inheritance,
        ));
        let includes: BTreeSet<String> = ["Entity".to_string(), "Order".to_string()].into();
        let text = render(
            &decl,
            &["+total : decimal".to_string()],
            &store,
            &includes,
        );
        assert_eq!(
            text,
            "@startuml Order\n\
             !include Entity.puml\n\
             class Order {\n\
             \x20   +total : decimal\n\
             }\n\
             Entity <|-- Order\n\
             @enduml"
        );
    }

    #[test]
    fn test_header_shapes() {
        let config = GeneratorConfig::default();
        let renderer = DiagramRenderer::new(&config);

        let decl = TypeDecl::new("Repository", TypeKind::Interface)
            .with_generic_parameter("T")
            .with_generic_parameter("TKey");
        assert_eq!(renderer.header(&decl), "interface Repository<T, TKey>");

        let decl = TypeDecl::record("Money").with_modifier("sealed");
        assert_eq!(renderer.header(&decl), "class Money <<record>> <<sealed>>");

        let decl = TypeDecl::abstract_class("Entity");
        assert_eq!(renderer.header(&decl), "abstract class Entity");
    }

    #[test]
    fn test_render_is_idempotent() {
        let decl = TypeDecl::class("Order");
        let mut store = RelationshipStore::new();
        store.add(Relationship::new(
            TypeRef::new("Order"),
            TypeRef::new("Customer"),
            RelationshipKind::Aggregation,
        ));
        let includes: BTreeSet<String> = ["Customer".to_string()].into();
        let declarations = vec!["+customer : Customer".to_string()];

        let first = render(&decl, &declarations, &store, &includes);
        let second = render(&decl, &declarations, &store, &includes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_container_stub() {
        let config = GeneratorConfig::default();
        let renderer = DiagramRenderer::new(&config);
        let container = TypeRef::generic("List", vec![TypeRef::new("LineItem")]);
        assert_eq!(
            renderer.render_container(&container),
            "@startuml List\nclass List<LineItem> {\n}\n@enduml"
        );
    }
}
