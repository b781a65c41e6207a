//! Build orchestration
//!
//! Wires the pipeline together per type: member scan → classification →
//! store → renderer. Every `build` call starts from fresh state and
//! returns a complete result; nothing is shared between calls except the
//! read-only catalog, so independent builds can run on independent
//! threads. The batch driver follows include and additional-type sets
//! across the catalog and isolates per-type failures.

use std::collections::BTreeSet;

use tracing::{debug, info, span, warn, Level};

use crate::core::{GeneratorConfig, GeneratorError, TypeCatalog, TypeRef};

use super::classify::RelationshipClassifier;
use super::members::MemberClassifier;
use super::renderer::DiagramRenderer;
use super::store::RelationshipStore;

/// The rendered result for one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDiagram {
    pub identifier: String,
    pub text: String,
    /// In-scope types this diagram references
    pub includes: BTreeSet<String>,
    /// Containers kept as their own nodes, to render separately
    pub additional_types: BTreeSet<TypeRef>,
}

/// Per-type build entry point and batch driver
pub struct DiagramBuilder<'a, C: TypeCatalog + ?Sized> {
    catalog: &'a C,
    config: &'a GeneratorConfig,
}

impl<'a, C: TypeCatalog + ?Sized> DiagramBuilder<'a, C> {
    pub fn new(catalog: &'a C, config: &'a GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    /// Build the diagram block for one type.
    ///
    /// All per-type state (scan results, store, include sets) is created
    /// here and discarded on return. Per-member problems degrade to
    /// missing observations or omitted edges; only an unknown identifier
    /// fails the call.
    pub fn build(&self, identifier: &str) -> Result<TypeDiagram, GeneratorError> {
        let build_span = span!(Level::INFO, "build_type", identifier);
        let _enter = build_span.enter();

        let decl = self
            .catalog
            .type_decl(identifier)
            .ok_or_else(|| GeneratorError::unknown_type(identifier))?;

        let scan = MemberClassifier::new(self.config).scan(decl);
        let classifier = RelationshipClassifier::new(self.config, self.catalog);
        let mut store = RelationshipStore::with_precedence(self.config.precedence.clone());
        let mut includes = BTreeSet::new();
        let mut additional_types = BTreeSet::new();

        for observation in &scan.observations {
            let classification = classifier.classify(observation);
            if let Some(relationship) = classification.relationship {
                self.include_if_in_scope(&mut includes, &relationship.leaf);
                store.add(relationship);
            }
            if let Some(container) = classification.additional_type {
                additional_types.insert(container);
            }
        }

        for relationship in classifier.inheritance(decl) {
            self.include_if_in_scope(&mut includes, &relationship.root);
            store.add(relationship);
        }
        for relationship in classifier.nesting(decl) {
            self.include_if_in_scope(&mut includes, &relationship.leaf);
            store.add(relationship);
        }

        debug!(
            relationships = store.len(),
            includes = includes.len(),
            "Classified type"
        );

        let text =
            DiagramRenderer::new(self.config).render(decl, &scan.declarations, &store, &includes);

        Ok(TypeDiagram {
            identifier: decl.identifier.clone(),
            text,
            includes,
            additional_types,
        })
    }

    /// Build many types, isolating failures: a failing type is logged and
    /// skipped, the rest still render.
    pub fn build_many<'i>(&self, identifiers: impl IntoIterator<Item = &'i str>) -> Vec<TypeDiagram> {
        let mut diagrams = Vec::new();
        for identifier in identifiers {
            match self.build(identifier) {
                Ok(diagram) => diagrams.push(diagram),
                Err(error) => {
                    warn!(identifier, %error, "Skipping type that failed to build");
                }
            }
        }
        diagrams
    }

    /// Build the transitive closure: the requested roots, every in-scope
    /// type they reference (recursively), and one stub block per kept
    /// container.
    pub fn build_closure<'i>(&self, roots: impl IntoIterator<Item = &'i str>) -> Vec<TypeDiagram> {
        let closure_span = span!(Level::INFO, "build_closure");
        let _enter = closure_span.enter();

        let mut pending: Vec<String> = roots.into_iter().map(String::from).collect();
        let mut visited: BTreeSet<String> = pending.iter().cloned().collect();
        let mut diagrams = Vec::new();
        let mut containers: BTreeSet<TypeRef> = BTreeSet::new();

        while let Some(identifier) = pending.pop() {
            let diagram = match self.build(&identifier) {
                Ok(diagram) => diagram,
                Err(error) => {
                    warn!(identifier, %error, "Skipping type that failed to build");
                    continue;
                }
            };
            for include in &diagram.includes {
                if visited.insert(include.clone()) {
                    pending.push(include.clone());
                }
            }
            containers.extend(diagram.additional_types.iter().cloned());
            diagrams.push(diagram);
        }

        // Deterministic output order regardless of traversal
        diagrams.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let renderer = DiagramRenderer::new(self.config);
        for container in containers {
            diagrams.push(TypeDiagram {
                identifier: container.identifier.clone(),
                text: renderer.render_container(&container),
                includes: BTreeSet::new(),
                additional_types: BTreeSet::new(),
            });
        }

        info!(diagrams = diagrams.len(), "Built diagram closure");
        diagrams
    }

    fn include_if_in_scope(&self, includes: &mut BTreeSet<String>, endpoint: &TypeRef) {
        if self.catalog.is_in_scope(&endpoint.identifier) {
            includes.insert(endpoint.identifier.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InMemoryCatalog, MemberDecl, TypeDecl};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_type(
                TypeDecl::class("Order")
                    .with_base("Entity")
                    .with_member(MemberDecl::field("customer", "Customer").with_initializer()),
            )
            .with_type(TypeDecl::class("Entity"))
            .with_type(TypeDecl::class("Customer"))
    }

    #[test]
    fn test_build_unknown_type_fails() {
        let catalog = catalog();
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);
        assert!(matches!(
            builder.build("Ghost"),
            Err(GeneratorError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_build_collects_includes() {
        let catalog = catalog();
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);
        let diagram = builder.build("Order").unwrap();
        assert_eq!(
            diagram.includes,
            ["Customer".to_string(), "Entity".to_string()].into()
        );
        assert!(diagram.text.contains("!include Customer.puml"));
        assert!(diagram.text.contains("!include Entity.puml"));
    }

    #[test]
    fn test_build_many_isolates_failures() {
        let catalog = catalog();
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);
        let diagrams = builder.build_many(["Order", "Ghost", "Customer"]);
        let names: Vec<&str> = diagrams.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["Order", "Customer"]);
    }

    #[test]
    fn test_build_closure_follows_references() {
        let catalog = catalog();
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);
        let diagrams = builder.build_closure(["Order"]);
        let names: Vec<&str> = diagrams.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Entity", "Order"]);
    }

    #[test]
    fn test_build_closure_renders_kept_containers() {
        let catalog = InMemoryCatalog::new()
            .with_type(
                TypeDecl::class("Order")
                    .with_member(MemberDecl::field("lines", "List<LineItem>")),
            )
            .with_type(TypeDecl::class("LineItem"));
        let config = GeneratorConfig::default().with_collection_unwrapping(false);
        let builder = DiagramBuilder::new(&catalog, &config);

        let diagrams = builder.build_closure(["Order"]);
        let names: Vec<&str> = diagrams.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["Order", "List"]);
        assert!(diagrams[1].text.contains("class List<LineItem>"));
    }

    #[test]
    fn test_build_twice_is_byte_identical() {
        let catalog = catalog();
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);
        assert_eq!(
            builder.build("Order").unwrap().text,
            builder.build("Order").unwrap().text
        );
    }
}
