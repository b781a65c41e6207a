//! Charthouse - Generate PlantUML class diagrams from a type catalog
//!
//! A library that turns a closed set of type declarations (classes,
//! interfaces, structs, records, enums) into PlantUML class-diagram text:
//! one block per type plus typed, labeled relationship edges (inheritance,
//! realization, nesting, composition, aggregation, association,
//! dependency).
//!
//! # Quick Start
//!
//! ```rust
//! use charthouse::generate;
//! use charthouse::{InMemoryCatalog, MemberDecl, TypeDecl};
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_type(
//!         TypeDecl::class("Order")
//!             .with_base("Entity")
//!             .with_member(MemberDecl::field("lines", "List<LineItem>")),
//!     )
//!     .with_type(TypeDecl::class("Entity"))
//!     .with_type(TypeDecl::class("LineItem"));
//!
//! let uml = generate(&catalog, "Order").unwrap();
//! assert!(uml.contains("Entity <|-- Order"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use charthouse::prelude::*;
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_type(TypeDecl::class("Order"))
//!     .with_type(TypeDecl::class("Customer"));
//!
//! let config = GeneratorConfig::default().with_method_parameter_associations(true);
//! let builder = DiagramBuilder::new(&catalog, &config);
//!
//! // One block per type, references followed transitively
//! let diagrams = builder.build_closure(["Order"]);
//! for diagram in diagrams {
//!     println!("{}", diagram.text);
//! }
//! ```

pub mod core;
pub mod generator;

pub use crate::core::*;
pub use crate::generator::{DiagramBuilder, TypeDiagram};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AssociationOverride, GeneratorConfig, InMemoryCatalog, MemberDecl, ParameterDecl,
        PrecedenceTable, TypeCatalog, TypeDecl, TypeRef, VisibilityFilter,
    };
    pub use crate::generator::{
        DiagramBuilder, DiagramRenderer, MemberClassifier, RelationshipClassifier,
        RelationshipStore, TypeDiagram,
    };
}

/// Generate the diagram block for one type using default configuration
///
/// This is the simplest way to render a single type. Use
/// [`DiagramBuilder`] directly for custom configuration or batch
/// generation.
///
/// # Arguments
/// * `catalog` - the type catalog to read declarations from
/// * `identifier` - the type to render
///
/// # Returns
/// * `Ok(String)` - the diagram text block
/// * `Err` - if the identifier is unknown to the catalog
pub fn generate<C: TypeCatalog>(catalog: &C, identifier: &str) -> anyhow::Result<String> {
    let config = GeneratorConfig::default();
    let diagram = DiagramBuilder::new(catalog, &config).build(identifier)?;
    Ok(diagram.text)
}
