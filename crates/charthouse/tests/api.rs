//! Integration tests for the public API

use charthouse::generate;
use charthouse::prelude::*;

fn shop_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_type(
            TypeDecl::class("Order")
                .with_base("Entity")
                .with_member(MemberDecl::field("customer", "Customer"))
                .with_member(MemberDecl::field("lines", "List<LineItem>")),
        )
        .with_type(TypeDecl::abstract_class("Entity"))
        .with_type(TypeDecl::class("Customer"))
        .with_type(TypeDecl::class("LineItem"))
}

#[test]
fn test_generate_simple_type() {
    let uml = generate(&shop_catalog(), "Customer").unwrap();
    assert_eq!(uml, "@startuml Customer\nclass Customer {\n}\n@enduml");
}

#[test]
fn test_generate_renders_members_and_edges() {
    let uml = generate(&shop_catalog(), "Order").unwrap();
    assert!(uml.contains("+customer : Customer"));
    assert!(uml.contains("+lines : List<LineItem>"));
    assert!(uml.contains("Entity <|-- Order"));
    assert!(uml.contains("Order o-- Customer : \"customer\""));
    assert!(uml.contains("Order o-- \"*\" LineItem : \"lines\""));
}

#[test]
fn test_generate_unknown_type_fails() {
    assert!(generate(&shop_catalog(), "Ghost").is_err());
}

#[test]
fn test_builder_with_custom_config() {
    let catalog = shop_catalog();
    let config = GeneratorConfig::default().with_property_associations(false);
    let builder = DiagramBuilder::new(&catalog, &config);
    let diagram = builder.build("Order").unwrap();

    // Members still render; only the non-collection edges disappear
    assert!(diagram.text.contains("+customer : Customer"));
    assert!(!diagram.text.contains("Order o-- Customer"));
    assert!(diagram.text.contains("Order o-- \"*\" LineItem"));
}

#[test]
fn test_visibility_filter_hides_members() {
    let catalog = InMemoryCatalog::new().with_type(
        TypeDecl::class("Order")
            .with_member(MemberDecl::field("visible", "int"))
            .with_member(
                MemberDecl::field("hidden", "int")
                    .with_accessibility(charthouse::Accessibility::Private),
            ),
    );
    let config = GeneratorConfig::default().with_visibility_filter(VisibilityFilter::public_only());
    let diagram = DiagramBuilder::new(&catalog, &config).build("Order").unwrap();
    assert!(diagram.text.contains("+visible : int"));
    assert!(!diagram.text.contains("hidden"));
}

#[test]
fn test_no_base_no_interfaces_yields_no_hierarchy_edges() {
    let uml = generate(&shop_catalog(), "Customer").unwrap();
    assert!(!uml.contains("<|--"));
    assert!(!uml.contains("<|.."));
}

#[test]
fn test_generate_is_idempotent() {
    let catalog = shop_catalog();
    let first = generate(&catalog, "Order").unwrap();
    let second = generate(&catalog, "Order").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_catalog_json_round_trips_through_generation() {
    let catalog = shop_catalog();
    let json = catalog.to_json_pretty().unwrap();
    let reloaded = InMemoryCatalog::from_json(&json).unwrap();
    assert_eq!(
        generate(&catalog, "Order").unwrap(),
        generate(&reloaded, "Order").unwrap()
    );
}
