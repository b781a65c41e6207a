//! Relationship classification
//!
//! Maps usage observations (plus declared base types, interfaces, and
//! nested types) to relationship candidates. The decision table runs in a
//! fixed order: attribute override, primitive filter, array unwrap,
//! collection unwrap, named-type heuristics, parameter bindings.
//! Anything unresolvable or malformed is skipped, never guessed.

use tracing::{debug, trace};

use crate::core::typetext::parse_type_ref;
use crate::core::{
    AssociationOverride, DependencySource, GeneratorConfig, Multiplicity, ParameterBinding,
    Relationship, RelationshipKind, TypeCatalog, TypeDecl, TypeExpr, TypeRef, UsageObservation,
};

/// Base types every declaration implicitly roots in; these never produce
/// inheritance edges
const UNIVERSAL_BASE_TYPES: &[&str] = &["Object", "object", "Enum", "ValueType"];

/// The outcome of classifying one observation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub relationship: Option<Relationship>,
    /// A container kept as its own node (collection unwrapping disabled),
    /// queued for separate rendering
    pub additional_type: Option<TypeRef>,
}

impl Classification {
    fn none() -> Self {
        Self::default()
    }

    fn edge(relationship: Relationship) -> Self {
        Self {
            relationship: Some(relationship),
            additional_type: None,
        }
    }
}

/// Applies the classification decision table to observations
pub struct RelationshipClassifier<'a, C: TypeCatalog + ?Sized> {
    config: &'a GeneratorConfig,
    catalog: &'a C,
}

impl<'a, C: TypeCatalog + ?Sized> RelationshipClassifier<'a, C> {
    pub fn new(config: &'a GeneratorConfig, catalog: &'a C) -> Self {
        Self { config, catalog }
    }

    /// Classify one observation into at most one relationship candidate
    pub fn classify(&self, obs: &UsageObservation) -> Classification {
        if let Some(override_) = self.resolve_override(obs) {
            return self.override_edge(obs, &override_);
        }

        let expr = obs.referenced.strip_nullable();
        match obs.binding {
            Some(binding) => self.classify_parameter(obs, expr, binding),
            None => self.classify_stored_member(obs, expr),
        }
    }

    /// An explicit member-level override wins; otherwise a configured
    /// per-type override applies. Overrides bypass every heuristic.
    fn resolve_override(&self, obs: &UsageObservation) -> Option<AssociationOverride> {
        if let Some(override_) = &obs.attribute_override {
            return Some(override_.clone());
        }
        let root = obs.referenced.named_root();
        self.config
            .override_for(&root.identifier)
            .or_else(|| self.config.override_for(root.simple_name()))
            .cloned()
    }

    fn override_edge(&self, obs: &UsageObservation, override_: &AssociationOverride) -> Classification {
        let leaf = match &override_.name {
            Some(name) => TypeRef::new(name.clone()),
            None => obs.referenced.strip_nullable().named_root().clone(),
        };
        trace!(member = %obs.member_name, leaf = %leaf.identifier, "Applying association override");
        Classification::edge(
            Relationship::with_symbol(obs.owner.clone(), leaf, override_.symbol_or_default())
                .with_root_label(override_.root_label.clone())
                .with_leaf_label(override_.leaf_label.clone())
                .with_center_label(override_.center_label.clone()),
        )
    }

    /// Rules 2-5: fields and properties
    fn classify_stored_member(&self, obs: &UsageObservation, expr: &TypeExpr) -> Classification {
        match expr {
            TypeExpr::Named(r) if self.config.is_base_type(r.simple_name()) => {
                Classification::none()
            }
            TypeExpr::Array(inner) => {
                let elem = inner.strip_nullable();
                let Some(r) = elem.as_named() else {
                    return Classification::none();
                };
                if self.config.is_base_type(r.simple_name()) {
                    return Classification::none();
                }
                self.aggregation_edge(obs, r.clone(), Multiplicity::Many)
            }
            TypeExpr::Named(r)
                if r.is_generic() && self.config.is_collection_type(r.simple_name()) =>
            {
                self.classify_collection_member(obs, r)
            }
            TypeExpr::Named(r) => {
                if !self.config.create_association_for_non_collection_properties {
                    return Classification::none();
                }
                self.stored_edge(obs, r.clone(), Multiplicity::Single)
            }
            TypeExpr::Nullable(_) => Classification::none(),
        }
    }

    /// Rule 4: known generic collection containers
    fn classify_collection_member(&self, obs: &UsageObservation, container: &TypeRef) -> Classification {
        if self.config.remove_system_collections_associations {
            let Some(elem) = single_simple_argument(container) else {
                debug!(
                    member = %obs.member_name,
                    container = %container,
                    "Skipping collection with unusable generic arguments"
                );
                return Classification::none();
            };
            if self.config.is_base_type(elem.simple_name()) {
                return Classification::none();
            }
            self.aggregation_edge(obs, elem.clone(), Multiplicity::Many)
        } else {
            // The raw container becomes a node of its own
            let relationship =
                Relationship::new(obs.owner.clone(), container.clone(), RelationshipKind::Aggregation)
                    .with_leaf_label(container.argument_text())
                    .with_center_label(obs.member_name.clone());
            Classification {
                relationship: Some(relationship),
                additional_type: Some(container.clone()),
            }
        }
    }

    /// Rule 6: method and constructor parameters
    fn classify_parameter(
        &self,
        obs: &UsageObservation,
        expr: &TypeExpr,
        binding: ParameterBinding,
    ) -> Classification {
        if binding.source == DependencySource::Method
            && !self.config.show_method_parameter_associations
        {
            return Classification::none();
        }
        let root = expr.named_root();
        if self.config.is_base_type(root.simple_name()) {
            return Classification::none();
        }
        if self.config.is_ignored_type(root.simple_name()) {
            trace!(parameter = %obs.member_name, leaf = %root.identifier, "Skipping ignore-listed parameter type");
            return Classification::none();
        }

        let leaf = match expr {
            TypeExpr::Array(inner) => match inner.strip_nullable().as_named() {
                Some(r) => r.clone(),
                None => return Classification::none(),
            },
            TypeExpr::Named(r)
                if r.is_generic() && self.config.is_collection_type(r.simple_name()) =>
            {
                match single_simple_argument(r) {
                    Some(elem) => elem.clone(),
                    None => {
                        debug!(
                            parameter = %obs.member_name,
                            container = %r,
                            "Skipping parameter collection with unusable generic arguments"
                        );
                        return Classification::none();
                    }
                }
            }
            // A bare collection name with no arguments says nothing useful
            TypeExpr::Named(r) if self.config.is_collection_type(r.simple_name()) => {
                return Classification::none();
            }
            TypeExpr::Named(r) => r.clone(),
            TypeExpr::Nullable(_) => return Classification::none(),
        };

        if self.config.is_base_type(leaf.simple_name()) {
            return Classification::none();
        }
        if !self.emittable(obs, &leaf) {
            return Classification::none();
        }

        let kind = RelationshipKind::Dependency {
            source: binding.source,
            optional: binding.has_default,
        };
        Classification::edge(
            Relationship::new(obs.owner.clone(), leaf.clone(), kind)
                .with_leaf_label(leaf.argument_text()),
        )
    }

    /// Rule 5: composition when the member is inline-initialized or a
    /// constructor assigns it a fresh object; aggregation otherwise
    fn stored_edge(&self, obs: &UsageObservation, leaf: TypeRef, multiplicity: Multiplicity) -> Classification {
        if !self.emittable(obs, &leaf) {
            return Classification::none();
        }
        let composed = obs.initialized_inline
            || self
                .catalog
                .constructor_initializes(&obs.owner.identifier, &obs.member_name);
        let kind = if composed {
            RelationshipKind::Composition
        } else {
            RelationshipKind::Aggregation
        };
        Classification::edge(self.member_relationship(obs, leaf, multiplicity, kind))
    }

    /// Rules 3 and 4 (unwrap mode): elements of arrays and collections
    /// aggregate regardless of initializers
    fn aggregation_edge(&self, obs: &UsageObservation, leaf: TypeRef, multiplicity: Multiplicity) -> Classification {
        if !self.emittable(obs, &leaf) {
            return Classification::none();
        }
        Classification::edge(self.member_relationship(
            obs,
            leaf,
            multiplicity,
            RelationshipKind::Aggregation,
        ))
    }

    fn member_relationship(
        &self,
        obs: &UsageObservation,
        leaf: TypeRef,
        multiplicity: Multiplicity,
        kind: RelationshipKind,
    ) -> Relationship {
        let leaf_label = match multiplicity {
            Multiplicity::Many => "*".to_string(),
            Multiplicity::Single => leaf.argument_text(),
        };
        Relationship::new(obs.owner.clone(), leaf, kind)
            .with_leaf_label(leaf_label)
            .with_center_label(obs.member_name.clone())
    }

    /// Self-references are noise; unresolvable leaves are silently omitted
    fn emittable(&self, obs: &UsageObservation, leaf: &TypeRef) -> bool {
        if leaf.identifier == obs.owner.identifier {
            return false;
        }
        if !self.catalog.is_in_scope(&leaf.identifier) {
            trace!(
                member = %obs.member_name,
                leaf = %leaf.identifier,
                "Referenced type not in catalog, relationship omitted"
            );
            return false;
        }
        true
    }

    /// Rule 7: inheritance and realization edges from the declaration
    /// itself, independent of member scanning
    pub fn inheritance(&self, decl: &TypeDecl) -> Vec<Relationship> {
        let leaf = TypeRef::new(&decl.identifier);
        let mut edges = Vec::new();

        if let Some(base_text) = &decl.base_type {
            if let Some(base) = self.declared_base(base_text) {
                edges.push(
                    Relationship::new(base.clone(), leaf.clone(), RelationshipKind::Inheritance)
                        .with_root_label(base.argument_text()),
                );
            }
        }
        for interface_text in &decl.interfaces {
            if let Some(interface) = self.declared_base(interface_text) {
                edges.push(
                    Relationship::new(interface.clone(), leaf.clone(), RelationshipKind::Realization)
                        .with_root_label(interface.argument_text()),
                );
            }
        }
        edges
    }

    fn declared_base(&self, text: &str) -> Option<TypeRef> {
        let base = match parse_type_ref(text) {
            Ok(base) => base,
            Err(_) => {
                trace!(text, "Skipping unparsable base type text");
                return None;
            }
        };
        if UNIVERSAL_BASE_TYPES.contains(&base.simple_name()) {
            return None;
        }
        if self.config.exclude_framework_base_types
            && (self.config.is_ignored_type(base.simple_name())
                || self.config.is_collection_type(base.simple_name()))
        {
            trace!(base = %base.identifier, "Excluding framework base type");
            return None;
        }
        Some(base)
    }

    /// Rule 8: one nesting edge per lexically nested type
    pub fn nesting(&self, decl: &TypeDecl) -> Vec<Relationship> {
        let outer = TypeRef::new(&decl.identifier);
        decl.nested
            .iter()
            .map(|inner| {
                Relationship::new(outer.clone(), TypeRef::new(inner), RelationshipKind::Nesting)
            })
            .collect()
    }
}

/// The single generic argument of a container, if it is a plain named
/// type. Multi-argument containers and nested-generic arguments are
/// "malformed" for unwrapping purposes and yield `None`.
fn single_simple_argument(container: &TypeRef) -> Option<&TypeRef> {
    match container.generic_arguments.as_slice() {
        [arg] if !arg.is_generic() => Some(arg),
        _ => None,
    }
}
