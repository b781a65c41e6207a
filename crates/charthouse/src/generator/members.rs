//! Member scanning
//!
//! Walks one type's members and produces the two ordered outputs the rest
//! of the pipeline consumes: formatted declaration lines and raw usage
//! observations. Declaration text always renders from the raw declared
//! type; observations only exist for members whose type text parses.

use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use crate::core::typetext::parse_type_text;
use crate::core::{
    Accessibility, DependencySource, GeneratorConfig, MemberDecl, MemberKind, Multiplicity,
    ParameterBinding, TypeDecl, TypeKind, TypeRef, UsageObservation,
};

/// Parameter lists wider than this wrap onto continuation lines
const PARAMETER_WRAP_WIDTH: usize = 100;

/// The ordered result of scanning one type's members
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemberScan {
    pub declarations: Vec<String>,
    pub observations: Vec<UsageObservation>,
}

/// Walks members and emits declaration lines plus usage observations
pub struct MemberClassifier<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> MemberClassifier<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Scan every member of a type, in declaration order
    pub fn scan(&self, decl: &TypeDecl) -> MemberScan {
        let owner = TypeRef::new(&decl.identifier);
        let mut scan = MemberScan::default();

        for member in &decl.members {
            if member.ignored {
                trace!(member = %member.name, "Skipping ignored member");
                continue;
            }
            if !self
                .config
                .member_visibility_filter
                .allows(member.accessibility)
            {
                trace!(member = %member.name, "Skipping member filtered by visibility");
                continue;
            }

            match member.kind {
                MemberKind::Field => self.scan_field(decl, &owner, member, &mut scan),
                MemberKind::Property => self.scan_property(&owner, member, &mut scan),
                MemberKind::Method => {
                    self.scan_callable(&owner, member, DependencySource::Method, &mut scan)
                }
                MemberKind::Constructor => {
                    self.scan_callable(&owner, member, DependencySource::Constructor, &mut scan)
                }
                MemberKind::Event => scan.declarations.push(self.event_line(member)),
                MemberKind::EnumConstant => scan.declarations.push(enum_constant_line(member)),
            }
        }

        debug!(
            owner = %decl.identifier,
            declarations = scan.declarations.len(),
            observations = scan.observations.len(),
            "Scanned members"
        );
        scan
    }

    fn scan_field(
        &self,
        decl: &TypeDecl,
        owner: &TypeRef,
        member: &MemberDecl,
        scan: &mut MemberScan,
    ) {
        // Enum bodies list their constants as fields in some front-ends
        if decl.kind == TypeKind::Enum {
            scan.declarations.push(enum_constant_line(member));
            return;
        }
        scan.declarations.push(self.value_member_line(member, None));
        self.push_member_observation(owner, member, scan);
    }

    fn scan_property(&self, owner: &TypeRef, member: &MemberDecl, scan: &mut MemberScan) {
        let accessors = self.accessor_markers(member);
        scan.declarations
            .push(self.value_member_line(member, Some(&accessors)));
        self.push_member_observation(owner, member, scan);
    }

    /// A field/property line:
    /// `{marker}{modifiers}{name} : {type}[ {accessors}][ = {literal}]`
    fn value_member_line(&self, member: &MemberDecl, accessors: Option<&str>) -> String {
        let mut line = format!(
            "{}{}{} : {}",
            member.accessibility.marker(),
            modifier_text(member),
            member.name,
            member.declared_type
        );
        if let Some(accessors) = accessors {
            if !accessors.is_empty() {
                line.push(' ');
                line.push_str(accessors);
            }
        }
        if member.initializer_is_literal {
            if let Some(literal) = &member.literal_text {
                line.push_str(" = ");
                line.push_str(&self.config.escape_literal(literal));
            }
        }
        line
    }

    /// Accessor markers, with private accessors omitted. An accessor-less
    /// (expression-bodied) property reads as get-only.
    fn accessor_markers(&self, member: &MemberDecl) -> String {
        if member.accessors.is_empty() {
            return "<<get>>".to_string();
        }
        member
            .accessors
            .iter()
            .filter(|a| a.accessibility != Some(Accessibility::Private))
            .map(|a| match a.accessibility {
                Some(accessibility) => {
                    format!("<<{} {}>>", accessibility.keyword(), a.kind.keyword())
                }
                None => format!("<<{}>>", a.kind.keyword()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Methods and constructors: declaration line plus one observation per
    /// parameter. Return types never generate observations.
    fn scan_callable(
        &self,
        owner: &TypeRef,
        member: &MemberDecl,
        source: DependencySource,
        scan: &mut MemberScan,
    ) {
        let args: Vec<String> = member
            .parameters
            .iter()
            .map(|p| format!("{}:{}", p.name, p.declared_type))
            .collect();
        let mut arg_text = args.join(", ");
        if UnicodeWidthStr::width(arg_text.as_str()) > PARAMETER_WRAP_WIDTH {
            arg_text = args.join(",\\n");
        }

        let mut line = format!(
            "{}{}{}({})",
            member.accessibility.marker(),
            modifier_text(member),
            member.name,
            arg_text
        );
        if !member.declared_type.is_empty() {
            line.push_str(" : ");
            line.push_str(&member.declared_type);
        }
        scan.declarations.push(line);

        for parameter in &member.parameters {
            match parse_type_text(&parameter.declared_type) {
                Ok(referenced) => scan.observations.push(UsageObservation {
                    owner: owner.clone(),
                    member_name: parameter.name.clone(),
                    referenced,
                    multiplicity: Multiplicity::Single,
                    initialized_inline: false,
                    binding: Some(ParameterBinding {
                        source,
                        has_default: parameter.has_default,
                    }),
                    attribute_override: parameter.association_override.clone(),
                }),
                Err(_) => {
                    trace!(
                        parameter = %parameter.name,
                        text = %parameter.declared_type,
                        "Skipping parameter with unparsable type text"
                    );
                }
            }
        }
    }

    fn event_line(&self, member: &MemberDecl) -> String {
        format!(
            "{}{}<<event>> {} : {}",
            member.accessibility.marker(),
            modifier_text(member),
            member.name,
            member.declared_type
        )
    }

    /// Emit an observation for a stored member (field/property), nullable
    /// wrapping stripped. Unparsable type text degrades to "no observation"
    /// while the declaration line above still rendered the raw text.
    fn push_member_observation(&self, owner: &TypeRef, member: &MemberDecl, scan: &mut MemberScan) {
        let expr = match parse_type_text(&member.declared_type) {
            Ok(expr) => expr,
            Err(_) => {
                trace!(
                    member = %member.name,
                    text = %member.declared_type,
                    "Skipping member with unparsable type text"
                );
                return;
            }
        };
        scan.observations.push(UsageObservation {
            owner: owner.clone(),
            member_name: member.name.clone(),
            referenced: expr.strip_nullable().clone(),
            multiplicity: Multiplicity::Single,
            initialized_inline: member.has_initializer,
            binding: None,
            attribute_override: member.association_override.clone(),
        });
    }
}

fn modifier_text(member: &MemberDecl) -> String {
    member
        .modifiers
        .iter()
        .map(|m| format!("{{{}}} ", m))
        .collect()
}

fn enum_constant_line(member: &MemberDecl) -> String {
    match &member.constant_value {
        Some(value) => format!("{} = {}", member.name, value),
        None => member.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessorDecl, AssociationOverride, ParameterDecl, TypeExpr};

    fn scan_type(decl: TypeDecl) -> MemberScan {
        let config = GeneratorConfig::default();
        MemberClassifier::new(&config).scan(&decl)
    }

    #[test]
    fn test_field_declaration_line() {
        let scan = scan_type(
            TypeDecl::class("Order").with_member(
                MemberDecl::field("total", "decimal")
                    .with_accessibility(Accessibility::Private)
                    .with_modifier("static"),
            ),
        );
        assert_eq!(scan.declarations, vec!["-{static} total : decimal"]);
    }

    #[test]
    fn test_property_accessor_markers() {
        let scan = scan_type(
            TypeDecl::class("Order")
                .with_member(MemberDecl::property("Name", "string"))
                .with_member(
                    MemberDecl::property("Id", "int").with_accessors(vec![
                        AccessorDecl::get(),
                        AccessorDecl::set().with_accessibility(Accessibility::Private),
                    ]),
                )
                .with_member(MemberDecl::property("Age", "int").with_accessors(vec![
                    AccessorDecl::get(),
                    AccessorDecl::init().with_accessibility(Accessibility::Internal),
                ]))
                .with_member(MemberDecl::property("Label", "string").with_accessors(vec![])),
        );
        assert_eq!(
            scan.declarations,
            vec![
                "+Name : string <<get>> <<set>>",
                "+Id : int <<get>>",
                "+Age : int <<get>> <<internal init>>",
                "+Label : string <<get>>",
            ]
        );
    }

    #[test]
    fn test_literal_initializer_is_escaped() {
        let scan = scan_type(TypeDecl::class("Order").with_member(
            MemberDecl::field("note", "string").with_literal_initializer("\"none\""),
        ));
        assert_eq!(scan.declarations, vec!["+note : string = &quot;none&quot;"]);
        // The literal feeds rendering only, never classification
        assert!(scan.observations[0].initialized_inline);
    }

    #[test]
    fn test_method_line_and_observations() {
        let scan = scan_type(
            TypeDecl::class("Order").with_member(
                MemberDecl::method("Apply", "void")
                    .with_parameter(ParameterDecl::new("discount", "Discount"))
                    .with_parameter(ParameterDecl::new("note", "string").with_default()),
            ),
        );
        assert_eq!(
            scan.declarations,
            vec!["+Apply(discount:Discount, note:string) : void"]
        );
        assert_eq!(scan.observations.len(), 2);
        let binding = scan.observations[1].binding.unwrap();
        assert_eq!(binding.source, DependencySource::Method);
        assert!(binding.has_default);
    }

    #[test]
    fn test_long_parameter_list_wraps() {
        let params = (0..8).fold(MemberDecl::method("Configure", "void"), |m, i| {
            m.with_parameter(ParameterDecl::new(
                format!("parameter{}", i),
                "SomeRatherLongTypeName",
            ))
        });
        let scan = scan_type(TypeDecl::class("Order").with_member(params));
        assert!(scan.declarations[0].contains(",\\n"));
        assert!(!scan.declarations[0].contains(", "));
    }

    #[test]
    fn test_constructor_line_and_binding_source() {
        let scan = scan_type(TypeDecl::class("Order").with_member(
            MemberDecl::constructor("Order").with_parameter(ParameterDecl::new("c", "Customer")),
        ));
        assert_eq!(scan.declarations, vec!["+Order(c:Customer)"]);
        assert_eq!(
            scan.observations[0].binding.unwrap().source,
            DependencySource::Constructor
        );
    }

    #[test]
    fn test_ignored_and_filtered_members_are_skipped() {
        let config = GeneratorConfig::default()
            .with_visibility_filter(crate::core::VisibilityFilter::public_only());
        let decl = TypeDecl::class("Order")
            .with_member(MemberDecl::field("a", "int").ignored())
            .with_member(MemberDecl::field("b", "int").with_accessibility(Accessibility::Private))
            .with_member(MemberDecl::field("c", "int"));
        let scan = MemberClassifier::new(&config).scan(&decl);
        assert_eq!(scan.declarations, vec!["+c : int"]);
    }

    #[test]
    fn test_nullable_wrapper_stripped_from_observation() {
        let scan =
            scan_type(TypeDecl::class("Order").with_member(MemberDecl::field("c", "Customer?")));
        assert_eq!(scan.declarations, vec!["+c : Customer?"]);
        assert_eq!(
            scan.observations[0].referenced,
            TypeExpr::Named(TypeRef::new("Customer"))
        );
    }

    #[test]
    fn test_unparsable_type_still_renders_declaration() {
        let scan = scan_type(
            TypeDecl::class("Order").with_member(MemberDecl::field("pair", "(int, string)")),
        );
        assert_eq!(scan.declarations, vec!["+pair : (int, string)"]);
        assert!(scan.observations.is_empty());
    }

    #[test]
    fn test_event_and_enum_constant_lines() {
        let scan = scan_type(
            TypeDecl::class("Order")
                .with_member(MemberDecl::event("Shipped", "EventHandler")),
        );
        assert_eq!(scan.declarations, vec!["+<<event>> Shipped : EventHandler"]);

        let scan = scan_type(
            TypeDecl::enumeration("Status")
                .with_member(MemberDecl::enum_constant("Open"))
                .with_member(MemberDecl::enum_constant("Closed").with_constant_value("2")),
        );
        assert_eq!(scan.declarations, vec!["Open", "Closed = 2"]);
    }

    #[test]
    fn test_override_captured_on_observation() {
        let scan = scan_type(TypeDecl::class("Order").with_member(
            MemberDecl::field("c", "Customer")
                .with_override(AssociationOverride::new().with_symbol("o--")),
        ));
        assert!(scan.observations[0].attribute_override.is_some());
    }
}
