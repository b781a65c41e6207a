//! Declared-type text parsing using chumsky
//!
//! Turns raw type text (`List<LineItem>`, `Customer?`, `LineItem[]`) into
//! structured [`TypeExpr`]/[`TypeRef`] values. All generic-argument
//! handling in the generator goes through this grammar; nothing splits on
//! `<`/`>` by hand. Text the grammar rejects (tuples, parenthesized types,
//! dangling brackets) simply yields an error, which classification treats
//! as "skip, never guess".

use chumsky::prelude::*;
use chumsky::text::ident;

use super::error::GeneratorError;
use super::types::{TypeExpr, TypeRef};

/// Array/nullable suffixes applied left-to-right after a named type
#[derive(Debug, Clone, Copy)]
enum Suffix {
    Array,
    Nullable,
}

/// Parse inline whitespace (spaces and tabs)
fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().ignored()
}

/// A (possibly generic, possibly dotted) named type reference
fn named_parser<'src>() -> impl Parser<'src, &'src str, TypeRef> {
    recursive(|named| {
        let dotted = ident()
            .separated_by(just('.'))
            .at_least(1)
            .collect::<Vec<&str>>()
            .map(|segments| segments.join("."));

        let arguments = named
            .padded_by(inline_whitespace())
            .separated_by(just(','))
            .at_least(1)
            .collect::<Vec<TypeRef>>()
            .delimited_by(just('<'), just('>'));

        dotted
            .then(arguments.or_not())
            .map(|(identifier, arguments)| TypeRef {
                identifier,
                generic_arguments: arguments.unwrap_or_default(),
            })
    })
}

fn type_expr_parser<'src>() -> impl Parser<'src, &'src str, TypeExpr> {
    let suffix = choice((just("[]").to(Suffix::Array), just('?').to(Suffix::Nullable)));

    named_parser()
        .then(suffix.repeated().collect::<Vec<Suffix>>())
        .map(|(base, suffixes)| {
            suffixes
                .into_iter()
                .fold(TypeExpr::Named(base), |expr, suffix| match suffix {
                    Suffix::Array => TypeExpr::Array(Box::new(expr)),
                    Suffix::Nullable => TypeExpr::Nullable(Box::new(expr)),
                })
        })
        .padded()
        .then_ignore(end())
}

/// Parse declared-type text into a structured expression
pub fn parse_type_text(input: &str) -> Result<TypeExpr, GeneratorError> {
    type_expr_parser()
        .parse(input)
        .into_result()
        .map_err(|_| GeneratorError::malformed_type_text(input))
}

/// Parse text that must denote a plain named type (base types, interfaces)
pub fn parse_type_ref(input: &str) -> Result<TypeRef, GeneratorError> {
    match parse_type_text(input)? {
        TypeExpr::Named(r) => Ok(r),
        _ => Err(GeneratorError::malformed_type_text(input)),
    }
}
