//! Query expression evaluation for in-memory document filtering.

use bson::{Bson, Document, datetime::DateTime};
use std::collections::HashMap;

use sycamore_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so that an `Int32` filter value matches
/// an `Int64` or `Double` stored value of the same magnitude.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Anything else (object ids, binary, ...) compared structurally.
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    pub fn matches(document: &'a Document, expr: Option<&Expr>) -> DocumentStoreResult<bool> {
        match expr {
            Some(expr) => DocumentEvaluator::new(document).evaluate(expr),
            None => Ok(true),
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(match self.document.get(field) {
            Some(field_value) => Comparable::from(field_value) == Comparable::from(value),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use sycamore_core::query::Filter;

    use super::*;

    fn matches(document: &Document, expr: &Expr) -> bool {
        DocumentEvaluator::new(document).evaluate(expr).unwrap()
    }

    #[test]
    fn equality_is_exact_on_strings() {
        let item = doc! { "name": "Fish & Chips", "category": "Food" };

        assert!(matches(&item, &Filter::eq("category", "Food")));
        assert!(!matches(&item, &Filter::eq("category", "food")));
        assert!(!matches(&item, &Filter::eq("category", "Drinks")));
    }

    #[test]
    fn numbers_compare_across_widths() {
        let booking = doc! { "guests": 4_i64, "price": 13.5 };

        assert!(matches(&booking, &Filter::eq("guests", 4_i32)));
        assert!(matches(&booking, &Filter::eq("price", 13.5)));
    }

    #[test]
    fn missing_fields_never_match() {
        let hours = doc! { "day": "Monday" };
        assert!(!matches(&hours, &Filter::eq("kitchen_close", "21:00")));
    }

    #[test]
    fn empty_conjunction_matches_everything() {
        let item = doc! { "title": "The Bar" };

        assert!(matches(&item, &Filter::and(Vec::new())));
        assert!(DocumentEvaluator::matches(&item, None).unwrap());
    }

    #[test]
    fn conjunction_requires_every_field() {
        let item = doc! { "category": "Food", "is_featured": false };

        assert!(matches(&item, &Filter::matching(doc! { "category": "Food", "is_featured": false })));
        assert!(!matches(&item, &Filter::matching(doc! { "category": "Food", "is_featured": true })));
    }

    #[test]
    fn arrays_compare_element_wise() {
        let event = doc! { "tags": ["quiz", "community"] };

        assert!(matches(&event, &Filter::eq("tags", vec!["quiz", "community"])));
        assert!(!matches(&event, &Filter::eq("tags", vec!["community", "quiz"])));
    }
}
