//! Query construction for the read path.
//!
//! Reads support exactly two knobs: an equality filter (several field
//! equalities are implicitly AND-ed) and a flat result cap. Results come back
//! in whatever order the backend produces; no sort is ever imposed.
//!
//! ```ignore
//! use sycamore_core::query::{Query, Filter};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("category", "Food"))
//!     .limit(10)
//!     .build();
//! ```
//!
//! Backends consume the filter AST through [`QueryVisitor`], either to evaluate
//! it in place or to translate it into a native query document.

use bson::{Bson, Document};

use crate::error::DocumentStoreError;

/// Number of records returned when a query does not set its own limit.
pub const DEFAULT_LIMIT: usize = 100;

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions. An empty list matches everything.
    And(Vec<Expr>),
    /// The field is present and equal to the value.
    Eq(String, Bson),
}

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq(field.into(), value.into())
    }

    /// Combines multiple expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Builds an AND of equalities from a field → expected value mapping.
    ///
    /// An empty mapping yields an empty AND, which matches every document.
    pub fn matching(fields: Document) -> Expr {
        Expr::And(
            fields
                .into_iter()
                .map(|(field, value)| Expr::Eq(field, value))
                .collect(),
        )
    }
}

/// A structured query for retrieving documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: usize,
}

impl Default for Query {
    fn default() -> Self {
        Query {
            filter: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Query {
    /// Creates a query matching everything, capped at [`DEFAULT_LIMIT`].
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the filter from an optional field → value mapping.
    pub fn matching(mut self, fields: Option<Document>) -> Self {
        self.query.filter = fields.map(Filter::matching);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = limit;
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Eq(field, value) => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn default_query_uses_default_limit() {
        let query = Query::new();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(query.filter.is_none());
    }

    #[test]
    fn matching_builds_and_of_equalities() {
        let expr = Filter::matching(doc! { "category": "Food", "is_featured": true });

        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::Eq("category".into(), Bson::String("Food".into())),
                Expr::Eq("is_featured".into(), Bson::Boolean(true)),
            ])
        );
    }

    #[test]
    fn and_appends_to_existing_conjunction() {
        let expr = Filter::and([Filter::eq("a", 1)]).and(Filter::eq("b", 2));
        assert_eq!(expr, Filter::and([Filter::eq("a", 1), Filter::eq("b", 2)]));
    }

    #[test]
    fn builder_without_mapping_has_no_filter() {
        let query = Query::builder().matching(None).limit(3).build();
        assert!(query.filter.is_none());
        assert_eq!(query.limit, 3);
    }
}
