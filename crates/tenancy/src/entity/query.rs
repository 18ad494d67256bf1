//! Query building with named, revocable global scopes.
//!
//! A [`Query`] is an ordered list of predicates against one table. Entity
//! types attach [`GlobalScope`]s that contribute predicates to every query
//! built for them.

use serde_json::{Map, Value};

/// A predicate contributed to every query built for an entity type.
///
/// Closures of the form `Fn(&mut Query)` implement this trait.
pub trait GlobalScope: Send + Sync {
    /// Adds this scope's constraints to the query.
    fn apply(&self, query: &mut Query);
}

impl<F> GlobalScope for F
where
    F: Fn(&mut Query) + Send + Sync,
{
    fn apply(&self, query: &mut Query) {
        self(query)
    }
}

/// A single constraint on a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column IN (values)`. An empty value list matches nothing.
    In {
        /// Column name, optionally qualified with the table (`table.column`).
        column: String,
        /// Accepted values.
        values: Vec<Value>,
    },

    /// `column = value`.
    Eq {
        /// Column name, optionally qualified with the table (`table.column`).
        column: String,
        /// Expected value.
        value: Value,
    },
}

impl Predicate {
    /// Returns the (possibly qualified) column this predicate constrains.
    pub fn column(&self) -> &str {
        match self {
            Predicate::In { column, .. } | Predicate::Eq { column, .. } => column,
        }
    }

    /// Returns `true` if the row satisfies this predicate.
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        let value = row.get(unqualified(self.column())).unwrap_or(&Value::Null);
        match self {
            Predicate::In { values, .. } => values.contains(value),
            Predicate::Eq { value: expected, .. } => value == expected,
        }
    }

    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::In { values, .. } if values.is_empty() => "1 = 0".to_string(),
            Predicate::In { column, values } => {
                params.extend(values.iter().cloned());
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{} IN ({})", column, placeholders)
            }
            Predicate::Eq { column, value } => {
                params.push(value.clone());
                format!("{} = ?", column)
            }
        }
    }
}

fn unqualified(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}

/// A query against one table.
///
/// # Example
///
/// ```
/// use helios_tenancy::entity::Query;
/// use serde_json::json;
///
/// let mut query = Query::new("invoices");
/// query.where_in("invoices.org_id", vec![json!(1), json!(11)]);
///
/// let (sql, params) = query.to_sql();
/// assert_eq!(sql, "SELECT * FROM invoices WHERE invoices.org_id IN (?, ?)");
/// assert_eq!(params, vec![json!(1), json!(11)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    predicates: Vec<Predicate>,
    applied_scopes: Vec<String>,
}

impl Query {
    /// Creates an unconstrained query against the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            applied_scopes: Vec::new(),
        }
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Adds a `column IN (values)` constraint.
    pub fn where_in(&mut self, column: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.predicates.push(Predicate::In {
            column: column.into(),
            values,
        });
        self
    }

    /// Adds a `column = value` constraint.
    pub fn where_eq(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.predicates.push(Predicate::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Returns the constraints in the order they were added.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns the names of the global scopes applied to this query.
    pub fn applied_scopes(&self) -> &[String] {
        &self.applied_scopes
    }

    /// Applies a named global scope.
    pub fn apply_scope(&mut self, name: &str, scope: &dyn GlobalScope) {
        scope.apply(self);
        self.applied_scopes.push(name.to_string());
    }

    /// Returns `true` if the row satisfies every constraint.
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(row))
    }

    /// Renders the query as SQL with positional `?` parameters.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let mut sql = format!("SELECT * FROM {}", self.table);

        if !self.predicates.is_empty() {
            let clauses: Vec<String> = self
                .predicates
                .iter()
                .map(|predicate| predicate.to_sql(&mut params))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        (sql, params)
    }
}
