use chrono::NaiveDate;
use sqlx::{postgres::PgArguments, postgres::PgRow, FromRow, PgExecutor, Postgres};

use crate::database::manager::DatabaseError;

/// Typed bind value collected while a statement is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    IntArray(Vec<i64>),
    Text(String),
    TextArray(Vec<String>),
    Date(NaiveDate),
    Bool(bool),
}

/// Final statement text plus its ordered bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Builds a statement from fragments. Every `param` call appends a value and
/// hands back its `$n` placeholder, so numbering always matches bind order.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            sql: base.into(),
            params: vec![],
        }
    }

    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    pub fn param(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn build(self) -> SqlResult {
        SqlResult {
            query: self.sql,
            params: self.params,
        }
    }
}

/// AND-joined predicate list rendered as a WHERE body.
#[derive(Debug, Default)]
pub struct Conditions {
    parts: Vec<String>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, condition: impl Into<String>) -> &mut Self {
        self.parts.push(condition.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn to_sql(&self) -> String {
        if self.parts.is_empty() {
            "TRUE".to_string()
        } else {
            self.parts.join(" AND ")
        }
    }
}

impl SqlResult {
    pub async fn fetch_all<'e, T, E>(&self, executor: E) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: PgExecutor<'e>,
    {
        let mut q = sqlx::query_as::<_, T>(&self.query);
        for p in self.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(executor).await?)
    }

    pub async fn fetch_scalar<'e, E>(&self, executor: E) -> Result<i64, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let mut q = sqlx::query_scalar::<_, i64>(&self.query);
        for p in self.params.iter() {
            q = bind_param_query_scalar(q, p);
        }
        Ok(q.fetch_one(executor).await?)
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::IntArray(ids) => q.bind(ids),
        SqlParam::Text(s) => q.bind(s),
        SqlParam::TextArray(values) => q.bind(values),
        SqlParam::Date(d) => q.bind(*d),
        SqlParam::Bool(b) => q.bind(*b),
    }
}

fn bind_param_query_scalar<'q>(
    q: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::IntArray(ids) => q.bind(ids),
        SqlParam::Text(s) => q.bind(s),
        SqlParam::TextArray(values) => q.bind(values),
        SqlParam::Date(d) => q.bind(*d),
        SqlParam::Bool(b) => q.bind(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_bind_order() {
        let mut b = SqlBuilder::new("SELECT * FROM t WHERE ");
        let a = b.param(SqlParam::Int(1));
        let c = b.param(SqlParam::Text("x".into()));
        b.push(&format!("a = {} AND c = {}", a, c));
        let r = b.build();

        assert_eq!(r.query, "SELECT * FROM t WHERE a = $1 AND c = $2");
        assert_eq!(r.params, vec![SqlParam::Int(1), SqlParam::Text("x".into())]);
    }

    #[test]
    fn reused_placeholder_binds_once() {
        let mut b = SqlBuilder::new("");
        let s = b.param(SqlParam::Text("ram".into()));
        b.push(&format!("name ILIKE {s} OR phone ILIKE {s}"));
        assert_eq!(b.param_count(), 1);
    }

    #[test]
    fn empty_conditions_render_true() {
        assert_eq!(Conditions::new().to_sql(), "TRUE");
        let mut c = Conditions::new();
        c.add("a = $1").add("b = $2");
        assert_eq!(c.to_sql(), "a = $1 AND b = $2");
    }
}
