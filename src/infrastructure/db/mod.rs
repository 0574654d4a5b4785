use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use crate::domain::errors::DomainError;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Embedded at compile time from ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Makes `%`, `_` and `\` match literally inside a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

/// Turns a unique-constraint violation into a `Conflict` with `message`.
pub fn map_unique_violation(err: sqlx::Error, message: &str) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(message.to_string()).into()
        }
        _ => err.into(),
    }
}

/// Reads a TEXT column holding an upper-case wire enum.
pub(crate) fn enum_col<T>(row: &PgRow, col: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = DomainError>,
{
    let raw: String = row.try_get(col)?;
    Ok(raw.parse()?)
}

pub(crate) fn opt_enum_col<T>(row: &PgRow, col: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = DomainError>,
{
    let raw: Option<String> = row.try_get(col)?;
    Ok(raw.map(|s| s.parse()).transpose()?)
}

pub mod repositories;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(contains_pattern("rust"), "%rust%");
    }
}
