//! SQL dialect differences between the supported engines.
//!
//! Application SQL is written with anonymous `?` placeholders; each dialect
//! rewrites them to its native positional form and knows how to express
//! "skip N, take M".

use super::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `$1, $2, ...` placeholders, `LIMIT take OFFSET skip`
    Postgres,
    /// `?1, ?2, ...` placeholders, `LIMIT skip, take`
    Sqlite,
}

impl Dialect {
    /// Native placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
        }
    }

    /// Rewrite every `?` outside of quoted literals into the native placeholder.
    pub fn translate(&self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 16);
        let mut index = 0;
        let mut quote: Option<char> = None;

        for c in sql.chars() {
            match (quote, c) {
                (Some(q), c) if c == q => {
                    quote = None;
                    out.push(c);
                }
                (Some(_), c) => out.push(c),
                (None, '\'') | (None, '"') => {
                    quote = Some(c);
                    out.push(c);
                }
                (None, '?') => {
                    index += 1;
                    out.push_str(&self.placeholder(index));
                }
                (None, c) => out.push(c),
            }
        }

        out
    }

    /// Pagination clause (with `?` placeholders) and its parameters in the
    /// order the clause expects them.
    pub fn paginate(&self, limit: i64, offset: i64) -> (&'static str, Vec<SqlValue>) {
        match self {
            Dialect::Postgres => (
                "LIMIT ? OFFSET ?",
                vec![SqlValue::from(limit), SqlValue::from(offset)],
            ),
            Dialect::Sqlite => (
                "LIMIT ?, ?",
                vec![SqlValue::from(offset), SqlValue::from(limit)],
            ),
        }
    }

    /// Case-insensitive `LIKE ?` on `column`, escaped with a backslash.
    ///
    /// SQLite's `LOWER()` only folds ASCII, so there the match runs against the
    /// `<column>_ci` copy the application keeps lowercased.
    pub fn ci_like(&self, column: &str) -> String {
        match self {
            Dialect::Postgres => format!("LOWER({}) LIKE ? ESCAPE '\\'", column),
            Dialect::Sqlite => format!("{}_ci LIKE ? ESCAPE '\\'", column),
        }
    }

    /// Whether searchable columns need a lowercased `_ci` copy written next to them
    pub fn stores_folded_copies(&self) -> bool {
        matches!(self, Dialect::Sqlite)
    }
}

/// `%term%` with the `LIKE` metacharacters of `term` escaped, so they match literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}
