//! Named placeholder compilation
//!
//! Rewrites `:name` placeholders into PostgreSQL positional parameters
//! (`$1`, `$2`, ...) and collects the bound values in order. The values
//! are handed to the driver; SQL text never contains them.
//!
//! Left untouched:
//! - `::` type casts
//! - anything inside single-quoted literals or double-quoted identifiers
//! - `-- line` and `/* block */` comments

use super::{DbError, Replacements, Value};

/// SQL ready for the driver plus values in parameter order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

/// Compile `sql` against `replacements`.
///
/// A name used twice binds to the same parameter. Replacements that the
/// SQL never mentions are ignored.
pub fn compile(sql: &str, replacements: &Replacements) -> Result<CompiledStatement, DbError> {
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<&str> = Vec::new();
    let mut values = Vec::new();
    let mut quote: Option<char> = None;

    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '-' if matches!(chars.peek(), Some(&(_, '-'))) => {
                out.push(c);
                for (_, ch) in chars.by_ref() {
                    out.push(ch);
                    if ch == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some(&(_, '*'))) => {
                out.push(c);
                if let Some((_, star)) = chars.next() {
                    out.push(star);
                }
                let mut prev = '\0';
                for (_, ch) in chars.by_ref() {
                    out.push(ch);
                    if prev == '*' && ch == '/' {
                        break;
                    }
                    prev = ch;
                }
            }
            ':' => match chars.peek() {
                Some(&(_, ':')) => {
                    chars.next();
                    out.push_str("::");
                }
                Some(&(_, next)) if next.is_ascii_alphabetic() || next == '_' => {
                    let start = i + 1;
                    let mut end = start;
                    while let Some(&(j, ch)) = chars.peek() {
                        if ch.is_ascii_alphanumeric() || ch == '_' {
                            end = j + ch.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let name = &sql[start..end];

                    let index = match names.iter().position(|n| *n == name) {
                        Some(pos) => pos + 1,
                        None => {
                            let value = replacements.get(name).ok_or_else(|| {
                                DbError::MissingReplacement {
                                    name: name.to_owned(),
                                }
                            })?;
                            names.push(name);
                            values.push(value.clone());
                            names.len()
                        }
                    };
                    out.push('$');
                    out.push_str(&index.to_string());
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    Ok(CompiledStatement { sql: out, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_in_order_of_appearance() {
        let r = Replacements::new()
            .with("position", "CTO")
            .with("id", 4_i64);
        let c = compile("UPDATE employees SET position = :position WHERE id = :id", &r).unwrap();

        assert_eq!(c.sql, "UPDATE employees SET position = $1 WHERE id = $2");
        assert_eq!(c.values, vec![Value::from("CTO"), Value::Int(4)]);
    }

    #[test]
    fn repeated_name_reuses_parameter() {
        let r = Replacements::new().with("id", 1_i64);
        let c = compile("SELECT * FROM t WHERE id = :id OR parent = :id", &r).unwrap();

        assert_eq!(c.sql, "SELECT * FROM t WHERE id = $1 OR parent = $1");
        assert_eq!(c.values.len(), 1);
    }

    #[test]
    fn casts_are_not_placeholders() {
        let r = Replacements::new().with("id", 1_i64);
        let c = compile("SELECT :id::bigint, now()::text", &r).unwrap();
        assert_eq!(c.sql, "SELECT $1::bigint, now()::text");
    }

    #[test]
    fn quoted_text_is_left_alone() {
        let r = Replacements::new().with("name", "x");
        let c = compile(
            r#"SELECT ':name', "weird:col" FROM t WHERE name = :name AND note = 'it''s :late'"#,
            &r,
        )
        .unwrap();

        assert_eq!(
            c.sql,
            r#"SELECT ':name', "weird:col" FROM t WHERE name = $1 AND note = 'it''s :late'"#
        );
        assert_eq!(c.values, vec![Value::from("x")]);
    }

    #[test]
    fn comments_are_copied_verbatim() {
        let r = Replacements::new().with("id", 1_i64);
        let sql = "SELECT * FROM t -- don't touch :id\nWHERE id = :id /* it's :other */ AND x = 'y'";
        let c = compile(sql, &r).unwrap();

        assert_eq!(
            c.sql,
            "SELECT * FROM t -- don't touch :id\nWHERE id = $1 /* it's :other */ AND x = 'y'"
        );
        assert_eq!(c.values, vec![Value::Int(1)]);
    }

    #[test]
    fn single_dash_is_not_a_comment() {
        let r = Replacements::new().with("a", 2_i64).with("b", 1_i64);
        let c = compile("SELECT :a - :b, :a-:b", &r).unwrap();
        assert_eq!(c.sql, "SELECT $1 - $2, $1-$2");
    }

    #[test]
    fn missing_replacement_is_an_error() {
        let err = compile("DELETE FROM t WHERE id = :id", &Replacements::new()).unwrap_err();
        assert!(matches!(err, DbError::MissingReplacement { ref name } if name == "id"));
    }

    #[test]
    fn unused_replacements_are_ignored() {
        let r = Replacements::new().with("unused", 3_i64);
        let c = compile("SELECT * FROM employees", &r).unwrap();
        assert_eq!(c.sql, "SELECT * FROM employees");
        assert!(c.values.is_empty());
    }

    #[test]
    fn lone_colon_passes_through() {
        let c = compile("SELECT ': ' || x FROM t WHERE a = b :", &Replacements::new()).unwrap();
        assert_eq!(c.sql, "SELECT ': ' || x FROM t WHERE a = b :");
    }
}
