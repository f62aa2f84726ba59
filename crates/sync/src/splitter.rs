//! Split a SQL script into individually executable statements.
//!
//! The scanner walks the script one character at a time and only treats `;`
//! as a terminator outside quoted text. Quotes are `'`, `"` and `` ` ``;
//! inside `'` and `"` a backslash escapes the next character, and in every
//! quote style a doubled quote character is a literal quote. Comments
//! (`-- `, `#`, `/* */`) outside quotes are dropped. Blank statements and
//! session statements (`SET ...`, `USE ...`) are discarded because the
//! executor manages the session itself.

/// Split `script` into statements without their trailing `;`.
pub fn split_statements(script: &str) -> Vec<String> {
    let chars: Vec<char> = script.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            current.push(c);
            if c == '\\' && q != '`' {
                if let Some(&next) = chars.get(i + 1) {
                    current.push(next);
                    i += 1;
                }
            } else if c == q {
                if chars.get(i + 1) == Some(&q) {
                    current.push(q);
                    i += 1;
                } else {
                    quote = None;
                }
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            ';' => {
                finish_statement(&mut current, &mut statements);
            }
            '-' if starts_dash_comment(&chars, i) => {
                i = skip_line(&chars, i);
                current.push('\n');
                continue;
            }
            '#' => {
                i = skip_line(&chars, i);
                current.push('\n');
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = skip_block_comment(&chars, i + 2);
                current.push(' ');
                continue;
            }
            _ => current.push(c),
        }
        i += 1;
    }

    finish_statement(&mut current, &mut statements);
    statements
}

/// `--` only opens a comment when followed by whitespace or end of input.
fn starts_dash_comment(chars: &[char], i: usize) -> bool {
    chars.get(i + 1) == Some(&'-')
        && chars.get(i + 2).map_or(true, |c| c.is_whitespace())
}

/// Index just past the end of the current line.
fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i + 1
}

/// Index just past the closing `*/`, or end of input if unterminated.
fn skip_block_comment(chars: &[char], mut i: usize) -> usize {
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

fn finish_statement(current: &mut String, statements: &mut Vec<String>) {
    let statement = current.trim();
    if !statement.is_empty() && !is_session_statement(statement) {
        statements.push(statement.to_string());
    }
    current.clear();
}

fn is_session_statement(statement: &str) -> bool {
    let keyword: String = statement
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    keyword.eq_ignore_ascii_case("SET") || keyword.eq_ignore_ascii_case("USE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_inside_string_does_not_split() {
        let stmts = split_statements("INSERT INTO t (msg) VALUES ('a;b');");
        assert_eq!(stmts, vec!["INSERT INTO t (msg) VALUES ('a;b')"]);
    }

    #[test]
    fn splits_on_top_level_semicolons() {
        let stmts = split_statements("CREATE TABLE a (id INT);\nINSERT INTO a VALUES (1);\n");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "CREATE TABLE a (id INT)");
        assert_eq!(stmts[1], "INSERT INTO a VALUES (1)");
    }

    #[test]
    fn trailing_statement_without_semicolon_is_kept() {
        let stmts = split_statements("DELETE FROM a; DELETE FROM b");
        assert_eq!(stmts, vec!["DELETE FROM a", "DELETE FROM b"]);
    }

    #[test]
    fn backslash_escaped_quote_stays_inside_string() {
        let stmts = split_statements(r"INSERT INTO t VALUES ('it\'s; fine'); SELECT 1;");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], r"INSERT INTO t VALUES ('it\'s; fine')");
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        let stmts = split_statements(r"INSERT INTO t VALUES ('C:\\'); SELECT 2;");
        assert_eq!(stmts, vec![r"INSERT INTO t VALUES ('C:\\')", "SELECT 2"]);
    }

    #[test]
    fn doubled_quotes_inside_identifiers_and_strings() {
        let sql = concat!(
            "CREATE TABLE `we``ird;name` (id INT); ",
            "INSERT INTO t VALUES (\"say \"\"hi;\"\"\"), ('x''y;z');",
        );
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "CREATE TABLE `we``ird;name` (id INT)");
        assert_eq!(stmts[1], "INSERT INTO t VALUES (\"say \"\"hi;\"\"\"), ('x''y;z')");
    }

    #[test]
    fn backslash_is_literal_inside_backticks() {
        let stmts = split_statements("SELECT `a\\`; SELECT 1");
        assert_eq!(stmts, vec!["SELECT `a\\`", "SELECT 1"]);
    }

    #[test]
    fn comments_and_session_statements_are_discarded() {
        let sql = "-- header; with semicolon\n\
                   # another; comment\n\
                   /* block; comment */\n\
                   /*!40101 SET NAMES utf8mb4 */;\n\
                   SET FOREIGN_KEY_CHECKS=0;\n\
                   use shop;\n\
                   INSERT INTO t VALUES ('-- not a comment', '# nor this');\n\
                   ;;\n";
        let stmts = split_statements(sql);
        assert_eq!(stmts, vec!["INSERT INTO t VALUES ('-- not a comment', '# nor this')"]);
    }

    #[test]
    fn double_dash_without_space_is_not_a_comment() {
        let stmts = split_statements("UPDATE t SET n = n--1;");
        assert_eq!(stmts, vec!["UPDATE t SET n = n--1"]);
    }

    #[test]
    fn settings_column_is_not_a_session_statement() {
        let stmts = split_statements("SETTINGS_FAKE; UPDATE t SET a = 1;");
        assert_eq!(stmts, vec!["SETTINGS_FAKE", "UPDATE t SET a = 1"]);
    }

    #[test]
    fn empty_script_yields_nothing() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("  \n ; \n").is_empty());
    }
}
