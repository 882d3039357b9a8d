//! Parsing the DIMACS CNF format used by the standard SAT competition test
//! suites.

use std::fmt;

#[derive(Debug)]
pub struct DimacsError {
    message: String,
}

impl fmt::Display for DimacsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid DIMACS input: {}", self.message)
    }
}

impl std::error::Error for DimacsError {}

/// Parse a DIMACS CNF document into clauses of signed integer literals.
///
/// Comment lines (`c ...`) and the problem line (`p cnf <vars> <clauses>`)
/// are skipped; clause lines are terminated by a trailing `0` which is
/// dropped.
pub fn parse(input: &str) -> Result<Vec<Vec<i32>>, DimacsError> {
    let mut clauses = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        let mut literals: Vec<i32> = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i32>().map_err(|_| DimacsError {
                    message: format!("expected an integer literal, found `{tok}`"),
                })
            })
            .collect::<Result<_, _>>()?;
        if literals.last() == Some(&0) {
            literals.pop();
        }
        // A line of just `0` is a legitimate empty clause (trivially
        // unsatisfiable input), not a blank line to skip -- it already
        // failed the `line.is_empty()` check above.
        clauses.push(literals);
    }
    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clauses_and_skips_headers() {
        let input = "c a comment\np cnf 3 2\n1 -2 0\n2 3 -1 0\n";
        let clauses = parse(input).unwrap();
        assert_eq!(clauses, vec![vec![1, -2], vec![2, 3, -1]]);
    }

    #[test]
    fn rejects_non_integer_tokens() {
        assert!(parse("1 x 0\n").is_err());
    }

    #[test]
    fn a_lone_zero_is_an_empty_clause() {
        let clauses = parse("p cnf 1 1\n0\n").unwrap();
        assert_eq!(clauses, vec![Vec::<i32>::new()]);
    }
}
