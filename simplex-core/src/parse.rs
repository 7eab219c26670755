//! Text-format model loader.
//!
//! Line grammar: the first line is a direction token (`max`/`min`) followed
//! by the signed objective coefficients; each interior line is one
//! constraint, `<n coefficients> <relation> <rhs>` with relation `<=`, `>=`
//! or `=`; an optional final line carries one kind token per variable
//! (`+`, `-`, `int`/`integer`, `bin`/`binary`). Variables without a kind
//! token are continuous, non-negative by convention.

use thiserror::Error;

use crate::problem::{Constraint, Direction, Model, Relation, VarKind};

/// Errors from the text loader, with 1-based source line numbers.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input has no non-empty lines.
    #[error("model text is empty")]
    Empty,

    /// A line did not match the grammar.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based source line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Parse a model from its text form.
pub fn parse_model(input: &str) -> Result<Model, ParseError> {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let Some(&(first_no, first)) = lines.first() else {
        return Err(ParseError::Empty);
    };

    let mut tokens = first.split_whitespace();
    let direction = match tokens.next().map(str::to_ascii_lowercase).as_deref() {
        Some("max") => Direction::Maximize,
        Some("min") => Direction::Minimize,
        other => {
            return Err(ParseError::Malformed {
                line: first_no,
                message: format!("expected direction token max/min, found {:?}", other),
            })
        }
    };
    let objective: Vec<f64> = tokens
        .map(|t| parse_number(t, first_no))
        .collect::<Result<_, _>>()?;
    if objective.is_empty() {
        return Err(ParseError::Malformed {
            line: first_no,
            message: "objective line has no coefficients".to_string(),
        });
    }
    let n = objective.len();

    // The final line is a kinds line iff every token parses as a kind.
    let mut body = &lines[1..];
    let mut var_kinds = vec![VarKind::Continuous; n];
    if let Some(&(last_no, last)) = body.last() {
        let kinds: Option<Vec<VarKind>> =
            last.split_whitespace().map(parse_kind).collect();
        if let Some(kinds) = kinds {
            if kinds.len() > n {
                return Err(ParseError::Malformed {
                    line: last_no,
                    message: format!("{} kind tokens for {} variables", kinds.len(), n),
                });
            }
            var_kinds[..kinds.len()].copy_from_slice(&kinds);
            body = &body[..body.len() - 1];
        }
    }

    let mut constraints = Vec::with_capacity(body.len());
    for &(no, line) in body {
        constraints.push(parse_constraint(line, no, n)?);
    }

    Ok(Model {
        direction,
        objective,
        constraints,
        var_kinds,
    })
}

fn parse_constraint(line: &str, no: usize, n: usize) -> Result<Constraint, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != n + 2 {
        return Err(ParseError::Malformed {
            line: no,
            message: format!(
                "expected {} coefficients, a relation and a right-hand side, found {} tokens",
                n,
                tokens.len()
            ),
        });
    }
    let coefs: Vec<f64> = tokens[..n]
        .iter()
        .map(|t| parse_number(t, no))
        .collect::<Result<_, _>>()?;
    let relation = match tokens[n] {
        "<=" => Relation::Le,
        ">=" => Relation::Ge,
        "=" => Relation::Eq,
        other => {
            return Err(ParseError::Malformed {
                line: no,
                message: format!("unknown relation token {:?}", other),
            })
        }
    };
    let rhs = parse_number(tokens[n + 1], no)?;
    Ok(Constraint::new(coefs, relation, rhs))
}

fn parse_number(token: &str, no: usize) -> Result<f64, ParseError> {
    token.parse().map_err(|_| ParseError::Malformed {
        line: no,
        message: format!("expected a number, found {:?}", token),
    })
}

fn parse_kind(token: &str) -> Option<VarKind> {
    match token.to_ascii_lowercase().as_str() {
        "+" => Some(VarKind::NonNegative),
        "-" => Some(VarKind::NonPositive),
        "int" | "integer" => Some(VarKind::Integer),
        "bin" | "binary" => Some(VarKind::Binary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lp() {
        let text = "max 3 2\n1 1 <= 4\n1 0 <= 2\n";
        let model = parse_model(text).unwrap();

        assert_eq!(model.direction, Direction::Maximize);
        assert_eq!(model.objective, vec![3.0, 2.0]);
        assert_eq!(model.num_constraints(), 2);
        assert_eq!(model.constraints[0].relation, Relation::Le);
        assert_eq!(model.constraints[1].rhs, 2.0);
        assert_eq!(model.var_kinds, vec![VarKind::Continuous; 2]);
    }

    #[test]
    fn test_parse_kinds_line() {
        let text = "min 1 -2 0.5\n1 1 1 >= 3\n+ int bin\n";
        let model = parse_model(text).unwrap();
        assert_eq!(
            model.var_kinds,
            vec![VarKind::NonNegative, VarKind::Integer, VarKind::Binary]
        );
    }

    #[test]
    fn test_partial_kinds_line_pads_continuous() {
        let text = "min 1 2 3\n1 1 1 = 1\nint\n";
        let model = parse_model(text).unwrap();
        assert_eq!(
            model.var_kinds,
            vec![VarKind::Integer, VarKind::Continuous, VarKind::Continuous]
        );
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse_model("max 1\n1 ?? 2\n").unwrap_err();
        match err {
            ParseError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }

        let err = parse_model("maximize 1\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));

        assert!(matches!(parse_model("  \n \n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_negative_and_signed_coefficients() {
        let text = "min -1 +2\n-1 1 >= -2\n";
        let model = parse_model(text).unwrap();
        assert_eq!(model.objective, vec![-1.0, 2.0]);
        assert_eq!(model.constraints[0].rhs, -2.0);
    }
}
