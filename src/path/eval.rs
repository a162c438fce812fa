use std::cmp::Ordering;

use crate::atom::Atom;
use crate::error::{CodecError, Result};

use super::lexer::{Func, Num, Op, Var};
use super::parser::Item;

/// Runtime value inside predicate evaluation.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Num(Num),
    Str(String),
    Bool(bool),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
        }
    }
}

fn type_error(what: impl Into<String>) -> CodecError {
    CodecError::PredicateType(what.into())
}

/// `@data` binds to the typed payload; arithmetic is only possible on the
/// numeric families, everything else binds as its raw string rendering.
fn data_value(atom: &Atom) -> Result<Value> {
    use crate::tag::AtomType::*;
    match atom.tag() {
        UI01 | UI08 | UI16 | UI32 | UI64 => Ok(Value::Num(Num::Uint(atom.as_uint()?))),
        SI08 | SI16 | SI32 | SI64 | ENUM => Ok(Value::Num(Num::Int(atom.as_int()?))),
        FP32 | FP64 | UF32 | UF64 | SF32 | SF64 => Ok(Value::Num(Num::Float(atom.as_float()?))),
        _ => Ok(Value::Str(atom.string_raw()?)),
    }
}

fn as_f64(num: Num) -> f64 {
    match num {
        Num::Uint(v) => v as f64,
        Num::Int(v) => v as f64,
        Num::Float(v) => v,
    }
}

fn as_i128(num: Num) -> Option<i128> {
    match num {
        Num::Uint(v) => Some(i128::from(v)),
        Num::Int(v) => Some(i128::from(v)),
        Num::Float(_) => None,
    }
}

fn compare_num(lhs: Num, rhs: Num) -> Ordering {
    match (as_i128(lhs), as_i128(rhs)) {
        (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        // mixed or float comparisons go through f64; NaN sorts nowhere and
        // compares unequal
        _ => as_f64(lhs)
            .partial_cmp(&as_f64(rhs))
            .unwrap_or(Ordering::Greater),
    }
}

fn arith(op: Op, lhs: Num, rhs: Num) -> Num {
    if let (Some(lhs), Some(rhs)) = (as_i128(lhs), as_i128(rhs)) {
        let exact = match op {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            _ => unreachable!("not an arithmetic operator"),
        };
        if let Some(value) = exact {
            if let Ok(value) = i64::try_from(value) {
                return Num::Int(value);
            }
            if let Ok(value) = u64::try_from(value) {
                return Num::Uint(value);
            }
        }
    }
    let (lhs, rhs) = (as_f64(lhs), as_f64(rhs));
    Num::Float(match op {
        Op::Add => lhs + rhs,
        Op::Sub => lhs - rhs,
        Op::Mul => lhs * rhs,
        _ => unreachable!("not an arithmetic operator"),
    })
}

fn compare(op: Op, lhs: Value, rhs: Value) -> Result<bool> {
    let ordering = match (&lhs, &rhs) {
        (Value::Num(lhs), Value::Num(rhs)) => compare_num(*lhs, *rhs),
        (Value::Str(lhs), Value::Str(rhs)) => lhs.cmp(rhs),
        (Value::Bool(lhs), Value::Bool(rhs)) if matches!(op, Op::Eq | Op::Ne) => {
            return Ok(if op == Op::Eq { lhs == rhs } else { lhs != rhs });
        }
        _ => {
            return Err(type_error(format!(
                "cannot compare {} with {}",
                lhs.type_name(),
                rhs.type_name()
            )))
        }
    };
    Ok(match op {
        Op::Eq => ordering == Ordering::Equal,
        Op::Ne => ordering != Ordering::Equal,
        Op::Lt => ordering == Ordering::Less,
        Op::Le => ordering != Ordering::Greater,
        Op::Gt => ordering == Ordering::Greater,
        Op::Ge => ordering != Ordering::Less,
        _ => unreachable!("not a comparison operator"),
    })
}

/// Evaluate a compiled predicate against one candidate atom together with
/// its 1-based position among its candidate siblings.
pub(crate) fn eval(items: &[Item], atom: &Atom, position: usize, last: usize) -> Result<bool> {
    let mut stack: Vec<Value> = Vec::new();
    let underflow = || CodecError::Syntax("malformed predicate: missing operand".into());

    for item in items {
        match item {
            Item::Number(num) => stack.push(Value::Num(*num)),
            Item::Str(text) => stack.push(Value::Str(text.clone())),
            Item::Var(Var::Name) => stack.push(Value::Str(atom.name().to_string())),
            Item::Var(Var::Type) => stack.push(Value::Str(atom.tag().to_string())),
            Item::Var(Var::Data) => stack.push(data_value(atom)?),
            Item::Func(Func::Position) => {
                stack.push(Value::Num(Num::Uint(position as u64)));
            }
            Item::Func(Func::Last) => stack.push(Value::Num(Num::Uint(last as u64))),
            Item::Op(Op::Not) => {
                let value = stack.pop().ok_or_else(underflow)?;
                let Value::Bool(value) = value else {
                    return Err(type_error(format!(
                        "'not' needs a boolean, got {}",
                        value.type_name()
                    )));
                };
                stack.push(Value::Bool(!value));
            }
            Item::Op(op @ (Op::And | Op::Or)) => {
                let rhs = stack.pop().ok_or_else(underflow)?;
                let lhs = stack.pop().ok_or_else(underflow)?;
                let (Value::Bool(lhs), Value::Bool(rhs)) = (&lhs, &rhs) else {
                    return Err(type_error(format!(
                        "boolean operator on {} and {}",
                        lhs.type_name(),
                        rhs.type_name()
                    )));
                };
                stack.push(Value::Bool(match op {
                    Op::And => *lhs && *rhs,
                    _ => *lhs || *rhs,
                }));
            }
            Item::Op(op @ (Op::Add | Op::Sub | Op::Mul)) => {
                let rhs = stack.pop().ok_or_else(underflow)?;
                let lhs = stack.pop().ok_or_else(underflow)?;
                let (Value::Num(lhs), Value::Num(rhs)) = (&lhs, &rhs) else {
                    return Err(type_error(format!(
                        "arithmetic on {} and {}",
                        lhs.type_name(),
                        rhs.type_name()
                    )));
                };
                stack.push(Value::Num(arith(*op, *lhs, *rhs)));
            }
            Item::Op(op) => {
                let rhs = stack.pop().ok_or_else(underflow)?;
                let lhs = stack.pop().ok_or_else(underflow)?;
                stack.push(Value::Bool(compare(*op, lhs, rhs)?));
            }
        }
    }

    let result = stack.pop().ok_or_else(underflow)?;
    if !stack.is_empty() {
        return Err(CodecError::Syntax(
            "malformed predicate: leftover operands".into(),
        ));
    }
    match result {
        Value::Bool(value) => Ok(value),
        other => Err(type_error(format!(
            "predicate result is {}, expected boolean",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::lexer::tokenize;
    use crate::path::parser::compile;
    use crate::tag::AtomType;

    fn eval_on(text: &str, atom: &Atom, position: usize, last: usize) -> Result<bool> {
        eval(&compile(tokenize(text).unwrap()).unwrap(), atom, position, last)
    }

    fn ui32(name: &str, value: u64) -> Atom {
        let mut atom = Atom::new(name, AtomType::UI32).unwrap();
        atom.set_uint(value).unwrap();
        atom
    }

    #[test]
    fn variables_bind() {
        let atom = ui32("DOGS", 3);
        assert!(eval_on("@name = 'DOGS'", &atom, 1, 1).unwrap());
        assert!(eval_on("@type = 'UI32'", &atom, 1, 1).unwrap());
        assert!(eval_on("@data = 3", &atom, 1, 1).unwrap());
        assert!(!eval_on("@data != 3", &atom, 1, 1).unwrap());
    }

    #[test]
    fn position_and_last() {
        let atom = ui32("DOGS", 3);
        assert!(eval_on("position() = 2", &atom, 2, 5).unwrap());
        assert!(eval_on("position() = last()", &atom, 5, 5).unwrap());
        assert!(eval_on("position() = last() - 1", &atom, 4, 5).unwrap());
    }

    #[test]
    fn arithmetic_and_precedence() {
        let atom = ui32("DOGS", 7);
        assert!(eval_on("@data = 1 + 2 * 3", &atom, 1, 1).unwrap());
        assert!(eval_on("@data * 2 = 14", &atom, 1, 1).unwrap());
    }

    #[test]
    fn boolean_logic() {
        let atom = ui32("DOGS", 3);
        assert!(eval_on("@data = 3 and @name = 'DOGS'", &atom, 1, 1).unwrap());
        assert!(eval_on("@data = 4 or @data = 3", &atom, 1, 1).unwrap());
        assert!(eval_on("not @data = 4", &atom, 1, 1).unwrap());
    }

    #[test]
    fn signed_data() {
        let mut atom = Atom::new("TEMP", AtomType::SI32).unwrap();
        atom.set_int(-2).unwrap();
        assert!(eval_on("@data = -2", &atom, 1, 1).unwrap());
        assert!(eval_on("@data < -1", &atom, 1, 1).unwrap());
    }

    #[test]
    fn type_errors() {
        let atom = ui32("DOGS", 3);
        assert!(matches!(
            eval_on("@data", &atom, 1, 1),
            Err(CodecError::PredicateType(_))
        ));
        assert!(matches!(
            eval_on("@name + 1", &atom, 1, 1),
            Err(CodecError::PredicateType(_))
        ));
        assert!(matches!(
            eval_on("@data and @data = 3", &atom, 1, 1),
            Err(CodecError::PredicateType(_))
        ));
    }

    #[test]
    fn string_data_compares_textually() {
        let mut atom = Atom::new("NAME", AtomType::CSTR).unwrap();
        atom.set_string("fido").unwrap();
        assert!(eval_on("@data = 'fido'", &atom, 1, 1).unwrap());
    }

    #[test]
    fn float_data_mixes_with_integer_literals() {
        let mut atom = Atom::new("RATE", AtomType::UF32).unwrap();
        atom.set_float(1.5).unwrap();
        assert!(eval_on("@data = 1.5", &atom, 1, 1).unwrap());
        assert!(eval_on("@data > 1", &atom, 1, 1).unwrap());
        assert!(eval_on("@data * 2 = 3", &atom, 1, 1).unwrap());
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let atom = ui32("DOGS", 3);
        // not (@data = 4) and (@data = 3)
        assert!(eval_on("not @data = 4 and @data = 3", &atom, 1, 1).unwrap());
    }
}
