use crate::error::{CodecError, Result};

use super::lexer::{Func, Num, Op, Token, Var};

/// One element of the compiled postfix expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Number(Num),
    Str(String),
    Var(Var),
    Func(Func),
    Op(Op),
}

enum StackEntry {
    Op(Op),
    Func(Func),
    LParen,
}

// boolean < comparison < additive < multiplicative, `not` between boolean
// and comparison as a prefix operator
fn precedence(op: Op) -> u8 {
    match op {
        Op::Or => 1,
        Op::And => 2,
        Op::Not => 3,
        Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge => 4,
        Op::Add | Op::Sub => 5,
        Op::Mul => 6,
    }
}

/// Shunting-yard compilation of a token stream into a postfix expression.
pub(crate) fn compile(tokens: Vec<Token>) -> Result<Vec<Item>> {
    let mut output = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(num) => output.push(Item::Number(num)),
            Token::Str(text) => output.push(Item::Str(text)),
            Token::Var(var) => output.push(Item::Var(var)),
            Token::Func(func) => stack.push(StackEntry::Func(func)),
            Token::Op(op) => {
                while let Some(StackEntry::Op(top)) = stack.last() {
                    // `not` is prefix and right-associative: it only yields
                    // to strictly higher precedence
                    let yields = if op == Op::Not {
                        precedence(*top) > precedence(op)
                    } else {
                        precedence(*top) >= precedence(op)
                    };
                    if !yields {
                        break;
                    }
                    output.push(Item::Op(*top));
                    stack.pop();
                }
                stack.push(StackEntry::Op(op));
            }
            Token::LParen => stack.push(StackEntry::LParen),
            Token::RParen => {
                loop {
                    match stack.pop() {
                        Some(StackEntry::Op(op)) => output.push(Item::Op(op)),
                        Some(StackEntry::LParen) => break,
                        Some(StackEntry::Func(_)) | None => {
                            return Err(CodecError::Syntax(
                                "mismatched ')' in predicate".into(),
                            ))
                        }
                    }
                }
                if let Some(StackEntry::Func(func)) = stack.last() {
                    output.push(Item::Func(*func));
                    stack.pop();
                }
            }
        }
    }
    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Op(op) => output.push(Item::Op(op)),
            StackEntry::Func(func) => output.push(Item::Func(func)),
            StackEntry::LParen => {
                return Err(CodecError::Syntax("mismatched '(' in predicate".into()))
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::lexer::tokenize;

    fn compiled(text: &str) -> Vec<Item> {
        compile(tokenize(text).unwrap()).unwrap()
    }

    #[test]
    fn precedence_orders_output() {
        // 1 + 2 * 3  =>  1 2 3 * +
        assert_eq!(
            compiled("1 + 2 * 3"),
            vec![
                Item::Number(Num::Uint(1)),
                Item::Number(Num::Uint(2)),
                Item::Number(Num::Uint(3)),
                Item::Op(Op::Mul),
                Item::Op(Op::Add),
            ]
        );
    }

    #[test]
    fn parens_override() {
        assert_eq!(
            compiled("(1 + 2) * 3"),
            vec![
                Item::Number(Num::Uint(1)),
                Item::Number(Num::Uint(2)),
                Item::Op(Op::Add),
                Item::Number(Num::Uint(3)),
                Item::Op(Op::Mul),
            ]
        );
    }

    #[test]
    fn functions_pop_after_their_parens() {
        assert_eq!(
            compiled("position() = last()"),
            vec![
                Item::Func(Func::Position),
                Item::Func(Func::Last),
                Item::Op(Op::Eq),
            ]
        );
    }

    #[test]
    fn boolean_binds_loosest() {
        // @data = 1 or @data = 2  =>  data 1 = data 2 = or
        assert_eq!(
            compiled("@data = 1 or @data = 2"),
            vec![
                Item::Var(Var::Data),
                Item::Number(Num::Uint(1)),
                Item::Op(Op::Eq),
                Item::Var(Var::Data),
                Item::Number(Num::Uint(2)),
                Item::Op(Op::Eq),
                Item::Op(Op::Or),
            ]
        );
    }

    #[test]
    fn mismatched_parens_fail() {
        assert!(matches!(
            compile(tokenize("(1 + 2").unwrap()),
            Err(CodecError::Syntax(_))
        ));
        assert!(matches!(
            compile(tokenize("1 + 2)").unwrap()),
            Err(CodecError::Syntax(_))
        ));
    }
}
