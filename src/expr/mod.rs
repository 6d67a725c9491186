//! Arithmetic expressions.
//!
//! A small, general purpose evaluator for the plain arithmetic strings the
//! fitness dialect expands into, and for per-set evaluation functions over
//! `P<k>`, `W<k>` and `R<k>` variables.
//!
//! Parsed expressions are immutable trees and can be shared across threads;
//! variables are resolved at evaluation time through a caller supplied closure.
//!
//! ```rust
//! use stablematch::expr::Expr;
//!
//! let expr = Expr::parse("2 * (P1 + 1) ^ 2").unwrap();
//! let value = expr.eval_with(|name| (name == "P1").then_some(2.0)).unwrap();
//! assert_eq!(value, 18.0);
//! ```

mod parser;

use std::collections::BTreeSet;

use crate::error::ExpressionError;

/// Built-in functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Sqrt,
    Cbrt,
    Exp,
    Ln,
    Log10,
    Log2,
    Floor,
    Ceil,
    Round,
    Sin,
    Cos,
    Tan,
    Signum,
    Min,
    Max,
    Pow,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "abs" => Function::Abs,
            "sqrt" => Function::Sqrt,
            "cbrt" => Function::Cbrt,
            "exp" => Function::Exp,
            "ln" | "log" => Function::Ln,
            "log10" => Function::Log10,
            "log2" => Function::Log2,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "round" => Function::Round,
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "signum" => Function::Signum,
            "min" => Function::Min,
            "max" => Function::Max,
            "pow" => Function::Pow,
            _ => return None,
        };
        Some(function)
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Min | Function::Max | Function::Pow => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log10 => "log10",
            Function::Log2 => "log2",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Signum => "signum",
            Function::Min => "min",
            Function::Max => "max",
            Function::Pow => "pow",
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        match self {
            Function::Abs => args[0].abs(),
            Function::Sqrt => args[0].sqrt(),
            Function::Cbrt => args[0].cbrt(),
            Function::Exp => args[0].exp(),
            Function::Ln => args[0].ln(),
            Function::Log10 => args[0].log10(),
            Function::Log2 => args[0].log2(),
            Function::Floor => args[0].floor(),
            Function::Ceil => args[0].ceil(),
            Function::Round => args[0].round(),
            Function::Sin => args[0].sin(),
            Function::Cos => args[0].cos(),
            Function::Tan => args[0].tan(),
            Function::Signum => {
                if args[0] == 0.0 {
                    0.0
                } else {
                    args[0].signum()
                }
            }
            Function::Min => args[0].min(args[1]),
            Function::Max => args[0].max(args[1]),
            Function::Pow => args[0].powf(args[1]),
        }
    }
}

/// An arithmetic expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Rem(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call { function: Function, args: Vec<Expr> },
}

impl Expr {
    /// Parses an arithmetic string.
    pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
        parser::parse(source)
    }

    /// Evaluates an expression that must not reference any variable.
    pub fn eval(&self) -> Result<f64, ExpressionError> {
        self.eval_with(|_| None)
    }

    /// Evaluates the expression, looking variables up through `resolve`.
    pub fn eval_with<F>(&self, resolve: F) -> Result<f64, ExpressionError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.eval_ref(&resolve)
    }

    fn eval_ref<F>(&self, resolve: &F) -> Result<f64, ExpressionError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Variable(name) => {
                resolve(name).ok_or_else(|| ExpressionError::UnknownVariable(name.clone()))?
            }
            Expr::Neg(inner) => -inner.eval_ref(resolve)?,
            Expr::Add(l, r) => l.eval_ref(resolve)? + r.eval_ref(resolve)?,
            Expr::Sub(l, r) => l.eval_ref(resolve)? - r.eval_ref(resolve)?,
            Expr::Mul(l, r) => l.eval_ref(resolve)? * r.eval_ref(resolve)?,
            Expr::Div(l, r) => l.eval_ref(resolve)? / r.eval_ref(resolve)?,
            Expr::Rem(l, r) => l.eval_ref(resolve)? % r.eval_ref(resolve)?,
            Expr::Pow(l, r) => l.eval_ref(resolve)?.powf(r.eval_ref(resolve)?),
            Expr::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval_ref(resolve))
                    .collect::<Result<Vec<_>, _>>()?;
                function.apply(&values)
            }
        };
        Ok(value)
    }

    /// Names of every variable referenced by the expression, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                names.insert(name.clone());
            }
            Expr::Neg(inner) => inner.collect_variables(names),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Rem(l, r)
            | Expr::Pow(l, r) => {
                l.collect_variables(names);
                r.collect_variables(names);
            }
            Expr::Call { args, .. } => args.iter().for_each(|arg| arg.collect_variables(names)),
        }
    }
}

/// Parses and evaluates a variable-free arithmetic string.
pub fn evaluate(source: &str) -> Result<f64, ExpressionError> {
    Expr::parse(source)?.eval()
}
