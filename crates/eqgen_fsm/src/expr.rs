//! The random expression grammar.
//!
//! Two entry points share one tree type. A full expression may be a binary
//! node at any level reached through unary nodes; a simple expression never
//! contains a binary node. Binary operands are always simple.
//!
//! Unary nodes recurse, so the tree is unbounded in principle. Past the
//! configured depth the unary variant is no longer drawn, which caps the
//! nesting without changing the shape of shallow trees.

use std::fmt;

use eqgen_common::{pick, GenErrorKind, GenRng, VarPool};
use eqgen_config::FsmConfig;
use rand::Rng;

/// A unary operator, rendered as a prefix applied to a parenthesized operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+` (unary plus)
    Plus,
    /// `-` (unary minus)
    Minus,
    /// `~` (bitwise NOT)
    BitNot,
    /// `|` (reduction OR)
    RedOr,
    /// `&` (reduction AND)
    RedAnd,
    /// `^` (reduction XOR)
    RedXor,
    /// `~^` (reduction XNOR)
    RedXnor,
    /// `!` (logical NOT)
    LogNot,
    /// `$signed` cast
    Signed,
    /// `$unsigned` cast
    Unsigned,
}

impl UnaryOp {
    /// Every unary operator, in draw order.
    pub const ALL: [UnaryOp; 10] = [
        UnaryOp::Plus,
        UnaryOp::Minus,
        UnaryOp::BitNot,
        UnaryOp::RedOr,
        UnaryOp::RedAnd,
        UnaryOp::RedXor,
        UnaryOp::RedXnor,
        UnaryOp::LogNot,
        UnaryOp::Signed,
        UnaryOp::Unsigned,
    ];

    /// Returns the operator as written in Verilog.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::RedOr => "|",
            UnaryOp::RedAnd => "&",
            UnaryOp::RedXor => "^",
            UnaryOp::RedXnor => "~^",
            UnaryOp::LogNot => "!",
            UnaryOp::Signed => "$signed",
            UnaryOp::Unsigned => "$unsigned",
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<<<`
    AShl,
    /// `>>>`
    AShr,
    /// `|`
    BitOr,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `~^`
    BitXnor,
    /// `||`
    LogOr,
    /// `&&`
    LogAnd,
}

impl BinaryOp {
    /// Every binary operator, in draw order.
    pub const ALL: [BinaryOp; 19] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Eq,
        BinaryOp::Neq,
        BinaryOp::Ge,
        BinaryOp::Gt,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::AShl,
        BinaryOp::AShr,
        BinaryOp::BitOr,
        BinaryOp::BitAnd,
        BinaryOp::BitXor,
        BinaryOp::BitXnor,
        BinaryOp::LogOr,
        BinaryOp::LogAnd,
    ];

    /// Returns the operator as written in Verilog.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Ge => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AShl => "<<<",
            BinaryOp::AShr => ">>>",
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitXnor => "~^",
            BinaryOp::LogOr => "||",
            BinaryOp::LogAnd => "&&",
        }
    }
}

/// A random expression tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// `(lhs op rhs)`
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `op(arg)`
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        arg: Box<Expr>,
    },
    /// A signal reference.
    Var(String),
    /// A sized decimal constant `<bits>'d<value>`, with `value < 2^bits`.
    Const {
        /// Declared width.
        bits: u32,
        /// Unsigned value.
        value: u64,
    },
}

impl Expr {
    /// Returns the nesting depth; leaves have depth 0.
    pub fn depth(&self) -> u32 {
        match self {
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
            Expr::Unary { arg, .. } => 1 + arg.depth(),
            Expr::Var(_) | Expr::Const { .. } => 0,
        }
    }

    /// Returns `true` if the tree contains no binary node.
    pub fn is_simple(&self) -> bool {
        match self {
            Expr::Binary { .. } => false,
            Expr::Unary { arg, .. } => arg.is_simple(),
            Expr::Var(_) | Expr::Const { .. } => true,
        }
    }

    /// Collects every referenced signal name, left to right.
    pub fn vars(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
            Expr::Unary { arg, .. } => arg.collect_vars(out),
            Expr::Var(name) => out.push(name),
            Expr::Const { .. } => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Unary { op, arg } => write!(f, "{}({arg})", op.symbol()),
            Expr::Var(name) => f.write_str(name),
            Expr::Const { bits, value } => write!(f, "{bits}'d{value}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Binary,
    Unary,
    Var,
    Const,
}

const FULL: [Variant; 4] = [Variant::Binary, Variant::Unary, Variant::Var, Variant::Const];
const SIMPLE: [Variant; 3] = [Variant::Unary, Variant::Var, Variant::Const];
const FULL_CAPPED: [Variant; 3] = [Variant::Binary, Variant::Var, Variant::Const];
const SIMPLE_CAPPED: [Variant; 2] = [Variant::Var, Variant::Const];

/// Draws a full expression over `vars`.
pub fn random_expr(
    rng: &mut GenRng,
    vars: &VarPool,
    cfg: &FsmConfig,
) -> Result<Expr, GenErrorKind> {
    full_at(rng, vars, cfg, 0)
}

/// Draws a simple (binary-free) expression over `vars`.
pub fn random_simple_expr(
    rng: &mut GenRng,
    vars: &VarPool,
    cfg: &FsmConfig,
) -> Result<Expr, GenErrorKind> {
    simple_at(rng, vars, cfg, 0)
}

fn full_at(
    rng: &mut GenRng,
    vars: &VarPool,
    cfg: &FsmConfig,
    depth: u32,
) -> Result<Expr, GenErrorKind> {
    let variants: &[Variant] = if depth < cfg.max_expr_depth {
        &FULL
    } else {
        &FULL_CAPPED
    };
    match *pick(rng, variants, "expression variant")? {
        Variant::Binary => {
            let op = *pick(rng, &BinaryOp::ALL, "binary operator")?;
            let lhs = simple_at(rng, vars, cfg, depth + 1)?;
            let rhs = simple_at(rng, vars, cfg, depth + 1)?;
            Ok(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }
        Variant::Unary => {
            let op = *pick(rng, &UnaryOp::ALL, "unary operator")?;
            let arg = full_at(rng, vars, cfg, depth + 1)?;
            Ok(Expr::Unary {
                op,
                arg: Box::new(arg),
            })
        }
        Variant::Var => leaf_var(rng, vars),
        Variant::Const => Ok(leaf_const(rng, cfg)),
    }
}

fn simple_at(
    rng: &mut GenRng,
    vars: &VarPool,
    cfg: &FsmConfig,
    depth: u32,
) -> Result<Expr, GenErrorKind> {
    let variants: &[Variant] = if depth < cfg.max_expr_depth {
        &SIMPLE
    } else {
        &SIMPLE_CAPPED
    };
    match *pick(rng, variants, "expression variant")? {
        Variant::Unary => {
            let op = *pick(rng, &UnaryOp::ALL, "unary operator")?;
            let arg = simple_at(rng, vars, cfg, depth + 1)?;
            Ok(Expr::Unary {
                op,
                arg: Box::new(arg),
            })
        }
        Variant::Var => leaf_var(rng, vars),
        Variant::Const => Ok(leaf_const(rng, cfg)),
        Variant::Binary => unreachable!("binary nodes are not simple"),
    }
}

fn leaf_var(rng: &mut GenRng, vars: &VarPool) -> Result<Expr, GenErrorKind> {
    vars.choose(rng).map(|v| Expr::Var(v.to_string()))
}

fn leaf_const(rng: &mut GenRng, cfg: &FsmConfig) -> Expr {
    let bits = rng.gen_range(cfg.const_bits.min..=cfg.const_bits.max);
    let value = rng.gen_range(0..=max_value(bits));
    Expr::Const { bits, value }
}

/// Largest unsigned value representable in `bits` bits.
pub(crate) fn max_value(bits: u32) -> u64 {
    (1u64 << bits) - 1
}
