//! Intermediate representation and the AST → IR lowering pass. The IR is a
//! flatter language shaped for direct bytecode emission: operators become
//! textual tokens, builtins become named calls, CONTINUE/EXIT become gotos
//! to reserved labels.

use sorrel_ast::{BinOp, Expr, ExprKind, Program, Stmt, StmtKind, UnOp};
use sorrel_common::{Result, SorrelError};

/// Reserved goto targets for CONTINUE and EXIT; the emitter does not place
/// these labels yet, so using either statement faults at emission time.
pub const CONTINUE_LABEL: &str = "__continue__";
pub const BREAK_LABEL: &str = "__break__";

#[derive(Debug, Clone, PartialEq)]
pub enum IrValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl IrValue {
    pub fn type_tag(&self) -> &'static str {
        match self {
            IrValue::Int(_) => "INT",
            IrValue::Float(_) => "FLOAT",
            IrValue::Str(_) => "STRING",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ir {
    Const(IrValue),
    Var(String),
    Let { name: String, value: Box<Ir> },
    Print(Box<Ir>),
    Binary { op: &'static str, lhs: Box<Ir>, rhs: Box<Ir> },
    Unary { op: &'static str, operand: Box<Ir> },
    Call { name: String, args: Vec<Ir> },
    If { cond: Box<Ir>, then_body: Vec<Ir>, else_body: Option<Vec<Ir>> },
    While { cond: Box<Ir>, body: Vec<Ir> },
    Repeat { body: Vec<Ir>, cond: Box<Ir> },
    For { var: String, from: Box<Ir>, to: Box<Ir>, step: Option<Box<Ir>>, body: Vec<Ir> },
    Input(Vec<String>),
    Goto(String),
    Label(String),
    Index { target: Box<Ir>, index: Box<Ir> },
    StoreIndex { target: Box<Ir>, index: Box<Ir>, value: Box<Ir> },
    NewArray { size: Box<Ir>, elem: String },
}

/// Lower a parsed program into the flat IR list.
pub fn lower(prog: &Program) -> Result<Vec<Ir>> {
    let mut out = Vec::new();
    for stmt in prog {
        lower_stmt(stmt, &mut out)?;
    }
    Ok(out)
}

fn lower_stmt(stmt: &Stmt, out: &mut Vec<Ir>) -> Result<()> {
    match &stmt.kind {
        StmtKind::Print(exprs) => {
            // Comma-separated PRINT arguments are parsed, but only the first
            // one survives lowering; an empty PRINT emits a blank line.
            let first = match exprs.first() {
                Some(e) => lower_expr(e)?,
                None => Ir::Const(IrValue::Str(String::new())),
            };
            out.push(Ir::Print(Box::new(first)));
        }
        StmtKind::Let { name, value } => {
            out.push(Ir::Let { name: name.clone(), value: Box::new(lower_expr(value)?) });
        }
        StmtKind::AssignIndex { name, index, value } => {
            out.push(Ir::StoreIndex {
                target: Box::new(Ir::Var(name.clone())),
                index: Box::new(lower_expr(index)?),
                value: Box::new(lower_expr(value)?),
            });
        }
        StmtKind::If { cond, then_body, else_body } => {
            let mut then_ir = Vec::new();
            for s in then_body { lower_stmt(s, &mut then_ir)?; }
            let else_ir = match else_body {
                Some(body) => {
                    let mut v = Vec::new();
                    for s in body { lower_stmt(s, &mut v)?; }
                    Some(v)
                }
                None => None,
            };
            out.push(Ir::If { cond: Box::new(lower_expr(cond)?), then_body: then_ir, else_body: else_ir });
        }
        StmtKind::While { cond, body } => {
            let mut body_ir = Vec::new();
            for s in body { lower_stmt(s, &mut body_ir)?; }
            out.push(Ir::While { cond: Box::new(lower_expr(cond)?), body: body_ir });
        }
        StmtKind::Repeat { body, cond } => {
            let mut body_ir = Vec::new();
            for s in body { lower_stmt(s, &mut body_ir)?; }
            out.push(Ir::Repeat { body: body_ir, cond: Box::new(lower_expr(cond)?) });
        }
        StmtKind::For { var, from, to, step, body } => {
            let mut body_ir = Vec::new();
            for s in body { lower_stmt(s, &mut body_ir)?; }
            let step_ir = match step {
                Some(e) => Some(Box::new(lower_expr(e)?)),
                None => None,
            };
            out.push(Ir::For {
                var: var.clone(),
                from: Box::new(lower_expr(from)?),
                to: Box::new(lower_expr(to)?),
                step: step_ir,
                body: body_ir,
            });
        }
        StmtKind::Input(ids) => {
            out.push(Ir::Input(ids.clone()));
        }
        StmtKind::Continue => out.push(Ir::Goto(CONTINUE_LABEL.to_string())),
        StmtKind::Exit => out.push(Ir::Goto(BREAK_LABEL.to_string())),
    }
    Ok(())
}

fn lower_expr(expr: &Expr) -> Result<Ir> {
    Ok(match &expr.kind {
        ExprKind::Number(text) => Ir::Const(lower_number(text, expr.line)?),
        ExprKind::Str(s) => Ir::Const(IrValue::Str(s.clone())),
        ExprKind::Var(name) => Ir::Var(name.clone()),
        ExprKind::Binary { op, lhs, rhs } => Ir::Binary {
            op: binop_token(*op),
            lhs: Box::new(lower_expr(lhs)?),
            rhs: Box::new(lower_expr(rhs)?),
        },
        ExprKind::Unary { op, operand } => Ir::Unary {
            op: match op { UnOp::Neg => "-", UnOp::Not => "NOT" },
            operand: Box::new(lower_expr(operand)?),
        },
        ExprKind::FuncCall { builtin, args } => Ir::Call {
            name: builtin.name().to_string(),
            args: lower_exprs(args)?,
        },
        ExprKind::CustomCall { name, args } => Ir::Call {
            name: name.clone(),
            args: lower_exprs(args)?,
        },
        ExprKind::Index { target, index } => Ir::Index {
            target: Box::new(lower_expr(target)?),
            index: Box::new(lower_expr(index)?),
        },
        ExprKind::NewArray { size } => Ir::NewArray {
            size: Box::new(lower_expr(size)?),
            elem: "any".to_string(),
        },
    })
}

fn lower_exprs(exprs: &[Expr]) -> Result<Vec<Ir>> {
    exprs.iter().map(lower_expr).collect()
}

// A dot makes a FLOAT constant, otherwise INT. The lexer guarantees digit
// shape; range still has to be checked here.
fn lower_number(text: &str, line: u32) -> Result<IrValue> {
    if text.contains('.') {
        let f: f64 = text.parse().map_err(|_| SorrelError::Parse {
            line,
            msg: format!("invalid number literal '{}'", text),
        })?;
        Ok(IrValue::Float(f))
    } else {
        let n: i64 = text.parse().map_err(|_| SorrelError::Parse {
            line,
            msg: format!("integer literal '{}' out of range", text),
        })?;
        Ok(IrValue::Int(n))
    }
}

// Operators travel as textual tokens so the emitter does not depend on the
// parser's enums.
fn binop_token(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Pow => "^",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::And => "AND",
        BinOp::Or => "OR",
    }
}
