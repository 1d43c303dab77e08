//! Source analysis for editor tooling: parse + compile a source string and
//! report diagnostics and top-level symbols without running anything.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use sorrel_ast::{Expr, ExprKind, Program, Stmt, StmtKind};
use sorrel_parser::parse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiagnosticSeverity { Error, Warning }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
    pub severity: DiagnosticSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SymbolKind { Variable, LoopCounter, Input }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub line: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerDiagnostics {
    pub errors: Vec<Diagnostic>,
    pub symbols: Vec<SymbolInfo>,
}

pub fn analyze_source(source: &str) -> CompilerDiagnostics {
    let mut out = CompilerDiagnostics::default();
    let ast: Program = match parse(source) {
        Ok(ast) => ast,
        Err(e) => {
            out.errors.push(Diagnostic {
                message: e.to_string(),
                line: e.line().unwrap_or(0),
                severity: DiagnosticSeverity::Error,
            });
            return out;
        }
    };
    collect_symbols(&ast, &mut out.symbols);
    warn_unused(&ast, &mut out.errors);
    // Surface emission faults (undefined variables, reserved surface) too;
    // they carry no line of their own.
    if let Err(e) = sorrel_ir::lower(&ast).and_then(|ir| crate::compile(&ir)) {
        out.errors.push(Diagnostic {
            message: e.to_string(),
            line: e.line().unwrap_or(0),
            severity: DiagnosticSeverity::Error,
        });
    }
    out
}

// A name that is assigned somewhere but never read is worth a warning.
// Loop counters count as read by the loop itself.
fn warn_unused(ast: &Program, errors: &mut Vec<Diagnostic>) {
    let mut assigned: HashMap<String, u32> = HashMap::new();
    let mut read: HashSet<String> = HashSet::new();
    scan_stmts(ast, &mut assigned, &mut read);
    let mut unused: Vec<(&String, &u32)> =
        assigned.iter().filter(|(name, _)| !read.contains(*name)).collect();
    unused.sort_by_key(|(_, line)| **line);
    for (name, line) in unused {
        errors.push(Diagnostic {
            message: format!("variable '{}' is assigned but never read", name),
            line: *line,
            severity: DiagnosticSeverity::Warning,
        });
    }
}

fn scan_stmts(stmts: &[Stmt], assigned: &mut HashMap<String, u32>, read: &mut HashSet<String>) {
    for s in stmts {
        match &s.kind {
            StmtKind::Let { name, value } => {
                assigned.entry(name.clone()).or_insert(s.line);
                scan_expr(value, read);
            }
            StmtKind::AssignIndex { name, index, value } => {
                // writing an element reads the array reference
                read.insert(name.clone());
                scan_expr(index, read);
                scan_expr(value, read);
            }
            StmtKind::Print(exprs) => {
                for e in exprs { scan_expr(e, read); }
            }
            StmtKind::If { cond, then_body, else_body } => {
                scan_expr(cond, read);
                scan_stmts(then_body, assigned, read);
                if let Some(eb) = else_body { scan_stmts(eb, assigned, read); }
            }
            StmtKind::While { cond, body } => {
                scan_expr(cond, read);
                scan_stmts(body, assigned, read);
            }
            StmtKind::Repeat { body, cond } => {
                scan_stmts(body, assigned, read);
                scan_expr(cond, read);
            }
            StmtKind::For { var, from, to, step, body } => {
                // the loop reads and writes its own counter
                assigned.entry(var.clone()).or_insert(s.line);
                read.insert(var.clone());
                scan_expr(from, read);
                scan_expr(to, read);
                if let Some(e) = step { scan_expr(e, read); }
                scan_stmts(body, assigned, read);
            }
            StmtKind::Input(ids) => {
                for id in ids {
                    assigned.entry(id.clone()).or_insert(s.line);
                }
            }
            StmtKind::Continue | StmtKind::Exit => {}
        }
    }
}

fn scan_expr(e: &Expr, read: &mut HashSet<String>) {
    match &e.kind {
        ExprKind::Var(name) => {
            read.insert(name.clone());
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            scan_expr(lhs, read);
            scan_expr(rhs, read);
        }
        ExprKind::Unary { operand, .. } => scan_expr(operand, read),
        ExprKind::FuncCall { args, .. } | ExprKind::CustomCall { args, .. } => {
            for a in args { scan_expr(a, read); }
        }
        ExprKind::Index { target, index } => {
            scan_expr(target, read);
            scan_expr(index, read);
        }
        ExprKind::NewArray { size } => scan_expr(size, read),
        ExprKind::Number(_) | ExprKind::Str(_) => {}
    }
}

fn collect_symbols(stmts: &[Stmt], syms: &mut Vec<SymbolInfo>) {
    for s in stmts {
        match &s.kind {
            StmtKind::Let { name, .. } => {
                syms.push(SymbolInfo { name: name.clone(), kind: SymbolKind::Variable, line: s.line });
            }
            StmtKind::For { var, body, .. } => {
                syms.push(SymbolInfo { name: var.clone(), kind: SymbolKind::LoopCounter, line: s.line });
                collect_symbols(body, syms);
            }
            StmtKind::Input(ids) => {
                for id in ids {
                    syms.push(SymbolInfo { name: id.clone(), kind: SymbolKind::Input, line: s.line });
                }
            }
            StmtKind::If { then_body, else_body, .. } => {
                collect_symbols(then_body, syms);
                if let Some(eb) = else_body { collect_symbols(eb, syms); }
            }
            StmtKind::While { body, .. } | StmtKind::Repeat { body, .. } => {
                collect_symbols(body, syms);
            }
            _ => {}
        }
    }
}
