/*

 ▄▄▄▄    ██▓    ▄▄▄       ▄████▄   ██ ▄█▀ ██▀███   █    ██   ██████  ██░ ██
▓█████▄ ▓██▒   ▒████▄    ▒██▀ ▀█   ██▄█▒ ▓██ ▒ ██▒ ██  ▓██▒▒██    ▒ ▓██░ ██▒
▒██▒ ▄██▒██░   ▒██  ▀█▄  ▒▓█    ▄ ▓███▄░ ▓██ ░▄█ ▒▓██  ▒██░░ ▓██▄   ▒██▀▀██░
▒██░█▀  ▒██░   ░██▄▄▄▄██ ▒▓▓▄ ▄██▒▓██ █▄ ▒██▀▀█▄  ▓▓█  ░██░  ▒   ██▒░▓█ ░██
░▓█  ▀█▓░██████▒▓█   ▓██▒▒ ▓███▀ ░▒██▒ █▄░██▓ ▒██▒▒▒█████▓ ▒██████▒▒░▓█▒░██▓
░▒▓███▀▒░ ▒░▓  ░▒▒   ▓▒█░░ ░▒ ▒  ░▒ ▒▒ ▓▒░ ▒▓ ░▒▓░░▒▓▒ ▒ ▒ ▒ ▒▓▒ ▒ ░ ▒ ░░▒░▒
▒░▒   ░ ░ ░ ▒  ░ ▒   ▒▒ ░  ░  ▒   ░ ░▒ ▒░  ░▒ ░ ▒░░░▒░ ░ ░ ░ ░▒  ░ ░ ▒ ░▒░ ░
 ░    ░   ░ ░    ░   ▒   ░        ░ ░░ ░   ░░   ░  ░░░ ░ ░ ░  ░  ░   ░  ░░ ░
 ░          ░  ░     ░  ░░ ░      ░  ░      ░        ░           ░   ░  ░  ░
      ░                  ░
Copyright (C) 2026, Blackrush LLC, All Rights Reserved
Created by Erik Olson, Tarpon Springs, Florida
For more information, visit BlackrushDrive.com

MIT License

Copyright (c) 2026 Erik Lee Olson for Blackrush, LLC

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.

*/

//! Recursive-descent parser with precedence climbing for expressions.
//! LL(1) over a pre-tokenized list; statements are line-terminated, blocks
//! close on their keyword (END IF, WEND, UNTIL, NEXT).

use sorrel_common::{Result, SorrelError};
use sorrel_lexer::{Lexer, Token, TokenKind};
use sorrel_ast::{BinOp, Builtin, Expr, ExprKind, Program, Stmt, StmtKind, UnOp};

/// Tokenize and parse in one go.
pub fn parse(src: &str) -> Result<Program> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_program()
}

pub struct Parser { tokens: Vec<Token>, i: usize }

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self { Self { tokens, i: 0 } }

    pub fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.check(TokenKind::Eof) { break; }
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let line = self.peek_line();

        if self.match_k(TokenKind::Print) {
            let mut exprs = Vec::new();
            if !self.at_stmt_end() {
                exprs.push(self.parse_expr()?);
                while self.match_k(TokenKind::Comma) {
                    exprs.push(self.parse_expr()?);
                }
            }
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Print(exprs), line });
        }

        if self.match_k(TokenKind::Let) {
            let name = self.expect_ident()?;
            // LET name[index] = expr assigns through the array reference
            if self.match_k(TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expr()?;
                self.terminate_stmt()?;
                return Ok(Stmt { kind: StmtKind::AssignIndex { name, index, value }, line });
            }
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expr()?;
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Let { name, value }, line });
        }

        if self.match_k(TokenKind::If) {
            let cond = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let then_body = self.parse_block(&[TokenKind::Else, TokenKind::End], "IF")?;
            let else_body = if self.match_k(TokenKind::Else) {
                Some(self.parse_block(&[TokenKind::End], "ELSE")?)
            } else {
                None
            };
            self.expect(TokenKind::End)?;
            self.expect(TokenKind::If)?;
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::If { cond, then_body, else_body }, line });
        }

        if self.match_k(TokenKind::While) {
            let cond = self.parse_expr()?;
            let body = self.parse_block(&[TokenKind::Wend], "WHILE")?;
            self.expect(TokenKind::Wend)?;
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::While { cond, body }, line });
        }

        if self.match_k(TokenKind::Repeat) {
            let body = self.parse_block(&[TokenKind::Until], "REPEAT")?;
            self.expect(TokenKind::Until)?;
            let cond = self.parse_expr()?;
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Repeat { body, cond }, line });
        }

        if self.match_k(TokenKind::For) {
            let var = self.expect_ident()?;
            self.expect(TokenKind::Assign)?;
            let from = self.parse_expr()?;
            self.expect(TokenKind::To)?;
            let to = self.parse_expr()?;
            let step = if self.match_k(TokenKind::Step) { Some(self.parse_expr()?) } else { None };
            let body = self.parse_block(&[TokenKind::Next], "FOR")?;
            self.expect(TokenKind::Next)?;
            // optional loop-variable echo after NEXT
            if self.check(TokenKind::Ident) { let _ = self.next(); }
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::For { var, from, to, step, body }, line });
        }

        if self.match_k(TokenKind::Input) {
            let mut ids = vec![self.expect_ident()?];
            while self.match_k(TokenKind::Comma) {
                ids.push(self.expect_ident()?);
            }
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Input(ids), line });
        }

        if self.match_k(TokenKind::Continue) {
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Continue, line });
        }
        if self.match_k(TokenKind::Exit) {
            self.terminate_stmt()?;
            return Ok(Stmt { kind: StmtKind::Exit, line });
        }

        let t = self.peek();
        Err(SorrelError::Parse {
            line,
            msg: format!("unexpected token {} '{}'", t.kind.name(), t.text),
        })
    }

    // Statements inside a block, up to (not consuming) one of the closers.
    // EOF before a closer is an unterminated-block fault.
    fn parse_block(&mut self, closers: &[TokenKind], what: &str) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            self.skip_separators();
            if closers.iter().any(|k| self.check(*k)) { break; }
            if self.check(TokenKind::Eof) {
                return Err(SorrelError::Parse {
                    line: self.peek_line(),
                    msg: format!("unterminated {} block", what),
                });
            }
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    // A statement ends at a newline (consumed), at EOF, or at a block-closing
    // keyword (not consumed), which allows single-line forms like
    // `IF X THEN PRINT 1 END IF`.
    fn terminate_stmt(&mut self) -> Result<()> {
        while self.match_k(TokenKind::Comment) {}
        if self.match_k(TokenKind::Newline) { return Ok(()); }
        if self.at_stmt_end() { return Ok(()); }
        let t = self.peek();
        Err(SorrelError::Parse {
            line: t.line,
            msg: format!("expected end of statement but found {} '{}'", t.kind.name(), t.text),
        })
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline
                | TokenKind::Comment
                | TokenKind::Eof
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Wend
                | TokenKind::Until
                | TokenKind::Next
        )
    }

    fn skip_separators(&mut self) {
        while self.check(TokenKind::Newline) || self.check(TokenKind::Comment) {
            self.next();
        }
    }

    // ---- expressions ----

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(1)
    }

    // Precedence climbing; all binary operators are left-associative, so the
    // right side always parses at `bp + 1`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let (op, bp) = match self.peek_binop() { Some(p) => p, None => break };
            if bp < min_bp { break; }
            self.next();
            let rhs = self.parse_expr_bp(bp + 1)?;
            let line = lhs.line;
            lhs = Expr { kind: ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, line };
        }
        Ok(lhs)
    }

    // Unary minus and NOT bind tighter than every binary operator and are
    // right-recursive: -(-x) and NOT NOT a are legal.
    fn parse_unary(&mut self) -> Result<Expr> {
        let line = self.peek_line();
        if self.match_k(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr { kind: ExprKind::Unary { op: UnOp::Neg, operand: Box::new(operand) }, line });
        }
        if self.match_k(TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expr { kind: ExprKind::Unary { op: UnOp::Not, operand: Box::new(operand) }, line });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let line = self.peek_line();
        match self.peek_kind() {
            TokenKind::LParen => {
                self.next();
                let e = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::Number => {
                let t = self.next();
                Ok(Expr { kind: ExprKind::Number(t.text), line })
            }
            TokenKind::Str => {
                let t = self.next();
                Ok(Expr { kind: ExprKind::Str(t.text), line })
            }
            TokenKind::Len => self.parse_builtin(Builtin::Len, line),
            TokenKind::Val => self.parse_builtin(Builtin::Val, line),
            TokenKind::IsNan => self.parse_builtin(Builtin::IsNan, line),
            TokenKind::Array => {
                self.next();
                self.expect(TokenKind::LParen)?;
                let size = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr { kind: ExprKind::NewArray { size: Box::new(size) }, line })
            }
            TokenKind::Ident => {
                let name = self.next().text;
                if self.match_k(TokenKind::LBracket) {
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    let target = Expr { kind: ExprKind::Var(name), line };
                    return Ok(Expr {
                        kind: ExprKind::Index { target: Box::new(target), index: Box::new(index) },
                        line,
                    });
                }
                if self.match_k(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr { kind: ExprKind::CustomCall { name, args }, line });
                }
                Ok(Expr { kind: ExprKind::Var(name), line })
            }
            _ => {
                let t = self.peek();
                Err(SorrelError::Parse {
                    line,
                    msg: format!("expected expression but found {} '{}'", t.kind.name(), t.text),
                })
            }
        }
    }

    fn parse_builtin(&mut self, builtin: Builtin, line: u32) -> Result<Expr> {
        self.next();
        self.expect(TokenKind::LParen)?;
        let args = self.parse_args()?;
        Ok(Expr { kind: ExprKind::FuncCall { builtin, args }, line })
    }

    // Comma-separated argument list; the opening paren is already consumed.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_k(TokenKind::Comma) { break; }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn peek_binop(&self) -> Option<(BinOp, u8)> {
        match self.peek_kind() {
            TokenKind::Or => Some((BinOp::Or, 1)),
            TokenKind::And => Some((BinOp::And, 2)),
            TokenKind::EqEq => Some((BinOp::Eq, 3)),
            TokenKind::BangEq => Some((BinOp::Ne, 3)),
            TokenKind::Lt => Some((BinOp::Lt, 3)),
            TokenKind::LtEq => Some((BinOp::Le, 3)),
            TokenKind::Gt => Some((BinOp::Gt, 3)),
            TokenKind::GtEq => Some((BinOp::Ge, 3)),
            TokenKind::Plus => Some((BinOp::Add, 4)),
            TokenKind::Minus => Some((BinOp::Sub, 4)),
            TokenKind::Star => Some((BinOp::Mul, 5)),
            TokenKind::Slash => Some((BinOp::Div, 5)),
            TokenKind::Percent => Some((BinOp::Mod, 5)),
            TokenKind::Caret => Some((BinOp::Pow, 6)),
            _ => None,
        }
    }

    // small helpers
    fn expect(&mut self, k: TokenKind) -> Result<Token> {
        if self.check(k) {
            Ok(self.next())
        } else {
            let t = self.peek();
            Err(SorrelError::Parse {
                line: t.line,
                msg: format!("expected {} but found {} '{}'", k.name(), t.kind.name(), t.text),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        if self.check(TokenKind::Ident) {
            Ok(self.next().text)
        } else {
            let t = self.peek();
            Err(SorrelError::Parse {
                line: t.line,
                msg: format!("expected identifier but found {} '{}'", t.kind.name(), t.text),
            })
        }
    }

    fn check(&self, k: TokenKind) -> bool { self.peek_kind() == k }
    fn match_k(&mut self, k: TokenKind) -> bool {
        if self.check(k) { self.next(); true } else { false }
    }
    fn peek(&self) -> &Token {
        self.tokens.get(self.i).or_else(|| self.tokens.last()).expect("token stream has EOF")
    }
    fn peek_kind(&self) -> TokenKind { self.peek().kind }
    fn peek_line(&self) -> u32 { self.peek().line }
    fn next(&mut self) -> Token {
        let t = self.peek().clone();
        if self.i < self.tokens.len() - 1 { self.i += 1; }
        t
    }
}
