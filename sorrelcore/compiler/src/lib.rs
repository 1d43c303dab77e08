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

//! IR → bytecode emitter: one emit pass appending opcodes and recording
//! label positions plus fixups, then a fixup pass rewriting every
//! placeholder as a signed 16-bit relative offset.

use std::collections::HashMap;

use log::debug;
use sorrel_bytecode::{Chunk, Op};
use sorrel_common::{Result, SorrelError};
use sorrel_ir::{Ir, IrValue};

pub mod service;

/// Compile an IR list into executable bytecode. Always ends in HALT.
pub fn compile(ir: &[Ir]) -> Result<Vec<u8>> {
    let mut e = Emitter::new();
    for node in ir {
        e.emit_node(node)?;
    }
    e.chunk.push_op(Op::Halt);
    e.fixup()?;
    debug!(
        "emitted {} bytes, {} labels, {} locals",
        e.chunk.here(),
        e.labels.len(),
        e.next_slot
    );
    Ok(e.chunk.code)
}

// Per-compilation builder state: label table, fixup list, local-slot
// counter. Instantiated once per compile() call.
struct Emitter {
    chunk: Chunk,
    labels: HashMap<String, usize>,
    fixups: Vec<(usize, String)>,
    slots: HashMap<String, u32>,
    next_slot: u32,
    next_label: u32,
}

impl Emitter {
    fn new() -> Self {
        Self {
            chunk: Chunk::default(),
            labels: HashMap::new(),
            fixups: Vec::new(),
            slots: HashMap::new(),
            next_slot: 0,
            next_label: 0,
        }
    }

    // ---- labels and fixups ----

    fn fresh_label(&mut self) -> String {
        let l = format!("L{}", self.next_label);
        self.next_label += 1;
        l
    }

    fn bind_label(&mut self, name: &str) -> Result<()> {
        if self.labels.insert(name.to_string(), self.chunk.here()).is_some() {
            return Err(SorrelError::Emit { msg: format!("duplicate label '{}'", name) });
        }
        Ok(())
    }

    fn emit_jump(&mut self, op: Op, label: &str) {
        self.chunk.push_op(op);
        let pos = self.chunk.emit_i16_placeholder();
        self.fixups.push((pos, label.to_string()));
    }

    // Offsets are relative to the byte after the placeholder:
    // target == position + 2 + offset.
    fn fixup(&mut self) -> Result<()> {
        for (pos, label) in &self.fixups {
            let target = *self.labels.get(label).ok_or_else(|| SorrelError::Emit {
                msg: format!("unresolved label '{}'", label),
            })?;
            let rel = target as isize - (*pos as isize + 2);
            let rel = i16::try_from(rel).map_err(|_| SorrelError::Emit {
                msg: format!("jump to '{}' out of 16-bit range", label),
            })?;
            self.chunk.patch_i16_at(*pos, rel);
        }
        Ok(())
    }

    // ---- local slots ----

    // First assignment reserves the next slot; reads of a never-assigned
    // name are faults, so slot numbering follows assignment order exactly.
    fn slot_for_assign(&mut self, name: &str) -> u32 {
        if let Some(&s) = self.slots.get(name) { return s; }
        let s = self.next_slot;
        self.slots.insert(name.to_string(), s);
        self.next_slot += 1;
        s
    }

    fn slot_for_read(&self, name: &str) -> Result<u32> {
        self.slots.get(name).copied().ok_or_else(|| SorrelError::Emit {
            msg: format!("undefined variable '{}'", name),
        })
    }

    // ---- emission ----

    fn emit_node(&mut self, node: &Ir) -> Result<()> {
        match node {
            Ir::Const(v) => self.emit_const(v)?,
            Ir::Var(name) => {
                let slot = self.slot_for_read(name)?;
                self.chunk.push_op(Op::Load);
                self.chunk.push_i32(slot as i32);
            }
            Ir::Let { name, value } => {
                self.emit_node(value)?;
                let slot = self.slot_for_assign(name);
                self.chunk.push_op(Op::Store);
                self.chunk.push_i32(slot as i32);
            }
            Ir::Print(e) => {
                self.emit_node(e)?;
                self.chunk.push_op(Op::Print);
            }
            Ir::Binary { op, lhs, rhs } => {
                self.emit_node(lhs)?;
                self.emit_node(rhs)?;
                self.emit_binop(op)?;
            }
            Ir::Unary { op, operand } => {
                self.emit_node(operand)?;
                match *op {
                    "-" => self.chunk.push_op(Op::Neg),
                    "NOT" => self.chunk.push_op(Op::Not),
                    other => {
                        return Err(SorrelError::Emit { msg: format!("unknown unary operator '{}'", other) })
                    }
                }
            }
            Ir::Call { name, .. } => {
                return Err(SorrelError::Emit {
                    msg: format!("call to '{}' is not implemented", name),
                });
            }
            Ir::If { cond, then_body, else_body } => self.emit_if(cond, then_body, else_body.as_deref())?,
            Ir::While { cond, body } => self.emit_while(cond, body)?,
            Ir::Repeat { body, cond } => self.emit_repeat(body, cond)?,
            Ir::For { var, from, to, step, body } => self.emit_for(var, from, to, step.as_deref(), body)?,
            Ir::Input(names) => {
                for name in names {
                    self.chunk.push_op(Op::Input);
                    let slot = self.slot_for_assign(name);
                    self.chunk.push_op(Op::Store);
                    self.chunk.push_i32(slot as i32);
                }
            }
            Ir::Goto(label) => self.emit_jump(Op::Jmp, label),
            Ir::Label(name) => self.bind_label(name)?,
            Ir::Index { target, index } => {
                self.emit_node(target)?;
                self.emit_node(index)?;
                self.chunk.push_op(Op::GetIndex);
            }
            Ir::StoreIndex { target, index, value } => {
                self.emit_node(target)?;
                self.emit_node(index)?;
                self.emit_node(value)?;
                self.chunk.push_op(Op::SetIndex);
            }
            Ir::NewArray { size, .. } => {
                self.emit_node(size)?;
                self.chunk.push_op(Op::NewArray);
            }
        }
        Ok(())
    }

    fn emit_const(&mut self, v: &IrValue) -> Result<()> {
        match v {
            IrValue::Int(i) => {
                let imm = i32::try_from(*i).map_err(|_| SorrelError::Emit {
                    msg: format!("integer constant {} out of PUSH range", i),
                })?;
                self.emit_push_int(imm);
            }
            IrValue::Float(f) => {
                return Err(SorrelError::Emit {
                    msg: format!("float constant {} is not emittable", f),
                });
            }
            IrValue::Str(s) => {
                self.chunk.push_op(Op::Pushs);
                self.chunk.push_str(s);
            }
        }
        Ok(())
    }

    fn emit_push_int(&mut self, v: i32) {
        self.chunk.push_op(Op::Push);
        self.chunk.push_i32(v);
    }

    // The opcode set has no direct < <= > >=; they expand over CMP, which
    // pushes -1/0/+1. The two-sided forms keep the CMP result with DUP so
    // both sentinel tests see it.
    fn emit_binop(&mut self, op: &str) -> Result<()> {
        match op {
            "+" => self.chunk.push_op(Op::Add),
            "-" => self.chunk.push_op(Op::Sub),
            "*" => self.chunk.push_op(Op::Mul),
            "/" => self.chunk.push_op(Op::Div),
            "%" => self.chunk.push_op(Op::Mod),
            "==" => self.chunk.push_op(Op::Eq),
            "!=" => self.chunk.push_op(Op::Neq),
            "AND" => self.chunk.push_op(Op::And),
            "OR" => self.chunk.push_op(Op::Or),
            "<" => {
                self.chunk.push_op(Op::Cmp);
                self.emit_push_int(-1);
                self.chunk.push_op(Op::Eq);
            }
            ">" => {
                self.chunk.push_op(Op::Cmp);
                self.emit_push_int(1);
                self.chunk.push_op(Op::Eq);
            }
            "<=" => self.emit_cmp_or_equal(-1),
            ">=" => self.emit_cmp_or_equal(1),
            "^" => {
                return Err(SorrelError::Emit { msg: "operator '^' is not implemented".into() });
            }
            other => {
                return Err(SorrelError::Emit { msg: format!("unknown operator '{}'", other) });
            }
        }
        Ok(())
    }

    // CMP; DUP; PUSH(sentinel); EQ; SWAP; PUSH(0); EQ; OR
    // leaves true iff cmp == sentinel or cmp == 0.
    fn emit_cmp_or_equal(&mut self, sentinel: i32) {
        self.chunk.push_op(Op::Cmp);
        self.chunk.push_op(Op::Dup);
        self.emit_push_int(sentinel);
        self.chunk.push_op(Op::Eq);
        self.chunk.push_op(Op::Swap);
        self.emit_push_int(0);
        self.chunk.push_op(Op::Eq);
        self.chunk.push_op(Op::Or);
    }

    fn emit_if(&mut self, cond: &Ir, then_body: &[Ir], else_body: Option<&[Ir]>) -> Result<()> {
        self.emit_node(cond)?;
        let end = self.fresh_label();
        match else_body {
            Some(else_body) => {
                let els = self.fresh_label();
                self.emit_jump(Op::Jz, &els);
                for n in then_body { self.emit_node(n)?; }
                self.emit_jump(Op::Jmp, &end);
                self.bind_label(&els)?;
                for n in else_body { self.emit_node(n)?; }
            }
            None => {
                self.emit_jump(Op::Jz, &end);
                for n in then_body { self.emit_node(n)?; }
            }
        }
        self.bind_label(&end)
    }

    fn emit_while(&mut self, cond: &Ir, body: &[Ir]) -> Result<()> {
        let start = self.fresh_label();
        let end = self.fresh_label();
        self.bind_label(&start)?;
        self.emit_node(cond)?;
        self.emit_jump(Op::Jz, &end);
        for n in body { self.emit_node(n)?; }
        self.emit_jump(Op::Jmp, &start);
        self.bind_label(&end)
    }

    // Loop while the condition is false: JZ back to the start.
    fn emit_repeat(&mut self, body: &[Ir], cond: &Ir) -> Result<()> {
        let start = self.fresh_label();
        self.bind_label(&start)?;
        for n in body { self.emit_node(n)?; }
        self.emit_node(cond)?;
        self.emit_jump(Op::Jz, &start);
        Ok(())
    }

    // FOR v = from TO to [STEP s]: the exit test fires when CMP yields +1
    // (v has passed to), so the body still runs for v == to and a step that
    // skips past `to` terminates. Step sign is not validated.
    fn emit_for(
        &mut self,
        var: &str,
        from: &Ir,
        to: &Ir,
        step: Option<&Ir>,
        body: &[Ir],
    ) -> Result<()> {
        self.emit_node(from)?;
        let slot = self.slot_for_assign(var);
        self.chunk.push_op(Op::Store);
        self.chunk.push_i32(slot as i32);

        let start = self.fresh_label();
        let end = self.fresh_label();
        self.bind_label(&start)?;

        self.chunk.push_op(Op::Load);
        self.chunk.push_i32(slot as i32);
        self.emit_node(to)?;
        self.chunk.push_op(Op::Cmp);
        self.emit_push_int(1);
        self.chunk.push_op(Op::Eq);
        self.emit_jump(Op::Jnz, &end);

        for n in body { self.emit_node(n)?; }

        // v = v + step (default 1)
        self.chunk.push_op(Op::Load);
        self.chunk.push_i32(slot as i32);
        match step {
            Some(s) => self.emit_node(s)?,
            None => self.emit_push_int(1),
        }
        self.chunk.push_op(Op::Add);
        self.chunk.push_op(Op::Store);
        self.chunk.push_i32(slot as i32);

        self.emit_jump(Op::Jmp, &start);
        self.bind_label(&end)
    }
}
