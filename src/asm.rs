//! A small two-pass assembler.
//!
//! One statement per line: an optional `label:`, then either an instruction or
//! a `.byte` list. Everything after `;` is a comment.
//!
//! ```text
//! start:  LDA #$01        ; immediate
//!         STA $0400,X     ; absolute indexed
//!         LDA ($20),Y     ; indirect indexed
//!         ASL A
//!         BNE start
//!         .byte 1, $02, %11
//! ```
//!
//! Addressing modes are picked from the operand syntax alone, so the size of
//! every statement is known in the first pass. A numeric operand that fits in
//! one byte selects the zero page form when the instruction has one; a label
//! always selects the absolute form.

use crate::error::AsmError;
use crate::prog::Program;
use crate::six502::{find_opcode, AddressingMode, Op, MEM_SIZE};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{alpha1, alphanumeric1, char, digit1, hex_digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::{many0_count, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Num(u32),
    Label(String),
}

// operand as written, before a mode is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
enum Syntax {
    None,
    Accumulator,
    Immediate(Expr),
    Direct(Expr),
    IndexedX(Expr),
    IndexedY(Expr),
    Indirect(Expr),
    IndirectX(Expr),
    IndirectY(Expr),
}

impl Syntax {
    fn expr(&self) -> Option<&Expr> {
        match self {
            Syntax::None | Syntax::Accumulator => None,
            Syntax::Immediate(e)
            | Syntax::Direct(e)
            | Syntax::IndexedX(e)
            | Syntax::IndexedY(e)
            | Syntax::Indirect(e)
            | Syntax::IndirectX(e)
            | Syntax::IndirectY(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Bytes(Vec<Expr>),
    Instr { mnemonic: String, operand: Syntax },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Statement {
    label: Option<String>,
    item: Option<Item>,
}

fn number(input: &str) -> IResult<&str, u32> {
    alt((
        preceded(
            char('$'),
            map_res(hex_digit1, |s: &str| u32::from_str_radix(s, 16)),
        ),
        preceded(
            char('%'),
            map_res(take_while1(|c: char| c == '0' || c == '1'), |s: &str| {
                u32::from_str_radix(s, 2)
            }),
        ),
        map_res(digit1, |s: &str| s.parse::<u32>()),
    ))(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(number, Expr::Num),
        map(ident, |s| Expr::Label(s.to_string())),
    ))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn open(input: &str) -> IResult<&str, char> {
    terminated(char('('), space0)(input)
}

fn close(input: &str) -> IResult<&str, char> {
    preceded(space0, char(')'))(input)
}

// operands that open with `#` or `(` may follow the mnemonic without a space
fn marked_operand(input: &str) -> IResult<&str, Syntax> {
    alt((
        map(preceded(pair(char('#'), space0), expr), Syntax::Immediate),
        // (n,X) and (n),Y before (n), which would stop at the closing paren
        map(
            delimited(open, expr, pair(comma, pair(tag_no_case("x"), close))),
            Syntax::IndirectX,
        ),
        map(
            delimited(open, expr, pair(close, pair(comma, tag_no_case("y")))),
            Syntax::IndirectY,
        ),
        map(delimited(open, expr, close), Syntax::Indirect),
    ))(input)
}

fn operand(input: &str) -> IResult<&str, Syntax> {
    alt((
        marked_operand,
        map(terminated(expr, pair(comma, tag_no_case("x"))), Syntax::IndexedX),
        map(terminated(expr, pair(comma, tag_no_case("y"))), Syntax::IndexedY),
        map(expr, |e| match e {
            Expr::Label(ref l) if l.eq_ignore_ascii_case("a") => Syntax::Accumulator,
            e => Syntax::Direct(e),
        }),
    ))(input)
}

fn bytes_directive(input: &str) -> IResult<&str, Item> {
    map(
        preceded(pair(tag_no_case(".byte"), space1), separated_list1(comma, expr)),
        Item::Bytes,
    )(input)
}

fn instruction(input: &str) -> IResult<&str, Item> {
    map(
        pair(alpha1, opt(alt((preceded(space1, operand), marked_operand)))),
        |(mnemonic, operand): (&str, Option<Syntax>)| Item::Instr {
            mnemonic: mnemonic.to_string(),
            operand: operand.unwrap_or(Syntax::None),
        },
    )(input)
}

fn statement(input: &str) -> IResult<&str, Statement> {
    map(
        all_consuming(tuple((
            opt(terminated(ident, pair(space0, char(':')))),
            space0,
            opt(alt((bytes_directive, instruction))),
            space0,
        ))),
        |(label, _, item, _)| Statement {
            label: label.map(str::to_string),
            item,
        },
    )(input)
}

fn parse_line(line: usize, text: &str) -> Result<Statement, AsmError> {
    let code = text.split(';').next().unwrap_or("").trim();
    statement(code)
        .map(|(_, stmt)| stmt)
        .map_err(|_| AsmError::Syntax {
            line,
            text: code.to_string(),
        })
}

fn is_branch(op: Op) -> bool {
    find_opcode(op, AddressingMode::Relative).is_some()
}

fn select_mode(line: usize, op: Op, operand: &Syntax) -> Result<AddressingMode, AsmError> {
    use AddressingMode::*;
    let has = |mode| find_opcode(op, mode).is_some();
    let zp_or_abs = |e: &Expr, zp, abs| match e {
        Expr::Num(n) if *n <= 0xff && has(zp) => zp,
        _ => abs,
    };

    let mode = match operand {
        // a bare shift works on A. INC and DEC on A are an extension and must say so
        Syntax::None if !has(Implied) && has(Accumulator) && !matches!(op, Op::INC | Op::DEC) => {
            Accumulator
        }
        Syntax::None => Implied,
        Syntax::Accumulator => Accumulator,
        Syntax::Immediate(_) => Immediate,
        Syntax::Direct(_) if is_branch(op) => Relative,
        Syntax::Direct(e) => zp_or_abs(e, ZeroPage, Absolute),
        Syntax::IndexedX(e) => zp_or_abs(e, ZeroPageX, AbsoluteX),
        Syntax::IndexedY(e) => zp_or_abs(e, ZeroPageY, AbsoluteY),
        Syntax::Indirect(_) => Indirect,
        Syntax::IndirectX(_) => IndirectX,
        Syntax::IndirectY(_) => IndirectY,
    };

    if has(mode) {
        Ok(mode)
    } else {
        Err(AsmError::InvalidMode {
            line,
            mnemonic: op.mnemonic(),
            mode,
        })
    }
}

// a statement after the first pass: its address and what it will emit
enum Placed {
    Bytes(Vec<Expr>),
    Instr {
        opcode: u8,
        mode: AddressingMode,
        operand: Option<Expr>,
    },
}

struct Line {
    line: usize,
    pc: u32,
    body: Placed,
}

fn value(line: usize, e: &Expr, labels: &HashMap<String, u32>) -> Result<u32, AsmError> {
    match e {
        Expr::Num(n) => Ok(*n),
        Expr::Label(l) => labels
            .get(l)
            .copied()
            .ok_or_else(|| AsmError::UndefinedLabel {
                line,
                label: l.clone(),
            }),
    }
}

fn check(line: usize, v: u32, bytes: u8) -> Result<u32, AsmError> {
    let max = if bytes == 1 { 0xff } else { 0xffff };
    if v > max {
        return Err(AsmError::ValueOutOfRange {
            line,
            value: v,
            bytes,
        });
    }
    Ok(v)
}

/// Assembles `source` into a program image that starts at `origin`.
pub fn assemble(source: &str, origin: u16) -> Result<Program, AsmError> {
    let mut labels: HashMap<String, u32> = HashMap::new();
    let mut lines = Vec::new();
    let mut pc = origin as u32;

    // pass 1: parse, choose modes, place labels
    for (i, text) in source.lines().enumerate() {
        let line = i + 1;
        let stmt = parse_line(line, text)?;

        if let Some(label) = stmt.label {
            if labels.contains_key(&label) {
                return Err(AsmError::DuplicateLabel { line, label });
            }
            labels.insert(label, pc);
        }

        let body = match stmt.item {
            None => continue,
            Some(Item::Bytes(list)) => Placed::Bytes(list),
            Some(Item::Instr { mnemonic, operand }) => {
                let op: Op = mnemonic
                    .parse()
                    .map_err(|_| AsmError::UnknownMnemonic { line, mnemonic })?;
                let mode = select_mode(line, op, &operand)?;
                let opcode = find_opcode(op, mode).ok_or(AsmError::InvalidMode {
                    line,
                    mnemonic: op.mnemonic(),
                    mode,
                })?;
                Placed::Instr {
                    opcode,
                    mode,
                    operand: operand.expr().cloned(),
                }
            }
        };

        let size = match &body {
            Placed::Bytes(list) => list.len() as u32,
            Placed::Instr { mode, .. } => 1 + mode.operand_len() as u32,
        };
        lines.push(Line { line, pc, body });
        pc += size;
    }

    let len = (pc - origin as u32) as usize;
    if origin as usize + len > MEM_SIZE {
        return Err(AsmError::TooLarge { origin, len });
    }

    // pass 2: resolve operands and emit
    let mut out = Vec::with_capacity(len);
    for Line { line, pc, body } in &lines {
        let line = *line;
        match body {
            Placed::Bytes(list) => {
                for e in list {
                    out.push(check(line, value(line, e, &labels)?, 1)? as u8);
                }
            }
            Placed::Instr {
                opcode,
                mode,
                operand,
            } => {
                out.push(*opcode);
                let Some(e) = operand else { continue };
                let v = value(line, e, &labels)?;
                match (mode, mode.operand_len()) {
                    (AddressingMode::Relative, _) => {
                        let target = check(line, v, 2)? as i32;
                        let offset = target - (*pc as i32 + 2);
                        if !(-128..=127).contains(&offset) {
                            return Err(AsmError::BranchOutOfRange { line, offset });
                        }
                        out.push(offset as i8 as u8);
                    }
                    (_, 1) => out.push(check(line, v, 1)? as u8),
                    (_, _) => {
                        let w = check(line, v, 2)? as u16;
                        out.extend_from_slice(&w.to_le_bytes());
                    }
                }
            }
        }
    }

    debug!(
        "assembled {} bytes at ${:04X}, {} labels",
        out.len(),
        origin,
        labels.len()
    );
    Program::new(origin, out).map_err(|_| AsmError::TooLarge { origin, len })
}
