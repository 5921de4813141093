use std::collections::HashMap;

use crate::{CodeBuffer, EncodeError, Instruction, Mem, Op, Operand, Reg, Width};

/// Label name → byte offset, filled during the first pass.
pub type LabelMap = HashMap<String, usize>;

/// Encodes abstract instructions into x86-64 machine code.
///
/// Two passes: the first emits bytes, records label offsets and leaves
/// 4-byte placeholders for symbolic jump targets; the second patches each
/// placeholder with `rel32 = label - (placeholder + 4)`.
pub fn encode(instructions: &[Instruction]) -> Result<(CodeBuffer, LabelMap), EncodeError> {
    let mut encoder = Encoder::new();
    encoder.run(instructions)?;
    Ok((encoder.out, encoder.labels))
}

fn rex_byte(w: bool, r: bool, x: bool, b: bool) -> u8 {
    0x40 | ((w as u8) << 3) | ((r as u8) << 2) | ((x as u8) << 1) | (b as u8)
}

fn fits_i8(value: i64) -> bool {
    value >= -128 && value <= 127
}

fn fits_i32(value: i64) -> bool {
    value >= i64::from(i32::min_value()) && value <= i64::from(i32::max_value())
}

struct Encoder {
    out: CodeBuffer,
    labels: LabelMap,
    patches: Vec<(usize, String)>,
}

impl Encoder {
    fn new() -> Encoder {
        Encoder {
            out: CodeBuffer::new(),
            labels: LabelMap::new(),
            patches: Vec::new(),
        }
    }

    fn run(&mut self, instructions: &[Instruction]) -> Result<(), EncodeError> {
        for instr in instructions {
            if instr.op == Op::LABEL {
                if let Some(Operand::Label(name)) = instr.operand(0) {
                    self.labels.insert(name.clone(), self.out.len());
                    continue;
                }
                return Err(EncodeError::UnsupportedOperands(Op::LABEL));
            }
            self.instruction(instr)?;
        }

        for (position, label) in &self.patches {
            let target = *self
                .labels
                .get(label)
                .ok_or_else(|| EncodeError::UnresolvedLabel(label.clone()))?;
            let rel = target as i64 - (*position as i64 + 4);
            if !fits_i32(rel) {
                return Err(EncodeError::PatchOutOfRange(label.clone()));
            }
            self.out
                .patch_u32(*position, rel as u32)
                .map_err(|_| EncodeError::PatchOutOfRange(label.clone()))?;
        }

        Ok(())
    }

    fn instruction(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        match instr.op {
            Op::MOV | Op::MOVSX | Op::MOVZX | Op::LEA | Op::XCHG => self.mov(instr),
            Op::ADD | Op::SUB | Op::ADC | Op::SBB | Op::AND | Op::OR | Op::XOR | Op::CMP => {
                self.alu(instr)
            }
            Op::TEST => self.test(instr),
            Op::INC | Op::DEC | Op::NOT | Op::NEG | Op::MUL | Op::DIV | Op::IDIV => {
                self.unary(instr)
            }
            Op::IMUL => self.imul(instr),
            Op::SHL | Op::SHR | Op::SAR | Op::ROL | Op::ROR | Op::RCL | Op::RCR => {
                self.shift(instr)
            }
            Op::JMP | Op::CALL | Op::RET => self.jump(instr),
            op if op.is_jcc() => self.jump(instr),
            op if op.is_setcc() => self.setcc(instr),
            op if op.is_cmovcc() => self.cmov(instr),
            Op::PUSH | Op::POP | Op::PUSHF | Op::POPF => self.stack(instr),
            Op::ADDSD | Op::SUBSD | Op::MULSD | Op::DIVSD | Op::SQRTSD | Op::MOVSD
            | Op::COMISD | Op::UCOMISD | Op::CVTSI2SD | Op::CVTSD2SI | Op::CVTTSD2SI
            | Op::ANDPD | Op::ORPD | Op::XORPD => self.sse(instr),
            Op::MOVQ => self.movq(instr),
            Op::NOP => {
                self.out.push(0x90);
                Ok(())
            }
            Op::HLT => {
                self.out.push(0xF4);
                Ok(())
            }
            Op::CLC => {
                self.out.push(0xF8);
                Ok(())
            }
            Op::STC => {
                self.out.push(0xF9);
                Ok(())
            }
            Op::CMC => {
                self.out.push(0xF5);
                Ok(())
            }
            Op::CQO => {
                self.out.push(rex_byte(true, false, false, false));
                self.out.push(0x99);
                Ok(())
            }
            Op::SYSCALL => {
                self.out.push(0x0F);
                self.out.push(0x05);
                Ok(())
            }
            op => Err(EncodeError::UnsupportedInstruction(op)),
        }
    }

    /// Emits a REX prefix when any of its bits is required, or when a
    /// participating register only exists under REX (`SPL`..`DIL`).
    /// Rejects high byte registers whenever a prefix must be present.
    fn rex(
        &mut self,
        op: Op,
        w: bool,
        reg_field: Option<Reg>,
        rm_field: Option<Reg>,
        mem: Option<&Mem>,
    ) -> Result<(), EncodeError> {
        let r = reg_field.map_or(false, Reg::is_extended);
        let x = mem
            .and_then(|m| m.index)
            .map_or(false, Reg::is_extended);
        let b = rm_field.map_or(false, Reg::is_extended)
            || mem.and_then(|m| m.base).map_or(false, Reg::is_extended);
        let forced = reg_field.map_or(false, Reg::needs_rex_presence)
            || rm_field.map_or(false, Reg::needs_rex_presence);

        if w || r || x || b || forced {
            let high_byte = reg_field.map_or(false, Reg::is_high_byte)
                || rm_field.map_or(false, Reg::is_high_byte);
            if high_byte {
                return Err(EncodeError::UnsupportedOperands(op));
            }
            self.out.push(rex_byte(w, r, x, b));
        }
        Ok(())
    }

    fn modrm_regs(&mut self, reg: u8, rm: u8) {
        self.out.push(0xC0 | (reg << 3) | (rm & 0x07));
    }

    fn segment_prefix(&mut self, mem: &Mem) {
        if let Some(segment) = mem.segment {
            self.out.push(segment.prefix());
        }
    }

    fn imm8(&mut self, value: i64) {
        self.out.push(value as u8);
    }

    fn imm16(&mut self, value: i64) {
        self.out.append_u16(value as u16);
    }

    fn imm32(&mut self, value: i64) {
        self.out.append_u32(value as u32);
    }

    /// Emits a 4-byte placeholder to be patched with `rel32` in pass 2.
    fn label_placeholder(&mut self, label: &str) {
        self.patches.push((self.out.len(), label.to_owned()));
        self.out.append_u32(0);
    }

    /// ModR/M + optional SIB + displacement for a memory operand.
    fn mem(&mut self, op: Op, mem: &Mem, reg_field: u8) -> Result<(), EncodeError> {
        if mem.index.is_some() && !matches!(mem.scale, 1 | 2 | 4 | 8) {
            return Err(EncodeError::InvalidScale(mem.scale));
        }
        if mem.index == Some(Reg::RSP) {
            return Err(EncodeError::UnsupportedOperands(op));
        }
        let scale_bits = match mem.scale {
            1 => 0u8,
            2 => 1,
            4 => 2,
            8 => 3,
            _ => 0,
        };
        let reg = (reg_field & 0x07) << 3;

        match (mem.base, mem.index) {
            (None, None) => {
                // Absolute: SIB with neither base nor index, disp32.
                self.out.push(reg | 0x04);
                self.out.push(0x25);
                self.imm32(i64::from(mem.disp));
            }
            (Some(base), None) => {
                let low = base.low3();
                if low == 4 {
                    // RSP/R12 base escapes into a SIB byte.
                    let sib = 0x20 | low;
                    if mem.disp == 0 {
                        self.out.push(reg | 0x04);
                        self.out.push(sib);
                    } else if fits_i8(i64::from(mem.disp)) {
                        self.out.push(0x40 | reg | 0x04);
                        self.out.push(sib);
                        self.imm8(i64::from(mem.disp));
                    } else {
                        self.out.push(0x80 | reg | 0x04);
                        self.out.push(sib);
                        self.imm32(i64::from(mem.disp));
                    }
                } else if mem.disp == 0 && low != 5 {
                    self.out.push(reg | low);
                } else if fits_i8(i64::from(mem.disp)) {
                    // Covers RBP/R13 with zero displacement, which have no
                    // mod=00 form.
                    self.out.push(0x40 | reg | low);
                    self.imm8(i64::from(mem.disp));
                } else {
                    self.out.push(0x80 | reg | low);
                    self.imm32(i64::from(mem.disp));
                }
            }
            (base, Some(index)) => {
                let base_low = base.map_or(5, Reg::low3);
                let sib = (scale_bits << 6) | (index.low3() << 3) | base_low;
                if base.is_none() {
                    // SIB base=101 under mod=00 means "no base": disp32.
                    self.out.push(reg | 0x04);
                    self.out.push((scale_bits << 6) | (index.low3() << 3) | 0x05);
                    self.imm32(i64::from(mem.disp));
                } else if mem.disp == 0 && base_low != 5 {
                    self.out.push(reg | 0x04);
                    self.out.push(sib);
                } else if fits_i8(i64::from(mem.disp)) {
                    self.out.push(0x40 | reg | 0x04);
                    self.out.push(sib);
                    self.imm8(i64::from(mem.disp));
                } else {
                    self.out.push(0x80 | reg | 0x04);
                    self.out.push(sib);
                    self.imm32(i64::from(mem.disp));
                }
            }
        }
        Ok(())
    }

    fn mov(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => match op {
                Op::MOV | Op::XCHG => {
                    if dst.width() != src.width() || dst.is_xmm() {
                        return Err(EncodeError::OperandWidthMismatch(op));
                    }
                    let width = dst.width();
                    if width == Width::B16 {
                        self.out.push(0x66);
                    }
                    self.rex(op, width == Width::B64, Some(src), Some(dst), None)?;
                    let opcode = match (op, width) {
                        (Op::MOV, Width::B8) => 0x88,
                        (Op::MOV, _) => 0x89,
                        (Op::XCHG, Width::B8) => 0x86,
                        (Op::XCHG, _) => 0x87,
                        _ => unreachable!(),
                    };
                    self.out.push(opcode);
                    self.modrm_regs(src.low3(), dst.low3());
                    Ok(())
                }
                Op::MOVZX | Op::MOVSX => {
                    let dst_width = dst.width();
                    let src_width = src.width();
                    let widens = match (dst_width, src_width) {
                        (Width::B16, Width::B8)
                        | (Width::B32, Width::B8)
                        | (Width::B64, Width::B8)
                        | (Width::B32, Width::B16)
                        | (Width::B64, Width::B16) => true,
                        _ => false,
                    };
                    if !widens {
                        return Err(EncodeError::OperandWidthMismatch(op));
                    }
                    if dst_width == Width::B16 {
                        self.out.push(0x66);
                    }
                    self.rex(op, dst_width == Width::B64, Some(dst), Some(src), None)?;
                    self.out.push(0x0F);
                    let second = match (op, src_width) {
                        (Op::MOVZX, Width::B8) => 0xB6,
                        (Op::MOVZX, _) => 0xB7,
                        (Op::MOVSX, Width::B8) => 0xBE,
                        (Op::MOVSX, _) => 0xBF,
                        _ => unreachable!(),
                    };
                    self.out.push(second);
                    self.modrm_regs(dst.low3(), src.low3());
                    Ok(())
                }
                _ => Err(EncodeError::UnsupportedOperands(op)),
            },
            (Some(&Operand::Reg(dst)), Some(Operand::Imm(value))) => {
                self.mov_imm(op, dst, *value as u64)
            }
            (Some(&Operand::Reg(dst)), Some(Operand::UImm(value))) => {
                self.mov_imm(op, dst, *value)
            }
            (Some(&Operand::Reg(dst)), Some(Operand::Mem(mem))) => {
                let mem = *mem;
                self.segment_prefix(&mem);
                let width = dst.width();
                match op {
                    Op::MOV => {
                        if width == Width::B16 {
                            self.out.push(0x66);
                        }
                        self.rex(op, width == Width::B64, Some(dst), None, Some(&mem))?;
                        self.out
                            .push(if width == Width::B8 { 0x8A } else { 0x8B });
                        self.mem(op, &mem, dst.low3())
                    }
                    Op::LEA => {
                        if width == Width::B8 || dst.is_xmm() {
                            return Err(EncodeError::OperandWidthMismatch(op));
                        }
                        if width == Width::B16 {
                            self.out.push(0x66);
                        }
                        self.rex(op, width == Width::B64, Some(dst), None, Some(&mem))?;
                        self.out.push(0x8D);
                        self.mem(op, &mem, dst.low3())
                    }
                    _ => Err(EncodeError::UnsupportedOperands(op)),
                }
            }
            (Some(Operand::Mem(mem)), Some(&Operand::Reg(src))) => {
                if op != Op::MOV {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                let width = src.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(src), None, Some(&mem))?;
                self.out
                    .push(if width == Width::B8 { 0x88 } else { 0x89 });
                self.mem(op, &mem, src.low3())
            }
            (Some(Operand::Mem(mem)), Some(Operand::Imm(value))) => {
                if op != Op::MOV {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                let value = *value;
                self.segment_prefix(&mem);
                // 64-bit store of a sign-extended 32-bit immediate.
                self.rex(op, true, None, None, Some(&mem))?;
                self.out.push(0xC7);
                self.mem(op, &mem, 0)?;
                self.imm32(value);
                Ok(())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn mov_imm(&mut self, op: Op, dst: Reg, value: u64) -> Result<(), EncodeError> {
        if op != Op::MOV || dst.is_xmm() {
            return Err(EncodeError::UnsupportedOperands(op));
        }
        match dst.width() {
            Width::B8 => {
                self.rex(op, false, None, Some(dst), None)?;
                self.out.push(0xB0 | dst.low3());
                self.imm8(value as i64);
            }
            Width::B16 => {
                self.out.push(0x66);
                self.rex(op, false, None, Some(dst), None)?;
                self.out.push(0xB8 | dst.low3());
                self.imm16(value as i64);
            }
            Width::B32 => {
                self.rex(op, false, None, Some(dst), None)?;
                self.out.push(0xB8 | dst.low3());
                self.imm32(value as i64);
            }
            Width::B64 => {
                self.rex(op, true, None, Some(dst), None)?;
                self.out.push(0xB8 | dst.low3());
                self.out.append_u64(value);
            }
            Width::B128 => return Err(EncodeError::UnsupportedOperands(op)),
        }
        Ok(())
    }

    fn alu_base(op: Op) -> (u8, u8) {
        match op {
            Op::ADD => (0x00, 0),
            Op::OR => (0x08, 1),
            Op::ADC => (0x10, 2),
            Op::SBB => (0x18, 3),
            Op::AND => (0x20, 4),
            Op::SUB => (0x28, 5),
            Op::XOR => (0x30, 6),
            Op::CMP => (0x38, 7),
            _ => unreachable!(),
        }
    }

    fn alu(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        let (base, ext) = Self::alu_base(op);
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => {
                if dst.width() != src.width() || dst.is_xmm() {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(src), Some(dst), None)?;
                self.out
                    .push(base + if width == Width::B8 { 0x00 } else { 0x01 });
                self.modrm_regs(src.low3(), dst.low3());
                Ok(())
            }
            (Some(&Operand::Reg(dst)), Some(Operand::Imm(value))) => {
                let value = *value;
                if dst.is_xmm() {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, None, Some(dst), None)?;
                match width {
                    Width::B8 => {
                        self.out.push(0x80);
                        self.modrm_regs(ext, dst.low3());
                        self.imm8(value);
                    }
                    _ if fits_i8(value) => {
                        self.out.push(0x83);
                        self.modrm_regs(ext, dst.low3());
                        self.imm8(value);
                    }
                    Width::B16 => {
                        self.out.push(0x81);
                        self.modrm_regs(ext, dst.low3());
                        self.imm16(value);
                    }
                    _ => {
                        self.out.push(0x81);
                        self.modrm_regs(ext, dst.low3());
                        self.imm32(value);
                    }
                }
                Ok(())
            }
            (Some(&Operand::Reg(dst)), Some(Operand::Mem(mem))) => {
                let mem = *mem;
                self.segment_prefix(&mem);
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(dst), None, Some(&mem))?;
                self.out
                    .push(base + if width == Width::B8 { 0x02 } else { 0x03 });
                self.mem(op, &mem, dst.low3())
            }
            (Some(Operand::Mem(mem)), Some(&Operand::Reg(src))) => {
                let mem = *mem;
                self.segment_prefix(&mem);
                let width = src.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(src), None, Some(&mem))?;
                self.out
                    .push(base + if width == Width::B8 { 0x00 } else { 0x01 });
                self.mem(op, &mem, src.low3())
            }
            (Some(Operand::Mem(mem)), Some(Operand::Imm(value))) => {
                let mem = *mem;
                let value = *value;
                self.segment_prefix(&mem);
                // Memory destinations default to 64-bit operands here.
                self.rex(op, true, None, None, Some(&mem))?;
                if fits_i8(value) {
                    self.out.push(0x83);
                    self.mem(op, &mem, ext)?;
                    self.imm8(value);
                } else {
                    self.out.push(0x81);
                    self.mem(op, &mem, ext)?;
                    self.imm32(value);
                }
                Ok(())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn test(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => {
                if dst.width() != src.width() || dst.is_xmm() {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(src), Some(dst), None)?;
                self.out
                    .push(if width == Width::B8 { 0x84 } else { 0x85 });
                self.modrm_regs(src.low3(), dst.low3());
                Ok(())
            }
            (Some(Operand::Mem(mem)), Some(&Operand::Reg(src))) => {
                let mem = *mem;
                self.segment_prefix(&mem);
                let width = src.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(src), None, Some(&mem))?;
                self.out
                    .push(if width == Width::B8 { 0x84 } else { 0x85 });
                self.mem(op, &mem, src.low3())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn unary(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        let ext = match op {
            Op::INC => 0,
            Op::DEC => 1,
            Op::NOT => 2,
            Op::NEG => 3,
            Op::MUL => 4,
            Op::DIV => 6,
            Op::IDIV => 7,
            _ => unreachable!(),
        };
        let reg = match instr.operand(0) {
            Some(&Operand::Reg(reg)) if !reg.is_xmm() => reg,
            _ => return Err(EncodeError::UnsupportedOperands(op)),
        };
        let width = reg.width();
        if width == Width::B16 {
            self.out.push(0x66);
        }
        self.rex(op, width == Width::B64, None, Some(reg), None)?;
        // The one-byte `0x40 + r` INC/DEC forms do not exist in 64-bit
        // mode; every width goes through the ModR/M form.
        let opcode = match (op, width) {
            (Op::INC, Width::B8) | (Op::DEC, Width::B8) => 0xFE,
            (Op::INC, _) | (Op::DEC, _) => 0xFF,
            (_, Width::B8) => 0xF6,
            (_, _) => 0xF7,
        };
        self.out.push(opcode);
        self.modrm_regs(ext, reg.low3());
        Ok(())
    }

    fn imul(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match (instr.operand(0), instr.operand(1)) {
            // One-operand form: RDX:RAX = RAX * r/m.
            (Some(&Operand::Reg(reg)), None) => {
                let width = reg.width();
                if reg.is_xmm() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, None, Some(reg), None)?;
                self.out
                    .push(if width == Width::B8 { 0xF6 } else { 0xF7 });
                self.modrm_regs(5, reg.low3());
                Ok(())
            }
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => {
                if dst.width() != src.width() || dst.width() == Width::B8 || dst.is_xmm() {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(dst), Some(src), None)?;
                self.out.push(0x0F);
                self.out.push(0xAF);
                self.modrm_regs(dst.low3(), src.low3());
                Ok(())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn shift(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        let ext = match op {
            Op::ROL => 0,
            Op::ROR => 1,
            Op::RCL => 2,
            Op::RCR => 3,
            Op::SHL => 4,
            Op::SHR => 5,
            Op::SAR => 7,
            _ => unreachable!(),
        };
        let reg = match instr.operand(0) {
            Some(&Operand::Reg(reg)) if !reg.is_xmm() => reg,
            _ => return Err(EncodeError::UnsupportedOperands(op)),
        };
        let width = reg.width();
        if width == Width::B16 {
            self.out.push(0x66);
        }
        self.rex(op, width == Width::B64, None, Some(reg), None)?;
        match instr.operand(1) {
            Some(Operand::Imm(1)) => {
                self.out
                    .push(if width == Width::B8 { 0xD0 } else { 0xD1 });
                self.modrm_regs(ext, reg.low3());
            }
            Some(Operand::Imm(count)) => {
                self.out
                    .push(if width == Width::B8 { 0xC0 } else { 0xC1 });
                self.modrm_regs(ext, reg.low3());
                self.imm8(*count);
            }
            Some(&Operand::Reg(Reg::CL)) => {
                self.out
                    .push(if width == Width::B8 { 0xD2 } else { 0xD3 });
                self.modrm_regs(ext, reg.low3());
            }
            _ => return Err(EncodeError::UnsupportedOperands(op)),
        }
        Ok(())
    }

    fn cc_nibble(op: Op) -> u8 {
        match op {
            Op::SETO => 0x0,
            Op::SETNO => 0x1,
            Op::SETB | Op::JB | Op::CMOVB => 0x2,
            Op::SETNB | Op::JAE | Op::CMOVAE => 0x3,
            Op::SETZ | Op::JE | Op::CMOVE => 0x4,
            Op::SETNZ | Op::JNE | Op::CMOVNE => 0x5,
            Op::SETBE | Op::JBE | Op::CMOVBE => 0x6,
            Op::SETNBE | Op::JA | Op::CMOVA => 0x7,
            Op::SETS => 0x8,
            Op::SETNS => 0x9,
            Op::SETP => 0xA,
            Op::SETNP => 0xB,
            Op::SETL | Op::JL => 0xC,
            Op::SETNL | Op::JGE => 0xD,
            Op::SETLE | Op::JLE => 0xE,
            Op::SETNLE | Op::JG => 0xF,
            _ => unreachable!(),
        }
    }

    fn jump(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;

        if op == Op::RET {
            match instr.operand(0) {
                None | Some(Operand::Imm(0)) => self.out.push(0xC3),
                Some(Operand::Imm(value)) => {
                    let value = *value;
                    self.out.push(0xC2);
                    self.imm16(value);
                }
                _ => return Err(EncodeError::UnsupportedOperands(op)),
            }
            return Ok(());
        }

        match instr.operand(0) {
            Some(Operand::Label(label)) => {
                let label = label.clone();
                if op.is_jcc() {
                    self.out.push(0x0F);
                    self.out.push(0x80 | Self::cc_nibble(op));
                } else {
                    self.out.push(if op == Op::CALL { 0xE8 } else { 0xE9 });
                }
                self.label_placeholder(&label);
                Ok(())
            }
            Some(Operand::Imm(rel)) => {
                let rel = *rel;
                if op.is_jcc() {
                    self.out.push(0x0F);
                    self.out.push(0x80 | Self::cc_nibble(op));
                } else {
                    self.out.push(if op == Op::CALL { 0xE8 } else { 0xE9 });
                }
                self.imm32(rel);
                Ok(())
            }
            Some(&Operand::Reg(reg)) => {
                if op.is_jcc() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                if reg.width() != Width::B64 {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                // Default 64-bit operand; only REX.B can be required.
                self.rex(op, false, None, Some(reg), None)?;
                self.out.push(0xFF);
                self.modrm_regs(if op == Op::CALL { 2 } else { 4 }, reg.low3());
                Ok(())
            }
            Some(Operand::Mem(mem)) => {
                if op.is_jcc() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                self.rex(op, false, None, None, Some(&mem))?;
                self.out.push(0xFF);
                self.mem(op, &mem, if op == Op::CALL { 2 } else { 4 })
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn setcc(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match instr.operand(0) {
            Some(&Operand::Reg(reg)) => {
                if reg.width() != Width::B8 {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                self.rex(op, false, None, Some(reg), None)?;
                self.out.push(0x0F);
                self.out.push(0x90 | Self::cc_nibble(op));
                self.modrm_regs(0, reg.low3());
                Ok(())
            }
            Some(Operand::Mem(mem)) => {
                let mem = *mem;
                self.segment_prefix(&mem);
                self.rex(op, false, None, None, Some(&mem))?;
                self.out.push(0x0F);
                self.out.push(0x90 | Self::cc_nibble(op));
                self.mem(op, &mem, 0)
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn cmov(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => {
                if dst.width() != src.width() || dst.width() == Width::B8 || dst.is_xmm() {
                    return Err(EncodeError::OperandWidthMismatch(op));
                }
                let width = dst.width();
                if width == Width::B16 {
                    self.out.push(0x66);
                }
                self.rex(op, width == Width::B64, Some(dst), Some(src), None)?;
                self.out.push(0x0F);
                self.out.push(0x40 | Self::cc_nibble(op));
                self.modrm_regs(dst.low3(), src.low3());
                Ok(())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn stack(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match op {
            Op::PUSHF => {
                self.out.push(0x9C);
                return Ok(());
            }
            Op::POPF => {
                self.out.push(0x9D);
                return Ok(());
            }
            _ => {}
        }

        match instr.operand(0) {
            Some(&Operand::Reg(reg)) => {
                // PUSH/POP r64 default to 64-bit operands: no REX.W.
                match reg.width() {
                    Width::B64 => {
                        self.rex(op, false, None, Some(reg), None)?;
                    }
                    Width::B16 => {
                        self.out.push(0x66);
                        self.rex(op, false, None, Some(reg), None)?;
                    }
                    _ => return Err(EncodeError::OperandWidthMismatch(op)),
                }
                let base: u8 = if op == Op::PUSH { 0x50 } else { 0x58 };
                self.out.push(base | reg.low3());
                Ok(())
            }
            Some(Operand::Imm(value)) => {
                let value = *value;
                if op != Op::PUSH {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                if fits_i8(value) {
                    self.out.push(0x6A);
                    self.imm8(value);
                } else {
                    self.out.push(0x68);
                    self.imm32(value);
                }
                Ok(())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn sse_opcode(op: Op) -> (u8, u8) {
        match op {
            Op::ADDSD => (0xF2, 0x58),
            Op::SUBSD => (0xF2, 0x5C),
            Op::MULSD => (0xF2, 0x59),
            Op::DIVSD => (0xF2, 0x5E),
            Op::SQRTSD => (0xF2, 0x51),
            Op::MOVSD => (0xF2, 0x10),
            Op::CVTSI2SD => (0xF2, 0x2A),
            Op::CVTSD2SI => (0xF2, 0x2D),
            Op::CVTTSD2SI => (0xF2, 0x2C),
            Op::COMISD => (0x66, 0x2F),
            Op::UCOMISD => (0x66, 0x2E),
            Op::ANDPD => (0x66, 0x54),
            Op::ORPD => (0x66, 0x56),
            Op::XORPD => (0x66, 0x57),
            _ => unreachable!(),
        }
    }

    fn sse(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        let (prefix, opcode) = Self::sse_opcode(op);
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => match op {
                Op::CVTSI2SD => {
                    // xmm ← r64 (or r32); the GPR sits in the r/m field.
                    if !dst.is_xmm() || !matches!(src.width(), Width::B32 | Width::B64) {
                        return Err(EncodeError::OperandWidthMismatch(op));
                    }
                    self.out.push(prefix);
                    self.rex(op, src.width() == Width::B64, Some(dst), Some(src), None)?;
                    self.out.push(0x0F);
                    self.out.push(opcode);
                    self.modrm_regs(dst.low3(), src.low3());
                    Ok(())
                }
                Op::CVTSD2SI | Op::CVTTSD2SI => {
                    if !src.is_xmm() || !matches!(dst.width(), Width::B32 | Width::B64) {
                        return Err(EncodeError::OperandWidthMismatch(op));
                    }
                    self.out.push(prefix);
                    self.rex(op, dst.width() == Width::B64, Some(dst), Some(src), None)?;
                    self.out.push(0x0F);
                    self.out.push(opcode);
                    self.modrm_regs(dst.low3(), src.low3());
                    Ok(())
                }
                _ => {
                    if !dst.is_xmm() || !src.is_xmm() {
                        return Err(EncodeError::OperandWidthMismatch(op));
                    }
                    self.out.push(prefix);
                    self.rex(op, false, Some(dst), Some(src), None)?;
                    self.out.push(0x0F);
                    self.out.push(opcode);
                    self.modrm_regs(dst.low3(), src.low3());
                    Ok(())
                }
            },
            (Some(&Operand::Reg(dst)), Some(Operand::Mem(mem))) => {
                if !dst.is_xmm() || matches!(op, Op::CVTSD2SI | Op::CVTTSD2SI) {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                self.out.push(prefix);
                self.rex(op, false, Some(dst), None, Some(&mem))?;
                self.out.push(0x0F);
                self.out.push(opcode);
                self.mem(op, &mem, dst.low3())
            }
            (Some(Operand::Mem(mem)), Some(&Operand::Reg(src))) => {
                if op != Op::MOVSD || !src.is_xmm() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                self.out.push(prefix);
                self.rex(op, false, Some(src), None, Some(&mem))?;
                self.out.push(0x0F);
                self.out.push(0x11);
                self.mem(op, &mem, src.low3())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }

    fn movq(&mut self, instr: &Instruction) -> Result<(), EncodeError> {
        let op = instr.op;
        match (instr.operand(0), instr.operand(1)) {
            (Some(&Operand::Reg(dst)), Some(&Operand::Reg(src))) => {
                match (dst.is_xmm(), src.is_xmm()) {
                    (true, false) => {
                        if src.width() != Width::B64 {
                            return Err(EncodeError::OperandWidthMismatch(op));
                        }
                        self.out.push(0x66);
                        self.rex(op, true, Some(dst), Some(src), None)?;
                        self.out.push(0x0F);
                        self.out.push(0x6E);
                        self.modrm_regs(dst.low3(), src.low3());
                    }
                    (false, true) => {
                        if dst.width() != Width::B64 {
                            return Err(EncodeError::OperandWidthMismatch(op));
                        }
                        self.out.push(0x66);
                        self.rex(op, true, Some(src), Some(dst), None)?;
                        self.out.push(0x0F);
                        self.out.push(0x7E);
                        self.modrm_regs(src.low3(), dst.low3());
                    }
                    (true, true) => {
                        self.out.push(0xF3);
                        self.rex(op, false, Some(dst), Some(src), None)?;
                        self.out.push(0x0F);
                        self.out.push(0x7E);
                        self.modrm_regs(dst.low3(), src.low3());
                    }
                    (false, false) => return Err(EncodeError::UnsupportedOperands(op)),
                }
                Ok(())
            }
            (Some(&Operand::Reg(dst)), Some(Operand::Mem(mem))) => {
                if !dst.is_xmm() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                self.out.push(0xF3);
                self.rex(op, false, Some(dst), None, Some(&mem))?;
                self.out.push(0x0F);
                self.out.push(0x7E);
                self.mem(op, &mem, dst.low3())
            }
            (Some(Operand::Mem(mem)), Some(&Operand::Reg(src))) => {
                if !src.is_xmm() {
                    return Err(EncodeError::UnsupportedOperands(op));
                }
                let mem = *mem;
                self.segment_prefix(&mem);
                self.out.push(0x66);
                self.rex(op, false, Some(src), None, Some(&mem))?;
                self.out.push(0x0F);
                self.out.push(0xD6);
                self.mem(op, &mem, src.low3())
            }
            _ => Err(EncodeError::UnsupportedOperands(op)),
        }
    }
}
