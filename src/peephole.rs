use oasm::{Instruction, Op, Reg};

fn is_push_rax(instr: &Instruction) -> bool {
    instr.op == Op::PUSH && instr.operand(0).map_or(false, |arg| arg.is_reg(Reg::RAX))
}

fn is_pop_rax(instr: &Instruction) -> bool {
    instr.op == Op::POP && instr.operand(0).map_or(false, |arg| arg.is_reg(Reg::RAX))
}

/// Removes matched `PUSH RAX` / `POP RAX` pairs.
///
/// A pair is eligible only when the instructions strictly between push
/// and pop neither name `RAX` or `RSP` in any operand position nor
/// touch the hardware stack or control flow. The stack restrictions
/// keep the match stack-exact: in the ubiquitous binary-operator seam
/// `PUSH RAX; POP RBX; POP RAX` the pop that receives the pushed value
/// is `POP RBX`, and deleting the outer pair would swap the operands.
///
/// The pass is idempotent; the surviving instructions keep their order.
pub fn optimize_push_pop(instructions: Vec<Instruction>) -> Vec<Instruction> {
    let mut removed = vec![false; instructions.len()];
    let mut i = 0;

    while i < instructions.len() {
        if is_push_rax(&instructions[i]) {
            let mut matched = None;
            let mut j = i + 1;
            while j < instructions.len() {
                let instr = &instructions[j];
                if is_pop_rax(instr) {
                    matched = Some(j);
                    break;
                }
                if instr.mentions(Reg::RAX)
                    || instr.mentions(Reg::RSP)
                    || instr.op.touches_stack_or_flow()
                {
                    break;
                }
                j += 1;
            }
            if let Some(j) = matched {
                removed[i] = true;
                removed[j] = true;
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }

    instructions
        .into_iter()
        .zip(removed)
        .filter(|(_, gone)| !gone)
        .map(|(instr, _)| instr)
        .collect()
}
