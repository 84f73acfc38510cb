/*!
addressing.rs - Generic per-`AddrMode` micro-cycle sequencer.

Overview
========
Two pure-ish entry points drive every instruction regardless of which of
the 256 opcodes is executing:

- `peek` computes the address/data/rw/sync the CPU is about to present to
  the bus for the cycle `state` currently names, without mutating
  anything.
- `commit` consumes `inputs` (the result of the bus access `peek` just
  described, when it was a read) and performs that cycle's effect:
  staging an address byte, applying an `Op`'s semantics, or finishing the
  instruction by returning `state` to the opcode-fetch boundary
  (`cycle_index() == 0`).

`dispatch::step` calls `peek` once to decide whether RDY should pause (a
read cycle may be held), then calls `commit`, then calls `peek` again for
the *next* cycle to hand back to the host. This module never decides
whether an interrupt should hijack the next fetch; that is
`dispatch::interrupts`'s job, invoked by `dispatch::step` only when
`cycle_index() == 0`.

Indexed addressing modes store the unindexed base address in `state.ad`
and recompute the indexed (and, for the dummy fixup cycle, the
non-carried) effective address from it plus the live index register on
each use, rather than caching a second address field.
*/

use crate::cpu::execute::{
    apply_read_op, apply_rmw_op, branch_taken, compute_unstable_write_value, compute_write_value,
};
use crate::cpu::pins::{CpuInputs, CpuOutputs};
use crate::cpu::state::{BREAK, BRK_RESET, CpuState, UNUSED};
use crate::cpu::table::{AddrMode, Op, OpInfo, OpKind, OPCODES, op_kind};

use super::interrupts;

fn read(addr: u16) -> CpuOutputs {
    CpuOutputs {
        addr,
        data: 0,
        rw: true,
        sync: false,
    }
}

fn write(addr: u16, data: u8) -> CpuOutputs {
    CpuOutputs {
        addr,
        data,
        rw: false,
        sync: false,
    }
}

fn fetch_boundary(state: &CpuState) -> CpuOutputs {
    CpuOutputs {
        addr: state.pc,
        data: 0,
        rw: true,
        sync: true,
    }
}

/// Effective (indexed) address and whether the low-byte add carried.
fn add_index(base: u16, index: u8) -> (u16, bool) {
    let effective = base.wrapping_add(index as u16);
    let crossed = (base & 0x00FF) as u16 + index as u16 > 0xFF;
    (effective, crossed)
}

/// The same-page, possibly-wrong address the hardware always reads from
/// for one dummy cycle before an indexed access, whether or not it turns
/// out to need fixing up.
fn uncorrected(base: u16, index: u8) -> u16 {
    (base & 0xFF00) | ((base as u8).wrapping_add(index) as u16)
}

fn end_instruction(state: &mut CpuState) {
    state.set_ir(0, 0);
}

fn stack_addr(state: &CpuState) -> u16 {
    0x0100 | state.s as u16
}

/// Resolves the byte a `Write`-kind op presents to the bus, routing the
/// unstable `SHA`/`SHX`/`SHY`/`SHS` family (whose value depends on the
/// effective address's high byte) separately from the plain stores.
fn resolve_write_value(state: &mut CpuState, op: Op, addr: u16) -> u8 {
    match op {
        Op::Sha | Op::Shx | Op::Shy | Op::Shs => {
            compute_unstable_write_value(state, op, (addr >> 8) as u8)
        }
        _ => compute_write_value(state, op),
    }
}

/// What the CPU is about to present to the bus for the cycle `state`
/// currently names. Pure: never mutates `state`.
pub fn peek(state: &CpuState) -> CpuOutputs {
    if state.cycle_index() == 0 {
        return fetch_boundary(state);
    }
    let row = OPCODES[state.opcode() as usize];
    peek_row(state, row, state.cycle_index())
}

/// Consumes `inputs` for the cycle `peek` just described and advances
/// `state` to the next micro-cycle (or back to the fetch boundary if the
/// instruction just finished).
pub fn commit(state: &mut CpuState, inputs: CpuInputs) {
    let row = OPCODES[state.opcode() as usize];
    commit_row(state, row, state.cycle_index(), inputs);
}

fn peek_row(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    use AddrMode::*;
    match row.mode {
        Implied | Accumulator | Immediate => read(state.pc),
        ZeroPage => peek_zero_page(state, row, cycle),
        ZeroPageX | ZeroPageY => peek_zero_page_indexed(state, row, cycle),
        Absolute => peek_absolute(state, row, cycle),
        AbsoluteX | AbsoluteY => peek_absolute_indexed(state, row, cycle),
        IndirectX => peek_indirect_x(state, row, cycle),
        IndirectY => peek_indirect_y(state, row, cycle),
        Relative => peek_relative(state, cycle),
        Indirect => peek_indirect(state, cycle),
        Jsr => peek_jsr(state, cycle),
        Rts => peek_rts(state, cycle),
        Rti => peek_rti(state, cycle),
        Brk => peek_brk(state, cycle),
        Push => peek_push(state, cycle),
        Pull => peek_pull(state, cycle),
    }
}

fn commit_row(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    use AddrMode::*;
    match row.mode {
        Implied => {
            apply_read_op(state, row.op, 0);
            end_instruction(state);
        }
        Accumulator => {
            let result = apply_rmw_op(state, row.op, state.a);
            state.a = result;
            end_instruction(state);
        }
        Immediate => {
            state.pc = state.pc.wrapping_add(1);
            apply_read_op(state, row.op, inputs.data);
            end_instruction(state);
        }
        ZeroPage => commit_zero_page(state, row, cycle, inputs),
        ZeroPageX | ZeroPageY => commit_zero_page_indexed(state, row, cycle, inputs),
        Absolute => commit_absolute(state, row, cycle, inputs),
        AbsoluteX | AbsoluteY => commit_absolute_indexed(state, row, cycle, inputs),
        IndirectX => commit_indirect_x(state, row, cycle, inputs),
        IndirectY => commit_indirect_y(state, row, cycle, inputs),
        Relative => commit_relative(state, row, cycle, inputs),
        Indirect => commit_indirect(state, cycle, inputs),
        Jsr => commit_jsr(state, cycle, inputs),
        Rts => commit_rts(state, cycle, inputs),
        Rti => commit_rti(state, cycle, inputs),
        Brk => commit_brk(state, cycle, inputs),
        Push => commit_push(state, row, cycle),
        Pull => commit_pull(state, row, cycle, inputs),
    }
}

// -- ZeroPage ---------------------------------------------------------

fn peek_zero_page(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let kind = op_kind(row.op);
    match cycle {
        1 => read(state.pc),
        2 if kind == OpKind::ReadModifyWrite || kind == OpKind::Read => read(state.ptr as u16),
        2 => write(state.ptr as u16, state.tmp),
        3 => write(state.ptr as u16, state.tmp), // RMW dummy write of old value
        4 => write(state.ptr as u16, state.tmp), // RMW write of new value
        _ => unreachable!(),
    }
}

fn commit_zero_page(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => match kind {
            OpKind::Read => {
                apply_read_op(state, row.op, inputs.data);
                end_instruction(state);
            }
            OpKind::Write => {
                state.tmp = resolve_write_value(state, row.op, state.ptr as u16);
                end_instruction(state);
            }
            OpKind::ReadModifyWrite => {
                state.tmp = inputs.data;
                state.advance_cycle();
            }
        },
        3 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        4 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- ZeroPageX / ZeroPageY ---------------------------------------------

fn indexed_zp(state: &CpuState, row: OpInfo) -> u8 {
    let index = if row.mode == AddrMode::ZeroPageY {
        state.y
    } else {
        state.x
    };
    state.ptr.wrapping_add(index)
}

fn peek_zero_page_indexed(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let kind = op_kind(row.op);
    match cycle {
        1 => read(state.pc),
        2 => read(state.ptr as u16),
        3 if kind != OpKind::Write => read(indexed_zp(state, row) as u16),
        3 => write(indexed_zp(state, row) as u16, state.tmp),
        4 => write(indexed_zp(state, row) as u16, state.tmp),
        5 => write(indexed_zp(state, row) as u16, state.tmp),
        _ => unreachable!(),
    }
}

fn commit_zero_page_indexed(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => state.advance_cycle(),
        3 => {
            let addr = indexed_zp(state, row) as u16;
            match kind {
                OpKind::Read => {
                    apply_read_op(state, row.op, inputs.data);
                    end_instruction(state);
                }
                OpKind::Write => {
                    state.tmp = resolve_write_value(state, row.op, addr);
                    end_instruction(state);
                }
                OpKind::ReadModifyWrite => {
                    state.tmp = inputs.data;
                    state.advance_cycle();
                }
            }
        }
        4 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        5 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- Absolute ------------------------------------------------------------

fn peek_absolute(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let kind = op_kind(row.op);
    match cycle {
        1 => read(state.pc),
        2 => read(state.pc),
        3 if kind != OpKind::Write => read(state.ad),
        3 => write(state.ad, state.tmp),
        4 => write(state.ad, state.tmp),
        5 => write(state.ad, state.tmp),
        _ => unreachable!(),
    }
}

fn commit_absolute(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => {
            let hi = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.ad = ((hi as u16) << 8) | state.ptr as u16;
            if row.op == Op::Jmp {
                // JMP $nnnn loads PC directly; there is no third bus cycle.
                state.pc = state.ad;
                end_instruction(state);
            } else {
                state.advance_cycle();
            }
        }
        3 => match kind {
            OpKind::Read => {
                apply_read_op(state, row.op, inputs.data);
                end_instruction(state);
            }
            OpKind::Write => {
                state.tmp = resolve_write_value(state, row.op, state.ad);
                end_instruction(state);
            }
            OpKind::ReadModifyWrite => {
                state.tmp = inputs.data;
                state.advance_cycle();
            }
        },
        4 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        5 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- AbsoluteX / AbsoluteY -------------------------------------------

fn peek_absolute_indexed(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let index = if row.mode == AddrMode::AbsoluteY {
        state.y
    } else {
        state.x
    };
    let kind = op_kind(row.op);
    let (effective, _) = add_index(state.ad, index);
    match cycle {
        1 => read(state.pc),
        2 => read(state.pc),
        3 => read(uncorrected(state.ad, index)),
        4 if kind != OpKind::Write => read(effective),
        4 => write(effective, state.tmp),
        5 => write(effective, state.tmp),
        6 => write(effective, state.tmp),
        _ => unreachable!(),
    }
}

fn commit_absolute_indexed(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let index = if row.mode == AddrMode::AbsoluteY {
        state.y
    } else {
        state.x
    };
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => {
            let hi = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.ad = ((hi as u16) << 8) | state.ptr as u16;
            let (_, crossed) = add_index(state.ad, index);
            state.page_crossed = crossed;
            state.advance_cycle();
        }
        3 => {
            if kind == OpKind::Read && !state.page_crossed {
                apply_read_op(state, row.op, inputs.data);
                end_instruction(state);
            } else {
                state.advance_cycle();
            }
        }
        4 => {
            let (effective, _) = add_index(state.ad, index);
            match kind {
                OpKind::Read => {
                    apply_read_op(state, row.op, inputs.data);
                    end_instruction(state);
                }
                OpKind::Write => {
                    state.tmp = resolve_write_value(state, row.op, effective);
                    end_instruction(state);
                }
                OpKind::ReadModifyWrite => {
                    state.tmp = inputs.data;
                    state.advance_cycle();
                }
            }
        }
        5 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        6 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- IndirectX (zp,X) --------------------------------------------------

fn peek_indirect_x(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let kind = op_kind(row.op);
    match cycle {
        1 => read(state.pc),
        2 => read(state.ptr as u16),
        3 => read(state.ptr.wrapping_add(state.x) as u16),
        4 => read(state.ptr.wrapping_add(state.x).wrapping_add(1) as u16),
        5 if kind != OpKind::Write => read(state.ad),
        5 => write(state.ad, state.tmp),
        6 => write(state.ad, state.tmp),
        7 => write(state.ad, state.tmp),
        _ => unreachable!(),
    }
}

fn commit_indirect_x(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => state.advance_cycle(),
        3 => {
            state.tmp = inputs.data; // pointer low byte
            state.advance_cycle();
        }
        4 => {
            let hi = inputs.data;
            state.ad = ((hi as u16) << 8) | state.tmp as u16;
            state.advance_cycle();
        }
        5 => match kind {
            OpKind::Read => {
                apply_read_op(state, row.op, inputs.data);
                end_instruction(state);
            }
            OpKind::Write => {
                state.tmp = resolve_write_value(state, row.op, state.ad);
                end_instruction(state);
            }
            OpKind::ReadModifyWrite => {
                state.tmp = inputs.data;
                state.advance_cycle();
            }
        },
        6 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        7 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- IndirectY (zp),Y ---------------------------------------------------

fn peek_indirect_y(state: &CpuState, row: OpInfo, cycle: u8) -> CpuOutputs {
    let kind = op_kind(row.op);
    let (effective, _) = add_index(state.ad, state.y);
    match cycle {
        1 => read(state.pc),
        2 => read(state.ptr as u16),
        3 => read(state.ptr.wrapping_add(1) as u16),
        4 => read(uncorrected(state.ad, state.y)),
        5 if kind != OpKind::Write => read(effective),
        5 => write(effective, state.tmp),
        6 => write(effective, state.tmp),
        7 => write(effective, state.tmp),
        _ => unreachable!(),
    }
}

fn commit_indirect_y(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    let kind = op_kind(row.op);
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => {
            state.tmp = inputs.data; // base low
            state.advance_cycle();
        }
        3 => {
            let hi = inputs.data;
            state.ad = ((hi as u16) << 8) | state.tmp as u16;
            let (_, crossed) = add_index(state.ad, state.y);
            state.page_crossed = crossed;
            state.advance_cycle();
        }
        4 => {
            if kind == OpKind::Read && !state.page_crossed {
                apply_read_op(state, row.op, inputs.data);
                end_instruction(state);
            } else {
                state.advance_cycle();
            }
        }
        5 => {
            let (effective, _) = add_index(state.ad, state.y);
            match kind {
                OpKind::Read => {
                    apply_read_op(state, row.op, inputs.data);
                    end_instruction(state);
                }
                OpKind::Write => {
                    state.tmp = resolve_write_value(state, row.op, effective);
                    end_instruction(state);
                }
                OpKind::ReadModifyWrite => {
                    state.tmp = inputs.data;
                    state.advance_cycle();
                }
            }
        }
        6 => {
            let result = apply_rmw_op(state, row.op, state.tmp);
            state.tmp = result;
            state.advance_cycle();
        }
        7 => end_instruction(state),
        _ => unreachable!(),
    }
}

// -- Relative (branches) ------------------------------------------------

fn peek_relative(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(state.pc),
        3 => read(state.pc),
        _ => unreachable!(),
    }
}

fn commit_relative(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => {
            state.tmp = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            if branch_taken(state, row.op) {
                state.advance_cycle();
            } else {
                end_instruction(state);
            }
        }
        2 => {
            let offset = state.tmp as i8 as i16;
            let target = (state.pc as i16).wrapping_add(offset) as u16;
            let crossed = (target & 0xFF00) != (state.pc & 0xFF00);
            state.ad = target;
            if crossed {
                state.advance_cycle();
            } else {
                state.pc = target;
                // Taken, non-crossing: this cycle buys one instruction's
                // worth of delay for any pending interrupt.
                state.irq_pip >>= 1;
                state.nmi_pip >>= 1;
                end_instruction(state);
            }
        }
        3 => {
            state.pc = state.ad;
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- Indirect (JMP (ind), with the page-wrap pointer bug) ---------------

fn peek_indirect(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(state.pc),
        3 => read(state.ad),
        4 => {
            let wrapped = (state.ad & 0xFF00) | ((state.ad as u8).wrapping_add(1) as u16);
            read(wrapped)
        }
        _ => unreachable!(),
    }
}

fn commit_indirect(state: &mut CpuState, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => {
            let hi = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.ad = ((hi as u16) << 8) | state.ptr as u16;
            state.advance_cycle();
        }
        3 => {
            state.tmp = inputs.data;
            state.advance_cycle();
        }
        4 => {
            let hi = inputs.data;
            state.pc = ((hi as u16) << 8) | state.tmp as u16;
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- JSR ------------------------------------------------------------

fn peek_jsr(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(stack_addr(state)),
        3 => write(stack_addr(state), (state.pc >> 8) as u8),
        4 => write(stack_addr(state), state.pc as u8),
        5 => read(state.pc),
        _ => unreachable!(),
    }
}

fn commit_jsr(state: &mut CpuState, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => {
            state.ptr = inputs.data;
            state.pc = state.pc.wrapping_add(1);
            state.advance_cycle();
        }
        2 => state.advance_cycle(),
        3 => {
            state.s = state.s.wrapping_sub(1);
            state.advance_cycle();
        }
        4 => {
            state.s = state.s.wrapping_sub(1);
            state.advance_cycle();
        }
        5 => {
            let hi = inputs.data;
            state.pc = ((hi as u16) << 8) | state.ptr as u16;
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- RTS ------------------------------------------------------------

fn peek_rts(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(stack_addr(state)),
        3 => read(stack_addr(state)),
        4 => read(stack_addr(state)),
        5 => read(state.ad),
        _ => unreachable!(),
    }
}

fn commit_rts(state: &mut CpuState, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => state.advance_cycle(),
        2 => {
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        3 => {
            state.tmp = inputs.data;
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        4 => {
            let hi = inputs.data;
            state.ad = ((hi as u16) << 8) | state.tmp as u16;
            state.advance_cycle();
        }
        5 => {
            state.pc = state.ad.wrapping_add(1);
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- RTI ------------------------------------------------------------

fn peek_rti(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(stack_addr(state)),
        3 => read(stack_addr(state)),
        4 => read(stack_addr(state)),
        5 => read(stack_addr(state)),
        _ => unreachable!(),
    }
}

fn commit_rti(state: &mut CpuState, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => state.advance_cycle(),
        2 => {
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        3 => {
            state.p = (inputs.data & !BREAK) | UNUSED;
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        4 => {
            state.tmp = inputs.data;
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        5 => {
            let hi = inputs.data;
            state.pc = ((hi as u16) << 8) | state.tmp as u16;
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- BRK / hardware interrupt entry -------------------------------------

fn peek_brk(state: &CpuState, cycle: u8) -> CpuOutputs {
    // Only RESET inhibits the three stack "pushes" (RW stays high); software
    // BRK, NMI, and IRQ all perform genuine writes.
    let suppress_writes = state.brk_flags == BRK_RESET;
    match cycle {
        1 => read(state.pc),
        2 => {
            if suppress_writes {
                read(stack_addr(state))
            } else {
                write(stack_addr(state), (state.pc >> 8) as u8)
            }
        }
        3 => {
            if suppress_writes {
                read(stack_addr(state))
            } else {
                write(stack_addr(state), state.pc as u8)
            }
        }
        4 => {
            let byte = state.compose_status_for_push(state.brk_flags == 0);
            if suppress_writes {
                read(stack_addr(state))
            } else {
                write(stack_addr(state), byte)
            }
        }
        5 => read(interrupts::vector_addr(state.brk_flags)),
        6 => read(interrupts::vector_addr(state.brk_flags).wrapping_add(1)),
        _ => unreachable!(),
    }
}

fn commit_brk(state: &mut CpuState, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => {
            if state.brk_flags == 0 {
                // Software BRK: skip the padding signature byte.
                state.pc = state.pc.wrapping_add(1);
            }
            state.advance_cycle();
        }
        2 => {
            state.s = state.s.wrapping_sub(1);
            state.advance_cycle();
        }
        3 => {
            state.s = state.s.wrapping_sub(1);
            state.advance_cycle();
        }
        4 => {
            state.s = state.s.wrapping_sub(1);
            state.set_flag_bit(crate::cpu::state::IRQ_DISABLE);
            state.advance_cycle();
        }
        5 => {
            state.tmp = inputs.data;
            state.advance_cycle();
        }
        6 => {
            let hi = inputs.data;
            state.pc = ((hi as u16) << 8) | state.tmp as u16;
            state.brk_flags = 0;
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- Push (PHA / PHP) ---------------------------------------------------

fn peek_push(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => {
            let byte = if matches!(OPCODES[state.opcode() as usize].op, Op::Php) {
                state.compose_status_for_push(true)
            } else {
                state.a
            };
            write(stack_addr(state), byte)
        }
        _ => unreachable!(),
    }
}

fn commit_push(state: &mut CpuState, row: OpInfo, cycle: u8) {
    match cycle {
        1 => state.advance_cycle(),
        2 => {
            let _ = row;
            state.s = state.s.wrapping_sub(1);
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

// -- Pull (PLA / PLP) ---------------------------------------------------

fn peek_pull(state: &CpuState, cycle: u8) -> CpuOutputs {
    match cycle {
        1 => read(state.pc),
        2 => read(stack_addr(state)),
        3 => read(stack_addr(state)),
        _ => unreachable!(),
    }
}

fn commit_pull(state: &mut CpuState, row: OpInfo, cycle: u8, inputs: CpuInputs) {
    match cycle {
        1 => state.advance_cycle(),
        2 => {
            state.s = state.s.wrapping_add(1);
            state.advance_cycle();
        }
        3 => {
            if matches!(row.op, Op::Plp) {
                state.p = (inputs.data & !BREAK) | UNUSED;
            } else {
                state.a = inputs.data;
                state.update_zn(state.a);
            }
            end_instruction(state);
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_index_detects_carry() {
        let (effective, crossed) = add_index(0x01FF, 0x01);
        assert_eq!(effective, 0x0200);
        assert!(crossed);
    }

    #[test]
    fn add_index_no_carry() {
        let (effective, crossed) = add_index(0x0100, 0x01);
        assert_eq!(effective, 0x0101);
        assert!(!crossed);
    }

    #[test]
    fn uncorrected_wraps_within_page() {
        assert_eq!(uncorrected(0x01FF, 0x01), 0x0100);
    }

    #[test]
    fn fetch_boundary_asserts_sync() {
        let s = CpuState::new();
        let outputs = peek(&s);
        assert!(outputs.sync);
        assert_eq!(outputs.addr, s.pc);
    }
}
