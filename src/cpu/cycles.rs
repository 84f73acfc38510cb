/*!
cycles.rs - Cycle-count and page-cross timing rules.

Overview
========
Cycle counts and the page-crossing penalty are a pure function of
`(AddrMode, OpKind)`, computed here once rather than duplicated per opcode
row in `cpu::table`. `dispatch::addressing` consults `total_cycles` to know
how many micro-cycles an instruction spans before any dynamic fixup (the
extra cycle taken by `AbsoluteX`/`AbsoluteY`/`IndirectY` when the indexed
address crosses a page boundary on a `Read` op; `Write`/`ReadModifyWrite`
always pay the fixup unconditionally since the CPU cannot undo a write it
has already committed to).
*/

use crate::cpu::table::{AddrMode, OpKind};

/// Total cycle count for one instruction in this addressing mode and
/// operation kind, not including the *dynamic* page-cross fixup (see
/// `has_page_cross_fixup`/`fixup_always_paid`); that extra cycle is added
/// by `dispatch::addressing` itself once it knows whether the index
/// actually crossed a page. Modes with a single fixed shape (`Relative`,
/// `Jsr`, `Brk`, ...) ignore `kind`.
pub const fn total_cycles(mode: AddrMode, kind: OpKind) -> u8 {
    use AddrMode::*;
    match mode {
        Implied | Accumulator | Immediate => 2,
        ZeroPage => match kind {
            OpKind::ReadModifyWrite => 5,
            _ => 3,
        },
        ZeroPageX | ZeroPageY => match kind {
            OpKind::ReadModifyWrite => 6,
            _ => 4,
        },
        Absolute => match kind {
            OpKind::ReadModifyWrite => 6,
            _ => 4,
        },
        AbsoluteX | AbsoluteY => match kind {
            OpKind::ReadModifyWrite => 7,
            OpKind::Write => 5,
            OpKind::Read => 4,
        },
        IndirectX => match kind {
            OpKind::ReadModifyWrite => 8,
            _ => 6,
        },
        IndirectY => match kind {
            OpKind::ReadModifyWrite => 8,
            OpKind::Write => 6,
            OpKind::Read => 5,
        },
        Relative => 2,
        Indirect => 5,
        Jsr => 6,
        Rts => 6,
        Rti => 6,
        Brk => 7,
        Push => 3,
        Pull => 4,
    }
}

/// Whether `mode` ever needs the dynamic page-cross fixup cycle at all.
pub const fn has_page_cross_fixup(mode: AddrMode) -> bool {
    matches!(
        mode,
        AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::IndirectY
    )
}

/// Whether the fixup cycle must always be spent (not just on a crossing)
/// for this `OpKind`: a memory-writing instruction cannot skip the dummy
/// read of the un-fixed-up address, because the 6502 always performs it
/// before the real cycle, crossing or not.
pub const fn fixup_always_paid(kind: OpKind) -> bool {
    matches!(kind, OpKind::Write | OpKind::ReadModifyWrite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_read_is_three_rmw_is_five() {
        assert_eq!(total_cycles(AddrMode::ZeroPage, OpKind::Read), 3);
        assert_eq!(total_cycles(AddrMode::ZeroPage, OpKind::ReadModifyWrite), 5);
    }

    #[test]
    fn indirect_x_is_six_cycles_regardless_of_kind() {
        assert_eq!(total_cycles(AddrMode::IndirectX, OpKind::Read), 6);
        assert_eq!(total_cycles(AddrMode::IndirectX, OpKind::Write), 6);
    }

    #[test]
    fn only_indexed_modes_carry_fixup() {
        assert!(has_page_cross_fixup(AddrMode::AbsoluteX));
        assert!(has_page_cross_fixup(AddrMode::IndirectY));
        assert!(!has_page_cross_fixup(AddrMode::ZeroPage));
    }

    #[test]
    fn write_and_rmw_always_pay_fixup() {
        assert!(fixup_always_paid(OpKind::Write));
        assert!(fixup_always_paid(OpKind::ReadModifyWrite));
        assert!(!fixup_always_paid(OpKind::Read));
    }
}
