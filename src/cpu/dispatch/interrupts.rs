/*!
interrupts.rs - Interrupt-line sampling and the shared BRK/IRQ/NMI/RESET
entry sequence.

Overview
========
`update_pips` runs on every tick, independent of what micro-cycle the CPU
is otherwise in. `irq_pip`/`nmi_pip` are shift registers, not live flags:
each tick shifts both left by one and, if this cycle's sample meets the
detection condition, sets bit 8. Two ticks later that bit has reached bit
10, which is what `pending` inspects at the next opcode-fetch boundary —
reproducing the real chip's two-stage detection latency rather than
sampling the lines instantaneously. A taken, non-page-crossing branch
shifts both registers right by one instead (`addressing::commit_relative`),
delaying a pending interrupt by exactly one instruction.

`pending` and `begin_sequence` are consulted only at an opcode-fetch
boundary (`cycle_index() == 0`): real silicon only latches a new interrupt
there.

`vector_addr` resolves the three interrupt vectors by priority
RESET > NMI > IRQ/BRK for simultaneous requests.
*/

use crate::cpu::pins::CpuInputs;
use crate::cpu::state::{BRK_IRQ, BRK_NMI, BRK_RESET, CpuState, IRQ_DISABLE};

const PIP_SET_BIT: u16 = 0x100;
const PIP_SYNC_BIT: u16 = 0x400;

/// Samples the interrupt lines for this cycle. Called unconditionally from
/// `dispatch::step` before anything else happens.
pub fn update_pips(state: &mut CpuState, inputs: CpuInputs) {
    state.nmi_pip <<= 1;
    let now_idle = inputs.nmi;
    let edge = !now_idle && state.last_nmi_state;
    if edge {
        state.nmi_pip |= PIP_SET_BIT;
    }
    state.last_nmi_state = now_idle;

    state.irq_pip <<= 1;
    if !inputs.irq && !state.is_flag_set(IRQ_DISABLE) {
        state.irq_pip |= PIP_SET_BIT;
    }
}

/// Whether an interrupt entry should begin at the next opcode-fetch
/// boundary, given the current (already-sampled) pipeline state and the
/// live RESET line (RESET is level-sensitive and read directly, not
/// pipelined, since the host is expected to hold it low for several ticks).
pub fn pending(state: &CpuState, reset_asserted: bool) -> bool {
    reset_asserted || nmi_pending(state) || irq_pending(state)
}

fn nmi_pending(state: &CpuState) -> bool {
    state.nmi_pip >= PIP_SYNC_BIT
}

fn irq_pending(state: &CpuState) -> bool {
    state.irq_pip & PIP_SYNC_BIT != 0
}

/// Begins the 7-cycle entry sequence by overwriting `IR` with the `BRK`
/// opcode slot (cycle 1) and recording which source(s) hijacked it in
/// `brk_flags`. The opcode-fetch cycle that triggered this call is treated
/// as a dummy read: the host's fetched byte is discarded and `PC` is left
/// untouched, matching real NMI/IRQ/RESET behavior (only software `BRK`,
/// dispatched the ordinary way through the opcode table, advances `PC`).
pub fn begin_sequence(state: &mut CpuState, reset_asserted: bool) {
    let mut flags = 0u8;
    if reset_asserted {
        flags |= BRK_RESET;
    } else if nmi_pending(state) {
        flags |= BRK_NMI;
        state.nmi_pip = 0;
    } else {
        flags |= BRK_IRQ;
    }
    state.brk_flags = flags;
    state.set_ir(0x00, 1);
}

/// Resolves the interrupt vector address for the in-flight sequence,
/// preferring RESET, then NMI, then IRQ/software-BRK (both use `$FFFE`).
pub const fn vector_addr(brk_flags: u8) -> u16 {
    if brk_flags & BRK_RESET != 0 {
        0xFFFC
    } else if brk_flags & BRK_NMI != 0 {
        0xFFFA
    } else {
        0xFFFE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmi_edge_reaches_sync_bit_after_two_more_ticks() {
        let mut s = CpuState::new();
        update_pips(&mut s, CpuInputs::idle_with_data(0));
        let mut falling = CpuInputs::idle_with_data(0);
        falling.nmi = false;
        update_pips(&mut s, falling);
        assert!(!nmi_pending(&s), "edge only just latched into bit 8");
        update_pips(&mut s, CpuInputs::idle_with_data(0));
        assert!(!nmi_pending(&s), "bit 8 has only shifted to bit 9 so far");
        update_pips(&mut s, CpuInputs::idle_with_data(0));
        assert!(nmi_pending(&s), "bit 8 has now shifted into bit 10");
    }

    #[test]
    fn irq_masked_by_i_flag() {
        let mut s = CpuState::new();
        s.set_flag_bit(IRQ_DISABLE);
        let mut asserted = CpuInputs::idle_with_data(0);
        asserted.irq = false;
        update_pips(&mut s, asserted);
        assert!(!irq_pending(&s));
    }

    #[test]
    fn irq_level_reaches_sync_bit_after_two_more_ticks() {
        let mut s = CpuState::new();
        let mut asserted = CpuInputs::idle_with_data(0);
        asserted.irq = false;
        update_pips(&mut s, asserted);
        assert!(!irq_pending(&s));
        update_pips(&mut s, asserted);
        assert!(!irq_pending(&s));
        update_pips(&mut s, asserted);
        assert!(irq_pending(&s));
    }

    #[test]
    fn vector_priority_reset_beats_nmi_beats_irq() {
        assert_eq!(vector_addr(BRK_RESET | BRK_NMI), 0xFFFC);
        assert_eq!(vector_addr(BRK_NMI), 0xFFFA);
        assert_eq!(vector_addr(BRK_IRQ), 0xFFFE);
        assert_eq!(vector_addr(0), 0xFFFE);
    }
}
