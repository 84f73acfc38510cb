/*!
pia/mod.rs - MOS 6520 PIA per-tick sequence and register decode.

Overview
========
`Pia6520` mirrors `via::Via6522`'s facade shape. The per-tick sequence
follows §4.3: sample and edge-detect the control lines, decode a register
access only while `phi2` is high, run the auto-strobe state machine on the
ϕ2 falling edge, then compute the IRQ outputs.

Control-register bits 3-5 (C2 behavior/direction) are decoded with the
same three-bit grouping `via::mod` uses for PCR's CA2/CB2 fields, just at a
different bit offset: bit 5 selects direction, and when output, bits 3-4
select handshake/pulse/manual-level the same way.
*/

mod pins;
mod state;

pub use pins::{PiaInputs, PiaOutputs};
pub use state::{PiaPortState, PiaState, CR_IRQ1_EDGE_RISING, CR_IRQ1_ENABLE, CR_IRQ1_FLAG, CR_IRQ2_FLAG, CR_OR_SELECT};

const C2_HANDSHAKE: u8 = 0b000;
const C2_PULSE: u8 = 0b001;

/// A MOS 6520 Peripheral Interface Adapter, advanced one clock edge per
/// `tick` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pia6520 {
    state: PiaState,
}

impl Pia6520 {
    pub fn new() -> Self {
        Self {
            state: PiaState::new(),
        }
    }

    pub fn tick(&mut self, inputs: PiaInputs) -> PiaOutputs {
        tick(&mut self.state, inputs)
    }

    pub fn state(&self) -> &PiaState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PiaState {
        &mut self.state
    }
}

fn tick(state: &mut PiaState, inputs: PiaInputs) -> PiaOutputs {
    if !inputs.reset {
        *state = PiaState::new();
        return PiaOutputs::default();
    }

    sample_and_detect(state, inputs);
    update_control_irqs(state);

    let mut outputs = PiaOutputs::default();

    let selected = inputs.cs0 && inputs.cs1 && !inputs.cs2;
    if selected && inputs.phi2 {
        if inputs.rw {
            outputs.data = read_register(state, inputs.rs);
        } else {
            write_register(state, inputs.rs, inputs.data);
        }
    }

    handle_strobes(state, inputs.phi2);

    outputs.pa = (state.a.inpr & !state.a.ddr) | (state.a.outr & state.a.ddr);
    outputs.pa_dir = state.a.ddr;
    outputs.pb = (state.b.inpr & !state.b.ddr) | (state.b.outr & state.b.ddr);
    outputs.pb_dir = state.b.ddr;
    outputs.ca2 = state.a.c2_out;
    outputs.ca2_dir = c2_is_output(state.a.cr);
    outputs.cb2 = state.b.c2_out;
    outputs.cb2_dir = c2_is_output(state.b.cr);

    outputs.irqa = irq_active(state.a.cr);
    outputs.irqb = irq_active(state.b.cr);

    state.prev_phi2 = inputs.phi2;
    outputs
}

fn c2_control(cr: u8) -> u8 {
    (cr >> 3) & 0x07
}

fn c2_is_output(cr: u8) -> bool {
    c2_control(cr) & 0x04 != 0
}

fn c2_edge_rising(cr: u8) -> bool {
    c2_control(cr) & 0x02 != 0
}

fn c2_irq2_enabled(cr: u8) -> bool {
    c2_control(cr) & 0x01 != 0
}

fn irq_active(cr: u8) -> bool {
    let irq1 = cr & CR_IRQ1_ENABLE != 0 && cr & CR_IRQ1_FLAG != 0;
    let irq2 = cr & CR_IRQ2_FLAG != 0 && !c2_is_output(cr) && c2_irq2_enabled(cr);
    irq1 || irq2
}

fn edge(prev: bool, cur: bool, rising_selects: bool) -> bool {
    if rising_selects {
        !prev && cur
    } else {
        prev && !cur
    }
}

fn sample_and_detect(state: &mut PiaState, inputs: PiaInputs) {
    state.a.pins = inputs.pa;
    state.a.inpr = inputs.pa;
    state.a.c1_triggered = edge(state.a.c1_in, inputs.ca1, state.a.cr & CR_IRQ1_EDGE_RISING != 0);
    state.a.c1_in = inputs.ca1;
    state.a.c2_triggered = if !c2_is_output(state.a.cr) {
        edge(state.a.c2_in, inputs.ca2, c2_edge_rising(state.a.cr))
    } else {
        false
    };
    state.a.c2_in = inputs.ca2;

    state.b.pins = inputs.pb;
    state.b.inpr = inputs.pb;
    state.b.c1_triggered = edge(state.b.c1_in, inputs.cb1, state.b.cr & CR_IRQ1_EDGE_RISING != 0);
    state.b.c1_in = inputs.cb1;
    state.b.c2_triggered = if !c2_is_output(state.b.cr) {
        edge(state.b.c2_in, inputs.cb2, c2_edge_rising(state.b.cr))
    } else {
        false
    };
    state.b.c2_in = inputs.cb2;
}

fn update_control_irqs(state: &mut PiaState) {
    if state.a.c1_triggered {
        state.a.cr |= CR_IRQ1_FLAG;
        if c2_is_output(state.a.cr) && c2_control(state.a.cr) == C2_HANDSHAKE && !state.a.c2_out {
            state.a.c2_out = true;
        }
    }
    if state.a.c2_triggered {
        state.a.cr |= CR_IRQ2_FLAG;
    }
    if state.b.c1_triggered {
        state.b.cr |= CR_IRQ1_FLAG;
        if c2_is_output(state.b.cr) && c2_control(state.b.cr) == C2_HANDSHAKE && !state.b.c2_out {
            state.b.c2_out = true;
        }
    }
    if state.b.c2_triggered {
        state.b.cr |= CR_IRQ2_FLAG;
    }
}

fn read_register(state: &mut PiaState, rs: u8) -> u8 {
    match rs & 0x03 {
        0x00 => {
            if state.a.cr & CR_OR_SELECT != 0 {
                if c2_is_output(state.a.cr) && c2_control(state.a.cr) == C2_HANDSHAKE {
                    state.a.c2_armed = true;
                }
                let val = (state.a.inpr & !state.a.ddr) | (state.a.outr & state.a.ddr);
                state.a.cr &= !(CR_IRQ1_FLAG | CR_IRQ2_FLAG);
                val
            } else {
                state.a.ddr
            }
        }
        0x01 => state.a.cr,
        0x02 => {
            if state.b.cr & CR_OR_SELECT != 0 {
                let val = (state.b.inpr & !state.b.ddr) | (state.b.outr & state.b.ddr);
                state.b.cr &= !(CR_IRQ1_FLAG | CR_IRQ2_FLAG);
                val
            } else {
                state.b.ddr
            }
        }
        0x03 => state.b.cr,
        _ => unreachable!("register select is masked to 2 bits"),
    }
}

fn write_register(state: &mut PiaState, rs: u8, value: u8) {
    match rs & 0x03 {
        0x00 => {
            if state.a.cr & CR_OR_SELECT != 0 {
                state.a.outr = value;
            } else {
                state.a.ddr = value;
            }
        }
        0x01 => {
            state.a.cr = (state.a.cr & 0xC0) | (value & 0x3F);
            if c2_is_output(state.a.cr) && c2_control(state.a.cr) != C2_HANDSHAKE && c2_control(state.a.cr) != C2_PULSE {
                state.a.c2_out = c2_irq2_enabled(state.a.cr);
            }
        }
        0x02 => {
            if state.b.cr & CR_OR_SELECT != 0 {
                state.b.outr = value;
                if c2_is_output(state.b.cr) && c2_control(state.b.cr) == C2_HANDSHAKE {
                    state.b.c2_armed = true;
                }
            } else {
                state.b.ddr = value;
            }
        }
        0x03 => {
            state.b.cr = (state.b.cr & 0xC0) | (value & 0x3F);
            if c2_is_output(state.b.cr) && c2_control(state.b.cr) != C2_HANDSHAKE && c2_control(state.b.cr) != C2_PULSE {
                state.b.c2_out = c2_irq2_enabled(state.b.cr);
            }
        }
        _ => unreachable!("register select is masked to 2 bits"),
    }
}

/// Runs the CA2/CB2 auto-strobe state machine on a ϕ2 falling edge: lowers
/// an armed line, or restores a pulsed (not handshake) line one ϕ2 cycle
/// after it was lowered.
fn handle_strobes(state: &mut PiaState, phi2: bool) {
    let falling = state.prev_phi2 && !phi2;
    if !falling {
        return;
    }
    strobe_port(&mut state.a);
    strobe_port(&mut state.b);
}

fn strobe_port(port: &mut PiaPortState) {
    if port.c2_armed {
        port.c2_out = false;
        port.c2_armed = false;
    } else if !port.c2_out && c2_control(port.cr) == C2_PULSE {
        port.c2_out = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(rs: u8, rw: bool, data: u8) -> PiaInputs {
        PiaInputs {
            cs0: true,
            cs1: true,
            cs2: false,
            phi2: true,
            rw,
            rs,
            data,
            ..PiaInputs::idle()
        }
    }

    #[test]
    fn writing_cra_masks_flag_bits() {
        let mut pia = Pia6520::new();
        pia.tick(selected(0x01, false, 0xFF));
        assert_eq!(pia.state().a.cr & 0xC0, 0);
        assert_eq!(pia.state().a.cr & 0x3F, 0x3F);
    }

    #[test]
    fn ca1_rising_edge_sets_irq1_flag_and_clears_on_ora_read() {
        let mut pia = Pia6520::new();
        pia.tick(selected(0x01, false, 0x07));

        let mut inputs = selected(0x01, false, 0x07);
        inputs.ca1 = false;
        pia.tick(inputs);
        inputs.ca1 = true;
        let out = pia.tick(inputs);
        assert!(out.irqa);
        assert_ne!(pia.state().a.cr & CR_IRQ1_FLAG, 0);

        let read_out = pia.tick(selected(0x00, true, 0));
        assert_eq!(pia.state().a.cr & CR_IRQ1_FLAG, 0);
        assert!(!read_out.irqa);
    }

    #[test]
    fn writing_ra_before_or_select_targets_ddr() {
        let mut pia = Pia6520::new();
        pia.tick(selected(0x00, false, 0x0F));
        assert_eq!(pia.state().a.ddr, 0x0F);
        assert_eq!(pia.state().a.outr, 0);
    }

    #[test]
    fn or_select_bit_routes_writes_to_output_register() {
        let mut pia = Pia6520::new();
        pia.tick(selected(0x01, false, CR_OR_SELECT));
        pia.tick(selected(0x00, false, 0xAB));
        assert_eq!(pia.state().a.outr, 0xAB);
    }

    #[test]
    fn register_access_ignored_while_phi2_low() {
        let mut pia = Pia6520::new();
        let mut inputs = selected(0x00, false, 0x0F);
        inputs.phi2 = false;
        pia.tick(inputs);
        assert_eq!(pia.state().a.ddr, 0);
    }

    #[test]
    fn reset_clears_control_registers() {
        let mut pia = Pia6520::new();
        pia.tick(selected(0x01, false, 0xFF));
        pia.tick(PiaInputs::asserting_reset());
        assert_eq!(pia.state().a.cr, 0);
    }
}
