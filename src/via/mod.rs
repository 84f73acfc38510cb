/*!
via/mod.rs - MOS 6522 VIA per-tick sequence and register decode.

Overview
========
`Via6522` is the public facade, mirroring `cpu::Cpu6502`: a thin wrapper
around `ViaState` whose only real entry point is `tick`. The eleven-step
sequence below follows the order the data model requires: sample and
edge-detect the control lines, tick both timers, resolve the IRQ output,
compute the driven pin levels, service a register access if chip-selected,
then advance the small shift-register pipelines that give the timer reload
and IRQ output their one-cycle latency.

The shift register (`$A`) is a plain read/write byte; no shift timing is
modeled, matching the documented open question.
*/

mod pins;
mod state;

pub use pins::{ViaInputs, ViaOutputs};
pub use state::{PortState, TimerState, ViaState, IFR_CA1, IFR_CA2, IFR_CB1, IFR_CB2, IFR_SR, IFR_T1, IFR_T2};

const IFR_ANY: u8 = 0x80;

/// A MOS 6522 Versatile Interface Adapter, advanced one clock edge per
/// `tick` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Via6522 {
    state: ViaState,
}

impl Via6522 {
    pub fn new() -> Self {
        Self {
            state: ViaState::new(),
        }
    }

    pub fn tick(&mut self, inputs: ViaInputs) -> ViaOutputs {
        tick(&mut self.state, inputs)
    }

    pub fn state(&self) -> &ViaState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViaState {
        &mut self.state
    }
}

fn tick(state: &mut ViaState, inputs: ViaInputs) -> ViaOutputs {
    if !inputs.reset {
        reset(state);
        return ViaOutputs::default();
    }

    self_clear_pulse(state);
    sample_and_detect(state, inputs);
    update_control_irqs(state);
    tick_timer1(state);
    tick_timer2(state, inputs);
    update_irq_output(state);

    let mut outputs = compute_pin_outputs(state);

    if inputs.cs1 && !inputs.cs2 {
        if inputs.rw {
            outputs.data = read_register(state, inputs.rs);
        } else {
            write_register(state, inputs.rs, inputs.data);
        }
    }

    advance_pipelines(state);
    state.last_pb6 = inputs.pb & 0x40 != 0;

    outputs
}

fn reset(state: &mut ViaState) {
    let (t1, t2) = (state.t1, state.t2);
    *state = ViaState::new();
    state.t1.counter = t1.counter;
    state.t1.latch = t1.latch;
    state.t2.counter = t2.counter;
    state.t2.latch = t2.latch;
}

// --- PCR decode -------------------------------------------------------

fn ca1_edge_rising(pcr: u8) -> bool {
    pcr & 0x01 != 0
}

fn ca2_control(pcr: u8) -> u8 {
    (pcr >> 1) & 0x07
}

fn cb1_edge_rising(pcr: u8) -> bool {
    pcr & 0x10 != 0
}

fn cb2_control(pcr: u8) -> u8 {
    (pcr >> 5) & 0x07
}

fn c2_is_output(control: u8) -> bool {
    control & 0x04 != 0
}

fn c2_edge_rising(control: u8) -> bool {
    control & 0x02 != 0
}

fn c2_is_independent(control: u8) -> bool {
    control & 0x01 != 0
}

const C2_HANDSHAKE: u8 = 0b100;
const C2_PULSE: u8 = 0b101;

/// Pulse-mode C2 self-clears one cycle after the access that lowered it;
/// handshake mode instead waits for the next C1 transition (step 4).
fn self_clear_pulse(state: &mut ViaState) {
    if ca2_control(state.pcr) == C2_PULSE && !state.a.c2_out {
        state.a.c2_out = true;
    }
    if cb2_control(state.pcr) == C2_PULSE && !state.b.c2_out {
        state.b.c2_out = true;
    }
}

// --- Steps 2-3: sample inputs, detect transitions ----------------------

fn sample_and_detect(state: &mut ViaState, inputs: ViaInputs) {
    let ca2_ctrl = ca2_control(state.pcr);
    let cb2_ctrl = cb2_control(state.pcr);

    state.a.c1_triggered = edge(state.a.c1_in, inputs.ca1, ca1_edge_rising(state.pcr));
    state.a.c1_in = inputs.ca1;
    state.a.c2_triggered = if !c2_is_output(ca2_ctrl) {
        edge(state.a.c2_in, inputs.ca2, c2_edge_rising(ca2_ctrl))
    } else {
        false
    };
    state.a.c2_in = inputs.ca2;

    state.b.c1_triggered = edge(state.b.c1_in, inputs.cb1, cb1_edge_rising(state.pcr));
    state.b.c1_in = inputs.cb1;
    state.b.c2_triggered = if !c2_is_output(cb2_ctrl) {
        edge(state.b.c2_in, inputs.cb2, c2_edge_rising(cb2_ctrl))
    } else {
        false
    };
    state.b.c2_in = inputs.cb2;

    state.a.pins = inputs.pa;
    if state.acr & 0x01 != 0 {
        if state.a.c1_triggered {
            state.a.inpr = inputs.pa;
        }
    } else {
        state.a.inpr = inputs.pa;
    }

    state.b.pins = inputs.pb;
    if state.acr & 0x02 != 0 {
        if state.b.c1_triggered {
            state.b.inpr = inputs.pb;
        }
    } else {
        state.b.inpr = inputs.pb;
    }
}

fn edge(prev: bool, cur: bool, rising_selects: bool) -> bool {
    if rising_selects {
        !prev && cur
    } else {
        prev && !cur
    }
}

// --- Step 4: control-line IRQ flags ------------------------------------

fn update_control_irqs(state: &mut ViaState) {
    if state.a.c1_triggered {
        state.ifr |= IFR_CA1;
        if ca2_control(state.pcr) == C2_HANDSHAKE {
            state.a.c2_out = true;
        }
    }
    if state.a.c2_triggered {
        state.ifr |= IFR_CA2;
    }
    if state.b.c1_triggered {
        state.ifr |= IFR_CB1;
        if cb2_control(state.pcr) == C2_HANDSHAKE {
            state.b.c2_out = true;
        }
    }
    if state.b.c2_triggered {
        state.ifr |= IFR_CB2;
    }
}

// --- Step 5: Timer 1 ----------------------------------------------------

fn tick_timer1(state: &mut ViaState) {
    if state.t1.pip & 0x01 != 0 {
        let (next, underflow) = state.t1.counter.overflowing_sub(1);
        state.t1.counter = next;
        state.t1.t_out = underflow;
        if underflow {
            let continuous = state.acr & 0x40 != 0;
            if continuous {
                state.t1.t_bit = !state.t1.t_bit;
                state.ifr |= IFR_T1;
            } else if !state.t1.t_bit {
                state.ifr |= IFR_T1;
                state.t1.t_bit = true;
            }
            state.t1.pip |= 0x100;
        }
    } else {
        state.t1.t_out = false;
    }

    if state.t1.pip & 0x100 != 0 {
        state.t1.counter = state.t1.latch;
    }
}

// --- Step 6: Timer 2 -----------------------------------------------------

fn tick_timer2(state: &mut ViaState, inputs: ViaInputs) {
    let pulse_counting = state.acr & 0x20 != 0;
    let pb6_now = inputs.pb & 0x40 != 0;
    let decrement = if pulse_counting {
        state.last_pb6 && !pb6_now
    } else {
        state.t2.pip & 0x01 != 0
    };

    if !decrement {
        state.t2.t_out = false;
        return;
    }

    let (next, underflow) = state.t2.counter.overflowing_sub(1);
    state.t2.counter = next;
    state.t2.t_out = underflow;
    if underflow && !state.t2.t_bit {
        state.ifr |= IFR_T2;
        state.t2.t_bit = true;
    }
}

// --- Step 7: IRQ output ---------------------------------------------------

fn update_irq_output(state: &mut ViaState) {
    if state.ifr & state.ier & 0x7F != 0 {
        state.irq_pip |= 0b10;
    }
    if state.irq_pip & 0b01 != 0 {
        state.ifr |= IFR_ANY;
    } else {
        state.ifr &= !IFR_ANY;
    }
}

// --- Step 8: pin outputs ---------------------------------------------------

fn compute_pin_outputs(state: &ViaState) -> ViaOutputs {
    let pa_pins = (state.a.inpr & !state.a.ddr) | (state.a.outr & state.a.ddr);
    let mut pb_pins = (state.b.inpr & !state.b.ddr) | (state.b.outr & state.b.ddr);
    let mut pb_dir = state.b.ddr;
    if state.acr & 0x80 != 0 {
        pb_pins = (pb_pins & 0x7F) | if state.t1.t_bit { 0x80 } else { 0 };
        pb_dir |= 0x80;
    }

    let ca2_ctrl = ca2_control(state.pcr);
    let cb2_ctrl = cb2_control(state.pcr);

    ViaOutputs {
        irq: state.ifr & IFR_ANY != 0,
        data: 0,
        pa: pa_pins,
        pa_dir: state.a.ddr,
        pb: pb_pins,
        pb_dir,
        ca2: state.a.c2_out,
        ca2_dir: c2_is_output(ca2_ctrl),
        cb1: state.b.c1_in,
        cb1_dir: false,
        cb2: state.b.c2_out,
        cb2_dir: c2_is_output(cb2_ctrl),
    }
}

// --- Steps 9: register decode ---------------------------------------------

fn read_register(state: &mut ViaState, rs: u8) -> u8 {
    match rs & 0x0F {
        0x00 => {
            state.ifr &= !IFR_CB1;
            if !c2_is_independent(cb2_control(state.pcr)) {
                state.ifr &= !IFR_CB2;
            }
            read_port_b(state)
        }
        0x01 => {
            state.ifr &= !IFR_CA1;
            if !c2_is_independent(ca2_control(state.pcr)) {
                state.ifr &= !IFR_CA2;
            }
            read_port_a(state)
        }
        0x02 => state.b.ddr,
        0x03 => state.a.ddr,
        0x04 => {
            state.ifr &= !IFR_T1;
            state.t1.counter as u8
        }
        0x05 => (state.t1.counter >> 8) as u8,
        0x06 => state.t1.latch as u8,
        0x07 => (state.t1.latch >> 8) as u8,
        0x08 => {
            state.ifr &= !IFR_T2;
            state.t2.counter as u8
        }
        0x09 => (state.t2.counter >> 8) as u8,
        0x0A => state.sr,
        0x0B => state.acr,
        0x0C => state.pcr,
        0x0D => state.ifr,
        0x0E => state.ier | 0x80,
        0x0F => read_port_a(state),
        _ => unreachable!("register select is masked to 4 bits"),
    }
}

fn write_register(state: &mut ViaState, rs: u8, value: u8) {
    match rs & 0x0F {
        0x00 => {
            state.ifr &= !(IFR_CB1 | IFR_CB2);
            state.b.outr = value;
        }
        0x01 => {
            state.ifr &= !(IFR_CA1 | IFR_CA2);
            state.a.outr = value;
        }
        0x02 => state.b.ddr = value,
        0x03 => state.a.ddr = value,
        0x04 => state.t1.latch = (state.t1.latch & 0xFF00) | u16::from(value),
        0x05 => {
            state.t1.latch = (state.t1.latch & 0x00FF) | (u16::from(value) << 8);
            state.t1.counter = state.t1.latch;
            state.t1.t_bit = false;
            state.ifr &= !IFR_T1;
        }
        0x06 => state.t1.latch = (state.t1.latch & 0xFF00) | u16::from(value),
        0x07 => {
            state.t1.latch = (state.t1.latch & 0x00FF) | (u16::from(value) << 8);
            state.ifr &= !IFR_T1;
        }
        0x08 => state.t2.latch = (state.t2.latch & 0xFF00) | u16::from(value),
        0x09 => {
            state.t2.counter = u16::from(state.t2.latch as u8) | (u16::from(value) << 8);
            state.t2.t_bit = false;
            state.ifr &= !IFR_T2;
        }
        0x0A => state.sr = value,
        0x0B => {
            if state.acr & 0x20 != 0 && value & 0x20 == 0 {
                state.t2.pip &= !0x01;
            }
            state.acr = value;
        }
        0x0C => {
            state.pcr = value;
            let ca2_ctrl = ca2_control(value);
            if c2_is_output(ca2_ctrl) && ca2_ctrl != C2_HANDSHAKE && ca2_ctrl != C2_PULSE {
                state.a.c2_out = c2_is_independent(ca2_ctrl);
            }
            let cb2_ctrl = cb2_control(value);
            if c2_is_output(cb2_ctrl) && cb2_ctrl != C2_HANDSHAKE && cb2_ctrl != C2_PULSE {
                state.b.c2_out = c2_is_independent(cb2_ctrl);
            }
        }
        0x0D => {
            if value & 0x80 != 0 {
                state.ifr = 0;
            } else {
                state.ifr &= !(value & 0x7F);
            }
        }
        0x0E => {
            if value & 0x80 != 0 {
                state.ier |= value & 0x7F;
            } else {
                state.ier &= !(value & 0x7F);
            }
        }
        0x0F => state.a.outr = value,
        _ => unreachable!("register select is masked to 4 bits"),
    }
}

fn read_port_a(state: &mut ViaState) -> u8 {
    if ca2_control(state.pcr) == C2_PULSE || ca2_control(state.pcr) == C2_HANDSHAKE {
        state.a.c2_out = false;
    }
    (state.a.inpr & !state.a.ddr) | (state.a.outr & state.a.ddr)
}

fn read_port_b(state: &ViaState) -> u8 {
    let mut val = (state.b.inpr & !state.b.ddr) | (state.b.outr & state.b.ddr);
    if state.acr & 0x80 != 0 {
        val = (val & 0x7F) | if state.t1.t_bit { 0x80 } else { 0 };
    }
    val
}

// --- Step 10: pipeline advance ---------------------------------------------

fn advance_pipelines(state: &mut ViaState) {
    state.t1.pip |= 0x04;
    state.t1.pip >>= 1;
    state.t2.pip |= 0x04;
    state.t2.pip >>= 1;
    state.irq_pip >>= 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_irq_enables_but_keeps_counter() {
        let mut via = Via6522::new();
        via.state_mut().ier = 0xFF;
        via.state_mut().t1.counter = 0x1234;
        via.tick(ViaInputs::asserting_reset());
        assert_eq!(via.state().ier, 0);
        assert_eq!(via.state().t1.counter, 0x1234);
    }

    #[test]
    fn timer1_continuous_irq_within_n_plus_two_ticks() {
        let mut via = Via6522::new();
        via.tick(ViaInputs::idle());
        via.state_mut().acr = 0x40;
        via.state_mut().ier = 0x80 | IFR_T1;
        let mut inputs = ViaInputs::idle();
        inputs.cs1 = true;
        inputs.cs2 = false;
        inputs.rw = false;
        inputs.rs = 0x04;
        inputs.data = 0x05;
        via.tick(inputs);
        inputs.rs = 0x05;
        inputs.data = 0x00;
        via.tick(inputs);

        let mut irq_seen = false;
        for _ in 0..7 {
            let out = via.tick(ViaInputs::idle());
            if out.irq {
                irq_seen = true;
            }
        }
        assert!(irq_seen);
    }

    #[test]
    fn ier_read_has_bit7_set() {
        let mut via = Via6522::new();
        via.state_mut().ier = 0x42;
        let mut inputs = ViaInputs::idle();
        inputs.cs1 = true;
        inputs.cs2 = false;
        inputs.rw = true;
        inputs.rs = 0x0E;
        let out = via.tick(inputs);
        assert_eq!(out.data, 0xC2);
    }

    #[test]
    fn writing_ora_clears_ca_flags() {
        let mut via = Via6522::new();
        via.state_mut().ifr = IFR_CA1 | IFR_CA2 | IFR_T1;
        let mut inputs = ViaInputs::idle();
        inputs.cs1 = true;
        inputs.cs2 = false;
        inputs.rw = false;
        inputs.rs = 0x01;
        inputs.data = 0xAA;
        via.tick(inputs);
        assert_eq!(via.state().ifr & (IFR_CA1 | IFR_CA2), 0);
        assert_ne!(via.state().ifr & IFR_T1, 0);
    }

    #[test]
    fn ca1_rising_edge_sets_flag_and_clears_on_ora_read() {
        let mut via = Via6522::new();
        via.state_mut().pcr = 0x01;
        let mut inputs = ViaInputs::idle();
        inputs.ca1 = false;
        via.tick(inputs);
        inputs.ca1 = true;
        via.tick(inputs);
        assert_ne!(via.state().ifr & IFR_CA1, 0);

        let mut read_inputs = ViaInputs::idle();
        read_inputs.cs1 = true;
        read_inputs.cs2 = false;
        read_inputs.rw = true;
        read_inputs.rs = 0x01;
        via.tick(read_inputs);
        assert_eq!(via.state().ifr & IFR_CA1, 0);
    }

    #[test]
    fn ddr_gates_pin_output() {
        let mut via = Via6522::new();
        via.state_mut().a.ddr = 0x0F;
        via.state_mut().a.outr = 0xAB;
        let mut inputs = ViaInputs::idle();
        inputs.pa = 0xC0;
        let out = via.tick(inputs);
        assert_eq!(out.pa, 0xCB);
    }
}
