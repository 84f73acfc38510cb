/*!
state.rs - PIA6520 architectural state.

Overview
========
Mirrors `via::state`'s per-port record, but the PIA has no timers and a
6-bit (not 3-bit-times-two) control register. `PiaState` owns both ports'
data/DDR/control registers plus the small scratch fields the strobe state
machine in `mod.rs` needs: `c2_armed` (an OR access requested a strobe this
ϕ2-high phase) and `prev_phi2` (edge detection for step 5 of the per-tick
sequence).
*/

#[derive(Debug, Clone, Copy, Default)]
pub struct PiaPortState {
    pub inpr: u8,
    pub pins: u8,
    pub outr: u8,
    pub ddr: u8,
    pub cr: u8,
    pub c1_in: bool,
    pub c2_in: bool,
    pub c1_triggered: bool,
    pub c2_triggered: bool,
    pub c2_out: bool,
    /// An OR access requested the auto-strobe this ϕ2-high phase; consumed
    /// on the next ϕ2 falling edge.
    pub c2_armed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PiaState {
    pub a: PiaPortState,
    pub b: PiaPortState,
    pub prev_phi2: bool,
}

impl PiaState {
    pub fn new() -> Self {
        let mut s = Self::default();
        s.a.c2_out = true;
        s.b.c2_out = true;
        s
    }
}

pub const CR_IRQ1_ENABLE: u8 = 0x01;
pub const CR_IRQ1_EDGE_RISING: u8 = 0x02;
pub const CR_OR_SELECT: u8 = 0x04;
pub const CR_IRQ2_FLAG: u8 = 0x40;
pub const CR_IRQ1_FLAG: u8 = 0x80;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_c2_is_idle_high() {
        let s = PiaState::new();
        assert!(s.a.c2_out);
        assert!(s.b.c2_out);
    }
}
