/*!
state.rs - VIA6522 architectural and microarchitectural state.

Overview
========
`ViaState` owns the sixteen architectural registers plus the per-port and
per-timer scratch records the per-tick sequence in `via::mod` consults.
Nothing here performs bus I/O or register decode; this is pure data plus
the small bit-layout helpers (IFR/IER masks, pipeline bit positions) that
keep the sequencing code in `mod.rs` free of magic numbers.
*/

/// One side (A or B) of the VIA's dual 8-bit port.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortState {
    /// Latched input register, updated per ACR's latch-enable bit.
    pub inpr: u8,
    /// Raw pin snapshot sampled this cycle, pre-latch.
    pub pins: u8,
    /// Output register as last written by the host.
    pub outr: u8,
    /// Data direction register; bit set = output.
    pub ddr: u8,
    /// Last sampled C1 line level.
    pub c1_in: bool,
    /// Last sampled C2 line level.
    pub c2_in: bool,
    /// C1 edge matched the PCR selection this cycle.
    pub c1_triggered: bool,
    /// C2 edge matched the PCR selection this cycle.
    pub c2_triggered: bool,
    /// Driven level of C2 when configured as output (handshake/pulse/manual).
    pub c2_out: bool,
}

/// One of the VIA's two 16-bit countdown timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerState {
    pub latch: u16,
    pub counter: u16,
    /// Toggles on underflow in continuous (free-run) mode; also used as the
    /// one-shot "already fired" guard.
    pub t_bit: bool,
    /// True on the cycle the counter underflows.
    pub t_out: bool,
    /// Delay pipeline: bit 0 = count-enable for this cycle, bit 8 = force a
    /// latch reload next cycle. Shifted right by one at the end of each
    /// tick (see `TIMER_PIP_SHIFT` users in `mod.rs`).
    pub pip: u16,
}

/// IFR/IER bit positions, shared between the two registers.
pub const IFR_CA2: u8 = 0x01;
pub const IFR_CA1: u8 = 0x02;
pub const IFR_SR: u8 = 0x04;
pub const IFR_CB2: u8 = 0x08;
pub const IFR_CB1: u8 = 0x10;
pub const IFR_T2: u8 = 0x20;
pub const IFR_T1: u8 = 0x40;
pub const IFR_ANY: u8 = 0x80;

/// Full VIA6522 architectural + scratch state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViaState {
    pub a: PortState,
    pub b: PortState,
    pub t1: TimerState,
    pub t2: TimerState,
    /// Shift register; present as a plain byte, no shift timing modeled.
    pub sr: u8,
    pub acr: u8,
    pub pcr: u8,
    pub ifr: u8,
    pub ier: u8,
    /// 2-bit IRQ-output delay pipeline (bit 0 = count this cycle, bit 1 =
    /// assert IFR.ANY next cycle).
    pub irq_pip: u8,
    /// Previous PB6 sample, for T2 pulse-counting edge detection.
    pub last_pb6: bool,
}

impl ViaState {
    pub fn new() -> Self {
        Self {
            t1: TimerState {
                counter: 0xFFFF,
                latch: 0xFFFF,
                ..TimerState::default()
            },
            t2: TimerState {
                counter: 0xFFFF,
                latch: 0xFFFF,
                ..TimerState::default()
            },
            ..Default::default()
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_timers_are_all_ones() {
        let s = ViaState::new();
        assert_eq!(s.t1.counter, 0xFFFF);
        assert_eq!(s.t2.counter, 0xFFFF);
    }
}
