/*!
pins.rs - PIA6520 pin-level input/output bundles.

Overview
========
Same discipline as `cpu::pins`/`via::pins`. The PIA additionally exposes
`phi2`: unlike the CPU and VIA (which are driven once per clock edge by
`tick` itself), the PIA's register decode and strobe timing are gated by
the caller's explicit `phi2` level, so the host must toggle it across
successive `tick` calls to reproduce the two-phase clock the real chip
sees.
*/

/// Per-cycle PIA inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiaInputs {
    /// RESET line, active low.
    pub reset: bool,
    pub cs0: bool,
    pub cs1: bool,
    /// Chip select 2, active low.
    pub cs2: bool,
    /// ϕ2 clock phase; register access and strobe timing only occur while
    /// this is high.
    pub phi2: bool,
    /// Read/write select: `true` = read, `false` = write.
    pub rw: bool,
    /// 2-bit register select (`0..=3`): `00`=PRA/DDRA, `01`=CRA,
    /// `10`=PRB/DDRB, `11`=CRB.
    pub rs: u8,
    pub data: u8,
    pub ca1: bool,
    pub ca2: bool,
    pub cb1: bool,
    pub cb2: bool,
    pub pa: u8,
    pub pb: u8,
}

impl Default for PiaInputs {
    /// Every line idle: RESET released, chip deselected, clock phase low.
    fn default() -> Self {
        Self {
            reset: true,
            cs0: false,
            cs1: false,
            cs2: true,
            phi2: false,
            rw: true,
            rs: 0,
            data: 0,
            ca1: true,
            ca2: true,
            cb1: true,
            cb2: true,
            pa: 0,
            pb: 0,
        }
    }
}

impl PiaInputs {
    pub fn asserting_reset() -> Self {
        Self {
            reset: false,
            ..Self::default()
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

/// Per-cycle PIA outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiaOutputs {
    /// IRQA line, active low: `true` means asserted.
    pub irqa: bool,
    /// IRQB line, active low: `true` means asserted.
    pub irqb: bool,
    pub data: u8,
    pub pa: u8,
    pub pa_dir: u8,
    pub pb: u8,
    pub pb_dir: u8,
    pub ca2: bool,
    pub ca2_dir: bool,
    pub cb2: bool,
    pub cb2_dir: bool,
}
