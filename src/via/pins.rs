/*!
pins.rs - VIA6522 pin-level input/output bundles.

Overview
========
Same black-box discipline as `cpu::pins`: the host drives `Via6522::tick`
once per clock edge with a `ViaInputs` bundle and reads back a `ViaOutputs`
bundle describing what the chip is driving onto its own pins this cycle.

Active-low convention
----------------------
`reset` and `irq` are active-low lines: `false` means asserted (driven low).
`cs1`/`ca1`/`ca2`/`cb1`/`cb2` are plain line levels (active-high, matching
the 6522 datasheet's CS1/CA/CB naming) except `cs2`, which the real chip
wires active-low; `false` selects the chip on `cs2`.
*/

/// Per-cycle VIA inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViaInputs {
    /// RESET line, active low.
    pub reset: bool,
    /// Chip select 1, active high.
    pub cs1: bool,
    /// Chip select 2, active low.
    pub cs2: bool,
    /// Read/write select: `true` = read, `false` = write.
    pub rw: bool,
    /// 4-bit register select (`0..=15`).
    pub rs: u8,
    /// Data bus value; the byte being written when `rw` is false, ignored
    /// otherwise.
    pub data: u8,
    pub ca1: bool,
    pub ca2: bool,
    pub cb1: bool,
    pub cb2: bool,
    /// External (input) levels on port A/B, sampled every cycle.
    pub pa: u8,
    pub pb: u8,
}

impl Default for ViaInputs {
    /// Every line idle: RESET released, chip deselected (`cs1` low, `cs2`
    /// high — neither satisfies the `cs1 && !cs2` select condition).
    fn default() -> Self {
        Self {
            reset: true,
            cs1: false,
            cs2: true,
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

impl ViaInputs {
    /// Inputs asserting RESET with every other line idle.
    pub fn asserting_reset() -> Self {
        Self {
            reset: false,
            ..Self::default()
        }
    }

    /// An unselected idle bus cycle: no chip select, RESET released.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Per-cycle VIA outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViaOutputs {
    /// IRQ line, active low: `true` means asserted (driven low).
    pub irq: bool,
    /// Data bus value driven back to the host on a register read.
    pub data: u8,
    pub pa: u8,
    /// Port A data-direction mask (1 = output), exposed so a host can mux
    /// `pa` against external logic without duplicating `ddr_a`.
    pub pa_dir: u8,
    pub pb: u8,
    pub pb_dir: u8,
    pub ca2: bool,
    pub ca2_dir: bool,
    pub cb1: bool,
    pub cb1_dir: bool,
    pub cb2: bool,
    pub cb2_dir: bool,
}
