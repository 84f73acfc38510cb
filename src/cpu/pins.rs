/*!
pins.rs - CPU6502 pin-level input/output bundles.

Overview
========
The CPU is a black box: callers drive it one clock cycle at a time via
`Cpu6502::tick`, supplying a `CpuInputs` bundle and receiving a `CpuOutputs`
bundle. There is no bus reference inside the CPU at all; the host reads
`CpuOutputs` after every tick, performs the memory access it describes
(or none, if the host is servicing a previous write), and builds the next
`CpuInputs` from whatever the memory array returns.

Active-low convention
----------------------
`reset`, `nmi`, and `irq` are active-low lines, matching the silicon: the
boolean is the literal line level, so `false` means the line is asserted
(driven low) and `true` means it is idle (high). `ready` is active-high:
`true` means the bus is ready and the CPU may proceed; `false` pauses read
cycles only (see `Cpu6502::tick`).
*/

/// Per-cycle CPU inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuInputs {
    /// RESET line, active low. Hold low for several ticks to force a reset.
    pub reset: bool,
    /// NMI line, active low, edge-triggered on the high-to-low transition.
    pub nmi: bool,
    /// IRQ line, active low, level-triggered (gated by the I flag).
    pub irq: bool,
    /// READY line, active high. Low pauses the CPU on read cycles only.
    pub ready: bool,
    /// Data bus value the host is presenting for this cycle's read.
    /// Ignored by the CPU on write cycles.
    pub data: u8,
}

impl Default for CpuInputs {
    /// All lines idle (inactive), `data` floating at zero.
    fn default() -> Self {
        Self {
            reset: true,
            nmi: true,
            irq: true,
            ready: true,
            data: 0,
        }
    }
}

impl CpuInputs {
    /// Inputs with every line idle and the given `data` byte presented.
    pub fn idle_with_data(data: u8) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Inputs asserting RESET (line driven low) with everything else idle.
    pub fn asserting_reset() -> Self {
        Self {
            reset: false,
            ..Self::default()
        }
    }
}

/// Per-cycle CPU outputs, valid for the host to act on once `tick` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuOutputs {
    /// 16-bit address bus value for this cycle.
    pub addr: u16,
    /// 8-bit data bus value; meaningful only when `rw` is false (a write).
    pub data: u8,
    /// Read/write select: `true` = read, `false` = write.
    pub rw: bool,
    /// Asserted on the cycle that fetches a new opcode (SYNC).
    pub sync: bool,
}

impl Default for CpuOutputs {
    /// Power-on default: reading address 0.
    fn default() -> Self {
        Self {
            addr: 0,
            data: 0,
            rw: true,
            sync: true,
        }
    }
}
