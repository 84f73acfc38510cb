#![doc = r#"
Cycle-accurate MOS 6502 / 6522 VIA / 6520 PIA core.

Three independent pin-level chip models, each a pure state machine
advanced one clock cycle at a time by a single `tick` call:

- `cpu`: `Cpu6502`, the documented-plus-undocumented 6502 instruction set,
  RESET/NMI/IRQ arbitration, and the 7-cycle BRK entry sequence.
- `via`: `Via6522`, two handshaking 8-bit ports and two 16-bit timers.
- `pia`: `Pia6520`, two 8-bit ports with CA/CB strobe and IRQ logic.

None of the three know about each other at the type level or share a base
trait; a host wires their pin bundles together and owns all memory. This
crate ships no bus, no memory array, no ROM loader, and no clock driver.
"#]

pub mod cpu;
pub mod pia;
pub mod via;

pub use cpu::Cpu6502;
pub use pia::Pia6520;
pub use via::Via6522;
