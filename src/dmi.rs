//! The DMI side of the DTM.  The controller never stores DMI state: it forwards TDI and a
//! handful of control signals to a `DmiPort`, and routes the port's serial output to TDO while
//! DMIACCESS is selected.

use crate::controller::PortSignals;

/// An external collaborator hanging off the DMI path.
pub trait DmiPort {
    /// Clock the collaborator on a TCK rising edge.
    fn clock(&mut self, port: &PortSignals);
    /// The bit the collaborator currently presents towards TDO.
    fn serial_out(&self) -> bool;
}

/// No DMI collaborator attached.  Reads as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDmi;

impl DmiPort for NoDmi {
    fn clock(&mut self, _port: &PortSignals) {}

    fn serial_out(&self) -> bool {
        false
    }
}

/// Widest DTMCS `abits` value; the field is six bits.
pub const MAX_ABITS: u8 = 0x3f;

/// A bare `abits + 34` bit DMI shift register with no Debug Module behind it.  Capture loads
/// `response`, UpdateDr records the shifted value in `last_update`, and `dmireset` clears both.
#[derive(Clone, Debug)]
pub struct DmiShiftRegister {
    width: u32,
    value: u128,
    pub response: u128,
    pub last_update: Option<u128>,
}

impl DmiShiftRegister {
    /// `abits` is truncated to the six bits DTMCS can report, so the register is at most 97 bits.
    pub fn new(abits: u8) -> Self {
        Self {
            width: u32::from(abits & MAX_ABITS) + 34,
            value: 0,
            response: 0,
            last_update: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    fn mask(&self) -> u128 {
        (1 << self.width) - 1
    }
}

impl DmiPort for DmiShiftRegister {
    fn clock(&mut self, port: &PortSignals) {
        if port.dmi_reset {
            self.value = 0;
            self.last_update = None;
            return;
        }
        if !port.dmi_access() {
            return;
        }

        if port.capture_dr() {
            self.value = self.response & self.mask();
        } else if port.shift_dr() {
            let top = u128::from(port.dmi_serial_out) << (self.width - 1);
            self.value = (self.value >> 1) | top;
        } else if port.update_dr() {
            self.last_update = Some(self.value);
        }
    }

    fn serial_out(&self) -> bool {
        self.value & 1 == 1
    }
}
