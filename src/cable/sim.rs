//! A `Cable` wired straight into a simulated `TapController`, with an optional DMI collaborator
//! on the far side.
use alloc::vec;
use alloc::vec::Vec;

use crate::cable::{shift_data, split_bits, Cable};
use crate::controller::{TapController, TickInput};
use crate::dmi::{DmiPort, NoDmi};

pub struct SimCable<D = NoDmi> {
    tap: TapController,
    dmi: D,
    reset_held: bool,
    cycles: u64,
}

impl SimCable<NoDmi> {
    pub fn new(tap: TapController) -> Self {
        Self::with_dmi(tap, NoDmi)
    }
}

impl<D: DmiPort> SimCable<D> {
    pub fn with_dmi(tap: TapController, dmi: D) -> Self {
        Self {
            tap,
            dmi,
            reset_held: false,
            cycles: 0,
        }
    }

    pub fn tap(&self) -> &TapController {
        &self.tap
    }

    pub fn dmi(&self) -> &D {
        &self.dmi
    }

    pub fn dmi_mut(&mut self) -> &mut D {
        &mut self.dmi
    }

    /// Number of TCK periods driven so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Assert the asynchronous reset.  It stays asserted across clocks until released.
    pub fn assert_reset(&mut self) {
        self.reset_held = true;
        self.tap.reset();
    }

    pub fn release_reset(&mut self) {
        self.reset_held = false;
    }

    /// Drive one TCK period and return the TDO level sampled on its rising edge.
    pub fn clock(&mut self, tms: bool, tdi: bool) -> bool {
        // The DMI collaborator shares the rising edge, so its new serial output is what the
        // controller's output register samples on the falling edge.
        if !self.reset_held {
            let port = self.tap.port(tdi);
            self.dmi.clock(&port);
        }
        let input = TickInput {
            tms,
            tdi,
            reset_asserted: self.reset_held,
            dmi_serial_in: self.dmi.serial_out(),
        };
        self.cycles += 1;
        self.tap.tick(input).tdo
    }
}

impl<D: DmiPort> Cable for SimCable<D> {
    fn change_mode(&mut self, tms: &[usize], tdi: bool) {
        for t in tms {
            self.clock(*t != 0, tdi);
        }
    }

    fn read_data(&mut self, bits: usize) -> Vec<u8> {
        let (bytes, last) = split_bits(bits);
        shift_data(&vec![0xff; bytes], last, false, |tms, tdi| self.clock(tms, tdi))
    }

    fn write_data(&mut self, data: &[u8], bits: u8, pause_after: bool) {
        self.read_write_data(data, bits, pause_after);
    }

    fn read_write_data(&mut self, data: &[u8], bits: u8, pause_after: bool) -> Vec<u8> {
        shift_data(data, bits, pause_after, |tms, tdi| self.clock(tms, tdi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dr::IDCODE;
    use crate::state::TapState;

    #[test]
    fn reads_idcode_from_shift_dr() {
        let mut cable = SimCable::new(TapController::default());
        cable.change_mode(&[1, 0, 0], true);
        assert_eq!(cable.tap().state(), TapState::ShiftDr);

        let bytes = cable.read_data(32);
        assert_eq!(bytes.len(), 4);
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), IDCODE);
        assert_eq!(cable.tap().state(), TapState::ShiftDr);
        assert_eq!(cable.cycles(), 35);
    }

    #[test]
    fn pause_after_lands_in_pause() {
        let mut cable = SimCable::new(TapController::default());
        cable.change_mode(&[1, 1, 0, 0], false);
        assert_eq!(cable.tap().state(), TapState::ShiftIr);
        cable.write_data(&[0x11], 5, true);
        assert_eq!(cable.tap().state(), TapState::PauseIr);
        assert_eq!(cable.tap().ir().shift(), 0x11);
    }

    #[test]
    fn held_reset_pins_the_controller() {
        let mut cable = SimCable::new(TapController::default());
        cable.change_mode(&[1, 1], false);
        cable.assert_reset();
        cable.change_mode(&[1, 1, 0], true);
        assert_eq!(cable.tap().state(), TapState::RunTestIdle);
        cable.release_reset();
        cable.change_mode(&[1], false);
        assert_eq!(cable.tap().state(), TapState::SelectDrScan);
    }
}
