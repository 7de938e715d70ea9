//! This provides a higher-level interface than the `Cable` trait.  Specifically, it keeps track of
//! the state of the TAP from the host's side, and allows setting the state to any desired state.
//! `JtagSM` will get to that state by the most efficient path, based on the current state.
use alloc::vec;
use alloc::vec::Vec;

use crate::cable::Cable;
use crate::state::TapState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    Data,
    Instruction
}

/// TMS sequence that reaches TestLogicReset from any state and then settles in RunTestIdle.
pub const RESET_SEQUENCE: [usize; 6] = [1, 1, 1, 1, 1, 0];

/// Shortest TMS sequence leading from `from` to `to`.  Empty if they are the same state.
pub fn tms_path(from: TapState, to: TapState) -> Vec<usize> {
    if from == to {
        return vec![];
    }

    let mut paths = vec![(from, Vec::new())];
    loop {
        let mut newpaths = Vec::new();

        for (state, path) in paths {
            for tms in [0, 1] {
                let next = state.next(tms != 0);
                let mut p = path.clone();
                p.push(tms);

                if next == to {
                    return p;
                }
                newpaths.push((next, p));
            }
        }

        paths = newpaths;
    }
}

pub struct JtagSM<T> {
    pub cable: T,
    state: TapState,
}

impl<T, U> JtagSM<T>
    where T: core::ops::DerefMut<Target=U>,
          U: Cable + ?Sized
{
    /// Create a JTAG state machine using an existing `Cable`.  The TAP is reset on the way.
    pub fn new(mut cable: T) -> Self {
        cable.change_mode(&RESET_SEQUENCE, true);

        Self {
            cable,
            state: TapState::RunTestIdle,
        }
    }

    /// Where the host believes the TAP currently is.
    pub fn state(&self) -> TapState {
        self.state
    }

    /// Reset the TAP by driving TMS high for 5 clocks, ending in RunTestIdle
    pub fn mode_reset(&mut self)
    {
        self.cable.change_mode(&RESET_SEQUENCE, true);
        self.state = TapState::RunTestIdle;
    }

    /// Use TMS to get into `state` by the most efficient path
    pub fn change_mode(&mut self, state: TapState) {
        if self.state == state {
            return;
        }

        let path = tms_path(self.state, state);
        log::trace!("path from {:?} to {:?}: {:?}", self.state, state, path);
        self.cable.change_mode(&path, true);
        self.state = state;
    }

    /// Clock the TAP through the Capture state of `reg` and settle in RunTestIdle.
    pub fn recapture(&mut self, reg: Register) {
        let capture = match reg {
            Register::Data => TapState::CaptureDr,
            Register::Instruction => TapState::CaptureIr,
        };
        self.change_mode(capture);
        self.change_mode(TapState::RunTestIdle);
    }

    fn enter_shift(&mut self, reg: Register) {
        if reg == Register::Data {
            self.change_mode(TapState::ShiftDr);
        } else {
            self.change_mode(TapState::ShiftIr);
        }
    }

    fn leave_shift(&mut self, reg: Register, pause_after: bool) {
        if pause_after {
            if reg == Register::Data {
                self.state = TapState::PauseDr;
            } else {
                self.state = TapState::PauseIr;
            }
        }
    }

    /// Read `bits` from either the instruction or data register
    pub fn read_reg(&mut self, reg: Register, bits: usize) -> Vec<u8> {
        self.enter_shift(reg);
        self.cable.read_data(bits)
    }

    /// Write `data` into either the instruction or data register.  `bits` indicates how many bits
    /// of the last byte should be written (8 indicates that the entire byte should be written).
    /// The mode will either be ShiftIR / ShiftDR if `pause_after` is false, or PauseIR / PauseDR
    /// if `pause_after` is true.  This allows for setting the register with multiple calls to
    /// `write_reg`, which may be more convenient than manual bit-shifting.
    pub fn write_reg(&mut self, reg: Register, data: &[u8], bits: u8, pause_after: bool) {
        self.enter_shift(reg);
        self.cable.write_data(data, bits, pause_after);
        self.leave_shift(reg, pause_after);
    }

    /// Similar to `write_reg` except it returns the bits that were shifted out during writing.
    pub fn read_write_reg(&mut self, reg: Register, data: &[u8], bits: u8, pause_after: bool) -> Vec<u8> {
        self.enter_shift(reg);
        let data = self.cable.read_write_data(data, bits, pause_after);
        self.leave_shift(reg, pause_after);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cable::sim::SimCable;
    use crate::controller::TapController;

    #[test]
    fn shortest_paths() {
        use TapState::*;

        assert_eq!(tms_path(RunTestIdle, ShiftDr), vec![1, 0, 0]);
        assert_eq!(tms_path(RunTestIdle, ShiftIr), vec![1, 1, 0, 0]);
        assert_eq!(tms_path(PauseIr, RunTestIdle), vec![1, 1, 0]);
        assert_eq!(tms_path(ShiftDr, ShiftDr), Vec::<usize>::new());
        assert_eq!(tms_path(SelectIrScan, TestLogicReset), vec![1]);
        assert_eq!(tms_path(TestLogicReset, TestLogicReset), Vec::<usize>::new());
    }

    #[test]
    fn every_path_lands_on_its_target() {
        for from in TapState::ALL {
            for to in TapState::ALL {
                let end = tms_path(from, to)
                    .iter()
                    .fold(from, |state, tms| state.next(*tms != 0));
                assert_eq!(end, to, "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn host_and_tap_agree() {
        let mut cable = SimCable::new(TapController::default());
        let mut sm = JtagSM::new(&mut cable);
        for target in [TapState::ShiftIr, TapState::PauseDr, TapState::TestLogicReset, TapState::UpdateIr] {
            sm.change_mode(target);
            assert_eq!(sm.state(), target);
            assert_eq!(sm.cable.tap().state(), target);
        }

        sm.write_reg(Register::Instruction, &[0x10], 5, true);
        assert_eq!(sm.state(), TapState::PauseIr);
        assert_eq!(sm.cable.tap().state(), TapState::PauseIr);

        sm.recapture(Register::Instruction);
        assert_eq!(sm.state(), TapState::RunTestIdle);
        assert_eq!(sm.cable.tap().ir().latched(), 0x10);
    }
}
