//! The 16-state TAP controller state machine.  `TapState::next` is the TMS-keyed transition
//! table, and `ControlSignals` is the set of one-hot outputs decoded from the current state.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TapState {
    TestLogicReset = 0,
    RunTestIdle = 1,
    SelectDrScan = 2,
    CaptureDr = 3,
    ShiftDr = 4,
    Exit1Dr = 5,
    PauseDr = 6,
    Exit2Dr = 7,
    UpdateDr = 8,
    SelectIrScan = 9,
    CaptureIr = 10,
    ShiftIr = 11,
    Exit1Ir = 12,
    PauseIr = 13,
    Exit2Ir = 14,
    UpdateIr = 15,
}

impl TapState {
    /// Every state, in encoding order.
    pub const ALL: [TapState; 16] = [
        TapState::TestLogicReset,
        TapState::RunTestIdle,
        TapState::SelectDrScan,
        TapState::CaptureDr,
        TapState::ShiftDr,
        TapState::Exit1Dr,
        TapState::PauseDr,
        TapState::Exit2Dr,
        TapState::UpdateDr,
        TapState::SelectIrScan,
        TapState::CaptureIr,
        TapState::ShiftIr,
        TapState::Exit1Ir,
        TapState::PauseIr,
        TapState::Exit2Ir,
        TapState::UpdateIr,
    ];

    /// The state the controller moves to on the next TCK rising edge given `tms`.
    pub fn next(self, tms: bool) -> TapState {
        use TapState::*;

        match (self, tms) {
            (TestLogicReset, false) => RunTestIdle,
            (TestLogicReset, true) => TestLogicReset,
            (RunTestIdle, false) => RunTestIdle,
            (RunTestIdle, true) => SelectDrScan,

            (SelectDrScan, false) => CaptureDr,
            (SelectDrScan, true) => SelectIrScan,
            (CaptureDr, false) => ShiftDr,
            (CaptureDr, true) => Exit1Dr,
            (ShiftDr, false) => ShiftDr,
            (ShiftDr, true) => Exit1Dr,
            (Exit1Dr, false) => PauseDr,
            (Exit1Dr, true) => UpdateDr,
            (PauseDr, false) => PauseDr,
            (PauseDr, true) => Exit2Dr,
            (Exit2Dr, false) => ShiftDr,
            (Exit2Dr, true) => UpdateDr,
            (UpdateDr, false) => RunTestIdle,
            (UpdateDr, true) => SelectDrScan,

            (SelectIrScan, false) => CaptureIr,
            (SelectIrScan, true) => TestLogicReset,
            (CaptureIr, false) => ShiftIr,
            (CaptureIr, true) => Exit1Ir,
            (ShiftIr, false) => ShiftIr,
            (ShiftIr, true) => Exit1Ir,
            (Exit1Ir, false) => PauseIr,
            (Exit1Ir, true) => UpdateIr,
            (PauseIr, false) => PauseIr,
            (PauseIr, true) => Exit2Ir,
            (Exit2Ir, false) => ShiftIr,
            (Exit2Ir, true) => UpdateIr,
            (UpdateIr, false) => RunTestIdle,
            (UpdateIr, true) => SelectDrScan,
        }
    }

    /// Decode a raw 4-bit state encoding.  Encodings that cannot name a state fall back to
    /// `TestLogicReset`.
    pub fn from_bits(bits: u8) -> TapState {
        match Self::ALL.get(usize::from(bits)) {
            Some(state) => *state,
            None => TapState::TestLogicReset,
        }
    }

    /// The control signals asserted while the controller sits in this state.
    pub fn signals(self) -> ControlSignals {
        let mut signals = ControlSignals::default();
        match self {
            // The test_logic_reset output is held low here; register resets key off the state
            // itself, not this signal.
            TapState::TestLogicReset => signals.test_logic_reset = false,
            TapState::RunTestIdle => signals.run_test_idle = true,
            TapState::CaptureDr => signals.capture_dr = true,
            TapState::ShiftDr => signals.shift_dr = true,
            TapState::PauseDr => signals.pause_dr = true,
            TapState::UpdateDr => signals.update_dr = true,
            TapState::CaptureIr => signals.capture_ir = true,
            TapState::ShiftIr => signals.shift_ir = true,
            TapState::PauseIr => signals.pause_ir = true,
            TapState::UpdateIr => signals.update_ir = true,
            TapState::SelectDrScan
            | TapState::Exit1Dr
            | TapState::Exit2Dr
            | TapState::SelectIrScan
            | TapState::Exit1Ir
            | TapState::Exit2Ir => {}
        }
        signals
    }

    pub fn is_dr_path(self) -> bool {
        (TapState::SelectDrScan as u8..=TapState::UpdateDr as u8).contains(&(self as u8))
    }

    pub fn is_ir_path(self) -> bool {
        (TapState::SelectIrScan as u8..=TapState::UpdateIr as u8).contains(&(self as u8))
    }
}

/// Outputs decoded from the current TAP state.  At most one is set at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    pub test_logic_reset: bool,
    pub run_test_idle: bool,
    pub capture_dr: bool,
    pub shift_dr: bool,
    pub pause_dr: bool,
    pub update_dr: bool,
    pub capture_ir: bool,
    pub shift_ir: bool,
    pub pause_ir: bool,
    pub update_ir: bool,
}

impl ControlSignals {
    /// Number of asserted signals.
    pub fn count(&self) -> usize {
        [
            self.test_logic_reset,
            self.run_test_idle,
            self.capture_dr,
            self.shift_dr,
            self.pause_dr,
            self.update_dr,
            self.capture_ir,
            self.shift_ir,
            self.pause_ir,
            self.update_ir,
        ]
        .iter()
        .filter(|s| **s)
        .count()
    }
}

/// Advance the state machine by one TCK.  Returns the next state together with the signals of
/// `current`, which are the ones that govern register behaviour during this clock.
pub fn step(current: TapState, tms: bool) -> (TapState, ControlSignals) {
    (current.next(tms), current.signals())
}
