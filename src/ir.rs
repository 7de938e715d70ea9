//! The instruction register: a shift stage clocked from TDI and the latched value the decoder
//! reads.

use crate::dr::Instruction;
use crate::state::{ControlSignals, TapState};

/// Shift `bit` into the top of a `width`-bit register, moving everything else one place towards
/// bit 0.
pub(crate) fn shift_in(value: u32, bit: bool, width: u8) -> u32 {
    let top = if bit { 1u32 << (width - 1) } else { 0 };
    (value >> 1) | top
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionRegister {
    width: u8,
    shift: u32,
    latched: u32,
}

impl InstructionRegister {
    /// `width` is expected to have been validated by `TapConfig`.
    pub(crate) fn new(width: u8) -> Self {
        let idcode = Instruction::Idcode.opcode();
        Self {
            width,
            shift: idcode,
            latched: idcode,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Contents of the shift stage.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The instruction currently driving register selection.
    pub fn latched(&self) -> u32 {
        self.latched
    }

    /// Compute the register contents after one TCK in `state`.
    ///
    /// Capture moves the shift stage into the latch, so a freshly shifted opcode becomes active
    /// on the next pass through CaptureIr.  UpdateIr does not touch either half.
    pub fn next(&self, state: TapState, signals: &ControlSignals, tdi: bool) -> Self {
        if state == TapState::TestLogicReset {
            return Self::new(self.width);
        }

        let mut next = *self;
        if signals.shift_ir {
            next.shift = shift_in(self.shift, tdi, self.width);
        }
        if signals.capture_ir {
            next.latched = self.shift;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_ir() -> ControlSignals {
        TapState::ShiftIr.signals()
    }

    #[test]
    fn resets_to_idcode() {
        let ir = InstructionRegister::new(5);
        assert_eq!(ir.shift(), 0x01);
        assert_eq!(ir.latched(), 0x01);
    }

    #[test]
    fn shifts_lsb_first() {
        let mut ir = InstructionRegister::new(5);
        for b in 0..5 {
            let bit = (0x11 >> b) & 1 == 1;
            ir = ir.next(TapState::ShiftIr, &shift_ir(), bit);
        }
        assert_eq!(ir.shift(), 0x11);
        assert_eq!(ir.latched(), 0x01);
    }

    #[test]
    fn capture_latches_shift_stage() {
        let mut ir = InstructionRegister::new(5);
        for b in 0..5 {
            ir = ir.next(TapState::ShiftIr, &shift_ir(), (0x10 >> b) & 1 == 1);
        }
        let update = TapState::UpdateIr;
        ir = ir.next(update, &update.signals(), true);
        assert_eq!(ir.latched(), 0x01);

        let capture = TapState::CaptureIr;
        ir = ir.next(capture, &capture.signals(), false);
        assert_eq!(ir.latched(), 0x10);
        assert_eq!(ir.shift(), 0x10);
    }

    #[test]
    fn test_logic_reset_restores_idcode() {
        let mut ir = InstructionRegister::new(5);
        for _ in 0..5 {
            ir = ir.next(TapState::ShiftIr, &shift_ir(), true);
        }
        let capture = TapState::CaptureIr;
        ir = ir.next(capture, &capture.signals(), false);
        assert_eq!(ir.latched(), 0x1f);

        let reset = TapState::TestLogicReset;
        ir = ir.next(reset, &reset.signals(), true);
        assert_eq!(ir, InstructionRegister::new(5));
    }

    #[test]
    fn wide_register_shift() {
        assert_eq!(shift_in(0, true, 32), 0x8000_0000);
        assert_eq!(shift_in(0x8000_0001, false, 32), 0x4000_0000);
        assert_eq!(shift_in(1, true, 1), 1);
        assert_eq!(shift_in(1, false, 1), 0);
    }
}
