//! Host-side access to a RISC-V Debug Transport Module over JTAG: IDCODE, DTMCS and raw DMI
//! scans.  Debug Module register semantics are left to the caller.
use alloc::vec::Vec;

use log::debug;

use crate::cable::{split_bits, Cable};
use crate::dr::{Dtmcs, Instruction};
use crate::state::TapState;
use crate::statemachine::{JtagSM, Register};

/// `bits` bits of `value`, LSB first.  Bits beyond the 128 a `u128` holds are sent as zero.
fn pack(value: u128, bits: usize) -> Vec<u8> {
    let (bytes, _) = split_bits(bits);
    let mut data: Vec<u8> = value.to_le_bytes().iter().take(bytes).copied().collect();
    data.resize(bytes, 0);
    data
}

fn unpack(bytes: &[u8]) -> u128 {
    bytes
        .iter()
        .take(16)
        .enumerate()
        .fold(0, |acc, (i, b)| acc | u128::from(*b) << (8 * i))
}

pub struct Dtm<T> {
    sm: JtagSM<T>,
    ir_width: usize,
    selected: Option<Instruction>,
}

impl<T, U> Dtm<T>
    where T: core::ops::DerefMut<Target=U>,
          U: Cable + ?Sized
{
    /// Wrap a state machine talking to a DTM whose instruction register is `ir_width` bits.
    pub fn new(sm: JtagSM<T>, ir_width: usize) -> Self {
        Self {
            sm,
            ir_width,
            selected: None,
        }
    }

    /// The host-side state machine.  Read-only, so the TAP cannot be moved behind the back of the
    /// `select` cache.
    pub fn sm(&self) -> &JtagSM<T> {
        &self.sm
    }

    /// Reset the TAP, which latches IDCODE, and forget the selected instruction.
    pub fn reset(&mut self) {
        self.sm.mode_reset();
        self.selected = None;
    }

    /// The instruction most recently latched through `select`.  Cleared by `reset` and
    /// `read_idcode`.
    pub fn selected(&self) -> Option<Instruction> {
        self.selected
    }

    /// Reset the TAP, which selects IDCODE, and read it.
    pub fn read_idcode(&mut self) -> u32 {
        self.reset();
        let bytes = self.sm.read_reg(Register::Data, 32);
        self.sm.change_mode(TapState::RunTestIdle);

        let idcode = unpack(&bytes) as u32;
        debug!("IDCODE {:#010x}", idcode);
        idcode
    }

    /// Shift `insn` into the instruction register and latch it.  The TAP latches on CaptureIr,
    /// so the scan is followed by a second pass through CaptureIr.
    pub fn select(&mut self, insn: Instruction) {
        if self.selected == Some(insn) {
            return;
        }
        let (_, last) = split_bits(self.ir_width);
        let data = pack(u128::from(insn.opcode()), self.ir_width);
        self.sm.write_reg(Register::Instruction, &data, last, true);
        self.sm.recapture(Register::Instruction);
        self.selected = Some(insn);
        debug!("selected {:?}", insn);
    }

    /// Scan `bits` bits of `value` through the selected data register, returning what came out.
    /// Ends in RunTestIdle, having passed through UpdateDr.
    pub fn scan_dr(&mut self, value: u128, bits: usize) -> u128 {
        let (_, last) = split_bits(bits);
        let out = self.sm.read_write_reg(Register::Data, &pack(value, bits), last, true);
        self.sm.change_mode(TapState::RunTestIdle);
        unpack(&out)
    }

    /// Capture and read DTMCS, shifting zeros back in.
    pub fn read_dtmcs(&mut self) -> Dtmcs {
        self.select(Instruction::Dtmcs);
        let dtmcs = Dtmcs::from_bits(self.scan_dr(0, 32) as u32);
        debug!("DTMCS {:?}", dtmcs);
        dtmcs
    }

    /// Write DTMCS, returning the captured value it replaced.
    pub fn write_dtmcs(&mut self, dtmcs: Dtmcs) -> Dtmcs {
        self.select(Instruction::Dtmcs);
        Dtmcs::from_bits(self.scan_dr(u128::from(dtmcs.to_bits()), 32) as u32)
    }

    /// Pulse `dmireset` and clear it again.
    pub fn dmi_reset(&mut self) {
        debug!("DMI reset");
        self.write_dtmcs(Dtmcs { dmireset: true, ..Default::default() });
        self.write_dtmcs(Dtmcs::default());
    }

    /// One DMI scan of `abits + 34` bits.  `abits` is at most 63, so the scan fits a `u128`.
    pub fn dmi_scan(&mut self, value: u128, abits: u8) -> u128 {
        self.select(Instruction::DmiAccess);
        self.scan_dr(value, usize::from(abits) + 34)
    }
}
