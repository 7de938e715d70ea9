//! Data registers addressed by the latched instruction: IDCODE, BYPASS, DTMCS, and the DMI path
//! which is owned by an external collaborator.

use crate::ir::shift_in;
use crate::state::{ControlSignals, TapState};

/// Default IDCODE value.
pub const IDCODE: u32 = 0x2495_11c3;

/// Instructions understood by the DTM.  Any other opcode selects BYPASS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Bypass0 = 0x00,
    Idcode = 0x01,
    Dtmcs = 0x10,
    DmiAccess = 0x11,
    Bypass = 0x1f,
}

impl Instruction {
    pub fn opcode(self) -> u32 {
        self as u32
    }

    pub fn from_opcode(opcode: u32) -> Option<Instruction> {
        match opcode {
            0x00 => Some(Instruction::Bypass0),
            0x01 => Some(Instruction::Idcode),
            0x10 => Some(Instruction::Dtmcs),
            0x11 => Some(Instruction::DmiAccess),
            0x1f => Some(Instruction::Bypass),
            _ => None,
        }
    }

    /// Which data register this instruction puts between TDI and TDO.
    pub fn select(self) -> DrSelect {
        match self {
            Instruction::Bypass0 | Instruction::Bypass => DrSelect::Bypass,
            Instruction::Idcode => DrSelect::Idcode,
            Instruction::Dtmcs => DrSelect::Dtmcs,
            Instruction::DmiAccess => DrSelect::DmiAccess,
        }
    }
}

/// The data register selected by the latched instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrSelect {
    Bypass,
    Idcode,
    Dtmcs,
    DmiAccess,
}

impl DrSelect {
    /// Decode a latched instruction.  Unknown opcodes select BYPASS.
    pub fn decode(latched: u32) -> DrSelect {
        match Instruction::from_opcode(latched) {
            Some(insn) => insn.select(),
            None => DrSelect::Bypass,
        }
    }

    /// The four decoder output lines, in the order bypass, idcode, dtmcs, dmi_access.
    pub fn lines(self) -> [bool; 4] {
        [
            self == DrSelect::Bypass,
            self == DrSelect::Idcode,
            self == DrSelect::Dtmcs,
            self == DrSelect::DmiAccess,
        ]
    }
}

/// The DTM control and status register, bit-packed as
///
/// | bits  | field        |
/// |-------|--------------|
/// | 3:0   | version      |
/// | 9:4   | abits        |
/// | 11:10 | dmistat      |
/// | 14:12 | idle         |
/// | 15    | reserved     |
/// | 16    | dmireset     |
/// | 17    | dmihardreset |
/// | 31:18 | reserved     |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dtmcs {
    pub version: u8,
    pub abits: u8,
    pub dmistat: u8,
    pub idle: u8,
    pub reserved15: bool,
    pub dmireset: bool,
    pub dmihardreset: bool,
    pub reserved_hi: u16,
}

impl Dtmcs {
    /// The value loaded on CaptureDr: debug spec 0.13, 7 address bits, one idle cycle.
    pub const CAPTURE: Dtmcs = Dtmcs {
        version: 1,
        abits: 7,
        dmistat: 0,
        idle: 1,
        reserved15: false,
        dmireset: false,
        dmihardreset: false,
        reserved_hi: 0,
    };

    pub fn from_bits(bits: u32) -> Dtmcs {
        Dtmcs {
            version: (bits & 0xf) as u8,
            abits: ((bits >> 4) & 0x3f) as u8,
            dmistat: ((bits >> 10) & 0x3) as u8,
            idle: ((bits >> 12) & 0x7) as u8,
            reserved15: (bits >> 15) & 1 == 1,
            dmireset: (bits >> 16) & 1 == 1,
            dmihardreset: (bits >> 17) & 1 == 1,
            reserved_hi: ((bits >> 18) & 0x3fff) as u16,
        }
    }

    pub fn to_bits(&self) -> u32 {
        u32::from(self.version & 0xf)
            | u32::from(self.abits & 0x3f) << 4
            | u32::from(self.dmistat & 0x3) << 10
            | u32::from(self.idle & 0x7) << 12
            | u32::from(self.reserved15) << 15
            | u32::from(self.dmireset) << 16
            | u32::from(self.dmihardreset) << 17
            | u32::from(self.reserved_hi & 0x3fff) << 18
    }
}

/// The stored data registers.  The DMI register is not here; its contents belong to the DMI
/// collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataRegisters {
    idcode_value: u32,
    pub idcode: u32,
    pub bypass: bool,
    pub dtmcs: Dtmcs,
}

impl DataRegisters {
    pub fn new(idcode_value: u32) -> Self {
        Self {
            idcode_value,
            idcode: idcode_value,
            bypass: false,
            dtmcs: Dtmcs::default(),
        }
    }

    /// Compute the register contents after one TCK in `state`.  Capture and shift only touch the
    /// register chosen by `select`.  TestLogicReset restores IDCODE and BYPASS but leaves DTMCS
    /// alone.
    pub fn next(&self, state: TapState, signals: &ControlSignals, select: DrSelect, tdi: bool) -> Self {
        let mut next = *self;

        if state == TapState::TestLogicReset {
            next.idcode = self.idcode_value;
            next.bypass = false;
            return next;
        }

        if signals.capture_dr {
            match select {
                DrSelect::Idcode => next.idcode = self.idcode_value,
                DrSelect::Bypass => next.bypass = false,
                DrSelect::Dtmcs => next.dtmcs = Dtmcs::CAPTURE,
                DrSelect::DmiAccess => {}
            }
        } else if signals.shift_dr {
            match select {
                DrSelect::Idcode => next.idcode = shift_in(self.idcode, tdi, 32),
                DrSelect::Bypass => next.bypass = tdi,
                DrSelect::Dtmcs => next.dtmcs = Dtmcs::from_bits(shift_in(self.dtmcs.to_bits(), tdi, 32)),
                DrSelect::DmiAccess => {}
            }
        }
        next
    }

    /// Bit 0 of the selected register, or `None` for the DMI path.
    pub fn serial_out(&self, select: DrSelect) -> Option<bool> {
        match select {
            DrSelect::Idcode => Some(self.idcode & 1 == 1),
            DrSelect::Dtmcs => Some(self.dtmcs.to_bits() & 1 == 1),
            DrSelect::Bypass => Some(self.bypass),
            DrSelect::DmiAccess => None,
        }
    }
}
