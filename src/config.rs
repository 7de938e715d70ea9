//! Construction-time parameters of a TAP controller.

use crate::dr::IDCODE;
use crate::error::ConfigError;

/// Smallest instruction register that can hold every DTM opcode.
pub const MIN_IR_WIDTH: u8 = 5;
pub const MAX_IR_WIDTH: u8 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapConfig {
    /// Instruction register length in bits
    pub ir_width: u8,
    /// Value loaded into IDCODE on reset and capture
    pub idcode: u32,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            ir_width: MIN_IR_WIDTH,
            idcode: IDCODE,
        }
    }
}

impl TapConfig {
    pub fn with_ir_width(mut self, ir_width: u8) -> Self {
        self.ir_width = ir_width;
        self
    }

    pub fn with_idcode(mut self, idcode: u32) -> Self {
        self.idcode = idcode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_IR_WIDTH..=MAX_IR_WIDTH).contains(&self.ir_width) {
            return Err(ConfigError::IrWidthOutOfRange { width: self.ir_width });
        }
        if self.idcode & 1 == 0 {
            return Err(ConfigError::IdcodeMarkerMissing { idcode: self.idcode });
        }
        Ok(())
    }
}
