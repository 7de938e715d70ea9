//! Errors raised while building a TAP controller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("instruction register width {width} is outside 5..=32 bits")]
    IrWidthOutOfRange { width: u8 },

    #[error("IDCODE {idcode:#010x} does not have the mandatory bit 0 set")]
    IdcodeMarkerMissing { idcode: u32 },
}
