//! This crate models the device side of a JTAG Test Access Port: the 16-state TAP controller
//! of IEEE 1149.1 with the instruction and data registers of a RISC-V Debug Transport Module
//! (debug spec 0.13).  The model advances one TCK per call to `TapController::tick`, and every
//! output is bit-exact with the hardware it describes.
//!
//! The data registers are IDCODE, a one bit BYPASS, and DTMCS.  DMIACCESS selects the DMI
//! path, which is not stored here: TDI is forwarded to whatever implements `DmiPort`, and its
//! serial output is routed back to TDO.
//!
//! On top of the model sit host-side drivers.  A `Cable` clocks TMS sequences and shifts data,
//! either straight into a simulated controller (`SimCable`) or by bit-banging `embedded-hal`
//! pins (`Gpio`, which can drive the controller through `TapPins`).  `JtagSM` tracks the TAP
//! state and reaches any state by the shortest TMS path, and `Dtm` reads IDCODE, DTMCS and
//! performs DMI scans.
//!
//! # Example
//! ```
//! use riscv_dtm_tap::cable::sim::SimCable;
//! use riscv_dtm_tap::controller::TapController;
//! use riscv_dtm_tap::dtm::Dtm;
//! use riscv_dtm_tap::statemachine::JtagSM;
//!
//! let mut cable = SimCable::new(TapController::default());
//! let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);
//! assert_eq!(dtm.read_idcode(), 0x249511c3);
//! assert_eq!(dtm.read_dtmcs().abits, 7);
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod cable;
pub mod config;
pub mod controller;
pub mod dmi;
pub mod dr;
pub mod dtm;
pub mod error;
pub mod ir;
pub mod pins;
pub mod state;
pub mod statemachine;

pub use config::TapConfig;
pub use controller::{PortSignals, TapController, TickInput, TickOutput};
pub use error::ConfigError;
pub use state::{ControlSignals, TapState};
