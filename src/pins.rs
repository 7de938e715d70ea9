//! The simulated TAP seen through `embedded-hal` digital pins.  TCK rising edges clock the
//! controller, the falling edge moves the output register onto TDO, and a low TRST_N holds the
//! controller in reset.
//!
//! There is no DMI collaborator on this path; DMIACCESS scans read zeros.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::controller::{TapController, TickInput};

struct PinBus {
    tap: TapController,
    tck: bool,
    tms: bool,
    tdi: bool,
    trst_n: bool,
    tdo: bool,
}

impl PinBus {
    fn set_tck(&mut self, level: bool) {
        if level && !self.tck {
            let input = TickInput {
                tms: self.tms,
                tdi: self.tdi,
                reset_asserted: !self.trst_n,
                dmi_serial_in: false,
            };
            self.tdo = self.tap.tick(input).tdo;
        } else if !level && self.tck {
            self.tdo = self.trst_n && self.tap.tdo();
        }
        self.tck = level;
    }

    fn set_trst_n(&mut self, level: bool) {
        self.trst_n = level;
        if !level {
            self.tap.reset();
            self.tdo = false;
        }
    }
}

/// Owner of the simulated pin bus.  Hand out pins with `tck()`, `tms()`, etc.
#[derive(Clone)]
pub struct TapPins {
    bus: Rc<RefCell<PinBus>>,
}

impl TapPins {
    pub fn new(tap: TapController) -> Self {
        let bus = PinBus {
            tap,
            tck: false,
            tms: false,
            tdi: false,
            trst_n: true,
            tdo: false,
        };
        Self {
            bus: Rc::new(RefCell::new(bus)),
        }
    }

    pub fn tck(&self) -> Tck {
        Tck(self.bus.clone())
    }

    pub fn tms(&self) -> Tms {
        Tms(self.bus.clone())
    }

    pub fn tdi(&self) -> Tdi {
        Tdi(self.bus.clone())
    }

    pub fn trst_n(&self) -> TrstN {
        TrstN(self.bus.clone())
    }

    pub fn tdo(&self) -> Tdo {
        Tdo(self.bus.clone())
    }

    /// Inspect the controller behind the pins.
    pub fn with_tap<R>(&self, f: impl FnOnce(&TapController) -> R) -> R {
        f(&self.bus.borrow().tap)
    }
}

macro_rules! output_pin {
    ($name:ident, $doc:literal, |$bus:ident, $level:ident| $apply:expr) => {
        #[doc = $doc]
        pub struct $name(Rc<RefCell<PinBus>>);

        impl ErrorType for $name {
            type Error = Infallible;
        }

        impl OutputPin for $name {
            fn set_low(&mut self) -> Result<(), Self::Error> {
                let mut guard = self.0.borrow_mut();
                let $bus = &mut *guard;
                let $level = false;
                $apply;
                Ok(())
            }

            fn set_high(&mut self) -> Result<(), Self::Error> {
                let mut guard = self.0.borrow_mut();
                let $bus = &mut *guard;
                let $level = true;
                $apply;
                Ok(())
            }
        }
    };
}

output_pin!(Tck, "Test clock", |bus, level| bus.set_tck(level));
output_pin!(Tms, "Test mode select", |bus, level| bus.tms = level);
output_pin!(Tdi, "Test data in", |bus, level| bus.tdi = level);
output_pin!(TrstN, "Active-low test reset", |bus, level| bus.set_trst_n(level));

/// Test data out
pub struct Tdo(Rc<RefCell<PinBus>>);

impl ErrorType for Tdo {
    type Error = Infallible;
}

impl InputPin for Tdo {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().tdo)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().tdo)
    }
}

/// A delay that returns immediately; simulated time does not pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
