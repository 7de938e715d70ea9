use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin, PinState}};

use crate::cable::{shift_data, split_bits, Cable};

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Bit-banged JTAG over four digital pins.
pub struct Gpio<Clk, Tdi, Tdo, Tms, Delay>
    where Clk: OutputPin<Error = Infallible>,
          Tdi: OutputPin<Error = Infallible>,
          Tdo: InputPin<Error = Infallible>,
          Tms: OutputPin<Error = Infallible>,
          Delay: DelayNs
{
    half_period: u32,
    delay: Delay,
    clock: Clk,
    tdi: Tdi,
    tdo: Tdo,
    tms: Tms
}

impl<Clk, Tdi, Tdo, Tms, Delay> Gpio<Clk, Tdi, Tdo, Tms, Delay>
    where Clk: OutputPin<Error = Infallible>,
          Tdi: OutputPin<Error = Infallible>,
          Tdo: InputPin<Error = Infallible>,
          Tms: OutputPin<Error = Infallible>,
          Delay: DelayNs
{
    /// `freq_khz` sets the TCK rate; it is clamped to at least 1 kHz.
    pub fn new(freq_khz: u32, clock: Clk, tdi: Tdi, tdo: Tdo, tms: Tms, delay: Delay) -> Self {
        let period_ns = 1_000_000 / freq_khz.max(1);
        let half_period = period_ns / 2;
        Gpio { half_period, clock, tdi, tdo, tms, delay }
    }

    pub fn half_period_ns(&self) -> u32 {
        self.half_period
    }

    fn clock(&mut self, tms: bool, tdi: bool) -> bool {
        // clock starts low
        infallible(self.tdi.set_state(PinState::from(tdi)));
        infallible(self.tms.set_state(PinState::from(tms)));
        infallible(self.clock.set_high());

        // TDO only changes on the falling edge, so this is the bit for this period
        let tdo = infallible(self.tdo.is_high());

        self.delay.delay_ns(self.half_period);
        infallible(self.clock.set_low());
        self.delay.delay_ns(self.half_period);
        tdo
    }
}

impl<Clk, Tdi, Tdo, Tms, Delay> Cable for Gpio<Clk, Tdi, Tdo, Tms, Delay>
    where Clk: OutputPin<Error = Infallible>,
          Tdi: OutputPin<Error = Infallible>,
          Tdo: InputPin<Error = Infallible>,
          Tms: OutputPin<Error = Infallible>,
          Delay: DelayNs
{
    fn change_mode(&mut self, tms: &[usize], tdi: bool) {
        for d in tms {
            self.clock(*d != 0, tdi);
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
