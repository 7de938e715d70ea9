//! Host-side JTAG adapters.  Adapters implement the `Cable` trait, which clocks TMS sequences
//! and shifts data through whichever register the TAP has selected.
use alloc::vec;
use alloc::vec::Vec;

pub mod gpio;
pub mod sim;

pub trait Cable {
    /// Clock out a series of TMS values to change the state of the TAP.  Each element of `tms`
    /// determines the value of the TMS line, zero for low and any other value for high.  `tdi`
    /// is the level held on TDI meanwhile.
    fn change_mode(&mut self, tms: &[usize], tdi: bool);
    /// Shift in `bits` bits from TDO, LSB first, while clocking out all ones.  Should be called
    /// with state = ShiftIR or ShiftDR, and will remain in that state.
    fn read_data(&mut self, bits: usize) -> Vec<u8>;
    /// Shift out bits on the TDI line.  `bits` is the number of bits to send from the last byte.
    /// Should be called with state = ShiftIR or ShiftDR.  State won't change unless `pause_after`
    /// is true, in which case it will be PauseIR or PauseDR on exit.
    fn write_data(&mut self, data: &[u8], bits: u8, pause_after: bool);
    /// Like `write_data`, but returns the bits that were shifted out of TDO.
    fn read_write_data(&mut self, data: &[u8], bits: u8, pause_after: bool) -> Vec<u8>;
}

/// Shift `data` through the TAP one bit per call to `clock(tms, tdi) -> tdo`.  All bytes but the
/// last are sent whole; `bits` (clamped to 1..=8) bits are sent from the last.  With
/// `pause_after`, TMS rises on the final bit and one more clock moves from Exit1 to Pause.
pub(crate) fn shift_data<F>(data: &[u8], bits: u8, pause_after: bool, mut clock: F) -> Vec<u8>
    where F: FnMut(bool, bool) -> bool
{
    if data.is_empty() {
        return vec![];
    }

    let bits = bits.clamp(1, 8);
    let last = data.len() - 1;
    let mut out = Vec::with_capacity(data.len());

    for (i, d) in data.iter().enumerate() {
        let count = if i == last { bits } else { 8 };
        let mut byte = 0;
        for b in 0..count {
            let tms = pause_after && i == last && b == count - 1;
            let tdo = clock(tms, (d >> b) & 1 == 1);
            byte |= u8::from(tdo) << b;
        }
        out.push(byte);
    }

    if pause_after {
        clock(false, false);
    }
    out
}

/// Byte count and number of bits used from the last byte for a `bits`-long transfer.
pub(crate) fn split_bits(bits: usize) -> (usize, u8) {
    let bytes = (bits + 7) / 8;
    let last = bits - bytes.saturating_sub(1) * 8;
    (bytes, last as u8)
}
