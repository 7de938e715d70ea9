use riscv_dtm_tap::cable::gpio::Gpio;
use riscv_dtm_tap::cable::sim::SimCable;
use riscv_dtm_tap::cable::Cable;
use riscv_dtm_tap::dmi::{DmiPort, DmiShiftRegister};
use riscv_dtm_tap::dr::{DrSelect, Dtmcs, Instruction, IDCODE};
use riscv_dtm_tap::dtm::Dtm;
use riscv_dtm_tap::pins::{NoDelay, TapPins};
use riscv_dtm_tap::statemachine::JtagSM;
use riscv_dtm_tap::{PortSignals, TapConfig, TapController, TapState};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn reads_idcode_and_dtmcs() {
    init();
    let mut cable = SimCable::new(TapController::default());
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    assert_eq!(dtm.read_idcode(), IDCODE);
    let dtmcs = dtm.read_dtmcs();
    assert_eq!(dtmcs, Dtmcs::CAPTURE);
    assert_eq!(dtmcs.version, 1);
    assert_eq!(dtmcs.abits, 7);
    assert_eq!(dtmcs.idle, 1);
    assert_eq!(dtm.selected(), Some(Instruction::Dtmcs));
    assert_eq!(dtm.sm().state(), TapState::RunTestIdle);

    // Reading shifted zeros back in.
    assert_eq!(cable.tap().dtmcs().to_bits(), 0);
    assert_eq!(cable.tap().state(), TapState::RunTestIdle);
}

#[test]
fn custom_idcode_and_wide_ir() {
    init();
    let config = TapConfig::default().with_ir_width(8).with_idcode(0x1234_5677);
    let mut cable = SimCable::new(TapController::new(config).unwrap());
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 8);

    assert_eq!(dtm.read_idcode(), 0x1234_5677);
    dtm.select(Instruction::Dtmcs);
    assert_eq!(dtm.read_dtmcs().abits, 7);
    assert_eq!(cable.tap().ir().latched(), 0x10);
}

#[test]
fn dmireset_reaches_the_port() {
    init();
    let mut cable = SimCable::new(TapController::default());
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    let previous = dtm.write_dtmcs(Dtmcs { dmireset: true, ..Default::default() });
    assert_eq!(previous, Dtmcs::CAPTURE);
    assert!(dtm.sm().cable.tap().dmi_reset());
    assert!(dtm.sm().cable.tap().port(false).dmi_reset);

    dtm.dmi_reset();
    assert!(!cable.tap().dmi_reset());
}

#[test]
fn dmi_scan_goes_through_the_collaborator() {
    init();
    let mut dmi = DmiShiftRegister::new(7);
    dmi.response = 0x1_2345_6789 & ((1 << 41) - 1);
    let mut cable = SimCable::with_dmi(TapController::default(), dmi);
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    let abits = dtm.read_dtmcs().abits;
    let request = (0x10u128 << 34) | (0xdead_beef << 2) | 1;
    let response = dtm.dmi_scan(request, abits);

    assert_eq!(response, 0x1_2345_6789);
    assert_eq!(cable.dmi().last_update, Some(request));
    assert_eq!(cable.tap().ir().latched(), Instruction::DmiAccess.opcode());
}

/// Counts the clocks that shift the DMI path.
#[derive(Default)]
struct ShiftCounter {
    shifts: usize,
}

impl DmiPort for ShiftCounter {
    fn clock(&mut self, port: &PortSignals) {
        if port.dmi_access() && port.shift_dr() {
            self.shifts += 1;
        }
    }

    fn serial_out(&self) -> bool {
        false
    }
}

#[test]
fn wide_dmi_scans_shift_every_bit() {
    init();
    for (abits, width) in [(31u8, 65), (63, 97)] {
        let mut cable = SimCable::with_dmi(TapController::default(), ShiftCounter::default());
        let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);
        dtm.dmi_scan(0, abits);
        assert_eq!(cable.dmi().shifts, width, "abits {}", abits);
    }
}

#[test]
fn wide_dmi_scan_round_trip() {
    init();
    for abits in [31u8, 63] {
        let width = u32::from(abits) + 34;
        let mut dmi = DmiShiftRegister::new(abits);
        dmi.response = (1u128 << (width - 1)) | 0xabc;
        let mut cable = SimCable::with_dmi(TapController::default(), dmi);
        let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

        let address = (1u128 << abits) - 1;
        let request = (address << 34) | (0x1234_5678 << 2) | 2;
        let response = dtm.dmi_scan(request, abits);

        assert_eq!(response, (1u128 << (width - 1)) | 0xabc, "abits {}", abits);
        assert_eq!(cable.dmi().last_update, Some(request), "abits {}", abits);
    }
}

#[test]
fn reset_forgets_the_selected_instruction() {
    init();
    let mut cable = SimCable::new(TapController::default());
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    dtm.select(Instruction::Dtmcs);
    dtm.reset();
    assert_eq!(dtm.selected(), None);
    assert_eq!(dtm.sm().cable.tap().select(), DrSelect::Idcode);

    assert_eq!(dtm.read_dtmcs(), Dtmcs::CAPTURE);
    assert_eq!(cable.tap().ir().latched(), Instruction::Dtmcs.opcode());
}

#[test]
fn dmi_reset_clears_the_collaborator() {
    init();
    let mut dmi = DmiShiftRegister::new(7);
    dmi.response = 0x55;
    let mut cable = SimCable::with_dmi(TapController::default(), dmi);
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    dtm.dmi_scan(0x3, 7);
    assert_eq!(dtm.sm().cable.dmi().last_update, Some(0x3));
    dtm.dmi_reset();
    assert_eq!(cable.dmi().last_update, None);
}

#[test]
fn held_reset_reads_zeros() {
    init();
    let mut cable = SimCable::new(TapController::default());
    cable.change_mode(&[1, 0, 0], false);
    cable.assert_reset();
    assert_eq!(cable.read_data(16), vec![0, 0]);
    assert_eq!(cable.tap().state(), TapState::RunTestIdle);
    cable.release_reset();

    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);
    assert_eq!(dtm.read_idcode(), IDCODE);
}

#[test]
fn gpio_cable_over_tap_pins() {
    init();
    let pins = TapPins::new(TapController::default());
    let mut gpio = Gpio::new(10_000, pins.tck(), pins.tdi(), pins.tdo(), pins.tms(), NoDelay);
    let mut dtm = Dtm::new(JtagSM::new(&mut gpio), 5);

    assert_eq!(dtm.read_idcode(), IDCODE);
    assert_eq!(dtm.read_dtmcs(), Dtmcs::CAPTURE);
    assert_eq!(pins.with_tap(|tap| tap.state()), TapState::RunTestIdle);

    // No collaborator behind the pins: DMI scans read zeros.
    assert_eq!(dtm.dmi_scan(0x1ff, 7), 0);
}
