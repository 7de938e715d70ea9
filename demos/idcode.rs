use riscv_dtm_tap::cable::sim::SimCable;
use riscv_dtm_tap::dmi::DmiShiftRegister;
use riscv_dtm_tap::dtm::Dtm;
use riscv_dtm_tap::statemachine::JtagSM;
use riscv_dtm_tap::TapController;

fn main() {
    env_logger::init();

    let mut dmi = DmiShiftRegister::new(7);
    dmi.response = 0x2_0000_0000;
    let mut cable = SimCable::with_dmi(TapController::default(), dmi);
    let mut dtm = Dtm::new(JtagSM::new(&mut cable), 5);

    println!("idcode: {:08x}", dtm.read_idcode());

    let dtmcs = dtm.read_dtmcs();
    println!("dtmcs: {:08x} {:?}", dtmcs.to_bits(), dtmcs);

    // dmcontrol read: address 0x10, op = 1
    let response = dtm.dmi_scan((0x10 << 34) | 1, dtmcs.abits);
    println!("dmi: {:011x}", response);

    println!("cycles: {}", cable.cycles());
}
