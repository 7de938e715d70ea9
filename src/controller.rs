//! The TAP controller proper.  `TapController::tick` consumes one TCK worth of inputs and
//! advances the state machine, the instruction register and the data register bank together.
//!
//! Each tick has two phases.  On the rising edge every next value is computed from the
//! registers as they stood before the tick and then committed at once.  On the falling edge the
//! TDO multiplexer is evaluated over the committed registers and stored in the output register,
//! which is what the following tick hands back as `tdo`.

use log::{debug, trace, warn};

use crate::config::TapConfig;
use crate::dr::{DataRegisters, DrSelect, Dtmcs, Instruction};
use crate::error::ConfigError;
use crate::ir::InstructionRegister;
use crate::state::{step, ControlSignals, TapState};

/// Inputs sampled on one TCK rising edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub tms: bool,
    pub tdi: bool,
    /// Asynchronous reset.  Overrides everything else.
    pub reset_asserted: bool,
    /// Serial output of the DMI collaborator, fed into the TDO multiplexer.
    pub dmi_serial_in: bool,
}

impl TickInput {
    pub fn new(tms: bool, tdi: bool) -> Self {
        Self { tms, tdi, ..Default::default() }
    }

    pub fn reset() -> Self {
        Self { reset_asserted: true, ..Default::default() }
    }

    pub fn with_dmi(mut self, dmi_serial_in: bool) -> Self {
        self.dmi_serial_in = dmi_serial_in;
        self
    }
}

/// What the controller presents to the DMI collaborator during a clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSignals {
    pub signals: ControlSignals,
    pub select: DrSelect,
    /// Live `dmireset` field of DTMCS
    pub dmi_reset: bool,
    /// TDI, forwarded
    pub dmi_serial_out: bool,
}

impl PortSignals {
    pub fn test_logic_reset(&self) -> bool {
        self.signals.test_logic_reset
    }

    pub fn run_test_idle(&self) -> bool {
        self.signals.run_test_idle
    }

    pub fn capture_dr(&self) -> bool {
        self.signals.capture_dr
    }

    pub fn shift_dr(&self) -> bool {
        self.signals.shift_dr
    }

    pub fn pause_dr(&self) -> bool {
        self.signals.pause_dr
    }

    pub fn update_dr(&self) -> bool {
        self.signals.update_dr
    }

    pub fn dmi_access(&self) -> bool {
        self.select == DrSelect::DmiAccess
    }

    pub fn dtmcs_select(&self) -> bool {
        self.select == DrSelect::Dtmcs
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutput {
    /// The output register as it stood when the clock rose
    pub tdo: bool,
    pub port: PortSignals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Registers {
    state: TapState,
    ir: InstructionRegister,
    dr: DataRegisters,
    tdo: bool,
}

impl Registers {
    fn reset(config: &TapConfig) -> Self {
        Self {
            state: TapState::RunTestIdle,
            ir: InstructionRegister::new(config.ir_width),
            dr: DataRegisters::new(config.idcode),
            tdo: false,
        }
    }

    fn select(&self) -> DrSelect {
        DrSelect::decode(self.ir.latched())
    }

    /// Everything the rising edge produces, computed from `self` alone.
    fn rising_edge(&self, tms: bool, tdi: bool) -> Self {
        let (state, signals) = step(self.state, tms);
        Self {
            state,
            ir: self.ir.next(self.state, &signals, tdi),
            dr: self.dr.next(self.state, &signals, self.select(), tdi),
            tdo: self.tdo,
        }
    }

    fn output_mux(&self, dmi_serial_in: bool) -> bool {
        if self.state.signals().shift_ir {
            return self.ir.latched() & 1 == 1;
        }
        self.dr.serial_out(self.select()).unwrap_or(dmi_serial_in)
    }
}

pub struct TapController {
    config: TapConfig,
    regs: Registers,
}

impl Default for TapController {
    fn default() -> Self {
        let config = TapConfig::default();
        Self {
            regs: Registers::reset(&config),
            config,
        }
    }
}

impl TapController {
    /// Build a controller in its reset state.
    pub fn new(config: TapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!("TAP controller: IR width {}, IDCODE {:#010x}", config.ir_width, config.idcode);
        Ok(Self {
            regs: Registers::reset(&config),
            config,
        })
    }

    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Force every register to its reset value.
    pub fn reset(&mut self) {
        if self.regs != Registers::reset(&self.config) {
            debug!("TAP reset from {:?}", self.regs.state);
        }
        self.regs = Registers::reset(&self.config);
    }

    /// Clock the controller once.
    pub fn tick(&mut self, input: TickInput) -> TickOutput {
        if input.reset_asserted {
            self.reset();
            return TickOutput {
                tdo: false,
                port: self.port(input.tdi),
            };
        }

        let output = TickOutput {
            tdo: self.regs.tdo,
            port: self.port(input.tdi),
        };

        let mut next = self.regs.rising_edge(input.tms, input.tdi);
        next.tdo = next.output_mux(input.dmi_serial_in);

        if next.state != self.regs.state {
            trace!("TAP {:?} -> {:?}", self.regs.state, next.state);
        }
        if next.ir.latched() != self.regs.ir.latched() {
            let latched = next.ir.latched();
            match Instruction::from_opcode(latched) {
                Some(insn) => debug!("latched instruction {:?} ({:#04x})", insn, latched),
                None => warn!("latched unknown instruction {:#04x}, selecting BYPASS", latched),
            }
        }

        self.regs = next;
        output
    }

    /// The signals the controller presents to the DMI collaborator for a clock with the given
    /// TDI, without advancing anything.
    pub fn port(&self, tdi: bool) -> PortSignals {
        PortSignals {
            signals: self.regs.state.signals(),
            select: self.regs.select(),
            dmi_reset: self.regs.dr.dtmcs.dmireset,
            dmi_serial_out: tdi,
        }
    }

    pub fn state(&self) -> TapState {
        self.regs.state
    }

    pub fn signals(&self) -> ControlSignals {
        self.regs.state.signals()
    }

    pub fn ir(&self) -> &InstructionRegister {
        &self.regs.ir
    }

    pub fn dr(&self) -> &DataRegisters {
        &self.regs.dr
    }

    pub fn select(&self) -> DrSelect {
        self.regs.select()
    }

    pub fn dtmcs(&self) -> Dtmcs {
        self.regs.dr.dtmcs
    }

    pub fn dmi_reset(&self) -> bool {
        self.regs.dr.dtmcs.dmireset
    }

    /// The output register, which the next tick returns as `tdo`.
    pub fn tdo(&self) -> bool {
        self.regs.tdo
    }
}
