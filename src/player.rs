//! # Player Harness
//!
//! Drives an extracted player routine the way its original host did: one call
//! to init, then one call to play per row. After each play call the configured
//! output windows are read back from memory.
//!
//! Port-level output (AY writes from Z80 players) is not collected here; wrap
//! the bus in a [`CaptureBus`](crate::CaptureBus) and drain it between rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CallOutcome, GuestCpu, MemoryBus};

/// Errors from configuring or running a player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("invalid player config: {0}")]
    InvalidConfig(String),

    #[error("init routine did not return within its budget")]
    InitDidNotReturn,

    #[error("play routine did not return within its budget on row {row}")]
    PlayDidNotReturn { row: u32 },
}

/// A block of guest memory read after every play call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputWindow {
    pub addr: u16,
    pub len: u16,
}

impl OutputWindow {
    fn is_valid(&self) -> bool {
        self.len > 0 && self.addr as u32 + self.len as u32 <= 0x1_0000
    }
}

/// Per-format player setup.
///
/// Every field has a default, so a host config file only needs to name what
/// differs:
///
/// ```
/// use replay_cpu::PlayerConfig;
///
/// let config: PlayerConfig =
///     serde_json::from_str(r#"{ "init_addr": 4096, "play_addr": 4099 }"#).unwrap();
/// assert_eq!(config.play_addr, 0x1003);
/// assert!(config.output.is_empty());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub init_addr: u16,
    pub play_addr: u16,
    /// Loaded into A before init (song number, usually)
    pub init_argument: Option<u8>,
    /// Loaded into A before every play call
    pub play_argument: Option<u8>,
    /// `None` uses the CPU's default budget
    pub init_budget: Option<u64>,
    pub play_budget: Option<u64>,
    pub output: Vec<OutputWindow>,
    /// Treat budget exhaustion as an error instead of a warning
    pub require_return: bool,
}

impl PlayerConfig {
    /// Rejects empty or wrapping output windows and zero budgets.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if let Some(window) = self.output.iter().find(|w| !w.is_valid()) {
            return Err(PlayerError::InvalidConfig(format!(
                "output window at 0x{:04X} with length {} is empty or wraps past 0xFFFF",
                window.addr, window.len
            )));
        }
        if self.init_budget == Some(0) {
            return Err(PlayerError::InvalidConfig(
                "init budget must be non-zero".to_string(),
            ));
        }
        if self.play_budget == Some(0) {
            return Err(PlayerError::InvalidConfig(
                "play budget must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// One play call and the output it left in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: u32,
    pub outcome: CallOutcome,
    /// Output windows, concatenated in config order
    pub output: Vec<u8>,
}

/// Init/play driver over either CPU core.
///
/// # Examples
///
/// ```
/// use replay_cpu::{Cpu6502, FlatMemory, OutputWindow, Player, PlayerConfig};
///
/// // init: LDA #0; STA $0200; RTS
/// // play: INC $0200; RTS
/// let code = [0xA9, 0x00, 0x8D, 0x00, 0x02, 0x60, 0xEE, 0x00, 0x02, 0x60];
/// let cpu = Cpu6502::new(FlatMemory::from_image(0x1000, &code).unwrap());
///
/// let config = PlayerConfig {
///     init_addr: 0x1000,
///     play_addr: 0x1006,
///     output: vec![OutputWindow { addr: 0x0200, len: 1 }],
///     ..PlayerConfig::default()
/// };
///
/// let mut player = Player::new(cpu, config).unwrap();
/// player.init().unwrap();
/// let rows = player.play_rows(3).unwrap();
/// let values: Vec<u8> = rows.iter().map(|row| row.output[0]).collect();
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
pub struct Player<C> {
    cpu: C,
    config: PlayerConfig,
    next_row: u32,
}

impl<C> Player<C>
where
    C: GuestCpu,
    C::Bus: MemoryBus,
{
    pub fn new(cpu: C, config: PlayerConfig) -> Result<Self, PlayerError> {
        config.validate()?;
        Ok(Self {
            cpu,
            config,
            next_row: 0,
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Resets the CPU and runs the init routine. Also rewinds the row counter.
    pub fn init(&mut self) -> Result<CallOutcome, PlayerError> {
        let addr = self.config.init_addr;
        self.cpu.reset_to(addr);
        if let Some(argument) = self.config.init_argument {
            self.cpu.set_argument(argument);
        }

        let budget = self
            .config
            .init_budget
            .unwrap_or_else(|| self.cpu.default_budget());
        let outcome = self.call_balanced(addr, budget);
        self.next_row = 0;

        if !outcome.returned() {
            if self.config.require_return {
                return Err(PlayerError::InitDidNotReturn);
            }
            log::warn!(
                "init at 0x{:04X} exhausted its budget after {} steps",
                addr,
                outcome.steps()
            );
        }
        Ok(outcome)
    }

    /// Runs the play routine once and reads the output windows.
    pub fn play_row(&mut self) -> Result<Row, PlayerError> {
        let index = self.next_row;
        self.next_row = self.next_row.wrapping_add(1);

        let addr = self.config.play_addr;
        if let Some(argument) = self.config.play_argument {
            self.cpu.set_argument(argument);
        }
        let budget = self
            .config
            .play_budget
            .unwrap_or_else(|| self.cpu.default_budget());
        let outcome = self.call_balanced(addr, budget);

        if !outcome.returned() {
            if self.config.require_return {
                return Err(PlayerError::PlayDidNotReturn { row: index });
            }
            log::warn!(
                "play at 0x{:04X} exhausted its budget on row {}",
                addr,
                index
            );
        }

        let output = self.read_output();
        log::debug!(
            "row {}: {} steps, {} cycles, {} output bytes",
            index,
            outcome.steps(),
            outcome.cycles(),
            output.len()
        );

        Ok(Row {
            index,
            outcome,
            output,
        })
    }

    /// Plays `count` rows, stopping at the first error.
    pub fn play_rows(&mut self, count: u32) -> Result<Vec<Row>, PlayerError> {
        (0..count).map(|_| self.play_row()).collect()
    }

    /// Calls `addr`, dropping whatever a stopped routine left on the stack.
    fn call_balanced(&mut self, addr: u16, budget: u64) -> CallOutcome {
        let sp = self.cpu.stack_pointer();
        let outcome = self.cpu.call(addr, budget);
        if !outcome.returned() {
            self.cpu.set_stack_pointer(sp);
        }
        outcome
    }

    fn read_output(&self) -> Vec<u8> {
        let bus = self.cpu.bus();
        self.config
            .output
            .iter()
            .flat_map(|window| {
                (0..window.len).map(move |offset| bus.read(window.addr.wrapping_add(offset)))
            })
            .collect()
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    pub fn into_cpu(self) -> C {
        self.cpu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CaptureBus, Cpu6502, CpuZ80, FlatMemory, MemoryBus};

    // init: STA $0300; RTS    (stores the song number)
    // play: INC $0200; LDA $0200; STA $0201; RTS
    const PLAYER_6502: [u8; 14] = [
        0x8D, 0x00, 0x03, 0x60, 0xEE, 0x00, 0x02, 0xAD, 0x00, 0x02, 0x8D, 0x01, 0x02, 0x60,
    ];

    fn setup_player(config: PlayerConfig) -> Player<Cpu6502<FlatMemory>> {
        let memory = FlatMemory::from_image(0x1000, &PLAYER_6502).unwrap();
        Player::new(Cpu6502::new(memory), config).unwrap()
    }

    fn base_config() -> PlayerConfig {
        PlayerConfig {
            init_addr: 0x1000,
            play_addr: 0x1004,
            output: vec![OutputWindow {
                addr: 0x0200,
                len: 2,
            }],
            ..PlayerConfig::default()
        }
    }

    #[test]
    fn test_init_loads_argument() {
        let mut player = setup_player(PlayerConfig {
            init_argument: Some(3),
            ..base_config()
        });
        let outcome = player.init().unwrap();
        assert!(outcome.returned());
        assert_eq!(player.cpu().memory().read(0x0300), 3);
    }

    #[test]
    fn test_rows_are_numbered_and_read_back() {
        let mut player = setup_player(base_config());
        player.init().unwrap();

        let rows = player.play_rows(3).unwrap();
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.index, i as u32);
            assert!(row.outcome.returned());
            assert_eq!(row.output, vec![i as u8 + 1, i as u8 + 1]);
        }
    }

    #[test]
    fn test_init_rewinds_row_counter() {
        let mut player = setup_player(base_config());
        player.init().unwrap();
        player.play_rows(2).unwrap();
        player.init().unwrap();
        assert_eq!(player.play_row().unwrap().index, 0);
    }

    #[test]
    fn test_windows_concatenate_in_order() {
        let mut player = setup_player(PlayerConfig {
            output: vec![
                OutputWindow {
                    addr: 0x0201,
                    len: 1,
                },
                OutputWindow {
                    addr: 0x1000,
                    len: 2,
                },
            ],
            ..base_config()
        });
        player.init().unwrap();
        let row = player.play_row().unwrap();
        assert_eq!(row.output, vec![0x01, 0x8D, 0x00]);
    }

    #[test]
    fn test_runaway_play_is_an_error_when_required() {
        // play: JMP $1000
        let memory = FlatMemory::from_image(0x1000, &[0x4C, 0x00, 0x10]).unwrap();
        let config = PlayerConfig {
            init_addr: 0x1000,
            play_addr: 0x1000,
            init_budget: Some(10),
            play_budget: Some(10),
            require_return: true,
            ..PlayerConfig::default()
        };
        let mut player = Player::new(Cpu6502::new(memory), config).unwrap();
        assert_eq!(player.init(), Err(PlayerError::InitDidNotReturn));
        assert_eq!(
            player.play_row(),
            Err(PlayerError::PlayDidNotReturn { row: 0 })
        );
    }

    #[test]
    fn test_runaway_play_is_reported_otherwise() {
        let memory = FlatMemory::from_image(0x1000, &[0x4C, 0x00, 0x10]).unwrap();
        let config = PlayerConfig {
            init_addr: 0x1000,
            play_addr: 0x1000,
            play_budget: Some(10),
            init_budget: Some(10),
            ..PlayerConfig::default()
        };
        let mut player = Player::new(Cpu6502::new(memory), config).unwrap();
        assert!(!player.init().unwrap().returned());
        let row = player.play_row().unwrap();
        assert!(!row.outcome.returned());
        assert_eq!(row.outcome.steps(), 10);
        assert_eq!(player.cpu().sp(), 0xFF);
    }

    #[test]
    fn test_runaway_rows_leave_stack_balanced() {
        // play: CALL $8000 (recurses until the budget runs out); init: RET
        let memory = FlatMemory::from_image(0x8000, &[0xCD, 0x00, 0x80, 0xC9]).unwrap();
        let config = PlayerConfig {
            init_addr: 0x8003,
            play_addr: 0x8000,
            play_budget: Some(1_000),
            ..PlayerConfig::default()
        };
        let mut player = Player::new(CpuZ80::new(memory), config).unwrap();
        player.init().unwrap();

        for row in player.play_rows(5).unwrap() {
            assert!(!row.outcome.returned());
        }
        assert_eq!(player.cpu().sp(), 0xFFFF);
    }

    #[test]
    fn test_z80_player_with_ay_capture() {
        // play: LD BC,0xFFFD; LD A,7; OUT (C),A; LD B,0xBF; LD A,0x38; OUT (C),A; RET
        let code = [
            0x01, 0xFD, 0xFF, 0x3E, 0x07, 0xED, 0x79, 0x06, 0xBF, 0x3E, 0x38, 0xED, 0x79, 0xC9,
        ];
        let bus = CaptureBus::new(FlatMemory::from_image(0x8000, &code).unwrap());
        let config = PlayerConfig {
            init_addr: 0x800D, // bare RET
            play_addr: 0x8000,
            ..PlayerConfig::default()
        };
        let mut player = Player::new(CpuZ80::new(bus), config).unwrap();
        player.init().unwrap();
        player.play_row().unwrap();

        let writes = player.cpu_mut().memory_mut().take_port_writes();
        let mut ay = crate::AyRegisterFile::new(crate::AyPorts::SPECTRUM);
        ay.feed_all(&writes);
        assert_eq!(ay.register(7), 0x38);
    }

    #[test]
    fn test_validate_rejects_bad_windows_and_budgets() {
        let empty = PlayerConfig {
            output: vec![OutputWindow {
                addr: 0x0200,
                len: 0,
            }],
            ..PlayerConfig::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(PlayerError::InvalidConfig(_))
        ));

        let wrapping = PlayerConfig {
            output: vec![OutputWindow {
                addr: 0xFFFF,
                len: 2,
            }],
            ..PlayerConfig::default()
        };
        assert!(wrapping.validate().is_err());

        let top = PlayerConfig {
            output: vec![OutputWindow {
                addr: 0xFFFF,
                len: 1,
            }],
            ..PlayerConfig::default()
        };
        assert!(top.validate().is_ok());

        let zero_budget = PlayerConfig {
            play_budget: Some(0),
            ..PlayerConfig::default()
        };
        assert!(zero_budget.validate().is_err());

        let memory = FlatMemory::new();
        assert!(Player::new(Cpu6502::new(memory), zero_budget).is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = PlayerConfig {
            init_argument: Some(1),
            play_budget: Some(5_000),
            require_return: true,
            ..base_config()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlayerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
