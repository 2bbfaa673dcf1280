//! Machine status shown next to the connection indicator.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MachineStatus {
    /// Nothing reported yet.
    #[default]
    Standby,
    /// Free-form status reported by the machine through the store.
    Reported(String),
    /// A strategy command was accepted by the store.
    Executing { command: u8, name: &'static str },
    /// The store was unreachable; the strategy is only simulated locally.
    Simulation { command: u8 },
    /// Telemetry comes from the local simulator.
    SimulationFeed,
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Standby => f.write_str("Standby"),
            MachineStatus::Reported(s) => f.write_str(s),
            MachineStatus::Executing { command, name } => {
                write!(f, "Executing Logic {command}: {name}")
            }
            MachineStatus::Simulation { command } => {
                write!(f, "SIMULATION: Running Logic {command}")
            }
            MachineStatus::SimulationFeed => f.write_str("SIMULATION MODE"),
        }
    }
}

/// State of the link to the machine's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    Connected,
    #[default]
    Disconnected,
    Simulated,
}

impl LinkState {
    pub const fn is_connected(self) -> bool {
        matches!(self, LinkState::Connected)
    }

    pub const fn label(self) -> &'static str {
        match self {
            LinkState::Connected => "connected",
            LinkState::Disconnected => "disconnected",
            LinkState::Simulated => "simulated",
        }
    }
}
