//! Static catalog of the machine's fuzzy control strategies.
//!
//! Entries are documentation for the operator: only strategy 10 (precision
//! dispensing) is evaluated on this side, by `optimizer`. Selecting any
//! entry sends its command code to the machine, which runs the strategy.

use crate::error::VendError;

/// Id of the baseline entry, which is sent as command 0.
pub const BASELINE_ID: u8 = 11;
/// Id of the precision dispensing strategy.
pub const PRECISION_DISPENSING_ID: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub id: u8,
    pub name: &'static str,
    /// Short label of what the strategy controls.
    pub purpose: &'static str,
    pub description: &'static str,
    /// Partitions and rules, as shown to the operator.
    pub reference_rules: &'static str,
}

impl Strategy {
    /// Code written to the command store.
    pub const fn command(&self) -> u8 {
        command_for(self.id)
    }

    /// Whether selecting this strategy runs the local optimizer.
    pub const fn is_executable(&self) -> bool {
        self.id == PRECISION_DISPENSING_ID
    }
}

/// Map a catalog id to its command code (the baseline entry is 0).
#[inline]
pub const fn command_for(id: u8) -> u8 {
    if id == BASELINE_ID { 0 } else { id }
}

/// Look a strategy up by catalog id.
pub fn find(id: u8) -> Result<&'static Strategy, VendError> {
    CATALOG
        .iter()
        .find(|s| s.id == id)
        .ok_or(VendError::UnknownStrategy(id))
}

/// Look a strategy up by the command code it sends (0 = baseline).
pub fn by_command(command: u8) -> Result<&'static Strategy, VendError> {
    CATALOG
        .iter()
        .find(|s| s.command() == command)
        .ok_or(VendError::UnknownStrategy(command))
}

/// Strategies in display order: 1..=10, then the baseline.
pub fn display_order() -> impl Iterator<Item = &'static Strategy> {
    CATALOG.iter()
}

pub static CATALOG: [Strategy; 11] = [
    Strategy {
        id: 1,
        name: "Fuzzy Logic1",
        purpose: "vibration status monitor",
        description: "Classifies vibration as normal, warning or critical. Thresholds adapt to the current RPM so that vibration expected at higher speeds is not flagged.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
rpm:       slow <=30 .. 60, moderate 30..60..90, fast 60 .. >=90

IF vibration is low AND rpm is slow THEN status is normal
IF vibration is medium AND rpm is slow THEN status is warning
IF vibration is high THEN status is critical
IF vibration is medium AND rpm is moderate THEN status is warning
IF vibration is medium AND rpm is fast THEN status is normal

normal = max(r1, r5), warning = max(r2, r4), critical = r3; highest score wins",
    },
    Strategy {
        id: 2,
        name: "Fuzzy Logic2",
        purpose: "adaptive speed control",
        description: "Holds the motor at the speed that balances throughput against smoothness, nudging RPM up or down from the current vibration level.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
rpm:       slow <=30 .. 50, medium 30..50..70, fast 50 .. >=70
adjustment: decreaseLarge -20, decreaseSmall -10, maintain 0, increaseSmall +10, increaseLarge +20

IF vibration is low AND rpm is slow THEN increaseLarge
IF vibration is low AND rpm is medium THEN increaseSmall
IF vibration is medium THEN maintain
IF vibration is high AND rpm is fast THEN decreaseLarge
IF vibration is high AND rpm is medium THEN decreaseSmall

new rpm = rpm + weighted average of adjustments",
    },
    Strategy {
        id: 3,
        name: "Fuzzy Logic3",
        purpose: "wear prediction",
        description: "Reads vibration signatures at different speeds to estimate component wear and flag likely mechanical failures early.",
        reference_rules: "\
vibration: normal <=15 .. 25, elevated 15..25..35, critical 25 .. >=35
rpm:       low <=30 .. 50, medium 30..50..70, high 50 .. >=70
wear risk: low 0, moderate 50, high 100

IF vibration is normal THEN wear is low
IF vibration is elevated AND rpm is low THEN wear is moderate
IF vibration is elevated AND rpm is high THEN wear is high
IF vibration is critical THEN wear is high

risk = weighted average (0..100)",
    },
    Strategy {
        id: 4,
        name: "Fuzzy Logic4",
        purpose: "stall prevention",
        description: "Watches for sudden RPM drops combined with vibration and reduces load or raises power before the motor stalls.",
        reference_rules: "\
rpm change: stable <=5 .. 15, moderate 5..15..25, sharp 15 .. >=25
vibration:  low <=10 .. 20, medium 10..20..30, high 20 .. >=30
action: none 0, reduceLoad 1, increasePower 2

IF rpm change is stable THEN no action
IF rpm change is moderate AND vibration is medium THEN reduce load
IF rpm change is sharp AND vibration is high THEN increase power
IF vibration is high THEN reduce load

strongest rule selects the action",
    },
    Strategy {
        id: 5,
        name: "Fuzzy Logic5",
        purpose: "dampening adjustment",
        description: "Sets the dampening force from vibration amplitude and speed to counter vibration across the operating range.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
rpm:       low <=30 .. 50, medium 30..50..70, high 50 .. >=70
dampening: low 10, medium 50, high 100

IF vibration is low THEN dampening is low
IF vibration is medium AND rpm is low THEN dampening is medium
IF vibration is medium AND rpm is high THEN dampening is high
IF vibration is high THEN dampening is high

force = weighted average",
    },
    Strategy {
        id: 6,
        name: "Fuzzy Logic6",
        purpose: "operation mode selection",
        description: "Chooses between high speed, balanced and low vibration modes from current readings and the RPM-to-vibration ratio.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
ratio:     low <=0.5 .. 1.0, medium 0.5..1.0..1.5, high 1.0 .. >=1.5
mode: highSpeed 0, balanced 1, lowVibration 2

IF vibration is low AND ratio is low THEN highSpeed
IF vibration is medium THEN balanced
IF vibration is high OR ratio is high THEN lowVibration

strongest rule selects the mode",
    },
    Strategy {
        id: 7,
        name: "Fuzzy Logic7",
        purpose: "anomaly detection",
        description: "Flags RPM and vibration relationships that break the usual pattern, such as foreign objects, mechanical faults or tampering.",
        reference_rules: "\
ratio deviation: normal <=0.5 .. 1.0, elevated 0.5..1.0..1.5, abnormal 1.0 .. >=1.5
vibration change: stable <=5 .. 10, moderate 5..10..15, sharp 10 .. >=15
anomaly score: low 0, moderate 50, high 100

IF ratio is normal AND vibration change is stable THEN anomaly is low
IF ratio is elevated OR vibration change is moderate THEN anomaly is moderate
IF ratio is abnormal OR vibration change is sharp THEN anomaly is high

score = weighted average (0..100)",
    },
    Strategy {
        id: 8,
        name: "Fuzzy Logic8",
        purpose: "power efficiency tuning",
        description: "Looks for the speed that draws the least power while keeping vibration acceptable.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
power:     low <=50 .. 100, medium 50..100..150, high 100 .. >=150
optimal rpm: low 20, medium 50, high 80

IF vibration is low AND power is low THEN rpm is high
IF vibration is medium OR power is medium THEN rpm is medium
IF vibration is high OR power is high THEN rpm is low

rpm = weighted average",
    },
    Strategy {
        id: 9,
        name: "Fuzzy Logic9",
        purpose: "acceleration management",
        description: "Shapes acceleration during start-up and speed changes from live vibration feedback to avoid vibration spikes.",
        reference_rules: "\
vibration: low <=10 .. 20, medium 10..20..30, high 20 .. >=30
rpm rate:  slow <=5 .. 10, moderate 5..10..15, fast 10 .. >=15
acceleration: slow 2, moderate 5, fast 10

IF vibration is low THEN acceleration is fast
IF vibration is medium AND rpm rate is moderate THEN acceleration is moderate
IF vibration is high OR rpm rate is fast THEN acceleration is slow

rate = weighted average; <=3 slow, <=7 moderate, else fast",
    },
    Strategy {
        id: 10,
        name: "Fuzzy Logic10",
        purpose: "precision dispensing tuning",
        description: "Tunes RPM for accurate dispensing by relating vibration to predicted dispensing error for the medicine being dispensed.",
        reference_rules: "\
weight:    light <=0.1 .. 0.3, medium 0.1..0.3..0.5, heavy 0.3 .. >=0.5
vibration: minimal <=5 .. 15, moderate 5..15..25, significant 15 .. >=25
rpm:       slow <=20 .. 40, medium 20..40..60, fast 40 .. >=60
optimal rpm: veryLow 10, low 25, mediumLow 35, medium 45, mediumHigh 55, high 65, veryHigh 80
error(rpm, vibration) = 0.05 + vibration/500 + |rpm - 45|/200  (mm, lower is better)

IF weight is light AND vibration is minimal THEN rpm is high
IF weight is heavy THEN rpm is low
IF vibration is significant THEN rpm is veryLow
IF weight is medium AND vibration is minimal THEN rpm is mediumHigh
IF weight is medium AND vibration is moderate THEN rpm is medium
IF weight is light AND vibration is moderate THEN rpm is mediumHigh
IF weight is heavy AND vibration is minimal THEN rpm is mediumLow

rpm = round(weighted average), 45 when no rule fires",
    },
    Strategy {
        id: BASELINE_ID,
        name: "Fuzzy Logic0",
        purpose: "baseline",
        description: "Returns the machine to its baseline program. Shares the acceleration management description; no rules are defined.",
        reference_rules: "no rules defined",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_ordered_for_display() {
        let ids: Vec<u8> = display_order().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn baseline_sends_zero() {
        assert_eq!(find(BASELINE_ID).unwrap().command(), 0);
        assert_eq!(by_command(0).unwrap().id, BASELINE_ID);
        for id in 1..=10 {
            assert_eq!(command_for(id), id);
        }
    }

    #[test]
    fn only_precision_dispensing_is_executable() {
        let exec: Vec<u8> = CATALOG
            .iter()
            .filter(|s| s.is_executable())
            .map(|s| s.id)
            .collect();
        assert_eq!(exec, vec![PRECISION_DISPENSING_ID]);
    }

    #[test]
    fn unknown_ids_are_typed_errors() {
        assert_eq!(find(0), Err(VendError::UnknownStrategy(0)));
        assert_eq!(find(12), Err(VendError::UnknownStrategy(12)));
        assert_eq!(by_command(11), Err(VendError::UnknownStrategy(11)));
    }

    #[test]
    fn precision_rules_match_the_live_table() {
        let text = find(PRECISION_DISPENSING_ID).unwrap().reference_rules;
        assert_eq!(text.lines().filter(|l| l.starts_with("IF ")).count(), 7);
    }
}
