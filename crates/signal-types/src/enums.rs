//! Enumeration types for signal state and the six-phase cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::{Axis, Direction, PerDirection};

// ---------------------------------------------------------------------------
// Light state
// ---------------------------------------------------------------------------

/// The signal shown to one approach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    /// Vehicles may not enter. Every approach starts red.
    #[default]
    Red,
    /// Clearance interval; vehicles do not depart.
    Yellow,
    /// Vehicles depart at the saturation rate.
    Green,
}

impl LightState {
    /// Lowercase name for logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Phase kinds
// ---------------------------------------------------------------------------

/// One of the six phases of the signal cycle.
///
/// The cycle is traversed strictly in the order of [`PhaseKind::CYCLE`]:
/// north-south green, yellow, all-red clearance, then the same for
/// east-west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    /// North and south green, east and west red.
    NsGreen,
    /// North and south yellow, east and west red.
    NsYellow,
    /// All red after the north-south phase.
    #[serde(rename = "ALL_RED_1")]
    AllRed1,
    /// East and west green, north and south red.
    EwGreen,
    /// East and west yellow, north and south red.
    EwYellow,
    /// All red after the east-west phase.
    #[serde(rename = "ALL_RED_2")]
    AllRed2,
}

impl PhaseKind {
    /// The six phases in cycle order.
    pub const CYCLE: [Self; 6] = [
        Self::NsGreen,
        Self::NsYellow,
        Self::AllRed1,
        Self::EwGreen,
        Self::EwYellow,
        Self::AllRed2,
    ];

    /// Upper-case name used in schedules (`NS_GREEN`, `ALL_RED_1`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::NsGreen => "NS_GREEN",
            Self::NsYellow => "NS_YELLOW",
            Self::AllRed1 => "ALL_RED_1",
            Self::EwGreen => "EW_GREEN",
            Self::EwYellow => "EW_YELLOW",
            Self::AllRed2 => "ALL_RED_2",
        }
    }

    /// The phase that follows this one in the cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::NsGreen => Self::NsYellow,
            Self::NsYellow => Self::AllRed1,
            Self::AllRed1 => Self::EwGreen,
            Self::EwGreen => Self::EwYellow,
            Self::EwYellow => Self::AllRed2,
            Self::AllRed2 => Self::NsGreen,
        }
    }

    /// Position of this phase within [`PhaseKind::CYCLE`].
    pub const fn index(self) -> usize {
        match self {
            Self::NsGreen => 0,
            Self::NsYellow => 1,
            Self::AllRed1 => 2,
            Self::EwGreen => 3,
            Self::EwYellow => 4,
            Self::AllRed2 => 5,
        }
    }

    /// The axis served by a green phase, or `None` for yellow and all-red.
    pub const fn green_axis(self) -> Option<Axis> {
        match self {
            Self::NsGreen => Some(Axis::NorthSouth),
            Self::EwGreen => Some(Axis::EastWest),
            Self::NsYellow | Self::AllRed1 | Self::EwYellow | Self::AllRed2 => None,
        }
    }

    /// The light shown to every approach during this phase.
    pub fn lights(self) -> PerDirection<LightState> {
        PerDirection::from_fn(|direction| self.light_for(direction))
    }

    /// The light shown to `direction` during this phase.
    pub const fn light_for(self, direction: Direction) -> LightState {
        let on_ns = matches!(direction.axis(), Axis::NorthSouth);
        match self {
            Self::NsGreen if on_ns => LightState::Green,
            Self::NsYellow if on_ns => LightState::Yellow,
            Self::EwGreen if !on_ns => LightState::Green,
            Self::EwYellow if !on_ns => LightState::Yellow,
            _ => LightState::Red,
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_order_matches_next() {
        for (i, phase) in PhaseKind::CYCLE.iter().enumerate() {
            assert_eq!(phase.index(), i);
            let following = PhaseKind::CYCLE
                .get((i + 1) % PhaseKind::CYCLE.len())
                .copied();
            assert_eq!(Some(phase.next()), following);
        }
    }

    #[test]
    fn green_phases_light_their_axis_only() {
        let lights = PhaseKind::NsGreen.lights();
        assert_eq!(lights.north, LightState::Green);
        assert_eq!(lights.south, LightState::Green);
        assert_eq!(lights.east, LightState::Red);
        assert_eq!(lights.west, LightState::Red);

        let lights = PhaseKind::EwYellow.lights();
        assert_eq!(lights.north, LightState::Red);
        assert_eq!(lights.east, LightState::Yellow);
        assert_eq!(lights.west, LightState::Yellow);
    }

    #[test]
    fn all_red_phases_are_red_everywhere() {
        for phase in [PhaseKind::AllRed1, PhaseKind::AllRed2] {
            for (_, light) in phase.lights().iter() {
                assert_eq!(*light, LightState::Red);
            }
            assert_eq!(phase.green_axis(), None);
        }
    }

    #[test]
    fn phase_names_use_schedule_spelling() {
        assert_eq!(PhaseKind::AllRed1.to_string(), "ALL_RED_1");
        assert_eq!(PhaseKind::EwGreen.name(), "EW_GREEN");
    }
}
