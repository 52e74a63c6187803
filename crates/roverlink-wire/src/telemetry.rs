//! Semantic payload types carried by RESPONSE packets.

use serde::{Deserialize, Serialize};

use crate::packet::MAX_PARAMS;

/// Odometry counters reported by a STATUS response.
///
/// Field order matches the wire parameter order, slots 0 through 9.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub left_forward_ticks: u32,
    pub right_forward_ticks: u32,
    pub left_reverse_ticks: u32,
    pub right_reverse_ticks: u32,
    pub left_forward_turns: u32,
    pub right_forward_turns: u32,
    pub left_reverse_turns: u32,
    pub right_reverse_turns: u32,
    pub forward_distance: u32,
    pub reverse_distance: u32,
}

impl StatusReport {
    /// Build a report from the frame's parameter slots.
    pub fn from_params(params: &[u32; MAX_PARAMS]) -> Self {
        Self {
            left_forward_ticks: params[0],
            right_forward_ticks: params[1],
            left_reverse_ticks: params[2],
            right_reverse_ticks: params[3],
            left_forward_turns: params[4],
            right_forward_turns: params[5],
            left_reverse_turns: params[6],
            right_reverse_turns: params[7],
            forward_distance: params[8],
            reverse_distance: params[9],
        }
    }

    /// Write the report back into parameter slots 0..9.
    pub fn fill_params(&self, params: &mut [u32; MAX_PARAMS]) {
        params[0] = self.left_forward_ticks;
        params[1] = self.right_forward_ticks;
        params[2] = self.left_reverse_ticks;
        params[3] = self.right_reverse_ticks;
        params[4] = self.left_forward_turns;
        params[5] = self.right_forward_turns;
        params[6] = self.left_reverse_turns;
        params[7] = self.right_reverse_turns;
        params[8] = self.forward_distance;
        params[9] = self.reverse_distance;
    }

    /// Counters as `(label, value)` pairs, in wire order.
    pub fn fields(&self) -> [(&'static str, u32); 10] {
        [
            ("Left Forward Ticks", self.left_forward_ticks),
            ("Right Forward Ticks", self.right_forward_ticks),
            ("Left Reverse Ticks", self.left_reverse_ticks),
            ("Right Reverse Ticks", self.right_reverse_ticks),
            ("Left Forward Turns", self.left_forward_turns),
            ("Right Forward Turns", self.right_forward_turns),
            ("Left Reverse Turns", self.left_reverse_turns),
            ("Right Reverse Turns", self.right_reverse_turns),
            ("Forward Distance", self.forward_distance),
            ("Reverse Distance", self.reverse_distance),
        ]
    }
}

/// Coarse brightness band for one colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelBand {
    /// Frequency at or below 100.
    Low,
    /// Frequency in 101..=200.
    Mid,
    /// Frequency above 200.
    High,
}

impl ChannelBand {
    pub fn of(frequency: u32) -> Self {
        if frequency <= 100 {
            ChannelBand::Low
        } else if frequency <= 200 {
            ChannelBand::Mid
        } else {
            ChannelBand::High
        }
    }
}

/// The coarse colour bucket a reading maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColourClass {
    White,
    Red,
    Green,
    Indeterminate,
}

impl ColourClass {
    pub fn label(self) -> &'static str {
        match self {
            ColourClass::White => "White",
            ColourClass::Red => "Red",
            ColourClass::Green => "Green",
            ColourClass::Indeterminate => "Indeterminate",
        }
    }
}

/// Raw channel frequencies from the colour sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourReading {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ColourReading {
    pub fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }

    /// Classify the reading.
    ///
    /// All three channels High means white. Otherwise the raw red/green
    /// comparison decides; blue takes no further part, and a red/green tie
    /// is indeterminate. This matches the rover firmware's calibration.
    pub fn classify(&self) -> ColourClass {
        let all_high = ChannelBand::of(self.red) == ChannelBand::High
            && ChannelBand::of(self.green) == ChannelBand::High
            && ChannelBand::of(self.blue) == ChannelBand::High;
        if all_high {
            ColourClass::White
        } else if self.red > self.green {
            ColourClass::Red
        } else if self.green > self.red {
            ColourClass::Green
        } else {
            ColourClass::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_param_mapping() {
        let mut params = [0u32; MAX_PARAMS];
        for (i, slot) in params.iter_mut().enumerate().take(10) {
            *slot = (i as u32 + 1) * 11;
        }
        let report = StatusReport::from_params(&params);
        assert_eq!(report.left_forward_ticks, 11);
        assert_eq!(report.right_reverse_turns, 88);
        assert_eq!(report.forward_distance, 99);
        assert_eq!(report.reverse_distance, 110);

        let mut back = [0u32; MAX_PARAMS];
        report.fill_params(&mut back);
        assert_eq!(back[..10], params[..10]);
    }

    #[test]
    fn status_scenario_values() {
        let mut params = [0u32; MAX_PARAMS];
        params[..10].copy_from_slice(&[10, 10, 5, 5, 1, 1, 0, 0, 100, 50]);
        let report = StatusReport::from_params(&params);
        assert_eq!(
            report,
            StatusReport {
                left_forward_ticks: 10,
                right_forward_ticks: 10,
                left_reverse_ticks: 5,
                right_reverse_ticks: 5,
                left_forward_turns: 1,
                right_forward_turns: 1,
                left_reverse_turns: 0,
                right_reverse_turns: 0,
                forward_distance: 100,
                reverse_distance: 50,
            }
        );
    }

    #[test]
    fn channel_band_thresholds() {
        assert_eq!(ChannelBand::of(0), ChannelBand::Low);
        assert_eq!(ChannelBand::of(100), ChannelBand::Low);
        assert_eq!(ChannelBand::of(101), ChannelBand::Mid);
        assert_eq!(ChannelBand::of(200), ChannelBand::Mid);
        assert_eq!(ChannelBand::of(201), ChannelBand::High);
    }

    #[test]
    fn colour_all_high_is_white() {
        assert_eq!(
            ColourReading::new(250, 250, 250).classify(),
            ColourClass::White
        );
        assert_eq!(ColourReading::new(250, 250, 250).classify().label(), "White");
    }

    #[test]
    fn colour_green_beats_lower_red() {
        // red low, green mid, blue high: not all-high, green wins on raw value
        assert_eq!(
            ColourReading::new(50, 150, 250).classify(),
            ColourClass::Green
        );
    }

    #[test]
    fn colour_red_beats_lower_green() {
        assert_eq!(
            ColourReading::new(180, 90, 10).classify(),
            ColourClass::Red
        );
    }

    #[test]
    fn colour_tie_is_indeterminate() {
        assert_eq!(
            ColourReading::new(120, 120, 30).classify(),
            ColourClass::Indeterminate
        );
    }

    #[test]
    fn blue_does_not_break_ties() {
        // high blue alone never produces a blue label
        assert_eq!(
            ColourReading::new(10, 10, 250).classify(),
            ColourClass::Indeterminate
        );
    }
}
