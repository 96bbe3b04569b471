//! Fixed charge position tables.
//!
//! These positions were laid out by hand to match the sweater and balloon
//! artwork. They are plain data: [`ChargeLayout`] copies them
//! into the configuration so a host can replace them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Plus/minus charge positions on the sweater, relative to its top-left corner.
pub const SWEATER_CHARGES: [[f32; 2]; 57] = [
    [84.0, 45.0],
    [126.0, 53.0],
    [162.0, 41.0],
    [22.0, 65.0],
    [53.0, 85.0],
    [78.0, 72.0],
    [161.0, 83.0],
    [197.0, 66.0],
    [232.0, 64.0],
    [46.0, 111.0],
    [77.0, 112.0],
    [121.0, 99.0],
    [201.0, 116.0],
    [214.0, 91.0],
    [232.0, 115.0],
    [20.0, 128.0],
    [83.0, 148.0],
    [108.0, 133.0],
    [146.0, 120.0],
    [164.0, 141.0],
    [208.0, 144.0],
    [19.0, 154.0],
    [58.0, 160.0],
    [97.0, 177.0],
    [129.0, 168.0],
    [172.0, 170.0],
    [202.0, 179.0],
    [228.0, 161.0],
    [23.0, 182.0],
    [70.0, 187.0],
    [134.0, 200.0],
    [175.0, 197.0],
    [204.0, 206.0],
    [22.0, 234.0],
    [54.0, 228.0],
    [84.0, 224.0],
    [111.0, 232.0],
    [228.0, 229.0],
    [24.0, 266.0],
    [53.0, 264.0],
    [87.0, 268.0],
    [127.0, 256.0],
    [154.0, 241.0],
    [193.0, 242.0],
    [234.0, 261.0],
    [149.0, 271.0],
    [174.0, 285.0],
    [76.0, 309.0],
    [116.0, 305.0],
    [145.0, 308.0],
    [179.0, 328.0],
    [76.0, 355.0],
    [128.0, 346.0],
    [77.0, 381.0],
    [114.0, 382.0],
    [139.0, 372.0],
    [167.0, 375.0],
];

/// Where collected electrons are drawn on a balloon, relative to its
/// top-left corner. Slot `i` is occupied once the balloon holds more than
/// `i` extra electrons.
pub const BALLOON_SLOTS: [[f32; 2]; 57] = [
    [66.0, 128.0],
    [46.0, 104.0],
    [64.0, 92.0],
    [62.0, 65.0],
    [116.0, 117.0],
    [76.0, 176.0],
    [100.0, 44.0],
    [89.0, 141.0],
    [108.0, 144.0],
    [83.0, 50.0],
    [53.0, 78.0],
    [58.0, 42.0],
    [97.0, 159.0],
    [64.0, 151.0],
    [47.0, 169.0],
    [33.0, 160.0],
    [117.0, 99.0],
    [90.0, 125.0],
    [77.0, 88.0],
    [88.0, 80.0],
    [81.0, 111.0],
    [39.0, 65.0],
    [97.0, 70.0],
    [86.0, 167.0],
    [53.0, 124.0],
    [39.0, 145.0],
    [104.0, 102.0],
    [32.0, 119.0],
    [87.0, 32.0],
    [102.0, 84.0],
    [29.0, 95.0],
    [27.0, 60.0],
    [20.0, 131.0],
    [102.0, 119.0],
    [116.0, 80.0],
    [19.0, 80.0],
    [33.0, 80.0],
    [71.0, 39.0],
    [16.0, 101.0],
    [63.0, 164.0],
    [71.0, 55.0],
    [68.0, 115.0],
    [76.0, 75.0],
    [66.0, 27.0],
    [32.0, 44.0],
    [82.0, 63.0],
    [109.0, 56.0],
    [43.0, 37.0],
    [94.0, 57.0],
    [79.0, 150.0],
    [53.0, 55.0],
    [92.0, 97.0],
    [34.0, 133.0],
    [26.0, 149.0],
    [16.0, 114.0],
    [50.0, 137.0],
    [107.0, 131.0],
];

/// Neutral plus/minus pairs every balloon carries.
pub const BALLOON_NEUTRAL_PAIRS: [[f32; 2]; 4] =
    [[44.0, 50.0], [88.0, 50.0], [44.0, 140.0], [88.0, 140.0]];

/// Image-derived charge tables, injected through the configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeLayout {
    /// Sweater plus-charge positions relative to the sweater origin.
    pub sweater_charges: Vec<Vec2>,
    /// Electron slots relative to the balloon origin.
    pub balloon_slots: Vec<Vec2>,
    /// Neutral pairs relative to the balloon origin.
    pub balloon_neutral_pairs: Vec<Vec2>,
}

fn to_points(table: &[[f32; 2]]) -> Vec<Vec2> {
    table.iter().map(|&p| Vec2::from_array(p)).collect()
}

impl Default for ChargeLayout {
    fn default() -> Self {
        Self {
            sweater_charges: to_points(&SWEATER_CHARGES),
            balloon_slots: to_points(&BALLOON_SLOTS),
            balloon_neutral_pairs: to_points(&BALLOON_NEUTRAL_PAIRS),
        }
    }
}
