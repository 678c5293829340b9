/// Weight of each outcome on a fresh draw. Never mutated; adjusted tables are built from it.
pub const BASE_TABLE: [(u8, f64); 7] = [
    (1, 0.20),
    (2, 0.27),
    (3, 0.31),
    (4, 0.12),
    (5, 0.05),
    (6, 0.03),
    (7, 0.02),
];
/// Excluding this outcome renormalizes the remaining weights to sum to 1.
pub const RENORMALIZED_OUTCOME: u8 = 3;
pub const BAR_SEGMENTS: usize = 15;
pub const BLUE_SEGMENTS: usize = 4;
pub const PURPLE_SEGMENTS: usize = 4;

pub mod conf_def {
    pub const CONFIG: &str = "potsim.json";
    pub const NUM_REROLLS: &str = "100";
    pub const NUM_SESSIONS: &str = "1000";
    pub const DRAW_COUNT: &str = "1";
    pub const RENDER_REROLLS: &str = "0";
}
