//! Control-panel pin assignments for the 40-pin header.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Numbers are **physical board positions**; the
//! sysfs driver translates them to SoC GPIO lines with [`board_to_bcm`].
//!
//! All inputs are active-low with pull-up: a pressed button or a switch in
//! the ON position reads logic 0.

// ---------------------------------------------------------------------------
// Momentary buttons (falling-edge detected)
// ---------------------------------------------------------------------------

/// Button 1: start/stop the managed application (toggle).
pub const APP_BUTTON: u8 = 33;
/// Button 2: request system shutdown.
pub const SHUTDOWN_BUTTON: u8 = 31;

// ---------------------------------------------------------------------------
// Enable switches (level)
// ---------------------------------------------------------------------------

/// Switch 1 ON: application start/stop button enabled.
pub const APP_ENABLE_SWITCH: u8 = 35;
/// Switch 2 ON: system shutdown button enabled.
pub const SHUTDOWN_ENABLE_SWITCH: u8 = 36;

// ---------------------------------------------------------------------------
// Status LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// Flashing: the supervisor is alive.
pub const SYSTEM_ALIVE_LED: u8 = 40;
/// Flashing: the managed application is running.
pub const APP_RUNNING_LED: u8 = 37;
/// Flashing: application stopped since it was started.  Solid: shutdown requested.
pub const SHUTDOWN_LED: u8 = 38;

/// Physical header position → BCM GPIO line, for every header pin that
/// carries a GPIO.  Power and ground positions have no entry.
const BOARD_TO_BCM: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// Translate a physical header position to its BCM GPIO line.
/// Returns `None` for power/ground positions and numbers outside 1–40.
pub fn board_to_bcm(board: u8) -> Option<u8> {
    BOARD_TO_BCM
        .iter()
        .find(|(b, _)| *b == board)
        .map(|(_, bcm)| *bcm)
}
