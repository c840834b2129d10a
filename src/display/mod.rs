//! Character display devices used by the LCD renderer.

pub mod gpio;
pub mod hd44780;

use crate::error::{MonitorError, MonitorResult};
use crate::models::LcdConfig;

use gpio::SysfsPin;
use hd44780::Hd44780;

/// Number of text rows on the display
pub const ROWS: u8 = 2;
/// Number of characters per row
pub const COLUMNS: u8 = 16;

/// A text display addressed by row and column
pub trait CharacterDisplay: Send {
    fn initialize(&mut self) -> MonitorResult<()>;
    fn clear(&mut self) -> MonitorResult<()>;
    fn set_cursor(&mut self, row: u8, col: u8) -> MonitorResult<()>;
    fn print(&mut self, text: &str) -> MonitorResult<()>;
}

/// Open an HD44780 display wired to the configured GPIO pins
pub fn open_hd44780(lcd: &LcdConfig) -> MonitorResult<Hd44780<SysfsPin>> {
    if !matches!(lcd.data.len(), 4 | 8) {
        return Err(MonitorError::Config(format!(
            "LCD needs 4 or 8 data pins, got {}",
            lcd.data.len()
        )));
    }

    let rs = SysfsPin::open(lcd.rs)?;
    let e = SysfsPin::open(lcd.e)?;
    let data = lcd
        .data
        .iter()
        .map(|&pin| SysfsPin::open(pin))
        .collect::<MonitorResult<Vec<_>>>()?;

    Hd44780::new(rs, e, data)
}
