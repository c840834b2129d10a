use std::thread;
use std::time::Duration;

use crate::display::gpio::OutputPin;
use crate::display::{COLUMNS, CharacterDisplay, ROWS};
use crate::error::{MonitorError, MonitorResult};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_FUNCTION_8BIT_2LINE: u8 = 0x38;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// HD44780-compatible controller on GPIO lines.
///
/// Timing is done with `thread::sleep`, so every call blocks the caller for
/// up to a few milliseconds; async callers go through `monitor::blocking`.
///
/// `data` holds the bus lines lowest bit first: D4..D7 in 4-bit mode,
/// D0..D7 in 8-bit mode.
pub struct Hd44780<P: OutputPin> {
    rs: P,
    e: P,
    data: Vec<P>,
}

impl<P: OutputPin> Hd44780<P> {
    pub fn new(rs: P, e: P, data: Vec<P>) -> MonitorResult<Self> {
        if !matches!(data.len(), 4 | 8) {
            return Err(MonitorError::Display(format!(
                "HD44780 needs 4 or 8 data lines, got {}",
                data.len()
            )));
        }
        Ok(Hd44780 { rs, e, data })
    }

    fn four_bit(&self) -> bool {
        self.data.len() == 4
    }

    fn command(&mut self, byte: u8) -> MonitorResult<()> {
        self.write_byte(byte, false)
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) -> MonitorResult<()> {
        self.rs.set(is_data)?;
        if self.four_bit() {
            self.write_bits(byte >> 4)?;
            self.write_bits(byte & 0x0F)
        } else {
            self.write_bits(byte)
        }
    }

    fn write_bits(&mut self, value: u8) -> MonitorResult<()> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set((value >> bit) & 1 == 1)?;
        }
        self.pulse_enable()
    }

    // The controller latches the bus on the falling edge of E
    fn pulse_enable(&mut self) -> MonitorResult<()> {
        self.e.set(false)?;
        thread::sleep(Duration::from_micros(1));
        self.e.set(true)?;
        thread::sleep(Duration::from_micros(1));
        self.e.set(false)?;
        thread::sleep(Duration::from_micros(100));
        Ok(())
    }
}

impl<P: OutputPin> CharacterDisplay for Hd44780<P> {
    fn initialize(&mut self) -> MonitorResult<()> {
        thread::sleep(Duration::from_millis(50));
        self.rs.set(false)?;
        self.e.set(false)?;

        // Reset sequence from the datasheet, valid from any power-on state
        let (reset, function_set) = if self.four_bit() {
            (0x03, CMD_FUNCTION_4BIT_2LINE)
        } else {
            (0x30, CMD_FUNCTION_8BIT_2LINE)
        };
        self.write_bits(reset)?;
        thread::sleep(Duration::from_micros(4500));
        self.write_bits(reset)?;
        thread::sleep(Duration::from_micros(4500));
        self.write_bits(reset)?;
        thread::sleep(Duration::from_micros(150));
        if self.four_bit() {
            self.write_bits(0x02)?;
        }

        self.command(function_set)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE_INCREMENT)
    }

    fn clear(&mut self) -> MonitorResult<()> {
        self.command(CMD_CLEAR)?;
        thread::sleep(Duration::from_millis(2));
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> MonitorResult<()> {
        if row >= ROWS || col >= COLUMNS {
            return Err(MonitorError::Display(format!(
                "Cursor position {},{} is outside the display",
                row, col
            )));
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }

    fn print(&mut self, text: &str) -> MonitorResult<()> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            self.write_byte(byte, true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Bus {
        rs: bool,
        enable: bool,
        data: [bool; 8],
        // (rs, bus value) captured on each falling edge of E
        latched: Vec<(bool, u8)>,
    }

    enum Line {
        Rs,
        Enable,
        Data(usize),
    }

    struct BusPin {
        bus: Arc<Mutex<Bus>>,
        line: Line,
    }

    impl OutputPin for BusPin {
        fn set(&mut self, high: bool) -> MonitorResult<()> {
            let mut bus = self.bus.lock().unwrap();
            match self.line {
                Line::Rs => bus.rs = high,
                Line::Data(bit) => bus.data[bit] = high,
                Line::Enable => {
                    if bus.enable && !high {
                        let value = bus
                            .data
                            .iter()
                            .enumerate()
                            .fold(0u8, |acc, (bit, &set)| acc | ((set as u8) << bit));
                        let rs = bus.rs;
                        bus.latched.push((rs, value));
                    }
                    bus.enable = high;
                }
            }
            Ok(())
        }
    }

    fn bus_display(width: usize) -> (Hd44780<BusPin>, Arc<Mutex<Bus>>) {
        let bus = Arc::new(Mutex::new(Bus::default()));
        let pin = |line| BusPin {
            bus: Arc::clone(&bus),
            line,
        };
        let data = (0..width).map(|bit| pin(Line::Data(bit))).collect();
        let lcd = Hd44780::new(pin(Line::Rs), pin(Line::Enable), data).unwrap();
        (lcd, bus)
    }

    // Reassemble 4-bit transfers into whole bytes
    fn bytes_4bit(latched: &[(bool, u8)]) -> Vec<(bool, u8)> {
        latched
            .chunks(2)
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
            .collect()
    }

    #[test]
    fn test_rejects_unsupported_bus_width() {
        let bus = Arc::new(Mutex::new(Bus::default()));
        let pin = |line| BusPin {
            bus: Arc::clone(&bus),
            line,
        };
        let data = (0..3).map(|bit| pin(Line::Data(bit))).collect();
        assert!(Hd44780::new(pin(Line::Rs), pin(Line::Enable), data).is_err());
    }

    #[test]
    fn test_initialize_4bit_sequence() {
        let (mut lcd, bus) = bus_display(4);
        lcd.initialize().unwrap();

        let latched = bus.lock().unwrap().latched.clone();
        assert_eq!(
            &latched[..4],
            &[(false, 0x03), (false, 0x03), (false, 0x03), (false, 0x02)]
        );
        assert_eq!(
            bytes_4bit(&latched[4..]),
            vec![
                (false, CMD_FUNCTION_4BIT_2LINE),
                (false, CMD_DISPLAY_ON),
                (false, CMD_CLEAR),
                (false, CMD_ENTRY_MODE_INCREMENT),
            ]
        );
    }

    #[test]
    fn test_cursor_and_text_4bit() {
        let (mut lcd, bus) = bus_display(4);
        lcd.set_cursor(1, 3).unwrap();
        lcd.print("Hi").unwrap();

        let latched = bus.lock().unwrap().latched.clone();
        assert_eq!(
            bytes_4bit(&latched),
            vec![(false, 0xC3), (true, b'H'), (true, b'i')]
        );
    }

    #[test]
    fn test_text_8bit_replaces_non_ascii() {
        let (mut lcd, bus) = bus_display(8);
        lcd.print("5°").unwrap();

        let latched = bus.lock().unwrap().latched.clone();
        assert_eq!(latched, vec![(true, b'5'), (true, b'?')]);
    }

    #[test]
    fn test_cursor_outside_display_is_rejected() {
        let (mut lcd, _bus) = bus_display(4);
        assert!(lcd.set_cursor(2, 0).is_err());
        assert!(lcd.set_cursor(0, 16).is_err());
    }
}
