use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::error::MonitorResult;

/// Linux sysfs GPIO root
const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// A digital output line
pub trait OutputPin: Send {
    fn set(&mut self, high: bool) -> MonitorResult<()>;
}

/// Output pin driven through the sysfs GPIO interface
pub struct SysfsPin {
    value: File,
}

impl SysfsPin {
    pub fn open(number: u32) -> MonitorResult<Self> {
        Self::open_in(Path::new(SYSFS_GPIO_ROOT), number)
    }

    /// Export `number` under `root` (if needed) and configure it as output
    pub fn open_in(root: &Path, number: u32) -> MonitorResult<Self> {
        let pin_dir = root.join(format!("gpio{}", number));
        if !pin_dir.exists() {
            debug!(pin = number, "Exporting GPIO pin");
            fs::write(root.join("export"), number.to_string())?;
        }

        fs::write(pin_dir.join("direction"), "out")?;
        let value = OpenOptions::new().write(true).open(pin_dir.join("value"))?;

        Ok(SysfsPin { value })
    }
}

impl OutputPin for SysfsPin {
    fn set(&mut self, high: bool) -> MonitorResult<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(if high { b"1" } else { b"0" })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_configures_output_and_writes_levels() {
        let root = tempdir().unwrap();
        let pin_dir = root.path().join("gpio17");
        fs::create_dir_all(&pin_dir).unwrap();
        fs::write(pin_dir.join("value"), "0").unwrap();

        let mut pin = SysfsPin::open_in(root.path(), 17).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("direction")).unwrap(), "out");

        pin.set(true).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "1");
        pin.set(false).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "0");
    }

    #[test]
    fn test_open_exports_missing_pin() {
        let root = tempdir().unwrap();

        // Without a kernel behind it the pin directory never appears
        assert!(SysfsPin::open_in(root.path(), 7).is_err());
        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "7");
    }
}
