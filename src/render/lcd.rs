use crate::display::{COLUMNS, CharacterDisplay};
use crate::error::MonitorResult;
use crate::models::Progress;
use crate::models::api::ApiVersion;
use crate::render::{Renderer, banner_lines, state_line, time_line};
use crate::status::PrinterStatus;

/// Shows the printer state on a two-row character display
pub struct LcdRenderer<D: CharacterDisplay> {
    display: D,
}

impl<D: CharacterDisplay> LcdRenderer<D> {
    /// Initialize the display and wrap it
    pub fn new(mut display: D) -> MonitorResult<Self> {
        display.initialize()?;
        Ok(LcdRenderer { display })
    }

    fn show(&mut self, top: &str, bottom: Option<&str>) -> MonitorResult<()> {
        self.display.clear()?;
        self.display.set_cursor(0, 0)?;
        self.display.print(&fit(top))?;
        self.display.set_cursor(1, 0)?;
        if let Some(bottom) = bottom {
            self.display.print(&fit(bottom))?;
        }
        Ok(())
    }
}

fn fit(text: &str) -> String {
    text.chars().take(COLUMNS as usize).collect()
}

impl<D: CharacterDisplay> Renderer for LcdRenderer<D> {
    fn welcome(&mut self, version: Option<&ApiVersion>) -> MonitorResult<()> {
        let [title, subtitle] = banner_lines(version);
        self.show(&title, Some(&subtitle))
    }

    fn render(&mut self, status: PrinterStatus, progress: Option<&Progress>) -> MonitorResult<()> {
        let top = state_line(status, progress);
        let bottom = progress.map(time_line);
        self.show(&top, bottom.as_deref())
    }
}
