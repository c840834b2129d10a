//! Presentation of the printer state on the console or a character display.

pub mod console;
pub mod lcd;

use tracing::info;

use crate::display::{COLUMNS, open_hd44780};
use crate::error::MonitorResult;
use crate::models::api::ApiVersion;
use crate::models::{Config, Progress};
use crate::status::PrinterStatus;

use console::ConsoleRenderer;
use lcd::LcdRenderer;

const BANNER_TITLE: &str = "OctoPrint";
const BANNER_SUBTITLE: &str = "Status Monitor";

/// Output sink for the printer state
pub trait Renderer: Send {
    /// Shown once before the first tick
    fn welcome(&mut self, version: Option<&ApiVersion>) -> MonitorResult<()>;

    fn render(&mut self, status: PrinterStatus, progress: Option<&Progress>) -> MonitorResult<()>;
}

/// Pick the display renderer when LCD wiring is configured, the console otherwise
pub fn make_renderer(config: &Config) -> MonitorResult<Box<dyn Renderer>> {
    match config.display_wiring() {
        Some(lcd) => {
            info!(rs = lcd.rs, e = lcd.e, data = ?lcd.data, "Using LCD interface");
            let display = open_hd44780(lcd)?;
            Ok(Box::new(LcdRenderer::new(display)?))
        }
        None => {
            info!("Using console output");
            Ok(Box::new(ConsoleRenderer::new()))
        }
    }
}

/// Format seconds as `HH:MM`, rounded to the nearest minute (halves round down)
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds.saturating_add(29) / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// First line: the coarse state
pub fn state_line(status: PrinterStatus, progress: Option<&Progress>) -> String {
    match (status, progress) {
        (PrinterStatus::Ok, _) => "Idle".to_string(),
        (PrinterStatus::Failed, _) => "Disconnected".to_string(),
        (PrinterStatus::Printing, Some(progress)) => {
            format!("Printing {:.1}%", progress.completion)
        }
        (PrinterStatus::Printing, None) => "Printing".to_string(),
    }
}

/// Second line: elapsed and remaining time
pub fn time_line(progress: &Progress) -> String {
    format!(
        "{} / {}",
        format_duration(progress.print_time),
        format_duration(progress.print_time_left)
    )
}

/// The two banner lines, centred to the display width
pub fn banner_lines(version: Option<&ApiVersion>) -> [String; 2] {
    let subtitle = match version {
        Some(version) => format!("Server {}", version.server),
        None => BANNER_SUBTITLE.to_string(),
    };
    [center(BANNER_TITLE), center(&subtitle)]
}

fn center(text: &str) -> String {
    let width = COLUMNS as usize;
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len).div_ceil(2);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}
