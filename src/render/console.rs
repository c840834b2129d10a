use std::io::{self, Stdout, Write};

use crate::error::MonitorResult;
use crate::models::Progress;
use crate::models::api::ApiVersion;
use crate::render::{Renderer, banner_lines, state_line, time_line};
use crate::status::PrinterStatus;

/// Writes the printer state as text lines, to stdout by default
pub struct ConsoleRenderer<W: Write + Send = Stdout> {
    out: W,
}

impl ConsoleRenderer<Stdout> {
    pub fn new() -> Self {
        ConsoleRenderer { out: io::stdout() }
    }
}

impl Default for ConsoleRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        ConsoleRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn welcome(&mut self, version: Option<&ApiVersion>) -> MonitorResult<()> {
        for line in banner_lines(version) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render(&mut self, status: PrinterStatus, progress: Option<&Progress>) -> MonitorResult<()> {
        writeln!(self.out, "{}", state_line(status, progress))?;
        if let Some(progress) = progress {
            writeln!(self.out, "{}", time_line(progress))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(status: PrinterStatus, progress: Option<&Progress>) -> String {
        let mut console = ConsoleRenderer::with_writer(Vec::new());
        console.render(status, progress).unwrap();
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_printing_with_progress() {
        let progress = Progress {
            completion: 42.5,
            print_time: 600,
            print_time_left: 1200,
            print_time_left_origin: Some("estimate".to_string()),
        };
        assert_eq!(
            rendered(PrinterStatus::Printing, Some(&progress)),
            "Printing 42.5%\n00:10 / 00:20\n"
        );
    }

    #[test]
    fn test_absent_progress_prints_state_only() {
        assert_eq!(rendered(PrinterStatus::Ok, None), "Idle\n");
        assert_eq!(rendered(PrinterStatus::Failed, None), "Disconnected\n");
    }

    #[test]
    fn test_welcome_banner() {
        let mut console = ConsoleRenderer::with_writer(Vec::new());
        console.welcome(None).unwrap();
        let out = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(out, "    OctoPrint   \n Status Monitor \n");
    }
}
