use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::error::{MonitorError, MonitorResult};
use crate::models::api::ApiVersion;
use crate::models::{Config, Progress};
use crate::render::Renderer;
use crate::services::octoprint::StatusSource;
use crate::status::PrinterStatus;

pub const API_KEY: &str = "5EE1807CD2CB4AADA4029AAFFE11B05A";

pub fn test_config(url: &str) -> Config {
    Config {
        apikey: API_KEY.to_string(),
        url: url.to_string(),
        ..Config::default()
    }
}

pub fn printer_body(printing: bool, error: bool, closed_or_error: bool) -> Value {
    json!({
        "state": {
            "text": (if printing { "Printing" } else { "Operational" }),
            "flags": {
                "operational": !closed_or_error,
                "paused": false,
                "printing": printing,
                "cancelling": false,
                "pausing": false,
                "sdReady": true,
                "error": error,
                "ready": !printing,
                "closedOrError": closed_or_error
            }
        },
        "temperature": {
            "tool0": {"actual": 214.8, "target": 220.0, "offset": 0}
        }
    })
}

pub fn job_body(completion: f64, print_time: u64, print_time_left: u64) -> Value {
    json!({
        "job": {
            "file": {
                "name": "benchy.gcode",
                "origin": "local",
                "path": "benchy.gcode",
                "size": 1468987,
                "date": 1378847754
            },
            "estimatedPrintTime": 8811,
            "filament": {"tool0": {"length": 810, "volume": 5.36}}
        },
        "progress": {
            "completion": completion,
            "filepos": 337942,
            "printTime": print_time,
            "printTimeLeft": print_time_left,
            "printTimeLeftOrigin": "estimate"
        },
        "state": "Printing"
    })
}

pub fn idle_job_body() -> Value {
    json!({
        "job": {"file": {"name": null}, "estimatedPrintTime": null},
        "progress": {
            "completion": null,
            "filepos": null,
            "printTime": null,
            "printTimeLeft": null,
            "printTimeLeftOrigin": null
        },
        "state": "Operational"
    })
}

/// Canned answers; `None` makes the call fail
pub struct StubSource {
    pub status: Option<PrinterStatus>,
    pub progress: Option<Option<Progress>>,
    pub version: Option<ApiVersion>,
}

fn unavailable() -> MonitorError {
    MonitorError::Http(StatusCode::BAD_GATEWAY)
}

#[async_trait]
impl StatusSource for StubSource {
    async fn printer_status(&self) -> MonitorResult<PrinterStatus> {
        self.status.ok_or_else(unavailable)
    }

    async fn progress(&self) -> MonitorResult<Option<Progress>> {
        self.progress.clone().ok_or_else(unavailable)
    }

    async fn version(&self) -> MonitorResult<ApiVersion> {
        self.version.clone().ok_or_else(unavailable)
    }
}

/// Renderer that only counts calls
#[derive(Clone, Default)]
pub struct CountingRenderer {
    pub renders: Arc<AtomicUsize>,
}

impl CountingRenderer {
    pub fn count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl Renderer for CountingRenderer {
    fn welcome(&mut self, _version: Option<&ApiVersion>) -> MonitorResult<()> {
        Ok(())
    }

    fn render(
        &mut self,
        _status: PrinterStatus,
        _progress: Option<&Progress>,
    ) -> MonitorResult<()> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
