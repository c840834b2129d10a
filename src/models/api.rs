use serde::{Deserialize, Serialize};

use crate::models::Progress;

/// Body of `GET /api/printer`
#[derive(Serialize, Deserialize, Debug)]
pub struct PrinterResponse {
    pub state: PrinterState,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PrinterState {
    pub text: Option<String>,
    pub flags: PrinterFlags,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[allow(dead_code)]
pub struct PrinterFlags {
    pub operational: bool,
    pub paused: bool,
    pub printing: bool,
    pub sd_ready: bool,
    pub error: bool,
    pub ready: bool,
    pub closed_or_error: bool,
}

/// Body of `GET /api/job`
#[derive(Serialize, Deserialize, Debug)]
pub struct JobResponse {
    pub job: Option<Job>,
    pub progress: Option<JobProgress>,
    pub state: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct Job {
    pub file: Option<JobFile>,
    pub estimated_print_time: Option<f64>,
    pub average_print_time: Option<f64>,
    pub last_print_time: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug)]
#[allow(dead_code)]
pub struct JobFile {
    pub name: Option<String>,
    pub origin: Option<String>,
    pub path: Option<String>,
    pub size: Option<u64>,
    pub date: Option<u64>,
}

// OctoPrint reports every field as null while no job is loaded
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct JobProgress {
    pub completion: Option<f64>,
    pub filepos: Option<u64>,
    pub print_time: Option<f64>,
    pub print_time_left: Option<f64>,
    pub print_time_left_origin: Option<String>,
}

impl JobProgress {
    /// Convert to the domain progress; `None` when no job is active
    pub fn to_progress(&self) -> Option<Progress> {
        let completion = self.completion?;
        Some(Progress {
            completion: completion.clamp(0.0, 100.0),
            print_time: whole_seconds(self.print_time),
            print_time_left: whole_seconds(self.print_time_left),
            print_time_left_origin: self.print_time_left_origin.clone(),
        })
    }
}

fn whole_seconds(value: Option<f64>) -> u64 {
    value.map(|secs| secs.max(0.0).round() as u64).unwrap_or(0)
}

/// Body of `GET /api/version`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiVersion {
    pub api: String,
    pub server: String,
    pub text: Option<String>,
}
