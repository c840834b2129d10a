use std::path::{Path, PathBuf};

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::view::Margins;
use cursive::views::{Dialog, EditView, LinearLayout, PaddedView, TextView};
use tracing::warn;

use crate::error::MonitorResult;
use crate::models::{Config, LcdConfig, check_refresh, format_refresh, parse_refresh};
use crate::utils::config::{load_config, save_config};

/// Raw text of every editable setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigForm {
    pub url: String,
    pub apikey: String,
    pub refresh: String,
    pub lcd_rs: String,
    pub lcd_e: String,
    pub lcd_data: String,
}

impl ConfigForm {
    pub fn from_config(config: &Config) -> Self {
        let lcd = config.lcd.clone().unwrap_or_default();
        let wired = !lcd.data.is_empty();
        ConfigForm {
            url: config.url.clone(),
            apikey: config.apikey.clone(),
            refresh: format_refresh(config.refresh_interval()),
            lcd_rs: if wired { lcd.rs.to_string() } else { String::new() },
            lcd_e: if wired { lcd.e.to_string() } else { String::new() },
            lcd_data: lcd
                .data
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Validate the form. An empty data pin list means console output.
    pub fn to_config(&self) -> Result<Config, String> {
        let url = self.url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err("OctoPrint URL must not be empty".to_string());
        }

        let refresh = parse_refresh(&self.refresh)?;
        check_refresh(refresh)?;

        let data = parse_pin_list(&self.lcd_data)?;
        let lcd = if data.is_empty() {
            None
        } else {
            Some(LcdConfig {
                rs: parse_pin("RS", &self.lcd_rs)?,
                e: parse_pin("E", &self.lcd_e)?,
                data,
            })
        };

        Ok(Config {
            apikey: self.apikey.trim().to_string(),
            url,
            refresh,
            lcd,
        })
    }
}

fn parse_pin(name: &str, value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} pin must be a GPIO number, got '{}'", name, value.trim()))
}

/// Parse a comma or space separated list of GPIO numbers
pub fn parse_pin_list(value: &str) -> Result<Vec<u32>, String> {
    let pins = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| parse_pin("Data", part))
        .collect::<Result<Vec<_>, _>>()?;

    if !pins.is_empty() && !matches!(pins.len(), 4 | 8) {
        return Err(format!("Need 4 or 8 data pins, got {}", pins.len()));
    }
    Ok(pins)
}

/// Start the TUI editor for the configuration file at `path`
pub fn run_tui(path: PathBuf) -> MonitorResult<()> {
    let config = if path.exists() {
        load_config(&path).unwrap_or_else(|e| {
            warn!(error = %e, "Error loading config file, editing default configuration");
            Config::default()
        })
    } else {
        Config::default()
    };

    let mut siv = cursive::default();
    create_config_dialog(&mut siv, &ConfigForm::from_config(&config), path);
    siv.run();

    Ok(())
}

/// Create the main configuration dialog
fn create_config_dialog(siv: &mut Cursive, form: &ConfigForm, path: PathBuf) {
    let title = format!("OctoPrint Status Monitor - {}", path.display());

    siv.add_layer(
        Dialog::new()
            .title(title)
            .content(
                LinearLayout::vertical()
                    .child(create_server_settings(form))
                    .child(create_display_settings(form))
                    .child(
                        TextView::new("Leave the data pins empty to print to the console.")
                            .h_align(HAlign::Center),
                    ),
            )
            .button("Save", move |s| {
                save_config_from_ui(s, &path);
            })
            .button("Cancel", |s| {
                s.quit();
            }),
    );
}

fn labelled_field(label: &str, content: &str, name: &str) -> LinearLayout {
    LinearLayout::vertical()
        .child(TextView::new(label))
        .child(EditView::new().content(content).with_name(name).min_width(40))
}

/// Create OctoPrint server section
fn create_server_settings(form: &ConfigForm) -> impl View {
    PaddedView::new(
        Margins::lrtb(1, 1, 0, 1),
        Dialog::around(
            LinearLayout::vertical()
                .child(labelled_field("OctoPrint URL:", &form.url, "url"))
                .child(labelled_field("API Key:", &form.apikey, "apikey"))
                .child(labelled_field(
                    "Refresh Interval (e.g. 30s, 1m):",
                    &form.refresh,
                    "refresh",
                )),
        )
        .title("OctoPrint Server"),
    )
}

/// Create character display section
fn create_display_settings(form: &ConfigForm) -> impl View {
    PaddedView::new(
        Margins::lrtb(1, 1, 0, 1),
        Dialog::around(
            LinearLayout::vertical()
                .child(labelled_field("RS Pin:", &form.lcd_rs, "lcd_rs"))
                .child(labelled_field("E Pin:", &form.lcd_e, "lcd_e"))
                .child(labelled_field(
                    "Data Pins (D4-D7 or D0-D7, comma separated):",
                    &form.lcd_data,
                    "lcd_data",
                )),
        )
        .title("Character Display"),
    )
}

fn field(s: &mut Cursive, name: &str) -> String {
    s.call_on_name(name, |view: &mut EditView| view.get_content().to_string())
        .unwrap_or_default()
}

/// Save configuration from UI values
fn save_config_from_ui(s: &mut Cursive, path: &Path) {
    let form = ConfigForm {
        url: field(s, "url"),
        apikey: field(s, "apikey"),
        refresh: field(s, "refresh"),
        lcd_rs: field(s, "lcd_rs"),
        lcd_e: field(s, "lcd_e"),
        lcd_data: field(s, "lcd_data"),
    };

    let result = form
        .to_config()
        .and_then(|config| save_config(&config, path).map_err(|e| e.to_string()));

    match result {
        Ok(()) => s.add_layer(
            Dialog::around(TextView::new("Configuration saved successfully!"))
                .title("Success")
                .button("OK", |s| {
                    s.pop_layer();
                    s.quit();
                }),
        ),
        Err(message) => s.add_layer(Dialog::info(message).title("Invalid configuration")),
    }
}
