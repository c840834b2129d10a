use crate::models::api::PrinterFlags;

/// Coarse printer state shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterStatus {
    Ok,
    Printing,
    Failed,
}

/// Map the OctoPrint state flags to a coarse state.
///
/// Error flags win over `printing`, which wins over everything else.
pub fn classify(flags: &PrinterFlags) -> PrinterStatus {
    if flags.closed_or_error || flags.error {
        PrinterStatus::Failed
    } else if flags.printing {
        PrinterStatus::Printing
    } else {
        PrinterStatus::Ok
    }
}
