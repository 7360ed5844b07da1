//! Spoken summary of a reading
//!
//! The label is decoded from the same matrices the renderer draws, so the
//! announced time and the plotted bits cannot disagree.

use crate::converter::DigitMatrix;

/// `"Time H:MM"`, followed by `", Date D/M"` when a date matrix is given
pub fn accessibility_label(time: &DigitMatrix, date: Option<&DigitMatrix>) -> String {
    let mut label = format!("Time {}:{:02}", time.major(), time.minor());
    if let Some(date) = date {
        label.push_str(&format!(", Date {}/{}", date.major(), date.minor()));
    }
    label
}
