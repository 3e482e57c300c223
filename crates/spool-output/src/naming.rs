//! Output file naming.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::OutputFormat;

/// Prefix written before the input stem when time stamps are requested.
pub const TIME_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S_";

/// `[stamp]stem[.ext].format` for the listing at `input`.
pub fn output_file_name(
    input: &Path,
    format: OutputFormat,
    time_stamp: Option<NaiveDateTime>,
    keep_extension: bool,
) -> String {
    let mut name = String::new();
    if let Some(stamp) = time_stamp {
        name.push_str(&stamp.format(TIME_STAMP_FORMAT).to_string());
    }
    if let Some(stem) = input.file_stem() {
        name.push_str(&stem.to_string_lossy());
    }
    if keep_extension && let Some(extension) = input.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    name.push('.');
    name.push_str(format.extension());
    name
}
