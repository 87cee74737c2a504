//! Fixed-width ASCII rendering for the character display

use core::fmt::Write;
use heapless::String;

/// Label written before the humidity value on the first line
pub const HUMIDITY_LABEL: &str = "HUMIDITY:";

/// Label written before the temperature value on the second line
pub const TEMPERATURE_LABEL: &str = "TEMPERATURE:";

/// Characters of the temperature field kept on the display
pub const TEMPERATURE_FIELD_WIDTH: usize = 5;

/// Rendered value, unit suffix included
pub type DisplayText = String<8>;

/// Render relative humidity as `"<int>%"`
pub fn format_humidity(percent: i16) -> DisplayText {
    let mut text = DisplayText::new();
    // i16 plus sign and suffix is at most 7 bytes
    let _ = write!(text, "{}%", percent);
    text
}

/// Render temperature as `"<d.d>C"`.
///
/// The value is printed with six fractional digits and cut (not rounded)
/// to [`TEMPERATURE_FIELD_WIDTH`] characters.
pub fn format_temperature(celsius: f32) -> DisplayText {
    let mut full: String<64> = String::new();
    let _ = write!(full, "{:.6}", celsius);

    let mut text = DisplayText::new();
    for c in full.chars().take(TEMPERATURE_FIELD_WIDTH) {
        let _ = text.push(c);
    }
    let _ = text.push('C');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humidity_text() {
        assert_eq!(format_humidity(56).as_str(), "56%");
        assert_eq!(format_humidity(118).as_str(), "118%");
        assert_eq!(format_humidity(-6).as_str(), "-6%");
        assert_eq!(format_humidity(i16::MIN).as_str(), "-32768%");
    }

    #[test]
    fn test_temperature_text_is_truncated() {
        assert_eq!(format_temperature(23.456).as_str(), "23.45C");
        assert_eq!(format_temperature(25.0).as_str(), "25.00C");
        assert_eq!(format_temperature(5.5).as_str(), "5.500C");
    }

    #[test]
    fn test_temperature_text_extremes() {
        assert_eq!(format_temperature(-46.85).as_str(), "-46.8C");
        assert_eq!(format_temperature(128.86).as_str(), "128.8C");
    }
}
