//! Plain-text share payloads.
//!
//! A payload is a header line naming the day followed by one dish per line:
//!
//! ```text
//! 在 Oct 7, 2024 的点菜：
//! 宫保鸡丁
//! 麻婆豆腐
//! ```
//!
//! The header date always uses [`SHARE_DATE_FORMAT`], independent of the
//! display format, so that any copy of the app can read it back.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::date_key::DateKey;
use crate::error::ShareError;
use crate::selection::Selection;

pub const HEADER_PREFIX: &str = "在 ";
pub const HEADER_SUFFIX: &str = " 的点菜：";

/// Date format written into the header, e.g. `Oct 7, 2024`.
pub const SHARE_DATE_FORMAT: &str = "%b %-d, %Y";
/// Accepts both padded and unpadded days.
const SHARE_DATE_PARSE_FORMAT: &str = "%b %d, %Y";

/// One day's dishes as exchanged with other apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub date: NaiveDate,
    pub dishes: Vec<String>,
}

impl SharePayload {
    pub fn new(date: NaiveDate, dishes: Vec<String>) -> Self {
        Self { date, dishes }
    }

    pub fn from_selection(selection: &Selection) -> Self {
        Self::new(selection.date().date(), selection.dishes().to_vec())
    }

    pub fn date_key(&self) -> DateKey {
        DateKey::new(self.date)
    }

    /// Renders the payload text.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses payload text.
    ///
    /// Blank lines are ignored anywhere. The first remaining line must be the
    /// header and at least one dish line must follow.
    pub fn decode(text: &str) -> Result<Self, ShareError> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 2 {
            return Err(ShareError::TooFewLines(lines.len()));
        }

        let header = lines[0].trim_start_matches('\u{feff}').trim();
        let date_str = header
            .strip_prefix(HEADER_PREFIX)
            .and_then(|rest| rest.strip_suffix(HEADER_SUFFIX))
            .ok_or_else(|| ShareError::MissingHeader(header.to_string()))?;

        let date = NaiveDate::parse_from_str(date_str.trim(), SHARE_DATE_PARSE_FORMAT)
            .map_err(|_| ShareError::InvalidDate(date_str.to_string()))?;

        let dishes = lines[1..].iter().map(|line| line.to_string()).collect();

        Ok(Self { date, dishes })
    }
}

impl fmt::Display for SharePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            HEADER_PREFIX,
            self.date.format(SHARE_DATE_FORMAT),
            HEADER_SUFFIX
        )?;
        for dish in &self.dishes {
            write!(f, "\n{}", dish)?;
        }
        Ok(())
    }
}

impl FromStr for SharePayload {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_example() {
        let payload = SharePayload::new(date(2024, 10, 7), strings(&["宫保鸡丁", "麻婆豆腐"]));
        assert_eq!(payload.encode(), "在 Oct 7, 2024 的点菜：\n宫保鸡丁\n麻婆豆腐");
    }

    #[test]
    fn test_encode_empty_selection_is_header_only() {
        let payload = SharePayload::new(date(2024, 12, 25), Vec::new());
        assert_eq!(payload.encode(), "在 Dec 25, 2024 的点菜：");
    }

    #[test]
    fn test_decode_example() {
        let payload = SharePayload::decode("在 Oct 8, 2024 的点菜：\n水煮鱼").unwrap();
        assert_eq!(payload.date, date(2024, 10, 8));
        assert_eq!(payload.dishes, strings(&["水煮鱼"]));
        assert_eq!(payload.date_key().to_string(), "2024-10-08");
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let original = SharePayload::new(date(2025, 1, 31), strings(&["米饭", "青菜", "红烧肉"]));
        let parsed: SharePayload = original.encode().parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_decode_skips_blank_lines_and_crlf() {
        let text = "\r\n在 Oct 7, 2024 的点菜：\r\n\r\n宫保鸡丁\r\n   \r\n麻婆豆腐\r\n";
        let payload = SharePayload::decode(text).unwrap();
        assert_eq!(payload.dishes, strings(&["宫保鸡丁", "麻婆豆腐"]));
    }

    #[test]
    fn test_decode_accepts_padded_day_and_bom() {
        let payload = SharePayload::decode("\u{feff}在 Oct 07, 2024 的点菜：\n水煮鱼").unwrap();
        assert_eq!(payload.date, date(2024, 10, 7));
    }

    #[test]
    fn test_decode_single_line_is_too_few() {
        assert_eq!(
            SharePayload::decode("在 Oct 7, 2024 的点菜："),
            Err(ShareError::TooFewLines(1))
        );
        assert_eq!(SharePayload::decode("\n\n"), Err(ShareError::TooFewLines(0)));
    }

    #[test]
    fn test_decode_requires_header() {
        let result = SharePayload::decode("shopping list\nmilk\neggs");
        assert_eq!(
            result,
            Err(ShareError::MissingHeader("shopping list".to_string()))
        );

        let result = SharePayload::decode("在 Oct 7, 2024\n水煮鱼");
        assert!(matches!(result, Err(ShareError::MissingHeader(_))));
    }

    #[test]
    fn test_decode_rejects_unparsable_date() {
        assert_eq!(
            SharePayload::decode("在 2024年10月7日 的点菜：\n水煮鱼"),
            Err(ShareError::InvalidDate("2024年10月7日".to_string()))
        );
        assert!(matches!(
            SharePayload::decode("在 Feb 30, 2024 的点菜：\n水煮鱼"),
            Err(ShareError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_dish_lines_kept_verbatim() {
        let payload = SharePayload::decode("在 Oct 7, 2024 的点菜：\n  宫保鸡丁").unwrap();
        assert_eq!(payload.dishes, strings(&["  宫保鸡丁"]));
    }
}
