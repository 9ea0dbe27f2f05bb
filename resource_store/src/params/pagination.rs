//! Page-based pagination

use crate::errors::StoreError;
use config::PaginationConfig;
use serde::Serialize;

/// Effective pagination after defaults and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Parse raw `page` / `per_page` values.
    ///
    /// Missing or blank values take the defaults (page 1, configured page
    /// size). Non-numeric or non-positive values are rejected. A `per_page`
    /// above the configured ceiling is clamped to it.
    pub fn parse(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, StoreError> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let per_page = parse_positive("per_page", per_page)?
            .unwrap_or(config.default_per_page)
            .min(config.max_per_page);

        Ok(Self { page, per_page })
    }

    /// First page with the configured default size
    pub fn first(config: &PaginationConfig) -> Self {
        Self {
            page: 1,
            per_page: config.default_per_page.min(config.max_per_page),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// `(page - 1) * per_page`; a page of 0 reads as the first page
    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1) * i64::from(self.per_page)
    }

    /// Number of pages needed for `total` rows; 0 for an empty page size
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 || self.per_page == 0 {
            return 0;
        }
        let per_page = i64::from(self.per_page);
        (total + per_page - 1) / per_page
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<u32>, StoreError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(
            StoreError::bad_request(format!("{} must be a positive integer", name))
                .with_field(name, "must be a number"),
        );
    }
    if negative || digits.bytes().all(|b| b == b'0') {
        return Err(
            StoreError::bad_request(format!("{} must be a positive integer", name))
                .with_field(name, "must be greater than 0"),
        );
    }

    // only overflow can fail here; anything past u32 saturates and is clamped later
    Ok(Some(digits.parse::<u32>().unwrap_or(u32::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig::new(20, 100)
    }

    #[test]
    fn missing_values_take_defaults() {
        let pg = Pagination::parse(None, None, &config()).unwrap();
        assert_eq!(pg, Pagination { page: 1, per_page: 20 });
        assert_eq!(pg.limit(), 20);
        assert_eq!(pg.offset(), 0);
    }

    #[test]
    fn blank_values_take_defaults() {
        let pg = Pagination::parse(Some(""), Some("  "), &config()).unwrap();
        assert_eq!(pg, Pagination::first(&config()));
    }

    #[test]
    fn offset_is_derived_from_page() {
        let pg = Pagination::parse(Some("3"), Some("25"), &config()).unwrap();
        assert_eq!(pg.limit(), 25);
        assert_eq!(pg.offset(), 50);
    }

    #[test]
    fn per_page_above_ceiling_is_clamped() {
        let pg = Pagination::parse(Some("1"), Some("1000"), &config()).unwrap();
        assert_eq!(pg.per_page, 100);
        assert_eq!(pg.limit(), 100);
    }

    #[test]
    fn oversized_numbers_clamp_instead_of_failing() {
        let pg = Pagination::parse(None, Some("99999999999999"), &config()).unwrap();
        assert_eq!(pg.per_page, 100);
    }

    #[test]
    fn numbers_past_u64_still_clamp() {
        let huge = "100000000000000000000";
        let pg = Pagination::parse(Some(huge), Some(huge), &config()).unwrap();
        assert_eq!(pg.per_page, 100);
        assert_eq!(pg.page, u32::MAX);

        let pg = Pagination::parse(None, Some("+500"), &config()).unwrap();
        assert_eq!(pg.per_page, 100);
    }

    #[test]
    fn zero_padded_and_signed_zero_are_rejected() {
        for raw in ["000", "-0", "+0", "-100000000000000000000"] {
            let err = Pagination::parse(None, Some(raw), &config()).unwrap_err();
            assert_eq!(err.fields()[0].message, "must be greater than 0", "per_page={}", raw);
        }
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        for raw in ["0", "-1", "-100"] {
            let err = Pagination::parse(Some(raw), None, &config()).unwrap_err();
            assert!(err.is_bad_request(), "page={} accepted", raw);
            assert_eq!(err.fields()[0].field, "page");
        }
        let err = Pagination::parse(None, Some("0"), &config()).unwrap_err();
        assert_eq!(err.fields()[0].field, "per_page");
    }

    #[test]
    fn non_numeric_is_rejected() {
        for raw in ["abc", "1.5", "2x", "+", "-", "1e3", "--1"] {
            let err = Pagination::parse(None, Some(raw), &config()).unwrap_err();
            assert!(err.is_bad_request());
            assert_eq!(err.fields()[0].message, "must be a number");
        }
    }

    #[test]
    fn offset_and_limit_never_negative_and_bounded() {
        let cfg = config();
        for page in ["1", "2", "500", "4294967295"] {
            for per_page in ["1", "20", "100", "101", "5000"] {
                let pg = Pagination::parse(Some(page), Some(per_page), &cfg).unwrap();
                assert!(pg.offset() >= 0);
                assert!(pg.limit() > 0);
                assert!(pg.limit() <= i64::from(cfg.max_per_page));
                assert_eq!(pg.offset(), (i64::from(pg.page) - 1) * pg.limit());
            }
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        let pg = Pagination { page: 1, per_page: 20 };
        assert_eq!(pg.total_pages(0), 0);
        assert_eq!(pg.total_pages(20), 1);
        assert_eq!(pg.total_pages(21), 2);
    }

    #[test]
    fn hand_built_zero_values_stay_in_range() {
        let pg = Pagination { page: 0, per_page: 20 };
        assert_eq!(pg.offset(), 0);

        let pg = Pagination { page: 1, per_page: 0 };
        assert_eq!(pg.total_pages(50), 0);
    }
}
