//! Pre-built test fixtures
//!
//! Well-known postal codes and dates used across the test suite, plus a
//! CEP lookup preloaded with them.

use chrono::{Datelike, NaiveDate, Utc};
use domain_registry::cep::memory::StaticCepLookup;
use once_cell::sync::Lazy;

/// Curitiba city center - resolves to PR (the restricted state)
pub const CEP_CURITIBA: &str = "80010000";

/// São Paulo city center - resolves to SP
pub const CEP_SAO_PAULO: &str = "01001000";

/// Rio de Janeiro city center - resolves to RJ
pub const CEP_RIO: &str = "20040000";

/// A CEP no lookup knows about
pub const CEP_UNKNOWN: &str = "99999999";

static CEP_LOOKUP: Lazy<StaticCepLookup> = Lazy::new(|| {
    StaticCepLookup::new()
        .with_cep(CEP_CURITIBA, "PR")
        .with_cep(CEP_SAO_PAULO, "SP")
        .with_cep(CEP_RIO, "RJ")
});

/// A lookup resolving the three fixture CEPs above
pub fn cep_lookup() -> StaticCepLookup {
    CEP_LOOKUP.clone()
}

/// A birth date exactly `years` calendar years before today (January 1st,
/// so the birthday has always passed)
pub fn birth_date_years_ago(years: i32) -> NaiveDate {
    let today = Utc::now().date_naive();
    NaiveDate::from_ymd_opt(today.year() - years, 1, 1)
        .unwrap_or_else(|| panic!("invalid fixture year {}", today.year() - years))
}
