//! Request/response data transfer objects

pub mod company;
pub mod supplier;

use serde::Serialize;

use crate::error::ApiError;

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: core_kernel::Page<S>, convert: impl FnMut(S) -> T) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(convert);
        Self {
            items: page.items,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages,
        }
    }
}

/// Rejects values carrying anything other than ASCII digits
///
/// The `validator` derive covers lengths and email shape; registry numbers
/// and postal codes additionally have to be digit-only.
pub(crate) fn require_digits(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest(format!(
            "{field} must contain only digits"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_digits() {
        assert!(require_digits("cnpj", "12345678000190").is_ok());
        assert!(require_digits("cnpj", "12.345.678/0001-90").is_err());
        assert!(require_digits("cep", "").is_err());
    }
}
