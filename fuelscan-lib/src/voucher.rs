use std::collections::HashMap;
use ordered_float::NotNan;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoucherError {
    #[error("voucher for {brand:?} must be a finite, non-negative number, got {value}")]
    Invalid {
        brand: String,
        value: f64,
    },
    #[error("voucher for {0:?} is listed more than once (brands are matched ignoring case)")]
    Duplicate(String),
}

/// Per-brand discounts in cents per litre, keyed case-insensitively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vouchers {
    discounts: HashMap<String, NotNan<f64>>,
}

impl Vouchers {
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, VoucherError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut discounts = HashMap::new();
        for (brand, value) in pairs {
            let brand = brand.as_ref();
            let discount = NotNan::new(value)
                .ok()
                .filter(|d| d.is_finite() && d.into_inner() >= 0.0)
                .ok_or_else(|| VoucherError::Invalid {
                    brand: brand.to_string(),
                    value,
                })?;

            if discounts.insert(brand.to_lowercase(), discount).is_some() {
                return Err(VoucherError::Duplicate(brand.to_string()));
            }
        }

        Ok(Self { discounts })
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    pub fn resolve(&self, brand: &str) -> f64 {
        if brand.is_empty() {
            return 0.0;
        }

        self.discounts
            .get(&brand.to_lowercase())
            .map(|d| d.into_inner())
            .unwrap_or(0.0)
    }
}

/// Discount for `brand`; a missing table behaves like an empty one.
pub fn resolve(brand: &str, vouchers: Option<&Vouchers>) -> f64 {
    vouchers.map(|v| v.resolve(brand)).unwrap_or(0.0)
}
