use std::fmt::{Display};
use ordered_float::NotNan;
use thiserror::Error;
use crate::feed::RawEntry;
use crate::voucher::Vouchers;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationError {
    #[error("{0} must not be negative, got {1}")]
    Negative(&'static str, f64),
    #[error("{0} is not a finite number")]
    NotANumber(&'static str),
}

/// Reasons a feed entry is skipped instead of becoming a [`Station`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("entry has no {0}")]
    MissingField(&'static str),
    #[error("entry price {0:?} is not a valid price")]
    InvalidPrice(String),
    #[error(transparent)]
    Station(#[from] StationError),
}

/// One fuel retailer observation, prices in cents per litre.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Station {
    name: String,
    address: String,
    brand: String,
    price: NotNan<f64>,
    discount: NotNan<f64>,
}

fn checked(field: &'static str, value: f64) -> Result<NotNan<f64>, StationError> {
    if !value.is_finite() {
        return Err(StationError::NotANumber(field));
    }
    if value < 0.0 {
        return Err(StationError::Negative(field, value));
    }
    // -0.0 would rank ahead of 0.0 under a total order
    let value = if value == 0.0 { 0.0 } else { value };

    NotNan::new(value).map_err(|_| StationError::NotANumber(field))
}

impl Station {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        price: f64,
        discount: f64,
    ) -> Result<Self, StationError> {
        Ok(Self {
            name: name.into(),
            address: address.into(),
            brand: String::new(),
            price: checked("price", price)?,
            discount: checked("discount", discount)?,
        })
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Returns the same observation carrying a corrected discount.
    pub fn with_discount(self, discount: f64) -> Result<Self, StationError> {
        Ok(Self {
            discount: checked("discount", discount)?,
            ..self
        })
    }

    /// Normalizes a raw feed entry, resolving its discount from `vouchers`.
    ///
    /// The address gets the entry's suburb appended when the feed carries one,
    /// e.g. `63 William St, BECKENHAM`.
    pub fn from_entry(entry: &RawEntry, vouchers: &Vouchers) -> Result<Self, EntryError> {
        let name = entry.trading_name.as_deref().ok_or(EntryError::MissingField("trading-name"))?;
        let street = entry.address.as_deref().ok_or(EntryError::MissingField("address"))?;
        let raw_price = entry.price.as_deref().ok_or(EntryError::MissingField("price"))?;

        let price = raw_price
            .parse::<f64>()
            .map_err(|_| EntryError::InvalidPrice(raw_price.to_string()))?;

        let address = match entry.location.as_deref() {
            Some(location) => format!("{}, {}", street, location),
            None => street.to_string(),
        };

        let brand = entry.brand.clone().unwrap_or_default();
        let discount = vouchers.resolve(&brand);

        Ok(Station::new(name, address, price, discount)?.with_brand(brand))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn price(&self) -> f64 {
        self.price.into_inner()
    }

    pub fn discount(&self) -> f64 {
        self.discount.into_inner()
    }

    pub fn discounted_price(&self) -> f64 {
        self.price() - self.discount()
    }
}

impl Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) at {}, {}", self.price, self.discount, self.name, self.address)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::feed::RawEntry;
    use crate::voucher::Vouchers;
    use super::{EntryError, Station, StationError};

    fn entry(price: &str) -> RawEntry {
        RawEntry {
            trading_name: Some("Caltex StarMart Bassendean".to_string()),
            brand: Some("Caltex".to_string()),
            price: Some(price.to_string()),
            address: Some("309 Guildford Rd (Cnr North Rd)".to_string()),
            location: Some("BASSENDEAN".to_string()),
        }
    }

    #[test]
    fn discounted_price_is_price_minus_discount() {
        let station = Station::new("X", "Addr", 128.9, 5.0).unwrap();
        assert_eq!(station.discounted_price(), 128.9 - 5.0);
    }

    #[test]
    fn corrected_discount_is_reflected_immediately() {
        let station = Station::new("X", "Addr", 130.0, 0.0).unwrap();
        assert_eq!(station.discounted_price(), 130.0);

        let station = station.with_discount(4.0).unwrap();
        assert_eq!(station.discount(), 4.0);
        assert_eq!(station.discounted_price(), 126.0);
    }

    #[test]
    fn equality_is_structural() {
        let a = Station::new("A", "1 Road", 128.9, 0.0).unwrap();
        let b = Station::new("A", "1 Road", 128.9, 0.0).unwrap();
        let c = Station::new("A", "1 Road", 128.9, 1.0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.clone().with_brand("Shell"), b);
    }

    #[test]
    fn rejects_negative_and_nan_values() {
        assert_eq!(
            Station::new("A", "B", -1.0, 0.0),
            Err(StationError::Negative("price", -1.0))
        );
        assert_eq!(
            Station::new("A", "B", 120.0, f64::NAN),
            Err(StationError::NotANumber("discount"))
        );
    }

    #[test]
    fn negative_zero_is_stored_as_zero() {
        let station = Station::new("A", "B", -0.0, -0.0).unwrap();
        assert!(station.price().is_sign_positive());
        assert!(station.discount().is_sign_positive());
        assert_eq!(station, Station::new("A", "B", 0.0, 0.0).unwrap());
        assert_eq!(station.to_string(), "0 (0) at A, B");
    }

    #[test]
    fn from_entry_joins_address_and_resolves_discount() {
        let vouchers = Vouchers::from_pairs([("caltex", 4.0)]).unwrap();
        let station = Station::from_entry(&entry("129.9"), &vouchers).unwrap();

        assert_eq!(station.name(), "Caltex StarMart Bassendean");
        assert_eq!(station.address(), "309 Guildford Rd (Cnr North Rd), BASSENDEAN");
        assert_eq!(station.brand(), "Caltex");
        assert_eq!(station.price(), 129.9);
        assert_eq!(station.discount(), 4.0);
    }

    #[test]
    fn from_entry_skips_malformed_price() {
        let result = Station::from_entry(&entry("n/a"), &Vouchers::default());
        assert_eq!(result, Err(EntryError::InvalidPrice("n/a".to_string())));
    }

    #[test]
    fn from_entry_skips_missing_fields() {
        let mut raw = entry("129.9");
        raw.trading_name = None;
        assert_eq!(
            Station::from_entry(&raw, &Vouchers::default()),
            Err(EntryError::MissingField("trading-name"))
        );

        let mut raw = entry("129.9");
        raw.price = None;
        assert_eq!(
            Station::from_entry(&raw, &Vouchers::default()),
            Err(EntryError::MissingField("price"))
        );
    }

    #[test]
    fn from_entry_without_location_keeps_address() {
        let mut raw = entry("129.9");
        raw.location = None;
        raw.brand = None;
        let station = Station::from_entry(&raw, &Vouchers::default()).unwrap();
        assert_eq!(station.address(), "309 Guildford Rd (Cnr North Rd)");
        assert_eq!(station.discount(), 0.0);
    }
}
