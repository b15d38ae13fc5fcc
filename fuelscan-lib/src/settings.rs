use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;
use crate::cheapest::DEFAULT_CHEAPEST;
use crate::feed::FUELWATCH_RSS_ENDPOINT;
use crate::urls::build_urls;
use crate::voucher::{VoucherError, Vouchers};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("parameter {0} is listed without any values")]
    EmptyParameter(FeedParameter),
    #[error(transparent)]
    InvalidVoucher(#[from] VoucherError),
    #[error("invalid feed endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// Query parameters the feed understands.
#[derive(Deserialize, Eq, PartialEq, Debug, Copy, Clone, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedParameter {
    Product,
    Region,
    Brand,
    Suburb,
    Surrounding,
    Day,
}

impl Display for FeedParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedParameter::Product => write!(f, "product"),
            FeedParameter::Region => write!(f, "region"),
            FeedParameter::Brand => write!(f, "brand"),
            FeedParameter::Suburb => write!(f, "suburb"),
            FeedParameter::Surrounding => write!(f, "surrounding"),
            FeedParameter::Day => write!(f, "day"),
        }
    }
}

fn default_endpoint() -> String {
    FUELWATCH_RSS_ENDPOINT.to_string()
}

fn default_cheapest() -> usize {
    DEFAULT_CHEAPEST
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct FeedSection {
    #[serde(default = "default_endpoint")]
    endpoint: String,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// `[parameters]` in the order the keys appear in the file.
#[derive(Debug, Default)]
struct ParameterSection(Vec<(FeedParameter, Vec<String>)>);

impl<'de> Deserialize<'de> for ParameterSection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionVisitor;

        impl<'de> Visitor<'de> for SectionVisitor {
            type Value = ParameterSection;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a table of parameter value lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut parameters = Vec::new();
                while let Some((parameter, values)) = map.next_entry::<FeedParameter, Vec<String>>()? {
                    parameters.push((parameter, values));
                }

                Ok(ParameterSection(parameters))
            }
        }

        deserializer.deserialize_map(SectionVisitor)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default = "default_cheapest")]
    cheapest: usize,
    #[serde(default)]
    feed: FeedSection,
    #[serde(default)]
    parameters: ParameterSection,
    #[serde(default)]
    vouchers: HashMap<String, f64>,
    notification: Option<NotificationSettings>,
}

/// Validated run settings.
///
/// `parameters` keeps the order the keys were written in the settings file,
/// which is the order their segments are appended to each url.
#[derive(Clone, Debug)]
pub struct Settings {
    pub endpoint: String,
    pub parameters: Vec<(FeedParameter, Vec<String>)>,
    pub vouchers: Vouchers,
    pub cheapest: usize,
    pub notification: Option<NotificationSettings>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(content)?;

        Url::parse(&file.feed.endpoint).map_err(|source| SettingsError::InvalidEndpoint {
            endpoint: file.feed.endpoint.clone(),
            source,
        })?;

        let parameters = file.parameters.0;
        if let Some((parameter, _)) = parameters.iter().find(|(_, values)| values.is_empty()) {
            return Err(SettingsError::EmptyParameter(*parameter));
        }

        Ok(Self {
            endpoint: file.feed.endpoint,
            parameters,
            vouchers: Vouchers::from_pairs(file.vouchers)?,
            cheapest: file.cheapest,
            notification: file.notification,
        })
    }

    /// Every feed url these settings ask for.
    pub fn urls(&self) -> Vec<String> {
        build_urls(&self.endpoint, &self.parameters)
    }
}
