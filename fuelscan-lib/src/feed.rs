use log::{debug, warn};
use reqwest::header::USER_AGENT;
use roxmltree::{Document, Node};
use thiserror::Error;
use url::Url;
use crate::station::Station;
use crate::voucher::Vouchers;

pub static FUELWATCH_RSS_ENDPOINT: &'static str =
    "https://www.fuelwatch.wa.gov.au/fuelwatch/fuelWatchRSS?";

static USER_AGENT_VALUE: &'static str =
    concat!("fuelscan/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid feed url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed is not well-formed xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("document has no channel element")]
    InvalidDocument,
}

/// One `<item>` of a feed with every field it may or may not carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEntry {
    pub trading_name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
}

/// Anything that can turn a feed url into its entries.
///
/// A source must report an unreachable or unparseable feed as `Err`, never as
/// an empty list.
pub trait FeedSource {
    fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError>;
}

pub struct HttpFeedSource {
    client: reqwest::blocking::Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
        let endpoint = Url::parse(url).map_err(|source| FeedError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(endpoint)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        parse_document(&response.text()?)
    }
}

/// Text of the first `name` child of `item`, CDATA included. Nested elements
/// belong to their own fields and are not read.
fn text_of(item: &Node, name: &str) -> Option<String> {
    let field = item.children().find(|child| child.has_tag_name(name))?;

    let text = field
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect::<String>();

    Some(text.trim().to_string()).filter(|text| !text.is_empty())
}

/// Extracts the entries of an RSS document.
pub fn parse_document(body: &str) -> Result<Vec<RawEntry>, FeedError> {
    let document = Document::parse(body)?;

    let channel = document
        .descendants()
        .find(|node| node.has_tag_name("channel"))
        .ok_or(FeedError::InvalidDocument)?;

    let entries = channel
        .children()
        .filter(|node| node.has_tag_name("item"))
        .map(|item| RawEntry {
            trading_name: text_of(&item, "trading-name"),
            brand: text_of(&item, "brand"),
            price: text_of(&item, "price"),
            address: text_of(&item, "address"),
            location: text_of(&item, "location"),
        })
        .collect();

    Ok(entries)
}

/// Fetches every url in order and normalizes the entries into stations.
///
/// A feed that cannot be fetched or parsed, and an entry that cannot be
/// normalized, are logged and skipped. See [`parse_feed_url`] for a single url.
pub fn parse_feed<S, I, U>(source: &S, urls: I, vouchers: &Vouchers) -> Vec<Station>
where
    S: FeedSource + ?Sized,
    I: IntoIterator<Item = U>,
    U: AsRef<str>,
{
    let mut stations: Vec<Station> = Vec::new();

    for url in urls {
        let url = url.as_ref();
        let entries = match source.fetch(url) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping feed {}: {}", url, err);
                continue;
            }
        };

        debug!("feed {} returned {} entries", url, entries.len());

        for entry in entries.iter() {
            match Station::from_entry(entry, vouchers) {
                Ok(station) => stations.push(station),
                Err(err) => debug!("skipping entry {:?} from {}: {}", entry.trading_name, url, err),
            }
        }
    }

    stations
}

/// [`parse_feed`] for exactly one url.
pub fn parse_feed_url<S>(source: &S, url: &str, vouchers: &Vouchers) -> Vec<Station>
where
    S: FeedSource + ?Sized,
{
    parse_feed(source, std::iter::once(url), vouchers)
}
