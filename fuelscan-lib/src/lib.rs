pub mod cheapest;
pub mod feed;
pub mod message;
pub mod notify;
pub mod settings;
pub mod station;
pub mod urls;
pub mod voucher;

use log::info;
use thiserror::Error;

pub use crate::cheapest::{find_cheapest, DEFAULT_CHEAPEST};
pub use crate::feed::{parse_document, parse_feed, parse_feed_url, FeedError, FeedSource, HttpFeedSource, RawEntry};
pub use crate::message::format_message;
pub use crate::notify::{Notifier, NotifyError, Receipt, TwilioNotifier};
pub use crate::settings::{FeedParameter, NotificationSettings, Settings, SettingsError};
pub use crate::station::{EntryError, Station, StationError};
pub use crate::urls::{build_urls, combinations};
pub use crate::voucher::{resolve, VoucherError, Vouchers};

#[derive(Error, Debug)]
pub enum FuelScanError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Fetches every feed the settings describe and returns the normalized stations.
pub fn scan<S>(settings: &Settings, source: &S) -> Vec<Station>
where
    S: FeedSource + ?Sized,
{
    let urls = settings.urls();
    info!("checking {} feeds", urls.len());

    let stations = parse_feed(source, &urls, &settings.vouchers);
    info!("found {} stations", stations.len());

    stations
}

/// Runs the whole pipeline and renders the summary of the cheapest stations.
pub fn report<S>(settings: &Settings, source: &S) -> String
where
    S: FeedSource + ?Sized,
{
    let stations = scan(settings, source);
    let cheapest = find_cheapest(&stations, settings.cheapest);

    format_message(&cheapest)
}

/// Relays a rendered report to the configured recipient.
pub fn send_report<N>(
    notifier: &N,
    notification: &NotificationSettings,
    body: &str,
) -> Result<Receipt, FuelScanError>
where
    N: Notifier + ?Sized,
{
    Ok(notifier.send(body, &notification.to)?)
}
