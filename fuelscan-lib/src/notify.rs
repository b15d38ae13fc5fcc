use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

static TWILIO_API: &'static str = "https://api.twilio.com/2010-04-01";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("message rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
    },
}

/// Provider acknowledgement of an accepted message.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Receipt {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

pub trait Notifier {
    fn send(&self, body: &str, recipient: &str) -> Result<Receipt, NotifyError>;
}

#[derive(Deserialize, Debug)]
struct TwilioFailure {
    message: Option<String>,
}

/// Sends SMS through the Twilio Messages API.
pub struct TwilioNotifier {
    client: reqwest::blocking::Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioNotifier {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder().build()?;

        Ok(Self {
            client,
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from: from.into(),
        })
    }

    fn messages_endpoint(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", TWILIO_API, self.account_sid)
    }
}

impl Notifier for TwilioNotifier {
    fn send(&self, body: &str, recipient: &str) -> Result<Receipt, NotifyError> {
        let form_data = [("To", recipient), ("From", self.from.as_str()), ("Body", body)];

        debug!("sending {} bytes to {}", body.len(), recipient);

        let response = self
            .client
            .post(self.messages_endpoint())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form_data)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<TwilioFailure>(&text)
                .ok()
                .and_then(|failure| failure.message)
                .unwrap_or(text);

            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let receipt = response.json::<Receipt>()?;
        info!("message {} accepted for {}", receipt.sid, recipient);

        Ok(receipt)
    }
}
