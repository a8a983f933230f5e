use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Inbound body of `POST /v3/payments`.
///
/// Required fields fall back to their defaults when missing or `null` so
/// that the validator, not the JSON parser, decides what is wrong with them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,

    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub custom: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub bank_id: Option<String>,
    #[serde(default)]
    pub payer_email: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub expires_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub confirm_timeout_date: Option<DateTime<FixedOffset>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// JSON object sent to Khipu. Keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KhipuPayload {
    fields: Vec<(&'static str, Value)>,
}

impl KhipuPayload {
    pub fn builder() -> KhipuPayloadBuilder {
        KhipuPayloadBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

impl Serialize for KhipuPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Default)]
pub struct KhipuPayloadBuilder {
    fields: Vec<(&'static str, Option<Value>)>,
}

impl KhipuPayloadBuilder {
    pub fn required(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((key, Some(value.into())));
        self
    }

    /// Whole amounts go out as JSON integers (`1500`, not `1500.0`).
    pub fn amount(mut self, key: &'static str, value: f64) -> Self {
        // Beyond 2^53 an f64 no longer maps one-to-one onto integers
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

        let value = if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            Value::from(value as i64)
        } else {
            Value::from(value)
        };
        self.fields.push((key, Some(value)));
        self
    }

    /// Queues `key` only if `value` is present and not empty.
    pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        let value = value
            .filter(|text| !text.is_empty())
            .map(|text| Value::String(text.to_string()));
        self.fields.push((key, value));
        self
    }

    /// Queues `key` only if `value` is set to something other than the zero timestamp.
    pub fn timestamp(
        mut self,
        key: &'static str,
        value: Option<&DateTime<FixedOffset>>,
    ) -> Self {
        let value = value
            .filter(|ts| !is_zero_timestamp(ts))
            .map(|ts| Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        self.fields.push((key, value));
        self
    }

    pub fn build(self) -> KhipuPayload {
        KhipuPayload {
            fields: self
                .fields
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value)))
                .collect(),
        }
    }
}

/// `0001-01-01T00:00:00Z`, which some clients send to mean "unset".
fn is_zero_timestamp(ts: &DateTime<FixedOffset>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| ts.naive_utc() == zero)
}

impl From<&PaymentRequest> for KhipuPayload {
    fn from(request: &PaymentRequest) -> Self {
        KhipuPayload::builder()
            .required("subject", request.subject.as_str())
            .amount("amount", request.amount)
            .required("currency", request.currency.as_str())
            .text("transaction_id", request.transaction_id.as_deref())
            .text("custom", request.custom.as_deref())
            .text("body", request.body.as_deref())
            .text("bank_id", request.bank_id.as_deref())
            .text("payer_email", request.payer_email.as_deref())
            .text("return_url", request.return_url.as_deref())
            .text("cancel_url", request.cancel_url.as_deref())
            .text("notify_url", request.notify_url.as_deref())
            .text("picture_url", request.picture_url.as_deref())
            .timestamp("expires_date", request.expires_date.as_ref())
            .timestamp("confirm_timeout_date", request.confirm_timeout_date.as_ref())
            .build()
    }
}
