//! Downloads a short-term forecast from the Weatherbit 3-hourly endpoint (as
//! proxied by RapidAPI) and writes each entry into a [`RecordStore`].

use crate::forecast::error::FetchError;
use crate::store::record_store::{record_key, RecordStore};
use crate::types::weather_record::WeatherRecord;
use bon::bon;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_FORECAST_URL: &str =
    "https://weatherbit-v1-mashape.p.rapidapi.com/forecast/3hourly";

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// ```
/// use forecast_insights::LatLon;
///
/// let raleigh = LatLon(35.5, -78.5);
/// assert_eq!(raleigh.0, 35.5);
/// assert_eq!(raleigh.1, -78.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

#[derive(Deserialize)]
struct ForecastResponse {
    data: Vec<WeatherRecord>,
}

/// Client for the forecast API.
///
/// Create one with [`ForecastFetcher::builder()`]:
///
/// ```rust
/// use forecast_insights::{ForecastFetcher, LatLon};
///
/// let fetcher = ForecastFetcher::builder()
///     .location(LatLon(35.5, -78.5))
///     .api_key("my-key")
///     .api_host("weatherbit-v1-mashape.p.rapidapi.com")
///     .build();
/// assert_eq!(fetcher.url(), forecast_insights::DEFAULT_FORECAST_URL);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: Client,
    url: String,
    location: LatLon,
    api_key: Option<String>,
    api_host: Option<String>,
}

#[bon]
impl ForecastFetcher {
    /// Builds a fetcher.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Sent as the `lat` and `lon` query parameters.
    /// * `.url(..)`: Optional. Endpoint to call. Defaults to [`DEFAULT_FORECAST_URL`].
    /// * `.api_key(..)` / `.api_host(..)`: Optional. Sent as the RapidAPI headers when set.
    #[builder]
    pub fn new(
        location: LatLon,
        #[builder(into, default = DEFAULT_FORECAST_URL.to_string())] url: String,
        #[builder(into)] api_key: Option<String>,
        #[builder(into)] api_host: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            url,
            location,
            api_key,
            api_host,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    /// Requests the forecast and returns its `data` entries in the order the API sent them.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NetworkRequest`] if the request could not be sent.
    /// * [`FetchError::HttpStatus`] for a non-success status code.
    /// * [`FetchError::InvalidResponse`] if the body is not `{"data": [ {..}, .. ]}`.
    pub async fn fetch(&self) -> Result<Vec<WeatherRecord>, FetchError> {
        info!(
            "Requesting forecast from {} for lat {} lon {}",
            self.url, self.location.0, self.location.1
        );

        let mut request = self.client.get(&self.url).query(&[
            ("lat", self.location.0.to_string()),
            ("lon", self.location.1.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(host) = &self.api_host {
            request = request.header(API_HOST_HEADER, host);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(self.url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: self.url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(self.url.clone(), e)
                });
            }
        };

        let body: ForecastResponse =
            response
                .json()
                .await
                .map_err(|source| FetchError::InvalidResponse {
                    url: self.url.clone(),
                    source,
                })?;
        info!("Received {} forecast entries", body.data.len());
        Ok(body.data)
    }

    /// Fetches the forecast and writes it to `store` with [`store_records`].
    pub async fn fetch_and_store<S: RecordStore>(&self, store: &S) -> Result<usize, FetchError> {
        let records = self.fetch().await?;
        store_records(store, &records).await
    }
}

/// Writes `records[i]` to key `data[i]` for every entry, in order.
///
/// Returns the number of documents written. The first failing write aborts
/// the rest; entries already written stay in the store.
pub async fn store_records<S: RecordStore>(
    store: &S,
    records: &[WeatherRecord],
) -> Result<usize, FetchError> {
    for (index, record) in records.iter().enumerate() {
        let key = record_key(index);
        let document = serde_json::to_string(record)
            .map_err(|source| FetchError::Serialize { index, source })?;
        store.set(&key, &document).await?;
        info!("Stored forecast entry at key {}", key);
    }
    info!(
        "All {} forecast entries stored with keys data[0], data[1], ...",
        records.len()
    );
    Ok(records.len())
}
