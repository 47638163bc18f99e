use crate::error::ScrapeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Status recorded when no HTTP response was received at all.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Identifier of one immoweb listing.
///
/// The search API hands these out as integers; they are kept as text so the
/// id file and the record document share one representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ListingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ListingId::from(n),
            RawId::Text(s) => ListingId::new(s),
        })
    }
}

/// How a listing is being sold, when it is not a plain sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SaleType {
    PublicSale,
    NotarySale,
    LifeAnnuitySale,
    AnInteractiveSale,
    InvestmentProject,
    NewRealEstateProject,
}

/// Everything decoded from a listing's embedded `window.classified` object.
///
/// Flat on purpose: each nested source object contributes its own columns,
/// all of them null when that object was null.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    // transaction
    pub transaction_type: Option<String>,
    pub transaction_subtype: Option<String>,
    pub price: Option<f64>,
    pub sale_type: Option<SaleType>,

    // physical attributes
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub subtype: Option<String>,
    pub bedroom_count: Option<i64>,
    pub net_habitable_surface: Option<f64>,
    pub has_lift: Option<bool>,
    pub kitchen: Option<String>,
    pub has_garden: Option<bool>,
    pub garden_surface: Option<f64>,
    pub has_terrace: Option<bool>,
    pub terrace_surface: Option<f64>,
    pub land: Option<f64>,
    pub fireplace_exists: Option<bool>,
    pub has_swimming_pool: Option<bool>,
    pub has_air_conditioning: Option<bool>,
    pub bathroom_count: Option<i64>,
    pub shower_room_count: Option<i64>,
    pub toilet_count: Option<i64>,
    pub parking_count_indoor: Option<i64>,
    pub parking_count_outdoor: Option<i64>,
    pub parking_count_closed_box: Option<i64>,
    pub construction_year: Option<i64>,
    pub facade_count: Option<i64>,
    pub floor_count: Option<i64>,
    pub condition: Option<String>,

    // location
    pub country: Option<String>,
    pub region: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    #[serde(rename = "box")]
    pub box_number: Option<String>,
    pub floor: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // energy
    pub primary_energy_consumption_per_sqm: Option<f64>,
    pub epc_score: Option<String>,
    pub has_double_glazing: Option<bool>,

    // publication
    pub creation_date: Option<String>,
    pub last_modification_date: Option<String>,
}

/// One entry of the final collection, keyed by `id`.
///
/// Records without `details` are degenerate: the page could not be fetched
/// or carried no embedded listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: ListingId,
    pub url: String,
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Option<PropertyDetails>,
}

impl PropertyRecord {
    /// Record carrying only identity and status.
    pub fn degenerate(id: ListingId, url: String, http_status: u16) -> Self {
        Self {
            id,
            url,
            http_status,
            error: None,
            details: None,
        }
    }

    /// Record for a listing whose page never produced a response.
    pub fn unreachable(id: ListingId, url: String, error: &ScrapeError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::degenerate(id, url, NO_RESPONSE_STATUS)
        }
    }

    pub fn with_details(mut self, details: PropertyDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.details.is_none()
    }
}
