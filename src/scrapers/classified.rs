//! Decoding of the `window.classified` object embedded in listing pages.
//!
//! Every object in the payload may be `null`, and scalar fields are not
//! always the JSON type one would expect (postal codes arrive as numbers on
//! some listings, counts as strings on others). The schema below therefore
//! makes every field optional and decodes scalars leniently: a value of an
//! unexpected shape becomes `None` instead of failing the whole listing.

use crate::error::ScrapeError;
use crate::models::{PropertyDetails, SaleType};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Deserializer};

/// Text identifying the script block that carries the listing.
pub const CLASSIFIED_MARKER: &str = "window.classified";

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("static selector"));

static CLASSIFIED_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"window\.classified\s*=\s*(\{.*\});").expect("static regex"));

/// Find and decode the listing object in a detail page.
///
/// `Ok(None)` means no script block mentions the marker, which is a normal
/// outcome for pages that are not listings. Only the first block carrying
/// the marker is considered.
pub fn extract_classified(html: &str) -> Result<Option<Classified>, ScrapeError> {
    let Some(script) = find_classified_script(html) else {
        return Ok(None);
    };

    let literal = CLASSIFIED_ASSIGNMENT
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .ok_or(ScrapeError::MissingLiteral)?;

    let classified = serde_json::from_str(literal.as_str())?;
    Ok(Some(classified))
}

fn find_classified_script(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&SCRIPT_SELECTOR)
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(CLASSIFIED_MARKER))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Classified {
    pub transaction: Option<Transaction>,
    pub property: Option<Property>,
    pub flags: Option<Flags>,
    pub publication: Option<Publication>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub subtype: Option<String>,
    pub sale: Option<Pricing>,
    pub rental: Option<Pricing>,
    pub certificates: Option<Certificates>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Pricing {
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificates {
    #[serde(deserialize_with = "lenient_f64")]
    pub primary_energy_consumption_per_sqm: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub epc_score: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub subtype: Option<String>,
    pub location: Option<Location>,
    #[serde(deserialize_with = "lenient_i64")]
    pub bedroom_count: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub net_habitable_surface: Option<f64>,
    pub building: Option<Building>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_lift: Option<bool>,
    pub kitchen: Option<Kitchen>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_garden: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub garden_surface: Option<f64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_terrace: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub terrace_surface: Option<f64>,
    pub land: Option<Land>,
    #[serde(deserialize_with = "lenient_bool")]
    pub fireplace_exists: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_swimming_pool: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_air_conditioning: Option<bool>,
    #[serde(deserialize_with = "lenient_i64")]
    pub bathroom_count: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub shower_room_count: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub toilet_count: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub parking_count_indoor: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub parking_count_outdoor: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub parking_count_closed_box: Option<i64>,
    pub energy: Option<Energy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    #[serde(deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub province: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub district: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub locality: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub street: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub number: Option<String>,
    #[serde(rename = "box", deserialize_with = "lenient_text")]
    pub box_number: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub floor: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Building {
    #[serde(deserialize_with = "lenient_i64")]
    pub construction_year: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub facade_count: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub floor_count: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub condition: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Kitchen {
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Land {
    #[serde(deserialize_with = "lenient_f64")]
    pub surface: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Energy {
    #[serde(deserialize_with = "lenient_bool")]
    pub has_double_glazing: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    #[serde(deserialize_with = "lenient_flag")]
    pub is_public_sale: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_notary_sale: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_life_annuity_sale: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_an_interactive_sale: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_investment_project: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_new_real_estate_project: Option<bool>,
}

impl Flags {
    /// Sale-type flags in priority order.
    fn by_priority(&self) -> [(Option<bool>, SaleType); 6] {
        [
            (self.is_public_sale, SaleType::PublicSale),
            (self.is_notary_sale, SaleType::NotarySale),
            (self.is_life_annuity_sale, SaleType::LifeAnnuitySale),
            (self.is_an_interactive_sale, SaleType::AnInteractiveSale),
            (self.is_investment_project, SaleType::InvestmentProject),
            (self.is_new_real_estate_project, SaleType::NewRealEstateProject),
        ]
    }

    /// First flag set to `true` wins.
    pub fn sale_type(&self) -> Option<SaleType> {
        self.by_priority()
            .into_iter()
            .find(|(flag, _)| *flag == Some(true))
            .map(|(_, sale_type)| sale_type)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    #[serde(deserialize_with = "lenient_text")]
    pub creation_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_modification_date: Option<String>,
}

impl Classified {
    /// Flatten into record columns. Each nested object is checked on its
    /// own; a null parent nulls exactly the columns it supplies.
    pub fn into_details(self) -> PropertyDetails {
        let transaction = self.transaction.unwrap_or_default();
        let property = self.property.unwrap_or_default();
        let flags = self.flags.unwrap_or_default();

        let price = match (&transaction.sale, &transaction.rental) {
            (Some(sale), _) => sale.price,
            (None, Some(rental)) => rental.price,
            (None, None) => None,
        };

        let certificates = transaction.certificates.as_ref();
        let building = property.building.as_ref();
        let location = property.location.as_ref();
        let publication = self.publication.as_ref();

        PropertyDetails {
            transaction_type: transaction.kind.clone(),
            transaction_subtype: transaction.subtype.clone(),
            price,
            sale_type: flags.sale_type(),

            property_type: property.kind.clone(),
            subtype: property.subtype.clone(),
            bedroom_count: property.bedroom_count,
            net_habitable_surface: property.net_habitable_surface,
            has_lift: property.has_lift,
            kitchen: property.kitchen.as_ref().and_then(|k| k.kind.clone()),
            has_garden: property.has_garden,
            garden_surface: property.garden_surface,
            has_terrace: property.has_terrace,
            terrace_surface: property.terrace_surface,
            land: property.land.as_ref().and_then(|l| l.surface),
            fireplace_exists: property.fireplace_exists,
            has_swimming_pool: property.has_swimming_pool,
            has_air_conditioning: property.has_air_conditioning,
            bathroom_count: property.bathroom_count,
            shower_room_count: property.shower_room_count,
            toilet_count: property.toilet_count,
            parking_count_indoor: property.parking_count_indoor,
            parking_count_outdoor: property.parking_count_outdoor,
            parking_count_closed_box: property.parking_count_closed_box,
            construction_year: building.and_then(|b| b.construction_year),
            facade_count: building.and_then(|b| b.facade_count),
            floor_count: building.and_then(|b| b.floor_count),
            condition: building.and_then(|b| b.condition.clone()),

            country: location.and_then(|l| l.country.clone()),
            region: location.and_then(|l| l.region.clone()),
            province: location.and_then(|l| l.province.clone()),
            district: location.and_then(|l| l.district.clone()),
            locality: location.and_then(|l| l.locality.clone()),
            postal_code: location.and_then(|l| l.postal_code.clone()),
            street: location.and_then(|l| l.street.clone()),
            number: location.and_then(|l| l.number.clone()),
            box_number: location.and_then(|l| l.box_number.clone()),
            floor: location.and_then(|l| l.floor),
            latitude: location.and_then(|l| l.latitude),
            longitude: location.and_then(|l| l.longitude),

            primary_energy_consumption_per_sqm: certificates
                .and_then(|c| c.primary_energy_consumption_per_sqm),
            epc_score: certificates.and_then(|c| c.epc_score.clone()),
            has_double_glazing: property.energy.as_ref().and_then(|e| e.has_double_glazing),

            creation_date: publication.and_then(|p| p.creation_date.clone()),
            last_modification_date: publication.and_then(|p| p.last_modification_date.clone()),
        }
    }
}

/// Any JSON value, sorted by how it can be read as a scalar.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Int(n)) => Some(n.to_string()),
        Some(Scalar::Float(f)) => Some(f.to_string()),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Int(n)) => Some(n),
        Some(Scalar::Float(f)) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Int(n)) => Some(n as f64),
        Some(Scalar::Float(f)) => Some(f),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Bool(b)) => Some(b),
        _ => None,
    })
}

/// Flags are read by truthiness: non-zero numbers and `"true"`/`"1"` count as set.
fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Bool(b)) => Some(b),
        Some(Scalar::Int(n)) => Some(n != 0),
        Some(Scalar::Float(f)) => Some(f != 0.0),
        Some(Scalar::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
