// Test doubles and fixtures shared by the scraper tests.
//
// - MockClient (HttpClient): URL -> canned response, optional fallback,
//   request counter. Unregistered URLs fail like a refused connection.
// - full_classified / classified_page: a realistic listing payload and the
//   detail page that embeds it.
// - search_page: a search-results body.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ScrapeError;
use crate::http::{HttpClient, HttpResponse};

#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, HttpResponse>,
    fallback: Option<HttpResponse>,
    requests: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Response for every URL without a registered one.
    pub fn otherwise(mut self, status: u16, body: impl Into<String>) -> Self {
        self.fallback = Some(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ScrapeError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(url)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| ScrapeError::Transport {
                url: url.to_string(),
                reason: "MockClient: connection refused".to_string(),
            })
    }
}

/// Search-results body listing the given ids.
pub fn search_page(ids: &[u64]) -> String {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "cluster": null, "price": { "mainValue": 250000 } }))
        .collect();
    json!({ "results": results, "totalItems": 9990 }).to_string()
}

/// A complete `window.classified` payload for a house for sale in Gent.
pub fn full_classified() -> Value {
    json!({
        "id": 10512345,
        "transaction": {
            "type": "FOR_SALE",
            "subtype": "BUY",
            "sale": { "price": 349000, "oldPrice": null },
            "rental": null,
            "certificates": {
                "primaryEnergyConsumptionPerSqm": 312,
                "epcScore": "C"
            }
        },
        "property": {
            "type": "HOUSE",
            "subtype": "HOUSE",
            "location": {
                "country": "Belgium",
                "region": "Flanders",
                "province": "East Flanders",
                "district": "Gent",
                "locality": "Gent",
                "postalCode": "9000",
                "street": "Kortrijksesteenweg",
                "number": "112",
                "box": null,
                "floor": null,
                "latitude": 51.05,
                "longitude": 3.71
            },
            "bedroomCount": 3,
            "netHabitableSurface": 165,
            "building": {
                "constructionYear": 1962,
                "facadeCount": 2,
                "floorCount": 3,
                "condition": "GOOD"
            },
            "hasLift": false,
            "kitchen": { "type": "INSTALLED" },
            "hasGarden": true,
            "gardenSurface": 180,
            "hasTerrace": true,
            "terraceSurface": 20,
            "land": { "surface": 420 },
            "fireplaceExists": false,
            "hasSwimmingPool": null,
            "hasAirConditioning": false,
            "bathroomCount": 1,
            "showerRoomCount": 1,
            "toiletCount": 2,
            "parkingCountIndoor": 1,
            "parkingCountOutdoor": null,
            "parkingCountClosedBox": null,
            "energy": { "hasDoubleGlazing": true, "heatingType": "GAS" }
        },
        "flags": {
            "isPublicSale": false,
            "isNotarySale": false,
            "isLifeAnnuitySale": false,
            "isAnInteractiveSale": false,
            "isInvestmentProject": false,
            "isNewRealEstateProject": false
        },
        "publication": {
            "creationDate": "2023-03-01T10:12:44.000+0000",
            "lastModificationDate": "2023-03-14T08:01:02.000+0000"
        }
    })
}

/// Detail page embedding `classified` the way immoweb does.
pub fn classified_page(classified: &Value) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>House for sale - Gent</title>
  <script type="text/javascript">window.dataLayer = window.dataLayer || [];</script>
</head>
<body>
  <div id="main-container"></div>
  <script type="text/javascript">
    window.classified = {};
    window.dataLayer.push({{"event": "classified"}});
  </script>
</body>
</html>"#,
        classified
    )
}
