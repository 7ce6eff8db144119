use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::TicketLookup;

// Request payload for the ticket lookup.
#[derive(Debug, Deserialize)]
pub struct GetTicketRequest {
    #[serde(rename = "googleAccessToken", default)]
    pub google_access_token: Option<String>,
}

impl GetTicketRequest {
    // Only a JSON object is a request; arrays would otherwise fill fields by position.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(fields))
    }
}

// Response payload for the ticket lookup, in both found and not-found cases.
#[derive(Debug, Serialize)]
pub struct GetTicketResponse {
    pub found: bool,
    pub user: Map<String, Value>,
}

// Fields a not-found response always carries; clients read them unconditionally.
const PLACEHOLDER_FIELDS: [&str; 5] = ["tc", "sapphire", "theme", "combo1", "combo2"];

impl From<TicketLookup> for GetTicketResponse {
    fn from(lookup: TicketLookup) -> Self {
        let TicketLookup { identity, record } = lookup;

        let mut user = Map::new();
        user.insert("email".to_string(), Value::String(identity.email.clone()));
        user.insert("name".to_string(), Value::String(identity.display_name));

        let found = record.is_some();
        match record {
            Some(record) => {
                user.extend(record.into_fields());
                // The verified email wins over whatever the row holds.
                user.insert("email".to_string(), Value::String(identity.email));
            }
            None => {
                user.insert("id".to_string(), Value::Null);
                for field in PLACEHOLDER_FIELDS {
                    user.insert(field.to_string(), Value::String(String::new()));
                }
            }
        }

        Self { found, user }
    }
}

// Error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
