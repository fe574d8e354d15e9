//! Wire protocol
//!
//! One newline-terminated JSON object per direction: the client sends a
//! `Request`, the server answers with a `Response` and closes. Prices and
//! coordinates with NaN sentinels are encoded as null.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

use crate::error::Result;
use crate::types::Dish;

/// A search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub query: String,
}

/// A search response: ranked dishes on success, a message on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub dishes: Vec<DishPayload>,
}

/// Wire representation of a dish and its restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishPayload {
    pub name: String,
    pub price: Option<f64>,
    pub restaurant: String,
    pub restaurant_description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Response {
    /// Create a success response
    pub fn success(dishes: Vec<DishPayload>) -> Self {
        Self {
            success: true,
            message: None,
            dishes,
        }
    }

    /// Create a failure response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            dishes: Vec::new(),
        }
    }
}

impl From<&Dish> for DishPayload {
    fn from(dish: &Dish) -> Self {
        let location = &dish.restaurant.location;
        Self {
            name: dish.name.clone(),
            price: (!dish.price.is_nan()).then_some(dish.price),
            restaurant: dish.restaurant.name.clone(),
            restaurant_description: dish.restaurant.description.clone(),
            latitude: location.is_known().then_some(location.latitude),
            longitude: location.is_known().then_some(location.longitude),
        }
    }
}

/// Read one request from the connection
///
/// `Ok(None)` means the peer closed before sending a full line.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<Request>>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&line)?))
}

/// Write one response, newline-terminated, and flush
pub async fn write_response<W>(writer: &mut W, response: &Response) -> Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
