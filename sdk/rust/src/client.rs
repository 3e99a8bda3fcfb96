use std::collections::BTreeMap;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tools,
    Consumables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    pub count: i64,
    pub id: i64,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Selection {
    pub query: ItemQuery,
    pub selection: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
}

#[derive(Deserialize)]
struct Listing {
    items: BTreeMap<i64, Item>,
}

#[derive(Deserialize)]
struct Added {
    added: Item,
}

#[derive(Deserialize)]
struct Updated {
    updated: Item,
}

#[derive(Deserialize)]
struct Deleted {
    delete: Item,
}

/// Error returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Emporium returned error status {status}: {detail}")]
    Api { status: u16, detail: serde_json::Value },
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub struct EmporiumClient {
    client: Client,
    base_url: String,
}

impl EmporiumClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Every item, keyed by id.
    pub async fn list_items(&self) -> Result<BTreeMap<i64, Item>, ClientError> {
        let resp = self.client.get(format!("{}/", self.base_url)).send().await?;
        let listing: Listing = decode(resp).await?;
        Ok(listing.items)
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, ClientError> {
        let resp = self
            .client
            .get(format!("{}/items/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn find_items(&self, query: &ItemQuery) -> Result<Selection, ClientError> {
        let resp = self
            .client
            .get(format!("{}/items/", self.base_url))
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn add_item(&self, item: &Item) -> Result<Item, ClientError> {
        let resp = self
            .client
            .post(format!("{}/", self.base_url))
            .json(item)
            .send()
            .await?;
        let added: Added = decode(resp).await?;
        Ok(added.added)
    }

    pub async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Item, ClientError> {
        let resp = self
            .client
            .put(format!("{}/update/{}", self.base_url, id))
            .query(patch)
            .send()
            .await?;
        let updated: Updated = decode(resp).await?;
        Ok(updated.updated)
    }

    pub async fn delete_item(&self, id: i64) -> Result<Item, ClientError> {
        let resp = self
            .client
            .delete(format!("{}/delete/{}", self.base_url, id))
            .send()
            .await?;
        let deleted: Deleted = decode(resp).await?;
        Ok(deleted.delete)
    }

    pub async fn health(&self) -> Result<ServiceStatus, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body: serde_json::Value = resp.json().await.unwrap_or(serde_json::Value::Null);
        let detail = body.get("detail").cloned().unwrap_or(body);
        return Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(resp.json().await?)
}
