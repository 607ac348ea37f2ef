//! Core document types for pizzeria

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document ID type
pub type DocId = Uuid;

/// A document type that lives in its own collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, also used as the storage key prefix
    const COLLECTION: &'static str;
}

/// Customer details attached to an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
}

/// Pizza specification. Values are free-form; no menu is enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Pizza {
    pub crust: String,
    pub cheese: String,
    pub sauce: String,
    pub toppings: Vec<String>,
}

impl Document for Pizza {
    const COLLECTION: &'static str = "pizzas";
}

/// Timestamped free-form note on an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Note {
    pub timestamp: i64,
    pub note: String,
}

/// Order submitted by a customer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Order {
    pub customer: Customer,
    pub pizzas: Vec<Pizza>,
    pub notes: Vec<Note>,
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";
}

/// Delivery record. Kept as its own collection, not linked to an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Delivery {
    pub time: String,
    pub driver: String,
}

impl Document for Delivery {
    const COLLECTION: &'static str = "deliveries";
}

/// A document as persisted by the store, with its assigned identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: DocId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub document: T,
}

impl<T> Stored<T> {
    /// Wrap a document with a fresh id and the current time
    pub fn new(document: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            document,
        }
    }
}
