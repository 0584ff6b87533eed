use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A customer account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub display_name: String,
    pub email: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    pub labels: HashMap<String, String>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    #[serde(rename = "account")]
    pub owner: Box<Account>,
    pub lines: Vec<InvoiceLine>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub sku: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Status {
    Open,
    Paid,
}

/// Single-record response.
///
/// @oas: kind=response placeholder=T name=%sResult
#[derive(Debug, Serialize)]
pub struct ApiResult<T> {
    pub ok: bool,
    pub data: T,
}

impl Invoice {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.amount).sum()
    }
}
