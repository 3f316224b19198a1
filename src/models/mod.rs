use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub pk: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub pk: i64,
    pub reference: String,
    #[serde(default)]
    pub description: Option<String>,
    pub customer: i64,
    #[serde(default)]
    pub customer_detail: Option<CustomerSummary>,
    pub status: i64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub overdue: bool,
    #[serde(default)]
    pub line_items: i64,
    #[serde(default)]
    pub shipped_lines: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub pk: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "IPN", default)]
    pub ipn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub pk: i64,
    pub part: i64,
    #[serde(default)]
    pub part_detail: Option<Part>,
    pub quantity: f64,
    #[serde(default)]
    pub shipped: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub sale_price_currency: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LineItem {
    pub fn remaining(&self) -> f64 {
        self.quantity - self.shipped
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() <= 0.0
    }

    pub fn part_name(&self) -> &str {
        self.part_detail
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("(unknown part)")
    }
}

// Partial update accepted by the order-line endpoint. The part reference is
// only reassigned on substitution, so it must stay out of the payload
// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemUpdate {
    pub shipped: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PagedResults<T> {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FulfillmentProgress {
    pub completed: f64,
    pub total: f64,
}

impl FulfillmentProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0.0 && self.completed >= self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPriority {
    Overdue,
    Urgent,
    Normal,
}

impl SalesOrder {
    pub fn customer_name(&self) -> &str {
        self.customer_detail
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-")
    }

    // Overdue comes from the server; urgency is a target date within the
    // next 24 hours.
    pub fn priority(&self, today: NaiveDate) -> OrderPriority {
        if self.overdue {
            return OrderPriority::Overdue;
        }
        match self.target_date {
            Some(target) if target <= today + Duration::days(1) => OrderPriority::Urgent,
            _ => OrderPriority::Normal,
        }
    }
}

pub fn order_status_label(status: i64) -> &'static str {
    match status {
        10 => "Pending",
        15 => "In Progress",
        20 => "Shipped",
        25 => "On Hold",
        30 => "Complete",
        40 => "Cancelled",
        50 => "Lost",
        60 => "Returned",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server_url: Option<String>,
    pub api_token: Option<String>,
}
