//! Custom-order payloads for `/api/orders`.

use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the customer settles the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid at the counter.
    Cash,
    /// Paid through an online transfer.
    Online,
}

impl PaymentMethod {
    /// Payment status recorded when an order is first placed.
    #[must_use]
    pub const fn initial_status(self) -> PaymentStatus {
        match self {
            Self::Cash => PaymentStatus::Paid,
            Self::Online => PaymentStatus::Pending,
        }
    }
}

/// Settlement state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Paid on placement (cash).
    Paid,
    /// Settled.
    Completed,
    /// Payment attempt failed.
    Failed,
    /// Online payment confirmed by a designer.
    PaymentSuccessful,
    /// Status label not known to this console.
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::PaymentSuccessful => "paymentSuccessful",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Tailoring measurements captured for a custom order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    /// Blouse length.
    pub blouse_length: f64,
    /// Blouse chest.
    pub blouse_chest: f64,
    /// Blouse waist.
    pub blouse_waist: f64,
    /// Blouse shoulder.
    pub blouse_shoulder: f64,
    /// Blouse sleeve.
    pub blouse_sleeve: f64,
    /// Blouse neck.
    pub blouse_neck: f64,
    /// Saree length.
    pub saree_length: f64,
    /// Saree waist.
    pub saree_waist: f64,
    /// Saree hip.
    pub saree_hip: f64,
}

/// Order as listed by `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone number.
    #[serde(default)]
    pub customer_phone: String,
    /// Customer email, when captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Designer handling the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer_name: Option<String>,
    /// Design brief.
    #[serde(default)]
    pub design: String,
    /// Structured measurements, when captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurements>,
    /// Placement timestamp as reported by the backend.
    #[serde(default)]
    pub order_placed_date: Option<String>,
    /// Promised delivery date as reported by the backend.
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    /// Settlement method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Settlement state.
    #[serde(default = "unknown_payment_status")]
    pub payment_status: PaymentStatus,
    /// Total bill.
    #[serde(default)]
    pub amount: f64,
    /// Advance already paid.
    #[serde(default)]
    pub advance_amount: f64,
    /// Outstanding balance.
    #[serde(default)]
    pub balance_amount: f64,
    /// Workflow status label (free-form on the backend).
    #[serde(default)]
    pub status: String,
    /// Notes from the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Order channel, when the backend records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
}

const fn unknown_payment_status() -> PaymentStatus {
    PaymentStatus::Unknown
}

/// Body of `GET /api/orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListResponse {
    /// Listed orders; absent is treated as empty.
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Body of `POST /api/orders/custom`, as submitted from the designer intake form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrderRequest {
    /// Customer name.
    pub name: String,
    /// Customer mobile number.
    pub mobile: String,
    /// Design brief.
    pub design_description: String,
    /// Measurements as free text.
    pub measurements: String,
    /// Total bill.
    pub total_bill: f64,
    /// Advance paid on placement.
    pub advance_payment: f64,
    /// Settlement method.
    pub payment_method: PaymentMethod,
    /// Initial settlement state derived from the method.
    pub payment_status: PaymentStatus,
    /// Placement date.
    pub present_date: NaiveDate,
    /// Promised delivery date.
    pub delivery_date: NaiveDate,
}

/// Success body of `POST /api/orders/custom`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomOrderCreated {
    /// Identifier reported as `orderId`.
    #[serde(default, rename = "orderId")]
    pub order_id: Option<String>,
    /// Identifier reported as `_id`.
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
}

impl CustomOrderCreated {
    /// Identifier of the created order, preferring `orderId`.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.order_id.as_deref().or(self.id.as_deref())
    }
}

/// Body of `PATCH /api/orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusUpdate {
    /// New workflow status label.
    pub status: String,
}

/// Body of `PATCH /api/orders/{id}/payment-success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessUpdate {
    /// Always [`PaymentStatus::PaymentSuccessful`].
    pub payment_status: PaymentStatus,
}

impl Default for PaymentSuccessUpdate {
    fn default() -> Self {
        Self {
            payment_status: PaymentStatus::PaymentSuccessful,
        }
    }
}
