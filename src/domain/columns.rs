use serde::{Deserialize, Serialize};

/// Captions of the recognised input columns. Every field can be overridden
/// from the `[columns]` settings section to match a sheet's own headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub customer_name: String,
    pub customer_id: String,
    pub order_id: String,
    pub invoice_no: String,
    pub ref_no: String,
    pub products: String,
    pub order_value: String,
    pub gender: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub email_id: String,
    pub phone: String,
    pub alternate_number: String,
    pub quantity: String,
    pub courier_name: String,
    pub tracking_number: String,
    pub order_date: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            customer_name: "CustomerName".to_string(),
            customer_id: "CustomerID".to_string(),
            order_id: "OrderID".to_string(),
            invoice_no: "InvoiceNo".to_string(),
            ref_no: "RefNo".to_string(),
            products: "Products".to_string(),
            order_value: "OrderValue".to_string(),
            gender: "Gender".to_string(),
            address: "Address".to_string(),
            city: "City".to_string(),
            state: "State".to_string(),
            pincode: "Pincode".to_string(),
            email_id: "EmailID".to_string(),
            phone: "Phone".to_string(),
            alternate_number: "AlternateNumber".to_string(),
            quantity: "QTY".to_string(),
            courier_name: "CourierName".to_string(),
            tracking_number: "TrackingNumber".to_string(),
            order_date: "OrderDate".to_string(),
        }
    }
}
