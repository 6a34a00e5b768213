//! Raw customer record as received from callers

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::Column;

/// Input attributes for one churn prediction
///
/// Field names on the wire follow the training dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
    /// Male / Female
    #[serde(rename = "gender")]
    #[validate(length(min = 1))]
    pub gender: String,

    /// 0 or 1
    #[validate(range(max = 1))]
    pub senior_citizen: u8,

    #[validate(length(min = 1))]
    pub partner: String,

    #[validate(length(min = 1))]
    pub dependents: String,

    /// Months the customer has stayed
    #[serde(rename = "tenure")]
    pub tenure: u32,

    #[validate(length(min = 1))]
    pub phone_service: String,

    /// Yes / No / No phone service
    #[validate(length(min = 1))]
    pub multiple_lines: String,

    /// DSL / Fiber optic / No
    #[validate(length(min = 1))]
    pub internet_service: String,

    #[validate(length(min = 1))]
    pub online_security: String,

    #[validate(length(min = 1))]
    pub online_backup: String,

    #[validate(length(min = 1))]
    pub device_protection: String,

    #[validate(length(min = 1))]
    pub tech_support: String,

    #[serde(rename = "StreamingTV")]
    #[validate(length(min = 1))]
    pub streaming_tv: String,

    #[validate(length(min = 1))]
    pub streaming_movies: String,

    /// Month-to-month / One year / Two year
    #[validate(length(min = 1))]
    pub contract: String,

    #[validate(length(min = 1))]
    pub paperless_billing: String,

    #[validate(length(min = 1))]
    pub payment_method: String,

    #[validate(range(min = 0.0))]
    pub monthly_charges: f64,

    #[validate(range(min = 0.0))]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Raw label for a categorical input column
    pub fn label(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::Gender => &self.gender,
            Column::Partner => &self.partner,
            Column::Dependents => &self.dependents,
            Column::PhoneService => &self.phone_service,
            Column::MultipleLines => &self.multiple_lines,
            Column::InternetService => &self.internet_service,
            Column::OnlineSecurity => &self.online_security,
            Column::OnlineBackup => &self.online_backup,
            Column::DeviceProtection => &self.device_protection,
            Column::TechSupport => &self.tech_support,
            Column::StreamingTv => &self.streaming_tv,
            Column::StreamingMovies => &self.streaming_movies,
            Column::Contract => &self.contract,
            Column::PaperlessBilling => &self.paperless_billing,
            Column::PaymentMethod => &self.payment_method,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// JSON name of a record field (`monthly_charges` → `MonthlyCharges`)
    pub fn wire_name(field: &str) -> &str {
        match field {
            "gender" => "gender",
            "senior_citizen" => "SeniorCitizen",
            "partner" => "Partner",
            "dependents" => "Dependents",
            "tenure" => "tenure",
            "phone_service" => "PhoneService",
            "multiple_lines" => "MultipleLines",
            "internet_service" => "InternetService",
            "online_security" => "OnlineSecurity",
            "online_backup" => "OnlineBackup",
            "device_protection" => "DeviceProtection",
            "tech_support" => "TechSupport",
            "streaming_tv" => "StreamingTV",
            "streaming_movies" => "StreamingMovies",
            "contract" => "Contract",
            "paperless_billing" => "PaperlessBilling",
            "payment_method" => "PaymentMethod",
            "monthly_charges" => "MonthlyCharges",
            "total_charges" => "TotalCharges",
            other => other,
        }
    }

    /// The documented example customer
    pub fn example() -> Self {
        Self {
            gender: "Male".to_string(),
            senior_citizen: 0,
            partner: "Yes".to_string(),
            dependents: "No".to_string(),
            tenure: 12,
            phone_service: "Yes".to_string(),
            multiple_lines: "No".to_string(),
            internet_service: "Fiber optic".to_string(),
            online_security: "No".to_string(),
            online_backup: "Yes".to_string(),
            device_protection: "No".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "Yes".to_string(),
            streaming_movies: "Yes".to_string(),
            contract: "Month-to-month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Electronic check".to_string(),
            monthly_charges: 85.50,
            total_charges: 1026.00,
        }
    }
}
