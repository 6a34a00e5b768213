//! Request bodies

use churn_core::CustomerRecord;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::describe_validation;
use crate::AppError;

/// Body of `POST /predict/batch`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    pub customers: Vec<CustomerRecord>,
}

impl BatchPredictionRequest {
    /// Validate every record, naming the first invalid one
    pub fn validate(&self) -> Result<(), AppError> {
        for (index, customer) in self.customers.iter().enumerate() {
            customer.validate().map_err(|e| {
                AppError::ValidationError(format!(
                    "Invalid customer #{}: {}",
                    index,
                    describe_validation(&e)
                ))
            })?;
        }
        Ok(())
    }
}
