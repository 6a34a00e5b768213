//! Scaling Stage - fitted standard scaler

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Scaler parameters as exported from training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `(x - mean) / scale`, column-wise
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn from_params(params: ScalerParams) -> Result<Self, String> {
        if params.mean.len() != params.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                params.mean.len(),
                params.scale.len()
            ));
        }
        if params.mean.iter().chain(params.scale.iter()).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }

        // constant training columns are stored with scale 0
        let scale = params
            .scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();

        Ok(Self {
            mean: Array1::from(params.mean),
            scale: Array1::from(scale),
        })
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Caller guarantees `row.len() == self.width()`
    pub fn transform(&self, row: Array1<f64>) -> Array1<f64> {
        (row - &self.mean) / &self.scale
    }

    /// Undo the transform
    pub fn inverse_transform(&self, row: Array1<f64>) -> Array1<f64> {
        row * &self.scale + &self.mean
    }
}
