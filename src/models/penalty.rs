use crate::entities::penalties;
use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_CURRENCY: &str = "EUR";

/// Monetary amounts are stored with at most 2 decimal places; anything
/// finer is rejected up front so aggregation stays exact.
pub fn validate_amount(amount: Decimal) -> AppResult<()> {
    if amount.is_zero() {
        return Err(AppError::ValidationError(
            "Amount must not be zero".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(AppError::ValidationError(
            "Amount must have at most 2 decimal places".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_currency(currency: &str) -> AppResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(AppError::ValidationError(
            "Currency must be a 3-letter uppercase code".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePenaltyRequest {
    pub user_id: i64,
    /// Defaults to today when absent
    pub created_date: Option<NaiveDate>,
    pub reason: String,
    /// Positive for a debt, negative for a credit
    pub amount: Decimal,
    pub currency: Option<String>,
    pub subject: Option<String>,
}

impl CreatePenaltyRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.reason.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Penalty reason must not be empty".to_string(),
            ));
        }
        validate_amount(self.amount)?;
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePenaltyRequest {
    pub created_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub subject: Option<String>,
    pub archived: Option<bool>,
    pub paid_date: Option<NaiveDate>,
}

impl UpdatePenaltyRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(reason) = &self.reason {
            if reason.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Penalty reason must not be empty".to_string(),
                ));
            }
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.created_date.is_none()
            && self.reason.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.subject.is_none()
            && self.archived.is_none()
            && self.paid_date.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PenaltyQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    /// Filter by paid status; absent means both
    pub paid: Option<bool>,
    /// Filter by archived flag; absent means both
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PenaltyResponse {
    pub id: i64,
    pub user_id: i64,
    pub team_id: i64,
    pub created_date: NaiveDate,
    pub reason: String,
    pub amount: Decimal,
    pub currency: String,
    pub archived: bool,
    pub subject: Option<String>,
    pub paid_date: Option<NaiveDate>,
    pub paid: bool,
}

impl From<penalties::Model> for PenaltyResponse {
    fn from(penalty: penalties::Model) -> Self {
        let paid = penalty.is_paid();
        Self {
            id: penalty.id,
            user_id: penalty.user_id,
            team_id: penalty.team_id,
            created_date: penalty.created_date,
            reason: penalty.reason,
            amount: penalty.amount,
            currency: penalty.currency,
            archived: penalty.archived,
            subject: penalty.subject,
            paid_date: penalty.paid_date,
            paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> CreatePenaltyRequest {
        CreatePenaltyRequest {
            user_id: 1,
            created_date: None,
            reason: "Late to training".to_string(),
            amount,
            currency: None,
            subject: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request(dec!(5.00)).validate().is_ok());
        assert!(request(dec!(5.5)).validate().is_ok());
        // Credits are negative amounts and legal
        assert!(request(dec!(-40.00)).validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(request(dec!(0)).validate().is_err());
        assert!(request(dec!(0.00)).validate().is_err());
    }

    #[test]
    fn test_excess_precision_rejected() {
        assert!(request(dec!(5.001)).validate().is_err());
        assert!(request(dec!(-0.125)).validate().is_err());
    }

    #[test]
    fn test_empty_reason_rejected() {
        let mut req = request(dec!(5.00));
        req.reason = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_currency_code_checked() {
        let mut req = request(dec!(5.00));
        req.currency = Some("EUR".to_string());
        assert!(req.validate().is_ok());

        req.currency = Some("eur".to_string());
        assert!(req.validate().is_err());

        req.currency = Some("EURO".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_empty_detection() {
        let update = UpdatePenaltyRequest {
            created_date: None,
            reason: None,
            amount: None,
            currency: None,
            subject: None,
            archived: None,
            paid_date: None,
        };
        assert!(update.is_empty());
        assert!(update.validate().is_ok());
    }
}
