//! Merchant verification decisions and hostel-merchant settings.
//!
//! Verification follows a one-step state machine: only a `pending` account
//! can be approved (`verified`) or rejected (`unverified`). Rejecting also
//! clears the evidence reference, so an `unverified` account set here never
//! keeps a `verification_id`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{self, VerificationStatus};
use crate::remote::{fetch_all, DataClient, Filter, Select};

/// Operator decision on a pending verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationDecision {
    Verified,
    Unverified,
}

impl VerificationDecision {
    pub fn target(&self) -> VerificationStatus {
        match self {
            VerificationDecision::Verified => VerificationStatus::Verified,
            VerificationDecision::Unverified => VerificationStatus::Unverified,
        }
    }
}

/// Request body for a verification decision.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    pub status: VerificationDecision,
}

pub fn is_valid_transition(from: VerificationStatus, to: VerificationStatus) -> bool {
    matches!(
        (from, to),
        (VerificationStatus::Pending, VerificationStatus::Verified)
            | (VerificationStatus::Pending, VerificationStatus::Unverified)
    )
}

/// Patch applied for a decision. Rejection clears the evidence reference.
pub fn verification_patch(decision: VerificationDecision) -> Value {
    match decision {
        VerificationDecision::Verified => json!({
            "verification_status": VerificationStatus::Verified.as_str(),
        }),
        VerificationDecision::Unverified => json!({
            "verification_status": VerificationStatus::Unverified.as_str(),
            "verification_id": null,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct CurrentStatus {
    verification_status: VerificationStatus,
}

/// Approve or reject a pending account. Returns nothing; callers re-fetch.
pub async fn update_verification_status(
    client: &dyn DataClient,
    account_id: Uuid,
    decision: VerificationDecision,
) -> Result<(), AppError> {
    let id = account_id.to_string();
    let current: Vec<CurrentStatus> = fetch_all(
        client,
        &Select::from(account::TABLE)
            .columns("verification_status")
            .eq("id", id.as_str())
            .limit(1),
    )
    .await?;
    let current = current
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Account {account_id}")))?
        .verification_status;

    let target = decision.target();
    if !is_valid_transition(current, target) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot move account from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    // Guarded on the status read above so a concurrent decision is not overwritten.
    let updated = client
        .update(
            account::TABLE,
            &[
                Filter::eq("id", id.as_str()),
                Filter::eq("verification_status", VerificationStatus::Pending.as_str()),
            ],
            verification_patch(decision),
        )
        .await?;
    if updated.is_empty() {
        return Err(AppError::InvalidTransition(format!(
            "Account {account_id} is no longer pending"
        )));
    }

    tracing::info!(
        account_id = %account_id,
        from = current.as_str(),
        to = target.as_str(),
        "Verification status updated"
    );
    Ok(())
}

/// Request body for the hostel-merchant settings of a merchant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostelMerchantUpdate {
    pub is_hostel_merchant: bool,
    #[serde(default)]
    pub hostel_id: Option<Uuid>,
    #[serde(default)]
    pub room_number: Option<String>,
}

/// Validate a hostel-merchant update and build its patch.
///
/// Disabling always clears the hostel and room, whatever the request holds.
pub fn hostel_merchant_patch(request: &HostelMerchantUpdate) -> Result<Value, AppError> {
    if !request.is_hostel_merchant {
        return Ok(json!({
            "is_hostel_merchant": false,
            "hostel_id": null,
            "room_number": null,
        }));
    }

    let hostel_id = request
        .hostel_id
        .ok_or_else(|| AppError::Validation("Please select a hostel".to_string()))?;
    let room_number = request
        .room_number
        .as_deref()
        .map(str::trim)
        .filter(|room| !room.is_empty())
        .ok_or_else(|| AppError::Validation("Please enter a room number".to_string()))?;

    Ok(json!({
        "is_hostel_merchant": true,
        "hostel_id": hostel_id,
        "room_number": room_number,
    }))
}

pub async fn update_hostel_merchant_status(
    client: &dyn DataClient,
    account_id: Uuid,
    request: &HostelMerchantUpdate,
) -> Result<(), AppError> {
    let patch = hostel_merchant_patch(request)?;

    let updated = client
        .update(
            account::TABLE,
            &[Filter::eq("id", account_id.to_string())],
            patch,
        )
        .await?;
    if updated.is_empty() {
        return Err(AppError::NotFound(format!("Account {account_id}")));
    }

    tracing::info!(
        account_id = %account_id,
        is_hostel_merchant = request.is_hostel_merchant,
        "Hostel merchant settings updated"
    );
    Ok(())
}
