//! Friend invitation routes.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use focusos_core::mail::{friend_accepted_email, friend_request_email, FriendInvite, MailOutcome};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{ApiError, ApiReply};
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields";
const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Serialize)]
pub struct SentEmail {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    #[serde(flatten)]
    pub invite: FriendInvite,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailStatus {
    pub status: &'static str,
    pub has_api_key: bool,
    pub message: &'static str,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(%rejection, "rejected request body");
            Err(ApiError::bad_request(INVALID_BODY))
        }
    }
}

/// `POST /api/friends/send-request`
pub async fn send_request(
    State(state): State<AppState>,
    payload: Result<Json<FriendInvite>, JsonRejection>,
) -> Result<Json<ApiReply<SentEmail>>, ApiError> {
    let invite = body(payload)?;
    if !invite.is_complete() {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    }

    let token = state
        .signer
        .as_ref()
        .map(|signer| signer.sign(&invite.friend_email, &invite.sender_email));
    let email = friend_request_email(&invite, &state.from, &state.app_url, token.as_deref());

    match state.mail.send(&email).await {
        Ok(MailOutcome::Skipped) => Ok(ApiReply::ok(
            "Friend request processed successfully (email service not configured)",
            None,
        )),
        Ok(MailOutcome::Sent { id }) => {
            info!(%id, "friend request email sent");
            Ok(ApiReply::ok(
                "Friend request email sent successfully",
                Some(SentEmail { id }),
            ))
        }
        Err(err) => {
            error!(%err, "friend request email failed");
            Err(ApiError::internal("Failed to send email"))
        }
    }
}

/// `POST /api/friends/accept`
pub async fn accept(
    State(state): State<AppState>,
    payload: Result<Json<AcceptRequest>, JsonRejection>,
) -> Result<Json<ApiReply<SentEmail>>, ApiError> {
    let AcceptRequest { invite, token } = body(payload)?;
    if !invite.is_complete() {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    }

    if let Some(signer) = &state.signer {
        let valid = token.as_deref().is_some_and(|token| {
            signer.verify(&invite.friend_email, &invite.sender_email, token)
        });
        if !valid {
            warn!("accept request with missing or bad token");
            return Err(ApiError::bad_request("Invalid invitation token"));
        }
    }

    let email = friend_accepted_email(&invite, &state.from, &state.app_url);
    match state.mail.send(&email).await {
        Ok(MailOutcome::Skipped) => Ok(ApiReply::ok(
            "Friend request accepted successfully (email service not configured)",
            None,
        )),
        Ok(MailOutcome::Sent { id }) => {
            info!(%id, "acceptance email sent");
            Ok(ApiReply::ok(
                "Friend request accepted successfully",
                Some(SentEmail { id }),
            ))
        }
        Err(err) => {
            error!(%err, "acceptance email failed");
            Err(ApiError::internal("Failed to send acceptance email"))
        }
    }
}

/// `GET /api/friends/test`
pub async fn mail_status(State(state): State<AppState>) -> Json<MailStatus> {
    let configured = state.mail.is_configured();
    Json(if configured {
        MailStatus {
            status: "Email API configured",
            has_api_key: true,
            message: "Email functionality is ready and configured.",
        }
    } else {
        MailStatus {
            status: "Email API not configured",
            has_api_key: false,
            message: "Email functionality is not configured. Set RESEND_API_KEY to start sending emails.",
        }
    })
}
