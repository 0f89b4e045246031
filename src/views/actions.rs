// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Write actions: PIN change and limit update.
//!
//! Each action is validated first; a rejected request never reaches the
//! gateway and carries its messages keyed by request field.

use std::collections::BTreeMap;

use tracing::warn;

use super::limits::{ATM_CHANNEL, POS_CHANNEL};
use super::{describe, parse_card_number};
use crate::banking::{mask_card_number, BankingGateway, LimitUpdate, PinChange};
use crate::models::{ActionOutcome, ChangePinRequest, UpdateLimitRequest};

const PIN_LENGTH: usize = 4;

type FieldErrors = BTreeMap<String, Vec<String>>;

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn is_pin(value: &str) -> bool {
    value.len() == PIN_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a PIN change request.
pub fn validate_pin_change(request: &ChangePinRequest) -> Result<PinChange, ActionOutcome> {
    let mut errors = FieldErrors::new();

    let card_number = parse_card_number(Some(&request.card_numb));
    if let Err(message) = card_number {
        push(&mut errors, "card_numb", message);
    }

    if !is_pin(&request.old_pin) {
        push(&mut errors, "old_pin", "Current PIN must be exactly 4 digits.");
    }
    if !is_pin(&request.new_pin) {
        push(&mut errors, "new_pin", "New PIN must be exactly 4 digits.");
    } else if request.new_pin == request.old_pin {
        push(&mut errors, "new_pin", "New PIN must be different from the current PIN.");
    }
    if !is_pin(&request.confirm_pin) {
        push(&mut errors, "confirm_pin", "Confirmation PIN must be exactly 4 digits.");
    } else if request.confirm_pin != request.new_pin {
        push(&mut errors, "confirm_pin", "PINs do not match.");
    }

    match card_number {
        Ok(card_number) if errors.is_empty() => Ok(PinChange {
            card_number,
            old_pin: request.old_pin.clone(),
            new_pin: request.new_pin.clone(),
        }),
        _ => Err(ActionOutcome::invalid(errors)),
    }
}

/// Validate a limit update request.
pub fn validate_limit_update(request: &UpdateLimitRequest) -> Result<LimitUpdate, ActionOutcome> {
    let mut errors = FieldErrors::new();

    let card_number = parse_card_number(Some(&request.card_numb));
    if let Err(message) = card_number {
        push(&mut errors, "card_numb", message);
    }

    let channel = request.channel.trim();
    if channel != ATM_CHANNEL && channel != POS_CHANNEL {
        push(&mut errors, "channel", "Channel must be ATM CHANNEL or POS CHANNEL.");
    }
    if request.transaction_type.trim().is_empty() {
        push(&mut errors, "transaction_type", "Transaction type is required.");
    }
    if !request.new_limit.is_finite() || request.new_limit < 0.0 {
        push(&mut errors, "new_limit", "Limit must be a non-negative amount.");
    }

    match card_number {
        Ok(card_number) if errors.is_empty() => Ok(LimitUpdate {
            card_number,
            channel: channel.to_string(),
            transaction_type: request.transaction_type.trim().to_string(),
            periodicity_id: request
                .periodicity_id
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            new_limit: request.new_limit,
        }),
        _ => Err(ActionOutcome::invalid(errors)),
    }
}

pub async fn change_pin(gateway: &dyn BankingGateway, change: &PinChange) -> ActionOutcome {
    match gateway.change_pin(change).await {
        Ok(ack) => ActionOutcome::succeeded(
            ack.message
                .unwrap_or_else(|| "PIN changed successfully.".to_string()),
        ),
        Err(e) => {
            warn!(error = %e, card = %mask_card_number(&change.card_number), "PIN change failed");
            ActionOutcome::failed(describe(&e))
        }
    }
}

pub async fn update_limit(gateway: &dyn BankingGateway, update: &LimitUpdate) -> ActionOutcome {
    match gateway.update_limit(update).await {
        Ok(ack) => ActionOutcome::succeeded(
            ack.message
                .unwrap_or_else(|| "Limit updated successfully.".to_string()),
        ),
        Err(e) => {
            warn!(error = %e, card = %mask_card_number(&update.card_number), "limit update failed");
            ActionOutcome::failed(describe(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::FakeGateway;

    fn pin_request(old: &str, new: &str, confirm: &str) -> ChangePinRequest {
        ChangePinRequest {
            card_numb: "4111111111111111".to_string(),
            old_pin: old.to_string(),
            new_pin: new.to_string(),
            confirm_pin: confirm.to_string(),
        }
    }

    fn limit_request(channel: &str, amount: f64) -> UpdateLimitRequest {
        UpdateLimitRequest {
            card_numb: "4111111111111111".to_string(),
            channel: channel.to_string(),
            transaction_type: "Withdrawal".to_string(),
            periodicity_id: Some("DAILY".to_string()),
            new_limit: amount,
        }
    }

    fn fields(outcome: ActionOutcome) -> Vec<String> {
        assert!(!outcome.success);
        outcome.errors.into_keys().collect()
    }

    #[test]
    fn valid_pin_change() {
        let change = validate_pin_change(&pin_request("1234", "5678", "5678")).unwrap();
        assert_eq!(change.new_pin, "5678");
        assert_eq!(change.card_number, "4111111111111111");
    }

    #[test]
    fn pins_must_be_four_digits() {
        let outcome = validate_pin_change(&pin_request("12a4", "56789", "5678")).unwrap_err();
        assert_eq!(fields(outcome), ["confirm_pin", "new_pin", "old_pin"]);
    }

    #[test]
    fn confirmation_must_match() {
        let outcome = validate_pin_change(&pin_request("1234", "5678", "8765")).unwrap_err();
        assert_eq!(outcome.errors["confirm_pin"], ["PINs do not match."]);
    }

    #[test]
    fn new_pin_must_differ() {
        let outcome = validate_pin_change(&pin_request("1234", "1234", "1234")).unwrap_err();
        assert_eq!(fields(outcome), ["new_pin"]);
    }

    #[test]
    fn pin_change_rejects_bad_card() {
        let mut request = pin_request("1234", "5678", "5678");
        request.card_numb = "12".to_string();
        let outcome = validate_pin_change(&request).unwrap_err();
        assert_eq!(outcome.message, "Please correct the highlighted fields.");
        assert_eq!(fields(outcome), ["card_numb"]);
    }

    #[test]
    fn limit_update_validation() {
        assert!(validate_limit_update(&limit_request(ATM_CHANNEL, 2500.0)).is_ok());
        assert!(validate_limit_update(&limit_request(POS_CHANNEL, 0.0)).is_ok());
        assert_eq!(
            fields(validate_limit_update(&limit_request("ECOM", 10.0)).unwrap_err()),
            ["channel"]
        );
        assert_eq!(
            fields(validate_limit_update(&limit_request(ATM_CHANNEL, -1.0)).unwrap_err()),
            ["new_limit"]
        );
    }

    #[test]
    fn blank_periodicity_is_dropped() {
        let mut request = limit_request(ATM_CHANNEL, 100.0);
        request.periodicity_id = Some("  ".to_string());
        assert_eq!(validate_limit_update(&request).unwrap().periodicity_id, None);
    }

    #[tokio::test]
    async fn actions_report_gateway_outcome() {
        let accepting = FakeGateway {
            accept_writes: true,
            ..FakeGateway::default()
        };
        let change = validate_pin_change(&pin_request("1234", "5678", "5678")).unwrap();
        let outcome = change_pin(&accepting, &change).await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "PIN changed");

        let update = validate_limit_update(&limit_request(ATM_CHANNEL, 2500.0)).unwrap();
        let outcome = update_limit(&accepting, &update).await;
        assert_eq!(outcome, ActionOutcome::succeeded("Limit updated successfully."));
        assert_eq!(
            accepting.written(),
            ["pin:4111111111111111", "limit:ATM CHANNEL:2500"]
        );

        let outcome = update_limit(&FakeGateway::default(), &update).await;
        assert_eq!(outcome, ActionOutcome::failed("API error: 503"));
    }
}
