// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP implementation of the banking gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::contract::ResponseContract;
use super::types::{
    mask_card_number, ActionAck, CardRecord, LimitRecord, LimitUpdate, PageRange, PinChange,
    TransactionRecord,
};
use super::{BankingError, BankingGateway};
use crate::config::{BankingConfig, BasicCredentials};
use crate::models::PhoneNumber;

const API_KEY_HEADER: &str = "ApiKey";

/// [`BankingGateway`] over the banking REST APIs.
#[derive(Debug, Clone)]
pub struct HttpBankingGateway {
    config: BankingConfig,
    http: Client,
}

impl HttpBankingGateway {
    pub fn new(config: BankingConfig, timeout: Duration) -> Result<Self, BankingError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BankingError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    fn contract(&self) -> &ResponseContract {
        &self.config.contract
    }

    fn id_msg(&self) -> Result<&str, BankingError> {
        required(self.config.id_msg.as_deref(), "CARD_LIST_ID_MSG")
    }

    fn bank_code(&self) -> Result<&str, BankingError> {
        required(self.config.bank_code.as_deref(), "BANK_CODE")
    }

    fn institution(&self) -> Result<&str, BankingError> {
        required(self.config.institution.as_deref(), "CARD_LIST_INSTITUTION")
    }

    async fn post_json(
        &self,
        name: &'static str,
        url: Option<&Url>,
        payload: &Value,
    ) -> Result<Value, BankingError> {
        let url = url.ok_or(BankingError::NotConfigured(name))?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(BankingError::NotConfigured("CARD_LIST_API_KEY"))?;

        let request = self
            .http
            .post(url.clone())
            .header(API_KEY_HEADER, api_key)
            .json(payload);
        send(name, request).await
    }

    fn records<T: DeserializeOwned>(
        name: &'static str,
        list: Option<&Vec<Value>>,
    ) -> Result<Vec<T>, BankingError> {
        let Some(list) = list else {
            debug!(endpoint = name, "response carries no record list");
            return Ok(Vec::new());
        };

        list.iter()
            .map(|record| {
                serde_json::from_value(record.clone()).map_err(|e| {
                    BankingError::InvalidResponse(format!("{name} record is malformed: {e}"))
                })
            })
            .collect()
    }
}

#[async_trait]
impl BankingGateway for HttpBankingGateway {
    async fn account_number(&self, phone: &PhoneNumber) -> Result<Option<String>, BankingError> {
        let url = self
            .config
            .accounts_url
            .as_ref()
            .ok_or(BankingError::NotConfigured("GET_ACCOUNTS_URL"))?;

        let BasicCredentials { username, password } = self
            .config
            .accounts_credentials
            .as_ref()
            .ok_or(BankingError::NotConfigured("GET_ACCOUNTS_USER"))?;

        let request = self
            .http
            .post(url.clone())
            .basic_auth(username, Some(password))
            .json(&json!({ "phoneNumber": phone.as_str() }));

        let body = send("GET_ACCOUNTS_URL", request).await?;
        let account = self.contract().account_number(&body);
        if account.is_none() {
            info!(phone = %phone.redacted(), "no account registered for phone number");
        }
        Ok(account)
    }

    async fn list_cards(&self, account: &str) -> Result<Vec<CardRecord>, BankingError> {
        let payload = json!({
            "header": { "idmsg": self.id_msg()? },
            "filter": {
                "account": account,
                "card": "",
                "pan": "",
                "customer": "",
                "name_on_card": "",
                "institution": self.institution()?,
                "start": "1",
                "end": "10"
            }
        });

        let body = self
            .post_json("CARD_LIST_URL", self.config.card_list_url.as_ref(), &payload)
            .await?;
        Self::records("CARD_LIST_URL", self.contract().card_list(&body))
    }

    async fn list_transactions(
        &self,
        card_number: &str,
        page: PageRange,
    ) -> Result<Vec<TransactionRecord>, BankingError> {
        let payload = json!({
            "header": { "idmsg": self.id_msg()? },
            "initiator": {
                "card_numb": card_number,
                "start": page.start.to_string(),
                "end": page.end.to_string()
            }
        });

        let body = self
            .post_json(
                "GET_TRANSACTIONS_URL",
                self.config.transactions_url.as_ref(),
                &payload,
            )
            .await?;
        Self::records("GET_TRANSACTIONS_URL", self.contract().transaction_list(&body))
    }

    async fn list_limits(&self, card_number: &str) -> Result<Vec<LimitRecord>, BankingError> {
        let payload = json!({
            "header": { "idmsg": self.id_msg()? },
            "initiator": {
                "card_numb": card_number,
                "bank_code": self.bank_code()?
            }
        });

        let body = self
            .post_json("CARD_LIMITS_URL", self.config.limits_url.as_ref(), &payload)
            .await?;
        Self::records("CARD_LIMITS_URL", self.contract().limit_list(&body))
    }

    async fn update_limit(&self, update: &LimitUpdate) -> Result<ActionAck, BankingError> {
        let payload = json!({
            "header": { "idmsg": self.id_msg()? },
            "initiator": {
                "card_numb": update.card_number,
                "bank_code": self.bank_code()?,
                "channel": update.channel,
                "transaction_type": update.transaction_type,
                "periodicity_id": update.periodicity_id.as_deref().unwrap_or_default(),
                "new_limit": update.new_limit
            }
        });

        let body = self
            .post_json(
                "LIMIT_UPDATE_URL",
                self.config.limit_update_url.as_ref(),
                &payload,
            )
            .await?;
        info!(
            card = %mask_card_number(&update.card_number),
            channel = %update.channel,
            transaction_type = %update.transaction_type,
            "card limit updated"
        );
        Ok(ActionAck {
            message: self.contract().message(&body),
        })
    }

    async fn change_pin(&self, change: &PinChange) -> Result<ActionAck, BankingError> {
        let payload = json!({
            "header": { "idmsg": self.id_msg()? },
            "initiator": {
                "card_numb": change.card_number,
                "old_pin": change.old_pin,
                "new_pin": change.new_pin
            }
        });

        let body = self
            .post_json("PIN_CHANGE_URL", self.config.pin_change_url.as_ref(), &payload)
            .await?;
        info!(card = %mask_card_number(&change.card_number), "card PIN changed");
        Ok(ActionAck {
            message: self.contract().message(&body),
        })
    }

    fn missing_configuration(&self) -> Vec<&'static str> {
        let config = &self.config;
        [
            ("GET_ACCOUNTS_URL", config.accounts_url.is_some()),
            ("GET_ACCOUNTS_USER", config.accounts_credentials.is_some()),
            ("CARD_LIST_URL", config.card_list_url.is_some()),
            ("CARD_LIST_API_KEY", config.api_key.is_some()),
            ("CARD_LIST_ID_MSG", config.id_msg.is_some()),
            ("CARD_LIST_INSTITUTION", config.institution.is_some()),
            ("GET_TRANSACTIONS_URL", config.transactions_url.is_some()),
            ("CARD_LIMITS_URL", config.limits_url.is_some()),
            ("LIMIT_UPDATE_URL", config.limit_update_url.is_some()),
            ("PIN_CHANGE_URL", config.pin_change_url.is_some()),
            ("BANK_CODE", config.bank_code.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| (!present).then_some(name))
        .collect()
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, BankingError> {
    value.ok_or(BankingError::NotConfigured(name))
}

async fn send(name: &'static str, request: reqwest::RequestBuilder) -> Result<Value, BankingError> {
    let response = request
        .send()
        .await
        .map_err(|e| BankingError::Request(format!("{name} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(BankingError::Rejected {
            status: response.status().as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| BankingError::InvalidResponse(format!("{name} invalid JSON: {e}")))
}
