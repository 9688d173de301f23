use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

use super::models::{Payment, PaymentKind};
use crate::merchant::models::Merchant;
use crate::utils::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buyer {
    id: String,
    name: String,
    registration_address: String,
    city: String,
    country: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BillingAddress {
    contact_name: String,
    city: String,
    country: String,
    address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BasketItem {
    id: String,
    name: String,
    item_type: &'static str,
    price: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest {
    locale: &'static str,
    conversation_id: String,
    price: String,
    paid_price: String,
    currency: &'static str,
    basket_id: String,
    payment_group: &'static str,
    callback_url: String,
    buyer: Buyer,
    billing_address: BillingAddress,
    basket_items: Vec<BasketItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest {
    locale: &'static str,
    token: String,
}

/// Redirect payload handed back by the gateway when a checkout form is
/// opened. Relayed to the caller untouched.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInit {
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub payment_page_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayVerification {
    pub status: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

fn gateway_config() -> Result<(String, String), ApiError> {
    let base_url = env::var("GATEWAY_BASE_URL")
        .map_err(|e| ApiError::internal(format!("GATEWAY_BASE_URL: {}", e)))?;
    let api_key = env::var("GATEWAY_API_KEY")
        .map_err(|e| ApiError::internal(format!("GATEWAY_API_KEY: {}", e)))?;
    Ok((base_url, api_key))
}

fn basket_label(kind: PaymentKind) -> &'static str {
    match kind {
        PaymentKind::Promotion => "Featured listing placement",
        PaymentKind::Advertisement => "Banner advertisement",
    }
}

pub async fn initialize_checkout(
    payment: &Payment,
    buyer: &Merchant,
    callback_url: &str,
) -> Result<CheckoutInit, ApiError> {
    let (base_url, api_key) = gateway_config()?;

    let amount = payment.amount.to_string();
    let request = CheckoutRequest {
        locale: "tr",
        conversation_id: payment.id.to_string(),
        price: amount.clone(),
        paid_price: amount.clone(),
        currency: "TRY",
        basket_id: payment.id.to_string(),
        payment_group: "PRODUCT",
        callback_url: callback_url.to_owned(),
        buyer: Buyer {
            id: buyer.user_id.to_string(),
            name: buyer.company_name.clone(),
            registration_address: buyer.address.clone(),
            city: "Istanbul".to_owned(),
            country: "Turkey".to_owned(),
        },
        billing_address: BillingAddress {
            contact_name: buyer.company_name.clone(),
            city: "Istanbul".to_owned(),
            country: "Turkey".to_owned(),
            address: buyer.address.clone(),
        },
        basket_items: vec![BasketItem {
            id: payment.id.to_string(),
            name: basket_label(payment.kind).to_owned(),
            item_type: "VIRTUAL",
            price: amount,
        }],
    };

    let response = Client::new()
        .post(format!("{}/checkout/initialize", base_url))
        .header("Authorization", api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| ApiError::ExternalService(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ApiError::ExternalService(format!(
            "checkout initialize returned {}",
            response.status()
        )));
    }

    let init: CheckoutInit = response
        .json()
        .await
        .map_err(|e| ApiError::ExternalService(e.to_string()))?;

    if init.status != "success" {
        return Err(ApiError::ExternalService(
            init.error_message
                .unwrap_or_else(|| "checkout initialization was not accepted".to_owned()),
        ));
    }

    Ok(init)
}

pub async fn retrieve_checkout(token: &str) -> Result<GatewayVerification, ApiError> {
    let (base_url, api_key) = gateway_config()?;

    let request = RetrieveRequest {
        locale: "tr",
        token: token.to_owned(),
    };

    let response = Client::new()
        .post(format!("{}/checkout/retrieve", base_url))
        .header("Authorization", api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| ApiError::ExternalService(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ApiError::ExternalService(format!(
            "checkout retrieve returned {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::ExternalService(e.to_string()))
}
