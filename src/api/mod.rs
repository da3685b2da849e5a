// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        BalanceResponse, CreateWalletRequest, CreateWalletResponse, HealthResponse,
        SendTokenRequest, SendTokenResponse,
    },
    state::AppState,
};

pub mod balance;
pub mod health;
pub mod transfer;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallet", post(wallet::create_wallet))
        .route("/wallet/send", post(transfer::send_token))
        .route("/wallet/balance", get(balance::check_balance))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet::create_wallet,
        transfer::send_token,
        balance::check_balance,
        health::health
    ),
    components(
        schemas(
            CreateWalletRequest,
            CreateWalletResponse,
            SendTokenRequest,
            SendTokenResponse,
            BalanceResponse,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Wallet", description = "Custodial wallet provisioning"),
        (name = "Transfer", description = "Token transfers between custodial wallets"),
        (name = "Balance", description = "Token balance reads"),
        (name = "Health", description = "Service liveness")
    )
)]
struct ApiDoc;
