//! OpenAPI Documentation
//!
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    BalanceData, OpenAccountData, OpenAccountRequest, TransferData, TransferRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KYC Ledger API",
        version = "1.0.0",
        description = "Risk-gated account opening, balance lookup and atomic transfers between accounts.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::account::open_account,
        crate::gateway::handlers::account::get_balance,
        crate::gateway::handlers::transfer::create_transfer,
        crate::gateway::handlers::health::health_check,
    ),
    components(
        schemas(
            OpenAccountRequest,
            OpenAccountData,
            BalanceData,
            TransferRequest,
            TransferData,
            HealthResponse,
        )
    ),
    tags(
        (name = "Account", description = "Account opening and balances"),
        (name = "Transfer", description = "Fund transfers between accounts"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
