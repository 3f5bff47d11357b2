//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 specification for the Passgate ceremony API.

use utoipa::OpenApi;

use crate::handlers::{HealthResponse, ReadyResponse};
use crate::types::{
    FinishAuthenticationRequest, FinishAuthenticationResponse, FinishRegistrationRequest,
    FinishRegistrationResponse, StartCeremonyResponse, StartRegistrationRequest,
};

/// Passgate WebAuthn API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Passgate - WebAuthn Relying Party API",
        version = "0.1.0",
        description = r#"
## WebAuthn ceremony endpoints

Passgate drives the two-phase WebAuthn ceremonies:

1. **Register**: `POST /webauthn/register/start` mints a one-shot challenge,
   the browser calls `navigator.credentials.create()`, and
   `POST /webauthn/register/finish` verifies the attestation and stores the
   credential.
2. **Authenticate**: `POST /webauthn/authenticate/start` mints a challenge
   (no username required), the browser calls `navigator.credentials.get()`,
   and `POST /webauthn/authenticate/finish` verifies the assertion and
   advances the signature counter.

Challenges are single-use and expire after the configured TTL. Binary
fields are URL-safe base64.
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/passgate-rs/passgate/blob/main/LICENSE"
        )
    ),
    servers(
        (url = "https://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::handlers::registration::start_registration,
        crate::handlers::registration::finish_registration,
        crate::handlers::authentication::start_authentication,
        crate::handlers::authentication::finish_authentication,
    ),
    components(schemas(
        StartRegistrationRequest,
        StartCeremonyResponse,
        FinishRegistrationRequest,
        FinishRegistrationResponse,
        FinishAuthenticationRequest,
        FinishAuthenticationResponse,
        HealthResponse,
        ReadyResponse,
    )),
    tags(
        (name = "Registration", description = "Credential enrollment ceremony"),
        (name = "Authentication", description = "Login ceremony"),
    )
)]
pub struct ApiDoc;
