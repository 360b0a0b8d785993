//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"secret"}
//! POST /api/v1/login    {"username":"alice","password":"secret"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_password, parse_username};

const USERNAME_FIELD: FieldName = FieldName::new("username");
const PASSWORD_FIELD: FieldName = FieldName::new("password");

/// Credentials body shared by `register` and `login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Account representation returned after register and login. The password
/// verifier never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub username: String,
    pub role: String,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
        }
    }
}

/// Create a new account and establish a session for it straight away.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let username = parse_username(&body.username, USERNAME_FIELD, state.validation_mode)?;
    let password = parse_password(&body.password, PASSWORD_FIELD)?;
    let user = state.accounts.register(username, &password).await?;
    session.persist_actor(&Actor::from(&user))?;
    Ok(HttpResponse::Created().json(AccountResponse::from(&user)))
}

/// Check credentials and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let username = parse_username(&body.username, USERNAME_FIELD, state.validation_mode)?;
    let password = parse_password(&body.password, PASSWORD_FIELD)?;
    let user = state.accounts.login(&username, &password).await?;
    session.persist_actor(&Actor::from(&user))?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(&user)))
}

/// End the session. Safe to call without one; always 200.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::test_app;

    fn credentials(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn register_returns_created_with_the_account() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials("alice", "secret"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session"),
            "registration establishes a session"
        );
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(body["username"], "alice");
        assert_eq!(body["role"], "member");
    }

    #[rstest]
    #[actix_web::test]
    async fn registering_the_reserved_name_grants_admin() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials("admin", "secret"))
                .to_request(),
        )
        .await;

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(body["role"], "admin");
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_register_conflicts() {
        let app = actix_test::init_service(test_app()).await;
        for _ in 0..2 {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/register")
                    .set_json(credentials("alice", "secret"))
                    .to_request(),
            )
            .await;
            if response.status() == StatusCode::CREATED {
                continue;
            }
            assert_eq!(response.status(), StatusCode::CONFLICT);
            return;
        }
        panic!("second registration should conflict");
    }

    #[rstest]
    #[case("alice1", "secret", "username")]
    #[case("alice", "short", "password")]
    #[actix_web::test]
    async fn invalid_fields_are_rejected_with_details(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials(username, password))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_sets_a_session_cookie() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials("alice", "secret"))
                .to_request(),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials("alice", "secret"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_and_unknown_user_share_a_message() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials("alice", "secret"))
                .to_request(),
        )
        .await;

        let mut messages = Vec::new();
        for creds in [credentials("alice", "wrong!"), credentials("ghost", "secret")] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/login")
                    .set_json(creds)
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body: Value =
                serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_without_a_session_is_fine() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
