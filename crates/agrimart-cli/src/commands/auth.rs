use agrimart_api_models::{LoginRequest, LoginResponse};
use agrimart_guard::{CredentialStore, StoredCredential};
use anyhow::anyhow;
use tracing::info;

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, classify_problem, send};
use crate::output::{render_banner, render_user};

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let username = args.username.trim().to_string();
    if username.is_empty() {
        return Err(CliError::validation("username must not be empty"));
    }
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?,
    };
    if password.is_empty() {
        return Err(CliError::validation("password must not be empty"));
    }

    let url = ctx.endpoint(&ctx.login_path)?;
    let response = send(
        ctx.client
            .post(url)
            .json(&LoginRequest { username, password }),
        &ctx.login_path,
    )
    .await?;

    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let issued = response
        .json::<LoginResponse>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse login response: {err}")))?;
    let credential = StoredCredential::issued(issued.token, &issued.user)
        .map_err(|err| CliError::failure(anyhow!("failed to encode identity: {err}")))?;
    ctx.store
        .set_both(&credential)
        .map_err(|err| CliError::failure(anyhow!("failed to store credential: {err}")))?;

    info!(role = %issued.user.role, "credential stored");
    println!("Signed in as {} ({})", issued.user.name, issued.user.role);
    Ok(())
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.store
        .clear_both()
        .map_err(|err| CliError::failure(anyhow!("failed to clear credential: {err}")))?;
    println!("Signed out.");
    Ok(())
}

pub(crate) async fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let session = ctx.authorize(None).await?;
    render_banner(&session.user, format);
    render_user(&session.user, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_api_models::Role;
    use agrimart_guard::MemoryCredentialStore;
    use agrimart_test_support::fixtures::{issued_credential, sample_user};
    use agrimart_test_support::mocks::{ScriptedVerifier, VerifyScript};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    use crate::client::test_context;

    #[tokio::test]
    async fn login_stores_token_and_identity_together() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"username": "asha", "password": "s3cret"}));
            then.status(200).json_body(json!({
                "token": "fresh",
                "user": {"userId": "d-1", "username": "asha", "role": "designer", "name": "Asha"}
            }));
        });
        let store = Arc::new(MemoryCredentialStore::default());
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable));
        let ctx = test_context(&server.base_url(), store.clone(), verifier);

        handle_login(
            &ctx,
            LoginArgs {
                username: " asha ".into(),
                password: Some("s3cret".into()),
            },
        )
        .await
        .expect("login succeeds");

        mock.assert();
        let stored = store.get().expect("snapshot");
        assert_eq!(stored.token.as_deref(), Some("fresh"));
        let cached = stored
            .cached_user()
            .expect("user stored")
            .expect("user parses");
        assert_eq!(cached.role, Role::Designer);
    }

    #[tokio::test]
    async fn rejected_login_leaves_store_untouched() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401).json_body(json!({"message": "Invalid credentials"}));
        });
        let previous = issued_credential("old", &sample_user(Role::Admin)).expect("credential");
        let store = Arc::new(MemoryCredentialStore::with(previous.clone()));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable));
        let ctx = test_context(&server.base_url(), store.clone(), verifier);

        let err = handle_login(
            &ctx,
            LoginArgs {
                username: "asha".into(),
                password: Some("wrong".into()),
            },
        )
        .await
        .expect_err("login rejected");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("Invalid credentials"));
        assert_eq!(store.get().expect("snapshot"), previous);
    }

    #[tokio::test]
    async fn blank_username_is_validation_error() {
        let store = Arc::new(MemoryCredentialStore::default());
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable));
        let ctx = test_context("http://127.0.0.1:5000", store, verifier);

        let err = handle_login(
            &ctx,
            LoginArgs {
                username: "  ".into(),
                password: Some("x".into()),
            },
        )
        .await
        .expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn logout_clears_both_keys() {
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &sample_user(Role::Admin)).expect("credential"),
        ));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable));
        let ctx = test_context("http://127.0.0.1:5000", store.clone(), verifier);

        handle_logout(&ctx).expect("logout");
        assert!(store.get().expect("snapshot").is_empty());
    }

    #[tokio::test]
    async fn whoami_uses_cached_identity_when_offline() {
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &sample_user(Role::Designer)).expect("credential"),
        ));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable));
        let ctx = test_context("http://127.0.0.1:5000", store, verifier.clone());

        handle_whoami(&ctx, OutputFormat::Json)
            .await
            .expect("cached identity admitted");
        assert_eq!(verifier.tokens(), vec!["abc".to_string()]);
    }
}
