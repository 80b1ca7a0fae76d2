use std::path::Path;

use agrimart_api_models::{Product, ProductDraft, ProductListResponse, Role};
use anyhow::{Context, anyhow};

use crate::cli::{CatalogListArgs, OutputFormat, ProductAddArgs, ProductRemoveArgs, ProductUpdateArgs};
use crate::client::{AppContext, CliError, CliResult, classify_problem, path_id, send};
use crate::output::{render_banner, render_product_list};

const PRODUCTS_PATH: &str = "/api/products";

pub(crate) async fn handle_catalog_list(
    ctx: &AppContext,
    args: CatalogListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let url = ctx.endpoint(PRODUCTS_PATH)?;
    let response = send(ctx.client.get(url), PRODUCTS_PATH).await?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let list = parse_product_list(response).await?;
    let products = filter_products(list.products, args.category.as_deref(), args.in_stock);
    render_product_list(&products, format)
}

pub(crate) async fn handle_product_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let session = ctx.authorize(Some(&Role::Admin)).await?;
    render_banner(&session.user, format);

    let url = ctx.endpoint(PRODUCTS_PATH)?;
    let response = send(session.bearer(ctx.client.get(url)), PRODUCTS_PATH).await?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let list = parse_product_list(response).await?;
    render_product_list(&list.products, format)
}

pub(crate) async fn handle_product_add(
    ctx: &AppContext,
    args: ProductAddArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let draft = read_draft(&args.file)?;
    let session = ctx.authorize(Some(&Role::Admin)).await?;
    render_banner(&session.user, format);

    let url = ctx.endpoint(PRODUCTS_PATH)?;
    let response = send(session.bearer(ctx.client.post(url).json(&draft)), PRODUCTS_PATH).await?;
    if response.status().is_success() {
        println!("Product '{}' created.", draft.name);
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_product_update(
    ctx: &AppContext,
    args: ProductUpdateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = path_id(&args.id)?;
    let draft = read_draft(&args.file)?;
    let session = ctx.authorize(Some(&Role::Admin)).await?;
    render_banner(&session.user, format);

    let path = format!("{PRODUCTS_PATH}/{id}");
    let url = ctx.endpoint(&path)?;
    let response = send(session.bearer(ctx.client.put(url).json(&draft)), &path).await?;
    if response.status().is_success() {
        println!("Product '{}' updated (id: {id}).", draft.name);
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_product_remove(
    ctx: &AppContext,
    args: ProductRemoveArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = path_id(&args.id)?;
    let session = ctx.authorize(Some(&Role::Admin)).await?;
    render_banner(&session.user, format);

    let path = format!("{PRODUCTS_PATH}/{id}");
    let url = ctx.endpoint(&path)?;
    let response = send(session.bearer(ctx.client.delete(url)), &path).await?;
    if response.status().is_success() {
        println!("Product removed (id: {id}).");
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}

async fn parse_product_list(response: reqwest::Response) -> CliResult<ProductListResponse> {
    response
        .json::<ProductListResponse>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse product list: {err}")))
}

fn read_draft(path: &Path) -> CliResult<ProductDraft> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;
    let draft: ProductDraft = serde_json::from_str(&payload)
        .map_err(|err| CliError::validation(format!("product file is not valid: {err}")))?;
    draft
        .validate()
        .map_err(|(field, reason)| CliError::validation(format!("invalid product: {field} {reason}")))?;
    Ok(draft)
}

fn filter_products(products: Vec<Product>, category: Option<&str>, in_stock: bool) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| {
            category.is_none_or(|category| product.category.eq_ignore_ascii_case(category.trim()))
        })
        .filter(|product| !in_stock || product.in_stock)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_guard::MemoryCredentialStore;
    use agrimart_test_support::fixtures::{issued_credential, sample_user};
    use agrimart_test_support::mocks::{ScriptedVerifier, VerifyScript};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    use crate::client::test_context;

    fn product(id: &str, category: &str, in_stock: bool) -> serde_json::Value {
        json!({
            "_id": id,
            "name": format!("Product {id}"),
            "category": category,
            "price": 1200.0,
            "inStock": in_stock
        })
    }

    fn admin_context(server: &MockServer, verifier: VerifyScript) -> AppContext {
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &sample_user(Role::Admin)).expect("credential"),
        ));
        test_context(&server.base_url(), store, Arc::new(ScriptedVerifier::new(verifier)))
    }

    #[test]
    fn filter_matches_category_case_insensitively_and_stock() {
        let products: Vec<Product> = serde_json::from_value(json!([
            product("1", "Silk", true),
            product("2", "cotton", true),
            product("3", "silk", false),
        ]))
        .expect("products");

        let silk = filter_products(products.clone(), Some("SILK"), false);
        assert_eq!(silk.len(), 2);
        let stocked_silk = filter_products(products.clone(), Some("silk"), true);
        assert_eq!(stocked_silk.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), ["1"]);
        assert_eq!(filter_products(products, None, false).len(), 3);
    }

    #[tokio::test]
    async fn catalog_list_is_public() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200)
                .json_body(json!({"products": [product("1", "silk", true)]}));
        });
        let ctx = test_context(
            &server.base_url(),
            Arc::new(MemoryCredentialStore::default()),
            Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable)),
        );

        handle_catalog_list(&ctx, CatalogListArgs::default(), OutputFormat::Table)
            .await
            .expect("catalog listed");
        mock.assert();
    }

    #[tokio::test]
    async fn product_add_posts_normalised_draft_with_bearer() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/products")
                .header("authorization", "Bearer abc")
                .json_body(json!({
                    "name": "Banarasi Silk",
                    "category": "silk",
                    "shortDescription": "",
                    "fullDescription": "",
                    "features": ["zari border", "handwoven"],
                    "price": 5400.0,
                    "discount": 0.0,
                    "inStock": true,
                    "sizes": [],
                    "colors": [],
                    "material": "",
                    "careInstructions": [],
                    "tags": ["wedding"]
                }));
            then.status(201).json_body(product("9", "silk", true));
        });
        let ctx = admin_context(&server, VerifyScript::Grant(sample_user(Role::Admin)));
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("product.json");
        std::fs::write(
            &file,
            r#"{"name":"Banarasi Silk","category":"silk","price":5400,"features":"zari border, handwoven,","tags":["wedding"," "]}"#,
        )
        .expect("write draft");

        handle_product_add(&ctx, ProductAddArgs { file }, OutputFormat::Table)
            .await
            .expect("product created");
        mock.assert();
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/products");
            then.status(201);
        });
        let ctx = admin_context(&server, VerifyScript::Grant(sample_user(Role::Admin)));
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("product.json");
        std::fs::write(&file, r#"{"name":" ","category":"silk","price":10}"#).expect("write");

        let err = handle_product_add(&ctx, ProductAddArgs { file }, OutputFormat::Table)
            .await
            .expect_err("invalid draft");
        assert_eq!(err.exit_code(), 2);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn bad_identifier_fails_before_verification() {
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &sample_user(Role::Admin)).expect("credential"),
        ));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Grant(sample_user(
            Role::Admin,
        ))));
        let ctx = test_context("http://127.0.0.1:5000", store, verifier.clone());

        let err = handle_product_remove(
            &ctx,
            ProductRemoveArgs { id: " ".into() },
            OutputFormat::Table,
        )
        .await
        .expect_err("blank id");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn designer_cannot_remove_products() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/products/p-1");
            then.status(200);
        });
        let ctx = admin_context(&server, VerifyScript::Grant(sample_user(Role::Designer)));

        let err = handle_product_remove(
            &ctx,
            ProductRemoveArgs { id: "p-1".into() },
            OutputFormat::Table,
        )
        .await
        .expect_err("denied");
        assert_eq!(err.exit_code(), 4);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn product_update_surfaces_backend_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path("/api/products/p-1");
            then.status(409).json_body(json!({"message": "duplicate product name"}));
        });
        let ctx = admin_context(&server, VerifyScript::Grant(sample_user(Role::Admin)));
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("product.json");
        std::fs::write(&file, r#"{"name":"Tussar","category":"silk","price":10}"#).expect("write");

        let err = handle_product_update(
            &ctx,
            ProductUpdateArgs {
                id: "p-1".into(),
                file,
            },
            OutputFormat::Table,
        )
        .await
        .expect_err("conflict");
        assert!(matches!(err, CliError::Validation(ref message) if message == "duplicate product name"));
    }
}
