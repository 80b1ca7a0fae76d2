use agrimart_api_models::{
    CustomOrderCreated, CustomOrderRequest, OrderListResponse, OrderStatusUpdate, PaymentMethod,
    PaymentSuccessUpdate, Role,
};
use anyhow::anyhow;
use chrono::{Local, NaiveDate};

use crate::cli::{
    CustomOrderArgs, DashboardRole, OrderStatusArgs, OutputFormat, PaymentMethodArg,
    PaymentSuccessArgs,
};
use crate::client::{AppContext, CliError, CliResult, classify_problem, path_id, send};
use crate::output::{format_amount, render_banner, render_order_list};

const ORDERS_PATH: &str = "/api/orders";
const CUSTOM_ORDERS_PATH: &str = "/api/orders/custom";

const fn required_role(dashboard: DashboardRole) -> Role {
    match dashboard {
        DashboardRole::Admin => Role::Admin,
        DashboardRole::Designer => Role::Designer,
    }
}

pub(crate) async fn handle_order_list(
    ctx: &AppContext,
    dashboard: DashboardRole,
    format: OutputFormat,
) -> CliResult<()> {
    let session = ctx.authorize(Some(&required_role(dashboard))).await?;
    render_banner(&session.user, format);

    let url = ctx.endpoint(ORDERS_PATH)?;
    let response = send(session.bearer(ctx.client.get(url)), ORDERS_PATH).await?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let list = response
        .json::<OrderListResponse>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse order list: {err}")))?;
    render_order_list(&list.orders, format)
}

pub(crate) async fn handle_order_status(
    ctx: &AppContext,
    args: OrderStatusArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = path_id(&args.id)?;
    let status = args.status.trim();
    if status.is_empty() {
        return Err(CliError::validation("status must not be empty"));
    }
    let session = ctx.authorize(Some(&Role::Admin)).await?;
    render_banner(&session.user, format);

    let path = format!("{ORDERS_PATH}/{id}/status");
    let url = ctx.endpoint(&path)?;
    let body = OrderStatusUpdate {
        status: status.to_string(),
    };
    let response = send(session.bearer(ctx.client.patch(url).json(&body)), &path).await?;
    if response.status().is_success() {
        println!("Order {id} status set to '{status}'.");
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_custom_order_create(
    ctx: &AppContext,
    args: CustomOrderArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let request = build_custom_order(&args, Local::now().date_naive())?;
    let session = ctx.authorize(Some(&Role::Designer)).await?;
    render_banner(&session.user, format);

    let url = ctx.endpoint(CUSTOM_ORDERS_PATH)?;
    let response = send(
        session.bearer(ctx.client.post(url).json(&request)),
        CUSTOM_ORDERS_PATH,
    )
    .await?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let created = response
        .json::<CustomOrderCreated>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse order response: {err}")))?;
    let id = created.identifier().unwrap_or("<unknown>");
    println!(
        "Order created (id: {id}) for {}: total {}, advance {}, balance {}.",
        request.name,
        format_amount(request.total_bill),
        format_amount(request.advance_payment),
        format_amount(request.total_bill - request.advance_payment)
    );
    if request.payment_method == PaymentMethod::Online {
        println!(
            "Payment pending: collect the online payment, then run `agrimart designer orders paid {id}`."
        );
    }
    Ok(())
}

pub(crate) async fn handle_payment_success(
    ctx: &AppContext,
    args: PaymentSuccessArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = path_id(&args.id)?;
    let session = ctx.authorize(Some(&Role::Designer)).await?;
    render_banner(&session.user, format);

    let path = format!("{ORDERS_PATH}/{id}/payment-success");
    let url = ctx.endpoint(&path)?;
    let response = send(
        session.bearer(ctx.client.patch(url).json(&PaymentSuccessUpdate::default())),
        &path,
    )
    .await?;
    if response.status().is_success() {
        println!("Payment marked as successful (id: {id}).");
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}

fn required_text(value: &str, field: &str) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn build_custom_order(args: &CustomOrderArgs, today: NaiveDate) -> CliResult<CustomOrderRequest> {
    if !args.total.is_finite() || args.total < 0.0 {
        return Err(CliError::validation("total must be a non-negative amount"));
    }
    if !args.advance.is_finite() || args.advance < 0.0 || args.advance > args.total {
        return Err(CliError::validation(
            "advance must be between 0 and the total bill",
        ));
    }
    let placed = args.placed.unwrap_or(today);
    if args.delivery < placed {
        return Err(CliError::validation(
            "delivery date must not be before the order date",
        ));
    }

    let payment_method = match args.payment {
        PaymentMethodArg::Cash => PaymentMethod::Cash,
        PaymentMethodArg::Online => PaymentMethod::Online,
    };
    Ok(CustomOrderRequest {
        name: required_text(&args.name, "name")?,
        mobile: required_text(&args.mobile, "mobile")?,
        design_description: required_text(&args.design, "design")?,
        measurements: required_text(&args.measurements, "measurements")?,
        total_bill: args.total,
        advance_payment: args.advance,
        payment_method,
        payment_status: payment_method.initial_status(),
        present_date: placed,
        delivery_date: args.delivery,
    })
}
