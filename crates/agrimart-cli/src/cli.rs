//! Argument parsing and command dispatch.

use std::path::PathBuf;

use agrimart_config::{ConfigOverrides, ConsoleConfig};
use agrimart_telemetry::{LoggingConfig, console_span, init_logging};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::Url;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::commands::auth::{handle_login, handle_logout, handle_whoami};
use crate::commands::orders::{
    handle_custom_order_create, handle_order_list, handle_order_status, handle_payment_success,
};
use crate::commands::products::{
    handle_catalog_list, handle_product_add, handle_product_list, handle_product_remove,
    handle_product_update,
};

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let request_id = Uuid::new_v4().to_string();

    let ctx = match prepare(&cli, &request_id) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let span = console_span(command_name, &request_id);
    match dispatch(cli, &ctx).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            if let CliError::AccessDenied { reason, .. } = &err {
                eprintln!("reason: {reason}");
            }
            err.exit_code()
        }
    }
}

fn prepare(cli: &Cli, request_id: &str) -> CliResult<AppContext> {
    let config = agrimart_config::load(cli.config.as_deref(), cli.overrides())?;
    install_logging(&config);
    AppContext::from_config(&config, request_id)
}

fn install_logging(config: &ConsoleConfig) {
    let logging = LoggingConfig {
        level: &config.log_level,
        format: config.log_format,
        build_sha: option_env!("AGRIMART_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging unavailable: {err}");
    }
}

pub(crate) async fn dispatch(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    let format = cli.output;
    match cli.command {
        Command::Login(args) => handle_login(ctx, args).await,
        Command::Logout => handle_logout(ctx),
        Command::Whoami => handle_whoami(ctx, format).await,
        Command::Products(CatalogCommand::Ls(args)) => handle_catalog_list(ctx, args, format).await,
        Command::Admin(AdminCommand::Products(products)) => match products {
            AdminProductCommand::Ls => handle_product_list(ctx, format).await,
            AdminProductCommand::Add(args) => handle_product_add(ctx, args, format).await,
            AdminProductCommand::Update(args) => handle_product_update(ctx, args, format).await,
            AdminProductCommand::Rm(args) => handle_product_remove(ctx, args, format).await,
        },
        Command::Admin(AdminCommand::Orders(orders)) => match orders {
            AdminOrderCommand::Ls => handle_order_list(ctx, DashboardRole::Admin, format).await,
            AdminOrderCommand::Status(args) => handle_order_status(ctx, args, format).await,
        },
        Command::Designer(DesignerCommand::Orders(orders)) => match orders {
            DesignerOrderCommand::Ls => {
                handle_order_list(ctx, DashboardRole::Designer, format).await
            }
            DesignerOrderCommand::New(args) => {
                handle_custom_order_create(ctx, args, format).await
            }
            DesignerOrderCommand::Paid(args) => handle_payment_success(ctx, args, format).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "agrimart", about = "Operator console for the Agrimart storefront")]
pub(crate) struct Cli {
    #[arg(long, global = true, help = "Path to a JSON configuration document")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, global = true, value_parser = parse_url)]
    pub(crate) api_url: Option<Url>,
    #[arg(long, global = true, help = "Seconds to wait for token verification")]
    pub(crate) verify_timeout: Option<u64>,
    #[arg(long, global = true, help = "Path to the credential document")]
    pub(crate) credentials: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Deny instead of trusting the cached identity when the API is unreachable"
    )]
    pub(crate) no_offline_fallback: bool,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            verify_timeout_secs: self.verify_timeout,
            credentials_path: self.credentials.clone(),
            offline_fallback: self.no_offline_fallback.then_some(false),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and store the issued credential.
    Login(LoginArgs),
    /// Forget the stored credential.
    Logout,
    /// Show the identity the stored credential resolves to.
    Whoami,
    /// Public product catalogue.
    #[command(subcommand)]
    Products(CatalogCommand),
    /// Product and order management (admin role).
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Custom-order intake (designer role).
    #[command(subcommand)]
    Designer(DesignerCommand),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "AGRIMART_USERNAME")]
    pub(crate) username: String,
    #[arg(long, env = "AGRIMART_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum CatalogCommand {
    Ls(CatalogListArgs),
}

#[derive(Args, Default)]
pub(crate) struct CatalogListArgs {
    #[arg(long, help = "Only show products in this category")]
    pub(crate) category: Option<String>,
    #[arg(long, help = "Only show products currently in stock")]
    pub(crate) in_stock: bool,
}

#[derive(Subcommand)]
pub(crate) enum AdminCommand {
    #[command(subcommand)]
    Products(AdminProductCommand),
    #[command(subcommand)]
    Orders(AdminOrderCommand),
}

#[derive(Subcommand)]
pub(crate) enum AdminProductCommand {
    Ls,
    Add(ProductAddArgs),
    Update(ProductUpdateArgs),
    Rm(ProductRemoveArgs),
}

#[derive(Args)]
pub(crate) struct ProductAddArgs {
    #[arg(help = "JSON file describing the product")]
    pub(crate) file: PathBuf,
}

#[derive(Args)]
pub(crate) struct ProductUpdateArgs {
    #[arg(help = "Product identifier")]
    pub(crate) id: String,
    #[arg(help = "JSON file describing the product")]
    pub(crate) file: PathBuf,
}

#[derive(Args)]
pub(crate) struct ProductRemoveArgs {
    #[arg(help = "Product identifier")]
    pub(crate) id: String,
}

#[derive(Subcommand)]
pub(crate) enum AdminOrderCommand {
    Ls,
    Status(OrderStatusArgs),
}

#[derive(Args)]
pub(crate) struct OrderStatusArgs {
    #[arg(help = "Order identifier")]
    pub(crate) id: String,
    #[arg(help = "New fulfilment status, e.g. processing or delivered")]
    pub(crate) status: String,
}

#[derive(Subcommand)]
pub(crate) enum DesignerCommand {
    #[command(subcommand)]
    Orders(DesignerOrderCommand),
}

#[derive(Subcommand)]
pub(crate) enum DesignerOrderCommand {
    Ls,
    New(CustomOrderArgs),
    Paid(PaymentSuccessArgs),
}

#[derive(Args)]
pub(crate) struct CustomOrderArgs {
    #[arg(long, help = "Customer name")]
    pub(crate) name: String,
    #[arg(long, help = "Customer mobile number")]
    pub(crate) mobile: String,
    #[arg(long, help = "Design description")]
    pub(crate) design: String,
    #[arg(long, help = "Free-form measurements")]
    pub(crate) measurements: String,
    #[arg(long, help = "Total bill")]
    pub(crate) total: f64,
    #[arg(long, default_value_t = 0.0, help = "Advance already paid")]
    pub(crate) advance: f64,
    #[arg(long, value_enum, default_value_t = PaymentMethodArg::Cash)]
    pub(crate) payment: PaymentMethodArg,
    #[arg(long, help = "Expected delivery date (YYYY-MM-DD)")]
    pub(crate) delivery: NaiveDate,
    #[arg(long, help = "Order date (YYYY-MM-DD), defaults to today")]
    pub(crate) placed: Option<NaiveDate>,
}

#[derive(Args)]
pub(crate) struct PaymentSuccessArgs {
    #[arg(help = "Order identifier")]
    pub(crate) id: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PaymentMethodArg {
    Cash,
    Online,
}

/// Dashboard an order listing is requested from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DashboardRole {
    Admin,
    Designer,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Products(CatalogCommand::Ls(_)) => "products_ls",
        Command::Admin(AdminCommand::Products(products)) => match products {
            AdminProductCommand::Ls => "admin_products_ls",
            AdminProductCommand::Add(_) => "admin_products_add",
            AdminProductCommand::Update(_) => "admin_products_update",
            AdminProductCommand::Rm(_) => "admin_products_rm",
        },
        Command::Admin(AdminCommand::Orders(orders)) => match orders {
            AdminOrderCommand::Ls => "admin_orders_ls",
            AdminOrderCommand::Status(_) => "admin_orders_status",
        },
        Command::Designer(DesignerCommand::Orders(orders)) => match orders {
            DesignerOrderCommand::Ls => "designer_orders_ls",
            DesignerOrderCommand::New(_) => "designer_orders_new",
            DesignerOrderCommand::Paid(_) => "designer_orders_paid",
        },
    }
}
