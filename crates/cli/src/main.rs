//! Échoppe CLI - drive the shop state layer from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then sign in
//! echoppe register -e marin@example.com -u marin -p hunter2 --firstname Marin --lastname Leroy
//! echoppe login -u marin -p hunter2
//!
//! # Fill the cart and place an order
//! echoppe cart add --id 1 --title "Sac de voyage" --price 40
//! echoppe cart add --id 1 --title "Sac de voyage" --price 40
//! echoppe cart show
//! echoppe checkout
//!
//! # Inspect and manage the order history
//! echoppe orders
//! echoppe order-status --id lx2m9aQ4B7C --status shipped
//! ```
//!
//! State is persisted under the configured data directory, so sessions and
//! carts survive between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use echoppe_core::OrderStatus;

mod commands;

#[derive(Parser)]
#[command(name = "echoppe")]
#[command(author, version, about = "Échoppe shop client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(long)]
        firstname: String,

        /// Last name
        #[arg(long)]
        lastname: String,

        /// City
        #[arg(long, default_value = "")]
        city: String,

        /// Street
        #[arg(long, default_value = "")]
        street: String,

        /// House number
        #[arg(long, default_value_t = 0)]
        number: u32,

        /// Postal code
        #[arg(long, default_value = "")]
        zipcode: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Sign in and persist the session
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the current session
    Whoami,
    /// Delete the account and its local data
    DeleteAccount,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order from the current cart
    Checkout,
    /// List the current user's orders, newest first
    Orders,
    /// Change an order's status
    OrderStatus {
        /// Order id
        #[arg(long)]
        id: String,

        /// New status (`processing`, `validated`, `shipped`, `cancelled`)
        #[arg(long)]
        status: OrderStatus,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: i32,

        /// Product title
        #[arg(long)]
        title: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Product image URL
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove a product's line entirely
    Remove {
        /// Product id
        #[arg(long)]
        id: i32,
    },
    /// Set a line's quantity (0 removes it)
    SetQuantity {
        /// Product id
        #[arg(long)]
        id: i32,

        /// New quantity
        #[arg(long)]
        quantity: u32,
    },
    /// Show the cart with subtotal, shipping, and total
    Show,
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Register {
            email,
            username,
            password,
            firstname,
            lastname,
            city,
            street,
            number,
            zipcode,
            phone,
        } => {
            commands::auth::register(commands::auth::RegisterArgs {
                email,
                username,
                password,
                firstname,
                lastname,
                city,
                street,
                number,
                zipcode,
                phone,
            })
            .await?;
        }
        Commands::Login { username, password } => {
            commands::auth::login(&username, &password).await?;
        }
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::DeleteAccount => commands::auth::delete_account().await?,
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                title,
                price,
                image,
            } => commands::cart::add(id, title, price, image).await?,
            CartAction::Remove { id } => commands::cart::remove(id).await?,
            CartAction::SetQuantity { id, quantity } => {
                commands::cart::set_quantity(id, quantity).await?;
            }
            CartAction::Show => commands::cart::show().await?,
            CartAction::Clear => commands::cart::clear().await?,
        },
        Commands::Checkout => commands::orders::checkout().await?,
        Commands::Orders => commands::orders::list().await?,
        Commands::OrderStatus { id, status } => {
            commands::orders::set_status(&id, status).await?;
        }
    }
    Ok(())
}
