// StreamOne ION client library for Rust
// Copyright (C) 2025 StreamOne ION SDK contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use streamone_ion::api::customers::ListCustomersOptions;
use streamone_ion::api::orders::ListOrdersOptions;
use streamone_ion::api::products::ListProductsOptions;
use streamone_ion::api::reports::{RelativeDateRange, ReportDateRange, ReportsModule};
use streamone_ion::api::subscriptions::ListSubscriptionsOptions;
use streamone_ion::v1::ListInvoicesOptions;
use streamone_ion::IonClient;

#[derive(Parser)]
#[command(name = "ion-cli")]
#[command(about = "StreamOne ION CLI - Desktop testing tool", long_about = None)]
struct Cli {
    /// Path to the JSON credential file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List customers (v3)
    Customers {
        /// Results per page
        #[arg(long)]
        page_size: Option<u32>,
        /// Filter by customer name
        #[arg(long)]
        name: Option<String>,
    },
    /// List subscriptions (v3)
    Subscriptions {
        /// Filter by customer ID
        #[arg(long)]
        customer: Option<String>,
        /// Filter by subscription status
        #[arg(long)]
        status: Option<String>,
    },
    /// List the account's orders (v3)
    Orders {
        /// Filter by order status
        #[arg(long)]
        status: Option<String>,
    },
    /// List products (v3)
    Products {
        /// Filter by marketing display name
        #[arg(long)]
        name: Option<String>,
    },
    /// List report specifications (v3)
    Reports,
    /// Export a report's data to a CSV file (v3)
    ExportReport {
        /// Report ID
        report_id: String,
        /// Report category
        #[arg(long, default_value = "BILLING")]
        category: String,
        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the account's own invoices (v1)
    Invoices {
        /// Maximum number of invoices
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamone_ion=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = IonClient::from_config_path(&cli.config)
        .await
        .with_context(|| format!("loading credentials from {}", cli.config.display()))?;

    match cli.command {
        Commands::Customers { page_size, name } => {
            let options = ListCustomersOptions {
                page_size,
                customer_name: name,
                ..Default::default()
            };
            let mut customers = client.list_customers(&options).await?;
            while let Some(customer) = customers.try_next().await? {
                println!("{}", serde_json::to_string(&customer)?);
            }
        }
        Commands::Subscriptions { customer, status } => {
            let options = ListSubscriptionsOptions {
                customer_id: customer,
                subscription_status: status,
                ..Default::default()
            };
            let mut subscriptions = client.list_subscriptions(&options).await?;
            while let Some(subscription) = subscriptions.try_next().await? {
                println!("{}", serde_json::to_string(&subscription)?);
            }
        }
        Commands::Orders { status } => {
            let options = ListOrdersOptions {
                status,
                ..Default::default()
            };
            let mut orders = client.list_account_orders(&options).await?;
            while let Some(order) = orders.try_next().await? {
                println!("{}", serde_json::to_string(&order)?);
            }
        }
        Commands::Products { name } => {
            let options = ListProductsOptions {
                name,
                ..Default::default()
            };
            let mut products = client.list_products(&options).await?;
            while let Some(product) = products.try_next().await? {
                println!("{}", serde_json::to_string(&product)?);
            }
        }
        Commands::Reports => {
            for report in client.list_reports(ReportsModule::default()).await? {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Commands::ExportReport {
            report_id,
            category,
            output,
        } => {
            let path = client
                .export_report_csv(
                    &report_id,
                    ReportsModule::default(),
                    &category,
                    ReportDateRange::Relative(RelativeDateRange::MonthToDate),
                    output,
                )
                .await?;
            println!("wrote {}", path.display());
        }
        Commands::Invoices { limit } => {
            let options = ListInvoicesOptions {
                limit,
                ..Default::default()
            };
            let invoices = client.get_my_invoices(&options).await?;
            println!("{}", serde_json::to_string_pretty(&invoices)?);
        }
    }

    Ok(())
}
