use clap::{Args, Subcommand};
use hermod_subscribers::SubscriberStore;
use hermod_subscribers_postgres::{PostgresConfig, PostgresSubscriberStore};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SubscribersArgs {
    /// PostgreSQL connection URL for the subscriber store.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: SubscribersCommand,
}

#[derive(Subcommand, Debug)]
pub enum SubscribersCommand {
    /// Add an address (starts unconfirmed).
    Add {
        /// Email address.
        address: String,
    },
    /// Confirm an address so it receives newsletters.
    Confirm {
        /// Email address.
        address: String,
    },
    /// Unsubscribe an address.
    Unsubscribe {
        /// Email address.
        address: String,
    },
    /// Count addresses that have not unsubscribed.
    Count,
    /// List addresses eligible for newsletter delivery.
    Eligible,
}

pub async fn run(args: &SubscribersArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = PostgresSubscriberStore::new(PostgresConfig {
        url: args.database_url.clone(),
        ..PostgresConfig::default()
    })
    .await?;

    match &args.command {
        SubscribersCommand::Add { address } => {
            store.subscribe(address).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "address": address, "subscribed": true }));
                }
                OutputFormat::Text => println!("Subscribed '{address}'."),
            }
            Ok(())
        }
        SubscribersCommand::Confirm { address } => {
            let found = store.confirm(address).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "address": address, "confirmed": found }));
                }
                OutputFormat::Text => {
                    if found {
                        println!("Confirmed '{address}'.");
                    } else {
                        eprintln!("Address '{address}' is not subscribed.");
                    }
                }
            }
            if !found {
                std::process::exit(1);
            }
            Ok(())
        }
        SubscribersCommand::Unsubscribe { address } => {
            let found = store.unsubscribe(address).await?;
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({ "address": address, "unsubscribed": found })
                    );
                }
                OutputFormat::Text => {
                    if found {
                        println!("Unsubscribed '{address}'.");
                    } else {
                        eprintln!("Address '{address}' is not subscribed.");
                    }
                }
            }
            if !found {
                std::process::exit(1);
            }
            Ok(())
        }
        SubscribersCommand::Count => {
            let count = store.active_count().await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "active": count }));
                }
                OutputFormat::Text => println!("{count} active subscribers."),
            }
            Ok(())
        }
        SubscribersCommand::Eligible => {
            let addresses = store.eligible_addresses().await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&addresses)?);
                }
                OutputFormat::Text => {
                    for address in &addresses {
                        println!("{address}");
                    }
                }
            }
            Ok(())
        }
    }
}
