use clap::Args;
use hermod_gateway::Mailer;
use hermod_subscribers_postgres::{PostgresConfig, PostgresSubscriberStore};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct NewsletterArgs {
    /// Subject line for the issue.
    #[arg(long)]
    pub subject: String,
    /// HTML body (string or @file path).
    #[arg(long)]
    pub html: String,
    /// Plain-text body (string or @file path).
    #[arg(long)]
    pub text: Option<String>,
    /// PostgreSQL connection URL for the subscriber store.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

fn read_body(input: &str) -> anyhow::Result<String> {
    if let Some(path) = input.strip_prefix('@') {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(input.to_string())
    }
}

pub async fn run(args: &NewsletterArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let html = read_body(&args.html)?;
    let text = match &args.text {
        Some(text) => Some(read_body(text)?),
        None => None,
    };

    let store = PostgresSubscriberStore::new(PostgresConfig {
        url: args.database_url.clone(),
        ..PostgresConfig::default()
    })
    .await?;

    let mailer = Mailer::from_env();
    let report = mailer
        .send_newsletter(&store, &args.subject, &html, text.as_deref())
        .await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Newsletter dispatched: {} of {} sent, {} failed.",
                report.sent, report.total, report.failed
            );
        }
    }

    Ok(())
}
