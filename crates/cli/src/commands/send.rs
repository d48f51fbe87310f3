use clap::Args;
use hermod_core::{Email, SendOutcome};
use hermod_gateway::Mailer;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient address (repeat for multiple recipients).
    #[arg(long, required = true)]
    pub to: Vec<String>,
    /// Subject line.
    #[arg(long)]
    pub subject: String,
    /// HTML body (string or @file path).
    #[arg(long)]
    pub html: Option<String>,
    /// Plain-text body (string or @file path).
    #[arg(long)]
    pub text: Option<String>,
    /// Sender address (overrides the configured default).
    #[arg(long)]
    pub from: Option<String>,
    /// Reply-To address.
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Tag forwarded to the provider (repeat for multiple tags).
    #[arg(long)]
    pub tag: Vec<String>,
}

fn read_body(input: &str) -> anyhow::Result<String> {
    if let Some(path) = input.strip_prefix('@') {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(input.to_string())
    }
}

pub async fn run(args: &SendArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut email = Email::to_many(args.to.clone(), args.subject.clone());
    if let Some(html) = &args.html {
        email = email.with_html(read_body(html)?);
    }
    if let Some(text) = &args.text {
        email = email.with_text(read_body(text)?);
    }
    if let Some(from) = &args.from {
        email = email.with_from(from.clone());
    }
    if let Some(reply_to) = &args.reply_to {
        email = email.with_reply_to(reply_to.clone());
    }
    if !args.tag.is_empty() {
        email = email.with_tags(args.tag.clone());
    }

    let mailer = Mailer::from_env();
    let outcome = mailer.send(email).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Text => match &outcome {
            SendOutcome::Sent {
                message_id: Some(id),
            } => println!("Sent ({id})."),
            SendOutcome::Sent { message_id: None } => println!("Sent."),
            SendOutcome::Failed { error } => eprintln!("Delivery failed: {error}"),
        },
    }

    if !outcome.is_sent() {
        std::process::exit(1);
    }
    Ok(())
}
