use hermod_gateway::{Mailer, MailerConfig};

use crate::OutputFormat;

#[allow(clippy::unused_async)]
pub async fn run(format: &OutputFormat) -> anyhow::Result<()> {
    let config = MailerConfig::from_env();
    let selected = config.provider;
    let mailer = Mailer::new(config);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "selected": selected.as_str(),
                    "active": mailer.provider_name(),
                })
            );
        }
        OutputFormat::Text => println!("{}", mailer.provider_name()),
    }

    Ok(())
}
