use hermod_gateway::Mailer;

use crate::OutputFormat;

pub async fn run(format: &OutputFormat) -> anyhow::Result<()> {
    let mailer = Mailer::from_env();
    let healthy = mailer.verify().await;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "provider": mailer.provider_name(), "healthy": healthy })
            );
        }
        OutputFormat::Text => {
            if healthy {
                println!("Provider '{}' is reachable.", mailer.provider_name());
            } else {
                eprintln!("Provider '{}' verification failed.", mailer.provider_name());
            }
        }
    }

    if !healthy {
        std::process::exit(1);
    }
    Ok(())
}
