use anyhow::Result;
use clap::Parser;
use mindflow_server::app::App;
use mindflow_server::models::Config;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "mindflow-server")]
#[command(about = "Serve the Mindflow personality analysis and portrait API")]
struct CliArgs {
    /// Address to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT).
    #[arg(long, short)]
    port: Option<u16>,
}

impl CliArgs {
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindflow_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mindflow-server");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = App::from_config(config).run().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_port_overrides_config() {
        let config = Config::from_lookup(|_| None).unwrap();
        let args = CliArgs::parse_from(["mindflow-server", "--port", "8081"]);
        let config = args.apply(config);
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let config = Config::from_lookup(|key| (key == "PORT").then(|| "5000".to_string())).unwrap();
        let args = CliArgs::parse_from(["mindflow-server"]);
        assert_eq!(args.apply(config).port, 5000);
    }
}
