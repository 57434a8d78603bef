use callback_server::{self, app, configs, logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    verify_other_config_files()?;

    let config = configs::Config::new()?;
    let _guard = logger::setup(
        &config.log,
        callback_server::service_name!(),
        [
            callback_server::service_name!(),
            "callback_server",
            "external_services",
            "tower_http",
        ],
    );

    tokio::try_join!(
        app::metrics_server_builder(config.clone()),
        app::server_builder(config)
    )?;

    logger::info!("payment callback service stopped");
    Ok(())
}

/// Fails fast when a config file of another environment no longer matches
/// the `Config` shape.
#[cfg(debug_assertions)]
fn verify_other_config_files() -> Result<(), callback_server::error::ConfigurationError> {
    for environment in ["sandbox.toml", "production.toml"] {
        let path = configs::workspace_path().join("config").join(environment);
        configs::Config::new_with_config_path(Some(path))?;
    }
    Ok(())
}
