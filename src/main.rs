use stock_ledger::{ApiClient, Config, InventoryForm, load_week, render_week};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let week = load_week(&config.week_path)
        .await
        .inspect_err(|err| error!("{err}"))?;

    let mut form = InventoryForm::new();
    form.load_week(&week);

    if let Some(item_id) = config.item_id {
        let client = ApiClient::from_config(&config)?;
        info!(item_id, api = client.base_url(), "looking up item");
        form.select_item(&client, item_id).await?;
    }

    form.recalculate();
    print!("{}", render_week(&form));

    Ok(())
}
