use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rutero::catalog::{RouteCatalog, RouteOrdering};
use rutero::config::Config;
use rutero::notify::Notifier;
use rutero::providers::backend::BackendClient;
use rutero::proximity;
use rutero::session::SessionManager;
use rutero::storage::CredentialStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    config.validate();
    tracing::info!(api = %config.api_base_url, "Loaded configuration");

    let store = CredentialStore::open(Path::new(&config.store_path))
        .await
        .expect("Failed to open credential store");
    let session = SessionManager::new(store);
    let client = BackendClient::new(&config.api_base_url).expect("Failed to build backend client");
    let notifier = Notifier::new();

    match session.restore(&client).await {
        Ok(true) => tracing::info!(role = ?session.role_name(), "Session restored"),
        Ok(false) => tracing::info!("No usable stored session, browsing anonymously"),
        Err(err) => tracing::warn!(error = %err, "Could not read the credential store"),
    }

    let token = session.auth_token();
    let routes = if session.is_admin() {
        // Routes and pending proposals are independent fetches.
        let (routes, pending) = futures::join!(
            client.list_routes(token.as_deref()),
            client.pending_proposals(token.as_deref()),
        );
        match pending {
            Ok(pending) => tracing::info!(count = pending.len(), "Pending route proposals"),
            Err(err) => {
                session.handle_backend_error(&err).await;
                tracing::warn!(error = %err, "Could not fetch pending proposals");
            }
        }
        routes
    } else {
        client.list_routes(token.as_deref()).await
    };

    let routes = match routes {
        Ok(routes) => routes,
        Err(err) => {
            session.handle_backend_error(&err).await;
            notifier.error("Rutas", "No se pudieron cargar las rutas");
            tracing::error!(error = %err, "Could not fetch routes");
            return;
        }
    };
    tracing::info!(count = routes.len(), "Loaded routes");

    let mut catalog = RouteCatalog::new();
    catalog.set_routes(routes);

    let viewer = config.viewer_position;
    if viewer.is_some() {
        catalog.set_ordering(RouteOrdering::Proximity);
    }

    for route in catalog.visible(viewer) {
        let distance = proximity::start_distance_label(&route.path.points(), viewer);
        tracing::info!(
            from = %route.from,
            to = %route.to,
            kind = route.kind.as_str(),
            distance = distance.as_deref().unwrap_or("-"),
            "Route"
        );
    }
}
