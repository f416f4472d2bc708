use actix_web::{middleware::Logger as ActixLogger, web, App, HttpServer};
use log::{error, info, trace, warn};
use std::{
    env as stdenv,
    io::ErrorKind,
    path::Path,
    process::{exit, id as process_id},
    sync::Arc,
};
use videopack_checkout::{
    catalog::Catalog,
    config::{load_env_file, CheckoutSettings, ServerSettings},
    cors::{build_cors, check_env_cors, load_and_validate_cors_origins, CORS_FILE},
    keep_alive::spawn_keep_alive,
    logger::setup_logger,
    routes::{self, AppState, SettingsSource},
    NAME, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let this_script_relative_path = stdenv::args().next().unwrap_or_default();

    setup_logger();
    load_env_file();
    check_env_cors();

    info!("{} {} ({})", NAME, VERSION, this_script_relative_path);
    info!("PID: {}", process_id());

    let settings = ServerSettings::from_env();
    let target_server = settings.bind_address();

    let cors_origins = match load_and_validate_cors_origins(CORS_FILE) {
        Ok(origins) => {
            info!("CORS origins loaded successfully.");
            origins
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let pwd = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
            warn!(
                "{} not found in {}, cross-origin requests will be refused",
                CORS_FILE,
                pwd.display()
            );
            Vec::new()
        }
        Err(e) => {
            error!("Failed to load or validate all CORS origins: {}", e);
            exit(1);
        }
    };
    info!("Allowed cors_origins: {:?}", cors_origins);

    let catalog = match Catalog::load(settings.catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Catalog could not be loaded: {}", e);
            exit(1);
        }
    };
    info!("Serving {} packages", catalog.offerings().len());

    if std::net::TcpListener::bind(&target_server).is_err() {
        error!("Port {} is already in use.", settings.port);
        exit(52);
    }

    let http = reqwest::Client::new();
    let api_base = settings.stripe_api_base.clone();
    let checkout_settings: SettingsSource = Arc::new(move || CheckoutSettings::from_env(&api_base));
    let state = match AppState::new(
        catalog,
        http.clone(),
        &settings.contact_endpoint,
        checkout_settings,
        settings.public_base_url.clone(),
    ) {
        Ok(state) => state,
        Err(e) => {
            error!("Templates failed to load: {:?}", e);
            exit(1);
        }
    };

    let keep_alive = spawn_keep_alive(
        http,
        settings.keep_alive_url.clone(),
        settings.keep_alive_every,
    );

    let server = HttpServer::new(move || {
        let cors = build_cors(&cors_origins);
        trace!("cors: {:?}", cors);

        App::new()
            .wrap(ActixLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&target_server)?
    .run();

    info!("Server running at http://{}", target_server);

    let execution = server.await;
    keep_alive.abort();
    info!("Worker stopped with PID: {}", process_id());

    if let Err(e) = execution {
        error!("Failed to start the server: {:?}", e);
        return Err(e);
    }
    Ok(())
}
