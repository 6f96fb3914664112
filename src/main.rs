use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use taskcrew::{
    auth::{AuthMiddleware, AuthService, SessionIssuer},
    config::Config,
    notify::LogNotifier,
    routes,
    store::{PgTokenStore, PgUserStore},
    AppAuthService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // The signing secret and mail identity are read once and handed to the
    // components that need them; nothing reads the environment after startup.
    let issuer = SessionIssuer::new(&config.jwt_secret);
    let notifier = LogNotifier::new(&config.mail_sender, &config.frontend_url);

    let auth_service: AppAuthService = AuthService::new(
        PgUserStore::new(pool.clone()),
        PgTokenStore::new(pool.clone()),
        notifier,
        issuer.clone(),
    );
    let auth_service = web::Data::new(auth_service);

    log::info!("Starting TaskCrew server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(auth_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(issuer.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
