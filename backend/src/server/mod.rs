//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

#[cfg(debug_assertions)]
use user_service::ApiDoc;
use user_service::inbound::http::error::ErrorBodyPolicy;
use user_service::inbound::http::state::HttpState;
use user_service::inbound::http::users;
use user_service::middleware::ResponseMapper;
use user_service::settings::Listener;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    http_state: web::Data<HttpState>,
    policy: ErrorBodyPolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .wrap(ResponseMapper::new(policy))
        .configure(users::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server serving the user routes.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the listener fails.
pub fn create_server(
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        listener,
        error_body_policy,
        client_timeout,
    } = config;

    let server = HttpServer::new(move || build_app(http_state.clone(), error_body_policy))
        .client_request_timeout(client_timeout)
        .client_disconnect_timeout(client_timeout);

    let server = match listener {
        Listener::Tcp(addr) => {
            let server = server.bind(addr)?;
            info!(%addr, "listening on tcp");
            server
        }
        #[cfg(unix)]
        Listener::Unix(path) => {
            let server = server.bind_uds(&path)?;
            info!(path = %path.display(), "listening on unix socket");
            server
        }
        #[cfg(not(unix))]
        Listener::Unix(path) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("unix sockets are unavailable here: {}", path.display()),
            ));
        }
    };

    Ok(server.run())
}
