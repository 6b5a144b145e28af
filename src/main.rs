mod config;
mod error;
mod fsops;
mod gate;
mod models;
mod resolve;
mod routes;
mod session;

use std::fs;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use config::AppConfig;
use resolve::PathResolver;
use routes::{register, register_test};
use session::SessionAuthority;
use tokio::signal;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub resolver: PathResolver,
    pub authority: SessionAuthority,
}

#[derive(Parser, Debug)]
#[command(name = "mist", about = "Expose the server's local filesystem over HTTP")]
struct Args {
    /// Serve only the diagnostic placeholder endpoint, with no auth at all.
    #[arg(long)]
    test: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let config = AppConfig::from_env().expect("failed to load config");

    fs::create_dir_all(&config.log_dir).expect("failed to create log directory");
    let file_appender = rolling::never(&config.log_dir, "mist.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let _guard = guard;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("failed to init logging filter");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    info!(
        host = %config.host,
        port = config.port,
        root = %config.root.display(),
        "starting mist"
    );
    if args.test {
        info!("running the test version");
        info!("test template @ http://{}:{}/test", config.host, config.port);
    } else {
        info!("running the default version");
        info!("dirs visible @ http://{}:{}/dir", config.host, config.port);
        info!(
            "file content shown @ http://{}:{}/file",
            config.host, config.port
        );
    }

    tokio::spawn(handle_shutdown_signals());

    let bind_addr = format!("{}:{}", config.host, config.port);
    let shared_state = web::Data::new(AppState {
        resolver: PathResolver::new(config.root.clone()),
        authority: SessionAuthority::new(config.username.clone(), config.password.clone()),
    });
    let assets_dir = config.assets_dir.clone();
    let test_mode = args.test;

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(shared_state.clone());
        if test_mode {
            app.configure(register_test)
        } else {
            app.service(Files::new("/static", assets_dir.clone()))
                .configure(register)
        }
    })
    .disable_signals()
    .bind(bind_addr)?
    .run()
    .await
}

/// Interrupt or terminate logs a goodbye and exits immediately; in-flight
/// requests are not drained.
async fn handle_shutdown_signals() {
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        _ = signal::ctrl_c() => {}
        _ = terminate => {}
    }
    info!("quitting mist... see you!");
    std::process::exit(1);
}
