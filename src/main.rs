//! # go2web - Entry Point
//! src/main.rs
//!
//! Hace un fetch e imprime status, headers y body crudos.

use go2web::client::Fetcher;
use go2web::config::Config;
use go2web::logging;
use log::{debug, warn};

fn main() {
    let config = Config::new();

    logging::init_logger(config.log_level_filter());

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }

    if log::log_enabled!(log::Level::Debug) {
        config.print_summary();
    }

    let fetcher = match Fetcher::from_config(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("💥 Error fatal: {}", e);
            std::process::exit(1);
        }
    };

    let fetched = match fetcher.fetch(&config.url) {
        Ok(fetched) => fetched,
        Err(e) => {
            eprintln!("💥 Error: {}", e);
            std::process::exit(1);
        }
    };

    if !fetched.is_final() {
        warn!("Respuesta intermedia: {:?}", fetched.outcome());
    }
    debug!("Cadena de redirects: {:?}", fetched.chain());

    let (status, headers, body) = fetched.into_parts();
    println!("{}", headers.get("Status").unwrap_or(status.as_str()));
    for (name, value) in headers.iter().filter(|(name, _)| *name != "Status") {
        println!("{}: {}", name, value);
    }
    println!();
    println!("{}", body);
}
