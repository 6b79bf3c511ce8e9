// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use metaview::admin;
use metaview::app_state::AppState;
use metaview::bootstrap;
use metaview::config::{ActorRole, ValidatedConfig};
use metaview::content::YamlItemStore;
use metaview::extensions::ExtensionRegistry;
use metaview::logging;
use metaview::runtime_paths::RuntimePaths;

const HELP_TEXT: &str = "Usage: metaview [-C <root>] [-h|--help]\n\n  -C <root>    runtime directory holding config.yaml and items/ (default: .)\n  -h, --help   show this help\n";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args_from(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.help {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    let config = bootstrap.validated_config;
    if let Err(error) = logging::init_logging(config.log_level(), logging::default_level_rules())
    {
        eprintln!("❌ Failed to initialize logger: {}", error);
        return 1;
    }

    let runtime_paths = bootstrap.runtime_paths;
    match System::new().block_on(async move { serve(config, runtime_paths).await }) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server error: {}", error);
            1
        }
    }
}

async fn serve(config: ValidatedConfig, runtime_paths: RuntimePaths) -> std::io::Result<()> {
    log_startup_info(&config, &runtime_paths);

    let config = Arc::new(config);
    let store = Arc::new(YamlItemStore::new(runtime_paths.items_dir.clone()));
    let app_state = Arc::new(AppState::new(
        store,
        ExtensionRegistry::new(),
        config.export.link_lifetime,
    ));
    info!("✅ Item store and export nonce store initialized");

    let bind_address = (config.server.host.clone(), config.server.port);
    let workers = config.server.workers;

    HttpServer::new(move || {
        let config_for_admin = config.clone();
        App::new()
            .app_data(web::Data::from(config.clone()))
            .app_data(web::Data::from(app_state.clone()))
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(move |cfg| admin::configure(cfg, &config_for_admin))
    })
    .workers(workers)
    .bind(bind_address)?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {}", config.app.name);
    info!("Workers: {}", config.server.workers);
    info!(
        "Admin screens available at: http://{}:{}{}",
        config.server.host, config.server.port, config.admin.path
    );
    let super_admins = config
        .actors
        .iter()
        .filter(|actor| actor.role == ActorRole::SuperAdmin)
        .count();
    info!(
        "Actors: {} configured, {} super-admin(s)",
        config.actors.len(),
        super_admins
    );
    info!(
        "Export links expire after {} seconds",
        config.export.link_lifetime.as_secs()
    );
    info!("Items directory (canonical): {}", runtime_paths.items_dir.display());
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

#[derive(Debug)]
struct ParsedArgs {
    runtime_root: PathBuf,
    help: bool,
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    let mut help = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--" => continue,
            "-h" | "--help" => help = true,
            "-C" => {
                let value = args
                    .next()
                    .ok_or_else(|| "Missing value for -C".to_string())?;
                runtime_root = PathBuf::from(value);
            }
            other => return Err(format!("Unexpected argument '{}'", other)),
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        help,
    })
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults_to_current_dir() {
        let parsed = parse_args_from(Vec::new()).expect("parse args");
        assert!(!parsed.help);
        assert!(parsed.runtime_root.is_absolute());
    }

    #[test]
    fn parse_args_accepts_runtime_root() {
        let parsed = parse_args_from(args(&["-C", "runtime"])).expect("parse args");
        assert!(parsed.runtime_root.ends_with("runtime"));
    }

    #[test]
    fn parse_args_ignores_double_dash() {
        let parsed = parse_args_from(args(&["--", "-C", "/srv/meta"])).expect("parse args");
        assert_eq!(parsed.runtime_root, std::path::PathBuf::from("/srv/meta"));
    }

    #[test]
    fn parse_args_accepts_help_flags() {
        assert!(parse_args_from(args(&["-h"])).expect("parse").help);
        assert!(
            parse_args_from(args(&["-C", "x", "--help"]))
                .expect("parse")
                .help
        );
    }

    #[test]
    fn parse_args_rejects_missing_root_value() {
        assert!(parse_args_from(args(&["-C"])).is_err());
    }

    #[test]
    fn parse_args_rejects_unknown_arguments() {
        assert!(parse_args_from(args(&["serve"])).is_err());
    }
}
