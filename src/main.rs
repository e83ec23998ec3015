use quizdesk::{
    app_state::AppState,
    config::{BootstrapAdmin, Config},
};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if !cfg!(debug_assertions) {
        config.validate_for_production();
    }
    let bootstrap_admin = config.bootstrap_admin.clone();

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(admin) = bootstrap_admin {
        if let Err(e) = seed_admin_user(&state, &admin).await {
            log::error!("Failed to seed admin user: {}", e);
        }
    }

    let token_watch = match state.start().await {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Failed to restore session: {}", e);
            state.teardown(None);
            std::process::exit(1);
        }
    };

    match state.sessions.get() {
        Some(session) => log::info!(
            "Signed in as '{}' ({})",
            session.user.username,
            session.user.role
        ),
        None => log::info!("No active session"),
    }

    state.sessions.on_change(|session| match session {
        Some(session) => log::info!("Session changed: signed in as '{}'", session.user.username),
        None => log::info!("Session changed: signed out"),
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }

    state.teardown(Some(token_watch));
}

async fn seed_admin_user(
    state: &AppState,
    admin: &BootstrapAdmin,
) -> quizdesk::errors::AppResult<()> {
    state
        .auth_service
        .ensure_bootstrap_admin(
            &admin.name,
            &admin.email,
            &admin.username,
            admin.password.expose_secret(),
        )
        .await?;
    Ok(())
}
