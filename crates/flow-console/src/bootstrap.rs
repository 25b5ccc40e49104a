//! Wires settings, the backend client, session storage, and the use cases
//! into one [`App`].

use std::sync::Arc;

use flow_application::{ArchiveUseCase, AuthUseCase, SessionUseCase, WorkflowUseCase};
use flow_core::backend::{AuthApi, InsightApi, StoryApi, VideoApi};
use flow_core::player::Player;
use flow_core::session::SessionStore;
use flow_infrastructure::{ClientSettings, TomlSessionStore};
use flow_interaction::BackendClient;

use crate::app::App;
use crate::player::ConsolePlayer;

/// Warnings by default, overridable through `RUST_LOG`, and written to
/// stderr so log lines never interleave with the prompt.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves configuration and builds the fully wired console.
pub fn build() -> anyhow::Result<App> {
    let settings = ClientSettings::resolve();
    tracing::info!("[Bootstrap] Backend at {}", settings.backend_url);

    let client = BackendClient::from_settings(&settings);
    let store: Arc<dyn SessionStore> = Arc::new(TomlSessionStore::at_default_location()?);

    let sessions = Arc::new(SessionUseCase::new(store.clone()));
    let auth = Arc::new(AuthUseCase::new(
        Arc::new(client.clone()) as Arc<dyn AuthApi>,
        store,
    ));
    let archive = Arc::new(ArchiveUseCase::new(
        Arc::new(client.clone()) as Arc<dyn VideoApi>
    ));
    let player = Arc::new(ConsolePlayer::default());
    let workflow = Arc::new(WorkflowUseCase::new(
        Arc::new(client.clone()) as Arc<dyn VideoApi>,
        Arc::new(client.clone()) as Arc<dyn StoryApi>,
        Arc::new(client) as Arc<dyn InsightApi>,
        sessions.clone(),
        player.clone() as Arc<dyn Player>,
    ));

    Ok(App::new(
        settings.backend_url,
        auth,
        sessions,
        archive,
        workflow,
        player,
    ))
}
