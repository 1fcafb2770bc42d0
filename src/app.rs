use std::{io, sync::Arc};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::{
    Result,
    config::Config,
    controller::{Action, BridgeSettings, Flow, InputRouter, PlayerBridge, SeekSettings},
    model::{AppEvent, AppState, AppStatePatch, AppStore, WindowSizePatch},
    services::player::{PlayerControl, Playerctl, ServiceError},
    terminal::{self, RawModeGuard},
    view::{self, TerminalRenderer},
};

/// Runs tuneline against `playerctl` until the exit key is pressed or the
/// player service fails.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put in raw mode, terminal
/// input fails, or the player service cannot be started.
pub async fn run(config: Config) -> Result<()> {
    let control: Arc<dyn PlayerControl> = Arc::new(Playerctl::new(config.player.binary.clone()));
    run_with(&config, control).await
}

/// Runs tuneline against any player service.
///
/// # Errors
///
/// See [`run`].
#[instrument(skip_all)]
pub async fn run_with(config: &Config, control: Arc<dyn PlayerControl>) -> Result<()> {
    let store = Arc::new(AppStore::new(AppState::initial(terminal::window_size())));
    view::attach(&store, TerminalRenderer::new(io::stdout()));

    let (fatal_sender, mut fatal) = mpsc::unbounded_channel();
    let bridge = PlayerBridge::new(
        Arc::clone(&store),
        Arc::clone(&control),
        BridgeSettings::from(&config.player),
        fatal_sender,
    );
    let mut router = InputRouter::new(
        Arc::clone(&store),
        control,
        SeekSettings::from(&config.seek),
    );

    terminal::install_panic_hook();
    let raw_mode = RawModeGuard::enable()?;
    info!("Terminal ready");

    let outcome = match bridge.start().await {
        Ok(()) => event_loop(&store, &mut router, &mut fatal).await,
        Err(e) => Err(e.into()),
    };

    router.cancel_pending();
    store.publish(
        AppEvent::Exit,
        AppStatePatch {
            exited: Some(true),
            ..AppStatePatch::default()
        },
    );
    drop(raw_mode);

    info!(ok = outcome.is_ok(), "Shutting down");
    outcome
}

async fn event_loop(
    store: &AppStore,
    router: &mut InputRouter,
    fatal: &mut mpsc::UnboundedReceiver<ServiceError>,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = Action::from_key(&key) {
                        if router.handle(action) == Flow::Exit {
                            return Ok(());
                        }
                    }
                }
                Some(Ok(Event::Resize(width, height))) => {
                    debug!(width, height, "Terminal resized");
                    store.publish(
                        AppEvent::Update,
                        AppStatePatch {
                            window_size: Some(WindowSizePatch {
                                width: Some(width),
                                height: Some(height),
                            }),
                            ..AppStatePatch::default()
                        },
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(error) = fatal.recv() => return Err(error.into()),
        }
    }
}
