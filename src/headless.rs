use crate::command_script::CommandScriptPlayer;
use crate::commands::{execute_command, parse_command};
use crate::config::{load_catalog, AppConfig};
use anyhow::{Context, Result};
use blockstack_assets::MeshNode;
use blockstack_client::Session;
use blockstack_core::Millis;
use blockstack_render::{RenderSurface, TextSurface};
use blockstack_testkit::{EventRecord, JsonlSink};
use blockstack_world::{FileStore, KvStore};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub app: AppConfig,
    pub blocks_path: PathBuf,
    pub store_dir: PathBuf,
    pub command_script: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
    pub reset: bool,
}

/// Run one session against the file store and return the lines to print.
///
/// Without a script the session only restores and lists the stack.
pub fn run(cfg: HeadlessConfig) -> Result<Vec<String>> {
    let script = match cfg.command_script.as_deref() {
        Some(path) => Some(
            CommandScriptPlayer::from_path(path)
                .with_context(|| format!("Failed to load command script {}", path.display()))?,
        ),
        None => None,
    };
    let session_config = cfg.app.session.clone().sanitized();
    let store = prepare_store(&cfg.store_dir, &session_config.storage_key, cfg.reset)?;
    let mut sink = match cfg.event_log.as_deref() {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("Failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    let catalog = load_catalog(&cfg.blocks_path);
    let mut session = Session::new(session_config, store);
    let mut surface = TextSurface::new(cfg.app.display.transform());
    let mut output = Vec::new();

    let mut now = Millis::ZERO;
    session.start(catalog, now);
    record_events(&mut session, sink.as_mut())?;

    if let Some(mut script) = script {
        while !script.is_finished() {
            let Some(wake) = script.next_wake(session.pending_write_due()) else {
                break;
            };
            now = wake;
            session.tick(now);
            for line in script.drain_ready_commands(now) {
                match parse_command(&line, session.catalog()) {
                    Ok(command) => {
                        output.push(format!("[{now}] > {line}"));
                        output.extend(execute_command(&mut session, &mut surface, &command, now));
                    }
                    Err(err) => {
                        warn!(command = %line, %err, "Skipping invalid script command");
                        output.push(format!("[{now}] ! {err}"));
                    }
                }
            }
            record_events(&mut session, sink.as_mut())?;
        }
    }

    if session.shutdown(now) {
        info!(at = %now, "Flushed pending write on shutdown");
    }
    record_events(&mut session, sink.as_mut())?;

    surface.draw(session.blocks());
    output.extend(surface.frame().lines().map(str::to_string));
    Ok(output)
}

/// Open the store, dropping this session's slot first when `reset` is set.
///
/// Other slots and unrelated files in `dir` are left alone.
fn prepare_store(dir: &Path, key: &str, reset: bool) -> Result<FileStore> {
    let mut store = FileStore::new(dir)?;
    if reset {
        store
            .remove(key)
            .with_context(|| format!("Failed to reset slot {key}"))?;
        info!(path = %store.slot_path(key).display(), "Reset block slot");
    }
    Ok(store)
}

fn record_events<S: KvStore>(
    session: &mut Session<MeshNode, S>,
    sink: Option<&mut JsonlSink>,
) -> Result<()> {
    let events = session.drain_events();
    let Some(sink) = sink else {
        return Ok(());
    };
    for (at, event) in events {
        let payload = event.to_string();
        sink.write(&EventRecord {
            at,
            kind: event.kind(),
            payload: &payload,
        })?;
    }
    Ok(())
}
