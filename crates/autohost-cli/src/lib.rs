use std::io::{self, Write};

use autohost_plugin_api::UnloadReason;
use autohost_plugin_host::{HostAction, PluginRunner};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

pub mod session;

use session::{SessionCommand, parse_line};

/// Written on first start when no config file exists
pub const EXAMPLE_CONFIG: &str = r#"# Autohost Configuration
# Edit this file to configure the host and its plugins

[host]
version = "0.13.35"
lobby_login = "MyAutohost"
# "clear_on_disconnect" or "retain"
lobby_handler_policy = "clear_on_disconnect"
preset = "default"

# Autohost access level per lobby user
[users]
MyAdmin = 100

[plugins.HelloWorld]
enabled = true

[plugins.ForbiddenWords]
enabled = true

[plugins.ForbiddenWords.global]
words = "foo;bar"

[plugins.ForbiddenWords.presets.default]
immuneLevel = 100

[plugins.TimePlugin]
enabled = false

[plugins.TimePlugin.global]
commandsFile = "timePlugin.conf"
helpFile = "timePlugin.dat"
"#;

/// Load plugins from the catalog by name, returning how many were loaded
pub fn load_plugins(runner: &mut PluginRunner, names: &[String]) -> usize {
    let mut loaded = 0;
    for name in names {
        if load_plugin(runner, name) {
            loaded += 1;
        }
    }
    loaded
}

fn load_plugin(runner: &mut PluginRunner, name: &str) -> bool {
    let Some(module) = autohost_plugins::find(name) else {
        warn!("Unknown plugin: {}", name);
        return false;
    };

    match runner.load_plugin(module) {
        Ok(()) => true,
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}

/// Render a host action the way it would go out to the lobby
pub fn format_action(action: &HostAction) -> Option<String> {
    match action {
        HostAction::Log { .. } => None,
        HostAction::SayPrivate { user, text } => Some(format!("SAYPRIVATE {} {}", user, text)),
        HostAction::SayBattle { text } => Some(format!("SAYBATTLE {}", text)),
        HostAction::Answer { source, text } => Some(format!("[{}] {}", source, text)),
        HostAction::QueueLobbyCommand { args } => Some(args.join(" ")),
    }
}

/// Write every pending action, plugin log entries are left to tracing
pub fn write_actions<W: Write>(
    action_rx: &mut UnboundedReceiver<HostAction>,
    out: &mut W,
) -> io::Result<usize> {
    let mut written = 0;
    while let Ok(action) = action_rx.try_recv() {
        if let Some(line) = format_action(&action) {
            writeln!(out, "{}", line)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Replay a session script against the runner
///
/// Lines that fail to parse are logged and skipped.
pub async fn run_session<R, W>(
    runner: &mut PluginRunner,
    action_rx: &mut UnboundedReceiver<HostAction>,
    reader: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("Session line {}: {}", line_number, e);
                continue;
            }
        };

        debug!("Session line {}: {:?}", line_number, command);
        apply(runner, command);
        write_actions(action_rx, out)?;
    }

    Ok(())
}

fn apply(runner: &mut PluginRunner, command: SessionCommand) {
    match command {
        SessionCommand::Event(event) => runner.handle_event(event),
        SessionCommand::SetAccessLevel { user, level } => {
            runner.set_user_access_level(&user, level)
        }
        SessionCommand::SetPreset(preset) => runner.set_preset(&preset),
        SessionCommand::Load(name) => {
            load_plugin(runner, &name);
        }
        SessionCommand::Unload(name) => {
            let name = autohost_plugins::find(&name)
                .map(|module| module.name().to_string())
                .unwrap_or(name);
            if let Err(e) = runner.unload_plugin(&name, UnloadReason::Unloaded) {
                warn!("{}", e);
            }
        }
    }
}
