// End-to-end tests running the shipped plugins inside the host runtime

use autohost_plugin_api::{BridgeText, CommandOutcome, CommandSource, LobbyCommand, LobbyState, UnloadReason};
use autohost_plugin_host::{AutohostConfig, HostAction, HostError, PluginRunner, PluginState};
use autohost_plugins::{
    ForbiddenWordsModule, HelloWorldModule, MyConfigurablePluginModule, MyNewCommandPluginModule,
    TimePluginModule, catalog,
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

const CONFIG: &str = r#"
[host]
version = "0.13.35"
lobby_login = "MyAutohost"

[users]
Admin = 100
Player = 10

[plugins.ForbiddenWords.global]
words = "foo;bar"

[plugins.ForbiddenWords.presets.default]
immuneLevel = 100

[plugins.TimePlugin.global]
commandsFile = "timePlugin.conf"
helpFile = "timePlugin.dat"

[plugins.MyNewCommandPlugin.global]
commandsFile = "myNewCommandPlugin.conf"
helpFile = "myNewCommandPlugin.dat"

[plugins.MyConfigurablePlugin.global]
MyGlobalSetting = "global"

[plugins.MyConfigurablePlugin.presets.default]
MyPresetSetting = "preset"
"#;

fn runner_from(config: &str) -> (PluginRunner, UnboundedReceiver<HostAction>) {
    let config: AutohostConfig = toml::from_str(config).expect("valid config");
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    (PluginRunner::from_config(&config, action_tx), action_rx)
}

fn drain(rx: &mut UnboundedReceiver<HostAction>) -> Vec<HostAction> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

fn side_effects(rx: &mut UnboundedReceiver<HostAction>) -> Vec<HostAction> {
    drain(rx).into_iter().filter(HostAction::is_side_effect).collect()
}

fn kick(user: &str) -> HostAction {
    HostAction::QueueLobbyCommand {
        args: vec!["KICKFROMBATTLE".to_string(), user.to_string()],
    }
}

// ===== MyNewCommandPlugin =====

#[test]
fn test_new_command_plugin_end_to_end() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);

    runner
        .load_plugin(Arc::new(MyNewCommandPluginModule))
        .expect("load");
    let logs = drain(&mut action_rx);
    assert_eq!(logs.len(), 1);
    assert!(matches!(&logs[0], HostAction::Log { message, .. } if message.contains("0.1")));

    let accepted = runner
        .check_command("Player", "myCommand", vec!["anything".into()])
        .expect("check");
    assert!(accepted);
    assert!(drain(&mut action_rx).is_empty());

    let outcome = runner
        .execute_command(
            CommandSource::Battle,
            "Player",
            "myCommand",
            vec!["a".into(), "b".into()],
        )
        .expect("execute");
    assert_eq!(outcome, CommandOutcome::Executed);

    let replies = side_effects(&mut action_rx);
    assert_eq!(replies.len(), 1);
    match &replies[0] {
        HostAction::Answer { source, text } => {
            assert_eq!(source, &CommandSource::Battle);
            assert!(text.contains("a,b"));
            assert!(text.contains("Player"));
        }
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_new_command_plugin_normalizes_byte_params() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);
    runner
        .load_plugin(Arc::new(MyNewCommandPluginModule))
        .expect("load");
    drain(&mut action_rx);

    runner
        .execute_command(
            CommandSource::Private,
            BridgeText::from(&b"Player"[..]),
            "mycommand",
            vec![BridgeText::from(&b"x"[..]), "y".into()],
        )
        .expect("execute");

    assert_eq!(
        side_effects(&mut action_rx),
        vec![HostAction::Answer {
            source: CommandSource::Private,
            text: "User Player called command myCommand with parameter(s) \"x,y\"".to_string(),
        }]
    );
}

// ===== HelloWorld =====

#[test]
fn test_hello_world_answers_hello() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);
    runner.load_plugin(Arc::new(HelloWorldModule)).expect("load");
    drain(&mut action_rx);

    runner.dispatch_private_message(&"Player".into(), &"hello".into());
    assert!(side_effects(&mut action_rx).is_empty());

    runner.dispatch_private_message(&"Player".into(), &BridgeText::from(&b"Hello"[..]));
    assert_eq!(
        side_effects(&mut action_rx),
        vec![HostAction::SayPrivate {
            user: "Player".to_string(),
            text: "Hello World".to_string(),
        }]
    );
}

// ===== TimePlugin =====

#[test]
fn test_time_plugin() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);
    runner.load_plugin(Arc::new(TimePluginModule)).expect("load");
    drain(&mut action_rx);

    assert!(runner.check_command("Player", "time", Vec::new()).expect("check"));
    assert!(drain(&mut action_rx).is_empty());

    runner
        .execute_command(CommandSource::Game, "Player", "time", Vec::new())
        .expect("execute");
    let replies = side_effects(&mut action_rx);
    assert_eq!(replies.len(), 1);
    match &replies[0] {
        HostAction::Answer { source, text } => {
            assert_eq!(source, &CommandSource::Game);
            let time = text
                .strip_prefix("Current local time: ")
                .expect("time prefix");
            assert_eq!(time.len(), 8);
            assert_eq!(time.matches(':').count(), 2);
        }
        other => panic!("unexpected action: {:?}", other),
    }

    runner
        .unload_plugin("TimePlugin", UnloadReason::Unloaded)
        .expect("unload");
    let err = runner
        .execute_command(CommandSource::Game, "Player", "time", Vec::new())
        .unwrap_err();
    assert!(matches!(err, HostError::UnknownCommand(_)));
}

#[test]
fn test_time_plugin_requires_command_files() {
    let (mut runner, _action_rx) = runner_from("");
    let err = runner.load_plugin(Arc::new(TimePluginModule)).unwrap_err();
    assert!(matches!(err, HostError::MissingSetting { .. }));
}

// ===== ForbiddenWords =====

fn synchronized_forbidden_words() -> (PluginRunner, UnboundedReceiver<HostAction>) {
    let (mut runner, mut action_rx) = runner_from(CONFIG);
    runner.set_lobby_state(LobbyState::Synchronized);
    runner
        .load_plugin(Arc::new(ForbiddenWordsModule))
        .expect("load");
    drain(&mut action_rx);
    (runner, action_rx)
}

#[test]
fn test_forbidden_words_requires_whole_word() {
    let (mut runner, mut action_rx) = synchronized_forbidden_words();

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Player", "foobar"));
    assert!(side_effects(&mut action_rx).is_empty());
}

#[test]
fn test_forbidden_words_kicks_once() {
    let (mut runner, mut action_rx) = synchronized_forbidden_words();

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Player", "see FOO here, bar too"));
    assert_eq!(
        side_effects(&mut action_rx),
        vec![
            HostAction::SayBattle {
                text: "Kicking Player from battle (watch your language!)".to_string()
            },
            kick("Player"),
        ]
    );
}

#[test]
fn test_forbidden_words_immune_user() {
    let (mut runner, mut action_rx) = synchronized_forbidden_words();

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Admin", "foo"));
    assert!(side_effects(&mut action_rx).is_empty());

    // Exactly at the threshold is immune too
    runner.set_user_access_level("Player", 100);
    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Player", "foo"));
    assert!(side_effects(&mut action_rx).is_empty());
}

#[test]
fn test_forbidden_words_ignores_own_messages() {
    let (mut runner, mut action_rx) = synchronized_forbidden_words();

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("MyAutohost", "foo"));
    assert!(side_effects(&mut action_rx).is_empty());
}

#[test]
fn test_forbidden_words_without_words_is_noop() {
    let config = CONFIG.replace(r#"words = "foo;bar""#, r#"words = """#);
    let (mut runner, mut action_rx) = runner_from(&config);
    runner.set_lobby_state(LobbyState::Synchronized);
    runner
        .load_plugin(Arc::new(ForbiddenWordsModule))
        .expect("load");
    drain(&mut action_rx);

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Player", "foo bar"));
    assert!(side_effects(&mut action_rx).is_empty());
}

#[test]
fn test_forbidden_words_lifecycle() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);

    runner
        .load_plugin(Arc::new(ForbiddenWordsModule))
        .expect("load");
    assert_eq!(runner.plugin_state("ForbiddenWords"), PluginState::Loaded);
    assert_eq!(runner.registry().handler_count("ForbiddenWords"), 0);

    runner.set_lobby_state(LobbyState::Synchronized);
    assert_eq!(
        runner.plugin_state("ForbiddenWords"),
        PluginState::HandlersActive
    );
    let active = runner.registry().lobby_handler_names("ForbiddenWords");
    assert_eq!(active, vec!["SAIDBATTLE"]);

    runner.set_lobby_state(LobbyState::Disconnected);
    assert_eq!(
        runner.plugin_state("ForbiddenWords"),
        PluginState::HandlersInactive
    );
    assert!(runner.registry().is_empty());

    runner.set_lobby_state(LobbyState::Synchronized);
    assert_eq!(runner.registry().lobby_handler_names("ForbiddenWords"), active);
    drain(&mut action_rx);

    runner.dispatch_lobby_command(&LobbyCommand::said_battle("Player", "bar"));
    assert_eq!(side_effects(&mut action_rx).len(), 2);

    runner
        .unload_plugin("ForbiddenWords", UnloadReason::Unloaded)
        .expect("unload");
    assert!(runner.registry().is_empty());
    assert_eq!(runner.plugin_state("ForbiddenWords"), PluginState::Unloaded);
}

#[test]
fn test_forbidden_words_needs_recent_host() {
    let config = CONFIG.replace(r#"version = "0.13.35""#, r#"version = "0.12.29""#);
    let (mut runner, _action_rx) = runner_from(&config);

    let err = runner
        .load_plugin(Arc::new(ForbiddenWordsModule))
        .unwrap_err();
    assert!(matches!(err, HostError::IncompatibleVersion { .. }));

    // Older plugins still load
    runner.load_plugin(Arc::new(HelloWorldModule)).expect("load");
}

// ===== All plugins =====

#[test]
fn test_configurable_plugin_requires_preset_setting() {
    let config = CONFIG.replace(r#"MyPresetSetting = "preset""#, "");
    let (mut runner, _action_rx) = runner_from(&config);

    let err = runner
        .load_plugin(Arc::new(MyConfigurablePluginModule))
        .unwrap_err();
    assert!(matches!(err, HostError::MissingSetting { .. }));
}

#[test]
fn test_every_plugin_loads_and_unloads_cleanly() {
    let (mut runner, mut action_rx) = runner_from(CONFIG);
    runner.set_lobby_state(LobbyState::Synchronized);

    for module in catalog() {
        let name = module.name();
        runner.load_plugin(module).expect("load");

        let logs: Vec<String> = drain(&mut action_rx)
            .into_iter()
            .filter_map(|action| match action {
                HostAction::Log { message, .. } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(logs, vec!["Plugin loaded (version 0.1)"], "{}", name);
    }
    assert_eq!(runner.plugin_count(), 6);

    runner.unload_all(UnloadReason::Exiting);
    assert_eq!(runner.plugin_count(), 0);
    assert!(runner.registry().is_empty());
}
