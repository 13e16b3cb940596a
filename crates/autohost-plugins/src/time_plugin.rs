use autohost_plugin_api::{
    CommandCall, CommandOutcome, Host, LogLevel, ParamSchema, ParamSpec, Plugin, PluginDescriptor,
    PluginModule, UnloadReason, ValidatorTag, command_handler,
};
use chrono::{Local, Timelike};

const COMMAND: &str = "time";

/// Plugins adding commands must name their command rights and help files
const GLOBAL_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("commandsFile", &[ValidatorTag::NotNull]),
    ParamSpec::new("helpFile", &[ValidatorTag::NotNull]),
];

pub const DESCRIPTOR: PluginDescriptor =
    PluginDescriptor::new("0.1", "0.12.29").with_params(ParamSchema {
        global: Some(GLOBAL_PARAMS),
        preset: None,
    });

/// Adds a `!time` command answering the host's local time
pub struct TimePluginModule;

impl PluginModule for TimePluginModule {
    fn name(&self) -> &'static str {
        "TimePlugin"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.add_command_handlers(vec![(COMMAND.to_string(), command_handler(handle_time))]);
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );
        Box::new(TimePlugin)
    }
}

struct TimePlugin;

impl Plugin for TimePlugin {
    fn on_unload(&mut self, host: &mut dyn Host, _reason: UnloadReason) {
        host.remove_command_handlers(&[COMMAND]);
        host.log("Plugin unloaded", LogLevel::Notice);
    }
}

fn handle_time(host: &mut dyn Host, call: &CommandCall) -> CommandOutcome {
    // Nothing to validate for a vote
    if call.check_only {
        return CommandOutcome::Accepted;
    }

    let now = Local::now();
    host.answer(&call.source, &time_message(now.hour(), now.minute(), now.second()));
    CommandOutcome::Executed
}

fn time_message(hour: u32, minute: u32, second: u32) -> String {
    format!("Current local time: {:02}:{:02}:{:02}", hour, minute, second)
}
