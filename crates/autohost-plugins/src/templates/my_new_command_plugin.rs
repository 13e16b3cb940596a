use autohost_plugin_api::{
    CommandCall, CommandOutcome, Host, LogLevel, ParamSchema, ParamSpec, Plugin, PluginDescriptor,
    PluginModule, UnloadReason, ValidatorTag, command_handler,
};

const COMMAND: &str = "myCommand";

const GLOBAL_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("commandsFile", &[ValidatorTag::NotNull]),
    ParamSpec::new("helpFile", &[ValidatorTag::NotNull]),
];

pub const DESCRIPTOR: PluginDescriptor =
    PluginDescriptor::new("0.1", "0.12.29").with_params(ParamSchema {
        global: Some(GLOBAL_PARAMS),
        preset: None,
    });

/// A plugin adding the `myCommand` command
pub struct MyNewCommandPluginModule;

impl PluginModule for MyNewCommandPluginModule {
    fn name(&self) -> &'static str {
        "MyNewCommandPlugin"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.add_command_handlers(vec![(COMMAND.to_string(), command_handler(handle_my_command))]);
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );
        Box::new(MyNewCommandPlugin)
    }
}

struct MyNewCommandPlugin;

impl Plugin for MyNewCommandPlugin {
    fn on_unload(&mut self, host: &mut dyn Host, _reason: UnloadReason) {
        host.remove_command_handlers(&[COMMAND]);
        host.log("Plugin unloaded", LogLevel::Notice);
    }
}

fn handle_my_command(host: &mut dyn Host, call: &CommandCall) -> CommandOutcome {
    if call.check_only {
        return CommandOutcome::Accepted;
    }

    let user = host
        .normalize_text(std::slice::from_ref(&call.user))
        .concat();
    let params = host.normalize_text(&call.params).join(",");
    let text = format!(
        "User {} called command {} with parameter(s) \"{}\"",
        user, COMMAND, params
    );

    host.log(&text, LogLevel::Notice);
    host.answer(&call.source, &text);
    CommandOutcome::Executed
}
