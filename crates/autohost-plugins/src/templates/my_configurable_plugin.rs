use autohost_plugin_api::{
    Host, LogLevel, ParamSchema, ParamSpec, Plugin, PluginDescriptor, PluginModule, ValidatorTag,
};

const GLOBAL_PARAMS: &[ParamSpec] = &[ParamSpec::new("MyGlobalSetting", &[ValidatorTag::NotNull])];
const PRESET_PARAMS: &[ParamSpec] = &[ParamSpec::new("MyPresetSetting", &[ValidatorTag::NotNull])];

pub const DESCRIPTOR: PluginDescriptor =
    PluginDescriptor::new("0.1", "0.12.29").with_params(ParamSchema {
        global: Some(GLOBAL_PARAMS),
        preset: Some(PRESET_PARAMS),
    });

/// A plugin with one global and one preset setting
pub struct MyConfigurablePluginModule;

impl PluginModule for MyConfigurablePluginModule {
    fn name(&self) -> &'static str {
        "MyConfigurablePlugin"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );
        Box::new(MyConfigurablePlugin)
    }
}

struct MyConfigurablePlugin;

impl Plugin for MyConfigurablePlugin {}
