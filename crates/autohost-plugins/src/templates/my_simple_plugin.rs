use autohost_plugin_api::{Host, LogLevel, Plugin, PluginDescriptor, PluginModule};

pub const DESCRIPTOR: PluginDescriptor = PluginDescriptor::new("0.1", "0.12.29");

pub struct MySimplePluginModule;

impl PluginModule for MySimplePluginModule {
    fn name(&self) -> &'static str {
        "MySimplePlugin"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );
        Box::new(MySimplePlugin)
    }
}

struct MySimplePlugin;

impl Plugin for MySimplePlugin {}
