use autohost_plugin_api::{
    BridgeText, Host, LogLevel, MessageFilter, Plugin, PluginDescriptor, PluginModule,
};

/// Requires a host supporting plugins written against this API
pub const DESCRIPTOR: PluginDescriptor = PluginDescriptor::new("0.1", "0.12.29");

/// Answers "Hello World" to anyone privately saying "Hello"
pub struct HelloWorldModule;

impl PluginModule for HelloWorldModule {
    fn name(&self) -> &'static str {
        "HelloWorld"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );
        Box::new(HelloWorld)
    }
}

struct HelloWorld;

impl Plugin for HelloWorld {
    fn on_private_msg(
        &mut self,
        host: &mut dyn Host,
        user: &BridgeText,
        message: &BridgeText,
    ) -> MessageFilter {
        let texts = host.normalize_text(&[user.clone(), message.clone()]);
        let [user, message] = texts.as_slice() else {
            return MessageFilter::Pass;
        };

        if message == "Hello" {
            host.say_private(user, "Hello World");
        }

        // Other host processing still sees the message
        MessageFilter::Pass
    }
}
