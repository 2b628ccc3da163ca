//! Shared utilities for integration testing.

use command_gateway::directory::{Device, DeviceSource, NameFilter, SourceError};

/// Device source driven by a closure, for scripting fetch behaviour.
pub struct ScriptedSource<F>(pub F);

impl<F> DeviceSource for ScriptedSource<F>
where
    F: Fn(Option<&NameFilter>, Option<&str>) -> Result<Vec<Device>, SourceError>
        + Send
        + Sync
        + 'static,
{
    async fn fetch(
        &self,
        filter: Option<&NameFilter>,
        target: Option<&str>,
    ) -> Result<Vec<Device>, SourceError> {
        (self.0)(filter, target)
    }
}

/// Build a device record with the given names.
#[allow(dead_code)]
pub fn device(name: &str, alias: Option<&str>) -> Device {
    Device {
        name: name.to_string(),
        alias: alias.map(str::to_string),
        address: format!("{}.example.net", name),
        vendor: None,
    }
}
