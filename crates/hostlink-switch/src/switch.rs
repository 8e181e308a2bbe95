//! Home mode switch entity

use crate::client::SurveillanceClient;
use std::sync::Arc;
use tracing::{debug, error};

/// Binary state of a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchState::On => "on",
            SwitchState::Off => "off",
        }
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An on/off entity as the host platform drives it
pub trait SwitchEntity: Send + Sync {
    fn name(&self) -> &str;
    fn is_on(&self) -> bool;
    fn turn_on(&self);
    fn turn_off(&self);

    /// Current state, derived from [`SwitchEntity::is_on`]
    fn state(&self) -> SwitchState {
        self.is_on().into()
    }
}

/// Surveillance station home mode toggle
pub struct HomeModeSwitch {
    client: Arc<dyn SurveillanceClient>,
    name: String,
}

impl HomeModeSwitch {
    /// Create a switch for the station called `station_name`
    pub fn new(client: Arc<dyn SurveillanceClient>, station_name: &str) -> Self {
        Self {
            client,
            name: format!("{} Surveillance HomeMode Switch", station_name),
        }
    }

    fn set(&self, enabled: bool) {
        let action = if enabled { "enable" } else { "disable" };
        match self.client.set_home_mode(enabled) {
            Ok(()) => debug!("{}: home mode {}d", self.name, action),
            Err(e) => error!("Error when trying to {} home mode: {}", action, e),
        }
    }
}

impl SwitchEntity for HomeModeSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_on(&self) -> bool {
        match self.client.home_mode_status() {
            Ok(enabled) => enabled,
            Err(e) => {
                error!("Error when trying to get the status: {}", e);
                false
            }
        }
    }

    fn turn_on(&self) {
        self.set(true);
    }

    fn turn_off(&self) {
        self.set(false);
    }
}

/// Integration data the platform setup reads
#[derive(Clone)]
pub struct SurveillanceData {
    pub client: Arc<dyn SurveillanceClient>,
    /// Station display name
    pub name: String,
}

/// Create the switches for an integration.
///
/// Without integration data nothing is created.
pub fn setup_platform(data: Option<&SurveillanceData>) -> Vec<HomeModeSwitch> {
    match data {
        Some(data) => vec![HomeModeSwitch::new(data.client.clone(), &data.name)],
        None => {
            debug!("Surveillance integration not initialized, skipping switches");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ClientResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStation {
        failing: bool,
        home_mode: Mutex<bool>,
        set_calls: Mutex<Vec<bool>>,
        status_calls: Mutex<usize>,
    }

    impl SurveillanceClient for MockStation {
        fn home_mode_status(&self) -> ClientResult<bool> {
            *self.status_calls.lock().unwrap() += 1;
            if self.failing {
                return Err(ClientError::Request("connection refused".into()));
            }
            Ok(*self.home_mode.lock().unwrap())
        }

        fn set_home_mode(&self, enabled: bool) -> ClientResult<()> {
            self.set_calls.lock().unwrap().push(enabled);
            if self.failing {
                return Err(ClientError::Request("connection refused".into()));
            }
            *self.home_mode.lock().unwrap() = enabled;
            Ok(())
        }
    }

    fn station_data(station: Arc<MockStation>) -> SurveillanceData {
        SurveillanceData {
            client: station,
            name: "Test Synology".to_string(),
        }
    }

    #[test]
    fn test_not_initialized() {
        assert!(setup_platform(None).is_empty());
    }

    #[test]
    fn test_switch_initialized() {
        let data = station_data(Arc::default());
        let switches = setup_platform(Some(&data));
        assert_eq!(switches.len(), 1);
        assert_eq!(
            switches[0].name(),
            "Test Synology Surveillance HomeMode Switch"
        );
    }

    #[test]
    fn test_switch() {
        let station = Arc::new(MockStation {
            home_mode: Mutex::new(true),
            ..Default::default()
        });
        let switches = setup_platform(Some(&station_data(station.clone())));
        let switch = &switches[0];

        assert_eq!(switch.state(), SwitchState::On);

        switch.turn_off();
        assert_eq!(station.set_calls.lock().unwrap().last(), Some(&false));
        assert_eq!(switch.state(), SwitchState::Off);

        switch.turn_on();
        assert_eq!(station.set_calls.lock().unwrap().last(), Some(&true));
        assert_eq!(switch.state().to_string(), "on");
    }

    #[test]
    fn test_switch_errors() {
        let station = Arc::new(MockStation {
            failing: true,
            ..Default::default()
        });
        let switches = setup_platform(Some(&station_data(station.clone())));
        let switch = &switches[0];

        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(*station.status_calls.lock().unwrap(), 1);

        switch.turn_off();
        assert_eq!(switch.state(), SwitchState::Off);

        switch.turn_on();
        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(*station.set_calls.lock().unwrap(), vec![false, true]);
    }
}
