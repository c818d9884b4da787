//! MQTT broker adapter (ESP-IDF only).
//!
//! Implements [`ConnectivityPort`] and [`TransportPort`] over the ESP-IDF
//! MQTT client. The client's background event task updates a shared
//! connection flag and forwards connectivity transitions into the
//! [`events`](crate::events) queue; inbound command frames are surfaced
//! through [`MqttBrokerAdapter::take_inbound`] so the application loop can
//! parse and dispatch them on its own context.
//!
//! Wi-Fi/PPP bring-up, TLS and session credentials stay outside this
//! adapter; it is handed an already-routable broker URI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use esp_idf_svc::mqtt::client::{
    EspMqttClient, EventPayload, MqttClientConfiguration, QoS,
};
use log::{info, warn};

use crate::app::ports::{ConnectivityPort, DeviceMode, TransportPort};
use crate::error::TransportError;
use crate::events::{push_event, Event};

/// Topic set for one device endpoint.
#[derive(Debug, Clone)]
pub struct BrokerTopics {
    /// Attribute updates (telemetry + metadata) go out here.
    pub update: String,
    /// Command status results go out here.
    pub status: String,
    /// Inbound command envelopes arrive here.
    pub command: String,
}

/// Broker adapter state shared with the MQTT event callback.
struct Shared {
    connected: AtomicBool,
    inbound: Mutex<Vec<Vec<u8>>>,
}

/// ESP-IDF MQTT client behind the core's port traits.
pub struct MqttBrokerAdapter {
    client: EspMqttClient<'static>,
    topics: BrokerTopics,
    shared: Arc<Shared>,
    mode: DeviceMode,
}

impl MqttBrokerAdapter {
    /// Start a client session against `broker_uri`. The caller subscribes
    /// to the command topic via [`subscribe_commands`](Self::subscribe_commands)
    /// when the loop observes [`Event::BrokerConnected`].
    pub fn new(broker_uri: &str, client_id: &str, topics: BrokerTopics) -> anyhow::Result<Self> {
        let shared = Arc::new(Shared {
            connected: AtomicBool::new(false),
            inbound: Mutex::new(Vec::new()),
        });

        let cb_shared = Arc::clone(&shared);
        let command_topic = topics.command.clone();
        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..MqttClientConfiguration::default()
        };

        let client = EspMqttClient::new_cb(broker_uri, &conf, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => {
                    cb_shared.connected.store(true, Ordering::Release);
                    push_event(Event::BrokerConnected);
                    info!("broker session established");
                }
                EventPayload::Disconnected => {
                    cb_shared.connected.store(false, Ordering::Release);
                    push_event(Event::BrokerDisconnected);
                    warn!("broker session dropped");
                }
                EventPayload::Received { topic, data, .. } => {
                    if topic == Some(command_topic.as_str()) {
                        if let Ok(mut inbound) = cb_shared.inbound.lock() {
                            inbound.push(data.to_vec());
                        }
                        push_event(Event::CommandReceived);
                    }
                }
                _ => {}
            }
        })?;

        Ok(Self {
            client,
            topics,
            shared,
            mode: DeviceMode::Normal,
        })
    }

    /// (Re)subscribe to the command topic. Called by the application loop
    /// on every broker-connected event — the session does not persist
    /// subscriptions across reconnects.
    pub fn subscribe_commands(&mut self) -> Result<(), TransportError> {
        self.client
            .subscribe(&self.topics.command, QoS::AtLeastOnce)
            .map(|_| ())
            .map_err(|_| TransportError::NotConnected)
    }

    /// Set the coarse device mode reported through [`ConnectivityPort`].
    pub fn set_mode(&mut self, mode: DeviceMode) {
        self.mode = mode;
    }

    /// Drain inbound command frames collected by the event task, oldest
    /// first. Called from the application loop after `CommandReceived`.
    pub fn take_inbound(&mut self) -> Vec<Vec<u8>> {
        match self.shared.inbound.lock() {
            Ok(mut inbound) => core::mem::take(&mut *inbound),
            Err(_) => Vec::new(),
        }
    }
}

impl ConnectivityPort for MqttBrokerAdapter {
    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    fn mode(&self) -> DeviceMode {
        self.mode
    }
}

impl TransportPort for MqttBrokerAdapter {
    fn publish_update(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.client
            .publish(&self.topics.update, QoS::AtLeastOnce, false, frame)
            .map(|_| ())
            .map_err(|_| TransportError::PublishFailed)
    }

    fn send_status(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.client
            .publish(&self.topics.status, QoS::AtLeastOnce, false, frame)
            .map(|_| ())
            .map_err(|_| TransportError::PublishFailed)
    }
}
