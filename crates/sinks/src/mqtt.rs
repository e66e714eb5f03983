//! MqttSink - device commands over MQTT.
//!
//! The rumqttc event loop runs on its own task and reconnects on its own;
//! `publish` only enqueues into the client and reports per-call failure.

use std::sync::Arc;
use std::time::Duration;

use contracts::{BrokerConfig, ContractError, PublishSink, QosClass};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::metrics::SinkMetrics;

/// Outstanding request capacity of the rumqttc client channel
const REQUEST_CAPACITY: usize = 64;

/// Delay before the event loop retries after a connection error
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Sink that publishes device commands to an MQTT broker
pub struct MqttSink {
    name: String,
    client: AsyncClient,
    metrics: Arc<SinkMetrics>,
}

impl MqttSink {
    /// Create the sink and spawn its event loop task
    ///
    /// The returned handle is the event loop; aborting it disconnects the
    /// sink. Connection failures are retried inside the loop, so this
    /// never fails up front.
    #[instrument(name = "mqtt_sink_connect", skip(broker), fields(host = %broker.host, port = broker.port))]
    pub fn connect(broker: &BrokerConfig) -> (Self, JoinHandle<()>) {
        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (&broker.username, &broker.password) {
            options.set_credentials(username, password);
        }

        let (client, mut event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);

        let host = broker.host.clone();
        let task = tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!(host = %host, "mqtt broker connected");
                    }
                    Ok(event) => {
                        debug!(?event, "mqtt event");
                    }
                    Err(error) => {
                        warn!(%error, "mqtt connection error, retrying");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });

        let sink = Self {
            name: "mqtt".to_string(),
            client,
            metrics: Arc::new(SinkMetrics::new()),
        };
        (sink, task)
    }

    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }
}

fn map_qos(qos: QosClass) -> QoS {
    match qos {
        QosClass::AtMostOnce => QoS::AtMostOnce,
        QosClass::AtLeastOnce => QoS::AtLeastOnce,
        QosClass::ExactlyOnce => QoS::ExactlyOnce,
    }
}

impl PublishSink for MqttSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, topic: &str, payload: &str, qos: QosClass) -> Result<(), ContractError> {
        match self
            .client
            .publish(topic, map_qos(qos), false, payload.to_owned())
            .await
        {
            Ok(()) => {
                self.metrics.inc_publish_count();
                Ok(())
            }
            Err(error) => {
                self.metrics.inc_failure_count();
                Err(ContractError::sink_publish(topic, error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qos_mapping() {
        assert_eq!(map_qos(QosClass::AtMostOnce), QoS::AtMostOnce);
        assert_eq!(map_qos(QosClass::AtLeastOnce), QoS::AtLeastOnce);
        assert_eq!(map_qos(QosClass::ExactlyOnce), QoS::ExactlyOnce);
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        // No broker is listening; construction must still succeed.
        let broker = BrokerConfig {
            host: "127.0.0.1".into(),
            port: 1,
            ..Default::default()
        };
        let (sink, task) = MqttSink::connect(&broker);
        assert_eq!(sink.name(), "mqtt");
        task.abort();
    }
}
