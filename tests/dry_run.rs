//! Dry-run pipeline: config bindings through a full session into LogSink

use std::sync::Arc;
use std::time::Duration;

use ringcon_driver::{BoundKey, DriverConfig, KeyBindings, LogSink};
use ringcon_strain::{KeySink, RingConSession, SessionConfig, StreamStats};
use ringcon_transport::protocol::{report_id, SUBCOMMAND_PREFIX_LEN};
use ringcon_transport::{InboundReport, MemoryChannel, ReportChannel};

fn telemetry(value: i16) -> InboundReport {
    let mut payload = vec![0u8; 48];
    payload[38..40].copy_from_slice(&value.to_le_bytes());
    InboundReport::new(report_id::STANDARD_FULL, payload)
}

fn joycon() -> Arc<MemoryChannel> {
    Arc::new(MemoryChannel::with_responder(|report| {
        let id = report.payload[SUBCOMMAND_PREFIX_LEN];
        let mut payload = vec![0u8; 48];
        payload[12] = 0x80;
        payload[13] = id;
        payload[15] = 0x20;
        vec![InboundReport::new(report_id::SUBCOMMAND_REPLY, payload)]
    }))
}

async fn until_listening_after(channel: &MemoryChannel, sent: usize) {
    while channel.sent().len() != sent || channel.subscriber_count() != 1 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test]
async fn test_dry_run_session_with_configured_timeout() {
    let config = DriverConfig {
        command_timeout_ms: 1000,
        left_key: BoundKey::PageUp,
        right_key: BoundKey::PageDown,
        ..DriverConfig::default()
    };

    let channel = joycon();
    let session = RingConSession::new(
        Arc::clone(&channel) as Arc<dyn ReportChannel>,
        SessionConfig {
            command_timeout: config.command_timeout(),
        },
    );
    let mut sink: Box<dyn KeySink + Send> =
        Box::new(LogSink::new(KeyBindings::from_config(&config)));

    let task = tokio::spawn(async move {
        let mut classifier = session.start().await?;
        let mut stats = StreamStats::default();
        let end = session
            .stream(&mut classifier, sink.as_mut(), &mut stats)
            .await;
        Ok::<_, ringcon_strain::RingConError>((end, stats))
    });

    until_listening_after(&channel, 6).await;
    channel.inject(telemetry(-40));
    until_listening_after(&channel, 7).await;

    for value in [-40, 1100, 1200, -40, -1200, -40] {
        channel.inject(telemetry(value));
    }
    channel.close();

    let (end, stats) = task.await.unwrap().unwrap();
    assert!(end.is_err());
    assert_eq!(stats.samples, 6);
    assert_eq!(stats.events, 2);
    assert_eq!(stats.sink_errors, 0);
}
