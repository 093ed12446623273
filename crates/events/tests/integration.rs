//! Integration tests for events

#[cfg(test)]
mod tests {
    use extup_events::*;

    #[tokio::test]
    async fn test_event_emitter_on_sender() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::General(GeneralEvent::Error { .. })
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[test]
    fn test_package_event_serialization() {
        let event = AppEvent::Package(PackageEvent::Removed {
            package: "git-gutter".to_string(),
            deferred: true,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""domain":"package""#));
        assert!(json.contains(r#""deferred":true"#));
    }

    #[test]
    fn test_migrate_event_version_as_string() {
        let event = AppEvent::Migrate(MigrateEvent::ProcessStarted {
            since: "1.4.0".parse().unwrap(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""since":"1.4.0""#));
    }
}
