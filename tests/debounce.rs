mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_status_indicator::debounce::Debouncer;

    #[test]
    fn test_delivers_after_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(16));
        assert!(!debouncer.schedule(1u8, Instant::from_millis(0)));
        assert_eq!(debouncer.poll(Instant::from_millis(15)), None);
        assert_eq!(debouncer.poll(Instant::from_millis(16)), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(Instant::from_millis(100)), None);
    }

    #[test]
    fn test_reschedule_replaces_value_and_deadline() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.schedule(1u8, Instant::from_millis(0));
        assert!(debouncer.schedule(2, Instant::from_millis(80)));
        assert_eq!(debouncer.deadline(), Some(Instant::from_millis(180)));
        assert_eq!(debouncer.poll(Instant::from_millis(100)), None);
        assert_eq!(debouncer.poll(Instant::from_millis(180)), Some(2));
    }

    #[test]
    fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(!debouncer.cancel());
        debouncer.schedule('x', Instant::from_millis(0));
        assert!(debouncer.cancel());
        assert_eq!(debouncer.poll(Instant::from_millis(50)), None);
        assert_eq!(debouncer.delay(), Duration::from_millis(10));
    }
}
