mod tests {
    use embassy_time::Duration;
    use myrtio_status_indicator::math8::{
        blend8, progress8, scale8, unit_to_u8, wrap_period,
    };

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_progress8() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(100)),
            0
        );
        assert_eq!(
            progress8(Duration::from_millis(50), Duration::from_millis(100)),
            127
        );
        assert_eq!(
            progress8(Duration::from_millis(100), Duration::from_millis(100)),
            255
        );
        assert_eq!(
            progress8(Duration::from_millis(10), Duration::from_millis(0)),
            0
        );
    }

    #[test]
    fn test_unit_to_u8() {
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(0.5), 128);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(-0.5), 0);
        assert_eq!(unit_to_u8(2.0), 255);
    }

    #[test]
    fn test_wrap_period() {
        let period = Duration::from_millis(1000);
        assert_eq!(
            wrap_period(Duration::from_millis(250), period),
            Duration::from_millis(250)
        );
        assert_eq!(
            wrap_period(Duration::from_millis(1250), period),
            Duration::from_millis(250)
        );
        assert_eq!(
            wrap_period(Duration::from_millis(1250), Duration::from_millis(0)),
            Duration::from_millis(0)
        );
    }
}
