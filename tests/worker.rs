mod common;

mod tests {
    use myrtio_status_indicator::animation::AnimationDescriptor;
    use myrtio_status_indicator::arbiter::StatusArbiter;
    use myrtio_status_indicator::color::{PaletteColor, Rgb};
    use myrtio_status_indicator::config::WidgetConfig;
    use myrtio_status_indicator::queue::{BlinkItem, BlinkQueue};
    use myrtio_status_indicator::status::{ArbitrationRequest, Priority, StatusKind};
    use myrtio_status_indicator::worker::RenderWorker;

    use crate::common::{RecordingSink, at, ms};

    fn rgb(color: PaletteColor) -> Rgb {
        color.to_rgb(255)
    }

    #[test]
    fn test_same_color_blink_inserts_gap() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        queue.try_enqueue(BlinkItem::ambient(PaletteColor::Blue)).unwrap();
        worker.tick(at(0));
        assert_eq!(worker.ambient_color(), PaletteColor::Blue);

        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Blue, ms(1000)))
            .unwrap();
        for now in [10, 510, 1510, 2010, 2510] {
            worker.tick(at(now));
        }

        assert_eq!(
            worker.sink().writes_to(0),
            vec![
                rgb(PaletteColor::Blue),
                // blank before repeating the shown color
                rgb(PaletteColor::Black),
                rgb(PaletteColor::Blue),
                // blank before returning to the same ambient color
                rgb(PaletteColor::Black),
                rgb(PaletteColor::Blue),
            ]
        );
        assert!(!worker.is_playing());
    }

    #[test]
    fn test_blink_returns_to_ambient() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Red, ms(1000)))
            .unwrap();
        worker.tick(at(0));
        assert_eq!(worker.playback_color(), PaletteColor::Red);
        assert!(worker.is_playing());

        worker.tick(at(999));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Red));

        worker.tick(at(1000));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Black));
        // ambient hold for the default interval
        assert!(worker.is_playing());
        worker.tick(at(1500));
        assert!(!worker.is_playing());

        assert_eq!(
            worker.sink().writes_to(0),
            vec![rgb(PaletteColor::Red), rgb(PaletteColor::Black)]
        );
    }

    #[test]
    fn test_late_tick_chains_deadlines() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Green, ms(1000)))
            .unwrap();
        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Red, ms(1000)))
            .unwrap();
        worker.tick(at(0));
        // the first item ended at 1500; the second starts now
        worker.tick(at(3000));
        assert_eq!(worker.playback_color(), PaletteColor::Red);
    }

    #[test]
    fn test_sleep_duration_capped_by_poll_ceiling() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        let idle = worker.tick(at(0));
        assert_eq!(idle.sleep_duration, config.timings.poll_ceiling);
        assert_eq!(idle.next_deadline, at(0) + config.timings.poll_ceiling);

        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Red, ms(30)))
            .unwrap();
        let playing = worker.tick(at(100));
        assert_eq!(playing.sleep_duration, ms(30));
        assert_eq!(playing.next_deadline, at(130));
    }

    #[test]
    fn test_animation_ticks_at_frame_rate() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        arbiter
            .set_pattern(0, AnimationDescriptor::pulse(PaletteColor::Cyan, ms(1000)), at(0))
            .unwrap();
        let result = worker.tick(at(0));
        assert_eq!(result.sleep_duration, config.timings.frame);
        worker.tick(at(20));
        worker.tick(at(40));
        assert_eq!(worker.sink().writes_to(0).len(), 3);
    }

    #[test]
    fn test_shared_expiry_restores_base() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        arbiter
            .assign(
                &ArbitrationRequest::new(StatusKind::Layer, PaletteColor::Green, Priority::LAYER),
                at(0),
            )
            .unwrap();
        arbiter
            .assign(
                &ArbitrationRequest::new(
                    StatusKind::Connectivity,
                    PaletteColor::Blue,
                    Priority::CONNECTIVITY,
                )
                .with_timeout(ms(1000)),
                at(0),
            )
            .unwrap();

        worker.tick(at(0));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Blue));

        let result = worker.tick(at(990));
        assert_eq!(result.sleep_duration, ms(10));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Blue));

        worker.tick(at(1000));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Green));
    }

    #[test]
    fn test_unready_sink_stays_inert() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::unready(), &arbiter, queue.receiver(), &config);
        assert!(!worker.is_active());

        queue
            .try_enqueue(BlinkItem::blink(PaletteColor::Red, ms(1000)))
            .unwrap();
        let result = worker.tick(at(0));
        assert!(worker.sink().writes.is_empty());
        assert_eq!(result.sleep_duration, config.timings.poll_ceiling);
        // the item is left in the queue
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_sink_too_small_stays_inert() {
        let arbiter = StatusArbiter::<2>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);
        assert!(!worker.is_active());
    }

    #[test]
    fn test_sleep_blanks_output_until_wake() {
        let arbiter = StatusArbiter::<1>::new();
        let queue: BlinkQueue = BlinkQueue::new();
        let config = WidgetConfig::DEFAULT;
        let mut worker = RenderWorker::new(RecordingSink::<1>::new(), &arbiter, queue.receiver(), &config);

        queue.try_enqueue(BlinkItem::ambient(PaletteColor::Magenta)).unwrap();
        worker.tick(at(0));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Magenta));

        arbiter.set_sleeping(true);
        worker.tick(at(10));
        assert_eq!(worker.sink().last(0), Rgb::default());
        let writes = worker.sink().writes.len();
        worker.tick(at(20));
        assert_eq!(worker.sink().writes.len(), writes);

        arbiter.set_sleeping(false);
        worker.tick(at(30));
        assert_eq!(worker.sink().last(0), rgb(PaletteColor::Magenta));
    }

    #[test]
    fn test_queue_overflow_drops_new_item() {
        let queue: BlinkQueue = BlinkQueue::new();
        for _ in 0..queue.capacity() {
            queue.try_enqueue(BlinkItem::ambient(PaletteColor::Red)).unwrap();
        }
        assert_eq!(
            queue.try_enqueue(BlinkItem::ambient(PaletteColor::Blue)),
            Err(myrtio_status_indicator::IndicatorError::QueueFull)
        );
        assert_eq!(queue.len(), 16);
        assert_eq!(queue.try_dequeue(), Some(BlinkItem::ambient(PaletteColor::Red)));
    }
}
