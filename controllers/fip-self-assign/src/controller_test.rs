//! Unit tests for the scheduler loop

#[cfg(test)]
mod tests {
    use crate::controller::Controller;
    use crate::reconciler::CycleOutcome;
    use crate::test_utils::*;
    use floating_ip_client::{FloatingIpError, MockCall};
    use std::future::pending;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};

    fn read_instants(mock: &floating_ip_client::MockFloatingIpClient) -> Vec<Instant> {
        mock.timed_calls()
            .into_iter()
            .filter(|(_, c)| matches!(c, MockCall::GetFloatingIp { .. }))
            .map(|(at, _)| at)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_already_assigned() {
        let mock = create_test_mock(Some(TEST_DROPLET));
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(5)),
            Duration::ZERO,
        );

        controller.run_until(pending()).await;

        assert_eq!(mock.calls().len(), 1);
        assert_eq!(mock.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_assigns_and_exits() {
        let mock = create_test_mock(None);
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(5)),
            Duration::ZERO,
        );

        controller.run_until(pending()).await;

        assert_eq!(mock.read_count(), 1);
        assert_eq!(mock.assign_count(), 1);
        assert_eq!(mock.action_poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_exits_after_exhausted_retries() {
        let mock = create_test_mock(None);
        mock.push_assign_failures(3);
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(2)),
            Duration::ZERO,
        );

        controller.run_until(pending()).await;

        assert_eq!(mock.assign_count(), 3);
        assert_eq!(mock.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_immediately_then_every_period() {
        let mock = create_test_mock(Some(TEST_DROPLET));
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(5)),
            Duration::from_secs(60),
        );

        let start = Instant::now();
        controller.run_until(sleep(Duration::from_secs(150))).await;

        let offsets: Vec<Duration> = read_instants(&mock).iter().map(|at| *at - start).collect();
        assert_eq!(
            offsets,
            vec![Duration::ZERO, Duration::from_secs(60), Duration::from_secs(120)]
        );
        assert_eq!(mock.assign_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_period_is_measured_from_end_of_cycle() {
        let mock = create_test_mock(None);
        mock.push_assign_failures(2);
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(1)),
            Duration::from_secs(60),
        );

        let start = Instant::now();
        controller.run_until(sleep(Duration::from_secs(100))).await;

        // First cycle: two failed attempts with a 1s backoff between them.
        let offsets: Vec<Duration> = read_instants(&mock).iter().map(|at| *at - start).collect();
        assert_eq!(offsets, vec![Duration::ZERO, Duration::from_secs(61)]);
        // Second cycle succeeded.
        assert_eq!(mock.holder(TEST_FLOATING_IP), Some(TEST_DROPLET));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_waits_for_next_period() {
        let mock = create_test_mock(None);
        mock.push_read_failure(FloatingIpError::Api("GET failed: 502".to_string()));
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(5)),
            Duration::from_secs(30),
        );

        assert_eq!(controller.run_cycle().await, None);
        assert_eq!(mock.assign_count(), 0);
        assert_eq!(
            controller.run_cycle().await,
            Some(CycleOutcome::Assigned { attempts: 1 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_long_running_cycle() {
        let mock = create_test_mock(None);
        mock.push_assign_failures(1_000);
        let controller = Controller::new(
            create_test_reconciler(&mock, test_settings(-1)),
            Duration::from_secs(300),
        );

        let start = Instant::now();
        controller.run_until(sleep(Duration::from_secs(10))).await;

        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(mock.assign_count() > 1);
        assert_eq!(mock.read_count(), 1);
    }
}
