//! Batch driver tests.
//!
//! These tests check that batches are reproducible from their seed regardless of pool size, that
//! sessions are independent of one another, and that the driver's own termination reasons
//! (round limit, time budget, exhausted replays) are applied.

#[cfg(test)]
mod tests {
    use crate::driver::{play_session, run_batch, RunRequest};
    use crate::strategies::{Progression, ProgressionStrategy};
    use std::time::Instant;
    use wheelhouse_execution::mocks::{always, replay, scripted, table};
    use wheelhouse_execution::Decision;
    use wheelhouse_types::{
        BetInstruction, BetKind, ConfigError, Pocket, SessionLimits, TerminationReason, WheelType,
    };

    fn request(sessions: usize, seed: u64) -> RunRequest {
        RunRequest {
            session_count: sessions,
            seed: Some(seed),
            max_rounds: 200,
            ..RunRequest::new(table(1.0, 5.0, 1000.0), 100.0)
        }
    }

    fn martingale() -> ProgressionStrategy {
        ProgressionStrategy::new(
            Progression::Martingale,
            BetKind::Red,
            None,
            5.0,
            WheelType::SingleZero,
        )
        .unwrap()
    }

    #[test]
    fn test_seeded_batch_is_identical_across_parallelism() {
        let strategy = martingale();
        let mut serial = request(24, 42);
        serial.parallelism = 1;
        serial.record_history = true;
        let mut parallel = serial.clone();
        parallel.parallelism = 4;

        let a = run_batch(&strategy, &serial).unwrap();
        let b = run_batch(&strategy, &parallel).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 42);
        assert_eq!(a.sessions.len(), 24);
        for (index, session) in a.sessions.iter().enumerate() {
            assert_eq!(session.index, index as u64);
        }
    }

    #[test]
    fn test_sessions_get_distinct_spins() {
        let mut request = request(8, 7);
        request.record_history = true;
        let result = run_batch(&always(vec![]), &request).unwrap();

        let histories: Vec<_> = result
            .sessions
            .iter()
            .map(|s| s.history.clone().unwrap())
            .collect();
        for (i, a) in histories.iter().enumerate() {
            assert_eq!(a.len(), 200);
            for b in &histories[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(result
            .sessions
            .iter()
            .all(|s| s.termination_reason == TerminationReason::RoundLimit));
    }

    #[test]
    fn test_unseeded_batch_reports_seed() {
        let mut request = request(2, 0);
        request.seed = None;
        let first = run_batch(&always(vec![]), &request).unwrap();

        request.seed = Some(first.seed);
        let second = run_batch(&always(vec![]), &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_panic_in_one_session_spares_siblings() {
        // Sessions whose first spin is even blow up on their second round.
        let strategy = scripted(|ctx, _| {
            if let Some(first) = ctx.history().first() {
                if first.winning_number.value() % 2 == 0 {
                    panic!("strategy blew up");
                }
            }
            Ok(Decision::skip())
        });
        let mut request = request(64, 3);
        request.max_rounds = 20;
        request.record_history = true;
        let result = run_batch(&strategy, &request).unwrap();

        let mut faulted = 0;
        for session in &result.sessions {
            let first = session.history.as_ref().unwrap()[0].winning_number.value();
            if first % 2 == 0 {
                faulted += 1;
                assert_eq!(
                    session.termination_reason,
                    TerminationReason::StrategyException
                );
                assert_eq!(session.rounds, 1);
                assert!(session.fault.as_deref().unwrap().contains("blew up"));
            } else {
                assert_eq!(session.termination_reason, TerminationReason::RoundLimit);
                assert_eq!(session.rounds, 20);
                assert!(session.fault.is_none());
            }
        }
        assert!(faulted > 0 && faulted < 64);
    }

    #[test]
    fn test_replayed_spins_exhaust() {
        let mut request = request(3, 1);
        request.spins = Some(vec![Pocket::ZERO, Pocket::new(1, WheelType::SingleZero).unwrap()]);
        let result = run_batch(&always(vec![BetInstruction::red(5.0)]), &request).unwrap();

        for session in &result.sessions {
            assert_eq!(session.termination_reason, TerminationReason::SpinsExhausted);
            assert_eq!(session.rounds, 2);
            assert_eq!(session.final_bankroll, 100.0);
        }
        let stats = result.stats.unwrap();
        assert_eq!(stats.reasons[&TerminationReason::SpinsExhausted], 3);
        assert_eq!(stats.total_staked, 30.0);
        assert_eq!(stats.realized_edge, 0.0);
    }

    #[test]
    fn test_replay_rejects_pockets_off_the_wheel() {
        let mut request = request(1, 1);
        request.spins = Some(vec![Pocket::DOUBLE_ZERO]);
        assert!(run_batch(&always(vec![]), &request).is_err());
    }

    #[test]
    fn test_deadline_ends_session() {
        let request = request(1, 1);
        let mut wheel = replay(WheelType::SingleZero, &[1, 2, 3]);
        let result = play_session(
            &always(vec![]),
            &mut wheel,
            &request,
            0,
            Some(Instant::now()),
        )
        .unwrap();
        assert_eq!(result.termination_reason, TerminationReason::TimeBudget);
        assert_eq!(result.rounds, 0);
    }

    #[test]
    fn test_single_session_has_no_stats() {
        let result = run_batch(&always(vec![]), &request(1, 9)).unwrap();
        assert!(result.stats.is_none());
        assert!(result.sessions[0].history.is_none());
    }

    #[test]
    fn test_history_is_opt_in() {
        let mut request = request(2, 4);
        request.max_rounds = 5;
        let result = run_batch(&always(vec![]), &request).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["sessions"][0].get("history").is_none());

        request.record_history = true;
        let result = run_batch(&always(vec![]), &request).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        for session in json["sessions"].as_array().unwrap() {
            let history = session["history"].as_array().unwrap();
            assert_eq!(history.len(), 5);
            assert!(history[0]["winningNumber"].is_u64());
            assert!(history[0]["winningColor"].is_string());
        }
    }

    #[test]
    fn test_limits_flow_into_sessions() {
        let mut request = request(4, 11);
        request.limits = SessionLimits {
            stop_loss: Some(20.0),
            take_profit: Some(20.0),
        };
        request.max_rounds = 10_000;
        let result = run_batch(&always(vec![BetInstruction::red(5.0)]), &request).unwrap();
        for session in &result.sessions {
            match session.termination_reason {
                TerminationReason::StopLoss => assert!(session.final_bankroll <= 80.0),
                TerminationReason::TakeProfit => assert!(session.final_bankroll >= 120.0),
                other => panic!("unexpected termination {other}"),
            }
        }
    }

    #[test]
    fn test_invalid_request() {
        let mut request = request(0, 1);
        assert!(matches!(
            request.validate(),
            Err(ConfigError::InvalidNonZero { field: "sessionCount", .. })
        ));
        request.session_count = 1;
        request.starting_bankroll = -5.0;
        assert!(request.validate().is_err());
        request.starting_bankroll = 5.0;
        request.time_budget_ms = Some(0);
        assert!(run_batch(&always(vec![]), &request).is_err());
    }

    #[test]
    fn test_request_json_defaults() {
        let request: RunRequest = serde_json::from_str(r#"{"startingBankroll": 250}"#).unwrap();
        assert_eq!(request.session_count, 1);
        assert_eq!(request.max_rounds, 10_000);
        assert_eq!(request.fault_tolerance, 3);
        assert_eq!(request.parallelism, 0);
        assert!(request.validate().is_ok());
    }
}
