use super::*;
use crate::settings::{keys, Settings};
use proptest::prelude::*;
use std::sync::Arc;

#[test]
fn test_requests_within_budget_are_granted_in_full() {
    let governor = MemoryGovernor::new(1000).unwrap();
    let a = governor.register(300);
    let b = governor.register(700);

    assert_eq!(a.effective_stripe_size, 300);
    assert_eq!(b.effective_stripe_size, 700);
    assert_eq!(governor.allocation_scale(), 1.0);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_oversubscribed_budget_scales_every_writer() {
    let governor = MemoryGovernor::new(1000).unwrap();
    let a = governor.register(800);
    let b = governor.register(800);

    // The first writer learns its reduced share on its next check
    assert_eq!(b.effective_stripe_size, 500);
    assert_eq!(governor.effective_stripe_size(a.id), Some(500));
    assert_eq!(governor.allocation_scale(), 0.625);
}

#[test]
fn test_unregister_reclaims_budget() {
    let governor = MemoryGovernor::new(1000).unwrap();
    let a = governor.register(800);
    let b = governor.register(800);

    assert!(governor.unregister(a.id));
    assert!(!governor.unregister(a.id));
    assert_eq!(governor.effective_stripe_size(b.id), Some(800));

    let c = governor.register(800);
    assert_eq!(c.effective_stripe_size, 500);
    assert_eq!(governor.registered_writers(), 2);
    assert_eq!(governor.total_requested(), 1600);
}

#[test]
fn test_previously_reduced_request_fits_after_release() {
    let governor = MemoryGovernor::new(1000).unwrap();
    let a = governor.register(600);
    let b = governor.register(600);
    assert_eq!(b.effective_stripe_size, 500);

    governor.unregister(b.id);
    let c = governor.register(400);
    assert_eq!(c.effective_stripe_size, 400);
    assert_eq!(governor.effective_stripe_size(a.id), Some(600));
}

#[test]
fn test_check_pressure() {
    let governor = MemoryGovernor::new(1000).unwrap();
    let a = governor.register(800);

    assert_eq!(governor.check_pressure(a.id, 799), Pressure::Ok);
    assert_eq!(governor.check_pressure(a.id, 800), Pressure::MustFlushNow);

    // A second writer halves the first one's share
    let _b = governor.register(1200);
    assert_eq!(governor.check_pressure(a.id, 399), Pressure::Ok);
    assert_eq!(governor.check_pressure(a.id, 400), Pressure::MustFlushNow);

    governor.unregister(a.id);
    assert_eq!(governor.check_pressure(a.id, u64::MAX), Pressure::Ok);
}

#[test]
fn test_huge_requests_do_not_overflow() {
    let governor = MemoryGovernor::new(u64::MAX).unwrap();
    let a = governor.register(u64::MAX);
    assert_eq!(a.effective_stripe_size, u64::MAX);
    let b = governor.register(u64::MAX);

    // Shares returned by register are only valid until the next registration
    let shares = [a.id, b.id].map(|id| governor.effective_stripe_size(id).unwrap());
    let total = u128::from(shares[0]) + u128::from(shares[1]);
    assert!(total <= u128::from(u64::MAX));
    assert_eq!(shares[0], shares[1]);
    assert_eq!(governor.total_requested(), 2 * u128::from(u64::MAX));
}

#[test]
fn test_small_request_next_to_large_one_keeps_a_positive_share() {
    let governor = Arc::new(MemoryGovernor::new(1000).unwrap());
    let large = governor.lease(1_000_000);
    let small = governor.lease(1);

    assert_eq!(small.initial_stripe_size(), 1);
    assert_eq!(small.effective_stripe_size(), 1);
    assert_eq!(large.effective_stripe_size(), 999);

    // Nothing buffered never forces a flush
    assert_eq!(small.check(0), Pressure::Ok);
    assert_eq!(large.check(0), Pressure::Ok);
    assert_eq!(small.check(1), Pressure::MustFlushNow);
}

#[test]
fn test_more_writers_than_bytes_get_one_byte_each() {
    let governor = MemoryGovernor::new(2).unwrap();
    let ids: Vec<_> = (0..5).map(|_| governor.register(100).id).collect();
    for id in ids {
        assert_eq!(governor.effective_stripe_size(id), Some(1));
    }
}

#[test]
fn test_lease_unregisters_on_drop() {
    let governor = Arc::new(MemoryGovernor::new(1000).unwrap());
    let a = governor.lease(800);
    {
        let b = governor.lease(800);
        assert_eq!(b.initial_stripe_size(), 500);
        assert_eq!(a.effective_stripe_size(), 500);
        assert_eq!(b.check(500), Pressure::MustFlushNow);
    }
    assert_eq!(governor.registered_writers(), 1);
    assert_eq!(a.effective_stripe_size(), 800);
    assert_eq!(a.initial_stripe_size(), 800);

    a.release();
    assert_eq!(governor.registered_writers(), 0);
}

#[test]
fn test_zero_budget_is_rejected() {
    assert_eq!(MemoryGovernor::new(0).unwrap_err(), GovernorError::EmptyBudget);
}

#[test]
fn test_budget_from_settings() {
    let governor = MemoryGovernor::from_settings(&Settings::new()).unwrap();
    assert_eq!(governor.budget(), 2 * 1024 * 1024 * 1024);

    let settings = Settings::new()
        .with(keys::MEMORY_POOL_SIZE, 1000)
        .with(keys::MEMORY_POOL, 0.25);
    assert_eq!(MemoryGovernor::from_settings(&settings).unwrap().budget(), 250);
}

#[test]
fn test_budget_from_settings_is_exact_for_large_pools() {
    // 2^53 + 1 is not representable as an f64
    let pool = (1u64 << 53) + 1;
    let whole = Settings::new()
        .with(keys::MEMORY_POOL_SIZE, pool)
        .with(keys::MEMORY_POOL, 1.0);
    assert_eq!(MemoryGovernor::from_settings(&whole).unwrap().budget(), pool);

    let half = Settings::new()
        .with(keys::MEMORY_POOL_SIZE, pool)
        .with(keys::MEMORY_POOL, 0.5);
    assert_eq!(MemoryGovernor::from_settings(&half).unwrap().budget(), pool / 2);

    let all = Settings::new()
        .with(keys::MEMORY_POOL_SIZE, u64::MAX)
        .with(keys::MEMORY_POOL, 1.0);
    assert_eq!(MemoryGovernor::from_settings(&all).unwrap().budget(), u64::MAX);
}

#[test]
fn test_invalid_settings_fail_construction() {
    let bad_fraction = Settings::new().with(keys::MEMORY_POOL, 1.5);
    assert_eq!(
        MemoryGovernor::from_settings(&bad_fraction).unwrap_err(),
        GovernorError::InvalidFraction(1.5)
    );

    let nan = Settings::new().with(keys::MEMORY_POOL, "NaN");
    assert!(matches!(
        MemoryGovernor::from_settings(&nan),
        Err(GovernorError::InvalidFraction(_))
    ));

    let garbage = Settings::new().with(keys::MEMORY_POOL_SIZE, "lots");
    assert!(matches!(
        MemoryGovernor::from_settings(&garbage),
        Err(GovernorError::InvalidSetting(_))
    ));

    let tiny = Settings::new()
        .with(keys::MEMORY_POOL_SIZE, 1)
        .with(keys::MEMORY_POOL, 0.5);
    assert_eq!(
        MemoryGovernor::from_settings(&tiny).unwrap_err(),
        GovernorError::EmptyBudget
    );
}

#[test]
fn test_get_or_create_returns_one_instance_across_threads() {
    let settings = Settings::new();
    let handles: Vec<GovernorHandle> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| MemoryGovernor::get_or_create(&settings).unwrap()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let first = &handles[0];
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, first)));
    assert!(Arc::ptr_eq(&MemoryGovernor::global().unwrap(), first));

    // Later settings do not replace the instance
    let other = Settings::new().with(keys::MEMORY_POOL_SIZE, 10);
    assert!(Arc::ptr_eq(&MemoryGovernor::get_or_create(&other).unwrap(), first));
}

#[test]
fn test_concurrent_register_and_unregister_balance_out() {
    let governor = Arc::new(MemoryGovernor::new(10_000).unwrap());
    std::thread::scope(|scope| {
        for t in 0..8u64 {
            let governor = &governor;
            scope.spawn(move || {
                for i in 0..200u64 {
                    let lease = governor.lease(1000 + t * 10 + i);
                    assert!(lease.initial_stripe_size() <= 1000 + t * 10 + i);
                    let _ = lease.check(500);
                }
            });
        }
    });
    assert_eq!(governor.registered_writers(), 0);
    assert_eq!(governor.total_requested(), 0);
    assert_eq!(governor.allocation_scale(), 1.0);
}

proptest! {
    #[test]
    fn prop_shares_never_exceed_budget_or_request(
        budget in 1u64..1_000_000,
        requests in proptest::collection::vec(0u64..2_000_000, 1..20),
    ) {
        let governor = MemoryGovernor::new(budget).unwrap();
        let ids: Vec<_> = requests.iter().map(|&r| governor.register(r).id).collect();

        let shares: Vec<u64> = ids
            .iter()
            .map(|&id| governor.effective_stripe_size(id).unwrap())
            .collect();
        let total_requested: u64 = requests.iter().sum();
        let total_granted: u64 = shares.iter().sum();

        let active = requests.iter().filter(|&&r| r > 0).count() as u64;

        for (share, request) in shares.iter().zip(&requests) {
            prop_assert!(share <= request);
            if *request > 0 {
                prop_assert!(*share >= 1);
            }
        }
        if total_requested <= budget {
            prop_assert_eq!(&shares, &requests);
        } else {
            prop_assert!(total_granted <= budget.max(active));
        }
    }
}
