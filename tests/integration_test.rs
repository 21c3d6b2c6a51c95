use dining_table::config::{ConfigError, TableConfig};
use dining_table::lifecycle::{Table, TableError};
use dining_table::model::{Phase, PhaseEvent};
use dining_table::ring::RingError;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;

fn fast_config(seats: usize) -> TableConfig {
    TableConfig {
        seats,
        tick: Duration::from_millis(2),
        watchdog_interval: Duration::from_millis(10),
        ..TableConfig::default()
    }
}

/// Reads events until every seat has eaten `meals` times, checking on every
/// event that no fork is shared by two eaters.
async fn watch_until_everyone_ate(
    rx: &mut mpsc::UnboundedReceiver<PhaseEvent>,
    seats: usize,
    meals: usize,
) -> usize {
    let mut eating: HashSet<usize> = HashSet::new();
    let mut eaten = vec![0usize; seats];
    let mut peak = 0;

    while eaten.iter().any(|&n| n < meals) {
        let event = rx.recv().await.expect("event channel closed");
        match event.phase {
            Phase::Eating => {
                let left = (event.seat + seats - 1) % seats;
                let right = (event.seat + 1) % seats;
                assert!(
                    !eating.contains(&left) && !eating.contains(&right),
                    "seat {} eats next to a neighbour: {:?}",
                    event.seat,
                    eating
                );
                assert!(eating.insert(event.seat), "seat {} ate twice", event.seat);
                eaten[event.seat] += 1;
                peak = peak.max(eating.len());
                assert!(eating.len() <= seats / 2, "too many eaters: {eating:?}");
            }
            Phase::Thinking => {
                eating.remove(&event.seat);
            }
            Phase::Hungry => {}
        }
    }
    peak
}

/// Two philosophers share the same pair of forks and must take turns.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_seats_take_turns() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let table = Table::open(fast_config(2), Some(tx)).await.unwrap();

    let peak = tokio::time::timeout(
        Duration::from_secs(10),
        watch_until_everyone_ate(&mut rx, 2, 5),
    )
    .await
    .expect("two seats did not both eat");
    assert_eq!(peak, 1);

    let summary = table.shutdown().await.unwrap();
    assert!(summary.meals.iter().all(|m| m.meals >= 5));
    assert!(summary.deadlocks.is_empty());
}

/// The default table of 16: everyone eats, never more than 8 at once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sixteen_seats_all_eat() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let table = Table::open(fast_config(16), Some(tx)).await.unwrap();

    let peak = tokio::time::timeout(
        Duration::from_secs(20),
        watch_until_everyone_ate(&mut rx, 16, 1),
    )
    .await
    .expect("not every seat ate");
    assert!(peak >= 1 && peak <= 8);
    assert_eq!(table.deadlock(), None);

    let summary = table.shutdown().await.unwrap();
    assert_eq!(summary.meals.len(), 16);
    for (seat, meals) in summary.meals.iter().enumerate() {
        assert_eq!(meals.seat, seat);
        assert!(meals.meals >= 1, "seat {seat} starved");
    }
    assert!(summary.deadlocks.is_empty());
}

/// A single seat would pair a fork with itself and is rejected up front.
#[tokio::test]
async fn test_single_seat_is_a_configuration_error() {
    let result = Table::start(TableConfig::with_seats(1), None);
    assert_eq!(
        result.err(),
        Some(TableError::Config(ConfigError::TooFewSeats { seats: 1 }))
    );
}

#[tokio::test]
async fn test_unknown_reversed_seat_is_rejected() {
    let config = TableConfig {
        reversed_seats: vec![9],
        ..TableConfig::with_seats(3)
    };
    assert_eq!(
        Table::start(config, None).err(),
        Some(TableError::Config(ConfigError::UnknownSeat { seat: 9, seats: 3 }))
    );
}

/// A zero watchdog interval would panic the watchdog task; it is refused first.
#[tokio::test]
async fn test_zero_watchdog_interval_is_rejected() {
    let config = TableConfig {
        watchdog_interval: Duration::ZERO,
        ..TableConfig::with_seats(3)
    };
    assert_eq!(
        Table::start(config, None).err(),
        Some(TableError::Config(ConfigError::ZeroWatchdogInterval))
    );
}

/// Nobody eats between seating and serving, and serving is one-shot.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_nobody_eats_before_forks_are_served() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut table = Table::start(fast_config(4), Some(tx)).unwrap();
    table.wait_seated().await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!table.ring().is_served());
    assert_eq!(table.board().eating(), 0);
    while let Ok(event) = rx.try_recv() {
        assert_ne!(event.phase, Phase::Eating, "seat {} ate early", event.seat);
    }

    table.serve().unwrap();
    assert_eq!(
        table.serve(),
        Err(TableError::Ring(RingError::AlreadyReleased))
    );

    let first_meal = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.unwrap();
            if event.phase == Phase::Eating {
                return event.seat;
            }
        }
    })
    .await
    .expect("nobody ate after serving");
    assert!(first_meal < 4);

    table.shutdown().await.unwrap();
}

/// Shutting down before the forks are served still joins every seat.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_before_serving() {
    let table = Table::start(fast_config(3), None).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(5), table.shutdown())
        .await
        .expect("shutdown hung")
        .unwrap();
    assert_eq!(summary.total_meals(), 0);
    assert_eq!(summary.meals.len(), 3);
}
