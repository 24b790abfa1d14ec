use std::cell::Cell;
use std::rc::Rc;

use futures::channel::mpsc;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

use super::*;

fn counting_task(pool: &LocalPool) -> (PollTask, mpsc::UnboundedSender<()>, Rc<Cell<u32>>) {
    let (tx, rx) = mpsc::unbounded::<()>();
    let ticks = Rc::new(Cell::new(0));
    let seen = ticks.clone();
    let (task, run) = PollTask::new(rx, move || {
        seen.set(seen.get() + 1);
        async {}
    });
    pool.spawner().spawn_local(run).unwrap();
    (task, tx, ticks)
}

#[test]
fn disposing_the_owner_stops_polling() {
    let mut pool = LocalPool::new();
    let (task, tx, ticks) = counting_task(&pool);
    let owner = Owner::new();
    owner.with(|| cancel_on_cleanup(task));

    tx.unbounded_send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(ticks.get(), 1);

    owner.cleanup();
    let _ = tx.unbounded_send(());
    pool.run_until_stalled();
    assert_eq!(ticks.get(), 1);
}

#[test]
fn polling_continues_while_owner_lives() {
    let mut pool = LocalPool::new();
    let (task, tx, ticks) = counting_task(&pool);
    let owner = Owner::new();
    owner.with(|| cancel_on_cleanup(task));

    for _ in 0..3 {
        tx.unbounded_send(()).unwrap();
        pool.run_until_stalled();
    }
    assert_eq!(ticks.get(), 3);
    drop(owner);
}

#[test]
fn default_options_poll() {
    let options = NotificationsOptions::default();
    assert!(options.auto_refresh);
    assert_eq!(options.filter, NotificationFilter::default());
}
