use std::io::Write;
use std::thread;
use std::time::Duration;

use pirate_vault_core::*;

/// How long to watch and whether to wait for the wall clock.
#[derive(Clone, Debug)]
pub struct WatchPlan {
    pub video: VideoRef,
    pub seconds: u64,
    pub realtime: bool,
}

/// Credits one reward tick; a failed grant is shown and the session goes on.
fn credit<G: RewardGrant + ?Sized, W: Write>(
    grant: &mut G,
    user: &str,
    event: &RewardEvent,
    out: &mut W,
) -> std::io::Result<()> {
    match deliver_reward(grant, user, event) {
        Ok(()) => writeln!(out, "+{} Pirate Coins", event.amount),
        Err(err) => writeln!(out, "Reward not recorded: {err}"),
    }
}

fn finished(scheduler: &RewardScheduler, id: SessionId, seconds: u64) -> bool {
    scheduler
        .session(id)
        .is_none_or(|session| session.is_completed() || session.seconds_watched() >= seconds)
}

/// Runs one watch session to the end of the plan and returns its final state.
pub fn watch<G, C, W>(
    scheduler: &mut RewardScheduler,
    grant: &mut G,
    clock: &C,
    user: &str,
    plan: WatchPlan,
    mut out: W,
) -> anyhow::Result<WatchSession>
where
    G: RewardGrant + ?Sized,
    C: Clock + ?Sized,
    W: Write,
{
    let seconds = plan.seconds;
    let id = scheduler.start_session(plan.video);
    writeln!(
        out,
        "Watching for {}s, {} coins every {}s",
        seconds,
        scheduler.policy().reward_per_interval,
        scheduler.policy().interval()
    )?;

    if plan.realtime {
        scheduler.catch_up(id, clock);
        while !finished(scheduler, id, seconds) {
            thread::sleep(Duration::from_secs(1));
            for event in scheduler.catch_up(id, clock) {
                credit(grant, user, &event, &mut out)?;
            }
        }
    } else {
        while !finished(scheduler, id, seconds) {
            if let Some(event) = scheduler.on_tick(id) {
                credit(grant, user, &event, &mut out)?;
            }
        }
    }

    let session = scheduler
        .stop_session(id)
        .ok_or_else(|| anyhow::anyhow!("session {id:?} vanished"))?;
    writeln!(
        out,
        "Watched {}s, earned {} Pirate Coins",
        session.seconds_watched(),
        session.coins_earned()
    )?;
    Ok(session)
}
