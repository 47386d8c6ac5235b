use std::io::{BufRead, Write};

use pirate_vault_core::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    New,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(|| "empty command".to_string())?;

    let mut coords = || -> Result<Coord2, String> {
        let mut next = |axis: &str| -> Result<Coord, String> {
            parts
                .next()
                .ok_or_else(|| format!("missing {axis}"))?
                .parse::<Coord>()
                .map_err(|err| format!("bad {axis}: {err}"))
        };
        Ok((next("row")?, next("column")?))
    };

    match verb {
        "r" | "reveal" => Ok(Command::Reveal(coords()?)),
        "f" | "flag" => Ok(Command::Flag(coords()?)),
        "n" | "new" => Ok(Command::New),
        "q" | "quit" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}, try r ROW COL, f ROW COL, n or q")),
    }
}

fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell { is_revealed: true, is_mine: true, .. } => '*',
        Cell { is_revealed: true, adjacent_mines: 0, .. } => '.',
        Cell { is_revealed: true, adjacent_mines, .. } => char::from(b'0' + adjacent_mines),
        Cell { is_flagged: true, .. } => 'F',
        _ => '#',
    }
}

pub fn render<W: Write>(engine: &PlayEngine, elapsed_secs: u64, out: &mut W) -> std::io::Result<()> {
    let board = engine.board();
    let (rows, cols) = board.size();
    let show_mines = engine.state() == GameState::Lost;

    writeln!(out, "mines left: {}  time: {}s", engine.mines_left(), elapsed_secs)?;
    write!(out, "    ")?;
    for col in 0..cols {
        write!(out, "{:>3}", col)?;
    }
    writeln!(out)?;
    for row in 0..rows {
        write!(out, "{:>3} ", row)?;
        for col in 0..cols {
            let cell = board[(row, col)];
            let glyph = if show_mines && cell.is_mine && !cell.is_revealed {
                'x'
            } else {
                cell_glyph(cell)
            };
            write!(out, "{:>3}", glyph)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Everything a game needs besides the board.
pub struct PlayContext<'a, S, G: ?Sized> {
    pub user: &'a str,
    pub rewards: &'a mut GameRewards<S>,
    pub grant: &'a mut G,
}

fn report_win<S: CounterStore, G: RewardGrant + ?Sized, C: Clock, W: Write>(
    ctx: &mut PlayContext<'_, S, G>,
    round: &Round<C>,
    out: &mut W,
) -> anyhow::Result<()> {
    let today = round.clock().today();
    match ctx.rewards.record_win(
        &mut *ctx.grant,
        ctx.user,
        round.difficulty(),
        round.elapsed_secs(),
        today,
    ) {
        Ok(WinReward::Granted { event, plays_today }) => writeln!(
            out,
            "You won! +{} Pirate Coins ({} of {} rewarded games today)",
            event.amount,
            plays_today,
            ctx.rewards.max_daily_plays()
        )?,
        Ok(WinReward::CapReached { .. }) => writeln!(
            out,
            "You won! Daily limit of {} rewarded games reached, come back tomorrow",
            ctx.rewards.max_daily_plays()
        )?,
        Ok(WinReward::Uncounted { event, reason }) => writeln!(
            out,
            "You won! +{} Pirate Coins, but today's game count could not be saved: {reason}",
            event.amount
        )?,
        Err(err) => writeln!(out, "You won, but the reward could not be recorded: {err}")?,
    }
    Ok(())
}

/// Runs the command loop until `q` or end of input.
pub fn play<S, G, C, R, W>(
    ctx: &mut PlayContext<'_, S, G>,
    round: &mut Round<C>,
    mut next_seed: impl FnMut() -> u64,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    S: CounterStore,
    G: RewardGrant + ?Sized,
    C: Clock,
    R: BufRead,
    W: Write,
{
    render(round.engine(), round.elapsed_secs(), &mut out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        log::debug!("{:?}", command);

        match command {
            Command::Quit => break,
            Command::New => {
                round.restart(round.difficulty(), next_seed())?;
            }
            Command::Flag(coords) => {
                if let Err(err) = round.toggle_flag(coords) {
                    writeln!(out, "{err}")?;
                    continue;
                }
            }
            Command::Reveal(coords) => match round.reveal(coords) {
                Ok(RevealOutcome::Won) => {
                    render(round.engine(), round.elapsed_secs(), &mut out)?;
                    report_win(ctx, round, &mut out)?;
                    writeln!(out, "n for a new game, q to quit")?;
                    continue;
                }
                Ok(RevealOutcome::HitMine) => {
                    render(round.engine(), round.elapsed_secs(), &mut out)?;
                    writeln!(out, "Boom! n for a new game, q to quit")?;
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
        }

        render(round.engine(), round.elapsed_secs(), &mut out)?;
    }

    Ok(())
}
