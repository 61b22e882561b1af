use crate::error::EngineError;
use crate::session::{start_play, AiPlayer, Move, MoveContext};
use bridge_core::auction::{Auction, AuctionOutcome, AuctionStatus};
use bridge_core::board::{Board, Position};
use bridge_core::error::DealError;
use bridge_core::play::{BoardResult, PlayOutcome, PlayState};
use log::{debug, info};
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Auction,
    Play,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableResult {
    /// Four passes; the board must be redealt.
    PassedOut,
    Played(BoardResult),
}

/// One board in progress. Every accepted move bumps the move counter.
#[derive(Debug, Clone)]
pub struct Table {
    board: Board,
    auction: Auction,
    play: Option<PlayState>,
    result: Option<TableResult>,
    moves: u64,
}

impl Table {
    /// Seats a board. Fails if the deal is not an exact partition of the deck.
    pub fn new(board: Board) -> Result<Self, DealError> {
        board.deal.validate()?;
        let auction = Auction::new(board.dealer);
        Ok(Self {
            board,
            auction,
            play: None,
            result: None,
            moves: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn play(&self) -> Option<&PlayState> {
        self.play.as_ref()
    }

    pub fn result(&self) -> Option<&TableResult> {
        self.result.as_ref()
    }

    pub fn move_counter(&self) -> u64 {
        self.moves
    }

    pub fn phase(&self) -> TablePhase {
        if self.result.is_some() {
            TablePhase::Finished
        } else if self.play.is_some() {
            TablePhase::Play
        } else {
            TablePhase::Auction
        }
    }

    /// The seat owing the next move, `None` once the board is finished.
    pub fn to_act(&self) -> Option<Position> {
        match self.phase() {
            TablePhase::Auction => Some(self.auction.current_player()),
            TablePhase::Play => self.play.as_ref().map(|p| p.to_act()),
            TablePhase::Finished => None,
        }
    }

    /// The player who decides for `seat`: declarer plays dummy's cards.
    pub fn controller(&self, seat: Position) -> Position {
        match &self.play {
            Some(play) if play.contract().dummy() == seat => play.contract().declarer,
            _ => seat,
        }
    }

    pub fn context(&self, seat: Position) -> MoveContext<'_> {
        let hand = match &self.play {
            Some(play) => play.hand(seat),
            None => self.board.hand(seat),
        };
        MoveContext {
            hand,
            vulnerability: self.board.vulnerability,
            auction: &self.auction,
            play: self.play.as_ref(),
            move_number: self.moves,
        }
    }

    /// Applies a move for `seat`. A rejected move leaves the table unchanged.
    pub fn apply(&mut self, seat: Position, mv: Move) -> Result<(), EngineError> {
        match (self.phase(), mv) {
            (TablePhase::Auction, Move::Call(call)) => {
                let status = self.auction.apply_bid(seat, call)?;
                self.moves += 1;
                match status {
                    AuctionStatus::Open => {}
                    AuctionStatus::PassedOut => {
                        info!("board {} passed out", self.board.number);
                        self.result = Some(TableResult::PassedOut);
                    }
                    AuctionStatus::Completed => {
                        if let Some(AuctionOutcome::Contract(contract)) = self.auction.outcome() {
                            info!("board {}: contract {contract}", self.board.number);
                            self.play = Some(start_play(
                                contract,
                                self.board.deal.clone(),
                                self.board.vulnerability,
                            )?);
                        }
                    }
                }
                Ok(())
            }
            (TablePhase::Play, Move::Card(card)) => {
                let Some(play) = self.play.as_mut() else {
                    return Err(EngineError::WrongPhase("no contract".into()));
                };
                let outcome = play.apply_play(seat, card)?;
                self.moves += 1;
                if let PlayOutcome::BoardComplete(result) = outcome {
                    self.result = Some(TableResult::Played(result));
                }
                Ok(())
            }
            (TablePhase::Finished, _) => {
                Err(EngineError::WrongPhase("the board is finished".into()))
            }
            (TablePhase::Auction, Move::Card(_)) => {
                Err(EngineError::WrongPhase("cards cannot be played during the auction".into()))
            }
            (TablePhase::Play, Move::Call(_)) => {
                Err(EngineError::WrongPhase("the auction is over".into()))
            }
        }
    }
}

/// "`seat` owes a move", valid only while the table's move counter still
/// equals `stamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub seat: Position,
    pub stamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Applied { seat: Position, mv: Move },
    /// The entry no longer matched the table and was dropped.
    Stale(PendingMove),
}

/// Drives AI seats one move at a time from an explicit queue.
pub struct Scheduler {
    ai_seats: [bool; 4],
    queue: VecDeque<PendingMove>,
    think_time: Duration,
}

impl Scheduler {
    pub fn new(ai_seats: &[Position]) -> Self {
        let mut seats = [false; 4];
        for seat in ai_seats {
            seats[seat.idx()] = true;
        }
        Self {
            ai_seats: seats,
            queue: VecDeque::new(),
            think_time: Duration::ZERO,
        }
    }

    /// Pause before each AI move is requested.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    pub fn is_ai(&self, seat: Position) -> bool {
        self.ai_seats[seat.idx()]
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues the seat to act if an AI controls it. Returns whether an entry
    /// was added.
    pub fn schedule(&mut self, table: &Table) -> bool {
        let Some(seat) = table.to_act() else {
            return false;
        };
        if !self.is_ai(table.controller(seat)) {
            return false;
        }
        self.queue.push_back(PendingMove {
            seat,
            stamp: table.move_counter(),
        });
        true
    }

    /// Processes one queue entry. `None` when the queue is empty.
    pub fn step(
        &mut self,
        table: &mut Table,
        player: &dyn AiPlayer,
    ) -> Result<Option<Step>, EngineError> {
        let Some(entry) = self.queue.pop_front() else {
            return Ok(None);
        };
        if entry.stamp != table.move_counter() || table.to_act() != Some(entry.seat) {
            debug!("discarding stale move for {} (stamp {})", entry.seat, entry.stamp);
            return Ok(Some(Step::Stale(entry)));
        }
        if !self.think_time.is_zero() {
            thread::sleep(self.think_time);
        }
        let mv = player.request_move(entry.seat, &table.context(entry.seat))?;
        table.apply(entry.seat, mv)?;
        debug!("{} played {mv}", entry.seat);
        self.schedule(table);
        Ok(Some(Step::Applied {
            seat: entry.seat,
            mv,
        }))
    }

    /// Steps until the queue is empty. Returns the number of moves applied.
    pub fn run(&mut self, table: &mut Table, player: &dyn AiPlayer) -> Result<usize, EngineError> {
        let mut applied = 0;
        while let Some(step) = self.step(table, player)? {
            if matches!(step, Step::Applied { .. }) {
                applied += 1;
            }
        }
        Ok(applied)
    }
}
