use rand::SeedableRng;
use rand::rngs::StdRng;
use smallvec::SmallVec;

use crate::board::{Board, DrawMode};
use crate::card::{Card, Rank};
use crate::deck::Deck;
use crate::error::Result;
use crate::pile::{Pile, PileId};

pub type DrawnCards = SmallVec<[Card; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub mode: DrawMode,
    /// Fixed shuffle seed; OS entropy when `None`.
    pub seed: Option<u64>,
}

/// A staged move: the card picked up and the pile it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub source: PileId,
    pub card: Card,
}

/// One game table. Owns every pile; all mutation goes through its methods.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    rng: StdRng,
    moves: u32,
    score: u32,
    active: bool,
    selection: Option<Selection>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            board: Board::new(config.mode),
            rng,
            moves: 0,
            score: 0,
            active: false,
            selection: None,
        }
    }

    /// Shuffles a fresh deck and deals it. Safe to call again to restart.
    pub fn start_game(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        self.start_with_deck(deck);
    }

    /// Deals `deck` in its given order.
    pub fn start_with_deck(&mut self, deck: Deck) {
        self.board.deal(deck);
        self.moves = 0;
        self.active = true;
        self.selection = None;
        self.debug_check();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Number of games won at this table.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn base_rank(&self) -> Option<Rank> {
        self.board.base_rank()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Moves the top card of `from` onto `to` if `to` accepts it. A refused
    /// move leaves every pile untouched.
    pub fn move_card(&mut self, from: PileId, to: PileId) -> bool {
        if !self.active || from == to || from == PileId::Stock {
            log::trace!("Refused move {from} -> {to}");
            return false;
        }
        let Some(card) = self.board.pile(from).and_then(Pile::peek_top).copied() else {
            return false;
        };
        let accepted = self
            .board
            .pile(to)
            .is_some_and(|dest| dest.can_accept(&card));
        if !accepted {
            log::trace!("Refused move {card} {from} -> {to}");
            return false;
        }

        let Some(card) = self.board.pile_mut(from).and_then(Pile::remove_top) else {
            return false;
        };
        if let Some(dest) = self.board.pile_mut(to) {
            dest.push(card);
        }
        self.moves += 1;
        self.selection = None;
        log::debug!("Moved {card} {from} -> {to}");

        self.check_win();
        self.debug_check();
        true
    }

    /// `move_card` with piles named as in `PileId`'s textual form.
    pub fn move_by_name(&mut self, from: &str, to: &str) -> Result<bool> {
        let from = self.board.pile_id(from)?;
        let to = self.board.pile_id(to)?;
        Ok(self.move_card(from, to))
    }

    /// Draws up to three cards from the stock onto the talon, face-up, and
    /// returns them. Empty when the stock is exhausted.
    pub fn draw_rule_of_3(&mut self) -> DrawnCards {
        self.draw_cards(3)
    }

    /// Draws as many cards as the draw mode allows.
    pub fn draw(&mut self) -> DrawnCards {
        self.draw_cards(self.config.mode.draw_count())
    }

    fn draw_cards(&mut self, count: usize) -> DrawnCards {
        let mut drawn = DrawnCards::new();
        if !self.active {
            return drawn;
        }
        let (stock, talon) = self.board.stock_and_talon_mut();
        while drawn.len() < count {
            let Some(mut card) = stock.pop_top() else {
                break;
            };
            card.set_face_up(true);
            drawn.push(card);
        }
        talon.push_batch(drawn.iter().copied());
        if !drawn.is_empty() {
            self.selection = None;
            log::debug!("Drew {} cards, {} left in stock", drawn.len(), stock.len());
        }
        self.debug_check();
        drawn
    }

    pub fn need_recycle(&self) -> bool {
        self.board.stock().is_empty() && !self.board.talon().is_empty()
    }

    /// Turns the talon back over into the empty stock, face-down, so the next
    /// pass draws in the same order. Returns whether any card moved.
    pub fn recycle_waste_to_stock(&mut self) -> bool {
        if !self.active || !self.need_recycle() {
            return false;
        }
        let (stock, talon) = self.board.stock_and_talon_mut();
        stock.push_batch(talon.drain().rev().map(|mut card| {
            card.set_face_up(false);
            card
        }));
        self.selection = None;
        log::debug!("Recycled {} cards into the stock", stock.len());
        self.debug_check();
        true
    }

    /// A click on the stock: draw, or recycle once the stock is empty.
    pub fn turn_stock(&mut self) -> bool {
        if self.board.stock().is_empty() {
            self.recycle_waste_to_stock()
        } else {
            !self.draw().is_empty()
        }
    }

    /// Stages the top card of `source` for a later `commit_selection`.
    pub fn select(&mut self, source: PileId) -> Option<Card> {
        self.selection = None;
        if !self.active || source == PileId::Stock {
            return None;
        }
        let card = *self.board.pile(source)?.peek_top()?;
        self.selection = Some(Selection { source, card });
        Some(card)
    }

    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Plays the staged card onto `dest`. The selection is consumed either way.
    pub fn commit_selection(&mut self, dest: PileId) -> bool {
        let Some(Selection { source, card }) = self.selection.take() else {
            return false;
        };
        let still_on_top = self
            .board
            .pile(source)
            .and_then(Pile::peek_top)
            .is_some_and(|top| *top == card);
        still_on_top && self.move_card(source, dest)
    }

    fn check_win(&mut self) {
        if self.board.foundations_complete() {
            self.score += 1;
            self.active = false;
            log::info!("Game won in {} moves, score {}", self.moves, self.score);
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            self.board.is_valid(),
            "Board invariant violated: {:?}",
            self.board.check()
        );
    }
}
