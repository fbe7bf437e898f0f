use std::fmt;

use crate::card::Card;
use crate::pile::PileId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rank outside `1..=13`.
    InvalidRank(u8),
    EmptyPile(PileId),
    UnknownPile(String),
    DuplicateCard(Card),
    DeckSize(usize),
    /// Fewer than 52 cards are present across the piles.
    MissingCards(usize),
    InvalidAction(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRank(rank) => write!(f, "Invalid rank {rank}, expected 1..=13"),
            Error::EmptyPile(id) => write!(f, "Pile '{id}' is empty"),
            Error::UnknownPile(name) => write!(f, "Unknown pile '{name}'"),
            Error::DuplicateCard(card) => write!(f, "Card {card} appears more than once"),
            Error::DeckSize(size) => write!(f, "Deck has {size} cards, expected 52"),
            Error::MissingCards(count) => write!(f, "{count} cards are missing from the board"),
            Error::InvalidAction(action) => write!(f, "Invalid action '{action}'"),
        }
    }
}

impl std::error::Error for Error {}
