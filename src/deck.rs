use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;

use crate::card::{Card, Rank, Suit, TOTAL_CARDS};
use crate::error::{Error, Result};

/// An ordered 52-card deck; the first card is dealt first.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(TOTAL_CARDS);
        for suit in Suit::ALL {
            for rank in Rank::all() {
                cards.push(Card::from_rank(suit, rank));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// A deck in a fixed order. Must hold each of the 52 cards exactly once.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        if cards.len() != TOTAL_CARDS {
            return Err(Error::DeckSize(cards.len()));
        }
        let mut seen = FxHashSet::default();
        for card in &cards {
            if !seen.insert(*card) {
                return Err(Error::DuplicateCard(*card));
            }
        }
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
