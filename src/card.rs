use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const MAX_RANK: u8 = 13;
pub const TOTAL_CARDS: usize = 52;

const RANKS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Spades | Suit::Clubs => Color::Black,
        }
    }

    pub fn is_red(self) -> bool {
        self.color() == Color::Red
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    fn parse(c: char) -> Option<Self> {
        match c {
            '♠' | 'S' | 's' => Some(Suit::Spades),
            '♥' | 'H' | 'h' => Some(Suit::Hearts),
            '♦' | 'D' | 'd' => Some(Suit::Diamonds),
            '♣' | 'C' | 'c' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Card rank, Ace = 1 through King = 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const KING: Rank = Rank(MAX_RANK);

    pub fn new(value: u8) -> Result<Self> {
        if (1..=MAX_RANK).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(Error::InvalidRank(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Foundation successor, wraps King to Ace.
    pub fn next(self) -> Rank {
        Rank(self.0 % MAX_RANK + 1)
    }

    /// Tableau predecessor, no wraparound.
    pub fn prev(self) -> Option<Rank> {
        (self.0 > 1).then(|| Rank(self.0 - 1))
    }

    pub fn label(self) -> &'static str {
        RANKS[(self.0 - 1) as usize]
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=MAX_RANK).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A playing card. Identity is (suit, rank); `face_up` is orientation only.
#[derive(Debug, Clone, Copy)]
pub struct Card {
    suit: Suit,
    rank: Rank,
    face_up: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Result<Self> {
        Ok(Self::from_rank(suit, Rank::new(rank)?))
    }

    pub fn from_rank(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: false,
        }
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    /// Index in `0..52`, suit-major.
    pub fn id(&self) -> usize {
        self.suit as usize * MAX_RANK as usize + (self.rank.0 - 1) as usize
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.suit.hash(state);
        self.rank.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = Error;

    /// Accepts labels like `10♥`, `T♥`, `qs` or `A♠`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidAction(format!("card '{s}'"));
        let s = s.trim();
        let suit_char = s.chars().last().ok_or_else(invalid)?;
        let suit = Suit::parse(suit_char).ok_or_else(invalid)?;
        let rank_str = &s[..s.len() - suit_char.len_utf8()];
        let rank = match rank_str.to_ascii_uppercase().as_str() {
            "T" => 10,
            label => RANKS
                .iter()
                .position(|&r| r == label)
                .map(|idx| idx as u8 + 1)
                .ok_or_else(invalid)?,
        };
        Card::new(suit, rank)
    }
}
