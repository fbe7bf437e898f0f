use std::fmt;
use std::str::FromStr;

use crate::card::{Card, Rank};
use crate::error::{Error, Result};

pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_TABLEAUS: usize = 4;
pub const RESERVE_SIZE: usize = 13;
pub const FOUNDATION_SIZE: usize = 13;
pub const MAX_VISIBLE_WASTE: usize = 3;

/// Logical pile identifier, the handle a presentation layer uses to name piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileId {
    Stock,
    Waste,
    Discard,
    Reserve,
    Foundation(usize),
    Tableau(usize),
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PileId::Stock => f.write_str("stock"),
            PileId::Waste => f.write_str("waste"),
            PileId::Discard => f.write_str("discard"),
            PileId::Reserve => f.write_str("reserve"),
            PileId::Foundation(idx) => write!(f, "foundation-{idx}"),
            PileId::Tableau(idx) => write!(f, "tableau-{idx}"),
        }
    }
}

impl FromStr for PileId {
    type Err = Error;

    /// Parses `stock`, `waste`, `discard`, `reserve`, `foundation-N`/`foundationN`
    /// and `tableau-N`/`tableauN` with N in `0..4`.
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || Error::UnknownPile(s.to_string());
        let name = s.trim().to_ascii_lowercase();
        let indexed = |rest: &str, count: usize| -> Result<usize> {
            let rest = rest.strip_prefix('-').unwrap_or(rest);
            match rest.parse::<usize>() {
                Ok(idx) if idx < count => Ok(idx),
                _ => Err(unknown()),
            }
        };
        match name.as_str() {
            "stock" => Ok(PileId::Stock),
            "waste" => Ok(PileId::Waste),
            "discard" => Ok(PileId::Discard),
            "reserve" => Ok(PileId::Reserve),
            _ => {
                if let Some(rest) = name.strip_prefix("foundation") {
                    indexed(rest, TOTAL_FOUNDATIONS).map(PileId::Foundation)
                } else if let Some(rest) = name.strip_prefix("tableau") {
                    indexed(rest, TOTAL_TABLEAUS).map(PileId::Tableau)
                } else {
                    Err(unknown())
                }
            }
        }
    }
}

/// Pile variant. Each kind carries its own acceptance and removal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileKind {
    Stock,
    Waste,
    Reserve,
    /// `base` is the game's base rank, shared by all four foundations.
    Foundation { base: Option<Rank> },
    Tableau,
    Discard,
}

#[derive(Debug, Clone)]
pub struct Pile {
    id: PileId,
    kind: PileKind,
    cards: Vec<Card>,
    visible_count: usize,
}

impl Pile {
    pub fn new(id: PileId) -> Self {
        let kind = match id {
            PileId::Stock => PileKind::Stock,
            PileId::Waste => PileKind::Waste,
            PileId::Discard => PileKind::Discard,
            PileId::Reserve => PileKind::Reserve,
            PileId::Foundation(_) => PileKind::Foundation { base: None },
            PileId::Tableau(_) => PileKind::Tableau,
        };
        Self {
            id,
            kind,
            cards: Vec::new(),
            visible_count: 0,
        }
    }

    pub fn id(&self) -> PileId {
        self.id
    }

    pub fn kind(&self) -> PileKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn base_rank(&self) -> Option<Rank> {
        match self.kind {
            PileKind::Foundation { base } => base,
            _ => None,
        }
    }

    pub(crate) fn set_base_rank(&mut self, rank: Option<Rank>) {
        if let PileKind::Foundation { base } = &mut self.kind {
            *base = rank;
        }
    }

    /// Whether `card` may be placed on top. Pure, safe to call speculatively.
    pub fn can_accept(&self, card: &Card) -> bool {
        match self.kind {
            PileKind::Stock | PileKind::Waste | PileKind::Reserve => false,
            PileKind::Discard => true,
            PileKind::Foundation { base } => match self.peek_top() {
                None => base.is_some_and(|base| card.rank() == base.next()),
                Some(top) => card.suit() == top.suit() && card.rank() == top.rank().next(),
            },
            PileKind::Tableau => match self.peek_top() {
                None => true,
                Some(top) => card.color() != top.color() && Some(card.rank()) == top.rank().prev(),
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.kind, PileKind::Foundation { .. }) && self.cards.len() == FOUNDATION_SIZE
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
        if self.kind == PileKind::Waste {
            self.visible_count = (self.visible_count + 1).min(MAX_VISIBLE_WASTE);
        }
    }

    /// Appends one draw batch; the Waste then shows its last three cards.
    pub(crate) fn push_batch(&mut self, cards: impl IntoIterator<Item = Card>) {
        let before = self.cards.len();
        self.cards.extend(cards);
        if self.cards.len() > before {
            self.visible_count = self.cards.len().min(MAX_VISIBLE_WASTE);
        }
    }

    /// Plain removal of the top card.
    pub fn pop_top(&mut self) -> Option<Card> {
        let card = self.cards.pop()?;
        if self.cards.is_empty() {
            self.visible_count = 0;
        } else {
            self.visible_count = 1.max(self.visible_count.saturating_sub(1));
        }
        Some(card)
    }

    pub fn take_top(&mut self) -> Result<Card> {
        self.pop_top().ok_or(Error::EmptyPile(self.id))
    }

    /// Removal for play: a card leaving the Reserve is turned face-up and the
    /// next Reserve card is exposed.
    pub fn remove_top(&mut self) -> Option<Card> {
        let mut card = self.pop_top()?;
        if self.kind == PileKind::Reserve {
            card.set_face_up(true);
            if let Some(next) = self.cards.last_mut() {
                next.set_face_up(true);
            }
        }
        Some(card)
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Card> {
        self.visible_count = 0;
        self.cards.drain(..)
    }

    /// Cards currently shown: the last draw batch for the Waste, the whole
    /// tableau, the top card for anything else.
    pub fn visible(&self) -> &[Card] {
        let shown = match self.kind {
            PileKind::Waste => self.visible_count.min(self.cards.len()),
            PileKind::Tableau => self.cards.len(),
            _ => self.cards.len().min(1),
        };
        &self.cards[self.cards.len() - shown..]
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.visible_count = 0;
        self.set_base_rank(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn pile_with(id: PileId, cards: &[&str]) -> Pile {
        let mut pile = Pile::new(id);
        for &c in cards {
            pile.push(card(c));
        }
        pile
    }

    #[test]
    fn test_foundation_after_ace_base() {
        let mut foundation = pile_with(PileId::Foundation(0), &["A♠"]);
        foundation.set_base_rank(Some(Rank::ACE));
        assert!(foundation.can_accept(&card("2♠")));
        assert!(!foundation.can_accept(&card("2♥")));
        assert!(!foundation.can_accept(&card("3♠")));
    }

    #[test]
    fn test_empty_foundation_uses_base() {
        let mut foundation = Pile::new(PileId::Foundation(2));
        assert!(!foundation.can_accept(&card("A♠")));
        assert!(!foundation.can_accept(&card("2♠")));
        foundation.set_base_rank(Rank::new(5).ok());
        assert!(foundation.can_accept(&card("6♥")));
        assert!(foundation.can_accept(&card("6♣")));
        assert!(!foundation.can_accept(&card("5♥")));
        assert!(!foundation.can_accept(&card("7♥")));
    }

    #[test]
    fn test_foundation_wraps_king_to_ace() {
        let foundation = pile_with(PileId::Foundation(1), &["K♦"]);
        assert!(foundation.can_accept(&card("A♦")));
        assert!(!foundation.can_accept(&card("A♥")));
    }

    #[test]
    fn test_tableau_alternates_down() {
        let tableau = pile_with(PileId::Tableau(0), &["7♥"]);
        assert!(tableau.can_accept(&card("6♠")));
        assert!(tableau.can_accept(&card("6♣")));
        assert!(!tableau.can_accept(&card("6♥")));
        assert!(!tableau.can_accept(&card("6♦")));
        assert!(!tableau.can_accept(&card("5♠")));
        assert!(!tableau.can_accept(&card("8♠")));
    }

    #[test]
    fn test_tableau_no_wraparound() {
        let tableau = pile_with(PileId::Tableau(3), &["A♣"]);
        assert!(!tableau.can_accept(&card("K♥")));
        assert!(Pile::new(PileId::Tableau(3)).can_accept(&card("K♥")));
    }

    #[test]
    fn test_sources_never_accept() {
        for id in [PileId::Stock, PileId::Waste, PileId::Reserve] {
            assert!(!Pile::new(id).can_accept(&card("5♠")));
            assert!(!pile_with(id, &["6♥"]).can_accept(&card("5♠")));
        }
        assert!(Pile::new(PileId::Discard).can_accept(&card("5♠")));
        assert!(pile_with(PileId::Discard, &["5♥"]).can_accept(&card("J♠")));
    }

    #[test]
    fn test_can_accept_does_not_mutate() {
        let tableau = pile_with(PileId::Tableau(1), &["9♣", "8♦"]);
        let before = tableau.cards().to_vec();
        let _ = tableau.can_accept(&card("7♦"));
        let _ = tableau.can_accept(&card("7♠"));
        assert_eq!(tableau.cards(), before.as_slice());
    }

    #[test]
    fn test_reserve_removal_exposes_next() {
        let mut reserve = pile_with(PileId::Reserve, &["3♣", "9♥", "Q♠"]);
        let top = reserve.remove_top().unwrap();
        assert_eq!(top, card("Q♠"));
        assert!(top.is_face_up());
        assert!(reserve.peek_top().unwrap().is_face_up());
        assert!(!reserve.cards()[0].is_face_up());
    }

    #[test]
    fn test_take_top_empty() {
        let mut stock = Pile::new(PileId::Stock);
        assert_eq!(stock.pop_top(), None);
        assert_eq!(stock.take_top(), Err(Error::EmptyPile(PileId::Stock)));
    }

    #[test]
    fn test_waste_visible_batch() {
        let mut waste = Pile::new(PileId::Waste);
        waste.push_batch([card("2♠"), card("3♠"), card("4♠")]);
        waste.push_batch([card("5♠"), card("6♠")]);
        assert_eq!(waste.visible(), &[card("4♠"), card("5♠"), card("6♠")]);
        waste.pop_top();
        assert_eq!(waste.visible(), &[card("4♠"), card("5♠")]);
        waste.pop_top();
        assert_eq!(waste.visible(), &[card("4♠")]);
    }

    #[test]
    fn test_waste_short_first_batch() {
        let mut waste = Pile::new(PileId::Waste);
        waste.push_batch([card("9♦")]);
        assert_eq!(waste.visible(), &[card("9♦")]);
        waste.push_batch([card("10♦")]);
        assert_eq!(waste.visible(), &[card("9♦"), card("10♦")]);
        waste.push_batch(std::iter::empty());
        assert_eq!(waste.visible().len(), 2);
    }

    #[test]
    fn test_pile_id_names() {
        assert_eq!("tableau-2".parse::<PileId>(), Ok(PileId::Tableau(2)));
        assert_eq!("tableau2".parse::<PileId>(), Ok(PileId::Tableau(2)));
        assert_eq!("Foundation0".parse::<PileId>(), Ok(PileId::Foundation(0)));
        assert_eq!("stock".parse::<PileId>(), Ok(PileId::Stock));
        assert!("tableau-4".parse::<PileId>().is_err());
        assert!("pile".parse::<PileId>().is_err());
        for id in [PileId::Reserve, PileId::Foundation(3), PileId::Tableau(0)] {
            assert_eq!(id.to_string().parse::<PileId>(), Ok(id));
        }
    }
}
