use rustc_hash::FxHashSet;

use crate::card::{Rank, TOTAL_CARDS};
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::pile::{Pile, PileId, RESERVE_SIZE, TOTAL_FOUNDATIONS, TOTAL_TABLEAUS};

/// Stock plus talon size right after a deal: 52 - 13 reserve - 1 base - 4 tableau.
pub const TALON_SIZE: usize = TOTAL_CARDS - RESERVE_SIZE - 1 - TOTAL_TABLEAUS;

/// Rule profile: which talon pile the stock feeds and how the reserve is dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Waste talon, three cards per draw, reserve dealt face-up.
    #[default]
    WasteRuleOf3,
    /// Discard talon that accepts any card, one card per draw, reserve dealt face-down.
    Discard,
}

impl DrawMode {
    pub fn draw_count(self) -> usize {
        match self {
            DrawMode::WasteRuleOf3 => 3,
            DrawMode::Discard => 1,
        }
    }

    pub fn talon_id(self) -> PileId {
        match self {
            DrawMode::WasteRuleOf3 => PileId::Waste,
            DrawMode::Discard => PileId::Discard,
        }
    }

    pub fn reserve_face_up(self) -> bool {
        matches!(self, DrawMode::WasteRuleOf3)
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    mode: DrawMode,
    stock: Pile,
    talon: Pile,
    reserve: Pile,
    foundations: [Pile; TOTAL_FOUNDATIONS],
    tableaus: [Pile; TOTAL_TABLEAUS],
}

impl Board {
    pub fn new(mode: DrawMode) -> Self {
        Self {
            mode,
            stock: Pile::new(PileId::Stock),
            talon: Pile::new(mode.talon_id()),
            reserve: Pile::new(PileId::Reserve),
            foundations: std::array::from_fn(|i| Pile::new(PileId::Foundation(i))),
            tableaus: std::array::from_fn(|i| Pile::new(PileId::Tableau(i))),
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn clear(&mut self) {
        for pile in self.piles_mut() {
            pile.clear();
        }
    }

    /// Clears every pile and lays out a new game from `deck`, in deck order:
    /// reserve, base card, one card per tableau, then the stock.
    pub fn deal(&mut self, deck: Deck) {
        self.clear();
        // Reversed so the stock top is the next card to deal.
        self.stock.push_batch(deck.into_cards().into_iter().rev());

        let reserve_face_up = self.mode.reserve_face_up();
        for _ in 0..RESERVE_SIZE {
            let Some(mut card) = self.stock.pop_top() else {
                break;
            };
            card.set_face_up(reserve_face_up);
            self.reserve.push(card);
        }
        if let Some(top) = self.reserve.cards_mut().last_mut() {
            top.set_face_up(true);
        }

        if let Some(mut base) = self.stock.pop_top() {
            base.set_face_up(true);
            for foundation in &mut self.foundations {
                foundation.set_base_rank(Some(base.rank()));
            }
            self.foundations[0].push(base);
            log::info!("Dealt new game, base card {base}");
        }

        for tableau in &mut self.tableaus {
            if let Some(mut card) = self.stock.pop_top() {
                card.set_face_up(true);
                tableau.push(card);
            }
        }

        for card in self.stock.cards_mut() {
            card.set_face_up(false);
        }
    }

    pub fn stock(&self) -> &Pile {
        &self.stock
    }

    /// The pile the stock draws into, Waste or Discard depending on the mode.
    pub fn talon(&self) -> &Pile {
        &self.talon
    }

    pub fn reserve(&self) -> &Pile {
        &self.reserve
    }

    pub fn foundations(&self) -> &[Pile; TOTAL_FOUNDATIONS] {
        &self.foundations
    }

    pub fn tableaus(&self) -> &[Pile; TOTAL_TABLEAUS] {
        &self.tableaus
    }

    pub fn base_rank(&self) -> Option<Rank> {
        self.foundations[0].base_rank()
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        match id {
            PileId::Stock => Some(&self.stock),
            PileId::Reserve => Some(&self.reserve),
            PileId::Waste | PileId::Discard if id == self.talon.id() => Some(&self.talon),
            PileId::Foundation(idx) => self.foundations.get(idx),
            PileId::Tableau(idx) => self.tableaus.get(idx),
            _ => None,
        }
    }

    pub(crate) fn pile_mut(&mut self, id: PileId) -> Option<&mut Pile> {
        match id {
            PileId::Stock => Some(&mut self.stock),
            PileId::Reserve => Some(&mut self.reserve),
            PileId::Waste | PileId::Discard if id == self.talon.id() => Some(&mut self.talon),
            PileId::Foundation(idx) => self.foundations.get_mut(idx),
            PileId::Tableau(idx) => self.tableaus.get_mut(idx),
            _ => None,
        }
    }

    pub(crate) fn stock_and_talon_mut(&mut self) -> (&mut Pile, &mut Pile) {
        (&mut self.stock, &mut self.talon)
    }

    /// Resolves a pile name such as `tableau-2` to a pile present on this board.
    pub fn pile_id(&self, name: &str) -> Result<PileId> {
        let id: PileId = name.parse()?;
        match self.pile(id) {
            Some(_) => Ok(id),
            None => Err(Error::UnknownPile(name.to_string())),
        }
    }

    pub fn piles(&self) -> impl Iterator<Item = &Pile> {
        [&self.stock, &self.talon, &self.reserve]
            .into_iter()
            .chain(self.foundations.iter())
            .chain(self.tableaus.iter())
    }

    fn piles_mut(&mut self) -> impl Iterator<Item = &mut Pile> {
        [&mut self.stock, &mut self.talon, &mut self.reserve]
            .into_iter()
            .chain(self.foundations.iter_mut())
            .chain(self.tableaus.iter_mut())
    }

    pub fn total_cards(&self) -> usize {
        self.piles().map(Pile::len).sum()
    }

    /// Checks that the 52 cards are partitioned across the piles with no
    /// duplicates and none missing.
    pub fn check(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for pile in self.piles() {
            for card in pile.cards() {
                if !seen.insert(*card) {
                    return Err(Error::DuplicateCard(*card));
                }
            }
        }
        if seen.len() != TOTAL_CARDS {
            return Err(Error::MissingCards(TOTAL_CARDS - seen.len()));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    pub fn foundations_complete(&self) -> bool {
        self.foundations.iter().all(Pile::is_complete)
    }

    pub fn foundation_score(&self) -> usize {
        self.foundations.iter().map(Pile::len).sum()
    }

    pub fn pretty_print(&self) -> String {
        let mut output = String::new();
        let format_cards = |pile: &Pile| -> String {
            pile.cards()
                .iter()
                .map(|card| {
                    if card.is_face_up() {
                        card.label()
                    } else {
                        "##".to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        output.push_str(&format!("Stock: {} cards\n", self.stock.len()));

        // Talon, hidden count then the visible cards
        let talon_name = match self.talon.id() {
            PileId::Waste => "Waste",
            _ => "Discard",
        };
        output.push_str(&format!("{talon_name}: "));
        let visible = self.talon.visible();
        let hidden = self.talon.len() - visible.len();
        if hidden > 0 {
            output.push_str(&format!("({hidden}) "));
        }
        output.push_str(
            &visible
                .iter()
                .map(|card| card.label())
                .collect::<Vec<_>>()
                .join(" "),
        );
        output.push('\n');

        // Reserve shows only its top
        output.push_str(&format!("Reserve: ({}) ", self.reserve.len()));
        if let Some(top) = self.reserve.peek_top() {
            output.push_str(&top.label());
        }
        output.push('\n');

        for (i, foundation) in self.foundations.iter().enumerate() {
            output.push_str(&format!("Foundation{}: {}\n", i + 1, format_cards(foundation)));
        }

        for (i, tableau) in self.tableaus.iter().enumerate() {
            output.push_str(&format!("Tableau{}: {}\n", i + 1, format_cards(tableau)));
        }

        if let Some(base) = self.base_rank() {
            output.push_str(&format!("Base: {base}"));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::new(DrawMode::default());
        assert_eq!(board.total_cards(), 0);
        assert_eq!(board.check(), Err(Error::MissingCards(TOTAL_CARDS)));
        assert!(!board.is_valid());
        assert_eq!(board.base_rank(), None);
        assert_eq!(board.talon().id(), PileId::Waste);
    }

    #[test]
    fn test_deal_layout() {
        let deck = Deck::standard();
        let order = deck.cards().to_vec();
        let mut board = Board::new(DrawMode::WasteRuleOf3);
        board.deal(deck);
        board.check().unwrap();

        assert_eq!(board.reserve().len(), RESERVE_SIZE);
        assert_eq!(board.reserve().cards(), &order[..13]);
        assert!(board.reserve().cards().iter().all(|c| c.is_face_up()));

        let base = order[13];
        assert_eq!(board.foundations()[0].cards(), &[base]);
        assert_eq!(board.base_rank(), Some(base.rank()));
        for foundation in board.foundations() {
            assert_eq!(foundation.base_rank(), Some(base.rank()));
        }

        for (i, tableau) in board.tableaus().iter().enumerate() {
            assert_eq!(tableau.cards(), &[order[14 + i]]);
            assert!(tableau.peek_top().unwrap().is_face_up());
        }

        assert_eq!(board.stock().len(), TALON_SIZE);
        assert_eq!(board.stock().peek_top(), Some(&order[18]));
        assert!(board.stock().cards().iter().all(|c| !c.is_face_up()));
        assert!(board.talon().is_empty());
    }

    #[test]
    fn test_discard_mode_reserve_face_down() {
        let mut board = Board::new(DrawMode::Discard);
        board.deal(Deck::shuffled_with_seed(7));
        let reserve = board.reserve().cards();
        assert!(reserve[..12].iter().all(|c| !c.is_face_up()));
        assert!(reserve[12].is_face_up());
        assert_eq!(board.talon().id(), PileId::Discard);
        assert!(board.pile(PileId::Waste).is_none());
        assert!(board.pile(PileId::Discard).is_some());
    }

    #[test]
    fn test_redeal_clears_everything() {
        let mut board = Board::new(DrawMode::WasteRuleOf3);
        board.deal(Deck::shuffled_with_seed(1));
        board.deal(Deck::shuffled_with_seed(2));
        board.check().unwrap();
        assert_eq!(board.total_cards(), TOTAL_CARDS);
        assert_eq!(board.foundations()[0].len(), 1);
        assert!(board.foundations()[1..].iter().all(Pile::is_empty));
    }

    #[test]
    fn test_check_detects_duplicates() {
        let mut board = Board::new(DrawMode::WasteRuleOf3);
        board.deal(Deck::standard());
        let dup = *board.stock().peek_top().unwrap();
        board.pile_mut(PileId::Tableau(0)).unwrap().push(dup);
        assert_eq!(board.check(), Err(Error::DuplicateCard(dup)));
    }

    #[test]
    fn test_pile_lookup_by_name() {
        let board = Board::new(DrawMode::WasteRuleOf3);
        assert_eq!(board.pile_id("tableau-3"), Ok(PileId::Tableau(3)));
        assert_eq!(board.pile_id("waste"), Ok(PileId::Waste));
        assert_eq!(
            board.pile_id("discard"),
            Err(Error::UnknownPile("discard".to_string()))
        );
        assert!(board.pile_id("tableau-9").is_err());
    }

    #[test]
    fn test_pretty_print() {
        let mut board = Board::new(DrawMode::WasteRuleOf3);
        board.deal(Deck::standard());
        let output = board.pretty_print();
        assert!(output.starts_with("Stock: 34 cards\n"));
        assert!(output.contains("Reserve: (13) K♠"));
        assert!(output.contains("Foundation1: A♥"));
        assert!(output.contains("Tableau1: 2♥"));
        assert!(output.ends_with("Base: A"));
    }
}
