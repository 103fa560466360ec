use super::catalog::CardCatalog;
use crate::models::card::CatalogCard;
use crate::models::deck::{DeckList, SaveDeckRequest};
use crate::utils::errors::DeckBuilderError;
use std::fmt::Display;
use std::str::FromStr;

pub const MAIN_CAPACITY: usize = 60;
pub const EXTRA_CAPACITY: usize = 15;
pub const SIDE_CAPACITY: usize = 15;
pub const MAX_COPIES: usize = 3;
pub const DEFAULT_DECK_NAME: &str = "mydeck";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckSection {
    Main,
    Extra,
    Side,
}

impl DeckSection {
    pub fn capacity(&self) -> usize {
        match self {
            DeckSection::Main => MAIN_CAPACITY,
            DeckSection::Extra => EXTRA_CAPACITY,
            DeckSection::Side => SIDE_CAPACITY,
        }
    }
}

impl Display for DeckSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            DeckSection::Main => "main",
            DeckSection::Extra => "extra",
            DeckSection::Side => "side",
        };

        write!(f, "{}", str)
    }
}

impl FromStr for DeckSection {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "main" => Ok(DeckSection::Main),
            "extra" => Ok(DeckSection::Extra),
            "side" => Ok(DeckSection::Side),
            _ => Err(()),
        }
    }
}

/// Main deck cards grouped for display. Cards of another type are left out.
#[derive(Debug, Default, PartialEq)]
pub struct CategorizedMain<'c> {
    pub monsters: Vec<&'c CatalogCard>,
    pub spells: Vec<&'c CatalogCard>,
    pub traps: Vec<&'c CatalogCard>,
}

/// Editable deck lists plus the paginated, searchable card pool.
pub struct DeckBuilder<'c> {
    catalog: &'c CardCatalog,
    main: Vec<String>,
    extra: Vec<String>,
    side: Vec<String>,
    filtered: Vec<&'c CatalogCard>,
    page: usize,
    per_page: usize,
}

impl<'c> DeckBuilder<'c> {
    pub fn new(catalog: &'c CardCatalog, viewport_width: u32) -> Self {
        Self {
            catalog,
            main: Vec::new(),
            extra: Vec::new(),
            side: Vec::new(),
            filtered: catalog.cards().iter().collect(),
            page: 1,
            per_page: cards_per_page_for_width(viewport_width),
        }
    }

    pub fn section(&self, section: DeckSection) -> &[String] {
        match section {
            DeckSection::Main => &self.main,
            DeckSection::Extra => &self.extra,
            DeckSection::Side => &self.side,
        }
    }

    fn section_mut(&mut self, section: DeckSection) -> &mut Vec<String> {
        match section {
            DeckSection::Main => &mut self.main,
            DeckSection::Extra => &mut self.extra,
            DeckSection::Side => &mut self.side,
        }
    }

    /// Adds a catalog card to `target`.
    ///
    /// Fusion monsters always go to the extra deck, and the extra deck only
    /// takes fusions. Full sections and a fourth copy are refused.
    pub fn add_card(&mut self, name: &str, target: DeckSection) -> Result<DeckSection, DeckBuilderError> {
        let card = self
            .catalog
            .get(name)
            .ok_or_else(|| DeckBuilderError::UnknownCard(name.to_string()))?;

        let section = match (card.is_fusion(), target) {
            (true, _) => DeckSection::Extra,
            (false, DeckSection::Extra) => DeckSection::Main,
            (false, other) => other,
        };

        let list = self.section_mut(section);
        if list.len() >= section.capacity() {
            return Err(DeckBuilderError::SectionFull(section.to_string()));
        }
        if list.iter().filter(|held| *held == name).count() >= MAX_COPIES {
            return Err(DeckBuilderError::TooManyCopies(name.to_string()));
        }

        list.push(name.to_string());
        Ok(section)
    }

    /// Removes the card at `index`, if any.
    pub fn remove(&mut self, section: DeckSection, index: usize) -> Option<String> {
        let list = self.section_mut(section);
        (index < list.len()).then(|| list.remove(index))
    }

    /// Removes the first copy of `name`, if any.
    pub fn remove_card(&mut self, section: DeckSection, name: &str) -> bool {
        let list = self.section_mut(section);
        match list.iter().position(|held| held == name) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces all three lists. Loaded decks are taken as they are.
    pub fn load(&mut self, deck: DeckList) {
        self.main = deck.main;
        self.extra = deck.extra;
        self.side = deck.side;
    }

    pub fn deck(&self) -> DeckList {
        DeckList {
            main: self.main.clone(),
            extra: self.extra.clone(),
            side: self.side.clone(),
        }
    }

    pub fn to_request(&self, deck_name: &str) -> SaveDeckRequest {
        let deck_name = match deck_name.trim() {
            "" => DEFAULT_DECK_NAME,
            name => name,
        };

        SaveDeckRequest {
            main: self.main.clone(),
            extra: self.extra.clone(),
            side: self.side.clone(),
            deck_name: deck_name.to_string(),
        }
    }

    pub fn categorized_main(&self) -> CategorizedMain<'c> {
        let mut groups = CategorizedMain::default();
        for card in self.main.iter().filter_map(|name| self.catalog.get(name)) {
            if card.card_type.contains("Monster") {
                groups.monsters.push(card);
            } else if card.card_type.contains("Spell") {
                groups.spells.push(card);
            } else if card.card_type.contains("Trap") {
                groups.traps.push(card);
            }
        }
        groups
    }

    /// Filters the pool by name and goes back to the first page.
    pub fn set_query(&mut self, term: &str) {
        self.filtered = self.catalog.search(term);
        self.page = 1;
    }

    pub fn filtered(&self) -> &[&'c CatalogCard] {
        &self.filtered
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.per_page)
    }

    pub fn page_cards(&self) -> &[&'c CatalogCard] {
        let start = ((self.page - 1) * self.per_page).min(self.filtered.len());
        let end = (start + self.per_page).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn next_page(&mut self) -> bool {
        if self.page < self.page_count() {
            self.page += 1;
            return true;
        }
        false
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            return true;
        }
        false
    }

    /// Adjusts the page size to a new viewport width. The current page is kept.
    pub fn resize(&mut self, viewport_width: u32) {
        self.per_page = cards_per_page_for_width(viewport_width);
    }
}

/// Cards shown per pool page: two rows at every breakpoint.
pub fn cards_per_page_for_width(width: u32) -> usize {
    match width {
        w if w < 576 => 4,
        w if w < 768 => 6,
        w if w < 992 => 8,
        _ => 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::catalog::tests::catalog;

    #[test]
    fn test_fusion_goes_to_extra() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 1200);

        assert_eq!(
            builder.add_card("Thousand-Eyes Restrict", DeckSection::Main),
            Ok(DeckSection::Extra)
        );
        assert_eq!(builder.add_card("Sangan", DeckSection::Extra), Ok(DeckSection::Main));
        assert_eq!(builder.add_card("Scapegoat", DeckSection::Side), Ok(DeckSection::Side));
        assert_eq!(builder.section(DeckSection::Extra), ["Thousand-Eyes Restrict"]);
    }

    #[test]
    fn test_copy_and_capacity_limits() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 1200);

        for _ in 0..MAX_COPIES {
            builder.add_card("Sangan", DeckSection::Main).unwrap();
        }
        assert_eq!(
            builder.add_card("Sangan", DeckSection::Main),
            Err(DeckBuilderError::TooManyCopies("Sangan".to_string()))
        );
        assert_eq!(
            builder.add_card("Exodia", DeckSection::Main),
            Err(DeckBuilderError::UnknownCard("Exodia".to_string()))
        );

        builder.load(DeckList {
            side: vec!["Pot of Greed".to_string(); SIDE_CAPACITY],
            ..Default::default()
        });
        assert_eq!(
            builder.add_card("Scapegoat", DeckSection::Side),
            Err(DeckBuilderError::SectionFull("side".to_string()))
        );
    }

    #[test]
    fn test_loaded_lists_are_not_validated() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 1200);
        builder.load(DeckList {
            main: vec!["Sangan".to_string(); 5],
            extra: vec!["Unknown Card".to_string()],
            side: Vec::new(),
        });

        assert_eq!(builder.section(DeckSection::Main).len(), 5);
        assert_eq!(builder.deck().extra, vec!["Unknown Card"]);
    }

    #[test]
    fn test_remove_by_index_and_name() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 1200);
        builder.add_card("Sangan", DeckSection::Main).unwrap();
        builder.add_card("Pot of Greed", DeckSection::Main).unwrap();

        assert_eq!(builder.remove(DeckSection::Main, 5), None);
        assert_eq!(builder.remove(DeckSection::Main, 0), Some("Sangan".to_string()));
        assert!(builder.remove_card(DeckSection::Main, "Pot of Greed"));
        assert!(!builder.remove_card(DeckSection::Main, "Pot of Greed"));
        assert!(builder.section(DeckSection::Main).is_empty());
    }

    #[test]
    fn test_categorized_main() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 1200);
        for name in ["Sangan", "Pot of Greed", "Mirror Force", "Scapegoat"] {
            builder.add_card(name, DeckSection::Main).unwrap();
        }

        let groups = builder.categorized_main();
        assert_eq!(groups.monsters.len(), 1);
        assert_eq!(groups.spells.len(), 2);
        assert_eq!(groups.traps.len(), 1);
    }

    #[test]
    fn test_blank_name_saves_as_default() {
        let catalog = catalog();
        let builder = DeckBuilder::new(&catalog, 1200);
        assert_eq!(builder.to_request("   ").deck_name, DEFAULT_DECK_NAME);
        assert_eq!(builder.to_request("goat").deck_name, "goat");
    }

    #[test]
    fn test_search_and_pagination() {
        let catalog = catalog();
        let mut builder = DeckBuilder::new(&catalog, 500);
        assert_eq!(builder.page_count(), 2);
        assert_eq!(builder.page_cards().len(), 4);

        assert!(builder.next_page());
        assert_eq!(builder.page_cards().len(), 2);
        assert!(!builder.next_page());

        builder.set_query("o");
        assert_eq!(builder.page(), 1);
        assert!(builder.filtered().iter().all(|card| card.name.to_lowercase().contains('o')));
        assert!(!builder.prev_page());

        builder.resize(1200);
        assert_eq!(builder.page_count(), 1);
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(cards_per_page_for_width(320), 4);
        assert_eq!(cards_per_page_for_width(576), 6);
        assert_eq!(cards_per_page_for_width(800), 8);
        assert_eq!(cards_per_page_for_width(992), 12);
    }
}
