use crate::options::LayoutSpec;
use crate::types::*;

/// Calculate pagination figures for a run of `card_count` cards
pub fn calculate_statistics(card_count: usize, spec: &LayoutSpec) -> Result<SheetStatistics> {
    spec.validate()?;

    if card_count == 0 {
        return Err(SheetError::NoCards);
    }

    let cards_per_page = spec.cards_per_page();
    let pages = card_count.div_ceil(cards_per_page);
    let cards_on_last_page = card_count - cards_per_page * (pages - 1);

    Ok(SheetStatistics {
        cards: card_count,
        cards_per_page,
        pages,
        cards_on_last_page,
        empty_cells: cards_per_page - cards_on_last_page,
    })
}
