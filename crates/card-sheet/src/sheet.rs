//! Pagination of cards onto sheets
//!
//! A [`Paginator`] accepts cards one at a time, in order, and closes a page
//! as soon as it holds `rows × cols` cards. Finishing the paginator closes
//! the last (possibly partial) page and yields the [`SheetDocument`] plan
//! that the renderer turns into PDF pages.

use crate::layout::{CellPlacement, GridLayout};
use crate::types::{Result, SheetError};

/// One cell of a page and the image drawn into it
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCard {
    /// Index into the image list handed to the renderer (None = marks only)
    pub image: Option<usize>,
    /// Geometry of the cell
    pub placement: CellPlacement,
}

/// A closed page of the sheet document
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPage {
    /// One-based page number
    pub number: usize,
    /// Cards on this page in slot order
    pub cards: Vec<PlacedCard>,
    /// Whether the page number is stamped on this page
    pub stamp_number: bool,
}

/// Ordered pages ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDocument {
    pub pages: Vec<SheetPage>,
}

impl SheetDocument {
    /// Paginate `count` cards, card `i` drawing image `i`.
    pub fn paginate(grid: &GridLayout, count: usize, number_pages: bool) -> Result<Self> {
        if count == 0 {
            return Err(SheetError::NoCards);
        }

        let mut paginator = Paginator::new(grid.clone(), number_pages);
        for image in 0..count {
            paginator.place(Some(image));
        }
        Ok(paginator.finish())
    }

    /// A single page with one image repeated into every cell.
    ///
    /// Used for back sheets, where the same artwork fills the grid.
    pub fn repeated(grid: &GridLayout) -> Self {
        Self::single_page(grid, Some(0))
    }

    /// A single page with no images, only marks (cut guides)
    pub fn marks_only(grid: &GridLayout) -> Self {
        Self::single_page(grid, None)
    }

    fn single_page(grid: &GridLayout, image: Option<usize>) -> Self {
        let mut paginator = Paginator::new(grid.clone(), false);
        for _ in 0..grid.cell_count() {
            paginator.place(image);
        }
        paginator.finish()
    }

    /// Number of distinct images the pages refer to
    pub fn image_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.cards.iter())
            .filter_map(|card| card.image)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Total number of placed cells
    pub fn card_count(&self) -> usize {
        self.pages.iter().map(|page| page.cards.len()).sum()
    }
}

/// State of the page currently being filled
#[derive(Debug, Clone, PartialEq)]
enum PageState {
    /// No page open yet, or the previous page was closed
    Idle,
    /// Page open with room for more cards
    Accumulating(SheetPage),
    /// Page holds a full grid; the next card opens a new page
    Full(SheetPage),
}

/// Streaming paginator over an ordered sequence of cards
#[derive(Debug, Clone)]
pub struct Paginator {
    grid: GridLayout,
    number_pages: bool,
    state: PageState,
    closed: Vec<SheetPage>,
}

impl Paginator {
    pub fn new(grid: GridLayout, number_pages: bool) -> Self {
        Self {
            grid,
            number_pages,
            state: PageState::Idle,
            closed: Vec::new(),
        }
    }

    /// Place the next card in input order.
    pub fn place(&mut self, image: Option<usize>) {
        let capacity = self.grid.cell_count();

        let mut page = match std::mem::replace(&mut self.state, PageState::Idle) {
            PageState::Idle => self.open_page(),
            PageState::Accumulating(page) => page,
            PageState::Full(page) => {
                self.close_page(page);
                self.open_page()
            }
        };

        let slot = page.cards.len();
        if let Some(placement) = self.grid.place(slot) {
            page.cards.push(PlacedCard { image, placement });
        }

        self.state = if page.cards.len() >= capacity {
            PageState::Full(page)
        } else {
            PageState::Accumulating(page)
        };
    }

    /// Number of pages closed or open so far
    pub fn page_count(&self) -> usize {
        match self.state {
            PageState::Idle => self.closed.len(),
            _ => self.closed.len() + 1,
        }
    }

    /// Close the last page and return the finished document
    pub fn finish(mut self) -> SheetDocument {
        match std::mem::replace(&mut self.state, PageState::Idle) {
            PageState::Idle => {}
            PageState::Accumulating(page) | PageState::Full(page) => self.close_page(page),
        }

        SheetDocument { pages: self.closed }
    }

    fn open_page(&self) -> SheetPage {
        SheetPage {
            number: self.closed.len() + 1,
            cards: Vec::with_capacity(self.grid.cell_count()),
            stamp_number: self.number_pages,
        }
    }

    fn close_page(&mut self, page: SheetPage) {
        log::debug!(
            "Closing page {} with {} card(s)",
            page.number,
            page.cards.len()
        );
        self.closed.push(page);
    }
}
