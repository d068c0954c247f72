use serde::Serialize;

/// Growing prefix of the ordered thread list (infinite scroll).
///
/// Every reset starts a new generation; a load that began in an older
/// generation is dropped when it completes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    pub page_size: usize,
    pub displayed: usize,
    pub total: usize,
    pub loading: bool,
    #[serde(skip)]
    generation: u64,
}

/// Handed out by `begin_load`; redeemed by `complete_load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl PaginationWindow {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            displayed: page_size,
            total: 0,
            loading: false,
            generation: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        self.displayed < self.total
    }

    pub fn visible_count(&self) -> usize {
        self.displayed.min(self.total)
    }

    /// Input changed: back to the first page.
    pub fn reset(&mut self, total: usize) {
        self.displayed = self.page_size;
        self.total = total;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Change the page size; takes effect from the next reset.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// `None` when there is nothing more to show or a load is already pending.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.loading || !self.has_more() {
            return None;
        }
        self.loading = true;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Returns false when the ticket belongs to a window that was reset since.
    pub fn complete_load(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        self.displayed = (self.displayed + self.page_size).min(self.total);
        true
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self::new(10)
    }
}
