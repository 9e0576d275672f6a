use crate::models::chat::ChatSummary;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    UserId,
    Bot,
    Name,
    Handle,
    Mode,
    Language,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::UserId,
        SortColumn::Bot,
        SortColumn::Name,
        SortColumn::Handle,
        SortColumn::Mode,
        SortColumn::Language,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::UserId => "ID",
            SortColumn::Bot => "Bot",
            SortColumn::Name => "Name",
            SortColumn::Handle => "Username",
            SortColumn::Mode => "Mode",
            SortColumn::Language => "Language",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Searchable, sortable, paginated list of chats.
#[derive(Debug)]
pub struct ChatTable {
    rows: Vec<ChatSummary>,
    pub status: TableStatus,
    query: String,
    sort: (SortColumn, SortOrder),
    page: usize,
    page_size: usize,
}

impl ChatTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            status: TableStatus::Loading,
            query: String::new(),
            sort: (SortColumn::UserId, SortOrder::Descending),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn set_rows(&mut self, rows: Vec<ChatSummary>) {
        self.rows = rows;
        self.status = TableStatus::Ready;
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp_page();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 0;
        }
    }

    pub fn sort(&self) -> (SortColumn, SortOrder) {
        self.sort
    }

    /// Clicking the active column flips its order; another column starts
    /// ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            (current, SortOrder::Ascending) if current == column => {
                (column, SortOrder::Descending)
            }
            (current, SortOrder::Descending) if current == column => {
                (column, SortOrder::Ascending)
            }
            _ => (column, SortOrder::Ascending),
        };
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows matching the current query.
    pub fn matching(&self) -> usize {
        self.filtered().len()
    }

    /// Rows of the current page, filtered and sorted. The range is the
    /// 1-based position of the first and last row among the matches.
    pub fn visible(&self) -> (Vec<&ChatSummary>, usize, usize) {
        let mut rows = self.filtered();
        let (column, order) = self.sort;
        rows.sort_by(|a, b| {
            let ord = compare(a, b, column);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });

        let start = self.page * self.page_size;
        let page: Vec<&ChatSummary> = rows.into_iter().skip(start).take(self.page_size).collect();
        let first = if page.is_empty() { 0 } else { start + 1 };
        let last = start + page.len();
        (page, first, last)
    }

    fn filtered(&self) -> Vec<&ChatSummary> {
        let needle = self.query.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| needle.is_empty() || matches(row, &needle))
            .collect()
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }
}

fn matches(row: &ChatSummary, needle: &str) -> bool {
    let fields = [
        Some(row.user_id.as_str()),
        Some(row.bot_type.as_str()),
        row.first_name.as_deref(),
        row.last_name.as_deref(),
        row.username.as_deref(),
        row.relationship_mode.as_deref(),
        row.language.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &ChatSummary, b: &ChatSummary, column: SortColumn) -> Ordering {
    let text = |value: &Option<String>| value.as_deref().unwrap_or_default().to_lowercase();
    match column {
        // Numeric ids sort numerically; anything else falls back to text.
        SortColumn::UserId => match (a.user_id.parse::<i64>(), b.user_id.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.user_id.cmp(&b.user_id),
        },
        SortColumn::Bot => a.bot_type.cmp(&b.bot_type),
        SortColumn::Name => a.full_name().to_lowercase().cmp(&b.full_name().to_lowercase()),
        SortColumn::Handle => text(&a.username).cmp(&text(&b.username)),
        SortColumn::Mode => text(&a.relationship_mode).cmp(&text(&b.relationship_mode)),
        SortColumn::Language => text(&a.language).cmp(&text(&b.language)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::BotType;

    fn row(id: &str, bot: BotType, name: &str) -> ChatSummary {
        ChatSummary {
            user_id: id.to_string(),
            bot_type: bot,
            first_name: Some(name.to_string()),
            last_name: None,
            username: Some(name.to_lowercase()),
            relationship_mode: None,
            language: Some("ru".to_string()),
        }
    }

    fn ids(table: &ChatTable) -> Vec<String> {
        table.visible().0.iter().map(|r| r.user_id.clone()).collect()
    }

    fn table() -> ChatTable {
        let mut table = ChatTable::new(2);
        table.set_rows(vec![
            row("9", BotType::Evg, "Zoe"),
            row("100", BotType::Damon, "Adam"),
            row("42", BotType::Evg, "Mia"),
        ]);
        table
    }

    #[test]
    fn default_sort_is_numeric_id_descending() {
        let table = table();
        assert_eq!(ids(&table), vec!["100", "42"]);
        assert_eq!(table.page_count(), 2);
    }

    #[test]
    fn toggling_sort() {
        let mut table = table();
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort(), (SortColumn::Name, SortOrder::Ascending));
        assert_eq!(ids(&table), vec!["100", "42"]);
        table.toggle_sort(SortColumn::Name);
        assert_eq!(ids(&table), vec!["9", "42"]);
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut table = table();
        table.next_page();
        let (rows, first, last) = table.visible();
        assert_eq!(rows.len(), 1);
        assert_eq!((first, last), (3, 3));
        table.next_page();
        assert_eq!(table.page(), 1);
        table.previous_page();
        table.previous_page();
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn search_filters_and_resets_page() {
        let mut table = table();
        table.next_page();
        table.set_query("MI");
        assert_eq!(table.page(), 0);
        assert_eq!(ids(&table), vec!["42"]);
        assert_eq!(table.matching(), 1);
        assert_eq!(table.total(), 3);

        table.set_query("damon");
        assert_eq!(ids(&table), vec!["100"]);

        table.set_query("nobody");
        let (rows, first, last) = table.visible();
        assert!(rows.is_empty());
        assert_eq!((first, last), (0, 0));
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn shrinking_rows_clamps_page() {
        let mut table = table();
        table.next_page();
        table.set_rows(vec![row("1", BotType::Evg, "Solo")]);
        assert_eq!(table.page(), 0);
        assert_eq!(table.status, TableStatus::Ready);
    }
}
