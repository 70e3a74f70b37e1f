//! Contact list state controller.
//!
//! Owns all widget state (search term, page, loading flag, result rows) and
//! derives the read-only view the renderer consumes. The async seam is
//! explicit: operations that want a fetch return a [`FetchRequest`] snapshot
//! for the host to run, and [`ContactListController::apply_fetch`] consumes
//! the completed outcome. Applying outcomes in arrival order means the last
//! completion wins when fetches overlap; the controller performs no request
//! cancellation or sequencing.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::{ContactRecord, FetchError};

/// How long search input must stay idle before a refetch fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Page size used when none is configured or the configured value is invalid.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sink for user-facing error messages (a toast in the TUI, a recorder in
/// tests). Fire-and-forget.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Snapshot of the inputs for one backend fetch, taken at the moment the
/// fetch was decided. The host runs it against a
/// [`ContactFetcher`](crate::backend::ContactFetcher) and feeds the outcome
/// back through [`ContactListController::apply_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub account_id: String,
    pub search_term: String,
}

/// One displayable contact: the fetched record plus its derived link.
///
/// The link is a presentation concern rebuilt on every fetch; it is not part
/// of the record's identity and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub record: ContactRecord,
    pub contact_url: String,
}

/// Read-only view model exposed to the renderer.
#[derive(Debug)]
pub struct ContactListView<'a> {
    pub visible_rows: &'a [ContactRow],
    pub page: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub has_results: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// State machine behind the contact list widget.
///
/// All mutation goes through the named operations below; the rest of the
/// application only ever reads derived state via [`Self::view`].
pub struct ContactListController {
    /// Account whose contacts are listed. `None` renders an inactive widget
    /// and suppresses every fetch.
    account_id: Option<String>,
    /// Raw configured page size. Kept unparsed so the coercion rule in
    /// [`Self::page_size_effective`] owns the fallback.
    page_size: Option<String>,
    /// Base URL for derived per-contact links.
    link_base: String,
    search_term: String,
    /// Current page, 1-indexed. Always within `[1, total_pages]`.
    page: usize,
    loading: bool,
    rows: Vec<ContactRow>,
    /// Single-slot debounce deadline. A new keystroke replaces it, never
    /// accumulates.
    debounce_deadline: Option<Instant>,
}

impl ContactListController {
    pub fn new(
        account_id: Option<String>,
        page_size: Option<String>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            page_size,
            link_base: link_base.into(),
            search_term: String::new(),
            page: 1,
            loading: false,
            rows: Vec::new(),
            debounce_deadline: None,
        }
    }

    /// Trigger the initial fetch. Without an account id the widget stays
    /// inactive and nothing is fetched.
    pub fn on_mount(&mut self) -> Option<FetchRequest> {
        self.begin_fetch()
    }

    /// Record a search text change and (re)arm the debounce timer.
    ///
    /// No fetch happens here; [`Self::poll_debounce`] fires once the input
    /// has been idle for [`SEARCH_DEBOUNCE`].
    pub fn set_search_term(&mut self, text: &str, now: Instant) {
        self.search_term = text.to_string();
        self.debounce_deadline = Some(now + SEARCH_DEBOUNCE);
    }

    /// Fire the pending debounced refetch if its deadline has passed.
    ///
    /// Called from the host loop on every tick with the current time
    /// (injected so tests stay deterministic).
    pub fn poll_debounce(&mut self, now: Instant) -> Option<FetchRequest> {
        match self.debounce_deadline {
            Some(deadline) if now >= deadline => {
                self.debounce_deadline = None;
                self.begin_fetch()
            }
            _ => None,
        }
    }

    /// Move to the previous page. No-op on the first page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Move to the next page. No-op on the last page.
    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    /// Start a fetch for the current account and search term.
    ///
    /// Returns the request snapshot for the host to run, or `None` when no
    /// account is configured (the loading flag is untouched in that case).
    fn begin_fetch(&mut self) -> Option<FetchRequest> {
        let account_id = self.account_id.clone()?;
        self.loading = true;
        debug!(account = %account_id, search = %self.search_term, "starting contact fetch");
        Some(FetchRequest {
            account_id,
            search_term: self.search_term.clone(),
        })
    }

    /// Apply a completed fetch.
    ///
    /// Success replaces the result set wholesale (order preserved) and
    /// derives each row's link. Failure clears the result set and forwards a
    /// human-readable message to the notifier. Either way the page resets to
    /// 1 and the loading flag drops.
    pub fn apply_fetch(
        &mut self,
        outcome: Result<Vec<ContactRecord>, FetchError>,
        notifier: &mut dyn Notifier,
    ) {
        match outcome {
            Ok(records) => {
                debug!(count = records.len(), "contact fetch succeeded");
                self.rows = records
                    .into_iter()
                    .map(|record| ContactRow {
                        contact_url: contact_url(&self.link_base, &record.id),
                        record,
                    })
                    .collect();
            }
            Err(err) => {
                warn!(error = %err, "contact fetch failed");
                notifier.notify(&err.user_message());
                self.rows.clear();
            }
        }
        self.page = 1;
        self.loading = false;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Whether the widget has an account to fetch for.
    pub fn is_active(&self) -> bool {
        self.account_id.is_some()
    }

    /// The configured page size coerced to a positive integer, falling back
    /// to [`DEFAULT_PAGE_SIZE`] for missing, non-numeric, or non-positive
    /// values.
    pub fn page_size_effective(&self) -> usize {
        self.page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size_effective()).max(1)
    }

    /// The slice of rows on the current page (shorter at the tail).
    pub fn visible_rows(&self) -> &[ContactRow] {
        let size = self.page_size_effective();
        let start = (self.page - 1) * size;
        let end = (start + size).min(self.rows.len());
        self.rows.get(start..end).unwrap_or(&[])
    }

    pub fn has_results(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn prev_disabled(&self) -> bool {
        self.page <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.page >= self.total_pages()
    }

    /// Build the read-only view model for rendering. Derived fields are
    /// recomputed on every call; nothing is cached.
    pub fn view(&self) -> ContactListView<'_> {
        ContactListView {
            visible_rows: self.visible_rows(),
            page: self.page,
            total_pages: self.total_pages(),
            loading: self.loading,
            has_results: self.has_results(),
            prev_disabled: self.prev_disabled(),
            next_disabled: self.next_disabled(),
        }
    }
}

/// Derive the web link for a contact from its id.
fn contact_url(link_base: &str, contact_id: &str) -> String {
    format!("{}/contacts/{}/view", link_base.trim_end_matches('/'), contact_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Vec<String>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    fn record(id: &str) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            name: format!("Contact {id}"),
            title: "CFO".to_string(),
            email: format!("{id}@example.com"),
            phone: "555-0100".to_string(),
            account_name: "Acme".to_string(),
        }
    }

    fn records(count: usize) -> Vec<ContactRecord> {
        (0..count).map(|i| record(&format!("c{i}"))).collect()
    }

    fn controller() -> ContactListController {
        ContactListController::new(
            Some("acct-1".to_string()),
            None,
            "https://crm.example.com",
        )
    }

    fn load(ctrl: &mut ContactListController, count: usize) {
        let mut notifier = RecordingNotifier::default();
        ctrl.begin_fetch().expect("account configured");
        ctrl.apply_fetch(Ok(records(count)), &mut notifier);
        assert!(notifier.messages.is_empty());
    }

    #[test]
    fn test_mount_without_account_does_nothing() {
        let mut ctrl = ContactListController::new(None, None, "https://crm.example.com");
        assert!(ctrl.on_mount().is_none());
        assert!(!ctrl.loading());
        assert!(!ctrl.has_results());
        assert!(!ctrl.is_active());
    }

    #[test]
    fn test_mount_with_account_requests_unfiltered_fetch() {
        let mut ctrl = controller();
        let req = ctrl.on_mount().expect("should fetch on mount");
        assert_eq!(req.account_id, "acct-1");
        assert_eq!(req.search_term, "");
        assert!(ctrl.loading());
    }

    #[test]
    fn test_page_size_falls_back_to_default() {
        let cases = [None, Some("abc"), Some("0"), Some(""), Some("-3"), Some("1.5")];
        for raw in cases {
            let ctrl = ContactListController::new(
                Some("acct-1".to_string()),
                raw.map(String::from),
                "https://crm.example.com",
            );
            assert_eq!(ctrl.page_size_effective(), DEFAULT_PAGE_SIZE, "input {raw:?}");
        }
    }

    #[test]
    fn test_page_size_accepts_valid_input() {
        let ctrl = ContactListController::new(
            Some("acct-1".to_string()),
            Some(" 25 ".to_string()),
            "https://crm.example.com",
        );
        assert_eq!(ctrl.page_size_effective(), 25);
    }

    #[test]
    fn test_total_pages_rounds_up_and_never_hits_zero() {
        let mut ctrl = controller();
        assert_eq!(ctrl.total_pages(), 1); // empty result set still has one page

        load(&mut ctrl, 10);
        assert_eq!(ctrl.total_pages(), 1);

        load(&mut ctrl, 11);
        assert_eq!(ctrl.total_pages(), 2);

        load(&mut ctrl, 25);
        assert_eq!(ctrl.total_pages(), 3);
    }

    #[test]
    fn test_last_page_holds_the_tail() {
        // 25 records at page size 10: page 3 shows the trailing 5.
        let mut ctrl = controller();
        load(&mut ctrl, 25);
        ctrl.next_page();
        ctrl.next_page();
        assert_eq!(ctrl.page(), 3);
        assert_eq!(ctrl.visible_rows().len(), 5);
        assert!(ctrl.next_disabled());
        assert!(!ctrl.prev_disabled());
    }

    #[test]
    fn test_pages_concatenate_to_full_result_set() {
        let mut ctrl = controller();
        load(&mut ctrl, 25);

        let mut seen = Vec::new();
        for _ in 0..ctrl.total_pages() {
            assert!(ctrl.visible_rows().len() <= ctrl.page_size_effective());
            seen.extend(ctrl.visible_rows().iter().cloned());
            ctrl.next_page();
        }
        let ids: Vec<&str> = seen.iter().map(|row| row.record.id.as_str()).collect();
        let expected: Vec<String> = (0..25).map(|i| format!("c{i}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_navigation_is_clamped_at_both_edges() {
        let mut ctrl = controller();
        load(&mut ctrl, 25);

        ctrl.prev_page();
        assert_eq!(ctrl.page(), 1); // already on first page

        for _ in 0..10 {
            ctrl.next_page();
        }
        assert_eq!(ctrl.page(), 3);
        assert!(ctrl.next_disabled());
        ctrl.next_page();
        assert_eq!(ctrl.page(), 3);
    }

    #[test]
    fn test_fetch_completion_resets_page() {
        let mut notifier = RecordingNotifier::default();
        let mut ctrl = controller();
        load(&mut ctrl, 25);
        ctrl.next_page();
        assert_eq!(ctrl.page(), 2);

        // Success resets to page 1.
        ctrl.begin_fetch().unwrap();
        ctrl.apply_fetch(Ok(records(25)), &mut notifier);
        assert_eq!(ctrl.page(), 1);

        ctrl.next_page();
        assert_eq!(ctrl.page(), 2);

        // Failure resets too.
        ctrl.begin_fetch().unwrap();
        ctrl.apply_fetch(Err(FetchError::Transport("boom".to_string())), &mut notifier);
        assert_eq!(ctrl.page(), 1);
    }

    #[test]
    fn test_failed_fetch_clears_rows_and_notifies() {
        let mut notifier = RecordingNotifier::default();
        let mut ctrl = controller();
        load(&mut ctrl, 5);

        ctrl.begin_fetch().unwrap();
        ctrl.apply_fetch(
            Err(FetchError::Backend {
                message: "Access denied".to_string(),
            }),
            &mut notifier,
        );

        assert_eq!(notifier.messages, vec!["Access denied".to_string()]);
        assert!(!ctrl.has_results());
        assert_eq!(ctrl.page(), 1);
        assert!(!ctrl.loading());
    }

    #[test]
    fn test_debounce_keeps_only_the_last_keystroke() {
        let mut ctrl = controller();
        let start = Instant::now();

        ctrl.set_search_term("a", start);
        ctrl.set_search_term("ab", start + Duration::from_millis(100));
        ctrl.set_search_term("abc", start + Duration::from_millis(200));

        // Not idle long enough after the last keystroke.
        assert!(ctrl.poll_debounce(start + Duration::from_millis(400)).is_none());

        let req = ctrl
            .poll_debounce(start + Duration::from_millis(500))
            .expect("debounce elapsed");
        assert_eq!(req.search_term, "abc");

        // The slot is consumed; nothing fires again.
        assert!(ctrl.poll_debounce(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_debounce_without_account_clears_slot_quietly() {
        let mut ctrl = ContactListController::new(None, None, "https://crm.example.com");
        let start = Instant::now();
        ctrl.set_search_term("ghost", start);
        assert!(ctrl.poll_debounce(start + SEARCH_DEBOUNCE).is_none());
        assert!(!ctrl.loading());
        assert!(ctrl.poll_debounce(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_overlapping_fetches_last_completion_wins() {
        let mut notifier = RecordingNotifier::default();
        let mut ctrl = controller();

        // Two requests issued back to back; completions arrive out of order.
        let first = ctrl.begin_fetch().unwrap();
        let second = ctrl.begin_fetch().unwrap();
        assert_eq!(first.account_id, second.account_id);

        ctrl.apply_fetch(Ok(records(20)), &mut notifier);
        ctrl.apply_fetch(Ok(records(3)), &mut notifier);

        assert_eq!(ctrl.visible_rows().len(), 3);
        assert_eq!(ctrl.page(), 1);
        assert!(!ctrl.loading());
    }

    #[test]
    fn test_rows_carry_derived_contact_links() {
        let mut ctrl = controller();
        load(&mut ctrl, 2);
        assert_eq!(
            ctrl.visible_rows()[0].contact_url,
            "https://crm.example.com/contacts/c0/view"
        );
        assert_eq!(
            ctrl.visible_rows()[1].contact_url,
            "https://crm.example.com/contacts/c1/view"
        );
    }

    #[test]
    fn test_view_snapshot_matches_accessors() {
        let mut ctrl = controller();
        load(&mut ctrl, 12);
        ctrl.next_page();

        let view = ctrl.view();
        assert_eq!(view.page, 2);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.visible_rows.len(), 2);
        assert!(view.has_results);
        assert!(!view.prev_disabled);
        assert!(view.next_disabled);
        assert!(!view.loading);
    }
}
