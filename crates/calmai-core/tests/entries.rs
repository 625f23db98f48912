use calmai_core::entries::{
    EntryQuery, JOURNAL_PAGE_SIZE, PATIENT_VIEW_PAGE_SIZE, SortOrder, TopicFilter, filter_entries,
    query_entries, sort_entries, topic_options,
};
use calmai_core::fixtures;
use calmai_core::models::JournalEntry;
use jiff::civil::date;
use jiff::tz::TimeZone;

fn numbered_entries(n: usize) -> Vec<JournalEntry> {
    let base = fixtures::journal_entries().remove(0);
    (0..n)
        .map(|i| JournalEntry {
            id: format!("e{i}"),
            content: format!("entry number {i}"),
            created_at: date(2026, 1, 1)
                .at(0, 0, 0, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap()
                .timestamp()
                .checked_add(jiff::SignedDuration::from_hours(i as i64 * 5))
                .unwrap()
                .into(),
            ..base.clone()
        })
        .collect()
}

fn ids(page_items: &[&JournalEntry]) -> Vec<String> {
    page_items.iter().map(|e| e.id.clone()).collect()
}

#[test]
fn fixture_entries_sort_newest_first() {
    let mut entries = fixtures::journal_entries();
    entries.reverse();
    sort_entries(&mut entries, SortOrder::Desc);

    let days: Vec<String> = entries.iter().map(|e| e.day().to_string()).collect();
    assert_eq!(
        days,
        ["2026-02-20", "2026-02-18", "2026-02-15", "2026-02-14", "2026-02-12"]
    );
}

#[test]
fn unmatched_search_gives_empty_page() {
    let entries = fixtures::journal_entries();
    let query = EntryQuery::default().with_search("volcano");
    let page = query_entries(&entries, &query);

    assert!(page.items.is_empty());
    assert_eq!(page.total_filtered, 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.page, 0);
}

#[test]
fn search_is_case_insensitive() {
    let entries = fixtures::journal_entries();
    let page = query_entries(&entries, &EntryQuery::default().with_search("ANXIOUS"));
    assert_eq!(ids(&page.items), ["j3"]);
}

#[test]
fn clearing_filters_restores_the_count() {
    let entries = fixtures::journal_entries();
    let mut query = EntryQuery::default().with_search("sleep");
    assert!(query_entries(&entries, &query).total_filtered < entries.len());

    query.clear_filters();
    assert_eq!(query_entries(&entries, &query).total_filtered, entries.len());
}

#[test]
fn topic_filter_keeps_labelled_entries() {
    let entries = fixtures::journal_entries();
    let query = EntryQuery::default().with_topic(TopicFilter::Only("anxiety".to_string()));
    let page = query_entries(&entries, &query);
    assert_eq!(ids(&page.items), ["j3", "j5"]);

    let all = EntryQuery::default().with_topic("all".parse().unwrap());
    assert_eq!(query_entries(&entries, &all).total_filtered, 5);
}

#[test]
fn date_range_is_inclusive() {
    let entries = fixtures::journal_entries();
    let query = EntryQuery::default()
        .with_date_range(Some(date(2026, 2, 14)), Some(date(2026, 2, 18)))
        .with_sort(SortOrder::Asc);
    assert_eq!(ids(&query_entries(&entries, &query).items), ["j4", "j3", "j2"]);

    let open_start = EntryQuery::default().with_date_range(None, Some(date(2026, 2, 14)));
    assert_eq!(ids(&query_entries(&entries, &open_start).items), ["j4", "j5"]);

    let open_end = EntryQuery::default().with_date_range(Some(date(2026, 2, 19)), None);
    assert_eq!(ids(&query_entries(&entries, &open_end).items), ["j1"]);
}

#[test]
fn date_range_uses_the_written_day() {
    let base = fixtures::journal_entries().remove(0);
    let entries: Vec<JournalEntry> = [
        ("east", "2026-02-20T01:00:00+05:00"),
        ("west", "2026-02-19T22:00:00-05:00"),
        ("naive", "2026-02-20T10:30:00"),
    ]
    .into_iter()
    .map(|(id, at)| JournalEntry {
        id: id.to_string(),
        created_at: at.parse().unwrap(),
        ..base.clone()
    })
    .collect();

    let query = EntryQuery::default()
        .with_date_range(Some(date(2026, 2, 20)), Some(date(2026, 2, 20)));
    let page = query_entries(&entries, &query);
    assert_eq!(page.total_filtered, 2);
    assert_eq!(ids(&page.items), ["naive", "east"]);

    let query = EntryQuery::default().with_date_range(None, Some(date(2026, 2, 19)));
    assert_eq!(ids(&query_entries(&entries, &query).items), ["west"]);
}

#[test]
fn asc_and_desc_are_reverses() {
    let entries = fixtures::journal_entries();
    let desc = query_entries(&entries, &EntryQuery::default().with_sort(SortOrder::Desc));
    let asc = query_entries(&entries, &EntryQuery::default().with_sort(SortOrder::Asc));

    let mut reversed = ids(&desc.items);
    reversed.reverse();
    assert_eq!(reversed, ids(&asc.items));
}

#[test]
fn equal_timestamps_keep_input_order() {
    let mut entries = numbered_entries(3);
    let same = entries[0].created_at.clone();
    for e in &mut entries {
        e.created_at = same.clone();
    }
    let mut refs: Vec<&JournalEntry> = entries.iter().collect();
    sort_entries(&mut refs, SortOrder::Desc);
    assert_eq!(ids(&refs), ["e0", "e1", "e2"]);
    sort_entries(&mut refs, SortOrder::Asc);
    assert_eq!(ids(&refs), ["e0", "e1", "e2"]);
}

#[test]
fn pages_slice_the_sorted_set() {
    let entries = numbered_entries(25);
    let query = EntryQuery::new(JOURNAL_PAGE_SIZE)
        .with_sort(SortOrder::Asc)
        .with_page(2);
    let page = query_entries(&entries, &query);

    assert_eq!(page.total_filtered, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(ids(&page.items), ["e20", "e21", "e22", "e23", "e24"]);
    assert!(!page.has_next());
    assert!(page.has_previous());
}

#[test]
fn total_pages_tracks_page_size() {
    let entries = numbered_entries(41);
    for size in [1, 3, JOURNAL_PAGE_SIZE, PATIENT_VIEW_PAGE_SIZE, 41, 100] {
        let mut query = EntryQuery::default();
        query.set_page_size(size);
        let page = query_entries(&entries, &query);
        assert_eq!(page.total_pages, 41usize.div_ceil(size), "size = {size}");
    }
}

#[test]
fn changing_filters_resets_page() {
    let mut query = EntryQuery::new(PATIENT_VIEW_PAGE_SIZE).with_page(3);
    query.set_search("work");
    assert_eq!(query.page(), 0);

    query.set_page(2);
    query.set_topic(TopicFilter::Only("sleep".to_string()));
    assert_eq!(query.page(), 0);

    query.set_page(2);
    query.set_date_range(Some(date(2026, 1, 1)), None);
    assert_eq!(query.page(), 0);

    query.set_page(2);
    query.set_page_size(5);
    assert_eq!(query.page(), 0);

    query.set_page(2);
    query.set_sort(SortOrder::Asc);
    assert_eq!(query.page(), 2);
}

#[test]
fn out_of_range_page_falls_back_to_first() {
    let entries = numbered_entries(5);
    let page = query_entries(&entries, &EntryQuery::default().with_page(9));
    assert_eq!(page.page, 0);
    assert_eq!(page.items.len(), 5);
}

#[test]
fn zero_page_size_is_clamped() {
    let entries = numbered_entries(2);
    let mut query = EntryQuery::default();
    query.set_page_size(0);
    assert_eq!(query.page_size(), 1);
    assert_eq!(query_entries(&entries, &query).total_pages, 2);
}

#[test]
fn filtering_preserves_input_order() {
    let entries = fixtures::journal_entries();
    let filtered = filter_entries(&entries, &EntryQuery::default().with_search("felt"));
    assert_eq!(ids(&filtered), ["j2", "j3", "j4"]);
}

#[test]
fn topic_options_skip_placeholder() {
    let mut entries = fixtures::journal_entries();
    entries[0].topics = vec!["processing".to_string()];
    let options = topic_options(&entries);
    assert!(!options.contains(&"processing".to_string()));
    assert_eq!(
        options,
        ["anxiety", "relationships", "self-care", "sleep", "work stress"]
    );
}
