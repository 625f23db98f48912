use calmai_core::browse::{ConversationFilter, filter_conversations, filter_patients};
use calmai_core::entries::TopicFilter;
use calmai_core::fixtures;
use calmai_core::paging::{Page, paginate, total_pages};

#[test]
fn patients_sorted_by_name() {
    let patients = fixtures::patients();
    let names: Vec<&str> = filter_patients(&patients, "")
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["Alex Rivera", "Jordan Lee", "Morgan Chen", "Sam Patel", "Taylor Brooks"]
    );
}

#[test]
fn patient_search_matches_name_or_email() {
    let patients = fixtures::patients();
    let by_name: Vec<&str> = filter_patients(&patients, "LEE")
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(by_name, ["p2"]);

    let by_email: Vec<&str> = filter_patients(&patients, "morgan.chen@")
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(by_email, ["p5"]);

    assert!(filter_patients(&patients, "nobody").is_empty());
}

#[test]
fn conversation_filters_combine() {
    let conversations = fixtures::conversations();

    let anxiety = ConversationFilter {
        topic: TopicFilter::Only("anxiety".to_string()),
        ..Default::default()
    };
    assert_eq!(filter_conversations(&conversations, &anxiety).len(), 2);

    let anxious_high = ConversationFilter {
        severity: Some("HIGH".to_string()),
        ..anxiety.clone()
    };
    let ids: Vec<&str> = filter_conversations(&conversations, &anxious_high)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, ["c2"]);

    let text = ConversationFilter {
        search: "grief".to_string(),
        ..Default::default()
    };
    let ids: Vec<&str> = filter_conversations(&conversations, &text)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, ["c6"]);
}

#[test]
fn paginate_generic_collections() {
    let page = paginate((0..7).collect::<Vec<_>>(), 1, 3);
    assert_eq!(page.items, [3, 4, 5]);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next());

    let empty: Page<i32> = paginate(Vec::new(), 4, 10);
    assert_eq!(empty, Page::empty(10));
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
}
