//! End-to-end completion flows through `CompletionSession`

use ctxfill_core::{EngineConfig, SuggestionForest, logging};
use ctxfill_engine::{
    CandidateResponse, CompletionSession, ForestResolver, NavigationKey, TriggerSetBuilder,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

const FOREST: &str = indoc! {r#"
    [
      {
        "value": "customer",
        "type": "entity",
        "options": [
          { "value": "name", "type": "string" },
          { "value": "getAddress", "type": "function", "options": [
            { "value": "zip", "type": "string" },
            { "value": "city", "type": "string" }
          ] }
        ]
      },
      {
        "value": "location",
        "type": "entity",
        "options": [
          { "value": "getFormattedLocation", "type": "function" }
        ]
      },
      { "value": "today", "type": "function" }
    ]
"#};

fn forest() -> SuggestionForest {
    SuggestionForest::from_json(FOREST).unwrap()
}

fn session(config: EngineConfig) -> CompletionSession {
    logging::init_for_tests();
    CompletionSession::new(config, forest()).unwrap()
}

fn visible(session: &CompletionSession) -> Vec<String> {
    session
        .visible_candidates()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn test_drill_down_to_callable_leaf() {
    let mut s = session(EngineConfig::default());

    s.on_edit("Hi {{context.", 13).unwrap();
    assert_eq!(visible(&s), vec!["customer", "location", "today"]);

    s.handle_key(NavigationKey::Down).unwrap();
    let outcome = s.handle_key(NavigationKey::Enter).unwrap();
    assert_eq!(outcome.buffer.unwrap().text(), "Hi {{context.location.");
    assert_eq!(visible(&s), vec!["getFormattedLocation"]);

    let outcome = s.handle_key(NavigationKey::Enter).unwrap();
    let buffer = outcome.buffer.unwrap();
    assert_eq!(
        buffer.text(),
        "Hi {{context.location.getFormattedLocation()}}"
    );
    assert_eq!(buffer.caret(), buffer.text().len());
    assert!(!s.is_visible());

    let spans = s.placeholder_spans();
    assert_eq!(spans.len(), 1);
    assert!(spans[0].callable);
}

#[test]
fn test_typed_partial_filters_and_is_replaced() {
    let mut s = session(EngineConfig::default());

    s.on_edit("{{context.customer.getAddress.c", 31).unwrap();
    assert_eq!(visible(&s), vec!["city"]);

    let (plan, request) = s.commit_selected().unwrap();
    assert_eq!(plan.buffer.text(), "{{context.customer.getAddress.city}}");
    assert!(request.is_none());
}

#[test]
fn test_commit_inside_existing_placeholder() {
    let mut s = session(EngineConfig::default());
    let text = "Dear {{context.customer.na}}, welcome";

    s.on_edit(text, 26).unwrap();
    let (plan, _) = s.commit_selected().unwrap();

    assert_eq!(plan.buffer.text(), "Dear {{context.customer.name}}, welcome");
    assert_eq!(plan.buffer.text().matches("}}").count(), 1);
    assert_eq!(plan.buffer.caret(), 30);
}

#[test]
fn test_every_trigger_resolves() {
    let forest = forest();
    let config = EngineConfig::default();
    let set = TriggerSetBuilder::from_config(&config).build(&forest).unwrap();
    let resolver = ForestResolver::from_config(&config);

    assert_eq!(set.len(), 3);
    for trigger in set.iter() {
        let node = resolver
            .resolve(trigger, &forest)
            .unwrap_or_else(|| panic!("{trigger} did not resolve"));
        assert!(!node.is_terminal());
        assert_eq!(resolver.path_for(node.path()), trigger);
    }
}

#[test]
fn test_selection_stays_in_window() {
    let config = EngineConfig::default().with_max_options(2);
    let mut s = session(config);
    s.on_edit("{{context.", 10).unwrap();

    assert_eq!(s.navigation().candidates().len(), 3);
    assert_eq!(visible(&s).len(), 2);

    let keys = [
        NavigationKey::Down,
        NavigationKey::Down,
        NavigationKey::Up,
        NavigationKey::Up,
        NavigationKey::Up,
        NavigationKey::Down,
        NavigationKey::Other,
    ];
    for key in keys {
        s.handle_key(key).unwrap();
        assert!(s.navigation().selected_index() < 2);
        assert!(s.navigation().selected().is_some());
    }
}

#[test]
fn test_only_latest_response_applies() {
    let mut s = session(EngineConfig::default());

    let first = s.on_edit("{{context.l", 11).unwrap().request.unwrap();
    let second = s.on_edit("{{context.lo", 12).unwrap().request.unwrap();
    assert!(second.sequence > first.sequence);
    assert_eq!(second.partial, "lo");

    let late = CandidateResponse {
        sequence: first.sequence,
        forest: SuggestionForest::empty(),
    };
    assert!(!s.apply_response(late).unwrap());
    assert_eq!(visible(&s), vec!["location"]);

    let replacement = SuggestionForest::from_json(
        &serde_json::json!([
            { "value": "locale", "type": "string" },
            { "value": "lookup", "type": "query" }
        ])
        .to_string(),
    )
    .unwrap();
    let fresh = CandidateResponse {
        sequence: second.sequence,
        forest: replacement,
    };
    assert!(s.apply_response(fresh).unwrap());
    assert_eq!(visible(&s), vec!["locale", "lookup"]);
}

#[test]
fn test_case_insensitive_whole_word_trigger() {
    let config = EngineConfig::default()
        .with_case_insensitive(true)
        .with_whole_word(true);
    let mut s = session(config);

    s.on_edit("x {{CONTEXT.cust", 16).unwrap();
    assert_eq!(visible(&s), vec!["customer"]);

    s.on_edit("(x) {{context.", 14).unwrap();
    assert!(s.is_visible());

    // Preceded by a word character
    s.on_edit("ab{{context.", 12).unwrap();
    assert!(!s.is_visible());
    s.on_edit("x_{{context.", 12).unwrap();
    assert!(!s.is_visible());
}

#[test]
fn test_caret_move_rescans() {
    let mut s = session(EngineConfig::default());
    s.on_edit("{{context.customer. and more", 28).unwrap();
    assert!(!s.is_visible());

    let request = s.on_caret_move(19).unwrap().unwrap();
    assert_eq!(request.trigger, "{{context.customer.");
    assert_eq!(visible(&s), vec!["name", "getAddress"]);
}
