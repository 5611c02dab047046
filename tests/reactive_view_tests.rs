//! Live view behaviour: every observed change recomputes the layout once.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use operation_projection::{
    CallbackNode, DisplayConfig, ExternalDocs, LayoutDescriptor, ObservableConfig,
    ObservableOperation, OperationField, OperationNode, OperationView, ParameterLocation,
    ParameterNode, RequestBody, ResponseNode,
};
use pretty_assertions::assert_eq;

fn mounted() -> (ObservableOperation, ObservableConfig, OperationView) {
    let operation = ObservableOperation::new(
        OperationNode::new("operation/getPet", "Get pet")
            .with_http_verb("get")
            .with_path("/pets/{petId}")
            .with_response(ResponseNode::with_code("200")),
    );
    let config = ObservableConfig::default();
    let view = OperationView::mount(&operation, &config);
    (operation, config, view)
}

#[test]
fn test_toggling_deprecated_recomputes_once() {
    let (operation, _config, view) = mounted();
    assert!(!view.descriptor().title().has_badge("Deprecated"));

    assert!(operation.set_deprecated(true));

    assert_eq!(view.recompute_count(), 1);
    assert_eq!(view.descriptor().title().badge_texts(), vec!["Deprecated"]);
}

#[test]
fn test_unchanged_value_does_not_recompute() {
    let (operation, config, view) = mounted();

    assert!(!operation.set_name("Get pet"));
    assert!(!config.set(DisplayConfig::default()));

    assert_eq!(view.recompute_count(), 0);
}

#[test]
fn test_multi_field_update_recomputes_once() {
    let (operation, _config, view) = mounted();

    let changed = operation.update(|node| {
        node.is_webhook = true;
        node.http_verb = Some("post".to_string());
        node.responses.push(ResponseNode::with_code("500"));
    });

    assert!(changed.contains(&OperationField::IsWebhook));
    assert!(changed.contains(&OperationField::Responses));
    assert_eq!(view.recompute_count(), 1);

    let layout = view.descriptor();
    assert_eq!(layout.title().badge_texts(), vec!["Webhook"]);
    assert_eq!(layout.error_responses().unwrap().codes(), vec!["500"]);
}

#[test]
fn test_config_change_moves_endpoint_and_updates_badge() {
    let (operation, config, view) = mounted();
    assert!(view.descriptor().side.endpoint.is_some());

    config.update(|c| c.path_in_middle_panel = true);
    let layout = view.descriptor();
    assert!(layout.side.endpoint.is_none());
    assert!(layout.main.endpoint.as_ref().unwrap().inverted);

    operation.set_webhook(true);
    config.update(|c| c.show_webhook_verb = true);
    assert_eq!(view.descriptor().title().badge_texts(), vec!["Webhook | GET"]);
    assert_eq!(view.recompute_count(), 3);
}

#[test]
fn test_on_update_receives_each_descriptor() {
    let (operation, _config, view) = mounted();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = view.on_update(move |layout| {
        sink.lock().unwrap().push(layout.title().text.clone());
    });

    operation.set_name("Find pet");
    operation.set_name("Fetch pet");

    assert_eq!(*seen.lock().unwrap(), vec!["Find pet", "Fetch pet"]);
}

#[test]
fn test_dropping_view_releases_subscriptions() {
    let (operation, config, view) = mounted();
    assert_eq!(operation.subscriber_count(), 1);
    assert_eq!(config.subscriber_count(), 1);

    drop(view);

    assert_eq!(operation.subscriber_count(), 0);
    assert_eq!(config.subscriber_count(), 0);
    assert!(operation.set_deprecated(true));
}

#[test]
fn test_views_on_shared_config_update_independently() {
    let config = ObservableConfig::default();
    let first = ObservableOperation::new(OperationNode::new("a", "A"));
    let second = ObservableOperation::new(OperationNode::new("b", "B"));
    let first_view = OperationView::mount(&first, &config);
    let second_view = OperationView::mount(&second, &config);

    first.set_deprecated(true);
    config.update(|c| c.show_webhook_verb = true);

    assert_eq!(first_view.recompute_count(), 2);
    assert_eq!(second_view.recompute_count(), 1);
    assert!(!second_view.descriptor().title().has_badge("Deprecated"));
}

type Write = Box<dyn Fn(&ObservableOperation) -> bool>;
type Check = Box<dyn Fn(&LayoutDescriptor) -> bool>;

fn case(
    field: &'static str,
    write: impl Fn(&ObservableOperation) -> bool + 'static,
    check: impl Fn(&LayoutDescriptor) -> bool + 'static,
) -> (&'static str, Write, Check) {
    (field, Box::new(write), Box::new(check))
}

fn side_endpoint(layout: &LayoutDescriptor) -> (Option<&str>, Option<&str>) {
    layout
        .side
        .endpoint
        .as_ref()
        .map(|e| (e.http_verb.as_deref(), e.path.as_deref()))
        .unwrap_or((None, None))
}

#[test]
fn test_every_setter_recomputes_once_with_new_value() {
    let cases = vec![
        case(
            "description",
            |op| op.set_description(Some("Returns a single pet".to_string())),
            |layout| {
                layout.main.description.as_ref().and_then(|d| d.markdown.as_deref())
                    == Some("Returns a single pet")
            },
        ),
        case(
            "externalDocs",
            |op| {
                op.set_external_docs(Some(ExternalDocs {
                    url: "https://example.com/pets".to_string(),
                    description: None,
                }))
            },
            |layout| {
                layout
                    .main
                    .description
                    .as_ref()
                    .and_then(|d| d.external_docs.as_ref())
                    .is_some_and(|docs| docs.url == "https://example.com/pets")
            },
        ),
        case(
            "httpVerb",
            |op| op.set_http_verb(Some("delete".to_string())),
            |layout| side_endpoint(layout).0 == Some("delete"),
        ),
        case(
            "path",
            |op| op.set_path(Some("/pets".to_string())),
            |layout| side_endpoint(layout).1 == Some("/pets"),
        ),
        case(
            "extensions",
            |op| {
                let mut extensions = BTreeMap::new();
                extensions.insert("x-internal".to_string(), serde_json::json!(true));
                op.set_extensions(extensions)
            },
            |layout| {
                layout.main.extensions.get("x-internal") == Some(&serde_json::json!(true))
            },
        ),
        case(
            "security",
            |op| {
                let mut requirement = BTreeMap::new();
                requirement.insert("api_key".to_string(), Vec::new());
                op.set_security(vec![requirement])
            },
            |layout| {
                layout.main.security.len() == 1
                    && layout.main.security[0].contains_key("api_key")
            },
        ),
        case(
            "parameters",
            |op| {
                op.set_parameters(vec![ParameterNode {
                    name: "petId".to_string(),
                    location: ParameterLocation::Path,
                    required: true,
                    description: None,
                    deprecated: false,
                    schema: None,
                }])
            },
            |layout| {
                layout
                    .request()
                    .is_some_and(|r| r.parameters.len() == 1 && r.parameters[0].name == "petId")
            },
        ),
        case(
            "requestBody",
            |op| {
                op.set_request_body(Some(RequestBody {
                    description: Some("Pet to store".to_string()),
                    required: true,
                    content: BTreeMap::new(),
                }))
            },
            |layout| {
                layout
                    .request()
                    .and_then(|r| r.body.as_ref())
                    .is_some_and(|b| b.description.as_deref() == Some("Pet to store"))
            },
        ),
        case(
            "responses",
            |op| {
                op.set_responses(vec![
                    ResponseNode::with_code("200"),
                    ResponseNode::with_code("404"),
                ])
            },
            |layout| {
                layout.error_responses().is_some_and(|list| list.codes() == ["404"])
            },
        ),
        case(
            "callbacks",
            |op| {
                op.set_callbacks(vec![CallbackNode {
                    name: "onAdopted".to_string(),
                    operations: vec![OperationNode::new("cb", "Adopted")],
                }])
            },
            |layout| {
                layout
                    .main
                    .callbacks
                    .as_ref()
                    .is_some_and(|list| list.callbacks[0].name == "onAdopted")
                    && layout.side.callback_samples.is_some()
            },
        ),
    ];

    for (field, write, check) in cases {
        let (operation, _config, view) = mounted();
        assert!(
            !check(&view.descriptor()),
            "{} already shows the new value",
            field
        );

        assert!(write(&operation), "{} setter reported no change", field);
        assert_eq!(view.recompute_count(), 1, "recomputes after {}", field);
        assert!(check(&view.descriptor()), "{} change not reflected", field);

        assert!(!write(&operation), "{} setter changed twice", field);
        assert_eq!(view.recompute_count(), 1, "repeat write of {}", field);
    }
}

#[test]
fn test_view_handles_drive_the_model() {
    let (operation, config, view) = mounted();

    assert!(view.operation().set_deprecated(true));
    assert!(operation.read(|node| node.deprecated));

    config.update(|c| c.show_webhook_verb = true);
    assert!(view.config().get().show_webhook_verb);
    assert_eq!(view.operation().hash(), operation.hash());
    assert_eq!(view.recompute_count(), 2);
}
