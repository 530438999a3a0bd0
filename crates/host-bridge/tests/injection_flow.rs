use copilot_core_types::TabId;
use copilot_host_bridge::{BridgeError, ContextBridge, InProcessHost, PageArg, PageOp, PageWorld};
use serde_json::json;

#[tokio::test]
async fn bridge_executes_in_target_tab_only() {
    let host = InProcessHost::new();
    host.open_tab(
        TabId(1),
        PageWorld::new().with_global("mnsv2", |args| Ok(json!({"tab": 1, "args": args}))),
    );
    host.open_tab(
        TabId(2),
        PageWorld::new().with_global("mnsv2", |args| Ok(json!({"tab": 2, "args": args}))),
    );

    let bridge = ContextBridge::new(host.clone());
    let result = bridge
        .run_in_main_world(
            TabId(2),
            PageOp::InvokeGlobal {
                name: "mnsv2".into(),
                args: vec![PageArg::Value(json!("x"))],
            },
        )
        .await
        .expect("invoke through bridge");

    assert_eq!(result, Some(json!({"tab": 2, "args": ["x"]})));
    assert_eq!(host.inject_calls(), 1);
}

#[tokio::test]
async fn closed_tab_fails_before_page_evaluation() {
    let host = InProcessHost::new();
    host.open_tab(TabId(5), PageWorld::new());
    host.close_tab(TabId(5));

    let bridge = ContextBridge::new(host.clone());
    let err = bridge
        .run_in_main_world(
            TabId(5),
            PageOp::FetchJson {
                url: "https://host.page/ok".into(),
                init: json!({}),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::TabUnavailable(TabId(5))));
}

#[tokio::test]
async fn json_text_argument_is_rebuilt_page_side() {
    let host = InProcessHost::new();
    host.open_tab(
        TabId(3),
        PageWorld::new().with_global("_webmsxyw", |args| {
            // The page API sees the structured body, not its text encoding.
            assert_eq!(args.len(), 2);
            assert_eq!(args[0], json!("/p"));
            assert_eq!(args[1], json!({"x": 1}));
            Ok(json!({"signed": true}))
        }),
    );

    let bridge = ContextBridge::new(host);
    let body = json!({"x": 1});
    let result = bridge
        .run_in_main_world(
            TabId(3),
            PageOp::InvokeGlobal {
                name: "_webmsxyw".into(),
                args: vec![
                    PageArg::Value(json!("/p")),
                    PageArg::json_text(&body).unwrap(),
                ],
            },
        )
        .await
        .expect("signer invocation");

    assert_eq!(result, Some(json!({"signed": true})));
}
